//! Generated itinerary shapes.
//!
//! These are the exact JSON shapes the generation endpoint returns and the
//! trip records persist. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The generation result: one trip described under two optimization goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTrip {
    pub trip_name: String,
    /// Cost-minimizing plan.
    pub budget_itinerary: Itinerary,
    /// Experience-maximizing plan.
    pub experience_itinerary: Itinerary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub summary: String,
    pub daily_plans: Vec<DailyPlan>,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub day: u32,
    pub activities: Vec<Activity>,
    pub accommodation: Accommodation,
    pub meals: Meals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Time-of-day label, e.g. `"Morning"` or `"08:00"`.
    pub time: String,
    pub description: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accommodation {
    pub name: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meals {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub description: String,
    pub cost: f64,
}

impl GeneratedTrip {
    /// Check both itineraries against a trip of `duration` days.
    pub fn check_shape(&self, duration: u32) -> Result<(), CoreError> {
        self.budget_itinerary
            .check_shape(duration)
            .map_err(|e| prefixed("budgetItinerary", e))?;
        self.experience_itinerary
            .check_shape(duration)
            .map_err(|e| prefixed("experienceItinerary", e))?;
        Ok(())
    }
}

impl Itinerary {
    /// Check the day-by-day invariant and cost sanity.
    ///
    /// `daily_plans` must hold exactly `duration` entries numbered
    /// `1..=duration` in order, and every cost must be a finite,
    /// non-negative number.
    pub fn check_shape(&self, duration: u32) -> Result<(), CoreError> {
        if self.daily_plans.len() != duration as usize {
            return Err(CoreError::Validation(format!(
                "expected {duration} daily plans, got {}",
                self.daily_plans.len()
            )));
        }

        for (index, plan) in self.daily_plans.iter().enumerate() {
            let expected = index as u32 + 1;
            if plan.day != expected {
                return Err(CoreError::Validation(format!(
                    "dailyPlans[{index}] has day {}, expected {expected}",
                    plan.day
                )));
            }
            check_cost(&format!("dailyPlans[{index}].accommodation"), plan.accommodation.cost)?;
            for (meal_name, meal) in plan.meals.iter() {
                check_cost(&format!("dailyPlans[{index}].meals.{meal_name}"), meal.cost)?;
            }
            for (a, activity) in plan.activities.iter().enumerate() {
                check_cost(&format!("dailyPlans[{index}].activities[{a}]"), activity.cost)?;
            }
        }

        check_cost("totalCost", self.total_cost)
    }
}

impl Meals {
    /// The three meals paired with their field names, in serving order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Meal)> {
        [
            ("breakfast", &self.breakfast),
            ("lunch", &self.lunch),
            ("dinner", &self.dinner),
        ]
        .into_iter()
    }
}

fn check_cost(path: &str, cost: f64) -> Result<(), CoreError> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(CoreError::Validation(format!(
            "{path} cost must be a non-negative number, got {cost}"
        )));
    }
    Ok(())
}

fn prefixed(prefix: &str, err: CoreError) -> CoreError {
    match err {
        CoreError::Validation(msg) => CoreError::Validation(format!("{prefix}: {msg}")),
        other => other,
    }
}
