//! Repository tests against a real database.
//!
//! Ignored by default: run with `DATABASE_URL` set and `--ignored`.

use mapa_core::itinerary::{Accommodation, DailyPlan, Itinerary, Meal, Meals};
use mapa_db::models::trip::{CreateTrip, UpdateTrip};
use mapa_db::models::user::CreateUser;
use mapa_db::repositories::{ReferenceRepo, TripRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> i64 {
    let input = CreateUser {
        email: email.to_string(),
        display_name: "Tester".to_string(),
        ..Default::default()
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
        .id
}

fn one_day_itinerary() -> Itinerary {
    let meal = |d: &str| Meal {
        description: d.to_string(),
        cost: 300.0,
    };
    Itinerary {
        summary: "Quick hop".to_string(),
        daily_plans: vec![DailyPlan {
            day: 1,
            activities: vec![],
            accommodation: Accommodation {
                name: "Capsule hotel".to_string(),
                cost: 2000.0,
            },
            meals: Meals {
                breakfast: meal("Toast"),
                lunch: meal("Udon"),
                dinner: meal("Yakitori"),
            },
        }],
        total_cost: 2900.0,
    }
}

fn new_trip(name: &str) -> CreateTrip {
    CreateTrip {
        trip_name: name.to_string(),
        origin_airport: "MNL".to_string(),
        destination_country: "JPN".to_string(),
        travel_month: 4,
        currency: "PHP".to_string(),
        duration: 1,
        budget: 50_000,
        preferences: vec!["food".to_string()],
        selected_cities: vec!["TYO".to_string()],
        budget_itinerary: Some(one_day_itinerary()),
        experience_itinerary: None,
        status: None,
    }
}

// ---------------------------------------------------------------------------
// Trips
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_defaults_status_and_round_trips_itinerary(pool: PgPool) {
    let user_id = new_user(&pool, "a@test.com").await;
    let trip = TripRepo::create(&pool, user_id, &new_trip("Tokyo"))
        .await
        .unwrap();

    assert_eq!(trip.user_id, user_id);
    assert_eq!(trip.status, "planned");
    assert_eq!(trip.preferences, vec!["food"]);
    let saved = trip.budget_itinerary.expect("itinerary stored").0;
    assert_eq!(saved, one_day_itinerary());
    assert!(trip.experience_itinerary.is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn list_by_user_is_newest_first_and_owner_scoped(pool: PgPool) {
    let alice = new_user(&pool, "alice@test.com").await;
    let bob = new_user(&pool, "bob@test.com").await;
    let first = TripRepo::create(&pool, alice, &new_trip("First")).await.unwrap();
    let second = TripRepo::create(&pool, alice, &new_trip("Second")).await.unwrap();
    TripRepo::create(&pool, bob, &new_trip("Bob's")).await.unwrap();

    let trips = TripRepo::list_by_user(&pool, alice).await.unwrap();
    let ids: Vec<i64> = trips.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn update_applies_only_given_fields(pool: PgPool) {
    let user_id = new_user(&pool, "u@test.com").await;
    let trip = TripRepo::create(&pool, user_id, &new_trip("Before")).await.unwrap();

    let update = UpdateTrip {
        status: Some("ongoing".to_string()),
        ..Default::default()
    };
    let updated = TripRepo::update(&pool, trip.id, &update)
        .await
        .unwrap()
        .expect("trip exists");
    assert_eq!(updated.status, "ongoing");
    assert_eq!(updated.trip_name, "Before");
    assert!(updated.budget_itinerary.is_some());

    let missing = TripRepo::update(&pool, trip.id + 1000, &update).await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn delete_is_idempotent(pool: PgPool) {
    let user_id = new_user(&pool, "d@test.com").await;
    let trip = TripRepo::create(&pool, user_id, &new_trip("Gone")).await.unwrap();

    assert!(TripRepo::delete(&pool, trip.id).await.unwrap());
    assert!(!TripRepo::delete(&pool, trip.id).await.unwrap());
    assert!(TripRepo::find_by_id(&pool, trip.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn invalid_status_is_rejected_by_check_constraint(pool: PgPool) {
    let user_id = new_user(&pool, "c@test.com").await;
    let mut input = new_trip("Bad");
    input.status = Some("archived".to_string());
    assert!(TripRepo::create(&pool, user_id, &input).await.is_err());
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn seed_provides_lookup_data(pool: PgPool) {
    let mnl = ReferenceRepo::find_airport(&pool, "MNL").await.unwrap();
    assert_eq!(mnl.unwrap().name, "Ninoy Aquino International Airport");

    let japan = ReferenceRepo::find_country(&pool, "JPN").await.unwrap();
    assert_eq!(japan.unwrap().name, "Japan");

    assert!(!ReferenceRepo::list_currencies(&pool).await.unwrap().is_empty());
    assert!(!ReferenceRepo::list_preferences(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn find_cities_is_scoped_to_country(pool: PgPool) {
    let codes = vec!["TYO".to_string(), "SEL".to_string(), "NOPE".to_string()];
    let cities = ReferenceRepo::find_cities(&pool, "JPN", &codes).await.unwrap();
    let names: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Tokyo"]);
}
