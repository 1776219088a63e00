//! Shared harness for HTTP integration tests.
//!
//! Builds the production router over in-memory store fakes and a scripted
//! generator, so tests exercise the real middleware stack, extractors, and
//! handlers without a database or network.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use sqlx::types::Json;
use tower::ServiceExt;

use mapa_api::app::build_app;
use mapa_api::auth::session::{generate_session_token, SessionConfig};
use mapa_api::auth::tokens::TokenConfig;
use mapa_api::config::ServerConfig;
use mapa_api::state::AppState;
use mapa_core::identity::IdentityProvider;
use mapa_core::itinerary::{
    Accommodation, Activity, DailyPlan, GeneratedTrip, Itinerary, Meal, Meals,
};
use mapa_core::trip_request::TripRequest;
use mapa_core::types::{DbId, Timestamp};
use mapa_db::models::reference::{Airport, City, Country, Currency, Preference};
use mapa_db::models::session::{CreateSession, UserSession};
use mapa_db::models::trip::{CreateTrip, Trip, UpdateTrip};
use mapa_db::models::user::{CreateUser, User};
use mapa_db::stores::{ReferenceStore, SessionStore, TripStore, UserStore};
use mapa_genai::{GenAiConfig, GenerationError, ItineraryGenerator, ResolvedNames};

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        app_base_url: "http://localhost:5173".to_string(),
        session: SessionConfig::default(),
        tokens: TokenConfig {
            secret: TEST_SECRET.to_string(),
            email_verify_expiry_hours: 24,
            password_reset_expiry_mins: 60,
        },
        genai: GenAiConfig::default(),
    }
}

/// The router plus handles on every fake behind it.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub users: Arc<MemUserStore>,
    pub sessions: Arc<MemSessionStore>,
    pub trips: Arc<MemTripStore>,
    pub reference: Arc<MemReferenceStore>,
    pub generator: Arc<ScriptedGenerator>,
}

/// Build the full application over fresh fakes.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let users = Arc::new(MemUserStore::default());
    let sessions = Arc::new(MemSessionStore::default());
    let trips = Arc::new(MemTripStore::default());
    let reference = Arc::new(MemReferenceStore::seeded());
    let generator = Arc::new(ScriptedGenerator::default());

    let state = AppState {
        config: Arc::new(config.clone()),
        users: users.clone(),
        sessions: sessions.clone(),
        trips: trips.clone(),
        reference: reference.clone(),
        generator: generator.clone(),
        mailer: None,
    };

    TestApp {
        router: build_app(state),
        config,
        users,
        sessions,
        trips,
        reference,
        generator,
    }
}

impl TestApp {
    /// Create a local user and an active session, returning
    /// `(user, session_token)`.
    pub async fn signed_in_user(&self, email: &str) -> (User, String) {
        let user = self
            .users
            .create(&CreateUser {
                email: email.to_string(),
                display_name: "Test Traveler".to_string(),
                password_hash: None,
                ..Default::default()
            })
            .await
            .unwrap();
        let token = self.session_for(user.id).await;
        (user, token)
    }

    /// Start a session for an existing user and return its plaintext token.
    pub async fn session_for(&self, user_id: DbId) -> String {
        let (token, token_hash) = generate_session_token();
        self.sessions
            .create(&CreateSession {
                user_id,
                token_hash,
                expires_at: Utc::now() + Duration::days(1),
                user_agent: None,
                ip_address: None,
            })
            .await
            .unwrap();
        token
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, request(Method::GET, uri, token, None)).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    send(app, request(Method::POST, uri, token, Some(body))).await
}

pub async fn patch_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    send(app, request(Method::PATCH, uri, token, Some(body))).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, request(Method::DELETE, uri, token, None)).await
}

/// Read the full body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A well-formed itinerary of `days` days.
pub fn itinerary(days: u32) -> Itinerary {
    let meal = |description: &str, cost: f64| Meal {
        description: description.to_string(),
        cost,
    };
    let daily_plans = (1..=days)
        .map(|day| DailyPlan {
            day,
            activities: vec![Activity {
                time: "Morning".to_string(),
                description: format!("Day {day} walking tour"),
                cost: 500.0,
            }],
            accommodation: Accommodation {
                name: "Business hotel".to_string(),
                cost: 3500.0,
            },
            meals: Meals {
                breakfast: meal("Onigiri", 200.0),
                lunch: meal("Ramen", 600.0),
                dinner: meal("Izakaya", 1200.0),
            },
        })
        .collect();
    Itinerary {
        summary: "A loop through the highlights".to_string(),
        daily_plans,
        total_cost: 6000.0 * f64::from(days),
    }
}

/// The canonical valid generation request.
pub fn japan_request_body() -> serde_json::Value {
    serde_json::json!({
        "originAirport": "MNL",
        "destinationCountry": "JPN",
        "travelMonth": 4,
        "currency": "PHP",
        "duration": 5,
        "budget": 50000,
        "preferences": ["food", "nature"]
    })
}

/// A valid `POST /trips` body of `days` days with both itineraries.
pub fn trip_body(name: &str, days: u32) -> serde_json::Value {
    serde_json::json!({
        "tripName": name,
        "originAirport": "MNL",
        "destinationCountry": "JPN",
        "travelMonth": 4,
        "currency": "PHP",
        "duration": days,
        "budget": 50000,
        "preferences": ["food"],
        "selectedCities": ["TYO"],
        "budgetItinerary": itinerary(days),
        "experienceItinerary": itinerary(days),
    })
}

// ---------------------------------------------------------------------------
// Scripted generator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorMode {
    Succeed,
    Unconfigured,
    ServiceDown,
    BadOutput,
}

/// Generator fake: succeeds with a well-formed trip or fails with the
/// scripted error kind. Records every call.
pub struct ScriptedGenerator {
    mode: Mutex<GeneratorMode>,
    calls: Mutex<Vec<(TripRequest, ResolvedNames)>>,
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self {
            mode: Mutex::new(GeneratorMode::Succeed),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedGenerator {
    pub fn set_mode(&self, mode: GeneratorMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn calls(&self) -> Vec<(TripRequest, ResolvedNames)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ItineraryGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        request: &TripRequest,
        names: &ResolvedNames,
    ) -> Result<GeneratedTrip, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.clone(), names.clone()));

        let mode = *self.mode.lock().unwrap();
        match mode {
            GeneratorMode::Succeed => Ok(GeneratedTrip {
                trip_name: format!("Spring in {}", names.destination_country_name),
                budget_itinerary: itinerary(request.duration),
                experience_itinerary: itinerary(request.duration),
            }),
            GeneratorMode::Unconfigured => Err(GenerationError::Configuration(
                "GEMINI_API_KEY is not set".into(),
            )),
            GeneratorMode::ServiceDown => Err(GenerationError::Service(
                "Gemini API error (503): secret upstream detail".into(),
            )),
            GeneratorMode::BadOutput => Err(GenerationError::Parse(
                "response is not JSON and contains no fenced block".into(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory stores
// ---------------------------------------------------------------------------

/// Error returned by fakes told to fail.
fn unavailable() -> sqlx::Error {
    sqlx::Error::PoolTimedOut
}

#[derive(Default)]
pub struct MemUserStore {
    rows: Mutex<Vec<User>>,
}

impl MemUserStore {
    pub fn get(&self, id: DbId) -> Option<User> {
        self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    fn modify<F: FnOnce(&mut User)>(&self, id: DbId, f: F) -> bool {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                f(user);
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserStore for MemUserStore {
    async fn create(&self, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let user = User {
            id: rows.len() as DbId + 1,
            email: input.email.clone(),
            display_name: input.display_name.clone(),
            password_hash: input.password_hash.clone(),
            email_verified: input.email_verified,
            google_id: input.google_id.clone(),
            facebook_id: input.facebook_id.clone(),
            failed_login_count: 0,
            locked_until: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_provider(
        &self,
        provider: IdentityProvider,
        subject: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let rows = self.rows.lock().unwrap();
        let found = rows.iter().find(|u| match provider {
            IdentityProvider::Local => u.email == subject,
            IdentityProvider::Google => u.google_id.as_deref() == Some(subject),
            IdentityProvider::Facebook => u.facebook_id.as_deref() == Some(subject),
        });
        Ok(found.cloned())
    }

    async fn link_provider(
        &self,
        id: DbId,
        provider: IdentityProvider,
        subject: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        self.modify(id, |u| {
            match provider {
                IdentityProvider::Local => {}
                IdentityProvider::Google => u.google_id = Some(subject.to_string()),
                IdentityProvider::Facebook => u.facebook_id = Some(subject.to_string()),
            }
            u.email_verified = true;
        });
        Ok(self.get(id))
    }

    async fn mark_email_verified(&self, id: DbId) -> Result<bool, sqlx::Error> {
        Ok(self.modify(id, |u| u.email_verified = true))
    }

    async fn increment_failed_login(&self, id: DbId) -> Result<(), sqlx::Error> {
        self.modify(id, |u| u.failed_login_count += 1);
        Ok(())
    }

    async fn lock_account(&self, id: DbId, until: Timestamp) -> Result<(), sqlx::Error> {
        self.modify(id, |u| {
            u.locked_until = Some(until);
            u.failed_login_count = 0;
        });
        Ok(())
    }

    async fn record_successful_login(&self, id: DbId) -> Result<(), sqlx::Error> {
        self.modify(id, |u| {
            u.failed_login_count = 0;
            u.locked_until = None;
            u.last_login_at = Some(Utc::now());
        });
        Ok(())
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> Result<bool, sqlx::Error> {
        Ok(self.modify(id, |u| {
            u.password_hash = Some(password_hash.to_string());
            u.failed_login_count = 0;
            u.locked_until = None;
        }))
    }
}

#[derive(Default)]
pub struct MemSessionStore {
    rows: Mutex<Vec<UserSession>>,
}

impl MemSessionStore {
    pub fn active_count(&self, user_id: DbId) -> usize {
        let now = Utc::now();
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id && s.is_active(now))
            .count()
    }
}

#[async_trait]
impl SessionStore for MemSessionStore {
    async fn create(&self, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let session = UserSession {
            id: rows.len() as DbId + 1,
            user_id: input.user_id,
            token_hash: input.token_hash.clone(),
            expires_at: input.expires_at,
            revoked_at: None,
            user_agent: input.user_agent.clone(),
            ip_address: input.ip_address.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.push(session.clone());
        Ok(session)
    }

    async fn find_active_by_token_hash(
        &self,
        hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let now = Utc::now();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.token_hash == hash && s.is_active(now))
            .cloned())
    }

    async fn revoke(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        Ok(match rows.iter_mut().find(|s| s.id == id && s.is_active(now)) {
            Some(session) => {
                session.revoked_at = Some(now);
                true
            }
            None => false,
        })
    }

    async fn revoke_all_for_user(&self, user_id: DbId) -> Result<u64, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let mut count = 0;
        for session in rows
            .iter_mut()
            .filter(|s| s.user_id == user_id && s.is_active(now))
        {
            session.revoked_at = Some(now);
            count += 1;
        }
        Ok(count)
    }

    async fn cleanup_expired(&self) -> Result<u64, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let before = rows.len();
        rows.retain(|s| s.is_active(now));
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemTripStore {
    rows: Mutex<Vec<Trip>>,
    next_id: Mutex<DbId>,
}

impl MemTripStore {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl TripStore for MemTripStore {
    async fn create(&self, user_id: DbId, input: &CreateTrip) -> Result<Trip, sqlx::Error> {
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        let now = Utc::now();
        let trip = Trip {
            id,
            user_id,
            trip_name: input.trip_name.clone(),
            origin_airport: input.origin_airport.clone(),
            destination_country: input.destination_country.clone(),
            travel_month: input.travel_month,
            currency: input.currency.clone(),
            duration: input.duration,
            budget: input.budget,
            preferences: input.preferences.clone(),
            selected_cities: input.selected_cities.clone(),
            budget_itinerary: input.budget_itinerary.clone().map(Json),
            experience_itinerary: input.experience_itinerary.clone().map(Json),
            status: input
                .status
                .clone()
                .unwrap_or_else(|| mapa_core::trip::STATUS_PLANNED.to_string()),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(trip.clone());
        Ok(trip)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Trip>, sqlx::Error> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: DbId) -> Result<Vec<Trip>, sqlx::Error> {
        let mut trips: Vec<Trip> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        trips.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(trips)
    }

    async fn update(&self, id: DbId, input: &UpdateTrip) -> Result<Option<Trip>, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        let Some(trip) = rows.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &input.trip_name {
            trip.trip_name = v.clone();
        }
        if let Some(v) = &input.origin_airport {
            trip.origin_airport = v.clone();
        }
        if let Some(v) = &input.destination_country {
            trip.destination_country = v.clone();
        }
        if let Some(v) = input.travel_month {
            trip.travel_month = v;
        }
        if let Some(v) = &input.currency {
            trip.currency = v.clone();
        }
        if let Some(v) = input.duration {
            trip.duration = v;
        }
        if let Some(v) = input.budget {
            trip.budget = v;
        }
        if let Some(v) = &input.preferences {
            trip.preferences = v.clone();
        }
        if let Some(v) = &input.selected_cities {
            trip.selected_cities = v.clone();
        }
        if let Some(v) = &input.budget_itinerary {
            trip.budget_itinerary = Some(Json(v.clone()));
        }
        if let Some(v) = &input.experience_itinerary {
            trip.experience_itinerary = Some(Json(v.clone()));
        }
        if let Some(v) = &input.status {
            trip.status = v.clone();
        }
        trip.updated_at = Utc::now();
        Ok(Some(trip.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.id != id);
        Ok(rows.len() < before)
    }
}

/// Reference fake seeded with a small slice of the real seed data.
pub struct MemReferenceStore {
    airports: Vec<Airport>,
    countries: Vec<Country>,
    currencies: Vec<Currency>,
    preferences: Vec<Preference>,
    cities: Vec<City>,
    failing: AtomicBool,
}

impl MemReferenceStore {
    pub fn seeded() -> Self {
        let city = |code: &str, country: &str, name: &str| City {
            code: code.to_string(),
            country_code: country.to_string(),
            name: name.to_string(),
        };
        Self {
            airports: vec![Airport {
                code: "MNL".into(),
                name: "Ninoy Aquino International Airport".into(),
                city: "Manila".into(),
            }],
            countries: vec![
                Country {
                    code: "JPN".into(),
                    name: "Japan".into(),
                    region: "East Asia".into(),
                },
                Country {
                    code: "KOR".into(),
                    name: "South Korea".into(),
                    region: "East Asia".into(),
                },
            ],
            currencies: vec![Currency {
                code: "PHP".into(),
                name: "Philippine Peso".into(),
                symbol: "₱".into(),
            }],
            preferences: vec![
                Preference {
                    code: "food".into(),
                    name: "Food".into(),
                    description: "Local cuisine and street food".into(),
                },
                Preference {
                    code: "nature".into(),
                    name: "Nature".into(),
                    description: "Parks, mountains, and coastlines".into(),
                },
            ],
            cities: vec![
                city("TYO", "JPN", "Tokyo"),
                city("KYO", "JPN", "Kyoto"),
                city("OSA", "JPN", "Osaka"),
                city("SEL", "KOR", "Seoul"),
            ],
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail as if the database were down.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.failing.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReferenceStore for MemReferenceStore {
    async fn list_airports(&self) -> Result<Vec<Airport>, sqlx::Error> {
        self.check()?;
        Ok(self.airports.clone())
    }

    async fn find_airport(&self, code: &str) -> Result<Option<Airport>, sqlx::Error> {
        self.check()?;
        Ok(self.airports.iter().find(|a| a.code == code).cloned())
    }

    async fn list_countries(&self) -> Result<Vec<Country>, sqlx::Error> {
        self.check()?;
        Ok(self.countries.clone())
    }

    async fn find_country(&self, code: &str) -> Result<Option<Country>, sqlx::Error> {
        self.check()?;
        Ok(self.countries.iter().find(|c| c.code == code).cloned())
    }

    async fn list_currencies(&self) -> Result<Vec<Currency>, sqlx::Error> {
        self.check()?;
        Ok(self.currencies.clone())
    }

    async fn list_preferences(&self) -> Result<Vec<Preference>, sqlx::Error> {
        self.check()?;
        Ok(self.preferences.clone())
    }

    async fn list_cities(&self, country_code: &str) -> Result<Vec<City>, sqlx::Error> {
        self.check()?;
        Ok(self
            .cities
            .iter()
            .filter(|c| c.country_code == country_code)
            .cloned()
            .collect())
    }

    async fn find_cities(
        &self,
        country_code: &str,
        codes: &[String],
    ) -> Result<Vec<City>, sqlx::Error> {
        self.check()?;
        // Reverse order so callers cannot rely on store ordering.
        Ok(self
            .cities
            .iter()
            .rev()
            .filter(|c| c.country_code == country_code && codes.contains(&c.code))
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        self.check()
    }
}
