use std::sync::Arc;

use mapa_db::stores::{ReferenceStore, SessionStore, TripStore, UserStore};
use mapa_genai::ItineraryGenerator;
use mapa_mail::EmailDelivery;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc`. Stores and the
/// generator are trait objects so tests can substitute fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub trips: Arc<dyn TripStore>,
    pub reference: Arc<dyn ReferenceStore>,
    pub generator: Arc<dyn ItineraryGenerator>,
    /// `None` when SMTP is not configured; emails are then skipped.
    pub mailer: Option<Arc<EmailDelivery>>,
}
