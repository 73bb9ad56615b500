//! Application state shared across handlers

use common::store::SessionStore;

use crate::ai_map::AiMapper;
use crate::service::ForecastService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub forecast_service: ForecastService,
    pub ai: AiMapper,
}
