//! Forecast generation against the session store

use common::error::ForecastResult;
use common::forecast::{ForecastEngine, ForecastMethod};
use common::models::Forecast;
use common::store::SessionStore;

/// Runs the forecast engine over a session's sales and stores the result
#[derive(Clone)]
pub struct ForecastService {
    store: SessionStore,
    engine: ForecastEngine,
}

impl ForecastService {
    /// Create a service working against the given store
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            engine: ForecastEngine,
        }
    }

    /// Generate forecasts for the session and replace its stored set
    ///
    /// The engine validates first; when it rejects the input, the
    /// session's existing forecasts stay exactly as they were. On
    /// success the whole collection is swapped for the new one.
    pub async fn generate(
        &self,
        session_id: &str,
        months: u32,
        method: ForecastMethod,
    ) -> ForecastResult<Vec<Forecast>> {
        let sales = self.store.get_sales(session_id).await;
        let generated = self.engine.generate(&sales, months, method)?;
        Ok(self.store.replace_forecasts(session_id, generated).await)
    }
}
