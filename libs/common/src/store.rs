//! Session-scoped in-memory storage with sliding expiry
//!
//! Each session owns a private collection of sales and forecasts, keyed
//! by an opaque session id. Touching the store in any way first sweeps
//! expired sessions, then refreshes the touched session's lifetime.
//! Sessions never persist past the process; there is no database.

use crate::clock::{Clock, SystemClock};
use crate::models::{Forecast, NewForecast, NewSale, Sale};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Default idle lifetime of a session: 24 hours
pub const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;

/// Record collections owned by one session
#[derive(Debug)]
struct SessionEntry {
    sales: Vec<Sale>,
    forecasts: Vec<Forecast>,
    expires_at: DateTime<Utc>,
}

/// Store state behind the lock: sessions plus the global id counters
#[derive(Debug)]
struct Inner {
    sessions: HashMap<String, SessionEntry>,
    next_sale_id: i64,
    next_forecast_id: i64,
}

impl Inner {
    /// Drop every session whose lifetime has run out
    fn sweep(&mut self, now: DateTime<Utc>) {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.expires_at > now);
        let evicted = before - self.sessions.len();
        if evicted > 0 {
            debug!("evicted {} expired session(s)", evicted);
        }
    }

    /// Resolve the session, creating it empty when absent, and refresh
    /// its expiry
    fn touch(&mut self, session_id: &str, now: DateTime<Utc>, ttl: Duration) -> &mut SessionEntry {
        let entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                sales: Vec::new(),
                forecasts: Vec::new(),
                expires_at: now + ttl,
            });
        entry.expires_at = now + ttl;
        entry
    }

    /// Stamp forecast payloads with fresh ids and the creation instant
    fn stamp_forecasts(&mut self, batch: Vec<NewForecast>, now: DateTime<Utc>) -> Vec<Forecast> {
        batch
            .into_iter()
            .map(|new| {
                let id = self.next_forecast_id;
                self.next_forecast_id += 1;
                Forecast {
                    id,
                    forecast_date: new.forecast_date,
                    predicted_amount: new.predicted_amount,
                    model_name: new.model_name,
                    created_at: now,
                }
            })
            .collect()
    }

    /// Stamp sale payloads with fresh ids
    fn stamp_sales(&mut self, batch: Vec<NewSale>) -> Vec<Sale> {
        batch
            .into_iter()
            .map(|new| {
                let id = self.next_sale_id;
                self.next_sale_id += 1;
                Sale {
                    id,
                    date: new.date,
                    amount: new.amount,
                    product_category: new.product_category,
                    region: new.region,
                }
            })
            .collect()
    }
}

/// Session-scoped store for sales and forecasts
///
/// Cloning is cheap; clones share the same state. Every operation takes
/// the single internal lock, so operations are linearizable and the id
/// counters never hand out the same id twice, regardless of session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<Inner>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SessionStore {
    /// Create a store with the given idle TTL, reading the system clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a store that reads time from the supplied clock
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                sessions: HashMap::new(),
                next_sale_id: 1,
                next_forecast_id: 1,
            })),
            clock,
            ttl,
        }
    }

    /// Sales recorded by the session, most recent date first
    pub async fn get_sales(&self, session_id: &str) -> Vec<Sale> {
        let now = self.clock.now();
        let mut inner = self.inner.lock().await;
        inner.sweep(now);
        let entry = inner.touch(session_id, now, self.ttl);
        let mut sales = entry.sales.clone();
        sales.sort_by(|a, b| b.date.cmp(&a.date));
        sales
    }

    /// Record one sale and hand back the stored record
    pub async fn create_sale(&self, session_id: &str, new: NewSale) -> Sale {
        let now = self.clock.now();
        let mut inner = self.inner.lock().await;
        inner.sweep(now);
        let id = inner.next_sale_id;
        inner.next_sale_id += 1;
        let entry = inner.touch(session_id, now, self.ttl);
        let sale = Sale {
            id,
            date: new.date,
            amount: new.amount,
            product_category: new.product_category,
            region: new.region,
        };
        entry.sales.push(sale.clone());
        sale
    }

    /// Replace the session's data with an imported batch
    ///
    /// Existing sales and forecasts are discarded and the batch inserted
    /// within one lock acquisition, so no reader sees a partial import.
    /// Id counters keep counting; imported records never reuse ids.
    pub async fn create_sales_bulk(&self, session_id: &str, batch: Vec<NewSale>) -> usize {
        let now = self.clock.now();
        let mut inner = self.inner.lock().await;
        inner.sweep(now);
        let sales = inner.stamp_sales(batch);
        let count = sales.len();
        let entry = inner.touch(session_id, now, self.ttl);
        entry.sales = sales;
        entry.forecasts.clear();
        count
    }

    /// Remove every sale and forecast owned by the session
    pub async fn clear_sales(&self, session_id: &str) {
        let now = self.clock.now();
        let mut inner = self.inner.lock().await;
        inner.sweep(now);
        let entry = inner.touch(session_id, now, self.ttl);
        entry.sales.clear();
        entry.forecasts.clear();
    }

    /// Forecasts held by the session, most recent forecast month first
    pub async fn get_forecasts(&self, session_id: &str) -> Vec<Forecast> {
        let now = self.clock.now();
        let mut inner = self.inner.lock().await;
        inner.sweep(now);
        let entry = inner.touch(session_id, now, self.ttl);
        let mut forecasts = entry.forecasts.clone();
        forecasts.sort_by(|a, b| b.forecast_date.cmp(&a.forecast_date));
        forecasts
    }

    /// Append forecasts and hand back the stored records in input order
    pub async fn create_forecasts(
        &self,
        session_id: &str,
        batch: Vec<NewForecast>,
    ) -> Vec<Forecast> {
        let now = self.clock.now();
        let mut inner = self.inner.lock().await;
        inner.sweep(now);
        let forecasts = inner.stamp_forecasts(batch, now);
        let entry = inner.touch(session_id, now, self.ttl);
        entry.forecasts.extend(forecasts.iter().cloned());
        forecasts
    }

    /// Remove the session's forecasts, leaving its sales alone
    pub async fn clear_forecasts(&self, session_id: &str) {
        let now = self.clock.now();
        let mut inner = self.inner.lock().await;
        inner.sweep(now);
        let entry = inner.touch(session_id, now, self.ttl);
        entry.forecasts.clear();
    }

    /// Swap the session's forecasts for a freshly generated set
    ///
    /// The old collection is dropped and the new one inserted under one
    /// lock acquisition, so no reader observes the store half-replaced.
    pub async fn replace_forecasts(
        &self,
        session_id: &str,
        batch: Vec<NewForecast>,
    ) -> Vec<Forecast> {
        let now = self.clock.now();
        let mut inner = self.inner.lock().await;
        inner.sweep(now);
        let forecasts = inner.stamp_forecasts(batch, now);
        let entry = inner.touch(session_id, now, self.ttl);
        entry.forecasts = forecasts.clone();
        forecasts
    }

    /// Number of live sessions after sweeping expired ones
    ///
    /// Unlike the record operations this does not create or refresh any
    /// session.
    pub async fn session_count(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.inner.lock().await;
        inner.sweep(now);
        inner.sessions.len()
    }
}
