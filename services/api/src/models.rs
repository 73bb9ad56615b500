//! Request and response bodies for the HTTP API
//!
//! Wire field names are camelCase, matching the JSON the dashboard
//! exchanges; the core records stay snake_case. Amounts cross the wire
//! as decimal strings.

use chrono::{DateTime, Utc};
use common::models::{Forecast, NewSale, Sale};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sale as it appears on the wire
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub product_category: String,
    pub region: String,
}

impl From<Sale> for SaleResponse {
    fn from(sale: Sale) -> Self {
        SaleResponse {
            id: sale.id,
            date: sale.date,
            amount: sale.amount,
            product_category: sale.product_category,
            region: sale.region,
        }
    }
}

/// Payload for recording a sale
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub product_category: String,
    pub region: String,
}

impl From<CreateSaleRequest> for NewSale {
    fn from(req: CreateSaleRequest) -> Self {
        NewSale {
            date: req.date,
            amount: req.amount,
            product_category: req.product_category,
            region: req.region,
        }
    }
}

/// Forecast as it appears on the wire
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub id: i64,
    pub forecast_date: DateTime<Utc>,
    pub predicted_amount: Decimal,
    pub model_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Forecast> for ForecastResponse {
    fn from(forecast: Forecast) -> Self {
        ForecastResponse {
            id: forecast.id,
            forecast_date: forecast.forecast_date,
            predicted_amount: forecast.predicted_amount,
            model_name: forecast.model_name,
            created_at: forecast.created_at,
        }
    }
}

/// Parameters for generating forecasts
#[derive(Deserialize)]
pub struct GenerateForecastRequest {
    pub months: u32,
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "regression".to_string()
}

/// Headers and sample rows from a CSV the client wants mapped
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMapRequest {
    pub headers: Vec<String>,
    pub sample_rows: Vec<Vec<String>>,
}
