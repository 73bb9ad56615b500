//! Data records for sales and forecasts
//!
//! These are the owned records the session store hands out. Monetary
//! amounts are exact decimals and serialize as strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A recorded sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// Globally unique identifier assigned by the store
    pub id: i64,
    /// When the sale happened
    pub date: DateTime<Utc>,
    /// Sale amount
    pub amount: Decimal,
    /// Product category label
    pub product_category: String,
    /// Sales region label
    pub region: String,
}

/// Payload for recording a sale; the store assigns the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub product_category: String,
    pub region: String,
}

/// A forecasted month of revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Globally unique identifier assigned by the store
    pub id: i64,
    /// First day of the forecasted month
    pub forecast_date: DateTime<Utc>,
    /// Predicted revenue for that month, rounded to two decimal places
    pub predicted_amount: Decimal,
    /// Name of the model that produced the prediction
    pub model_name: String,
    /// When the store recorded the forecast
    pub created_at: DateTime<Utc>,
}

/// Payload for recording a forecast; the store assigns id and created_at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewForecast {
    pub forecast_date: DateTime<Utc>,
    pub predicted_amount: Decimal,
    pub model_name: String,
}
