//! Forecast models over monthly sales totals
//!
//! Sales are bucketed by calendar month and the selected model projects
//! revenue for the months after the most recent one with data. The
//! engine is pure; persisting the results is the caller's business.

use crate::error::{ForecastError, ForecastResult};
use crate::models::{NewForecast, Sale};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::collections::BTreeMap;

/// Minimum number of sales required before any model can run
pub const MIN_SALES_FOR_FORECAST: usize = 2;

/// Forecast model selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastMethod {
    Regression,
    MovingAverage,
    SeasonalNaive,
}

impl ForecastMethod {
    /// Resolve a caller-supplied method string
    ///
    /// Unrecognized values fall back to the seasonal naive model rather
    /// than being rejected.
    pub fn parse(method: &str) -> Self {
        match method {
            "regression" => Self::Regression,
            "moving_average" => Self::MovingAverage,
            _ => Self::SeasonalNaive,
        }
    }

    /// Label recorded on every forecast the model produces
    pub fn model_name(&self) -> &'static str {
        match self {
            Self::Regression => "Linear Regression",
            Self::MovingAverage => "3-Month Moving Average",
            Self::SeasonalNaive => "Seasonal Naive",
        }
    }
}

/// Projects monthly revenue with one of the selectable models
///
/// The engine is deterministic and side-effect free: callers pass in the
/// sales to analyze and get forecast payloads back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastEngine;

impl ForecastEngine {
    /// Project revenue for the `months` calendar months following the
    /// most recent month with sales
    ///
    /// Returns one record per horizon month, in chronological order.
    pub fn generate(
        &self,
        sales: &[Sale],
        months: u32,
        method: ForecastMethod,
    ) -> ForecastResult<Vec<NewForecast>> {
        if months == 0 {
            return Err(ForecastError::InvalidHorizon);
        }
        if sales.len() < MIN_SALES_FOR_FORECAST {
            return Err(ForecastError::InsufficientHistory {
                required: MIN_SALES_FOR_FORECAST,
                actual: sales.len(),
            });
        }

        let totals = monthly_totals(sales);
        let Some((&(last_year, last_month), _)) = totals.iter().next_back() else {
            return Err(ForecastError::InsufficientHistory {
                required: MIN_SALES_FOR_FORECAST,
                actual: 0,
            });
        };

        let label = method.model_name();
        let mut forecasts = Vec::with_capacity(months as usize);
        match method {
            ForecastMethod::Regression => {
                let series: Vec<f64> = totals
                    .values()
                    .map(|total| total.to_f64().unwrap_or(0.0))
                    .collect();
                let (slope, intercept) = fit_line(&series);
                let last_x = series.len() as f64 - 1.0;
                for step in 1..=months {
                    let predicted = (slope * (last_x + f64::from(step)) + intercept).max(0.0);
                    let amount = Decimal::from_f64(predicted).unwrap_or(Decimal::MAX);
                    forecasts.push(NewForecast {
                        forecast_date: month_ahead(last_year, last_month, step)
                            .ok_or(ForecastError::DateOutOfRange)?,
                        predicted_amount: to_money(amount),
                        model_name: label.to_string(),
                    });
                }
            }
            // Both remaining models predict the flat mean of all monthly
            // totals; they differ only in the label they record.
            ForecastMethod::MovingAverage | ForecastMethod::SeasonalNaive => {
                let total: Decimal = totals.values().copied().sum();
                let mean = to_money(total / Decimal::from(totals.len() as u64));
                for step in 1..=months {
                    forecasts.push(NewForecast {
                        forecast_date: month_ahead(last_year, last_month, step)
                            .ok_or(ForecastError::DateOutOfRange)?,
                        predicted_amount: mean,
                        model_name: label.to_string(),
                    });
                }
            }
        }

        Ok(forecasts)
    }
}

/// Sum sale amounts by (year, month), chronologically keyed
fn monthly_totals(sales: &[Sale]) -> BTreeMap<(i32, u32), Decimal> {
    let mut totals = BTreeMap::new();
    for sale in sales {
        let key = (sale.date.year(), sale.date.month());
        let total = totals.entry(key).or_insert(Decimal::ZERO);
        *total += sale.amount;
    }
    totals
}

/// Ordinary least squares over y indexed at x = 0, 1, 2, ...
///
/// A degenerate series (single point) has denominator zero; the fit is
/// then a flat line through the mean.
fn fit_line(series: &[f64]) -> (f64, f64) {
    let n = series.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    for (i, &y) in series.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        (0.0, sum_y / n)
    } else {
        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;
        (slope, intercept)
    }
}

/// First day of the month `step` months after (year, month)
fn month_ahead(year: i32, month: u32, step: u32) -> Option<DateTime<Utc>> {
    let months0 = u64::from(month) + u64::from(step) - 1;
    let year = i32::try_from(i64::from(year) + (months0 / 12) as i64).ok()?;
    let month = (months0 % 12) as u32 + 1;
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}

/// Round to two decimal places and keep the two-digit scale
fn to_money(value: Decimal) -> Decimal {
    let mut money = value.round_dp(2);
    money.rescale(2);
    money
}
