use chrono::{NaiveDate, Duration};
use anyhow::{anyhow, Context};
use getset::{Getters, Setters};
use tracing::{debug, info, warn};

use crate::error::PredictionError;
use crate::price_history::*;
use crate::prediction_model::*;
use crate::report::{self, ReportFormat};
use crate::window;

#[derive(Debug, Clone, Setters)]
#[getset(set = "pub")]
pub struct PredictionOptions {
    /// Calendar days of history requested before the target date.
    pub lookback_days : u32
}

impl Default for PredictionOptions {
    fn default() -> Self {
        PredictionOptions { lookback_days : 120 }
    }
}

#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct PredictionResult {
    symbol : String,
    target_date : NaiveDate,
    predicted_close : f64,
    last_observed_close : f64,
    last_observed_date : NaiveDate
}

impl PredictionResult {
    pub fn new(symbol : &str, target_date : NaiveDate, predicted_close : f64, last_observed : &PriceStep) -> PredictionResult {
        PredictionResult {
            symbol : symbol.to_uppercase(),
            target_date,
            predicted_close,
            last_observed_close : last_observed.close,
            last_observed_date : last_observed.date
        }
    }
}

pub fn predict_close(source : &mut impl HistorySource,
                     model : &mut impl PredictionModel,
                     symbol : &str,
                     target_date_str : &str,
                     options : &PredictionOptions) -> Result<PredictionResult, PredictionError> {
    let target_date = NaiveDate::parse_from_str(target_date_str.trim(), "%Y-%m-%d")
        .map_err(|source| PredictionError::InvalidDate { input : String::from(target_date_str), source })?;
    let symbol = symbol.trim().to_uppercase();

    let since_date = target_date.checked_sub_signed(Duration::days(options.lookback_days as i64))
        .ok_or_else(|| PredictionError::DateOutOfRange { input : String::from(target_date_str), lookback_days : options.lookback_days })?;
    debug!("Requesting {} history from {} until {}", symbol, since_date, target_date);
    let mut history = source.fetch_close_history(&symbol, &since_date, &target_date)
        .with_context(|| format!("Failed to fetch history for {}", symbol))
        .map_err(PredictionError::CollaboratorFailure)?;

    let fetched_steps = history.len();
    history.retain(|s| s.date < target_date);
    if history.len() < fetched_steps {
        debug!("Dropped {} steps on or after {}", fetched_steps - history.len(), target_date);
    }
    validate_history(&symbol, &history).map_err(PredictionError::CollaboratorFailure)?;

    let (input, scale_params) = window::window(&history)?;
    let scaled_prediction = model.predict(&input)
        .context("Model inference failed")
        .map_err(PredictionError::CollaboratorFailure)?;
    if !scaled_prediction.is_finite() {
        return Err(PredictionError::CollaboratorFailure(anyhow!("Model returned a non-finite prediction ({})", scaled_prediction)));
    }

    let predicted_close = window::denormalize(scaled_prediction, &scale_params);
    let last_step = &history[history.len() - 1];
    info!("Predicted {} close for {}: {:.2} (scaled {:.4}, last close {:.2} on {})",
        symbol, target_date, predicted_close, scaled_prediction, last_step.close, last_step.date);

    Ok(PredictionResult::new(&symbol, target_date, predicted_close, last_step))
}

/// Runs `predict_close` and renders the report, or the `Error: ` line as the error.
pub fn render_prediction(source : &mut impl HistorySource,
                         model : &mut impl PredictionModel,
                         symbol : &str,
                         target_date_str : &str,
                         options : &PredictionOptions,
                         format : ReportFormat) -> Result<String, String> {
    let result = predict_close(source, model, symbol, target_date_str, options).map_err(|e| {
        warn!("Prediction for {} on {} failed: {}", symbol.trim(), target_date_str.trim(), e);
        report::format_error(&e)
    })?;

    report::format_report(&result, format).map_err(|e| report::format_error(&e))
}

/// Runs `predict_close` and renders either the report or an `Error: ` line.
pub fn predict_close_report(source : &mut impl HistorySource,
                            model : &mut impl PredictionModel,
                            symbol : &str,
                            target_date_str : &str,
                            options : &PredictionOptions,
                            format : ReportFormat) -> String {
    render_prediction(source, model, symbol, target_date_str, options, format)
        .unwrap_or_else(|error_text| error_text)
}

fn validate_history(symbol : &str, history : &[PriceStep]) -> anyhow::Result<()> {
    for pair in history.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(anyhow!("History for {} is not in ascending date order ({} followed by {})",
                symbol, pair[0].date, pair[1].date));
        }
    }

    if let Some(step) = history.iter().find(|s| !s.close.is_finite() || s.close <= 0.0) {
        return Err(anyhow!("History for {} has an invalid close {} on {}", symbol, step.close, step.date));
    }

    Ok(())
}
