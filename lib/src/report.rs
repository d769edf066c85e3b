use chrono::NaiveDate;
use serde::Serialize;
use strum::EnumString;

use crate::commands::predict_close::PredictionResult;

#[derive(Debug, PartialEq, Clone, Copy, EnumString)]
pub enum ReportFormat {
    #[strum(serialize = "text")]
    Text,
    #[strum(serialize = "json")]
    Json
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    symbol : &'a str,
    target_date : NaiveDate,
    predicted_close : f64,
    last_observed_close : f64,
    last_observed_date : NaiveDate
}

fn round_to_cents(price : f64) -> f64 {
    (price * 100.0).round() / 100.0
}

pub fn format_report(result : &PredictionResult, format : ReportFormat) -> anyhow::Result<String> {
    match format {
        ReportFormat::Text => Ok(format!(
            "Stock Prediction Results for {}\n\
             Prediction Date: {}\n\
             Predicted Closing Price: ${:.2}\n\
             Last Observed Close: ${:.2} ({})",
            result.symbol(),
            result.target_date().format("%Y-%m-%d"),
            result.predicted_close(),
            result.last_observed_close(),
            result.last_observed_date().format("%Y-%m-%d"))),
        ReportFormat::Json => {
            let report = JsonReport {
                symbol : result.symbol(),
                target_date : *result.target_date(),
                predicted_close : round_to_cents(*result.predicted_close()),
                last_observed_close : round_to_cents(*result.last_observed_close()),
                last_observed_date : *result.last_observed_date()
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

pub fn format_error(error : &impl std::fmt::Display) -> String {
    format!("Error: {}. Please check the stock symbol and date format.", error)
}
