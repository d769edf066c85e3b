mod error;
mod price_history;
mod prediction_model;
mod report;
mod window;
pub mod commands;

pub use error::PredictionError;
pub use price_history::*;
pub use prediction_model::*;
pub use report::{ReportFormat, format_report, format_error};
pub use window::{NormalizedWindow, ScaleParameters, WINDOW_SIZE, window, denormalize};
pub use commands::predict_close::{PredictionOptions, PredictionResult, predict_close, predict_close_report, render_prediction};
