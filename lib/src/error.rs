use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Invalid date '{input}', expected the YYYY-MM-DD format")]
    InvalidDate { input : String, source : chrono::ParseError },

    #[error("Cannot request {lookback_days} days of history before '{input}', the date is out of range")]
    DateOutOfRange { input : String, lookback_days : u32 },

    #[error("Not enough historical data, need at least {required} trading days but only {available} are available")]
    InsufficientHistory { available : usize, required : usize },

    #[error("Closing price stayed at {close} for the last {window} trading days, the series cannot be scaled")]
    DegenerateSeries { close : f64, window : usize },

    #[error("{0:#}")]
    CollaboratorFailure(anyhow::Error),
}

