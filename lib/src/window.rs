use crate::error::PredictionError;
use crate::price_history::PriceStep;

/// Number of trailing daily closes the model consumes.
pub const WINDOW_SIZE : usize = 60;

/// Closes scaled to [0, 1], oldest first.
#[derive(Debug, PartialEq, Clone)]
pub struct NormalizedWindow(Vec<f64>);

impl NormalizedWindow {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Min and max of the closes a window was scaled with. Only valid for
/// predictions made on that same window.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ScaleParameters {
    pub min : f64,
    pub max : f64
}

fn find_close_price_range(steps : &[PriceStep]) -> (f64, f64) {
    let mut min_close = f64::INFINITY;
    let mut max_close = f64::NEG_INFINITY;
    for s in steps {
        min_close = min_close.min(s.close);
        max_close = max_close.max(s.close);
    }

    (min_close, max_close)
}

/// Scales the trailing `WINDOW_SIZE` closes of `series` with their own min and max.
pub fn window(series : &[PriceStep]) -> Result<(NormalizedWindow, ScaleParameters), PredictionError> {
    if series.len() < WINDOW_SIZE {
        return Err(PredictionError::InsufficientHistory { available : series.len(), required : WINDOW_SIZE });
    }

    let input_steps = &series[series.len() - WINDOW_SIZE..];
    let (min, max) = find_close_price_range(input_steps);
    if !(max > min) {
        return Err(PredictionError::DegenerateSeries { close : min, window : WINDOW_SIZE });
    }

    let normalize = |v : f64| (v - min) / (max - min);
    let values = input_steps.iter().map(|s| normalize(s.close)).collect();

    Ok((NormalizedWindow(values), ScaleParameters { min, max }))
}

pub fn denormalize(scaled_value : f64, params : &ScaleParameters) -> f64 {
    scaled_value * (params.max - params.min) + params.min
}
