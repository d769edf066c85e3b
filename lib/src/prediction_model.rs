use crate::window::NormalizedWindow;

#[cfg(test)]
use mockall::{automock};

#[cfg_attr(test, automock)]
pub trait PredictionModel {
    /// Maps a min-max scaled window of closes to the scaled close of the next step.
    fn predict(&mut self, window : &NormalizedWindow) -> anyhow::Result<f64>;
}
