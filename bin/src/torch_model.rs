use std::path::Path;
use anyhow::{anyhow, Context};
use tracing::info;
use predictor_lib::{NormalizedWindow, WINDOW_SIZE};

/// A TorchScript export of the trained close price network. It takes a
/// `[batch, WINDOW_SIZE, 1]` float tensor and returns one scaled close per batch entry.
pub struct TorchModel {
    module : tch::CModule
}

impl TorchModel {
    pub fn load(path : &Path) -> anyhow::Result<TorchModel> {
        let module = tch::CModule::load(path)
            .with_context(|| format!("Failed to load TorchScript model from '{}'", path.display()))?;

        info!("Loaded model from {}", path.display());
        Ok(TorchModel { module })
    }

    fn window_to_tensor(window : &NormalizedWindow) -> anyhow::Result<tch::Tensor> {
        if window.len() != WINDOW_SIZE {
            return Err(anyhow!("Model expects {} input steps but got {}", WINDOW_SIZE, window.len()));
        }

        let input = window.values().iter().map(|v| *v as f32).collect::<Vec<f32>>();
        Ok(tch::Tensor::
            of_slice(&input).
            reshape(&[1, WINDOW_SIZE as i64, 1]))
    }
}

impl predictor_lib::PredictionModel for TorchModel {
    fn predict(&mut self, window : &NormalizedWindow) -> anyhow::Result<f64> {
        let input_tensor = TorchModel::window_to_tensor(window)?;
        let output_tensor = tch::no_grad(|| self.module.forward_ts(&[input_tensor]))?;

        let output_values : Vec<f64> = From::from(output_tensor.to_kind(tch::Kind::Double).reshape(&[-1]));
        match output_values.as_slice() {
            [value] => Ok(*value),
            _ => Err(anyhow!("Model returned {} values instead of a single close", output_values.len()))
        }
    }
}
