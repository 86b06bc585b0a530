use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tract_onnx::prelude::*;

use crate::models::{QualityLabel, WineSample, FEATURE_COUNT, FEATURE_NAMES};
use crate::scaler::ScalerParameters;

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

#[derive(Clone)]
pub struct WineQualityModel {
    plan: OnnxPlan,
    scaler: ScalerParameters,
}

impl WineQualityModel {
    /// Load both artifacts. The classifier's first output must be the
    /// predicted class label as i64 (export with zipmap disabled).
    pub fn load(model_path: impl AsRef<Path>, scaler_path: impl AsRef<Path>) -> Result<Self> {
        let scaler = ScalerParameters::load(scaler_path)?;

        let model_path = model_path.as_ref();
        let plan = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("reading classifier artifact {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, FEATURE_COUNT)),
            )?
            .into_optimized()?
            .into_runnable()?;

        Ok(Self { plan, scaler })
    }

    pub fn predict(&self, sample: &WineSample) -> Result<QualityLabel> {
        let scaled = self.scaler.transform(&sample.to_features());
        let input = Tensor::from_shape(&[1, FEATURE_COUNT], &scaled)?;
        let outputs = self.plan.run(tvec!(input.into()))?;

        let class: i64 = *outputs[0]
            .to_array_view::<i64>()?
            .iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("classifier returned an empty label tensor"))?;

        Self::label_for_class(class)
    }

    fn label_for_class(class: i64) -> Result<QualityLabel> {
        match class {
            1 => Ok(QualityLabel::Good),
            0 => Ok(QualityLabel::Bad),
            other => bail!("classifier produced non-binary class {}", other),
        }
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            input_shape: vec![1, FEATURE_COUNT],
            features: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            classes: vec!["bad".to_string(), "good".to_string()],
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub input_shape: Vec<usize>,
    pub features: Vec<String>,
    pub classes: Vec<String>,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_one_maps_to_good() {
        assert_eq!(
            WineQualityModel::label_for_class(1).unwrap(),
            QualityLabel::Good
        );
    }

    #[test]
    fn class_zero_maps_to_bad() {
        assert_eq!(
            WineQualityModel::label_for_class(0).unwrap(),
            QualityLabel::Bad
        );
    }

    #[test]
    fn non_binary_class_is_an_error() {
        assert!(WineQualityModel::label_for_class(2).is_err());
        assert!(WineQualityModel::label_for_class(-1).is_err());
    }

    #[test]
    fn missing_artifacts_fail_the_load() {
        assert!(WineQualityModel::load("no/such/model.onnx", "no/such/scaler.json").is_err());
    }
}
