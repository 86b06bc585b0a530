use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::models::FEATURE_COUNT;

/// Standardization statistics fit at training time, exported as
/// `{"mean": [...], "scale": [...]}` with one entry per feature.
#[derive(Debug, Clone, Deserialize)]
pub struct ScalerParameters {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl ScalerParameters {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("opening scaler artifact {}", path.display()))?;
        let params: ScalerParameters = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing scaler artifact {}", path.display()))?;
        params.check()?;
        Ok(params)
    }

    fn check(&self) -> Result<()> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            bail!(
                "scaler artifact must carry {} mean and scale entries (got {} and {})",
                FEATURE_COUNT,
                self.mean.len(),
                self.scale.len()
            );
        }
        for (i, (mean, scale)) in self.mean.iter().zip(&self.scale).enumerate() {
            if !mean.is_finite() || !scale.is_finite() {
                bail!("scaler entry {} is not finite", i);
            }
            if *scale == 0.0 {
                bail!("scaler entry {} has zero scale", i);
            }
        }
        Ok(())
    }

    /// Standardize a feature vector and narrow it to the classifier's
    /// input type.
    pub fn transform(&self, features: &[f64; FEATURE_COUNT]) -> [f32; FEATURE_COUNT] {
        let mut scaled = [0.0f32; FEATURE_COUNT];
        for (i, value) in features.iter().enumerate() {
            scaled[i] = ((value - self.mean[i]) / self.scale[i]) as f32;
        }
        scaled
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn params(mean: f64, scale: f64) -> ScalerParameters {
        ScalerParameters {
            mean: vec![mean; FEATURE_COUNT],
            scale: vec![scale; FEATURE_COUNT],
        }
    }

    #[test]
    fn transform_applies_standardization() {
        let scaler = params(1.0, 2.0);
        let scaled = scaler.transform(&[3.0; FEATURE_COUNT]);
        assert_eq!(scaled, [1.0f32; FEATURE_COUNT]);
    }

    #[test]
    fn identity_parameters_pass_values_through() {
        let scaler = params(0.0, 1.0);
        let features = [7.4, 0.7, 0.0, 1.9, 0.076, 11.0, 34.0, 0.9978, 3.51, 0.56, 9.4];
        let scaled = scaler.transform(&features);
        for (raw, out) in features.iter().zip(scaled.iter()) {
            assert_eq!(*out, *raw as f32);
        }
    }

    #[test]
    fn transform_is_deterministic() {
        let scaler = params(0.5, 0.25);
        let features = [1.0; FEATURE_COUNT];
        assert_eq!(scaler.transform(&features), scaler.transform(&features));
    }

    #[test]
    fn load_reads_json_artifact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let artifact = serde_json::json!({
            "mean": vec![2.0; FEATURE_COUNT],
            "scale": vec![4.0; FEATURE_COUNT],
        });
        write!(file, "{}", artifact).unwrap();

        let scaler = ScalerParameters::load(file.path()).unwrap();
        let scaled = scaler.transform(&[10.0; FEATURE_COUNT]);
        assert_eq!(scaled, [2.0f32; FEATURE_COUNT]);
    }

    #[test]
    fn load_rejects_wrong_length() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let artifact = serde_json::json!({
            "mean": vec![2.0; FEATURE_COUNT - 1],
            "scale": vec![4.0; FEATURE_COUNT],
        });
        write!(file, "{}", artifact).unwrap();

        assert!(ScalerParameters::load(file.path()).is_err());
    }

    #[test]
    fn load_rejects_missing_file() {
        assert!(ScalerParameters::load("no/such/scaler.json").is_err());
    }

    #[test]
    fn zero_scale_is_rejected() {
        let mut scaler = params(0.0, 1.0);
        scaler.scale[3] = 0.0;
        assert!(scaler.check().is_err());
    }

    #[test]
    fn non_finite_entries_are_rejected() {
        let mut scaler = params(0.0, 1.0);
        scaler.mean[0] = f64::INFINITY;
        assert!(scaler.check().is_err());
    }
}
