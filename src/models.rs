use serde::{Deserialize, Serialize};

pub const FEATURE_COUNT: usize = 11;

/// Feature names in the order the classifier was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "fixed acidity",
    "volatile acidity",
    "citric acid",
    "residual sugar",
    "chlorides",
    "free sulfur dioxide",
    "total sulfur dioxide",
    "density",
    "pH",
    "sulphates",
    "alcohol",
];

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WineSample {
    pub fixed_acidity: f64,
    pub volatile_acidity: f64,
    pub citric_acid: f64,
    pub residual_sugar: f64,
    pub chlorides: f64,
    pub free_sulfur_dioxide: f64,
    pub total_sulfur_dioxide: f64,
    pub density: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub sulphates: f64,
    pub alcohol: f64,
}

impl WineSample {
    /// Range checks for Vinho Verde measurements. NaN never satisfies a
    /// range, so non-finite values are rejected here as well.
    pub fn validate(&self) -> Result<(), String> {
        let checks = [
            ("fixed acidity", self.fixed_acidity, 0.0, 16.0),
            ("volatile acidity", self.volatile_acidity, 0.0, 1.58),
            ("citric acid", self.citric_acid, 0.0, 1.0),
            ("residual sugar", self.residual_sugar, 0.9, 15.5),
            ("chlorides", self.chlorides, 0.0, 0.7),
            ("free sulfur dioxide", self.free_sulfur_dioxide, 0.0, 72.0),
            ("total sulfur dioxide", self.total_sulfur_dioxide, 6.0, 289.0),
            ("density", self.density, 0.98, 1.1),
            ("pH", self.ph, 2.5, 4.5),
            ("sulphates", self.sulphates, 0.0, 2.0),
            ("alcohol", self.alcohol, 8.0, 15.0),
        ];

        for (name, value, min, max) in checks {
            if !(min..=max).contains(&value) {
                return Err(format!(
                    "{} must be between {} and {} (got {})",
                    name, min, max, value
                ));
            }
        }

        Ok(())
    }

    /// Single-row feature vector, in the same order as [`FEATURE_NAMES`].
    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.fixed_acidity,
            self.volatile_acidity,
            self.citric_acid,
            self.residual_sugar,
            self.chlorides,
            self.free_sulfur_dioxide,
            self.total_sulfur_dioxide,
            self.density,
            self.ph,
            self.sulphates,
            self.alcohol,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLabel {
    Good,
    Bad,
}

#[derive(Debug, Serialize)]
pub struct QualityResponse {
    pub wine_quality: QualityLabel,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}
