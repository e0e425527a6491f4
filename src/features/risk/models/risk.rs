use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Three-tier flood risk status shared by every risk model.
///
/// Ordered by severity so the maximum over several statuses is the most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskStatus {
    Rendah,
    Menengah,
    Tinggi,
}

impl RiskStatus {
    /// Lower bound (inclusive) of the MENENGAH bucket
    pub const MENENGAH_THRESHOLD: f64 = 0.4;
    /// Lower bound (inclusive) of the TINGGI bucket
    pub const TINGGI_THRESHOLD: f64 = 0.7;

    /// Classify a risk level. The level is clamped to [0,1] first.
    pub fn from_level(level: f64) -> Self {
        let level = clamp_risk(level);
        if level >= Self::TINGGI_THRESHOLD {
            RiskStatus::Tinggi
        } else if level >= Self::MENENGAH_THRESHOLD {
            RiskStatus::Menengah
        } else {
            RiskStatus::Rendah
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskStatus::Rendah => "RENDAH",
            RiskStatus::Menengah => "MENENGAH",
            RiskStatus::Tinggi => "TINGGI",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RiskStatus::Rendah => "Aman, tetap waspada",
            RiskStatus::Menengah => "Siaga, pantau perkembangan",
            RiskStatus::Tinggi => "Waspada, potensi banjir tinggi",
        }
    }

    /// Actions shown to residents for this status
    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            RiskStatus::Rendah => &[
                "Pantau perkembangan cuaca dan informasi dari pihak berwenang",
                "Pastikan saluran air di sekitar rumah lancar",
                "Siapkan dokumen penting di tempat aman",
            ],
            RiskStatus::Menengah => &[
                "Hindari daerah rendah dan tepi sungai",
                "Siapkan tas darurat berisi dokumen penting, obat-obatan, dan kebutuhan dasar",
                "Pantau informasi terkini secara berkala",
                "Pastikan kendaraan dalam kondisi siap",
            ],
            RiskStatus::Tinggi => &[
                "Evakuasi ke tempat yang lebih tinggi",
                "Matikan listrik dan gas di rumah",
                "Jangan berjalan di arus banjir",
                "Ikuti instruksi dari petugas berwenang",
            ],
        }
    }
}

impl std::fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Clamp a raw model output into [0,1]. NaN maps to 0.
pub fn clamp_risk(level: f64) -> f64 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid environmental reading: {}", .fields.join("; "))]
pub struct RiskInputError {
    pub fields: Vec<String>,
}

/// Validated environmental readings fed to a risk model.
///
/// Construct through [`RiskInput::new`]; models assume its invariants:
/// every value is finite, rainfall and water level are non-negative,
/// humidity is within 0..=100 and `temp_min <= temp_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RiskInput {
    pub rainfall_mm: f64,
    pub water_level: f64,
    pub humidity_pct: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

impl RiskInput {
    pub fn new(
        rainfall_mm: f64,
        water_level: f64,
        humidity_pct: f64,
        temp_min: f64,
        temp_max: f64,
    ) -> Result<Self, RiskInputError> {
        let mut fields = Vec::new();

        let checks = [
            ("rainfall_mm", rainfall_mm),
            ("water_level", water_level),
            ("humidity", humidity_pct),
            ("temp_min", temp_min),
            ("temp_max", temp_max),
        ];
        for (name, value) in checks {
            if !value.is_finite() {
                fields.push(format!("{} must be a finite number", name));
            }
        }

        if rainfall_mm < 0.0 {
            fields.push("rainfall_mm must not be negative".to_string());
        }
        if water_level < 0.0 {
            fields.push("water_level must not be negative".to_string());
        }
        if !(0.0..=100.0).contains(&humidity_pct) && humidity_pct.is_finite() {
            fields.push("humidity must be between 0 and 100".to_string());
        }

        if !fields.is_empty() {
            return Err(RiskInputError { fields });
        }

        // A reversed temperature range is corrected rather than rejected
        let (temp_min, temp_max) = if temp_max < temp_min {
            (temp_max, temp_min)
        } else {
            (temp_min, temp_max)
        };

        Ok(Self {
            rainfall_mm,
            water_level,
            humidity_pct,
            temp_min,
            temp_max,
        })
    }

    pub fn temp_avg(&self) -> f64 {
        (self.temp_min + self.temp_max) / 2.0
    }

    /// Inputs in network feature order
    pub fn features(&self) -> [f64; 5] {
        [
            self.rainfall_mm,
            self.water_level,
            self.humidity_pct,
            self.temp_min,
            self.temp_max,
        ]
    }
}

/// Output of a single model evaluation
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RiskEstimate {
    pub risk_level: f64,
    pub status: RiskStatus,
    pub message: String,
    pub detail: Option<String>,
}

/// One (location, model, timestamp) evaluation. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RiskAssessment {
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<FixedOffset>,
    pub location: String,
    pub rainfall_mm: f64,
    pub water_level: f64,
    pub humidity_pct: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub risk_level: f64,
    pub status: RiskStatus,
    pub message: String,
    pub detail: Option<String>,
    pub model_name: String,
}

impl RiskAssessment {
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        location: &str,
        input: &RiskInput,
        estimate: RiskEstimate,
        model_name: &str,
    ) -> Self {
        Self {
            timestamp,
            location: location.to_string(),
            rainfall_mm: input.rainfall_mm,
            water_level: input.water_level,
            humidity_pct: input.humidity_pct,
            temp_min: input.temp_min,
            temp_max: input.temp_max,
            risk_level: estimate.risk_level,
            status: estimate.status,
            message: estimate.message,
            detail: estimate.detail,
            model_name: model_name.to_string(),
        }
    }
}
