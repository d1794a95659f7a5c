use serde::{Deserialize, Serialize};

use crate::schema::columns;

/// How replicate measurements are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicateAverage {
    /// Arithmetic mean
    #[default]
    Mean,
    /// Median (mean of the two middle values for an even count)
    Median,
}

impl ReplicateAverage {
    /// Combine finite values; `None` when there is nothing to combine
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        match self {
            ReplicateAverage::Mean => Some(finite.iter().sum::<f64>() / finite.len() as f64),
            ReplicateAverage::Median => {
                finite.sort_by(f64::total_cmp);
                let mid = finite.len() / 2;
                if finite.len() % 2 == 0 {
                    Some((finite[mid - 1] + finite[mid]) / 2.0)
                } else {
                    Some(finite[mid])
                }
            }
        }
    }
}

/// Numeric policy shared by the calculators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationPolicy {
    /// Correction factor applied to compounds without a QC reference
    pub default_correction_factor: f64,

    /// How QC replicates, blanks and recoveries are averaged
    pub replicate_average: ReplicateAverage,

    /// Subtract the averaged blank level before QC and concentration calculations
    pub blank_subtraction: bool,

    /// Sample property the concentration is normalized by (e.g. `volume`, `mass`)
    pub normalization_property: String,
}

impl Default for CalculationPolicy {
    fn default() -> Self {
        Self {
            default_correction_factor: 1.0,
            replicate_average: ReplicateAverage::Mean,
            blank_subtraction: true,
            normalization_property: columns::VOLUME.to_string(),
        }
    }
}
