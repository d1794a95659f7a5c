//! Plot-ready aggregation of pipeline results.
//!
//! The plotting front end asks for one metric grouped by sample or by
//! compound and receives, per group, the values and their summary
//! statistics. Nothing here renders.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::pipeline::PipelineResults;

mod error;

pub use error::PlotError;

/// Result metric that can be plotted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Recovery in percent
    Recovery,
    /// Internal-standard response factor
    ResponseFactor,
    /// QC correction factor
    CorrectionFactor,
    /// Final concentration
    Concentration,
}

impl Metric {
    /// Accepted metric names
    pub const NAMES: [&'static str; 4] = [
        "recovery",
        "response_factor",
        "correction_factor",
        "concentration",
    ];

    /// Name as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Recovery => "recovery",
            Metric::ResponseFactor => "response_factor",
            Metric::CorrectionFactor => "correction_factor",
            Metric::Concentration => "concentration",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recovery" => Ok(Metric::Recovery),
            "response_factor" => Ok(Metric::ResponseFactor),
            "correction_factor" => Ok(Metric::CorrectionFactor),
            "concentration" => Ok(Metric::Concentration),
            other => Err(PlotError::UnknownMetric {
                name: other.to_string(),
            }),
        }
    }
}

/// How values are grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// One group per sample
    BySample,
    /// One group per compound
    ByCompound,
}

impl FromStr for Grouping {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "by_sample" | "sample" => Ok(Grouping::BySample),
            "by_compound" | "compound" => Ok(Grouping::ByCompound),
            other => Err(PlotError::UnknownGrouping {
                name: other.to_string(),
            }),
        }
    }
}

/// Values of one group and their summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    /// Values in key order
    pub values: Vec<f64>,
    /// Arithmetic mean
    pub mean: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Number of values
    pub count: usize,
}

impl GroupSummary {
    fn from_values(values: Vec<f64>) -> Self {
        let count = values.len();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / count as f64;
        Self {
            values,
            mean,
            min,
            max,
            count,
        }
    }
}

/// Group key → summary for one metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationView {
    /// Metric aggregated
    pub metric: Metric,
    /// Grouping used
    pub grouping: Grouping,
    /// Groups in key order
    pub groups: BTreeMap<String, GroupSummary>,
}

/// Aggregate one metric of a run.
///
/// Correction factors are per compound, so they are grouped by compound
/// whatever grouping is requested, and the view reports
/// [`Grouping::ByCompound`]. Only computed rows contribute; gaps are left out.
pub fn aggregate(
    results: &PipelineResults,
    metric: Metric,
    grouping: Grouping,
) -> Result<AggregationView, PlotError> {
    let not_computed = || PlotError::MetricNotComputed(metric);

    let points: Vec<(String, f64)> = match metric {
        Metric::CorrectionFactor => results
            .correction_factors
            .as_ref()
            .ok_or_else(not_computed)?
            .iter()
            .filter_map(|(compound, factor)| factor.value().map(|v| (compound.clone(), v)))
            .collect(),
        Metric::Recovery => keyed(
            results.recovery.as_ref().ok_or_else(not_computed)?.iter(),
            grouping,
            |r| r.percent,
        ),
        Metric::ResponseFactor => keyed(
            results.response_factors.as_ref().ok_or_else(not_computed)?.iter(),
            grouping,
            |r| r.value,
        ),
        Metric::Concentration => keyed(
            results.concentrations.as_ref().ok_or_else(not_computed)?.iter(),
            grouping,
            |c| c.value,
        ),
    };

    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (group, value) in points {
        grouped.entry(group).or_default().push(value);
    }

    Ok(AggregationView {
        metric,
        grouping: match metric {
            Metric::CorrectionFactor => Grouping::ByCompound,
            _ => grouping,
        },
        groups: grouped
            .into_iter()
            .map(|(group, values)| (group, GroupSummary::from_values(values)))
            .collect(),
    })
}

fn keyed<'a, V: 'a>(
    rows: impl Iterator<Item = (&'a crate::dataset::MeasurementKey, &'a V)>,
    grouping: Grouping,
    value: impl Fn(&V) -> f64,
) -> Vec<(String, f64)> {
    rows.map(|(key, row)| {
        let group = match grouping {
            Grouping::BySample => key.sample_id.clone(),
            Grouping::ByCompound => key.compound_name.clone(),
        };
        (group, value(row))
    })
    .collect()
}
