use thiserror::Error;

use super::Metric;

/// Errors building an aggregation view
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlotError {
    /// Metric name outside the supported set
    #[error("Unknown metric '{name}', expected one of: {}", Metric::NAMES.join(", "))]
    UnknownMetric {
        /// Name that was requested
        name: String,
    },

    /// Grouping name outside the supported set
    #[error("Unknown grouping '{name}', expected one of: by_sample, by_compound")]
    UnknownGrouping {
        /// Name that was requested
        name: String,
    },

    /// The strategy of the run did not compute the metric
    #[error("Metric '{0}' was not computed by this run")]
    MetricNotComputed(Metric),
}
