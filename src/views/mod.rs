//! The recomputation pipeline: four stateless view computations over one
//! filtered subset.
//!
//! Each view is a pure function of `(subset, control values)` and holds no
//! state across calls. [`recompute`] filters once and runs all four,
//! returning four independent `Result`s so a failing view never blocks the
//! other three.

use thiserror::Error;

use crate::data::filter::{self, HourRange};
use crate::data::model::{TransactionDataset, AMOUNT_COLUMN};

pub mod correlation;
pub mod distribution;
pub mod projection;
pub mod temporal;

pub use correlation::CorrelationResult;
pub use distribution::DistributionResult;
pub use projection::ProjectionResult;
pub use temporal::TemporalResult;

/// Stable identifiers for the four renderable outputs.
pub const HISTOGRAM_ID: &str = "histogram";
pub const TX_BY_HOUR_ID: &str = "tx_by_hour";
pub const PCA_SCATTER_ID: &str = "pca-scatter";
pub const CORR_HEATMAP_ID: &str = "corr-heatmap";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Recoverable failures of a single view computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("unknown feature column '{0}'")]
    UnknownFeature(String),

    #[error("not enough data: need at least {needed} {unit}, got {got}")]
    InsufficientData {
        needed: usize,
        got: usize,
        unit: &'static str,
    },
}

impl ViewError {
    pub(crate) fn too_few_records(needed: usize, got: usize) -> Self {
        ViewError::InsufficientData {
            needed,
            got,
            unit: "records",
        }
    }

    pub(crate) fn too_few_features(needed: usize, got: usize) -> Self {
        ViewError::InsufficientData {
            needed,
            got,
            unit: "feature columns",
        }
    }
}

// ---------------------------------------------------------------------------
// Control state
// ---------------------------------------------------------------------------

/// The two user-adjustable inputs driving every recomputation.
///
/// Mutated only by the UI layer; view computations read it and never
/// write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    /// Column shown in the distribution view.
    pub selected_feature: String,
    /// Inclusive hour-of-day filter applied to all views.
    pub hour_range: HourRange,
}

impl Default for ControlState {
    fn default() -> Self {
        ControlState {
            selected_feature: AMOUNT_COLUMN.to_string(),
            hour_range: HourRange::full(),
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// The four renderable results of one recomputation pass.
///
/// Consumed by the UI right away and replaced wholesale on the next
/// control change; nothing here is cached across passes.
#[derive(Debug, Clone)]
pub struct ViewOutputs {
    pub distribution: Result<DistributionResult, ViewError>,
    pub temporal: TemporalResult,
    pub projection: Result<ProjectionResult, ViewError>,
    pub correlation: Result<CorrelationResult, ViewError>,
}

/// Run one full pass: filter the dataset by the current hour range, then
/// compute all four views from the same subset.
pub fn recompute(dataset: &TransactionDataset, controls: &ControlState) -> ViewOutputs {
    let subset = filter::filter(dataset, controls.hour_range);
    log::debug!(
        "recompute: hours {}..={}, {} of {} records, feature '{}'",
        controls.hour_range.low,
        controls.hour_range.high,
        subset.len(),
        dataset.len(),
        controls.selected_feature,
    );

    ViewOutputs {
        distribution: distribution::compute(&subset, &controls.selected_feature),
        temporal: temporal::compute(&subset),
        projection: projection::compute(&subset),
        correlation: correlation::compute(&subset),
    }
}
