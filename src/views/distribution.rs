//! Per-class frequency distribution of one analysis column.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::FilteredSubset;
use crate::data::model::Class;
use crate::views::ViewError;

/// Fixed number of bins, matching the histogram rendering.
pub const BIN_COUNT: usize = 50;

/// Binned per-class counts of one feature column.
///
/// Counts are raw (no per-class normalization), so the class imbalance
/// of the dataset stays visible in the chart.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionResult {
    /// Column the distribution was computed over.
    pub feature: String,
    /// Left edge of the first bin.
    pub bin_start: f64,
    /// Width of each bin.
    pub bin_width: f64,
    /// Per-class bin counts, each `BIN_COUNT` long.
    pub counts: BTreeMap<Class, Vec<u64>>,
}

impl DistributionResult {
    /// Center of bin `i`, for bar placement.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.bin_start + (i as f64 + 0.5) * self.bin_width
    }

    /// Sum of all counts across bins and classes.
    pub fn total_count(&self) -> u64 {
        self.counts.values().flatten().sum()
    }
}

/// Bin the values of `feature` in the subset, split by class.
///
/// Missing (`NaN`) values are excluded from binning, not imputed. An
/// empty subset produces all-zero counts rather than an error.
pub fn compute(subset: &FilteredSubset<'_>, feature: &str) -> Result<DistributionResult, ViewError> {
    let dataset = subset.dataset();
    if !dataset.is_analysis_column(feature) {
        return Err(ViewError::UnknownFeature(feature.to_string()));
    }

    // (value, class) pairs with missing cells dropped.
    let values: Vec<(f64, Class)> = subset
        .records()
        .filter_map(|rec| {
            let v = dataset.value(rec, feature)?;
            v.is_finite().then_some((v, rec.class))
        })
        .collect();

    let mut counts: BTreeMap<Class, Vec<u64>> = Class::ALL
        .iter()
        .map(|&c| (c, vec![0u64; BIN_COUNT]))
        .collect();

    let min = values.iter().map(|(v, _)| *v).fold(f64::INFINITY, f64::min);
    let max = values
        .iter()
        .map(|(v, _)| *v)
        .fold(f64::NEG_INFINITY, f64::max);

    if values.is_empty() {
        return Ok(DistributionResult {
            feature: feature.to_string(),
            bin_start: 0.0,
            bin_width: 1.0,
            counts,
        });
    }

    // All values identical: everything lands in the first bin, unit width
    // so the bar still renders.
    let range = max - min;
    let bin_width = if range > 0.0 {
        range / BIN_COUNT as f64
    } else {
        1.0
    };

    for (v, class) in values {
        let idx = if range > 0.0 {
            (((v - min) / bin_width).floor() as usize).min(BIN_COUNT - 1)
        } else {
            0
        };
        if let Some(bins) = counts.get_mut(&class) {
            bins[idx] += 1;
        }
    }

    Ok(DistributionResult {
        feature: feature.to_string(),
        bin_start: min,
        bin_width,
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, HourRange};
    use crate::data::model::{derive_hour, TransactionDataset, TransactionRecord};

    fn dataset(values: &[(f64, Class)]) -> TransactionDataset {
        let records = values
            .iter()
            .map(|&(v, class)| TransactionRecord {
                time: 0.0,
                features: vec![v],
                amount: v * 2.0,
                class,
                hour: derive_hour(0.0),
            })
            .collect();
        TransactionDataset::new(records, vec!["V1".to_string()])
    }

    #[test]
    fn counts_sum_to_non_missing_values() {
        let ds = dataset(&[
            (1.0, Class::Legitimate),
            (2.0, Class::Legitimate),
            (f64::NAN, Class::Legitimate),
            (3.0, Class::Fraudulent),
        ]);
        let subset = filter(&ds, HourRange::full());

        let result = compute(&subset, "V1").unwrap();
        assert_eq!(result.total_count(), 3);

        let legit: u64 = result.counts[&Class::Legitimate].iter().sum();
        let fraud: u64 = result.counts[&Class::Fraudulent].iter().sum();
        assert_eq!(legit, 2);
        assert_eq!(fraud, 1);
    }

    #[test]
    fn extremes_fall_into_first_and_last_bin() {
        let ds = dataset(&[(0.0, Class::Legitimate), (100.0, Class::Legitimate)]);
        let subset = filter(&ds, HourRange::full());

        let result = compute(&subset, "V1").unwrap();
        let bins = &result.counts[&Class::Legitimate];
        assert_eq!(bins[0], 1);
        assert_eq!(bins[BIN_COUNT - 1], 1);
        assert!((result.bin_width - 2.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_feature_is_rejected() {
        let ds = dataset(&[(1.0, Class::Legitimate)]);
        let subset = filter(&ds, HourRange::full());

        assert_eq!(
            compute(&subset, "Time").unwrap_err(),
            ViewError::UnknownFeature("Time".to_string())
        );
        assert_eq!(
            compute(&subset, "Class").unwrap_err(),
            ViewError::UnknownFeature("Class".to_string())
        );
    }

    #[test]
    fn empty_subset_gives_zero_counts_without_error() {
        let ds = dataset(&[(1.0, Class::Legitimate)]);
        let subset = filter(&ds, HourRange::new(5, 6));

        let result = compute(&subset, "V1").unwrap();
        assert_eq!(result.total_count(), 0);
        assert_eq!(result.counts[&Class::Legitimate].len(), BIN_COUNT);
    }

    #[test]
    fn identical_values_collapse_into_one_bin() {
        let ds = dataset(&[
            (5.0, Class::Legitimate),
            (5.0, Class::Legitimate),
            (5.0, Class::Fraudulent),
        ]);
        let subset = filter(&ds, HourRange::full());

        let result = compute(&subset, "V1").unwrap();
        assert_eq!(result.counts[&Class::Legitimate][0], 2);
        assert_eq!(result.counts[&Class::Fraudulent][0], 1);
        assert_eq!(result.bin_width, 1.0);
    }

    #[test]
    fn amount_and_hour_are_selectable() {
        let ds = dataset(&[(1.0, Class::Legitimate)]);
        let subset = filter(&ds, HourRange::full());

        assert!(compute(&subset, "Amount").is_ok());
        assert!(compute(&subset, "Hour").is_ok());
    }
}
