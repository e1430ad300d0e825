//! 2-D principal-component projection of the anonymized feature columns.
//!
//! The projection basis is refit from scratch on the currently filtered
//! subset at every call. Point coordinates are therefore not comparable
//! across different filter states: changing the hour range changes the
//! basis itself, not just which points are shown.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use serde::Serialize;

use crate::data::filter::FilteredSubset;
use crate::data::model::Class;
use crate::views::ViewError;

/// One record projected onto the two principal components.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    pub class: Class,
}

/// The projected subset plus how much variance each component captured.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionResult {
    /// One point per input record, in subset order.
    pub points: Vec<ProjectedPoint>,
    /// Fraction of total variance captured by each kept component.
    pub explained_variance: [f64; 2],
}

/// Project the subset's `V*` feature matrix onto its top two principal
/// components.
///
/// Missing values become 0.0 so every record keeps its row (and stays
/// aligned with its class label) instead of being dropped. Fails with
/// `InsufficientData` below 2 records or 2 feature columns.
pub fn compute(subset: &FilteredSubset<'_>) -> Result<ProjectionResult, ViewError> {
    let n = subset.len();
    let d = subset.dataset().feature_names.len();

    if n < 2 {
        return Err(ViewError::too_few_records(2, n));
    }
    if d < 2 {
        return Err(ViewError::too_few_features(2, d));
    }

    let records: Vec<_> = subset.records().collect();

    // n x d feature matrix; missing cells become the neutral value.
    let mut x = DMatrix::from_fn(n, d, |row, col| {
        let v = records[row].features[col];
        if v.is_finite() {
            v
        } else {
            0.0
        }
    });

    // Center each column.
    let means = x.row_mean();
    for row in 0..n {
        for col in 0..d {
            x[(row, col)] -= means[col];
        }
    }

    let cov = (x.transpose() * &x) / (n as f64 - 1.0);
    let trace: f64 = cov.diagonal().sum();
    let eigen = SymmetricEigen::new(cov);

    // nalgebra does not order the eigenpairs; take the two largest.
    let mut order: Vec<usize> = (0..d).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));
    let first = order[0];
    let second = order[1];

    let pc1: DVector<f64> = eigen.eigenvectors.column(first).clone_owned();
    let pc2: DVector<f64> = eigen.eigenvectors.column(second).clone_owned();

    let scores_x = &x * &pc1;
    let scores_y = &x * &pc2;

    let points = records
        .iter()
        .enumerate()
        .map(|(i, rec)| ProjectedPoint {
            x: scores_x[i],
            y: scores_y[i],
            class: rec.class,
        })
        .collect();

    let ratio = |idx: usize| {
        if trace > 0.0 {
            eigen.eigenvalues[idx].max(0.0) / trace
        } else {
            0.0
        }
    };

    Ok(ProjectionResult {
        points,
        explained_variance: [ratio(first), ratio(second)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, HourRange};
    use crate::data::model::{derive_hour, TransactionDataset, TransactionRecord};

    fn dataset(rows: &[Vec<f64>], classes: &[Class]) -> TransactionDataset {
        let d = rows.first().map_or(0, Vec::len);
        let records = rows
            .iter()
            .zip(classes)
            .map(|(features, &class)| TransactionRecord {
                time: 0.0,
                features: features.clone(),
                amount: 1.0,
                class,
                hour: derive_hour(0.0),
            })
            .collect();
        let names = (1..=d).map(|i| format!("V{i}")).collect();
        TransactionDataset::new(records, names)
    }

    #[test]
    fn identical_rows_project_to_equal_points() {
        let ds = dataset(
            &[vec![3.0, -1.0], vec![3.0, -1.0]],
            &[Class::Legitimate, Class::Fraudulent],
        );
        let subset = filter(&ds, HourRange::full());

        let result = compute(&subset).unwrap();
        assert_eq!(result.points.len(), 2);
        assert!((result.points[0].x - result.points[1].x).abs() < 1e-12);
        assert!((result.points[0].y - result.points[1].y).abs() < 1e-12);
        assert_eq!(result.points[0].class, Class::Legitimate);
        assert_eq!(result.points[1].class, Class::Fraudulent);
    }

    #[test]
    fn single_record_is_insufficient() {
        let ds = dataset(&[vec![1.0, 2.0]], &[Class::Legitimate]);
        let subset = filter(&ds, HourRange::full());

        assert!(matches!(
            compute(&subset).unwrap_err(),
            ViewError::InsufficientData { got: 1, .. }
        ));
    }

    #[test]
    fn single_feature_column_is_insufficient() {
        let ds = dataset(
            &[vec![1.0], vec![2.0]],
            &[Class::Legitimate, Class::Legitimate],
        );
        let subset = filter(&ds, HourRange::full());

        assert!(matches!(
            compute(&subset).unwrap_err(),
            ViewError::InsufficientData { got: 1, .. }
        ));
    }

    #[test]
    fn first_component_captures_the_dominant_axis() {
        // V1 spreads wide, V2 barely moves.
        let ds = dataset(
            &[
                vec![-10.0, 0.1],
                vec![-5.0, -0.1],
                vec![5.0, 0.1],
                vec![10.0, -0.1],
            ],
            &[Class::Legitimate; 4],
        );
        let subset = filter(&ds, HourRange::full());

        let result = compute(&subset).unwrap();
        assert!(result.explained_variance[0] >= result.explained_variance[1]);
        assert!(result.explained_variance[0] > 0.99);

        let spread = |f: fn(&ProjectedPoint) -> f64| {
            let lo = result.points.iter().map(f).fold(f64::INFINITY, f64::min);
            let hi = result
                .points
                .iter()
                .map(f)
                .fold(f64::NEG_INFINITY, f64::max);
            hi - lo
        };
        assert!(spread(|p| p.x) > spread(|p| p.y));
    }

    #[test]
    fn missing_values_are_zero_filled_not_dropped() {
        let ds = dataset(
            &[vec![f64::NAN, 1.0], vec![2.0, -1.0], vec![4.0, 0.0]],
            &[Class::Fraudulent, Class::Legitimate, Class::Legitimate],
        );
        let subset = filter(&ds, HourRange::full());

        let result = compute(&subset).unwrap();
        assert_eq!(result.points.len(), 3);
        assert!(result
            .points
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}
