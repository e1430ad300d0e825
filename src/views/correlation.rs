//! Pairwise Pearson correlation over the analysis columns.

use serde::Serialize;

use crate::data::filter::FilteredSubset;
use crate::views::ViewError;

/// Symmetric correlation matrix keyed by analysis column order.
///
/// Diagonal entries are exactly 1.0; every entry lies in [-1, 1]. A pair
/// with undefined correlation (zero variance, or fewer than two rows
/// where both cells are present) reports 0.0 so a fixed-scale rendering
/// never sees a hole.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationResult {
    /// Column names, in matrix order.
    pub columns: Vec<String>,
    /// Row-major square matrix, `columns.len()` per side.
    pub matrix: Vec<Vec<f64>>,
}

impl CorrelationResult {
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.matrix[row][col]
    }
}

/// Correlate every analysis column pair over the subset, pairwise-complete
/// on non-missing values. Fails with `InsufficientData` below 2 records.
pub fn compute(subset: &FilteredSubset<'_>) -> Result<CorrelationResult, ViewError> {
    let n = subset.len();
    if n < 2 {
        return Err(ViewError::too_few_records(2, n));
    }

    let dataset = subset.dataset();
    let columns = dataset.analysis_columns();

    // Materialize each column once; NaN marks a missing cell.
    let series: Vec<Vec<f64>> = columns
        .iter()
        .map(|col| {
            subset
                .records()
                .map(|rec| dataset.value(rec, col).unwrap_or(f64::NAN))
                .collect()
        })
        .collect();

    let k = columns.len();
    let mut matrix = vec![vec![0.0; k]; k];

    for i in 0..k {
        matrix[i][i] = 1.0;
        for j in (i + 1)..k {
            let r = pearson(&series[i], &series[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    Ok(CorrelationResult { columns, matrix })
}

/// Pearson r over the rows where both values are present; 0.0 when the
/// correlation is undefined.
fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return 0.0;
    }

    let mean_a = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
    let mean_b = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in &pairs {
        let da = x - mean_a;
        let db = y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    if var_a <= 0.0 || var_b <= 0.0 {
        return 0.0;
    }

    (cov / (var_a * var_b).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, HourRange};
    use crate::data::model::{derive_hour, Class, TransactionDataset, TransactionRecord};

    fn dataset(rows: &[(f64, f64, f64)]) -> TransactionDataset {
        // (V1, V2, amount) triples, all at hour 0.
        let records = rows
            .iter()
            .map(|&(v1, v2, amount)| TransactionRecord {
                time: 0.0,
                features: vec![v1, v2],
                amount,
                class: Class::Legitimate,
                hour: derive_hour(0.0),
            })
            .collect();
        TransactionDataset::new(records, vec!["V1".to_string(), "V2".to_string()])
    }

    #[test]
    fn diagonal_is_exactly_one_and_matrix_is_symmetric() {
        let ds = dataset(&[
            (1.0, 4.0, 10.0),
            (2.0, 3.0, 20.0),
            (3.0, 7.0, 15.0),
            (4.0, 1.0, 40.0),
        ]);
        let subset = filter(&ds, HourRange::full());

        let result = compute(&subset).unwrap();
        assert_eq!(result.columns, vec!["V1", "V2", "Amount", "Hour"]);

        for i in 0..result.size() {
            assert_eq!(result.get(i, i), 1.0);
            for j in 0..result.size() {
                assert!((result.get(i, j) - result.get(j, i)).abs() < 1e-12);
                assert!(result.get(i, j) >= -1.0 && result.get(i, j) <= 1.0);
            }
        }
    }

    #[test]
    fn perfectly_correlated_and_anticorrelated_pairs() {
        // V2 = -V1, Amount = 2 * V1.
        let ds = dataset(&[(1.0, -1.0, 2.0), (2.0, -2.0, 4.0), (3.0, -3.0, 6.0)]);
        let subset = filter(&ds, HourRange::full());

        let result = compute(&subset).unwrap();
        let v1 = 0;
        let v2 = 1;
        let amount = 2;
        assert!((result.get(v1, v2) + 1.0).abs() < 1e-12);
        assert!((result.get(v1, amount) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_record_is_insufficient() {
        let ds = dataset(&[(1.0, 2.0, 3.0)]);
        let subset = filter(&ds, HourRange::full());

        assert!(matches!(
            compute(&subset).unwrap_err(),
            ViewError::InsufficientData { got: 1, .. }
        ));
    }

    #[test]
    fn constant_column_reports_zero_off_diagonal() {
        // Hour is constant (all records at hour 0) -> undefined against
        // everything, reported as 0.0, diagonal still 1.0.
        let ds = dataset(&[(1.0, 5.0, 10.0), (2.0, 6.0, 20.0)]);
        let subset = filter(&ds, HourRange::full());

        let result = compute(&subset).unwrap();
        let hour = 3;
        assert_eq!(result.get(hour, hour), 1.0);
        assert_eq!(result.get(hour, 0), 0.0);
        assert_eq!(result.get(0, hour), 0.0);
    }

    #[test]
    fn missing_cells_use_pairwise_complete_rows() {
        // Third row's V1 is missing; V1-V2 correlation uses the first two
        // rows only, which are perfectly correlated.
        let ds = dataset(&[(1.0, 2.0, 1.0), (2.0, 4.0, 1.0), (f64::NAN, 100.0, 1.0)]);
        let subset = filter(&ds, HourRange::full());

        let result = compute(&subset).unwrap();
        assert!((result.get(0, 1) - 1.0).abs() < 1e-12);
    }
}
