use super::model::{TransactionDataset, TransactionRecord};

// ---------------------------------------------------------------------------
// HourRange – the inclusive hour-of-day predicate
// ---------------------------------------------------------------------------

/// Inclusive hour-of-day range, `0 <= low <= high <= 23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    pub low: u8,
    pub high: u8,
}

impl HourRange {
    /// Build a range, clamping both ends to [0, 23] and ordering them.
    pub fn new(low: u8, high: u8) -> Self {
        let low = low.min(23);
        let high = high.min(23);
        if low <= high {
            HourRange { low, high }
        } else {
            HourRange {
                low: high,
                high: low,
            }
        }
    }

    /// The whole day.
    pub fn full() -> Self {
        HourRange { low: 0, high: 23 }
    }

    pub fn contains(&self, hour: u8) -> bool {
        self.low <= hour && hour <= self.high
    }
}

impl Default for HourRange {
    fn default() -> Self {
        HourRange::full()
    }
}

// ---------------------------------------------------------------------------
// FilteredSubset – a borrowed view of the records in range
// ---------------------------------------------------------------------------

/// The records whose derived hour falls in the selected range.
///
/// Holds indices into the underlying dataset rather than copies, so the
/// subset has no lifetime of its own beyond the recomputation pass that
/// produced it.
pub struct FilteredSubset<'a> {
    dataset: &'a TransactionDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredSubset<'a> {
    pub fn dataset(&self) -> &'a TransactionDataset {
        self.dataset
    }

    /// Dataset indices of the retained records, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Retained records in dataset order.
    pub fn records(&self) -> impl Iterator<Item = &'a TransactionRecord> + '_ {
        self.indices.iter().map(|&i| &self.dataset.records[i])
    }
}

/// Select the records whose `hour` lies in `range`, preserving dataset order.
pub fn filter<'a>(dataset: &'a TransactionDataset, range: HourRange) -> FilteredSubset<'a> {
    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| range.contains(rec.hour))
        .map(|(i, _)| i)
        .collect();

    FilteredSubset { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{derive_hour, Class};

    fn dataset(times: &[f64], classes: &[Class]) -> TransactionDataset {
        let records = times
            .iter()
            .zip(classes)
            .map(|(&time, &class)| TransactionRecord {
                time,
                features: vec![0.0],
                amount: 1.0,
                class,
                hour: derive_hour(time),
            })
            .collect();
        TransactionDataset::new(records, vec!["V1".to_string()])
    }

    #[test]
    fn range_normalizes_inputs() {
        assert_eq!(HourRange::new(5, 3), HourRange { low: 3, high: 5 });
        assert_eq!(HourRange::new(0, 99), HourRange { low: 0, high: 23 });
        assert!(HourRange::full().contains(0));
        assert!(HourRange::full().contains(23));
        assert!(!HourRange::new(2, 4).contains(5));
    }

    #[test]
    fn filter_keeps_records_in_range() {
        // Times 0s, 1h, 2h -> hours 0, 1, 2.
        let ds = dataset(
            &[0.0, 3600.0, 7200.0],
            &[Class::Legitimate, Class::Fraudulent, Class::Legitimate],
        );

        let subset = filter(&ds, HourRange::new(0, 1));
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.indices(), &[0, 1]);

        let hours: Vec<u8> = subset.records().map(|r| r.hour).collect();
        assert_eq!(hours, vec![0, 1]);
    }

    #[test]
    fn full_range_keeps_everything_in_order() {
        let ds = dataset(
            &[7200.0, 0.0, 3600.0],
            &[Class::Legitimate, Class::Legitimate, Class::Fraudulent],
        );

        let subset = filter(&ds, HourRange::full());
        assert_eq!(subset.indices(), &[0, 1, 2]);
    }

    #[test]
    fn disjoint_range_yields_empty_subset() {
        let ds = dataset(&[0.0, 3600.0], &[Class::Legitimate, Class::Fraudulent]);

        let subset = filter(&ds, HourRange::new(10, 12));
        assert!(subset.is_empty());
        assert_eq!(subset.records().count(), 0);
    }

    #[test]
    fn membership_is_exact_for_all_ranges() {
        let times: Vec<f64> = (0..48).map(|h| h as f64 * 3600.0 + 17.0).collect();
        let classes = vec![Class::Legitimate; 48];
        let ds = dataset(&times, &classes);

        for low in 0..24u8 {
            for high in low..24u8 {
                let subset = filter(&ds, HourRange::new(low, high));
                for rec in subset.records() {
                    assert!(rec.hour >= low && rec.hour <= high);
                }
                // Two days of hourly records: every hour appears twice.
                let expected = 2 * usize::from(high - low + 1);
                assert_eq!(subset.len(), expected);
            }
        }
    }
}
