use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Well-known column names
// ---------------------------------------------------------------------------

/// Seconds-since-window-start column. Never selectable, never correlated.
pub const TIME_COLUMN: &str = "Time";
/// Binary fraud label column.
pub const CLASS_COLUMN: &str = "Class";
/// Transaction amount column.
pub const AMOUNT_COLUMN: &str = "Amount";
/// Derived hour-of-day column, computed once at load.
pub const HOUR_COLUMN: &str = "Hour";
/// Anonymized feature columns are discovered by this name prefix.
pub const FEATURE_PREFIX: &str = "V";

// ---------------------------------------------------------------------------
// Class – the binary fraud label
// ---------------------------------------------------------------------------

/// Transaction label: 0 = legitimate, 1 = fraudulent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Class {
    Legitimate,
    Fraudulent,
}

impl Class {
    pub const ALL: [Class; 2] = [Class::Legitimate, Class::Fraudulent];

    /// Parse the wire label. Anything outside {0, 1} is rejected.
    pub fn from_label(label: i64) -> Option<Class> {
        match label {
            0 => Some(Class::Legitimate),
            1 => Some(Class::Fraudulent),
            _ => None,
        }
    }

    pub fn label(self) -> u8 {
        match self {
            Class::Legitimate => 0,
            Class::Fraudulent => 1,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Class::Legitimate => write!(f, "legitimate"),
            Class::Fraudulent => write!(f, "fraud"),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single transaction (one row of the source table).
///
/// `features` is aligned with [`TransactionDataset::feature_names`];
/// a missing cell is stored as `NaN`.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    /// Seconds since the start of the capture window.
    pub time: f64,
    /// Anonymized feature values, one per discovered `V*` column.
    pub features: Vec<f64>,
    /// Transaction amount (`NaN` if the cell was empty).
    pub amount: f64,
    /// Fraud label.
    pub class: Class,
    /// Hour of day in [0, 23], derived from `time` at load.
    pub hour: u8,
}

/// Hour-of-day bucket for a timestamp: `floor(time / 3600) mod 24`.
pub fn derive_hour(time: f64) -> u8 {
    ((time / 3600.0).floor() as u64 % 24) as u8
}

// ---------------------------------------------------------------------------
// TransactionDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Read-only for the process lifetime once built.
#[derive(Debug, Clone)]
pub struct TransactionDataset {
    /// All transactions (rows), in file order.
    pub records: Vec<TransactionRecord>,
    /// Ordered `V*` column names as discovered in the input header.
    pub feature_names: Vec<String>,
}

impl TransactionDataset {
    pub fn new(records: Vec<TransactionRecord>, feature_names: Vec<String>) -> Self {
        TransactionDataset {
            records,
            feature_names,
        }
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of fraudulent transactions.
    pub fn fraud_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.class == Class::Fraudulent)
            .count()
    }

    /// Every column that participates in analysis: the `V*` features,
    /// `Amount`, and the derived `Hour`. Excludes `Time` and `Class`.
    pub fn analysis_columns(&self) -> Vec<String> {
        let mut columns = self.feature_names.clone();
        columns.push(AMOUNT_COLUMN.to_string());
        columns.push(HOUR_COLUMN.to_string());
        columns
    }

    /// Whether `name` is a valid analysis column for this dataset.
    pub fn is_analysis_column(&self, name: &str) -> bool {
        name == AMOUNT_COLUMN
            || name == HOUR_COLUMN
            || self.feature_names.iter().any(|f| f == name)
    }

    /// Scalar value of an analysis column for one record.
    ///
    /// Returns `None` for unknown columns; a known column with a missing
    /// cell yields `Some(NaN)`.
    pub fn value(&self, record: &TransactionRecord, column: &str) -> Option<f64> {
        match column {
            AMOUNT_COLUMN => Some(record.amount),
            HOUR_COLUMN => Some(f64::from(record.hour)),
            _ => {
                let idx = self.feature_names.iter().position(|f| f == column)?;
                record.features.get(idx).copied()
            }
        }
    }
}
