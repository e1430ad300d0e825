use crate::data::filter::HourRange;
use crate::data::model::TransactionDataset;
use crate::views::{self, ControlState, ViewOutputs};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// `outputs` always corresponds to `controls`: every control mutation
/// triggers one synchronous recomputation pass before the next frame is
/// drawn, so stale results are never shown.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<TransactionDataset>,

    /// Current values of the two user controls.
    pub controls: ControlState,

    /// Results of the last recomputation pass.
    pub outputs: Option<ViewOutputs>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            controls: ControlState::default(),
            outputs: None,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset, reset controls to their defaults
    /// and run the first pass.
    pub fn set_dataset(&mut self, dataset: TransactionDataset) {
        self.controls = ControlState::default();
        self.outputs = Some(views::recompute(&dataset, &self.controls));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Rerun the pipeline against the current controls.
    pub fn recompute(&mut self) {
        if let Some(ds) = &self.dataset {
            self.outputs = Some(views::recompute(ds, &self.controls));
        }
    }

    /// Select the histogram feature and recompute.
    pub fn set_feature(&mut self, feature: String) {
        if self.controls.selected_feature != feature {
            self.controls.selected_feature = feature;
            self.recompute();
        }
    }

    /// Move the hour range and recompute.
    pub fn set_hour_range(&mut self, range: HourRange) {
        if self.controls.hour_range != range {
            self.controls.hour_range = range;
            self.recompute();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{derive_hour, Class, TransactionRecord, AMOUNT_COLUMN};

    fn dataset() -> TransactionDataset {
        let records = (0..4)
            .map(|i| {
                let time = i as f64 * 3600.0;
                TransactionRecord {
                    time,
                    features: vec![i as f64, -(i as f64)],
                    amount: 10.0 * i as f64,
                    class: if i == 1 {
                        Class::Fraudulent
                    } else {
                        Class::Legitimate
                    },
                    hour: derive_hour(time),
                }
            })
            .collect();
        TransactionDataset::new(records, vec!["V1".to_string(), "V2".to_string()])
    }

    #[test]
    fn loading_resets_controls_and_computes_outputs() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        assert_eq!(state.controls.selected_feature, AMOUNT_COLUMN);
        assert_eq!(state.controls.hour_range, HourRange::full());

        let outputs = state.outputs.as_ref().unwrap();
        assert_eq!(outputs.temporal.total_count(), 4);
    }

    #[test]
    fn narrowing_the_range_recomputes() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        state.set_hour_range(HourRange::new(0, 1));
        let outputs = state.outputs.as_ref().unwrap();
        assert_eq!(outputs.temporal.total_count(), 2);
    }

    #[test]
    fn selecting_a_feature_recomputes_the_distribution() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        state.set_feature("V1".to_string());
        let outputs = state.outputs.as_ref().unwrap();
        assert_eq!(outputs.distribution.as_ref().unwrap().feature, "V1");
    }

    #[test]
    fn control_changes_without_a_dataset_are_harmless() {
        let mut state = AppState::default();
        state.set_hour_range(HourRange::new(1, 2));
        state.set_feature("V1".to_string());
        assert!(state.outputs.is_none());
    }
}
