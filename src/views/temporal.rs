//! Transaction counts grouped by hour of day and class.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::FilteredSubset;
use crate::data::model::Class;

/// One `(hour, class)` group and its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyCount {
    pub hour: u8,
    pub class: Class,
    pub count: u64,
}

/// Group sizes ascending by hour; `(hour, class)` combinations with no
/// records are absent and read as count 0.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemporalResult {
    pub counts: Vec<HourlyCount>,
}

impl TemporalResult {
    /// Sum over all groups; equals the size of the subset it came from.
    pub fn total_count(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }

    /// The `(hour, count)` series of one class, ascending by hour.
    pub fn series(&self, class: Class) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .filter(move |c| c.class == class)
            .map(|c| (c.hour, c.count))
    }
}

/// Count records per `(hour, class)` group. Infallible, even on an empty
/// subset.
pub fn compute(subset: &FilteredSubset<'_>) -> TemporalResult {
    let mut groups: BTreeMap<(u8, Class), u64> = BTreeMap::new();
    for rec in subset.records() {
        *groups.entry((rec.hour, rec.class)).or_insert(0) += 1;
    }

    let counts = groups
        .into_iter()
        .map(|((hour, class), count)| HourlyCount { hour, class, count })
        .collect();

    TemporalResult { counts }
}
