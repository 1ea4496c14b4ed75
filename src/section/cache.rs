use std::collections::HashMap;

use super::types::DataRange;

/// Statistics of one variable gathered in a single pass over the items
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct VariableStats {
    pub range: Option<DataRange>,
    pub average: Option<f64>,
}

/// Derived-value cache of a section, keyed by `(symbol, ignore_peak_root)`.
///
/// Emptied by every mutation; never observable through query results.
#[derive(Debug, Clone, Default)]
pub(crate) struct SectionCache {
    stats: HashMap<(String, bool), VariableStats>,
    #[cfg(test)]
    rebuilds: usize,
}

impl SectionCache {
    pub(crate) fn get(&self, symbol: &str, ignore_peak_root: bool) -> Option<VariableStats> {
        self.stats
            .get(&(symbol.to_string(), ignore_peak_root))
            .copied()
    }

    pub(crate) fn put(&mut self, symbol: &str, ignore_peak_root: bool, stats: VariableStats) {
        #[cfg(test)]
        {
            self.rebuilds += 1;
        }
        self.stats
            .insert((symbol.to_string(), ignore_peak_root), stats);
    }

    pub(crate) fn clear(&mut self) {
        self.stats.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.stats.len()
    }

    /// Number of statistics computed since creation
    #[cfg(test)]
    pub(crate) fn rebuilds(&self) -> usize {
        self.rebuilds
    }
}
