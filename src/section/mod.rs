//! # Data Section Module
//!
//! A [`DataSection`] is one coherent block of spectrum data: an ordered list
//! of items, each item holding one value per *local variable* (a subset of the
//! owning spectrum's variables).
//!
//! ## Modes
//!
//! - [`DataMode::Continuous`]: a sampled curve. Values can be looked up at any
//!   abscissa by linear interpolation, and an evenly spaced variable may be
//!   stored as a [`ContinuousRange`] instead of explicit values.
//! - [`DataMode::Peak`]: a sparse peak table. Lookups match the nearest peak
//!   within a tolerance and otherwise fall back to the *peak root* (the
//!   baseline every peak rises from).
//!
//! ## Omitted values
//!
//! A stored value may be omitted (NaN). Reads substitute, in order: the
//! continuous range of the variable (continuous mode only), its default value,
//! its peak root value (peak mode only). Values that stay NaN are skipped by
//! statistics and interpolation.
//!
//! ## Example
//!
//! ```rust
//! use spectral_engine::section::{DataMode, DataSection};
//! use spectral_engine::variable::VariableDefinition;
//!
//! let mut section = DataSection::new(
//!     "curve",
//!     vec![
//!         VariableDefinition::independent("x", "nm"),
//!         VariableDefinition::dependent("y", "arb"),
//!     ],
//!     DataMode::Continuous,
//! )?;
//! for i in 0..5 {
//!     section.append_item(vec![i as f64, i as f64 * 10.0])?;
//! }
//! let item = section.value_at(1.5)?.expect("inside the data range");
//! assert_eq!(item, vec![1.5, 15.0]);
//! # Ok::<(), spectral_engine::section::SectionError>(())
//! ```

mod cache;
mod error;
mod events;
mod iter;
mod lookup;
mod stats;
mod types;


use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::variable::VariableDefinition;

use cache::SectionCache;
use events::Observers;

pub use error::SectionError;
pub use events::{ChangeKind, DataChangeEvent, DataObserver, ObserverId};
pub use iter::{ForEachOptions, SectionItems};
pub use lookup::{RangeQueryOptions, RangeQueryResult};
pub use stats::RangeOptions;
pub use types::{
    ContinuousRange, DataItem, DataMode, DataRange, ExtraInfo, ItemInput, PeakMultiplicity,
    PeakShape,
};

/// Component-wise ordering of two items. Omitted (NaN) values sort last.
pub fn compare_items(a: &[f64], b: &[f64]) -> Ordering {
    compare_columns(a, b, 0..a.len().min(b.len())).then(a.len().cmp(&b.len()))
}

fn compare_columns(a: &[f64], b: &[f64], columns: impl IntoIterator<Item = usize>) -> Ordering {
    for column in columns {
        let (x, y) = (a[column], b[column]);
        let ord = match (x.is_nan(), y.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// One block of spectrum data with its own local variables and storage mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSection {
    name: String,
    title: Option<String>,
    mode: DataMode,
    variables: Vec<VariableDefinition>,
    #[serde(with = "types::omitted_values")]
    items: Vec<DataItem>,
    extras: Vec<Option<ExtraInfo>>,
    peak_root: BTreeMap<String, f64>,
    continuous_ranges: BTreeMap<String, ContinuousRange>,
    default_values: BTreeMap<String, f64>,
    display_ranges: BTreeMap<String, DataRange>,
    sorted: bool,
    modified_at: DateTime<Utc>,
    #[serde(skip)]
    cache: RefCell<SectionCache>,
    #[serde(skip)]
    observers: Observers,
}

impl DataSection {
    /// Create an empty section over the given local variables
    pub fn new(
        name: impl Into<String>,
        variables: Vec<VariableDefinition>,
        mode: DataMode,
    ) -> Result<Self, SectionError> {
        for (i, var) in variables.iter().enumerate() {
            if variables[..i].iter().any(|v| v.symbol == var.symbol) {
                return Err(SectionError::DuplicateVariable(var.symbol.clone()));
            }
        }
        let name = name.into();
        log::debug!(
            "creating {} section '{}' with {} variables",
            mode,
            name,
            variables.len()
        );
        Ok(Self {
            name,
            title: None,
            mode,
            variables,
            items: Vec::new(),
            extras: Vec::new(),
            peak_root: BTreeMap::new(),
            continuous_ranges: BTreeMap::new(),
            default_values: BTreeMap::new(),
            display_ranges: BTreeMap::new(),
            sorted: false,
            modified_at: Utc::now(),
            cache: RefCell::new(SectionCache::default()),
            observers: Observers::default(),
        })
    }

    // ==================== Identity & settings ====================

    /// Section name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the section
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Optional display title
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Set the display title
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Storage mode
    pub fn mode(&self) -> DataMode {
        self.mode
    }

    /// Change the storage mode
    pub fn set_mode(&mut self, mode: DataMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.settings_changed(false);
    }

    /// Time of the last mutation
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Whether the items are known to be in sorted order
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    // ==================== Local variables ====================

    /// Local variables in item order
    pub fn variables(&self) -> &[VariableDefinition] {
        &self.variables
    }

    /// Local variable by symbol
    pub fn variable(&self, symbol: &str) -> Option<&VariableDefinition> {
        self.variables.iter().find(|v| v.symbol == symbol)
    }

    /// Position of a local variable within items
    pub fn index_of_variable(&self, symbol: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.symbol == symbol)
    }

    /// Whether `symbol` is a local variable
    pub fn has_variable(&self, symbol: &str) -> bool {
        self.index_of_variable(symbol).is_some()
    }

    /// Symbols of the local variables in item order
    pub fn variable_symbols(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.symbol.as_str()).collect()
    }

    /// Symbols of the independent local variables
    pub fn independent_variable_symbols(&self) -> Vec<&str> {
        self.variables
            .iter()
            .filter(|v| v.is_independent())
            .map(|v| v.symbol.as_str())
            .collect()
    }

    /// Symbols of the dependent local variables
    pub fn dependent_variable_symbols(&self) -> Vec<&str> {
        self.variables
            .iter()
            .filter(|v| v.is_dependent())
            .map(|v| v.symbol.as_str())
            .collect()
    }

    pub(crate) fn require_variable(&self, symbol: &str) -> Result<usize, SectionError> {
        self.index_of_variable(symbol)
            .ok_or_else(|| SectionError::UnknownVariable(symbol.to_string()))
    }

    /// Update the display unit of a local variable. Returns whether the
    /// variable exists in this section.
    pub(crate) fn set_external_unit(&mut self, symbol: &str, unit: Option<String>) -> bool {
        let Some(index) = self.index_of_variable(symbol) else {
            return false;
        };
        self.variables[index].external_unit = unit;
        self.settings_changed(true);
        true
    }

    // ==================== Per-variable settings ====================

    /// Declare `symbol` as evenly spaced from `from_value` (first item) to
    /// `to_value` (last item)
    pub fn set_continuous_range(
        &mut self,
        symbol: &str,
        from_value: f64,
        to_value: f64,
    ) -> Result<(), SectionError> {
        self.require_variable(symbol)?;
        self.continuous_ranges
            .insert(symbol.to_string(), ContinuousRange::new(from_value, to_value));
        self.settings_changed(false);
        Ok(())
    }

    /// Continuous range of a variable, if declared
    pub fn continuous_range(&self, symbol: &str) -> Option<ContinuousRange> {
        self.continuous_ranges.get(symbol).copied()
    }

    /// Remove the continuous range of a variable. Returns whether one was set.
    pub fn clear_continuous_range(&mut self, symbol: &str) -> bool {
        let removed = self.continuous_ranges.remove(symbol).is_some();
        if removed {
            self.settings_changed(false);
        }
        removed
    }

    /// Symbols that have a continuous range
    pub fn continuous_variable_symbols(&self) -> Vec<&str> {
        self.continuous_ranges.keys().map(String::as_str).collect()
    }

    /// Value substituted for omitted values of `symbol`
    pub fn set_default_value(&mut self, symbol: &str, value: f64) -> Result<(), SectionError> {
        self.require_variable(symbol)?;
        self.default_values.insert(symbol.to_string(), value);
        self.settings_changed(false);
        Ok(())
    }

    /// Default value of a variable, if declared
    pub fn default_value(&self, symbol: &str) -> Option<f64> {
        self.default_values.get(symbol).copied()
    }

    /// Remove the default value of a variable. Returns whether one was set.
    pub fn clear_default_value(&mut self, symbol: &str) -> bool {
        let removed = self.default_values.remove(symbol).is_some();
        if removed {
            self.settings_changed(false);
        }
        removed
    }

    /// Baseline value of `symbol` that every peak rises from
    pub fn set_peak_root(&mut self, symbol: &str, value: f64) -> Result<(), SectionError> {
        self.require_variable(symbol)?;
        self.peak_root.insert(symbol.to_string(), value);
        self.settings_changed(false);
        Ok(())
    }

    /// Peak root value of a variable, if declared
    pub fn peak_root(&self, symbol: &str) -> Option<f64> {
        self.peak_root.get(symbol).copied()
    }

    /// Remove the peak root value of a variable. Returns whether one was set.
    pub fn clear_peak_root(&mut self, symbol: &str) -> bool {
        let removed = self.peak_root.remove(symbol).is_some();
        if removed {
            self.settings_changed(false);
        }
        removed
    }

    /// Explicit display range of `symbol`, overriding the computed data range
    pub fn set_display_range(&mut self, symbol: &str, range: DataRange) -> Result<(), SectionError> {
        self.require_variable(symbol)?;
        self.display_ranges.insert(symbol.to_string(), range);
        self.settings_changed(true);
        Ok(())
    }

    /// Remove the explicit display range. Returns whether one was set.
    pub fn clear_display_range(&mut self, symbol: &str) -> bool {
        let removed = self.display_ranges.remove(symbol).is_some();
        if removed {
            self.settings_changed(true);
        }
        removed
    }

    // ==================== Item access ====================

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the section holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stored item without substitution of omitted values
    pub fn raw_item_at(&self, index: usize) -> Option<&[f64]> {
        self.items.get(index).map(Vec::as_slice)
    }

    /// Item with omitted values substituted
    pub fn item_at(&self, index: usize) -> Option<DataItem> {
        if index >= self.items.len() {
            return None;
        }
        Some(self.substituted_item(index))
    }

    /// Item keyed by variable symbol; values that stay omitted are left out
    pub fn keyed_item_at(&self, index: usize) -> Option<BTreeMap<String, f64>> {
        let item = self.item_at(index)?;
        Some(
            self.variables
                .iter()
                .zip(item)
                .filter(|(_, v)| !v.is_nan())
                .map(|(var, v)| (var.symbol.clone(), v))
                .collect(),
        )
    }

    /// Substituted value of one variable of one item; `None` when `index` is
    /// outside the items
    pub fn item_value(&self, index: usize, symbol: &str) -> Result<Option<f64>, SectionError> {
        let var = self.require_variable(symbol)?;
        if index >= self.items.len() {
            return Ok(None);
        }
        Ok(Some(self.value_of(index, var, true)))
    }

    /// Extra info attached to an item
    pub fn extra_info_at(&self, index: usize) -> Option<&ExtraInfo> {
        self.extras.get(index).and_then(Option::as_ref)
    }

    pub(crate) fn substituted_item(&self, index: usize) -> DataItem {
        (0..self.variables.len())
            .map(|var| self.value_of(index, var, true))
            .collect()
    }

    /// Stored value or its substitute. `index` and `var` must be in bounds.
    pub(crate) fn value_of(&self, index: usize, var: usize, use_peak_root: bool) -> f64 {
        let raw = self.items[index][var];
        if !raw.is_nan() {
            return raw;
        }
        let symbol = &self.variables[var].symbol;
        if self.mode == DataMode::Continuous {
            if let Some(range) = self.continuous_ranges.get(symbol) {
                return range.value_at_index(index, self.items.len());
            }
        }
        if let Some(value) = self.default_values.get(symbol) {
            return *value;
        }
        if self.mode == DataMode::Peak && use_peak_root {
            if let Some(value) = self.peak_root.get(symbol) {
                return *value;
            }
        }
        f64::NAN
    }

    // ==================== Mutation ====================

    fn resolve_input(&self, input: ItemInput) -> Result<DataItem, SectionError> {
        match input {
            ItemInput::Positional(values) => {
                if values.len() != self.variables.len() {
                    return Err(SectionError::ItemLengthMismatch {
                        expected: self.variables.len(),
                        actual: values.len(),
                    });
                }
                Ok(values)
            }
            ItemInput::Keyed(map) => {
                let mut item = vec![f64::NAN; self.variables.len()];
                for (symbol, value) in map {
                    let Some(index) = self.index_of_variable(&symbol) else {
                        return Err(SectionError::UnknownVariable(symbol));
                    };
                    item[index] = value;
                }
                Ok(item)
            }
        }
    }

    fn out_of_bounds(&self, index: usize) -> SectionError {
        SectionError::IndexOutOfBounds {
            index,
            len: self.items.len(),
        }
    }

    /// Append an item; returns the stored item
    pub fn append_item(&mut self, input: impl Into<ItemInput>) -> Result<&[f64], SectionError> {
        self.push_item(input.into(), None)
    }

    /// Append an item together with its extra info
    pub fn append_item_with_extra(
        &mut self,
        input: impl Into<ItemInput>,
        extra: ExtraInfo,
    ) -> Result<&[f64], SectionError> {
        self.push_item(input.into(), Some(extra))
    }

    fn push_item(
        &mut self,
        input: ItemInput,
        extra: Option<ExtraInfo>,
    ) -> Result<&[f64], SectionError> {
        let item = self.resolve_input(input)?;
        let index = self.items.len();
        self.items.push(item);
        self.extras.push(extra);
        self.invalidate(false);
        self.notify(ChangeKind::Append, vec![index], || vec![self.items[index].clone()]);
        Ok(&self.items[index])
    }

    /// Insert an item before `index` (`index == len` appends)
    pub fn insert_item_at(
        &mut self,
        index: usize,
        input: impl Into<ItemInput>,
    ) -> Result<(), SectionError> {
        if index > self.items.len() {
            return Err(self.out_of_bounds(index));
        }
        let item = self.resolve_input(input.into())?;
        self.items.insert(index, item);
        self.extras.insert(index, None);
        self.invalidate(false);
        self.notify(ChangeKind::Insert, vec![index], || vec![self.items[index].clone()]);
        Ok(())
    }

    /// Overwrite the item at `index`; `index == len` appends. Overwriting
    /// drops the extra info of the replaced item.
    pub fn set_item_at(
        &mut self,
        index: usize,
        input: impl Into<ItemInput>,
    ) -> Result<(), SectionError> {
        if index == self.items.len() {
            self.push_item(input.into(), None)?;
            return Ok(());
        }
        if index > self.items.len() {
            return Err(self.out_of_bounds(index));
        }
        let item = self.resolve_input(input.into())?;
        self.items[index] = item;
        self.extras[index] = None;
        self.invalidate(false);
        self.notify(ChangeKind::Set, vec![index], || vec![self.items[index].clone()]);
        Ok(())
    }

    /// Remove and return the item at `index`
    pub fn remove_item_at(&mut self, index: usize) -> Result<DataItem, SectionError> {
        if index >= self.items.len() {
            return Err(self.out_of_bounds(index));
        }
        let removed = self.items.remove(index);
        self.extras.remove(index);
        // removal keeps the remaining items in order
        self.invalidate(true);
        self.notify(ChangeKind::Remove, vec![index], || vec![removed.clone()]);
        Ok(removed)
    }

    /// Replace the extra info of an item
    pub fn set_extra_info_at(
        &mut self,
        index: usize,
        extra: Option<ExtraInfo>,
    ) -> Result<(), SectionError> {
        if index >= self.items.len() {
            return Err(self.out_of_bounds(index));
        }
        self.extras[index] = extra;
        self.invalidate(false);
        self.notify(ChangeKind::ExtraInfo, vec![index], Vec::new);
        Ok(())
    }

    /// Remove all items
    pub fn clear(&mut self) {
        self.items.clear();
        self.extras.clear();
        self.invalidate(false);
        self.notify(ChangeKind::Clear, Vec::new(), Vec::new);
    }

    /// Sort items by the independent variables in local order, then by the
    /// dependent ones. No-op when the section is already flagged sorted.
    pub fn sort(&mut self) {
        let columns: Vec<usize> = (0..self.variables.len())
            .filter(|&i| self.variables[i].is_independent())
            .chain((0..self.variables.len()).filter(|&i| !self.variables[i].is_independent()))
            .collect();
        self.sort_by(move |a, b| compare_columns(a, b, columns.iter().copied()));
    }

    /// Stable sort of the items with a custom comparator. Extra info moves
    /// with its item. No-op when the section is already flagged sorted.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&[f64], &[f64]) -> Ordering,
    {
        if self.sorted {
            return;
        }
        log::debug!("section '{}': sorting {} items", self.name, self.items.len());
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by(|&a, &b| compare(&self.items[a], &self.items[b]));

        let items = order.iter().map(|&i| self.items[i].clone()).collect();
        let extras = order.iter().map(|&i| self.extras[i].clone()).collect();
        self.items = items;
        self.extras = extras;

        self.invalidate(true);
        self.sorted = true;
        self.notify(ChangeKind::Sort, order, Vec::new);
    }

    fn settings_changed(&mut self, keep_sorted: bool) {
        self.invalidate(keep_sorted);
        self.notify(ChangeKind::Settings, Vec::new(), Vec::new);
    }

    fn invalidate(&mut self, keep_sorted: bool) {
        self.modified_at = Utc::now();
        self.cache.get_mut().clear();
        if !keep_sorted {
            self.sorted = false;
        }
    }

    fn notify<F>(&self, kind: ChangeKind, indices: Vec<usize>, items: F)
    where
        F: FnOnce() -> Vec<DataItem>,
    {
        self.observers.notify_with(|| DataChangeEvent {
            section: self.name.clone(),
            kind,
            indices,
            items: items(),
        });
    }

    /// Check the structural invariants of a deserialized section
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        for (i, var) in self.variables.iter().enumerate() {
            if self.variables[..i].iter().any(|v| v.symbol == var.symbol) {
                return Err(format!("duplicate variable '{}'", var.symbol));
            }
        }
        if let Some((index, item)) = self
            .items
            .iter()
            .enumerate()
            .find(|(_, item)| item.len() != self.variables.len())
        {
            return Err(format!(
                "item {} has {} values, expected {}",
                index,
                item.len(),
                self.variables.len()
            ));
        }
        if self.extras.len() != self.items.len() {
            return Err(format!(
                "{} extra info entries for {} items",
                self.extras.len(),
                self.items.len()
            ));
        }
        let settings = self
            .peak_root
            .keys()
            .chain(self.continuous_ranges.keys())
            .chain(self.default_values.keys())
            .chain(self.display_ranges.keys());
        for symbol in settings {
            if !self.has_variable(symbol) {
                return Err(format!("settings refer to unknown variable '{}'", symbol));
            }
        }
        Ok(())
    }

    // ==================== Observers ====================

    /// Subscribe to data change notifications
    pub fn subscribe<O>(&mut self, observer: O) -> ObserverId
    where
        O: DataObserver + 'static,
    {
        self.observers.subscribe(Arc::new(observer))
    }

    /// Stop notifications for `id`. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of subscribed observers
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
