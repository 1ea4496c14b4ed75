use crate::config::DEFAULT_RELATIVE_TOLERANCE;

use super::stats::RangeOptions;
use super::types::{DataItem, DataMode, DataRange};
use super::{DataSection, SectionError};

/// Options for [`DataSection::values_in_independent_range`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeQueryOptions {
    /// Peak mode: order matches by distance to the range center
    pub rank_by_center: bool,
    /// Scan from the last item to the first
    pub reverse: bool,
}

/// Items whose independent value lies in a queried range
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeQueryResult {
    /// Indices of the enclosed items
    pub indices: Vec<usize>,
    /// Enclosed items with omitted values substituted
    pub items: Vec<DataItem>,
    /// Continuous mode: interpolated item at the (clamped) range start
    pub start: Option<DataItem>,
    /// Continuous mode: interpolated item at the (clamped) range end
    pub end: Option<DataItem>,
}

impl RangeQueryResult {
    /// Whether nothing was found
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() && self.start.is_none() && self.end.is_none()
    }

    /// Boundary and enclosed items in scan order
    pub fn values(&self) -> Vec<DataItem> {
        self.start
            .iter()
            .chain(self.items.iter())
            .chain(self.end.iter())
            .cloned()
            .collect()
    }
}

impl DataSection {
    pub(crate) fn require_independent(&self, symbol: &str) -> Result<usize, SectionError> {
        let var = self.require_variable(symbol)?;
        if !self.variables[var].is_independent() {
            return Err(SectionError::NotIndependent(symbol.to_string()));
        }
        Ok(var)
    }

    fn primary_independent(&self) -> Result<usize, SectionError> {
        self.variables
            .iter()
            .position(|v| v.is_independent())
            .ok_or(SectionError::NoIndependentVariable)
    }

    fn lookup_range(&self, var: usize) -> Option<DataRange> {
        self.variable_stats(var, RangeOptions::default()).range
    }

    /// Coordinate of an item as lookups see it: omitted values substituted,
    /// the peak root included in peak mode
    fn coordinate(&self, index: usize, var: usize) -> f64 {
        self.value_of(index, var, true)
    }

    /// Item at abscissa `x` of the first independent variable.
    ///
    /// Continuous mode interpolates and returns `None` outside the data
    /// range. Peak mode matches the nearest peak within the default tolerance
    /// and otherwise returns the peak root item.
    pub fn value_at(&self, x: f64) -> Result<Option<DataItem>, SectionError> {
        let var = self.primary_independent()?;
        let symbol = self.variables[var].symbol.clone();
        self.values_at(&[(symbol.as_str(), x)], None)
    }

    /// Item matching independent values `query`, dispatched by mode.
    ///
    /// Continuous mode interpolates on the first queried variable. Peak mode
    /// always yields an item: the matched peak or the peak root item.
    pub fn values_at(
        &self,
        query: &[(&str, f64)],
        tolerance: Option<f64>,
    ) -> Result<Option<DataItem>, SectionError> {
        match self.mode {
            DataMode::Continuous => match query.first() {
                Some((symbol, x)) => self.interpolate_at(symbol, *x),
                None => Ok(None),
            },
            DataMode::Peak => self.peak_value_at(query, tolerance).map(Some),
        }
    }

    // ==================== Continuous lookup ====================

    /// Linearly interpolated item at `x` of the independent variable `symbol`;
    /// `None` outside `[min, max]`
    pub fn interpolate_at(&self, symbol: &str, x: f64) -> Result<Option<DataItem>, SectionError> {
        let var = self.require_independent(symbol)?;
        if x.is_nan() {
            return Ok(None);
        }
        let Some(range) = self.lookup_range(var) else {
            return Ok(None);
        };
        if !range.contains(x) {
            return Ok(None);
        }
        let Some((lo, hi)) = self.bracket(var, x) else {
            return Ok(None);
        };
        Ok(Some(self.interpolate_between(var, x, lo, hi)))
    }

    /// Indices of two items whose values of `var` enclose `x`
    fn bracket(&self, var: usize, x: f64) -> Option<(usize, usize)> {
        let count = self.items.len();
        if count == 0 {
            return None;
        }
        let symbol = &self.variables[var].symbol;
        if self.mode == DataMode::Continuous {
            if let Some(range) = self.continuous_ranges.get(symbol) {
                let span = range.to_value - range.from_value;
                if count == 1 || span == 0.0 {
                    return Some((0, 0));
                }
                let last = (count - 1) as f64;
                let pos = ((x - range.from_value) / span * last).clamp(0.0, last);
                return Some((pos.floor() as usize, pos.ceil() as usize));
            }
        }
        if self.sorted {
            if let Some((lo, hi)) = self.binary_bracket(var, x) {
                let consistent = self.encloses(var, x, lo, hi);
                debug_assert!(
                    consistent,
                    "sorted section '{}' gave an inconsistent bracket ({}, {}) for {}",
                    self.name,
                    lo,
                    hi,
                    x
                );
                if consistent {
                    return Some((lo, hi));
                }
                log::warn!(
                    "section '{}' is flagged sorted but binary search failed for {}; scanning",
                    self.name,
                    x
                );
            }
        }
        self.linear_bracket(var, x)
    }

    fn valid(&self, index: usize, var: usize) -> bool {
        !self.coordinate(index, var).is_nan()
    }

    fn encloses(&self, var: usize, x: f64, lo: usize, hi: usize) -> bool {
        let a = self.coordinate(lo, var);
        let b = self.coordinate(hi, var);
        !a.is_nan() && !b.is_nan() && DataRange::new(a, b).contains(x)
    }

    fn binary_bracket(&self, var: usize, x: f64) -> Option<(usize, usize)> {
        let count = self.items.len();
        let first = (0..count).find(|&i| self.valid(i, var))?;
        let last = (0..count).rev().find(|&i| self.valid(i, var))?;
        let ascending = self.coordinate(first, var) <= self.coordinate(last, var);

        let (mut from, mut to) = (first, last);
        while to - from > 1 {
            let mid = from + (to - from) / 2;
            // step over omitted values inside (from, to)
            let Some(mid) = (mid..to)
                .find(|&i| self.valid(i, var))
                .or_else(|| (from + 1..mid).rev().find(|&i| self.valid(i, var)))
            else {
                break;
            };
            let value = self.coordinate(mid, var);
            if value == x {
                return Some((mid, mid));
            }
            let go_left = if ascending { x < value } else { x > value };
            if go_left {
                to = mid;
            } else {
                from = mid;
            }
        }
        Some((from, to))
    }

    fn linear_bracket(&self, var: usize, x: f64) -> Option<(usize, usize)> {
        let mut previous: Option<(usize, f64)> = None;
        for index in 0..self.items.len() {
            let value = self.coordinate(index, var);
            if value.is_nan() {
                continue;
            }
            if value == x {
                return Some((index, index));
            }
            if let Some((prev_index, prev_value)) = previous {
                if DataRange::new(prev_value, value).contains(x) {
                    return Some((prev_index, index));
                }
            }
            previous = Some((index, value));
        }
        None
    }

    fn interpolate_between(&self, var: usize, x: f64, lo: usize, hi: usize) -> DataItem {
        // an exact hit collapses the bracket onto that item
        let (lo, hi) = if self.coordinate(lo, var) == x {
            (lo, lo)
        } else if self.coordinate(hi, var) == x {
            (hi, hi)
        } else {
            (lo, hi)
        };

        let count = self.items.len();
        (0..self.variables.len())
            .map(|target| {
                if target == var {
                    return x;
                }
                // widen outward past items where either coordinate is omitted
                let usable =
                    |i: &usize| self.valid(*i, var) && !self.value_of(*i, target, true).is_nan();
                let left = (0..=lo).rev().find(usable);
                let right = (hi..count).find(usable);
                match (left, right) {
                    (Some(a), Some(b)) => {
                        let (xa, ya) = (self.coordinate(a, var), self.value_of(a, target, true));
                        let (xb, yb) = (self.coordinate(b, var), self.value_of(b, target, true));
                        if a == b || xb == xa {
                            ya
                        } else {
                            ya + (x - xa) * (yb - ya) / (xb - xa)
                        }
                    }
                    _ => f64::NAN,
                }
            })
            .collect()
    }

    // ==================== Peak lookup ====================

    /// Index of the peak nearest to `query` (independent symbol, value pairs).
    ///
    /// A peak matches when every queried value lies within
    /// `tolerance * span` of the query, `span` being the section's extent of
    /// that variable. Queries outside the extent never match. Among matches
    /// the smallest sum of squared normalized distances wins.
    pub fn find_nearest_item_index(
        &self,
        query: &[(&str, f64)],
        tolerance: Option<f64>,
    ) -> Result<Option<usize>, SectionError> {
        let tolerance = tolerance.unwrap_or(DEFAULT_RELATIVE_TOLERANCE);

        let mut dims = Vec::with_capacity(query.len());
        for (symbol, q) in query {
            let var = self.require_independent(symbol)?;
            let Some(range) = self.lookup_range(var) else {
                return Ok(None);
            };
            if q.is_nan() || !range.contains(*q) {
                return Ok(None);
            }
            let span = range.span();
            let scale = if span > 0.0 { span } else { q.abs().max(1.0) };
            dims.push((var, *q, scale));
        }
        if dims.is_empty() {
            return Ok(None);
        }

        let mut best: Option<(usize, f64)> = None;
        'items: for index in 0..self.items.len() {
            let mut score = 0.0;
            for &(var, q, scale) in &dims {
                let value = self.coordinate(index, var);
                if value.is_nan() {
                    continue 'items;
                }
                let distance = (value - q).abs() / scale;
                if distance > tolerance {
                    continue 'items;
                }
                score += distance * distance;
            }
            if best.map_or(true, |(_, s)| score < s) {
                best = Some((index, score));
            }
        }
        Ok(best.map(|(index, _)| index))
    }

    /// The matched peak item, or the peak root item when nothing matches
    pub fn peak_value_at(
        &self,
        query: &[(&str, f64)],
        tolerance: Option<f64>,
    ) -> Result<DataItem, SectionError> {
        if let Some(index) = self.find_nearest_item_index(query, tolerance)? {
            return Ok(self.substituted_item(index));
        }
        Ok(self.peak_root_item(query))
    }

    /// Item on the peak root at `query`: queried independent values, root
    /// values for the rest (default value, else omitted)
    pub fn peak_root_item(&self, query: &[(&str, f64)]) -> DataItem {
        self.variables
            .iter()
            .map(|var| {
                if let Some((_, q)) = query.iter().find(|(s, _)| *s == var.symbol) {
                    return *q;
                }
                self.peak_root
                    .get(&var.symbol)
                    .or_else(|| self.default_values.get(&var.symbol))
                    .copied()
                    .unwrap_or(f64::NAN)
            })
            .collect()
    }

    // ==================== Range queries ====================

    /// Items whose value of the independent variable `symbol` lies between
    /// `from` and `to` (any order).
    ///
    /// Continuous mode clamps the range to the data, interpolates the two
    /// boundary items and returns the items strictly inside. Peak mode
    /// returns every peak inside the closed range.
    pub fn values_in_independent_range(
        &self,
        symbol: &str,
        from: f64,
        to: f64,
        options: RangeQueryOptions,
    ) -> Result<RangeQueryResult, SectionError> {
        let var = self.require_independent(symbol)?;
        let query = DataRange::new(from, to);
        if query.min.is_nan() || query.max.is_nan() {
            return Ok(RangeQueryResult::default());
        }

        let mut indices: Vec<usize> = Vec::new();
        let mut start = None;
        let mut end = None;

        match self.mode {
            DataMode::Continuous => {
                let Some(extent) = self.lookup_range(var) else {
                    return Ok(RangeQueryResult::default());
                };
                if query.max < extent.min || query.min > extent.max {
                    return Ok(RangeQueryResult::default());
                }
                let lo = query.min.max(extent.min);
                let hi = query.max.min(extent.max);
                start = self.interpolate_at(symbol, lo)?;
                end = self.interpolate_at(symbol, hi)?;
                indices = (0..self.items.len())
                    .filter(|&i| {
                        let v = self.coordinate(i, var);
                        v > lo && v < hi
                    })
                    .collect();
                if options.reverse {
                    indices.reverse();
                    std::mem::swap(&mut start, &mut end);
                }
            }
            DataMode::Peak => {
                indices = (0..self.items.len())
                    .filter(|&i| query.contains(self.coordinate(i, var)))
                    .collect();
                if options.reverse {
                    indices.reverse();
                }
                if options.rank_by_center {
                    let center = (query.min + query.max) / 2.0;
                    indices.sort_by(|&a, &b| {
                        let da = (self.coordinate(a, var) - center).abs();
                        let db = (self.coordinate(b, var) - center).abs();
                        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                    });
                }
            }
        }

        let items = indices.iter().map(|&i| self.substituted_item(i)).collect();
        Ok(RangeQueryResult {
            indices,
            items,
            start,
            end,
        })
    }
}
