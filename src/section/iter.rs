use std::collections::BTreeMap;

use super::types::{DataItem, ExtraInfo};
use super::DataSection;

/// Forward iterator over the items of a section with omitted values
/// substituted. [`SectionItems::restart`] rewinds it.
#[derive(Debug, Clone)]
pub struct SectionItems<'a> {
    section: &'a DataSection,
    front: usize,
    back: usize,
}

impl<'a> SectionItems<'a> {
    fn new(section: &'a DataSection) -> Self {
        Self {
            section,
            front: 0,
            back: section.len(),
        }
    }

    /// Rewind to the first item
    pub fn restart(&mut self) {
        self.front = 0;
        self.back = self.section.len();
    }

    /// Index of the item the next call to `next` yields
    pub fn position(&self) -> usize {
        self.front
    }
}

impl Iterator for SectionItems<'_> {
    type Item = DataItem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.section.substituted_item(self.front);
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for SectionItems<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.section.substituted_item(self.back))
    }
}

impl ExactSizeIterator for SectionItems<'_> {}

/// Options for [`DataSection::for_each_item`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForEachOptions {
    /// Hand out stored values without substitution
    pub raw: bool,
    /// Visit items from last to first
    pub reverse: bool,
}

impl DataSection {
    /// Iterate over items with omitted values substituted
    pub fn iter(&self) -> SectionItems<'_> {
        SectionItems::new(self)
    }

    /// Iterate over items keyed by variable symbol
    pub fn iter_keyed(&self) -> impl Iterator<Item = BTreeMap<String, f64>> + '_ {
        (0..self.len()).filter_map(move |i| self.keyed_item_at(i))
    }

    /// Visit every item with its index and extra info
    pub fn for_each_item<F>(&self, options: ForEachOptions, mut visit: F)
    where
        F: FnMut(usize, &[f64], Option<&ExtraInfo>),
    {
        let mut visit_index = |index: usize| {
            let extra = self.extra_info_at(index);
            if options.raw {
                visit(index, &self.items[index], extra);
            } else {
                let item = self.substituted_item(index);
                visit(index, &item, extra);
            }
        };
        if options.reverse {
            (0..self.len()).rev().for_each(&mut visit_index);
        } else {
            (0..self.len()).for_each(&mut visit_index);
        }
    }
}

impl<'a> IntoIterator for &'a DataSection {
    type Item = DataItem;
    type IntoIter = SectionItems<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
