//! Ordered, non-overlapping cursor regions.

use crate::types::{Point, Region};

/// The cursors of one buffer.
///
/// Regions are kept sorted by position and merged when they overlap. The set
/// is never left empty by a public operation other than `clear`, and callers
/// of `clear` re-populate it before handing control back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    regions: Vec<Region>,
}

impl Default for SelectionSet {
    fn default() -> Self {
        Self::new(Region::caret(0))
    }
}

impl SelectionSet {
    pub fn new(region: Region) -> Self {
        Self {
            regions: vec![region],
        }
    }

    pub fn from_regions(regions: impl IntoIterator<Item = Region>) -> Self {
        let mut set = Self {
            regions: regions.into_iter().collect(),
        };
        set.normalize();
        set
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Region> + '_ {
        self.regions.iter()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Copy of the regions, for loops that edit the buffer while iterating.
    pub fn to_vec(&self) -> Vec<Region> {
        self.regions.clone()
    }

    pub fn first(&self) -> Option<Region> {
        self.regions.first().copied()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Add a region, merging it with anything it overlaps.
    pub fn add(&mut self, region: Region) {
        let mut merged = region;
        self.regions.retain(|r| {
            if r.overlaps(&merged) {
                merged = r.cover(&merged);
                false
            } else {
                true
            }
        });
        let at = self
            .regions
            .partition_point(|r| r.begin() < merged.begin());
        self.regions.insert(at, merged);
        // A widened region can reach neighbours that did not touch the original.
        self.normalize();
    }

    /// Remove an exact region from the set. Removing the last one leaves a
    /// caret at 0.
    pub fn subtract(&mut self, region: Region) {
        self.regions.retain(|r| *r != region);
        self.repair();
    }

    /// Collapse to the first region.
    pub fn single(&mut self) {
        self.regions.truncate(1);
        self.repair();
    }

    pub fn replace_all(&mut self, regions: impl IntoIterator<Item = Region>) {
        self.regions = regions.into_iter().collect();
        self.normalize();
    }

    /// Adjust offsets after `n` characters were inserted at `p`.
    pub fn shift_insert(&mut self, p: Point, n: usize) {
        let shift = |x: Point| if x >= p { x + n } else { x };
        for r in &mut self.regions {
            *r = Region::new(shift(r.a), shift(r.b));
        }
    }

    /// Adjust offsets after `erased` was removed.
    pub fn shift_erase(&mut self, erased: Region) {
        let (s, e) = (erased.begin(), erased.end());
        let shift = |x: Point| {
            if x <= s {
                x
            } else if x >= e {
                x - (e - s)
            } else {
                s
            }
        };
        for r in &mut self.regions {
            *r = Region::new(shift(r.a), shift(r.b));
        }
    }

    /// Sort, merge overlaps and make sure at least one cursor exists.
    pub fn normalize(&mut self) {
        self.regions.sort_by_key(|r| (r.begin(), r.end()));
        let mut out: Vec<Region> = Vec::with_capacity(self.regions.len());
        for r in self.regions.drain(..) {
            match out.last_mut() {
                Some(last) if last.overlaps(&r) => *last = last.cover(&r),
                _ => out.push(r),
            }
        }
        self.regions = out;
        self.repair();
    }

    /// Every region inside `[0, size]`, sorted, with no overlaps.
    pub fn is_consistent(&self, size: usize) -> bool {
        !self.regions.is_empty()
            && self.regions.iter().all(|r| r.end() <= size)
            && self
                .regions
                .windows(2)
                .all(|w| w[0].end() <= w[1].begin() && !w[0].overlaps(&w[1]))
    }

    fn repair(&mut self) {
        if self.regions.is_empty() {
            self.regions.push(Region::caret(0));
        }
    }
}
