use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CandidateRange – one contiguous window of isotherm points
// ---------------------------------------------------------------------------

/// Inclusive window `[start, end]` of isotherm points with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateRange {
    pub start: usize,
    pub end: usize,
}

impl CandidateRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start < end, "range start {start} must precede end {end}");
        CandidateRange { start, end }
    }

    /// Number of experimental points inside the window.
    pub fn points(&self) -> usize {
        self.end - self.start + 1
    }

    /// Index range usable for slicing the sample columns.
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

impl fmt::Display for CandidateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// RangeGrid – one value per candidate range
// ---------------------------------------------------------------------------

/// Dense storage of a value for every candidate range of an `n`-point
/// isotherm, ordered by start then end.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeGrid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T> RangeGrid<T> {
    /// Evaluate `f` on every candidate range of an isotherm with `size`
    /// points.
    pub fn from_fn(size: usize, mut f: impl FnMut(CandidateRange) -> T) -> Self {
        let cells = ranges(size).map(&mut f).collect();
        RangeGrid { size, cells }
    }

    /// Number of isotherm points the grid was built for.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of candidate ranges, `size * (size - 1) / 2`.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, range: CandidateRange) -> Option<&T> {
        self.offset(range).map(|i| &self.cells[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (CandidateRange, &T)> + '_ {
        ranges(self.size).zip(self.cells.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.cells.iter()
    }

    fn offset(&self, range: CandidateRange) -> Option<usize> {
        let CandidateRange { start, end } = range;
        if start >= end || end >= self.size {
            return None;
        }
        // Rows before `start` hold (size-1) + (size-2) + ... + (size-start) cells.
        let before = start * (2 * self.size - start - 1) / 2;
        Some(before + (end - start - 1))
    }
}

impl<T> std::ops::Index<CandidateRange> for RangeGrid<T> {
    type Output = T;

    fn index(&self, range: CandidateRange) -> &T {
        match self.get(range) {
            Some(v) => v,
            None => panic!("range {range} outside grid of {} points", self.size),
        }
    }
}

/// Every candidate range of an isotherm with `size` points.
pub fn ranges(size: usize) -> impl Iterator<Item = CandidateRange> {
    (0..size).flat_map(move |start| (start + 1..size).map(move |end| CandidateRange { start, end }))
}
