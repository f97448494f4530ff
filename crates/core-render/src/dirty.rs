//! Dirty row tracking between frames.
//!
//! Records grid row indices touched by cell, underline or highlight
//! notifications. The painter consumes them once per frame.
//!
//! Invariants:
//! * Returned vector from `take_within` is sorted ascending and unique.
//! * After `take_within`, internal storage is cleared (one-shot consumption).

#[derive(Debug, Default)]
pub struct DirtyRowsTracker {
    rows: Vec<usize>,
}

impl DirtyRowsTracker {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn mark(&mut self, row: usize) {
        self.rows.push(row);
    }

    /// Mark an inclusive range of rows as dirty.
    pub fn mark_range(&mut self, start: usize, end_inclusive: usize) {
        if start > end_inclusive {
            return;
        }
        self.rows.extend(start..=end_inclusive);
    }

    /// Consume and return unique, sorted dirty rows below `height`.
    pub fn take_within(&mut self, height: usize) -> Vec<usize> {
        let mut v: Vec<usize> = self.rows.drain(..).filter(|r| *r < height).collect();
        v.sort_unstable();
        v.dedup();
        v
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_and_take_dedupes() {
        let mut t = DirtyRowsTracker::new();
        t.mark(3);
        t.mark(1);
        t.mark(3);
        assert_eq!(t.take_within(10), vec![1, 3]);
        assert!(t.is_empty());
    }

    #[test]
    fn rows_past_height_are_dropped() {
        let mut t = DirtyRowsTracker::new();
        t.mark_range(2, 4);
        t.mark(40);
        assert_eq!(t.take_within(4), vec![2, 3]);
        assert!(t.take_within(100).is_empty());
    }
}
