//! Per-pass verse counting
//!
//! Counts distinct verse keys per chapter for the current ingestion pass. A key
//! repeated within one source is upserted twice but counted once, so the
//! reconciled `verse_count` matches the rows actually stored. There is no
//! decrement: sources are append/overwrite-only.

use std::collections::{BTreeMap, HashSet};

use gitartha_common::VerseKey;

#[derive(Debug, Default)]
pub struct VerseCountTracker {
    counts: BTreeMap<i32, i32>,
    seen: HashSet<VerseKey>,
}

impl VerseCountTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a written verse. Returns `false` if the key was already counted
    /// in this pass.
    pub fn increment(&mut self, key: VerseKey) -> bool {
        if !self.seen.insert(key) {
            return false;
        }
        *self.counts.entry(key.chapter).or_insert(0) += 1;
        true
    }

    pub fn contains_chapter(&self, chapter: i32) -> bool {
        self.counts.contains_key(&chapter)
    }

    /// `(chapter, count)` pairs in ascending chapter order
    pub fn counts(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.counts.iter().map(|(chapter, count)| (*chapter, *count))
    }

    /// Number of chapters touched in this pass
    pub fn chapters(&self) -> usize {
        self.counts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_creates_and_accumulates() {
        let mut tracker = VerseCountTracker::new();
        assert_eq!(tracker.chapters(), 0);

        tracker.increment(VerseKey::new(1, 1));
        tracker.increment(VerseKey::new(1, 2));
        tracker.increment(VerseKey::new(2, 1));

        let counts: Vec<(i32, i32)> = tracker.counts().collect();
        assert_eq!(counts, vec![(1, 2), (2, 1)]);
        assert_eq!(tracker.chapters(), 2);
    }

    #[test]
    fn test_duplicate_key_counted_once() {
        let mut tracker = VerseCountTracker::new();

        assert!(tracker.increment(VerseKey::new(2, 5)));
        assert!(!tracker.increment(VerseKey::new(2, 5)));
        assert_eq!(tracker.counts().collect::<Vec<_>>(), vec![(2, 1)]);
    }

    #[test]
    fn test_counts_sorted_for_non_contiguous_chapters() {
        let mut tracker = VerseCountTracker::new();
        for (chapter, verse) in [(3, 1), (1, 1), (3, 2), (2, 1), (1, 2)] {
            tracker.increment(VerseKey::new(chapter, verse));
        }

        let counts: Vec<(i32, i32)> = tracker.counts().collect();
        assert_eq!(counts, vec![(1, 2), (2, 1), (3, 2)]);
        assert!(tracker.contains_chapter(2));
        assert!(!tracker.contains_chapter(4));
    }
}
