// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick id diffs between frames.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;

/// Which tick ids appeared and disappeared between two frames.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateDiff {
    /// Whether anything was added or removed.
    pub changed: bool,
    /// Ids present only in the new frame, in new-frame order.
    pub added: Vec<String>,
    /// Ids present only in the previous frame, in previous-frame order.
    pub removed: Vec<String>,
}

impl UpdateDiff {
    /// Aligns `previous` and `next` positionally.
    ///
    /// Where the ids at a position differ, the new id counts as added and the old one as
    /// removed, unless the same id was already seen on the other side. An id that is both
    /// added and removed has moved and is reported in neither list.
    pub fn between<P, N>(previous: &[P], next: &[N]) -> Self
    where
        P: AsRef<str>,
        N: AsRef<str>,
    {
        let mut added = KeyedSet::default();
        let mut removed = KeyedSet::default();
        for i in 0..previous.len().max(next.len()) {
            let prev = previous.get(i).map(AsRef::as_ref);
            let tick = next.get(i).map(AsRef::as_ref);
            if prev == tick {
                continue;
            }
            if let Some(tick) = tick
                && !removed.remove(tick)
            {
                added.insert(tick);
            }
            if let Some(prev) = prev
                && !added.remove(prev)
            {
                removed.insert(prev);
            }
        }
        let added = added.into_vec();
        let removed = removed.into_vec();
        Self {
            changed: !added.is_empty() || !removed.is_empty(),
            added,
            removed,
        }
    }
}

/// An insertion-ordered set of ids.
#[derive(Debug, Default)]
struct KeyedSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl KeyedSet {
    fn insert(&mut self, id: &str) {
        if self.members.insert(String::from(id)) {
            self.order.push(String::from(id));
        }
    }

    fn remove(&mut self, id: &str) -> bool {
        if self.members.remove(id) {
            self.order.retain(|o| o != id);
            true
        } else {
            false
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moved_ids_are_neither_added_nor_removed() {
        let diff = UpdateDiff::between(&["a", "b", "c"], &["a", "c", "d"]);
        assert_eq!(diff.added, ["d"]);
        assert_eq!(diff.removed, ["b"]);
        assert!(diff.changed);
    }

    #[test]
    fn identical_frames_are_unchanged() {
        let diff = UpdateDiff::between(&["a", "b"], &["a", "b"]);
        assert_eq!(diff, UpdateDiff::default());
    }

    #[test]
    fn growing_and_shrinking() {
        let grown = UpdateDiff::between::<&str, &str>(&[], &["x", "y"]);
        assert_eq!(grown.added, ["x", "y"]);
        assert!(grown.removed.is_empty());

        let shrunk = UpdateDiff::between::<&str, &str>(&["x", "y"], &["x"]);
        assert_eq!(shrunk.removed, ["y"]);
        assert!(shrunk.added.is_empty());
    }

    #[test]
    fn pure_reorder_reports_no_change() {
        let diff = UpdateDiff::between(&["a", "b", "c"], &["c", "a", "b"]);
        assert!(!diff.changed, "{diff:?}");
    }
}
