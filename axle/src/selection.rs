// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed data-to-node binding.
//!
//! A [`Selection`] keeps one node per datum. Updating it with new data keeps the nodes of
//! surviving keys (with whatever state they carry), creates nodes for new keys and drops
//! nodes whose keys vanished, then orders the nodes like the data.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

/// Nodes of type `N` bound to data of type `D`.
#[derive(Clone, Debug)]
pub struct Selection<D, N> {
    entries: Vec<Entry<D, N>>,
}

#[derive(Clone, Debug)]
struct Entry<D, N> {
    key: String,
    datum: D,
    node: N,
}

impl<D, N> Default for Selection<D, N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<D: Clone, N> Selection<D, N> {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `data`, reusing nodes by `key` and calling `create` for new keys.
    ///
    /// When several data share a key, their nodes are matched in order.
    pub fn update(
        &mut self,
        data: &[D],
        mut create: impl FnMut(&D) -> N,
        key: impl Fn(&D) -> String,
    ) {
        let mut existing: HashMap<String, Vec<N>> = HashMap::new();
        for entry in self.entries.drain(..).rev() {
            existing.entry(entry.key).or_default().push(entry.node);
        }
        self.entries = data
            .iter()
            .map(|datum| {
                let key = key(datum);
                let node = existing
                    .get_mut(&key)
                    .and_then(Vec::pop)
                    .unwrap_or_else(|| create(datum));
                Entry {
                    key,
                    datum: datum.clone(),
                    node,
                }
            })
            .collect();
    }

    /// Calls `mutator` with every node, its datum and its index.
    pub fn each(&mut self, mut mutator: impl FnMut(&mut N, &D, usize)) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            mutator(&mut entry.node, &entry.datum, i);
        }
    }

    /// The bound keys, in data order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// The bound nodes, in data order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.entries.iter().map(|e| &e.node)
    }

    /// The bound data, in order.
    pub fn data(&self) -> impl Iterator<Item = &D> + '_ {
        self.entries.iter().map(|e| &e.datum)
    }

    /// Number of bound nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::string::ToString;

    #[derive(Debug, PartialEq)]
    struct Node {
        created_for: String,
        touched: usize,
    }

    fn update(sel: &mut Selection<&'static str, Node>, data: &[&'static str]) {
        sel.update(
            data,
            |d| Node {
                created_for: d.to_string(),
                touched: 0,
            },
            |d| d.to_string(),
        );
        sel.each(|node, _, _| node.touched += 1);
    }

    #[test]
    fn surviving_keys_keep_their_nodes() {
        let mut sel = Selection::new();
        update(&mut sel, &["a", "b", "c"]);
        update(&mut sel, &["c", "a", "d"]);
        let touched: Vec<(&str, usize)> = sel
            .nodes()
            .map(|n| (n.created_for.as_str(), n.touched))
            .collect();
        assert_eq!(touched, [("c", 2), ("a", 2), ("d", 1)]);
        assert_eq!(sel.keys().collect::<Vec<_>>(), ["c", "a", "d"]);
    }

    #[test]
    fn duplicate_keys_match_in_order() {
        let mut sel: Selection<&'static str, Node> = Selection::new();
        update(&mut sel, &["x", "x"]);
        sel.each(|node, _, i| node.touched += i * 10);
        update(&mut sel, &["x"]);
        assert_eq!(sel.len(), 1);
        assert_eq!(sel.nodes().next().map(|n| n.touched), Some(2));
    }

    #[test]
    fn each_sees_data_and_indices() {
        let mut sel: Selection<&'static str, Node> = Selection::new();
        update(&mut sel, &["p", "q"]);
        let mut seen = Vec::new();
        sel.each(|_, d, i| seen.push((*d, i)));
        assert_eq!(seen, [("p", 0), ("q", 1)]);
        assert!(!sel.is_empty());
    }
}
