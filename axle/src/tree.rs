// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree layout for grouped category labels.
//!
//! Label paths are merged into a tree whose leaves are the categories. Leaves keep their input
//! order within a group; groups keep the order in which they first appear.
//! Nodes are laid out with the Buchheim–Jünger–Leipert improvement of Walker's algorithm:
//!
//! 1. **First walk** (post-order): preliminary `x` per node. Leaves sit one unit right of
//!    their left sibling; parents are centred over their children, and subtrees are pushed
//!    apart along their contours. Shifts are recorded as modifiers and applied lazily.
//! 2. **Second walk** (pre-order): `x = prelim + sum of ancestor modifiers`, `y = depth`.
//! 3. **Third walk** (post-order): each parent is re-centred on the midpoint of its leftmost
//!    and rightmost leaves, and leaf counts are accumulated.
//!
//! [`LabelTree::resize`] then maps tree space onto screen space.
//!
//! Nodes live in an arena; parents, threads and ancestors are arena indices.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;

/// Index of the synthetic root in [`LabelTree::nodes`].
pub const ROOT: usize = 0;

/// Distance between adjacent leaves in tree space.
const DISTANCE: f64 = 1.0;

/// One node of a [`LabelTree`].
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    /// The label; empty for padding nodes and the root.
    pub label: String,
    /// Arena index of the parent, `None` for the root.
    pub parent: Option<usize>,
    /// Arena indices of the children, in order.
    pub children: Vec<usize>,
    /// Distance from the root (the root has depth 0).
    pub depth: usize,
    /// Position along the axis in tree space.
    pub x: f64,
    /// Level in tree space (equal to `depth`).
    pub y: f64,
    /// `x` mapped by [`LabelTree::resize`].
    pub screen_x: f64,
    /// `y` mapped by [`LabelTree::resize`].
    pub screen_y: f64,
    /// Number of leaf descendants; `1` for a leaf.
    pub leaf_count: usize,
    /// Tree-space `x` of the leftmost leaf of the subtree.
    pub subtree_left: f64,
    /// Tree-space `x` of the rightmost leaf of the subtree.
    pub subtree_right: f64,
    /// Index among siblings.
    number: usize,
    prelim: f64,
    modifier: f64,
    shift: f64,
    change: f64,
    thread: Option<usize>,
    ancestor: usize,
}

impl TreeNode {
    fn new(label: String, parent: Option<usize>, depth: usize, index: usize) -> Self {
        Self {
            label,
            parent,
            children: Vec::new(),
            depth,
            x: 0.0,
            y: 0.0,
            screen_x: 0.0,
            screen_y: 0.0,
            leaf_count: 0,
            subtree_left: 0.0,
            subtree_right: 0.0,
            number: 0,
            prelim: 0.0,
            modifier: 0.0,
            shift: 0.0,
            change: 0.0,
            thread: None,
            ancestor: index,
        }
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A laid-out tree of category label paths.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelTree {
    nodes: Vec<TreeNode>,
    bounds: Rect,
}

impl LabelTree {
    /// Builds and lays out the tree for `paths`.
    ///
    /// Each path runs from the outermost group to the category. Shorter paths are padded on
    /// the left with empty labels so every leaf sits at the same depth. Groups with the same
    /// label under the same parent are merged, so a group that reappears later in `paths`
    /// collects its leaves in one place. Leaves are never merged.
    pub fn from_paths<P, S>(paths: &[P]) -> Self
    where
        P: AsRef<[S]>,
        S: AsRef<str>,
    {
        let max_depth = paths.iter().map(|p| p.as_ref().len()).max().unwrap_or(0);
        let mut nodes = vec![TreeNode::new(String::new(), None, 0, ROOT)];
        for path in paths {
            let path = path.as_ref();
            let padding = max_depth - path.len();
            let segments =
                core::iter::repeat_n("", padding).chain(path.iter().map(|s| s.as_ref()));
            let mut node = ROOT;
            for (i, segment) in segments.enumerate() {
                let is_leaf = i + 1 == max_depth;
                let merge = nodes[node]
                    .children
                    .iter()
                    .copied()
                    .find(|&c| !is_leaf && nodes[c].label == segment);
                node = match merge {
                    Some(child) => child,
                    None => {
                        let index = nodes.len();
                        let number = nodes[node].children.len();
                        let mut child = TreeNode::new(String::from(segment), Some(node), i + 1, index);
                        child.number = number;
                        nodes.push(child);
                        nodes[node].children.push(index);
                        index
                    }
                };
            }
        }

        let mut tree = Self {
            nodes,
            bounds: Rect::ZERO,
        };
        tree.layout();
        tree
    }

    /// Every node; index [`ROOT`] is the root.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// The node at arena index `id`.
    pub fn node(&self, id: usize) -> &TreeNode {
        &self.nodes[id]
    }

    /// The synthetic root.
    pub fn root(&self) -> &TreeNode {
        &self.nodes[ROOT]
    }

    /// Depth of the leaves (the number of label levels).
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Arena indices of the leaves, left to right.
    pub fn leaves(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_leaf() {
                if id != ROOT {
                    out.push(id);
                }
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Tree-space bounds of all node positions.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Maps tree space onto screen space.
    ///
    /// The leftmost leaf lands on `shift_x` and the rightmost on `shift_x + width`; levels
    /// are spread over `height` starting at `shift_y`. With `flip_x` the horizontal order is
    /// mirrored.
    pub fn resize(&mut self, width: f64, height: f64, shift_x: f64, shift_y: f64, flip_x: bool) {
        let Rect { x0, y0, x1, y1 } = self.bounds;
        let scale_x = if x1 > x0 { width / (x1 - x0) } else { 1.0 };
        let scale_y = if y1 > y0 { height / (y1 - y0) } else { 1.0 };
        let span_x = (x1 - x0) * scale_x;
        for node in &mut self.nodes {
            let tx = (node.x - x0) * scale_x;
            node.screen_x = shift_x + if flip_x { span_x - tx } else { tx };
            node.screen_y = shift_y + (node.y - y0) * scale_y;
        }
    }

    fn layout(&mut self) {
        self.first_walk(ROOT);
        self.second_walk(ROOT, 0.0);
        self.third_walk(ROOT);
        let mut bounds: Option<Rect> = None;
        for node in &self.nodes {
            let r = Rect::new(node.x, node.y, node.x, node.y);
            bounds = Some(bounds.map_or(r, |b| b.union(r)));
        }
        self.bounds = bounds.unwrap_or(Rect::ZERO);
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let node = &self.nodes[v];
        let parent = node.parent?;
        node.number
            .checked_sub(1)
            .map(|i| self.nodes[parent].children[i])
    }

    fn leftmost_sibling(&self, v: usize) -> usize {
        self.nodes[v]
            .parent
            .and_then(|p| self.nodes[p].children.first().copied())
            .unwrap_or(v)
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.first().copied().or(self.nodes[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.last().copied().or(self.nodes[v].thread)
    }

    fn first_walk(&mut self, v: usize) {
        let left = self.left_sibling(v);
        let children = self.nodes[v].children.clone();
        let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
            let prelim = left.map_or(0.0, |w| self.nodes[w].prelim + DISTANCE);
            self.nodes[v].prelim = prelim;
            return;
        };

        let mut default_ancestor = first;
        for &w in &children {
            self.first_walk(w);
            default_ancestor = self.apportion(w, default_ancestor);
        }
        self.execute_shifts(v);

        let midpoint = (self.nodes[first].prelim + self.nodes[last].prelim) / 2.0;
        match left {
            Some(w) => {
                let prelim = self.nodes[w].prelim + DISTANCE;
                self.nodes[v].prelim = prelim;
                self.nodes[v].modifier = prelim - midpoint;
            }
            None => self.nodes[v].prelim = midpoint,
        }
    }

    fn apportion(&mut self, v: usize, mut default_ancestor: usize) -> usize {
        let Some(w) = self.left_sibling(v) else {
            return default_ancestor;
        };
        // Inner and outer contours on the right (p) and left (m) of the gap.
        let (mut vip, mut vop) = (v, v);
        let mut vim = w;
        let mut vom = self.leftmost_sibling(v);
        let mut sip = self.nodes[vip].modifier;
        let mut sop = self.nodes[vop].modifier;
        let mut sim = self.nodes[vim].modifier;
        let mut som = self.nodes[vom].modifier;

        while let (Some(next_im), Some(next_ip)) = (self.next_right(vim), self.next_left(vip)) {
            vim = next_im;
            vip = next_ip;
            vom = self.next_left(vom).unwrap_or(vom);
            vop = self.next_right(vop).unwrap_or(vop);
            self.nodes[vop].ancestor = v;
            let shift =
                (self.nodes[vim].prelim + sim) - (self.nodes[vip].prelim + sip) + DISTANCE;
            if shift > 0.0 {
                let ancestor = self.ancestor(vim, v, default_ancestor);
                self.move_subtree(ancestor, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.nodes[vim].modifier;
            sip += self.nodes[vip].modifier;
            som += self.nodes[vom].modifier;
            sop += self.nodes[vop].modifier;
        }

        if let Some(next) = self.next_right(vim)
            && self.next_right(vop).is_none()
        {
            self.nodes[vop].thread = Some(next);
            self.nodes[vop].modifier += sim - sop;
        }
        if let Some(next) = self.next_left(vip)
            && self.next_left(vom).is_none()
        {
            self.nodes[vom].thread = Some(next);
            self.nodes[vom].modifier += sip - som;
            default_ancestor = v;
        }
        default_ancestor
    }

    fn ancestor(&self, vim: usize, v: usize, default_ancestor: usize) -> usize {
        let candidate = self.nodes[vim].ancestor;
        if self.nodes[candidate].parent == self.nodes[v].parent {
            candidate
        } else {
            default_ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = self.nodes[wp].number.saturating_sub(self.nodes[wm].number).max(1) as f64;
        let per_subtree = shift / subtrees;
        self.nodes[wp].change -= per_subtree;
        self.nodes[wp].shift += shift;
        self.nodes[wm].change += per_subtree;
        self.nodes[wp].prelim += shift;
        self.nodes[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.nodes[v].children.len()).rev() {
            let w = self.nodes[v].children[i];
            let node = &mut self.nodes[w];
            node.prelim += shift;
            node.modifier += shift;
            change += node.change;
            shift += node.shift + change;
        }
    }

    fn second_walk(&mut self, v: usize, m: f64) {
        let node = &mut self.nodes[v];
        node.x = node.prelim + m;
        node.y = node.depth as f64;
        let m = m + node.modifier;
        for i in 0..self.nodes[v].children.len() {
            let w = self.nodes[v].children[i];
            self.second_walk(w, m);
        }
    }

    fn third_walk(&mut self, v: usize) {
        let children = self.nodes[v].children.clone();
        let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
            let node = &mut self.nodes[v];
            node.leaf_count = 1;
            node.subtree_left = node.x;
            node.subtree_right = node.x;
            return;
        };
        for &w in &children {
            self.third_walk(w);
        }
        let left = self.nodes[first].subtree_left;
        let right = self.nodes[last].subtree_right;
        let leaf_count = children.iter().map(|&w| self.nodes[w].leaf_count).sum();
        let node = &mut self.nodes[v];
        node.leaf_count = leaf_count;
        node.subtree_left = left;
        node.subtree_right = right;
        node.x = (left + right) / 2.0;
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn labels(tree: &LabelTree, ids: &[usize]) -> Vec<String> {
        ids.iter().map(|&id| tree.node(id).label.clone()).collect()
    }

    #[test]
    fn paths_merge_into_groups() {
        let tree = LabelTree::from_paths(&[["A", "1"], ["A", "2"], ["B", "1"]]);
        let root = tree.root();
        assert_eq!(labels(&tree, &root.children), ["A", "B"]);
        let a = tree.node(root.children[0]);
        let b = tree.node(root.children[1]);
        assert_eq!(labels(&tree, &a.children), ["1", "2"]);
        assert_eq!(labels(&tree, &b.children), ["1"]);
        assert_eq!(a.leaf_count, 2);
        assert_eq!(b.leaf_count, 1);
        assert_eq!(root.leaf_count, 3);
        assert_eq!(a.depth, 1);
        assert_eq!(tree.node(a.children[0]).depth, 2);
    }

    #[test]
    fn reappearing_groups_merge() {
        let tree = LabelTree::from_paths(&[["A", "1"], ["B", "1"], ["A", "2"]]);
        let root = tree.root();
        assert_eq!(labels(&tree, &root.children), ["A", "B"]);
        assert_eq!(tree.node(root.children[0]).leaf_count, 2);
        assert_eq!(labels(&tree, &tree.leaves()), ["1", "2", "1"]);
        let xs: Vec<f64> = tree.leaves().iter().map(|&id| tree.node(id).x).collect();
        assert_eq!(xs, [0.0, 1.0, 2.0]);
    }

    #[test]
    fn leaves_are_unit_spaced_and_parents_centred() {
        let tree = LabelTree::from_paths(&[["A", "1"], ["A", "2"], ["B", "1"]]);
        let xs: Vec<f64> = tree.leaves().iter().map(|&id| tree.node(id).x).collect();
        assert_eq!(xs, [0.0, 1.0, 2.0]);
        let root = tree.root();
        assert_eq!(tree.node(root.children[0]).x, 0.5);
        assert_eq!(tree.node(root.children[1]).x, 2.0);
        assert_eq!(root.x, 1.0);
    }

    #[test]
    fn short_paths_are_padded_on_the_left() {
        let paths: [&[&str]; 3] = [&["G", "x"], &["y"], &["G", "z"]];
        let tree = LabelTree::from_paths(&paths);
        let root = tree.root();
        assert_eq!(labels(&tree, &root.children), ["G", ""]);
        assert_eq!(tree.depth(), 2);
        assert_eq!(labels(&tree, &tree.leaves()), ["x", "z", "y"]);
    }

    #[test]
    fn duplicate_leaves_are_kept() {
        let tree = LabelTree::from_paths(&[["A", "1"], ["A", "1"]]);
        assert_eq!(tree.root().leaf_count, 2);
        assert_eq!(tree.node(tree.root().children[0]).children.len(), 2);
    }

    #[test]
    fn uneven_subtrees_do_not_overlap() {
        let tree = LabelTree::from_paths(&[
            ["P", "a", "1"],
            ["P", "a", "2"],
            ["P", "a", "3"],
            ["P", "b", "4"],
            ["Q", "c", "5"],
            ["Q", "d", "6"],
            ["Q", "d", "7"],
        ]);
        let xs: Vec<f64> = tree.leaves().iter().map(|&id| tree.node(id).x).collect();
        assert_eq!(xs, [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        for node in tree.nodes() {
            assert!(node.x >= node.subtree_left && node.x <= node.subtree_right, "{node:?}");
        }
    }

    #[test]
    fn resize_maps_leaves_onto_the_screen_span() {
        let mut tree = LabelTree::from_paths(&[["A", "1"], ["A", "2"], ["B", "1"]]);
        tree.resize(200.0, 40.0, 50.0, 10.0, false);
        let xs: Vec<f64> = tree.leaves().iter().map(|&id| tree.node(id).screen_x).collect();
        assert_eq!(xs, [50.0, 150.0, 250.0]);
        assert_eq!(tree.root().screen_y, 10.0);

        tree.resize(200.0, 40.0, 50.0, 10.0, true);
        let xs: Vec<f64> = tree.leaves().iter().map(|&id| tree.node(id).screen_x).collect();
        assert_eq!(xs, [250.0, 150.0, 50.0]);
    }

    #[test]
    fn empty_input_is_a_lone_root() {
        let tree = LabelTree::from_paths::<[&str; 0], &str>(&[]);
        assert_eq!(tree.nodes().len(), 1);
        assert!(tree.leaves().is_empty());
        assert_eq!(tree.root().leaf_count, 1);
    }
}
