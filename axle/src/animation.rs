// Copyright 2025 the Axle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The animation collaborator interface.
//!
//! The axis describes transitions; tweening and timing belong to the host.

use alloc::string::String;
use alloc::vec::Vec;

use crate::diff::UpdateDiff;

/// Whether a tick entered, left, or stayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodePhase {
    /// The tick is new this frame.
    Added,
    /// The tick disappeared this frame.
    Removed,
    /// The tick exists in both frames.
    Updated,
}

/// The animatable properties of a tick, its mark and its label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeProperties {
    /// Position along the axis.
    pub translation: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

/// How one tick should move between frames.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeTransition {
    /// The tick id.
    pub id: String,
    /// What happened to the tick.
    pub phase: NodePhase,
    /// Properties at the start of the transition.
    pub from: NodeProperties,
    /// Properties at the end of the transition.
    pub to: NodeProperties,
}

/// Everything an axis asks the animation collaborator to do for one update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisTransition {
    /// Which tick ids were added and removed.
    pub diff: UpdateDiff,
    /// Per-tick transitions, removed ticks last.
    pub nodes: Vec<NodeTransition>,
}

/// Receives axis transitions.
pub trait AnimationManager {
    /// When `true`, records snap to their final state and no transition is requested.
    fn is_skipped(&self) -> bool;

    /// Requests a transition.
    fn animate(&mut self, transition: AxisTransition);
}

/// An [`AnimationManager`] that never animates.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkipAnimation;

impl AnimationManager for SkipAnimation {
    fn is_skipped(&self) -> bool {
        true
    }

    fn animate(&mut self, _transition: AxisTransition) {}
}
