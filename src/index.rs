// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::host::{RenderTransform, TransformGroup, TranslateOf, VisualNode, WeakNode};

pub struct IconEntry<N: VisualNode> {
    element: N::Weak,
    original_x: f64,
    // Last value this crate wrote (or read at index time). The node's
    // transform is the authority, this is only our memory of it.
    pub current_shift: f64,
}

impl<N: VisualNode> IconEntry<N> {
    pub fn new(element: &N, original_x: f64, current_shift: f64) -> Self {
        IconEntry { element: element.downgrade(), original_x, current_shift }
    }

    // Position in the container at index time. Never changes afterwards.
    pub fn original_x(&self) -> f64 {
        self.original_x
    }

    pub fn is_alive(&self) -> bool {
        self.element.upgrade().is_some()
    }

    // The translation primitive the engine drives, `None` if the node is
    // gone or its transform was replaced by the host since indexing.
    pub fn translation(&self) -> Option<TranslateOf<N>> {
        let node = self.element.upgrade()?;
        driven_translation(&node)
    }
}

fn driven_translation<N: VisualNode>(node: &N) -> Option<TranslateOf<N>> {
    match node.render_transform() {
        RenderTransform::Group(group) => group.translations().pop(),
        RenderTransform::Missing | RenderTransform::Other => None,
    }
}

// Task buttons ordered left to right by `original_x`.
pub struct IconIndex<N: VisualNode> {
    entries: Vec<IconEntry<N>>,
    last_swap: Option<(usize, usize)>,
}

impl<N: VisualNode> Default for IconIndex<N> {
    fn default() -> Self {
        IconIndex { entries: Vec::new(), last_swap: None }
    }
}

impl<N: VisualNode> IconIndex<N> {
    pub fn new() -> Self {
        Self::default()
    }

    // Build from unordered entries; sorts ascending by `original_x`.
    pub fn from_entries(mut entries: Vec<IconEntry<N>>) -> Self {
        entries.sort_by(|a, b| a.original_x.total_cmp(&b.original_x));
        IconIndex { entries, last_swap: None }
    }

    pub fn replace(&mut self, fresh: IconIndex<N>) {
        *self = fresh;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&IconEntry<N>> {
        self.entries.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IconEntry<N>> {
        self.entries.iter()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [IconEntry<N>] {
        &mut self.entries
    }

    // Pair moved by the most recent successful swap on this snapshot.
    pub fn last_swap(&self) -> Option<(usize, usize)> {
        self.last_swap
    }

    pub(crate) fn set_last_swap(&mut self, pair: (usize, usize)) {
        self.last_swap = Some(pair);
    }

    pub fn positions(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.original_x).collect()
    }

    pub fn shifts(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.current_shift).collect()
    }
}

impl<'a, N: VisualNode> IntoIterator for &'a IconIndex<N> {
    type Item = &'a IconEntry<N>;
    type IntoIter = std::slice::Iter<'a, IconEntry<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
