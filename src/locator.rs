// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

// ── Visual Tree Walk ────────────────────────────────

use log::{debug, info};

use crate::config::Settings;
use crate::host::{RenderTransform, TransformGroup, TranslateOf, Translation, VisualNode};
use crate::index::{IconEntry, IconIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch<'a> {
    Exact(&'a str),
    Partial(&'a str),
}

impl NameMatch<'_> {
    pub fn matches(&self, type_name: &str) -> bool {
        match *self {
            NameMatch::Exact(want) => type_name == want,
            NameMatch::Partial(want) => type_name.contains(want),
        }
    }

    fn matches_node<N: VisualNode>(&self, node: &N) -> bool {
        node.type_name().is_some_and(|name| self.matches(&name))
    }
}

// Call `f` on each direct child of `node` until it returns `true`; that
// child is returned. Children that fail the element cast are skipped.
pub fn enum_children<N, F>(node: &N, mut f: F) -> Option<N>
where
    N: VisualNode,
    F: FnMut(&N) -> bool,
{
    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .find(|child| f(child))
}

// Depth-first, pre-order search below `root` (root itself excluded).
// First hit wins.
pub fn locate<N: VisualNode>(root: &N, name: NameMatch<'_>) -> Option<N> {
    let mut hit = None;
    enum_children(root, |child| {
        if name.matches_node(child) {
            hit = Some(child.clone());
            return true;
        }
        hit = locate(child, name);
        hit.is_some()
    });
    hit
}

// Find or create the translation this crate drives on `node`.
// The node ends up with a transform group as its render transform. A
// transform the host set before is kept inside that group; only a missing
// translation gets appended.
pub fn ensure_translation<N: VisualNode>(node: &N) -> Option<TranslateOf<N>> {
    let group = match node.render_transform() {
        RenderTransform::Group(group) => group,
        RenderTransform::Missing | RenderTransform::Other => node.wrap_render_transform()?,
    };
    match group.translations().pop() {
        Some(t) => Some(t),
        None => Some(group.append_translation()),
    }
}

// Index every task button under `root`, left to right.
// The search is narrowed to the button repeater when one of the known
// container classes is present, otherwise the whole frame is walked.
pub fn collect_icons<N: VisualNode>(root: &N, settings: &Settings) -> IconIndex<N> {
    let container = settings
        .container_candidates()
        .into_iter()
        .find_map(|candidate| locate(root, NameMatch::Partial(candidate)));

    let marker = NameMatch::Partial(&settings.icon_marker);
    let mut entries = Vec::new();
    match &container {
        Some(c) => {
            debug!("collect_icons: container {:?}", c.type_name().unwrap_or_default());
            collect_into(c, root, marker, &mut entries);
        }
        None => {
            debug!("collect_icons: no container, walking whole frame");
            collect_into(root, root, marker, &mut entries);
        }
    }

    let index = IconIndex::from_entries(entries);
    info!("Found {} icons", index.len());
    index
}

fn collect_into<N: VisualNode>(
    node: &N,
    space: &N,
    marker: NameMatch<'_>,
    out: &mut Vec<IconEntry<N>>,
) {
    if marker.matches_node(node) {
        if let Some(entry) = index_icon(node, space) {
            out.push(entry);
        }
    }
    // Buttons nest inside buttons in some host builds, keep descending.
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            collect_into(&child, space, marker, out);
        }
    }
}

fn index_icon<N: VisualNode>(node: &N, space: &N) -> Option<IconEntry<N>> {
    let x = node.offset_x_in(space).filter(|x| x.is_finite())?;
    let translate = ensure_translation(node)?;
    Some(IconEntry::new(node, x, translate.x()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::{taskbar, Node, TranslateState, Xform};
    use std::rc::Rc;

    #[test]
    fn partial_match_on_button_panel() {
        let m = NameMatch::Partial("TaskListButton");
        assert!(m.matches("Taskbar.TaskListButtonPanel"));
        assert!(!m.matches("Taskbar.TaskbarFrame"));
        assert!(NameMatch::Exact("Taskbar.TaskbarFrame").matches("Taskbar.TaskbarFrame"));
        assert!(!NameMatch::Exact("Taskbar.Taskbar").matches("Taskbar.TaskbarFrame"));
    }

    #[test]
    fn locate_is_preorder_and_skips_opaque_children() {
        let deep = Node::new("Target.Deep", 0.0);
        let shallow = Node::new("Target.Shallow", 0.0);
        let root = Node::new("Root", 0.0);
        root.push_opaque();
        root.push(Node::anonymous(0.0).with(vec![deep.clone()]));
        root.push(shallow);

        let found = locate(&root, NameMatch::Partial("Target")).unwrap();
        assert!(Rc::ptr_eq(&found.0, &deep.0));
    }

    #[test]
    fn locate_excludes_root_and_handles_leaves() {
        let root = Node::new("Target.Root", 0.0);
        assert!(locate(&root, NameMatch::Partial("Target")).is_none());
    }

    #[test]
    fn collect_sorts_by_position() {
        let (frame, _) = taskbar(&[90.0, 10.0, 50.0]);
        let index = collect_icons(&frame, &Settings::default());
        assert_eq!(index.positions(), vec![10.0, 50.0, 90.0]);
        assert_eq!(index.shifts(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn collect_positions_are_relative_to_root() {
        let frame = Node::new("Taskbar.TaskbarFrame", 100.0);
        let host = Node::new("Taskbar.TaskbarItemHost", 20.0);
        host.push(Node::new("Taskbar.TaskListButton", 5.0));
        frame.push(host);
        let index = collect_icons(&frame, &Settings::default());
        assert_eq!(index.positions(), vec![25.0]);
    }

    #[test]
    fn collect_restricts_to_container() {
        let (frame, _) = taskbar(&[10.0, 50.0]);
        // Outside the repeater, must be ignored.
        frame.push(Node::new("Taskbar.TaskListButton", 500.0));
        let index = collect_icons(&frame, &Settings::default());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn collect_without_container_walks_whole_tree() {
        let frame = Node::new("Taskbar.TaskbarFrame", 0.0).with(vec![
            Node::new("Grid", 0.0).with(vec![Node::new("Taskbar.TaskListButton", 30.0)]),
            Node::new("Taskbar.TaskListButton", 70.0),
        ]);
        let index = collect_icons(&frame, &Settings::default());
        assert_eq!(index.positions(), vec![30.0, 70.0]);
    }

    #[test]
    fn empty_container_yields_empty_index() {
        let (frame, _) = taskbar(&[]);
        let index = collect_icons(&frame, &Settings::default());
        assert!(index.is_empty());
    }

    #[test]
    fn existing_transform_is_kept_inside_group() {
        let button = Node::new("Taskbar.TaskListButton", 0.0);
        button.set_transform(Xform::Scale);
        ensure_translation(&button).unwrap();

        match button.transform() {
            Some(Xform::Group(g)) => {
                let children = g.borrow();
                assert_eq!(children.len(), 2);
                assert!(matches!(children[0], Xform::Scale));
                assert!(matches!(children[1], Xform::Translate(_)));
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn existing_translation_is_reused() {
        let button = Node::new("Taskbar.TaskListButton", 0.0);
        let state = Rc::new(TranslateState::default());
        state.x.set(12.0);
        let group = Rc::new(std::cell::RefCell::new(vec![Xform::Scale, Xform::Translate(state)]));
        button.set_transform(Xform::Group(group.clone()));

        let t = ensure_translation(&button).unwrap();
        assert_eq!(t.x(), 12.0);
        assert_eq!(group.borrow().len(), 2);

        // Indexing twice must not stack translations.
        ensure_translation(&button).unwrap();
        assert_eq!(group.borrow().len(), 2);
    }

    #[test]
    fn index_remembers_current_shift() {
        let (frame, repeater) = taskbar(&[10.0, 50.0]);
        let first = collect_icons(&frame, &Settings::default());
        first.get(0).unwrap().translation().unwrap().set_x(40.0);
        drop(first);

        let again = collect_icons(&frame, &Settings::default());
        assert_eq!(again.shifts(), vec![40.0, 0.0]);
        assert_eq!(repeater.child_count(), 2);
    }

    #[test]
    fn non_finite_position_is_not_indexed() {
        let (frame, repeater) = taskbar(&[30.0, 10.0]);
        repeater.push(Node::new("Taskbar.TaskListButton", f64::NAN));
        repeater.push(Node::new("Taskbar.TaskListButton", f64::INFINITY));
        let index = collect_icons(&frame, &Settings::default());
        assert_eq!(index.positions(), vec![10.0, 30.0]);
        // Skipped buttons keep their transform untouched.
        assert!(repeater.child(2).unwrap().transform().is_none());
    }
}
