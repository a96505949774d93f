// Taskswap — Visual Icon Swapping for the Windows Taskbar
// Copyright (C) 2026  Taskswap contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

/// A one-axis translation primitive inside a node's render transform.
pub trait Translation {
    fn x(&self) -> f64;
    fn set_x(&self, x: f64);
}

pub trait TransformGroup {
    type Translate: Translation;

    fn translations(&self) -> Vec<Self::Translate>;

    /// Append a new zero translation after all existing children.
    fn append_translation(&self) -> Self::Translate;
}

/// What a node currently has programmed as its render transform.
pub enum RenderTransform<G> {
    Missing,
    Group(G),
    Other,
}

pub trait WeakNode {
    type Node;

    /// `None` once the host destroyed the node.
    fn upgrade(&self) -> Option<Self::Node>;
}

/// A live node in the host's visual tree.
pub trait VisualNode: Clone {
    type Weak: WeakNode<Node = Self>;
    type Group: TransformGroup;

    /// Runtime class name, `None` if the node does not expose one.
    fn type_name(&self) -> Option<String>;

    fn child_count(&self) -> usize;

    /// `None` when the child at `index` is gone or is not a framework
    /// element.
    fn child(&self, index: usize) -> Option<Self>;

    fn downgrade(&self) -> Self::Weak;

    fn render_transform(&self) -> RenderTransform<Self::Group>;

    /// Install a fresh transform group as the render transform. A transform
    /// that was set before becomes the group's first child.
    fn wrap_render_transform(&self) -> Option<Self::Group>;

    /// Horizontal position of the node's origin in `ancestor`'s coordinate
    /// space.
    fn offset_x_in(&self, ancestor: &Self) -> Option<f64>;
}

pub type TranslateOf<N> = <<N as VisualNode>::Group as TransformGroup>::Translate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDevice {
    Mouse,
    Touch,
    Pen,
}

/// Pointer-pressed event arguments as delivered to the frame.
pub trait PointerEvent<N> {
    fn device(&self) -> Option<PointerDevice>;

    /// Middle button state of the current point, evaluated relative to
    /// `relative_to`.
    fn is_middle_pressed(&self, relative_to: &N) -> bool;
}

// ── Synthetic Tree (Tests) ──────────────────────────

#[cfg(test)]
pub mod mock {
    // In-memory visual tree with the same failure modes as the host:
    // nodes can be destroyed, children can refuse to cast.

    use std::cell::{Cell, RefCell};
    use std::rc::{Rc, Weak};

    use super::*;

    #[derive(Debug, Default)]
    pub struct TranslateState {
        pub x: Cell<f64>,
    }

    #[derive(Debug, Clone)]
    pub enum Xform {
        Translate(Rc<TranslateState>),
        Scale,
        Group(Rc<RefCell<Vec<Xform>>>),
    }

    #[derive(Debug)]
    pub struct NodeData {
        pub name: Option<String>,
        pub x: f64,
        pub children: RefCell<Vec<Option<Node>>>,
        pub transform: RefCell<Option<Xform>>,
        pub parent: RefCell<Weak<NodeData>>,
    }

    #[derive(Debug, Clone)]
    pub struct Node(pub Rc<NodeData>);

    #[derive(Debug, Clone)]
    pub struct WeakRef(Weak<NodeData>);

    #[derive(Debug, Clone)]
    pub struct Translate(pub Rc<TranslateState>);

    #[derive(Debug, Clone)]
    pub struct Group(pub Rc<RefCell<Vec<Xform>>>);

    impl Node {
        fn build(name: Option<String>, x: f64) -> Self {
            Node(Rc::new(NodeData {
                name,
                x,
                children: RefCell::new(Vec::new()),
                transform: RefCell::new(None),
                parent: RefCell::new(Weak::new()),
            }))
        }

        pub fn new(name: &str, x: f64) -> Self {
            Node::build(Some(name.to_string()), x)
        }

        pub fn anonymous(x: f64) -> Self {
            Node::build(None, x)
        }

        pub fn with(self, children: Vec<Node>) -> Self {
            for child in children {
                self.push(child);
            }
            self
        }

        pub fn push(&self, child: Node) {
            *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
            self.0.children.borrow_mut().push(Some(child));
        }

        /// A child slot that fails the framework-element cast.
        pub fn push_opaque(&self) {
            self.0.children.borrow_mut().push(None);
        }

        /// Drop every strong reference the tree holds to the child at
        /// `index`, the way the host destroys a closed task button.
        pub fn remove(&self, index: usize) -> Node {
            self.0.children.borrow_mut().remove(index).unwrap()
        }

        pub fn set_transform(&self, xform: Xform) {
            *self.0.transform.borrow_mut() = Some(xform);
        }

        pub fn transform(&self) -> Option<Xform> {
            self.0.transform.borrow().clone()
        }

        pub fn shift(&self) -> f64 {
            match self.render_transform() {
                RenderTransform::Group(g) => g.translations().last().map(|t| t.x()).unwrap_or(0.0),
                _ => 0.0,
            }
        }

        fn absolute_x(&self) -> f64 {
            let mut x = self.0.x;
            let mut parent = self.0.parent.borrow().upgrade();
            while let Some(p) = parent {
                x += p.x;
                parent = p.parent.borrow().upgrade();
            }
            x
        }
    }

    impl WeakNode for WeakRef {
        type Node = Node;
        fn upgrade(&self) -> Option<Node> {
            self.0.upgrade().map(Node)
        }
    }

    impl Translation for Translate {
        fn x(&self) -> f64 {
            self.0.x.get()
        }
        fn set_x(&self, x: f64) {
            self.0.x.set(x);
        }
    }

    impl TransformGroup for Group {
        type Translate = Translate;

        fn translations(&self) -> Vec<Translate> {
            self.0
                .borrow()
                .iter()
                .filter_map(|x| match x {
                    Xform::Translate(t) => Some(Translate(t.clone())),
                    _ => None,
                })
                .collect()
        }

        fn append_translation(&self) -> Translate {
            let t = Rc::new(TranslateState::default());
            self.0.borrow_mut().push(Xform::Translate(t.clone()));
            Translate(t)
        }
    }

    impl VisualNode for Node {
        type Weak = WeakRef;
        type Group = Group;

        fn type_name(&self) -> Option<String> {
            self.0.name.clone()
        }

        fn child_count(&self) -> usize {
            self.0.children.borrow().len()
        }

        fn child(&self, index: usize) -> Option<Node> {
            self.0.children.borrow().get(index).cloned().flatten()
        }

        fn downgrade(&self) -> WeakRef {
            WeakRef(Rc::downgrade(&self.0))
        }

        fn render_transform(&self) -> RenderTransform<Group> {
            match &*self.0.transform.borrow() {
                None => RenderTransform::Missing,
                Some(Xform::Group(g)) => RenderTransform::Group(Group(g.clone())),
                Some(_) => RenderTransform::Other,
            }
        }

        fn wrap_render_transform(&self) -> Option<Group> {
            let previous = self.0.transform.borrow_mut().take();
            let children: Vec<Xform> = previous.into_iter().collect();
            let group = Rc::new(RefCell::new(children));
            *self.0.transform.borrow_mut() = Some(Xform::Group(group.clone()));
            Some(Group(group))
        }

        fn offset_x_in(&self, ancestor: &Node) -> Option<f64> {
            Some(self.absolute_x() - ancestor.absolute_x())
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub struct Press {
        pub device: Option<PointerDevice>,
        pub middle: bool,
    }

    impl Press {
        pub fn left() -> Self {
            Press { device: Some(PointerDevice::Mouse), middle: false }
        }
        pub fn middle() -> Self {
            Press { device: Some(PointerDevice::Mouse), middle: true }
        }
        pub fn touch() -> Self {
            Press { device: Some(PointerDevice::Touch), middle: false }
        }
    }

    impl PointerEvent<Node> for Press {
        fn device(&self) -> Option<PointerDevice> {
            self.device
        }
        fn is_middle_pressed(&self, _relative_to: &Node) -> bool {
            self.middle
        }
    }

    /// `Taskbar.TaskbarFrame` holding a repeater with one button per x.
    pub fn taskbar(xs: &[f64]) -> (Node, Node) {
        let repeater = Node::new("Taskbar.TaskbarFrameRepeater", 0.0);
        for &x in xs {
            repeater.push(Node::new("Taskbar.TaskListButton", x).with(vec![
                Node::new("Windows.UI.Xaml.Controls.Grid", 0.0),
            ]));
        }
        let frame = Node::new("Taskbar.TaskbarFrame", 0.0)
            .with(vec![Node::new("Windows.UI.Xaml.Controls.Grid", 0.0)]);
        frame.push(repeater.clone());
        (frame, repeater)
    }
}
