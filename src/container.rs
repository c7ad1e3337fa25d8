//! An in-memory surface hierarchy.

use crate::rect::Rect;
use cgmath::Vector2;
use log::trace;
use sidemenu::backend::{Attachment, Container};
use sidemenu::SurfaceId;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that may occur when changing the surface hierarchy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerError {
    #[error("surface {0:?} is not part of this stack")]
    UnknownSurface(SurfaceId),
    #[error("surface {0:?} has no parent")]
    NotAttached(SurfaceId),
    #[error("attaching {surface:?} into {into:?} would create a cycle")]
    Cycle { surface: SurfaceId, into: SurfaceId },
    #[error("the root surface cannot be detached")]
    Root,
}

#[derive(Debug)]
struct Node {
    parent: Option<SurfaceId>,
    children: Vec<SurfaceId>,
    attachment: Attachment,
    frame: Rect,
}

/// A tree of surfaces below a single root.
///
/// Children are kept in stacking order, back to front.
#[derive(Debug)]
pub struct SurfaceStack {
    root: SurfaceId,
    nodes: HashMap<SurfaceId, Node>,
}

impl SurfaceStack {
    pub fn new(size: Vector2<f64>) -> SurfaceStack {
        let root = SurfaceId::new();
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                parent: None,
                children: Vec::new(),
                attachment: Attachment::Constraints,
                frame: Rect::from_size(size),
            },
        );
        SurfaceStack { root, nodes }
    }

    pub fn root(&self) -> SurfaceId {
        self.root
    }

    pub fn contains(&self, surface: SurfaceId) -> bool {
        self.nodes.contains_key(&surface)
    }

    pub fn parent(&self, surface: SurfaceId) -> Option<SurfaceId> {
        self.nodes.get(&surface).and_then(|node| node.parent)
    }

    pub fn children(&self, surface: SurfaceId) -> &[SurfaceId] {
        self.nodes
            .get(&surface)
            .map_or(&[][..], |node| &node.children[..])
    }

    pub fn frame(&self, surface: SurfaceId) -> Option<Rect> {
        self.nodes.get(&surface).map(|node| node.frame)
    }

    pub fn set_frame(&mut self, surface: SurfaceId, frame: Rect) -> Result<(), ContainerError> {
        let size = {
            let node = self
                .nodes
                .get_mut(&surface)
                .ok_or(ContainerError::UnknownSurface(surface))?;
            let delta = frame.size - node.frame.size;
            node.frame = frame;
            delta
        };
        if size != Vector2::new(0., 0.) {
            self.resize_children(surface, size);
        }
        Ok(())
    }

    /// Propagates a size change of `surface` to its children.
    fn resize_children(&mut self, surface: SurfaceId, delta: Vector2<f64>) {
        let (bounds, children) = match self.nodes.get(&surface) {
            Some(node) => (Rect::from_size(node.frame.size), node.children.clone()),
            None => return,
        };
        for child in children {
            let child_delta = match self.nodes.get_mut(&child) {
                Some(node) => {
                    let old = node.frame.size;
                    node.frame = match node.attachment {
                        Attachment::Constraints => bounds,
                        Attachment::Autoresizing => node.frame.with_added_size(delta),
                    };
                    node.frame.size - old
                }
                None => continue,
            };
            self.resize_children(child, child_delta);
        }
    }

    fn is_ancestor(&self, ancestor: SurfaceId, mut surface: SurfaceId) -> bool {
        loop {
            if surface == ancestor {
                return true;
            }
            match self.parent(surface) {
                Some(parent) => surface = parent,
                None => return false,
            }
        }
    }

    fn remove_from_parent(&mut self, surface: SurfaceId) {
        if let Some(parent) = self.parent(surface) {
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.children.retain(|child| *child != surface);
            }
        }
    }
}

impl Container for SurfaceStack {
    type Error = ContainerError;

    /// Adds `surface` on top of the children of `into`, moving it if it already has a parent.
    fn attach(
        &mut self,
        surface: SurfaceId,
        into: SurfaceId,
        attachment: Attachment,
    ) -> Result<(), ContainerError> {
        let bounds = match self.nodes.get(&into) {
            Some(node) => Rect::from_size(node.frame.size),
            None => return Err(ContainerError::UnknownSurface(into)),
        };
        if self.is_ancestor(surface, into) {
            return Err(ContainerError::Cycle { surface, into });
        }

        self.remove_from_parent(surface);
        let node = self.nodes.entry(surface).or_insert_with(|| Node {
            parent: None,
            children: Vec::new(),
            attachment,
            frame: bounds,
        });
        node.parent = Some(into);
        node.attachment = attachment;
        node.frame = bounds;
        if let Some(parent) = self.nodes.get_mut(&into) {
            parent.children.push(surface);
        }
        trace!("attached {:?} into {:?} ({:?})", surface, into, attachment);
        Ok(())
    }

    /// Removes `surface` and everything below it.
    fn detach(&mut self, surface: SurfaceId) -> Result<(), ContainerError> {
        if surface == self.root {
            return Err(ContainerError::Root);
        }
        if !self.contains(surface) {
            return Err(ContainerError::UnknownSurface(surface));
        }
        if self.parent(surface).is_none() {
            return Err(ContainerError::NotAttached(surface));
        }
        self.remove_from_parent(surface);

        let mut pending = vec![surface];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                pending.extend(node.children);
            }
        }
        trace!("detached {:?}", surface);
        Ok(())
    }
}

/// Attaches `surface` if there is one.
pub fn load<C: Container>(
    container: &mut C,
    surface: Option<SurfaceId>,
    into: SurfaceId,
    attachment: Attachment,
) -> Result<(), C::Error> {
    match surface {
        Some(surface) => container.attach(surface, into, attachment),
        None => Ok(()),
    }
}

/// Detaches `surface` if there is one.
pub fn unload<C: Container>(container: &mut C, surface: Option<SurfaceId>) -> Result<(), C::Error> {
    match surface {
        Some(surface) => container.detach(surface),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_detach() {
        let mut stack = SurfaceStack::new(Vector2::new(320., 480.));
        let root = stack.root();
        let a = SurfaceId::new();
        let b = SurfaceId::new();

        stack.attach(a, root, Attachment::Constraints).unwrap();
        stack.attach(b, a, Attachment::Autoresizing).unwrap();
        assert_eq!(stack.children(root), &[a]);
        assert_eq!(stack.parent(b), Some(a));
        assert_eq!(stack.frame(b), Some(Rect::from_size(Vector2::new(320., 480.))));

        assert_eq!(
            stack.attach(a, b, Attachment::Constraints),
            Err(ContainerError::Cycle { surface: a, into: b })
        );

        stack.detach(a).unwrap();
        assert!(!stack.contains(b), "children go with their parent");
        assert!(stack.children(root).is_empty());
        assert_eq!(stack.detach(a), Err(ContainerError::UnknownSurface(a)));
        assert_eq!(stack.detach(root), Err(ContainerError::Root));
    }

    #[test]
    fn reattaching_moves_to_the_top() {
        let mut stack = SurfaceStack::new(Vector2::new(10., 10.));
        let root = stack.root();
        let a = SurfaceId::new();
        let b = SurfaceId::new();
        stack.attach(a, root, Attachment::Constraints).unwrap();
        stack.attach(b, root, Attachment::Constraints).unwrap();
        stack.attach(a, root, Attachment::Constraints).unwrap();
        assert_eq!(stack.children(root), &[b, a]);
    }

    #[test]
    fn resizing_follows_the_attachment() {
        let mut stack = SurfaceStack::new(Vector2::new(100., 100.));
        let root = stack.root();
        let pinned = SurfaceId::new();
        let resizing = SurfaceId::new();
        stack.attach(pinned, root, Attachment::Constraints).unwrap();
        stack.attach(resizing, root, Attachment::Autoresizing).unwrap();
        stack
            .set_frame(resizing, Rect::new((10., 0.).into(), Vector2::new(50., 100.)))
            .unwrap();

        stack
            .set_frame(root, Rect::from_size(Vector2::new(200., 120.)))
            .unwrap();
        assert_eq!(stack.frame(pinned), Some(Rect::from_size(Vector2::new(200., 120.))));
        assert_eq!(
            stack.frame(resizing),
            Some(Rect::new((10., 0.).into(), Vector2::new(150., 120.)))
        );
    }

    #[test]
    fn load_and_unload_ignore_missing_surfaces() {
        let mut stack = SurfaceStack::new(Vector2::new(10., 10.));
        let root = stack.root();
        assert_eq!(load(&mut stack, None, root, Attachment::Constraints), Ok(()));
        assert_eq!(unload(&mut stack, None), Ok(()));

        let a = SurfaceId::new();
        load(&mut stack, Some(a), root, Attachment::Constraints).unwrap();
        assert!(stack.contains(a));
        unload(&mut stack, Some(a)).unwrap();
        assert!(!stack.contains(a));
    }
}
