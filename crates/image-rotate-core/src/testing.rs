//! In-memory host used by the unit tests.
//!
//! Models just enough layout for the geometry code: an image's layout box
//! is its intrinsic size shifted by its inline margin, and a
//! `rotate(Ndeg)` transform turns the rendered box about its center.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{Result, RotateError};
use crate::geometry::{Rect, ScrollOffset, Size};
use crate::host::{Dom, Editor, Listener, ListenerTarget};
use crate::rotation::Rotation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
struct FakeNode {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    styles: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    /// Layout position (images) or full rect (everything else)
    rect: Rect,
    intrinsic: Size,
    scroll: ScrollOffset,
}

impl FakeNode {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            styles: BTreeMap::new(),
            attributes: BTreeMap::new(),
            rect: Rect::default(),
            intrinsic: Size::default(),
            scroll: ScrollOffset::default(),
        }
    }
}

/// Observable state, for before/after comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    nodes: Vec<FakeNode>,
    listeners: Vec<Listener<NodeId>>,
}

#[derive(Debug)]
pub struct FakeHost {
    nodes: Vec<FakeNode>,
    listeners: Vec<Listener<NodeId>>,
    /// Synchronous synthetic clicks, in order
    pub clicks: Vec<NodeId>,
    /// Pending refocus timers
    pub timers: Vec<(NodeId, Duration)>,
    /// Images whose embeds were deleted
    pub deleted: Vec<NodeId>,
    pub selection_clears: usize,
    /// Fail the next `create_element` call
    pub fail_create: bool,
}

const HTML: NodeId = NodeId(0);
const CONTAINER: NodeId = NodeId(1);
const ROOT: NodeId = NodeId(2);

impl FakeHost {
    /// `<html>` containing a container at (10, 20) holding the editor root.
    pub fn new() -> Self {
        let mut host = Self {
            nodes: vec![FakeNode::new("html"), FakeNode::new("div"), FakeNode::new("div")],
            listeners: Vec::new(),
            clicks: Vec::new(),
            timers: Vec::new(),
            deleted: Vec::new(),
            selection_clears: 0,
            fail_create: false,
        };
        host.link(HTML, CONTAINER);
        host.link(CONTAINER, ROOT);
        host.nodes[CONTAINER.0].rect = Rect::new(10.0, 20.0, 800.0, 600.0);
        host.nodes[ROOT.0].rect = Rect::new(10.0, 20.0, 800.0, 600.0);
        host
    }

    /// Append an image to the editor root, laid out below the previous one.
    pub fn add_image(&mut self, width: f64, height: f64) -> NodeId {
        let top = 40.0 + 300.0 * self.images().len() as f64;
        let id = self.push(FakeNode::new("img"));
        self.nodes[id.0].intrinsic = Size::new(width, height);
        self.nodes[id.0].rect = Rect::new(60.0, top, width, height);
        self.link(ROOT, id);
        id
    }

    /// Append a paragraph to the editor root.
    pub fn add_paragraph(&mut self) -> NodeId {
        let id = self.push(FakeNode::new("p"));
        self.link(ROOT, id);
        id
    }

    pub fn set_scroll(&mut self, node: NodeId, left: f64, top: f64) {
        self.nodes[node.0].scroll = ScrollOffset::new(left, top);
    }

    /// Detach a node from its parent.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    pub fn tag(&self, node: &NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    pub fn has_listener(&self, listener: &Listener<NodeId>) -> bool {
        self.listeners.contains(listener)
    }

    pub fn listener_count(&self, listener: &Listener<NodeId>) -> usize {
        self.listeners.iter().filter(|l| *l == listener).count()
    }

    /// Listeners on the document and the editor root.
    pub fn document_level_listeners(&self) -> usize {
        self.listeners
            .iter()
            .filter(|l| !matches!(l.target, ListenerTarget::Element(_)))
            .count()
    }

    /// Drain pending refocus timers.
    pub fn fire_timers(&mut self) -> Vec<NodeId> {
        self.timers.drain(..).map(|(node, _)| node).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            listeners: self.listeners.clone(),
        }
    }

    fn images(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|id| self.nodes[id.0].tag == "img")
            .collect()
    }

    fn push(&mut self, node: FakeNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn margin(&self, node: NodeId) -> (f64, f64) {
        let Some(margin) = self.nodes[node.0].styles.get("margin") else {
            return (0.0, 0.0);
        };
        let parts: Vec<f64> = margin
            .split_whitespace()
            .filter_map(|part| part.trim_end_matches("px").parse().ok())
            .collect();
        match parts.as_slice() {
            [y, x] => (*x, *y),
            [all] => (*all, *all),
            _ => (0.0, 0.0),
        }
    }

    fn rotation(&self, node: NodeId) -> Rotation {
        let degrees = self.nodes[node.0]
            .styles
            .get("transform")
            .and_then(|t| t.strip_prefix("rotate("))
            .and_then(|t| t.strip_suffix("deg)"))
            .map(|t| t.to_string());
        Rotation::from_attribute(degrees.as_deref())
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for FakeHost {
    type Node = NodeId;

    fn is_image(&self, node: &NodeId) -> bool {
        self.nodes[node.0].tag == "img"
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        let mut current = *node;
        loop {
            if current == HTML {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn document_element(&self) -> NodeId {
        HTML
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId> {
        if std::mem::take(&mut self.fail_create) {
            return Err(RotateError::Host(format!("cannot create <{}>", tag)));
        }
        Ok(self.push(FakeNode::new(tag)))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<()> {
        self.link(*parent, *child);
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<()> {
        if self.nodes[child.0].parent != Some(*parent) {
            return Err(RotateError::Host("not a child".into()));
        }
        self.detach(*child);
        Ok(())
    }

    fn first_element_child(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].children.first().copied()
    }

    fn set_inner_html(&mut self, node: &NodeId, html: &str) {
        for child in self.children(node) {
            self.detach(child);
        }
        let tag: String = html
            .trim_start()
            .trim_start_matches('<')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        if !tag.is_empty() {
            let child = self.push(FakeNode::new(&tag));
            self.link(*node, child);
        }
    }

    fn style(&self, node: &NodeId, property: &str) -> String {
        self.nodes[node.0]
            .styles
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) -> Result<()> {
        let styles = &mut self.nodes[node.0].styles;
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_style(&mut self, node: &NodeId, property: &str) -> Result<()> {
        self.nodes[node.0].styles.remove(property);
        Ok(())
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes[node.0].attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<()> {
        self.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        let fake = &self.nodes[node.0];
        if fake.tag != "img" {
            return fake.rect;
        }

        let (mx, my) = self.margin(*node);
        let layout = Rect::new(
            fake.rect.left + mx,
            fake.rect.top + my,
            fake.intrinsic.width,
            fake.intrinsic.height,
        );
        let rendered = if self.rotation(*node).is_quarter_turn() {
            fake.intrinsic.transposed()
        } else {
            fake.intrinsic
        };
        let cx = layout.left + layout.width / 2.0;
        let cy = layout.top + layout.height / 2.0;
        Rect::new(
            cx - rendered.width / 2.0,
            cy - rendered.height / 2.0,
            rendered.width,
            rendered.height,
        )
    }

    fn intrinsic_size(&self, image: &NodeId) -> Size {
        self.nodes[image.0].intrinsic
    }

    fn scroll_offset(&self, node: &NodeId) -> ScrollOffset {
        self.nodes[node.0].scroll
    }

    fn click(&mut self, node: &NodeId) {
        self.clicks.push(*node);
    }

    fn refocus_later(&mut self, image: &NodeId, delay: Duration) {
        self.timers.push((*image, delay));
    }

    fn listen(&mut self, listener: &Listener<NodeId>) -> Result<()> {
        self.listeners.push(listener.clone());
        Ok(())
    }

    fn unlisten(&mut self, listener: &Listener<NodeId>) -> Result<()> {
        // removeEventListener ignores unknown handlers
        if let Some(pos) = self.listeners.iter().position(|l| l == listener) {
            self.listeners.remove(pos);
        }
        Ok(())
    }
}

impl Editor for FakeHost {
    fn root(&self) -> NodeId {
        ROOT
    }

    fn container(&self) -> NodeId {
        CONTAINER
    }

    fn clear_selection(&mut self) -> Result<()> {
        self.selection_clears += 1;
        Ok(())
    }

    fn delete_embed(&mut self, node: &NodeId) -> Result<()> {
        self.deleted.push(*node);
        self.detach(*node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotated_image_recenters_with_margin() {
        let mut host = FakeHost::new();
        let img = host.add_image(200.0, 100.0);
        assert_eq!(host.bounding_rect(&img), Rect::new(60.0, 40.0, 200.0, 100.0));

        host.set_style(&img, "transform", "rotate(90deg)").unwrap();
        assert_eq!(host.bounding_rect(&img), Rect::new(110.0, -10.0, 100.0, 200.0));

        host.set_style(&img, "margin", "50px -50px").unwrap();
        assert_eq!(host.bounding_rect(&img), Rect::new(60.0, 40.0, 100.0, 200.0));
    }

    #[test]
    fn test_connectivity() {
        let mut host = FakeHost::new();
        let img = host.add_image(10.0, 10.0);
        assert!(host.is_connected(&img));
        host.detach(img);
        assert!(!host.is_connected(&img));
    }
}
