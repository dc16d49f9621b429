//! Predicates and searches over an in-memory scene tree.
//!
//! Every traversal is depth-first pre-order with an explicit stack, so a
//! deeply nested response cannot exhaust the call stack.

use crate::types::{ComponentProps, InstanceProps, NodeKind, NodeType, SceneNode, TextProps};

/// FRAME, GROUP, COMPONENT, COMPONENT_SET and INSTANCE nodes.
pub fn is_frame_like(node: &SceneNode) -> bool {
    matches!(
        node.kind,
        NodeKind::Frame
            | NodeKind::Group
            | NodeKind::Component(_)
            | NodeKind::ComponentSet(_)
            | NodeKind::Instance(_)
    )
}

pub fn is_text_node(node: &SceneNode) -> bool {
    as_text(node).is_some()
}

pub fn is_component(node: &SceneNode) -> bool {
    matches!(node.kind, NodeKind::Component(_))
}

pub fn is_instance(node: &SceneNode) -> bool {
    as_instance(node).is_some()
}

pub fn as_text(node: &SceneNode) -> Option<&TextProps> {
    match &node.kind {
        NodeKind::Text(text) => Some(text),
        _ => None,
    }
}

/// Component payload of a COMPONENT or COMPONENT_SET node.
pub fn as_component(node: &SceneNode) -> Option<&ComponentProps> {
    match &node.kind {
        NodeKind::Component(props) | NodeKind::ComponentSet(props) => Some(props),
        _ => None,
    }
}

pub fn as_instance(node: &SceneNode) -> Option<&InstanceProps> {
    match &node.kind {
        NodeKind::Instance(props) => Some(props),
        _ => None,
    }
}

/// Pre-order iterator over a subtree, root first.
pub struct PreOrder<'a> {
    stack: Vec<&'a SceneNode>,
}

impl<'a> PreOrder<'a> {
    pub fn new(root: &'a SceneNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a SceneNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Every node of the subtree including `root`, in depth-first pre-order.
pub fn flatten_nodes(root: &SceneNode) -> Vec<&SceneNode> {
    PreOrder::new(root).collect()
}

pub fn find_nodes_by_type(root: &SceneNode, node_type: NodeType) -> Vec<&SceneNode> {
    find_nodes(root, |node| node.node_type() == node_type)
}

/// First node with `id` in pre-order.
pub fn find_node_by_id<'a>(root: &'a SceneNode, id: &str) -> Option<&'a SceneNode> {
    PreOrder::new(root).find(|node| node.id == id)
}

/// Exact, case-sensitive name match.
pub fn find_nodes_by_name<'a>(root: &'a SceneNode, name: &str) -> Vec<&'a SceneNode> {
    find_nodes(root, |node| node.name.as_deref() == Some(name))
}

pub fn find_nodes<F>(root: &SceneNode, mut predicate: F) -> Vec<&SceneNode>
where
    F: FnMut(&SceneNode) -> bool,
{
    PreOrder::new(root).filter(|node| predicate(node)).collect()
}
