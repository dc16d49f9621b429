//! Positions, sizes and parent chains.
//!
//! Deserialized trees have no back-pointers, so parent lookups go through a
//! [`NodeIndex`] built once per tree, or through an id → record map for data
//! that arrives already flattened.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{FigmaError, Result};
use crate::types::SceneNode;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy)]
struct IndexEntry<'a> {
    node: &'a SceneNode,
    parent: Option<usize>,
    depth: usize,
}

/// Arena of a tree's nodes with parent slots and an id lookup.
///
/// When ids repeat, lookups resolve to the first occurrence in pre-order.
#[derive(Debug, Clone)]
pub struct NodeIndex<'a> {
    entries: Vec<IndexEntry<'a>>,
    by_id: HashMap<&'a str, usize>,
}

impl<'a> NodeIndex<'a> {
    pub fn build(root: &'a SceneNode) -> Self {
        let mut entries = Vec::new();
        let mut by_id = HashMap::new();
        let mut stack: Vec<(&'a SceneNode, Option<usize>, usize)> = vec![(root, None, 0)];

        while let Some((node, parent, depth)) = stack.pop() {
            let slot = entries.len();
            entries.push(IndexEntry {
                node,
                parent,
                depth,
            });
            by_id.entry(node.id.as_str()).or_insert(slot);
            for child in node.children.iter().rev() {
                stack.push((child, Some(slot), depth + 1));
            }
        }

        Self { entries, by_id }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&'a SceneNode> {
        self.slot(id).map(|slot| self.entries[slot].node)
    }

    pub fn parent(&self, id: &str) -> Option<&'a SceneNode> {
        let parent = self.entries[self.slot(id)?].parent?;
        Some(self.entries[parent].node)
    }

    pub fn depth(&self, id: &str) -> Option<usize> {
        self.slot(id).map(|slot| self.entries[slot].depth)
    }

    /// Ancestors of `id`, nearest first. Empty for the root or unknown ids.
    pub fn ancestors(&self, id: &str) -> Vec<&'a SceneNode> {
        let mut out = Vec::new();
        let mut current = self.slot(id).and_then(|slot| self.entries[slot].parent);
        while let Some(slot) = current {
            out.push(self.entries[slot].node);
            current = self.entries[slot].parent;
        }
        out
    }

    /// id → parent record map, the input shape of [`calculate_node_depth`].
    pub fn parent_map(&self) -> HashMap<String, NodeRecord> {
        self.by_id
            .iter()
            .map(|(id, slot)| {
                let parent_id = self.entries[*slot]
                    .parent
                    .map(|p| self.entries[p].node.id.clone());
                (id.to_string(), NodeRecord { parent_id })
            })
            .collect()
    }

    /// Ancestors of this exact node, nearest first. Unlike [`Self::ancestors`]
    /// this stays correct when the node's id is repeated elsewhere in the tree.
    pub fn ancestors_of(&self, node: &SceneNode) -> Vec<&'a SceneNode> {
        let mut out = Vec::new();
        let mut current = self
            .slot_of(node)
            .and_then(|slot| self.entries[slot].parent);
        while let Some(slot) = current {
            out.push(self.entries[slot].node);
            current = self.entries[slot].parent;
        }
        out
    }

    fn slot(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Slot holding `node` itself, compared by address.
    fn slot_of(&self, node: &SceneNode) -> Option<usize> {
        match self.slot(&node.id) {
            Some(slot) if std::ptr::eq(self.entries[slot].node, node) => Some(slot),
            _ => self
                .entries
                .iter()
                .position(|entry| std::ptr::eq(entry.node, node)),
        }
    }
}

/// Absolute top-left of `node`.
///
/// Uses `absoluteBoundingBox` when the API supplied it. Otherwise sums the
/// `relativeTransform` offsets of the node and its ancestors; ancestors
/// without a transform (documents, pages) sit at the origin. `None` when the
/// node carries no positional data at all.
pub fn get_absolute_position(node: &SceneNode, index: &NodeIndex<'_>) -> Option<Point> {
    if let Some(bbox) = node.absolute_bounding_box {
        return Some(Point {
            x: bbox.x,
            y: bbox.y,
        });
    }

    let (mut x, mut y) = node.relative_transform?.translation();
    for ancestor in index.ancestors_of(node) {
        if let Some(transform) = ancestor.relative_transform {
            let (tx, ty) = transform.translation();
            x += tx;
            y += ty;
        }
    }
    Some(Point { x, y })
}

/// Bounding-box size, falling back to the node's `size` vector.
pub fn get_node_size(node: &SceneNode) -> Option<Size> {
    if let Some(bbox) = node.absolute_bounding_box {
        return Some(Size {
            width: bbox.width,
            height: bbox.height,
        });
    }
    node.size.map(|size| Size {
        width: size.x,
        height: size.y,
    })
}

/// Anything that can name its parent.
pub trait ParentLink {
    fn parent_id(&self) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl NodeRecord {
    pub fn root() -> Self {
        Self { parent_id: None }
    }

    pub fn child_of(parent: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent.into()),
        }
    }
}

impl ParentLink for NodeRecord {
    fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
}

impl ParentLink for Option<String> {
    fn parent_id(&self) -> Option<&str> {
        self.as_deref()
    }
}

/// Hops from `node_id` up to a record without a parent.
///
/// Fails with [`FigmaError::MissingNode`] when `node_id` or any referenced
/// parent is absent, and with [`FigmaError::CyclicParentChain`] when the
/// walk revisits a node.
pub fn calculate_node_depth<R: ParentLink>(
    node_id: &str,
    nodes: &HashMap<String, R>,
) -> Result<usize> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = node_id;
    let mut depth = 0;

    loop {
        if !visited.insert(current) {
            return Err(FigmaError::CyclicParentChain(current.to_string()));
        }
        let record = nodes
            .get(current)
            .ok_or_else(|| FigmaError::MissingNode(current.to_string()))?;
        match record.parent_id() {
            None => return Ok(depth),
            Some(parent) => {
                current = parent;
                depth += 1;
            }
        }
    }
}

/// Every node of a tree with its depth below `root`.
pub fn nodes_with_depth(root: &SceneNode) -> Vec<(&SceneNode, usize)> {
    let mut out = Vec::new();
    let mut stack = vec![(root, 0)];
    while let Some((node, depth)) = stack.pop() {
        out.push((node, depth));
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
    out
}
