mod file;
mod history;
mod nodes;
mod render;
mod tree;
mod whoami;

use std::path::PathBuf;

use figkit_lib::helpers::{
    as_text, build_file_url, color_to_hex, flatten_nodes, get_absolute_position, get_node_size,
    NodeIndex,
};
use figkit_lib::output::NodeSummary;
use figkit_lib::types::{PaintType, SceneNode};
use figkit_lib::{FigmaClient, FigmaError};

use crate::cli::OutputFormat;
use crate::settings::build_client;

pub use file::run_file;
pub use history::{run_comments, run_versions};
pub use nodes::run_nodes;
pub use render::{run_render, RenderRequest};
pub use tree::{run_tree, TreeFilter};
pub use whoami::run_whoami;

/// Global flags every command needs.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Option<PathBuf>,
    pub token: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

impl CommandContext {
    pub fn client(&self) -> Result<FigmaClient, FigmaError> {
        build_client(self.config.as_deref(), self.token.as_deref())
    }
}

/// Hex of the first visible solid fill.
pub(crate) fn primary_fill(node: &SceneNode) -> Option<String> {
    node.fills
        .iter()
        .filter(|paint| paint.visible != Some(false))
        .find(|paint| paint.paint_type == PaintType::Solid)
        .and_then(|paint| paint.color.as_ref())
        .map(color_to_hex)
}

pub(crate) fn node_summary(
    file_key: &str,
    node: &SceneNode,
    index: &NodeIndex<'_>,
) -> Result<NodeSummary, FigmaError> {
    Ok(NodeSummary {
        id: node.id.clone(),
        name: node.name.clone(),
        node_type: node.node_type().to_string(),
        url: build_file_url(file_key, Some(&node.id))?,
        position: get_absolute_position(node, index),
        size: get_node_size(node),
        descendant_count: flatten_nodes(node).len() - 1,
        text: as_text(node).map(|t| t.characters.clone()),
        fill: primary_fill(node),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figkit_lib::types::{Color, NodeKind, Paint, Rectangle, TextProps};

    fn solid(color: Color, visible: Option<bool>) -> Paint {
        Paint {
            paint_type: PaintType::Solid,
            visible,
            opacity: None,
            color: Some(color),
            blend_mode: None,
            gradient_handle_positions: Vec::new(),
            gradient_stops: Vec::new(),
            image_ref: None,
        }
    }

    #[test]
    fn primary_fill_skips_hidden_paints() {
        let mut node = SceneNode::new("1:1", NodeKind::Rectangle);
        node.fills = vec![
            solid(Color::rgb(1.0, 0.0, 0.0), Some(false)),
            solid(Color::rgb(0.0, 0.0, 1.0), None),
        ];
        assert_eq!(primary_fill(&node).as_deref(), Some("#0000ff"));
        assert_eq!(primary_fill(&SceneNode::new("1:2", NodeKind::Frame)), None);
    }

    #[test]
    fn node_summary_collects_geometry_and_text() {
        let mut title = SceneNode::new(
            "1:3",
            NodeKind::Text(TextProps {
                characters: "Hello".into(),
                style: None,
            }),
        )
        .with_name("Title");
        title.absolute_bounding_box = Some(Rectangle {
            x: 4.0,
            y: 8.0,
            width: 80.0,
            height: 16.0,
        });
        let root = SceneNode::new("1:2", NodeKind::Frame).with_children(vec![title]);
        let index = NodeIndex::build(&root);

        let summary = node_summary("Key1", &root.children[0], &index).unwrap();
        assert_eq!(summary.node_type, "TEXT");
        assert_eq!(summary.text.as_deref(), Some("Hello"));
        assert_eq!(summary.url, "https://www.figma.com/file/Key1?node-id=1-3");
        assert_eq!(summary.position.map(|p| (p.x, p.y)), Some((4.0, 8.0)));
        assert_eq!(summary.descendant_count, 0);

        let summary = node_summary("Key1", &root, &index).unwrap();
        assert_eq!(summary.descendant_count, 1);
        assert!(summary.position.is_none());
    }
}
