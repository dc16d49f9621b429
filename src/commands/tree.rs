use std::process::ExitCode;

use figkit_lib::helpers::{
    find_node_by_id, get_absolute_position, get_node_size, nodes_with_depth, NodeIndex,
};
use figkit_lib::output::{FigkitOutput, TreeEntry, TreeOutput, FIGKIT_OUTPUT_VERSION};
use figkit_lib::types::{NodeType, SceneNode};
use figkit_lib::FigmaError;

use super::CommandContext;
use crate::formatting::{emit, render_error};
use crate::settings::resolve_target;

#[derive(Debug, Clone, Default)]
pub struct TreeFilter {
    pub node_type: Option<NodeType>,
    pub name: Option<String>,
    /// Subtree root; the document when absent.
    pub node: Option<String>,
}

pub async fn run_tree(ctx: &CommandContext, target: &str, mut filter: TreeFilter) -> ExitCode {
    let (file_key, url_node) = match resolve_target(target) {
        Ok(resolved) => resolved,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };
    if filter.node.is_none() {
        filter.node = url_node;
    }
    let client = match ctx.client() {
        Ok(client) => client,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    let file = match client.with_retry(|c| c.get_file(&file_key, None)).await {
        Ok(file) => file,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    match build_tree(&file_key, &file.document, &filter) {
        Ok(out) => emit(FigkitOutput::Tree(out), ctx.format, ctx.output.clone()),
        Err(err) => render_error(err, ctx.format, ctx.output.clone()),
    }
}

/// Depths are relative to the chosen subtree root; positions are absolute.
pub(crate) fn build_tree(
    file_key: &str,
    document: &SceneNode,
    filter: &TreeFilter,
) -> Result<TreeOutput, FigmaError> {
    let root = match filter.node.as_deref() {
        Some(id) => {
            find_node_by_id(document, id).ok_or_else(|| FigmaError::MissingNode(id.to_string()))?
        }
        None => document,
    };
    let index = NodeIndex::build(document);

    let entries = nodes_with_depth(root)
        .into_iter()
        .filter(|(node, _)| filter.node_type.map_or(true, |t| node.node_type() == t))
        .filter(|(node, _)| {
            filter
                .name
                .as_deref()
                .map_or(true, |name| node.name.as_deref() == Some(name))
        })
        .map(|(node, depth)| TreeEntry {
            id: node.id.clone(),
            name: node.name.clone(),
            node_type: node.node_type().to_string(),
            depth,
            position: get_absolute_position(node, &index),
            size: get_node_size(node),
        })
        .collect();

    Ok(TreeOutput {
        version: FIGKIT_OUTPUT_VERSION.to_string(),
        file_key: file_key.to_string(),
        root_id: root.id.clone(),
        entries,
    })
}
