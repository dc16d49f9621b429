use std::process::ExitCode;

use figkit_lib::helpers::NodeIndex;
use figkit_lib::output::{FigkitOutput, NodesOutput, FIGKIT_OUTPUT_VERSION};
use figkit_lib::types::FileNodesResponse;
use figkit_lib::FigmaError;

use super::{node_summary, CommandContext};
use crate::formatting::{emit, render_error};
use crate::settings::resolve_target;

/// Explicit ids win; otherwise the link's own `node-id`.
pub(crate) fn requested_ids(ids: Vec<String>, from_url: Option<String>) -> Vec<String> {
    let ids: Vec<String> = ids
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();
    if ids.is_empty() {
        from_url.into_iter().collect()
    } else {
        ids
    }
}

pub async fn run_nodes(ctx: &CommandContext, target: &str, ids: Vec<String>) -> ExitCode {
    let (file_key, url_node) = match resolve_target(target) {
        Ok(resolved) => resolved,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };
    let ids = requested_ids(ids, url_node);
    if ids.is_empty() {
        return render_error(
            FigmaError::Config("No node ids: pass --ids or a link with node-id".to_string()),
            ctx.format,
            ctx.output.clone(),
        );
    }
    let client = match ctx.client() {
        Ok(client) => client,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    let response = match client
        .with_retry(|c| c.get_file_nodes(&file_key, &ids, None))
        .await
    {
        Ok(response) => response,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    match summarize_nodes(&file_key, &ids, &response) {
        Ok(out) => emit(FigkitOutput::Nodes(out), ctx.format, ctx.output.clone()),
        Err(err) => render_error(err, ctx.format, ctx.output.clone()),
    }
}

/// Summaries in request order; ids the API returned as `null` are reported
/// as missing.
pub(crate) fn summarize_nodes(
    file_key: &str,
    ids: &[String],
    response: &FileNodesResponse,
) -> Result<NodesOutput, FigmaError> {
    let mut nodes = Vec::new();
    let mut missing = Vec::new();
    for id in ids {
        match response.nodes.get(id).and_then(Option::as_ref) {
            Some(entry) => {
                let index = NodeIndex::build(&entry.document);
                nodes.push(node_summary(file_key, &entry.document, &index)?);
            }
            None => missing.push(id.clone()),
        }
    }
    Ok(NodesOutput {
        version: FIGKIT_OUTPUT_VERSION.to_string(),
        file_key: file_key.to_string(),
        nodes,
        missing,
    })
}
