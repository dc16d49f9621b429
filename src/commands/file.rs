use std::collections::BTreeMap;
use std::process::ExitCode;

use figkit_lib::helpers::{build_design_url, flatten_nodes};
use figkit_lib::output::{FigkitOutput, FileSummaryOutput, PageSummary, FIGKIT_OUTPUT_VERSION};
use figkit_lib::types::{FileParams, FileResponse};
use figkit_lib::FigmaError;
use tracing::debug;

use super::CommandContext;
use crate::formatting::{emit, render_error};
use crate::settings::resolve_target;

pub async fn run_file(ctx: &CommandContext, target: &str, depth: Option<u32>) -> ExitCode {
    let (file_key, _) = match resolve_target(target) {
        Ok(resolved) => resolved,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };
    let client = match ctx.client() {
        Ok(client) => client,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    let params = FileParams {
        depth,
        ..Default::default()
    };
    let file = match client
        .with_retry(|c| c.get_file(&file_key, Some(&params)))
        .await
    {
        Ok(file) => file,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };
    debug!(name = %file.name, version = %file.version, "file fetched");

    match summarize_file(&file_key, &file) {
        Ok(summary) => emit(FigkitOutput::File(summary), ctx.format, ctx.output.clone()),
        Err(err) => render_error(err, ctx.format, ctx.output.clone()),
    }
}

pub(crate) fn summarize_file(
    file_key: &str,
    file: &FileResponse,
) -> Result<FileSummaryOutput, FigmaError> {
    let all = flatten_nodes(&file.document);
    let mut type_counts = BTreeMap::new();
    for node in &all {
        *type_counts.entry(node.node_type().to_string()).or_insert(0) += 1;
    }

    let pages = file
        .document
        .children
        .iter()
        .map(|page| PageSummary {
            id: page.id.clone(),
            name: page.name.clone().unwrap_or_default(),
            node_count: flatten_nodes(page).len(),
        })
        .collect();

    Ok(FileSummaryOutput {
        version: FIGKIT_OUTPUT_VERSION.to_string(),
        file_key: file_key.to_string(),
        name: file.name.clone(),
        url: build_design_url(file_key, Some(&file.name), None)?,
        last_modified: file.last_modified.clone(),
        file_version: file.version.clone(),
        node_count: all.len(),
        type_counts,
        pages,
        component_count: file.components.len(),
        style_count: file.styles.len(),
    })
}
