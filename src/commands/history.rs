use std::process::ExitCode;

use figkit_lib::output::{
    CommentSummary, CommentsOutput, FigkitOutput, VersionsOutput, FIGKIT_OUTPUT_VERSION,
};
use figkit_lib::types::{Comment, PaginationParams};

use super::CommandContext;
use crate::formatting::{emit, render_error};
use crate::settings::resolve_target;

pub async fn run_comments(ctx: &CommandContext, target: &str) -> ExitCode {
    let (file_key, _) = match resolve_target(target) {
        Ok(resolved) => resolved,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };
    let client = match ctx.client() {
        Ok(client) => client,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    let response = match client
        .with_retry(|c| c.get_comments(&file_key, None))
        .await
    {
        Ok(response) => response,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    emit(
        FigkitOutput::Comments(CommentsOutput {
            version: FIGKIT_OUTPUT_VERSION.to_string(),
            file_key,
            comments: response.comments.iter().map(summarize_comment).collect(),
        }),
        ctx.format,
        ctx.output.clone(),
    )
}

pub async fn run_versions(ctx: &CommandContext, target: &str, page_size: Option<u32>) -> ExitCode {
    let (file_key, _) = match resolve_target(target) {
        Ok(resolved) => resolved,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };
    let client = match ctx.client() {
        Ok(client) => client,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    let params = PaginationParams {
        page_size,
        ..Default::default()
    };
    let response = match client
        .with_retry(|c| c.get_file_versions(&file_key, Some(&params)))
        .await
    {
        Ok(response) => response,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    emit(
        FigkitOutput::Versions(VersionsOutput {
            version: FIGKIT_OUTPUT_VERSION.to_string(),
            file_key,
            versions: response.versions,
        }),
        ctx.format,
        ctx.output.clone(),
    )
}

fn summarize_comment(comment: &Comment) -> CommentSummary {
    CommentSummary {
        id: comment.id.clone(),
        author: comment.user.handle.clone(),
        message: comment.message.clone(),
        created_at: comment.created_at.clone(),
        resolved: comment.resolved_at.is_some(),
        node_id: comment
            .client_meta
            .as_ref()
            .and_then(|meta| meta.node_id.clone()),
        parent_id: comment.parent_id.clone().filter(|id| !id.is_empty()),
    }
}
