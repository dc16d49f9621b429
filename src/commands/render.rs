use std::path::{Path, PathBuf};
use std::process::ExitCode;

use futures::stream::{self, StreamExt};
use figkit_lib::helpers::{format_bytes, node_id_to_url_format};
use figkit_lib::output::{FigkitOutput, RenderOutput, RenderedImage, FIGKIT_OUTPUT_VERSION};
use figkit_lib::types::{GetImageParams, ImageFormat, ImageResponse};
use figkit_lib::{FigmaClient, FigmaError};
use tracing::{debug, warn};

use super::nodes::requested_ids;
use super::CommandContext;
use crate::formatting::{emit, render_error};
use crate::settings::resolve_target;

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub ids: Vec<String>,
    pub format: ImageFormat,
    pub scale: Option<f64>,
    pub out_dir: PathBuf,
    pub concurrency: usize,
}

pub async fn run_render(ctx: &CommandContext, target: &str, request: RenderRequest) -> ExitCode {
    let (file_key, url_node) = match resolve_target(target) {
        Ok(resolved) => resolved,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };
    let ids = requested_ids(request.ids.clone(), url_node);
    if ids.is_empty() {
        return render_error(
            FigmaError::Config("No node ids: pass --ids or a link with node-id".to_string()),
            ctx.format,
            ctx.output.clone(),
        );
    }
    if let Some(scale) = request.scale {
        if !(0.01..=4.0).contains(&scale) {
            return render_error(
                FigmaError::Config(format!("--scale must be between 0.01 and 4, got {}", scale)),
                ctx.format,
                ctx.output.clone(),
            );
        }
    }
    let client = match ctx.client() {
        Ok(client) => client,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    let params = GetImageParams {
        scale: request.scale,
        format: Some(request.format),
        ..GetImageParams::for_ids(ids.clone())
    };
    let rendered = match client
        .with_retry(|c| c.get_image(&file_key, &params))
        .await
    {
        Ok(rendered) => rendered,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    if let Err(err) = std::fs::create_dir_all(&request.out_dir) {
        return render_error(FigmaError::Io(err), ctx.format, ctx.output.clone());
    }

    let (jobs, mut failed) = plan_downloads(&ids, &rendered);
    let images = match download_all(&client, jobs, &request, &mut failed).await {
        Ok(images) => images,
        Err(err) => return render_error(err, ctx.format, ctx.output.clone()),
    };

    emit(
        FigkitOutput::Render(RenderOutput {
            version: FIGKIT_OUTPUT_VERSION.to_string(),
            file_key,
            format: request.format.extension().to_string(),
            images,
            failed,
        }),
        ctx.format,
        ctx.output.clone(),
    )
}

/// Split requested ids into `(id, url)` download jobs and ids without an image.
pub(crate) fn plan_downloads(
    ids: &[String],
    rendered: &ImageResponse,
) -> (Vec<(String, String)>, Vec<String>) {
    if let Some(err) = &rendered.err {
        warn!(error = %err, "render reported an error");
    }
    let mut jobs = Vec::new();
    let mut failed = Vec::new();
    for id in ids {
        match rendered.images.get(id).and_then(Option::as_ref) {
            Some(url) => jobs.push((id.clone(), url.clone())),
            None => failed.push(id.clone()),
        }
    }
    (jobs, failed)
}

pub(crate) fn image_path(out_dir: &Path, id: &str, format: ImageFormat) -> PathBuf {
    out_dir.join(format!("{}.{}", node_id_to_url_format(id), format.extension()))
}

/// Downloads run concurrently; files are written in request order.
async fn download_all(
    client: &FigmaClient,
    jobs: Vec<(String, String)>,
    request: &RenderRequest,
    failed: &mut Vec<String>,
) -> Result<Vec<RenderedImage>, FigmaError> {
    let mut results: Vec<(usize, String, Result<Vec<u8>, FigmaError>)> =
        stream::iter(jobs.into_iter().enumerate())
            .map(|(order, (id, url))| async move {
                let bytes = client
                    .with_retry(|c| c.download_image(url.as_str()))
                    .await;
                (order, id, bytes)
            })
            .buffer_unordered(request.concurrency.max(1))
            .collect()
            .await;
    results.sort_by_key(|(order, _, _)| *order);

    let mut images = Vec::new();
    for (_, id, bytes) in results {
        let bytes = match bytes {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(node = %id, error = %err, "download failed");
                failed.push(id);
                continue;
            }
        };
        let path = image_path(&request.out_dir, &id, request.format);
        std::fs::write(&path, &bytes)?;
        debug!(node = %id, path = %path.display(), bytes = bytes.len(), "image written");
        images.push(RenderedImage {
            id,
            path: path.display().to_string(),
            bytes: bytes.len() as u64,
            size: format_bytes(bytes.len() as u64),
        });
    }
    Ok(images)
}
