//! Query and body parameters.
//!
//! Query structs serialize through `serde_urlencoded` (via reqwest); list
//! values are comma-joined and `None` fields are omitted.

use serde::{Serialize, Serializer};

use super::responses::{ClientMeta, WebhookEventType, WebhookStatus};

fn comma_separated<S: Serializer>(values: &[String], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&values.join(","))
}

fn comma_separated_opt<S: Serializer>(
    values: &Option<Vec<String>>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match values {
        Some(values) => comma_separated(values, s),
        None => s.serialize_none(),
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FileParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "comma_separated_opt"
    )]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_data: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FileNodesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_data: Option<String>,
}

/// Full query of `GET /v1/files/:key/nodes`.
#[derive(Debug, Serialize)]
pub(crate) struct FileNodesQuery<'a> {
    #[serde(serialize_with = "comma_separated")]
    pub ids: &'a [String],
    #[serde(flatten)]
    pub params: &'a FileNodesParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpg,
    #[default]
    Png,
    Svg,
    Pdf,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetImageParams {
    #[serde(serialize_with = "comma_separated")]
    pub ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_outline_text: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_include_id: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_include_node_id: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_simplify_stroke: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_absolute_bounds: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl GetImageParams {
    pub fn for_ids(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostCommentParams {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_meta: Option<ClientMeta>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateWebhookParams {
    pub event_type: WebhookEventType,
    pub team_id: String,
    pub endpoint: String,
    pub passcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WebhookStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateWebhookParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<WebhookEventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WebhookStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DevResourceParams {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "comma_separated_opt"
    )]
    pub node_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateDevResourceParams {
    pub name: String,
    pub url: String,
    pub file_key: String,
    pub node_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateDevResourceParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityLogParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "comma_separated_opt"
    )]
    pub events: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentsParams {
    /// Return comment bodies as markdown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_md: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectFilesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_data: Option<bool>,
}

/// Single optional key/value used by the cursor- and team-filtered lists.
#[derive(Debug, Serialize)]
pub(crate) struct OptionalQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<&'a str>,
}
