//! Serializable results of the `figkit` commands.
//!
//! Every document carries a `mode` tag and the schema `version`, so scripts
//! can branch on the shape before reading fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ErrorPayload;
use crate::helpers::{Point, Size};
use crate::types::{FileVersion, User};

pub const FIGKIT_OUTPUT_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FigkitOutput {
    Whoami(WhoamiOutput),
    File(FileSummaryOutput),
    Nodes(NodesOutput),
    Tree(TreeOutput),
    Render(RenderOutput),
    Comments(CommentsOutput),
    Versions(VersionsOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoamiOutput {
    pub version: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummaryOutput {
    pub version: String,
    pub file_key: String,
    pub name: String,
    pub url: String,
    pub last_modified: String,
    pub file_version: String,
    pub node_count: usize,
    /// Node count per Figma type tag.
    pub type_counts: BTreeMap<String, usize>,
    pub pages: Vec<PageSummary>,
    pub component_count: usize,
    pub style_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: String,
    pub name: String,
    pub node_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodesOutput {
    pub version: String,
    pub file_key: String,
    pub nodes: Vec<NodeSummary>,
    /// Requested ids the file does not contain.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    pub id: String,
    pub name: Option<String>,
    pub node_type: String,
    pub url: String,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub descendant_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeOutput {
    pub version: String,
    pub file_key: String,
    pub root_id: String,
    pub entries: Vec<TreeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeEntry {
    pub id: String,
    pub name: Option<String>,
    pub node_type: String,
    pub depth: usize,
    pub position: Option<Point>,
    pub size: Option<Size>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput {
    pub version: String,
    pub file_key: String,
    pub format: String,
    pub images: Vec<RenderedImage>,
    /// Ids the API could not render.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedImage {
    pub id: String,
    pub path: String,
    pub bytes: u64,
    pub size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsOutput {
    pub version: String,
    pub file_key: String,
    pub comments: Vec<CommentSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSummary {
    pub id: String,
    pub author: String,
    pub message: String,
    pub created_at: String,
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionsOutput {
    pub version: String,
    pub file_key: String,
    pub versions: Vec<FileVersion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    pub version: String,
    pub error: ErrorPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn outputs_are_tagged_by_mode() {
        let out = FigkitOutput::Error(ErrorOutput {
            version: FIGKIT_OUTPUT_VERSION.to_string(),
            error: ErrorPayload::new(ErrorCategory::Config, "missing token".into(), "set it"),
        });
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["mode"], "error");
        assert_eq!(json["error"]["category"], "config");

        let back: FigkitOutput = serde_json::from_value(json).unwrap();
        assert!(matches!(back, FigkitOutput::Error(_)));
    }
}
