//! Response bodies of the REST endpoints.
//!
//! Field casing follows the API, which mixes camelCase (file endpoints) and
//! snake_case (metadata endpoints).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::core::Vector;
use super::node::SceneNode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub handle: String,
    #[serde(default)]
    pub img_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigmaErrorResponse {
    pub status: u16,
    #[serde(default)]
    pub err: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    pub last_modified: String,
    #[serde(default)]
    pub editor_type: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub version: String,
    pub document: SceneNode,
    #[serde(default)]
    pub components: HashMap<String, Component>,
    #[serde(default)]
    pub component_sets: HashMap<String, ComponentSet>,
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub styles: HashMap<String, Style>,
    #[serde(default)]
    pub main_file_key: Option<String>,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNodesResponse {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    pub last_modified: String,
    #[serde(default)]
    pub editor_type: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub version: String,
    /// Requested ids map to `None` when the node does not exist.
    pub nodes: HashMap<String, Option<FileNodeEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNodeEntry {
    pub document: SceneNode,
    #[serde(default)]
    pub components: HashMap<String, Component>,
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub styles: HashMap<String, Style>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetaResponse {
    pub file: FileMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMeta {
    #[serde(default)]
    pub key: Option<String>,
    pub name: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub last_modified: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub link_access: Option<String>,
    #[serde(default)]
    pub editor_type: Option<String>,
    #[serde(default)]
    pub folder: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub last_modified: String,
    #[serde(default)]
    pub link_access: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileVersionsResponse {
    pub versions: Vec<FileVersion>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileVersion {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub user: User,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Rendered image URLs keyed by node id; `None` when a node failed to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub err: Option<String>,
    #[serde(default)]
    pub images: HashMap<String, Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFillsResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub status: Option<u16>,
    pub meta: ImageFillsMeta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageFillsMeta {
    #[serde(default)]
    pub images: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_offset: Option<Vector>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub uuid: Option<String>,
    pub file_key: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub user: User,
    pub created_at: String,
    #[serde(default)]
    pub resolved_at: Option<String>,
    pub message: String,
    #[serde(default)]
    pub client_meta: Option<ClientMeta>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    pub user: User,
    pub emoji: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentReactionsResponse {
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub component_set_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSet {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub remote: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub remote: bool,
    pub style_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentMeta {
    pub key: String,
    pub file_key: String,
    pub node_id: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub containing_frame: Option<Value>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Component sets share the component metadata shape.
pub type ComponentSetMeta = ComponentMeta;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleMeta {
    pub key: String,
    pub file_key: String,
    pub node_id: String,
    pub style_type: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub sort_position: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// The `{ error, status, meta }` envelope used by metadata endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaEnvelope<T> {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub status: Option<u16>,
    pub meta: T,
}

pub type ComponentResponse = MetaEnvelope<ComponentMeta>;
pub type ComponentSetResponse = MetaEnvelope<ComponentSetMeta>;
pub type StyleResponse = MetaEnvelope<StyleMeta>;
pub type ComponentsResponse = MetaEnvelope<ComponentList>;
pub type ComponentSetsResponse = MetaEnvelope<ComponentSetList>;
pub type StylesResponse = MetaEnvelope<StyleList>;
pub type VariablesResponse = MetaEnvelope<VariablesMeta>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentList {
    #[serde(default)]
    pub components: Vec<ComponentMeta>,
    #[serde(default)]
    pub cursor: Option<HashMap<String, u64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSetList {
    #[serde(default)]
    pub component_sets: Vec<ComponentSetMeta>,
    #[serde(default)]
    pub cursor: Option<HashMap<String, u64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleList {
    #[serde(default)]
    pub styles: Vec<StyleMeta>,
    #[serde(default)]
    pub cursor: Option<HashMap<String, u64>>,
}

/// Variables and collections are kept as raw JSON; their value unions are
/// wide and change often.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariablesMeta {
    #[serde(default)]
    pub variables: HashMap<String, Value>,
    #[serde(default)]
    pub variable_collections: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamProjectsResponse {
    #[serde(default)]
    pub name: String,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub last_modified: String,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFilesResponse {
    #[serde(default)]
    pub name: String,
    pub files: Vec<ProjectFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookEventType {
    Ping,
    FileUpdate,
    FileDelete,
    FileVersionUpdate,
    FileComment,
    LibraryPublish,
    DevModeStatusUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookStatus {
    Active,
    Paused,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    #[serde(default)]
    pub team_id: Option<String>,
    pub event_type: WebhookEventType,
    #[serde(default)]
    pub client_id: Option<String>,
    pub endpoint: String,
    #[serde(default)]
    pub passcode: String,
    pub status: WebhookStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub protocol_version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhooksResponse {
    pub webhooks: Vec<Webhook>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub webhook_id: String,
    #[serde(default)]
    pub file_key: Option<String>,
    #[serde(default)]
    pub event_type: Option<WebhookEventType>,
    #[serde(default)]
    pub sent_at: Option<String>,
    #[serde(default)]
    pub response_code: Option<u16>,
    #[serde(default)]
    pub error_msg: Option<String>,
    #[serde(default)]
    pub request_info: Option<Value>,
    #[serde(default)]
    pub response_info: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookRequestsResponse {
    pub requests: Vec<WebhookRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevResource {
    pub id: String,
    pub name: String,
    pub url: String,
    pub file_key: String,
    pub node_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevResourcesResponse {
    pub dev_resources: Vec<DevResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEvent {
    pub id: String,
    pub timestamp: Value,
    #[serde(default)]
    pub actor: Option<Value>,
    #[serde(default)]
    pub entity: Option<Value>,
    #[serde(default)]
    pub action: Option<Value>,
    #[serde(default)]
    pub context: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogsResponse {
    #[serde(default)]
    pub events: Vec<ActivityLogEvent>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub next_page: Option<bool>,
}
