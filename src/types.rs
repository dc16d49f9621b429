//! Wire types for the Figma REST API.
//!
//! This module is organized by domain:
//! - [`core`] - Value types shared across nodes (Color, Rectangle, Transform, Paint)
//! - [`node`] - The scene graph (SceneNode, NodeKind, NodeType)
//! - [`responses`] - Response bodies of the REST endpoints
//! - [`params`] - Query and request-body parameters

pub mod core;
pub mod node;
pub mod params;
pub mod responses;

// Re-export core types at module level for convenience
pub use core::{
    BlendMode, Color, ColorStop, Effect, EffectType, Paint, PaintType, Rectangle, Transform,
    TypeStyle, Vector,
};

// Re-export node types
pub use node::{
    ComponentProperty, ComponentPropertyDefinition, ComponentPropertyType, ComponentProps,
    InstanceProps, NodeKind, NodeType, PropertyValue, SceneNode, TextProps,
};

// Re-export parameter types
pub use params::{
    ActivityLogParams, CommentsParams, CreateDevResourceParams, CreateWebhookParams,
    DevResourceParams, FileNodesParams, FileParams, GetImageParams, ImageFormat,
    PaginationParams, PostCommentParams, ProjectFilesParams, UpdateDevResourceParams,
    UpdateWebhookParams,
};

// Re-export response types
pub use responses::{
    ActivityLogEvent, ActivityLogsResponse, Branch, ClientMeta, Comment, CommentReactionsResponse,
    CommentsResponse, Component, ComponentMeta, ComponentResponse, ComponentSet,
    ComponentSetMeta, ComponentSetResponse, ComponentSetsResponse, ComponentsResponse,
    DevResource, DevResourcesResponse, FigmaErrorResponse, FileMeta, FileMetaResponse,
    FileNodeEntry, FileNodesResponse, FileResponse, FileVersion, FileVersionsResponse,
    ImageFillsMeta, ImageFillsResponse, ImageResponse, MetaEnvelope, Pagination, Project,
    ProjectFile, ProjectFilesResponse, Reaction, Style, StyleMeta, StyleResponse,
    StylesResponse, TeamProjectsResponse, User, VariablesResponse, Webhook, WebhookEventType,
    WebhookRequest, WebhookRequestsResponse, WebhookStatus, WebhooksResponse,
};
