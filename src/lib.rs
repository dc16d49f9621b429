pub mod client;
pub mod config;
pub mod error;
pub mod helpers;
pub mod output;
pub mod types;

pub use client::FigmaClient;
pub use config::{Config, FigmaAuth, FigmaClientConfig};
pub use error::{ErrorCategory, ErrorPayload, FigmaError, Result};
pub use helpers::{
    calculate_node_depth, color_to_hex, color_to_rgba, extract_file_key, extract_node_id,
    find_node_by_id, find_nodes, find_nodes_by_name, find_nodes_by_type, flatten_nodes,
    format_bytes, generate_id, hex_to_color, retry_with_backoff, NodeIndex, RetryPolicy,
};
pub use output::{FigkitOutput, FIGKIT_OUTPUT_VERSION};
pub use types::{Color, NodeKind, NodeType, SceneNode};
