//! Offline utilities over Figma data: nothing in here touches the network.

pub mod color;
pub mod geometry;
pub mod misc;
pub mod retry;
pub mod tree;
pub mod url;

pub use color::{color_to_hex, color_to_rgba, hex_to_color};
pub use geometry::{
    calculate_node_depth, get_absolute_position, get_node_size, nodes_with_depth, NodeIndex,
    NodeRecord, ParentLink, Point, Size,
};
pub use misc::{format_bytes, generate_id};
pub use retry::{retry_with_backoff, sleep, RetryPolicy};
pub use tree::{
    as_component, as_instance, as_text, find_node_by_id, find_nodes, find_nodes_by_name,
    find_nodes_by_type, flatten_nodes, is_component, is_frame_like, is_instance, is_text_node,
    PreOrder,
};
pub use self::url::{
    build_design_url, build_file_url, extract_file_key, extract_node_id, node_id_to_url_format,
    url_format_to_node_id, FIGMA_WEB_ORIGIN,
};
