use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use figkit_lib::types::{ImageFormat, NodeType};

#[derive(Parser, Debug)]
#[command(
    name = "figkit",
    version,
    about = "Inspect Figma files through the REST API"
)]
pub struct Cli {
    /// Optional TOML config file (API base URL, timeout, retry policy)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log requests and retries to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,

    /// Write the result to a file instead of stdout
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Access token; falls back to FIGMA_TOKEN, then FIGMA_OAUTH_TOKEN
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the user the token belongs to
    Whoami,

    /// Summarize a file: name, version, pages and node counts
    File {
        /// Figma link or bare file key
        target: String,

        /// Limit how deep the document tree is fetched
        #[arg(long)]
        depth: Option<u32>,
    },

    /// Fetch specific nodes (ids from --ids or the link's node-id)
    Nodes {
        target: String,

        /// Node ids, comma separated (1:2,3:4)
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
    },

    /// List the document tree with depth, position and size
    Tree {
        target: String,

        /// Only nodes of this type (e.g. FRAME, text, component-set)
        #[arg(long = "type")]
        node_type: Option<NodeType>,

        /// Only nodes with exactly this name
        #[arg(long)]
        name: Option<String>,

        /// Start from this node instead of the document root
        #[arg(long)]
        node: Option<String>,
    },

    /// Render nodes to images and download them
    Render {
        target: String,

        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,

        #[arg(long, value_enum, default_value_t = ImageFormatArg::Png)]
        image_format: ImageFormatArg,

        /// Scale factor between 0.01 and 4
        #[arg(long)]
        scale: Option<f64>,

        /// Directory the images are written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Parallel downloads
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },

    /// List comments on a file
    Comments { target: String },

    /// List a file's version history
    Versions {
        target: String,

        #[arg(long)]
        page_size: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageFormatArg {
    Jpg,
    Png,
    Svg,
    Pdf,
}

impl From<ImageFormatArg> for ImageFormat {
    fn from(arg: ImageFormatArg) -> Self {
        match arg {
            ImageFormatArg::Jpg => ImageFormat::Jpg,
            ImageFormatArg::Png => ImageFormat::Png,
            ImageFormatArg::Svg => ImageFormat::Svg,
            ImageFormatArg::Pdf => ImageFormat::Pdf,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
