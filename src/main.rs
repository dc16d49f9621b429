mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{CommandContext, RenderRequest, TreeFilter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let args = cli::parse();
    init_tracing(args.verbose);

    let ctx = CommandContext {
        config: args.config,
        token: args.token,
        format: args.format,
        output: args.output,
    };

    match args.command {
        Commands::Whoami => commands::run_whoami(&ctx).await,
        Commands::File { target, depth } => commands::run_file(&ctx, &target, depth).await,
        Commands::Nodes { target, ids } => commands::run_nodes(&ctx, &target, ids).await,
        Commands::Tree {
            target,
            node_type,
            name,
            node,
        } => {
            let filter = TreeFilter {
                node_type,
                name,
                node,
            };
            commands::run_tree(&ctx, &target, filter).await
        }
        Commands::Render {
            target,
            ids,
            image_format,
            scale,
            out_dir,
            concurrency,
        } => {
            let request = RenderRequest {
                ids,
                format: image_format.into(),
                scale,
                out_dir,
                concurrency,
            };
            commands::run_render(&ctx, &target, request).await
        }
        Commands::Comments { target } => commands::run_comments(&ctx, &target).await,
        Commands::Versions { target, page_size } => {
            commands::run_versions(&ctx, &target, page_size).await
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("figkit=debug,figkit_lib=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
