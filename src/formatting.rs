use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use figkit_lib::output::{ErrorOutput, FigkitOutput, NodeSummary, FIGKIT_OUTPUT_VERSION};
use figkit_lib::FigmaError;

use crate::cli::OutputFormat;

pub fn write_output(
    body: &FigkitOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Print `body`, mapping a write failure to an error document.
pub fn emit(body: FigkitOutput, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    match write_output(&body, format, output.clone()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => render_error(
            FigmaError::Io(io::Error::new(io::ErrorKind::Other, err.to_string())),
            format,
            output,
        ),
    }
}

pub fn render_error(err: FigmaError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let payload = FigkitOutput::Error(ErrorOutput {
        version: FIGKIT_OUTPUT_VERSION.to_string(),
        error: err.to_payload(),
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Err(write_err) = write_content(&content, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

fn write_json_output(
    body: &FigkitOutput,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    write_content(&content, output)?;
    Ok(())
}

/// `content` to `output`, or a line on stdout when no path is given.
fn write_content(content: &str, output: Option<&Path>) -> io::Result<()> {
    match output {
        Some(path) => std::fs::write(path, content),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

fn write_pretty_output(body: &FigkitOutput, output: Option<&Path>) -> io::Result<()> {
    let use_human = output.is_none() && io::stdout().is_terminal();

    if use_human {
        println!("{}", format_pretty(body, true));
        return Ok(());
    }

    // Files and pipes keep the JSON shape.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    write_content(&content, output)
}

pub fn format_pretty(body: &FigkitOutput, colorize: bool) -> String {
    let mut out = String::new();
    match body {
        FigkitOutput::Whoami(w) => {
            let _ = writeln!(out, "{}", color("Authenticated", "32", colorize));
            let _ = writeln!(out, "  {} ({})", w.user.handle, w.user.id);
            if let Some(email) = &w.user.email {
                let _ = writeln!(out, "  {}", email);
            }
        }
        FigkitOutput::File(f) => {
            let _ = writeln!(out, "{} [{}]", color(&f.name, "1", colorize), f.file_key);
            let _ = writeln!(out, "  url: {}", f.url);
            let _ = writeln!(
                out,
                "  version {} · modified {}",
                f.file_version, f.last_modified
            );
            let _ = writeln!(
                out,
                "  {} nodes · {} components · {} styles",
                f.node_count, f.component_count, f.style_count
            );
            let _ = writeln!(out, "Pages:");
            for page in &f.pages {
                let _ = writeln!(out, "  - {} ({}): {} nodes", page.name, page.id, page.node_count);
            }
            let _ = writeln!(out, "Types:");
            for (node_type, count) in &f.type_counts {
                let _ = writeln!(out, "  {:<20} {}", node_type, count);
            }
        }
        FigkitOutput::Nodes(n) => {
            for node in &n.nodes {
                out.push_str(&format_node(node, colorize));
            }
            if !n.missing.is_empty() {
                let _ = writeln!(
                    out,
                    "{} {}",
                    color("Missing:", "33", colorize),
                    n.missing.join(", ")
                );
            }
        }
        FigkitOutput::Tree(t) => {
            for entry in &t.entries {
                let geometry = match (entry.position, entry.size) {
                    (Some(p), Some(s)) => {
                        format!(" @({:.0},{:.0}) {:.0}x{:.0}", p.x, p.y, s.width, s.height)
                    }
                    (None, Some(s)) => format!(" {:.0}x{:.0}", s.width, s.height),
                    _ => String::new(),
                };
                let _ = writeln!(
                    out,
                    "{}{} {} [{}]{}",
                    "  ".repeat(entry.depth),
                    color(&entry.node_type, "36", colorize),
                    entry.name.as_deref().unwrap_or("<unnamed>"),
                    entry.id,
                    geometry
                );
            }
        }
        FigkitOutput::Render(r) => {
            for image in &r.images {
                let _ = writeln!(out, "{} → {} ({})", image.id, image.path, image.size);
            }
            if !r.failed.is_empty() {
                let _ = writeln!(
                    out,
                    "{} {}",
                    color("Not rendered:", "31", colorize),
                    r.failed.join(", ")
                );
            }
        }
        FigkitOutput::Comments(c) => {
            if c.comments.is_empty() {
                let _ = writeln!(out, "No comments.");
            }
            for comment in &c.comments {
                let status = if comment.resolved {
                    color("resolved", "32", colorize)
                } else {
                    color("open", "33", colorize)
                };
                let indent = if comment.parent_id.is_some() { "    " } else { "" };
                let _ = writeln!(
                    out,
                    "{}[{}] {} · {} · {}",
                    indent, status, comment.author, comment.created_at, comment.id
                );
                let _ = writeln!(out, "{}  {}", indent, comment.message);
            }
        }
        FigkitOutput::Versions(v) => {
            for version in &v.versions {
                let _ = writeln!(
                    out,
                    "{} {} by {}{}",
                    version.id,
                    version.created_at,
                    version.user.handle,
                    version
                        .label
                        .as_deref()
                        .map(|l| format!(" · {}", l))
                        .unwrap_or_default()
                );
            }
        }
        FigkitOutput::Error(e) => {
            let _ = writeln!(
                out,
                "{} {}",
                color("Error:", "31", colorize),
                e.error.message
            );
            if let Some(hint) = &e.error.remediation {
                let _ = writeln!(out, "Hint: {}", hint);
            }
        }
    }
    out.trim_end().to_string()
}

fn format_node(node: &NodeSummary, colorize: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} [{}]",
        color(&node.node_type, "36", colorize),
        node.name.as_deref().unwrap_or("<unnamed>"),
        node.id
    );
    if let Some(p) = node.position {
        let _ = writeln!(out, "  position: {:.1}, {:.1}", p.x, p.y);
    }
    if let Some(s) = node.size {
        let _ = writeln!(out, "  size: {:.1} x {:.1}", s.width, s.height);
    }
    if let Some(fill) = &node.fill {
        let _ = writeln!(out, "  fill: {}", fill);
    }
    if let Some(text) = &node.text {
        let _ = writeln!(out, "  text: {:?}", text);
    }
    let _ = writeln!(out, "  descendants: {}", node.descendant_count);
    let _ = writeln!(out, "  {}", node.url);
    out
}

fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}
