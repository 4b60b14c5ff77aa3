//! Command-line surface of the `meti` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "meti", about = "Checklist workspace canvas", version)]
pub struct Cli {
    /// Override the database location (`METI_DATABASE_URL`).
    #[arg(long, env = "METI_DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Use a throwaway in-memory store seeded with one empty project.
    #[arg(long, global = true)]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Project(ProjectCommand),
    Node(NodeCommand),
    Check(CheckCommand),
    /// Write the canvas as an SVG image.
    Render {
        #[arg(long)]
        project: Option<Uuid>,
        #[arg(long, default_value_t = 1200.0)]
        width: f64,
        #[arg(long, default_value_t = 800.0)]
        height: f64,
        /// Output file; stdout when absent.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Feed a JSON list of recorded input events through the canvas.
    Replay {
        events: PathBuf,
        #[arg(long)]
        project: Option<Uuid>,
    },
}

#[derive(Args, Debug)]
pub struct ProjectCommand {
    #[command(subcommand)]
    pub command: ProjectSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectSubcommand {
    New {
        title: String,
        #[arg(long)]
        template: bool,
    },
    List,
    /// Print a project and its checklist tree.
    Show { id: Option<Uuid> },
}

#[derive(Args, Debug)]
pub struct NodeCommand {
    #[command(subcommand)]
    pub command: NodeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum NodeSubcommand {
    /// Create a checklist as if dropped at `--at` from its parent's handle.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long = "item")]
        items: Vec<String>,
        /// Parent checklist; the project root when absent.
        #[arg(long)]
        parent: Option<Uuid>,
        #[arg(long, value_parser = parse_point)]
        at: (f64, f64),
        #[arg(long)]
        project: Option<Uuid>,
    },
    Move {
        id: Uuid,
        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
    },
    /// Replace a checklist's title and items. Items given as `<check-id>=text`
    /// keep their identity and state.
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "item")]
        items: Vec<String>,
    },
    Delete { id: Uuid },
}

#[derive(Args, Debug)]
pub struct CheckCommand {
    #[command(subcommand)]
    pub command: CheckSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CheckSubcommand {
    Toggle {
        checklist: Uuid,
        check: Uuid,
        /// Toggle not-applicable instead of checked.
        #[arg(long)]
        na: bool,
    },
}

/// Parse `X,Y` into a world point.
///
/// # Errors
///
/// Returns a message if either coordinate is missing or not a number.
pub fn parse_point(raw: &str) -> Result<(f64, f64), String> {
    let (x, y) = raw.split_once(',').ok_or_else(|| format!("expected X,Y, got {raw:?}"))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad x in {raw:?}: {e}"))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad y in {raw:?}: {e}"))?;
    Ok((x, y))
}
