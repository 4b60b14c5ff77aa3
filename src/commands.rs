//! Command dispatch: each CLI command opens the relevant project on a canvas,
//! drives one operation through it and prints what happened.
//!
//! DESIGN
//! ======
//! The CLI never writes to storage directly for canvas data. Every mutation
//! goes through `Canvas`, so snapping, clamping, diffing and tree checks are
//! the same as for pointer input. Output goes to the supplied writer: JSON
//! for reads, one `Action` per line for mutations.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::io::Write;
use std::path::Path;

use canvas::camera::Point;
use canvas::doc::{CheckDraft, CheckState, ChecklistDraft, ChecklistId, NodeRef, ProjectId};
use canvas::engine::{Action, Canvas, CanvasConfig, CanvasError};
use canvas::gateway::Gateway;
use canvas::input::InputEvent;
use canvas::render::{build_display_list, to_svg};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cli::{CheckSubcommand, Command, NodeSubcommand, ProjectSubcommand};
use crate::error::AppError;
use crate::services::store::ProjectStore;

/// Execute one command against `store`.
///
/// # Errors
///
/// Returns the first storage, canvas, I/O or usage error encountered.
pub fn run<S: ProjectStore>(
    store: &mut S,
    command: Command,
    config: &CanvasConfig,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    match command {
        Command::Project(cmd) => run_project(store, cmd.command, config, out),
        Command::Node(cmd) => run_node(store, cmd.command, config, out),
        Command::Check(cmd) => match cmd.command {
            CheckSubcommand::Toggle { checklist, check, na } => {
                let mut canvas = open_for_checklist(store, checklist, config)?;
                print_actions(out, &canvas.toggle_check(checklist, check, na)?)
            }
        },
        Command::Render { project, width, height, out: path } => {
            let project_id = resolve_project(store, project)?;
            let mut canvas = Canvas::open(&mut *store, project_id, *config)?;
            canvas.set_viewport(width, height);
            let svg = to_svg(&build_display_list(&canvas), canvas.viewport());
            match path {
                Some(path) => {
                    std::fs::write(&path, svg)?;
                    info!(path = %path.display(), "svg written");
                }
                None => out.write_all(svg.as_bytes())?,
            }
            Ok(())
        }
        Command::Replay { events, project } => replay(store, &events, project, config, out),
    }
}

// =============================================================================
// PROJECTS
// =============================================================================

fn run_project<S: ProjectStore>(
    store: &mut S,
    command: ProjectSubcommand,
    config: &CanvasConfig,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    match command {
        ProjectSubcommand::New { title, template } => {
            if title.trim().is_empty() {
                return Err(AppError::Usage("project title is empty".into()));
            }
            let id = store.create_project(&title, template)?;
            print_json(out, &store.get_project(id)?)
        }
        ProjectSubcommand::List => print_json(out, &store.list_projects()?),
        ProjectSubcommand::Show { id } => {
            let project_id = resolve_project(store, id)?;
            let canvas = Canvas::open(&mut *store, project_id, *config)?;
            print_tree(&canvas, out)
        }
    }
}

/// Print the project title and its checklists as an indented tree.
fn print_tree<G: Gateway>(canvas: &Canvas<G>, out: &mut dyn Write) -> Result<(), AppError> {
    let project = canvas.project();
    writeln!(out, "{} ({})", project.title, project.id)?;
    let mut stack: Vec<(ChecklistId, usize)> =
        canvas.scene().children_of(NodeRef::Root).iter().rev().map(|id| (*id, 1)).collect();
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = canvas.scene().node(&id) else {
            continue;
        };
        let (done, applicable) = progress(node.checks().iter().map(|c| c.state));
        let rect = node.rect();
        writeln!(
            out,
            "{:indent$}- {} [{done}/{applicable}] {id} @ ({}, {})",
            "",
            node.title(),
            rect.x,
            rect.y,
            indent = (depth - 1) * 2
        )?;
        stack.extend(canvas.scene().children_of(NodeRef::Checklist(id)).iter().rev().map(|c| (*c, depth + 1)));
    }
    Ok(())
}

/// Checked items over items that are not marked not-applicable.
fn progress(states: impl Iterator<Item = CheckState>) -> (usize, usize) {
    states.fold((0, 0), |(done, applicable), state| match state {
        CheckState::Checked => (done + 1, applicable + 1),
        CheckState::Unchecked => (done, applicable + 1),
        CheckState::NotApplicable => (done, applicable),
    })
}

// =============================================================================
// NODES
// =============================================================================

fn run_node<S: ProjectStore>(
    store: &mut S,
    command: NodeSubcommand,
    config: &CanvasConfig,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    match command {
        NodeSubcommand::Add { title, items, parent, at: (x, y), project } => {
            let project_id = match parent {
                Some(parent) => store.checklist_project(parent)?,
                None => resolve_project(store, project)?,
            };
            let mut canvas = Canvas::open(&mut *store, project_id, *config)?;
            let draft = ChecklistDraft::new(title, items.into_iter().map(CheckDraft::new).collect());
            print_actions(out, &canvas.create_child(NodeRef::from_parent(parent), Point::new(x, y), &draft)?)
        }
        NodeSubcommand::Move { id, x, y } => {
            let mut canvas = open_for_checklist(store, id, config)?;
            print_actions(out, &canvas.move_node(id, x, y)?)
        }
        NodeSubcommand::Edit { id, title, items } => {
            let mut canvas = open_for_checklist(store, id, config)?;
            let node = canvas.scene().node(&id).ok_or(CanvasError::NodeNotFound(id))?;
            let current = ChecklistDraft::from_checklist(node.title(), node.checks());
            let checks = if items.is_empty() {
                current.checks
            } else {
                items.iter().map(String::as_str).map(parse_item).collect()
            };
            let draft = ChecklistDraft { title: title.unwrap_or(current.title), checks };
            print_actions(out, &canvas.edit_node(id, &draft)?)
        }
        NodeSubcommand::Delete { id } => {
            let mut canvas = open_for_checklist(store, id, config)?;
            print_actions(out, &canvas.delete_node(id)?)
        }
    }
}

/// `<check-id>=text` edits an existing item; anything else is a new item.
fn parse_item(raw: &str) -> CheckDraft {
    if let Some((head, text)) = raw.split_once('=') {
        if let Ok(id) = Uuid::parse_str(head.trim()) {
            return CheckDraft::existing(id, text);
        }
    }
    CheckDraft::new(raw)
}

// =============================================================================
// REPLAY
// =============================================================================

fn replay<S: ProjectStore>(
    store: &mut S,
    path: &Path,
    project: Option<ProjectId>,
    config: &CanvasConfig,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let events: Vec<InputEvent> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let project_id = resolve_project(store, project)?;
    let mut canvas = Canvas::open(&mut *store, project_id, *config)?;

    let mut rejected = 0usize;
    for (index, event) in events.iter().enumerate() {
        match canvas.apply_input(event) {
            Ok(actions) => print_actions(out, &actions)?,
            Err(e) => {
                rejected += 1;
                warn!(index, error = %e, "replayed event rejected");
            }
        }
    }
    info!(events = events.len(), rejected, "replay finished");
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

/// The explicit project, else the most recently accessed one.
fn resolve_project<S: ProjectStore>(store: &mut S, explicit: Option<ProjectId>) -> Result<ProjectId, AppError> {
    if let Some(id) = explicit {
        return Ok(id);
    }
    store
        .last_accessed_project()?
        .ok_or_else(|| AppError::Usage("no projects yet; create one with `meti project new <title>`".into()))
}

fn open_for_checklist<'a, S: ProjectStore>(
    store: &'a mut S,
    id: ChecklistId,
    config: &CanvasConfig,
) -> Result<Canvas<&'a mut S>, AppError> {
    let project_id = store.checklist_project(id)?;
    Ok(Canvas::open(store, project_id, *config)?)
}

fn print_actions(out: &mut dyn Write, actions: &[Action]) -> Result<(), AppError> {
    for action in actions {
        writeln!(out, "{action:?}")?;
    }
    Ok(())
}

fn print_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<(), AppError> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}
