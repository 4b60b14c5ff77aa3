//! Storage gateway: the CRUD contract the canvas persists through.
//!
//! DESIGN
//! ======
//! Calls are synchronous and run on the caller's thread; the engine blocks
//! on them at the end of a gesture. `MemoryGateway` keeps everything in
//! process and backs the tests and the CLI's in-memory mode. A relational
//! implementation lives in the host application.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::doc::{Check, CheckId, CheckState, Checklist, ChecklistId, Project, ProjectId};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    #[error("checklist not found: {0}")]
    ChecklistNotFound(ChecklistId),
    #[error("check not found: {0}")]
    CheckNotFound(CheckId),
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Persistence operations consumed by the canvas.
pub trait Gateway {
    /// All checklists of a project, each with its checks ordered by position.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the read fails.
    fn list_checklists(&mut self, project_id: ProjectId) -> Result<Vec<Checklist>, GatewayError>;

    /// Insert a checklist and return its id.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the insert fails.
    fn create_checklist(
        &mut self,
        project_id: ProjectId,
        parent_id: Option<ChecklistId>,
        title: &str,
        x: f64,
        y: f64,
    ) -> Result<ChecklistId, GatewayError>;

    /// # Errors
    ///
    /// Returns `ChecklistNotFound` or a backend error.
    fn update_checklist_position(&mut self, id: ChecklistId, x: f64, y: f64) -> Result<(), GatewayError>;

    /// # Errors
    ///
    /// Returns `ChecklistNotFound` or a backend error.
    fn update_checklist_content(&mut self, id: ChecklistId, title: &str) -> Result<(), GatewayError>;

    /// Delete a checklist and its checks. The caller guarantees it has no children.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistNotFound` or a backend error.
    fn delete_checklist(&mut self, id: ChecklistId) -> Result<(), GatewayError>;

    /// # Errors
    ///
    /// Returns `ChecklistNotFound` or a backend error.
    fn create_check(
        &mut self,
        checklist_id: ChecklistId,
        content: &str,
        state: CheckState,
        position: i64,
    ) -> Result<CheckId, GatewayError>;

    /// # Errors
    ///
    /// Returns `CheckNotFound` or a backend error.
    fn update_check(&mut self, id: CheckId, content: &str, state: CheckState, position: i64)
    -> Result<(), GatewayError>;

    /// # Errors
    ///
    /// Returns `CheckNotFound` or a backend error.
    fn delete_check(&mut self, id: CheckId) -> Result<(), GatewayError>;

    /// # Errors
    ///
    /// Returns `ProjectNotFound` or a backend error.
    fn get_project(&mut self, id: ProjectId) -> Result<Project, GatewayError>;

    /// # Errors
    ///
    /// Returns `ProjectNotFound` or a backend error.
    fn update_project_last_accessed(&mut self, id: ProjectId) -> Result<(), GatewayError>;

    /// Persist the 1:1 viewport center.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` or a backend error.
    fn update_project_view(&mut self, id: ProjectId, x: f64, y: f64) -> Result<(), GatewayError>;

    /// # Errors
    ///
    /// Returns `ProjectNotFound` or a backend error.
    fn update_project_zoomed_out(&mut self, id: ProjectId, zoomed_out: bool) -> Result<(), GatewayError>;
}

/// Lending a gateway to a canvas keeps it usable by the host afterwards.
impl<G: Gateway + ?Sized> Gateway for &mut G {
    fn list_checklists(&mut self, project_id: ProjectId) -> Result<Vec<Checklist>, GatewayError> {
        (**self).list_checklists(project_id)
    }

    fn create_checklist(
        &mut self,
        project_id: ProjectId,
        parent_id: Option<ChecklistId>,
        title: &str,
        x: f64,
        y: f64,
    ) -> Result<ChecklistId, GatewayError> {
        (**self).create_checklist(project_id, parent_id, title, x, y)
    }

    fn update_checklist_position(&mut self, id: ChecklistId, x: f64, y: f64) -> Result<(), GatewayError> {
        (**self).update_checklist_position(id, x, y)
    }

    fn update_checklist_content(&mut self, id: ChecklistId, title: &str) -> Result<(), GatewayError> {
        (**self).update_checklist_content(id, title)
    }

    fn delete_checklist(&mut self, id: ChecklistId) -> Result<(), GatewayError> {
        (**self).delete_checklist(id)
    }

    fn create_check(
        &mut self,
        checklist_id: ChecklistId,
        content: &str,
        state: CheckState,
        position: i64,
    ) -> Result<CheckId, GatewayError> {
        (**self).create_check(checklist_id, content, state, position)
    }

    fn update_check(
        &mut self,
        id: CheckId,
        content: &str,
        state: CheckState,
        position: i64,
    ) -> Result<(), GatewayError> {
        (**self).update_check(id, content, state, position)
    }

    fn delete_check(&mut self, id: CheckId) -> Result<(), GatewayError> {
        (**self).delete_check(id)
    }

    fn get_project(&mut self, id: ProjectId) -> Result<Project, GatewayError> {
        (**self).get_project(id)
    }

    fn update_project_last_accessed(&mut self, id: ProjectId) -> Result<(), GatewayError> {
        (**self).update_project_last_accessed(id)
    }

    fn update_project_view(&mut self, id: ProjectId, x: f64, y: f64) -> Result<(), GatewayError> {
        (**self).update_project_view(id, x, y)
    }

    fn update_project_zoomed_out(&mut self, id: ProjectId, zoomed_out: bool) -> Result<(), GatewayError> {
        (**self).update_project_zoomed_out(id, zoomed_out)
    }
}

// =============================================================================
// IN-MEMORY GATEWAY
// =============================================================================

/// Gateway that keeps all records in memory.
///
/// Every write is also appended to [`MemoryGateway::writes`] so callers can
/// assert exactly which mutations reached storage.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    projects: BTreeMap<ProjectId, Project>,
    checklists: BTreeMap<ChecklistId, Checklist>,
    /// Logical clock used for `last_accessed`.
    clock: i64,
    writes: Vec<String>,
    /// When set, every call fails with a backend error.
    fail: bool,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project and return its id.
    pub fn insert_project(&mut self, title: &str, is_template: bool) -> ProjectId {
        self.clock += 1;
        let project = Project {
            id: Uuid::new_v4(),
            title: title.to_string(),
            is_template,
            created_at: self.clock,
            last_accessed: self.clock,
            view_x: None,
            view_y: None,
            zoomed_out: false,
        };
        let id = project.id;
        self.projects.insert(id, project);
        id
    }

    /// Insert a complete checklist record as-is (checks included).
    pub fn insert_checklist(&mut self, checklist: Checklist) {
        self.checklists.insert(checklist.id, checklist);
    }

    /// All projects, most recently accessed first.
    #[must_use]
    pub fn projects(&self) -> Vec<Project> {
        let mut all: Vec<Project> = self.projects.values().cloned().collect();
        all.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
        all
    }

    /// Direct read access to a stored checklist.
    #[must_use]
    pub fn checklist(&self, id: &ChecklistId) -> Option<&Checklist> {
        self.checklists.get(id)
    }

    /// Mutations performed so far, one line per call.
    #[must_use]
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    /// Make every subsequent call fail, to exercise error paths.
    pub fn set_failing(&mut self, fail: bool) {
        self.fail = fail;
    }

    fn check_available(&self) -> Result<(), GatewayError> {
        if self.fail {
            return Err(GatewayError::Backend("memory gateway set to fail".into()));
        }
        Ok(())
    }

    fn project_mut(&mut self, id: ProjectId) -> Result<&mut Project, GatewayError> {
        self.projects.get_mut(&id).ok_or(GatewayError::ProjectNotFound(id))
    }

    fn checklist_mut(&mut self, id: ChecklistId) -> Result<&mut Checklist, GatewayError> {
        self.checklists.get_mut(&id).ok_or(GatewayError::ChecklistNotFound(id))
    }

    fn find_check_mut(&mut self, id: CheckId) -> Result<&mut Check, GatewayError> {
        self.checklists
            .values_mut()
            .flat_map(|c| c.checks.iter_mut())
            .find(|c| c.id == id)
            .ok_or(GatewayError::CheckNotFound(id))
    }
}

impl Gateway for MemoryGateway {
    fn list_checklists(&mut self, project_id: ProjectId) -> Result<Vec<Checklist>, GatewayError> {
        self.check_available()?;
        Ok(self
            .checklists
            .values()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .map(|mut c| {
                c.checks.sort_by_key(|k| k.position);
                c
            })
            .collect())
    }

    fn create_checklist(
        &mut self,
        project_id: ProjectId,
        parent_id: Option<ChecklistId>,
        title: &str,
        x: f64,
        y: f64,
    ) -> Result<ChecklistId, GatewayError> {
        self.check_available()?;
        if !self.projects.contains_key(&project_id) {
            return Err(GatewayError::ProjectNotFound(project_id));
        }
        if let Some(parent) = parent_id {
            if !self.checklists.contains_key(&parent) {
                return Err(GatewayError::ChecklistNotFound(parent));
            }
        }
        let id = Uuid::new_v4();
        self.checklists.insert(
            id,
            Checklist {
                id,
                project_id,
                parent_id,
                title: title.to_string(),
                position_x: x,
                position_y: y,
                checks: Vec::new(),
            },
        );
        self.writes.push(format!("create_checklist {id}"));
        Ok(id)
    }

    fn update_checklist_position(&mut self, id: ChecklistId, x: f64, y: f64) -> Result<(), GatewayError> {
        self.check_available()?;
        let checklist = self.checklist_mut(id)?;
        checklist.position_x = x;
        checklist.position_y = y;
        self.writes.push(format!("update_checklist_position {id} {x} {y}"));
        Ok(())
    }

    fn update_checklist_content(&mut self, id: ChecklistId, title: &str) -> Result<(), GatewayError> {
        self.check_available()?;
        title.clone_into(&mut self.checklist_mut(id)?.title);
        self.writes.push(format!("update_checklist_content {id}"));
        Ok(())
    }

    fn delete_checklist(&mut self, id: ChecklistId) -> Result<(), GatewayError> {
        self.check_available()?;
        if self.checklists.remove(&id).is_none() {
            return Err(GatewayError::ChecklistNotFound(id));
        }
        self.writes.push(format!("delete_checklist {id}"));
        Ok(())
    }

    fn create_check(
        &mut self,
        checklist_id: ChecklistId,
        content: &str,
        state: CheckState,
        position: i64,
    ) -> Result<CheckId, GatewayError> {
        self.check_available()?;
        let id = Uuid::new_v4();
        self.checklist_mut(checklist_id)?.checks.push(Check {
            id,
            checklist_id,
            content: content.to_string(),
            state,
            position,
        });
        self.writes.push(format!("create_check {id}"));
        Ok(id)
    }

    fn update_check(
        &mut self,
        id: CheckId,
        content: &str,
        state: CheckState,
        position: i64,
    ) -> Result<(), GatewayError> {
        self.check_available()?;
        let check = self.find_check_mut(id)?;
        content.clone_into(&mut check.content);
        check.state = state;
        check.position = position;
        self.writes.push(format!("update_check {id}"));
        Ok(())
    }

    fn delete_check(&mut self, id: CheckId) -> Result<(), GatewayError> {
        self.check_available()?;
        let owner = self
            .checklists
            .values_mut()
            .find(|c| c.checks.iter().any(|k| k.id == id))
            .ok_or(GatewayError::CheckNotFound(id))?;
        owner.checks.retain(|k| k.id != id);
        self.writes.push(format!("delete_check {id}"));
        Ok(())
    }

    fn get_project(&mut self, id: ProjectId) -> Result<Project, GatewayError> {
        self.check_available()?;
        self.projects.get(&id).cloned().ok_or(GatewayError::ProjectNotFound(id))
    }

    fn update_project_last_accessed(&mut self, id: ProjectId) -> Result<(), GatewayError> {
        self.check_available()?;
        self.clock += 1;
        let now = self.clock;
        self.project_mut(id)?.last_accessed = now;
        self.writes.push(format!("update_project_last_accessed {id}"));
        Ok(())
    }

    fn update_project_view(&mut self, id: ProjectId, x: f64, y: f64) -> Result<(), GatewayError> {
        self.check_available()?;
        let project = self.project_mut(id)?;
        project.view_x = Some(x);
        project.view_y = Some(y);
        self.writes.push(format!("update_project_view {id} {x} {y}"));
        Ok(())
    }

    fn update_project_zoomed_out(&mut self, id: ProjectId, zoomed_out: bool) -> Result<(), GatewayError> {
        self.check_available()?;
        self.project_mut(id)?.zoomed_out = zoomed_out;
        self.writes.push(format!("update_project_zoomed_out {id} {zoomed_out}"));
        Ok(())
    }
}
