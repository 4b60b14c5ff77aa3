//! SQLite-backed storage gateway and host-level project management.
//!
//! DESIGN
//! ======
//! The canvas calls its gateway synchronously, so `SqliteGateway` owns a
//! current-thread tokio runtime and blocks on each query. Every call is a
//! single statement or a short read; there is no transaction spanning a
//! gesture.
//!
//! ERROR HANDLING
//! ==============
//! `sqlx` errors are boxed into `GatewayError::Backend`. An update or delete
//! that touches no row reports the matching not-found variant.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::BTreeMap;

use canvas::doc::{Check, CheckId, CheckState, Checklist, ChecklistId, Project, ProjectId};
use canvas::gateway::{Gateway, GatewayError, MemoryGateway};
use sqlx::SqlitePool;
use tokio::runtime::Runtime;
use tracing::info;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;

// =============================================================================
// TYPES
// =============================================================================

/// Project-level operations the CLI needs on top of the canvas gateway.
pub trait ProjectStore: Gateway {
    /// # Errors
    ///
    /// Returns a backend error if the insert fails.
    fn create_project(&mut self, title: &str, is_template: bool) -> Result<ProjectId, GatewayError>;

    /// All projects, most recently accessed first.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the read fails.
    fn list_projects(&mut self) -> Result<Vec<Project>, GatewayError>;

    /// # Errors
    ///
    /// Returns a backend error if the read fails.
    fn last_accessed_project(&mut self) -> Result<Option<ProjectId>, GatewayError>;

    /// The project a checklist belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistNotFound` or a backend error.
    fn checklist_project(&mut self, id: ChecklistId) -> Result<ProjectId, GatewayError>;
}

type ProjectRow = (Uuid, String, bool, i64, i64, Option<f64>, Option<f64>, bool);

const PROJECT_COLUMNS: &str = "id, title, is_template, created_at, last_accessed, view_x, view_y, zoomed_out";

/// Next `last_accessed` value: wall clock, but always past every stored value
/// so the most recent open wins even within one second.
const NEXT_ACCESS: &str = "MAX(?1, (SELECT COALESCE(MAX(last_accessed), 0) + 1 FROM projects))";

fn project_from_row(row: ProjectRow) -> Project {
    let (id, title, is_template, created_at, last_accessed, view_x, view_y, zoomed_out) = row;
    Project { id, title, is_template, created_at, last_accessed, view_x, view_y, zoomed_out }
}

fn backend(err: sqlx::Error) -> GatewayError {
    GatewayError::Backend(Box::new(err))
}

fn now_secs() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

// =============================================================================
// SQLITE GATEWAY
// =============================================================================

pub struct SqliteGateway {
    runtime: Runtime,
    pool: SqlitePool,
}

impl SqliteGateway {
    /// Open (creating if needed) the database at `database_url` and migrate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot start or the database cannot be
    /// opened or migrated.
    pub fn connect(database_url: &str) -> Result<Self, AppError> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let pool = runtime.block_on(db::init_pool(database_url))?;
        info!(%database_url, "database ready");
        Ok(Self { runtime, pool })
    }

    async fn fetch_checklists(pool: &SqlitePool, project_id: ProjectId) -> Result<Vec<Checklist>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (Uuid, Option<Uuid>, String, f64, f64)>(
            "SELECT id, parent_id, title, position_x, position_y FROM checklists
             WHERE project_id = ?1 ORDER BY rowid",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        let check_rows = sqlx::query_as::<_, (Uuid, Uuid, String, i64, i64)>(
            "SELECT k.id, k.checklist_id, k.content, k.state, k.position FROM checks k
             JOIN checklists c ON c.id = k.checklist_id
             WHERE c.project_id = ?1 ORDER BY k.checklist_id, k.position",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        let mut checks: BTreeMap<ChecklistId, Vec<Check>> = BTreeMap::new();
        for (id, checklist_id, content, state, position) in check_rows {
            checks.entry(checklist_id).or_default().push(Check {
                id,
                checklist_id,
                content,
                state: CheckState::from_code(state),
                position,
            });
        }

        Ok(rows
            .into_iter()
            .map(|(id, parent_id, title, position_x, position_y)| Checklist {
                id,
                project_id,
                parent_id,
                title,
                position_x,
                position_y,
                checks: checks.remove(&id).unwrap_or_default(),
            })
            .collect())
    }

    /// Run a single-row write and map "no row touched" to `missing`.
    fn execute_one<'a>(
        &self,
        query: sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>>,
        missing: GatewayError,
    ) -> Result<(), GatewayError> {
        let result = self.runtime.block_on(query.execute(&self.pool)).map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(missing);
        }
        Ok(())
    }
}

impl Gateway for SqliteGateway {
    fn list_checklists(&mut self, project_id: ProjectId) -> Result<Vec<Checklist>, GatewayError> {
        self.runtime.block_on(Self::fetch_checklists(&self.pool, project_id)).map_err(backend)
    }

    fn create_checklist(
        &mut self,
        project_id: ProjectId,
        parent_id: Option<ChecklistId>,
        title: &str,
        x: f64,
        y: f64,
    ) -> Result<ChecklistId, GatewayError> {
        let id = Uuid::new_v4();
        self.runtime
            .block_on(
                sqlx::query(
                    "INSERT INTO checklists (id, project_id, parent_id, title, position_x, position_y)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .bind(id)
                .bind(project_id)
                .bind(parent_id)
                .bind(title)
                .bind(x)
                .bind(y)
                .execute(&self.pool),
            )
            .map_err(backend)?;
        Ok(id)
    }

    fn update_checklist_position(&mut self, id: ChecklistId, x: f64, y: f64) -> Result<(), GatewayError> {
        let query = sqlx::query("UPDATE checklists SET position_x = ?1, position_y = ?2 WHERE id = ?3")
            .bind(x)
            .bind(y)
            .bind(id);
        self.execute_one(query, GatewayError::ChecklistNotFound(id))
    }

    fn update_checklist_content(&mut self, id: ChecklistId, title: &str) -> Result<(), GatewayError> {
        let query = sqlx::query("UPDATE checklists SET title = ?1 WHERE id = ?2")
            .bind(title)
            .bind(id);
        self.execute_one(query, GatewayError::ChecklistNotFound(id))
    }

    fn delete_checklist(&mut self, id: ChecklistId) -> Result<(), GatewayError> {
        let query = sqlx::query("DELETE FROM checklists WHERE id = ?1").bind(id);
        self.execute_one(query, GatewayError::ChecklistNotFound(id))
    }

    fn create_check(
        &mut self,
        checklist_id: ChecklistId,
        content: &str,
        state: CheckState,
        position: i64,
    ) -> Result<CheckId, GatewayError> {
        let id = Uuid::new_v4();
        self.runtime
            .block_on(
                sqlx::query(
                    "INSERT INTO checks (id, checklist_id, content, state, position) VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .bind(id)
                .bind(checklist_id)
                .bind(content)
                .bind(state.code())
                .bind(position)
                .execute(&self.pool),
            )
            .map_err(|e| {
                if e.as_database_error().is_some_and(|db| db.is_foreign_key_violation()) {
                    GatewayError::ChecklistNotFound(checklist_id)
                } else {
                    backend(e)
                }
            })?;
        Ok(id)
    }

    fn update_check(
        &mut self,
        id: CheckId,
        content: &str,
        state: CheckState,
        position: i64,
    ) -> Result<(), GatewayError> {
        let query = sqlx::query("UPDATE checks SET content = ?1, state = ?2, position = ?3 WHERE id = ?4")
            .bind(content)
            .bind(state.code())
            .bind(position)
            .bind(id);
        self.execute_one(query, GatewayError::CheckNotFound(id))
    }

    fn delete_check(&mut self, id: CheckId) -> Result<(), GatewayError> {
        let query = sqlx::query("DELETE FROM checks WHERE id = ?1").bind(id);
        self.execute_one(query, GatewayError::CheckNotFound(id))
    }

    fn get_project(&mut self, id: ProjectId) -> Result<Project, GatewayError> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1");
        let row = self
            .runtime
            .block_on(sqlx::query_as::<_, ProjectRow>(&sql).bind(id).fetch_optional(&self.pool))
            .map_err(backend)?;
        row.map(project_from_row).ok_or(GatewayError::ProjectNotFound(id))
    }

    fn update_project_last_accessed(&mut self, id: ProjectId) -> Result<(), GatewayError> {
        let sql = format!("UPDATE projects SET last_accessed = {NEXT_ACCESS} WHERE id = ?2");
        let query = sqlx::query(&sql).bind(now_secs()).bind(id);
        self.execute_one(query, GatewayError::ProjectNotFound(id))
    }

    fn update_project_view(&mut self, id: ProjectId, x: f64, y: f64) -> Result<(), GatewayError> {
        let query = sqlx::query("UPDATE projects SET view_x = ?1, view_y = ?2 WHERE id = ?3")
            .bind(x)
            .bind(y)
            .bind(id);
        self.execute_one(query, GatewayError::ProjectNotFound(id))
    }

    fn update_project_zoomed_out(&mut self, id: ProjectId, zoomed_out: bool) -> Result<(), GatewayError> {
        let query = sqlx::query("UPDATE projects SET zoomed_out = ?1 WHERE id = ?2")
            .bind(zoomed_out)
            .bind(id);
        self.execute_one(query, GatewayError::ProjectNotFound(id))
    }
}

impl ProjectStore for SqliteGateway {
    fn create_project(&mut self, title: &str, is_template: bool) -> Result<ProjectId, GatewayError> {
        let id = Uuid::new_v4();
        let sql = format!(
            "INSERT INTO projects (id, title, is_template, created_at, last_accessed)
             VALUES (?2, ?3, ?4, ?1, {NEXT_ACCESS})"
        );
        self.runtime
            .block_on(
                sqlx::query(&sql)
                    .bind(now_secs())
                    .bind(id)
                    .bind(title)
                    .bind(is_template)
                    .execute(&self.pool),
            )
            .map_err(backend)?;
        info!(%id, %title, is_template, "project created");
        Ok(id)
    }

    fn list_projects(&mut self) -> Result<Vec<Project>, GatewayError> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY last_accessed DESC");
        let rows = self
            .runtime
            .block_on(sqlx::query_as::<_, ProjectRow>(&sql).fetch_all(&self.pool))
            .map_err(backend)?;
        Ok(rows.into_iter().map(project_from_row).collect())
    }

    fn last_accessed_project(&mut self) -> Result<Option<ProjectId>, GatewayError> {
        self.runtime
            .block_on(
                sqlx::query_scalar::<_, Uuid>("SELECT id FROM projects ORDER BY last_accessed DESC LIMIT 1")
                    .fetch_optional(&self.pool),
            )
            .map_err(backend)
    }

    fn checklist_project(&mut self, id: ChecklistId) -> Result<ProjectId, GatewayError> {
        let project = self
            .runtime
            .block_on(
                sqlx::query_scalar::<_, Uuid>("SELECT project_id FROM checklists WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(&self.pool),
            )
            .map_err(backend)?;
        project.ok_or(GatewayError::ChecklistNotFound(id))
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

impl ProjectStore for MemoryGateway {
    fn create_project(&mut self, title: &str, is_template: bool) -> Result<ProjectId, GatewayError> {
        Ok(self.insert_project(title, is_template))
    }

    fn list_projects(&mut self) -> Result<Vec<Project>, GatewayError> {
        Ok(self.projects())
    }

    fn last_accessed_project(&mut self) -> Result<Option<ProjectId>, GatewayError> {
        Ok(self.projects().first().map(|p| p.id))
    }

    fn checklist_project(&mut self, id: ChecklistId) -> Result<ProjectId, GatewayError> {
        self.checklist(&id).map(|c| c.project_id).ok_or(GatewayError::ChecklistNotFound(id))
    }
}
