//! Storage services used by the CLI commands.
//!
//! ARCHITECTURE
//! ============
//! `store` implements the canvas gateway on SQLite and adds the
//! project-level operations the CLI needs to pick a project.

pub mod store;
