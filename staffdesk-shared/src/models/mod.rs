//! Database models and query shapes
//!
//! One module per entity, in the style of a thin data-access layer: each
//! model owns the SQL that produces or mutates it, and every query result
//! is an explicit named record type built at this boundary.
//!
//! - `app_user`: credential records and the admin/viewer role
//! - `employee`: employee rows, the employee overview query, CRUD, batch import
//! - `department`: department references and the managers overview
//! - `project`: project overview, project detail, and the assignment picker
//! - `assignment`: the works-on upsert

pub mod app_user;
pub mod assignment;
pub mod department;
pub mod employee;
pub mod project;

/// Store-level mutation failure, classified at the data-access boundary
///
/// Handlers translate these into user-facing messages instead of letting a
/// raw database fault escape past the handler boundary.
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    /// Unique constraint violation (e.g., duplicate employee SSN)
    #[error("duplicate key")]
    Duplicate,

    /// Foreign key violation (row still referenced, or reference target missing)
    #[error("row is referenced by or references other rows")]
    ForeignKey,

    /// Any other database failure
    #[error(transparent)]
    Other(#[from] sqlx::Error),
}

impl MutationError {
    /// Classifies a sqlx error by its constraint kind
    pub fn classify(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return MutationError::Duplicate;
            }
            if db_err.is_foreign_key_violation() {
                return MutationError::ForeignKey;
            }
        }
        MutationError::Other(err)
    }
}
