/// Project assignment (works-on) rows and the hours upsert
///
/// # Schema
///
/// ```sql
/// CREATE TABLE works_on (
///     essn CHAR(9) NOT NULL REFERENCES employee(ssn),
///     pno INTEGER NOT NULL REFERENCES project(pnumber),
///     hours DOUBLE PRECISION NOT NULL,
///     PRIMARY KEY (essn, pno)
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// One assignment on a project's detail page
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AssignmentRow {
    /// Employee SSN
    pub ssn: String,

    /// Employee full name
    pub full_name: String,

    /// Hours worked on this project
    pub hours: f64,
}

impl AssignmentRow {
    /// Employees currently assigned to a project, with their hours
    pub async fn list_for_project(pool: &PgPool, pnumber: i32) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT w.essn AS ssn,
                   e.fname || ' ' || COALESCE(e.minit || ' ', '') || e.lname AS full_name,
                   w.hours
            FROM works_on w
            JOIN employee e ON e.ssn = w.essn
            WHERE w.pno = $1
            ORDER BY e.lname, e.fname
            "#,
        )
        .bind(pnumber)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Adds hours to an assignment, creating it when absent
    ///
    /// Single atomic statement: the conflict clause accumulates hours on the
    /// existing row instead of overwriting, so concurrent calls for the same
    /// (employee, project) key cannot lose updates. Never implemented as a
    /// read-modify-write in application code.
    pub async fn upsert(
        pool: &PgPool,
        pnumber: i32,
        essn: &str,
        hours: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO works_on (essn, pno, hours)
            VALUES ($1, $2, $3)
            ON CONFLICT (essn, pno)
            DO UPDATE SET hours = works_on.hours + EXCLUDED.hours
            "#,
        )
        .bind(essn)
        .bind(pnumber)
        .bind(hours)
        .execute(pool)
        .await?;

        Ok(())
    }
}
