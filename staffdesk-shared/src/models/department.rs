/// Department references and the managers overview
///
/// # Schema
///
/// ```sql
/// CREATE TABLE department (
///     dnumber INTEGER PRIMARY KEY,
///     dname VARCHAR(64) NOT NULL,
///     mgr_ssn CHAR(9) REFERENCES employee(ssn)
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Department id + name, for the overview filter picker
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DepartmentRef {
    /// Department number
    pub dnumber: i32,

    /// Department name
    pub dname: String,
}

impl DepartmentRef {
    /// All departments ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, DepartmentRef>(
            "SELECT dnumber, dname FROM department ORDER BY dname",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

/// One row of the managers overview: per department, its manager, headcount,
/// and the hours its employees have logged across all assignments
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ManagerOverviewRow {
    /// Department number
    pub dnumber: i32,

    /// Department name
    pub dname: String,

    /// Manager full name; None when the department has no manager set
    pub manager_name: Option<String>,

    /// Employees in the department (0 when empty)
    pub employee_count: i64,

    /// Hours logged by those employees across all assignments (0 when none)
    pub total_hours: f64,
}

impl ManagerOverviewRow {
    /// Runs the managers overview query, one row per department ordered by id
    ///
    /// The per-department aggregate counts distinct employees so the join to
    /// `works_on` cannot inflate the headcount.
    pub async fn fetch(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ManagerOverviewRow>(
            r#"
            SELECT d.dnumber,
                   d.dname,
                   m.fname || ' ' || COALESCE(m.minit || ' ', '') || m.lname AS manager_name,
                   COALESCE(emp.employee_count, 0) AS employee_count,
                   COALESCE(emp.total_hours, 0)::float8 AS total_hours
            FROM department d
            LEFT JOIN employee m ON d.mgr_ssn = m.ssn
            LEFT JOIN (
                SELECT e.dno,
                       COUNT(DISTINCT e.ssn) AS employee_count,
                       COALESCE(SUM(w.hours), 0) AS total_hours
                FROM employee e
                LEFT JOIN works_on w ON w.essn = e.ssn
                GROUP BY e.dno
            ) emp ON emp.dno = d.dnumber
            ORDER BY d.dnumber
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
