/// Employee model, overview query, and CRUD operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE employee (
///     ssn CHAR(9) PRIMARY KEY,
///     fname VARCHAR(32) NOT NULL,
///     minit CHAR(1),
///     lname VARCHAR(32) NOT NULL,
///     address VARCHAR(128) NOT NULL,
///     sex CHAR(1) NOT NULL,
///     salary INTEGER NOT NULL,
///     super_ssn CHAR(9) REFERENCES employee(ssn),
///     dno INTEGER REFERENCES department(dnumber),
///     bdate DATE,
///     empdate DATE
/// );
/// ```
///
/// The overview query left-joins the employee roster to the department table
/// and to two per-employee aggregate subqueries (dependent count, project
/// count + hours sum), COALESCE-ing every aggregate to 0 so employees with
/// no dependents or assignments still appear with explicit zeros.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Full employee row joined with its department name, for the roster page
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeRow {
    /// SSN-like natural key; unique and immutable
    pub ssn: String,

    /// First name
    pub fname: String,

    /// Middle initial (single character when present)
    pub minit: Option<String>,

    /// Last name
    pub lname: String,

    /// Street address
    pub address: String,

    /// Single-character sex code
    pub sex: String,

    /// Annual salary
    pub salary: i32,

    /// Supervisor SSN (self-referential, optional)
    pub super_ssn: Option<String>,

    /// Department number
    pub dno: Option<i32>,

    /// Birth date
    pub bdate: Option<NaiveDate>,

    /// Hire date
    pub empdate: Option<NaiveDate>,

    /// Department name from the joined department row
    pub department_name: Option<String>,
}

/// Input for creating an employee (also the shape of one imported sheet row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub ssn: String,
    pub fname: String,
    pub minit: Option<String>,
    pub lname: String,
    pub address: String,
    pub sex: String,
    pub salary: i32,
    pub super_ssn: Option<String>,
    pub dno: i32,
    pub bdate: Option<NaiveDate>,
    pub empdate: Option<NaiveDate>,
}

/// Input for editing an employee
///
/// Only address, salary, and department are mutable post-creation; the SSN
/// and name fields are immutable in this design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub address: String,
    pub salary: i32,
    pub dno: i32,
}

/// One row of the employee overview page
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeOverviewRow {
    /// Employee SSN
    pub ssn: String,

    /// "First [M ]Last", assembled in SQL so a null middle initial collapses cleanly
    pub full_name: String,

    /// Department name; None when the employee has no department
    pub department_name: Option<String>,

    /// Number of dependents (0 when none)
    pub dependent_count: i64,

    /// Number of project assignments (0 when none)
    pub project_count: i64,

    /// Sum of hours across all assignments (0 when none)
    pub total_hours: f64,
}

/// Filters for the employee overview
///
/// Both filters are identity filters when unset: an empty search string and
/// a `None` department must match every row, never "match nothing". The
/// department filter is bound as a nullable integer parameter — never as an
/// empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeFilter {
    /// Case-insensitive substring match against "first last"; empty = match all
    pub search: String,

    /// Exact department id; None = match all
    pub dept: Option<i32>,
}

/// Whitelisted sort orders for the employee overview
///
/// The ORDER BY fragment is chosen from this closed set on the server;
/// client input selects a variant by token and can never reach the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeSort {
    /// Last name, then first name, ascending (default)
    NameAsc,
    /// Last name, then first name, descending
    NameDesc,
    /// Total assignment hours ascending
    HoursAsc,
    /// Total assignment hours descending
    HoursDesc,
}

impl EmployeeSort {
    /// Maps a client-supplied sort token; unrecognized tokens fall back to name ascending
    pub fn from_token(token: &str) -> Self {
        match token {
            "name_asc" => EmployeeSort::NameAsc,
            "name_desc" => EmployeeSort::NameDesc,
            "hours_asc" => EmployeeSort::HoursAsc,
            "hours_desc" => EmployeeSort::HoursDesc,
            _ => EmployeeSort::NameAsc,
        }
    }

    /// Token form, for echoing back to the client
    pub fn token(&self) -> &'static str {
        match self {
            EmployeeSort::NameAsc => "name_asc",
            EmployeeSort::NameDesc => "name_desc",
            EmployeeSort::HoursAsc => "hours_asc",
            EmployeeSort::HoursDesc => "hours_desc",
        }
    }

    /// Static ORDER BY fragment for this variant
    pub fn order_clause(&self) -> &'static str {
        match self {
            EmployeeSort::NameAsc => "e.lname ASC, e.fname ASC",
            EmployeeSort::NameDesc => "e.lname DESC, e.fname DESC",
            EmployeeSort::HoursAsc => "total_hours ASC",
            EmployeeSort::HoursDesc => "total_hours DESC",
        }
    }
}

impl Default for EmployeeSort {
    fn default() -> Self {
        EmployeeSort::NameAsc
    }
}

/// Builds the employee overview statement for a sort order
///
/// Only the whitelisted ORDER BY fragment is spliced into the text; all
/// filter values are bound parameters.
fn overview_sql(sort: EmployeeSort) -> String {
    format!(
        r#"
        SELECT e.ssn,
               e.fname || ' ' || COALESCE(e.minit || ' ', '') || e.lname AS full_name,
               d.dname AS department_name,
               COALESCE(dep.dependent_count, 0) AS dependent_count,
               COALESCE(w.project_count, 0) AS project_count,
               COALESCE(w.total_hours, 0)::float8 AS total_hours
        FROM employee e
        LEFT JOIN department d ON e.dno = d.dnumber
        LEFT JOIN (
            SELECT essn, COUNT(*) AS dependent_count
            FROM dependent
            GROUP BY essn
        ) dep ON dep.essn = e.ssn
        LEFT JOIN (
            SELECT essn, COUNT(*) AS project_count, SUM(hours) AS total_hours
            FROM works_on
            GROUP BY essn
        ) w ON w.essn = e.ssn
        WHERE ($1 = '' OR (e.fname || ' ' || e.lname) ILIKE $2)
          AND ($3::int4 IS NULL OR e.dno = $3)
        ORDER BY {}
        "#,
        sort.order_clause()
    )
}

impl EmployeeOverviewRow {
    /// Runs the employee overview query
    ///
    /// An empty search string and a `None` department each short-circuit to
    /// "match all" inside the predicate.
    pub async fn fetch(
        pool: &PgPool,
        filter: &EmployeeFilter,
        sort: EmployeeSort,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let pattern = format!("%{}%", filter.search);

        let rows = sqlx::query_as::<_, EmployeeOverviewRow>(&overview_sql(sort))
            .bind(&filter.search)
            .bind(&pattern)
            .bind(filter.dept)
            .fetch_all(pool)
            .await?;

        Ok(rows)
    }
}

impl EmployeeRow {
    /// Full roster with department names, ordered by full name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT e.ssn, e.fname, e.minit, e.lname, e.address, e.sex, e.salary,
                   e.super_ssn, e.dno, e.bdate, e.empdate,
                   d.dname AS department_name
            FROM employee e
            LEFT JOIN department d ON e.dno = d.dnumber
            ORDER BY e.lname, e.fname
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Finds a single employee by SSN
    pub async fn find(pool: &PgPool, ssn: &str) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT e.ssn, e.fname, e.minit, e.lname, e.address, e.sex, e.salary,
                   e.super_ssn, e.dno, e.bdate, e.empdate,
                   d.dname AS department_name
            FROM employee e
            LEFT JOIN department d ON e.dno = d.dnumber
            WHERE e.ssn = $1
            "#,
        )
        .bind(ssn)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// Inserts a new employee
    ///
    /// Uniqueness of the SSN is delegated to the primary key; the caller
    /// classifies the violation via [`crate::models::MutationError`].
    pub async fn create(pool: &PgPool, data: &NewEmployee) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO employee
                (ssn, fname, minit, lname, address, sex, salary, super_ssn, dno, bdate, empdate)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&data.ssn)
        .bind(&data.fname)
        .bind(&data.minit)
        .bind(&data.lname)
        .bind(&data.address)
        .bind(&data.sex)
        .bind(data.salary)
        .bind(&data.super_ssn)
        .bind(data.dno)
        .bind(data.bdate)
        .bind(data.empdate)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Updates the mutable fields of an employee
    ///
    /// Returns `false` when no row matched the SSN; callers surface that as
    /// "not found" rather than a fault.
    pub async fn update(
        pool: &PgPool,
        ssn: &str,
        data: &EmployeeUpdate,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE employee
            SET address = $2, salary = $3, dno = $4
            WHERE ssn = $1
            "#,
        )
        .bind(ssn)
        .bind(&data.address)
        .bind(data.salary)
        .bind(data.dno)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes an employee by SSN
    ///
    /// Referential-integrity rejections (assignments, dependents, manager or
    /// supervisor references) surface as a foreign key violation for the
    /// caller to translate into an actionable message.
    pub async fn delete(pool: &PgPool, ssn: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employee WHERE ssn = $1")
            .bind(ssn)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Inserts a batch of employees inside a single transaction
    ///
    /// All-or-nothing: any row-level failure (typically a duplicate SSN)
    /// rolls back every prior insert in the batch. The transaction is rolled
    /// back on drop when an insert fails partway through.
    pub async fn insert_batch(pool: &PgPool, rows: &[NewEmployee]) -> Result<usize, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO employee
                    (ssn, fname, minit, lname, address, sex, salary, super_ssn, dno, bdate, empdate)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(&row.ssn)
            .bind(&row.fname)
            .bind(&row.minit)
            .bind(&row.lname)
            .bind(&row.address)
            .bind(&row.sex)
            .bind(row.salary)
            .bind(&row.super_ssn)
            .bind(row.dno)
            .bind(row.bdate)
            .bind(row.empdate)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_token_roundtrip() {
        for sort in [
            EmployeeSort::NameAsc,
            EmployeeSort::NameDesc,
            EmployeeSort::HoursAsc,
            EmployeeSort::HoursDesc,
        ] {
            assert_eq!(EmployeeSort::from_token(sort.token()), sort);
        }
    }

    #[test]
    fn test_unknown_sort_token_falls_back_to_name_asc() {
        assert_eq!(EmployeeSort::from_token(""), EmployeeSort::NameAsc);
        assert_eq!(EmployeeSort::from_token("salary_desc"), EmployeeSort::NameAsc);
        assert_eq!(
            EmployeeSort::from_token("hours_desc; DROP TABLE employee"),
            EmployeeSort::NameAsc
        );
        assert_eq!(EmployeeSort::default(), EmployeeSort::NameAsc);
    }

    #[test]
    fn test_order_clauses_are_static_whitelist() {
        assert_eq!(
            EmployeeSort::NameAsc.order_clause(),
            "e.lname ASC, e.fname ASC"
        );
        assert_eq!(EmployeeSort::HoursDesc.order_clause(), "total_hours DESC");
    }

    #[test]
    fn test_overview_sql_contains_only_whitelisted_order() {
        let sql = overview_sql(EmployeeSort::HoursDesc);
        assert!(sql.trim_end().ends_with("ORDER BY total_hours DESC"));
        // Filter values stay parameterized.
        assert!(sql.contains("($1 = '' OR (e.fname || ' ' || e.lname) ILIKE $2)"));
        assert!(sql.contains("($3::int4 IS NULL OR e.dno = $3)"));
    }

    #[test]
    fn test_overview_sql_coalesces_aggregates() {
        let sql = overview_sql(EmployeeSort::NameAsc);
        assert!(sql.contains("COALESCE(dep.dependent_count, 0)"));
        assert!(sql.contains("COALESCE(w.project_count, 0)"));
        assert!(sql.contains("COALESCE(w.total_hours, 0)"));
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let filter = EmployeeFilter::default();
        assert_eq!(filter.search, "");
        assert_eq!(filter.dept, None);
    }
}
