/// Project overview and project detail queries
///
/// # Schema
///
/// ```sql
/// CREATE TABLE project (
///     pnumber INTEGER PRIMARY KEY,
///     pname VARCHAR(64) NOT NULL,
///     plocation VARCHAR(64) NOT NULL,
///     dnum INTEGER REFERENCES department(dnumber)
/// );
///
/// -- Derived aggregate supplied by the schema, not assembled per request:
/// CREATE VIEW project_staffing AS
/// SELECT pno, COUNT(*) AS headcount, SUM(hours) AS total_hours
/// FROM works_on GROUP BY pno;
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// One row of the project overview page
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectOverviewRow {
    /// Project number
    pub pnumber: i32,

    /// Project name
    pub pname: String,

    /// Project location
    pub plocation: String,

    /// Owning department name; None when unset
    pub department_name: Option<String>,

    /// Employees assigned (0 when none)
    pub headcount: i64,

    /// Total hours across all assignments (0 when none)
    pub total_hours: f64,
}

/// Whitelisted sort orders for the project overview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSort {
    /// Project name ascending (default)
    NameAsc,
    /// Headcount ascending
    HeadcountAsc,
    /// Headcount descending
    HeadcountDesc,
    /// Total hours ascending
    HoursAsc,
    /// Total hours descending
    HoursDesc,
}

impl ProjectSort {
    /// Maps a client-supplied sort token; unrecognized tokens fall back to name ascending
    pub fn from_token(token: &str) -> Self {
        match token {
            "name_asc" => ProjectSort::NameAsc,
            "headcount_asc" => ProjectSort::HeadcountAsc,
            "headcount_desc" => ProjectSort::HeadcountDesc,
            "hours_asc" => ProjectSort::HoursAsc,
            "hours_desc" => ProjectSort::HoursDesc,
            _ => ProjectSort::NameAsc,
        }
    }

    /// Token form, for echoing back to the client
    pub fn token(&self) -> &'static str {
        match self {
            ProjectSort::NameAsc => "name_asc",
            ProjectSort::HeadcountAsc => "headcount_asc",
            ProjectSort::HeadcountDesc => "headcount_desc",
            ProjectSort::HoursAsc => "hours_asc",
            ProjectSort::HoursDesc => "hours_desc",
        }
    }

    /// Static ORDER BY fragment for this variant
    pub fn order_clause(&self) -> &'static str {
        match self {
            ProjectSort::NameAsc => "p.pname ASC",
            ProjectSort::HeadcountAsc => "headcount ASC",
            ProjectSort::HeadcountDesc => "headcount DESC",
            ProjectSort::HoursAsc => "total_hours ASC",
            ProjectSort::HoursDesc => "total_hours DESC",
        }
    }
}

impl Default for ProjectSort {
    fn default() -> Self {
        ProjectSort::NameAsc
    }
}

fn overview_sql(sort: ProjectSort) -> String {
    format!(
        r#"
        SELECT p.pnumber, p.pname, p.plocation,
               d.dname AS department_name,
               COALESCE(s.headcount, 0) AS headcount,
               COALESCE(s.total_hours, 0)::float8 AS total_hours
        FROM project p
        LEFT JOIN department d ON p.dnum = d.dnumber
        LEFT JOIN project_staffing s ON s.pno = p.pnumber
        ORDER BY {}
        "#,
        sort.order_clause()
    )
}

impl ProjectOverviewRow {
    /// Runs the project overview query
    pub async fn fetch(pool: &PgPool, sort: ProjectSort) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectOverviewRow>(&overview_sql(sort))
            .fetch_all(pool)
            .await?;

        Ok(rows)
    }
}

/// Project attributes for the detail page
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectDetail {
    pub pnumber: i32,
    pub pname: String,
    pub plocation: String,
    pub department_name: Option<String>,
}

impl ProjectDetail {
    /// Finds a project by id, joined with its department name
    ///
    /// Unknown ids yield `None`; the caller renders "not found" instead of
    /// failing the request.
    pub async fn find(pool: &PgPool, pnumber: i32) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProjectDetail>(
            r#"
            SELECT p.pnumber, p.pname, p.plocation, d.dname AS department_name
            FROM project p
            LEFT JOIN department d ON p.dnum = d.dnumber
            WHERE p.pnumber = $1
            "#,
        )
        .bind(pnumber)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }
}

/// Short employee reference for the assignment picker
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeePick {
    pub ssn: String,
    pub full_name: String,
}

impl EmployeePick {
    /// Full employee list ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, EmployeePick>(
            r#"
            SELECT e.ssn,
                   e.fname || ' ' || COALESCE(e.minit || ' ', '') || e.lname AS full_name
            FROM employee e
            ORDER BY e.lname, e.fname
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_token_roundtrip() {
        for sort in [
            ProjectSort::NameAsc,
            ProjectSort::HeadcountAsc,
            ProjectSort::HeadcountDesc,
            ProjectSort::HoursAsc,
            ProjectSort::HoursDesc,
        ] {
            assert_eq!(ProjectSort::from_token(sort.token()), sort);
        }
    }

    #[test]
    fn test_unknown_sort_token_falls_back_to_name_asc() {
        assert_eq!(ProjectSort::from_token("bogus"), ProjectSort::NameAsc);
        assert_eq!(ProjectSort::from_token(""), ProjectSort::NameAsc);
        assert_eq!(ProjectSort::default(), ProjectSort::NameAsc);
    }

    #[test]
    fn test_overview_sql_splices_whitelist_only() {
        let sql = overview_sql(ProjectSort::HeadcountDesc);
        assert!(sql.trim_end().ends_with("ORDER BY headcount DESC"));
        assert!(sql.contains("COALESCE(s.headcount, 0)"));
        assert!(sql.contains("COALESCE(s.total_hours, 0)"));
    }
}
