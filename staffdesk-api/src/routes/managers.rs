/// Managers overview
///
/// One row per department: the department, its manager (or "(none)"), how
/// many employees it has, and the hours those employees have logged across
/// all projects.

use crate::{app::AppState, error::ApiResult, flash::take_flash};
use axum::{extract::State, Extension, Json};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Serialize;
use staffdesk_shared::{auth::session::SessionUser, models::department::ManagerOverviewRow};

/// One rendered row of the managers overview
#[derive(Debug, Serialize)]
pub struct ManagerEntry {
    pub dnumber: i32,
    pub dname: String,
    /// Manager name, or "(none)" for departments without one
    pub manager: String,
    pub employee_count: i64,
    pub total_hours: f64,
}

impl From<ManagerOverviewRow> for ManagerEntry {
    fn from(row: ManagerOverviewRow) -> Self {
        Self {
            dnumber: row.dnumber,
            dname: row.dname,
            manager: row.manager_name.unwrap_or_else(|| "(none)".to_string()),
            employee_count: row.employee_count,
            total_hours: row.total_hours,
        }
    }
}

/// Managers overview payload
#[derive(Debug, Serialize)]
pub struct ManagersView {
    pub user: SessionUser,
    pub managers: Vec<ManagerEntry>,
    pub flash: Option<String>,
}

/// Managers overview handler
///
/// # Endpoint
///
/// ```text
/// GET /managers
/// ```
pub async fn overview(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionUser>,
    jar: PrivateCookieJar,
) -> ApiResult<(PrivateCookieJar, Json<ManagersView>)> {
    let managers = ManagerOverviewRow::fetch(&state.db)
        .await?
        .into_iter()
        .map(ManagerEntry::from)
        .collect();
    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(ManagersView {
            user: auth,
            managers,
            flash,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_manager_renders_placeholder() {
        let entry = ManagerEntry::from(ManagerOverviewRow {
            dnumber: 4,
            dname: "Administration".to_string(),
            manager_name: None,
            employee_count: 0,
            total_hours: 0.0,
        });
        assert_eq!(entry.manager, "(none)");
    }

    #[test]
    fn test_present_manager_passes_through() {
        let entry = ManagerEntry::from(ManagerOverviewRow {
            dnumber: 5,
            dname: "Research".to_string(),
            manager_name: Some("Franklin T Wong".to_string()),
            employee_count: 4,
            total_hours: 135.0,
        });
        assert_eq!(entry.manager, "Franklin T Wong");
    }
}
