/// Employee overview page and its CSV export
///
/// Both endpoints take the same query parameters and run the same query;
/// the export is the page serialized as a CSV attachment, so what you see
/// is what you download.
///
/// # Query parameters
///
/// - `search`: case-insensitive substring match on "first last"; empty
///   matches everyone
/// - `dept`: department id; empty or unparseable matches everyone
/// - `sort`: one of `name_asc`, `name_desc`, `hours_asc`, `hours_desc`;
///   anything else falls back to `name_asc`

use crate::{app::AppState, error::ApiResult, flash::take_flash};
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use staffdesk_shared::{
    auth::session::SessionUser,
    export::employee_overview_csv,
    models::{
        department::DepartmentRef,
        employee::{EmployeeFilter, EmployeeOverviewRow, EmployeeSort},
    },
};

/// Query string of the overview and export endpoints
#[derive(Debug, Default, Deserialize)]
pub struct OverviewQuery {
    /// Name search term
    #[serde(default)]
    pub search: String,

    /// Department filter, as submitted (may be empty)
    #[serde(default)]
    pub dept: String,

    /// Sort token
    pub sort: Option<String>,
}

impl OverviewQuery {
    /// Normalizes raw query parameters into a filter and sort order
    ///
    /// An empty or non-numeric department value means "all departments";
    /// filters must never silently match nothing.
    pub fn normalize(&self) -> (EmployeeFilter, EmployeeSort) {
        let filter = EmployeeFilter {
            search: self.search.trim().to_string(),
            dept: self.dept.trim().parse::<i32>().ok(),
        };
        let sort = self
            .sort
            .as_deref()
            .map(EmployeeSort::from_token)
            .unwrap_or_default();
        (filter, sort)
    }
}

/// Employee overview payload
///
/// Echoes the applied filters back so the client can re-render its controls.
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub user: SessionUser,
    pub employees: Vec<EmployeeOverviewRow>,
    pub departments: Vec<DepartmentRef>,
    pub search: String,
    pub dept: Option<i32>,
    pub sort: &'static str,
    pub flash: Option<String>,
}

/// Employee overview handler
///
/// # Endpoint
///
/// ```text
/// GET /home?search=smith&dept=5&sort=hours_desc
/// ```
pub async fn home(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionUser>,
    jar: PrivateCookieJar,
    Query(query): Query<OverviewQuery>,
) -> ApiResult<(PrivateCookieJar, Json<HomeView>)> {
    let (filter, sort) = query.normalize();

    let employees = EmployeeOverviewRow::fetch(&state.db, &filter, sort).await?;
    let departments = DepartmentRef::list(&state.db).await?;
    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(HomeView {
            user: auth,
            employees,
            departments,
            search: filter.search,
            dept: filter.dept,
            sort: sort.token(),
            flash,
        }),
    ))
}

/// Employee overview CSV export handler
///
/// Re-runs the overview query with the same parameters as the page and
/// streams the result as an attachment.
///
/// # Endpoint
///
/// ```text
/// GET /home/export?search=smith&dept=5&sort=hours_desc
/// ```
pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> ApiResult<impl IntoResponse> {
    let (filter, sort) = query.normalize();
    let rows = EmployeeOverviewRow::fetch(&state.db, &filter, sort).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"employee_overview.csv\"",
            ),
        ],
        employee_overview_csv(&rows),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_defaults_to_match_all() {
        let query = OverviewQuery::default();
        let (filter, sort) = query.normalize();
        assert_eq!(filter, EmployeeFilter::default());
        assert_eq!(sort, EmployeeSort::NameAsc);
    }

    #[test]
    fn test_normalize_trims_and_parses() {
        let query = OverviewQuery {
            search: "  smith ".to_string(),
            dept: " 5 ".to_string(),
            sort: Some("hours_desc".to_string()),
        };
        let (filter, sort) = query.normalize();
        assert_eq!(filter.search, "smith");
        assert_eq!(filter.dept, Some(5));
        assert_eq!(sort, EmployeeSort::HoursDesc);
    }

    #[test]
    fn test_unparseable_dept_means_all_departments() {
        for dept in ["", "all", "5x", "-"] {
            let query = OverviewQuery {
                dept: dept.to_string(),
                ..Default::default()
            };
            let (filter, _) = query.normalize();
            assert_eq!(filter.dept, None, "dept={:?}", dept);
        }
    }
}
