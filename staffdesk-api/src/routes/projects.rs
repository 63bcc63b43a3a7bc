/// Project overview, detail, assignment upsert, and CSV export
///
/// # Endpoints
///
/// - `GET /projects` - Project overview with whitelisted sort
/// - `GET /projects/export` - Overview as CSV attachment
/// - `GET /project/:id` - Project detail with assignments and a picker
/// - `POST /project/:id/add` - Accumulating assignment upsert (admin)

use crate::{
    app::AppState,
    error::ApiResult,
    flash::{flash_redirect, take_flash},
};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use staffdesk_shared::{
    auth::session::SessionUser,
    export::project_overview_csv,
    models::{
        assignment::AssignmentRow,
        project::{EmployeePick, ProjectDetail, ProjectOverviewRow, ProjectSort},
        MutationError,
    },
};

/// Query string of the overview and export endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ProjectsQuery {
    /// Sort token
    pub sort: Option<String>,
}

impl ProjectsQuery {
    fn sort(&self) -> ProjectSort {
        self.sort
            .as_deref()
            .map(ProjectSort::from_token)
            .unwrap_or_default()
    }
}

/// Project overview payload
#[derive(Debug, Serialize)]
pub struct ProjectsView {
    pub user: SessionUser,
    pub projects: Vec<ProjectOverviewRow>,
    pub sort: &'static str,
    pub flash: Option<String>,
}

/// Project overview handler
///
/// # Endpoint
///
/// ```text
/// GET /projects?sort=headcount_desc
/// ```
pub async fn overview(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionUser>,
    jar: PrivateCookieJar,
    Query(query): Query<ProjectsQuery>,
) -> ApiResult<(PrivateCookieJar, Json<ProjectsView>)> {
    let sort = query.sort();
    let projects = ProjectOverviewRow::fetch(&state.db, sort).await?;
    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(ProjectsView {
            user: auth,
            projects,
            sort: sort.token(),
            flash,
        }),
    ))
}

/// Project overview CSV export handler
///
/// # Endpoint
///
/// ```text
/// GET /projects/export?sort=hours_desc
/// ```
pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ProjectsQuery>,
) -> ApiResult<impl IntoResponse> {
    let rows = ProjectOverviewRow::fetch(&state.db, query.sort()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"project_overview.csv\"",
            ),
        ],
        project_overview_csv(&rows),
    ))
}

/// Project detail payload: the project, its current assignments, and the
/// full employee list for the assignment picker
#[derive(Debug, Serialize)]
pub struct ProjectDetailView {
    pub user: SessionUser,
    pub project: ProjectDetail,
    pub assignments: Vec<AssignmentRow>,
    pub employees: Vec<EmployeePick>,
    pub flash: Option<String>,
}

/// Project detail handler
///
/// Unknown ids redirect back to the overview with a message instead of
/// surfacing a bare 404.
///
/// # Endpoint
///
/// ```text
/// GET /project/10
/// ```
pub async fn detail(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionUser>,
    jar: PrivateCookieJar,
    Path(id): Path<i32>,
) -> ApiResult<Response> {
    let project = match ProjectDetail::find(&state.db, id).await? {
        Some(project) => project,
        None => {
            return Ok(flash_redirect(jar, "/projects", "Project not found.").into_response());
        }
    };

    let assignments = AssignmentRow::list_for_project(&state.db, id).await?;
    let employees = EmployeePick::list(&state.db).await?;
    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(ProjectDetailView {
            user: auth,
            project,
            assignments,
            employees,
            flash,
        }),
    )
        .into_response())
}

/// Assignment form fields
#[derive(Debug, Deserialize)]
pub struct AssignmentForm {
    /// SSN of the employee to assign
    pub employee_ssn: String,

    /// Hours to add, as submitted
    pub hours: String,
}

/// Assignment upsert handler (admin only)
///
/// Adds the submitted hours to the employee's assignment on this project,
/// creating the assignment when absent. The accumulation happens in a single
/// atomic statement, so repeating the form doubles the hours by design.
///
/// # Endpoint
///
/// ```text
/// POST /project/10/add
/// Content-Type: application/x-www-form-urlencoded
///
/// employee_ssn=123456789&hours=7.5
/// ```
pub async fn add_assignment(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionUser>,
    jar: PrivateCookieJar,
    Path(id): Path<i32>,
    Form(form): Form<AssignmentForm>,
) -> (PrivateCookieJar, Redirect) {
    let back = format!("/project/{}", id);

    if !auth.is_admin() {
        return flash_redirect(jar, &back, "Administrator access required.");
    }

    let hours = match form.hours.trim().parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours >= 0.0 => hours,
        _ => {
            return flash_redirect(jar, &back, "Hours must be a non-negative number.");
        }
    };

    let essn = form.employee_ssn.trim();
    if essn.is_empty() {
        return flash_redirect(jar, &back, "Select an employee to assign.");
    }

    match AssignmentRow::upsert(&state.db, id, essn, hours).await {
        Ok(()) => flash_redirect(jar, &back, "Hours recorded."),
        Err(err) => match MutationError::classify(err) {
            MutationError::ForeignKey => {
                flash_redirect(jar, &back, "Unknown employee or project.")
            }
            MutationError::Duplicate | MutationError::Other(_) => {
                tracing::error!(project = id, "assignment upsert failed");
                flash_redirect(jar, &back, "Could not record hours.")
            }
        },
    }
}
