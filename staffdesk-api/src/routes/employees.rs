/// Employee roster, CRUD, and spreadsheet import
///
/// # Endpoints
///
/// - `GET /employees` - Full roster with department names
/// - `GET /employee/add`, `POST /employee/add` - Create (admin)
/// - `GET /employee/:ssn/edit`, `POST /employee/:ssn/edit` - Edit (admin)
/// - `POST /employee/:ssn/delete` - Delete (admin)
/// - `GET /employees/import`, `POST /employees/import` - Bulk `.xlsx`
///   import (admin, all-or-nothing)
///
/// Form fields arrive as strings and are validated here; the store only
/// ever sees typed values. Every mutation ends in a redirect with a flash
/// message describing the outcome.

use crate::{
    app::AppState,
    error::ApiResult,
    flash::{flash_redirect, take_flash},
};
use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use staffdesk_shared::{
    auth::session::SessionUser,
    import::parse_employee_sheet,
    models::{
        department::DepartmentRef,
        employee::{EmployeeRow, EmployeeUpdate, NewEmployee},
        MutationError,
    },
};

const ADMIN_REQUIRED: &str = "Administrator access required.";

/// Employee roster payload
#[derive(Debug, Serialize)]
pub struct EmployeesView {
    pub user: SessionUser,
    pub employees: Vec<EmployeeRow>,
    pub flash: Option<String>,
}

/// Roster handler
///
/// # Endpoint
///
/// ```text
/// GET /employees
/// ```
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionUser>,
    jar: PrivateCookieJar,
) -> ApiResult<(PrivateCookieJar, Json<EmployeesView>)> {
    let employees = EmployeeRow::list(&state.db).await?;
    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(EmployeesView {
            user: auth,
            employees,
            flash,
        }),
    ))
}

/// Employee creation form, as submitted
///
/// Numeric and date fields come in as strings so a bad value produces a
/// flash message rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct AddEmployeeForm {
    #[serde(default)]
    pub ssn: String,
    #[serde(default)]
    pub fname: String,
    #[serde(default)]
    pub minit: String,
    #[serde(default)]
    pub lname: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub super_ssn: String,
    #[serde(default)]
    pub dno: String,
    #[serde(default)]
    pub bdate: String,
    #[serde(default)]
    pub empdate: String,
}

impl AddEmployeeForm {
    /// Validates the submission into a typed insert record
    ///
    /// Returns the first failure as a user-facing message. Empty optional
    /// fields (middle initial, supervisor, dates) become `None`, never
    /// empty strings.
    fn validate(&self) -> Result<NewEmployee, String> {
        let ssn = self.ssn.trim();
        if ssn.is_empty() {
            return Err("SSN is required.".to_string());
        }
        let fname = self.fname.trim();
        if fname.is_empty() {
            return Err("First name is required.".to_string());
        }
        let lname = self.lname.trim();
        if lname.is_empty() {
            return Err("Last name is required.".to_string());
        }
        let address = self.address.trim();
        if address.is_empty() {
            return Err("Address is required.".to_string());
        }

        let minit = match self.minit.trim() {
            "" => None,
            m if m.chars().count() == 1 => Some(m.to_string()),
            _ => return Err("Middle initial must be a single character.".to_string()),
        };

        let sex = self.sex.trim();
        if sex.chars().count() != 1 {
            return Err("Sex must be a single character.".to_string());
        }

        let salary = self
            .salary
            .trim()
            .parse::<i32>()
            .map_err(|_| "Salary must be a whole number.".to_string())?;

        let dno = self
            .dno
            .trim()
            .parse::<i32>()
            .map_err(|_| "Department must be selected.".to_string())?;

        let super_ssn = match self.super_ssn.trim() {
            "" => None,
            s => Some(s.to_string()),
        };

        let bdate = parse_optional_date(&self.bdate, "Birth date")?;
        let empdate = parse_optional_date(&self.empdate, "Hire date")?;

        Ok(NewEmployee {
            ssn: ssn.to_string(),
            fname: fname.to_string(),
            minit,
            lname: lname.to_string(),
            address: address.to_string(),
            sex: sex.to_string(),
            salary,
            super_ssn,
            dno,
            bdate,
            empdate,
        })
    }
}

/// Parses an optional `YYYY-MM-DD` form field; empty means absent
fn parse_optional_date(value: &str, label: &str) -> Result<Option<NaiveDate>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("{} must be a YYYY-MM-DD date.", label))
}

/// Employee creation view payload: the department picker plus any flash
#[derive(Debug, Serialize)]
pub struct AddEmployeeView {
    pub user: SessionUser,
    pub departments: Vec<DepartmentRef>,
    pub flash: Option<String>,
}

/// Employee creation view handler (admin only)
///
/// # Endpoint
///
/// ```text
/// GET /employee/add
/// ```
pub async fn add_view(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionUser>,
    jar: PrivateCookieJar,
) -> ApiResult<Response> {
    if !auth.is_admin() {
        return Ok(flash_redirect(jar, "/employees", ADMIN_REQUIRED).into_response());
    }

    let departments = DepartmentRef::list(&state.db).await?;
    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(AddEmployeeView {
            user: auth,
            departments,
            flash,
        }),
    )
        .into_response())
}

/// Employee creation handler (admin only)
///
/// # Endpoint
///
/// ```text
/// POST /employee/add
/// ```
pub async fn add(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionUser>,
    jar: PrivateCookieJar,
    Form(form): Form<AddEmployeeForm>,
) -> (PrivateCookieJar, Redirect) {
    if !auth.is_admin() {
        return flash_redirect(jar, "/employees", ADMIN_REQUIRED);
    }

    let employee = match form.validate() {
        Ok(employee) => employee,
        Err(message) => return flash_redirect(jar, "/employee/add", &message),
    };

    match EmployeeRow::create(&state.db, &employee).await {
        Ok(()) => flash_redirect(jar, "/employees", "Employee added."),
        Err(err) => match MutationError::classify(err) {
            MutationError::Duplicate => flash_redirect(
                jar,
                "/employee/add",
                "An employee with that SSN may already exist.",
            ),
            MutationError::ForeignKey => flash_redirect(
                jar,
                "/employee/add",
                "Unknown department or supervisor.",
            ),
            MutationError::Other(_) => {
                tracing::error!(ssn = %employee.ssn, "employee insert failed");
                flash_redirect(jar, "/employee/add", "Could not add employee.")
            }
        },
    }
}

/// Employee edit form: only address, salary, and department are mutable
#[derive(Debug, Default, Deserialize)]
pub struct EditEmployeeForm {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub dno: String,
}

impl EditEmployeeForm {
    fn validate(&self) -> Result<EmployeeUpdate, String> {
        let address = self.address.trim();
        if address.is_empty() {
            return Err("Address is required.".to_string());
        }

        let salary = self
            .salary
            .trim()
            .parse::<i32>()
            .map_err(|_| "Salary must be a whole number.".to_string())?;

        let dno = self
            .dno
            .trim()
            .parse::<i32>()
            .map_err(|_| "Department must be selected.".to_string())?;

        Ok(EmployeeUpdate {
            address: address.to_string(),
            salary,
            dno,
        })
    }
}

/// Employee edit view payload
#[derive(Debug, Serialize)]
pub struct EditEmployeeView {
    pub user: SessionUser,
    pub employee: EmployeeRow,
    pub departments: Vec<DepartmentRef>,
    pub flash: Option<String>,
}

/// Employee edit view handler (admin only)
///
/// # Endpoint
///
/// ```text
/// GET /employee/123456789/edit
/// ```
pub async fn edit_view(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionUser>,
    jar: PrivateCookieJar,
    Path(ssn): Path<String>,
) -> ApiResult<Response> {
    if !auth.is_admin() {
        return Ok(flash_redirect(jar, "/employees", ADMIN_REQUIRED).into_response());
    }

    let employee = match EmployeeRow::find(&state.db, &ssn).await? {
        Some(employee) => employee,
        None => {
            return Ok(flash_redirect(jar, "/employees", "Employee not found.").into_response());
        }
    };

    let departments = DepartmentRef::list(&state.db).await?;
    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(EditEmployeeView {
            user: auth,
            employee,
            departments,
            flash,
        }),
    )
        .into_response())
}

/// Employee edit handler (admin only)
///
/// # Endpoint
///
/// ```text
/// POST /employee/123456789/edit
/// ```
pub async fn edit(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionUser>,
    jar: PrivateCookieJar,
    Path(ssn): Path<String>,
    Form(form): Form<EditEmployeeForm>,
) -> (PrivateCookieJar, Redirect) {
    if !auth.is_admin() {
        return flash_redirect(jar, "/employees", ADMIN_REQUIRED);
    }

    let back = format!("/employee/{}/edit", ssn);

    let update = match form.validate() {
        Ok(update) => update,
        Err(message) => return flash_redirect(jar, &back, &message),
    };

    match EmployeeRow::update(&state.db, &ssn, &update).await {
        Ok(true) => flash_redirect(jar, "/employees", "Employee updated."),
        Ok(false) => flash_redirect(jar, "/employees", "Employee not found."),
        Err(err) => match MutationError::classify(err) {
            MutationError::ForeignKey => {
                flash_redirect(jar, &back, "Unknown department.")
            }
            MutationError::Duplicate | MutationError::Other(_) => {
                tracing::error!(ssn = %ssn, "employee update failed");
                flash_redirect(jar, &back, "Could not update employee.")
            }
        },
    }
}

/// Employee delete handler (admin only)
///
/// Deletion is refused by the database while the employee is still
/// referenced; the foreign key violation becomes an actionable message.
///
/// # Endpoint
///
/// ```text
/// POST /employee/123456789/delete
/// ```
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionUser>,
    jar: PrivateCookieJar,
    Path(ssn): Path<String>,
) -> (PrivateCookieJar, Redirect) {
    if !auth.is_admin() {
        return flash_redirect(jar, "/employees", ADMIN_REQUIRED);
    }

    match EmployeeRow::delete(&state.db, &ssn).await {
        Ok(true) => flash_redirect(jar, "/employees", "Employee deleted."),
        Ok(false) => flash_redirect(jar, "/employees", "Employee not found."),
        Err(err) => match MutationError::classify(err) {
            MutationError::ForeignKey => flash_redirect(
                jar,
                "/employees",
                "Cannot delete: employee is still referenced by assignments, \
                 dependents, or as a manager or supervisor.",
            ),
            MutationError::Duplicate | MutationError::Other(_) => {
                tracing::error!(ssn = %ssn, "employee delete failed");
                flash_redirect(jar, "/employees", "Could not delete employee.")
            }
        },
    }
}

/// Import view payload
#[derive(Debug, Serialize)]
pub struct ImportView {
    pub user: SessionUser,
    pub flash: Option<String>,
}

/// Import view handler (admin only)
///
/// # Endpoint
///
/// ```text
/// GET /employees/import
/// ```
pub async fn import_view(
    Extension(auth): Extension<SessionUser>,
    jar: PrivateCookieJar,
) -> Response {
    if !auth.is_admin() {
        return flash_redirect(jar, "/employees", ADMIN_REQUIRED).into_response();
    }

    let (jar, flash) = take_flash(jar);
    (jar, Json(ImportView { user: auth, flash })).into_response()
}

/// Bulk import handler (admin only)
///
/// All-or-nothing: the sheet is fully parsed and validated before any row
/// is written, and the batch insert runs in one transaction, so a failure
/// anywhere leaves the employee table untouched.
///
/// # Endpoint
///
/// ```text
/// POST /employees/import
/// Content-Type: multipart/form-data
///
/// file=<roster.xlsx>
/// ```
pub async fn import(
    State(state): State<AppState>,
    Extension(auth): Extension<SessionUser>,
    jar: PrivateCookieJar,
    mut multipart: Multipart,
) -> (PrivateCookieJar, Redirect) {
    if !auth.is_admin() {
        return flash_redirect(jar, "/employees", ADMIN_REQUIRED);
    }

    let back = "/employees/import";

    // Find the uploaded file part.
    let mut upload: Option<(String, Vec<u8>)> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        upload = Some((filename, bytes.to_vec()));
                        break;
                    }
                    Err(_) => {
                        return flash_redirect(jar, back, "Upload failed; try again.");
                    }
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(_) => {
                return flash_redirect(jar, back, "Upload failed; try again.");
            }
        }
    }

    let (filename, bytes) = match upload {
        Some(upload) => upload,
        None => return flash_redirect(jar, back, "Choose an .xlsx file to import."),
    };

    if !filename.to_lowercase().ends_with(".xlsx") {
        return flash_redirect(jar, back, "Only .xlsx files are supported.");
    }

    let rows = match parse_employee_sheet(&bytes) {
        Ok(rows) => rows,
        Err(err) => {
            return flash_redirect(jar, back, &format!("Import failed: {}", err));
        }
    };

    if rows.is_empty() {
        return flash_redirect(jar, back, "The sheet contains no employee rows.");
    }

    match EmployeeRow::insert_batch(&state.db, &rows).await {
        Ok(count) => {
            tracing::info!(count, "employee import committed");
            flash_redirect(jar, "/employees", &format!("Imported {} employee(s).", count))
        }
        Err(err) => match MutationError::classify(err) {
            MutationError::Duplicate => flash_redirect(
                jar,
                back,
                "Import failed: duplicate SSN; no rows were imported.",
            ),
            MutationError::ForeignKey => flash_redirect(
                jar,
                back,
                "Import failed: unknown department or supervisor; no rows were imported.",
            ),
            MutationError::Other(_) => {
                tracing::error!("employee import failed");
                flash_redirect(jar, back, "Import failed; no rows were imported.")
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> AddEmployeeForm {
        AddEmployeeForm {
            ssn: "123456789".to_string(),
            fname: "John".to_string(),
            minit: "B".to_string(),
            lname: "Smith".to_string(),
            address: "731 Fondren, Houston, TX".to_string(),
            sex: "M".to_string(),
            salary: "30000".to_string(),
            super_ssn: "".to_string(),
            dno: "5".to_string(),
            bdate: "1965-01-09".to_string(),
            empdate: "".to_string(),
        }
    }

    #[test]
    fn test_valid_form_produces_typed_record() {
        let employee = valid_form().validate().expect("Form should validate");
        assert_eq!(employee.ssn, "123456789");
        assert_eq!(employee.minit.as_deref(), Some("B"));
        assert_eq!(employee.salary, 30000);
        assert_eq!(employee.dno, 5);
        assert_eq!(employee.super_ssn, None);
        assert_eq!(
            employee.bdate,
            NaiveDate::from_ymd_opt(1965, 1, 9)
        );
        assert_eq!(employee.empdate, None);
    }

    #[test]
    fn test_required_fields_are_enforced() {
        let mut form = valid_form();
        form.ssn = "   ".to_string();
        assert_eq!(form.validate().unwrap_err(), "SSN is required.");

        let mut form = valid_form();
        form.lname = "".to_string();
        assert_eq!(form.validate().unwrap_err(), "Last name is required.");
    }

    #[test]
    fn test_single_character_fields() {
        let mut form = valid_form();
        form.minit = "BB".to_string();
        assert!(form.validate().is_err());

        let mut form = valid_form();
        form.minit = "".to_string();
        let employee = form.validate().expect("Empty initial is allowed");
        assert_eq!(employee.minit, None);

        let mut form = valid_form();
        form.sex = "".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_numeric_fields_must_parse() {
        let mut form = valid_form();
        form.salary = "lots".to_string();
        assert_eq!(form.validate().unwrap_err(), "Salary must be a whole number.");

        let mut form = valid_form();
        form.dno = "".to_string();
        assert_eq!(form.validate().unwrap_err(), "Department must be selected.");
    }

    #[test]
    fn test_dates_must_be_iso_when_present() {
        let mut form = valid_form();
        form.bdate = "01/09/1965".to_string();
        assert_eq!(
            form.validate().unwrap_err(),
            "Birth date must be a YYYY-MM-DD date."
        );
    }

    #[test]
    fn test_edit_form_validation() {
        let form = EditEmployeeForm {
            address: " 123 Main St ".to_string(),
            salary: "45000".to_string(),
            dno: "4".to_string(),
        };
        let update = form.validate().expect("Form should validate");
        assert_eq!(update.address, "123 Main St");
        assert_eq!(update.salary, 45000);
        assert_eq!(update.dno, 4);

        let form = EditEmployeeForm::default();
        assert!(form.validate().is_err());
    }
}
