/// API route handlers
///
/// Organized by page/resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login and logout
/// - `overview`: Employee overview page and its CSV export
/// - `projects`: Project overview, detail, assignment upsert, CSV export
/// - `employees`: Roster, CRUD, and spreadsheet import
/// - `managers`: Managers overview

pub mod auth;
pub mod employees;
pub mod health;
pub mod managers;
pub mod overview;
pub mod projects;
