/// CSV rendering for the overview exports
///
/// The export endpoints re-run the corresponding overview query and
/// serialize the rows here, so an export always matches the page it was
/// taken from: same columns, same order. Headers are fixed strings and
/// identical across runs.

use crate::models::employee::EmployeeOverviewRow;
use crate::models::project::ProjectOverviewRow;

/// Fixed header of the employee overview export
pub const EMPLOYEE_EXPORT_HEADER: &str = "Ssn,Name,Department,Dependents,Projects,Total Hours";

/// Fixed header of the project overview export
pub const PROJECT_EXPORT_HEADER: &str = "Project,Location,Department,Headcount,Total Hours";

/// Quotes a CSV field when it contains a delimiter, quote, or newline
pub fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Renders the employee overview as delimited text, header first
pub fn employee_overview_csv(rows: &[EmployeeOverviewRow]) -> String {
    let mut out = String::from(EMPLOYEE_EXPORT_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            csv_quote(&row.ssn),
            csv_quote(&row.full_name),
            csv_quote(row.department_name.as_deref().unwrap_or("")),
            row.dependent_count,
            row.project_count,
            row.total_hours,
        ));
    }
    out
}

/// Renders the project overview as delimited text, header first
pub fn project_overview_csv(rows: &[ProjectOverviewRow]) -> String {
    let mut out = String::from(PROJECT_EXPORT_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_quote(&row.pname),
            csv_quote(&row.plocation),
            csv_quote(row.department_name.as_deref().unwrap_or("")),
            row.headcount,
            row.total_hours,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_employee(name: &str, dept: Option<&str>, hours: f64) -> EmployeeOverviewRow {
        EmployeeOverviewRow {
            ssn: "123456789".to_string(),
            full_name: name.to_string(),
            department_name: dept.map(String::from),
            dependent_count: 2,
            project_count: 1,
            total_hours: hours,
        }
    }

    #[test]
    fn test_csv_quote_passthrough() {
        assert_eq!(csv_quote("plain"), "plain");
        assert_eq!(csv_quote(""), "");
    }

    #[test]
    fn test_csv_quote_special_characters() {
        assert_eq!(csv_quote("a,b"), "\"a,b\"");
        assert_eq!(csv_quote("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_quote("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_employee_csv_header_and_order() {
        let rows = vec![
            sample_employee("John B Smith", Some("Research"), 32.5),
            sample_employee("Alicia J Zelaya", None, 0.0),
        ];
        let csv = employee_overview_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], EMPLOYEE_EXPORT_HEADER);
        assert_eq!(lines[1], "123456789,John B Smith,Research,2,1,32.5");
        // Missing department renders empty, hours render without a trailing .0
        assert_eq!(lines[2], "123456789,Alicia J Zelaya,,2,1,0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_employee_csv_header_is_stable() {
        let first = employee_overview_csv(&[]);
        let second = employee_overview_csv(&[]);
        assert_eq!(first, second);
        assert_eq!(first, format!("{}\n", EMPLOYEE_EXPORT_HEADER));
    }

    #[test]
    fn test_project_csv_quotes_commas() {
        let rows = vec![ProjectOverviewRow {
            pnumber: 10,
            pname: "ProductX".to_string(),
            plocation: "Bellaire, TX".to_string(),
            department_name: Some("Research".to_string()),
            headcount: 3,
            total_hours: 55.0,
        }];
        let csv = project_overview_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], PROJECT_EXPORT_HEADER);
        assert_eq!(lines[1], "ProductX,\"Bellaire, TX\",Research,3,55");
    }
}
