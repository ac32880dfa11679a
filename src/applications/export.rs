use super::Application;

const HEADERS: [&str; 12] = [
    "ID",
    "Company",
    "Job Title",
    "Applied Date",
    "Method",
    "Resume Sent",
    "Cover Letter",
    "Interview Scheduled",
    "Status",
    "Location",
    "Priority",
    "Notes",
];

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}

fn row(app: &Application) -> [String; 12] {
    [
        app.id.clone(),
        app.company_name.clone(),
        app.job_title.clone(),
        app.application_date.format("%Y-%m-%d").to_string(),
        app.application_method.clone(),
        yes_no(app.resume_sent),
        yes_no(app.cover_letter_sent),
        yes_no(app.interview_scheduled),
        app.status.to_string(),
        app.location.clone().unwrap_or_default(),
        // A zero priority exports blank, same as an unset one
        app.priority.filter(|p| *p > 0).map(|p| p.to_string()).unwrap_or_default(),
        app.notes.clone().unwrap_or_default(),
    ]
}

/// Quote a cell only when it would otherwise break the row
fn escape_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn format_row<S: AsRef<str>>(cells: &[S]) -> String {
    cells.iter().map(|c| escape_cell(c.as_ref())).collect::<Vec<_>>().join(",")
}

/// `job_applications.csv` contents: header line, then one line per row
pub fn applications_csv(applications: &[Application]) -> String {
    std::iter::once(format_row(&HEADERS))
        .chain(applications.iter().map(|app| format_row(&row(app))))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::application;
    use super::*;

    #[test]
    fn header_and_plain_rows() {
        let mut app = application("1", "SpaceX", "Frontend Developer", "2023-04-15", Some(5));
        app.location = Some("Remote".into());

        let csv = applications_csv(&[app]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "ID,Company,Job Title,Applied Date,Method,Resume Sent,Cover Letter,Interview Scheduled,Status,Location,Priority,Notes"
        );
        assert_eq!(
            lines[1],
            "1,SpaceX,Frontend Developer,2023-04-15,Company Website,Yes,No,No,Applied,Remote,5,"
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn cells_with_separators_are_quoted() {
        let mut app = application("2", "NASA", "UI Designer", "2023-04-10", None);
        app.location = Some("Houston, TX".into());
        app.notes = Some("Said \"soon\"\nfollow up".into());

        let csv = applications_csv(&[app]);
        let body = csv.split_once('\n').map(|(_, rest)| rest).unwrap();
        assert_eq!(
            body,
            "2,NASA,UI Designer,2023-04-10,Company Website,Yes,No,No,Applied,\"Houston, TX\",,\"Said \"\"soon\"\"\nfollow up\""
        );
    }

    #[test]
    fn empty_list_is_header_only() {
        assert_eq!(applications_csv(&[]).lines().count(), 1);
    }
}
