//! Job-application records and the list operations behind the applications
//! table: text search, column sorting and CSV export.

pub mod export;
pub mod sort;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use export::applications_csv;
pub use sort::{sort_applications, SortConfig, SortDirection, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interviewing => "Interviewing",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked job application, as stored in the `applications` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub company_name: String,
    pub job_title: String,
    pub application_date: NaiveDate,
    pub application_method: String,
    #[serde(default)]
    pub resume_sent: bool,
    #[serde(default)]
    pub cover_letter_sent: bool,
    #[serde(default)]
    pub interview_scheduled: bool,
    #[serde(default)]
    pub interview_type: Option<String>,
    #[serde(default)]
    pub interviewers: Option<String>,
    #[serde(default)]
    pub follow_up_required: bool,
    #[serde(default)]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// 1 to 5 stars
    #[serde(default)]
    pub priority: Option<u8>,
}

impl Application {
    /// Case-insensitive substring match on company or job title
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.company_name.to_lowercase().contains(&query) || self.job_title.to_lowercase().contains(&query)
    }
}

/// Search-box filter. An empty query keeps every row.
pub fn filter_applications(applications: &[Application], query: &str) -> Vec<Application> {
    applications.iter().filter(|app| app.matches(query)).cloned().collect()
}
