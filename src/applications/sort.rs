use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Application;

/// Sortable column of the applications table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Id,
    CompanyName,
    JobTitle,
    ApplicationDate,
    ApplicationMethod,
    ResumeSent,
    CoverLetterSent,
    InterviewScheduled,
    InterviewType,
    FollowUpRequired,
    FollowUpDate,
    Status,
    SalaryRange,
    Location,
    Priority,
}

impl SortKey {
    pub const ALL: [SortKey; 15] = [
        SortKey::Id,
        SortKey::CompanyName,
        SortKey::JobTitle,
        SortKey::ApplicationDate,
        SortKey::ApplicationMethod,
        SortKey::ResumeSent,
        SortKey::CoverLetterSent,
        SortKey::InterviewScheduled,
        SortKey::InterviewType,
        SortKey::FollowUpRequired,
        SortKey::FollowUpDate,
        SortKey::Status,
        SortKey::SalaryRange,
        SortKey::Location,
        SortKey::Priority,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::CompanyName => "company_name",
            SortKey::JobTitle => "job_title",
            SortKey::ApplicationDate => "application_date",
            SortKey::ApplicationMethod => "application_method",
            SortKey::ResumeSent => "resume_sent",
            SortKey::CoverLetterSent => "cover_letter_sent",
            SortKey::InterviewScheduled => "interview_scheduled",
            SortKey::InterviewType => "interview_type",
            SortKey::FollowUpRequired => "follow_up_required",
            SortKey::FollowUpDate => "follow_up_date",
            SortKey::Status => "status",
            SortKey::SalaryRange => "salary_range",
            SortKey::Location => "location",
            SortKey::Priority => "priority",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown sort column: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Column header state: clicking the same column cycles
/// ascending → descending → unsorted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: Option<SortDirection>,
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction: Some(direction),
        }
    }

    pub fn request(self, key: SortKey) -> Self {
        let direction = match (self.key == Some(key), self.direction) {
            (true, Some(SortDirection::Ascending)) => Some(SortDirection::Descending),
            (true, Some(SortDirection::Descending)) => None,
            _ => Some(SortDirection::Ascending),
        };
        Self { key: Some(key), direction }
    }

    /// Sort in place; unsorted leaves the input order alone
    pub fn apply(&self, applications: &mut [Application]) {
        if let (Some(key), Some(direction)) = (self.key, self.direction) {
            sort_applications(applications, key, direction);
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue<'a> {
    Text(&'a str),
    Flag(bool),
    Date(NaiveDate),
    Number(u8),
}

fn text(value: &Option<String>) -> Option<SortValue<'_>> {
    value.as_deref().map(SortValue::Text)
}

fn sort_value(app: &Application, key: SortKey) -> Option<SortValue<'_>> {
    match key {
        SortKey::Id => Some(SortValue::Text(&app.id)),
        SortKey::CompanyName => Some(SortValue::Text(&app.company_name)),
        SortKey::JobTitle => Some(SortValue::Text(&app.job_title)),
        SortKey::ApplicationDate => Some(SortValue::Date(app.application_date)),
        SortKey::ApplicationMethod => Some(SortValue::Text(&app.application_method)),
        SortKey::ResumeSent => Some(SortValue::Flag(app.resume_sent)),
        SortKey::CoverLetterSent => Some(SortValue::Flag(app.cover_letter_sent)),
        SortKey::InterviewScheduled => Some(SortValue::Flag(app.interview_scheduled)),
        SortKey::InterviewType => text(&app.interview_type),
        SortKey::FollowUpRequired => Some(SortValue::Flag(app.follow_up_required)),
        SortKey::FollowUpDate => app.follow_up_date.map(SortValue::Date),
        SortKey::Status => Some(SortValue::Text(app.status.as_str())),
        SortKey::SalaryRange => text(&app.salary_range),
        SortKey::Location => text(&app.location),
        SortKey::Priority => app.priority.map(SortValue::Number),
    }
}

/// Stable sort by one column. Missing values go last when ascending and
/// first when descending.
pub fn sort_applications(applications: &mut [Application], key: SortKey, direction: SortDirection) {
    applications.sort_by(|a, b| {
        let ordering = match (sort_value(a, key), sort_value(b, key)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => x.cmp(&y),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::sample;
    use super::*;

    fn ids(apps: &[Application]) -> Vec<&str> {
        apps.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn missing_priority_sorts_last_ascending_first_descending() {
        let mut apps = sample();

        sort_applications(&mut apps, SortKey::Priority, SortDirection::Ascending);
        assert_eq!(ids(&apps), ["3", "4", "1", "2"]);

        sort_applications(&mut apps, SortKey::Priority, SortDirection::Descending);
        assert_eq!(ids(&apps), ["2", "1", "4", "3"]);
    }

    #[test]
    fn dates_and_text_sort_naturally() {
        let mut apps = sample();

        sort_applications(&mut apps, SortKey::ApplicationDate, SortDirection::Ascending);
        assert_eq!(ids(&apps), ["4", "3", "2", "1"]);

        sort_applications(&mut apps, SortKey::CompanyName, SortDirection::Ascending);
        assert_eq!(ids(&apps), ["3", "4", "2", "1"]);
    }

    #[test]
    fn equal_values_keep_input_order() {
        let mut apps = sample();
        sort_applications(&mut apps, SortKey::Status, SortDirection::Descending);
        assert_eq!(ids(&apps), ["1", "2", "3", "4"]);
    }

    #[test]
    fn header_clicks_cycle_direction() {
        let config = SortConfig::default().request(SortKey::JobTitle);
        assert_eq!(config, SortConfig::new(SortKey::JobTitle, SortDirection::Ascending));

        let config = config.request(SortKey::JobTitle);
        assert_eq!(config.direction, Some(SortDirection::Descending));

        let config = config.request(SortKey::JobTitle);
        assert_eq!(config.direction, None);

        let mut apps = sample();
        config.apply(&mut apps);
        assert_eq!(ids(&apps), ["1", "2", "3", "4"]);

        let switched = SortConfig::new(SortKey::JobTitle, SortDirection::Descending).request(SortKey::Location);
        assert_eq!(switched, SortConfig::new(SortKey::Location, SortDirection::Ascending));
    }

    #[test]
    fn keys_parse_from_column_names() {
        assert_eq!("follow_up_date".parse::<SortKey>(), Ok(SortKey::FollowUpDate));
        assert!("salary".parse::<SortKey>().is_err());
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>(), Ok(key));
        }
    }
}
