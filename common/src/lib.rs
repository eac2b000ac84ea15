//! Shared types for the co-op shortlist scraper.
//!
//! A [`Job`] is one shortlisted posting as it appears in the exported CSV.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod export;

/// Format used for the deadline column of the CSV.
pub const DEADLINE_CSV_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used for the deadline in the human summary.
const DEADLINE_SUMMARY_FORMAT: &str = "%B %d @%I:%M%p";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Job {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Division")]
    pub division: String,
    #[serde(rename = "Deadline", with = "deadline_format")]
    pub deadline: NaiveDateTime,
    #[serde(rename = "Positions")]
    pub positions: u32,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "WFH")]
    pub wfh: bool,
    #[serde(rename = "Working arrangements")]
    pub working_arrangements: String,
    #[serde(rename = "Duration in months")]
    pub duration_in_months: u32,
    /// Hourly rate.
    #[serde(rename = "Salary")]
    pub salary: Option<f64>,
    #[serde(rename = "Hours per week")]
    pub hours_per_week: Option<f64>,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Security screening")]
    pub security_screening: bool,
    #[serde(rename = "Link")]
    pub link: String,
}

impl Job {
    /// Column header row, in field order. Must match the serde renames above.
    pub const CSV_HEADERS: [&'static str; 14] = [
        "Title",
        "Company",
        "Division",
        "Deadline",
        "Positions",
        "Location",
        "WFH",
        "Working arrangements",
        "Duration in months",
        "Salary",
        "Hours per week",
        "Description",
        "Security screening",
        "Link",
    ];

    /// Total money made over the work term, assuming 4 weeks per month.
    pub fn earnings(&self) -> Option<f64> {
        let salary = self.salary?;
        let hours = self.hours_per_week?;
        Some(salary * hours * 4.0 * f64::from(self.duration_in_months))
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spacer = "-".repeat(50);

        writeln!(f, "{spacer}")?;
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}, {}", self.company, self.location)?;
        writeln!(f, "{spacer}")?;
        writeln!(
            f,
            "APPLICATION DEADLINE: {}",
            self.deadline.format(DEADLINE_SUMMARY_FORMAT)
        )?;

        match (self.salary, self.earnings()) {
            (Some(salary), Some(earnings)) => writeln!(
                f,
                "Total earnings: ${} at ${:.2}/hr",
                group_thousands(earnings),
                salary
            )?,
            _ => writeln!(f, "Salary: Not available.")?,
        }

        match self.hours_per_week {
            Some(hours) => writeln!(f, "Hours Weekly: {hours:?}")?,
            None => writeln!(f, "Hours Weekly: Not available.")?,
        }

        write!(f, "Remote Work: {}", if self.wfh { "Yes" } else { "No" })
    }
}

/// Formats an amount with two decimals and comma thousands separators.
fn group_thousands(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}

mod deadline_format {
    use super::DEADLINE_CSV_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&value.format(DEADLINE_CSV_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, DEADLINE_CSV_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
pub(crate) fn sample_job() -> Job {
    use chrono::NaiveDate;

    Job {
        title: "Software Developer Co-op".to_string(),
        company: "Acme Corp".to_string(),
        division: "Platform Engineering".to_string(),
        deadline: NaiveDate::from_ymd_opt(2023, 1, 15)
            .and_then(|d| d.and_hms_opt(23, 59, 0))
            .unwrap(),
        positions: 2,
        location: "Ottawa, ON".to_string(),
        wfh: true,
        working_arrangements: "Hybrid. Two days a week in office.".to_string(),
        duration_in_months: 4,
        salary: Some(25.0),
        hours_per_week: Some(37.5),
        description: "Build \"internal\" tools, write tests,\nship code.".to_string(),
        security_screening: false,
        link: "https://portal.example/postings/123".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earnings_uses_four_week_months() {
        let job = sample_job();
        assert_eq!(job.earnings(), Some(25.0 * 37.5 * 4.0 * 4.0));
    }

    #[test]
    fn test_earnings_unknown_without_salary() {
        let job = Job {
            salary: None,
            ..sample_job()
        };
        assert_eq!(job.earnings(), None);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(15000.0), "15,000.00");
        assert_eq!(group_thousands(999.5), "999.50");
        assert_eq!(group_thousands(1234567.891), "1,234,567.89");
    }

    #[test]
    fn test_summary_with_salary() {
        let summary = sample_job().to_string();
        assert!(summary.starts_with(&"-".repeat(50)));
        assert!(summary.contains("Software Developer Co-op\nAcme Corp, Ottawa, ON\n"));
        assert!(summary.contains("APPLICATION DEADLINE: January 15 @11:59PM"));
        assert!(summary.contains("Total earnings: $15,000.00 at $25.00/hr"));
        assert!(summary.contains("Hours Weekly: 37.5"));
        assert!(summary.ends_with("Remote Work: Yes"));
    }

    #[test]
    fn test_summary_without_salary() {
        let job = Job {
            salary: None,
            hours_per_week: None,
            wfh: false,
            ..sample_job()
        };
        let summary = job.to_string();
        assert!(summary.contains("Salary: Not available."));
        assert!(summary.contains("Hours Weekly: Not available."));
        assert!(summary.ends_with("Remote Work: No"));
    }

    #[test]
    fn test_summary_keeps_decimal_on_whole_hours() {
        let job = Job {
            hours_per_week: Some(40.0),
            ..sample_job()
        };
        assert!(job.to_string().contains("Hours Weekly: 40.0\n"));
    }
}
