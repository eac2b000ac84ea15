//! Extracts a [`Job`] from a posting page.
//!
//! A posting page holds four `.table.table-bordered` tables: a header, the
//! posting information, the application information and the company
//! information. Posting rows pair a label cell (`width: 25%`) with a value
//! cell (`width="75%"`); not every posting carries every row.

use crate::error::{Error, Result};
use crate::html::{selector, squash_whitespace, text_of};
use chrono::NaiveDateTime;
use common::Job;
use scraper::{ElementRef, Html};

const DEADLINE_FORMAT: &str = "%B %d, %Y %I:%M %p";

const WFH_KEYWORDS: [&str; 5] = [
    "work from home",
    "virtual work",
    "remote work",
    "hybrid work",
    "hybrid",
];

/// Hourly rates above this are monthly figures.
const MAX_HOURLY_RATE: f64 = 40.0;

mod field {
    pub const TITLE: &str = "position title";
    pub const POSITIONS: &str = "number of positions";
    pub const LOCATION: &str = "location of work";
    pub const ARRANGEMENTS: &str = "indicate working arrangements";
    pub const WORKING_FROM_HOME: &str = "working from home";
    pub const DURATION: &str = "duration";
    pub const SALARY: &str = "salary";
    pub const DESCRIPTION: &str = "job description";
    pub const SECURITY_SCREENING: &str = "security screening";
}

/// Label/value rows of the posting information table.
struct PostingRows(Vec<(String, String)>);

impl PostingRows {
    fn from_table(table: ElementRef<'_>) -> Self {
        let label_cells = selector(r#"td[style="width: 25%;"]"#);
        let value_cells = selector(r#"td[width="75%"]"#);

        let labels = table
            .select(&label_cells)
            .map(|td| text_of(td).to_lowercase());
        let values = table.select(&value_cells).map(text_of);
        Self(labels.zip(values).collect())
    }

    fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(label, _)| label.contains(field))
            .map(|(_, value)| value.as_str())
    }

    fn require(&self, field: &'static str) -> Result<&str> {
        self.get(field)
            .ok_or_else(|| Error::MalformedPosting(format!("missing \"{field}\" row")))
    }
}

/// Parses a posting page. `link` is recorded as the posting's link.
pub fn parse_posting(html: &str, link: &str) -> Result<Job> {
    let document = Html::parse_document(html);
    let tables: Vec<ElementRef<'_>> = document.select(&selector(".table.table-bordered")).collect();
    if tables.len() < 4 {
        return Err(Error::MalformedPosting(format!(
            "expected 4 information tables, found {}",
            tables.len()
        )));
    }
    let (posting, application, company) = (tables[1], tables[2], tables[3]);

    let rows = PostingRows::from_table(posting);

    let title = rows.require(field::TITLE)?.to_string();
    let positions_raw = rows.require(field::POSITIONS)?;
    let positions = positions_raw.parse::<u32>().map_err(|_| {
        Error::MalformedPosting(format!("number of positions {positions_raw:?} is not a number"))
    })?;
    let location = rows.require(field::LOCATION)?.to_string();
    let description = rows.require(field::DESCRIPTION)?.to_string();

    let arrangements = working_arrangements(
        rows.require(field::ARRANGEMENTS)?,
        rows.get(field::WORKING_FROM_HOME),
    );
    let (company_name, division) = company_info(company)?;
    let deadline = application_deadline(application)?;
    let (salary, hours_per_week) = rows.get(field::SALARY).map(salary_and_hours).unwrap_or((None, None));
    let duration_in_months = rows.get(field::DURATION).map(duration_months).unwrap_or(0);
    let security_screening = rows
        .get(field::SECURITY_SCREENING)
        .is_some_and(requires_screening);

    let wfh = rows.get(field::WORKING_FROM_HOME).is_some()
        || mentions_remote_work(&location, &description, &arrangements);

    Ok(Job {
        title,
        company: company_name,
        division,
        deadline,
        positions,
        location,
        wfh,
        working_arrangements: arrangements,
        duration_in_months,
        salary,
        hours_per_week,
        description,
        security_screening,
        link: link.to_string(),
    })
}

fn company_info(table: ElementRef<'_>) -> Result<(String, String)> {
    let cells: Vec<String> = table.select(&selector(r#"td[width="75%"]"#)).map(text_of).collect();
    match cells.as_slice() {
        [_, company, division, ..] => Ok((company.clone(), division.clone())),
        _ => Err(Error::MalformedPosting(format!(
            "company table has {} value cells, expected at least 3",
            cells.len()
        ))),
    }
}

fn application_deadline(table: ElementRef<'_>) -> Result<NaiveDateTime> {
    let raw = table
        .select(&selector("#npPostingApplicationInfoDeadlineDate"))
        .next()
        .map(text_of)
        .ok_or_else(|| Error::MalformedPosting("missing application deadline".to_string()))?;
    let raw = squash_whitespace(&raw);

    NaiveDateTime::parse_from_str(&raw, DEADLINE_FORMAT)
        .map_err(|e| Error::MalformedPosting(format!("deadline {raw:?}: {e}")))
}

fn working_arrangements(arrangements: &str, working_from_home: Option<&str>) -> String {
    match working_from_home {
        Some(wfh) => format!("{arrangements}. {wfh}."),
        None => format!("{arrangements}."),
    }
}

/// Hourly rate and weekly hours from the salary row.
///
/// Only a row with exactly two non-zero numbers is understood, e.g.
/// `$22.50 per hour, 37.5 hours per week`. A rate above 40 is taken to be
/// monthly and converted with 4 weeks per month.
fn salary_and_hours(raw: &str) -> (Option<f64>, Option<f64>) {
    let cleaned = raw.replace(['$', ','], "");
    let numbers: Vec<f64> = cleaned
        .split_whitespace()
        .filter_map(|word| word.parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .collect();

    match numbers.as_slice() {
        [rate, hours] if *rate != 0.0 && *hours != 0.0 => {
            let rate = if *rate > MAX_HOURLY_RATE {
                rate / (4.0 * hours)
            } else {
                *rate
            };
            (Some(rate), Some(*hours))
        }
        _ => (None, None),
    }
}

/// Work term length in months. A 4-month option wins whenever offered,
/// otherwise the first whitespace-separated word that is a whole number.
fn duration_months(raw: &str) -> u32 {
    if raw.contains('4') {
        return 4;
    }

    raw.split_whitespace()
        .find_map(|word| word.parse().ok())
        .unwrap_or(0)
}

fn requires_screening(raw: &str) -> bool {
    let raw = raw.to_lowercase();
    !(raw.contains("no") || raw.contains("other"))
}

fn mentions_remote_work(location: &str, description: &str, arrangements: &str) -> bool {
    if location.to_lowercase().contains("virtual") {
        return true;
    }

    let description = description.to_lowercase();
    let arrangements = arrangements.to_lowercase();
    WFH_KEYWORDS
        .iter()
        .any(|k| description.contains(k) || arrangements.contains(k))
}
