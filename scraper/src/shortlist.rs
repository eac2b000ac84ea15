//! Navigation on the postings board: the Shortlist quick search and the
//! per-posting links it lists.

use crate::forms::{HtmlForm, Method};
use crate::html::{selector, text_of};
use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html};
use std::fmt;
use std::sync::OnceLock;

/// Buttons on the shortlist that do not open a posting.
const NON_POSTING_BUTTONS: [&str; 2] = ["Apply", "New Search"];

/// What following an anchor does.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionLink {
    Get(Url),
    /// Form built by the anchor's `onclick` handler.
    Post {
        url: Url,
        fields: Vec<(String, String)>,
    },
}

impl ActionLink {
    /// Reads a usable `href`, or failing that a `buildForm({...})` call in `onclick`.
    pub fn from_anchor(anchor: ElementRef<'_>, base: &Url) -> Option<Self> {
        let href = anchor
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|h| !h.is_empty() && !h.starts_with('#'))
            .filter(|h| !h.to_ascii_lowercase().starts_with("javascript:"));

        if let Some(href) = href {
            return base.join(href).ok().map(ActionLink::Get);
        }

        anchor
            .value()
            .attr("onclick")
            .and_then(|script| Self::from_form_builder(script, base))
    }

    fn from_form_builder(script: &str, base: &Url) -> Option<Self> {
        static CALL: OnceLock<Regex> = OnceLock::new();
        static PAIR: OnceLock<Regex> = OnceLock::new();

        let call = CALL.get_or_init(|| {
            Regex::new(r#"buildForm\(\s*\{([^}]*)\}\s*(?:,\s*['"]([^'"]+)['"])?"#)
                .expect("static regex")
        });
        let pair = PAIR.get_or_init(|| {
            Regex::new(r#"['"]?([\w-]+)['"]?\s*:\s*(?:['"]([^'"]*)['"]|([\w.-]+))"#)
                .expect("static regex")
        });

        let caps = call.captures(script)?;
        let fields: Vec<(String, String)> = pair
            .captures_iter(caps.get(1)?.as_str())
            .filter_map(|p| {
                let value = p.get(2).or_else(|| p.get(3))?;
                Some((p[1].to_string(), value.as_str().to_string()))
            })
            .collect();
        if fields.is_empty() {
            return None;
        }

        let url = match caps.get(2) {
            Some(target) => base.join(target.as_str()).ok()?,
            None => base.clone(),
        };

        Some(ActionLink::Post { url, fields })
    }

    /// The request a browser would send when the anchor is clicked.
    pub fn to_form(&self) -> HtmlForm {
        match self {
            ActionLink::Get(url) => HtmlForm {
                action: url.clone(),
                method: Method::Get,
                fields: Vec::new(),
            },
            ActionLink::Post { url, fields } => HtmlForm {
                action: url.clone(),
                method: Method::Post,
                fields: fields.clone(),
            },
        }
    }
}

impl fmt::Display for ActionLink {
    /// Post links are shown with their form fields as a query string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionLink::Get(url) => write!(f, "{url}"),
            ActionLink::Post { url, fields } => {
                let mut url = url.clone();
                url.query_pairs_mut().extend_pairs(fields);
                write!(f, "{url}")
            }
        }
    }
}

/// One posting button on the shortlist.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortlistEntry {
    pub label: String,
    pub link: ActionLink,
}

/// The anchor of the quick search cell labelled `Shortlist`.
pub fn find_shortlist_link(html: &str, base: &Url) -> Option<ActionLink> {
    let document = Html::parse_document(html);
    let anchor = selector("a");

    let link = document
        .select(&selector("td.full"))
        .find(|cell| text_of(*cell) == "Shortlist")
        .and_then(|cell| cell.select(&anchor).next())
        .and_then(|a| ActionLink::from_anchor(a, base));
    link
}

/// Posting buttons in page order, skipping `Apply` and `New Search`.
pub fn job_links(html: &str, base: &Url) -> Vec<ShortlistEntry> {
    let document = Html::parse_document(html);
    let mut entries = Vec::new();

    for button in document.select(&selector(r#"a[role="button"]"#)) {
        let label = text_of(button);
        if NON_POSTING_BUTTONS.contains(&label.as_str()) {
            continue;
        }

        match ActionLink::from_anchor(button, base) {
            Some(link) => entries.push(ShortlistEntry { label, link }),
            None => tracing::warn!(label = %label, "Posting button has no usable link, skipping"),
        }
    }

    entries
}
