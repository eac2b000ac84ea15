//! Co-op shortlist scraper.
//!
//! Logs into the university job board, opens the student's shortlist and
//! exports every shortlisted posting to CSV.

pub mod config;
pub mod credentials;
pub mod error;
pub mod forms;
mod html;
pub mod pipeline;
pub mod posting;
pub mod session;
pub mod shortlist;

pub use error::{Error, Result};
