//! Command line and environment configuration.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LOGIN_URL: &str = "https://mysuccess.carleton.ca/Shibboleth.sso/Login?entityID=http://cufed.carleton.ca/adfs/services/trust&target=https://mysuccess.carleton.ca/secure/sso.htm";
pub const DEFAULT_POSTINGS_URL: &str = "https://mysuccess.carleton.ca/myAccount/co-op/coopjobs.htm";

#[derive(Parser, Debug)]
#[command(name = "shortlist")]
#[command(about = "Scrape the co-op job board shortlist into a CSV file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub settings: Settings,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in, scrape every shortlisted posting and write the CSV (default)
    Scrape,

    /// Create the credentials file if it does not exist yet
    Init,

    /// Parse a saved posting page and print what would be exported
    Parse {
        /// HTML file saved from a posting page
        file: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// SSO entry point that ends on the portal after login
    #[arg(long, env = "SHORTLIST_LOGIN_URL", default_value = DEFAULT_LOGIN_URL, global = true)]
    pub login_url: String,

    /// Co-op postings board holding the quick searches
    #[arg(long, env = "SHORTLIST_POSTINGS_URL", default_value = DEFAULT_POSTINGS_URL, global = true)]
    pub postings_url: String,

    /// JSON file holding the portal username and password
    #[arg(long, env = "SHORTLIST_CREDENTIALS", default_value = "./config.json", global = true)]
    pub credentials: PathBuf,

    /// Where the CSV is written
    #[arg(short, long, env = "SHORTLIST_OUTPUT", default_value = "./shortlist.csv", global = true)]
    pub output: PathBuf,

    /// Windows domain prefixed to the username; empty to send it as is
    #[arg(long, env = "SHORTLIST_DOMAIN", default_value = "CUNET", global = true)]
    pub domain: String,

    /// Per-request timeout
    #[arg(long, env = "SHORTLIST_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Print a summary of every scraped posting
    #[arg(long, global = true)]
    pub print: bool,
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Settings pointing at a different portal, keeping every other default.
    pub fn for_portal(login_url: impl Into<String>, postings_url: impl Into<String>) -> Self {
        Self {
            login_url: login_url.into(),
            postings_url: postings_url.into(),
            credentials: PathBuf::from("./config.json"),
            output: PathBuf::from("./shortlist.csv"),
            domain: "CUNET".to_string(),
            timeout_secs: 30,
            print: false,
        }
    }
}
