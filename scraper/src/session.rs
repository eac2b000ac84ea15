//! Authenticated session with the job-board portal.
//!
//! The portal sits behind a federated SSO: the login URL redirects to the
//! identity provider's form, which hands a signed assertion back to the
//! portal through an auto-posting form. The cookie jar of the client carries
//! the resulting portal session for the rest of the run.

use crate::config::Settings;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::forms::{self, HtmlForm, Method};
use crate::shortlist::{self, ActionLink};
use reqwest::blocking::{Client, Response};
use reqwest::Url;

/// Upper bound on chained SSO hand-off forms after the password is accepted.
const MAX_SSO_HOPS: usize = 5;

const USER_AGENT: &str = concat!("shortlist/", env!("CARGO_PKG_VERSION"));

/// A fetched HTML page and the URL it was finally served from.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub html: String,
}

pub struct Session {
    client: Client,
    credentials: Credentials,
    login_url: String,
    postings_url: String,
}

impl Session {
    pub fn new(settings: &Settings, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            client,
            credentials,
            login_url: settings.login_url.clone(),
            postings_url: settings.postings_url.clone(),
        })
    }

    pub fn get(&self, url: &str) -> Result<Page> {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send()?;
        into_page(response)
    }

    /// Submits a form the way a browser would.
    pub fn submit(&self, form: &HtmlForm) -> Result<Page> {
        tracing::debug!(url = %form.action, method = ?form.method, fields = form.fields.len(), "Submitting form");
        let request = match form.method {
            Method::Post => self.client.post(form.action.clone()).form(&form.fields),
            Method::Get => self.client.get(form.get_url()),
        };
        into_page(request.send()?)
    }

    /// Signs in through the identity provider and returns the first portal page.
    pub fn login(&self) -> Result<Page> {
        let page = self.get(&self.login_url)?;
        let login = forms::login_form(&page.html, &page.url)
            .ok_or_else(|| Error::LoginFormNotFound(page.url.to_string()))?;

        tracing::info!(
            provider = page.url.host_str().unwrap_or_default(),
            user = %self.credentials.username,
            "Signing in"
        );
        let form = login.fill(&self.credentials.username, &self.credentials.password);
        let mut page = self.submit(&form)?;

        if forms::has_password_field(&page.html) {
            let reason = forms::login_error(&page.html)
                .unwrap_or_else(|| "the identity provider asked for the password again".to_string());
            return Err(Error::LoginRejected(reason));
        }

        let mut hops = 0;
        while let Some(handoff) = forms::sso_handoff_form(&page.html, &page.url) {
            if hops == MAX_SSO_HOPS {
                return Err(Error::SsoHandoffLoop { hops });
            }
            tracing::debug!(url = %handoff.action, hop = hops + 1, "Following SSO hand-off");
            page = self.submit(&handoff)?;
            hops += 1;
        }

        tracing::info!(url = %page.url, "Signed in");
        Ok(page)
    }

    /// Opens the postings board and runs its Shortlist quick search.
    pub fn open_shortlist(&self) -> Result<Page> {
        let board = self.get(&self.postings_url)?;
        let link = shortlist::find_shortlist_link(&board.html, &board.url)
            .ok_or_else(|| Error::ShortlistNotFound(board.url.to_string()))?;

        tracing::info!(link = %link, "Opening shortlist");
        self.follow(&link)
    }

    pub fn follow(&self, link: &ActionLink) -> Result<Page> {
        self.submit(&link.to_form())
    }
}

fn into_page(response: Response) -> Result<Page> {
    let status = response.status();
    let url = response.url().clone();
    if !status.is_success() {
        return Err(Error::Status {
            url: url.to_string(),
            status,
        });
    }

    let html = response.text()?;
    tracing::debug!(url = %url, bytes = html.len(), "Fetched page");
    Ok(Page { url, html })
}
