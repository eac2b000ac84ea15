//! HTML forms the portal session has to submit itself: the identity
//! provider's login form and the auto-posting SSO hand-off forms.

use crate::html::{selector, text_of};
use reqwest::Url;
use scraper::{ElementRef, Html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A form as a browser would submit it: target, method and successful controls.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlForm {
    pub action: Url,
    pub method: Method,
    pub fields: Vec<(String, String)>,
}

impl HtmlForm {
    pub fn from_element(form: ElementRef<'_>, base: &Url) -> Self {
        let action = form
            .value()
            .attr("action")
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .and_then(|a| base.join(a).ok())
            .unwrap_or_else(|| base.clone());

        let method = match form.value().attr("method") {
            Some(m) if m.eq_ignore_ascii_case("post") => Method::Post,
            _ => Method::Get,
        };

        let input = selector("input[name], textarea[name]");
        let fields = form
            .select(&input)
            .filter(|el| is_successful(*el))
            .filter_map(|el| {
                let name = el.value().attr("name")?.to_string();
                let value = if el.value().name() == "textarea" {
                    el.text().collect::<String>()
                } else {
                    el.value().attr("value").unwrap_or_default().to_string()
                };
                Some((name, value))
            })
            .collect();

        Self {
            action,
            method,
            fields,
        }
    }

    /// Sets a field, adding it when the form did not carry it.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    /// Target of a GET submission: the fields replace the action's query,
    /// as a browser does.
    pub fn get_url(&self) -> Url {
        let mut url = self.action.clone();
        if !self.fields.is_empty() {
            url.set_query(None);
            url.query_pairs_mut().extend_pairs(&self.fields);
        }
        url
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

fn is_successful(el: ElementRef<'_>) -> bool {
    let attrs = el.value();
    if attrs.attr("disabled").is_some() {
        return false;
    }
    match attrs.attr("type").map(str::to_ascii_lowercase).as_deref() {
        Some("submit" | "button" | "image" | "reset" | "file") => false,
        Some("checkbox" | "radio") => attrs.attr("checked").is_some(),
        _ => true,
    }
}

/// The identity provider's login form with the names of its two inputs.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub form: HtmlForm,
    pub username_field: String,
    pub password_field: String,
}

impl LoginForm {
    pub fn fill(mut self, username: &str, password: &str) -> HtmlForm {
        self.form.set(&self.username_field, username);
        self.form.set(&self.password_field, password);
        self.form
    }
}

/// Finds the form holding `#passwordInput`.
pub fn login_form(html: &str, base: &Url) -> Option<LoginForm> {
    let document = Html::parse_document(html);
    let forms = selector("form");
    let password = selector("#passwordInput");
    let username = selector("#userNameInput");

    let login = document.select(&forms).find_map(|form| {
        let password_el = form.select(&password).next()?;
        let password_field = password_el
            .value()
            .attr("name")
            .unwrap_or("Password")
            .to_string();
        let username_field = form
            .select(&username)
            .next()
            .and_then(|el| el.value().attr("name"))
            .unwrap_or("UserName")
            .to_string();

        Some(LoginForm {
            form: HtmlForm::from_element(form, base),
            username_field,
            password_field,
        })
    });
    login
}

/// True while the page still asks for a password, i.e. the login did not go through.
pub fn has_password_field(html: &str) -> bool {
    Html::parse_document(html)
        .select(&selector("#passwordInput"))
        .next()
        .is_some()
}

/// The message the identity provider shows next to a rejected login.
pub fn login_error(html: &str) -> Option<String> {
    Html::parse_document(html)
        .select(&selector("#errorText"))
        .next()
        .map(text_of)
        .filter(|t| !t.is_empty())
}

/// An auto-posting form carrying an SSO assertion back to the portal.
pub fn sso_handoff_form(html: &str, base: &Url) -> Option<HtmlForm> {
    let document = Html::parse_document(html);
    let assertion = selector(r#"input[name="SAMLResponse"], input[name="wresult"]"#);

    let form = document
        .select(&selector("form"))
        .find(|form| form.select(&assertion).next().is_some())
        .map(|form| HtmlForm::from_element(form, base));
    form
}
