//! Runs the whole scrape against a mock portal.

use common::export::read_jobs;
use shortlist_scraper::config::Settings;
use shortlist_scraper::pipeline::{run, Outcome, RunSummary};
use shortlist_scraper::Error;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADFS_LOGIN: &str = include_str!("fixtures/adfs_login.html");
const SAML_POST: &str = include_str!("fixtures/saml_post.html");
const BOARD: &str = include_str!("fixtures/postings_board.html");
const SHORTLIST: &str = include_str!("fixtures/shortlist.html");
const POSTING: &str = include_str!("fixtures/posting.html");

const BOARD_PATH: &str = "/myAccount/co-op/coopjobs.htm";

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

fn settings(server: &MockServer, dir: &Path) -> Settings {
    let mut settings = Settings::for_portal(
        format!("{}/login", server.uri()),
        format!("{}{BOARD_PATH}", server.uri()),
    );
    settings.credentials = dir.join("config.json");
    settings.output = dir.join("shortlist.csv");
    settings
}

fn write_credentials(dir: &Path) {
    fs::write(
        dir.join("config.json"),
        r#"{"credentials": {"username": "jdoe", "password": "hunter2"}}"#,
    )
    .unwrap();
}

/// Login page plus the SSO hand-off that lands back on the portal.
async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(html(ADFS_LOGIN))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/adfs/ls/"))
        .and(body_string_contains("UserName=CUNET%5Cjdoe"))
        .and(body_string_contains("Password=hunter2"))
        .respond_with(html(SAML_POST.replace("https://portal.example", &server.uri())))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Shibboleth.sso/SAML2/POST"))
        .and(body_string_contains("RelayState=ss%3Amem%3A1234"))
        .respond_with(html("<html><body><h1>Welcome to MySuccess</h1></body></html>"))
        .expect(1)
        .mount(server)
        .await;
}

async fn run_blocking(settings: Settings) -> shortlist_scraper::Result<Outcome> {
    tokio::task::spawn_blocking(move || run(&settings))
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_scrapes_shortlist_in_order() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_credentials(dir.path());
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path(BOARD_PATH))
        .respond_with(html(BOARD))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(BOARD_PATH))
        .and(body_string_contains("action=displayMyShortlist"))
        .respond_with(html(SHORTLIST))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/myAccount/co-op/postings/101.htm"))
        .respond_with(html(POSTING))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(BOARD_PATH))
        .and(body_string_contains("postingId=205"))
        .respond_with(html(
            POSTING.replace("Junior Software Developer", "Data Analyst"),
        ))
        .mount(&server)
        .await;

    // 317 is gone from the portal
    Mock::given(method("POST"))
        .and(path("/myAccount/co-op/view.htm"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let settings = settings(&server, dir.path());
    let output = settings.output.clone();
    let outcome = run_blocking(settings).await.unwrap();

    assert_eq!(
        outcome,
        Outcome::Finished(RunSummary {
            written: 2,
            skipped: 1,
            output: output.clone(),
        })
    );

    let jobs = read_jobs(fs::File::open(&output).unwrap()).unwrap();
    let titles: Vec<_> = jobs.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Junior Software Developer", "Data Analyst"]);
    assert_eq!(
        jobs[0].link,
        format!("{}/myAccount/co-op/postings/101.htm", server.uri())
    );
    assert_eq!(
        jobs[1].link,
        format!("{}{BOARD_PATH}?action=displayPosting&postingId=205", server.uri())
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_writes_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_credentials(dir.path());

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(html(ADFS_LOGIN))
        .mount(&server)
        .await;

    let rejected = ADFS_LOGIN.replace(
        r#"<span id="errorText" for=""></span>"#,
        r#"<span id="errorText" for="">Incorrect user ID or password.</span>"#,
    );
    Mock::given(method("POST"))
        .and(path("/adfs/ls/"))
        .respond_with(html(rejected))
        .mount(&server)
        .await;

    let settings = settings(&server, dir.path());
    let output = settings.output.clone();
    let err = run_blocking(settings).await.unwrap_err();

    match err {
        Error::LoginRejected(reason) => assert_eq!(reason, "Incorrect user ID or password."),
        other => panic!("expected a rejected login, got {other:?}"),
    }
    assert!(!output.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_shortlist_quick_search() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_credentials(dir.path());
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path(BOARD_PATH))
        .respond_with(html("<html><body><table><tr><td class=\"full\">New Postings</td></tr></table></body></html>"))
        .mount(&server)
        .await;

    let err = run_blocking(settings(&server, dir.path())).await.unwrap_err();
    assert!(matches!(err, Error::ShortlistNotFound(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_shortlist_still_writes_header() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_credentials(dir.path());
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path(BOARD_PATH))
        .respond_with(html(BOARD))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(BOARD_PATH))
        .respond_with(html("<html><body><p>No postings in your shortlist.</p></body></html>"))
        .mount(&server)
        .await;

    let settings = settings(&server, dir.path());
    let output = settings.output.clone();
    let outcome = run_blocking(settings).await.unwrap();

    assert!(matches!(
        outcome,
        Outcome::Finished(RunSummary { written: 0, skipped: 0, .. })
    ));
    let csv = fs::read_to_string(output).unwrap();
    assert_eq!(csv.lines().count(), 1);
    assert!(csv.starts_with("Title,Company,Division,Deadline"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_endless_sso_handoff_stops_after_five_hops() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    write_credentials(dir.path());

    let handoff = SAML_POST.replace("https://portal.example", &server.uri());

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(html(ADFS_LOGIN))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/adfs/ls/"))
        .respond_with(html(handoff.clone()))
        .mount(&server)
        .await;
    // every hand-off answers with yet another hand-off
    Mock::given(method("POST"))
        .and(path("/Shibboleth.sso/SAML2/POST"))
        .respond_with(html(handoff))
        .expect(5)
        .mount(&server)
        .await;

    let settings = settings(&server, dir.path());
    let output = settings.output.clone();
    let err = run_blocking(settings).await.unwrap_err();

    assert!(matches!(err, Error::SsoHandoffLoop { hops: 5 }), "got {err:?}");
    assert!(!output.exists());
}
