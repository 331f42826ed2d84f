mod common;

use mockito::Matcher;

use nfl_gamethread_bot::error::BotError;
use nfl_gamethread_bot::espn::{Espn, ScoreboardSource};
use nfl_gamethread_bot::ledger::{GistStore, LedgerStore};
use nfl_gamethread_bot::model::game::ThreadHandle;
use nfl_gamethread_bot::squabblr::{Squabblr, ThreadPoster};

use common::fixture;

fn gist(server: &mockito::Server) -> GistStore {
    GistStore::with_api_base(server.url(), "abc".to_string(), "nfl-schedule.csv".to_string(), "ghtok".to_string())
}

#[test]
fn gist_store_reads_its_file() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("GET", "/gists/abc")
        .match_header("authorization", "token ghtok")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"files":{"nfl-schedule.csv":{"content":"Week,Date & Time\n"},"other.csv":{"content":"x"}}}"#)
        .create();

    let content = gist(&server).read().expect("read");
    assert_eq!(content, "Week,Date & Time\n");
    m.assert();
}

#[test]
fn gist_without_our_file_is_a_ledger_error() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("GET", "/gists/abc").with_status(200).with_body(r#"{"files":{}}"#).create();

    assert!(matches!(gist(&server).read(), Err(BotError::Ledger(_))));
}

#[test]
fn gist_store_patches_the_whole_file() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("PATCH", "/gists/abc")
        .match_header("authorization", "token ghtok")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "files": { "nfl-schedule.csv": { "content": "a,b\n1,2\n" } }
        })))
        .with_status(200)
        .with_body("{}")
        .create();

    gist(&server).write("a,b\n1,2\n").expect("write");
    m.assert();
}

#[test]
fn gist_server_error_surfaces_as_http_error() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("PATCH", "/gists/abc").with_status(500).create();

    assert!(matches!(gist(&server).write("x"), Err(BotError::Http { .. })));
}

#[test]
fn squabblr_create_posts_form_and_returns_hash_id() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("POST", "/api/new-post")
        .match_header("authorization", "Bearer sqtok")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("community_name".into(), "test".into()),
            Matcher::UrlEncoded("title".into(), "[Gamethread] Ravens at Chiefs - Week 1".into()),
            Matcher::UrlEncoded("content".into(), "body text".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"data":[{"hash_id":"xYz123"}]}"#)
        .create();

    let squabblr = Squabblr::with_base_url(server.url(), "sqtok".to_string());
    let handle = squabblr.create("test", "[Gamethread] Ravens at Chiefs - Week 1", "body text").expect("create");
    assert_eq!(handle, ThreadHandle::new("xYz123"));
    m.assert();
}

#[test]
fn squabblr_create_without_hash_id_fails() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("POST", "/api/new-post").with_status(200).with_body(r#"{"data":[]}"#).create();

    let squabblr = Squabblr::with_base_url(server.url(), "sqtok".to_string());
    assert!(matches!(squabblr.create("test", "t", "b"), Err(BotError::Post { .. })));
}

#[test]
fn squabblr_patch_replaces_content() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("PATCH", "/api/posts/xYz123")
        .match_header("authorization", "Bearer sqtok")
        .match_body(Matcher::Json(serde_json::json!({ "content": "new body" })))
        .with_status(200)
        .with_body("{}")
        .create();

    let squabblr = Squabblr::with_base_url(server.url(), "sqtok".to_string());
    squabblr.patch(&ThreadHandle::new("xYz123"), "new body").expect("patch");
    m.assert();
}

#[test]
fn squabblr_rejected_patch_is_an_error() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("PATCH", "/api/posts/gone").with_status(404).create();

    let squabblr = Squabblr::with_base_url(server.url(), "sqtok".to_string());
    assert!(squabblr.patch(&ThreadHandle::new("gone"), "b").is_err());
}

#[test]
fn espn_week_schedule_queries_season_and_week() {
    let mut server = mockito::Server::new();
    let m = server
        .mock("GET", "/scoreboard")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("dates".into(), "2024".into()),
            Matcher::UrlEncoded("seasontype".into(), "2".into()),
            Matcher::UrlEncoded("week".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(fixture("scoreboard_week1.json"))
        .create();

    let espn = Espn::with_urls(server.url(), format!("{}/standings", server.url()), 2024, 2);
    let games = espn.week_schedule(1).expect("schedule");
    assert_eq!(games.len(), 2);
    m.assert();
}

#[test]
fn espn_live_scoreboard_and_standings() {
    let mut server = mockito::Server::new();
    let _scoreboard = server.mock("GET", "/scoreboard").with_status(200).with_body(fixture("scoreboard_live.json")).create();
    let _standings = server.mock("GET", "/standings").with_status(200).with_body(fixture("standings.json")).create();

    let espn = Espn::with_urls(server.url(), format!("{}/standings", server.url()), 2024, 2);
    assert_eq!(espn.live_snapshots().expect("snapshots").len(), 2);
    assert_eq!(espn.standings().expect("standings").len(), 4);
}

#[test]
fn espn_garbage_is_a_decode_error() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("GET", "/scoreboard").with_status(200).with_body("<html>").create();

    let espn = Espn::with_urls(server.url(), format!("{}/standings", server.url()), 2024, 2);
    assert!(matches!(espn.live_snapshots(), Err(BotError::Decode { .. })));
}

#[test]
fn espn_outage_is_an_http_error() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("GET", "/scoreboard").with_status(503).create();

    let espn = Espn::with_urls(server.url(), format!("{}/standings", server.url()), 2024, 2);
    assert!(matches!(espn.live_snapshots(), Err(BotError::Http { .. })));
}
