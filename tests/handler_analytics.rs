mod common;

use axum_test::TestServer;
use chrono::{Duration, Utc};

#[tokio::test]
async fn test_overview_on_empty_store() {
    let app = common::TestApp::new(common::null_cache());
    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/api/analytics").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["totalUrls"], 0);
    assert_eq!(json["totalClicks"], 0);
    assert_eq!(json["avgClicksPerUrl"], 0.0);
    assert_eq!(json["recentUrls"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_overview_totals_and_recent_urls() {
    let app = common::TestApp::new(common::null_cache());
    for i in 1..=6 {
        app.urls
            .insert(&format!("code{}", i), &format!("https://example.com/{}", i));
    }
    let server = TestServer::new(app.router()).unwrap();

    // Cache disabled: every redirect records inline.
    for code in ["code1", "code1", "code2", "code6"] {
        assert_eq!(server.get(&format!("/{}", code)).await.status_code(), 301);
    }

    let json = server
        .get("/api/analytics")
        .await
        .json::<serde_json::Value>();

    assert_eq!(json["totalUrls"], 6);
    assert_eq!(json["totalClicks"], 4);
    assert_eq!(json["avgClicksPerUrl"], 0.67);

    let recent = json["recentUrls"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["shortCode"], "code6");
    assert_eq!(recent[0]["clicks"], 1);
    assert_eq!(recent[4]["shortCode"], "code2");
}

#[tokio::test]
async fn test_code_analytics_windows_and_breakdowns() {
    let app = common::TestApp::new(common::null_cache());
    app.urls.insert("stats01", "https://example.com/stats");

    let now = Utc::now();
    app.clicks
        .push_at("stats01", now - Duration::hours(1), Some("Firefox"));
    app.clicks
        .push_at("stats01", now - Duration::hours(2), Some("Firefox"));
    app.clicks
        .push_at("stats01", now - Duration::days(3), Some("Safari"));
    app.clicks.push_at("stats01", now - Duration::days(20), None);
    app.clicks
        .push_at("other01", now - Duration::hours(1), Some("Firefox"));

    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/api/analytics/stats01").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();

    assert_eq!(json["shortCode"], "stats01");
    assert_eq!(json["originalUrl"], "https://example.com/stats");
    assert!(json.get("createdAt").is_some());

    assert_eq!(json["statistics"]["last24h"], 2);
    assert_eq!(json["statistics"]["last7d"], 3);
    assert_eq!(json["statistics"]["last30d"], 4);

    let browsers = json["topBrowsers"].as_array().unwrap();
    assert_eq!(browsers[0]["userAgent"], "Firefox");
    assert_eq!(browsers[0]["count"], 2);

    let by_date = json["clicksByDate"].as_array().unwrap();
    let counted: i64 = by_date.iter().map(|d| d["count"].as_i64().unwrap()).sum();
    assert_eq!(counted, 3);

    let recent = json["recentClicks"].as_array().unwrap();
    assert_eq!(recent.len(), 4);
    assert_eq!(recent[0]["userAgent"], "Firefox");
    assert_eq!(recent[0]["ip"], "10.0.0.1");
    assert!(recent[3]["userAgent"].is_null());
}

#[tokio::test]
async fn test_code_analytics_not_found() {
    let app = common::TestApp::new(common::null_cache());
    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/api/analytics/missing").await;

    response.assert_status_not_found();
    assert_eq!(
        response.json::<serde_json::Value>()["details"]["code"],
        "missing"
    );
}
