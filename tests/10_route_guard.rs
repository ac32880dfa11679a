mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::{expired_token_for, json_body, location, token_for, TestApp};

#[tokio::test]
async fn anonymous_visit_to_protected_page_redirects_to_login() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/dashboard", None).await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res).as_deref(), Some("/login?redirect=%2Fdashboard"));
    Ok(())
}

#[tokio::test]
async fn nested_protected_path_keeps_full_return_path() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/applications/42/edit", None).await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&res).as_deref(),
        Some("/login?redirect=%2Fapplications%2F42%2Fedit")
    );
    Ok(())
}

#[tokio::test]
async fn signed_in_visit_to_login_goes_to_dashboard() -> Result<()> {
    let app = TestApp::new();
    let token = token_for("ada@example.com");

    let res = app.get("/login", Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res).as_deref(), Some("/dashboard"));

    let res = app.get("/register", Some(&token)).await?;
    assert_eq!(location(&res).as_deref(), Some("/dashboard"));
    Ok(())
}

#[tokio::test]
async fn signed_in_visit_to_protected_page_sees_user() -> Result<()> {
    let app = TestApp::new();
    let token = token_for("ada@example.com");

    let res = app.get("/applications/7/edit", Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = json_body(res).await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["page"], "application_edit");
    assert_eq!(body["data"]["application_id"], "7");
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
    Ok(())
}

#[tokio::test]
async fn bearer_token_is_accepted_without_cookie() -> Result<()> {
    let app = TestApp::new();
    let token = token_for("ada@example.com");

    let request = axum::http::Request::builder()
        .uri("/settings")
        .header("authorization", format!("Bearer {}", token))
        .body(axum::body::Body::empty())?;
    let res = app.send(request).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn expired_cookie_redirects_with_reason() -> Result<()> {
    let app = TestApp::new();
    let token = expired_token_for("ada@example.com");

    let res = app.get("/interviews", Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&res).as_deref(),
        Some("/login?redirect=%2Finterviews&error=session_expired")
    );
    Ok(())
}

#[tokio::test]
async fn expired_cookie_can_still_open_login() -> Result<()> {
    let app = TestApp::new();
    let token = expired_token_for("ada@example.com");

    let res = app.get("/login", Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn forged_token_counts_as_signed_out() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/analytics", Some("not.a.jwt")).await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res).as_deref(), Some("/login?redirect=%2Fanalytics"));
    Ok(())
}

#[tokio::test]
async fn public_pages_are_never_redirected() -> Result<()> {
    let app = TestApp::new();
    let token = token_for("ada@example.com");

    for token in [None, Some(token.as_str())] {
        let res = app.get("/", token).await?;
        assert_eq!(res.status(), StatusCode::OK);
        let res = app.get("/health", token).await?;
        assert_eq!(res.status(), StatusCode::OK);
    }
    Ok(())
}

#[tokio::test]
async fn asset_paths_bypass_the_guard() -> Result<()> {
    let app = TestApp::new();

    // No handler exists, so an untouched request falls through to 404
    let res = app.get("/_next/static/chunk.js", None).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = app.get("/favicon.ico", None).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_protected_subpath_still_redirects() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/settings/profile", None).await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res).as_deref(), Some("/login?redirect=%2Fsettings%2Fprofile"));
    Ok(())
}

#[tokio::test]
async fn lookalike_prefix_is_public() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/dashboards", None).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn login_page_echoes_sanitized_redirect() -> Result<()> {
    let app = TestApp::new();

    let res = app.get("/login?redirect=%2Fanalytics&error=signed_out", None).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await?;
    assert_eq!(body["data"]["redirect"], "/analytics");
    assert_eq!(body["data"]["error"], "signed_out");

    let res = app.get("/login?redirect=https%3A%2F%2Fevil.example", None).await?;
    let body = json_body(res).await?;
    assert_eq!(body["data"]["redirect"], "/dashboard");
    Ok(())
}
