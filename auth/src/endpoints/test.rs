use crate::model::{CurrentUser, LoginResponse};
use actix_web::{
    App,
    http::{StatusCode, header},
    test::TestRequest,
};
use serde_json::json;
use stockroom_test_context::{StockroomContext, TEST_PASSWORD, TestUser, call::CallService};
use test_context::test_context;
use utoipa_actix_web::AppExt;

async fn caller(ctx: &StockroomContext) -> anyhow::Result<impl CallService> {
    let (app, _openapi) = App::new()
        .into_utoipa_app()
        .service(
            utoipa_actix_web::scope("/api/v1")
                .configure(|svc| crate::endpoints::configure(svc, ctx.db.clone())),
        )
        .split_for_parts();

    Ok(actix_web::test::init_service(app).await)
}

fn whoami(token: &str) -> TestRequest {
    TestRequest::get()
        .uri("/api/v1/whoami")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}

#[test_context(StockroomContext)]
#[test_log::test(actix_web::test)]
async fn login_and_whoami(ctx: &StockroomContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    ctx.manager("alice").await?;

    let response = app
        .call_service(
            TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({"username": "alice", "password": TEST_PASSWORD}))
                .to_request(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let login: LoginResponse = actix_web::test::read_body_json(response).await;
    assert_eq!(login.user.username, "alice");
    assert_eq!(login.user.groups, ["manager"]);

    let user: CurrentUser = app
        .call_and_read_body_json(whoami(&login.token).to_request())
        .await;
    assert_eq!(user.username, "alice");
    assert!(!user.superuser);

    Ok(())
}

#[test_context(StockroomContext)]
#[test_log::test(actix_web::test)]
async fn login_rejects_bad_credentials(ctx: &StockroomContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    ctx.user("alice").await?;

    for (username, password) in [("alice", "wrong"), ("nobody", TEST_PASSWORD)] {
        let response = app
            .call_service(
                TestRequest::post()
                    .uri("/api/v1/login")
                    .set_json(json!({"username": username, "password": password}))
                    .to_request(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    Ok(())
}

/// Requests without a session are redirected to the login page.
#[test_context(StockroomContext)]
#[test_log::test(actix_web::test)]
async fn missing_session_redirects_to_login(ctx: &StockroomContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;

    let response = app
        .call_service(TestRequest::get().uri("/api/v1/whoami").to_request())
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .expect("must have a location header"),
        "/login"
    );

    Ok(())
}

/// Expired sessions count as not being logged in at all.
#[test_context(StockroomContext)]
#[test_log::test(actix_web::test)]
async fn expired_session_is_unauthenticated(ctx: &StockroomContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let alice = ctx.user("alice").await?;
    let expired = ctx.expired_session(&alice).await?;

    let response = app.call_service(whoami(&expired).to_request()).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    // the live session still works
    let response = app.call_service(whoami(&alice.token).to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

/// Logging out invalidates the session token.
#[test_context(StockroomContext)]
#[test_log::test(actix_web::test)]
async fn logout_drops_the_session(ctx: &StockroomContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let alice = ctx.user("alice").await?;

    let response = app
        .call_service(
            TestRequest::post()
                .uri("/api/v1/logout")
                .insert_header((header::AUTHORIZATION, format!("Bearer {}", alice.token)))
                .to_request(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.call_service(whoami(&alice.token).to_request()).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    Ok(())
}

#[test_context(StockroomContext)]
#[test_log::test(actix_web::test)]
async fn list_users(ctx: &StockroomContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let alice = ctx.user("alice").await?;
    ctx.user("bob").await?;

    let users: Vec<serde_json::Value> = app
        .call_and_read_body_json(
            TestRequest::get()
                .uri("/api/v1/user")
                .insert_header((header::AUTHORIZATION, format!("Bearer {}", alice.token)))
                .to_request(),
        )
        .await;

    let names: Vec<_> = users
        .iter()
        .map(|user| user["username"].as_str().expect("must be a string"))
        .collect();
    assert_eq!(names, ["alice", "bob"]);

    Ok(())
}

/// The session cookie works as a fallback for browser flows.
#[test_context(StockroomContext)]
#[test_log::test(actix_web::test)]
async fn session_cookie_authenticates(ctx: &StockroomContext) -> Result<(), anyhow::Error> {
    let app = caller(ctx).await?;
    let alice: TestUser = ctx.user("alice").await?;

    let response = app
        .call_service(
            TestRequest::get()
                .uri("/api/v1/whoami")
                .cookie(actix_web::cookie::Cookie::new("session", alice.token.clone()))
                .to_request(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
