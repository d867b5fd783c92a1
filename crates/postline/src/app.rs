use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use postline_auth::API_KEY_HEADER;

use crate::{
    handlers::{
        accounts::{
            create_account, delete_account, get_account, list_accounts, login, update_account,
            update_password,
        },
        comments::{create_comment, delete_comment, get_comment, list_comments, update_comment},
        health::health,
        posts::{create_post, delete_post, get_post, list_posts, update_post},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static(API_KEY_HEADER),
        ]);

    let api_routes = Router::new()
        // Account routes
        .route("/accounts/auth", post(login))
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/accounts/{id}/password", put(update_password))
        // Post routes
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        // Comment routes
        .route("/comments", get(list_comments).post(create_comment))
        .route(
            "/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
        .route("/health", get(health))
        .layer(cors);

    Router::new()
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, Response},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_app(AppState::in_memory(), Duration::from_secs(10))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        app.clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    /// Registers an account and logs in, returning `(account_id, token)`.
    async fn register(app: &Router, email: &str) -> (i64, String) {
        let response = send(
            app,
            "POST",
            "/v1/accounts",
            None,
            Some(json!({ "name": "Writer", "email": email, "password": "s3cret-pass" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let account = json_body(response).await;
        assert!(account.get("password").is_none());

        let response = send(
            app,
            "POST",
            "/v1/accounts/auth",
            None,
            Some(json!({ "email": email, "password": "s3cret-pass" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let token = json_body(response).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        (account["id"].as_i64().unwrap(), token)
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(&app(), "GET", "/v1/health", None, None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_post_lifecycle() {
        let app = app();
        let (owner_id, owner) = register(&app, "owner@example.com").await;
        let (_, other) = register(&app, "other@example.com").await;

        // Create
        let response = send(
            &app,
            "POST",
            "/v1/posts",
            Some(&owner),
            Some(json!({ "title": "First", "body": "Hello world" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        assert_eq!(created["account_id"], owner_id);
        let uri = format!("/v1/posts/{}", created["id"]);

        // Get
        let response = send(&app, "GET", &uri, None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["title"], "First");

        // Update by another account
        let response = send(
            &app,
            "PUT",
            &uri,
            Some(&other),
            Some(json!({ "title": "Hijacked", "body": "Nope" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Update by the owner
        let response = send(
            &app,
            "PUT",
            &uri,
            Some(&owner),
            Some(json!({ "title": "Second", "body": "Hello again" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, "GET", &uri, None, None).await;
        assert_eq!(json_body(response).await["title"], "Second");

        // Delete
        let response = send(&app, "DELETE", &uri, Some(&owner), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, "GET", &uri, None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "post not found");
    }

    #[tokio::test]
    async fn test_create_post_without_token_is_unauthorized() {
        let response = send(
            &app(),
            "POST",
            "/v1/posts",
            None,
            Some(json!({ "title": "Anonymous", "body": "Body" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let response = send(
            &app(),
            "POST",
            "/v1/posts",
            Some("not-a-token"),
            Some(json!({ "title": "Forged", "body": "Body" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "unauthorized");
    }

    #[tokio::test]
    async fn test_api_key_header_authenticates() {
        let app = app();
        let (_, token) = register(&app, "keyed@example.com").await;

        let request = Request::builder()
            .method("POST")
            .uri("/v1/posts")
            .header(API_KEY_HEADER, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "title": "Via key", "body": "Body" }).to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let app = app();
        register(&app, "taken@example.com").await;

        let response = send(
            &app,
            "POST",
            "/v1/accounts",
            None,
            Some(json!({ "name": "Copy", "email": "taken@example.com", "password": "s3cret-pass" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_wrong_login_is_unauthorized() {
        let app = app();
        register(&app, "ada@example.com").await;

        let response = send(
            &app,
            "POST",
            "/v1/accounts/auth",
            None,
            Some(json!({ "email": "ada@example.com", "password": "wrong-pass" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = app();
        let (_, token) = register(&app, "ada@example.com").await;

        let response = send(
            &app,
            "POST",
            "/v1/posts",
            Some(&token),
            Some(json!({ "title": "Missing body" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_comments_flow_and_post_id_is_required() {
        let app = app();
        let (_, token) = register(&app, "ada@example.com").await;

        let response = send(
            &app,
            "POST",
            "/v1/posts",
            Some(&token),
            Some(json!({ "title": "Discuss", "body": "Thoughts?" })),
        )
        .await;
        let post_id = json_body(response).await["id"].as_i64().unwrap();

        let response = send(
            &app,
            "POST",
            "/v1/comments",
            Some(&token),
            Some(json!({ "post_id": post_id, "body": "First!" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(
            &app,
            "GET",
            &format!("/v1/comments?post_id={}", post_id),
            None,
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);

        let response = send(&app, "GET", "/v1/comments", None, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_account_delete_requires_self() {
        let app = app();
        let (ada_id, _) = register(&app, "ada@example.com").await;
        let (_, eve) = register(&app, "eve@example.com").await;

        let uri = format!("/v1/accounts/{}", ada_id);
        let response = send(&app, "DELETE", &uri, Some(&eve), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(&app, "GET", &uri, None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_password_change_returns_account() {
        let app = app();
        let (ada_id, token) = register(&app, "ada@example.com").await;

        let response = send(
            &app,
            "PUT",
            &format!("/v1/accounts/{}/password", ada_id),
            Some(&token),
            Some(json!({ "old_password": "s3cret-pass", "new_password": "fresh-s3cret" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let account = json_body(response).await;
        assert_eq!(account["id"].as_i64(), Some(ada_id));
        assert!(account.get("password").is_none());

        let response = send(
            &app,
            "POST",
            "/v1/accounts/auth",
            None,
            Some(json!({ "email": "ada@example.com", "password": "fresh-s3cret" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_account_delete_hides_cached_posts_and_comments() {
        let app = app();
        let (ada_id, ada) = register(&app, "ada@example.com").await;
        let (_, grace) = register(&app, "grace@example.com").await;

        let response = send(
            &app,
            "POST",
            "/v1/posts",
            Some(&ada),
            Some(json!({ "title": "Farewell", "body": "Soon gone" })),
        )
        .await;
        let post_id = json_body(response).await["id"].as_i64().unwrap();
        let response = send(
            &app,
            "POST",
            "/v1/comments",
            Some(&grace),
            Some(json!({ "post_id": post_id, "body": "Noted" })),
        )
        .await;
        let comment_id = json_body(response).await["id"].as_i64().unwrap();

        let post_uri = format!("/v1/posts/{}", post_id);
        let comment_uri = format!("/v1/comments/{}", comment_id);
        for uri in [&post_uri, &comment_uri] {
            let response = send(&app, "GET", uri, None, None).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let account_uri = format!("/v1/accounts/{}", ada_id);
        let response = send(&app, "DELETE", &account_uri, Some(&ada), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        for uri in [&post_uri, &comment_uri] {
            let response = send(&app, "GET", uri, None, None).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        let response = send(
            &app,
            "POST",
            "/v1/comments",
            Some(&grace),
            Some(json!({ "post_id": post_id, "body": "Hello?" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_bad_request() {
        let response = send(&app(), "GET", "/v1/posts/abc", None, None).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
