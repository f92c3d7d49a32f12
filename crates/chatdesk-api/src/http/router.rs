//! Axum router configuration with middleware.
//!
//! JSON routes live under `/api/v1/`; account flows under `/auth/`.
//! Middleware: CORS, tracing.
//!
//! Uploaded avatars are served from `/media`. When a web bundle directory
//! is configured and exists, unknown paths fall through to it, with
//! `index.html` as the final fallback for client-side routing.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use chatdesk_infra::storage::avatar::MAX_AVATAR_BYTES;

use crate::http::handlers;
use crate::state::AppState;

/// Room for the other multipart fields next to a maximum-size avatar.
const PROFILE_BODY_LIMIT: usize = MAX_AVATAR_BYTES + 64 * 1024;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Chat
        .route("/chat", get(handlers::chat::chat_home))
        .route("/chat/message", post(handlers::chat::send_message))
        // Conversations
        .route(
            "/conversations",
            get(handlers::conversation::list_conversations)
                .post(handlers::conversation::create_conversation),
        )
        .route(
            "/conversations/{id}/history",
            get(handlers::conversation::conversation_history),
        )
        .route(
            "/conversations/{id}/delete",
            post(handlers::conversation::delete_conversation),
        )
        // Profile
        .route(
            "/profile",
            get(handlers::profile::get_profile)
                .post(handlers::profile::update_profile)
                .layer(DefaultBodyLimit::max(PROFILE_BODY_LIMIT)),
        );

    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/password-reset", post(handlers::auth::request_password_reset))
        .route(
            "/password-reset/confirm",
            post(handlers::auth::confirm_password_reset),
        );

    let media_dir = state.avatars.media_dir().to_path_buf();
    let web_dir = state.config.web_dir.clone();

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .nest("/auth", auth_routes)
        .nest_service("/media", ServeDir::new(media_dir))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(web_dir) = web_dir.filter(|dir| dir.is_dir()) {
        let index_path = web_dir.join("index.html");
        let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir.display(), "Static web bundle serving enabled");
    }

    router
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chatdesk_infra::config::AppConfig;
    use chatdesk_infra::sqlite::pool::DatabasePool;
    use http_body_util::BodyExt;
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct TestApp {
        router: Router,
        upstream: MockServer,
        _dir: TempDir,
    }

    async fn app_with(debug: bool) -> TestApp {
        let dir = TempDir::new().unwrap();
        let upstream = MockServer::start().await;

        let mut config = AppConfig {
            debug,
            data_dir: dir.path().to_path_buf(),
            api_key: Some(SecretString::from("sk-test".to_string())),
            ..AppConfig::default()
        };
        config.completion.api_base_url = format!("{}/v1", upstream.uri());
        config.completion.timeout_secs = 5;

        let pool = DatabasePool::new(&config.database_url()).await.unwrap();
        let state = AppState::with_pool(config, pool).unwrap();
        TestApp {
            router: build_router(state),
            upstream,
            _dir: dir,
        }
    }

    async fn app() -> TestApp {
        app_with(false).await
    }

    async fn mount_reply(server: &MockServer, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "deepseek-chat",
                "choices": [{"message": {"role": "assistant", "content": content}}]
            })))
            .mount(server)
            .await;
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn register(router: &Router, username: &str) -> String {
        let (status, body) = send(
            router,
            json_request(
                "POST",
                "/auth/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password1": "correct-horse",
                    "password2": "correct-horse",
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_first_message_creates_conversation_and_reply() {
        let app = app().await;
        mount_reply(&app.upstream, "Hi there!").await;
        let token = register(&app.router, "alice").await;

        let (status, body) = send(
            &app.router,
            json_request("POST", "/api/v1/chat/message", Some(&token), json!({"message": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["response"], "Hi there!");
        let conversation_id = body["conversation_id"].as_str().unwrap().to_string();

        let (_, list) = send(&app.router, get("/api/v1/conversations", &token)).await;
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["title"], "hello");

        let (status, history) = send(
            &app.router,
            get(&format!("/api/v1/conversations/{conversation_id}/history"), &token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            history,
            json!({"messages": [
                {"role": "user", "content": "hello"},
                {"role": "assistant", "content": "Hi there!"}
            ]})
        );
    }

    #[tokio::test]
    async fn test_follow_up_uses_existing_conversation() {
        let app = app().await;
        mount_reply(&app.upstream, "ok").await;
        let token = register(&app.router, "alice").await;

        let (_, first) = send(
            &app.router,
            json_request("POST", "/api/v1/chat/message", Some(&token), json!({"message": "one"})),
        )
        .await;
        let id = first["conversation_id"].clone();
        let (status, second) = send(
            &app.router,
            json_request(
                "POST",
                "/api/v1/chat/message",
                Some(&token),
                json!({"message": "two", "conversation_id": id}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["conversation_id"], id);

        let (_, history) = send(
            &app.router,
            get(&format!("/api/v1/conversations/{}/history", id.as_str().unwrap()), &token),
        )
        .await;
        assert_eq!(history["messages"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_upstream_401_keeps_user_message_only() {
        let app = app().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Authentication Fails"}
            })))
            .mount(&app.upstream)
            .await;
        let token = register(&app.router, "alice").await;

        let (status, body) = send(
            &app.router,
            json_request("POST", "/api/v1/chat/message", Some(&token), json!({"message": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Authentication error. Please verify the API key.");

        let (_, list) = send(&app.router, get("/api/v1/conversations", &token)).await;
        let id = list[0]["id"].as_str().unwrap().to_string();
        let (_, history) = send(
            &app.router,
            get(&format!("/api/v1/conversations/{id}/history"), &token),
        )
        .await;
        assert_eq!(
            history,
            json!({"messages": [{"role": "user", "content": "hello"}]})
        );
    }

    #[tokio::test]
    async fn test_empty_message_rejected_without_side_effects() {
        let app = app().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&app.upstream)
            .await;
        let token = register(&app.router, "alice").await;

        let (status, body) = send(
            &app.router,
            json_request("POST", "/api/v1/chat/message", Some(&token), json!({"message": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (_, list) = send(&app.router, get("/api/v1/conversations", &token)).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let app = app().await;
        let token = register(&app.router, "alice").await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/chat/message")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON format");
    }

    #[tokio::test]
    async fn test_malformed_conversation_id_in_message_is_404() {
        let app = app().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&app.upstream)
            .await;
        let token = register(&app.router, "alice").await;

        let (status, body) = send(
            &app.router,
            json_request(
                "POST",
                "/api/v1/chat/message",
                Some(&token),
                json!({"message": "hello", "conversation_id": "not-a-uuid"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{body}");
        assert_eq!(body["code"], "CONVERSATION_NOT_FOUND");
        assert_eq!(body["error"], "Conversation not found");

        let (_, list) = send(&app.router, get("/api/v1/conversations", &token)).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_other_users_conversation_is_not_found() {
        let app = app().await;
        mount_reply(&app.upstream, "ok").await;
        let alice = register(&app.router, "alice").await;
        let bob = register(&app.router, "bob").await;

        let (_, body) = send(
            &app.router,
            json_request("POST", "/api/v1/chat/message", Some(&alice), json!({"message": "secret"})),
        )
        .await;
        let id = body["conversation_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app.router,
            get(&format!("/api/v1/conversations/{id}/history"), &bob),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Conversation not found");

        let (status, _) = send(
            &app.router,
            json_request("POST", &format!("/api/v1/conversations/{id}/delete"), Some(&bob), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app.router,
            json_request(
                "POST",
                "/api/v1/chat/message",
                Some(&bob),
                json!({"message": "hi", "conversation_id": id}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app.router,
            get(&format!("/api/v1/conversations/{id}/history"), &alice),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_removes_conversation() {
        let app = app().await;
        let token = register(&app.router, "alice").await;

        let (status, created) = send(
            &app.router,
            json_request("POST", "/api/v1/conversations", Some(&token), json!({"message": "Trip plans"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["title"], "Trip plans");
        let id = created["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app.router,
            json_request("POST", &format!("/api/v1/conversations/{id}/delete"), Some(&token), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success"}));

        let (status, _) = send(
            &app.router,
            get(&format!("/api/v1/conversations/{id}/history"), &token),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unauthenticated_requests_are_401() {
        let app = app().await;
        let request = Request::builder().uri("/api/v1/chat").body(Body::empty()).unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");

        let (status, _) = send(&app.router, get("/api/v1/chat", "not-a-session")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_chat_home_debug_info_only_in_debug() {
        let app = app().await;
        let token = register(&app.router, "alice").await;
        let (_, body) = send(&app.router, get("/api/v1/chat", &token)).await;
        assert_eq!(body["conversations"], json!([]));
        assert!(body.get("debug_info").is_none());

        let app = app_with(true).await;
        let token = register(&app.router, "alice").await;
        let (_, body) = send(&app.router, get("/api/v1/chat", &token)).await;
        let info = &body["debug_info"];
        assert_eq!(info["user_info"]["username"], "alice");
        assert_eq!(info["api_info"]["api_key_exists"], true);
        assert_eq!(info["api_info"]["api_key_length"], 7);
        assert_eq!(info["api_info"]["model"], "deepseek-chat");
        assert_eq!(info["system_info"]["total_conversations"], 0);
    }

    #[tokio::test]
    async fn test_form_login_redirects_with_cookie() {
        let app = app().await;
        register(&app.router, "alice").await;

        let request = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=alice&password=correct-horse"))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        let session = cookie.split(';').next().unwrap().to_string();
        assert!(session.starts_with("chatdesk_session="));

        let request = Request::builder()
            .uri("/api/v1/profile")
            .header(header::COOKIE, session)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "alice");
    }

    #[tokio::test]
    async fn test_wrong_password_is_401() {
        let app = app().await;
        register(&app.router, "alice").await;
        let (status, body) = send(
            &app.router,
            json_request("POST", "/auth/login", None, json!({"username": "alice", "password": "nope-nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let app = app().await;
        register(&app.router, "alice").await;
        let (status, _) = send(
            &app.router,
            json_request(
                "POST",
                "/auth/register",
                None,
                json!({
                    "username": "alice",
                    "email": "other@example.com",
                    "password1": "correct-horse",
                    "password2": "correct-horse",
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = app().await;
        let token = register(&app.router, "alice").await;

        let request = Request::builder()
            .method("POST")
            .uri("/auth/logout")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");

        let (status, _) = send(&app.router, get("/api/v1/chat", &token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_xhr_update() {
        let app = app().await;
        let token = register(&app.router, "alice").await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/profile")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("X-Requested-With", "XMLHttpRequest")
            .body(Body::from(
                "theme=dark&font_size=large&email_notifications=off&bio=Hello&first_name=Alice",
            ))
            .unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body, json!({"status": "success"}));

        let (_, body) = send(&app.router, get("/api/v1/profile", &token)).await;
        assert_eq!(body["profile"]["theme"], "dark");
        assert_eq!(body["profile"]["font_size"], "large");
        assert_eq!(body["profile"]["email_notifications"], false);
        assert_eq!(body["profile"]["show_typing_status"], true);
        assert_eq!(body["profile"]["bio"], "Hello");
        assert_eq!(body["user"]["first_name"], "Alice");
        assert_eq!(body["theme_choices"].as_array().unwrap().len(), 2);
        assert_eq!(body["font_size_choices"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_profile_form_update_redirects_and_validates() {
        let app = app().await;
        let token = register(&app.router, "alice").await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/profile")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("theme=light"))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/profile");

        let long_bio = format!("bio={}", "x".repeat(501));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/profile")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(long_bio))
            .unwrap();
        let (status, _) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejected_profile_update_writes_nothing() {
        let app = app().await;
        let token = register(&app.router, "alice").await;

        let boundary = "chatdeskboundary";
        let long_bio = "x".repeat(501);
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"first_name\"\r\n\r\nMallory\r\n\
                 --{boundary}\r\nContent-Disposition: form-data; name=\"bio\"\r\n\r\n{long_bio}\r\n\
                 --{boundary}\r\nContent-Disposition: form-data; name=\"profile_picture\"; filename=\"me.png\"\r\n\
                 Content-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"\x89PNG\r\n\x1a\nfake");
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/profile")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .header("X-Requested-With", "XMLHttpRequest")
            .body(Body::from(body))
            .unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

        let (_, body) = send(&app.router, get("/api/v1/profile", &token)).await;
        assert_eq!(body["user"]["first_name"], "");
        assert_eq!(body["profile"]["bio"], "");
        assert!(body["profile"]["profile_image"].is_null());

        let saved = std::fs::read_dir(app._dir.path().join("media").join("profile_pics"))
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(saved, 0);

        // An overlong name is rejected before the valid bio is stored.
        let form = format!("first_name={}&bio=kept", "n".repeat(151));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/profile")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        let (status, _) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app.router, get("/api/v1/profile", &token)).await;
        assert_eq!(body["profile"]["bio"], "");
    }

    #[tokio::test]
    async fn test_profile_picture_upload() {
        let app = app().await;
        let token = register(&app.router, "alice").await;

        let boundary = "chatdeskboundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"bio\"\r\n\r\nWith avatar\r\n\
                 --{boundary}\r\nContent-Disposition: form-data; name=\"profile_picture\"; filename=\"me.png\"\r\n\
                 Content-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"\x89PNG\r\n\x1a\nfake");
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/profile")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .header("X-Requested-With", "XMLHttpRequest")
            .body(Body::from(body))
            .unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::OK, "{body}");

        let (_, body) = send(&app.router, get("/api/v1/profile", &token)).await;
        assert_eq!(body["profile"]["bio"], "With avatar");
        let image = body["profile"]["profile_image"].as_str().unwrap().to_string();
        assert!(image.starts_with("profile_pics/"));
        assert!(image.ends_with(".png"));

        let request = Request::builder()
            .uri(format!("/media/{image}"))
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
