use std::sync::Arc;

use api::{AppState, build_router};
use application::{PostRepository, UserRepository};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use infrastructure::{InMemoryPostRepository, InMemoryUserRepository};
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    users: Arc<InMemoryUserRepository>,
    posts: Arc<InMemoryPostRepository>,
}

impl TestApp {
    fn seeded() -> Self {
        let users = Arc::new(InMemoryUserRepository::seeded());
        let posts = Arc::new(InMemoryPostRepository::seeded());
        let router = build_router(AppState::new(users.clone(), posts.clone()));
        Self {
            router,
            users,
            posts,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn post_ids(&self) -> Vec<u64> {
        self.posts
            .list()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id.value())
            .collect()
    }
}

fn empty(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn with_json(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_check_returns_fixed_status() {
    let app = TestApp::seeded();
    let (status, body) = app.send(empty(Method::GET, "/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"Status": "OK"}));
}

#[tokio::test]
async fn list_users_without_authorization_is_unauthorized() {
    let app = TestApp::seeded();
    let (status, body) = app.send(empty(Method::GET, "/users")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Unauthorized"}));
}

#[tokio::test]
async fn list_users_with_empty_authorization_is_unauthorized() {
    let app = TestApp::seeded();
    let request = Request::builder()
        .uri("/users")
        .header(header::AUTHORIZATION, "")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_users_accepts_any_authorization_value() {
    let app = TestApp::seeded();
    let request = Request::builder()
        .uri("/users")
        .header(header::AUTHORIZATION, "not-a-real-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": 1, "name": "John Doe", "email": "john@example.com"},
            {"id": 2, "name": "Jane Smith", "email": "jane@example.com"}
        ])
    );
}

#[tokio::test]
async fn create_post_returns_created_record() {
    let app = TestApp::seeded();
    let (status, body) = app
        .send(with_json(Method::POST, "/posts", json!({"title": "New"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 3, "title": "New"}));
    assert_eq!(app.post_ids().await, vec![1, 2, 3]);
}

#[tokio::test]
async fn repeated_creates_track_list_length() {
    let app = TestApp::seeded();
    for expected in 3..6 {
        let before = app.post_ids().await.len() as u64;
        let (status, body) = app
            .send(with_json(Method::POST, "/posts", json!({"title": expected})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], json!(before + 1));
        assert_eq!(body["id"], json!(expected));
    }
}

#[tokio::test]
async fn create_post_without_title_is_bad_request() {
    let app = TestApp::seeded();
    for body in [json!({"name": "x"}), json!({}), json!([1, 2]), json!("title")] {
        let (status, response) = app.send(with_json(Method::POST, "/posts", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"error": "Bad Request"}));
    }
    assert_eq!(app.post_ids().await, vec![1, 2]);
}

#[tokio::test]
async fn create_post_without_body_is_bad_request() {
    let app = TestApp::seeded();
    let (status, response) = app.send(empty(Method::POST, "/posts")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, json!({"error": "Bad Request"}));

    let malformed = Request::builder()
        .method(Method::POST)
        .uri("/posts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\":"))
        .unwrap();
    let (status, _) = app.send(malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.post_ids().await, vec![1, 2]);
}

#[tokio::test]
async fn create_post_accepts_null_title() {
    let app = TestApp::seeded();
    let (status, body) = app
        .send(with_json(Method::POST, "/posts", json!({"title": null})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 3, "title": null}));
}

#[tokio::test]
async fn update_user_changes_only_supplied_fields() {
    let app = TestApp::seeded();
    let (status, body) = app
        .send(with_json(Method::PUT, "/users/1", json!({"name": "Z"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "Z", "email": "john@example.com"}));

    let users = app.users.list().await.unwrap();
    assert_eq!(users[0].name, "Z");
    assert_eq!(users[1], domain::seed_users()[1]);
}

#[tokio::test]
async fn update_user_cannot_change_id() {
    let app = TestApp::seeded();
    let (status, body) = app
        .send(with_json(Method::PUT, "/users/2", json!({"id": 10, "email": "js@x.io"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 2, "name": "Jane Smith", "email": "js@x.io"}));
}

#[tokio::test]
async fn update_unknown_user_is_not_found() {
    let app = TestApp::seeded();
    let (status, body) = app
        .send(with_json(Method::PUT, "/users/99", json!({"name": "Z"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found"}));
    assert_eq!(app.users.list().await.unwrap(), domain::seed_users());
}

#[tokio::test]
async fn update_unknown_user_is_not_found_even_with_mistyped_fields() {
    let app = TestApp::seeded();
    for body in [json!({"name": 5}), json!([1])] {
        let (status, response) = app.send(with_json(Method::PUT, "/users/99", body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response, json!({"error": "User not found"}));
    }
    assert_eq!(app.users.list().await.unwrap(), domain::seed_users());
}

#[tokio::test]
async fn update_user_with_invalid_body_is_bad_request() {
    let app = TestApp::seeded();
    let (status, _) = app.send(empty(Method::PUT, "/users/1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .send(with_json(Method::PUT, "/users/1", json!({"name": 7})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.users.list().await.unwrap(), domain::seed_users());
}

#[tokio::test]
async fn non_integer_ids_do_not_match_routes() {
    let app = TestApp::seeded();
    let (status, body) = app
        .send(with_json(Method::PUT, "/users/abc", json!({"name": "Z"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not Found"}));

    let (status, _) = app.send(empty(Method::DELETE, "/posts/-1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.post_ids().await, vec![1, 2]);
}

#[tokio::test]
async fn signed_ids_do_not_match_routes() {
    let app = TestApp::seeded();
    let (status, body) = app
        .send(with_json(Method::PUT, "/users/+1", json!({"name": "Z"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not Found"}));
    assert_eq!(app.users.list().await.unwrap(), domain::seed_users());

    let (status, _) = app.send(empty(Method::DELETE, "/posts/+1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.post_ids().await, vec![1, 2]);
}

#[tokio::test]
async fn out_of_range_ids_do_not_match_routes() {
    let app = TestApp::seeded();
    let (status, body) = app
        .send(with_json(
            Method::PUT,
            "/users/99999999999999999999999",
            json!({"name": "Z"}),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let app = TestApp::seeded();
    let (status, body) = app.send(empty(Method::GET, "/comments")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not Found"}));
}

#[tokio::test]
async fn delete_post_twice_is_a_no_op_the_second_time() {
    let app = TestApp::seeded();
    let (status, body) = app.send(empty(Method::DELETE, "/posts/1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert_eq!(app.post_ids().await, vec![2]);

    let (status, _) = app.send(empty(Method::DELETE, "/posts/1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.post_ids().await, vec![2]);
}

#[tokio::test]
async fn create_then_delete_end_to_end() {
    let app = TestApp::seeded();
    let (status, body) = app
        .send(with_json(Method::POST, "/posts", json!({"title": "New"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 3, "title": "New"}));

    let (status, _) = app.send(empty(Method::DELETE, "/posts/1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.post_ids().await, vec![2, 3]);
}

#[tokio::test]
async fn each_app_gets_its_own_state() {
    let first = TestApp::seeded();
    first.send(empty(Method::DELETE, "/posts/1")).await;
    let second = TestApp::seeded();
    assert_eq!(second.post_ids().await, vec![1, 2]);
}
