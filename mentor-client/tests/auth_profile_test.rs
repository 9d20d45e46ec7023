mod common;

use axum::http::StatusCode;
use common::{user_profile_json, MockBackend};
use mentor_client::models::{ProfileUpdate, Role};
use mentor_client::MentorClient;
use serde_json::json;

async fn auth_backend() -> MockBackend {
    MockBackend::start(|hit| match (hit.method.as_str(), hit.path.as_str()) {
        ("POST", "/api/auth/login") => {
            if hit.json()["password"] == "secret" {
                (
                    StatusCode::OK,
                    json!({ "token": "jwt-abc", "user": user_profile_json("u1") }),
                )
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    json!({ "message": "Invalid credentials" }),
                )
            }
        }
        ("POST", "/api/auth/register") => (
            StatusCode::CREATED,
            json!({ "token": "jwt-new", "user": user_profile_json("u2") }),
        ),
        ("GET", "/api/users/profile") | ("GET", "/api/auth/me") => {
            if hit.authorization.is_some() {
                (StatusCode::OK, json!({ "user": user_profile_json("u1") }))
            } else {
                (StatusCode::UNAUTHORIZED, json!({ "message": "No token" }))
            }
        }
        ("PUT", "/api/users/profile") => {
            let mut user = user_profile_json("u1");
            if let Some(bio) = hit.json().get("bio") {
                user["bio"] = bio.clone();
            }
            (StatusCode::OK, json!({ "user": user }))
        }
        _ => (StatusCode::NOT_FOUND, json!({})),
    })
    .await
}

#[tokio::test]
async fn login_token_is_attached_afterwards() {
    let backend = auth_backend().await;
    let client = MentorClient::with_url(&backend.url);

    let unauthenticated = client.profile().get_profile().await.unwrap_err();
    assert!(unauthenticated.is_unauthorized());

    let auth = client.auth().login("grace@example.com", "secret").await.unwrap();
    assert_eq!(auth.user.role, Role::Mentor);
    assert_eq!(client.get_token().await.as_deref(), Some("jwt-abc"));

    let profile = client.profile().get_profile().await.unwrap();
    assert_eq!(profile.skills, ["rust", "llvm"]);

    let hits = backend.hits();
    assert_eq!(hits.last().unwrap().authorization.as_deref(), Some("Bearer jwt-abc"));
}

#[tokio::test]
async fn bad_credentials_keep_client_anonymous() {
    let backend = auth_backend().await;
    let client = MentorClient::with_url(&backend.url);

    let err = client.auth().login("grace@example.com", "nope").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(client.get_token().await.is_none());
}

#[tokio::test]
async fn register_then_logout() {
    let backend = auth_backend().await;
    let client = MentorClient::with_url(&backend.url);

    client
        .auth()
        .register("Grace", "grace@example.com", "secret", Role::Mentor)
        .await
        .unwrap();
    assert_eq!(client.get_token().await.as_deref(), Some("jwt-new"));
    assert_eq!(backend.hits()[0].json()["role"], "mentor");

    client.auth().logout().await;
    assert!(client.get_token().await.is_none());
}

#[tokio::test]
async fn profile_update_sends_only_set_fields() {
    let backend = auth_backend().await;
    let client = MentorClient::with_url(&backend.url);
    client.set_token("jwt-abc".into()).await;

    let update = ProfileUpdate {
        bio: Some("Type systems".into()),
        ..Default::default()
    };
    let user = client.profile().update_profile(&update).await.unwrap();
    assert_eq!(user.bio.as_deref(), Some("Type systems"));
    assert_eq!(backend.hits()[0].json(), json!({ "bio": "Type systems" }));

    let err = client
        .profile()
        .update_profile(&ProfileUpdate::default())
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(backend.hits().len(), 1);
}
