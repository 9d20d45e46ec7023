#![allow(dead_code)]

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Hit {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

type Responder = Arc<dyn Fn(&Hit) -> (StatusCode, Value) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    hits: Arc<Mutex<Vec<Hit>>>,
    responder: Responder,
}

pub struct MockBackend {
    pub url: String,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl MockBackend {
    /// Starts a backend on an ephemeral port that records every request and
    /// answers with whatever `responder` returns for it.
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Hit) -> (StatusCode, Value) + Send + Sync + 'static,
    {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let hits = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            hits: hits.clone(),
            responder: Arc::new(responder),
        };
        let app = Router::new().fallback(record).with_state(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            hits,
        }
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.hits().into_iter().map(|h| h.path).collect()
    }
}

async fn record(State(state): State<MockState>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let hit = Hit {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: bytes.to_vec(),
    };

    let (status, body) = (state.responder)(&hit);
    state.hits.lock().unwrap().push(hit);
    (status, Json(body)).into_response()
}

pub fn user_json(id: &str, name: &str) -> Value {
    json!({ "_id": id, "name": name })
}

pub fn post_json(id: &str, likes: u64) -> Value {
    json!({
        "_id": id,
        "author": user_json("u1", "Ada"),
        "content": format!("post {}", id),
        "tags": ["rust"],
        "images": [],
        "interactions": { "likes": [], "comments": [], "shares": [] },
        "stats": { "likeCount": likes, "commentCount": 0, "shareCount": 0 },
        "createdAt": "2026-10-01T12:00:00Z"
    })
}

pub fn feed_page_json(ids: &[&str], page: u32, has_next: bool) -> Value {
    let posts: Vec<Value> = ids.iter().map(|id| post_json(id, 0)).collect();
    let total_pages = if has_next { page + 1 } else { page };
    json!({
        "posts": posts,
        "pagination": {
            "currentPage": page,
            "totalPages": total_pages,
            "hasNextPage": has_next
        }
    })
}

pub fn connection_json(id: &str, status: &str, is_paid: bool) -> Value {
    let price = if is_paid { 2599 } else { 0 };
    let payment_status = if is_paid { "created" } else { "succeeded" };
    json!({
        "_id": id,
        "type": "student_to_mentor",
        "status": status,
        "fromUser": user_json("student-1", "Ada"),
        "otherUser": user_json("mentor-1", "Grace"),
        "message": "Please mentor me",
        "metadata": { "goals": "Ship a crate", "availability": "evenings" },
        "isPaid": is_paid,
        "mentorshipPrice": price,
        "paymentStatus": payment_status
    })
}

pub fn user_profile_json(id: &str) -> Value {
    json!({
        "_id": id,
        "name": "Grace",
        "email": "grace@example.com",
        "role": "mentor",
        "bio": "Compilers",
        "skills": ["rust", "llvm"],
        "mentorshipPrice": 2599
    })
}
