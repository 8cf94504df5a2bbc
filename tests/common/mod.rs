#![allow(dead_code)]

use std::collections::BTreeMap;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;
use trivia_api::db::queries::questions::create_question;
use trivia_api::db::{self, run_migrations, NewQuestion};
use trivia_api::server::app::{app, AppState};

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    /// Question ids per category, in insertion order.
    pub ids: BTreeMap<i64, Vec<i64>>,
}

const FIXTURES: &[(&str, &str, i64, i64)] = &[
    ("What is the heaviest organ in the human body?", "The Liver", 1, 4),
    ("Who discovered penicillin?", "Alexander Fleming", 1, 3),
    ("Hematology is a branch of medicine involving the study of what?", "Blood", 1, 4),
    ("What is the chemical symbol for gold?", "Au", 1, 2),
    ("La Giaconda is better known as what?", "Mona Lisa", 2, 3),
    ("How many paintings did Van Gogh sell in his lifetime?", "One", 2, 4),
    ("What is the largest lake in Africa?", "Lake Victoria", 3, 2),
    ("How many regions are there in Uzbekistan?", "12", 3, 3),
    ("Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", "Maya Angelou", 4, 2),
    ("What movie earned Tom Hanks his third straight Oscar nomination, in 1996?", "Apollo 13", 5, 4),
    ("What actor did author Anne Rice first denounce?", "Tom Cruise", 5, 4),
    ("Which dung beetle was worshipped by the ancient Egyptians?", "Scarab", 5, 4),
];

pub async fn spawn_app() -> TestApp {
    let pool = db::in_memory().await.unwrap();
    run_migrations(&pool).await.unwrap();

    let mut ids: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for &(question, answer, category, difficulty) in FIXTURES {
        let id = create_question(
            &pool,
            NewQuestion {
                question,
                answer,
                category,
                difficulty,
            },
        )
        .await
        .unwrap();
        ids.entry(category).or_default().push(id);
    }

    TestApp {
        app: app(AppState::new(pool.clone())),
        pool,
        ids,
    }
}

pub fn fixture_count() -> usize {
    FIXTURES.len()
}

impl TestApp {
    pub async fn request(&self, request: Request<Body>) -> axum::response::Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.request(request).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }
}

pub fn assert_error(status: StatusCode, body: &Value, expected: StatusCode, message: &str) {
    assert_eq!(status, expected);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], expected.as_u16());
    assert_eq!(body["message"], message);
}
