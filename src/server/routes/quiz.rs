use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::Question,
    quiz::{pick, QuizPool},
    server::{
        app::AppState,
        deserializers::deserialize_nullable,
        error::{ApiError, ApiResult, ReportAs},
        extract::ApiJson,
    },
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::{success, Success};

#[derive(Deserialize)]
struct QuizBody {
    #[serde(deserialize_with = "deserialize_nullable")]
    previous_questions: Option<Vec<i64>>,
    quiz_category: QuizCategory,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
    #[serde(rename = "type", deserialize_with = "deserialize_nullable")]
    kind: Option<Value>,
}

impl QuizCategory {
    /// Clients send the display name, the "all categories" button sends `"click"`.
    /// Any truthy JSON value counts as a type.
    fn has_type(&self) -> bool {
        match &self.kind {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(fields)) => !fields.is_empty(),
        }
    }
}

#[derive(Serialize)]
struct NextQuestion {
    question: Question,
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    ApiJson(body): ApiJson<QuizBody>,
) -> ApiResult<Json<Success<NextQuestion>>> {
    next_question(&pool, body)
        .await
        .report_as(StatusCode::UNPROCESSABLE_ENTITY)
        .map(success)
}

async fn next_question(pool: &SqlitePool, body: QuizBody) -> ApiResult<NextQuestion> {
    let quiz = QuizPool::select(
        body.quiz_category.id,
        body.quiz_category.has_type(),
        body.previous_questions.as_deref(),
    );
    let candidates = quiz.candidates(pool).await?;
    let question = pick(&candidates, &mut rand::thread_rng()).ok_or(ApiError::QuizExhausted)?;

    let category = question.category.to_string();
    QUIZ_QUESTIONS_SERVED
        .with_label_values(&[category.as_str()])
        .inc();
    tracing::debug!(id = question.id, pool = candidates.len(), "Picked quiz question");
    Ok(NextQuestion { question })
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/quiz", post(play_quiz))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_id_may_be_a_string() {
        let body: QuizBody = serde_json::from_value(json!({
            "previous_questions": [],
            "quiz_category": {"type": "Entertainment", "id": "5"}
        }))
        .unwrap();
        assert_eq!(body.quiz_category.id, 5);
        assert_eq!(body.quiz_category.kind, Some(json!("Entertainment")));
        assert_eq!(body.previous_questions, Some(vec![]));
    }

    #[test]
    fn category_type_key_is_required() {
        let res = serde_json::from_value::<QuizBody>(json!({
            "previous_questions": [],
            "quiz_category": {"id": 5}
        }));
        assert!(res.is_err());

        let null: QuizBody = serde_json::from_value(json!({
            "previous_questions": [],
            "quiz_category": {"id": 5, "type": null}
        }))
        .unwrap();
        assert!(!null.quiz_category.has_type());
    }

    #[test]
    fn category_type_is_truthy_or_not() {
        let category = |kind: Value| QuizCategory {
            id: 0,
            kind: Some(kind),
        };
        for kind in [json!("click"), json!(true), json!(1), json!(0.5), json!([0]), json!({"a": 1})] {
            assert!(category(kind.clone()).has_type(), "{kind} should count as a type");
        }
        for kind in [json!(""), json!(false), json!(0), json!(0.0), json!([]), json!({}), Value::Null] {
            assert!(!category(kind.clone()).has_type(), "{kind} should not count as a type");
        }
    }

    #[test]
    fn previous_questions_key_is_required() {
        let res = serde_json::from_value::<QuizBody>(json!({
            "quiz_category": {"type": "click", "id": 0}
        }));
        assert!(res.is_err());
    }
}
