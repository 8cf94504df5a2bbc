use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_category_map, questions::get_questions_for_category},
        CategoryMap, Question,
    },
    server::{
        app::AppState,
        error::{ApiResult, ReportAs},
        extract::ApiPath,
    },
};

use super::{success, Success};

#[derive(Serialize)]
struct Categories {
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CategoryQuestions {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: i64,
}

// `?page` is accepted and ignored, all categories fit in one response
async fn get_categories(State(pool): State<SqlitePool>) -> ApiResult<Json<Success<Categories>>> {
    let categories = get_category_map(&pool)
        .await
        .report_as(StatusCode::NOT_FOUND)?;
    Ok(success(Categories { categories }))
}

async fn questions_in_category(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Success<CategoryQuestions>>> {
    let questions = get_questions_for_category(&pool, id)
        .await
        .report_as(StatusCode::NOT_FOUND)?;
    let total_questions = questions.len();
    Ok(success(CategoryQuestions {
        questions,
        total_questions,
        current_category: id,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_in_category))
        .with_state(state)
}
