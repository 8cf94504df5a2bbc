use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_category_map,
            questions::{self, get_all_questions, get_question, search_questions},
        },
        CategoryMap, NewQuestion, Question,
    },
    pagination::{window, PageQuery},
    server::{
        app::AppState,
        deserializers::deserialize_non_blank,
        error::{ApiError, ApiResult, ReportAs},
        extract::{ApiJson, ApiPath, ApiQuery},
    },
};

use super::{success, Success};

#[derive(Deserialize)]
struct NewQuestionBody {
    #[serde(default, deserialize_with = "deserialize_non_blank")]
    question: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_blank")]
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
}

impl NewQuestionBody {
    fn validate(&self) -> ApiResult<NewQuestion<'_>> {
        let question = required("question", self.question.as_deref())?;
        let answer = required("answer", self.answer.as_deref())?;
        let difficulty = required("difficulty", self.difficulty)?;
        let category = required("category", self.category)?;
        Ok(NewQuestion {
            question,
            answer,
            category,
            difficulty,
        })
    }
}

fn required<T>(field: &str, value: Option<T>) -> ApiResult<T> {
    value.ok_or_else(|| ApiError::Validation(format!("`{field}` is required")))
}

// an unreadable query string (e.g. a repeated `page`) means the first page
fn requested_page(query: Result<ApiQuery<PageQuery>, ApiError>) -> i64 {
    match query {
        Ok(ApiQuery(query)) => query.page(),
        Err(error) => {
            tracing::debug!(%error, "Ignoring query string");
            1
        }
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm", default)]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    questions: Vec<Question>,
    total_questions: usize,
    categories: CategoryMap,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct QuestionList {
    questions: Vec<Question>,
}

#[derive(Serialize)]
struct SearchResults {
    questions: Vec<Question>,
    total_questions: usize,
    // holds the category mapping, clients read it under this name
    current_category: CategoryMap,
}

#[derive(Serialize)]
struct Deleted {
    deleted: i64,
}

#[derive(Serialize)]
struct Created {
    message: &'static str,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    query: Result<ApiQuery<PageQuery>, ApiError>,
) -> ApiResult<Json<Success<QuestionsPage>>> {
    questions_page(&pool, requested_page(query))
        .await
        .report_as(StatusCode::NOT_FOUND)
        .map(success)
}

async fn questions_page(pool: &SqlitePool, page: i64) -> ApiResult<QuestionsPage> {
    let questions = get_all_questions(pool).await?;
    let total_questions = questions.len();
    let questions = window(questions, page);
    if questions.is_empty() {
        return Err(ApiError::NotFound("questions page"));
    }
    Ok(QuestionsPage {
        questions,
        total_questions,
        categories: get_category_map(pool).await?,
        current_category: None,
    })
}

async fn question_by_id(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Success<QuestionList>>> {
    let question = get_question(&pool, id).await?;
    Ok(success(QuestionList {
        questions: question.into_iter().collect(),
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Success<Deleted>>> {
    let removed = questions::delete_question(&pool, id)
        .await
        .report_as(StatusCode::UNPROCESSABLE_ENTITY)?;
    if !removed {
        let error = ApiError::NotFound("question");
        return Err(error.reported_as(StatusCode::UNPROCESSABLE_ENTITY));
    }
    tracing::info!(id, "Deleted question");
    Ok(success(Deleted { deleted: id }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    ApiJson(body): ApiJson<NewQuestionBody>,
) -> ApiResult<(StatusCode, Json<Success<Created>>)> {
    let new_question = body
        .validate()
        .report_as(StatusCode::UNPROCESSABLE_ENTITY)?;
    let id = questions::create_question(&pool, new_question)
        .await
        .report_as(StatusCode::UNPROCESSABLE_ENTITY)?;
    tracing::info!(id, "Created question");
    Ok((
        StatusCode::CREATED,
        success(Created {
            message: "Successfully Created",
        }),
    ))
}

async fn search(
    State(pool): State<SqlitePool>,
    query: Result<ApiQuery<PageQuery>, ApiError>,
    ApiJson(body): ApiJson<SearchBody>,
) -> ApiResult<Json<Success<SearchResults>>> {
    search_page(&pool, body.search_term.as_deref(), requested_page(query))
        .await
        .report_as(StatusCode::NOT_FOUND)
        .map(success)
}

async fn search_page(
    pool: &SqlitePool,
    term: Option<&str>,
    page: i64,
) -> ApiResult<SearchResults> {
    let term = term
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation("`searchTerm` must not be empty".to_owned()))?;
    let matches = search_questions(pool, term).await?;
    if matches.is_empty() {
        return Err(ApiError::NotFound("matching question"));
    }
    let total_questions = matches.len();
    Ok(SearchResults {
        questions: window(matches, page),
        total_questions,
        current_category: get_category_map(pool).await?,
    })
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search))
        .route("/questions/{id}", get(question_by_id).delete(delete_question))
        .with_state(state)
}
