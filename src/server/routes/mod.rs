mod categories;
mod questions;
mod quiz;

use axum::Json;
use serde::Serialize;

pub use categories::category_router;
pub use questions::questions_router;
pub use quiz::quiz_router;

/// Every successful body carries `"success": true` next to its own fields.
#[derive(Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

pub fn success<T: Serialize>(body: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        body,
    })
}
