use serde::Deserialize;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// `?page=N`, 1-indexed. Anything that is not an integer falls back to the first page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

/// The pagination window of `items` for a 1-indexed `page`. Pages below 1 or past the
/// end are empty.
pub fn window<T>(items: Vec<T>, page: i64) -> Vec<T> {
    let Some(index) = page.checked_sub(1).and_then(|p| usize::try_from(p).ok()) else {
        return Vec::new();
    };
    items
        .into_iter()
        .skip(index.saturating_mul(QUESTIONS_PER_PAGE))
        .take(QUESTIONS_PER_PAGE)
        .collect()
}
