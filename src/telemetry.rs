use prometheus::register_int_counter_vec;
use prometheus::IntCounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

use crate::config::LoggingConfig;

lazy_static! {
    pub static ref QUIZ_QUESTIONS_SERVED: IntCounterVec = register_int_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions served by the quiz",
        &["category"]
    )
    .unwrap();
}

/// `LOG_LEVEL` and `INCLUDE_SPAN_EVENTS` from the environment take precedence over the
/// configured values.
pub fn init_tracing(config: &LoggingConfig) {
    let mut fmt_layer = fmt::layer();
    let span_events = std::env::var("INCLUDE_SPAN_EVENTS")
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(config.span_events);
    if span_events {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
