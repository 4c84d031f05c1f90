use axum::{routing::get, Router};

pub fn build_app() -> Router {
    debug_assert!(runtime::module_ready());
    debug_assert!(api::module_ready());

    api::app().route("/health", get(healthcheck))
}

async fn healthcheck() -> &'static str {
    "ok"
}
