//! Dashboard Page
//!
//! - GET / - Static page hosting the selectors and both chart regions
//!
//! The page draws figures in the browser and talks to `/ws` for redraws.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../assets/index.html");

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
