use crate::views::sitemap::render_sitemap;
use crate::CONFIG;
use axum::http::header;
use axum::response::IntoResponse;

/// # Endpoint: GET /sitemap.xml
pub(crate) async fn sitemap() -> impl IntoResponse {
    let body = render_sitemap(&CONFIG.site_url, chrono::Utc::now().date_naive());
    ([(header::CONTENT_TYPE, "application/xml")], body)
}
