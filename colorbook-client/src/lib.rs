//! REST client for the coloring backend, plus the [`HttpProgressStore`]
//! adapter that plugs it into the engine's persistence seam.

pub mod api;
pub mod store;

pub use api::ApiClient;
pub use store::HttpProgressStore;

/// Environment variable consulted when no `--api-url` is given.
pub const API_URL_VAR: &str = "COLORBOOK_API_URL";

/// Typical local dev backend.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Resolution order: explicit flag, then environment, then default.
pub fn resolve_api_url(flag: Option<&str>) -> String {
    if let Some(url) = flag {
        return url.to_string();
    }
    std::env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}
