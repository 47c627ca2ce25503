use std::env;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";

/// Runtime configuration. The backend location comes from the environment so
/// a dev backend and a deployed one are interchangeable without a rebuild.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let raw = env::var("FLOWROLL_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self {
            api_base: normalize_base(&raw),
        }
    }
}

/// Strips trailing slashes so endpoint paths can always be appended as
/// `{base}/api/...`.
fn normalize_base(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE.to_string()
    } else {
        trimmed.to_string()
    }
}
