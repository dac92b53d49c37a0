//! Pre-upgrade origin guard.
//!
//! Browsers always send `Origin` on WebSocket upgrades; when an allowlist is
//! configured, upgrades from anywhere else are refused with 403 before any
//! socket state is created. An empty allowlist admits every origin.

use axum::http::{header::ORIGIN, HeaderMap};

#[derive(Debug, Clone, Default)]
pub struct OriginGuard {
    allowed: Vec<String>,
}

impl OriginGuard {
    pub fn new(allowed: Vec<String>) -> Self {
        let allowed = allowed
            .into_iter()
            .map(|o| o.trim_end_matches('/').to_ascii_lowercase())
            .collect();
        Self { allowed }
    }

    pub fn enabled(&self) -> bool {
        !self.allowed.is_empty()
    }

    pub fn allows(&self, headers: &HeaderMap) -> bool {
        if !self.enabled() {
            return true;
        }
        let Some(origin) = headers.get(ORIGIN).and_then(|v| v.to_str().ok()) else {
            return false;
        };
        let origin = origin.trim_end_matches('/').to_ascii_lowercase();
        self.allowed.iter().any(|a| *a == origin)
    }
}
