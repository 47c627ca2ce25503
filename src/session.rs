use chrono::Local;
use uuid::Uuid;

/// Opaque correlation token attached to every chat request so the backend
/// can group turns into one conversation. Generated once per app run and
/// never persisted; a collision between two running instances merely merges
/// their conversations server-side.
#[derive(Debug, Clone)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    /// Client-local notices (request failures), never backend content.
    System,
}

/// One transcript entry. Immutable once created; the transcript only ever
/// appends.
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    /// Wall-clock capture for display only.
    pub timestamp: String,
}

impl Turn {
    pub fn now(role: Role, text: String) -> Self {
        Self {
            role,
            text,
            timestamp: Local::now().format("%H:%M").to_string(),
        }
    }
}
