//! Identity collaborators: post identifiers and the posting user.

use uuid::Uuid;

/// Author recorded when the transport carries no user identity.
pub const DEFAULT_PLACEHOLDER_AUTHOR: &str = "1111";

/// Issues globally unique, opaque post identifiers.
///
/// The id doubles as the blob store key for the post's media.
pub trait IdIssuer: Send + Sync {
    fn issue(&self) -> String;
}

/// Random (v4) UUID issuer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIssuer;

impl IdIssuer for UuidIssuer {
    fn issue(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Resolves the author of the post being submitted.
pub trait CurrentUser: Send + Sync {
    fn author(&self) -> String;
}

/// Fixed author name, used until requests carry a real user identity.
#[derive(Debug, Clone)]
pub struct PlaceholderUser {
    name: String,
}

impl PlaceholderUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for PlaceholderUser {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_AUTHOR)
    }
}

impl CurrentUser for PlaceholderUser {
    fn author(&self) -> String {
        self.name.clone()
    }
}
