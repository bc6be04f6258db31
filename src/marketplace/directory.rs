use serde::{Deserialize, Serialize};

/// Identifier wrapper for marketplace users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Directory entry for a search owner: where alerts go and whether the
/// premium gate is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecipient {
    pub email: String,
    pub premium: bool,
}

/// Lookup seam over the external user store. Accounts are owned elsewhere;
/// this core only ever reads them.
pub trait UserDirectory: Send + Sync {
    fn recipient(&self, user: &UserId) -> Result<Option<AlertRecipient>, DirectoryError>;
}

/// Error enumeration for directory lookups.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}
