//! Claims carried by access tokens issued by the authentication service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Claims embedded in every access token.
///
/// The authentication service signs `{ userId, iat, exp }`; only `userId` and
/// `exp` are required for a token to be accepted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Account identifier of the token holder
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Issued-at (seconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Verified subject identifier, attached to a request after its token passed
/// verification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Claims> for SubjectId {
    fn from(claims: Claims) -> Self {
        Self(claims.user_id)
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
