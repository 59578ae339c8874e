use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::Scope;

/// Claims carried inside an access token.
///
/// Timestamps are whole UNIX seconds (JWT NumericDate). Values are immutable once
/// encoded; the codec only ever builds fresh claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the principal identifier.
    pub sub: String,

    /// Scopes granted to this token. Missing on the wire means none.
    #[serde(default)]
    pub scopes: Vec<Scope>,

    /// Expiration timestamp.
    pub exp: i64,

    /// Issued-at timestamp (informational).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    pub fn new(
        subject: impl Into<String>,
        scopes: Vec<Scope>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: subject.into(),
            scopes,
            exp: iat + ttl.num_seconds(),
            iat: Some(iat),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// A token is expired from its `exp` second onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn has_scope(&self, scope: &Scope) -> bool {
        self.scopes.contains(scope)
    }

    /// First required scope this token lacks, if any.
    pub fn missing_scope<'a>(&self, required: &'a [Scope]) -> Option<&'a Scope> {
        required.iter().find(|s| !self.has_scope(s))
    }
}
