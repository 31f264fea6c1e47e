use crate::domain::errors::CallError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hyper::Request;
use hyper::header::{AUTHORIZATION, HeaderValue};
use std::fmt;

/// Credentials attached to an outgoing request
#[derive(Clone, PartialEq, Eq, Default)]
pub enum AuthStrategy {
    #[default]
    None,
    Basic {
        user: String,
        pass: String,
    },
    Bearer {
        token: String,
    },
}

impl AuthStrategy {
    /// Selects a strategy from a declared auth type (`none`, `basic`, `bearer`).
    ///
    /// Matching is case-insensitive and an empty type means `none`. Unknown
    /// types are rejected rather than falling back to no auth.
    pub fn select(kind: &str, user: &str, pass: &str, token: &str) -> Result<Self, CallError> {
        match kind.to_lowercase().as_str() {
            "" | "none" => Ok(AuthStrategy::None),
            "basic" => Ok(AuthStrategy::Basic {
                user: user.to_string(),
                pass: pass.to_string(),
            }),
            "bearer" => Ok(AuthStrategy::Bearer {
                token: token.to_string(),
            }),
            other => Err(CallError::InvalidAuthType(other.to_string())),
        }
    }

    /// Sets the `Authorization` header on `request`. Nothing else is touched.
    ///
    /// A bearer strategy with an empty token leaves the request unchanged.
    pub fn apply<B>(&self, request: &mut Request<B>) -> Result<(), CallError> {
        let value = match self {
            AuthStrategy::None => return Ok(()),
            AuthStrategy::Basic { user, pass } => {
                format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
            }
            AuthStrategy::Bearer { token } if token.is_empty() => return Ok(()),
            AuthStrategy::Bearer { token } => format!("Bearer {token}"),
        };

        let value = HeaderValue::from_str(&value).map_err(|e| CallError::InvalidHeader {
            name: AUTHORIZATION.to_string(),
            reason: e.to_string(),
        })?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AuthStrategy::None => "none",
            AuthStrategy::Basic { .. } => "basic",
            AuthStrategy::Bearer { .. } => "bearer",
        }
    }
}

// Credentials never end up in logs.
impl fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStrategy::None => write!(f, "None"),
            AuthStrategy::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .field("pass", &"***")
                .finish(),
            AuthStrategy::Bearer { token } => f
                .debug_struct("Bearer")
                .field("token", if token.is_empty() { &"" } else { &"***" })
                .finish(),
        }
    }
}
