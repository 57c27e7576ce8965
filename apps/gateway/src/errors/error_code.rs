//! Stable error codes attached to every error the gateway produces.
//!
//! Codes are SCREAMING_SNAKE_CASE and appear in structured logs; the client
//! only ever sees the generic `{ "message": ... }` body.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// No usable Bearer credential on a protected route
    UnauthorizedMissingBearer,
    /// Signature mismatch or undecodable token
    UnauthorizedInvalidJwt,
    /// Token is past its expiry
    UnauthorizedExpiredJwt,

    // Routing
    /// No route prefix matched the request path
    RouteNotFound,
    /// Request body exceeded the configured limit
    PayloadTooLarge,

    // Upstream
    /// Backend could not be reached or timed out
    BadGateway,

    // System
    Internal,
    ConfigError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 8] = [
        Self::UnauthorizedMissingBearer,
        Self::UnauthorizedInvalidJwt,
        Self::UnauthorizedExpiredJwt,
        Self::RouteNotFound,
        Self::PayloadTooLarge,
        Self::BadGateway,
        Self::Internal,
        Self::ConfigError,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::RouteNotFound => "ROUTE_NOT_FOUND",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::BadGateway => "BAD_GATEWAY",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
