//! Bearer credential extraction from the `Authorization` header.

use actix_web::http::header::HeaderValue;

use crate::auth::jwt::AuthError;

/// Pull the raw token out of an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively (RFC 7235). Absent, non-UTF-8,
/// non-Bearer or empty values all yield `AuthError::MissingToken`; no
/// verification is attempted here.
pub fn extract_bearer(header_value: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let auth_str = header_value
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MissingToken)?;

    let mut parts = auth_str.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("Bearer") => Ok(token),
        _ => Err(AuthError::MissingToken),
    }
}
