use axum::http::{HeaderMap, header::AUTHORIZATION};

use super::error::AuthError;

/// 从 `Authorization: Bearer <token>` 中取出 token
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?;
    let value = value.to_str().map_err(|_| AuthError::MalformedCredential)?;
    if value.trim().is_empty() {
        return Err(AuthError::MissingCredential);
    }

    let (scheme, credentials) = value
        .split_once(' ')
        .ok_or(AuthError::MalformedCredential)?;
    let credentials = credentials.trim();
    if scheme.is_empty() || credentials.is_empty() || credentials.contains(char::is_whitespace) {
        return Err(AuthError::MalformedCredential);
    }
    if scheme != "Bearer" {
        return Err(AuthError::UnsupportedScheme);
    }
    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_token() {
        assert_eq!(extract_bearer(&headers("Bearer abc")), Ok("abc"));
    }

    #[test]
    fn missing_header() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(AuthError::MissingCredential));
        assert_eq!(extract_bearer(&headers("")), Err(AuthError::MissingCredential));
    }

    #[test]
    fn malformed_header() {
        assert_eq!(extract_bearer(&headers("Bearer")), Err(AuthError::MalformedCredential));
        assert_eq!(extract_bearer(&headers("Bearer ")), Err(AuthError::MalformedCredential));
        assert_eq!(extract_bearer(&headers("Bearer a b")), Err(AuthError::MalformedCredential));
    }

    #[test]
    fn wrong_scheme() {
        assert_eq!(extract_bearer(&headers("Basic abc")), Err(AuthError::UnsupportedScheme));
        assert_eq!(extract_bearer(&headers("bearer abc")), Err(AuthError::UnsupportedScheme));
    }
}
