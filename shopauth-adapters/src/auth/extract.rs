use axum::http::{header, HeaderMap};
use axum_extra::extract::CookieJar;

/// Pull the session token from an inbound request.
///
/// Exactly one extraction path is used per request: the bearer header
/// takes priority, and the cookie is only consulted when no bearer
/// credential is present. A mismatched header/cookie pair is therefore
/// resolved deterministically in favor of the header.
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        return value
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string());
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const COOKIE_NAME: &str = "accessToken";

    fn headers(authorization: Option<&str>, cookie: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = authorization {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        if let Some(token) = cookie {
            let value = format!("{COOKIE_NAME}={token}");
            headers.insert(header::COOKIE, HeaderValue::from_str(&value).unwrap());
        }
        headers
    }

    #[test]
    fn test_bearer_header_is_extracted() {
        let headers = headers(Some("Bearer abc123"), None);
        assert_eq!(
            extract_session_token(&headers, COOKIE_NAME),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_cookie_is_extracted_when_header_absent() {
        let headers = headers(None, Some("cookie-token"));
        assert_eq!(
            extract_session_token(&headers, COOKIE_NAME),
            Some("cookie-token".to_string())
        );
    }

    #[test]
    fn test_header_wins_over_cookie() {
        let headers = headers(Some("Bearer header-token"), Some("cookie-token"));
        assert_eq!(
            extract_session_token(&headers, COOKIE_NAME),
            Some("header-token".to_string())
        );
    }

    #[test]
    fn test_malformed_authorization_does_not_fall_back() {
        // A present-but-unusable header is a failed extraction, not a
        // reason to silently accept the cookie.
        let headers = headers(Some("Basic dXNlcg=="), Some("cookie-token"));
        assert_eq!(extract_session_token(&headers, COOKIE_NAME), None);
    }

    #[test]
    fn test_both_absent_yields_none() {
        assert_eq!(extract_session_token(&HeaderMap::new(), COOKIE_NAME), None);
    }
}
