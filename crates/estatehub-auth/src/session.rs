//! Session token transport
//!
//! A session token travels either in the `access_token` cookie or in an
//! `Authorization: Bearer` header. The cookie wins when both are present.

use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};

use crate::error::{AuthError, TokenError};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "access_token";

/// Where a session token was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Cookie,
    Bearer,
}

impl TokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSource::Cookie => "cookie",
            TokenSource::Bearer => "bearer",
        }
    }
}

/// Raw, unverified session token pulled from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub token: String,
    pub source: TokenSource,
}

/// Pull the session token out of request headers.
///
/// Returns `MissingCredential` when neither transport is present. An
/// `Authorization` header that is not a usable bearer credential counts as
/// a malformed token, not a missing one.
pub fn extract_session_token(headers: &HeaderMap) -> Result<SessionToken, AuthError> {
    if let Some(token) = cookie_value(headers, SESSION_COOKIE) {
        return Ok(SessionToken {
            token,
            source: TokenSource::Cookie,
        });
    }

    let Some(header) = headers.get(AUTHORIZATION) else {
        return Err(AuthError::MissingCredential);
    };
    let header = header.to_str().map_err(|_| TokenError::Malformed)?;
    let (scheme, token) = header.split_once(' ').ok_or(TokenError::Malformed)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(TokenError::Malformed.into());
    }

    Ok(SessionToken {
        token: token.to_string(),
        source: TokenSource::Bearer,
    })
}

/// Find a non-empty cookie value by name across all `Cookie` headers
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Attributes of the session cookie
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// Add the `Secure` attribute (HTTPS deployments)
    pub secure: bool,
    /// Cookie lifetime, matched to the token TTL
    pub max_age_secs: i64,
}

impl CookieSettings {
    /// `Set-Cookie` value carrying a freshly issued token
    pub fn session_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            SESSION_COOKIE, token, self.max_age_secs
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that makes the client drop the session cookie
    pub fn clear_cookie(&self) -> String {
        let mut cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE);
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(axum::http::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_cookie_is_preferred() {
        let map = headers(&[
            (COOKIE, "theme=dark; access_token=from-cookie"),
            (AUTHORIZATION, "Bearer from-header"),
        ]);

        let token = extract_session_token(&map).unwrap();
        assert_eq!(token.token, "from-cookie");
        assert_eq!(token.source, TokenSource::Cookie);
    }

    #[test]
    fn test_bearer_fallback() {
        let map = headers(&[(COOKIE, "theme=dark"), (AUTHORIZATION, "bearer abc.def.ghi")]);

        let token = extract_session_token(&map).unwrap();
        assert_eq!(token.token, "abc.def.ghi");
        assert_eq!(token.source, TokenSource::Bearer);
    }

    #[test]
    fn test_missing_credential() {
        let result = extract_session_token(&HeaderMap::new());
        assert!(matches!(result, Err(AuthError::MissingCredential)));

        let empty_cookie = headers(&[(COOKIE, "access_token=")]);
        assert!(matches!(
            extract_session_token(&empty_cookie),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn test_non_bearer_header_is_malformed() {
        for value in ["Basic dXNlcjpwYXNz", "Bearer ", "token-without-scheme"] {
            let map = headers(&[(AUTHORIZATION, value)]);
            assert!(
                matches!(
                    extract_session_token(&map),
                    Err(AuthError::Token(TokenError::Malformed))
                ),
                "{value}"
            );
        }
    }

    #[test]
    fn test_cookie_attributes() {
        let settings = CookieSettings {
            secure: true,
            max_age_secs: 3600,
        };

        let cookie = settings.session_cookie("tok");
        assert!(cookie.starts_with("access_token=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("Secure"));

        let cleared = settings.clear_cookie();
        assert!(cleared.starts_with("access_token=;"));
        assert!(cleared.contains("Max-Age=0"));
    }
}
