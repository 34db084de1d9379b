use axum::http::StatusCode;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::CookieJar;

use super::ApiSuccess;
use super::SESSION_COOKIE;

/// Clear the session cookie.
///
/// Tokens are stateless, so a copy of the token kept elsewhere stays valid
/// until it expires.
pub async fn logout(jar: CookieJar) -> (CookieJar, ApiSuccess<()>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, ApiSuccess::new(StatusCode::OK, "Logged out", ()))
}
