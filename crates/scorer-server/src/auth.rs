//! HTTP Basic-auth gate.
//!
//! When no credentials are configured every request is let through.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::{AppState, error::Error};

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Zero-size marker: present in the handler means the request may proceed.
pub struct Authenticated;

/// Check the `Authorization` header against `config`.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  if username != config.username {
    return Err(Error::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(())
}

impl<R, C> FromRequestParts<AppState<R, C>> for Authenticated
where
  R: Send + Sync,
  C: Send + Sync,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<R, C>,
  ) -> Result<Self, Self::Rejection> {
    if let Some(auth) = &state.auth
      && let Err(e) = verify_auth(&parts.headers, auth)
    {
      tracing::info!(uri = %parts.uri, "rejected credentials");
      return Err(e);
    }
    Ok(Authenticated)
  }
}

#[cfg(test)]
mod tests {
  use axum::http::{Request, header};

  use super::*;
  use crate::testing::{TestCompstate, hash_password};

  async fn extract(
    req: Request<axum::body::Body>,
    state: &AppState<crate::testing::FakeRepo, scorer_compstate::YamlCompetition>,
  ) -> Result<Authenticated, Error> {
    let (mut parts, _) = req.into_parts();
    Authenticated::from_request_parts(&mut parts, state).await
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  fn config(password: &str) -> AuthConfig {
    AuthConfig {
      username:      "user".to_string(),
      password_hash: hash_password(password),
    }
  }

  #[test]
  fn verify_accepts_matching_credentials() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, basic("user", "secret").parse().unwrap());
    assert!(verify_auth(&headers, &config("secret")).is_ok());
  }

  #[test]
  fn verify_rejects_wrong_username() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, basic("admin", "secret").parse().unwrap());
    assert!(matches!(verify_auth(&headers, &config("secret")), Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn correct_credentials() {
    let cs = TestCompstate::new();
    let state = cs.state_with_auth("secret");
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("user", "secret"))
      .body(axum::body::Body::empty()).unwrap();
    assert!(extract(req, &state).await.is_ok());
  }

  #[tokio::test]
  async fn wrong_password() {
    let cs = TestCompstate::new();
    let state = cs.state_with_auth("secret");
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("user", "wrong"))
      .body(axum::body::Body::empty()).unwrap();
    assert!(matches!(extract(req, &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn missing_header() {
    let cs = TestCompstate::new();
    let state = cs.state_with_auth("secret");
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(matches!(extract(req, &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn invalid_base64() {
    let cs = TestCompstate::new();
    let state = cs.state_with_auth("secret");
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Basic !!!not-base64!!!")
      .body(axum::body::Body::empty()).unwrap();
    assert!(matches!(extract(req, &state).await, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn open_when_no_credentials_configured() {
    let cs = TestCompstate::new();
    let state = cs.state();
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(extract(req, &state).await.is_ok());
  }
}
