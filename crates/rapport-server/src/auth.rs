//! HTTP Basic authentication against argon2 hashes stored with each person.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::http::{HeaderMap, header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use rapport_core::{FeedbackService, person::Person, store::FeedbackStore};

use crate::error::Error;

/// Produce an argon2 PHC string for `password`.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Split a `Basic` authorization header into username and password.
fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), Error> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;
  Ok((username.to_owned(), password.to_owned()))
}

/// Resolve the person behind the request's Basic credentials.
///
/// Unknown usernames, people without a password hash, and wrong passwords
/// are all reported as [`Error::Unauthorized`].
pub async fn verify_auth<S>(
  headers: &HeaderMap,
  service: &FeedbackService<S>,
) -> Result<Person, Error>
where
  S: FeedbackStore,
{
  let (username, password) = basic_credentials(headers)?;

  let Some(creds) = service.credentials(&username).await? else {
    tracing::warn!(%username, "login for unknown user");
    return Err(Error::Unauthorized);
  };
  let Some(stored) = creds.password_hash else {
    tracing::warn!(%username, "login for user without a password");
    return Err(Error::Unauthorized);
  };

  let parsed_hash = PasswordHash::new(&stored).map_err(|_| Error::Unauthorized)?;
  if Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .is_err()
  {
    tracing::warn!(%username, "wrong password");
    return Err(Error::Unauthorized);
  }

  Ok(creds.person)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::http::HeaderValue;
  use rapport_core::person::{NewPerson, Role};
  use rapport_store_sqlite::SqliteStore;

  use super::*;

  async fn service_with(username: &str, password: Option<&str>) -> FeedbackService<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let service = FeedbackService::new(Arc::new(store));
    service
      .register_person(NewPerson {
        username:      username.to_string(),
        full_name:     "Jane Smith".to_string(),
        role:          Role::Manager,
        password_hash: password.map(|p| hash_password(p).unwrap()),
      })
      .await
      .unwrap();
    service
  }

  fn basic(user: &str, pass: &str) -> HeaderMap {
    let encoded = B64.encode(format!("{user}:{pass}"));
    let mut headers = HeaderMap::new();
    headers.insert(
      header::AUTHORIZATION,
      HeaderValue::from_str(&format!("Basic {encoded}")).unwrap(),
    );
    headers
  }

  #[tokio::test]
  async fn correct_credentials() {
    let service = service_with("manager_jane", Some("secret")).await;
    let person = verify_auth(&basic("manager_jane", "secret"), &service).await.unwrap();
    assert_eq!(person.username, "manager_jane");
    assert_eq!(person.role, Role::Manager);
  }

  #[tokio::test]
  async fn wrong_password() {
    let service = service_with("manager_jane", Some("secret")).await;
    let result = verify_auth(&basic("manager_jane", "wrong"), &service).await;
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn unknown_user() {
    let service = service_with("manager_jane", Some("secret")).await;
    let result = verify_auth(&basic("manager_doe", "secret"), &service).await;
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn person_without_password_cannot_log_in() {
    let service = service_with("manager_jane", None).await;
    let result = verify_auth(&basic("manager_jane", ""), &service).await;
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn missing_header() {
    let service = service_with("manager_jane", Some("secret")).await;
    let result = verify_auth(&HeaderMap::new(), &service).await;
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn invalid_base64() {
    let service = service_with("manager_jane", Some("secret")).await;
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic !!!not-base64!!!"));
    let result = verify_auth(&headers, &service).await;
    assert!(matches!(result, Err(Error::Unauthorized)));
  }
}
