//! Hosted backend
//!
//! Talks to a Supabase project over its REST surface:
//! - `/rest/v1/{table}`: row reads and writes filtered with `eq.` operators
//! - `/auth/v1/*`: password sign-in, sign-up and sign-out
//! - `/functions/v1/recommend-books`: the recommendation function
//!
//! Row-level security on the project scopes every table to the caller's
//! token; the `user_id` filters sent here mirror that scoping.

use super::{
    AuthProvider, BookStore, RawRecommendation, RecommendationFunction, Session, SignUpOutcome,
};
use crate::config::RECOMMEND_FUNCTION;
use crate::database::{
    Book, BookStatus, JournalEntry, JournalEntryUpdate, NewBook, NewJournalEntry,
};
use crate::error::{AppError, Result};
use crate::http::ensure_success;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const BOOKS: &str = "books";
const JOURNAL_ENTRIES: &str = "journal_entries";

/// Client for a Supabase project
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

#[derive(Serialize)]
struct OwnedRow<'a, T: Serialize> {
    user_id: &'a str,
    #[serde(flatten)]
    row: &'a T,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct FunctionResponse {
    #[serde(default)]
    recommendations: Vec<RawRecommendation>,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &str) -> Session {
        let display_name = self
            .user
            .user_metadata
            .as_ref()
            .and_then(|m| m.get("display_name"))
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Session {
            user_id: self.user.id,
            email: self.user.email.unwrap_or_else(|| fallback_email.to_string()),
            display_name,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }
}

/// Interpret a sign-up response body.
///
/// Projects with email confirmation enabled answer with the bare user
/// instead of a token pair.
fn parse_sign_up(body: Value, email: &str) -> Result<SignUpOutcome> {
    if body.get("access_token").is_some() {
        let token: TokenResponse = serde_json::from_value(body)?;
        return Ok(SignUpOutcome::SignedIn(token.into_session(email)));
    }

    Ok(SignUpOutcome::ConfirmationRequired {
        email: body
            .get("email")
            .and_then(|v| v.as_str())
            .unwrap_or(email)
            .to_string(),
    })
}

/// Total row count from a `Content-Range` header (`0-9/42` or `*/0`)
fn parse_content_range(header: &str) -> Option<i64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

/// Invoke a recommendation function endpoint with `{ prompt }`
async fn invoke_function(
    http: &reqwest::Client,
    url: &str,
    api_key: Option<&str>,
    bearer: Option<&str>,
    prompt: &str,
) -> Result<Vec<RawRecommendation>> {
    tracing::info!("Invoking recommendation function at {}", url);

    let mut request = http.post(url).json(&json!({ "prompt": prompt }));
    if let Some(key) = api_key {
        request = request.header("apikey", key);
    }
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = ensure_success(request.send().await?).await?;
    let body: FunctionResponse = response.json().await?;

    tracing::info!("Recommendation function returned {} books", body.recommendations.len());
    Ok(body.recommendations)
}

impl SupabaseClient {
    pub fn new(http: reqwest::Client, base_url: &str, anon_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn function_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{}", self.base_url, name)
    }

    /// Request with the project key and the caller's token
    fn request(
        &self,
        method: reqwest::Method,
        url: &str,
        session: Option<&Session>,
    ) -> reqwest::RequestBuilder {
        let token = session
            .map(|s| s.access_token.as_str())
            .unwrap_or(self.anon_key.as_str());

        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    async fn select<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        session: &Session,
    ) -> Result<Vec<T>> {
        let response = self
            .request(reqwest::Method::GET, &self.rest_url(table), Some(session))
            .query(&[
                ("select", "*".to_string()),
                ("user_id", eq(&session.user_id)),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }

    async fn insert<T: Serialize + Sync, R: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        session: &Session,
        row: &T,
    ) -> Result<R> {
        let body = OwnedRow {
            user_id: &session.user_id,
            row,
        };

        let response = self
            .request(reqwest::Method::POST, &self.rest_url(table), Some(session))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;

        let mut rows: Vec<R> = ensure_success(response).await?.json().await?;
        if rows.is_empty() {
            return Err(AppError::Generic(format!("Insert into {} returned no row", table)));
        }
        Ok(rows.swap_remove(0))
    }

    /// PATCH or DELETE one row by id; returns the affected rows
    async fn mutate<R: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        table: &str,
        session: &Session,
        id: &str,
        body: Option<Value>,
    ) -> Result<Vec<R>> {
        let mut request = self
            .request(method, &self.rest_url(table), Some(session))
            .header("Prefer", "return=representation")
            .query(&[("id", eq(id)), ("user_id", eq(&session.user_id))]);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

#[async_trait]
impl BookStore for SupabaseClient {
    async fn list_books(&self, session: &Session) -> Result<Vec<Book>> {
        self.select(BOOKS, session).await
    }

    async fn insert_book(&self, session: &Session, book: &NewBook) -> Result<Book> {
        let created: Book = self.insert(BOOKS, session, book).await?;
        tracing::debug!("Inserted remote book: {}", created.id);
        Ok(created)
    }

    async fn delete_book(&self, session: &Session, id: &str) -> Result<()> {
        let deleted: Vec<Book> = self
            .mutate(reqwest::Method::DELETE, BOOKS, session, id, None)
            .await?;
        if deleted.is_empty() {
            return Err(AppError::BookNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn update_book_status(
        &self,
        session: &Session,
        id: &str,
        status: BookStatus,
    ) -> Result<Book> {
        let body = json!({ "status": status, "updated_at": Utc::now() });
        let mut updated: Vec<Book> = self
            .mutate(reqwest::Method::PATCH, BOOKS, session, id, Some(body))
            .await?;
        updated.pop().ok_or_else(|| AppError::BookNotFound(id.to_string()))
    }

    async fn list_journal_entries(&self, session: &Session) -> Result<Vec<JournalEntry>> {
        self.select(JOURNAL_ENTRIES, session).await
    }

    async fn count_journal_entries(&self, session: &Session) -> Result<i64> {
        let response = self
            .request(reqwest::Method::HEAD, &self.rest_url(JOURNAL_ENTRIES), Some(session))
            .header("Prefer", "count=exact")
            .query(&[("select", "id".to_string()), ("user_id", eq(&session.user_id))])
            .send()
            .await?;
        let response = ensure_success(response).await?;

        response
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| AppError::Generic("Journal count missing from response".to_string()))
    }

    async fn insert_journal_entry(
        &self,
        session: &Session,
        entry: &NewJournalEntry,
    ) -> Result<JournalEntry> {
        self.insert(JOURNAL_ENTRIES, session, entry).await
    }

    async fn update_journal_entry(
        &self,
        session: &Session,
        id: &str,
        update: &JournalEntryUpdate,
    ) -> Result<JournalEntry> {
        let body = serde_json::to_value(update)?;
        let mut updated: Vec<JournalEntry> = self
            .mutate(reqwest::Method::PATCH, JOURNAL_ENTRIES, session, id, Some(body))
            .await?;
        updated
            .pop()
            .ok_or_else(|| AppError::EntryNotFound(id.to_string()))
    }

    async fn delete_journal_entry(&self, session: &Session, id: &str) -> Result<()> {
        let deleted: Vec<JournalEntry> = self
            .mutate(reqwest::Method::DELETE, JOURNAL_ENTRIES, session, id, None)
            .await?;
        if deleted.is_empty() {
            return Err(AppError::EntryNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .request(reqwest::Method::POST, &self.auth_url("token"), None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let token: TokenResponse = ensure_success(response)
            .await
            .map_err(into_auth_error)?
            .json()
            .await?;

        let session = token.into_session(email);
        tracing::info!("Signed in remote user: {}", session.user_id);
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<SignUpOutcome> {
        let response = self
            .request(reqwest::Method::POST, &self.auth_url("signup"), None)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "display_name": display_name.unwrap_or_default() },
            }))
            .send()
            .await?;

        let body: Value = ensure_success(response)
            .await
            .map_err(into_auth_error)?
            .json()
            .await?;

        parse_sign_up(body, email)
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, &self.auth_url("logout"), Some(session))
            .send()
            .await?;
        ensure_success(response).await?;

        tracing::info!("Signed out remote user: {}", session.user_id);
        Ok(())
    }

    async fn refresh(&self, session: &Session) -> Result<Session> {
        let Some(refresh_token) = session.refresh_token.as_deref() else {
            return Err(AppError::Auth("Session expired".to_string()));
        };

        let response = self
            .request(reqwest::Method::POST, &self.auth_url("token"), None)
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        let token: TokenResponse = ensure_success(response)
            .await
            .map_err(into_auth_error)?
            .json()
            .await?;

        let refreshed = token.into_session(&session.email);
        tracing::info!("Refreshed session for remote user: {}", refreshed.user_id);
        Ok(refreshed)
    }
}

fn into_auth_error(err: AppError) -> AppError {
    match err {
        AppError::Remote { message, .. } => AppError::Auth(message),
        other => other,
    }
}

#[async_trait]
impl RecommendationFunction for SupabaseClient {
    async fn invoke(
        &self,
        session: Option<&Session>,
        prompt: &str,
    ) -> Result<Vec<RawRecommendation>> {
        let bearer = session
            .map(|s| s.access_token.as_str())
            .unwrap_or(self.anon_key.as_str());

        invoke_function(
            &self.http,
            &self.function_url(RECOMMEND_FUNCTION),
            Some(&self.anon_key),
            Some(bearer),
            prompt,
        )
        .await
    }
}

/// The recommendation function contract against any URL, for use with
/// the local backend
#[derive(Clone)]
pub struct HttpRecommendationFunction {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpRecommendationFunction {
    pub fn new(http: reqwest::Client, url: &str, api_key: Option<String>) -> Self {
        Self {
            http,
            url: url.to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl RecommendationFunction for HttpRecommendationFunction {
    async fn invoke(
        &self,
        _session: Option<&Session>,
        prompt: &str,
    ) -> Result<Vec<RawRecommendation>> {
        invoke_function(
            &self.http,
            &self.url,
            self.api_key.as_deref(),
            self.api_key.as_deref(),
            prompt,
        )
        .await
    }
}
