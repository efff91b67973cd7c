use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::query::{CargoQuery, Row};
use super::CargoSource;
use crate::util::env::{env_opt, env_parse};

const DEFAULT_API_URL: &str = "https://lol.fandom.com/api.php";
const USER_AGENT: &str = concat!("esports-sync/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cargo api error ({code}): {info}")]
    Api { code: String, info: String },
    #[error("network: {0}")]
    Net(#[from] reqwest::Error),
    #[error("maximum retries exceeded after {attempts} attempts: {last}")]
    MaximumRetriesExceeded { attempts: u32, last: String },
    #[error("login failed: {0}")]
    Login(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Whether a retry could plausibly succeed. Transport errors and the
    /// wiki's throttle/lag responses are transient; everything else (bad
    /// query, auth) is not.
    fn is_transient(&self) -> bool {
        match self {
            SourceError::Net(_) => true,
            SourceError::Api { code, .. } => {
                matches!(code.as_str(), "ratelimited" | "maxlag" | "readonly")
            }
            _ => false,
        }
    }
}

/// Client construction knobs. Paging and retry behavior is env-tunable;
/// the defaults match the wiki's documented 500-row cargo limit.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub api_url: String,
    pub page_limit: u32,
    pub page_delay: Duration,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
}

impl SourceConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env_opt("LEAGUEPEDIA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            page_limit: env_parse("CARGO_PAGE_LIMIT", 500u32),
            page_delay: Duration::from_millis(env_parse("CARGO_PAGE_DELAY_MS", 250u64)),
            max_retries: env_parse("CARGO_MAX_RETRIES", 3u32),
            retry_base_delay: Duration::from_millis(env_parse("CARGO_BACKOFF_MS", 300u64)),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            page_limit: 500,
            page_delay: Duration::from_millis(250),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(300),
        }
    }
}

// MediaWiki response envelopes. Cargo nests each row under "title".
#[derive(Deserialize)]
struct CargoResponse {
    #[serde(default)]
    cargoquery: Vec<CargoEntry>,
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct CargoEntry {
    title: IndexMap<String, Value>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    code: String,
    info: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    query: Option<TokenQuery>,
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct TokenQuery {
    tokens: Tokens,
}

#[derive(Deserialize)]
struct Tokens {
    logintoken: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    login: Option<LoginBody>,
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct LoginBody {
    result: String,
    reason: Option<String>,
}

/// Cargo query client with pagination, an inter-page delay to stay under
/// the wiki's rate limits, and bounded retries for transient failures.
#[derive(Clone)]
pub struct LeaguepediaClient {
    http: Client,
    config: SourceConfig,
}

impl LeaguepediaClient {
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        // Cookie store carries the MediaWiki session across the login
        // token dance and subsequent queries.
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, config })
    }

    /// MediaWiki bot-password login: fetch a login token, then post the
    /// credentials with it. The session lives in the cookie store.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), SourceError> {
        let token: TokenResponse = self
            .http
            .get(&self.config.api_url)
            .query(&[
                ("action", "query"),
                ("meta", "tokens"),
                ("type", "login"),
                ("format", "json"),
            ])
            .send()
            .await?
            .json()
            .await?;
        if let Some(err) = token.error {
            return Err(SourceError::Login(format!("{}: {}", err.code, err.info)));
        }
        let login_token = token
            .query
            .map(|q| q.tokens.logintoken)
            .ok_or_else(|| SourceError::Malformed("missing login token".into()))?;

        let login: LoginResponse = self
            .http
            .post(&self.config.api_url)
            .form(&[
                ("action", "login"),
                ("format", "json"),
                ("lgname", username),
                ("lgpassword", password),
                ("lgtoken", login_token.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;
        if let Some(err) = login.error {
            return Err(SourceError::Login(format!("{}: {}", err.code, err.info)));
        }
        match login.login {
            Some(body) if body.result == "Success" => Ok(()),
            Some(body) => Err(SourceError::Login(
                body.reason.unwrap_or(body.result),
            )),
            None => Err(SourceError::Malformed("missing login body".into())),
        }
    }

    async fn fetch_page(
        &self,
        query: &CargoQuery,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Row>, SourceError> {
        let limit_s = limit.to_string();
        let offset_s = offset.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("action", "cargoquery"),
            ("format", "json"),
            ("tables", &query.tables),
            ("fields", &query.fields),
            ("limit", &limit_s),
            ("offset", &offset_s),
        ];
        if let Some(join_on) = &query.join_on {
            params.push(("join_on", join_on));
        }
        if let Some(where_clause) = &query.where_clause {
            params.push(("where", where_clause));
        }
        if let Some(order_by) = &query.order_by {
            params.push(("order_by", order_by));
        }

        let body: CargoResponse = self
            .http
            .get(&self.config.api_url)
            .query(&params)
            .send()
            .await?
            .json()
            .await?;
        if let Some(err) = body.error {
            return Err(SourceError::Api {
                code: err.code,
                info: err.info,
            });
        }
        Ok(body
            .cargoquery
            .into_iter()
            .map(|entry| {
                entry
                    .title
                    .into_iter()
                    .map(|(k, v)| (k, stringify(v)))
                    .collect()
            })
            .collect())
    }

    /// Fetch one page with bounded retries and linear backoff on
    /// transient failures.
    async fn fetch_page_retrying(
        &self,
        query: &CargoQuery,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Row>, SourceError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.fetch_page(query, limit, offset).await {
                Ok(rows) => return Ok(rows),
                Err(err) if err.is_transient() && attempt <= self.config.max_retries => {
                    let delay = self.config.retry_base_delay * attempt;
                    warn!(
                        tables = %query.tables,
                        offset,
                        attempt,
                        error = %err,
                        "cargo page fetch failed; retrying in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) if err.is_transient() => {
                    return Err(SourceError::MaximumRetriesExceeded {
                        attempts: attempt,
                        last: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[async_trait]
impl CargoSource for LeaguepediaClient {
    async fn query(&self, query: &CargoQuery) -> Result<Vec<Row>, SourceError> {
        let limit = self.config.page_limit;
        let mut rows: Vec<Row> = Vec::new();
        loop {
            let page = self
                .fetch_page_retrying(query, limit, rows.len() as u32)
                .await?;
            let got = page.len();
            rows.extend(page);
            // A short page means the result set is exhausted.
            if got < limit as usize {
                break;
            }
            tokio::time::sleep(self.config.page_delay).await;
        }
        debug!(tables = %query.tables, rows = rows.len(), "cargo query complete");
        Ok(rows)
    }
}

// Cargo normally returns strings, but numeric fields can come back as JSON
// numbers depending on the table schema.
fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
