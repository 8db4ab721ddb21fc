use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://the-cocktail-db3.p.rapidapi.com";
pub const DEFAULT_API_HOST: &str = "the-cocktail-db3.p.rapidapi.com";

/// Drink identifier. The API hands these out as strings but some mirrors
/// return plain integers, so both are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct DrinkId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

impl From<RawId> for DrinkId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => DrinkId(s),
            RawId::Int(i) => DrinkId(i.to_string()),
        }
    }
}

impl From<DrinkId> for String {
    fn from(id: DrinkId) -> Self {
        id.0
    }
}

impl From<&str> for DrinkId {
    fn from(s: &str) -> Self {
        DrinkId(s.to_string())
    }
}

impl fmt::Display for DrinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog entry returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: DrinkId,
    pub title: String,
    #[serde(default, deserialize_with = "null_or_scalar_as_string")]
    pub image: String,
}

/// One preparation step. The API sends `{"Step 1": "..."}`; only the first
/// value is ever shown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodStep(serde_json::Map<String, serde_json::Value>);

impl MethodStep {
    pub fn text(&self) -> String {
        self.0.values().next().map(value_text).unwrap_or_default()
    }
}

/// Display text of a loose JSON scalar: strings verbatim, `null` empty,
/// anything else as JSON text.
fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn null_or_scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(value_text(&serde_json::Value::deserialize(deserializer)?))
}

/// Full recipe returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: DrinkId,
    pub title: String,
    #[serde(default, deserialize_with = "null_or_scalar_as_string")]
    pub image: String,
    #[serde(default, deserialize_with = "null_or_scalar_as_string")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "null_or_scalar_as_string")]
    pub portion: String,
    #[serde(default, deserialize_with = "null_or_scalar_as_string")]
    pub time: String,
    #[serde(default, deserialize_with = "null_or_scalar_as_string")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub method: Vec<MethodStep>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Recipe {
    /// Step texts in display order.
    pub fn steps(&self) -> Vec<String> {
        self.method.iter().map(MethodStep::text).collect()
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid API key header value")]
    InvalidKey,
}

/// Source of drinks and recipes. The UI only ever talks to this seam.
pub trait CocktailApi: Send + Sync + 'static {
    fn list_drinks(&self) -> impl Future<Output = Result<Vec<Drink>, ApiError>> + Send;

    fn recipe(&self, id: &DrinkId) -> impl Future<Output = Result<Recipe, ApiError>> + Send;
}

/// Connection settings for the RapidAPI-hosted Cocktail DB.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub host: String,
    pub key: String,
    pub timeout: Option<Duration>,
}

/// HTTP client for the Cocktail DB.
pub struct CocktailClient {
    http: reqwest::Client,
    base_url: String,
}

impl CocktailClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let mut key = HeaderValue::from_str(&settings.key).map_err(|_| ApiError::InvalidKey)?;
        key.set_sensitive(true);
        let host = HeaderValue::from_str(&settings.host).map_err(|_| ApiError::InvalidKey)?;

        let mut headers = HeaderMap::new();
        headers.insert("x-rapidapi-key", key);
        headers.insert("x-rapidapi-host", host);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn list_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    pub fn recipe_url(&self, id: &DrinkId) -> String {
        format!("{}/{}", self.base_url, id)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }
}

impl CocktailApi for CocktailClient {
    async fn list_drinks(&self) -> Result<Vec<Drink>, ApiError> {
        self.get_json(self.list_url()).await
    }

    async fn recipe(&self, id: &DrinkId) -> Result<Recipe, ApiError> {
        self.get_json(self.recipe_url(id)).await
    }
}
