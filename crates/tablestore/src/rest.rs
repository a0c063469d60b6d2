use std::fmt;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;

use crate::{Direction, Order, Row, TableBackend, TableError};

#[derive(Clone)]
pub struct Credentials {
    pub url: String,
    pub key: String,
}

impl Credentials {
    /// Both parts must be present and non-blank.
    pub fn from_parts(url: Option<String>, key: Option<String>) -> Option<Self> {
        let url = url?.trim().trim_end_matches('/').to_owned();
        let key = key?.trim().to_owned();
        if url.is_empty() || key.is_empty() {
            return None;
        }
        Some(Self { url, key })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Client for a hosted PostgREST-style table API.
pub struct RestBackend {
    client: reqwest::Client,
    credentials: Credentials,
}

impl RestBackend {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_client(reqwest::Client::new(), credentials)
    }

    pub fn with_client(client: reqwest::Client, credentials: Credentials) -> Self {
        Self { client, credentials }
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.credentials.url)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.endpoint(table))
            .header("apikey", &self.credentials.key)
            .bearer_auth(&self.credentials.key)
    }

    fn write(&self, method: Method, table: &str) -> RequestBuilder {
        self.request(method, table)
            .header("Prefer", "return=representation")
    }
}

#[async_trait]
impl TableBackend for RestBackend {
    async fn insert(&self, table: &str, row: Row) -> Result<Row, TableError> {
        let res = self
            .write(Method::POST, table)
            .json(&[row])
            .send()
            .await
            .map_err(TableError::Fetch)?;
        rows(res)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TableError::EmptyResponse(table.to_owned()))
    }

    async fn select(&self, table: &str, order: &Order) -> Result<Vec<Row>, TableError> {
        let res = self
            .request(Method::GET, table)
            .query(&[("select", "*".to_owned()), ("order", order_param(order))])
            .send()
            .await
            .map_err(TableError::Fetch)?;
        rows(res).await
    }

    async fn update(&self, table: &str, id: i64, patch: Row) -> Result<Row, TableError> {
        let res = self
            .write(Method::PATCH, table)
            .query(&[("id", id_filter(id))])
            .json(&patch)
            .send()
            .await
            .map_err(TableError::Fetch)?;
        rows(res)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TableError::NotFound {
                table: table.to_owned(),
                id,
            })
    }

    async fn delete(&self, table: &str, id: i64) -> Result<bool, TableError> {
        let res = self
            .write(Method::DELETE, table)
            .query(&[("id", id_filter(id))])
            .send()
            .await
            .map_err(TableError::Fetch)?;
        Ok(!rows(res).await?.is_empty())
    }

    fn is_remote(&self) -> bool {
        true
    }
}

async fn rows(res: Response) -> Result<Vec<Row>, TableError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(api_error(status.as_u16(), &body));
    }
    res.json::<Vec<Row>>()
        .await
        .map_err(TableError::Deserialize)
}

fn api_error(status: u16, body: &str) -> TableError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| match body.trim() {
            "" => "no response body".to_owned(),
            text => text.to_owned(),
        });
    TableError::Api { status, message }
}

fn order_param(order: &Order) -> String {
    let direction = match order.direction {
        Direction::Ascending => "asc",
        Direction::Descending => "desc",
    };
    format!("{}.{direction}", order.column)
}

fn id_filter(id: i64) -> String {
    format!("eq.{id}")
}
