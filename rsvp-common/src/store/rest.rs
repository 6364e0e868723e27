//! PostgREST client for the hosted store
//!
//! Tables are addressed as `{url}/rest/v1/{table}` with filter query
//! parameters (`email=eq.x`, `order=submitted_at.desc`, `limit=1`).
//! Every request carries the `apikey` and bearer headers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use super::{Store, StoreError};
use crate::config::StoreConfig;
use crate::models::{AvatarData, AvatarRow, AvatarSelection, Guest, GuestRow, NewGuest, RsvpRecord};

const GUESTS_TABLE: &str = "guests";
const RSVPS_TABLE: &str = "rsvps";

const CREATE_GUESTS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS guests (
    id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
    name TEXT NOT NULL,
    address TEXT,
    created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_guests_name ON guests(name);
CREATE INDEX IF NOT EXISTS idx_guests_address ON guests(address);
"#;

/// Store client over the hosted REST interface
pub struct RestStore {
    http_client: reqwest::Client,
    url: Option<String>,
    api_key: Option<String>,
}

impl RestStore {
    pub fn new(config: &StoreConfig, timeout: Duration) -> Result<Self, StoreError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, StoreError> {
        let (Some(url), Some(api_key)) = (&self.url, &self.api_key) else {
            return Err(StoreError::NotConfigured);
        };

        let endpoint = format!("{}/rest/v1/{}", url, path);
        debug!(method = %method, endpoint = %endpoint, "Store request");

        Ok(self
            .http_client
            .request(method, endpoint)
            .header("apikey", api_key)
            .bearer_auth(api_key))
    }

    fn write<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &T,
    ) -> Result<RequestBuilder, StoreError> {
        Ok(self
            .request(method, path)?
            .header("Prefer", "return=minimal")
            .json(body))
    }

    /// Filters addressing the most recent RSVP for an email
    fn latest_for(email: &str) -> [(&'static str, String); 3] {
        [
            ("email", format!("eq.{}", email)),
            ("order", "submitted_at.desc".to_string()),
            ("limit", "1".to_string()),
        ]
    }
}

async fn send(request: RequestBuilder) -> Result<Response, StoreError> {
    let response = request
        .send()
        .await
        .map_err(|e| StoreError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StoreError::Api(status.as_u16(), body));
    }

    Ok(response)
}

#[async_trait]
impl Store for RestStore {
    fn is_configured(&self) -> bool {
        self.url.is_some() && self.api_key.is_some()
    }

    async fn ensure_guests_table(&self) -> Result<(), StoreError> {
        let request = self.request(Method::POST, "rpc/exec_sql")?.json(&json!({
            "query": CREATE_GUESTS_TABLE_SQL,
        }));
        send(request).await?;
        Ok(())
    }

    async fn fetch_guests(&self) -> Result<Vec<Guest>, StoreError> {
        let request = self
            .request(Method::GET, GUESTS_TABLE)?
            .query(&[("select", "*")]);

        let rows: Vec<GuestRow> = send(request)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        info!("Loaded {} guests from store", rows.len());
        Ok(rows.into_iter().map(Guest::from).collect())
    }

    async fn insert_guests(&self, batch: &[NewGuest]) -> Result<(), StoreError> {
        send(self.write(Method::POST, GUESTS_TABLE, batch)?).await?;
        Ok(())
    }

    async fn insert_rsvp(&self, record: &RsvpRecord) -> Result<(), StoreError> {
        send(self.write(Method::POST, RSVPS_TABLE, record)?).await?;
        info!(email = %record.email, "RSVP saved to store");
        Ok(())
    }

    async fn mark_verified(&self, email: &str) -> Result<(), StoreError> {
        let request = self
            .write(Method::PATCH, RSVPS_TABLE, &json!({ "verified": true }))?
            .query(&Self::latest_for(email)[..]);
        send(request).await?;
        Ok(())
    }

    async fn latest_rsvp(&self, email: &str) -> Result<Option<RsvpRecord>, StoreError> {
        let request = self
            .request(Method::GET, RSVPS_TABLE)?
            .query(&[("select", "*")])
            .query(&Self::latest_for(email)[..]);

        let records: Vec<RsvpRecord> = send(request)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        Ok(records.into_iter().next())
    }

    async fn save_avatars(
        &self,
        email: &str,
        avatars: &[AvatarSelection],
    ) -> Result<(), StoreError> {
        let request = self
            .write(Method::PATCH, RSVPS_TABLE, &json!({ "avatar_data": avatars }))?
            .query(&Self::latest_for(email)[..]);
        send(request).await?;
        Ok(())
    }

    async fn displayable_avatar_data(&self) -> Result<Vec<AvatarData>, StoreError> {
        let request = self.request(Method::GET, RSVPS_TABLE)?.query(&[
            ("select", "avatar_data"),
            ("is_attending", "eq.true"),
            ("verified", "eq.true"),
            ("order", "submitted_at.asc"),
        ]);

        let rows: Vec<AvatarRow> = send(request)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.avatar_data).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_store_refuses_requests() {
        let store = RestStore::new(&StoreConfig::default(), Duration::from_secs(1)).unwrap();

        assert!(!store.is_configured());
        assert!(matches!(
            store.fetch_guests().await,
            Err(StoreError::NotConfigured)
        ));
        assert!(matches!(
            store.mark_verified("a@b.com").await,
            Err(StoreError::NotConfigured)
        ));
    }
}
