//! Spotify Web API client
//!
//! Handles communication with the Spotify Web API.
//! See: https://developer.spotify.com/documentation/web-api
//!
//! Requests are authenticated with a user access token carrying the
//! `playlist-modify-private` and `user-library-modify` scopes.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{adapter, dto};
use crate::migration::assembler::MAX_SAVE_BATCH_SIZE;
use crate::migration::domain::{DestinationError, DestinationId, EntityKind, Query, Visibility};
use crate::migration::traits::DestinationCatalog;

const DEFAULT_BASE_URL: &str = "https://api.spotify.com/v1";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `/me/tracks` and `/me/albums` accept at most 50 ids per request
const SAVE_CHUNK_SIZE: usize = MAX_SAVE_BATCH_SIZE;

const USER_AGENT: &str = concat!("LibraryMigrator/", env!("CARGO_PKG_VERSION"));

/// Spotify API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
    user_id: String,
}

impl SpotifyClient {
    /// Create a new client for the given user
    pub fn new(
        access_token: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Result<Self, DestinationError> {
        Self::build(DEFAULT_BASE_URL, access_token.into(), user_id.into())
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self::build(base_url.into(), access_token.into(), user_id.into())
            .expect("Failed to build HTTP client")
    }

    fn build(
        base_url: impl Into<String>,
        access_token: String,
        user_id: String,
    ) -> Result<Self, DestinationError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DestinationError::Request(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            access_token,
            user_id,
        })
    }

    /// Send a request, classify the status and return the raw response
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, DestinationError> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(adapter::classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(adapter::classify_status(status, &body));
        }

        Ok(response)
    }

    /// Send a request and parse the JSON body
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, DestinationError> {
        let body = self
            .send(request)
            .await?
            .text()
            .await
            .map_err(adapter::classify_transport)?;

        serde_json::from_str(&body).map_err(|e| DestinationError::Parse(e.to_string()))
    }
}

#[async_trait]
impl DestinationCatalog for SpotifyClient {
    async fn search(
        &self,
        query: &Query,
        limit: u32,
    ) -> Result<Vec<DestinationId>, DestinationError> {
        let url = format!(
            "{}/search?q={}&type={}&limit={}",
            self.base_url,
            urlencoding::encode(&query.text),
            query.kind.as_search_type(),
            limit
        );
        let response: dto::SearchResponse = self.send_json(self.http_client.get(&url)).await?;
        adapter::to_destination_ids(response, query.kind)
    }

    async fn create_collection(
        &self,
        name: &str,
        visibility: Visibility,
    ) -> Result<String, DestinationError> {
        let url = format!(
            "{}/users/{}/playlists",
            self.base_url,
            urlencoding::encode(&self.user_id)
        );
        let body = dto::CreatePlaylistRequest {
            name,
            public: visibility == Visibility::Public,
        };

        let playlist: dto::CreatedPlaylist =
            self.send_json(self.http_client.post(&url).json(&body)).await?;
        tracing::debug!("Created playlist {} ({})", name, playlist.id);
        Ok(playlist.id)
    }

    async fn append_items(
        &self,
        collection_id: &str,
        items: &[DestinationId],
    ) -> Result<(), DestinationError> {
        if items.is_empty() {
            return Ok(());
        }

        let url = format!(
            "{}/playlists/{}/tracks",
            self.base_url,
            urlencoding::encode(collection_id)
        );
        let body = dto::AddItemsRequest {
            uris: items.iter().map(DestinationId::as_uri).collect(),
        };

        self.send(self.http_client.post(&url).json(&body)).await?;
        Ok(())
    }

    async fn add_to_saved_items(
        &self,
        kind: EntityKind,
        items: &[DestinationId],
    ) -> Result<(), DestinationError> {
        let url = match kind {
            EntityKind::Track => format!("{}/me/tracks", self.base_url),
            EntityKind::Album => format!("{}/me/albums", self.base_url),
        };

        for chunk in items.chunks(SAVE_CHUNK_SIZE) {
            let body = dto::SaveItemsRequest {
                ids: chunk.iter().map(DestinationId::bare_id).collect(),
            };
            self.send(self.http_client.put(&url).json(&body)).await?;
        }
        Ok(())
    }
}
