use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::DeckId,
    protocol::{DrawResponse, NewDeckResponse, ShuffleResponse},
};
use tracing::debug;
use url::{ParseError, Url};

mod controller;
pub mod error;
pub mod session;

pub use controller::{DeckController, DeckEvent, DrawOutcome, InitOutcome, ShuffleOutcome};
pub use error::DeckApiError;
pub use session::{DeckPhase, DeckSession, DeckSnapshot, Rejection, EXHAUSTED_DECK_MESSAGE};

pub const DEFAULT_API_BASE_URL: &str = "https://deckofcardsapi.com";
pub const DEFAULT_DECK_COUNT: u32 = 1;

/// The remote card deck service. Deck composition, shuffle order and the
/// remaining cards all live behind this trait.
#[async_trait]
pub trait DeckApi: Send + Sync {
    async fn new_shuffled_deck(&self, deck_count: u32) -> Result<NewDeckResponse, DeckApiError>;
    async fn reshuffle(&self, deck_id: &DeckId) -> Result<ShuffleResponse, DeckApiError>;
    async fn draw(&self, deck_id: &DeckId, count: u32) -> Result<DrawResponse, DeckApiError>;
    async fn fetch_card_image(&self, image_url: &str) -> Result<Vec<u8>, DeckApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpDeckApi {
    http: Client,
    base_url: Url,
}

impl HttpDeckApi {
    pub fn new(base_url: &str) -> Result<Self, DeckApiError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, DeckApiError> {
        let base_url = Url::parse(base_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `{base}/api/deck/<segments..>/`. The card API expects the
    /// trailing slash on every endpoint.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, DeckApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ParseError::RelativeUrlWithCannotBeABaseBase)?;
            path.pop_if_empty()
                .extend(["api", "deck"])
                .extend(segments)
                .push("");
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, u32)],
    ) -> Result<T, DeckApiError> {
        debug!(%url, "card api: GET");
        let res = self.http.get(url.clone()).query(query).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(DeckApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DeckApi for HttpDeckApi {
    async fn new_shuffled_deck(&self, deck_count: u32) -> Result<NewDeckResponse, DeckApiError> {
        let url = self.endpoint(&["new", "shuffle"])?;
        self.get_json(url, &[("deck_count", deck_count)]).await
    }

    async fn reshuffle(&self, deck_id: &DeckId) -> Result<ShuffleResponse, DeckApiError> {
        let url = self.endpoint(&[deck_id.as_str(), "shuffle"])?;
        self.get_json(url, &[]).await
    }

    async fn draw(&self, deck_id: &DeckId, count: u32) -> Result<DrawResponse, DeckApiError> {
        let url = self.endpoint(&[deck_id.as_str(), "draw"])?;
        self.get_json(url, &[("count", count)]).await
    }

    async fn fetch_card_image(&self, image_url: &str) -> Result<Vec<u8>, DeckApiError> {
        // Card images may be relative to the API host.
        let url = self.base_url.join(image_url)?;
        let res = self.http.get(url.clone()).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(DeckApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(res.bytes().await?.to_vec())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
