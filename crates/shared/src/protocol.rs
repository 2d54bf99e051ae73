//! Response bodies of the public card deck API.

use serde::{Deserialize, Serialize};

use crate::domain::{Card, DeckId};

/// Body of `GET /api/deck/new/shuffle/?deck_count=N`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDeckResponse {
    #[serde(default)]
    pub success: bool,
    pub deck_id: DeckId,
    #[serde(default)]
    pub shuffled: bool,
    #[serde(default)]
    pub remaining: u32,
}

/// Body of `GET /api/deck/<deck_id>/shuffle/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShuffleResponse {
    #[serde(default)]
    pub success: bool,
    pub deck_id: DeckId,
    #[serde(default)]
    pub shuffled: bool,
    #[serde(default)]
    pub remaining: u32,
}

/// Body of `GET /api/deck/<deck_id>/draw/?count=N`.
///
/// An exhausted deck answers with `success: false`, an empty `cards` list and
/// an `error` string; that is a normal response, not a transport failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawResponse {
    #[serde(default)]
    pub success: bool,
    pub deck_id: DeckId,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub remaining: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DrawResponse {
    pub fn first_card(&self) -> Option<&Card> {
        self.cards.first()
    }
}
