//! Events delivered from the backend worker to the UI thread.

use client_core::DeckSnapshot;

use crate::ui::card_view::CardImage;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    /// The backend could not start; the deck stays inert.
    BackendFailed(String),
    /// The first deck request failed; there is nothing to draw from.
    DeckUnavailable,
    Session(DeckSnapshot),
    CardImageLoaded {
        image_url: String,
        image: CardImage,
    },
    CardImageFailed {
        image_url: String,
    },
}
