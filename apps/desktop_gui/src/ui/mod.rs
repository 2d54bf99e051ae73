//! UI layer for the deck viewer: app shell and card rendering.

pub mod app;
pub mod card_view;

pub use app::DeckApp;
