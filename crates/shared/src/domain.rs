use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! token_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

// Opaque token issued by the card API for one server-side deck.
token_newtype!(DeckId);

/// A drawn playing card. Only `image_url` is required; the remaining fields are
/// carried through when the API reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suit: Option<String>,
}

impl Card {
    pub fn from_image(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            code: None,
            value: None,
            suit: None,
        }
    }

    /// Human readable label, e.g. `QUEEN of HEARTS`, falling back to the card
    /// code and finally the image reference.
    pub fn label(&self) -> String {
        match (&self.value, &self.suit, &self.code) {
            (Some(value), Some(suit), _) => format!("{value} of {suit}"),
            (_, _, Some(code)) => code.clone(),
            _ => self.image_url.clone(),
        }
    }
}
