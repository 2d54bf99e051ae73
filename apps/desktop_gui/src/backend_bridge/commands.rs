//! Deck commands queued from UI to backend worker.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckCommand {
    Shuffle,
    Draw,
}

impl DeckCommand {
    pub fn name(self) -> &'static str {
        match self {
            Self::Shuffle => "shuffle",
            Self::Draw => "draw",
        }
    }
}
