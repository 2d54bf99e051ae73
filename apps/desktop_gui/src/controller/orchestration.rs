//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::DeckCommand;

pub fn dispatch_deck_command(cmd_tx: &Sender<DeckCommand>, cmd: DeckCommand, status: &mut String) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Deck worker disconnected; restart the app to reload the deck".to_string();
        }
    }
}
