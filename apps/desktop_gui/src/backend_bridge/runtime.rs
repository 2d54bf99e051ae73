//! Runtime bridge between UI command queue and the deck controller.

use std::{collections::HashSet, sync::Arc, thread};

use client_core::{DeckApi, DeckController, DeckEvent, HttpDeckApi, InitOutcome};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::{runtime::Runtime, sync::broadcast::error::RecvError};

use crate::backend_bridge::commands::DeckCommand;
use crate::config::Settings;
use crate::controller::events::UiEvent;
use crate::ui::card_view::decode_card_image;

pub fn launch(settings: &Settings, cmd_rx: Receiver<DeckCommand>, ui_tx: Sender<UiEvent>) {
    let api_base_url = settings.api_base_url.clone();
    let deck_count = settings.deck_count;

    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Deck worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "deck worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let api = match HttpDeckApi::new(&api_base_url) {
            Ok(api) => api,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "deck worker startup failure: {err}"
                )));
                tracing::error!(api_base_url = %api_base_url, "invalid card api url: {err}");
                return;
            }
        };

        let controller = Arc::new(DeckController::with_deck_count(api, deck_count));
        tracing::info!(
            api_base_url = %controller.api().base_url(),
            deck_count,
            "backend: deck worker ready"
        );

        // Subscribe before initializing so the first snapshots reach the UI.
        let events = controller.subscribe();
        runtime.spawn(forward_deck_events(controller.clone(), events, ui_tx.clone()));
        runtime.spawn({
            let controller = controller.clone();
            let ui_tx = ui_tx.clone();
            async move {
                if let InitOutcome::Failed(_) = controller.initialize().await {
                    forward_to_ui(&ui_tx, UiEvent::DeckUnavailable);
                }
            }
        });

        run_command_loop(&runtime, &controller, &cmd_rx);
        tracing::info!("backend: command queue closed; deck worker exiting");
    });
}

/// Every command gets its own task: draws are not queued behind each other and
/// the controller's own guard decides what a shuffle in flight rejects.
fn run_command_loop<A: DeckApi + 'static>(
    runtime: &Runtime,
    controller: &Arc<DeckController<A>>,
    cmd_rx: &Receiver<DeckCommand>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        tracing::info!(command = cmd.name(), "backend: command");
        let controller = controller.clone();
        match cmd {
            DeckCommand::Shuffle => {
                runtime.spawn(async move {
                    controller.shuffle().await;
                });
            }
            DeckCommand::Draw => {
                runtime.spawn(async move {
                    controller.draw_card().await;
                });
            }
        }
    }
}

async fn forward_deck_events<A: DeckApi + 'static>(
    controller: Arc<DeckController<A>>,
    mut events: tokio::sync::broadcast::Receiver<DeckEvent>,
    ui_tx: Sender<UiEvent>,
) {
    let mut requested_images = HashSet::new();
    loop {
        match events.recv().await {
            Ok(DeckEvent::SessionChanged(snapshot)) => {
                for card in &snapshot.drawn_cards {
                    if requested_images.insert(card.image_url.clone()) {
                        tokio::spawn(load_card_image(
                            controller.clone(),
                            card.image_url.clone(),
                            ui_tx.clone(),
                        ));
                    }
                }
                forward_to_ui(&ui_tx, UiEvent::Session(snapshot));
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "backend: ui event forwarder lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn load_card_image<A: DeckApi + 'static>(
    controller: Arc<DeckController<A>>,
    image_url: String,
    ui_tx: Sender<UiEvent>,
) {
    let decoded = match controller.api().fetch_card_image(&image_url).await {
        Ok(bytes) => decode_card_image(&bytes),
        Err(err) => Err(err.to_string()),
    };
    let event = match decoded {
        Ok(image) => UiEvent::CardImageLoaded { image_url, image },
        Err(reason) => {
            tracing::warn!(image_url = %image_url, "card image unavailable: {reason}");
            UiEvent::CardImageFailed { image_url }
        }
    };
    forward_to_ui(&ui_tx, event);
}

/// Hands an event to the UI thread without blocking the runtime. A dropped
/// event is logged; the next session snapshot supersedes it.
fn forward_to_ui(ui_tx: &Sender<UiEvent>, event: UiEvent) -> bool {
    match ui_tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            tracing::warn!(?event, "backend: ui event queue full; event dropped");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::warn!("backend: ui event queue disconnected; event dropped");
            false
        }
    }
}
