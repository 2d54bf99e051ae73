use std::collections::HashMap;

use client_core::DeckSnapshot;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;

use crate::backend_bridge::commands::DeckCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_deck_command;
use crate::ui::card_view::{CardImage, CardView};

enum CardFace {
    Decoded(CardImage),
    Texture(TextureHandle),
    Unavailable,
}

pub struct DeckApp {
    cmd_tx: Sender<DeckCommand>,
    ui_rx: Receiver<UiEvent>,
    snapshot: DeckSnapshot,
    status: String,
    card_faces: HashMap<String, CardFace>,
}

impl DeckApp {
    pub fn bootstrap(cmd_tx: Sender<DeckCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            snapshot: DeckSnapshot::default(),
            status: "Requesting a new deck...".to_string(),
            card_faces: HashMap::new(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::BackendFailed(message) => {
                self.status = message;
            }
            UiEvent::DeckUnavailable => {
                self.status = "Deck unavailable".to_string();
            }
            UiEvent::Session(snapshot) => {
                if snapshot.deck_id.is_some() && self.snapshot.deck_id.is_none() {
                    self.status = "Deck ready".to_string();
                }
                self.snapshot = snapshot;
            }
            UiEvent::CardImageLoaded { image_url, image } => {
                self.card_faces.insert(image_url, CardFace::Decoded(image));
            }
            UiEvent::CardImageFailed { image_url } => {
                self.card_faces.insert(image_url, CardFace::Unavailable);
            }
        }
    }

    fn dispatch(&mut self, cmd: DeckCommand) {
        dispatch_deck_command(&self.cmd_tx, cmd, &mut self.status);
    }

    /// Turns freshly decoded card faces into textures. Must run on the UI thread.
    fn upload_card_textures(&mut self, ctx: &egui::Context) {
        for (image_url, face) in self.card_faces.iter_mut() {
            if let CardFace::Decoded(image) = face {
                let texture = ctx.load_texture(
                    format!("card-face:{image_url}"),
                    image.to_color_image(),
                    egui::TextureOptions::LINEAR,
                );
                *face = CardFace::Texture(texture);
            }
        }
    }

    fn card_texture(&self, image_url: &str) -> Option<&TextureHandle> {
        match self.card_faces.get(image_url) {
            Some(CardFace::Texture(texture)) => Some(texture),
            _ => None,
        }
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        let idle = !self.snapshot.is_shuffling();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(idle, egui::Button::new("Shuffle Deck"))
                .clicked()
            {
                self.dispatch(DeckCommand::Shuffle);
            }
            if ui
                .add_enabled(idle, egui::Button::new("Draw Card"))
                .clicked()
            {
                self.dispatch(DeckCommand::Draw);
            }
        });
    }

    fn show_cards(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for (index, card) in self.snapshot.drawn_cards.iter().enumerate() {
                        CardView::new(&card.image_url, index + 1, self.card_texture(&card.image_url))
                            .show(ui);
                    }
                });
            });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("deck_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(remaining) = self.snapshot.remaining {
                        ui.label(format!("{remaining} cards left"));
                    }
                    if let Some(deck_id) = &self.snapshot.deck_id {
                        ui.weak(format!("deck {deck_id}"));
                    }
                });
            });
        });
    }
}

impl eframe::App for DeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.upload_card_textures(ctx);

        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_controls(ui);
            ui.separator();

            if self.snapshot.is_shuffling() {
                ui.label("Shuffling...");
            }
            if let Some(error) = &self.snapshot.error {
                let color = ui.visuals().error_fg_color;
                ui.colored_label(color, error);
            }

            self.show_cards(ui);
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
