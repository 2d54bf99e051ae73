use std::path::PathBuf;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::anyhow;
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::DeckCommand;
use crate::controller::events::UiEvent;
use crate::ui::DeckApp;

#[derive(Parser, Debug)]
#[command(name = "deck_viewer", about = "Draw cards from a remote deck of cards")]
struct Args {
    /// Optional TOML settings file.
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Base URL of the card deck API.
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    deck_count: Option<u32>,
    /// tracing filter directive; falls back to RUST_LOG, then `info`.
    #[arg(long)]
    log_filter: Option<String>,
}

fn init_tracing(log_filter: Option<&str>) {
    let filter = match log_filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_filter.as_deref());

    let mut settings = config::load_settings(&args.config);
    if let Some(api_base_url) = args.api_base_url {
        settings.api_base_url = api_base_url;
    }
    if let Some(deck_count) = args.deck_count.filter(|count| *count > 0) {
        settings.deck_count = deck_count;
    }
    tracing::info!(api_base_url = %settings.api_base_url, "starting deck viewer");

    let (cmd_tx, cmd_rx) = bounded::<DeckCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    backend_bridge::runtime::launch(&settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(settings.window_title.clone())
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        &settings.window_title,
        options,
        Box::new(|_cc| Ok(Box::new(DeckApp::bootstrap(cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow!("deck viewer exited with error: {err}"))
}
