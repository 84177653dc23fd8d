mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::config::{load_settings, set_endpoint};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::SurveyApp;

const APP_TITLE: &str = "Cafeteria Satisfaction Survey";

#[derive(Debug, Parser)]
#[command(about = "Rate today's cafeteria meals")]
struct Args {
    /// Rating endpoint, overriding survey.toml and the environment.
    #[arg(long)]
    endpoint: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut settings = load_settings();
    if let Some(raw) = args.endpoint.as_deref() {
        set_endpoint(&mut settings, raw, "--endpoint");
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([560.0, 640.0])
            .with_min_inner_size([380.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(SurveyApp::new(cmd_tx, ui_rx)))),
    )
}
