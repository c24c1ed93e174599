mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::TaskDesktopApp;

#[derive(Parser, Debug)]
#[command(about = "Desktop task board backed by the task HTTP API")]
struct Args {
    /// Base URL of the task API; overrides task_client.toml and TASK_API_URL.
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = &args.api_url {
        settings.apply_api_url(api_url);
    }
    tracing::info!(api_url = %settings.api_url, "starting task board");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings.api_url.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Task Manager")
            .with_inner_size([720.0, 820.0])
            .with_min_inner_size([480.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Task Manager",
        options,
        Box::new(move |_cc| Ok(Box::new(TaskDesktopApp::new(cmd_tx, ui_rx, settings.api_url)))),
    )
}
