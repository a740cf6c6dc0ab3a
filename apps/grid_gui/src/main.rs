mod backend_bridge;
mod controller;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::GridApp;

#[derive(Debug, Parser)]
#[command(name = "grid_gui", about = "Order grid market window")]
struct Args {
    /// Settings file; `grid.toml` in the working directory when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    market_price: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let mut settings =
        order_grid::load_settings(args.config.as_deref()).context("failed to load settings")?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(market_price) = args.market_price {
        settings.market_price = market_price;
    }
    settings.validate().context("invalid settings")?;
    tracing::info!(
        server_url = %settings.server_url,
        market_price = settings.market_price,
        "starting grid window"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Order Grid")
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([600.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Order Grid",
        options,
        Box::new(move |_cc| Ok(Box::new(GridApp::new(cmd_tx, ui_rx, settings)?))),
    )
    .map_err(|err| anyhow!("grid window failed: {err}"))
}
