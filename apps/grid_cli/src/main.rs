use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{ClientEvent, LiveClient};
use order_grid::{
    order::format_price, DisplayList, GridSettings, ListOutcome, OrderCap, OrderGridController,
    OrderList,
};
use serde_json::json;
use shared::{
    channel::{LiveChannel, Outbox},
    domain::{OrderDetails, OrderId, OrderSide},
    protocol::ClientRequest,
};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "grid_cli", about = "Inspect the order grid and talk to the market live channel")]
struct Cli {
    /// Settings file; `grid.toml` in the working directory when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    market_price: Option<f64>,
    /// Seconds to wait for a server reply.
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Map a pointer position on an offline grid and print the resulting order.
    Preview {
        /// Container width in pixels.
        #[arg(long, default_value_t = 400.0)]
        width: f32,
        #[arg(long, default_value_t = 400.0)]
        height: f32,
        /// Pointer position relative to the container origin.
        #[arg(long, allow_negative_numbers = true)]
        x: f32,
        #[arg(long, allow_negative_numbers = true)]
        y: f32,
        /// Also click, printing the request that would be sent.
        #[arg(long)]
        click: bool,
    },
    /// Submit one order and wait for the confirmation or rejection.
    Submit {
        /// BUY or SELL.
        #[arg(long)]
        side: OrderSide,
        #[arg(long)]
        quantity: u32,
        #[arg(long)]
        price: f64,
    },
    /// List this player's live orders.
    Orders,
    /// Delete a live order.
    Cancel {
        #[arg(long)]
        oid: i64,
    },
    /// Print the rejection table, or decode one error code.
    ErrorCodes { code: Option<u32> },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings =
        order_grid::load_settings(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(market_price) = cli.market_price {
        settings.market_price = market_price;
    }
    settings.validate().context("invalid settings")?;
    let timeout = Duration::from_secs(cli.timeout_secs);

    match cli.command {
        Command::Preview {
            width,
            height,
            x,
            y,
            click,
        } => preview(&settings, (width, height), (x, y), click)?,
        Command::Submit {
            side,
            quantity,
            price,
        } => {
            submit(
                &settings,
                OrderDetails {
                    side,
                    quantity,
                    price,
                },
                timeout,
            )
            .await?
        }
        Command::Orders => orders(&settings, timeout).await?,
        Command::Cancel { oid } => {
            let (client, _events) = LiveClient::connect(&settings.server_url).await?;
            client.send(ClientRequest::DeleteOrder { oid: OrderId(oid) })?;
            client.close().await;
            println!("delete requested for order {oid}");
        }
        Command::ErrorCodes { code: Some(code) } => {
            let fields = settings.error_codes.fields(code);
            match settings.error_codes.describe(code) {
                Some(desc) => println!("{code}: {desc} (fields: {fields:?})"),
                None => println!("{code}: no matching rejection reason"),
            }
        }
        Command::ErrorCodes { code: None } => {
            println!("{}", serde_json::to_string_pretty(&settings.error_codes)?);
        }
    }

    Ok(())
}

fn preview(
    settings: &GridSettings,
    (width, height): (f32, f32),
    (x, y): (f32, f32),
    click: bool,
) -> Result<()> {
    let mut grid = OrderGridController::new(
        settings.grid,
        settings.layout,
        settings.market_price,
        DisplayList::new(width, height),
        Outbox::new(),
    )?;
    let geometry = grid.draw(false, false)?;

    grid.on_pointer_move(x, y);
    let pending = grid.pending().copied();
    let readout = grid.readout().clone();
    let submitted = if click { grid.on_click() } else { None };

    let report = json!({
        "geometry": geometry,
        "pending": pending,
        "readout": readout,
        "submitted": submitted,
        "requests": grid.channel().drain(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn order_list(settings: &GridSettings) -> OrderList {
    OrderList::new(
        OrderCap {
            max_orders: settings.max_orders,
            max_per_side: settings.max_orders_per_side,
        },
        settings.error_codes.clone(),
    )
}

/// Feeds server messages into `list` until one produces an outcome other
/// than [`ListOutcome::Ignored`].
async fn next_outcome(
    list: &mut OrderList,
    events: &mut broadcast::Receiver<ClientEvent>,
    timeout: Duration,
) -> Result<ListOutcome> {
    loop {
        let event = tokio::time::timeout(timeout, events.recv())
            .await
            .map_err(|_| anyhow!("timed out waiting for the server"))?
            .context("live channel event stream ended")?;
        match event {
            ClientEvent::Server(message) => {
                for warning in &message.warnings {
                    eprintln!("warning: {warning}");
                }
                match list.handle(&message) {
                    ListOutcome::Ignored => continue,
                    outcome => return Ok(outcome),
                }
            }
            ClientEvent::Error(err) => tracing::warn!("{err}"),
            ClientEvent::Disconnected => bail!("live channel closed before the server replied"),
        }
    }
}

async fn submit(settings: &GridSettings, details: OrderDetails, timeout: Duration) -> Result<()> {
    let (client, mut events) = LiveClient::connect(&settings.server_url).await?;
    let mut list = order_list(settings);

    client.send(ClientRequest::SubmitOrder {
        data: details.clone(),
    })?;
    list.note_submitted(details);

    let outcome = loop {
        match next_outcome(&mut list, &mut events, timeout).await {
            Ok(ListOutcome::Listed(_)) => continue,
            other => break other,
        }
    };
    client.close().await;
    match outcome? {
        ListOutcome::Confirmed(oid) => {
            for order in list.orders() {
                println!(
                    "confirmed order {oid}: {} {} @ {}",
                    order.side,
                    order.quantity,
                    format_price(order.price)
                );
            }
        }
        ListOutcome::Rejected {
            error_code,
            message,
            fields,
        } => {
            bail!(
                "order rejected (code {error_code}, fields {fields:?}): {}",
                message.unwrap_or_else(|| "no description".to_string())
            );
        }
        ListOutcome::Listed(_) | ListOutcome::Ignored => {
            bail!("server did not answer the submission")
        }
    }
    Ok(())
}

async fn orders(settings: &GridSettings, timeout: Duration) -> Result<()> {
    let (client, mut events) = LiveClient::connect(&settings.server_url).await?;
    let mut list = order_list(settings);

    list.request_orders(client.as_ref())?;
    let outcome = next_outcome(&mut list, &mut events, timeout).await;
    client.close().await;
    outcome?;

    if list.orders().is_empty() {
        println!("no live orders");
    }
    for order in list.orders() {
        println!(
            "{:>6}  {:<4} {:>4} @ {}",
            order.oid.0,
            order.side.as_str(),
            order.quantity,
            format_price(order.price)
        );
    }
    Ok(())
}
