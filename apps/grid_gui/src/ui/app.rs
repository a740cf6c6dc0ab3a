use crossbeam_channel::{Receiver, Sender};
use egui::{Color32, RichText, Sense};
use order_grid::{
    order::format_price, DisplayList, GridError, GridSettings, ListOutcome, OrderCap,
    OrderGridController, OrderList,
};
use shared::{domain::OrderId, error::OrderField, protocol::ClientRequest};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiEvent},
    orchestration::{dispatch_backend_command, CommandQueueChannel},
};
use crate::ui::canvas::paint_display_list;

const INVALID_CELL: Color32 = Color32::from_rgb(200, 40, 40);

pub struct GridApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    grid: OrderGridController<DisplayList, CommandQueueChannel>,
    orders: OrderList,
    server_url: String,
    market_price: f64,
    connected: bool,
    status: String,
    last_error: Option<UiError>,
    rejected_fields: Vec<OrderField>,
    last_pointer: Option<egui::Pos2>,
}

impl GridApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: GridSettings,
    ) -> Result<Self, GridError> {
        let grid = OrderGridController::new(
            settings.grid,
            settings.layout,
            settings.market_price,
            DisplayList::default(),
            CommandQueueChannel::new(cmd_tx.clone()),
        )?;
        let orders = OrderList::new(
            OrderCap {
                max_orders: settings.max_orders,
                max_per_side: settings.max_orders_per_side,
            },
            settings.error_codes,
        );

        let mut app = Self {
            cmd_tx,
            ui_rx,
            grid,
            orders,
            server_url: settings.server_url,
            market_price: settings.market_price,
            connected: false,
            status: "Connecting...".to_string(),
            last_error: None,
            rejected_fields: Vec::new(),
            last_pointer: None,
        };
        app.connect();
        Ok(app)
    }

    fn connect(&mut self) {
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Connect {
                server_url: self.server_url.clone(),
            },
            &mut self.status,
        );
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Connected { url } => {
                    self.orders.clear_in_flight();
                    self.connected = true;
                    self.last_error = None;
                    self.status = format!("Connected to {url}");
                    if let Err(err) = self.orders.request_orders(self.grid.channel()) {
                        self.status = format!("Could not request orders: {err}");
                    }
                }
                UiEvent::Server(message) => {
                    match self.orders.handle(&message) {
                        ListOutcome::Confirmed(oid) => {
                            self.rejected_fields.clear();
                            self.status = format!("Order {oid} confirmed");
                        }
                        ListOutcome::Rejected {
                            error_code,
                            message,
                            fields,
                        } => {
                            let text = message
                                .unwrap_or_else(|| format!("Order rejected (code {error_code})"));
                            self.grid.set_message(text);
                            self.rejected_fields = fields;
                        }
                        ListOutcome::Listed(_) | ListOutcome::Ignored => {}
                    }
                    self.grid.set_side_locks(self.orders.side_locks());
                }
                UiEvent::Disconnected => {
                    self.orders.clear_in_flight();
                    self.connected = false;
                    self.status = "Live channel closed".to_string();
                }
                UiEvent::SendFailed { request, error } => {
                    if let ClientRequest::SubmitOrder { data } = &request {
                        self.orders.withdraw_submission(data);
                        self.grid
                            .set_message(format!("Order was not sent: {}", error.message()));
                    }
                    tracing::warn!(request = request.name(), "{}", error.message());
                    self.status = error.message().to_string();
                    self.last_error = Some(error);
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    self.status = err.message().to_string();
                    self.last_error = Some(err);
                }
            }
        }
    }

    fn cancel(&mut self, oid: OrderId) {
        match self.orders.cancel(oid, self.grid.channel()) {
            Ok(()) => self.grid.set_side_locks(self.orders.side_locks()),
            Err(err) => self.status = format!("Could not cancel order {oid}: {err}"),
        }
    }

    fn show_order_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("order_panel")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Order");
                let readout = self.grid.readout();
                let side_invalid = self.rejected_fields.contains(&OrderField::Type);
                let price_invalid =
                    readout.price_invalid || self.rejected_fields.contains(&OrderField::Price);
                let quantity_invalid = readout.quantity_invalid
                    || self.rejected_fields.contains(&OrderField::Quantity);
                egui::Grid::new("order_readout").num_columns(2).show(ui, |ui| {
                    ui.label("Type");
                    ui.label(cell(readout.side_text().to_string(), side_invalid));
                    ui.end_row();
                    ui.label("Quantity");
                    ui.label(cell(readout.quantity_text(), quantity_invalid));
                    ui.end_row();
                    ui.label("Price");
                    ui.label(cell(readout.price_text(), price_invalid));
                    ui.end_row();
                });
                if !readout.message.is_empty() {
                    ui.label(readout.message.clone());
                }

                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("Market price");
                    let response = ui.add(
                        egui::DragValue::new(&mut self.market_price)
                            .range(0.0..=f64::MAX)
                            .speed(1.0),
                    );
                    if response.changed() {
                        if let Err(err) = self.grid.set_market_price(self.market_price) {
                            self.status = err.to_string();
                        }
                    }
                });

                ui.separator();
                ui.heading("Your orders");
                let mut cancel = None;
                if self.orders.orders().is_empty() {
                    ui.weak("No live orders");
                }
                for order in self.orders.orders() {
                    ui.horizontal(|ui| {
                        ui.label(format!(
                            "{} {} @ {}",
                            order.side,
                            order.quantity,
                            format_price(order.price)
                        ));
                        if ui.small_button("Cancel").clicked() {
                            cancel = Some(order.oid);
                        }
                    });
                }
                if let Some(oid) = cancel {
                    self.cancel(oid);
                }

                for warning in self.orders.warnings() {
                    ui.colored_label(Color32::from_rgb(180, 120, 0), warning);
                }
            });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let (dot, text) = if self.connected {
                    (Color32::from_rgb(40, 160, 60), "live")
                } else {
                    (Color32::GRAY, "offline")
                };
                ui.colored_label(dot, text);
                ui.label(&self.status);
                let reconnect = self
                    .last_error
                    .as_ref()
                    .is_some_and(UiError::suggests_reconnect);
                if (!self.connected || reconnect) && ui.button("Reconnect").clicked() {
                    self.connect();
                } else if self.connected && ui.button("Disconnect").clicked() {
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::Disconnect,
                        &mut self.status,
                    );
                }
            });
        });
    }

    fn show_grid(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let size = ui.available_size();
            let (response, painter) = ui.allocate_painter(size, Sense::click());
            let origin = response.rect.min;

            if self
                .grid
                .surface_mut()
                .set_container_size(response.rect.width(), response.rect.height())
            {
                self.grid.on_resize();
            }

            match response.hover_pos() {
                Some(pointer) if self.last_pointer != Some(pointer) => {
                    self.last_pointer = Some(pointer);
                    let local = pointer - origin;
                    self.grid.on_pointer_move(local.x, local.y);
                }
                Some(_) => {}
                None => {
                    if self.last_pointer.take().is_some() {
                        self.grid.on_pointer_leave();
                    }
                }
            }

            if response.clicked() {
                if let Some(details) = self.grid.on_click() {
                    self.rejected_fields.clear();
                    self.orders.note_submitted(details);
                }
                self.last_pointer = None;
            }

            paint_display_list(&painter, origin, self.grid.surface());
        });
    }
}

fn cell(text: String, invalid: bool) -> RichText {
    let text = RichText::new(text).monospace();
    if invalid {
        text.color(INVALID_CELL)
    } else {
        text
    }
}

impl eframe::App for GridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_status_bar(ctx);
        self.show_order_panel(ctx);
        self.show_grid(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
