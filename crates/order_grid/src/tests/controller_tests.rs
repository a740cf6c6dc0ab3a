use shared::channel::{ChannelError, Outbox};

use super::*;
use crate::{
    geometry::GridPoint,
    surface::{DisplayList, DrawCommand},
};

struct ClosedChannel;

impl LiveChannel for ClosedChannel {
    fn send(&self, _request: ClientRequest) -> Result<(), ChannelError> {
        Err(ChannelError::Closed)
    }
}

fn controller_with<C: LiveChannel>(channel: C) -> OrderGridController<DisplayList, C> {
    OrderGridController::new(
        GridConfig::new(4, 100.0, 4),
        GridLayout::default(),
        50.0,
        DisplayList::new(400.0, 400.0),
        channel,
    )
    .expect("controller")
}

fn controller() -> OrderGridController<DisplayList, Outbox> {
    controller_with(Outbox::new())
}

/// Pointer coordinates that snap to `column` and `tick_row`.
fn pointer_at<S: GridSurface, C: LiveChannel>(
    grid: &mut OrderGridController<S, C>,
    column: u32,
    tick_row: u32,
) -> (f32, f32) {
    let g = grid.draw(false, false).expect("draw");
    (
        g.hspace * column as f32,
        g.edge_pad + g.tick_spacing() * tick_row as f32,
    )
}

#[test]
fn valid_mapping_forms_an_order_for_either_sign() {
    let mut grid = controller();
    for quantity in [-5_i64, -1, 1, 3] {
        let order = grid
            .update_current_order(42.5, quantity)
            .expect("valid order");
        let side = if quantity < 0 {
            OrderSide::Sell
        } else {
            OrderSide::Buy
        };
        assert_eq!(
            order,
            PendingOrder {
                side,
                quantity: quantity.unsigned_abs() as u32,
                price: 42.5
            }
        );
        assert!(!grid.readout().price_invalid);
        assert!(!grid.readout().quantity_invalid);
    }
}

#[test]
fn non_positive_price_flags_only_the_price_cell() {
    let mut grid = controller();
    for (price, quantity) in [(0.0, 2_i64), (-10.0, -1), (0.0, 0)] {
        assert_eq!(grid.update_current_order(price, quantity), None);
        let readout = grid.readout();
        assert!(readout.price_invalid);
        assert!(!readout.quantity_invalid);
        assert_eq!(readout.price, Some(0.0));
    }
}

#[test]
fn zero_quantity_flags_only_the_quantity_cell() {
    let mut grid = controller();
    assert_eq!(grid.update_current_order(80.0, 0), None);
    let readout = grid.readout();
    assert!(readout.quantity_invalid);
    assert!(!readout.price_invalid);
    assert_eq!(readout.side_text(), "");
    assert_eq!(readout.quantity_text(), "0");
    assert_eq!(readout.price_text(), "80");
}

#[test]
fn pointer_snaps_to_expected_order() {
    let mut grid = controller();
    let (x, y) = pointer_at(&mut grid, 6, 5);

    grid.on_pointer_move(x, y);

    assert_eq!(
        grid.pending(),
        Some(&PendingOrder {
            side: OrderSide::Buy,
            quantity: 1,
            price: 125.0
        })
    );
    let readout = grid.readout();
    assert_eq!(readout.side_text(), "BUY");
    assert_eq!(readout.quantity_text(), "1");
    assert_eq!(readout.price_text(), "125");

    let geometry = *grid.geometry().expect("geometry");
    let marker: Vec<_> = grid.surface().markers().collect();
    assert_eq!(
        marker,
        vec![geometry.marker_position(GridPoint {
            column: 6,
            tick_row: 5
        })]
    );
}

#[test]
fn pointer_on_locked_half_resets() {
    let mut grid = controller();
    grid.set_side_locks(SideLocks {
        sell_locked: true,
        buy_locked: false,
    });
    let (x, y) = pointer_at(&mut grid, 2, 5);

    grid.on_pointer_move(x, y);

    assert!(grid.pending().is_none());
    assert!(grid.readout().is_clear());
    assert!(!grid.enable_left());
    assert!(grid.enable_right());
    assert_eq!(grid.surface().markers().count(), 0);
    assert!(grid
        .surface()
        .commands()
        .iter()
        .any(|c| matches!(c, DrawCommand::FillRect { .. })));
}

#[test]
fn centre_column_with_a_locked_half_still_refuses_the_order() {
    let mut grid = controller();
    grid.set_side_locks(SideLocks {
        sell_locked: true,
        buy_locked: false,
    });
    let centre = grid.draw(true, false).expect("draw").center_column();
    let (x, y) = pointer_at(&mut grid, centre, 5);

    grid.on_pointer_move(x, y);

    assert!(grid.pending().is_none());
    let readout = grid.readout();
    assert!(readout.quantity_invalid);
    assert!(!readout.price_invalid);
    assert_eq!(readout.price, Some(125.0));
    assert_eq!(grid.surface().markers().count(), 1);

    assert_eq!(grid.on_click(), None);
    assert!(grid.channel().is_empty());
}

#[test]
fn pointer_outside_box_clears_order_and_message() {
    let mut grid = controller();
    let (x, y) = pointer_at(&mut grid, 6, 5);
    grid.on_pointer_move(x, y);
    assert!(grid.pending().is_some());

    grid.on_pointer_move(390.0, 20.0);

    assert!(grid.pending().is_none());
    assert!(grid.readout().is_clear());
    assert!(grid.readout().message.is_empty());
}

#[test]
fn resets_leave_no_pending_order() {
    let mut grid = controller();

    let (x, y) = pointer_at(&mut grid, 7, 2);
    grid.on_pointer_move(x, y);
    grid.on_pointer_leave();
    assert!(grid.pending().is_none());
    assert!(grid.readout().is_clear());

    grid.on_pointer_move(x, y);
    grid.on_resize();
    assert!(grid.pending().is_none());
    assert!(grid.readout().is_clear());
    assert_eq!(grid.cached_box_size(), Some(400.0));

    grid.on_pointer_move(x, y);
    assert!(grid.on_click().is_some());
    assert!(grid.pending().is_none());
    assert!(grid.readout().is_clear());
}

#[test]
fn click_without_pending_order_sends_nothing() {
    let mut grid = controller();
    assert_eq!(grid.on_click(), None);
    assert!(grid.channel().is_empty());
}

#[test]
fn click_sends_exactly_the_pending_order() {
    let mut grid = controller();
    let (x, y) = pointer_at(&mut grid, 1, 9);
    grid.on_pointer_move(x, y);
    let pending = *grid.pending().expect("pending");

    let submitted = grid.on_click().expect("submitted");

    assert_eq!(submitted, OrderDetails::from(pending));
    assert_eq!(submitted.side, OrderSide::Sell);
    assert_eq!(submitted.quantity, 4);
    assert_eq!(submitted.price, 105.0);
    assert_eq!(
        grid.channel().drain(),
        vec![ClientRequest::SubmitOrder { data: submitted }]
    );
    assert!(grid.pending().is_none());
    assert_eq!(grid.surface().markers().count(), 0);
}

#[test]
fn click_is_ignored_once_side_locks() {
    let mut grid = controller();
    let (x, y) = pointer_at(&mut grid, 8, 4);
    grid.on_pointer_move(x, y);
    assert!(grid.pending().is_some());

    grid.set_side_locks(SideLocks {
        sell_locked: false,
        buy_locked: true,
    });

    assert_eq!(grid.on_click(), None);
    assert!(grid.channel().is_empty());
}

#[test]
fn failed_send_reports_in_status_line() {
    let mut grid = controller_with(ClosedChannel);
    let (x, y) = pointer_at(&mut grid, 6, 5);
    grid.on_pointer_move(x, y);

    assert_eq!(grid.on_click(), None);
    assert!(grid.pending().is_none());
    assert!(grid.readout().message.contains("closed"));
}

#[test]
fn zero_sized_container_skips_drawing_until_resize() {
    let mut grid = OrderGridController::new(
        GridConfig::default(),
        GridLayout::default(),
        50.0,
        DisplayList::new(0.0, 300.0),
        Outbox::new(),
    )
    .expect("controller");

    let err = grid.draw(false, false).expect_err("nothing to draw on");
    assert!(matches!(err, GridError::EmptyContainer { .. }));
    assert_eq!(grid.cached_box_size(), None);
    assert!(grid.surface().commands().is_empty());

    grid.on_pointer_move(10.0, 10.0);
    assert!(grid.pending().is_none());

    grid.surface_mut().set_container_size(500.0, 300.0);
    grid.on_resize();
    assert_eq!(grid.cached_box_size(), Some(300.0));
    assert_eq!(grid.surface().canvas_size(), 300.0);
    assert!(!grid.surface().commands().is_empty());
}

#[test]
fn box_size_is_cached_until_resize() {
    let mut grid = controller();
    grid.draw(false, false).expect("draw");

    grid.surface_mut().set_container_size(600.0, 600.0);
    let g = grid.draw(false, false).expect("draw");
    assert_eq!(g.canvas_size, 400.0);

    grid.on_resize();
    assert_eq!(grid.cached_box_size(), Some(600.0));
}

#[test]
fn draw_labels_prices_and_absolute_quantities() {
    let mut grid = controller();
    grid.draw(false, false).expect("draw");

    let texts: Vec<&str> = grid.surface().texts().collect();
    for expected in ["Price", "Sell", "Buy", "150", "50", "10"] {
        assert!(texts.contains(&expected), "missing label {expected}");
    }
    // Quantity labels run 5..0..5 across the eleven columns.
    let quantities: Vec<&str> = texts[texts.len() - 11..].to_vec();
    assert_eq!(
        quantities,
        vec!["5", "4", "3", "2", "1", "0", "1", "2", "3", "4", "5"]
    );
}

#[test]
fn new_market_price_moves_the_grid() {
    let mut grid = controller();
    grid.set_market_price(200.0).expect("price");
    let (x, y) = pointer_at(&mut grid, 6, 0);
    grid.on_pointer_move(x, y);
    assert_eq!(grid.pending().map(|o| o.price), Some(300.0));

    assert!(grid.set_market_price(f64::NAN).is_err());
}
