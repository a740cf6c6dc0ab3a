use shared::{
    channel::Outbox,
    domain::OrderRecord,
    error::OrderErrorCode,
};

use super::*;

fn details(side: OrderSide, quantity: u32, price: f64) -> OrderDetails {
    OrderDetails {
        side,
        quantity,
        price,
    }
}

fn confirmed(list: &mut OrderList, oid: i64, side: OrderSide) {
    list.note_submitted(details(side, 1, 40.0));
    let outcome = list.handle(&ServerMessage::new(ServerEvent::OrderConfirmed {
        order_id: OrderId(oid),
    }));
    assert_eq!(outcome, ListOutcome::Confirmed(OrderId(oid)));
}

#[test]
fn confirmation_records_the_submitted_order() {
    let mut list = OrderList::default();
    list.note_submitted(details(OrderSide::Buy, 1, 125.0));
    list.note_submitted(details(OrderSide::Sell, 3, 90.0));

    list.handle(&ServerMessage::new(ServerEvent::OrderConfirmed {
        order_id: OrderId(7),
    }));

    assert_eq!(
        list.orders(),
        &[ConfirmedOrder {
            oid: OrderId(7),
            side: OrderSide::Buy,
            quantity: 1,
            price: 125.0
        }]
    );
    assert_eq!(list.in_flight(), 1);
}

#[test]
fn rejection_describes_highest_error_bit() {
    let mut list = OrderList::default();
    list.note_submitted(details(OrderSide::Sell, 2, 75.0));
    let code = OrderErrorCode::AskLessThanBid.value() | OrderErrorCode::Shorting.value();

    let outcome = list.handle(&ServerMessage::new(ServerEvent::OrderRejected {
        error_code: code,
    }));

    assert_eq!(
        outcome,
        ListOutcome::Rejected {
            error_code: code,
            message: Some(OrderErrorCode::Shorting.description().to_string()),
            fields: vec![OrderField::Price, OrderField::Quantity],
        }
    );
    assert!(list.orders().is_empty());
    assert_eq!(list.in_flight(), 0);
}

#[test]
fn confirmation_without_submission_is_ignored() {
    let mut list = OrderList::default();
    let outcome = list.handle(&ServerMessage::new(ServerEvent::OrderConfirmed {
        order_id: OrderId(1),
    }));
    assert_eq!(outcome, ListOutcome::Ignored);
    assert!(list.orders().is_empty());
}

#[test]
fn unsent_submission_does_not_shift_later_confirmations() {
    let mut list = OrderList::default();
    let unsent = details(OrderSide::Sell, 5, 10.0);
    list.note_submitted(unsent.clone());
    list.note_submitted(details(OrderSide::Buy, 1, 125.0));

    assert!(list.withdraw_submission(&unsent));
    assert_eq!(list.in_flight(), 1);
    list.handle(&ServerMessage::new(ServerEvent::OrderConfirmed {
        order_id: OrderId(9),
    }));

    assert_eq!(
        list.orders(),
        &[ConfirmedOrder {
            oid: OrderId(9),
            side: OrderSide::Buy,
            quantity: 1,
            price: 125.0,
        }]
    );
    assert!(!list.withdraw_submission(&unsent));
}

#[test]
fn withdrawing_one_of_two_equal_submissions_keeps_the_other() {
    let mut list = OrderList::default();
    let order = details(OrderSide::Buy, 2, 60.0);
    list.note_submitted(order.clone());
    list.note_submitted(order.clone());

    assert!(list.withdraw_submission(&order));
    assert_eq!(list.in_flight(), 1);
    confirmed_as(&mut list, 3, &order);
}

fn confirmed_as(list: &mut OrderList, oid: i64, expected: &OrderDetails) {
    list.handle(&ServerMessage::new(ServerEvent::OrderConfirmed {
        order_id: OrderId(oid),
    }));
    let order = list
        .orders()
        .iter()
        .find(|order| order.oid == OrderId(oid))
        .expect("recorded");
    assert_eq!(order.side, expected.side);
    assert_eq!(order.quantity, expected.quantity);
    assert_eq!(order.price, expected.price);
}

#[test]
fn reconnect_discards_unanswered_submissions() {
    let mut list = OrderList::default();
    list.note_submitted(details(OrderSide::Sell, 5, 10.0));
    list.note_submitted(details(OrderSide::Buy, 1, 125.0));

    assert_eq!(list.clear_in_flight(), 2);
    assert_eq!(list.in_flight(), 0);
    assert_eq!(
        list.handle(&ServerMessage::new(ServerEvent::OrderConfirmed {
            order_id: OrderId(4),
        })),
        ListOutcome::Ignored
    );
    assert!(list.orders().is_empty());
    assert_eq!(list.clear_in_flight(), 0);
}

#[test]
fn order_list_merges_by_oid() {
    let mut list = OrderList::default();
    confirmed(&mut list, 1, OrderSide::Buy);

    let message = ServerMessage::new(ServerEvent::OrderList {
        orders: vec![
            OrderRecord {
                oid: OrderId(1),
                side: OrderSide::Buy,
                quantity: 2,
                price: 41.0,
            },
            OrderRecord {
                oid: OrderId(2),
                side: OrderSide::Sell,
                quantity: 1,
                price: 60.0,
            },
        ],
    });

    assert_eq!(list.handle(&message), ListOutcome::Listed(2));
    assert_eq!(list.handle(&message), ListOutcome::Listed(2));
    assert_eq!(list.orders().len(), 2);
    assert_eq!(list.orders()[0].quantity, 2);
}

#[test]
fn warnings_follow_the_latest_message() {
    let mut list = OrderList::default();
    let mut message = ServerMessage::new(ServerEvent::Unknown);
    message.warnings = vec!["Trading ends in 30 seconds".into()];

    assert_eq!(list.handle(&message), ListOutcome::Ignored);
    assert_eq!(list.warnings(), ["Trading ends in 30 seconds".to_string()]);

    list.handle(&ServerMessage::new(ServerEvent::Unknown));
    assert!(list.warnings().is_empty());
}

#[test]
fn reaching_the_cap_locks_both_sides_until_cancel() {
    let mut list = OrderList::new(
        OrderCap {
            max_orders: 3,
            max_per_side: None,
        },
        Default::default(),
    );
    confirmed(&mut list, 1, OrderSide::Buy);
    confirmed(&mut list, 2, OrderSide::Buy);
    assert_eq!(list.side_locks(), SideLocks::NONE);

    confirmed(&mut list, 3, OrderSide::Sell);
    assert_eq!(
        list.side_locks(),
        SideLocks {
            sell_locked: true,
            buy_locked: true
        }
    );

    let outbox = Outbox::new();
    list.cancel(OrderId(2), &outbox).expect("cancel");
    assert_eq!(list.side_locks(), SideLocks::NONE);
    assert_eq!(
        outbox.drain(),
        vec![ClientRequest::DeleteOrder { oid: OrderId(2) }]
    );
}

#[test]
fn per_side_cap_locks_one_half() {
    let mut list = OrderList::new(
        OrderCap {
            max_orders: 10,
            max_per_side: Some(2),
        },
        Default::default(),
    );
    confirmed(&mut list, 1, OrderSide::Sell);
    confirmed(&mut list, 2, OrderSide::Sell);
    confirmed(&mut list, 3, OrderSide::Buy);

    assert_eq!(
        list.side_locks(),
        SideLocks {
            sell_locked: true,
            buy_locked: false
        }
    );
}

#[test]
fn request_orders_sends_list_request() {
    let list = OrderList::default();
    let outbox = Outbox::new();
    list.request_orders(&outbox).expect("send");
    assert_eq!(outbox.drain(), vec![ClientRequest::GetOrdersForPlayer]);
}
