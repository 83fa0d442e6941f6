//! Regression coverage for order creation and the status workflow.

use std::sync::{Arc, Mutex};

use rstest::rstest;

use super::*;
use crate::domain::ports::MockCodeSequence;
use crate::domain::test_fixtures::{MockBranches, MockOrders, branch, money, order, order_fields};
use crate::domain::{BusinessCode, ErrorCode, ResourceKind};

fn sequence() -> MockCodeSequence {
    let mut codes = MockCodeSequence::new();
    codes
        .expect_next_code()
        .returning(|kind| Ok(BusinessCode::format(kind, 41)));
    codes
}

fn service(orders: MockOrders, branches: MockBranches, codes: MockCodeSequence) -> OrderService {
    OrderService::new(Arc::new(orders), Arc::new(branches), Arc::new(codes))
}

fn stored_from(draft: &OrderDraft) -> Order {
    Order {
        id: Uuid::new_v4(),
        order_code: draft.code.clone(),
        fields: draft.fields.clone(),
        delivery_price: draft.delivery_price.clone(),
        status: OrderStatus::New,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

#[rstest]
#[tokio::test]
async fn create_snapshots_branch_delivery_price() {
    let branch_id = Uuid::new_v4();
    let current_price = Arc::new(Mutex::new("5.00"));
    let mut branches = MockBranches::new();
    let price_source = Arc::clone(&current_price);
    branches.expect_get_by_id().returning(move |id| {
        let price = *price_source.lock().expect("price lock");
        Ok(branch(id, price))
    });
    let mut orders = MockOrders::new();
    orders
        .expect_create()
        .times(2)
        .returning(|draft| Ok(stored_from(draft)));
    let service = service(orders, branches, sequence());

    let first = service
        .create(order_fields(branch_id))
        .await
        .expect("first order");
    *current_price.lock().expect("price lock") = "9.00";
    let second = service
        .create(order_fields(branch_id))
        .await
        .expect("second order");

    assert_eq!(first.delivery_price, money("5.00"));
    assert_eq!(second.delivery_price, money("9.00"));
    assert_eq!(first.order_code.as_str(), "O-000041");
    assert_eq!(first.status, OrderStatus::New);
}

#[rstest]
#[tokio::test]
async fn create_against_missing_branch_is_not_found() {
    let mut branches = MockBranches::new();
    branches
        .expect_get_by_id()
        .return_once(|id| Err(ResourceRepositoryError::not_found(ResourceKind::Branch, id)));
    let mut orders = MockOrders::new();
    orders.expect_create().never();
    let mut codes = MockCodeSequence::new();
    codes.expect_next_code().never();

    let err = service(orders, branches, codes)
        .create(order_fields(Uuid::new_v4()))
        .await
        .expect_err("missing branch");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(OrderStatus::New, OrderStatus::Canceled)]
#[case(OrderStatus::New, OrderStatus::InProcess)]
#[case(OrderStatus::InProcess, OrderStatus::Finished)]
#[tokio::test]
async fn transition_applies_guarded_write(#[case] from: OrderStatus, #[case] to: OrderStatus) {
    let id = Uuid::new_v4();
    let mut orders = MockOrders::new();
    orders
        .expect_get_by_id()
        .times(1)
        .return_once(move |_| Ok(order(id, from)));
    orders
        .expect_transition_status()
        .withf(move |requested, expected, target| {
            *requested == id && *expected == from && *target == to
        })
        .times(1)
        .return_once(move |_, _, _| Ok(Some(order(id, to))));

    let updated = service(orders, MockBranches::new(), MockCodeSequence::new())
        .transition(id, to)
        .await
        .expect("legal transition");
    assert_eq!(updated.status, to);
}

#[rstest]
#[case(OrderStatus::New, OrderStatus::Finished)]
#[case(OrderStatus::Finished, OrderStatus::Canceled)]
#[case(OrderStatus::Finished, OrderStatus::New)]
#[case(OrderStatus::Canceled, OrderStatus::InProcess)]
#[case(OrderStatus::Canceled, OrderStatus::Canceled)]
#[tokio::test]
async fn transition_rejects_moves_outside_table(
    #[case] from: OrderStatus,
    #[case] to: OrderStatus,
) {
    let id = Uuid::new_v4();
    let mut orders = MockOrders::new();
    orders
        .expect_get_by_id()
        .return_once(move |_| Ok(order(id, from)));
    orders.expect_transition_status().never();

    let err = service(orders, MockBranches::new(), MockCodeSequence::new())
        .transition(id, to)
        .await
        .expect_err("illegal transition");
    assert_eq!(err.code(), ErrorCode::InvalidTransition);
    assert_eq!(
        err.details(),
        Some(&json!({ "from": from.as_str(), "to": to.as_str() }))
    );
}

#[rstest]
#[tokio::test]
async fn transition_revalidates_after_losing_a_race() {
    let id = Uuid::new_v4();
    let reads = Arc::new(Mutex::new(vec![OrderStatus::Canceled, OrderStatus::New]));
    let mut orders = MockOrders::new();
    let read_source = Arc::clone(&reads);
    orders.expect_get_by_id().times(2).returning(move |_| {
        let status = read_source
            .lock()
            .expect("reads lock")
            .pop()
            .expect("scripted read");
        Ok(order(id, status))
    });
    orders
        .expect_transition_status()
        .times(1)
        .return_once(|_, _, _| Ok(None));

    let err = service(orders, MockBranches::new(), MockCodeSequence::new())
        .transition(id, OrderStatus::InProcess)
        .await
        .expect_err("order was canceled concurrently");
    assert_eq!(err.code(), ErrorCode::InvalidTransition);
}

#[rstest]
#[tokio::test]
async fn transition_reports_conflict_after_repeated_races() {
    let id = Uuid::new_v4();
    let mut orders = MockOrders::new();
    orders
        .expect_get_by_id()
        .times(MAX_TRANSITION_ATTEMPTS)
        .returning(move |_| Ok(order(id, OrderStatus::New)));
    orders
        .expect_transition_status()
        .times(MAX_TRANSITION_ATTEMPTS)
        .returning(|_, _, _| Ok(None));

    let err = service(orders, MockBranches::new(), MockCodeSequence::new())
        .transition(id, OrderStatus::Canceled)
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn transition_surfaces_unsupported_stored_state() {
    let mut orders = MockOrders::new();
    orders.expect_get_by_id().return_once(|_| {
        Err(ResourceRepositoryError::unsupported_state(
            "unsupported order status: 'shipped'",
        ))
    });
    orders.expect_transition_status().never();

    let err = service(orders, MockBranches::new(), MockCodeSequence::new())
        .transition(Uuid::new_v4(), OrderStatus::Canceled)
        .await
        .expect_err("corrupt order");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn update_of_missing_order_is_invalid_request() {
    let mut orders = MockOrders::new();
    orders.expect_update().return_once(|_, _| Ok(0));

    let err = service(orders, MockBranches::new(), MockCodeSequence::new())
        .update(Uuid::new_v4(), order_fields(Uuid::new_v4()))
        .await
        .expect_err("missing order");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
