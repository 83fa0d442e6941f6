//! Regression coverage for the generic resource service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::test_fixtures::{MockClients, client, client_fields};
use crate::domain::{Client, ErrorCode, ResourceKind};

fn service(repo: MockClients) -> ResourceService<Client> {
    ResourceService::new(Arc::new(repo))
}

#[rstest]
#[tokio::test]
async fn create_returns_stored_record() {
    let id = Uuid::new_v4();
    let mut repo = MockClients::new();
    repo.expect_create()
        .withf(|draft| draft.first_name == "Aziza")
        .times(1)
        .return_once(move |_| Ok(client(id)));

    let created = service(repo)
        .create(client_fields())
        .await
        .expect("create succeeds");
    assert_eq!(created.id, id);
}

#[rstest]
#[tokio::test]
async fn update_of_missing_record_is_invalid_request() {
    let mut repo = MockClients::new();
    repo.expect_update().times(1).return_once(|_, _| Ok(0));
    repo.expect_get_by_id().never();

    let err = service(repo)
        .update(Uuid::new_v4(), client_fields())
        .await
        .expect_err("zero rows must surface as an error");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "no rows affected");
}

#[rstest]
#[tokio::test]
async fn update_returns_refreshed_record() {
    let id = Uuid::new_v4();
    let mut repo = MockClients::new();
    repo.expect_update().times(1).return_once(|_, _| Ok(1));
    repo.expect_get_by_id()
        .withf(move |requested| *requested == id)
        .times(1)
        .return_once(move |_| Ok(client(id)));

    let updated = service(repo)
        .update(id, client_fields())
        .await
        .expect("update succeeds");
    assert_eq!(updated.id, id);
}

#[rstest]
#[tokio::test]
async fn get_maps_not_found() {
    let id = Uuid::new_v4();
    let mut repo = MockClients::new();
    repo.expect_get_by_id()
        .return_once(move |_| Err(ResourceRepositoryError::not_found(ResourceKind::Client, id)));

    let err = service(repo).get(id).await.expect_err("missing client");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), format!("client {id} not found"));
}

#[rstest]
#[case(ResourceRepositoryError::connection("refused"))]
#[case(ResourceRepositoryError::query("syntax error"))]
#[tokio::test]
async fn storage_failures_are_internal(#[case] failure: ResourceRepositoryError) {
    let mut repo = MockClients::new();
    repo.expect_get_list().return_once(move |_| Err(failure));

    let err = service(repo)
        .list(ListRequest::default())
        .await
        .expect_err("storage failure");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn broken_references_are_bad_requests() {
    let mut repo = MockClients::new();
    repo.expect_delete().return_once(|_| {
        Err(ResourceRepositoryError::reference(
            "client is still referenced by an order",
        ))
    });

    let err = service(repo)
        .delete(Uuid::new_v4())
        .await
        .expect_err("referenced client");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "client is still referenced by an order");
}

#[rstest]
#[tokio::test]
async fn delete_of_missing_record_succeeds() {
    let mut repo = MockClients::new();
    repo.expect_delete().times(1).return_once(|_| Ok(()));

    service(repo)
        .delete(Uuid::new_v4())
        .await
        .expect("delete is idempotent");
}
