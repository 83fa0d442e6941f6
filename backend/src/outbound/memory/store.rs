//! Mutex-guarded in-memory implementations of the driven ports.

use std::cmp::Reverse;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use uuid::Uuid;

use crate::domain::ports::{
    CodeSequence, CodeSequenceError, OrderRepository, ResourceRepository, ResourceRepositoryError,
    StorageProbe,
};
use crate::domain::{
    BusinessCode, CodeKind, ListRequest, Order, OrderStatus, ResourceKind,
};

use super::links::{restricts, LinkedStore, MemoryLinks};
use super::records::MemoryRecord;

/// Volatile storage for one entity kind.
pub struct InMemoryResourceRepository<R> {
    rows: Mutex<Vec<R>>,
    clock: Arc<dyn Clock>,
    links: Option<Arc<MemoryLinks>>,
}

impl<R: MemoryRecord> InMemoryResourceRepository<R> {
    /// Empty standalone store stamping rows with `clock`.
    ///
    /// References to other entity kinds are not checked.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            clock,
            links: None,
        }
    }

    /// Empty store registered with `links`, so its records' references are
    /// enforced against the sibling stores and theirs against this one.
    pub fn linked(clock: Arc<dyn Clock>, links: &Arc<MemoryLinks>) -> Arc<Self> {
        let store = Arc::new(Self {
            rows: Mutex::new(Vec::new()),
            clock,
            links: Some(Arc::clone(links)),
        });
        let weak: Weak<Self> = Arc::downgrade(&store);
        links.register(weak);
        store
    }

    fn ensure_targets(&self, record: &R) -> Result<(), ResourceRepositoryError> {
        match &self.links {
            Some(links) => links.ensure_targets(&record.references()),
            None => Ok(()),
        }
    }

    fn rows(&self) -> Result<MutexGuard<'_, Vec<R>>, ResourceRepositoryError> {
        self.rows.lock().map_err(|_| {
            ResourceRepositoryError::connection(format!("{} store lock poisoned", R::KIND))
        })
    }

    fn matches(
        record: &R,
        request: &ListRequest,
        needle: Option<&str>,
    ) -> Result<bool, ResourceRepositoryError> {
        if let Some(needle) = needle {
            if !record.matches_search(needle, request.search_id()) {
                return Ok(false);
            }
        }
        for predicate in request.predicates() {
            let matched = record.matches_predicate(predicate).ok_or_else(|| {
                ResourceRepositoryError::query(format!(
                    "{} lists do not support {predicate:?}",
                    R::KIND
                ))
            })?;
            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl<R: MemoryRecord> ResourceRepository<R> for InMemoryResourceRepository<R> {
    async fn create(&self, draft: &R::Draft) -> Result<R, ResourceRepositoryError> {
        let record = R::materialize(Uuid::new_v4(), draft, self.clock.utc());
        self.ensure_targets(&record)?;
        self.rows()?.push(record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<R, ResourceRepositoryError> {
        self.rows()?
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| ResourceRepositoryError::not_found(R::KIND, id))
    }

    async fn get_list(&self, request: &ListRequest) -> Result<Page<R>, ResourceRepositoryError> {
        let needle = request.search().map(str::to_lowercase);
        let mut matched = Vec::new();
        for record in self.rows()?.iter() {
            if Self::matches(record, request, needle.as_deref())? {
                matched.push(record.clone());
            }
        }
        matched.sort_by_key(|record| Reverse((record.created_at(), record.id())));

        let page = request.page();
        let total = u64::try_from(matched.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items = matched.into_iter().skip(skip).take(take).collect();
        Ok(Page::new(items, total))
    }

    async fn update(&self, id: Uuid, changes: &R::Changes) -> Result<u64, ResourceRepositoryError> {
        let current = {
            let rows = self.rows()?;
            rows.iter().find(|record| record.id() == id).cloned()
        };
        let Some(mut updated) = current else {
            return Ok(0);
        };
        updated.apply(changes, self.clock.utc());
        self.ensure_targets(&updated)?;

        let mut rows = self.rows()?;
        let Some(slot) = rows.iter_mut().find(|record| record.id() == id) else {
            return Ok(0);
        };
        *slot = updated;
        Ok(1)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ResourceRepositoryError> {
        if let Some(links) = &self.links {
            links.detach(R::KIND, id)?;
        }
        self.rows()?.retain(|record| record.id() != id);
        Ok(())
    }
}

impl<R: MemoryRecord> LinkedStore for InMemoryResourceRepository<R> {
    fn kind(&self) -> ResourceKind {
        R::KIND
    }

    fn contains(&self, id: Uuid) -> Result<bool, ResourceRepositoryError> {
        Ok(self.rows()?.iter().any(|record| record.id() == id))
    }

    fn restricting(
        &self,
        kind: ResourceKind,
        id: Uuid,
    ) -> Result<Option<Uuid>, ResourceRepositoryError> {
        Ok(self
            .rows()?
            .iter()
            .find(|record| restricts(&record.references(), kind, id))
            .map(|record| record.id()))
    }

    fn release(&self, kind: ResourceKind, id: Uuid) -> Result<(), ResourceRepositoryError> {
        let now = self.clock.utc();
        for record in self.rows()?.iter_mut() {
            record.clear_reference(kind, id, now);
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryResourceRepository<Order> {
    async fn transition_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, ResourceRepositoryError> {
        let now = self.clock.utc();
        let mut rows = self.rows()?;
        let Some(order) = rows
            .iter_mut()
            .find(|order| order.id == id && order.status == expected)
        else {
            return Ok(None);
        };
        order.status = to;
        order.updated_at = now;
        Ok(Some(order.clone()))
    }
}

/// Process-local code counters starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryCodeSequence {
    orders: AtomicI64,
    products: AtomicI64,
}

#[async_trait]
impl CodeSequence for InMemoryCodeSequence {
    async fn next_code(&self, kind: CodeKind) -> Result<BusinessCode, CodeSequenceError> {
        let counter = match kind {
            CodeKind::Order => &self.orders,
            CodeKind::Product => &self.products,
        };
        let value = counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(BusinessCode::format(kind, value))
    }
}

/// Probe for the in-memory backend; always ready.
#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryStorageProbe;

#[async_trait]
impl StorageProbe for InMemoryStorageProbe {
    async fn ping(&self) -> Result<(), ResourceRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage for the in-memory adapters.

    use std::sync::atomic::AtomicU32;

    use chrono::{DateTime, Duration, Local, Utc};
    use pagination::PageRequest;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::Repositories;
    use crate::domain::Resource;
    use crate::domain::test_fixtures::{
        branch_fields, client_fields, fixture_timestamp, hour, order_fields, product_fields,
        FixtureClock,
    };
    use crate::domain::{
        Branch, CategoryFields, Client, ClientFields, LineItemFields, Money, OrderDraft,
        OrderFields, Predicate, ProductDraft,
    };
    use crate::outbound::memory::repositories;

    /// Advances one second per reading so insert order is observable.
    #[derive(Default)]
    struct SteppingClock {
        ticks: AtomicU32,
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            fixture_timestamp() + Duration::seconds(i64::from(tick))
        }
    }

    #[fixture]
    fn clients() -> InMemoryResourceRepository<Client> {
        InMemoryResourceRepository::new(Arc::new(SteppingClock::default()))
    }

    #[fixture]
    fn database() -> Repositories {
        repositories(Arc::new(FixtureClock::at(12, 0)))
    }

    fn order_draft(fields: OrderFields) -> OrderDraft {
        OrderDraft {
            code: BusinessCode::format(CodeKind::Order, 1),
            delivery_price: Money::zero(),
            fields,
        }
    }

    fn product_draft(category_id: Option<Uuid>) -> ProductDraft {
        ProductDraft {
            code: BusinessCode::format(CodeKind::Product, 1),
            fields: product_fields(category_id),
        }
    }

    fn category_fields(title: &str, parent_id: Option<Uuid>) -> CategoryFields {
        CategoryFields {
            title: title.to_owned(),
            parent_id,
            image: String::new(),
        }
    }

    fn named(first_name: &str) -> ClientFields {
        ClientFields {
            first_name: first_name.to_owned(),
            ..client_fields()
        }
    }

    #[rstest]
    #[actix_rt::test]
    async fn lists_newest_first_with_total(clients: InMemoryResourceRepository<Client>) {
        for name in ["Ann", "Bob", "Cid"] {
            clients.create(&named(name)).await.expect("insert");
        }

        let request = ListRequest::new(PageRequest::new(Some(2), Some(0)));
        let page = clients.get_list(&request).await.expect("list");

        assert_eq!(page.total_count, 3);
        let names: Vec<_> = page.items.iter().map(|c| c.fields.first_name.as_str()).collect();
        assert_eq!(names, ["Cid", "Bob"]);
    }

    #[rstest]
    #[actix_rt::test]
    async fn equal_timestamps_fall_back_to_descending_ids() {
        let clients: InMemoryResourceRepository<Client> =
            InMemoryResourceRepository::new(Arc::new(FixtureClock::at(12, 0)));
        let mut expected = Vec::new();
        for name in ["Ann", "Bob", "Cid"] {
            expected.push(clients.create(&named(name)).await.expect("insert").id);
        }
        expected.sort_unstable_by(|left, right| right.cmp(left));

        let mut paged = Vec::new();
        for offset in 0..3 {
            let request = ListRequest::new(PageRequest::new(Some(1), Some(offset)));
            let page = clients.get_list(&request).await.expect("list");
            assert_eq!(page.total_count, 3);
            paged.extend(page.items.iter().map(|client| client.id));
        }

        assert_eq!(paged, expected);
    }

    #[rstest]
    #[actix_rt::test]
    async fn search_is_case_insensitive_and_counted(clients: InMemoryResourceRepository<Client>) {
        for name in ["Anvar", "Bekzod", "Anora"] {
            clients.create(&named(name)).await.expect("insert");
        }

        let request = ListRequest::new(PageRequest::new(Some(1), Some(0))).with_search(Some("an"));
        let page = clients.get_list(&request).await.expect("list");

        assert_eq!(page.total_count, 2);
        assert_eq!(page.items.len(), 1);
    }

    #[rstest]
    #[actix_rt::test]
    async fn update_and_delete_report_missing_rows(clients: InMemoryResourceRepository<Client>) {
        let missing = Uuid::new_v4();
        assert_eq!(clients.update(missing, &client_fields()).await.expect("update"), 0);
        clients.delete(missing).await.expect("deleting a missing row succeeds");

        let err = clients.get_by_id(missing).await.expect_err("row is absent");
        assert_eq!(err, ResourceRepositoryError::not_found(Client::KIND, missing));
    }

    #[rstest]
    #[actix_rt::test]
    async fn update_refreshes_timestamp(clients: InMemoryResourceRepository<Client>) {
        let created = clients.create(&client_fields()).await.expect("insert");
        let affected = clients.update(created.id, &named("Renamed")).await.expect("update");
        let stored = clients.get_by_id(created.id).await.expect("fetch");

        assert_eq!(affected, 1);
        assert_eq!(stored.fields.first_name, "Renamed");
        assert!(stored.updated_at > created.updated_at);
        assert_eq!(stored.created_at, created.created_at);
    }

    #[rstest]
    #[actix_rt::test]
    async fn unsupported_predicates_fail(clients: InMemoryResourceRepository<Client>) {
        clients.create(&client_fields()).await.expect("insert");
        let request = ListRequest::default().with_predicate(Predicate::OpenAt(hour("10:00")));

        let err = clients.get_list(&request).await.expect_err("clients have no hours");
        assert!(matches!(err, ResourceRepositoryError::Query { .. }));
    }

    #[rstest]
    #[actix_rt::test]
    async fn open_at_filters_branches() {
        let branches: InMemoryResourceRepository<Branch> =
            InMemoryResourceRepository::new(Arc::new(SteppingClock::default()));
        branches.create(&branch_fields("0")).await.expect("insert");
        let mut late = branch_fields("0");
        late.work_start_hour = hour("20:00");
        late.work_end_hour = hour("23:00");
        branches.create(&late).await.expect("insert");

        let request = ListRequest::default().with_predicate(Predicate::OpenAt(hour("21:30")));
        let page = branches.get_list(&request).await.expect("list");

        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].fields.work_start_hour, hour("20:00"));
    }

    #[rstest]
    #[actix_rt::test]
    async fn transition_requires_expected_status() {
        let orders: InMemoryResourceRepository<Order> =
            InMemoryResourceRepository::new(Arc::new(SteppingClock::default()));
        let draft = OrderDraft {
            code: BusinessCode::format(CodeKind::Order, 1),
            delivery_price: "12.5".parse().expect("amount"),
            fields: order_fields(Uuid::new_v4()),
        };
        let order = orders.create(&draft).await.expect("insert");
        assert_eq!(order.status, OrderStatus::New);

        let stale = orders
            .transition_status(order.id, OrderStatus::InProcess, OrderStatus::Finished)
            .await
            .expect("guarded write");
        assert!(stale.is_none());

        let moved = orders
            .transition_status(order.id, OrderStatus::New, OrderStatus::InProcess)
            .await
            .expect("guarded write")
            .expect("status matched");
        assert_eq!(moved.status, OrderStatus::InProcess);
    }

    #[rstest]
    #[actix_rt::test]
    async fn linked_stores_reject_dangling_references(database: Repositories) {
        let branch = database
            .branches
            .create(&branch_fields("0"))
            .await
            .expect("branch");

        let err = database
            .orders
            .create(&order_draft(order_fields(branch.id)))
            .await
            .expect_err("order for an unknown client");
        assert!(matches!(err, ResourceRepositoryError::Reference { .. }), "{err}");

        let err = database
            .products
            .create(&product_draft(Some(Uuid::new_v4())))
            .await
            .expect_err("product in an unknown category");
        assert!(matches!(err, ResourceRepositoryError::Reference { .. }), "{err}");

        let err = database
            .order_products
            .create(&LineItemFields {
                order_id: Uuid::new_v4(),
                product_id: Uuid::new_v4(),
                discount_type: String::new(),
                discount_amount: Money::zero(),
                quantity: 1,
                price: Money::zero(),
                sum: Money::zero(),
            })
            .await
            .expect_err("line for an unknown product");
        assert!(matches!(err, ResourceRepositoryError::Reference { .. }), "{err}");
    }

    #[rstest]
    #[actix_rt::test]
    async fn updates_cannot_point_at_missing_rows(database: Repositories) {
        let client = database.clients.create(&client_fields()).await.expect("client");
        let branch = database
            .branches
            .create(&branch_fields("0"))
            .await
            .expect("branch");
        let fields = OrderFields {
            client_id: client.id,
            ..order_fields(branch.id)
        };
        let order = database
            .orders
            .create(&order_draft(fields.clone()))
            .await
            .expect("order");

        let moved = OrderFields {
            branch_id: Uuid::new_v4(),
            ..fields
        };
        let err = database
            .orders
            .update(order.id, &moved)
            .await
            .expect_err("unknown branch");
        assert!(matches!(err, ResourceRepositoryError::Reference { .. }), "{err}");

        let stored = database.orders.get_by_id(order.id).await.expect("order kept");
        assert_eq!(stored.fields.branch_id, branch.id);
    }

    #[rstest]
    #[actix_rt::test]
    async fn required_references_block_deletes(database: Repositories) {
        let client = database.clients.create(&client_fields()).await.expect("client");
        let branch = database
            .branches
            .create(&branch_fields("0"))
            .await
            .expect("branch");
        let fields = OrderFields {
            client_id: client.id,
            ..order_fields(branch.id)
        };
        let order = database
            .orders
            .create(&order_draft(fields))
            .await
            .expect("order");

        let err = database
            .clients
            .delete(client.id)
            .await
            .expect_err("client still has an order");
        assert!(matches!(err, ResourceRepositoryError::Reference { .. }), "{err}");
        database.clients.get_by_id(client.id).await.expect("client kept");

        database.orders.delete(order.id).await.expect("order deleted");
        database
            .clients
            .delete(client.id)
            .await
            .expect("client is free once the order is gone");
    }

    #[rstest]
    #[actix_rt::test]
    async fn optional_references_are_cleared_on_delete(database: Repositories) {
        let drinks = database
            .categories
            .create(&category_fields("Drinks", None))
            .await
            .expect("parent");
        let tea = database
            .categories
            .create(&category_fields("Tea", Some(drinks.id)))
            .await
            .expect("child");
        let product = database
            .products
            .create(&product_draft(Some(drinks.id)))
            .await
            .expect("product");

        database
            .categories
            .delete(drinks.id)
            .await
            .expect("nullable references do not block");

        let tea = database.categories.get_by_id(tea.id).await.expect("child kept");
        assert_eq!(tea.fields.parent_id, None);
        let product = database.products.get_by_id(product.id).await.expect("product kept");
        assert_eq!(product.fields.category_id, None);
    }

    #[rstest]
    #[actix_rt::test]
    async fn code_sequences_are_independent() {
        let codes = InMemoryCodeSequence::default();
        let first = codes.next_code(CodeKind::Order).await.expect("code");
        let second = codes.next_code(CodeKind::Order).await.expect("code");
        let product = codes.next_code(CodeKind::Product).await.expect("code");

        assert_eq!(first.as_str(), "O-000001");
        assert_eq!(second.as_str(), "O-000002");
        assert_eq!(product.as_str(), "P-000001");
    }
}
