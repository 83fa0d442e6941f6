//! PostgreSQL-backed resource repositories.
//!
//! Every table gets the same CRUD shape, generated by
//! [`impl_resource_repository!`]. What differs per table is the list filter:
//! each `*_filter` function turns a [`ListRequest`] into a boxed query with
//! bound parameters. Filters are built twice per list call, once for the
//! `COUNT(*)` and once for the page itself, so both see the same predicate.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::Page;
use uuid::Uuid;

use crate::domain::ports::{OrderRepository, ResourceRepository, ResourceRepositoryError};
use crate::domain::{
    Branch, Category, Client, ListRequest, Order, OrderLineItem, OrderStatus, Predicate, Product,
    ReferenceField, Resource, ResourceKind,
};

use super::error_mapping::{map_resource_diesel_error, map_resource_pool_error};
use super::models::{
    BranchChangeset, BranchRow, CategoryChangeset, CategoryRow, ClientChangeset, ClientRow,
    LineItemChangeset, LineItemRow, NewBranchRow, NewCategoryRow, NewClientRow, NewLineItemRow,
    NewOrderRow, NewProductRow, OrderChangeset, OrderRow, ProductChangeset, ProductRow,
};
use super::pool::DbPool;
use super::schema::{branches, categories, clients, order_products, orders, products};

/// Wrap `term` for a case-insensitive substring match.
///
/// `%`, `_` and `\` in the caller's text match literally.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn unsupported_predicate(kind: ResourceKind, predicate: &Predicate) -> ResourceRepositoryError {
    ResourceRepositoryError::query(format!("{kind} lists do not support {predicate:?}"))
}

fn page_window(request: &ListRequest) -> Result<(i64, i64), ResourceRepositoryError> {
    let page = request.page();
    let offset = i64::try_from(page.offset())
        .map_err(|_| ResourceRepositoryError::query("requested offset exceeds i64 range"))?;
    Ok((i64::from(page.limit()), offset))
}

/// Generate a Diesel repository struct and its [`ResourceRepository`] impl.
///
/// The generated `create` inserts with a fresh v4 identifier and returns the
/// row as stored; `update` relies on the `set_updated_at` trigger.
macro_rules! impl_resource_repository {
    (
        $(#[$meta:meta])*
        $repo:ident for $resource:ty {
            table: $table:ident,
            row: $row:ident,
            new_row: $new_row:ident,
            changeset: $changeset:ident,
            filter: $filter:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $repo {
            pool: DbPool,
        }

        impl $repo {
            /// Create a repository backed by `pool`.
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }

        #[async_trait]
        impl ResourceRepository<$resource> for $repo {
            async fn create(
                &self,
                draft: &<$resource as Resource>::Draft,
            ) -> Result<$resource, ResourceRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_resource_pool_error)?;
                let row = $new_row::from_draft(Uuid::new_v4(), draft);
                let stored = diesel::insert_into($table::table)
                    .values(&row)
                    .returning($row::as_returning())
                    .get_result::<$row>(&mut conn)
                    .await
                    .map_err(map_resource_diesel_error)?;
                <$resource>::try_from(stored)
            }

            async fn get_by_id(&self, id: Uuid) -> Result<$resource, ResourceRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_resource_pool_error)?;
                let row = $table::table
                    .find(id)
                    .select($row::as_select())
                    .first::<$row>(&mut conn)
                    .await
                    .optional()
                    .map_err(map_resource_diesel_error)?
                    .ok_or_else(|| {
                        ResourceRepositoryError::not_found(<$resource as Resource>::KIND, id)
                    })?;
                <$resource>::try_from(row)
            }

            async fn get_list(
                &self,
                request: &ListRequest,
            ) -> Result<Page<$resource>, ResourceRepositoryError> {
                let (limit, offset) = page_window(request)?;
                let mut conn = self.pool.get().await.map_err(map_resource_pool_error)?;

                let total = $filter(request)?
                    .count()
                    .get_result::<i64>(&mut conn)
                    .await
                    .map_err(map_resource_diesel_error)?;
                let rows = $filter(request)?
                    .select($row::as_select())
                    .order(($table::created_at.desc(), $table::id.desc()))
                    .limit(limit)
                    .offset(offset)
                    .load::<$row>(&mut conn)
                    .await
                    .map_err(map_resource_diesel_error)?;

                let items = rows
                    .into_iter()
                    .map(<$resource>::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Page::new(items, u64::try_from(total).unwrap_or_default()))
            }

            async fn update(
                &self,
                id: Uuid,
                changes: &<$resource as Resource>::Changes,
            ) -> Result<u64, ResourceRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_resource_pool_error)?;
                let changeset = $changeset::from_changes(changes);
                let affected = diesel::update($table::table.find(id))
                    .set(&changeset)
                    .execute(&mut conn)
                    .await
                    .map_err(map_resource_diesel_error)?;
                Ok(u64::try_from(affected).unwrap_or(u64::MAX))
            }

            async fn delete(&self, id: Uuid) -> Result<(), ResourceRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_resource_pool_error)?;
                diesel::delete($table::table.find(id))
                    .execute(&mut conn)
                    .await
                    .map_err(map_resource_diesel_error)?;
                Ok(())
            }
        }
    };
}

fn client_filter(
    request: &ListRequest,
) -> Result<clients::BoxedQuery<'static, Pg>, ResourceRepositoryError> {
    let mut query = clients::table.into_boxed();
    if let Some(term) = request.search() {
        let pattern = contains_pattern(term);
        query = query.filter(
            clients::first_name
                .ilike(pattern.clone())
                .or(clients::last_name.ilike(pattern.clone()))
                .or(clients::phone.ilike(pattern)),
        );
    }
    for predicate in request.predicates() {
        query = match predicate {
            Predicate::IdIn(ids) => query.filter(clients::id.eq_any(ids.clone())),
            other => return Err(unsupported_predicate(ResourceKind::Client, other)),
        };
    }
    Ok(query)
}

fn branch_filter(
    request: &ListRequest,
) -> Result<branches::BoxedQuery<'static, Pg>, ResourceRepositoryError> {
    let mut query = branches::table.into_boxed();
    if let Some(term) = request.search() {
        query = query.filter(branches::name.ilike(contains_pattern(term)));
    }
    for predicate in request.predicates() {
        query = match predicate {
            Predicate::IdIn(ids) => query.filter(branches::id.eq_any(ids.clone())),
            Predicate::OpenAt(at) => query.filter(
                branches::work_start_hour
                    .le(at.as_str().to_owned())
                    .and(branches::work_end_hour.ge(at.as_str().to_owned())),
            ),
            other @ Predicate::ReferenceEq { .. } => {
                return Err(unsupported_predicate(ResourceKind::Branch, other));
            }
        };
    }
    Ok(query)
}

fn category_filter(
    request: &ListRequest,
) -> Result<categories::BoxedQuery<'static, Pg>, ResourceRepositoryError> {
    let mut query = categories::table.into_boxed();
    if let Some(term) = request.search() {
        query = query.filter(categories::title.ilike(contains_pattern(term)));
    }
    for predicate in request.predicates() {
        query = match predicate {
            Predicate::IdIn(ids) => query.filter(categories::id.eq_any(ids.clone())),
            Predicate::ReferenceEq {
                field: ReferenceField::Parent,
                id,
            } => query.filter(categories::parent_id.eq(*id)),
            other => return Err(unsupported_predicate(ResourceKind::Category, other)),
        };
    }
    Ok(query)
}

fn product_filter(
    request: &ListRequest,
) -> Result<products::BoxedQuery<'static, Pg>, ResourceRepositoryError> {
    let mut query = products::table.into_boxed();
    match (request.search_id(), request.search()) {
        (Some(category_id), _) => query = query.filter(products::category_id.eq(category_id)),
        (None, Some(term)) => query = query.filter(products::title.ilike(contains_pattern(term))),
        (None, None) => {}
    }
    for predicate in request.predicates() {
        query = match predicate {
            Predicate::IdIn(ids) => query.filter(products::id.eq_any(ids.clone())),
            Predicate::ReferenceEq {
                field: ReferenceField::Category,
                id,
            } => query.filter(products::category_id.eq(*id)),
            other => return Err(unsupported_predicate(ResourceKind::Product, other)),
        };
    }
    Ok(query)
}

fn order_filter(
    request: &ListRequest,
) -> Result<orders::BoxedQuery<'static, Pg>, ResourceRepositoryError> {
    let mut query = orders::table.into_boxed();
    match (request.search_id(), request.search()) {
        (Some(id), _) => {
            query = query.filter(orders::client_id.eq(id).or(orders::branch_id.eq(id)));
        }
        (None, Some(term)) => {
            query = query.filter(orders::order_code.ilike(contains_pattern(term)));
        }
        (None, None) => {}
    }
    for predicate in request.predicates() {
        query = match predicate {
            Predicate::IdIn(ids) => query.filter(orders::id.eq_any(ids.clone())),
            Predicate::ReferenceEq {
                field: ReferenceField::Client,
                id,
            } => query.filter(orders::client_id.eq(*id)),
            Predicate::ReferenceEq {
                field: ReferenceField::Branch,
                id,
            } => query.filter(orders::branch_id.eq(*id)),
            other => return Err(unsupported_predicate(ResourceKind::Order, other)),
        };
    }
    Ok(query)
}

fn line_item_filter(
    request: &ListRequest,
) -> Result<order_products::BoxedQuery<'static, Pg>, ResourceRepositoryError> {
    let mut query = order_products::table.into_boxed();
    match (request.search_id(), request.search()) {
        (Some(id), _) => {
            query = query.filter(
                order_products::order_id
                    .eq(id)
                    .or(order_products::product_id.eq(id)),
            );
        }
        (None, Some(term)) => {
            query = query.filter(order_products::discount_type.ilike(contains_pattern(term)));
        }
        (None, None) => {}
    }
    for predicate in request.predicates() {
        query = match predicate {
            Predicate::IdIn(ids) => query.filter(order_products::id.eq_any(ids.clone())),
            Predicate::ReferenceEq {
                field: ReferenceField::Order,
                id,
            } => query.filter(order_products::order_id.eq(*id)),
            Predicate::ReferenceEq {
                field: ReferenceField::Product,
                id,
            } => query.filter(order_products::product_id.eq(*id)),
            other => return Err(unsupported_predicate(ResourceKind::OrderLineItem, other)),
        };
    }
    Ok(query)
}

impl_resource_repository! {
    /// Diesel-backed client storage.
    DieselClientRepository for Client {
        table: clients,
        row: ClientRow,
        new_row: NewClientRow,
        changeset: ClientChangeset,
        filter: client_filter,
    }
}

impl_resource_repository! {
    /// Diesel-backed branch storage.
    DieselBranchRepository for Branch {
        table: branches,
        row: BranchRow,
        new_row: NewBranchRow,
        changeset: BranchChangeset,
        filter: branch_filter,
    }
}

impl_resource_repository! {
    /// Diesel-backed category storage.
    DieselCategoryRepository for Category {
        table: categories,
        row: CategoryRow,
        new_row: NewCategoryRow,
        changeset: CategoryChangeset,
        filter: category_filter,
    }
}

impl_resource_repository! {
    /// Diesel-backed product storage.
    DieselProductRepository for Product {
        table: products,
        row: ProductRow,
        new_row: NewProductRow,
        changeset: ProductChangeset,
        filter: product_filter,
    }
}

impl_resource_repository! {
    /// Diesel-backed order storage, including guarded status writes.
    DieselOrderRepository for Order {
        table: orders,
        row: OrderRow,
        new_row: NewOrderRow,
        changeset: OrderChangeset,
        filter: order_filter,
    }
}

impl_resource_repository! {
    /// Diesel-backed order line item storage.
    DieselOrderLineItemRepository for OrderLineItem {
        table: order_products,
        row: LineItemRow,
        new_row: NewLineItemRow,
        changeset: LineItemChangeset,
        filter: line_item_filter,
    }
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn transition_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, ResourceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_resource_pool_error)?;
        let row = diesel::update(
            orders::table
                .filter(orders::id.eq(id))
                .filter(orders::status.eq(expected.as_str())),
        )
        .set(orders::status.eq(to.as_str()))
        .returning(OrderRow::as_returning())
        .get_result::<OrderRow>(&mut conn)
        .await
        .optional()
        .map_err(map_resource_diesel_error)?;
        row.map(Order::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for filter construction that needs no database.

    use super::*;
    use crate::domain::WorkHour;
    use diesel::debug_query;
    use pagination::PageRequest;
    use rstest::rstest;

    #[rstest]
    #[case("milk", "%milk%")]
    #[case("50%", "%50\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("c:\\tmp", "%c:\\\\tmp%")]
    fn contains_pattern_escapes_wildcards(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(term), expected);
    }

    #[rstest]
    fn branch_filter_binds_open_at_window() {
        let hour = WorkHour::parse("10:15").expect("valid hour");
        let request = ListRequest::default()
            .with_search(Some("central"))
            .with_predicate(Predicate::OpenAt(hour));
        let query = branch_filter(&request).expect("supported predicate");
        let sql = debug_query::<Pg, _>(&query).to_string();

        assert!(sql.contains("ILIKE"), "{sql}");
        assert!(sql.contains("\"work_start_hour\" <="), "{sql}");
        assert!(sql.contains("\"10:15\""), "{sql}");
        assert!(sql.contains("\"%central%\""), "{sql}");
    }

    #[rstest]
    fn product_search_by_identifier_filters_category() {
        let id = Uuid::new_v4();
        let request = ListRequest::default().with_search(Some(id.to_string()));
        let query = product_filter(&request).expect("filter builds");
        let sql = debug_query::<Pg, _>(&query).to_string();

        assert!(sql.contains("\"category_id\" = $1"), "{sql}");
        assert!(!sql.contains("ILIKE"), "{sql}");
    }

    #[rstest]
    fn unsupported_predicates_are_rejected() {
        let request = ListRequest::default().with_predicate(Predicate::ReferenceEq {
            field: ReferenceField::Order,
            id: Uuid::new_v4(),
        });
        let Err(err) = client_filter(&request) else {
            panic!("client lists have no order reference");
        };
        assert!(matches!(err, ResourceRepositoryError::Query { .. }));
    }

    #[rstest]
    fn page_window_uses_normalised_values() {
        let request = ListRequest::new(PageRequest::new(Some(25), Some(50)));
        assert_eq!(page_window(&request).expect("window fits"), (25, 50));
    }
}
