//! Diesel row types and their conversions to domain entities.
//!
//! Each table has a queryable row, a borrowed insert row built from the
//! entity's draft and an overwrite changeset built from its changes. Rows
//! that cannot be represented in the domain surface as
//! [`ResourceRepositoryError::UnsupportedState`].

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::ResourceRepositoryError;
use crate::domain::{
    Branch, BranchFields, BusinessCode, Category, CategoryFields, Client, ClientFields,
    LineItemFields, Money, Order, OrderDraft, OrderFields, OrderLineItem, OrderStatus, Product,
    ProductDraft, ProductFields, WorkHour,
};

use super::schema::{branches, categories, clients, order_products, orders, products};

fn decode_money(column: &str, value: BigDecimal) -> Result<Money, ResourceRepositoryError> {
    Money::new(value)
        .map_err(|err| ResourceRepositoryError::unsupported_state(format!("{column}: {err}")))
}

fn decode_hour(column: &str, value: String) -> Result<WorkHour, ResourceRepositoryError> {
    WorkHour::parse(value)
        .map_err(|err| ResourceRepositoryError::unsupported_state(format!("{column}: {err}")))
}

// ---------------------------------------------------------------------------
// clients
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClientRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub photo: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = clients)]
pub(crate) struct NewClientRow<'a> {
    pub id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub photo: &'a str,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = clients)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ClientChangeset<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub photo: &'a str,
    pub date_of_birth: Option<NaiveDate>,
}

impl<'a> NewClientRow<'a> {
    pub(crate) fn from_draft(id: Uuid, draft: &'a ClientFields) -> Self {
        Self {
            id,
            first_name: &draft.first_name,
            last_name: &draft.last_name,
            phone: &draft.phone,
            photo: &draft.photo,
            date_of_birth: draft.date_of_birth,
        }
    }
}

impl<'a> ClientChangeset<'a> {
    pub(crate) fn from_changes(changes: &'a ClientFields) -> Self {
        Self {
            first_name: &changes.first_name,
            last_name: &changes.last_name,
            phone: &changes.phone,
            photo: &changes.photo,
            date_of_birth: changes.date_of_birth,
        }
    }
}

impl TryFrom<ClientRow> for Client {
    type Error = ResourceRepositoryError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            fields: ClientFields {
                first_name: row.first_name,
                last_name: row.last_name,
                phone: row.phone,
                photo: row.photo,
                date_of_birth: row.date_of_birth,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// branches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = branches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BranchRow {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub photo: String,
    pub work_start_hour: String,
    pub work_end_hour: String,
    pub address: String,
    pub delivery_price: BigDecimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = branches)]
pub(crate) struct NewBranchRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub phone: &'a str,
    pub photo: &'a str,
    pub work_start_hour: &'a str,
    pub work_end_hour: &'a str,
    pub address: &'a str,
    pub delivery_price: BigDecimal,
    pub active: bool,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = branches)]
pub(crate) struct BranchChangeset<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub photo: &'a str,
    pub work_start_hour: &'a str,
    pub work_end_hour: &'a str,
    pub address: &'a str,
    pub delivery_price: BigDecimal,
    pub active: bool,
}

impl<'a> NewBranchRow<'a> {
    pub(crate) fn from_draft(id: Uuid, draft: &'a BranchFields) -> Self {
        Self {
            id,
            name: &draft.name,
            phone: &draft.phone,
            photo: &draft.photo,
            work_start_hour: draft.work_start_hour.as_str(),
            work_end_hour: draft.work_end_hour.as_str(),
            address: &draft.address,
            delivery_price: draft.delivery_price.as_decimal().clone(),
            active: draft.active,
        }
    }
}

impl<'a> BranchChangeset<'a> {
    pub(crate) fn from_changes(changes: &'a BranchFields) -> Self {
        Self {
            name: &changes.name,
            phone: &changes.phone,
            photo: &changes.photo,
            work_start_hour: changes.work_start_hour.as_str(),
            work_end_hour: changes.work_end_hour.as_str(),
            address: &changes.address,
            delivery_price: changes.delivery_price.as_decimal().clone(),
            active: changes.active,
        }
    }
}

impl TryFrom<BranchRow> for Branch {
    type Error = ResourceRepositoryError;

    fn try_from(row: BranchRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            fields: BranchFields {
                name: row.name,
                phone: row.phone,
                photo: row.photo,
                work_start_hour: decode_hour("work_start_hour", row.work_start_hour)?,
                work_end_hour: decode_hour("work_end_hour", row.work_end_hour)?,
                address: row.address,
                delivery_price: decode_money("delivery_price", row.delivery_price)?,
                active: row.active,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: Uuid,
    pub title: String,
    pub parent_id: Option<Uuid>,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = categories)]
pub(crate) struct NewCategoryRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub parent_id: Option<Uuid>,
    pub image: &'a str,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = categories)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CategoryChangeset<'a> {
    pub title: &'a str,
    pub parent_id: Option<Uuid>,
    pub image: &'a str,
}

impl<'a> NewCategoryRow<'a> {
    pub(crate) fn from_draft(id: Uuid, draft: &'a CategoryFields) -> Self {
        Self {
            id,
            title: &draft.title,
            parent_id: draft.parent_id,
            image: &draft.image,
        }
    }
}

impl<'a> CategoryChangeset<'a> {
    pub(crate) fn from_changes(changes: &'a CategoryFields) -> Self {
        Self {
            title: &changes.title,
            parent_id: changes.parent_id,
            image: &changes.image,
        }
    }
}

impl TryFrom<CategoryRow> for Category {
    type Error = ResourceRepositoryError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            fields: CategoryFields {
                title: row.title,
                parent_id: row.parent_id,
                image: row.image,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: Uuid,
    pub product_code: String,
    pub title: String,
    pub description: String,
    pub price: BigDecimal,
    pub photo: String,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub id: Uuid,
    pub product_code: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub price: BigDecimal,
    pub photo: &'a str,
    pub category_id: Option<Uuid>,
}

/// Overwrite changeset; the product code is immutable.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProductChangeset<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub price: BigDecimal,
    pub photo: &'a str,
    pub category_id: Option<Uuid>,
}

impl<'a> NewProductRow<'a> {
    pub(crate) fn from_draft(id: Uuid, draft: &'a ProductDraft) -> Self {
        let fields = &draft.fields;
        Self {
            id,
            product_code: draft.code.as_str(),
            title: &fields.title,
            description: &fields.description,
            price: fields.price.as_decimal().clone(),
            photo: &fields.photo,
            category_id: fields.category_id,
        }
    }
}

impl<'a> ProductChangeset<'a> {
    pub(crate) fn from_changes(changes: &'a ProductFields) -> Self {
        Self {
            title: &changes.title,
            description: &changes.description,
            price: changes.price.as_decimal().clone(),
            photo: &changes.photo,
            category_id: changes.category_id,
        }
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = ResourceRepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            product_code: BusinessCode::from_stored(row.product_code),
            fields: ProductFields {
                title: row.title,
                description: row.description,
                price: decode_money("price", row.price)?,
                photo: row.photo,
                category_id: row.category_id,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub order_code: String,
    pub client_id: Uuid,
    pub branch_id: Uuid,
    pub address: String,
    pub delivery_price: BigDecimal,
    pub total_count: i32,
    pub total_price: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub id: Uuid,
    pub order_code: &'a str,
    pub client_id: Uuid,
    pub branch_id: Uuid,
    pub address: &'a str,
    pub delivery_price: BigDecimal,
    pub total_count: i32,
    pub total_price: BigDecimal,
    pub status: &'static str,
}

/// Overwrite changeset; code, delivery price and status are not editable.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
pub(crate) struct OrderChangeset<'a> {
    pub client_id: Uuid,
    pub branch_id: Uuid,
    pub address: &'a str,
    pub total_count: i32,
    pub total_price: BigDecimal,
}

impl<'a> NewOrderRow<'a> {
    pub(crate) fn from_draft(id: Uuid, draft: &'a OrderDraft) -> Self {
        let fields = &draft.fields;
        Self {
            id,
            order_code: draft.code.as_str(),
            client_id: fields.client_id,
            branch_id: fields.branch_id,
            address: &fields.address,
            delivery_price: draft.delivery_price.as_decimal().clone(),
            total_count: fields.total_count,
            total_price: fields.total_price.as_decimal().clone(),
            status: OrderStatus::New.as_str(),
        }
    }
}

impl<'a> OrderChangeset<'a> {
    pub(crate) fn from_changes(changes: &'a OrderFields) -> Self {
        Self {
            client_id: changes.client_id,
            branch_id: changes.branch_id,
            address: &changes.address,
            total_count: changes.total_count,
            total_price: changes.total_price.as_decimal().clone(),
        }
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = ResourceRepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(|err| ResourceRepositoryError::unsupported_state(err.to_string()))?;
        Ok(Self {
            id: row.id,
            order_code: BusinessCode::from_stored(row.order_code),
            fields: OrderFields {
                client_id: row.client_id,
                branch_id: row.branch_id,
                address: row.address,
                total_count: row.total_count,
                total_price: decode_money("total_price", row.total_price)?,
            },
            delivery_price: decode_money("delivery_price", row.delivery_price)?,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// order_products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = order_products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LineItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub discount_type: String,
    pub discount_amount: BigDecimal,
    pub quantity: i32,
    pub price: BigDecimal,
    pub line_sum: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_products)]
pub(crate) struct NewLineItemRow<'a> {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub discount_type: &'a str,
    pub discount_amount: BigDecimal,
    pub quantity: i32,
    pub price: BigDecimal,
    pub line_sum: BigDecimal,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = order_products)]
pub(crate) struct LineItemChangeset<'a> {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub discount_type: &'a str,
    pub discount_amount: BigDecimal,
    pub quantity: i32,
    pub price: BigDecimal,
    pub line_sum: BigDecimal,
}

impl<'a> NewLineItemRow<'a> {
    pub(crate) fn from_draft(id: Uuid, draft: &'a LineItemFields) -> Self {
        Self {
            id,
            order_id: draft.order_id,
            product_id: draft.product_id,
            discount_type: &draft.discount_type,
            discount_amount: draft.discount_amount.as_decimal().clone(),
            quantity: draft.quantity,
            price: draft.price.as_decimal().clone(),
            line_sum: draft.sum.as_decimal().clone(),
        }
    }
}

impl<'a> LineItemChangeset<'a> {
    pub(crate) fn from_changes(changes: &'a LineItemFields) -> Self {
        Self {
            order_id: changes.order_id,
            product_id: changes.product_id,
            discount_type: &changes.discount_type,
            discount_amount: changes.discount_amount.as_decimal().clone(),
            quantity: changes.quantity,
            price: changes.price.as_decimal().clone(),
            line_sum: changes.sum.as_decimal().clone(),
        }
    }
}

impl TryFrom<LineItemRow> for OrderLineItem {
    type Error = ResourceRepositoryError;

    fn try_from(row: LineItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            fields: LineItemFields {
                order_id: row.order_id,
                product_id: row.product_id,
                discount_type: row.discount_type,
                discount_amount: decode_money("discount_amount", row.discount_amount)?,
                quantity: row.quantity,
                price: decode_money("price", row.price)?,
                sum: decode_money("line_sum", row.line_sum)?,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
