//! Order endpoints.
//!
//! ```text
//! POST|GET|PUT|DELETE /order
//! PATCH /order   {"id": "...", "status": "in-process"}
//! ```
//!
//! Codes, delivery price and status are server-owned: create assigns them,
//! PUT leaves them untouched and only PATCH moves the status.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Error, Money, Order, OrderFields, OrderStatus};
use crate::inbound::http::error::ResourceError;
use crate::inbound::http::resource::{resource_routes, scoped, HttpResource};
use crate::inbound::http::state::{HttpState, ResourcePorts};
use crate::inbound::http::validation::{
    invalid_status_error, missing_field_error, parse_uuid_v4, FieldName,
};
use crate::inbound::http::ApiResult;

/// Request payload for creating or overwriting an order.
#[derive(Debug, Deserialize)]
pub struct OrderBody {
    /// Ordering client identifier.
    pub client_id: String,
    /// Fulfilling branch identifier.
    pub branch_id: String,
    /// Delivery address.
    pub address: String,
    /// Number of items.
    #[serde(default)]
    pub total_count: i32,
    /// Price of the items, excluding delivery.
    #[serde(default)]
    pub total_price: Money,
}

impl TryFrom<OrderBody> for OrderFields {
    type Error = Error;

    fn try_from(body: OrderBody) -> Result<Self, Self::Error> {
        Ok(Self {
            client_id: parse_uuid_v4(&body.client_id, FieldName::new("client_id"))?,
            branch_id: parse_uuid_v4(&body.branch_id, FieldName::new("branch_id"))?,
            address: body.address,
            total_count: body.total_count,
            total_price: body.total_price,
        })
    }
}

impl HttpResource for Order {
    const PATH: &'static str = "/order";
    const ID_PARAM: &'static str = "id";
    const COLLECTION: &'static str = "orders";

    type Body = OrderBody;

    fn ports(state: &HttpState) -> &ResourcePorts<Self> {
        &state.orders
    }

    fn parse_create(body: OrderBody) -> Result<OrderFields, Error> {
        body.try_into()
    }

    fn parse_update(body: OrderBody) -> Result<OrderFields, Error> {
        body.try_into()
    }
}

/// Request payload for a status transition.
#[derive(Debug, Deserialize)]
pub struct StatusChangeBody {
    /// Order identifier.
    pub id: Option<String>,
    /// Target status text, e.g. `in-process`.
    pub status: Option<String>,
}

fn parse_status_change(body: StatusChangeBody) -> Result<(Uuid, OrderStatus), Error> {
    let id_field = FieldName::new("id");
    let raw_id = body.id.ok_or_else(|| missing_field_error(id_field))?;
    let id = parse_uuid_v4(&raw_id, id_field)?;
    let raw_status = body
        .status
        .ok_or_else(|| missing_field_error(FieldName::new("status")))?;
    let status = raw_status
        .parse::<OrderStatus>()
        .map_err(|_| invalid_status_error(&raw_status))?;
    Ok((id, status))
}

async fn apply_transition(state: &HttpState, body: StatusChangeBody) -> ApiResult<HttpResponse> {
    let (id, target) = parse_status_change(body)?;
    let order = state.order_status.transition(id, target).await?;
    info!(order_id = %id, status = %order.status, "order status changed");
    Ok(HttpResponse::Ok().json(order))
}

/// `PATCH /order`.
pub async fn change_status(
    state: web::Data<HttpState>,
    payload: web::Json<StatusChangeBody>,
) -> Result<HttpResponse, ResourceError> {
    apply_transition(&state, payload.into_inner())
        .await
        .map_err(scoped::<Order>)
}

/// Route table for `/order`, including the status PATCH.
pub fn order_routes() -> actix_web::Resource {
    resource_routes::<Order>().route(web::patch().to(change_status))
}
