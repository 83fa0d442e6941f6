//! Order line item endpoints.
//!
//! ```text
//! POST|GET|PUT|DELETE /order_products    keyed by `order_product_id`
//! ```
//!
//! Unlike the other paths, a missing line item answers 404.

use actix_web::http::StatusCode;
use serde::Deserialize;

use crate::domain::{Error, LineItemFields, Money, OrderLineItem};
use crate::inbound::http::resource::HttpResource;
use crate::inbound::http::state::{HttpState, ResourcePorts};
use crate::inbound::http::validation::{parse_uuid_v4, FieldName};

/// Request payload for creating or overwriting a line item.
///
/// `sum` is stored as sent.
#[derive(Debug, Deserialize)]
pub struct LineItemBody {
    /// Owning order identifier.
    pub order_id: String,
    /// Ordered product identifier.
    pub product_id: String,
    /// Discount tag.
    #[serde(default)]
    pub discount_type: String,
    /// Discount taken off the line.
    #[serde(default)]
    pub discount_amount: Money,
    /// Units ordered.
    pub quantity: i32,
    /// Unit price.
    pub price: Money,
    /// Line total.
    pub sum: Money,
}

impl TryFrom<LineItemBody> for LineItemFields {
    type Error = Error;

    fn try_from(body: LineItemBody) -> Result<Self, Self::Error> {
        Ok(Self {
            order_id: parse_uuid_v4(&body.order_id, FieldName::new("order_id"))?,
            product_id: parse_uuid_v4(&body.product_id, FieldName::new("product_id"))?,
            discount_type: body.discount_type,
            discount_amount: body.discount_amount,
            quantity: body.quantity,
            price: body.price,
            sum: body.sum,
        })
    }
}

impl HttpResource for OrderLineItem {
    const PATH: &'static str = "/order_products";
    const ID_PARAM: &'static str = "order_product_id";
    const COLLECTION: &'static str = "order_products";
    const NOT_FOUND_STATUS: StatusCode = StatusCode::NOT_FOUND;

    type Body = LineItemBody;

    fn ports(state: &HttpState) -> &ResourcePorts<Self> {
        &state.order_products
    }

    fn parse_create(body: LineItemBody) -> Result<LineItemFields, Error> {
        body.try_into()
    }

    fn parse_update(body: LineItemBody) -> Result<LineItemFields, Error> {
        body.try_into()
    }
}
