//! Product endpoints.
//!
//! ```text
//! POST|GET|PUT|DELETE /product
//! ```
//!
//! Listed products embed their category; codes are assigned on create and
//! cannot be overwritten.

use serde::Deserialize;

use crate::domain::{Error, Money, Product, ProductFields};
use crate::inbound::http::resource::HttpResource;
use crate::inbound::http::state::{HttpState, ResourcePorts};
use crate::inbound::http::validation::{parse_optional_uuid_v4, FieldName};

/// Request payload for creating or overwriting a product.
#[derive(Debug, Deserialize)]
pub struct ProductBody {
    /// Display title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Money,
    /// Photo reference.
    #[serde(default)]
    pub photo: String,
    /// Owning category identifier, if any.
    #[serde(default)]
    pub category_id: Option<String>,
}

impl TryFrom<ProductBody> for ProductFields {
    type Error = Error;

    fn try_from(body: ProductBody) -> Result<Self, Self::Error> {
        Ok(Self {
            category_id: parse_optional_uuid_v4(
                body.category_id.as_deref(),
                FieldName::new("category_id"),
            )?,
            title: body.title,
            description: body.description,
            price: body.price,
            photo: body.photo,
        })
    }
}

impl HttpResource for Product {
    const PATH: &'static str = "/product";
    const ID_PARAM: &'static str = "id";
    const COLLECTION: &'static str = "products";

    type Body = ProductBody;

    fn ports(state: &HttpState) -> &ResourcePorts<Self> {
        &state.products
    }

    fn parse_create(body: ProductBody) -> Result<ProductFields, Error> {
        body.try_into()
    }

    fn parse_update(body: ProductBody) -> Result<ProductFields, Error> {
        body.try_into()
    }
}
