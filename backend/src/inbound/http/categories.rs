//! Category endpoints.
//!
//! ```text
//! POST|GET|PUT|DELETE /category
//! ```

use serde::Deserialize;

use crate::domain::{Category, CategoryFields, Error};
use crate::inbound::http::resource::HttpResource;
use crate::inbound::http::state::{HttpState, ResourcePorts};
use crate::inbound::http::validation::{parse_optional_uuid_v4, FieldName};

/// Request payload for creating or overwriting a category.
#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    /// Display title.
    pub title: String,
    /// Parent category identifier, if nested.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Image reference.
    #[serde(default)]
    pub image: String,
}

impl TryFrom<CategoryBody> for CategoryFields {
    type Error = Error;

    fn try_from(body: CategoryBody) -> Result<Self, Self::Error> {
        Ok(Self {
            parent_id: parse_optional_uuid_v4(
                body.parent_id.as_deref(),
                FieldName::new("parent_id"),
            )?,
            title: body.title,
            image: body.image,
        })
    }
}

impl HttpResource for Category {
    const PATH: &'static str = "/category";
    const ID_PARAM: &'static str = "id";
    const COLLECTION: &'static str = "categories";

    type Body = CategoryBody;

    fn ports(state: &HttpState) -> &ResourcePorts<Self> {
        &state.categories
    }

    fn parse_create(body: CategoryBody) -> Result<CategoryFields, Error> {
        body.try_into()
    }

    fn parse_update(body: CategoryBody) -> Result<CategoryFields, Error> {
        body.try_into()
    }
}
