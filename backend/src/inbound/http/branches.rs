//! Branch endpoints.
//!
//! ```text
//! POST|GET|PUT|DELETE /branch
//! ```
//!
//! Listed branches report `active = false` outside their operating window;
//! the single-record GET returns the stored flag.

use crate::domain::{Branch, BranchFields, Error};
use crate::inbound::http::resource::HttpResource;
use crate::inbound::http::state::{HttpState, ResourcePorts};

impl HttpResource for Branch {
    const PATH: &'static str = "/branch";
    const ID_PARAM: &'static str = "id";
    const COLLECTION: &'static str = "branches";

    type Body = BranchFields;

    fn ports(state: &HttpState) -> &ResourcePorts<Self> {
        &state.branches
    }

    fn parse_create(body: BranchFields) -> Result<BranchFields, Error> {
        Ok(body)
    }

    fn parse_update(body: BranchFields) -> Result<BranchFields, Error> {
        Ok(body)
    }
}
