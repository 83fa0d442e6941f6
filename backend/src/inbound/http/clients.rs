//! Client endpoints.
//!
//! ```text
//! POST|GET|PUT|DELETE /client
//! ```

use crate::domain::{Client, ClientFields, Error};
use crate::inbound::http::resource::HttpResource;
use crate::inbound::http::state::{HttpState, ResourcePorts};

impl HttpResource for Client {
    const PATH: &'static str = "/client";
    const ID_PARAM: &'static str = "id";
    const COLLECTION: &'static str = "clients";

    type Body = ClientFields;

    fn ports(state: &HttpState) -> &ResourcePorts<Self> {
        &state.clients
    }

    fn parse_create(body: ClientFields) -> Result<ClientFields, Error> {
        Ok(body)
    }

    fn parse_update(body: ClientFields) -> Result<ClientFields, Error> {
        Ok(body)
    }
}
