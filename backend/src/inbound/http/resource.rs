//! Generic CRUD endpoints shared by every entity path.
//!
//! ```text
//! POST   /<path>                create          201
//! GET    /<path>?<id>=          fetch one       200
//! GET    /<path>?limit=&offset=&search=
//!                               list            200 {"count", "<collection>"}
//! PUT    /<path>                overwrite       202
//! DELETE /<path>?<id>=          delete          204
//! ```
//!
//! A GET carrying the identifier key fetches one record even when the value
//! is blank; the identifier gate then rejects it.

use std::collections::HashMap;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use pagination::PageRequest;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{Error, ListRequest, Resource};
use crate::inbound::http::error::ResourceError;
use crate::inbound::http::state::{HttpState, ResourcePorts};
use crate::inbound::http::validation::{
    invalid_body_error, invalid_uuid_error, missing_field_error, parse_uuid_v4, FieldName,
};
use crate::inbound::http::ApiResult;

/// Raw query-string parameters.
pub type QueryParams = web::Query<HashMap<String, String>>;

/// An entity exposed over HTTP.
pub trait HttpResource: Resource {
    /// Mount path.
    const PATH: &'static str;
    /// Query-string and PUT body key carrying the identifier.
    const ID_PARAM: &'static str;
    /// Key of the item array in list responses.
    const COLLECTION: &'static str;
    /// Status answered when the identifier matches no row.
    const NOT_FOUND_STATUS: StatusCode = StatusCode::BAD_REQUEST;

    /// Request body accepted by POST and PUT.
    type Body: DeserializeOwned + 'static;

    /// Ports serving this entity.
    fn ports(state: &HttpState) -> &ResourcePorts<Self>;

    /// Validate a POST body.
    fn parse_create(body: Self::Body) -> Result<Self::Input, Error>;

    /// Validate a PUT body.
    fn parse_update(body: Self::Body) -> Result<Self::Changes, Error>;
}

/// Attach the entity's not-found policy to a domain error.
pub(crate) fn scoped<R: HttpResource>(error: Error) -> ResourceError {
    ResourceError::new(error, R::NOT_FOUND_STATUS)
}

fn id_field<R: HttpResource>() -> FieldName {
    FieldName::new(R::ID_PARAM)
}

fn list_request(params: &HashMap<String, String>) -> Result<ListRequest, Error> {
    let page = PageRequest::parse(
        params.get("limit").map(String::as_str),
        params.get("offset").map(String::as_str),
    )
    .map_err(|err| Error::invalid_request(err.to_string()))?;
    Ok(ListRequest::new(page).with_search(params.get("search")))
}

/// Render a list envelope `{ "count": n, "<collection>": [...] }`.
pub(crate) fn list_body<T: Serialize>(
    collection: &str,
    items: Vec<T>,
    total_count: u64,
) -> Result<Value, Error> {
    let items = serde_json::to_value(items)
        .map_err(|err| Error::internal(format!("failed to encode {collection}: {err}")))?;
    let mut body = Map::new();
    body.insert("count".to_owned(), Value::from(total_count));
    body.insert(collection.to_owned(), items);
    Ok(Value::Object(body))
}

async fn create_record<R: HttpResource>(
    state: &HttpState,
    body: R::Body,
) -> ApiResult<HttpResponse> {
    let input = R::parse_create(body)?;
    let created = R::ports(state).command.create(input).await?;
    debug!(resource = %R::KIND, id = %created.id(), "record created");
    Ok(HttpResponse::Created().json(created))
}

async fn read_records<R: HttpResource>(
    state: &HttpState,
    params: HashMap<String, String>,
) -> ApiResult<HttpResponse> {
    if let Some(raw) = params.get(R::ID_PARAM) {
        let id = parse_uuid_v4(raw, id_field::<R>())?;
        let record = R::ports(state).query.get(id).await?;
        return Ok(HttpResponse::Ok().json(record));
    }

    let request = list_request(&params)?;
    let page = R::ports(state).query.list(request).await?;
    let body = list_body(R::COLLECTION, page.items, page.total_count)?;
    Ok(HttpResponse::Ok().json(body))
}

async fn update_record<R: HttpResource>(
    state: &HttpState,
    mut body: Value,
) -> ApiResult<HttpResponse> {
    let id = match body
        .as_object_mut()
        .and_then(|fields| fields.remove(R::ID_PARAM))
    {
        Some(Value::String(raw)) => parse_uuid_v4(&raw, id_field::<R>())?,
        Some(other) => return Err(invalid_uuid_error(id_field::<R>(), &other.to_string())),
        None => return Err(missing_field_error(id_field::<R>())),
    };
    let body = serde_json::from_value::<R::Body>(body).map_err(|err| invalid_body_error(&err))?;
    let changes = R::parse_update(body)?;
    let updated = R::ports(state).command.update(id, changes).await?;
    Ok(HttpResponse::Accepted().json(updated))
}

async fn delete_record<R: HttpResource>(
    state: &HttpState,
    params: HashMap<String, String>,
) -> ApiResult<HttpResponse> {
    let raw = params
        .get(R::ID_PARAM)
        .ok_or_else(|| missing_field_error(id_field::<R>()))?;
    let id = parse_uuid_v4(raw, id_field::<R>())?;
    R::ports(state).command.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// `POST /<path>`.
pub async fn create<R: HttpResource>(
    state: web::Data<HttpState>,
    payload: web::Json<R::Body>,
) -> Result<HttpResponse, ResourceError> {
    create_record::<R>(&state, payload.into_inner())
        .await
        .map_err(scoped::<R>)
}

/// `GET /<path>`: fetch one record when the identifier key is present,
/// otherwise list.
pub async fn read<R: HttpResource>(
    state: web::Data<HttpState>,
    query: QueryParams,
) -> Result<HttpResponse, ResourceError> {
    read_records::<R>(&state, query.into_inner())
        .await
        .map_err(scoped::<R>)
}

/// `PUT /<path>`.
pub async fn update<R: HttpResource>(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ResourceError> {
    update_record::<R>(&state, payload.into_inner())
        .await
        .map_err(scoped::<R>)
}

/// `DELETE /<path>`.
pub async fn delete<R: HttpResource>(
    state: web::Data<HttpState>,
    query: QueryParams,
) -> Result<HttpResponse, ResourceError> {
    delete_record::<R>(&state, query.into_inner())
        .await
        .map_err(scoped::<R>)
}

/// Route table for one entity path.
pub fn resource_routes<R: HttpResource>() -> actix_web::Resource {
    web::resource(R::PATH)
        .route(web::post().to(create::<R>))
        .route(web::get().to(read::<R>))
        .route(web::put().to(update::<R>))
        .route(web::delete().to(delete::<R>))
}
