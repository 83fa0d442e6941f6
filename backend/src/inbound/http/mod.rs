//! HTTP inbound adapter exposing REST endpoints.

pub mod branches;
pub mod categories;
pub mod clients;
pub mod error;
pub mod health;
pub mod order_products;
pub mod orders;
pub mod products;
pub mod resource;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

use crate::domain::{Branch, Category, Client, Error, OrderLineItem, Product};

pub use error::ApiResult;
pub use resource::resource_routes;

/// Mount every entity path plus the extractor configuration.
///
/// Bodies or query strings the extractors cannot decode answer 400 with the
/// shared error envelope instead of actix's plain-text default.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid request body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid query string: {err}")).into()
    }))
    .service(resource_routes::<Client>())
    .service(resource_routes::<Branch>())
    .service(resource_routes::<Category>())
    .service(resource_routes::<Product>())
    .service(orders::order_routes())
    .service(resource_routes::<OrderLineItem>());
}
