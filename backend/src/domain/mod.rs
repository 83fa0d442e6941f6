//! Domain model for the market backend.
//!
//! Entities, value types and the services implementing the driving ports.
//! Nothing here knows about HTTP or SQL; adapters live under `inbound` and
//! `outbound`.

pub mod branch;
pub mod branch_service;
pub mod business_code;
pub mod category;
pub mod client;
pub mod error;
pub mod money;
pub mod order;
pub mod order_line_item;
pub mod order_service;
pub mod order_status;
pub mod ports;
pub mod product;
pub mod product_catalog_service;
pub mod resource;
pub mod resource_service;
pub mod trace_id;
pub mod work_hour;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::branch::{Branch, BranchFields};
pub use self::branch_service::BranchService;
pub use self::business_code::{BusinessCode, CodeKind};
pub use self::category::{Category, CategoryFields};
pub use self::client::{Client, ClientFields};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::money::{Money, MoneyError};
pub use self::order::{Order, OrderDraft, OrderFields};
pub use self::order_line_item::{LineItemFields, OrderLineItem};
pub use self::order_service::{MAX_TRANSITION_ATTEMPTS, OrderService};
pub use self::order_status::{InvalidTransition, OrderStatus, UnsupportedOrderStatus};
pub use self::product::{Product, ProductDraft, ProductFields, ProductListing};
pub use self::product_catalog_service::ProductCatalogService;
pub use self::resource::{ListRequest, Predicate, ReferenceField, Resource, ResourceKind};
pub use self::resource_service::ResourceService;
pub use self::trace_id::TraceId;
pub use self::work_hour::{WorkHour, WorkHourError};

/// HTTP header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";
