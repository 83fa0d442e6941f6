//! Market backend library modules.
//!
//! The crate follows a hexagonal layout: [`domain`] owns entities, services
//! and ports; [`inbound`] adapts HTTP onto the driving ports; [`outbound`]
//! implements the driven ports over PostgreSQL or process memory.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use middleware::Trace;
pub use settings::MarketSettings;
