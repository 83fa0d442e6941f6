//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod code_sequence;
mod order_repository;
mod order_status_command;
mod repositories;
mod resource_command;
mod resource_repository;
mod storage_probe;

#[cfg(test)]
pub use code_sequence::MockCodeSequence;
pub use code_sequence::{CodeSequence, CodeSequenceError};
pub use order_repository::OrderRepository;
#[cfg(test)]
pub use order_status_command::MockOrderStatusCommand;
pub use order_status_command::OrderStatusCommand;
pub use repositories::Repositories;
pub use resource_command::{ResourceCommand, ResourceQuery};
pub use resource_repository::{ResourceRepository, ResourceRepositoryError};
pub use storage_probe::StorageProbe;
