//! Shared Diesel and pool error mapping for the persistence adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{CodeSequenceError, ResourceRepositoryError};

use super::pool::PoolError;

/// Classify a Diesel failure as a connection or query problem.
///
/// Driver detail is logged at debug level and summarised for callers.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), constraint = ?info.constraint_name(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection closed".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            query(format!("referenced record does not exist: {}", info.message()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            query(format!("duplicate value: {}", info.message()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
            query(format!("value rejected by check constraint: {}", info.message()))
        }
        DieselError::DatabaseError(_, info) => query(info.message().to_owned()),
        DieselError::QueryBuilderError(_) => query("database query error".to_owned()),
        DieselError::DeserializationError(_) => query("row decoding failed".to_owned()),
        _ => query("database error".to_owned()),
    }
}

pub(crate) fn map_resource_pool_error(error: PoolError) -> ResourceRepositoryError {
    ResourceRepositoryError::connection(error.message())
}

pub(crate) fn map_resource_diesel_error(error: DieselError) -> ResourceRepositoryError {
    if let DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) = &error {
        debug!(message = info.message(), constraint = ?info.constraint_name(), "foreign key violated");
        return ResourceRepositoryError::reference(format!(
            "referenced record is missing or still in use: {}",
            info.message()
        ));
    }
    map_diesel_error(
        error,
        ResourceRepositoryError::query,
        ResourceRepositoryError::connection,
    )
}

pub(crate) fn map_sequence_pool_error(error: PoolError) -> CodeSequenceError {
    CodeSequenceError::connection(error.message())
}

pub(crate) fn map_sequence_diesel_error(error: DieselError) -> CodeSequenceError {
    map_diesel_error(error, CodeSequenceError::query, CodeSequenceError::connection)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for Diesel error classification.

    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct StubInfo(&'static str);

    impl diesel::result::DatabaseErrorInformation for StubInfo {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, message: &'static str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(StubInfo(message)))
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let err = map_resource_diesel_error(database_error(
            DatabaseErrorKind::ClosedConnection,
            "server closed the connection",
        ));
        assert!(matches!(err, ResourceRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn foreign_key_violations_map_to_reference() {
        let err = map_resource_diesel_error(database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            "violates foreign key constraint \"orders_client_id_fkey\"",
        ));
        let ResourceRepositoryError::Reference { message } = err else {
            panic!("expected reference error");
        };
        assert!(message.contains("orders_client_id_fkey"), "{message}");
    }

    #[rstest]
    #[case(DatabaseErrorKind::UniqueViolation, "duplicate value")]
    #[case(DatabaseErrorKind::CheckViolation, "check constraint")]
    fn constraint_violations_map_to_query(#[case] kind: DatabaseErrorKind, #[case] fragment: &str) {
        let err = map_resource_diesel_error(database_error(kind, "violates constraint"));
        let ResourceRepositoryError::Query { message } = err else {
            panic!("expected query error");
        };
        assert!(message.contains(fragment), "{message}");
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let err = map_sequence_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, CodeSequenceError::connection("timed out"));
    }
}
