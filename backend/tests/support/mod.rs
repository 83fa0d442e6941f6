//! Embedded PostgreSQL helpers shared by the integration suites.
//!
//! The embedded cluster downloads PostgreSQL binaries on first use, which is
//! not possible everywhere the suite runs. Bootstrap failures therefore skip
//! the calling test unless `MARKET_REQUIRE_TEST_CLUSTER` is truthy, in which
//! case they fail loudly so CI breakage is not masked.

use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;

use market_backend::outbound::persistence::run_pending_migrations;

/// Whether a missing cluster should fail the run.
pub fn cluster_required() -> bool {
    std::env::var("MARKET_REQUIRE_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Report a cluster bootstrap failure according to the skip policy.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    assert!(
        !cluster_required(),
        "Test cluster setup failed: {reason}. Unset MARKET_REQUIRE_TEST_CLUSTER to skip."
    );
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}

fn provision() -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;
    let database = cluster
        .temporary_database(format!("test_{}", uuid::Uuid::new_v4()).as_str())
        .map_err(|err| err.to_string())?;
    run_pending_migrations(database.url()).map_err(|err| err.to_string())?;
    Ok(database)
}

/// A fresh, fully migrated database, or `None` when the cluster is
/// unavailable and skipping is allowed.
///
/// Must be called outside any Tokio runtime.
pub fn migrated_database() -> Option<TemporaryDatabase> {
    match provision() {
        Ok(database) => Some(database),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

/// Render a `postgres` error with its SQLSTATE and detail.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}
