//! Business codes drawn from PostgreSQL sequences.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CodeSequence, CodeSequenceError};
use crate::domain::{BusinessCode, CodeKind};

use super::error_mapping::{map_sequence_diesel_error, map_sequence_pool_error};
use super::pool::DbPool;

/// `nextval` call for each code family's sequence.
const fn nextval_sql(kind: CodeKind) -> &'static str {
    match kind {
        CodeKind::Order => "nextval('order_code_seq')",
        CodeKind::Product => "nextval('product_code_seq')",
    }
}

/// Draws codes from `order_code_seq` and `product_code_seq`.
///
/// Sequence values are never rolled back, so a code consumed by a failed
/// insert leaves a gap.
#[derive(Clone)]
pub struct DieselCodeSequence {
    pool: DbPool,
}

impl DieselCodeSequence {
    /// Create a sequence adapter backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CodeSequence for DieselCodeSequence {
    async fn next_code(&self, kind: CodeKind) -> Result<BusinessCode, CodeSequenceError> {
        let mut conn = self.pool.get().await.map_err(map_sequence_pool_error)?;
        let value = diesel::select(sql::<BigInt>(nextval_sql(kind)))
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_sequence_diesel_error)?;
        Ok(BusinessCode::format(kind, value))
    }
}
