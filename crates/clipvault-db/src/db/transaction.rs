//! Database transaction utilities
//!
//! Wraps an owned sqlx transaction so it can be carried across the steps of the
//! clip writer and finished exactly once.

use anyhow::Context;
use async_trait::async_trait;
use clipvault_core::AppError;
use sqlx::{Postgres, Transaction};

use super::records::RecordTransaction;

/// A Postgres transaction that may be committed or rolled back once.
///
/// Dropping an unfinished transaction rolls it back (sqlx returns the connection
/// to the pool only after issuing the rollback).
pub struct PgRecordTransaction {
    transaction: Option<Transaction<'static, Postgres>>,
}

impl PgRecordTransaction {
    pub fn new(transaction: Transaction<'static, Postgres>) -> Self {
        Self {
            transaction: Some(transaction),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.transaction.is_none()
    }
}

#[async_trait]
impl RecordTransaction for PgRecordTransaction {
    async fn commit(&mut self) -> Result<(), AppError> {
        let tx = self.transaction.take().ok_or_else(|| {
            AppError::Internal("Transaction was already committed or rolled back".to_string())
        })?;
        tx.commit()
            .await
            .context("Failed to commit database transaction")?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), AppError> {
        if let Some(tx) = self.transaction.take() {
            tx.rollback()
                .await
                .context("Failed to rollback database transaction")?;
        }
        Ok(())
    }
}

impl Drop for PgRecordTransaction {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            tracing::warn!(
                "Transaction was dropped without explicit commit or rollback - rolling back"
            );
        }
    }
}
