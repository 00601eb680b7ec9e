use std::{future::Future, pin::Pin};

use sqlx::{Postgres, Transaction};

use crate::database::get_pool;
use crate::error::AppError;

#[derive(Debug)]
pub struct DatabaseTransaction;

impl DatabaseTransaction {
    /// Run a closure inside a transaction
    pub async fn run<T, F>(f: F) -> Result<T, AppError>
    where
        F: for<'a> FnOnce(
            &'a mut Transaction<'static, Postgres>,
        ) -> Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>,
        T: Send,
    {
        let pool = get_pool()?;
        let mut tx = pool.begin().await.map_err(AppError::from)?;

        match f(&mut tx).await {
            Ok(value) => {
                tx.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(err) => {
                log::warn!("Transaction failed with error: {}, rolling back", err);
                if let Err(rollback_err) = tx.rollback().await {
                    log::error!(
                        "Rollback failed after error (orig: {}, rollback: {})",
                        err,
                        rollback_err
                    );
                }
                Err(err)
            }
        }
    }
}

/// Tables whose check-then-insert sequences must not interleave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockScope {
    AdminRoles,
    ModeratorSchedules,
    PrayerTeams,
}

impl LockScope {
    fn key(self) -> i64 {
        match self {
            LockScope::AdminRoles => 0x4144_4d4e,
            LockScope::ModeratorSchedules => 0x4d4f_4453,
            LockScope::PrayerTeams => 0x5052_5954,
        }
    }
}

/// Takes a transaction-scoped advisory lock; released on commit or rollback.
pub async fn lock(
    tx: &mut Transaction<'_, Postgres>,
    scope: LockScope,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(scope.key())
        .execute(&mut **tx)
        .await?;

    Ok(())
}
