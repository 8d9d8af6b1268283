//! Transaction helper for the service layer.

use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::db::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Boxed future returned by `with_txn` closures.
pub type TxnFuture<'a, R> = Pin<Box<dyn Future<Output = Result<R, AppError>> + Send + 'a>>;

/// Execute a closure within a database transaction.
///
/// Begins a transaction on the state's connection, runs the closure, and
/// commits on Ok. On Err the rollback is best-effort and the original error
/// is preserved.
///
/// Callers pass `|txn| Box::pin(async move { ... })`.
pub async fn with_txn<R, F>(state: &AppState, f: F) -> Result<R, AppError>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxnFuture<'a, R>,
{
    let db = require_db(state)?;
    let txn = db.begin().await?;

    match f(&txn).await {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}
