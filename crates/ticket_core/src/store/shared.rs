//! Process-wide store handle with lazy one-time open.
//!
//! # Invariants
//! - The open runs at most once per process; concurrent first callers await
//!   the same pending attempt.
//! - The outcome is memoized. Success hands every caller a clone of the same
//!   handle; failure is fatal and every later call reports it without
//!   reopening.

use super::{Store, StoreError, StoreResult};
use crate::config::StoreConfig;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::OnceCell;

static SHARED_STORE: OnceCell<Result<Store, Arc<StoreError>>> = OnceCell::const_new();

/// Returns the process-wide store, opening it with `config` on first use.
///
/// Later calls ignore `config`; a differing location is logged.
///
/// # Errors
/// - `SharedOpenFailed` wrapping the first open's error, on this and every
///   later call.
pub async fn shared_store(config: StoreConfig) -> StoreResult<Store> {
    let requested = config.location.clone();
    let outcome = SHARED_STORE
        .get_or_init(|| async move {
            let mode = config.location.mode();
            match Store::open(config).await {
                Ok(store) => {
                    info!("event=shared_store_init module=store status=ok mode={mode}");
                    Ok(store)
                }
                Err(err) => {
                    error!(
                        "event=shared_store_init module=store status=error mode={mode} error_code={} error={err}",
                        err.code()
                    );
                    Err(Arc::new(err))
                }
            }
        })
        .await;

    let store = outcome
        .as_ref()
        .map_err(|err| StoreError::SharedOpenFailed(Arc::clone(err)))?;
    if store.location() != &requested {
        warn!(
            "event=shared_store_reuse module=store status=ignored_config active_mode={} requested_mode={}",
            store.location().mode(),
            requested.mode()
        );
    }
    Ok(store.clone())
}
