//! Ordered-fallback combinator.
//!
//! Several lookups in this crate try a preferred strategy and fall back to
//! a secondary one: transcript discovery probes quote pages before the
//! global index, and earnings estimates consult the quote-info source
//! before the calendar source. [`first_some`] implements that policy once.

use crate::error::Result;
use futures::future::BoxFuture;

/// Run fallible attempts in order, returning the first hit.
///
/// - `Ok(Some(_))` wins immediately; later attempts are not run.
/// - `Ok(None)` falls through to the next attempt.
/// - `Err` on a non-final attempt is swallowed and the next attempt runs;
///   an `Err` from the final attempt propagates.
pub async fn first_some<T>(
    attempts: impl IntoIterator<Item = BoxFuture<'_, Result<Option<T>>>>,
) -> Result<Option<T>> {
    let mut iter = attempts.into_iter().peekable();
    while let Some(attempt) = iter.next() {
        match attempt.await {
            Ok(Some(value)) => return Ok(Some(value)),
            Ok(None) => {}
            Err(e) if iter.peek().is_none() => return Err(e),
            Err(_) => {}
        }
    }
    Ok(None)
}
