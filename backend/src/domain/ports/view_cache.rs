//! Staleness flags for cached dashboard views.

use crate::domain::CachedView;

#[cfg_attr(test, mockall::automock)]
pub trait ViewCache: Send + Sync {
    /// Flag `view` as needing a re-read.
    fn mark_stale(&self, view: CachedView);

    /// Whether `view` has been flagged since it was last refreshed.
    fn is_stale(&self, view: CachedView) -> bool;

    /// Clear the flag once `view` has been re-read.
    fn mark_fresh(&self, view: CachedView);
}
