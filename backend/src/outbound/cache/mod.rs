//! Process-local staleness flags for dashboard views.
//!
//! A multi-instance deployment would swap this for a shared store; the
//! [`ViewCache`] port is the seam.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use crate::domain::CachedView;
use crate::domain::ports::ViewCache;

/// In-memory [`ViewCache`].
#[derive(Debug, Default)]
pub struct InMemoryViewCache {
    stale: Mutex<BTreeSet<CachedView>>,
}

impl InMemoryViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Views currently flagged stale, in declaration order.
    pub fn stale_views(&self) -> Vec<CachedView> {
        self.stale
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }
}

impl ViewCache for InMemoryViewCache {
    fn mark_stale(&self, view: CachedView) {
        self.stale
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(view);
    }

    fn is_stale(&self, view: CachedView) -> bool {
        self.stale
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&view)
    }

    fn mark_fresh(&self, view: CachedView) {
        self.stale
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn views_start_fresh() {
        let cache = InMemoryViewCache::new();
        assert!(CachedView::ALL.iter().all(|view| !cache.is_stale(*view)));
    }

    #[rstest]
    fn stale_flag_is_cleared_by_refresh() {
        let cache = InMemoryViewCache::new();
        cache.mark_stale(CachedView::CustomerList);
        cache.mark_stale(CachedView::InvoiceList);
        cache.mark_stale(CachedView::CustomerList);

        assert_eq!(
            cache.stale_views(),
            [CachedView::InvoiceList, CachedView::CustomerList]
        );

        cache.mark_fresh(CachedView::CustomerList);
        assert!(!cache.is_stale(CachedView::CustomerList));
        assert!(cache.is_stale(CachedView::InvoiceList));
    }
}
