//! Stale-view bookkeeping after successful mutations.

use std::sync::Arc;

use tracing::debug;

use super::outcome::Navigation;
use super::ports::ViewCache;

/// Named read projection served to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CachedView {
    InvoiceList,
    CustomerList,
    UserList,
}

impl CachedView {
    pub const ALL: [Self; 3] = [Self::InvoiceList, Self::CustomerList, Self::UserList];

    /// Dashboard path that renders this view.
    pub const fn path(self) -> &'static str {
        match self {
            Self::InvoiceList => "/dashboard/invoices",
            Self::CustomerList => "/dashboard/customers",
            Self::UserList => "/dashboard/user",
        }
    }
}

/// Marks views stale and produces the follow-up navigation.
///
/// Only called once a mutation has succeeded.
#[derive(Clone)]
pub struct ViewInvalidator {
    cache: Arc<dyn ViewCache>,
}

impl ViewInvalidator {
    pub fn new(cache: Arc<dyn ViewCache>) -> Self {
        Self { cache }
    }

    pub fn invalidate(&self, view: CachedView) {
        debug!(view = view.path(), "marking view stale");
        self.cache.mark_stale(view);
    }

    pub fn navigate(&self, path: &str) -> Navigation {
        Navigation::to(path)
    }

    /// Invalidate `view` and point the caller back at it.
    pub fn invalidate_and_return(&self, view: CachedView) -> Navigation {
        self.invalidate(view);
        self.navigate(view.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockViewCache;
    use mockall::predicate::eq;

    #[test]
    fn invalidate_and_return_marks_then_redirects() {
        let mut cache = MockViewCache::new();
        cache
            .expect_mark_stale()
            .with(eq(CachedView::CustomerList))
            .times(1)
            .return_const(());
        let invalidator = ViewInvalidator::new(Arc::new(cache));

        let navigation = invalidator.invalidate_and_return(CachedView::CustomerList);

        assert_eq!(navigation.path(), "/dashboard/customers");
    }

    #[test]
    fn user_list_lives_under_singular_path() {
        assert_eq!(CachedView::UserList.path(), "/dashboard/user");
    }
}
