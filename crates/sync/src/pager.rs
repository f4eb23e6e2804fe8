//! Infinite-scroll paging over one (folder, filter) context.
//!
//! The loader never touches the store. [`PaginatedImageLoader::plan`] decides
//! whether a page may be requested and builds its query;
//! [`PaginatedImageLoader::merge`] folds an arrived page into a new list.
//! The store applies both results.

use std::sync::Arc;

use folio_client::ImageQuery;
use folio_core::{Filter, ImageItem, PageCursor, distinct_extensions};

/// Monotonic tag of the active (folder, filter) context.
pub type ContextId = u64;

/// Why a page request was not issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A page for this context is already in flight.
    Busy,
    /// An empty page was already seen for this context.
    Exhausted,
}

/// A page request tagged with the context it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    pub context: ContextId,
    pub query: ImageQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagePlan {
    Fetch(PageTicket),
    Skip(SkipReason),
}

/// Result of folding one page into the accumulated list.
#[derive(Debug, Clone)]
pub struct PageMerge {
    /// New list; the same `Arc` as the input when the page was empty.
    pub images: Arc<Vec<ImageItem>>,
    pub extensions: Arc<Vec<String>>,
    pub cursor: PageCursor,
    pub appended: usize,
}

impl PageMerge {
    pub fn exhausted(&self) -> bool {
        self.appended == 0
    }
}

/// The paging context as the loader needs to see it.
#[derive(Debug, Clone, Copy)]
pub struct PagingView<'a> {
    pub context: ContextId,
    pub cursor: &'a PageCursor,
    pub busy: bool,
    pub folder_id: Option<&'a str>,
    pub filter: &'a Filter,
}

#[derive(Debug, Clone, Default)]
pub struct PaginatedImageLoader {
    order_by: Option<String>,
}

impl PaginatedImageLoader {
    pub fn new(order_by: Option<String>) -> Self {
        Self { order_by }
    }

    /// Busy wins over exhausted: a context cannot be both, but an in-flight
    /// request must never be duplicated.
    pub fn plan(&self, view: PagingView<'_>) -> PagePlan {
        if view.busy {
            return PagePlan::Skip(SkipReason::Busy);
        }
        if view.cursor.exhausted {
            return PagePlan::Skip(SkipReason::Exhausted);
        }
        let query = ImageQuery::new(view.cursor.page_size, view.cursor.offset)
            .in_folder(view.folder_id.map(str::to_owned))
            .ordered_by(self.order_by.clone())
            .filtered(view.filter.clone());
        PagePlan::Fetch(PageTicket { context: view.context, query })
    }

    /// Appends `page` after `current`, preserving order, and recomputes the
    /// extension index over the whole list. An empty page exhausts the cursor.
    pub fn merge(
        &self,
        current: &Arc<Vec<ImageItem>>,
        extensions: &Arc<Vec<String>>,
        cursor: PageCursor,
        page: Vec<ImageItem>,
    ) -> PageMerge {
        let mut cursor = cursor;
        if page.is_empty() {
            cursor.exhaust();
            return PageMerge {
                images: Arc::clone(current),
                extensions: Arc::clone(extensions),
                cursor,
                appended: 0,
            };
        }

        let appended = page.len();
        let mut images = Vec::with_capacity(current.len().saturating_add(appended));
        images.extend(current.iter().cloned());
        images.extend(page);
        cursor.advance();

        let extensions = Arc::new(distinct_extensions(&images));
        PageMerge { images: Arc::new(images), extensions, cursor, appended }
    }
}
