//! The store's canonical in-memory state and read-only selectors over it.

use std::sync::Arc;

use folio_core::{
    Filter, FolderNode, ImageItem, PageCursor, child_folders, find_folder, folder_path,
};

use crate::pager::{ContextId, PagingView};

/// One consistent view of the client state.
///
/// Collections sit behind `Arc`s and are replaced wholesale on change, so an
/// observer can detect a change with `Arc::ptr_eq` and clone a snapshot cheaply.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Aggregated folder forest, synthetic `all` root first. Empty until loaded.
    pub folders: Arc<Vec<FolderNode>>,
    pub total_images: u64,
    /// Accumulated pages of the active context.
    pub images: Arc<Vec<ImageItem>>,
    /// Sorted distinct extensions over `images`.
    pub extensions: Arc<Vec<String>>,
    pub recent: Arc<Vec<ImageItem>>,
    pub current_folder_id: Option<String>,
    pub filter: Filter,
    pub cursor: PageCursor,
    pub context: ContextId,
    /// A page fetch for `context` is in flight. Gates further page requests.
    pub loading_images: bool,
    pub loading_folders: bool,
    pub last_error: Option<String>,
    pub current_image_id: Option<String>,
    pub expanded_folders: Vec<String>,
}

impl Snapshot {
    pub fn new(page_size: usize) -> Self {
        Self {
            folders: Arc::default(),
            total_images: 0,
            images: Arc::default(),
            extensions: Arc::default(),
            recent: Arc::default(),
            current_folder_id: None,
            filter: Filter::default(),
            cursor: PageCursor::new(page_size),
            context: 0,
            loading_images: false,
            loading_folders: false,
            last_error: None,
            current_image_id: None,
            expanded_folders: Vec::new(),
        }
    }

    pub(crate) fn paging_view(&self) -> PagingView<'_> {
        PagingView {
            context: self.context,
            cursor: &self.cursor,
            busy: self.loading_images,
            folder_id: self.current_folder_id.as_deref(),
            filter: &self.filter,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.exhausted
    }

    pub fn current_folder(&self) -> Option<&FolderNode> {
        self.current_folder_id.as_deref().and_then(|id| find_folder(&self.folders, id))
    }

    /// Path from the top level down to the current folder. Never contains `all`.
    pub fn breadcrumbs(&self) -> Vec<&FolderNode> {
        self.current_folder_id.as_deref().map(|id| folder_path(&self.folders, id)).unwrap_or_default()
    }

    pub fn child_folders(&self) -> &[FolderNode] {
        self.current_folder_id
            .as_deref()
            .map(|id| child_folders(&self.folders, id))
            .unwrap_or_default()
    }

    pub fn is_expanded(&self, folder_id: &str) -> bool {
        self.expanded_folders.iter().any(|f| f == folder_id)
    }

    /// Accumulated images that also satisfy the client-side star constraint.
    pub fn visible_images(&self) -> Vec<&ImageItem> {
        self.images.iter().filter(|i| self.filter.matches_stars(i)).collect()
    }

    pub fn image(&self, id: &str) -> Option<&ImageItem> {
        self.images.iter().find(|i| i.id == id)
    }

    pub fn current_image_index(&self) -> Option<usize> {
        let id = self.current_image_id.as_deref()?;
        self.images.iter().position(|i| i.id == id)
    }

    pub fn current_image(&self) -> Option<&ImageItem> {
        self.current_image_index().and_then(|i| self.images.get(i))
    }

    /// Item after the current one; `None` at the end or without a selection.
    pub fn next_image(&self) -> Option<&ImageItem> {
        let index = self.current_image_index()?;
        self.images.get(index.checked_add(1)?)
    }

    /// Item before the current one; `None` at the start or without a selection.
    pub fn prev_image(&self) -> Option<&ImageItem> {
        let index = self.current_image_index()?;
        self.images.get(index.checked_sub(1)?)
    }
}
