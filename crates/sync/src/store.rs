//! The catalog store: the only place client state is mutated.
//!
//! Every mutation goes through the `watch` sender holding the [`Snapshot`],
//! so observers see exactly one new snapshot per transition. No lock is held
//! across a network call.

use std::mem;
use std::sync::Arc;

use folio_client::CatalogError;
use folio_core::constants::ALL_FOLDER_ID;
use folio_core::{ClientConfig, Filter, FolderNode, ImageItem, ItemPatch, aggregate};
use tokio::sync::watch;

use crate::error::SyncError;
use crate::pager::{PagePlan, PaginatedImageLoader, SkipReason};
use crate::single_flight::{FlightState, Retention, SingleFlight};
use crate::snapshot::Snapshot;
use crate::source::CatalogSource;

/// Independent fetchable resources coordinated by single-flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    /// The whole folder tree; fetched once per session.
    FolderTree,
    Recent { folder_id: Option<String>, limit: usize },
}

/// Outcome of a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLoad {
    Appended { added: usize, total: usize },
    /// The backend returned an empty page; the context is now exhausted.
    Exhausted,
    Skipped(SkipReason),
    /// The context changed while the page was in flight; the page was dropped.
    Discarded,
}

#[derive(Debug, Clone)]
struct LoadedTree {
    folders: Arc<Vec<FolderNode>>,
    total: u64,
}

pub struct CatalogStore<S> {
    source: Arc<S>,
    loader: PaginatedImageLoader,
    recent_limit: usize,
    folder_flight: SingleFlight<ResourceKey, LoadedTree, CatalogError>,
    recent_flight: SingleFlight<ResourceKey, Arc<Vec<ImageItem>>, CatalogError>,
    state: watch::Sender<Snapshot>,
}

impl<S: CatalogSource> CatalogStore<S> {
    pub fn new(source: Arc<S>, config: &ClientConfig) -> Self {
        let (state, _) = watch::channel(Snapshot::new(config.page_size));
        Self {
            source,
            loader: PaginatedImageLoader::new(config.order_by.clone()),
            recent_limit: config.recent_limit,
            folder_flight: SingleFlight::new(),
            recent_flight: SingleFlight::new(),
            state,
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// A copy of the current state. Collections are shared, not deep-copied.
    pub fn snapshot(&self) -> Snapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified once per state transition.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state.subscribe()
    }

    pub fn folder_tree_state(&self) -> FlightState {
        self.folder_flight.state(&ResourceKey::FolderTree)
    }

    /// Loads and aggregates the folder tree.
    ///
    /// A no-op when the store already holds folders. Concurrent callers share
    /// one fetch; a successful tree is retained for the session.
    pub async fn load_folders(&self) -> Result<Arc<Vec<FolderNode>>, SyncError> {
        {
            let current = self.state.borrow();
            if !current.folders.is_empty() {
                return Ok(Arc::clone(&current.folders));
            }
        }

        self.state.send_if_modified(|s| !mem::replace(&mut s.loading_folders, true));
        let _reset = ResetOnDrop::new(&self.state, |s| mem::replace(&mut s.loading_folders, false));

        let source = Arc::clone(&self.source);
        let outcome = self
            .folder_flight
            .run(ResourceKey::FolderTree, Retention::Session, move || async move {
                let raw = source.fetch_folders().await?;
                let tree = aggregate(&raw);
                tracing::info!(top_level = raw.len(), total = tree.total, "folder tree loaded");
                Ok::<_, CatalogError>(LoadedTree { folders: Arc::new(tree.folders), total: tree.total })
            })
            .await;

        match outcome {
            Ok(tree) => {
                self.state.send_if_modified(|s| {
                    let was_loading = mem::replace(&mut s.loading_folders, false);
                    if Arc::ptr_eq(&s.folders, &tree.folders) {
                        return was_loading;
                    }
                    s.folders = Arc::clone(&tree.folders);
                    s.total_images = tree.total;
                    s.last_error = None;
                    true
                });
                Ok(tree.folders)
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to load folder tree");
                self.state.send_modify(|s| {
                    s.loading_folders = false;
                    s.folders = Arc::default();
                    s.total_images = 0;
                    s.last_error = Some(e.message());
                });
                Err(SyncError::Catalog(e))
            },
        }
    }

    /// Forgets the retained tree and fetches it again.
    pub async fn refresh_folders(&self) -> Result<Arc<Vec<FolderNode>>, SyncError> {
        self.folder_flight.invalidate(&ResourceKey::FolderTree);
        self.state.send_modify(|s| {
            s.folders = Arc::default();
            s.total_images = 0;
        });
        self.load_folders().await
    }

    /// Switches to `folder_id` (`None` or `"all"` for everything) and loads the first page.
    pub async fn select_folder(&self, folder_id: Option<&str>) -> Result<PageLoad, SyncError> {
        let folder_id = folder_id.map(str::to_owned);
        self.begin_context(move |s| s.current_folder_id = folder_id);
        self.load_next_page().await
    }

    /// Replaces the filter wholesale and loads the first page.
    pub async fn apply_filter(&self, filter: Filter) -> Result<PageLoad, SyncError> {
        self.begin_context(move |s| s.filter = filter);
        self.load_next_page().await
    }

    /// Switches folder and filter as one context change and loads the first page.
    pub async fn browse(&self, folder_id: Option<&str>, filter: Filter) -> Result<PageLoad, SyncError> {
        let folder_id = folder_id.map(str::to_owned);
        self.begin_context(move |s| {
            s.current_folder_id = folder_id;
            s.filter = filter;
        });
        self.load_next_page().await
    }

    /// Requests the next page of the active context.
    ///
    /// Ignored while a page is in flight or after the context is exhausted.
    /// A page that arrives after the context changed is discarded.
    pub async fn load_next_page(&self) -> Result<PageLoad, SyncError> {
        // Planning and raising the busy flag happen under one state lock.
        let mut plan = PagePlan::Skip(SkipReason::Busy);
        self.state.send_if_modified(|s| {
            plan = self.loader.plan(s.paging_view());
            let fetching = matches!(plan, PagePlan::Fetch(_));
            if fetching {
                s.loading_images = true;
            }
            fetching
        });

        let ticket = match plan {
            PagePlan::Fetch(ticket) => ticket,
            PagePlan::Skip(reason) => {
                tracing::debug!(?reason, "page request skipped");
                return Ok(PageLoad::Skipped(reason));
            },
        };

        let context = ticket.context;
        let _reset = ResetOnDrop::new(&self.state, move |s| {
            s.context == context && mem::replace(&mut s.loading_images, false)
        });

        tracing::debug!(
            context,
            offset = ticket.query.offset,
            limit = ticket.query.limit,
            "requesting image page"
        );
        let result = self.source.fetch_images(&ticket.query).await;

        let mut outcome = Ok(PageLoad::Discarded);
        self.state.send_if_modified(|s| {
            if s.context != context {
                return false;
            }
            s.loading_images = false;
            match result {
                Ok(page) => {
                    let merged = self.loader.merge(&s.images, &s.extensions, s.cursor, page);
                    outcome = Ok(if merged.exhausted() {
                        PageLoad::Exhausted
                    } else {
                        PageLoad::Appended { added: merged.appended, total: merged.images.len() }
                    });
                    s.images = merged.images;
                    s.extensions = merged.extensions;
                    s.cursor = merged.cursor;
                    s.last_error = None;
                },
                Err(e) => {
                    tracing::warn!(context, error = %e, "image page request failed");
                    s.last_error = Some(e.message());
                    outcome = Err(SyncError::from(e));
                },
            }
            true
        });

        if matches!(outcome, Ok(PageLoad::Discarded)) {
            tracing::debug!(context, "discarding page for superseded context");
        }
        outcome
    }

    /// Loads the most recent items of the current folder.
    pub async fn load_recent(&self, limit: Option<usize>) -> Result<Arc<Vec<ImageItem>>, SyncError> {
        let folder_id = self.state.borrow().current_folder_id.clone();
        self.load_recent_for(folder_id.as_deref(), limit).await
    }

    /// Loads the most recent items of `folder_id` without touching the paging context.
    pub async fn load_recent_for(
        &self,
        folder_id: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Arc<Vec<ImageItem>>, SyncError> {
        let limit = limit.unwrap_or(self.recent_limit);
        let folder_id = folder_id.filter(|f| *f != ALL_FOLDER_ID && !f.is_empty()).map(str::to_owned);
        let key = ResourceKey::Recent { folder_id: folder_id.clone(), limit };

        let source = Arc::clone(&self.source);
        let outcome = self
            .recent_flight
            .run(key, Retention::Ephemeral, move || async move {
                source.fetch_recent(limit, folder_id.as_deref()).await.map(Arc::new)
            })
            .await;

        match outcome {
            Ok(items) => {
                self.state.send_if_modified(|s| {
                    if Arc::ptr_eq(&s.recent, &items) {
                        return false;
                    }
                    s.recent = Arc::clone(&items);
                    true
                });
                Ok(items)
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to load recent images");
                self.state.send_modify(|s| {
                    s.recent = Arc::default();
                    s.last_error = Some(e.message());
                });
                Err(SyncError::Catalog(e))
            },
        }
    }

    /// Writes `patch` to the backend, then merges it into the held item.
    ///
    /// If the item is no longer in the snapshot the store is left as is; the
    /// backend write still counts as a success.
    pub async fn update_item(&self, patch: ItemPatch) -> Result<ItemPatch, SyncError> {
        if patch.id.trim().is_empty() {
            return Err(SyncError::InvalidInput("item id must not be empty".to_owned()));
        }
        if patch.is_empty() {
            return Err(SyncError::InvalidInput(format!("patch for {} has no fields", patch.id)));
        }

        let ack = match self.source.update_item(&patch).await {
            Ok(ack) => ack,
            Err(e) => {
                let err = SyncError::from(e);
                tracing::warn!(id = %patch.id, error = %err, "item update failed");
                self.state.send_modify(|s| s.last_error = Some(err.message()));
                return Err(err);
            },
        };

        let applied = self.state.send_if_modified(|s| {
            let images = replace_item(&s.images, &ack);
            let recent = replace_item(&s.recent, &ack);
            let changed = images.is_some() || recent.is_some();
            if let Some(images) = images {
                s.images = images;
            }
            if let Some(recent) = recent {
                s.recent = recent;
            }
            changed
        });
        if !applied {
            tracing::debug!(id = %ack.id, "updated item not held in the store");
        }
        Ok(ack)
    }

    /// Selects an image by id. Unknown ids clear the selection.
    pub fn select_image(&self, id: Option<&str>) -> Option<ImageItem> {
        let mut selected = None;
        self.state.send_if_modified(|s| {
            selected = id.and_then(|id| s.image(id)).cloned();
            let next = selected.as_ref().map(|i| i.id.clone());
            if s.current_image_id == next {
                return false;
            }
            s.current_image_id = next;
            true
        });
        selected
    }

    pub fn select_next_image(&self) -> Option<ImageItem> {
        let next = self.state.borrow().next_image().map(|i| i.id.clone());
        next.and_then(|id| self.select_image(Some(&id)))
    }

    pub fn select_prev_image(&self) -> Option<ImageItem> {
        let prev = self.state.borrow().prev_image().map(|i| i.id.clone());
        prev.and_then(|id| self.select_image(Some(&id)))
    }

    pub fn expand_folder(&self, folder_id: &str) {
        self.state.send_if_modified(|s| {
            if s.is_expanded(folder_id) {
                return false;
            }
            s.expanded_folders.push(folder_id.to_owned());
            true
        });
    }

    pub fn collapse_folder(&self, folder_id: &str) {
        self.state.send_if_modified(|s| {
            let before = s.expanded_folders.len();
            s.expanded_folders.retain(|f| f != folder_id);
            s.expanded_folders.len() != before
        });
    }

    /// Returns whether the folder is expanded afterwards.
    pub fn toggle_folder(&self, folder_id: &str) -> bool {
        let expanded = self.state.borrow().is_expanded(folder_id);
        if expanded {
            self.collapse_folder(folder_id);
            false
        } else {
            self.expand_folder(folder_id);
            true
        }
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.last_error.take().is_some());
    }

    /// Starts a new (folder, filter) context: the cursor and the accumulated
    /// list reset, and any page still in flight becomes stale.
    fn begin_context(&self, change: impl FnOnce(&mut Snapshot)) {
        self.state.send_modify(|s| {
            change(s);
            s.context = s.context.wrapping_add(1);
            s.cursor.reset();
            s.images = Arc::default();
            s.extensions = Arc::default();
            s.loading_images = false;
            s.current_image_id = None;
            tracing::info!(
                context = s.context,
                folder = ?s.current_folder_id,
                filter = ?s.filter,
                "image context changed"
            );
        });
    }
}

fn replace_item(list: &Arc<Vec<ImageItem>>, patch: &ItemPatch) -> Option<Arc<Vec<ImageItem>>> {
    let index = list.iter().position(|i| i.id == patch.id)?;
    let mut next = Vec::clone(list);
    let slot = next.get_mut(index)?;
    *slot = slot.merged(patch);
    Some(Arc::new(next))
}

/// Runs `reset` against the state when dropped, so loading flags are cleared
/// even if the owning future is cancelled mid-fetch.
struct ResetOnDrop<'a, F>
where
    F: FnMut(&mut Snapshot) -> bool,
{
    state: &'a watch::Sender<Snapshot>,
    reset: Option<F>,
}

impl<'a, F> ResetOnDrop<'a, F>
where
    F: FnMut(&mut Snapshot) -> bool,
{
    fn new(state: &'a watch::Sender<Snapshot>, reset: F) -> Self {
        Self { state, reset: Some(reset) }
    }
}

impl<F> Drop for ResetOnDrop<'_, F>
where
    F: FnMut(&mut Snapshot) -> bool,
{
    fn drop(&mut self) {
        if let Some(mut reset) = self.reset.take() {
            self.state.send_if_modified(|s| reset(s));
        }
    }
}
