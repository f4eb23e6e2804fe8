//! Folder tree types and the subtree-count aggregation.

use serde::{Deserialize, Serialize};

use crate::constants::{ALL_FOLDER_ID, ALL_FOLDER_NAME};

/// A folder in the library catalog. Each node exclusively owns its children.
///
/// The backend reports `imageCount` as the count of items directly in the
/// folder; that value lands in [`own_image_count`](Self::own_image_count) and
/// is never overwritten. [`image_count`](Self::image_count) holds the
/// subtree-inclusive count computed by [`aggregate`].
///
/// Serialized output follows what consumers display: `imageCount` is the
/// subtree-inclusive count and `ownImageCount` the direct one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub children: Vec<FolderNode>,
    #[serde(rename(serialize = "ownImageCount", deserialize = "imageCount"), default)]
    pub own_image_count: u64,
    #[serde(rename(serialize = "imageCount", deserialize = "aggregateImageCount"), default)]
    pub image_count: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub extend_tags: Vec<String>,
    #[serde(default)]
    pub modification_time: i64,
}

impl FolderNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, own_image_count: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            children: Vec::new(),
            own_image_count,
            image_count: own_image_count,
            tags: Vec::new(),
            extend_tags: Vec::new(),
            modification_time: 0,
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<FolderNode>) -> Self {
        self.children = children;
        self
    }

    /// The synthetic root standing for the unfiltered view of the library.
    ///
    /// It has no children, so its own count equals its aggregate count.
    pub fn all_items(total: u64) -> Self {
        Self::new(ALL_FOLDER_ID, ALL_FOLDER_NAME, total)
    }

    pub fn is_all_items(&self) -> bool {
        self.id == ALL_FOLDER_ID
    }
}

/// Result of [`aggregate`]: the new forest (synthetic root first) and the grand total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedTree {
    pub folders: Vec<FolderNode>,
    pub total: u64,
}

/// Computes subtree-inclusive image counts and prepends the synthetic root.
///
/// Post-order: every node's `image_count` becomes its own count plus the sum
/// of its children's aggregated counts. The input is borrowed and never
/// mutated; sibling order is preserved. Synthetic root nodes already present
/// at the top level are dropped, so aggregating an aggregated forest again
/// yields the same result.
pub fn aggregate(tree: &[FolderNode]) -> AggregatedTree {
    let mut total: u64 = 0;
    let mut folders = Vec::with_capacity(tree.len().saturating_add(1));
    folders.push(FolderNode::all_items(0));

    for node in tree.iter().filter(|n| !n.is_all_items()) {
        let aggregated = aggregate_node(node);
        total = total.saturating_add(aggregated.image_count);
        folders.push(aggregated);
    }

    if let Some(root) = folders.first_mut() {
        *root = FolderNode::all_items(total);
    }
    AggregatedTree { folders, total }
}

fn aggregate_node(node: &FolderNode) -> FolderNode {
    let children: Vec<FolderNode> = node.children.iter().map(aggregate_node).collect();
    let descendants = children.iter().fold(0u64, |acc, c| acc.saturating_add(c.image_count));
    FolderNode {
        id: node.id.clone(),
        name: node.name.clone(),
        description: node.description.clone(),
        own_image_count: node.own_image_count,
        image_count: node.own_image_count.saturating_add(descendants),
        children,
        tags: node.tags.clone(),
        extend_tags: node.extend_tags.clone(),
        modification_time: node.modification_time,
    }
}

/// Depth-first search for a folder by id.
pub fn find_folder<'a>(folders: &'a [FolderNode], id: &str) -> Option<&'a FolderNode> {
    for folder in folders {
        if folder.id == id {
            return Some(folder);
        }
        if let Some(found) = find_folder(&folder.children, id) {
            return Some(found);
        }
    }
    None
}

/// Path of folders from a top-level folder down to `id`, inclusive.
///
/// Empty when the id is unknown or names the synthetic root.
pub fn folder_path<'a>(folders: &'a [FolderNode], id: &str) -> Vec<&'a FolderNode> {
    let mut path = Vec::new();
    if id != ALL_FOLDER_ID && collect_path(folders, id, &mut path) {
        path
    } else {
        Vec::new()
    }
}

fn collect_path<'a>(folders: &'a [FolderNode], id: &str, path: &mut Vec<&'a FolderNode>) -> bool {
    for folder in folders {
        path.push(folder);
        if folder.id == id || collect_path(&folder.children, id, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Children of the folder named `id`; empty for unknown ids and leaves.
pub fn child_folders<'a>(folders: &'a [FolderNode], id: &str) -> &'a [FolderNode] {
    find_folder(folders, id).map(|f| f.children.as_slice()).unwrap_or_default()
}
