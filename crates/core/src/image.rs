//! Image items and metadata patches.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One item of the image catalog. Identity is `id`; everything else can change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub ext: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ids of the folders holding this item (weak references).
    #[serde(default)]
    pub folders: Vec<String>,
    #[serde(default)]
    pub annotation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub modification_time: i64,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub last_modified: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star: Option<u8>,
}

impl ImageItem {
    pub fn new(id: impl Into<String>, ext: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            size: 0,
            ext: ext.into(),
            tags: Vec::new(),
            folders: Vec::new(),
            annotation: String::new(),
            url: None,
            width: 0,
            height: 0,
            modification_time: 0,
            last_modified: 0,
            star: None,
        }
    }

    /// Returns a copy with every field present in `patch` overridden.
    #[must_use]
    pub fn merged(&self, patch: &ItemPatch) -> Self {
        let mut item = self.clone();
        if let Some(tags) = &patch.tags {
            item.tags.clone_from(tags);
        }
        if let Some(annotation) = &patch.annotation {
            item.annotation.clone_from(annotation);
        }
        if let Some(url) = &patch.url {
            item.url = Some(url.clone());
        }
        if let Some(star) = patch.star {
            item.star = Some(star);
        }
        item
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.modification_time)
    }
}

/// Body of an `update` call: the item id plus the fields to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star: Option<u8>,
}

impl ItemPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    #[must_use]
    pub fn star(mut self, star: u8) -> Self {
        self.star = Some(star);
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    #[must_use]
    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_none() && self.annotation.is_none() && self.url.is_none() && self.star.is_none()
    }
}

/// Sorted distinct extensions over `items`, lower-cased, blanks skipped.
pub fn distinct_extensions(items: &[ImageItem]) -> Vec<String> {
    items
        .iter()
        .map(|i| i.ext.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Most recent modification time over `items`; items without a valid timestamp are skipped.
pub fn latest_modified(items: &[ImageItem]) -> Option<DateTime<Utc>> {
    items.iter().filter(|i| i.modification_time > 0).filter_map(ImageItem::modified_at).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> ImageItem {
        let mut item = ImageItem::new("a1", "png");
        item.name = "sunset".to_owned();
        item.tags = vec!["sky".to_owned()];
        item.annotation = "note".to_owned();
        item.star = Some(2);
        item
    }

    #[test]
    fn test_merge_overrides_only_patched_fields() {
        let original = item();
        let merged = original.merged(&ItemPatch::new("a1").star(5));
        assert_eq!(merged.star, Some(5));
        assert_eq!(ImageItem { star: original.star, ..merged }, original);
    }

    #[test]
    fn test_merge_tags_and_annotation() {
        let merged = item().merged(
            &ItemPatch::new("a1").tags(vec!["sea".to_owned()]).annotation("updated"),
        );
        assert_eq!(merged.tags, vec!["sea".to_owned()]);
        assert_eq!(merged.annotation, "updated");
        assert_eq!(merged.star, Some(2));
    }

    #[test]
    fn test_patch_serialization_skips_absent_fields() {
        let json = serde_json::to_value(ItemPatch::new("a1").star(4)).unwrap();
        assert_eq!(json, serde_json::json!({"id": "a1", "star": 4}));
    }

    #[test]
    fn test_distinct_extensions() {
        let items = vec![
            ImageItem::new("1", "png"),
            ImageItem::new("2", "JPG"),
            ImageItem::new("3", "png"),
            ImageItem::new("4", ""),
        ];
        assert_eq!(distinct_extensions(&items), vec!["jpg".to_owned(), "png".to_owned()]);
    }

    #[test]
    fn test_item_decodes_sparse_payload() {
        let item: ImageItem =
            serde_json::from_str(r#"{"id":"x","ext":"gif","modificationTime":1700000000000}"#)
                .unwrap();
        assert_eq!(item.ext, "gif");
        assert!(item.tags.is_empty());
        assert_eq!(item.star, None);
        assert!(item.modified_at().is_some());
    }

    #[test]
    fn test_latest_modified_skips_unset_times() {
        let mut old = ImageItem::new("1", "png");
        old.modification_time = 1_600_000_000_000;
        let mut new = ImageItem::new("2", "png");
        new.modification_time = 1_700_000_000_000;
        let unset = ImageItem::new("3", "png");

        let latest = latest_modified(&[old, unset.clone(), new]).unwrap();
        assert_eq!(latest.timestamp_millis(), 1_700_000_000_000);
        assert!(latest_modified(&[unset]).is_none());
        assert!(latest_modified(&[]).is_none());
    }
}
