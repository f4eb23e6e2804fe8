//! Conjunctive query descriptor for the image list.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ImageItem;

/// Replaced wholesale on each change; empty fields do not constrain.
///
/// `exts`, `keyword` and `tags` are forwarded to the list endpoint. The
/// endpoint has no star parameter, so `stars` is applied to the accumulated
/// items on the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub stars: BTreeSet<u8>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exts: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty() && self.exts.is_empty() && self.keyword().is_none() && self.tags.is_empty()
    }

    /// Keyword with surrounding whitespace removed; `None` when blank.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Client-side star constraint. Unrated items count as zero stars.
    pub fn matches_stars(&self, item: &ImageItem) -> bool {
        self.stars.is_empty() || self.stars.contains(&item.star.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(Filter::default().is_empty());
        let blank = Filter { keyword: Some("  ".to_owned()), ..Filter::default() };
        assert!(blank.is_empty());
    }

    #[test]
    fn test_star_matching() {
        let filter = Filter { stars: [0, 5].into_iter().collect(), ..Filter::default() };
        let mut item = ImageItem::new("a", "png");
        assert!(filter.matches_stars(&item));
        item.star = Some(3);
        assert!(!filter.matches_stars(&item));
        item.star = Some(5);
        assert!(filter.matches_stars(&item));
    }
}
