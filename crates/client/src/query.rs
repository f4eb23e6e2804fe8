//! Query parameters for the paginated list endpoint.

use folio_core::Filter;
use folio_core::constants::ALL_FOLDER_ID;

/// One page request against `GET /list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageQuery {
    pub limit: usize,
    pub offset: usize,
    /// `None` and the synthetic `all` id both mean "no folder constraint".
    pub folder_id: Option<String>,
    pub order_by: Option<String>,
    pub filter: Filter,
}

impl ImageQuery {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset, folder_id: None, order_by: None, filter: Filter::default() }
    }

    #[must_use]
    pub fn in_folder(mut self, folder_id: Option<String>) -> Self {
        self.folder_id = folder_id;
        self
    }

    #[must_use]
    pub fn ordered_by(mut self, order_by: Option<String>) -> Self {
        self.order_by = order_by;
        self
    }

    #[must_use]
    pub fn filtered(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Folder id to send, if it constrains the query.
    pub fn effective_folder(&self) -> Option<&str> {
        self.folder_id.as_deref().filter(|f| !f.is_empty() && *f != ALL_FOLDER_ID)
    }

    /// Query-string pairs in a stable order. Set-valued filters are comma-joined.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", self.limit.to_string()), ("offset", self.offset.to_string())];
        if let Some(folder) = self.effective_folder() {
            params.push(("folders", folder.to_owned()));
        }
        if let Some(order_by) = self.order_by.as_deref().filter(|o| !o.is_empty()) {
            params.push(("orderBy", order_by.to_owned()));
        }
        if let Some(keyword) = self.filter.keyword() {
            params.push(("keyword", keyword.to_owned()));
        }
        if !self.filter.exts.is_empty() {
            params.push(("ext", join(self.filter.exts.iter())));
        }
        if !self.filter.tags.is_empty() {
            params.push(("tags", join(self.filter.tags.iter())));
        }
        params
    }
}

fn join<'a>(values: impl Iterator<Item = &'a String>) -> String {
    values.map(String::as_str).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_params() {
        let params = ImageQuery::new(50, 100).in_folder(Some("all".to_owned())).to_params();
        assert_eq!(params, vec![("limit", "50".to_owned()), ("offset", "100".to_owned())]);
    }

    #[test]
    fn test_full_params() {
        let filter = Filter {
            stars: [5].into_iter().collect(),
            exts: ["png".to_owned(), "jpg".to_owned()].into_iter().collect(),
            keyword: Some(" cat ".to_owned()),
            tags: ["pet".to_owned()].into_iter().collect(),
        };
        let params = ImageQuery::new(10, 0)
            .in_folder(Some("f1".to_owned()))
            .ordered_by(Some("-CREATEDATE".to_owned()))
            .filtered(filter)
            .to_params();
        assert_eq!(
            params,
            vec![
                ("limit", "10".to_owned()),
                ("offset", "0".to_owned()),
                ("folders", "f1".to_owned()),
                ("orderBy", "-CREATEDATE".to_owned()),
                ("keyword", "cat".to_owned()),
                ("ext", "jpg,png".to_owned()),
                ("tags", "pet".to_owned()),
            ]
        );
    }
}
