//! Addresses derived from an entity's identity

use serde::Serialize;
use utoipa::ToSchema;

/// Mount point of the catalog routes
pub const CATALOG_PREFIX: &str = "/catalog";

/// Detail / update / delete addresses of a catalog entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Links {
    pub detail: String,
    pub update: String,
    pub delete: String,
}

impl Links {
    /// `kind` is the singular route segment, e.g. `author` or `book`
    pub fn for_entity(kind: &str, id: impl std::fmt::Display) -> Self {
        let detail = format!("{}/{}/{}", CATALOG_PREFIX, kind, id);
        Self {
            update: format!("{}/update/", detail),
            delete: format!("{}/delete/", detail),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_links() {
        let links = Links::for_entity("author", 1);
        assert_eq!(links.detail, "/catalog/author/1");
        assert_eq!(links.update, "/catalog/author/1/update/");
        assert_eq!(links.delete, "/catalog/author/1/delete/");
    }

    #[test]
    fn test_book_links() {
        let links = Links::for_entity("book", 1);
        assert_eq!(links.update, "/catalog/book/1/update/");
        assert_eq!(links.delete, "/catalog/book/1/delete/");
    }
}
