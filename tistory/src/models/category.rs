//! Category model.

use serde::{Deserialize, Serialize};

use super::CategoryId;

/// A blog category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Parent category for sub-categories.
    pub parent: Option<CategoryId>,
    /// Full label, `parent/child` for sub-categories.
    pub label: String,
    /// Number of posts in the category.
    pub entries: i64,
}

impl Category {
    /// Whether this category sits at the top level.
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level() {
        let top = Category {
            id: "403929".into(),
            name: "OAuth".into(),
            ..Default::default()
        };
        assert!(top.is_top_level());

        let child = Category {
            parent: Some("403929".into()),
            ..top
        };
        assert!(!child.is_top_level());
    }
}
