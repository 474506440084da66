//! Community post input

use serde::Deserialize;

/// Fields for creating a post
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    /// tutorial, showcase, question, ...
    pub category: String,
    pub author_id: i64,
}

/// Optional filters for listing posts
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostFilter {
    pub category: Option<String>,
}

impl PostFilter {
    /// Empty strings mean "no filter", matching how query strings arrive
    /// from HTML forms.
    pub fn normalized(self) -> Self {
        Self {
            category: self.category.filter(|c| !c.is_empty()),
        }
    }
}
