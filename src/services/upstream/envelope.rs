use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `{ success, code, message, data }` wrapper used by every upstream response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Paginated `data` payload: `{ items, totalPages, ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    // totalElements, page, size... passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> Page<T> {
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            extra: self.extra,
        }
    }
}

/// Lists arrive either bare (`data: [...]`) or paginated (`data: {items: [...]}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListData<T> {
    Page(Page<T>),
    Bare(Vec<T>),
}

impl<T> ListData<T> {
    pub fn into_page(self) -> Page<T> {
        match self {
            ListData::Page(page) => page,
            ListData::Bare(items) => Page {
                items,
                total_pages: None,
                extra: Map::new(),
            },
        }
    }
}
