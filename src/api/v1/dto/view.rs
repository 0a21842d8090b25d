/*
 * Responsibility
 * - 一覧 / 詳細の view model: upstream の行をそのまま残し、表示可否フラグを足す
 * - 行データは upstream の JSON object のまま扱う (field を落とさない)
 */
use serde::Serialize;
use serde_json::{Map, Value};

use crate::services::upstream::Page;

pub type Record = Map<String, Value>;

/// One upstream row plus what the signed-in user may do with it.
#[derive(Debug, Serialize)]
pub struct Row<A> {
    #[serde(flatten)]
    pub data: Record,
    pub actions: A,
}

/// A page of rows plus page-level actions (create buttons etc.).
#[derive(Debug, Serialize)]
pub struct ListView<R, A> {
    #[serde(flatten)]
    pub page: Page<R>,
    pub actions: A,
}

impl<R, A> ListView<R, A> {
    pub fn new(page: Page<R>, actions: A) -> Self {
        Self { page, actions }
    }
}

/// String view of a scalar field; ids come as strings or numbers.
pub fn text(record: &Record, key: &str) -> Option<String> {
    record.get(key).and_then(value_text)
}

pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Whether the row's field holds a non-empty value.
pub fn is_present(record: &Record, key: &str) -> bool {
    match record.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(_) => true,
    }
}
