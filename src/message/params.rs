//! Cookie and query parameter values.

use std::collections::BTreeMap;

use serde::Serialize;

/// Flat cookie name → value mapping.
pub type CookieParams = BTreeMap<String, String>;

/// Top level of a parsed query string.
pub type QueryParams = BTreeMap<String, QueryValue>;

/// One node of a parsed query string.
///
/// `a=1` is a `String`, `a[]=1&a[]=2` a `List`, `a[b]=1` a `Map`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    String(String),
    List(Vec<QueryValue>),
    Map(BTreeMap<String, QueryValue>),
}

impl QueryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[QueryValue]> {
        match self {
            QueryValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, QueryValue>> {
        match self {
            QueryValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::String(value)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        QueryValue::List(items.into_iter().map(Into::into).collect())
    }
}
