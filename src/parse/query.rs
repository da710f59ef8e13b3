//! Nested query string parsing.
//!
//! Keys may carry bracket segments: `a[b]=1` nests into a map, `a[]=1`
//! appends to a list and `a[2]=1` places into a list by index. Repeated
//! plain keys collect into a list. A key starting with a bracket drops the
//! empty parent, and text between or after bracket groups is ignored.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::message::{QueryParams, QueryValue};

/// Bracket segments beyond this depth are kept as one literal key.
pub const MAX_DEPTH: usize = 5;

/// Highest numeric segment still treated as a list index.
pub const MAX_LIST_INDEX: usize = 20;

/// Parse a raw query string (without `?`) into nested parameters.
pub fn parse_query(query: &str) -> QueryParams {
    let mut root: BTreeMap<String, Node> = BTreeMap::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key.is_empty() {
            continue;
        }
        let mut segments = split_key(&key).into_iter();
        let Some(first) = segments.next() else {
            continue;
        };
        let parent = match first {
            Segment::Parent(name) => name,
            Segment::Child(name) if name.is_empty() => "0".to_string(),
            Segment::Child(name) => name,
        };
        let rest: Vec<String> = segments.map(Segment::into_name).collect();
        assign(root.entry(parent).or_insert(Node::Empty), &rest, value.into_owned());
    }

    root.into_iter()
        .map(|(key, node)| (key, node.into_value()))
        .collect()
}

/// Intermediate tree. Lists are keyed by index so sparse indices compact in
/// order when converted.
#[derive(Debug)]
enum Node {
    Empty,
    Leaf(String),
    Seq(BTreeMap<usize, Node>),
    Map(BTreeMap<String, Node>),
}

impl Node {
    fn into_value(self) -> QueryValue {
        match self {
            Node::Empty => QueryValue::String(String::new()),
            Node::Leaf(value) => QueryValue::String(value),
            Node::Seq(items) => {
                QueryValue::List(items.into_values().map(Node::into_value).collect())
            }
            Node::Map(map) => QueryValue::Map(
                map.into_iter()
                    .map(|(key, node)| (key, node.into_value()))
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Index {
    Append,
    At(usize),
}

fn list_index(segment: &str) -> Option<Index> {
    if segment.is_empty() {
        return Some(Index::Append);
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment
        .parse::<usize>()
        .ok()
        .filter(|idx| *idx <= MAX_LIST_INDEX)
        .map(Index::At)
}

fn next_index(items: &BTreeMap<usize, Node>) -> usize {
    items.keys().next_back().map_or(0, |last| last + 1)
}

/// One piece of a bracketed key.
#[derive(Debug, PartialEq, Eq)]
enum Segment {
    /// Text before the first bracket group.
    Parent(String),
    /// Content of a bracket group, or the literal remainder past the depth
    /// limit.
    Child(String),
}

impl Segment {
    fn into_name(self) -> String {
        match self {
            Segment::Parent(name) | Segment::Child(name) => name,
        }
    }
}

/// Byte range of the next `[...]` group at or after `from` whose content
/// holds no brackets.
fn next_group(key: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = key.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] != b'[' {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < bytes.len() && bytes[j] != b'[' && bytes[j] != b']' {
            j += 1;
        }
        if j < bytes.len() && bytes[j] == b']' {
            return Some((i, j + 1));
        }
        i = j;
    }
    None
}

/// Split `a[b][c]` into `a`, `b`, `c`.
///
/// An empty parent (`[c]`) is dropped. Text outside bracket groups after the
/// parent is ignored. Past [`MAX_DEPTH`] groups the rest of the key, from
/// the next group on, is kept as one literal segment.
fn split_key(key: &str) -> Vec<Segment> {
    let Some((open, close)) = next_group(key, 0) else {
        return vec![Segment::Parent(key.to_string())];
    };

    let mut segments = Vec::new();
    if open > 0 {
        segments.push(Segment::Parent(key[..open].to_string()));
    }

    let mut group = Some((open, close));
    let mut children = 0;
    while let Some((start, end)) = group {
        if children == MAX_DEPTH {
            segments.push(Segment::Child(key[start..].to_string()));
            break;
        }
        segments.push(Segment::Child(key[start + 1..end - 1].to_string()));
        children += 1;
        group = next_group(key, end);
    }
    segments
}

fn assign(slot: &mut Node, path: &[String], value: String) {
    let Some((segment, tail)) = path.split_first() else {
        assign_leaf(slot, value);
        return;
    };
    let index = list_index(segment);

    // Shape the slot into the container this segment needs.
    match slot {
        Node::Empty => {
            *slot = match index {
                Some(_) => Node::Seq(BTreeMap::new()),
                None => Node::Map(BTreeMap::new()),
            };
        }
        Node::Leaf(prev) => {
            let prev = Node::Leaf(std::mem::take(prev));
            if index.is_some() {
                *slot = Node::Seq(BTreeMap::from([(0, prev)]));
            } else {
                // A plain value next to a map: both become list items.
                let mut nested = Node::Empty;
                assign(&mut nested, path, value);
                *slot = Node::Seq(BTreeMap::from([(0, prev), (1, nested)]));
                return;
            }
        }
        Node::Seq(items) if index.is_none() => {
            let map = std::mem::take(items)
                .into_iter()
                .map(|(idx, node)| (idx.to_string(), node))
                .collect();
            *slot = Node::Map(map);
        }
        _ => {}
    }

    match slot {
        Node::Seq(items) => {
            let idx = match index {
                Some(Index::At(idx)) => idx,
                _ => next_index(items),
            };
            assign(items.entry(idx).or_insert(Node::Empty), tail, value);
        }
        Node::Map(map) => {
            let key = match index {
                Some(Index::Append) => map.len().to_string(),
                Some(Index::At(idx)) => idx.to_string(),
                None => segment.clone(),
            };
            assign(map.entry(key).or_insert(Node::Empty), tail, value);
        }
        Node::Empty | Node::Leaf(_) => {}
    }
}

fn assign_leaf(slot: &mut Node, value: String) {
    match slot {
        Node::Empty => *slot = Node::Leaf(value),
        Node::Leaf(prev) => {
            let prev = Node::Leaf(std::mem::take(prev));
            *slot = Node::Seq(BTreeMap::from([(0, prev), (1, Node::Leaf(value))]));
        }
        Node::Seq(items) => {
            let idx = next_index(items);
            items.insert(idx, Node::Leaf(value));
        }
        Node::Map(map) => {
            let key = map.len().to_string();
            map.insert(key, Node::Leaf(value));
        }
    }
}
