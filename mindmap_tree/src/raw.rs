// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lenient input tree.

use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::Value;

/// One node of the externally supplied tree, before normalization.
///
/// Every field is optional in spirit: ids may be missing or duplicated and
/// labels may be absent. [`normalize`](crate::normalize) repairs all of that.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawNode {
    /// Caller-supplied id, if any.
    pub id: Option<String>,
    /// Label, taken from `title` or else `text`.
    pub text: Option<String>,
    /// Children in display order.
    pub children: Vec<Self>,
}

impl RawNode {
    /// Creates a leaf with an id and label.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    /// Replaces the children of this node.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    /// Parses a JSON document into a tree.
    ///
    /// Only JSON syntax errors fail. Shape problems are absorbed the same way
    /// as [`RawNode::from_value`] absorbs them.
    pub fn from_json_str(json: &str) -> Result<Self, TreeError> {
        let value: Value = serde_json::from_str(json).map_err(TreeError::Json)?;
        Ok(Self::from_value(&value))
    }

    /// Builds a tree from an already parsed JSON value.
    ///
    /// - Objects read `id` (string or number), `title` or `text` (the first
    ///   non-empty string wins) and `children`.
    /// - `children` that is not an array is treated as empty.
    /// - A bare string becomes a leaf labelled with it.
    /// - Anything else becomes an unlabelled leaf.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let id = match map.get("id") {
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(Value::Number(n)) => Some(n.to_string()),
                    _ => None,
                };
                let text = ["title", "text"].iter().find_map(|key| match map.get(*key) {
                    Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
                    _ => None,
                });
                let children = match map.get("children") {
                    Some(Value::Array(items)) => items.iter().map(Self::from_value).collect(),
                    _ => Vec::new(),
                };
                Self { id, text, children }
            }
            Value::String(s) => Self {
                id: None,
                text: Some(s.to_owned()),
                children: Vec::new(),
            },
            _ => Self::default(),
        }
    }

    /// Counts this node and all of its descendants.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = alloc::vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RawNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <Value as serde::Deserialize<'de>>::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Input could not be read as a tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The input is not valid JSON.
    #[error("mind map input is not valid JSON: {0}")]
    Json(serde_json::Error),
}
