// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared style elements with holder counting.
//!
//! Several components may need the same global style element (for example one that hides
//! the cursor everywhere). The first holder creates it under the body; the last release
//! removes it.

use crate::document::{Document, StyleEntry};
use crate::types::{Element, NodeFlags, NodeId};

impl Document {
    /// Take a hold on the style element `key`, creating it with `css` if absent.
    ///
    /// Later holders share the existing element; their `css` is ignored. If the element
    /// was removed behind the registry's back it is recreated and existing holds carry over.
    pub fn acquire_style(&mut self, key: &str, css: &str) -> NodeId {
        if let Some(node) = self.style_element(key) {
            if let Some(entry) = self.styles.get_mut(key) {
                entry.holders += 1;
            }
            return node;
        }
        let mut element = Element::new("style").with_attr("id", key);
        element.text = Some(css.into());
        element.flags = NodeFlags::empty();
        let body = self.body();
        let node = self.insert(Some(body), element);
        let holders = self.styles.get(key).map_or(0, |e| e.holders) + 1;
        self.styles.insert(key.into(), StyleEntry { node, holders });
        node
    }

    /// Drop one hold on the style element `key`. Returns `true` when this removed it.
    pub fn release_style(&mut self, key: &str) -> bool {
        let Some(entry) = self.styles.get_mut(key) else {
            return false;
        };
        entry.holders = entry.holders.saturating_sub(1);
        if entry.holders > 0 {
            return false;
        }
        let node = entry.node;
        self.styles.remove(key);
        self.remove(node);
        true
    }

    /// The live style element for `key`.
    pub fn style_element(&self, key: &str) -> Option<NodeId> {
        self.styles
            .get(key)
            .map(|e| e.node)
            .filter(|n| self.is_alive(*n))
    }

    /// Number of current holders of `key`.
    pub fn style_holders(&self, key: &str) -> usize {
        self.styles.get(key).map_or(0, |e| e.holders)
    }
}
