// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Display labels for parser event names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps event names (e.g. `SAVE_DETECTED`) to human-readable labels.
///
/// Labels are supplied from outside (configuration, locale files). Names
/// without a label display as themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLabels {
    labels: BTreeMap<String, String>,
}

impl EventLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(name.into(), label.into());
    }

    pub fn label<'a>(&'a self, name: &'a str) -> &'a str {
        self.labels.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EventLabels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "labels_tests.rs"]
mod tests;
