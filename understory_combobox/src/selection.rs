// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filter text and selected option.

use alloc::string::String;

use crate::ComboOption;

/// Filter string and current selection for one control.
///
/// The filter is stored verbatim; trimming only happens when a decision is
/// made from it. Every [`SelectionState::select`] call produces a
/// notification, including clears. Construction does not.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    filter: String,
    selected: Option<ComboOption>,
}

impl SelectionState {
    /// Create an empty state: blank filter, nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// The query currently backing the match.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The selected option, if any.
    pub fn selected(&self) -> Option<&ComboOption> {
        self.selected.as_ref()
    }

    /// Key of the selected option, if any.
    pub fn selected_key(&self) -> Option<&str> {
        self.selected.as_ref().map(|o| o.key.as_str())
    }

    /// Replace the filter string.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
    }

    /// Replace the selection and return the value the host must be notified with.
    #[must_use = "selection changes must be reported to the host"]
    pub fn select(&mut self, option: Option<ComboOption>) -> Option<ComboOption> {
        self.selected.clone_from(&option);
        option
    }
}
