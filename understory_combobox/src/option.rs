// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Option records and selection disciplines.

use alloc::string::String;

/// Key carried by the synthetic selection emitted for free-text entries.
///
/// Hosts must never use this key for a real option.
pub const CUSTOM_KEY: &str = "-1";

/// A single selectable entry in the dropdown list.
///
/// Options are owned by the host and never mutated by the control. An empty
/// `text` is tolerated and simply fails to match any non-empty query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ComboOption {
    /// Identifier, unique within the option list.
    pub key: String,
    /// Display and match text.
    pub text: String,
}

impl ComboOption {
    /// Create an option from a key and text.
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }

    /// Create the synthetic free-text selection reported on blur.
    pub fn custom(text: impl Into<String>) -> Self {
        Self::new(CUSTOM_KEY, text)
    }

    /// Returns `true` if this is a synthetic free-text selection.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.key == CUSTOM_KEY
    }
}

/// How typing and list navigation translate into selection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Discipline {
    /// The user must pick an option explicitly from the list.
    #[default]
    Manual,
    /// The first filtered option is selected as the user types.
    Auto,
    /// Like [`Discipline::Auto`], and the first option's text is also
    /// completed inline with the untyped tail left selected.
    AutoInline,
}

impl Discipline {
    /// Resolve the effective discipline for a control.
    ///
    /// Non-filterable controls always behave as [`Discipline::Manual`].
    #[must_use]
    pub const fn resolve(filterable: bool, requested: Self) -> Self {
        if filterable { requested } else { Self::Manual }
    }

    /// Returns `true` for the disciplines that auto-select while typing.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto | Self::AutoInline)
    }
}
