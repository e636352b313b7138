// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived render model.
//!
//! Everything here is recomputed from the controller on each call; nothing is
//! cached between renders.

use alloc::vec::Vec;
use core::ops::Range;

use crate::matcher::find_ignore_case;
use crate::{ComboOption, Combobox};

/// One row of the option list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionView<'a> {
    /// The option this row renders.
    pub option: &'a ComboOption,
    /// Whether this row is the selected option.
    pub selected: bool,
    /// Byte range of `option.text` to emphasize, if any.
    pub highlight: Option<Range<usize>>,
}

impl<'a> OptionView<'a> {
    /// Split the text into `(before, matched, after)` around the highlight.
    ///
    /// Without a highlight, the whole text is returned as `before`.
    #[must_use]
    pub fn segments(&self) -> (&'a str, &'a str, &'a str) {
        let text = self.option.text.as_str();
        match &self.highlight {
            Some(r) => (&text[..r.start], &text[r.clone()], &text[r.end..]),
            None => (text, "", ""),
        }
    }
}

/// What the presentation layer should render right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComboView<'a> {
    /// Text box content.
    pub text: &'a str,
    /// Whether the popover is visible.
    pub popover_shown: bool,
    /// Whether to render the arrow button, and if so whether it is active.
    pub addon_button: Option<bool>,
    /// Filtered option rows, in list order.
    pub items: Vec<OptionView<'a>>,
    /// Text to render in place of the rows when nothing matches.
    pub empty_text: Option<&'a str>,
    /// Maximum list height hint.
    pub max_height: Option<&'a str>,
    /// Whether the control is disabled.
    pub disabled: bool,
    /// Whether the text box is required.
    pub required: bool,
}

impl Combobox {
    /// Build the render model for the current state.
    pub fn view(&self) -> ComboView<'_> {
        let filter = self.filter();
        let selected_key = self.selected().map(|o| o.key.as_str());
        let items: Vec<_> = self
            .filtered_options()
            .into_iter()
            .map(|option| OptionView {
                option,
                selected: selected_key.is_some_and(|k| !k.is_empty() && k == option.key),
                highlight: find_ignore_case(&option.text, filter),
            })
            .collect();
        let popover_shown = self.is_expanded() && !items.is_empty();
        let config = self.config();

        ComboView {
            text: self.text(),
            popover_shown,
            addon_button: config.shows_addon_button().then_some(popover_shown),
            empty_text: items.is_empty().then(|| config.no_matches_text()),
            items,
            max_height: config.max_height.as_deref(),
            disabled: config.disabled,
            required: config.required,
        }
    }
}
