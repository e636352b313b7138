// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host configuration and configuration-time contract checks.
//!
//! Contract violations are developer errors, not interaction failures.
//! [`Combobox::new`](crate::Combobox::new) logs them and carries on;
//! [`Combobox::try_new`](crate::Combobox::try_new) refuses to build instead.
//!
//! ```
//! use understory_combobox::{ComboOption, ComboboxConfig, Discipline};
//! use understory_combobox::config::ConfigError;
//!
//! let config = ComboboxConfig::default()
//!     .with_label("Fruit")
//!     .with_selection_type(Discipline::AutoInline);
//! let options = [ComboOption::new("1", "Apple")];
//!
//! let errors = config.validate(&options).unwrap_err();
//! assert_eq!(errors.0, vec![ConfigError::MissingArrowLabel]);
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::matcher::is_blank;
use crate::{CUSTOM_KEY, ComboOption, Discipline};

/// Text shown in the list when nothing matches and no override is configured.
pub const DEFAULT_NO_MATCHES_TEXT: &str = "No match";

/// A single configuration contract violation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Neither a visible label nor an accessible label was supplied.
    #[error("combobox needs a non-blank `label` or `aria_label`")]
    MissingLabel,
    /// The inline-completion arrow button has no accessible label.
    #[error("inline-completing combobox shows an arrow button and needs a non-blank `arrow_label`")]
    MissingArrowLabel,
    /// An option has an empty key.
    #[error("option at index {index} has an empty key")]
    OptionMissingKey {
        /// Position of the option in the list.
        index: usize,
    },
    /// An option has empty text.
    #[error("option `{key}` has empty text")]
    OptionMissingText {
        /// Key of the offending option.
        key: String,
    },
    /// Two options share a key.
    #[error("option key `{key}` is used more than once")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },
    /// An option uses the key reserved for free-text entries.
    #[error("option at index {index} uses the reserved key `-1`")]
    ReservedKey {
        /// Position of the option in the list.
        index: usize,
    },
}

/// Every violation found by [`ComboboxConfig::validate`], in discovery order.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid combobox configuration ({} problem(s))", .0.len())]
pub struct ConfigErrors(pub Vec<ConfigError>);

/// Where the control's accessible name comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccessibleName<'a> {
    /// A visible label element the input is labelled by.
    Label(&'a str),
    /// An invisible accessible label.
    AriaLabel(&'a str),
}

/// Host-supplied settings for one control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComboboxConfig {
    /// Whether typing filters the list. When `false`, the discipline is
    /// forced to [`Discipline::Manual`].
    pub filterable: bool,
    /// Requested selection discipline.
    pub selection_type: Discipline,
    /// Disabled controls ignore all interaction.
    pub disabled: bool,
    /// Marks the text box as required. Opaque to the state machine.
    pub required: bool,
    /// Maximum list height, passed through to the presentation layer.
    pub max_height: Option<String>,
    /// Text shown when nothing matches.
    pub no_matches_text: Option<String>,
    /// Visible label.
    pub label: Option<String>,
    /// Accessible label used when there is no visible label.
    pub aria_label: Option<String>,
    /// Accessible label of the inline-completion arrow button.
    pub arrow_label: Option<String>,
}

impl Default for ComboboxConfig {
    fn default() -> Self {
        Self {
            filterable: true,
            selection_type: Discipline::Manual,
            disabled: false,
            required: false,
            max_height: None,
            no_matches_text: None,
            label: None,
            aria_label: None,
            arrow_label: None,
        }
    }
}

impl ComboboxConfig {
    /// Set whether typing filters the list.
    #[must_use]
    pub fn with_filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Set the requested selection discipline.
    #[must_use]
    pub fn with_selection_type(mut self, selection_type: Discipline) -> Self {
        self.selection_type = selection_type;
        self
    }

    /// Set the disabled flag.
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the required flag.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the maximum list height hint.
    #[must_use]
    pub fn with_max_height(mut self, max_height: impl Into<String>) -> Self {
        self.max_height = Some(max_height.into());
        self
    }

    /// Set the text shown when nothing matches.
    #[must_use]
    pub fn with_no_matches_text(mut self, text: impl Into<String>) -> Self {
        self.no_matches_text = Some(text.into());
        self
    }

    /// Set the visible label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the accessible label.
    #[must_use]
    pub fn with_aria_label(mut self, aria_label: impl Into<String>) -> Self {
        self.aria_label = Some(aria_label.into());
        self
    }

    /// Set the arrow button's accessible label.
    #[must_use]
    pub fn with_arrow_label(mut self, arrow_label: impl Into<String>) -> Self {
        self.arrow_label = Some(arrow_label.into());
        self
    }

    /// The discipline the control actually runs with.
    #[must_use]
    pub fn resolved_discipline(&self) -> Discipline {
        Discipline::resolve(self.filterable, self.selection_type)
    }

    /// Whether the presentation layer should render the arrow button.
    #[must_use]
    pub fn shows_addon_button(&self) -> bool {
        self.resolved_discipline() == Discipline::AutoInline
    }

    /// Text shown in place of the list when nothing matches.
    #[must_use]
    pub fn no_matches_text(&self) -> &str {
        self.no_matches_text
            .as_deref()
            .unwrap_or(DEFAULT_NO_MATCHES_TEXT)
    }

    /// The accessible name source. A non-blank visible label wins.
    #[must_use]
    pub fn accessible_name(&self) -> Option<AccessibleName<'_>> {
        if let Some(label) = non_blank(self.label.as_deref()) {
            Some(AccessibleName::Label(label))
        } else {
            non_blank(self.aria_label.as_deref()).map(AccessibleName::AriaLabel)
        }
    }

    /// Check the configuration and option list against the host contract.
    pub fn validate(&self, options: &[ComboOption]) -> Result<(), ConfigErrors> {
        let mut errors = Vec::new();

        if self.accessible_name().is_none() {
            errors.push(ConfigError::MissingLabel);
        }
        if self.shows_addon_button() && non_blank(self.arrow_label.as_deref()).is_none() {
            errors.push(ConfigError::MissingArrowLabel);
        }

        let mut seen: HashSet<&str> = HashSet::with_capacity(options.len());
        for (index, option) in options.iter().enumerate() {
            if option.key.is_empty() {
                errors.push(ConfigError::OptionMissingKey { index });
            } else if option.key == CUSTOM_KEY {
                errors.push(ConfigError::ReservedKey { index });
            } else if !seen.insert(option.key.as_str()) {
                errors.push(ConfigError::DuplicateKey {
                    key: option.key.clone(),
                });
            }
            if option.text.is_empty() {
                errors.push(ConfigError::OptionMissingText {
                    key: option.key.clone(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigErrors(errors))
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !is_blank(s))
}
