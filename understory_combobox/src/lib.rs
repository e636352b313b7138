// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Combobox: a headless, `no_std` combobox state machine.
//!
//! A combobox is a text box bound to a dropdown list of options. Typing
//! filters the list; the list can be opened, navigated, and committed from
//! the keyboard or pointer. This crate owns the *logic* of that control and
//! nothing else:
//!
//! - [`matcher`]: which options a query selects, and where it matched.
//! - [`SelectionState`](selection::SelectionState): the filter string and the selected option.
//! - [`keymap`]: the discrete transition table keyed by state, event kind, and
//!   [`Discipline`].
//! - [`Combobox`]: the interaction controller. It consumes [`ComboEvent`]s and
//!   returns a [`Transition`] with the next [`ControlState`](keymap::ControlState),
//!   the [`Intent`]s the host must carry out, and which parts of the state changed.
//! - [`focus`]: deferred "focus the list after it renders" requests, and a
//!   reference linear traversal for moving between rows.
//! - [`view`]: the derived render model (rows, highlight ranges, popover visibility).
//!
//! The crate does not render anything, own any platform handles, or manage
//! focus traps. The presentation layer forwards raw events, applies intents,
//! and re-renders from [`Combobox::view`].
//!
//! ## Selection disciplines
//!
//! - [`Discipline::Manual`]: options are only selected by picking them from the list.
//!   Leaving the text box with unmatched text reports a free-text entry keyed
//!   [`CUSTOM_KEY`].
//! - [`Discipline::Auto`]: the first match is selected as the user types.
//! - [`Discipline::AutoInline`]: like `Auto`, and the first match's text is
//!   completed inline with the untyped tail selected.
//!
//! Non-filterable controls always run [`Discipline::Manual`].
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_combobox::{
//!     CaretRange, ComboEvent, ComboOption, Combobox, ComboboxConfig, Discipline, Intent,
//! };
//!
//! let options = vec![
//!     ComboOption::new("1", "Apple"),
//!     ComboOption::new("2", "Apricot"),
//! ];
//! let config = ComboboxConfig::default()
//!     .with_label("Fruit")
//!     .with_arrow_label("Show fruit")
//!     .with_selection_type(Discipline::AutoInline);
//! let mut combo = Combobox::new(config, options);
//!
//! // Typing "Ap" completes to "Apple" and leaves "ple" selected for overtyping.
//! let t = combo.handle(ComboEvent::TextChanged("Ap"));
//! assert_eq!(combo.text(), "Apple");
//! assert!(t.intents.contains(&Intent::SetCaretRange(CaretRange { start: 2, end: 5 })));
//! assert_eq!(combo.selected().map(|o| o.key.as_str()), Some("1"));
//!
//! // Render from the derived view.
//! let view = combo.view();
//! assert!(view.popover_shown);
//! assert_eq!(view.items.len(), 2);
//! ```
//!
//! ## Deferred focus
//!
//! Opening the list from the keyboard or the arrow button yields an
//! [`Intent::FocusList`] request. Resolve it after the list has rendered:
//!
//! ```rust
//! use understory_combobox::{ComboEvent, ComboOption, Combobox, ComboboxConfig, Intent};
//! use understory_combobox::keymap::Key;
//!
//! let mut combo = Combobox::new(
//!     ComboboxConfig::default().with_label("Fruit"),
//!     vec![ComboOption::new("1", "Apple"), ComboOption::new("2", "Avocado")],
//! );
//! combo.handle(ComboEvent::TextChanged("a"));
//! let t = combo.handle(ComboEvent::Key(Key::ArrowUp));
//!
//! let Some(Intent::FocusList(request)) = t.intents.last().cloned() else {
//!     unreachable!()
//! };
//! // ... render, count focusable rows ...
//! assert_eq!(combo.resolve_focus(&request, 2), Some(1));
//! ```
//!
//! ## Features
//!
//! - `std`: enables `std` support in `tracing` and `thiserror`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod controller;
pub mod focus;
pub mod keymap;
pub mod matcher;
mod option;
pub mod selection;
pub mod view;

pub use config::ComboboxConfig;
pub use controller::{CaretRange, Changes, ComboEvent, Combobox, Intent, Transition};
pub use option::{CUSTOM_KEY, ComboOption, Discipline};
