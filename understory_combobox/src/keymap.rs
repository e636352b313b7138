// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The transition table: `(state, event kind, discipline) -> action`.
//!
//! Lookup is pure and payload-free. Guards that depend on text content (for
//! example "only if the text box is not blank") are evaluated by the
//! controller when it executes the returned [`Action`].
//!
//! ```
//! use understory_combobox::Discipline;
//! use understory_combobox::keymap::{Action, ControlState, EventKind, Key, action_for};
//!
//! let action = action_for(ControlState::Collapsed, EventKind::InputKey(Key::Enter), Discipline::Manual);
//! assert_eq!(action, Action::PreventSubmit);
//! ```

use crate::Discipline;

/// Keys the control reacts to. Everything else maps to [`Key::Other`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Backspace.
    Backspace,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Tab (with or without Shift).
    Tab,
    /// Space bar.
    Space,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Any other key.
    Other,
}

/// Whether the option list is open.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControlState {
    /// The list is hidden.
    #[default]
    Collapsed,
    /// The list is available for interaction.
    Expanded,
}

/// Payload-free classification of an incoming event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Click on the input group surface.
    SurfaceClick,
    /// Click on the inline-completion arrow button.
    AddonClick,
    /// The text box value changed.
    TextChanged,
    /// Key pressed while the text box has focus.
    InputKey(Key),
    /// A list option received focus.
    OptionFocused,
    /// A list option was clicked.
    OptionActivated,
    /// Key pressed while a list option has focus.
    OptionKey(Key),
    /// Click outside the control and its popover.
    OutsideClick,
    /// The text box lost focus.
    Blur,
}

/// Where focus lands when the list opens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpenTarget {
    /// Row 0 with nothing selected, row 1 otherwise.
    SelectionOffset,
    /// The last navigable row.
    Last,
}

/// What the controller does in response to an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Nothing happens.
    Ignore,
    /// Close, then take the filter from the text box.
    CloseAndSyncFilter,
    /// Forward the click to the host.
    ForwardClick,
    /// Open the list and schedule focus into it.
    ///
    /// With `require_text`, nothing happens while the text box is blank.
    Open {
        /// Row to focus once the list renders.
        target: OpenTarget,
        /// Only open when the text box has non-blank content.
        require_text: bool,
    },
    /// Close without touching text, filter, or selection.
    Close,
    /// Apply a text edit: filter, clear selection, then auto-behavior.
    Edit,
    /// Restore the text box to the last committed filter.
    RevertText,
    /// Suppress the default Enter submission.
    PreventSubmit,
    /// Commit the first match for the current text, if any.
    CommitFirstMatch,
    /// Commit the first match for the current text, if any, then close.
    CommitFirstMatchAndClose,
    /// Close and clear text, filter, and selection.
    Reset,
    /// Take the filter from the text box.
    SyncFilter,
    /// Select the focused option.
    Preview,
    /// Select the focused option and show its text in the text box.
    PreviewInline,
    /// Commit the option.
    Commit,
    /// Commit the option and suppress the key's default action.
    CommitPreventDefault,
    /// Close and reconcile the filter after an outside click.
    Dismiss,
    /// Report the typed text as a free-text selection.
    ReportCustomEntry,
}

/// Look up the action for an event.
#[must_use]
pub fn action_for(state: ControlState, kind: EventKind, discipline: Discipline) -> Action {
    use ControlState::{Collapsed, Expanded};
    use Discipline::{Auto, AutoInline, Manual};

    match (kind, state, discipline) {
        (EventKind::SurfaceClick, Expanded, _) => Action::CloseAndSyncFilter,
        (EventKind::SurfaceClick, Collapsed, _) => Action::ForwardClick,

        (EventKind::AddonClick, Collapsed, _) => Action::Open {
            target: OpenTarget::SelectionOffset,
            require_text: false,
        },
        (EventKind::AddonClick, Expanded, _) => Action::Close,

        (EventKind::TextChanged, _, _) => Action::Edit,

        (EventKind::InputKey(key), _, _) => match (key, discipline) {
            (Key::Backspace, _) => Action::RevertText,
            (Key::Enter, Manual) => Action::PreventSubmit,
            (Key::Enter, Auto | AutoInline) => Action::CommitFirstMatch,
            (Key::Escape, _) => Action::Reset,
            (Key::Tab, Manual) => Action::Close,
            (Key::Tab, Auto | AutoInline) => Action::CommitFirstMatchAndClose,
            (Key::ArrowDown, _) => Action::Open {
                target: OpenTarget::SelectionOffset,
                require_text: discipline != AutoInline,
            },
            (Key::ArrowUp, _) => Action::Open {
                target: OpenTarget::Last,
                require_text: discipline != AutoInline,
            },
            (Key::ArrowLeft | Key::ArrowRight, _) => Action::SyncFilter,
            (Key::Space | Key::Other, _) => Action::Ignore,
        },

        (EventKind::OptionFocused, _, Manual) => Action::Ignore,
        (EventKind::OptionFocused, _, Auto) => Action::Preview,
        (EventKind::OptionFocused, _, AutoInline) => Action::PreviewInline,

        (EventKind::OptionActivated, _, _) => Action::Commit,

        (EventKind::OptionKey(key), _, _) => match key {
            Key::Escape => Action::Reset,
            Key::Tab => Action::Commit,
            Key::Enter | Key::Space => Action::CommitPreventDefault,
            _ => Action::Ignore,
        },

        (EventKind::OutsideClick, Expanded, _) => Action::Dismiss,
        (EventKind::OutsideClick, Collapsed, _) => Action::Ignore,

        (EventKind::Blur, _, Manual) => Action::ReportCustomEntry,
        (EventKind::Blur, _, Auto | AutoInline) => Action::Ignore,
    }
}
