// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interaction controller.
//!
//! [`Combobox`] consumes [`ComboEvent`]s forwarded by the presentation layer,
//! updates its filter, selection, expansion, and mirrored text-box content,
//! and returns a [`Transition`]: the resulting [`ControlState`], the
//! [`Intent`]s the host must carry out, and a summary of what [`Changes`]d.
//!
//! The controller holds no platform handles. The text box, popover, and list
//! rows are addressed through intents; list options are referred to by key.
//!
//! ## Invariants
//!
//! - The control is only [`ControlState::Expanded`] while the current filter
//!   matches at least one option. Any transition that would leave it
//!   expanded over an empty list collapses it instead.
//! - A selected option's key was present in the option list when it was
//!   selected. Replacing the list afterwards does not clear the selection;
//!   see [`Combobox::selection_is_orphaned`].
//! - Every selection write yields exactly one [`Intent::SelectionChanged`],
//!   including clears and re-selecting the option that is already selected.

use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::config::{ComboboxConfig, ConfigErrors};
use crate::focus::{FocusQueue, FocusRequest, FocusTarget};
use crate::keymap::{Action, ControlState, EventKind, Key, OpenTarget, action_for};
use crate::matcher::{char_offset, filter_options, first_match, is_blank, starts_with_ignore_case};
use crate::selection::SelectionState;
use crate::{ComboOption, Discipline};

/// An input event forwarded by the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComboEvent<'a> {
    /// Click on the input group surface.
    SurfaceClick,
    /// Click on the inline-completion arrow button.
    AddonClick,
    /// The user changed the text box to this value.
    TextChanged(&'a str),
    /// Key pressed while the text box has focus.
    Key(Key),
    /// The list option with this key received focus.
    OptionFocused(&'a str),
    /// The list option with this key was clicked.
    OptionActivated(&'a str),
    /// Key pressed while the list option with this key has focus.
    OptionKey(&'a str, Key),
    /// Click outside the control and its popover.
    OutsideClick,
    /// The text box lost focus.
    Blur,
}

impl ComboEvent<'_> {
    /// The payload-free kind used for transition lookup.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match *self {
            Self::SurfaceClick => EventKind::SurfaceClick,
            Self::AddonClick => EventKind::AddonClick,
            Self::TextChanged(_) => EventKind::TextChanged,
            Self::Key(key) => EventKind::InputKey(key),
            Self::OptionFocused(_) => EventKind::OptionFocused,
            Self::OptionActivated(_) => EventKind::OptionActivated,
            Self::OptionKey(_, key) => EventKind::OptionKey(key),
            Self::OutsideClick => EventKind::OutsideClick,
            Self::Blur => EventKind::Blur,
        }
    }

    fn option_key(&self) -> Option<&str> {
        match *self {
            Self::OptionFocused(key) | Self::OptionActivated(key) | Self::OptionKey(key, _) => {
                Some(key)
            }
            _ => None,
        }
    }
}

/// Character range of the text box to select, `start..end`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CaretRange {
    /// First selected character.
    pub start: usize,
    /// One past the last selected character.
    pub end: usize,
}

/// A side effect the host must perform after a transition.
///
/// Intents are listed in the order they were produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Show the popover.
    OpenPopover,
    /// Hide the popover.
    ClosePopover,
    /// Replace the text box content.
    SetText(String),
    /// Select a character range of the text box (inline completion tail).
    SetCaretRange(CaretRange),
    /// After the next render, resolve this request with
    /// [`Combobox::resolve_focus`] and focus the returned row.
    FocusList(FocusRequest),
    /// Return focus to the text box.
    FocusInput,
    /// Notify the host's selection-change callback.
    SelectionChanged(Option<ComboOption>),
    /// Forward the click to the host's click callback.
    Click,
    /// Suppress the default action of the key event.
    PreventDefault,
}

bitflags::bitflags! {
    /// Which parts of the control state a transition changed.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Changes: u8 {
        /// Mirrored text-box content.
        const TEXT      = 0b0000_0001;
        /// Filter string.
        const FILTER    = 0b0000_0010;
        /// Selected option.
        const SELECTION = 0b0000_0100;
        /// Expanded/collapsed state.
        const EXPANSION = 0b0000_1000;
    }
}

impl Default for Changes {
    fn default() -> Self {
        Self::empty()
    }
}

/// Intent buffer; most transitions produce at most a handful.
pub type Intents = SmallVec<[Intent; 4]>;

/// Result of handling one event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transition {
    /// State after the event.
    pub state: ControlState,
    /// Side effects, in order.
    pub intents: Intents,
    /// What changed.
    pub changes: Changes,
}

impl Transition {
    /// Selection notifications produced by this transition, in order.
    pub fn notifications(&self) -> impl Iterator<Item = Option<&ComboOption>> {
        self.intents.iter().filter_map(|intent| match intent {
            Intent::SelectionChanged(option) => Some(option.as_ref()),
            _ => None,
        })
    }
}

/// Editable, filterable selection control.
///
/// ```
/// use understory_combobox::{ComboEvent, ComboOption, Combobox, ComboboxConfig, Discipline, Intent};
///
/// let options = vec![ComboOption::new("1", "Apple"), ComboOption::new("2", "Apricot")];
/// let config = ComboboxConfig::default()
///     .with_label("Fruit")
///     .with_selection_type(Discipline::Auto);
/// let mut combo = Combobox::new(config, options);
///
/// let t = combo.handle(ComboEvent::TextChanged("apr"));
/// assert!(combo.is_expanded());
/// assert_eq!(combo.selected().map(|o| o.key.as_str()), Some("2"));
/// assert!(t.intents.contains(&Intent::OpenPopover));
/// ```
#[derive(Clone, Debug)]
pub struct Combobox {
    config: ComboboxConfig,
    discipline: Discipline,
    options: Vec<ComboOption>,
    selection: SelectionState,
    state: ControlState,
    text: String,
    focus: FocusQueue,
}

impl Combobox {
    /// Create a collapsed control with an empty text box and no selection.
    ///
    /// Configuration contract violations are logged as warnings.
    pub fn new(config: ComboboxConfig, options: Vec<ComboOption>) -> Self {
        if let Err(errors) = config.validate(&options) {
            for error in &errors.0 {
                tracing::warn!(%error, "combobox configuration contract violated");
            }
        }
        Self::build(config, options)
    }

    /// Like [`Combobox::new`], but reject configurations that violate the contract.
    pub fn try_new(config: ComboboxConfig, options: Vec<ComboOption>) -> Result<Self, ConfigErrors> {
        config.validate(&options)?;
        Ok(Self::build(config, options))
    }

    fn build(config: ComboboxConfig, options: Vec<ComboOption>) -> Self {
        let discipline = config.resolved_discipline();
        Self {
            config,
            discipline,
            options,
            selection: SelectionState::new(),
            state: ControlState::Collapsed,
            text: String::new(),
            focus: FocusQueue::default(),
        }
    }

    /// The configuration this control was built with.
    pub fn config(&self) -> &ComboboxConfig {
        &self.config
    }

    /// The effective selection discipline.
    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    /// The full, unfiltered option list.
    pub fn options(&self) -> &[ComboOption] {
        &self.options
    }

    /// Current state.
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Returns `true` while the list is open.
    pub fn is_expanded(&self) -> bool {
        self.state == ControlState::Expanded
    }

    /// Mirrored text-box content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The query backing the match.
    pub fn filter(&self) -> &str {
        self.selection.filter()
    }

    /// The selected option, if any.
    pub fn selected(&self) -> Option<&ComboOption> {
        self.selection.selected()
    }

    /// Returns `true` if the selected option's key is no longer in the option list.
    ///
    /// The control never clears such a selection on its own; hosts replacing
    /// the list decide whether to [`reset`](Self::reset).
    pub fn selection_is_orphaned(&self) -> bool {
        self.selection
            .selected_key()
            .is_some_and(|key| self.find_option(key).is_none())
    }

    /// Options matching the current filter, recomputed on every call.
    pub fn filtered_options(&self) -> Vec<&ComboOption> {
        filter_options(&self.options, self.selection.filter())
    }

    /// Whether the popover should be shown: expanded over a non-empty list.
    pub fn is_popover_shown(&self) -> bool {
        self.is_expanded() && self.has_matches()
    }

    /// Returns `true` if a deferred focus request is outstanding.
    pub fn has_pending_focus(&self) -> bool {
        self.focus.is_pending()
    }

    /// Replace the option list.
    ///
    /// The selection is kept even if its key disappears. If the current filter
    /// no longer matches anything, the list collapses.
    pub fn set_options(&mut self, options: Vec<ComboOption>) -> Transition {
        self.options = options;
        let mut fx = Effects::default();
        self.enforce_expansion_invariant(&mut fx);
        self.finish(fx)
    }

    /// Programmatic reset: close and clear text, filter, and selection.
    pub fn reset(&mut self) -> Transition {
        let mut fx = Effects::default();
        self.clear_all(&mut fx);
        self.finish(fx)
    }

    /// Resolve a deferred focus request against the rendered list.
    ///
    /// `navigable` is the number of focusable rows in the popover. Returns the
    /// row index to focus, or `None` if the request is stale, the list closed
    /// in the meantime, or there is nothing to focus.
    pub fn resolve_focus(&mut self, request: &FocusRequest, navigable: usize) -> Option<usize> {
        if !self.focus.take(request) {
            tracing::trace!(?request, "dropping stale focus request");
            return None;
        }
        if !self.is_popover_shown() {
            return None;
        }
        request.target.resolve(navigable)
    }

    /// Drop any outstanding focus request, for example when the host unmounts.
    pub fn cancel_pending_focus(&mut self) {
        self.focus.cancel();
    }

    /// Handle one event and report what the host must do.
    pub fn handle(&mut self, event: ComboEvent<'_>) -> Transition {
        if self.config.disabled {
            tracing::trace!(?event, "ignoring event on disabled combobox");
            return self.finish(Effects::default());
        }

        let action = action_for(self.state, event.kind(), self.discipline);
        tracing::trace!(?event, ?action, state = ?self.state, "handling combobox event");

        let option = match event.option_key() {
            Some(key) => match self.find_option(key) {
                Some(option) => Some(option.clone()),
                None => {
                    tracing::warn!(key, "event names an option that is not in the list");
                    return self.finish(Effects::default());
                }
            },
            None => None,
        };

        let mut fx = Effects::default();
        match action {
            Action::Ignore => {}
            Action::CloseAndSyncFilter => {
                self.close(&mut fx);
                self.set_filter(self.text.clone(), &mut fx);
            }
            Action::ForwardClick => fx.intents.push(Intent::Click),
            Action::Open {
                target,
                require_text,
            } => {
                if !require_text || !is_blank(&self.text) {
                    let target = match target {
                        OpenTarget::SelectionOffset => {
                            FocusTarget::Index(usize::from(self.selection.selected().is_some()))
                        }
                        OpenTarget::Last => FocusTarget::Last,
                    };
                    self.open_to(target, &mut fx);
                }
            }
            Action::Close => self.close(&mut fx),
            Action::Edit => {
                if let ComboEvent::TextChanged(value) = event {
                    self.edit(value, &mut fx);
                }
            }
            Action::RevertText => self.write_text(self.selection.filter().into(), &mut fx),
            Action::PreventSubmit => fx.intents.push(Intent::PreventDefault),
            Action::CommitFirstMatch => self.commit_first_match(&mut fx),
            Action::CommitFirstMatchAndClose => {
                self.commit_first_match(&mut fx);
                self.close(&mut fx);
            }
            Action::Reset => {
                self.clear_all(&mut fx);
                if matches!(event, ComboEvent::OptionKey(..)) {
                    fx.intents.push(Intent::FocusInput);
                }
            }
            Action::SyncFilter => self.set_filter(self.text.clone(), &mut fx),
            Action::Preview => self.select(option, &mut fx),
            Action::PreviewInline => {
                if let Some(option) = option {
                    self.write_text(option.text.clone(), &mut fx);
                    self.select(Some(option), &mut fx);
                }
            }
            Action::Commit => {
                if let Some(option) = option {
                    self.commit(option, &mut fx);
                    if matches!(event, ComboEvent::OptionActivated(_)) {
                        fx.intents.push(Intent::FocusInput);
                    }
                }
            }
            Action::CommitPreventDefault => {
                fx.intents.push(Intent::PreventDefault);
                if let Some(option) = option {
                    self.commit(option, &mut fx);
                    fx.intents.push(Intent::FocusInput);
                }
            }
            Action::Dismiss => self.dismiss(&mut fx),
            Action::ReportCustomEntry => {
                let filter = self.selection.filter();
                if self.selection.selected().is_none() && !is_blank(filter) {
                    fx.intents
                        .push(Intent::SelectionChanged(Some(ComboOption::custom(filter))));
                }
            }
        }

        self.enforce_expansion_invariant(&mut fx);
        self.finish(fx)
    }

    fn edit(&mut self, value: &str, fx: &mut Effects) {
        if self.text != value {
            self.text = value.into();
            fx.changes |= Changes::TEXT;
        }
        self.set_filter(value.into(), fx);
        self.select(None, fx);

        if is_blank(value) {
            self.close(fx);
            return;
        }

        self.expand(fx);
        match self.discipline {
            Discipline::Manual => {}
            Discipline::Auto => {
                let first = first_match(&self.options, value).cloned();
                self.select(first, fx);
            }
            Discipline::AutoInline => {
                let first = first_match(&self.options, value).cloned();
                if let Some(option) = &first
                    && starts_with_ignore_case(&option.text, value)
                {
                    let caret = CaretRange {
                        start: char_offset(&option.text, value.len()),
                        end: option.text.chars().count(),
                    };
                    self.write_text(option.text.clone(), fx);
                    fx.intents.push(Intent::SetCaretRange(caret));
                }
                self.select(first, fx);
            }
        }
    }

    fn commit_first_match(&mut self, fx: &mut Effects) {
        if self.text.is_empty() {
            return;
        }
        if let Some(option) = first_match(&self.options, &self.text).cloned() {
            self.commit(option, fx);
        }
    }

    fn commit(&mut self, option: ComboOption, fx: &mut Effects) {
        tracing::debug!(key = %option.key, "committing option");
        let text = option.text.clone();
        self.select(Some(option), fx);
        self.write_text(text.clone(), fx);
        self.set_filter(text, fx);
        self.close(fx);
    }

    fn dismiss(&mut self, fx: &mut Effects) {
        self.close(fx);
        match self.discipline {
            Discipline::Manual => self.set_filter(self.text.clone(), fx),
            Discipline::Auto => {
                let text = self.selected_text();
                self.set_filter(text.clone(), fx);
                self.write_text(text, fx);
            }
            Discipline::AutoInline => self.set_filter(self.selected_text(), fx),
        }
    }

    fn clear_all(&mut self, fx: &mut Effects) {
        tracing::debug!("resetting combobox");
        self.close(fx);
        self.write_text(String::new(), fx);
        self.select(None, fx);
        self.set_filter(String::new(), fx);
    }

    fn selected_text(&self) -> String {
        self.selection
            .selected()
            .map(|o| o.text.clone())
            .unwrap_or_default()
    }

    fn find_option(&self, key: &str) -> Option<&ComboOption> {
        self.options.iter().find(|o| o.key == key)
    }

    fn has_matches(&self) -> bool {
        first_match(&self.options, self.selection.filter()).is_some()
    }

    fn select(&mut self, option: Option<ComboOption>, fx: &mut Effects) {
        if self.selection.selected() != option.as_ref() {
            fx.changes |= Changes::SELECTION;
        }
        let notify = self.selection.select(option);
        fx.intents.push(Intent::SelectionChanged(notify));
    }

    fn set_filter(&mut self, filter: String, fx: &mut Effects) {
        if self.selection.filter() != filter {
            fx.changes |= Changes::FILTER;
            self.selection.set_filter(filter);
        }
    }

    fn write_text(&mut self, text: String, fx: &mut Effects) {
        if self.text != text {
            fx.changes |= Changes::TEXT;
            self.text.clone_from(&text);
        }
        fx.intents.push(Intent::SetText(text));
    }

    /// Expand without moving focus. Refused while nothing matches.
    fn expand(&mut self, fx: &mut Effects) -> bool {
        if !self.has_matches() {
            return false;
        }
        if self.state == ControlState::Collapsed {
            self.state = ControlState::Expanded;
            fx.changes |= Changes::EXPANSION;
            fx.intents.push(Intent::OpenPopover);
        }
        true
    }

    fn open_to(&mut self, target: FocusTarget, fx: &mut Effects) {
        if self.expand(fx) {
            let request = self.focus.schedule(target);
            fx.intents.push(Intent::FocusList(request));
        }
    }

    fn close(&mut self, fx: &mut Effects) {
        self.focus.cancel();
        if self.state == ControlState::Expanded {
            self.state = ControlState::Collapsed;
            fx.changes |= Changes::EXPANSION;
            fx.intents.push(Intent::ClosePopover);
        }
    }

    fn enforce_expansion_invariant(&mut self, fx: &mut Effects) {
        if self.is_expanded() && !self.has_matches() {
            tracing::trace!(filter = self.selection.filter(), "no matches, collapsing");
            self.close(fx);
        }
    }

    fn finish(&self, fx: Effects) -> Transition {
        Transition {
            state: self.state,
            intents: fx.intents,
            changes: fx.changes,
        }
    }
}

#[derive(Default)]
struct Effects {
    intents: Intents,
    changes: Changes,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn fruit() -> Vec<ComboOption> {
        vec![
            ComboOption::new("1", "Apple"),
            ComboOption::new("2", "Apricot"),
            ComboOption::new("3", "Banana"),
            ComboOption::new("4", "Blood orange"),
        ]
    }

    fn combo(discipline: Discipline) -> Combobox {
        let config = ComboboxConfig::default()
            .with_label("Fruit")
            .with_arrow_label("Show fruit")
            .with_selection_type(discipline);
        Combobox::try_new(config, fruit()).unwrap()
    }

    fn keys<'a>(notes: impl Iterator<Item = Option<&'a ComboOption>>) -> Vec<Option<&'a str>> {
        notes.map(|o| o.map(|o| o.key.as_str())).collect()
    }

    fn focus_request(t: &Transition) -> Option<FocusRequest> {
        t.intents.iter().find_map(|i| match i {
            Intent::FocusList(r) => Some(*r),
            _ => None,
        })
    }

    #[test]
    fn starts_collapsed_and_empty() {
        let c = combo(Discipline::Manual);
        assert_eq!(c.state(), ControlState::Collapsed);
        assert_eq!(c.text(), "");
        assert_eq!(c.filter(), "");
        assert!(c.selected().is_none());
        assert!(!c.has_pending_focus());
    }

    #[test]
    fn typing_expands_and_clears_selection() {
        let mut c = combo(Discipline::Manual);
        let t = c.handle(ComboEvent::TextChanged("ap"));
        assert_eq!(t.state, ControlState::Expanded);
        assert_eq!(c.filter(), "ap");
        assert_eq!(keys(t.notifications()), vec![None]);
        assert_eq!(
            t.changes,
            Changes::TEXT | Changes::FILTER | Changes::EXPANSION
        );
        assert_eq!(c.filtered_options().len(), 2);
        assert!(c.is_popover_shown());
    }

    #[test]
    fn blank_text_closes() {
        let mut c = combo(Discipline::Manual);
        c.handle(ComboEvent::TextChanged("ap"));
        let t = c.handle(ComboEvent::TextChanged("  "));
        assert_eq!(t.state, ControlState::Collapsed);
        assert!(t.intents.contains(&Intent::ClosePopover));
        assert_eq!(c.filter(), "  ");
    }

    #[test]
    fn no_match_forces_collapse() {
        let mut c = combo(Discipline::Manual);
        c.handle(ComboEvent::TextChanged("ap"));
        let t = c.handle(ComboEvent::TextChanged("apz"));
        assert_eq!(t.state, ControlState::Collapsed);
        assert!(!c.is_popover_shown());
        assert_eq!(c.text(), "apz");

        // Starting from collapsed, a non-matching edit never opens at all.
        let mut c = combo(Discipline::Auto);
        let t = c.handle(ComboEvent::TextChanged("zzz"));
        assert_eq!(t.state, ControlState::Collapsed);
        assert!(!t.intents.contains(&Intent::OpenPopover));
        assert_eq!(keys(t.notifications()), vec![None, None]);
    }

    #[test]
    fn auto_selects_first_match_while_typing() {
        let mut c = combo(Discipline::Auto);
        let t = c.handle(ComboEvent::TextChanged("b"));
        assert_eq!(keys(t.notifications()), vec![None, Some("3")]);
        assert_eq!(c.selected().map(|o| o.key.as_str()), Some("3"));
        // Auto never rewrites the text box while typing.
        assert!(!t.intents.iter().any(|i| matches!(i, Intent::SetText(_))));
    }

    #[test]
    fn inline_completes_first_match() {
        let mut c = combo(Discipline::AutoInline);
        let t = c.handle(ComboEvent::TextChanged("Ap"));
        assert_eq!(c.selected().map(|o| o.text.as_str()), Some("Apple"));
        assert_eq!(c.text(), "Apple");
        assert_eq!(c.filter(), "Ap");
        assert!(t.intents.contains(&Intent::SetText("Apple".into())));
        assert!(
            t.intents
                .contains(&Intent::SetCaretRange(CaretRange { start: 2, end: 5 }))
        );
    }

    #[test]
    fn inline_skips_nudge_for_mid_word_match() {
        let mut c = combo(Discipline::AutoInline);
        let t = c.handle(ComboEvent::TextChanged("orange"));
        // Matches "Blood orange" on a word start, but it is not a prefix.
        assert_eq!(c.selected().map(|o| o.key.as_str()), Some("4"));
        assert_eq!(c.text(), "orange");
        assert!(!t.intents.iter().any(|i| matches!(i, Intent::SetCaretRange(_))));
    }

    #[test]
    fn backspace_reverts_to_filter() {
        let mut c = combo(Discipline::AutoInline);
        c.handle(ComboEvent::TextChanged("Ap"));
        let t = c.handle(ComboEvent::Key(Key::Backspace));
        assert_eq!(c.text(), "Ap");
        assert_eq!(t.intents.as_slice(), &[Intent::SetText("Ap".into())]);
        assert_eq!(t.state, ControlState::Expanded);
    }

    #[test]
    fn enter_in_manual_prevents_submission_only() {
        let mut c = combo(Discipline::Manual);
        c.handle(ComboEvent::TextChanged("ap"));
        let t = c.handle(ComboEvent::Key(Key::Enter));
        assert_eq!(t.intents.as_slice(), &[Intent::PreventDefault]);
        assert_eq!(t.state, ControlState::Expanded);
        assert!(c.selected().is_none());
    }

    #[test]
    fn enter_in_auto_commits_first_match() {
        let mut c = combo(Discipline::Auto);
        c.handle(ComboEvent::TextChanged("apr"));
        let t = c.handle(ComboEvent::Key(Key::Enter));
        assert_eq!(t.state, ControlState::Collapsed);
        assert_eq!(c.text(), "Apricot");
        assert_eq!(c.filter(), "Apricot");
        assert_eq!(keys(t.notifications()), vec![Some("2")]);
    }

    #[test]
    fn enter_without_match_changes_nothing() {
        let mut c = combo(Discipline::Auto);
        c.handle(ComboEvent::TextChanged("zz"));
        let t = c.handle(ComboEvent::Key(Key::Enter));
        assert!(t.intents.is_empty());
        assert!(t.changes.is_empty());
    }

    #[test]
    fn escape_resets_everything() {
        let mut c = combo(Discipline::Auto);
        c.handle(ComboEvent::TextChanged("ban"));
        let t = c.handle(ComboEvent::Key(Key::Escape));
        assert_eq!(t.state, ControlState::Collapsed);
        assert_eq!(c.text(), "");
        assert_eq!(c.filter(), "");
        assert!(c.selected().is_none());
        assert_eq!(keys(t.notifications()), vec![None]);
        assert!(t.intents.contains(&Intent::SetText(String::new())));
    }

    #[test]
    fn select_then_escape_returns_to_empty() {
        let mut c = combo(Discipline::Manual);
        c.handle(ComboEvent::Key(Key::Other));
        c.handle(ComboEvent::TextChanged("a"));
        c.handle(ComboEvent::OptionActivated("2"));
        assert_eq!(c.selected().map(|o| o.key.as_str()), Some("2"));
        c.handle(ComboEvent::Key(Key::Escape));
        assert_eq!(c.filter(), "");
        assert!(c.selected().is_none());
        assert_eq!(c.state(), ControlState::Collapsed);
    }

    #[test]
    fn tab_commits_in_auto_and_closes_in_manual() {
        let mut c = combo(Discipline::AutoInline);
        c.handle(ComboEvent::TextChanged("ban"));
        let t = c.handle(ComboEvent::Key(Key::Tab));
        assert_eq!(t.state, ControlState::Collapsed);
        assert_eq!(c.filter(), "Banana");

        let mut c = combo(Discipline::Manual);
        c.handle(ComboEvent::TextChanged("ban"));
        let t = c.handle(ComboEvent::Key(Key::Tab));
        assert_eq!(t.state, ControlState::Collapsed);
        assert_eq!(t.intents.as_slice(), &[Intent::ClosePopover]);
        assert!(c.selected().is_none());
        assert_eq!(c.filter(), "ban");
    }

    #[test]
    fn arrows_need_text_outside_inline() {
        let mut c = combo(Discipline::Auto);
        let t = c.handle(ComboEvent::Key(Key::ArrowDown));
        assert_eq!(t.state, ControlState::Collapsed);
        assert!(t.intents.is_empty());

        let mut c = combo(Discipline::AutoInline);
        let t = c.handle(ComboEvent::Key(Key::ArrowDown));
        assert_eq!(t.state, ControlState::Expanded);
        let request = focus_request(&t).unwrap();
        assert_eq!(request.target, FocusTarget::Index(0));
        assert_eq!(c.resolve_focus(&request, 4), Some(0));
    }

    #[test]
    fn arrow_down_skips_one_row_when_selected() {
        let mut c = combo(Discipline::Auto);
        c.handle(ComboEvent::TextChanged("b"));
        c.handle(ComboEvent::Key(Key::Tab));
        assert!(c.selected().is_some());

        let t = c.handle(ComboEvent::Key(Key::ArrowDown));
        assert_eq!(focus_request(&t).unwrap().target, FocusTarget::Index(1));
    }

    #[test]
    fn arrow_up_targets_last_row() {
        let mut c = combo(Discipline::Manual);
        c.handle(ComboEvent::TextChanged("b"));
        let t = c.handle(ComboEvent::Key(Key::ArrowUp));
        let request = focus_request(&t).unwrap();
        assert_eq!(request.target, FocusTarget::Last);
        assert_eq!(c.resolve_focus(&request, 2), Some(1));
    }

    #[test]
    fn horizontal_arrows_sync_filter() {
        let mut c = combo(Discipline::AutoInline);
        c.handle(ComboEvent::TextChanged("Ap"));
        let t = c.handle(ComboEvent::Key(Key::ArrowRight));
        assert_eq!(c.filter(), "Apple");
        assert_eq!(t.changes, Changes::FILTER);
        assert_eq!(t.state, ControlState::Expanded);
    }

    #[test]
    fn option_focus_follows_discipline() {
        let mut c = combo(Discipline::Manual);
        c.handle(ComboEvent::TextChanged("ap"));
        let t = c.handle(ComboEvent::OptionFocused("2"));
        assert!(t.intents.is_empty());

        let mut c = combo(Discipline::Auto);
        c.handle(ComboEvent::TextChanged("ap"));
        let t = c.handle(ComboEvent::OptionFocused("2"));
        assert_eq!(keys(t.notifications()), vec![Some("2")]);
        assert_eq!(c.text(), "ap");

        let mut c = combo(Discipline::AutoInline);
        c.handle(ComboEvent::TextChanged("ap"));
        let t = c.handle(ComboEvent::OptionFocused("2"));
        assert_eq!(c.text(), "Apricot");
        assert_eq!(c.filter(), "ap");
        assert!(t.intents.contains(&Intent::SetText("Apricot".into())));
    }

    #[test]
    fn option_activation_commits_and_returns_focus() {
        let mut c = combo(Discipline::Manual);
        c.handle(ComboEvent::TextChanged("b"));
        let t = c.handle(ComboEvent::OptionActivated("4"));
        assert_eq!(t.state, ControlState::Collapsed);
        assert_eq!(c.text(), "Blood orange");
        assert_eq!(c.filter(), "Blood orange");
        assert_eq!(
            t.intents.as_slice(),
            &[
                Intent::SelectionChanged(Some(ComboOption::new("4", "Blood orange"))),
                Intent::SetText("Blood orange".into()),
                Intent::ClosePopover,
                Intent::FocusInput,
            ]
        );
    }

    #[test]
    fn option_keys() {
        let mut c = combo(Discipline::Manual);
        c.handle(ComboEvent::TextChanged("b"));
        let t = c.handle(ComboEvent::OptionKey("3", Key::Space));
        assert_eq!(t.intents.first(), Some(&Intent::PreventDefault));
        assert_eq!(c.selected().map(|o| o.key.as_str()), Some("3"));

        c.handle(ComboEvent::TextChanged("b"));
        let t = c.handle(ComboEvent::OptionKey("3", Key::Escape));
        assert_eq!(c.text(), "");
        assert!(t.intents.contains(&Intent::FocusInput));

        c.handle(ComboEvent::TextChanged("b"));
        c.handle(ComboEvent::OptionKey("4", Key::Tab));
        assert_eq!(c.selected().map(|o| o.key.as_str()), Some("4"));
        assert_eq!(c.state(), ControlState::Collapsed);
    }

    #[test]
    fn unknown_option_key_is_ignored() {
        let mut c = combo(Discipline::Auto);
        c.handle(ComboEvent::TextChanged("b"));
        let t = c.handle(ComboEvent::OptionActivated("nope"));
        assert!(t.intents.is_empty());
        assert_eq!(t.state, ControlState::Expanded);
    }

    #[test]
    fn surface_click_forwards_when_collapsed_and_closes_when_expanded() {
        let mut c = combo(Discipline::AutoInline);
        let t = c.handle(ComboEvent::SurfaceClick);
        assert_eq!(t.intents.as_slice(), &[Intent::Click]);

        c.handle(ComboEvent::TextChanged("Ap"));
        let t = c.handle(ComboEvent::SurfaceClick);
        assert_eq!(t.state, ControlState::Collapsed);
        assert_eq!(c.filter(), "Apple");
        assert!(!t.intents.contains(&Intent::Click));
    }

    #[test]
    fn addon_button_toggles() {
        let mut c = combo(Discipline::AutoInline);
        let t = c.handle(ComboEvent::AddonClick);
        assert_eq!(t.state, ControlState::Expanded);
        let request = focus_request(&t).unwrap();
        assert_eq!(request.target, FocusTarget::Index(0));

        let t = c.handle(ComboEvent::AddonClick);
        assert_eq!(t.state, ControlState::Collapsed);
        assert_eq!(t.intents.as_slice(), &[Intent::ClosePopover]);
        // The popover closed before the deferred focus ran.
        assert_eq!(c.resolve_focus(&request, 4), None);
    }

    #[test]
    fn outside_click_per_discipline() {
        let mut c = combo(Discipline::Manual);
        c.handle(ComboEvent::TextChanged("ap"));
        c.handle(ComboEvent::OutsideClick);
        assert_eq!(c.filter(), "ap");
        assert_eq!(c.state(), ControlState::Collapsed);

        let mut c = combo(Discipline::Auto);
        c.handle(ComboEvent::TextChanged("apr"));
        let t = c.handle(ComboEvent::OutsideClick);
        assert_eq!(c.filter(), "Apricot");
        assert_eq!(c.text(), "Apricot");
        assert!(t.intents.contains(&Intent::SetText("Apricot".into())));

        let mut c = combo(Discipline::AutoInline);
        c.handle(ComboEvent::TextChanged("ap"));
        c.handle(ComboEvent::OptionFocused("2"));
        c.handle(ComboEvent::OutsideClick);
        assert_eq!(c.filter(), "Apricot");
    }

    #[test]
    fn outside_click_in_auto_without_selection_clears_text() {
        let mut c = combo(Discipline::Auto);
        c.handle(ComboEvent::TextChanged("b"));
        c.handle(ComboEvent::OptionActivated("3"));
        c.reset();
        assert!(c.selected().is_none());
        // The arrow button opens the full list without any typing.
        c.handle(ComboEvent::AddonClick);
        assert!(c.is_expanded());
        c.handle(ComboEvent::OutsideClick);
        assert_eq!(c.text(), "");
        assert_eq!(c.filter(), "");
    }

    #[test]
    fn outside_click_is_idempotent() {
        let mut c = combo(Discipline::Auto);
        c.handle(ComboEvent::TextChanged("apr"));
        c.handle(ComboEvent::OutsideClick);
        let first = String::from(c.filter());
        let t = c.handle(ComboEvent::OutsideClick);
        assert_eq!(c.filter(), first);
        assert!(t.intents.is_empty());
    }

    #[test]
    fn blur_reports_custom_entry_once() {
        let mut c = combo(Discipline::Manual);
        c.handle(ComboEvent::TextChanged("xyz"));
        let t = c.handle(ComboEvent::Blur);
        assert_eq!(
            t.intents.as_slice(),
            &[Intent::SelectionChanged(Some(ComboOption::custom("xyz")))]
        );
        assert!(c.selected().is_none());
        assert!(t.changes.is_empty());
    }

    #[test]
    fn blur_is_silent_with_selection_or_blank_filter_or_auto() {
        let mut c = combo(Discipline::Manual);
        let t = c.handle(ComboEvent::Blur);
        assert!(t.intents.is_empty());

        c.handle(ComboEvent::TextChanged("b"));
        c.handle(ComboEvent::OptionActivated("3"));
        let t = c.handle(ComboEvent::Blur);
        assert!(t.intents.is_empty());

        let mut c = combo(Discipline::Auto);
        c.handle(ComboEvent::TextChanged("xyz"));
        assert!(c.handle(ComboEvent::Blur).intents.is_empty());
    }

    #[test]
    fn reselecting_same_option_notifies_once_more() {
        let mut c = combo(Discipline::Auto);
        c.handle(ComboEvent::TextChanged("ban"));
        let first = c.handle(ComboEvent::OptionActivated("3"));
        let open = c.handle(ComboEvent::Key(Key::ArrowDown));
        let again = c.handle(ComboEvent::OptionKey("3", Key::Enter));

        assert_eq!(keys(first.notifications()), vec![Some("3")]);
        assert_eq!(open.notifications().count(), 0);
        assert_eq!(keys(again.notifications()), vec![Some("3")]);
        assert_eq!(c.selected().map(|o| o.key.as_str()), Some("3"));
        assert!(!again.changes.contains(Changes::SELECTION));
    }

    #[test]
    fn disabled_ignores_everything() {
        let config = ComboboxConfig::default()
            .with_label("Fruit")
            .with_disabled(true);
        let mut c = Combobox::new(config, fruit());
        for event in [
            ComboEvent::SurfaceClick,
            ComboEvent::TextChanged("ap"),
            ComboEvent::Key(Key::ArrowDown),
            ComboEvent::Blur,
        ] {
            let t = c.handle(event);
            assert!(t.intents.is_empty());
        }
        assert_eq!(c.text(), "");
    }

    #[test]
    fn stale_focus_requests_resolve_to_none() {
        let mut c = combo(Discipline::Manual);
        c.handle(ComboEvent::TextChanged("b"));
        let older = focus_request(&c.handle(ComboEvent::Key(Key::ArrowDown))).unwrap();
        let newer = focus_request(&c.handle(ComboEvent::Key(Key::ArrowUp))).unwrap();
        assert_eq!(c.resolve_focus(&older, 2), None);
        assert_eq!(c.resolve_focus(&newer, 2), Some(1));

        let request = focus_request(&c.handle(ComboEvent::Key(Key::ArrowDown))).unwrap();
        c.cancel_pending_focus();
        assert_eq!(c.resolve_focus(&request, 2), None);
    }

    #[test]
    fn replacing_options_keeps_orphaned_selection() {
        let mut c = combo(Discipline::Manual);
        c.handle(ComboEvent::TextChanged("ban"));
        c.handle(ComboEvent::OptionActivated("3"));
        c.handle(ComboEvent::Key(Key::ArrowDown));
        assert!(c.is_expanded());

        let t = c.set_options(vec![ComboOption::new("9", "Cherry")]);
        assert_eq!(c.selected().map(|o| o.key.as_str()), Some("3"));
        assert!(c.selection_is_orphaned());
        // "Banana" no longer matches anything.
        assert_eq!(t.state, ControlState::Collapsed);
        assert!(t.changes.contains(Changes::EXPANSION));
    }

    #[test]
    fn non_filterable_runs_manual() {
        let config = ComboboxConfig::default()
            .with_label("Fruit")
            .with_filterable(false)
            .with_selection_type(Discipline::AutoInline);
        let mut c = Combobox::try_new(config, fruit()).unwrap();
        assert_eq!(c.discipline(), Discipline::Manual);
        let t = c.handle(ComboEvent::TextChanged("Ap"));
        assert_eq!(keys(t.notifications()), vec![None]);
        assert_eq!(c.text(), "Ap");
    }

    #[test]
    fn try_new_rejects_contract_violations() {
        let err = Combobox::try_new(ComboboxConfig::default(), fruit()).unwrap_err();
        assert_eq!(err.0.len(), 1);
    }
}
