// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus handoff between the text box and the option list.
//!
//! Opening the popover asks the host to move focus into the list, but the
//! list rows only exist after the next render. The controller therefore hands
//! out a [`FocusRequest`] which the host resolves after rendering via
//! [`Combobox::resolve_focus`](crate::Combobox::resolve_focus). A request that
//! arrives after the popover closed again, or after a newer request was
//! issued, resolves to `None`.
//!
//! Movement *within* the list is the host's focus coordinator's job.
//! [`ListFocus`] is a small reference traversal over `0..count` with optional
//! wraparound that hosts can use for arrow-key movement between rows.
//!
//! ```
//! use understory_combobox::focus::{ListFocus, Navigation, WrapMode};
//!
//! let focus = ListFocus { wrap: WrapMode::Wrap };
//! assert_eq!(focus.next(Some(2), Navigation::Next, 3), Some(0));
//! assert_eq!(focus.next(None, Navigation::Prev, 3), Some(2));
//! ```

/// Which navigable descendant of the popover should receive focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// The descendant at this index, clamped to the last one.
    Index(usize),
    /// The last navigable descendant.
    Last,
}

impl FocusTarget {
    /// Resolve against the number of navigable descendants actually rendered.
    #[must_use]
    pub fn resolve(self, navigable: usize) -> Option<usize> {
        let last = navigable.checked_sub(1)?;
        Some(match self {
            Self::Index(i) => i.min(last),
            Self::Last => last,
        })
    }
}

/// A deferred "move focus into the list" request.
///
/// Issued alongside the open intent; resolve it once the list has rendered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FocusRequest {
    /// Descendant that should receive focus.
    pub target: FocusTarget,
    ticket: u64,
}

/// Tracks the single outstanding focus request of a control.
#[derive(Clone, Debug, Default)]
pub(crate) struct FocusQueue {
    ticket: u64,
    pending: Option<FocusRequest>,
}

impl FocusQueue {
    /// Issue a new request, superseding any outstanding one.
    pub(crate) fn schedule(&mut self, target: FocusTarget) -> FocusRequest {
        self.ticket = self.ticket.wrapping_add(1);
        let request = FocusRequest {
            target,
            ticket: self.ticket,
        };
        self.pending = Some(request);
        request
    }

    /// Drop any outstanding request so it resolves to nothing.
    pub(crate) fn cancel(&mut self) {
        self.ticket = self.ticket.wrapping_add(1);
        self.pending = None;
    }

    /// Consume `request` if it is still the outstanding one.
    pub(crate) fn take(&mut self, request: &FocusRequest) -> bool {
        if self.pending.as_ref() == Some(request) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Movement intent within the option list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Next row (for example, ArrowDown).
    Next,
    /// Previous row (for example, ArrowUp).
    Prev,
    /// First row (for example, Home).
    First,
    /// Last row (for example, End).
    Last,
}

/// Wrap behavior at the ends of the list.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Stop at the first and last rows.
    Never,
    /// Wrap from the last row to the first and back.
    #[default]
    Wrap,
}

/// Linear focus traversal over list rows `0..count`.
#[derive(Copy, Clone, Debug, Default)]
pub struct ListFocus {
    /// Wrap behavior when stepping past either end.
    pub wrap: WrapMode,
}

impl ListFocus {
    /// Row that should receive focus after `direction` from `origin`.
    ///
    /// With no origin (focus still in the text box), `Next` enters at the
    /// first row and `Prev` at the last. Returns `None` for an empty list or
    /// when stepping off an end without wrap.
    #[must_use]
    pub fn next(&self, origin: Option<usize>, direction: Navigation, count: usize) -> Option<usize> {
        let last = count.checked_sub(1)?;
        let wraps = matches!(self.wrap, WrapMode::Wrap);
        match (direction, origin) {
            (Navigation::First, _) | (Navigation::Next, None) => Some(0),
            (Navigation::Last, _) | (Navigation::Prev, None) => Some(last),
            (Navigation::Next, Some(pos)) => {
                if pos < last {
                    Some(pos + 1)
                } else if wraps {
                    Some(0)
                } else {
                    None
                }
            }
            (Navigation::Prev, Some(pos)) => {
                if pos > last {
                    Some(last)
                } else if pos > 0 {
                    Some(pos - 1)
                } else if wraps {
                    Some(last)
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_resolution_clamps() {
        assert_eq!(FocusTarget::Index(0).resolve(3), Some(0));
        assert_eq!(FocusTarget::Index(5).resolve(3), Some(2));
        assert_eq!(FocusTarget::Last.resolve(3), Some(2));
        assert_eq!(FocusTarget::Index(0).resolve(0), None);
        assert_eq!(FocusTarget::Last.resolve(0), None);
    }

    #[test]
    fn newer_request_supersedes_older() {
        let mut queue = FocusQueue::default();
        let first = queue.schedule(FocusTarget::Index(0));
        let second = queue.schedule(FocusTarget::Last);
        assert!(!queue.take(&first));
        assert!(queue.take(&second));
        // Consumed requests do not resolve twice.
        assert!(!queue.take(&second));
    }

    #[test]
    fn cancel_invalidates_outstanding_request() {
        let mut queue = FocusQueue::default();
        let request = queue.schedule(FocusTarget::Index(1));
        assert!(queue.is_pending());
        queue.cancel();
        assert!(!queue.is_pending());
        assert!(!queue.take(&request));
    }

    #[test]
    fn next_prev_with_wrap() {
        let focus = ListFocus { wrap: WrapMode::Wrap };
        assert_eq!(focus.next(Some(0), Navigation::Next, 3), Some(1));
        assert_eq!(focus.next(Some(2), Navigation::Next, 3), Some(0));
        assert_eq!(focus.next(Some(0), Navigation::Prev, 3), Some(2));
        assert_eq!(focus.next(None, Navigation::Next, 3), Some(0));
        assert_eq!(focus.next(None, Navigation::Prev, 3), Some(2));
    }

    #[test]
    fn no_wrap_stops_at_edges() {
        let focus = ListFocus {
            wrap: WrapMode::Never,
        };
        assert_eq!(focus.next(Some(2), Navigation::Next, 3), None);
        assert_eq!(focus.next(Some(0), Navigation::Prev, 3), None);
        assert_eq!(focus.next(Some(1), Navigation::First, 3), Some(0));
        assert_eq!(focus.next(Some(1), Navigation::Last, 3), Some(2));
    }

    #[test]
    fn empty_list_has_no_target() {
        let focus = ListFocus::default();
        assert_eq!(focus.next(None, Navigation::Next, 0), None);
        assert_eq!(focus.next(Some(0), Navigation::Last, 0), None);
    }

    #[test]
    fn stale_origin_is_clamped() {
        // The list shrank underneath the focused row.
        let focus = ListFocus { wrap: WrapMode::Wrap };
        assert_eq!(focus.next(Some(7), Navigation::Prev, 3), Some(2));
        assert_eq!(focus.next(Some(7), Navigation::Next, 3), Some(0));
    }
}
