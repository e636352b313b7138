// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted combobox session.
//!
//! Drives a [`Combobox`] through a short interaction the way a presentation
//! layer would: forward each event, apply the returned intents to a fake text
//! box, resolve deferred focus after "rendering", and print the view.
//!
//! Run with:
//! - `RUST_LOG=understory_combobox=trace cargo run -p understory_demos --example combobox_session`

use understory_combobox::focus::{ListFocus, Navigation};
use understory_combobox::keymap::Key;
use understory_combobox::{ComboEvent, ComboOption, Combobox, ComboboxConfig, Discipline, Intent};

/// Stand-in for a platform text widget.
#[derive(Debug, Default)]
struct TextBox {
    value: String,
    caret: Option<(usize, usize)>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let options = vec![
        ComboOption::new("ams", "Amsterdam"),
        ComboOption::new("ath", "Athens"),
        ComboOption::new("atl", "Atlanta"),
        ComboOption::new("bcn", "Barcelona"),
        ComboOption::new("ber", "Berlin"),
    ];
    let config = ComboboxConfig::default()
        .with_label("Destination")
        .with_arrow_label("Show destinations")
        .with_selection_type(Discipline::AutoInline);
    let mut combo = Combobox::new(config, options);
    let mut text_box = TextBox::default();
    let mut focused_row: Option<usize> = None;

    let script = [
        ComboEvent::TextChanged("At"),
        ComboEvent::Key(Key::Backspace),
        ComboEvent::TextChanged("Atl"),
        ComboEvent::Key(Key::ArrowDown),
        ComboEvent::Key(Key::Enter),
    ];

    for event in script {
        println!("> {event:?}");
        let transition = combo.handle(event);
        if let ComboEvent::TextChanged(value) = event {
            text_box.value = value.to_owned();
        }
        for intent in &transition.intents {
            match intent {
                Intent::SetText(value) => {
                    text_box.value.clone_from(value);
                    text_box.caret = None;
                }
                Intent::SetCaretRange(range) => text_box.caret = Some((range.start, range.end)),
                Intent::FocusList(request) => {
                    // Focus attaches after the list has rendered.
                    let rows = combo.view().items.len();
                    focused_row = combo.resolve_focus(request, rows);
                }
                Intent::FocusInput | Intent::ClosePopover => focused_row = None,
                other => println!("  intent: {other:?}"),
            }
        }
        println!(
            "  state={:?} text={:?} caret={:?} filter={:?} changes={:?}",
            transition.state,
            text_box.value,
            text_box.caret,
            combo.filter(),
            transition.changes,
        );
        print_list(&combo, focused_row);
    }

    // Arrow keys inside the list are the focus coordinator's job.
    combo.handle(ComboEvent::Key(Key::ArrowDown));
    let rows = combo.view().items.len();
    let next = ListFocus::default().next(None, Navigation::Prev, rows);
    if let Some(key) = next.and_then(|row| combo.view().items.get(row).map(|i| i.option.key.clone())) {
        let transition = combo.handle(ComboEvent::OptionFocused(&key));
        println!("> focus moved to {key}: {:?}", transition.intents);
    }
}

fn print_list(combo: &Combobox, focused_row: Option<usize>) {
    let view = combo.view();
    if !view.popover_shown {
        return;
    }
    for (row, item) in view.items.iter().enumerate() {
        let (before, matched, after) = item.segments();
        let focus = if focused_row == Some(row) { '>' } else { ' ' };
        let selected = if item.selected { '*' } else { ' ' };
        println!("  {focus}{selected} {before}[{matched}]{after}");
    }
}
