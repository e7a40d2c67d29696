use gtk4::prelude::*;
use gtk4::{ApplicationWindow, Box as GtkBox, Dialog, Entry, Label, Orientation, ResponseType};

use crate::editor::TextPrompt;

pub(super) const TEXT_PROMPT_TITLE: &str = "Glasspen Text";

fn prompt_copy(prompt: &TextPrompt) -> (&'static str, &str) {
    match prompt {
        TextPrompt::Create { .. } => ("Enter text:", ""),
        TextPrompt::Edit { seed, .. } => ("Edit text:", seed.as_str()),
    }
}

/// Accepted text, or `None` when the dialog was cancelled or closed.
fn answer_for(response: ResponseType, text: &str) -> Option<String> {
    (response == ResponseType::Accept).then(|| text.to_string())
}

/// Opens a modal entry dialog and reports the answer exactly once.
pub(super) fn open_text_prompt(
    parent: &ApplicationWindow,
    prompt: TextPrompt,
    on_answer: impl Fn(TextPrompt, Option<String>) + 'static,
) {
    let (heading, seed) = prompt_copy(&prompt);

    let dialog = Dialog::new();
    dialog.set_title(Some(TEXT_PROMPT_TITLE));
    dialog.set_transient_for(Some(parent));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.add_button("Cancel", ResponseType::Cancel);
    dialog.add_button("OK", ResponseType::Accept);
    dialog.set_default_response(ResponseType::Accept);

    let entry = Entry::new();
    entry.set_text(seed);
    entry.set_activates_default(true);
    entry.set_width_chars(32);

    let content = GtkBox::new(Orientation::Vertical, 8);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    content.set_margin_start(12);
    content.set_margin_end(12);
    content.append(&Label::new(Some(heading)));
    content.append(&entry);
    dialog.content_area().append(&content);

    let pending = std::cell::RefCell::new(Some(prompt));
    dialog.connect_response(move |dialog, response| {
        let Some(prompt) = pending.borrow_mut().take() else {
            return;
        };
        let answer = answer_for(response, entry.text().as_str());
        tracing::debug!(?response, accepted = answer.is_some(), "text prompt closed");
        on_answer(prompt, answer);
        dialog.close();
    });

    dialog.present();
    super::hypr::request_overlay_window("text-prompt", TEXT_PROMPT_TITLE, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextStyle;
    use crate::geometry::{Color, ToolPoint};

    #[test]
    fn edit_prompt_is_seeded_with_existing_text() {
        let prompt = TextPrompt::Edit {
            index: 2,
            seed: "hello".to_string(),
        };
        assert_eq!(prompt_copy(&prompt), ("Edit text:", "hello"));

        let create = TextPrompt::Create {
            position: ToolPoint::new(1, 2),
            style: TextStyle {
                color: Color::RED,
                font_size: 24,
                bold: false,
                italic: false,
            },
        };
        assert_eq!(prompt_copy(&create), ("Enter text:", ""));
    }

    #[test]
    fn only_accept_yields_an_answer() {
        assert_eq!(
            answer_for(ResponseType::Accept, "note"),
            Some("note".to_string())
        );
        assert_eq!(answer_for(ResponseType::Cancel, "note"), None);
        assert_eq!(answer_for(ResponseType::DeleteEvent, "note"), None);
    }
}
