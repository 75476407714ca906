//! Plain-text rendering of chat state for the terminal.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use client::state::chat::{ChatMessage, ChatSession, Role, SearchSettings, Surface};
use client::state::testimony::TestimonySearch;
use wire::{PassageResponse, TestimonySearchResponse};

/// `[n] who: text` for the message at zero-based `index`. Collapsed
/// messages that carry a payload are marked with `[+]`.
pub fn message_heading(index: usize, message: &ChatMessage) -> String {
    let who = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let marker = if message.collapsed && message.result.is_some() { " [+]" } else { "" };
    format!("[{}] {who}: {}{marker}", index + 1, message.text)
}

/// Detail lines under a message heading. Nothing is shown for collapsed
/// messages.
pub fn message_details(surface: Surface, message: &ChatMessage) -> Vec<String> {
    if message.collapsed {
        return Vec::new();
    }
    if let Some(SearchSettings::Testimony(settings)) = &message.settings {
        return vec![format!("    terms: {}", settings.terms.join(", "))];
    }
    let Some(result) = &message.result else {
        return Vec::new();
    };
    match surface {
        Surface::Bible => serde_json::from_value::<PassageResponse>(result.clone())
            .map(|response| passage_lines(&response))
            .unwrap_or_default(),
        Surface::Testimony => serde_json::from_value::<TestimonySearchResponse>(result.clone())
            .map(|response| hit_lines(&response))
            .unwrap_or_default(),
    }
}

/// Heading plus details for every message in the session.
pub fn history_lines(session: &ChatSession) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, message) in session.messages().iter().enumerate() {
        lines.push(message_heading(index, message));
        lines.extend(message_details(session.surface(), message));
    }
    lines
}

pub fn passage_lines(response: &PassageResponse) -> Vec<String> {
    let mut lines: Vec<String> = response.passages.iter().map(|p| format!("    {}", p.label())).collect();
    if !response.secondary_passages.is_empty() {
        lines.push("    related:".to_owned());
        lines.extend(response.secondary_passages.iter().map(|p| format!("      {}", p.label())));
    }
    lines
}

pub fn hit_lines(response: &TestimonySearchResponse) -> Vec<String> {
    response
        .results
        .iter()
        .map(|hit| format!("    {:>4}  {}  {}", hit.hit_count, hit.filename, hit.link))
        .collect()
}

/// Numbered suggestion list with selection marks. Derivatives are listed
/// only when they would be sent.
pub fn suggestion_lines(search: &TestimonySearch) -> Vec<String> {
    search
        .suggestions()
        .iter()
        .enumerate()
        .map(|(index, suggestion)| {
            let mark = if search.selected().contains(&suggestion.term) { 'x' } else { ' ' };
            let mut line = format!("  {}. [{mark}] {}", index + 1, suggestion.term);
            if search.include_derivatives() && !suggestion.derivatives.is_empty() {
                line.push_str(" (");
                line.push_str(&suggestion.derivatives.join(", "));
                line.push(')');
            }
            line
        })
        .collect()
}
