use crate::types::{ChatTurn, Role};

/// Label used when a transcript is rendered for display or export.
pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

/// Render the transcript as plain text, one turn per block, in order.
pub fn format_transcript(transcript: &[ChatTurn]) -> String {
    transcript
        .iter()
        .map(|turn| format!("{}: {}", role_label(turn.role), turn.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
