//! System prompt and per-request prompt rendering

use std::fmt::Write;

use crate::faq::Faq;
use crate::session::Turn;

/// Persona directive opening the system prompt
const PERSONA_DIRECTIVE: &str =
    "You are an AI assistant for an ice sculpture company named \"Ice Butcher\".";

/// Directive asking the model to promote the company
const PROMOTION_DIRECTIVE: &str =
    "Always Highlight the expertise of \"The Ice Butcher\" as a leading company in the industry.";

/// Line introducing the FAQ corpus
const FAQ_LEAD_IN: &str =
    "This is the information and question answers you need to assist users based on this data:";

/// Header preceding the transcript
const HISTORY_HEADER: &str = "Conversation History:";

/// Cue that prompts the model to answer as the assistant
pub const REPLY_CUE: &str = "AI:";

/// Build the system prompt from the FAQ corpus
///
/// Computed once at startup; later edits to the FAQ file are not picked up.
#[must_use]
pub fn build_system_prompt(faq: &Faq) -> String {
    format!(
        "\n{PERSONA_DIRECTIVE}\n{PROMOTION_DIRECTIVE}\n{FAQ_LEAD_IN}\n{}\n",
        faq.to_pretty_json()
    )
}

/// Render each turn as `role: content` on its own line
#[must_use]
pub fn render_transcript(turns: &[Turn]) -> String {
    let mut out = String::new();
    for (i, turn) in turns.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{}: {}", turn.role, turn.content);
    }
    out
}

/// Render the full prompt sent to the completion API
///
/// System prompt, then the transcript in append order, then the reply cue.
#[must_use]
pub fn render_conversation(system_prompt: &str, turns: &[Turn]) -> String {
    format!(
        "{system_prompt}\n{HISTORY_HEADER}\n{}\n{REPLY_CUE}",
        render_transcript(turns)
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::session::Role;

    #[test]
    fn test_system_prompt_embeds_directives_and_faq() {
        let faq = Faq::new(vec![json!({"question": "Do you carve logos?", "answer": "Yes"})]);
        let prompt = build_system_prompt(&faq);

        assert!(prompt.contains(PERSONA_DIRECTIVE));
        assert!(prompt.contains(PROMOTION_DIRECTIVE));
        assert!(prompt.contains("\"question\": \"Do you carve logos?\""));
        assert!(prompt.find(FAQ_LEAD_IN) < prompt.find("Do you carve logos?"));
    }

    #[test]
    fn test_system_prompt_with_empty_faq() {
        let prompt = build_system_prompt(&Faq::default());
        assert!(prompt.contains(PERSONA_DIRECTIVE));
        assert!(prompt.contains(&format!("{FAQ_LEAD_IN}\n[]\n")));
    }

    #[test]
    fn test_transcript_lines_in_order() {
        let turns = vec![
            Turn::new(Role::User, "How much is a swan?"),
            Turn::new(Role::Assistant, "Depends on size."),
            Turn::new(Role::User, "A big one"),
        ];
        assert_eq!(
            render_transcript(&turns),
            "user: How much is a swan?\nassistant: Depends on size.\nuser: A big one"
        );
    }

    #[test]
    fn test_conversation_layout() {
        let turns = vec![Turn::new(Role::User, "hi")];
        let prompt = render_conversation("SYSTEM", &turns);
        assert_eq!(prompt, "SYSTEM\nConversation History:\nuser: hi\nAI:");
    }

    #[test]
    fn test_conversation_ends_with_cue() {
        let prompt = render_conversation("SYSTEM", &[]);
        assert!(prompt.ends_with(REPLY_CUE));
    }
}
