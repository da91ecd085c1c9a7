use crate::application::ports::completion_provider::{ChatPrompt, PromptMessage};
use crate::domain::entities::Message;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. Use the provided context to answer the user's question.\nIf the answer isn't in the context, say you don't know. Be concise.";

pub const CONTEXT_SEPARATOR: &str = "\n---\n";

pub const NAMING_INSTRUCTION: &str =
    "Generate a short 3-4 word session name from the following messages:";

/// Messages considered when asking the model for a session name.
pub const NAMING_MESSAGE_LIMIT: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    /// System instruction plus one user message carrying the retrieved
    /// context, the prior conversation and the question.
    pub fn compose(&self, context: &[&str], history: &[Message], question: &str) -> ChatPrompt {
        let context = context.join(CONTEXT_SEPARATOR);
        let history = format_history(history.iter());

        ChatPrompt::new(vec![
            PromptMessage::system(SYSTEM_PROMPT),
            PromptMessage::user(format!(
                "Context:\n{}\n\nChat History:\n{}\n\nUser:{}",
                context, history, question
            )),
        ])
    }

    pub fn compose_session_name(&self, messages: &[Message]) -> ChatPrompt {
        let conversation = format_history(
            messages
                .iter()
                .filter(|m| !m.role().is_system())
                .take(NAMING_MESSAGE_LIMIT),
        );

        ChatPrompt::new(vec![PromptMessage::user(format!(
            "{}\n{}",
            NAMING_INSTRUCTION, conversation
        ))])
    }
}

fn format_history<'a>(messages: impl Iterator<Item = &'a Message>) -> String {
    messages
        .map(|m| format!("{}: {}", m.role().display_name(), m.content()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::completion_provider::PromptRole;
    use crate::domain::value_objects::MessageRole;
    use uuid::Uuid;

    fn message(session_id: Uuid, role: MessageRole, content: &str) -> Message {
        Message::new(session_id, role, content.to_string())
    }

    #[test]
    fn test_compose_layout() {
        let session_id = Uuid::new_v4();
        let history = vec![
            message(session_id, MessageRole::User, "What is AQI?"),
            message(session_id, MessageRole::Assistant, "An air quality index."),
        ];

        let prompt = PromptComposer::new().compose(
            &["AQI ranges from 0 to 500.", "| a | b |"],
            &history,
            "Is 180 bad?",
        );

        assert_eq!(prompt.messages.len(), 2);
        assert_eq!(prompt.messages[0].role, PromptRole::System);
        assert_eq!(prompt.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(
            prompt.messages[1].content,
            "Context:\nAQI ranges from 0 to 500.\n---\n| a | b |\n\nChat History:\nUser: What is AQI?\nAssistant: An air quality index.\n\nUser:Is 180 bad?"
        );
    }

    #[test]
    fn test_compose_with_nothing_retrieved() {
        let prompt = PromptComposer::new().compose(&[], &[], "Hello");
        assert_eq!(
            prompt.messages[1].content,
            "Context:\n\n\nChat History:\n\n\nUser:Hello"
        );
    }

    #[test]
    fn test_session_name_prompt_uses_first_six_non_system() {
        let session_id = Uuid::new_v4();
        let mut messages = vec![message(session_id, MessageRole::System, "setup")];
        for i in 0..8 {
            let role = if i % 2 == 0 {
                MessageRole::User
            } else {
                MessageRole::Assistant
            };
            messages.push(message(session_id, role, &format!("m{}", i)));
        }

        let prompt = PromptComposer::new().compose_session_name(&messages);

        assert_eq!(prompt.messages.len(), 1);
        assert_eq!(prompt.messages[0].role, PromptRole::User);
        assert!(prompt.system_message().is_none());
        assert_eq!(
            prompt.messages[0].content,
            format!(
                "{}\nUser: m0\nAssistant: m1\nUser: m2\nAssistant: m3\nUser: m4\nAssistant: m5",
                NAMING_INSTRUCTION
            )
        );
    }
}
