use crate::session::{Role, Turn};

/// Shown in place of an empty or absent reply so the transcript never holds
/// a blank assistant turn.
pub const NO_REPLY_PLACEHOLDER: &str = "(no reply)";

/// Chat transcript plus the gate for the single in-flight request.
///
/// Two states: idle (`busy == false`) and awaiting-response. A submission is
/// only accepted while idle, and the matching `complete` or `fail` always
/// returns the machine to idle. There is no cancellation path: once a request
/// starts, the transport's own resolution is the only completion signal.
pub struct ChatLog {
    turns: Vec<Turn>,
    busy: bool,
}

impl ChatLog {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            busy: false,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Accepts a submission and returns the message to send, or `None` when
    /// the trimmed input is empty or a request is already outstanding.
    /// Rejected submissions leave the transcript untouched; they are dropped,
    /// not queued.
    pub fn begin_submit(&mut self, input: &str) -> Option<String> {
        if self.busy {
            return None;
        }
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        self.busy = true;
        self.turns.push(Turn::now(Role::User, text.to_string()));
        Some(text.to_string())
    }

    /// Resolves the outstanding request with the server's reply.
    pub fn complete(&mut self, reply: String) {
        let text = if reply.trim().is_empty() {
            NO_REPLY_PLACEHOLDER.to_string()
        } else {
            reply
        };
        self.turns.push(Turn::now(Role::Assistant, text));
        self.busy = false;
    }

    /// Resolves the outstanding request with a client-local error turn.
    pub fn fail(&mut self, message: String) {
        self.turns
            .push(Turn::now(Role::System, format!("Error: {message}")));
        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatLog, NO_REPLY_PLACEHOLDER};
    use crate::session::Role;

    #[test]
    fn submit_appends_user_turn_and_sets_busy() {
        let mut chat = ChatLog::new();
        let sent = chat.begin_submit("hello");
        assert_eq!(sent.as_deref(), Some("hello"));
        assert!(chat.is_busy());
        assert_eq!(chat.turns().len(), 1);
        assert_eq!(chat.turns()[0].role, Role::User);
        assert_eq!(chat.turns()[0].text, "hello");
    }

    #[test]
    fn submit_trims_surrounding_whitespace() {
        let mut chat = ChatLog::new();
        let sent = chat.begin_submit("  hello  ");
        assert_eq!(sent.as_deref(), Some("hello"));
        assert_eq!(chat.turns()[0].text, "hello");
    }

    #[test]
    fn whitespace_only_input_is_rejected_without_state_change() {
        let mut chat = ChatLog::new();
        assert!(chat.begin_submit("").is_none());
        assert!(chat.begin_submit("   \t\n").is_none());
        assert!(!chat.is_busy());
        assert!(chat.turns().is_empty());
    }

    #[test]
    fn submit_while_awaiting_response_is_dropped() {
        let mut chat = ChatLog::new();
        chat.begin_submit("first").expect("first submit accepted");
        let before = chat.turns().len();

        assert!(chat.begin_submit("second").is_none());
        assert_eq!(chat.turns().len(), before);
        assert!(chat.is_busy());
    }

    #[test]
    fn reply_appends_assistant_turn_after_user_turn_and_clears_busy() {
        let mut chat = ChatLog::new();
        chat.begin_submit("hello").expect("submit accepted");
        chat.complete("hi".to_string());

        assert!(!chat.is_busy());
        assert_eq!(chat.turns().len(), 2);
        assert_eq!(chat.turns()[0].role, Role::User);
        assert_eq!(chat.turns()[0].text, "hello");
        assert_eq!(chat.turns()[1].role, Role::Assistant);
        assert_eq!(chat.turns()[1].text, "hi");
    }

    #[test]
    fn empty_reply_becomes_placeholder() {
        let mut chat = ChatLog::new();
        chat.begin_submit("anything").expect("submit accepted");
        chat.complete(String::new());
        assert_eq!(chat.turns()[1].text, NO_REPLY_PLACEHOLDER);

        chat.begin_submit("again").expect("submit accepted");
        chat.complete("   ".to_string());
        assert_eq!(chat.turns()[3].text, NO_REPLY_PLACEHOLDER);
    }

    #[test]
    fn failure_appends_system_error_turn_and_clears_busy() {
        let mut chat = ChatLog::new();
        chat.begin_submit("hello").expect("submit accepted");
        chat.fail("server returned status 502 Bad Gateway".to_string());

        assert!(!chat.is_busy());
        assert_eq!(chat.turns()[1].role, Role::System);
        assert_eq!(
            chat.turns()[1].text,
            "Error: server returned status 502 Bad Gateway"
        );
    }

    #[test]
    fn every_accepted_submit_resolves_to_exactly_one_response_turn() {
        let mut chat = ChatLog::new();
        let inputs = ["one", "  ", "two", "", "three"];
        let mut accepted = 0usize;
        for input in inputs {
            if chat.begin_submit(input).is_some() {
                if accepted % 2 == 0 {
                    chat.complete(format!("reply to {input}"));
                } else {
                    chat.fail("network down".to_string());
                }
                accepted += 1;
            }
        }

        let users = chat
            .turns()
            .iter()
            .filter(|turn| turn.role == Role::User)
            .count();
        let responses = chat
            .turns()
            .iter()
            .filter(|turn| turn.role != Role::User)
            .count();
        assert_eq!(users, 3);
        assert_eq!(responses, users);
        assert!(!chat.is_busy());

        // Responses always directly follow their user turn.
        for pair in chat.turns().chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_ne!(pair[1].role, Role::User);
        }
    }
}
