use crate::domain::Label;

pub const FALLBACK_REPLY: &str = "Thank you for your message.";

pub fn reply_template(label: Label) -> &'static str {
    match label {
        Label::HighPriority => {
            "Thank you for bringing this to my attention. I will prioritize this and get back to you shortly."
        }
        Label::Normal => "Thank you for your message. I appreciate you reaching out.",
        Label::Spam => {
            "This email does not appear relevant to me. Please remove me from your mailing list."
        }
    }
}

/// Canned reply for a label name, matched case-insensitively. Unknown labels
/// get [`FALLBACK_REPLY`].
pub fn suggest_reply(label: &str) -> &'static str {
    label
        .to_lowercase()
        .parse::<Label>()
        .map(reply_template)
        .unwrap_or(FALLBACK_REPLY)
}
