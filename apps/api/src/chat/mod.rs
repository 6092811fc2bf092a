//! Chat sessions, messages, and the reaction reducer.
//!
//! Messages are a tagged union over kind (plain text, attachment, system) so
//! reducer and render sites match exhaustively instead of duck-typing on
//! optional fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{UserProfile, UserRole};

pub mod attachments;
pub mod handlers;

/// Sender id used for system-authored messages (session welcome).
pub const SYSTEM_SENDER: &str = "system";

/// Attachment size cap: 5 MiB.
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// Accepted upload MIME prefixes. `image/` covers all image types.
pub const ACCEPTED_MIME_PREFIXES: &[&str] = &[
    "image/",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/",
];

pub fn mime_accepted(mime: &str) -> bool {
    ACCEPTED_MIME_PREFIXES.iter().any(|p| mime.starts_with(p))
}

/// Why an upload was refused. Carries the notification copy for the toast.
#[derive(Debug, PartialEq, Eq)]
pub enum UploadRejection {
    TooLarge { name: String },
    Unsupported { mime: String },
}

impl UploadRejection {
    pub fn title(&self) -> &'static str {
        match self {
            UploadRejection::TooLarge { .. } => "File too large",
            UploadRejection::Unsupported { .. } => "Unsupported file",
        }
    }

    pub fn message(&self) -> String {
        match self {
            UploadRejection::TooLarge { name } => format!("File {name} exceeds 5MB limit."),
            UploadRejection::Unsupported { mime } => {
                let mime = if mime.is_empty() { "unknown" } else { mime };
                format!("File type not supported: {mime}")
            }
        }
    }
}

/// Checks an incoming chat upload against the size cap and accepted types.
pub fn check_upload(name: &str, mime: &str, size: usize) -> Result<(), UploadRejection> {
    if size > MAX_ATTACHMENT_BYTES {
        return Err(UploadRejection::TooLarge {
            name: name.to_string(),
        });
    }
    if !mime_accepted(mime) {
        return Err(UploadRejection::Unsupported {
            mime: mime.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageBody {
    Text { text: String },
    Attachment { text: String, attachment: Attachment },
    System { text: String },
}

impl MessageBody {
    pub fn text(&self) -> &str {
        match self {
            MessageBody::Text { text } => text,
            MessageBody::Attachment { text, .. } => text,
            MessageBody::System { text } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji: String,
    pub count: u32,
    pub you_reacted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub body: MessageBody,
    pub reactions: Vec<Reaction>,
}

impl Message {
    fn new(sender_id: &str, body: MessageBody) -> Self {
        Message {
            id: Uuid::new_v4(),
            sender_id: sender_id.to_string(),
            timestamp: Utc::now(),
            body,
            reactions: vec![],
        }
    }
}

/// One message thread between the session user and one participant.
/// At most one session exists per participant (lookup-before-create).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub participant_id: String,
    pub participant_name: String,
    pub participant_role: UserRole,
    /// Denormalized cache of the most recent message text.
    pub last_message: String,
    pub messages: Vec<Message>,
}

impl ChatSession {
    /// New session seeded with one system-authored welcome message.
    pub fn open(participant: &UserProfile) -> Self {
        ChatSession {
            id: Uuid::new_v4(),
            participant_id: participant.id.clone(),
            participant_name: participant.name.clone(),
            participant_role: participant.role,
            last_message: "Conversation started".to_string(),
            messages: vec![Message::new(
                SYSTEM_SENDER,
                MessageBody::System {
                    text: format!("You are now chatting with {}.", participant.name),
                },
            )],
        }
    }

    /// Appends a plain-text message. No-op (returns `None`) when the text is
    /// blank after trimming.
    pub fn push_text(&mut self, sender_id: &str, text: &str) -> Option<Message> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let message = Message::new(
            sender_id,
            MessageBody::Text {
                text: trimmed.to_string(),
            },
        );
        self.last_message = trimmed.to_string();
        self.messages.push(message.clone());
        Some(message)
    }

    /// Appends an attachment message and updates the `last_message` cache to
    /// the synthetic "Sent file" string.
    pub fn push_attachment(&mut self, sender_id: &str, attachment: Attachment) -> Message {
        let text = format!("Sent file: {}", attachment.name);
        let message = Message::new(sender_id, MessageBody::Attachment { text: text.clone(), attachment });
        self.last_message = text;
        self.messages.push(message.clone());
        message
    }

    /// Idempotent reaction toggle for the session user: absent entries are
    /// created with count 1, present ones flip `you_reacted` and adjust the
    /// count, and entries are removed when the count reaches zero.
    pub fn toggle_reaction(
        &mut self,
        message_id: Uuid,
        emoji: &str,
    ) -> Result<&[Reaction], AppError> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| AppError::NotFound(format!("Message {message_id} not found")))?;

        match message.reactions.iter().position(|r| r.emoji == emoji) {
            None => message.reactions.push(Reaction {
                emoji: emoji.to_string(),
                count: 1,
                you_reacted: true,
            }),
            Some(i) => {
                let reaction = &mut message.reactions[i];
                reaction.you_reacted = !reaction.you_reacted;
                if reaction.you_reacted {
                    reaction.count += 1;
                } else {
                    reaction.count = reaction.count.saturating_sub(1);
                }
                if reaction.count == 0 {
                    message.reactions.remove(i);
                }
            }
        }

        Ok(&message.reactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::seed_talent;

    fn session() -> ChatSession {
        ChatSession::open(&seed_talent()[0])
    }

    #[test]
    fn test_open_seeds_welcome_message() {
        let s = session();
        assert_eq!(s.last_message, "Conversation started");
        assert_eq!(s.messages.len(), 1);
        assert_eq!(s.messages[0].sender_id, SYSTEM_SENDER);
        assert_eq!(
            s.messages[0].body,
            MessageBody::System {
                text: "You are now chatting with Thabo Molefe.".to_string()
            }
        );
    }

    #[test]
    fn test_blank_message_is_a_noop() {
        let mut s = session();
        assert!(s.push_text("user_1", "   ").is_none());
        assert!(s.push_text("user_1", "").is_none());
        assert_eq!(s.messages.len(), 1);
        assert_eq!(s.last_message, "Conversation started");
    }

    #[test]
    fn test_push_text_updates_last_message() {
        let mut s = session();
        let m = s.push_text("user_1", "  hello there ").unwrap();
        assert_eq!(m.body.text(), "hello there");
        assert_eq!(s.last_message, "hello there");
        assert_eq!(s.messages.len(), 2);
    }

    #[test]
    fn test_push_attachment_sets_synthetic_last_message() {
        let mut s = session();
        let m = s.push_attachment(
            "user_1",
            Attachment {
                name: "cv.pdf".to_string(),
                url: "/attachments/x".to_string(),
                mime_type: "application/pdf".to_string(),
            },
        );
        assert_eq!(s.last_message, "Sent file: cv.pdf");
        assert!(m.reactions.is_empty());
        assert!(matches!(m.body, MessageBody::Attachment { .. }));
    }

    #[test]
    fn test_toggle_reaction_twice_is_identity() {
        let mut s = session();
        let mid = s.push_text("user_1", "hi").unwrap().id;

        s.toggle_reaction(mid, "👍").unwrap();
        let after_first = s.messages.last().unwrap().reactions.clone();
        assert_eq!(after_first.len(), 1);
        assert_eq!(after_first[0].count, 1);
        assert!(after_first[0].you_reacted);

        s.toggle_reaction(mid, "👍").unwrap();
        assert!(s.messages.last().unwrap().reactions.is_empty());

        // and again from empty: recreated with count 1
        s.toggle_reaction(mid, "👍").unwrap();
        assert_eq!(s.messages.last().unwrap().reactions, after_first);
    }

    #[test]
    fn test_toggle_reaction_count_never_negative() {
        let mut s = session();
        let mid = s.push_text("user_1", "hi").unwrap().id;
        for _ in 0..7 {
            s.toggle_reaction(mid, "🎉").unwrap();
        }
        // odd number of toggles: entry present with count exactly 1
        let reactions = &s.messages.last().unwrap().reactions;
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions[0].count, 1);
    }

    #[test]
    fn test_toggle_reaction_unknown_message() {
        let mut s = session();
        assert!(matches!(
            s.toggle_reaction(Uuid::new_v4(), "👍"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_check_upload_size_and_type() {
        assert_eq!(
            check_upload("big.pdf", "application/pdf", 6 * 1024 * 1024),
            Err(UploadRejection::TooLarge {
                name: "big.pdf".to_string()
            })
        );
        assert!(check_upload("cv.pdf", "application/pdf", 4 * 1024 * 1024).is_ok());
        assert!(check_upload("pic.png", "image/png", 1024).is_ok());
        assert!(check_upload("notes.txt", "text/plain", 10).is_ok());
        assert_eq!(
            check_upload("tune.mp3", "audio/mpeg", 10),
            Err(UploadRejection::Unsupported {
                mime: "audio/mpeg".to_string()
            })
        );
    }

    #[test]
    fn test_rejection_copy() {
        let r = UploadRejection::TooLarge {
            name: "cv.pdf".to_string(),
        };
        assert_eq!(r.title(), "File too large");
        assert_eq!(r.message(), "File cv.pdf exceeds 5MB limit.");

        let r = UploadRejection::Unsupported {
            mime: String::new(),
        };
        assert_eq!(r.message(), "File type not supported: unknown");
    }
}
