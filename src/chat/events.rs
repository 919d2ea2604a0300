use serde::{Deserialize, Serialize};

use super::repo::ChatMessage;

/// Server→client events. Wire names match the original socket protocol.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ChatEvent {
    /// Recent history, chronological, sent once per connection.
    #[serde(rename = "past messages")]
    PastMessages(Vec<ChatMessage>),
    /// A newly persisted message, fanned out to every active connection.
    #[serde(rename = "chat message")]
    ChatMessage(ChatMessage),
}

/// Client→server events.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "chat message")]
    ChatMessage(ChatMessagePayload),
}

/// Inbound chat payload. A frame without a sender id fails to decode and is
/// dropped by the connection loop.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagePayload {
    pub sender_id: i64,
    #[serde(default)]
    pub receiver_id: Option<i64>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> ChatMessage {
        ChatMessage {
            id: 11,
            sender_id: 1,
            receiver_id: Some(2),
            message: "hello there".into(),
            created_at: 1_700_000_003,
        }
    }

    #[test]
    fn outbound_events_use_wire_names() {
        let backfill = serde_json::to_value(ChatEvent::PastMessages(vec![sample_message()])).unwrap();
        assert_eq!(backfill["event"], "past messages");
        assert_eq!(backfill["data"][0]["senderId"], 1);
        assert_eq!(backfill["data"][0]["createdAt"], 1_700_000_003);

        let live = serde_json::to_value(ChatEvent::ChatMessage(sample_message())).unwrap();
        assert_eq!(live["event"], "chat message");
        assert_eq!(live["data"]["message"], "hello there");
    }

    #[test]
    fn inbound_chat_message_parses() {
        let frame = r#"{"event":"chat message","data":{"senderId":4,"receiverId":7,"message":"hi"}}"#;
        let ClientEvent::ChatMessage(payload) = serde_json::from_str(frame).unwrap();
        assert_eq!(payload.sender_id, 4);
        assert_eq!(payload.receiver_id, Some(7));
        assert_eq!(payload.message, "hi");
    }

    #[test]
    fn inbound_receiver_is_optional() {
        let frame = r#"{"event":"chat message","data":{"senderId":4,"message":"hi"}}"#;
        let ClientEvent::ChatMessage(payload) = serde_json::from_str(frame).unwrap();
        assert_eq!(payload.receiver_id, None);
    }

    #[test]
    fn inbound_without_sender_is_rejected() {
        let frame = r#"{"event":"chat message","data":{"message":"hi"}}"#;
        assert!(serde_json::from_str::<ClientEvent>(frame).is_err());
    }

    #[test]
    fn unknown_event_is_rejected() {
        let frame = r#"{"event":"presence","data":{}}"#;
        assert!(serde_json::from_str::<ClientEvent>(frame).is_err());
    }
}
