//! Chat room, transcript and timeline models.

use serde::{Deserialize, Serialize};

// == Chat Room ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    /// Also the logical key of the room's transcript
    pub room_id: String,
    pub room_name: String,
    pub room_img: String,
    pub today_post_count: u32,
    pub last_post: String,
    pub last_post_time: String,
}

// == Chat Message ==
/// Kind of a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    #[serde(rename = "TEXT")]
    Text,
    /// `content` is an image URL
    #[serde(rename = "IMAGE")]
    Image,
    /// Day separator; `content` holds the date label
    #[serde(rename = "date")]
    DateDivider,
    #[serde(rename = "file")]
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub name: String,
    pub profile_img: String,
    pub content: String,
    pub time: String,
}

impl ChatMessage {
    pub fn is_divider(&self) -> bool {
        self.kind == MessageKind::DateDivider
    }
}

// == Timeline ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FeedKind {
    Text,
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: FeedKind,
    pub name: String,
    pub profile_img: String,
    pub content: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub author: String,
    pub handle: String,
    pub content: String,
    pub timestamp: String,
    pub likes: u64,
    pub retweets: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transcript_decodes_mixed_kinds() {
        let messages: Vec<ChatMessage> = serde_json::from_value(json!([
            {"type": "date", "name": "", "profileImg": "", "content": "2026-01-01", "time": ""},
            {"type": "TEXT", "name": "Shiro", "profileImg": "/s.png", "content": "hi", "time": "09:00"},
            {"type": "IMAGE", "name": "Shiro", "profileImg": "/s.png", "content": "/p.png", "time": "09:01"}
        ]))
        .unwrap();

        assert!(messages[0].is_divider());
        assert_eq!(messages[1].kind, MessageKind::Text);
        assert_eq!(messages[2].kind, MessageKind::Image);
    }

    #[test]
    fn test_unknown_message_kind_is_rejected() {
        let result: Result<ChatMessage, _> = serde_json::from_value(json!(
            {"type": "STICKER", "name": "", "profileImg": "", "content": "", "time": ""}
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_feed_item_id_is_optional() {
        let item: FeedItem = serde_json::from_value(json!(
            {"type": "VIDEO", "name": "Rize", "profileImg": "", "content": "/v.mp4", "time": "1h"}
        ))
        .unwrap();
        assert!(item.id.is_none());
        assert_eq!(item.kind, FeedKind::Video);
    }
}
