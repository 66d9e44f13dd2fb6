//! Well-known logical keys.

/// Live status of every member
pub const STATUS: &str = "status";
/// Content calendar entries
pub const SCHEDULES: &str = "schedules";
/// Chat room list
pub const CHAT_ROOMS: &str = "chat_rooms";
/// Goods trading board posts
pub const GOODS_TRADE: &str = "goodstrade";

/// Keys loaded when nothing else is requested.
pub const DEFAULT_KEYS: [&str; 4] = [STATUS, SCHEDULES, CHAT_ROOMS, GOODS_TRADE];

/// Key of a chat room's transcript. Transcripts are addressed by room id.
pub fn chat_room(room_id: &str) -> String {
    room_id.to_string()
}
