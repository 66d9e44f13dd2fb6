//! Payload models
//!
//! Typed shapes of the JSON documents served by the data sources.

pub mod chat;
pub mod keys;
pub mod member;
pub mod schedule;
pub mod trade;

pub use chat::{ChatMessage, ChatRoom, FeedItem, FeedKind, MessageKind, Tweet};
pub use member::{live_members, BroadcastGroup, BroadcastItem, Member};
pub use schedule::{schedules_in_month, EventKind, ScheduleEvent, ScheduleItem, ScheduleKind};
pub use trade::{AuthorLevel, TradeAuthor, TradeFilter, TradeItem, TradeStatus};
