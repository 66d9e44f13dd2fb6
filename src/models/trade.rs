//! Goods trading board models and filtering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Region label meaning "every region".
pub const ALL_REGIONS: &str = "전체";

// == Trade Item ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorLevel {
    User,
    /// Verified community member
    Cafe,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeAuthor {
    pub id: String,
    pub name: String,
    pub level: AuthorLevel,
}

/// A swap offer: items the author has against items they want.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeItem {
    pub id: String,
    pub status: TradeStatus,
    pub region: String,
    pub is_delivery_available: bool,
    pub have_items: Vec<String>,
    pub want_items: Vec<String>,
    pub author: TradeAuthor,
    pub open_chat_link: String,
    /// ISO 8601 timestamp
    pub created_at: String,
}

impl TradeItem {
    pub fn is_active(&self) -> bool {
        self.status == TradeStatus::Active
    }

    /// Creation time, if `created_at` is RFC 3339.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

// == Trade Filter ==
/// Board filter settings. The default shows everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeFilter {
    /// Case-insensitive text matched against have/want items and region
    pub query: String,
    /// Main region, or [`ALL_REGIONS`]
    pub main_region: String,
    /// Optional sub region; empty or [`ALL_REGIONS`] means the whole main region
    pub sub_region: String,
    pub delivery_only: bool,
    pub hide_completed: bool,
}

impl Default for TradeFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            main_region: ALL_REGIONS.to_string(),
            sub_region: String::new(),
            delivery_only: false,
            hide_completed: false,
        }
    }
}

impl TradeFilter {
    pub fn matches(&self, trade: &TradeItem) -> bool {
        if self.hide_completed && trade.status == TradeStatus::Completed {
            return false;
        }
        if self.delivery_only && !trade.is_delivery_available {
            return false;
        }
        if self.main_region != ALL_REGIONS {
            if !trade.region.contains(&self.main_region) {
                return false;
            }
            if !self.sub_region.is_empty()
                && self.sub_region != ALL_REGIONS
                && !trade.region.contains(&self.sub_region)
            {
                return false;
            }
        }
        if !self.query.is_empty() {
            let query = self.query.to_lowercase();
            return trade
                .have_items
                .iter()
                .chain(trade.want_items.iter())
                .chain(std::iter::once(&trade.region))
                .any(|text| text.to_lowercase().contains(&query));
        }
        true
    }

    /// Trades passing the filter, in input order.
    pub fn apply<'a>(&self, trades: &'a [TradeItem]) -> Vec<&'a TradeItem> {
        trades.iter().filter(|t| self.matches(t)).collect()
    }

    /// Label for the selected region, e.g. `서울 강남구`.
    pub fn region_label(&self) -> String {
        if self.main_region == ALL_REGIONS {
            return "모든 지역".to_string();
        }
        if self.sub_region.is_empty() || self.sub_region == ALL_REGIONS {
            self.main_region.clone()
        } else {
            format!("{} {}", self.main_region, self.sub_region)
        }
    }
}
