//! Content calendar models.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// == Schedule Item ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    Birthday,
    Album,
    Concert,
    Broadcast,
    Event,
}

/// One calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    pub date: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ScheduleKind,
}

impl ScheduleItem {
    /// Calendar day of the entry, if `date` is readable.
    pub fn day(&self) -> Option<NaiveDate> {
        parse_day(&self.date)
    }
}

// == Schedule Event ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Broadcast,
    Event,
    Release,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parses the date formats found in calendar documents.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Entries falling in `year`/`month` (1-12), earliest first.
///
/// Entries with an unreadable date are skipped.
pub fn schedules_in_month(items: &[ScheduleItem], year: i32, month: u32) -> Vec<&ScheduleItem> {
    let mut matching: Vec<(NaiveDate, &ScheduleItem)> = items
        .iter()
        .filter_map(|item| item.day().map(|day| (day, item)))
        .filter(|(day, _)| day.year() == year && day.month() == month)
        .collect();
    matching.sort_by_key(|(day, _)| *day);
    matching.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, date: &str) -> ScheduleItem {
        ScheduleItem {
            id: id.into(),
            date: date.into(),
            title: format!("event {}", id),
            description: String::new(),
            kind: ScheduleKind::Broadcast,
        }
    }

    #[test]
    fn test_parse_day_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 15);
        assert_eq!(parse_day("2026-01-15"), expected);
        assert_eq!(parse_day("2026-01-15T20:00:00+09:00"), expected);
        assert_eq!(parse_day("2026-01-15T20:00:00"), expected);
        assert_eq!(parse_day("next friday"), None);
    }

    #[test]
    fn test_schedules_in_month_filters_and_sorts() {
        let items = vec![
            item("late", "2026-01-30"),
            item("other-month", "2026-02-01"),
            item("early", "2026-01-02"),
            item("broken", "soon"),
            item("other-year", "2025-01-10"),
        ];

        let ids: Vec<&str> = schedules_in_month(&items, 2026, 1)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn test_schedule_kind_wire_names() {
        let parsed: ScheduleItem = serde_json::from_str(
            r#"{"id":"1","date":"2026-03-03","title":"t","description":"d","type":"birthday"}"#,
        )
        .unwrap();
        assert_eq!(parsed.kind, ScheduleKind::Birthday);
    }
}
