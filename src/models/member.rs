//! Member and broadcast models.

use serde::{Deserialize, Serialize};

// == Member ==
/// A member and their current broadcast status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,
    /// e.g. `X_live`, `chzzk_live`, `offline`
    pub status: String,
    pub title: String,
    pub profile_img: String,
    pub live_url: String,
}

impl Member {
    /// True when the status names any kind of live broadcast.
    pub fn is_live(&self) -> bool {
        self.status.to_lowercase().contains("live")
    }
}

/// Members currently live, in input order.
pub fn live_members(members: &[Member]) -> Vec<&Member> {
    members.iter().filter(|m| m.is_live()).collect()
}

// == Broadcast ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastItem {
    pub name: String,
    pub message: String,
    pub image: String,
    pub link: String,
}

/// Broadcast items grouped under a titled, colored heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastGroup {
    pub id: String,
    pub title: String,
    pub color: String,
    pub items: Vec<BroadcastItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member(name: &str, status: &str) -> Member {
        Member {
            name: name.into(),
            status: status.into(),
            title: String::new(),
            profile_img: String::new(),
            live_url: String::new(),
        }
    }

    #[test]
    fn test_member_from_camel_case_json() {
        let member: Member = serde_json::from_value(json!({
            "name": "Kanna",
            "status": "chzzk_live",
            "title": "morning stream",
            "profileImg": "/img/kanna.png",
            "liveUrl": "https://chzzk.naver.com/live/kanna"
        }))
        .unwrap();

        assert_eq!(member.profile_img, "/img/kanna.png");
        assert!(member.is_live());
    }

    #[test]
    fn test_live_members() {
        let members = vec![
            member("a", "X_LIVE"),
            member("b", "offline"),
            member("c", "chzzk_live"),
            member("d", ""),
        ];

        let live: Vec<&str> = live_members(&members).iter().map(|m| m.name.as_str()).collect();
        assert_eq!(live, vec!["a", "c"]);
    }
}
