use serde::{Deserialize, Serialize};

use crate::utils::format::{avatar_initial, DEFAULT_AVATAR};

/// Full profile, as returned by the account and admin endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub tagline: Option<String>,
    pub role: String,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub last_sign_in_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn initial(&self) -> String {
        avatar_initial(self.username.as_deref())
    }

    pub fn avatar_or_default(&self) -> &str {
        self.avatar_url.as_deref().unwrap_or(DEFAULT_AVATAR)
    }
}

/// What other users may see of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PublicProfile {
    pub id: String,
    pub username: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    pub role: String,
    pub avatar_url: Option<String>,
}

/// `GET /whoami`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WhoAmI {
    pub id: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub username: String,
    pub avatar_url: String,
}

/// Body of `PUT /account`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_display_helpers() {
        let json = r#"{
            "id": "7c1a", "username": "pat", "tagline": null, "role": "user",
            "avatar_url": null, "email": "pat@example.com", "last_sign_in_at": null,
            "created_at": "2025-08-01T00:00:00Z", "updated_at": "2025-08-01T00:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.initial(), "P");
        assert_eq!(user.avatar_or_default(), "/images/avatars/default-avatar.jpg");
    }

    #[test]
    fn test_account_update_omits_unset_fields() {
        let update = AccountUpdate {
            tagline: Some("Always takes the points".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"tagline":"Always takes the points"}"#
        );
    }
}
