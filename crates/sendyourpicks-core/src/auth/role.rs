use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Authorization level carried in the token's role claim.
///
/// Unknown claims (Supabase puts `authenticated` in `role` when no custom
/// `user_role` is set) are kept verbatim and grant nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Commissioner,
    Admin,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Commissioner => "commissioner",
            Role::Admin => "admin",
            Role::Other(s) => s,
        }
    }
}

impl From<&str> for Role {
    // Exact, case-sensitive match
    fn from(claim: &str) -> Self {
        match claim {
            "user" => Role::User,
            "commissioner" => Role::Commissioner,
            "admin" => Role::Admin,
            other => Role::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let claim = String::deserialize(deserializer)?;
        Ok(Role::from(claim.as_str()))
    }
}

/// Commissioner pages are open to commissioners and admins.
pub fn is_commissioner(role: Option<&Role>) -> bool {
    matches!(role, Some(Role::Commissioner | Role::Admin))
}

pub fn is_admin(role: Option<&Role>) -> bool {
    matches!(role, Some(Role::Admin))
}
