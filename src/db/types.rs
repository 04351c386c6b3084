use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Student,
    Teacher,
}

impl UserRole {
    pub(crate) fn dashboard_path(self) -> &'static str {
        match self {
            Self::Student => "/dashboard/student",
            Self::Teacher => "/dashboard/teacher",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "chatsender", rename_all = "lowercase")]
pub(crate) enum ChatSender {
    User,
    Ai,
}

impl ChatSender {
    /// Speaker label used when replaying history into a prompt.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Ai => "Ai",
        }
    }
}

/// Which conversation a chat message belongs to; each keeps its own context window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "chatchannel", rename_all = "snake_case")]
pub(crate) enum ChatChannel {
    CourseLookup,
    Tutor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_route_to_their_dashboards() {
        assert_eq!(UserRole::Student.dashboard_path(), "/dashboard/student");
        assert_eq!(UserRole::Teacher.dashboard_path(), "/dashboard/teacher");
    }

    #[test]
    fn enums_serialize_in_wire_case() {
        assert_eq!(serde_json::to_value(ChatChannel::CourseLookup).unwrap(), "course_lookup");
        assert_eq!(serde_json::to_value(ChatSender::Ai).unwrap(), "ai");
        let role: UserRole = serde_json::from_str("\"teacher\"").unwrap();
        assert_eq!(role, UserRole::Teacher);
    }
}
