use uuid::Uuid;

const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous";

/// Who is behind a connection, as announced to other members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub user_id: String,
    pub display_name: String,
    pub is_anonymous: bool,
}

impl ClientIdentity {
    pub fn user(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            is_anonymous: false,
        }
    }

    /// Guest viewer with a throwaway id
    pub fn anonymous() -> Self {
        Self {
            user_id: format!("anon-{}", Uuid::new_v4()),
            display_name: ANONYMOUS_DISPLAY_NAME.to_string(),
            is_anonymous: true,
        }
    }

    /// Anonymous members join and leave silently.
    pub fn announces_presence(&self) -> bool {
        !self.is_anonymous
    }
}
