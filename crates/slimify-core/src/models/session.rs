use serde::{Deserialize, Serialize};

/// Identity of the signed-in user for one pipeline run.
///
/// Sessions are created by the caller (an HTTP header, a CLI flag) and passed down
/// explicitly. A run without one is a guest run and nothing is persisted remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_id: String,
    pub email: Option<String>,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
