use uuid::Uuid;

use crate::models::User;

/// Who is making the current request. Built once per request by the
/// viewer context middleware and handed to handlers through `Vc`.
#[derive(Debug, Clone)]
pub struct ViewerContext {
    pub request_id: String,
    pub session_id: Option<Uuid>,
    pub user: Option<User>,
}

impl ViewerContext {
    pub fn anonymous(request_id: String, session_id: Option<Uuid>) -> Self {
        Self {
            request_id,
            session_id,
            user: None,
        }
    }

    pub fn authenticated_user(user: User, session_id: Uuid, request_id: String) -> Self {
        Self {
            request_id,
            session_id: Some(session_id),
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.user_id)
    }
}
