/// Session cookie payload
///
/// StaffDesk keeps no server-side session state: after a successful login,
/// the authenticated identity and its role are serialized into an
/// encrypted+signed cookie (`axum-extra` private jar). Every protected
/// request decodes the cookie back into a [`SessionUser`], which the router
/// middleware inserts into request extensions so handlers receive the
/// identity as an explicit value, never as ambient global state.
///
/// There is no expiry or rotation; the session ends at logout or when the
/// client drops the cookie.

use serde::{Deserialize, Serialize};

use crate::models::app_user::Role;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "staffdesk_session";

/// Authenticated identity carried through a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Username from `app_user`
    pub username: String,

    /// Coarse role derived at login: admin unlocks mutations, viewer is read-only
    pub role: Role,
}

impl SessionUser {
    /// Creates a session payload for a freshly authenticated user
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    /// Serializes the payload for cookie storage
    pub fn encode(&self) -> String {
        // Both fields are plain JSON-safe values; this cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decodes a cookie value back into a session payload
    ///
    /// Returns `None` for anything that does not round-trip, which the
    /// caller treats as "not authenticated".
    pub fn decode(value: &str) -> Option<Self> {
        serde_json::from_str(value).ok()
    }

    /// Whether this session may perform create/update/delete/import operations
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_roundtrip() {
        let user = SessionUser::new("alice", Role::Admin);
        let encoded = user.encode();
        let decoded = SessionUser::decode(&encoded).expect("Decode should succeed");
        assert_eq!(decoded, user);
    }

    #[test]
    fn test_decode_garbage_is_none() {
        assert!(SessionUser::decode("").is_none());
        assert!(SessionUser::decode("not json").is_none());
        assert!(SessionUser::decode("{\"username\":\"x\"}").is_none());
    }

    #[test]
    fn test_is_admin() {
        assert!(SessionUser::new("a", Role::Admin).is_admin());
        assert!(!SessionUser::new("v", Role::Viewer).is_admin());
    }
}
