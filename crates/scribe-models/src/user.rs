//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::{Role, RoleCode};

/// User entity
///
/// `password` holds the argon2 hash, never plaintext; it is skipped on
/// serialization so it can never leak through a response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub profile_pic_url: Option<String>,
    /// Joined through the user_roles link table, not stored inline
    pub roles: Vec<Role>,
    pub verified: bool,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// True if the user holds at least one of the given role codes.
    pub fn has_any_role(&self, codes: &[RoleCode]) -> bool {
        self.roles.iter().any(|role| codes.contains(&role.code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_roles(codes: &[RoleCode]) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".into(),
            name: "Test".into(),
            password: None,
            profile_pic_url: None,
            roles: codes
                .iter()
                .map(|&code| Role {
                    id: Uuid::new_v4(),
                    code,
                    status: true,
                    created_at: now,
                    updated_at: now,
                })
                .collect(),
            verified: false,
            status: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_has_any_role() {
        let user = user_with_roles(&[RoleCode::Author]);
        assert!(user.has_any_role(&[RoleCode::Author, RoleCode::Editor]));
        assert!(!user.has_any_role(&[RoleCode::Editor]));
        assert!(!user.has_any_role(&[]));
    }

    #[test]
    fn test_password_not_serialized() {
        let mut user = user_with_roles(&[]);
        user.password = Some("hash".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hash"));
    }
}
