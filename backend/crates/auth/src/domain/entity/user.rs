//! User Entity

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_role::UserRole,
};

/// User entity
///
/// The password hash lives here for verification but is stripped from
/// every response DTO.
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier, server-generated at creation
    pub id: UserId,
    /// User name (unique, case-sensitive)
    pub username: UserName,
    /// Email address (unique, case-sensitive, used for login)
    pub email: Email,
    /// Argon2id PHC hash of the password
    pub password_hash: HashedPassword,
    /// Role (User, Admin)
    pub role: UserRole,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the default role
    pub fn new(username: UserName, email: Email, password_hash: HashedPassword) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            role: UserRole::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update user role
    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::PlainPassword;

    fn sample_user() -> User {
        let hash = PlainPassword::new("Abcdef1!".to_string())
            .unwrap()
            .hash()
            .unwrap();
        User::new(
            UserName::new("alice").unwrap(),
            Email::new("a@x.io").unwrap(),
            hash,
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let user = sample_user();
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_set_role_bumps_updated_at() {
        let mut user = sample_user();
        let before = user.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(5));
        user.set_role(UserRole::Admin);
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.updated_at > before);
    }
}
