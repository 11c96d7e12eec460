//! MongoDB Repository Implementations
//!
//! Stores users and sessions in the `users` / `sessions` collections.
//! Uniqueness (users.email, users.username, sessions.user_id) is enforced
//! by unique indexes; duplicate-key rejections surface as typed conflict
//! errors. Every call runs under a 5-second deadline.

use chrono::{DateTime, Utc};
use mongodb::{Collection, Database, IndexModel, options::IndexOptions};
use serde::{Deserialize, Serialize};
use std::future::IntoFuture;
use std::time::Duration;
use uuid::Uuid;

use bson::doc;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use bson::serde_helpers::uuid_1_as_binary;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, user_id::SessionId, user_id::UserId, user_name::UserName, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};
use platform::password::HashedPassword;

/// Deadline applied to every store call
const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// MongoDB-backed auth repository
#[derive(Clone)]
pub struct MongoAuthRepository {
    users: Collection<UserDocument>,
    sessions: Collection<SessionDocument>,
}

impl MongoAuthRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection("users"),
            sessions: db.collection("sessions"),
        }
    }

    /// Create the unique and secondary indexes. Idempotent; run at startup.
    pub async fn ensure_indexes(&self) -> AuthResult<()> {
        let unique = || IndexOptions::builder().unique(true).build();

        deadline(self.users.create_indexes(vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique())
                .build(),
            IndexModel::builder()
                .keys(doc! { "username": 1 })
                .options(unique())
                .build(),
        ]))
        .await?;

        deadline(self.sessions.create_indexes(vec![
            IndexModel::builder()
                .keys(doc! { "user_id": 1 })
                .options(unique())
                .build(),
            IndexModel::builder().keys(doc! { "username": 1 }).build(),
            IndexModel::builder().keys(doc! { "expires_at": 1 }).build(),
        ]))
        .await?;

        Ok(())
    }
}

/// Run a store call under the 5-second deadline
async fn deadline<T>(fut: impl IntoFuture<Output = mongodb::error::Result<T>>) -> AuthResult<T> {
    match tokio::time::timeout(STORE_TIMEOUT, fut).await {
        Ok(result) => result.map_err(AuthError::from),
        Err(_) => Err(AuthError::StoreTimeout),
    }
}

/// Duplicate-key rejection (error code 11000) from a unique index
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_err)) => write_err.code == 11000,
        ErrorKind::Command(command_err) => command_err.code == 11000,
        _ => false,
    }
}

fn bson_uuid(uuid: &Uuid) -> bson::Uuid {
    bson::Uuid::from_uuid_1(*uuid)
}

fn bson_now() -> bson::DateTime {
    bson::DateTime::from_chrono(Utc::now())
}

// ============================================================================
// Documents
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", with = "uuid_1_as_binary")]
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    updated_at: DateTime<Utc>,
}

impl UserDocument {
    fn from_entity(user: &User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            password_hash: user.password_hash.as_str().to_string(),
            role: user.role.code().to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    fn into_entity(self) -> AuthResult<User> {
        let role = UserRole::parse(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("invalid role in user record: {}", self.role)))?;

        Ok(User {
            id: UserId::from_uuid(self.id),
            username: UserName::from_stored(self.username),
            email: Email::from_stored(self.email),
            password_hash: HashedPassword::from_stored(self.password_hash),
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionDocument {
    #[serde(rename = "_id", with = "uuid_1_as_binary")]
    id: Uuid,
    #[serde(with = "uuid_1_as_binary")]
    user_id: Uuid,
    username: String,
    refresh_token: String,
    is_active: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    expires_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    last_activity: DateTime<Utc>,
}

impl SessionDocument {
    fn from_entity(session: &Session) -> Self {
        Self {
            id: *session.id.as_uuid(),
            user_id: *session.user_id.as_uuid(),
            username: session.username.as_str().to_string(),
            refresh_token: session.refresh_token.clone(),
            is_active: session.is_active,
            created_at: session.created_at,
            expires_at: session.expires_at,
            last_activity: session.last_activity,
        }
    }

    fn into_entity(self) -> Session {
        Session {
            id: SessionId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            username: UserName::from_stored(self.username),
            refresh_token: self.refresh_token,
            is_active: self.is_active,
            created_at: self.created_at,
            expires_at: self.expires_at,
            last_activity: self.last_activity,
        }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for MongoAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let insert = self.users.insert_one(UserDocument::from_entity(user));
        match tokio::time::timeout(STORE_TIMEOUT, insert).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(err)) if is_duplicate_key(&err) => Err(AuthError::UserExists),
            Ok(Err(err)) => Err(err.into()),
            Err(_) => Err(AuthError::StoreTimeout),
        }
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = deadline(
            self.users
                .find_one(doc! { "_id": bson_uuid(user_id.as_uuid()) }),
        )
        .await?;

        row.map(UserDocument::into_entity).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = deadline(self.users.find_one(doc! { "email": email.as_str() })).await?;

        row.map(UserDocument::into_entity).transpose()
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>> {
        let row = deadline(self.users.find_one(doc! { "username": username.as_str() })).await?;

        row.map(UserDocument::into_entity).transpose()
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let result = deadline(self.users.update_one(
            doc! { "_id": bson_uuid(user.id.as_uuid()) },
            doc! { "$set": {
                "username": user.username.as_str(),
                "email": user.email.as_str(),
                "password_hash": user.password_hash.as_str(),
                "role": user.role.code(),
                "updated_at": bson_now(),
            }},
        ))
        .await?;

        if result.matched_count == 0 {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for MongoAuthRepository {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        let insert = self
            .sessions
            .insert_one(SessionDocument::from_entity(session));
        match tokio::time::timeout(STORE_TIMEOUT, insert).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(err)) if is_duplicate_key(&err) => Err(AuthError::SessionExists),
            Ok(Err(err)) => Err(err.into()),
            Err(_) => Err(AuthError::StoreTimeout),
        }
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Session>> {
        let row = deadline(
            self.sessions
                .find_one(doc! { "user_id": bson_uuid(user_id.as_uuid()) }),
        )
        .await?;

        Ok(row.map(SessionDocument::into_entity))
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<Session>> {
        let row = deadline(
            self.sessions
                .find_one(doc! { "username": username.as_str() }),
        )
        .await?;

        Ok(row.map(SessionDocument::into_entity))
    }

    async fn update(&self, session: &Session) -> AuthResult<()> {
        // The stored _id is kept; everything else is replaced
        let result = deadline(self.sessions.update_one(
            doc! { "user_id": bson_uuid(session.user_id.as_uuid()) },
            doc! { "$set": {
                "username": session.username.as_str(),
                "refresh_token": &session.refresh_token,
                "is_active": session.is_active,
                "created_at": bson::DateTime::from_chrono(session.created_at),
                "expires_at": bson::DateTime::from_chrono(session.expires_at),
                "last_activity": bson_now(),
            }},
        ))
        .await?;

        if result.matched_count == 0 {
            return Err(AuthError::SessionNotFound);
        }
        Ok(())
    }

    async fn touch(&self, session_id: &SessionId) -> AuthResult<()> {
        let result = deadline(self.sessions.update_one(
            doc! { "_id": bson_uuid(session_id.as_uuid()) },
            doc! { "$set": { "last_activity": bson_now() } },
        ))
        .await?;

        if result.matched_count == 0 {
            return Err(AuthError::SessionNotFound);
        }
        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: &UserId) -> AuthResult<()> {
        deadline(
            self.sessions
                .delete_one(doc! { "user_id": bson_uuid(user_id.as_uuid()) }),
        )
        .await?;

        Ok(())
    }

    async fn delete_expired(&self) -> AuthResult<u64> {
        let result = deadline(
            self.sessions
                .delete_many(doc! { "expires_at": { "$lt": bson_now() } }),
        )
        .await?;

        if result.deleted_count > 0 {
            tracing::info!(
                sessions_deleted = result.deleted_count,
                "Removed expired sessions"
            );
        }

        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_name::UserName;
    use platform::password::PlainPassword;

    #[test]
    fn test_user_document_roundtrip() {
        let hash = PlainPassword::new("Abcdef1!".to_string())
            .unwrap()
            .hash()
            .unwrap();
        let user = User::new(
            UserName::new("alice").unwrap(),
            Email::new("a@x.io").unwrap(),
            hash,
        );

        let restored = UserDocument::from_entity(&user).into_entity().unwrap();
        assert_eq!(restored.id, user.id);
        assert_eq!(restored.username, user.username);
        assert_eq!(restored.email, user.email);
        assert_eq!(restored.role, user.role);
        assert!(restored.password_hash.verify("Abcdef1!"));
    }

    #[test]
    fn test_user_document_rejects_unknown_role() {
        let doc = UserDocument {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "a@x.io".to_string(),
            password_hash: "hash".to_string(),
            role: "superuser".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(doc.into_entity().is_err());
    }

    #[test]
    fn test_session_document_roundtrip() {
        let session = Session::new(
            UserId::new(),
            UserName::new("alice").unwrap(),
            "refresh".to_string(),
            chrono::Duration::days(7),
        );

        let restored = SessionDocument::from_entity(&session).into_entity();
        assert_eq!(restored.id, session.id);
        assert_eq!(restored.user_id, session.user_id);
        assert_eq!(restored.refresh_token, session.refresh_token);
        assert!(restored.is_active);
    }

    #[test]
    fn test_session_document_field_names_match_indexes() {
        let session = Session::new(
            UserId::new(),
            UserName::new("alice").unwrap(),
            "refresh".to_string(),
            chrono::Duration::days(7),
        );
        let doc = bson::to_document(&SessionDocument::from_entity(&session)).unwrap();

        for key in ["_id", "user_id", "username", "expires_at"] {
            assert!(doc.contains_key(key), "missing {key}");
        }
    }
}
