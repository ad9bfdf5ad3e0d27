use std::collections::HashMap;

use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::auth::PermissionFlag;
use crate::store::{StoreError, User, UserStore, UserView};

const MIN_PASSWORD_LENGTH: usize = 5;

/// Registration payload. Everything is optional at the wire level so a
/// missing field reports as a field error instead of a deserialize failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterUser {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Update payload shared by replace and patch; replace requires every field,
/// patch validates only the fields present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub permission_flags: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Invalid request body")]
    Validation { field_errors: HashMap<String, String> },
    #[error("User email already exists")]
    EmailExists,
    #[error("Invalid email")]
    EmailNotOwned,
    #[error("User cannot change permission flags")]
    FlagsImmutable,
    #[error("Invalid email and/or password")]
    InvalidCredentials,
    #[error("User {0} not found")]
    NotFound(Uuid),
}

/// Domain layer over the user store: field validation, cross-record rules,
/// and password hashing live here so handlers stay thin.
#[derive(Debug, Clone)]
pub struct UserService {
    store: UserStore,
}

impl UserService {
    pub fn new(store: UserStore) -> Self {
        Self { store }
    }

    /// Create a user. New accounts always start with the FREE flag; any
    /// mask in the request body is ignored.
    pub async fn register(&self, request: RegisterUser) -> Result<User, UserError> {
        Self::validate_register(&request)?;

        let now = Utc::now();
        let id = Uuid::new_v4();
        let user = User {
            id,
            email: request.email.unwrap_or_default(),
            password_hash: Self::hash_password(&request.password.unwrap_or_default()),
            first_name: request.first_name,
            last_name: request.last_name,
            permission_flags: PermissionFlag::FREE.bits(),
            created_at: now,
            updated_at: now,
        };

        self.store.insert(user).await.map_err(|err| match err {
            StoreError::DuplicateEmail => UserError::EmailExists,
            StoreError::NotFound => UserError::NotFound(id),
        })
    }

    /// Look up by email and check the password. Both failure modes collapse
    /// into one error so responses do not reveal which part was wrong.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, UserError> {
        let user = self
            .store
            .find_by_email(email)
            .await
            .ok_or(UserError::InvalidCredentials)?;

        if !Self::verify_password(password, &user.password_hash) {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, UserError> {
        self.store.get(id).await.ok_or(UserError::NotFound(id))
    }

    pub async fn list(&self, limit: usize, page: usize) -> Vec<UserView> {
        self.store
            .list(limit, page)
            .await
            .iter()
            .map(UserView::from)
            .collect()
    }

    /// Full-document checks for a replace, without writing. Handlers run
    /// this before their flag gate so validation failures win over 403s.
    pub async fn validate_replace(&self, id: Uuid, update: &UserUpdate) -> Result<(), UserError> {
        Self::validate_replace_fields(update)?;
        let current = self.get(id).await?;
        self.check_email_owner(id, update.email.as_deref()).await?;
        Self::check_flags_unchanged(&current, update)
    }

    pub async fn replace(&self, id: Uuid, update: UserUpdate) -> Result<User, UserError> {
        self.validate_replace(id, &update).await?;
        let mut user = self.get(id).await?;

        user.email = update.email.unwrap_or_default();
        user.password_hash = Self::hash_password(&update.password.unwrap_or_default());
        user.first_name = update.first_name;
        user.last_name = update.last_name;
        user.updated_at = Utc::now();

        self.write_update(user).await
    }

    /// Sparse-document checks for a patch, without writing.
    pub async fn validate_patch(&self, id: Uuid, update: &UserUpdate) -> Result<(), UserError> {
        Self::validate_patch_fields(update)?;
        let current = self.get(id).await?;
        if update.email.is_some() {
            self.check_email_owner(id, update.email.as_deref()).await?;
        }
        Self::check_flags_unchanged(&current, update)
    }

    pub async fn patch(&self, id: Uuid, update: UserUpdate) -> Result<User, UserError> {
        self.validate_patch(id, &update).await?;
        let mut user = self.get(id).await?;

        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(password) = update.password {
            user.password_hash = Self::hash_password(&password);
        }
        if let Some(first_name) = update.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = update.last_name {
            user.last_name = Some(last_name);
        }
        user.updated_at = Utc::now();

        self.write_update(user).await
    }

    /// Overwrite the permission mask verbatim, unknown bits included. This
    /// is the only write path for flags.
    pub async fn set_permission_flags(&self, id: Uuid, mask: u32) -> Result<User, UserError> {
        let mut user = self.get(id).await?;
        user.permission_flags = mask;
        user.updated_at = Utc::now();
        self.write_update(user).await
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), UserError> {
        self.store.remove(id).await.map_err(|err| match err {
            StoreError::NotFound => UserError::NotFound(id),
            StoreError::DuplicateEmail => UserError::EmailExists,
        })
    }

    async fn write_update(&self, user: User) -> Result<User, UserError> {
        let id = user.id;
        self.store.update(user).await.map_err(|err| match err {
            StoreError::DuplicateEmail => UserError::EmailNotOwned,
            StoreError::NotFound => UserError::NotFound(id),
        })
    }

    /// A changed email must not already belong to a different user.
    async fn check_email_owner(&self, id: Uuid, email: Option<&str>) -> Result<(), UserError> {
        let Some(email) = email else { return Ok(()) };
        if let Some(owner) = self.store.find_by_email(email).await {
            if owner.id != id {
                return Err(UserError::EmailNotOwned);
            }
        }
        Ok(())
    }

    /// A mask in an update body must equal the stored mask; flags change
    /// only through the dedicated endpoint.
    fn check_flags_unchanged(current: &User, update: &UserUpdate) -> Result<(), UserError> {
        match update.permission_flags {
            Some(mask) if mask != current.permission_flags => Err(UserError::FlagsImmutable),
            _ => Ok(()),
        }
    }

    fn validate_register(request: &RegisterUser) -> Result<(), UserError> {
        let mut field_errors = HashMap::new();
        Self::require_email(&mut field_errors, request.email.as_deref());
        Self::require_password(&mut field_errors, request.password.as_deref());
        Self::finish_validation(field_errors)
    }

    fn validate_replace_fields(update: &UserUpdate) -> Result<(), UserError> {
        let mut field_errors = HashMap::new();
        Self::require_email(&mut field_errors, update.email.as_deref());
        Self::require_password(&mut field_errors, update.password.as_deref());
        if update.first_name.is_none() {
            field_errors.insert("firstName".to_string(), "First name is required".to_string());
        }
        if update.last_name.is_none() {
            field_errors.insert("lastName".to_string(), "Last name is required".to_string());
        }
        if update.permission_flags.is_none() {
            field_errors.insert(
                "permissionFlags".to_string(),
                "Permission flags are required".to_string(),
            );
        }
        Self::finish_validation(field_errors)
    }

    fn validate_patch_fields(update: &UserUpdate) -> Result<(), UserError> {
        let mut field_errors = HashMap::new();
        if let Some(email) = update.email.as_deref() {
            if !Self::valid_email(email) {
                field_errors.insert("email".to_string(), "Invalid email format".to_string());
            }
        }
        if let Some(password) = update.password.as_deref() {
            if password.len() < MIN_PASSWORD_LENGTH {
                field_errors.insert("password".to_string(), Self::short_password_message());
            }
        }
        Self::finish_validation(field_errors)
    }

    fn require_email(field_errors: &mut HashMap<String, String>, email: Option<&str>) {
        match email {
            None => {
                field_errors.insert("email".to_string(), "Email is required".to_string());
            }
            Some(email) if !Self::valid_email(email) => {
                field_errors.insert("email".to_string(), "Invalid email format".to_string());
            }
            _ => {}
        }
    }

    fn require_password(field_errors: &mut HashMap<String, String>, password: Option<&str>) {
        match password {
            None => {
                field_errors.insert("password".to_string(), "Password is required".to_string());
            }
            Some(password) if password.len() < MIN_PASSWORD_LENGTH => {
                field_errors.insert("password".to_string(), Self::short_password_message());
            }
            _ => {}
        }
    }

    fn short_password_message() -> String {
        format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH)
    }

    fn finish_validation(field_errors: HashMap<String, String>) -> Result<(), UserError> {
        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(UserError::Validation { field_errors })
        }
    }

    // Basic shape check, not RFC-complete.
    fn valid_email(email: &str) -> bool {
        if email.is_empty() || !email.contains('@') || !email.contains('.') {
            return false;
        }
        let parts: Vec<&str> = email.split('@').collect();
        parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty()
    }

    /// Salted SHA-256, stored as `salt$hexdigest`.
    fn hash_password(password: &str) -> String {
        let salt = Uuid::new_v4().simple().to_string();
        format!("{}${}", salt, Self::hash_with_salt(&salt, password))
    }

    fn hash_with_salt(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn verify_password(password: &str, stored: &str) -> bool {
        match stored.split_once('$') {
            Some((salt, digest)) => {
                Self::constant_time_eq(Self::hash_with_salt(salt, password).as_bytes(), digest.as_bytes())
            }
            None => false,
        }
    }

    fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
        if a.len() != b.len() {
            return false;
        }
        let mut diff = 0u8;
        for (x, y) in a.iter().zip(b.iter()) {
            diff |= x ^ y;
        }
        diff == 0
    }
}
