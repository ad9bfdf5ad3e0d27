use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("User email already exists")]
    DuplicateEmail,
    #[error("User not found")]
    NotFound,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    // Exact-string lookup; emails are stored as given, not normalized.
    email_index: HashMap<String, Uuid>,
    // Insertion order, drives list pagination.
    order: Vec<Uuid>,
}

/// In-memory user table behind an async lock. Cloning shares the same
/// underlying data, so every handler sees one consistent table.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    inner: Arc<RwLock<Tables>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut tables = self.inner.write().await;
        if tables.email_index.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        tables.email_index.insert(user.email.clone(), user.id);
        tables.order.push(user.id);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Option<User> {
        self.inner.read().await.users.get(&id).cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let tables = self.inner.read().await;
        let id = tables.email_index.get(email)?;
        tables.users.get(id).cloned()
    }

    /// Page through users in insertion order. `page` is zero-based.
    pub async fn list(&self, limit: usize, page: usize) -> Vec<User> {
        let tables = self.inner.read().await;
        tables
            .order
            .iter()
            .skip(limit.saturating_mul(page))
            .take(limit)
            .filter_map(|id| tables.users.get(id))
            .cloned()
            .collect()
    }

    /// Replace the stored record with `user`, keeping the email index
    /// consistent. Fails if the new email already belongs to someone else.
    pub async fn update(&self, user: User) -> Result<User, StoreError> {
        let mut tables = self.inner.write().await;
        let old_email = match tables.users.get(&user.id) {
            Some(existing) => existing.email.clone(),
            None => return Err(StoreError::NotFound),
        };

        if old_email != user.email {
            if let Some(owner) = tables.email_index.get(&user.email) {
                if *owner != user.id {
                    return Err(StoreError::DuplicateEmail);
                }
            }
            tables.email_index.remove(&old_email);
            tables.email_index.insert(user.email.clone(), user.id);
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.inner.write().await;
        let user = tables.users.remove(&id).ok_or(StoreError::NotFound)?;
        tables.email_index.remove(&user.email);
        tables.order.retain(|entry| *entry != id);
        Ok(())
    }
}
