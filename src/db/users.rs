use super::StoreError;
use crate::models::User;
use dashmap::{DashMap, mapref::entry::Entry};
use std::sync::Arc;
use uuid::Uuid;

/// `DashMap` = thread-safe HashMap; the email index gives O(1) login lookups
/// and keeps emails unique.
#[derive(Clone, Default)]
pub struct UserStore {
    users: Arc<DashMap<Uuid, User>>,
    email_index: Arc<DashMap<String, Uuid>>,
}

impl UserStore {
    pub fn insert(&self, user: User) -> Result<(), StoreError> {
        match self.email_index.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::EmailTaken),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.users.insert(user.id, user);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|user| user.clone())
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let id = *self.email_index.get(email)?;
        self.get(id)
    }

    pub fn remove(&self, id: Uuid) -> Option<User> {
        let (_, user) = self.users.remove(&id)?;
        self.email_index.remove(&user.email);
        Some(user)
    }
}
