//! In-memory credential store.
//!
//! All records live behind one mutex; `consume_and_replace` runs inside
//! a single lock region, which gives the same one-winner guarantee the
//! Postgres transaction provides.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use sharevault_core::error::AppError;
use sharevault_core::result::AppResult;
use sharevault_entity::token::RefreshTokenRecord;

use super::store::{CredentialStore, SubjectDirectory};

/// A credential store holding records in memory, keyed by token value.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: Mutex<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the record for a token, if any. Test helper.
    pub fn get(&self, token: &str) -> Option<RefreshTokenRecord> {
        self.records.lock().unwrap().get(token).cloned()
    }

    /// Marks a record revoked in place. Test helper mirroring an
    /// administrative revocation.
    pub fn revoke(&self, token: &str) {
        if let Some(rec) = self.records.lock().unwrap().get_mut(token) {
            rec.revoked = true;
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshTokenRecord>> {
        Ok(self.records.lock().unwrap().get(token).cloned())
    }

    async fn insert(&self, record: &RefreshTokenRecord) -> AppResult<()> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.token) {
            return Err(AppError::conflict("Duplicate refresh token value"));
        }
        records.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn consume_and_replace(
        &self,
        old_token: &str,
        successor: &RefreshTokenRecord,
    ) -> AppResult<bool> {
        let mut records = self.records.lock().unwrap();

        let consumed = match records.get_mut(old_token) {
            Some(rec) if !rec.used && !rec.revoked => {
                rec.used = true;
                true
            }
            _ => false,
        };

        if !consumed {
            return Ok(false);
        }

        if records.contains_key(&successor.token) {
            return Err(AppError::conflict("Duplicate refresh token value"));
        }
        records.insert(successor.token.clone(), successor.clone());
        Ok(true)
    }

    async fn revoke_all_active_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let mut records = self.records.lock().unwrap();
        let mut revoked = 0;
        for rec in records.values_mut() {
            if rec.user_id == user_id && !rec.used && !rec.revoked {
                rec.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}

/// An in-memory subject directory backed by a map of id to email.
#[derive(Debug, Default)]
pub struct InMemorySubjectDirectory {
    emails: Mutex<HashMap<Uuid, String>>,
}

impl InMemorySubjectDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subject.
    pub fn add(&self, user_id: Uuid, email: &str) {
        self.emails.lock().unwrap().insert(user_id, email.to_string());
    }
}

#[async_trait]
impl SubjectDirectory for InMemorySubjectDirectory {
    async fn email_for(&self, user_id: Uuid) -> AppResult<Option<String>> {
        Ok(self.emails.lock().unwrap().get(&user_id).cloned())
    }
}
