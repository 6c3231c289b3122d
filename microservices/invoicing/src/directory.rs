//! Account Directory
//!
//! Billing contact details per account. Consumed when resolving
//! active/inactive selections and when decorating report rows; invoice
//! computation itself never touches it.

use dashmap::DashMap;
use openbill_core::AccountId;
use std::collections::HashSet;
use std::sync::Arc;

use crate::types::{AccountProfile, AccountStatus};

#[derive(Clone, Default)]
pub struct AccountDirectory {
    accounts: Arc<DashMap<AccountId, AccountProfile>>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, profile: AccountProfile) {
        self.accounts.insert(profile.account_id.clone(), profile);
    }

    pub fn get(&self, account_id: &AccountId) -> Option<AccountProfile> {
        self.accounts.get(account_id).map(|p| p.clone())
    }

    pub fn ids_with_status(&self, status: AccountStatus) -> HashSet<AccountId> {
        self.accounts
            .iter()
            .filter(|e| e.value().status == status)
            .map(|e| e.key().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
