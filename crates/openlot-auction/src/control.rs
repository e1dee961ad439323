//! Role table: the reference access-control collaborator.
//!
//! One owner, any number of managers, and a pause flag. The owner appoints
//! and removes managers and is a manager themself. Pausing stops new bids
//! only; refund and settlement paths stay open so funds can always leave.

use std::collections::HashSet;

use openlot_types::{AccessControl, AccountId, OpenlotError, Result};

/// Owner, managers, and the pause switch.
pub struct RoleTable {
    owner: AccountId,
    managers: HashSet<AccountId>,
    paused: bool,
}

impl RoleTable {
    /// New table with `owner` as both owner and first manager.
    #[must_use]
    pub fn new(owner: AccountId) -> Self {
        let mut managers = HashSet::new();
        managers.insert(owner);
        Self {
            owner,
            managers,
            paused: false,
        }
    }

    #[must_use]
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// Appoints a manager. Owner only.
    pub fn add_manager(&mut self, caller: AccountId, manager: AccountId) -> Result<()> {
        if caller != self.owner {
            return Err(OpenlotError::NotOwner(caller));
        }
        self.managers.insert(manager);
        Ok(())
    }

    /// Removes a manager. Owner only; the owner's own managership stays.
    pub fn remove_manager(&mut self, caller: AccountId, manager: AccountId) -> Result<()> {
        if caller != self.owner {
            return Err(OpenlotError::NotOwner(caller));
        }
        if manager != self.owner {
            self.managers.remove(&manager);
        }
        Ok(())
    }

    /// Halts new bids. Owner or any manager.
    pub fn pause(&mut self, caller: AccountId) -> Result<()> {
        if !self.managers.contains(&caller) {
            return Err(OpenlotError::NotManager(caller));
        }
        self.paused = true;
        Ok(())
    }

    /// Resumes bidding. Owner only.
    pub fn unpause(&mut self, caller: AccountId) -> Result<()> {
        if caller != self.owner {
            return Err(OpenlotError::NotOwner(caller));
        }
        self.paused = false;
        Ok(())
    }
}

impl AccessControl for RoleTable {
    fn is_manager(&self, account: AccountId) -> bool {
        self.managers.contains(&account)
    }

    fn is_owner(&self, account: AccountId) -> bool {
        account == self.owner
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
