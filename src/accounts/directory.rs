//! Account directory snapshots.
//!
//! An [`AccountDirectory`] is built once and never mutated afterwards.
//! [`SharedDirectory`] holds the currently visible snapshot behind an
//! [`ArcSwap`], so request handlers read without locking while the refresh
//! task installs a replacement in a single pointer swap.

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::observability::metrics;

/// A fax number and the contacts notified when it receives a fax.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Account {
    pub fax_number: String,
    /// Notification order. Duplicates are kept.
    #[serde(default)]
    pub contacts: Vec<String>,
}

impl Account {
    pub fn new(fax_number: impl Into<String>, contacts: Vec<String>) -> Self {
        Self {
            fax_number: fax_number.into(),
            contacts,
        }
    }
}

/// Immutable fax number → account map.
#[derive(Debug, Clone, Default)]
pub struct AccountDirectory {
    accounts: HashMap<String, Account>,
    generation: u64,
}

impl AccountDirectory {
    /// Build a snapshot from records in source order. Later duplicates win.
    pub fn from_accounts<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Account>,
    {
        let mut accounts = HashMap::new();
        for account in records {
            accounts.insert(account.fax_number.clone(), account);
        }
        Self {
            accounts,
            generation: 0,
        }
    }

    /// Consume the snapshot, returning it tagged with `generation`.
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Look up the account registered for `fax`.
    pub fn find(&self, fax: &str) -> Option<&Account> {
        self.accounts.get(fax)
    }

    /// Look up `fax`, requiring the stored number to match it exactly.
    ///
    /// No normalisation is applied: `+12223334444` and `12223334444` are
    /// different numbers.
    pub fn find_exact(&self, fax: &str) -> Option<&Account> {
        self.find(fax).filter(|account| account.fax_number == fax)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Refresh cycle that produced this snapshot. Zero for the initial load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}

/// The process-wide handle to the current directory snapshot.
#[derive(Debug)]
pub struct SharedDirectory {
    current: ArcSwap<AccountDirectory>,
}

impl SharedDirectory {
    pub fn new(initial: AccountDirectory) -> Self {
        metrics::record_directory_size(initial.len());
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// The current snapshot. Holding it pins that generation for the caller.
    pub fn snapshot(&self) -> Arc<AccountDirectory> {
        self.current.load_full()
    }

    /// Look up `fax` in the current snapshot, returning an owned copy.
    pub fn find(&self, fax: &str) -> Option<Account> {
        self.current.load().find_exact(fax).cloned()
    }

    /// Install `next` as the visible snapshot, tagging it with the next generation.
    pub fn replace(&self, next: AccountDirectory) -> u64 {
        let generation = self.current.load().generation() + 1;
        let next = next.with_generation(generation);
        metrics::record_directory_size(next.len());
        self.current.store(Arc::new(next));
        generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn contacts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_last_duplicate_wins() {
        let dir = AccountDirectory::from_accounts(vec![
            Account::new("12223334444", contacts(&["1"])),
            Account::new("14443332222", contacts(&["2"])),
            Account::new("12223334444", contacts(&["3", "3"])),
        ]);

        assert_eq!(dir.len(), 2);
        assert_eq!(dir.find("12223334444").unwrap().contacts, contacts(&["3", "3"]));
    }

    #[test]
    fn test_find_is_exact() {
        let dir = AccountDirectory::from_accounts(vec![Account::new(
            "12223334444",
            contacts(&["14443332222"]),
        )]);

        assert!(dir.find_exact("12223334444").is_some());
        assert!(dir.find_exact("+12223334444").is_none());
        assert!(dir.find_exact("1222333444").is_none());
    }

    #[test]
    fn test_replace_bumps_generation() {
        let shared = SharedDirectory::new(AccountDirectory::default());
        assert_eq!(shared.snapshot().generation(), 0);
        assert!(shared.find("12223334444").is_none());

        let generation = shared.replace(AccountDirectory::from_accounts(vec![Account::new(
            "12223334444",
            contacts(&["14443332222"]),
        )]));

        assert_eq!(generation, 1);
        assert_eq!(shared.snapshot().generation(), 1);
        assert_eq!(shared.find("12223334444").unwrap().contacts, contacts(&["14443332222"]));
    }

    #[test]
    fn test_pinned_snapshot_survives_replace() {
        let shared = SharedDirectory::new(AccountDirectory::from_accounts(vec![Account::new(
            "1",
            vec![],
        )]));
        let pinned = shared.snapshot();

        shared.replace(AccountDirectory::default());

        assert!(pinned.find("1").is_some());
        assert!(shared.find("1").is_none());
    }

    /// Every account in generation `g` carries contact `g`; a reader seeing two
    /// different values inside one snapshot would mean a torn read.
    #[test]
    fn test_readers_see_whole_snapshots() {
        fn build(generation: u64) -> AccountDirectory {
            AccountDirectory::from_accounts(
                (0..50).map(|i| Account::new(i.to_string(), vec![generation.to_string()])),
            )
        }

        let shared = Arc::new(SharedDirectory::new(build(0)));
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                let done = done.clone();
                thread::spawn(move || {
                    while !done.load(Ordering::Relaxed) {
                        let snap = shared.snapshot();
                        let expected = snap.generation().to_string();
                        assert_eq!(snap.len(), 50);
                        for account in snap.accounts() {
                            assert_eq!(account.contacts, vec![expected.clone()]);
                        }
                    }
                })
            })
            .collect();

        for generation in 1..=200 {
            let installed = shared.replace(build(generation));
            assert_eq!(installed, generation);
        }
        done.store(true, Ordering::Relaxed);

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
