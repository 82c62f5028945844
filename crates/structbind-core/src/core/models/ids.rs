use slotmap::new_key_type;
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    pub struct SequenceId;
}

/// Instance identity of a structure entry.
///
/// Every call to [`EntryKey::mint`] yields a key never handed out before in this process,
/// so two entries created separately are distinct even when they describe the same file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey(u64);

static NEXT_ENTRY_KEY: AtomicU64 = AtomicU64::new(1);

impl EntryKey {
    pub fn mint() -> Self {
        Self(NEXT_ENTRY_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_keys_are_unique() {
        let first = EntryKey::mint();
        let second = EntryKey::mint();
        let copy = first;
        assert_ne!(first, second);
        assert_eq!(first, copy);
    }
}
