use std::{collections::BTreeMap, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// The index was already delivered.
    Stale { index: u64, cursor: u64 },
    Duplicate(u64),
    /// Entries are waiting behind an index that will never arrive.
    Gap { cursor: u64, pending: usize },
}

impl fmt::Display for ReorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReorderError::Stale { index, cursor } => {
                write!(f, "index {index} is behind the cursor {cursor}")
            }
            ReorderError::Duplicate(index) => write!(f, "index {index} inserted twice"),
            ReorderError::Gap { cursor, pending } => {
                write!(f, "{pending} entries waiting, index {cursor} never arrived")
            }
        }
    }
}

impl std::error::Error for ReorderError {}

/// Holds out-of-order completions until the cursor reaches them.
#[derive(Debug)]
pub struct ReorderBuffer<T> {
    cursor: u64,
    pending: BTreeMap<u64, T>,
}

impl<T> Default for ReorderBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReorderBuffer<T> {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            pending: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, index: u64, value: T) -> Result<(), ReorderError> {
        if index < self.cursor {
            return Err(ReorderError::Stale {
                index,
                cursor: self.cursor,
            });
        }
        if self.pending.contains_key(&index) {
            return Err(ReorderError::Duplicate(index));
        }
        self.pending.insert(index, value);
        Ok(())
    }

    /// Takes the entry at the cursor, if it has arrived, and advances.
    pub fn pop_ready(&mut self) -> Option<(u64, T)> {
        let value = self.pending.remove(&self.cursor)?;
        let index = self.cursor;
        self.cursor += 1;
        Some((index, value))
    }

    /// Next index to deliver.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops everything waiting. The cursor stays where it is.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Fails if anything is still waiting, for the end of a sequence.
    pub fn finish(&self) -> Result<(), ReorderError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(ReorderError::Gap {
                cursor: self.cursor,
                pending: self.pending.len(),
            })
        }
    }
}
