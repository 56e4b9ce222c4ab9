//! In-Memory Character Sink Adapter
//!
//! Records finalized characters in memory and hands out sequential record
//! ids, mimicking a SERIAL primary key. Can be switched into a failing mode
//! to exercise persistence-failure handling.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::character::FinalizedCharacter;
use crate::domain::foundation::{CharacterRecordId, DomainError, ErrorCode};
use crate::ports::CharacterSink;

/// In-memory sink for finalized characters
#[derive(Debug, Clone, Default)]
pub struct InMemoryCharacterSink {
    rows: Arc<RwLock<Vec<(CharacterRecordId, FinalizedCharacter)>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryCharacterSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that rejects every write
    pub fn failing() -> Self {
        let sink = Self::new();
        sink.set_failing(true);
        sink
    }

    /// Toggle failing mode
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All stored rows, oldest first
    pub async fn rows(&self) -> Vec<(CharacterRecordId, FinalizedCharacter)> {
        self.rows.read().await.clone()
    }

    /// Number of stored rows
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl CharacterSink for InMemoryCharacterSink {
    async fn persist(
        &self,
        character: &FinalizedCharacter,
    ) -> Result<CharacterRecordId, DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Failed to insert character: sink unavailable",
            ));
        }

        let mut rows = self.rows.write().await;
        let id = CharacterRecordId::new(rows.len() as i64 + 1);
        rows.push((id, character.clone()));
        Ok(id)
    }
}
