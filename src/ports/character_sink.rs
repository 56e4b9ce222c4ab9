//! Character sink port.
//!
//! Receives each finalized character once per commit and stores it durably.

use async_trait::async_trait;

use crate::domain::character::FinalizedCharacter;
use crate::domain::foundation::{CharacterRecordId, DomainError};

/// Port for storing finalized characters.
///
/// Every call writes a new record; the sink does not deduplicate.
#[async_trait]
pub trait CharacterSink: Send + Sync {
    /// Store one finalized character and return its record id.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` if the record could not be written
    async fn persist(&self, character: &FinalizedCharacter)
        -> Result<CharacterRecordId, DomainError>;
}
