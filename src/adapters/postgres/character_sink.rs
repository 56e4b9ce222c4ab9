//! PostgreSQL implementation of CharacterSink.
//!
//! Writes one row per finalized character into `characters`. The table is
//! created on first use if it does not exist.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::domain::character::FinalizedCharacter;
use crate::domain::foundation::{CharacterRecordId, DomainError, ErrorCode};
use crate::ports::CharacterSink;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS characters (
        id SERIAL PRIMARY KEY,
        name TEXT,
        age INT,
        gender TEXT,
        physical_appearance TEXT,
        personality TEXT,
        abilities_power TEXT,
        occupation TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

const INSERT_CHARACTER: &str = r#"
    INSERT INTO characters (
        name, age, gender, physical_appearance, personality, abilities_power, occupation
    ) VALUES ($1, $2, $3, $4, $5, $6, $7)
    RETURNING id
"#;

/// PostgreSQL implementation of CharacterSink.
#[derive(Clone)]
pub struct PostgresCharacterSink {
    pool: PgPool,
    schema_ready: Arc<OnceCell<()>>,
}

impl PostgresCharacterSink {
    /// Creates a new PostgresCharacterSink.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema_ready: Arc::new(OnceCell::new()),
        }
    }

    /// Creates the `characters` table if absent. Runs at most once per sink.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        self.schema_ready
            .get_or_try_init(|| async {
                sqlx::query(CREATE_TABLE)
                    .execute(&self.pool)
                    .await
                    .map(|_| ())
                    .map_err(|e| {
                        DomainError::new(
                            ErrorCode::DatabaseError,
                            format!("Failed to create characters table: {}", e),
                        )
                    })
            })
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl CharacterSink for PostgresCharacterSink {
    async fn persist(
        &self,
        character: &FinalizedCharacter,
    ) -> Result<CharacterRecordId, DomainError> {
        self.ensure_schema().await?;

        // Released back to the pool when dropped, on every path.
        let mut conn = self.pool.acquire().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to acquire connection: {}", e),
            )
        })?;

        let id: i32 = sqlx::query_scalar(INSERT_CHARACTER)
            .bind(&character.name)
            .bind(character.age)
            .bind(&character.gender)
            .bind(&character.physical_appearance)
            .bind(&character.personality)
            .bind(&character.abilities_power)
            .bind(&character.occupation)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to insert character: {}", e),
                )
            })?;

        Ok(CharacterRecordId::new(i64::from(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::character::Attribute;

    #[test]
    fn table_has_a_column_per_attribute() {
        for attribute in Attribute::ALL {
            assert!(
                CREATE_TABLE.contains(&format!("{} ", attribute.as_str())),
                "missing column {attribute}"
            );
            assert!(INSERT_CHARACTER.contains(attribute.as_str()));
        }
    }

    #[test]
    fn bootstrap_is_idempotent_sql() {
        assert!(CREATE_TABLE.contains("IF NOT EXISTS"));
    }

    #[test]
    fn insert_binds_seven_values() {
        assert!(INSERT_CHARACTER.contains("$7"));
        assert!(!INSERT_CHARACTER.contains("$8"));
    }
}
