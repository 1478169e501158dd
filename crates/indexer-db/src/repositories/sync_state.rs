use crate::Result;
use sqlx::PgPool;

pub struct SyncStateRepository;

impl SyncStateRepository {
    /// Last synced block of a chain (None if no cursor was stored yet)
    pub async fn get_last_synced_block(pool: &PgPool, chain_id: i64) -> Result<Option<u64>> {
        let result: Option<(i64,)> =
            sqlx::query_as("SELECT last_synced_block FROM sync_state WHERE chain_id = $1")
                .bind(chain_id)
                .fetch_optional(pool)
                .await?;

        Ok(result.map(|(block,)| block.max(0) as u64))
    }

    /// Record the last synced block and, when known, its timestamp. The cursor never moves back
    pub async fn set_sync_state(
        pool: &PgPool,
        chain_id: i64,
        block: u64,
        timestamp: Option<u64>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sync_state (chain_id, last_synced_block, last_synced_timestamp, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (chain_id) DO UPDATE SET
                last_synced_block = GREATEST(sync_state.last_synced_block, EXCLUDED.last_synced_block),
                last_synced_timestamp = COALESCE(EXCLUDED.last_synced_timestamp, sync_state.last_synced_timestamp),
                updated_at = NOW()
            "#,
        )
        .bind(chain_id)
        .bind(block as i64)
        .bind(timestamp.map(|t| t as i64))
        .execute(pool)
        .await?;
        Ok(())
    }
}
