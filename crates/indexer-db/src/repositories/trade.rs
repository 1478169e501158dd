use crate::models::DbTrade;
use crate::Result;
use sqlx::{PgExecutor, PgPool};

pub struct TradeRepository;

impl TradeRepository {
    /// Insert trade (idempotent - ignores duplicates). Returns false when the row already existed
    pub async fn insert<'e, E>(executor: E, trade: &DbTrade) -> Result<bool>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO trades (chain_id, id, bot, transaction_id, log_index, block_number, timestamp,
                                token_in, token_out, amount_in, amount_out, pnl)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (chain_id, id) DO NOTHING
            "#,
        )
        .bind(trade.chain_id)
        .bind(&trade.id)
        .bind(&trade.bot)
        .bind(&trade.transaction_id)
        .bind(trade.log_index)
        .bind(trade.block_number)
        .bind(trade.timestamp)
        .bind(&trade.token_in)
        .bind(&trade.token_out)
        .bind(&trade.amount_in)
        .bind(&trade.amount_out)
        .bind(&trade.pnl)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All trades of a chain in canonical order, used to warm the in-memory store
    pub async fn get_all(pool: &PgPool, chain_id: i64) -> Result<Vec<DbTrade>> {
        let results = sqlx::query_as::<_, DbTrade>(
            "SELECT * FROM trades WHERE chain_id = $1 ORDER BY block_number ASC, log_index ASC",
        )
        .bind(chain_id)
        .fetch_all(pool)
        .await?;
        Ok(results)
    }
}
