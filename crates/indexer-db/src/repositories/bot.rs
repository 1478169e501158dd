use crate::models::DbBot;
use crate::Result;
use sqlx::{PgExecutor, PgPool};

pub struct BotRepository;

impl BotRepository {
    /// Insert or replace the full bot row
    pub async fn upsert<'e, E>(executor: E, bot: &DbBot) -> Result<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO bots (chain_id, id, address, owner, token_id, name, strategy, status,
                              base_token, quote_token, trade_amount, min_profit_target, max_drawdown,
                              total_trades, total_pnl, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (chain_id, id) DO UPDATE SET
                address = EXCLUDED.address,
                owner = EXCLUDED.owner,
                token_id = EXCLUDED.token_id,
                name = EXCLUDED.name,
                strategy = EXCLUDED.strategy,
                status = EXCLUDED.status,
                base_token = EXCLUDED.base_token,
                quote_token = EXCLUDED.quote_token,
                trade_amount = EXCLUDED.trade_amount,
                min_profit_target = EXCLUDED.min_profit_target,
                max_drawdown = EXCLUDED.max_drawdown,
                total_trades = EXCLUDED.total_trades,
                total_pnl = EXCLUDED.total_pnl,
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(bot.chain_id)
        .bind(&bot.id)
        .bind(&bot.address)
        .bind(&bot.owner)
        .bind(&bot.token_id)
        .bind(&bot.name)
        .bind(&bot.strategy)
        .bind(&bot.status)
        .bind(&bot.base_token)
        .bind(&bot.quote_token)
        .bind(&bot.trade_amount)
        .bind(bot.min_profit_target)
        .bind(bot.max_drawdown)
        .bind(bot.total_trades)
        .bind(&bot.total_pnl)
        .bind(bot.created_at)
        .bind(bot.updated_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// All bots of a chain, used to warm the in-memory store
    pub async fn get_all(pool: &PgPool, chain_id: i64) -> Result<Vec<DbBot>> {
        let results = sqlx::query_as::<_, DbBot>(
            "SELECT * FROM bots WHERE chain_id = $1 ORDER BY created_at ASC",
        )
        .bind(chain_id)
        .fetch_all(pool)
        .await?;
        Ok(results)
    }
}
