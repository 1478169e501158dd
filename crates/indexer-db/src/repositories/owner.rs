use crate::models::DbOwner;
use crate::Result;
use sqlx::{PgExecutor, PgPool};

pub struct OwnerRepository;

impl OwnerRepository {
    pub async fn upsert<'e, E>(executor: E, owner: &DbOwner) -> Result<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO owners (chain_id, address, bot_count, total_pnl)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (chain_id, address) DO UPDATE SET
                bot_count = EXCLUDED.bot_count,
                total_pnl = EXCLUDED.total_pnl
            "#,
        )
        .bind(owner.chain_id)
        .bind(&owner.address)
        .bind(owner.bot_count)
        .bind(&owner.total_pnl)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn get_all(pool: &PgPool, chain_id: i64) -> Result<Vec<DbOwner>> {
        let results = sqlx::query_as::<_, DbOwner>("SELECT * FROM owners WHERE chain_id = $1")
            .bind(chain_id)
            .fetch_all(pool)
            .await?;
        Ok(results)
    }
}
