use async_trait::async_trait;
use configs::DatabaseConfig;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, FromQueryResult, QueryFilter, Set, Statement, TransactionTrait,
};
use tracing::debug;

use models::{
    counter,
    score::{self, BestScore, NewScore},
};

use super::{CounterRepository, ScoreRepository};
use crate::errors::ServiceError;

// A nickname's best may have been reached several times; only the earliest counts.
const BEST_PER_NICKNAME_SQL: &str = r#"
SELECT s.nickname AS nickname, s.floors AS floors, MIN(s.created_at) AS reached_at
FROM scores s
JOIN (SELECT nickname, MAX(floors) AS best FROM scores GROUP BY nickname) b
  ON b.nickname = s.nickname AND b.best = s.floors
GROUP BY s.nickname, s.floors
ORDER BY s.floors DESC, reached_at ASC, MIN(s.id) ASC
LIMIT ?
"#;

/// SeaORM-backed store over a single SQLite database.
#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    /// Connect and make sure the schema and the counter row exist.
    pub async fn open(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        if let Some(path) = cfg.file_path() {
            common::env::ensure_parent_dir(&path).await?;
        }
        let db = models::db::connect_with_config(cfg).await?;
        models::schema::init(&db).await?;
        Ok(Self { db })
    }

    pub async fn in_memory() -> anyhow::Result<Self> {
        Self::open(&DatabaseConfig::in_memory()).await
    }
}

#[async_trait]
impl CounterRepository for SeaOrmStore {
    async fn get(&self, key: &str) -> Result<Option<i64>, ServiceError> {
        let row = counter::Entity::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(row.map(|r| r.value))
    }

    async fn increment(&self, key: &str) -> Result<i64, ServiceError> {
        // The UPDATE takes the write lock first, so the read-back sees only our increment.
        let txn = self.db.begin().await?;
        let res = counter::Entity::update_many()
            .col_expr(counter::Column::Value, Expr::col(counter::Column::Value).add(1))
            .filter(counter::Column::Key.eq(key))
            .exec(&txn)
            .await?;
        if res.rows_affected == 0 {
            debug!(%key, "counter row missing, recreating");
            counter::ActiveModel { key: Set(key.to_string()), value: Set(1) }
                .insert(&txn)
                .await?;
        }
        let value = counter::Entity::find_by_id(key.to_string())
            .one(&txn)
            .await?
            .map(|r| r.value)
            .ok_or_else(|| ServiceError::Db(format!("counter {key} vanished during increment")))?;
        txn.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl ScoreRepository for SeaOrmStore {
    async fn append(&self, entry: NewScore) -> Result<score::Model, ServiceError> {
        let am = score::ActiveModel {
            nickname: Set(entry.nickname),
            floors: Set(entry.floors),
            created_at: Set(entry.created_at),
            ..Default::default()
        };
        Ok(am.insert(&self.db).await?)
    }

    async fn best_per_nickname(&self, limit: u64) -> Result<Vec<BestScore>, ServiceError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let stmt = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            BEST_PER_NICKNAME_SQL,
            [limit.into()],
        );
        Ok(BestScore::find_by_statement(stmt).all(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{file_store, memory_store};
    use sea_orm::PaginatorTrait;

    fn entry(nickname: &str, floors: i64, created_at: i64) -> NewScore {
        NewScore { nickname: nickname.into(), floors, created_at }
    }

    #[tokio::test]
    async fn append_assigns_increasing_ids() -> anyhow::Result<()> {
        let store = memory_store().await?;
        let a = store.append(entry("a", 3, 10)).await?;
        let b = store.append(entry("a", 3, 11)).await?;
        assert!(b.id > a.id);
        assert_eq!(score::Entity::find().count(&store.db).await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn best_uses_earliest_time_of_the_best_not_of_any_entry() -> anyhow::Result<()> {
        let store = memory_store().await?;
        store.append(entry("A", 10, 1)).await?;
        store.append(entry("B", 20, 2)).await?;
        store.append(entry("A", 20, 3)).await?;

        let rows = store.best_per_nickname(2).await?;
        assert_eq!(rows, vec![
            BestScore { nickname: "B".into(), floors: 20, reached_at: 2 },
            BestScore { nickname: "A".into(), floors: 20, reached_at: 3 },
        ]);
        Ok(())
    }

    #[tokio::test]
    async fn repeated_best_keeps_first_time() -> anyhow::Result<()> {
        let store = memory_store().await?;
        store.append(entry("A", 7, 50)).await?;
        store.append(entry("A", 7, 20)).await?;
        store.append(entry("B", 7, 30)).await?;

        let rows = store.best_per_nickname(10).await?;
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].nickname.as_str(), rows[0].reached_at), ("A", 20));
        assert_eq!((rows[1].nickname.as_str(), rows[1].reached_at), ("B", 30));
        Ok(())
    }

    #[tokio::test]
    async fn full_tie_falls_back_to_insert_order() -> anyhow::Result<()> {
        let store = memory_store().await?;
        store.append(entry("late", 5, 100)).await?;
        store.append(entry("early", 5, 100)).await?;
        let rows = store.best_per_nickname(10).await?;
        assert_eq!(rows[0].nickname, "late");
        assert_eq!(rows[1].nickname, "early");
        Ok(())
    }

    #[tokio::test]
    async fn increment_recreates_missing_row() -> anyhow::Result<()> {
        let store = memory_store().await?;
        counter::Entity::delete_by_id(counter::BASE_DROPS_KEY.to_string()).exec(&store.db).await?;
        assert_eq!(store.get(counter::BASE_DROPS_KEY).await?, None);
        assert_eq!(store.increment(counter::BASE_DROPS_KEY).await?, 1);
        assert_eq!(store.increment(counter::BASE_DROPS_KEY).await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn reopening_file_keeps_data() -> anyhow::Result<()> {
        let (store, cfg, dir) = file_store().await?;
        store.increment(counter::BASE_DROPS_KEY).await?;
        store.append(entry("persist", 9, 1)).await?;
        store.db.close().await?;

        let reopened = SeaOrmStore::open(&cfg).await?;
        assert_eq!(reopened.get(counter::BASE_DROPS_KEY).await?, Some(1));
        assert_eq!(reopened.best_per_nickname(3).await?.len(), 1);
        reopened.db.close().await?;
        let _ = std::fs::remove_dir_all(dir);
        Ok(())
    }
}
