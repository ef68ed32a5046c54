//! Idempotent schema creation and seeding, run once at startup.
//!
//! Tables are created with `IF NOT EXISTS` and the counter row is inserted
//! with `ON CONFLICT DO NOTHING`, so an existing database keeps its values.
use sea_orm::{
    sea_query::{ColumnDef, Index, OnConflict, Query, Table},
    ConnectionTrait, DatabaseConnection, DbErr,
};
use tracing::info;

use crate::counter::{self, BASE_DROPS_KEY};
use crate::score;

pub const SCORES_NICKNAME_FLOORS_IDX: &str = "idx_scores_nickname_floors";

pub async fn init(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    let counters = Table::create()
        .table(counter::Entity)
        .if_not_exists()
        .col(ColumnDef::new(counter::Column::Key).string().not_null().primary_key())
        .col(ColumnDef::new(counter::Column::Value).big_integer().not_null().default(0))
        .to_owned();
    db.execute(backend.build(&counters)).await?;

    let scores = Table::create()
        .table(score::Entity)
        .if_not_exists()
        .col(ColumnDef::new(score::Column::Id).integer().not_null().auto_increment().primary_key())
        .col(ColumnDef::new(score::Column::Nickname).string().not_null())
        .col(ColumnDef::new(score::Column::Floors).big_integer().not_null())
        .col(ColumnDef::new(score::Column::CreatedAt).big_integer().not_null())
        .to_owned();
    db.execute(backend.build(&scores)).await?;

    let idx = Index::create()
        .if_not_exists()
        .name(SCORES_NICKNAME_FLOORS_IDX)
        .table(score::Entity)
        .col(score::Column::Nickname)
        .col(score::Column::Floors)
        .to_owned();
    db.execute(backend.build(&idx)).await?;

    let seed = Query::insert()
        .into_table(counter::Entity)
        .columns([counter::Column::Key, counter::Column::Value])
        .values_panic([BASE_DROPS_KEY.into(), 0i64.into()])
        .on_conflict(OnConflict::column(counter::Column::Key).do_nothing().to_owned())
        .to_owned();
    let res = db.execute(backend.build(&seed)).await?;

    info!(event = "schema_ready", seeded = res.rows_affected() > 0, "schema initialized");
    Ok(())
}
