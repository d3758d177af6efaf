// region:    --- Imports
use super::queries;
use super::{AuctionRepository, AuctionSession, OutboxStore, RepositoryError, StagedChange};
use crate::auction::model::{now_micros, Auction, Item};
use crate::database::DatabaseManager;
use crate::outbox::OutboxMessage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, Transaction};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
// endregion: --- Imports

// region:    --- Rows
#[derive(Debug, FromRow)]
struct AuctionRow {
    id: Uuid,
    reserve_price: i32,
    seller: String,
    winner: Option<String>,
    sold_amount: Option<i32>,
    current_high_bid: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    auction_end: DateTime<Utc>,
    status: String,
    make: String,
    model: String,
    color: String,
    mileage: i32,
    year: i32,
    image_url: String,
}

impl TryFrom<AuctionRow> for Auction {
    type Error = RepositoryError;

    fn try_from(row: AuctionRow) -> Result<Self, Self::Error> {
        Ok(Auction {
            id: row.id,
            reserve_price: row.reserve_price,
            seller: row.seller,
            winner: row.winner,
            sold_amount: row.sold_amount,
            current_high_bid: row.current_high_bid,
            created_at: row.created_at,
            updated_at: row.updated_at,
            auction_end: row.auction_end,
            status: row.status.parse().map_err(RepositoryError::Corrupt)?,
            item: Item {
                make: row.make,
                model: row.model,
                color: row.color,
                mileage: row.mileage,
                year: row.year,
                image_url: row.image_url,
            },
        })
    }
}
// endregion: --- Rows

// region:    --- Postgres Repository
pub struct PostgresAuctionRepository {
    db: Arc<DatabaseManager>,
}

impl PostgresAuctionRepository {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// 변경 하나를 반영하고 경매 행 수를 반환
    async fn apply_change(
        tx: &mut Transaction<'_, Postgres>,
        change: &StagedChange,
        now: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        match change {
            StagedChange::Added(auction) => {
                let rows = sqlx::query(queries::INSERT_AUCTION)
                    .bind(auction.id)
                    .bind(auction.reserve_price)
                    .bind(&auction.seller)
                    .bind(&auction.winner)
                    .bind(auction.sold_amount)
                    .bind(auction.current_high_bid)
                    .bind(auction.created_at)
                    .bind(auction.updated_at)
                    .bind(auction.auction_end)
                    .bind(auction.status.as_str())
                    .execute(&mut **tx)
                    .await?
                    .rows_affected();
                sqlx::query(queries::INSERT_ITEM)
                    .bind(auction.id)
                    .bind(&auction.item.make)
                    .bind(&auction.item.model)
                    .bind(&auction.item.color)
                    .bind(auction.item.mileage)
                    .bind(auction.item.year)
                    .bind(&auction.item.image_url)
                    .execute(&mut **tx)
                    .await?;
                Ok(rows)
            }
            StagedChange::Modified(auction) => {
                let rows = sqlx::query(queries::TOUCH_AUCTION)
                    .bind(auction.id)
                    .bind(now)
                    .execute(&mut **tx)
                    .await?
                    .rows_affected();
                sqlx::query(queries::UPDATE_ITEM)
                    .bind(auction.id)
                    .bind(&auction.item.make)
                    .bind(&auction.item.model)
                    .bind(&auction.item.color)
                    .bind(auction.item.mileage)
                    .bind(auction.item.year)
                    .execute(&mut **tx)
                    .await?;
                Ok(rows)
            }
            StagedChange::Removed(id) => Ok(sqlx::query(queries::DELETE_AUCTION)
                .bind(id)
                .execute(&mut **tx)
                .await?
                .rows_affected()),
        }
    }
}

#[async_trait]
impl AuctionRepository for PostgresAuctionRepository {
    async fn list(
        &self,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Auction>, RepositoryError> {
        info!("{:<12} --> 경매 목록 조회 ({:?})", "Repository", updated_after);
        let rows = self
            .db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, AuctionRow>(queries::LIST_AUCTIONS)
                        .bind(updated_after)
                        .fetch_all(&mut **tx)
                        .await
                })
            })
            .await?;
        rows.into_iter().map(Auction::try_from).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Auction>, RepositoryError> {
        info!("{:<12} --> 경매 조회 id: {}", "Repository", id);
        let row = self
            .db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, AuctionRow>(queries::GET_AUCTION)
                        .bind(id)
                        .fetch_optional(&mut **tx)
                        .await
                })
            })
            .await?;
        row.map(Auction::try_from).transpose()
    }

    async fn commit(&self, session: AuctionSession) -> Result<u64, RepositoryError> {
        let (changes, events) = session.into_parts();
        let now = now_micros();
        let mut tx = self.db.pool().begin().await?;

        let mut affected = 0;
        for change in &changes {
            affected += Self::apply_change(&mut tx, change, now).await?;
        }

        // 반영된 행이 없으면 이벤트도 남기지 않는다
        if affected == 0 {
            tx.rollback().await?;
            warn!("{:<12} --> 반영된 행 없음, 롤백", "Repository");
            return Ok(0);
        }

        for message in &events {
            sqlx::query(queries::INSERT_OUTBOX)
                .bind(message.id)
                .bind(&message.aggregate_id)
                .bind(&message.event_type)
                .bind(&message.payload)
                .bind(message.created_at)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!(
            "{:<12} --> 커밋 완료: 변경 {}건, 이벤트 {}건",
            "Repository",
            affected,
            events.len()
        );
        Ok(affected)
    }
}

#[async_trait]
impl OutboxStore for PostgresAuctionRepository {
    async fn pending(&self, limit: i64) -> Result<Vec<OutboxMessage>, RepositoryError> {
        let messages = sqlx::query_as::<_, OutboxMessage>(queries::PENDING_OUTBOX)
            .bind(limit)
            .fetch_all(self.db.pool())
            .await?;
        Ok(messages)
    }

    async fn mark_published(
        &self,
        id: Uuid,
        published_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(queries::MARK_OUTBOX_PUBLISHED)
            .bind(id)
            .bind(published_at)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn prune_published(
        &self,
        published_before: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(queries::PRUNE_PUBLISHED_OUTBOX)
            .bind(published_before)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
// endregion: --- Postgres Repository
