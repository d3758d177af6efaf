/// 경매 저장소
/// 조회(list, get_by_id)와 세션 단위 커밋(commit)을 제공한다.
/// 커밋은 경매 변경과 아웃박스 이벤트를 하나의 트랜잭션으로 저장한다.
// region:    --- Imports
use crate::auction::events::AuctionEvent;
use crate::auction::model::Auction;
use crate::outbox::OutboxMessage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;
// endregion: --- Imports

// region:    --- Modules
pub mod in_memory;
pub mod postgres;
pub mod queries;

pub use in_memory::InMemoryAuctionRepository;
pub use postgres::PostgresAuctionRepository;
// endregion: --- Modules

// region:    --- Repository Error
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("데이터베이스 오류: {0}")]
    Database(#[from] sqlx::Error),
    #[error("이벤트 직렬화 오류: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("잘못된 저장 데이터: {0}")]
    Corrupt(String),
}
// endregion: --- Repository Error

// region:    --- Session
/// 커밋 대기 중인 변경
#[derive(Debug, Clone, PartialEq)]
pub enum StagedChange {
    Added(Auction),
    Modified(Auction),
    Removed(Uuid),
}

/// 요청 단위 세션: 변경과 발행할 이벤트를 모았다가 commit 으로 한 번에 저장
#[derive(Debug, Default)]
pub struct AuctionSession {
    changes: Vec<StagedChange>,
    events: Vec<OutboxMessage>,
}

impl AuctionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, auction: Auction) {
        self.changes.push(StagedChange::Added(auction));
    }

    pub fn update(&mut self, auction: Auction) {
        self.changes.push(StagedChange::Modified(auction));
    }

    pub fn remove(&mut self, auction: &Auction) {
        self.changes.push(StagedChange::Removed(auction.id));
    }

    /// 이벤트를 아웃박스에 적재 (커밋과 함께 저장된다)
    pub fn publish(&mut self, event: &AuctionEvent) -> Result<(), RepositoryError> {
        self.events.push(OutboxMessage::from_event(event)?);
        Ok(())
    }

    pub fn into_parts(self) -> (Vec<StagedChange>, Vec<OutboxMessage>) {
        (self.changes, self.events)
    }
}
// endregion: --- Session

// region:    --- Traits
#[async_trait]
pub trait AuctionRepository: Send + Sync {
    /// 상품 제조사(make) 오름차순, updated_after 보다 이후에 수정된 경매만
    async fn list(
        &self,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Auction>, RepositoryError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Auction>, RepositoryError>;

    /// 반영된 경매 행 수를 반환. 0 이면 아무것도 저장되지 않는다 (이벤트 포함).
    async fn commit(&self, session: AuctionSession) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// 미발행 메시지를 적재 순서대로 조회
    async fn pending(&self, limit: i64) -> Result<Vec<OutboxMessage>, RepositoryError>;

    async fn mark_published(
        &self,
        id: Uuid,
        published_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// published_before 이전에 발행된 메시지를 삭제하고 삭제 건수를 반환
    async fn prune_published(
        &self,
        published_before: DateTime<Utc>,
    ) -> Result<u64, RepositoryError>;
}
// endregion: --- Traits
