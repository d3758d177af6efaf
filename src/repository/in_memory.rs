use super::{AuctionRepository, AuctionSession, OutboxStore, RepositoryError, StagedChange};
use crate::auction::model::{now_micros, Auction};
use crate::outbox::OutboxMessage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct State {
    auctions: HashMap<Uuid, Auction>,
    outbox: Vec<(OutboxMessage, Option<DateTime<Utc>>)>,
}

/// 메모리 기반 저장소 (테스트 및 로컬 실행용)
#[derive(Default)]
pub struct InMemoryAuctionRepository {
    state: RwLock<State>,
}

impl InMemoryAuctionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 적재된 모든 아웃박스 메시지 (발행 여부 무관)
    pub async fn outbox(&self) -> Vec<OutboxMessage> {
        self.state
            .read()
            .await
            .outbox
            .iter()
            .map(|(message, _)| message.clone())
            .collect()
    }
}

#[async_trait]
impl AuctionRepository for InMemoryAuctionRepository {
    async fn list(
        &self,
        updated_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Auction>, RepositoryError> {
        let mut items = self
            .state
            .read()
            .await
            .auctions
            .values()
            .filter(|auction| updated_after.map_or(true, |after| auction.updated_at > after))
            .cloned()
            .collect::<Vec<_>>();

        items.sort_by(|left, right| left.item.make.cmp(&right.item.make));
        Ok(items)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Auction>, RepositoryError> {
        Ok(self.state.read().await.auctions.get(&id).cloned())
    }

    async fn commit(&self, session: AuctionSession) -> Result<u64, RepositoryError> {
        let (changes, events) = session.into_parts();
        let now = now_micros();
        let mut state = self.state.write().await;

        // 모두 검증한 뒤에 반영해서 부분 커밋을 막는다
        let applicable = changes
            .iter()
            .filter(|change| match change {
                StagedChange::Added(auction) => !state.auctions.contains_key(&auction.id),
                StagedChange::Modified(auction) => state.auctions.contains_key(&auction.id),
                StagedChange::Removed(id) => state.auctions.contains_key(id),
            })
            .count() as u64;

        if applicable == 0 || applicable != changes.len() as u64 {
            return Ok(0);
        }

        for change in changes {
            match change {
                StagedChange::Added(auction) => {
                    state.auctions.insert(auction.id, auction);
                }
                StagedChange::Modified(mut auction) => {
                    if let Some(stored) = state.auctions.get(&auction.id) {
                        auction.updated_at = stored.updated_at.max(now);
                        auction.created_at = stored.created_at;
                    }
                    state.auctions.insert(auction.id, auction);
                }
                StagedChange::Removed(id) => {
                    state.auctions.remove(&id);
                }
            }
        }

        state
            .outbox
            .extend(events.into_iter().map(|message| (message, None)));
        Ok(applicable)
    }
}

#[async_trait]
impl OutboxStore for InMemoryAuctionRepository {
    async fn pending(&self, limit: i64) -> Result<Vec<OutboxMessage>, RepositoryError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .state
            .read()
            .await
            .outbox
            .iter()
            .filter(|(_, published_at)| published_at.is_none())
            .take(limit)
            .map(|(message, _)| message.clone())
            .collect())
    }

    async fn mark_published(
        &self,
        id: Uuid,
        published_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        if let Some((_, slot)) = state.outbox.iter_mut().find(|(message, _)| message.id == id) {
            *slot = Some(published_at);
        }
        Ok(())
    }

    async fn prune_published(
        &self,
        published_before: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let mut state = self.state.write().await;
        let before = state.outbox.len();
        state
            .outbox
            .retain(|(_, published_at)| published_at.map_or(true, |at| at >= published_before));
        Ok((before - state.outbox.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::dto::CreateAuctionDto;
    use crate::auction::events::{AuctionEvent, AuctionUpdated};

    fn auction() -> Auction {
        Auction::from_create(
            CreateAuctionDto {
                make: "Ford".to_string(),
                model: "GT".to_string(),
                year: 2020,
                color: "White".to_string(),
                mileage: 50,
                image_url: "https://cdn.example.com/ford-gt.jpg".to_string(),
                reserve_price: 20000,
                auction_end: Utc::now(),
                seller: "bob".to_string(),
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn modifying_unknown_auction_stages_no_event() {
        let repo = InMemoryAuctionRepository::new();
        let missing = auction();

        let mut session = AuctionSession::new();
        session
            .publish(&AuctionEvent::AuctionUpdated(AuctionUpdated::from(&missing)))
            .unwrap();
        session.update(missing.clone());

        assert_eq!(repo.commit(session).await.unwrap(), 0);
        assert!(repo.outbox().await.is_empty());
        assert!(repo.get_by_id(missing.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn modify_keeps_updated_at_non_decreasing() {
        let repo = InMemoryAuctionRepository::new();
        let stored = auction();
        let mut session = AuctionSession::new();
        session.add(stored.clone());
        repo.commit(session).await.unwrap();

        let mut stale = stored.clone();
        stale.updated_at = stored.updated_at - chrono::Duration::days(1);
        let mut session = AuctionSession::new();
        session.update(stale);
        assert_eq!(repo.commit(session).await.unwrap(), 1);

        let fetched = repo.get_by_id(stored.id).await.unwrap().unwrap();
        assert!(fetched.updated_at >= stored.updated_at);
        assert_eq!(fetched.created_at, stored.created_at);
    }

    #[tokio::test]
    async fn prune_removes_only_published_messages() {
        let repo = InMemoryAuctionRepository::new();
        let stored = auction();
        let mut session = AuctionSession::new();
        session.add(stored.clone());
        session
            .publish(&AuctionEvent::AuctionUpdated(AuctionUpdated::from(&stored)))
            .unwrap();
        session
            .publish(&AuctionEvent::AuctionUpdated(AuctionUpdated::from(&stored)))
            .unwrap();
        repo.commit(session).await.unwrap();

        let first = repo.pending(10).await.unwrap()[0].id;
        repo.mark_published(first, Utc::now()).await.unwrap();

        let cutoff = Utc::now() + chrono::Duration::seconds(1);
        assert_eq!(repo.prune_published(cutoff).await.unwrap(), 1);
        assert_eq!(repo.outbox().await.len(), 1);
        assert_eq!(repo.pending(10).await.unwrap().len(), 1);
    }
}
