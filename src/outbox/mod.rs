/// 아웃박스 릴레이
/// 커밋과 함께 저장된 이벤트를 주기적으로 읽어 메시지 브로커로 발행한다.
/// 발행에 실패하면 순서를 지키기 위해 이번 배치를 멈추고 다음 주기에 다시 시도한다.
// region:    --- Imports
use crate::auction::events::AuctionEvent;
use crate::auction::model::now_micros;
use crate::message_broker::EventPublisher;
use crate::repository::{OutboxStore, RepositoryError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Outbox Message
/// 아웃박스에 저장되는 메시지
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OutboxMessage {
    pub id: Uuid,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl OutboxMessage {
    pub fn from_event(event: &AuctionEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: Uuid::new_v4(),
            aggregate_id: event.aggregate_id(),
            event_type: event.event_type().to_string(),
            payload: serde_json::to_value(event)?,
            created_at: now_micros(),
        })
    }

    pub fn event(&self) -> Result<AuctionEvent, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}
// endregion: --- Outbox Message

// region:    --- Outbox Relay
pub struct OutboxRelay {
    store: Arc<dyn OutboxStore>,
    publisher: Arc<dyn EventPublisher>,
    poll_interval: Duration,
    batch_size: i64,
    retention: Duration,
}

impl OutboxRelay {
    pub fn new(
        store: Arc<dyn OutboxStore>,
        publisher: Arc<dyn EventPublisher>,
        poll_interval: Duration,
        batch_size: i64,
        retention: Duration,
    ) -> Self {
        Self {
            store,
            publisher,
            poll_interval,
            batch_size,
            retention,
        }
    }

    /// 릴레이 시작
    pub fn start(self) -> JoinHandle<()> {
        info!(
            "{:<12} --> 아웃박스 릴레이 시작 (주기 {:?})",
            "Outbox", self.poll_interval
        );
        tokio::spawn(async move {
            let mut ticker = interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = self.relay_pending().await {
                    error!("{:<12} --> 아웃박스 조회 오류: {:?}", "Outbox", e);
                }
                if let Err(e) = self.prune_published().await {
                    error!("{:<12} --> 아웃박스 정리 오류: {:?}", "Outbox", e);
                }
            }
        })
    }

    /// 미발행 메시지를 순서대로 발행하고 발행한 건수를 반환
    pub async fn relay_pending(&self) -> Result<usize, RepositoryError> {
        let pending = self.store.pending(self.batch_size).await?;
        let mut published = 0;

        for message in pending {
            if let Err(e) = self.publisher.publish(&message).await {
                warn!(
                    "{:<12} --> 발행 실패, 다음 주기에 재시도: id={}, {}",
                    "Outbox", message.id, e
                );
                break;
            }
            self.store.mark_published(message.id, Utc::now()).await?;
            published += 1;
        }

        if published > 0 {
            info!("{:<12} --> 이벤트 {}건 발행", "Outbox", published);
        } else {
            debug!("{:<12} --> 발행할 이벤트 없음", "Outbox");
        }
        Ok(published)
    }

    /// 보존 기간이 지난 발행 완료 메시지 삭제
    pub async fn prune_published(&self) -> Result<u64, RepositoryError> {
        let retention = chrono::Duration::from_std(self.retention)
            .unwrap_or_else(|_| chrono::Duration::zero());
        let pruned = self.store.prune_published(Utc::now() - retention).await?;
        if pruned > 0 {
            debug!("{:<12} --> 발행 완료 메시지 {}건 삭제", "Outbox", pruned);
        }
        Ok(pruned)
    }
}
// endregion: --- Outbox Relay

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::events::AuctionDeleted;
    use crate::message_broker::BrokerError;
    use crate::repository::{AuctionRepository, AuctionSession, InMemoryAuctionRepository};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingPublisher {
        sent: Mutex<Vec<OutboxMessage>>,
        failing: AtomicBool,
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, message: &OutboxMessage) -> Result<(), BrokerError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(BrokerError::Delivery("broker down".to_string()));
            }
            self.sent.lock().await.push(message.clone());
            Ok(())
        }
    }

    async fn seed_created_auction(repo: &InMemoryAuctionRepository) -> Uuid {
        use crate::auction::dto::{AuctionDto, CreateAuctionDto};
        use crate::auction::events::AuctionCreated;
        use crate::auction::model::Auction;

        let auction = Auction::from_create(
            CreateAuctionDto {
                make: "Audi".to_string(),
                model: "R8".to_string(),
                year: 2019,
                color: "Black".to_string(),
                mileage: 1200,
                image_url: "https://cdn.example.com/r8.jpg".to_string(),
                reserve_price: 90000,
                auction_end: Utc::now(),
                seller: "alice".to_string(),
            },
            Utc::now(),
        );
        let id = auction.id;
        let created = AuctionCreated::from(&AuctionDto::from(&auction));
        let mut session = AuctionSession::new();
        session.add(auction.clone());
        session
            .publish(&AuctionEvent::AuctionCreated(created))
            .unwrap();
        assert_eq!(repo.commit(session).await.unwrap(), 1);

        let mut session = AuctionSession::new();
        session.remove(&auction);
        session
            .publish(&AuctionEvent::AuctionDeleted(AuctionDeleted {
                id: id.to_string(),
            }))
            .unwrap();
        assert_eq!(repo.commit(session).await.unwrap(), 1);
        id
    }

    #[tokio::test]
    async fn relays_pending_messages_in_commit_order() {
        let repo = Arc::new(InMemoryAuctionRepository::new());
        let publisher = Arc::new(RecordingPublisher::default());
        let id = seed_created_auction(&repo).await;

        let relay = OutboxRelay::new(
            repo.clone(),
            publisher.clone(),
            Duration::from_secs(1),
            10,
            Duration::from_secs(3600),
        );
        assert_eq!(relay.relay_pending().await.unwrap(), 2);

        let sent = publisher.sent.lock().await;
        assert_eq!(sent[0].event_type, "AuctionCreated");
        assert_eq!(sent[1].event_type, "AuctionDeleted");
        assert!(sent.iter().all(|m| m.aggregate_id == id.to_string()));
        drop(sent);

        assert!(repo.pending(10).await.unwrap().is_empty());
        assert_eq!(relay.relay_pending().await.unwrap(), 0);

        // 보존 기간 안의 발행 완료 메시지는 남는다
        assert_eq!(relay.prune_published().await.unwrap(), 0);
        assert_eq!(repo.outbox().await.len(), 2);
    }

    #[tokio::test]
    async fn failed_publish_keeps_messages_pending() {
        let repo = Arc::new(InMemoryAuctionRepository::new());
        let publisher = Arc::new(RecordingPublisher::default());
        publisher.failing.store(true, Ordering::SeqCst);
        seed_created_auction(&repo).await;

        let relay = OutboxRelay::new(
            repo.clone(),
            publisher.clone(),
            Duration::from_secs(1),
            10,
            Duration::from_secs(3600),
        );
        assert_eq!(relay.relay_pending().await.unwrap(), 0);
        assert_eq!(repo.pending(10).await.unwrap().len(), 2);

        publisher.failing.store(false, Ordering::SeqCst);
        assert_eq!(relay.relay_pending().await.unwrap(), 2);
    }

    #[test]
    fn payload_round_trips_to_the_tagged_event() {
        let event = AuctionEvent::AuctionDeleted(AuctionDeleted {
            id: "42".to_string(),
        });
        let message = OutboxMessage::from_event(&event).unwrap();
        assert_eq!(message.payload["eventType"], "AuctionDeleted");
        assert_eq!(message.event().unwrap(), event);
    }
}
