// region:    --- Imports
use crate::outbox::OutboxMessage;
use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::error::RDKafkaErrorCode;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Broker Error
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Kafka 클라이언트 생성 실패: {0}")]
    Client(String),
    #[error("메시지 전송 실패: {0}")]
    Delivery(String),
    #[error("토픽 생성 실패: {0}")]
    Admin(String),
}
// endregion: --- Broker Error

// region:    --- Event Publisher
/// 아웃박스 메시지를 외부로 발행
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, message: &OutboxMessage) -> Result<(), BrokerError>;
}
// endregion: --- Event Publisher

// region:    --- Kafka Producer
#[derive(Clone)]
pub struct KafkaProducer {
    producer: Arc<FutureProducer>,
    topic: String,
}

/// KafkaProducer 구현
impl KafkaProducer {
    pub fn new(brokers: &str, topic: &str) -> Result<Self, BrokerError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| BrokerError::Client(e.to_string()))?;

        Ok(KafkaProducer {
            producer: Arc::new(producer),
            topic: topic.to_string(),
        })
    }

    /// 메시지 전송
    pub async fn send_message(&self, key: &str, value: &str) -> Result<(), BrokerError> {
        info!(
            "{:<12} --> Kafka 메시지 전송: topic={}, key={}",
            "Producer", self.topic, key
        );
        let record = FutureRecord::to(&self.topic).key(key).payload(value);

        self.producer
            .send(record, Duration::from_secs(0))
            .await
            .map_err(|(e, _)| BrokerError::Delivery(format!("{:?}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl EventPublisher for KafkaProducer {
    async fn publish(&self, message: &OutboxMessage) -> Result<(), BrokerError> {
        let payload = message.payload.to_string();
        self.send_message(&message.aggregate_id, &payload).await
    }
}

// endregion: --- Kafka Producer

// region:    --- Kafka Manager
pub struct KafkaManager {
    producer: Arc<KafkaProducer>,
    brokers: String,
}

/// KafkaManager 구현
impl KafkaManager {
    pub fn new(brokers: &str, topic: &str) -> Result<Self, BrokerError> {
        let producer = Arc::new(KafkaProducer::new(brokers, topic)?);

        Ok(KafkaManager {
            producer,
            brokers: brokers.to_string(),
        })
    }

    /// 프로듀서 반환
    pub fn get_producer(&self) -> Arc<KafkaProducer> {
        Arc::clone(&self.producer)
    }

    /// 토픽 생성 (이미 있으면 성공으로 본다)
    pub async fn create_topic(
        &self,
        topic_name: &str,
        num_partitions: i32,
        replication_factor: i32,
    ) -> Result<(), BrokerError> {
        info!("{:<12} --> Kafka 토픽 생성 시작: {}", "Manager", topic_name);

        let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .create()
            .map_err(|e| BrokerError::Client(format!("AdminClient 생성 실패: {:?}", e)))?;

        let new_topic = NewTopic::new(
            topic_name,
            num_partitions,
            TopicReplication::Fixed(replication_factor),
        );

        let results = admin_client
            .create_topics(&[new_topic], &AdminOptions::new())
            .await
            .map_err(|e| {
                error!("{:<12} --> Kafka 토픽 생성 실패: {:?}", "Manager", e);
                BrokerError::Admin(format!("{:?}", e))
            })?;

        for result in results {
            match result {
                Ok(name) => info!("{:<12} --> Kafka 토픽 생성 성공: {}", "Manager", name),
                Err((name, RDKafkaErrorCode::TopicAlreadyExists)) => {
                    info!("{:<12} --> Kafka 토픽 이미 존재: {}", "Manager", name)
                }
                Err((name, code)) => {
                    error!(
                        "{:<12} --> Kafka 토픽 생성 실패: {} ({:?})",
                        "Manager", name, code
                    );
                    return Err(BrokerError::Admin(format!("{}: {:?}", name, code)));
                }
            }
        }
        Ok(())
    }
}

// endregion: --- Kafka Manager
