// region:    --- Imports
use auctions_service::config::Config;
use auctions_service::database::DatabaseManager;
use auctions_service::message_broker::KafkaManager;
use auctions_service::outbox::OutboxRelay;
use auctions_service::repository::PostgresAuctionRepository;
use auctions_service::{build_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
// endregion: --- Imports

// 이벤트 토픽 파티션 수
const TOPIC_PARTITIONS: i32 = 5;

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::connect(&config).await?);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    let repository = Arc::new(PostgresAuctionRepository::new(Arc::clone(&db_manager)));

    // 이벤트 발행 (아웃박스 릴레이)
    if config.publish_events {
        let kafka_manager = KafkaManager::new(&config.kafka_brokers, &config.events_topic)?;
        kafka_manager
            .create_topic(&config.events_topic, TOPIC_PARTITIONS, 1)
            .await?;
        info!("{:<12} --> Kafka 초기화 성공", "Main");

        OutboxRelay::new(
            repository.clone(),
            kafka_manager.get_producer(),
            config.outbox_poll_interval,
            config.outbox_batch_size,
            config.outbox_retention,
        )
        .start();
    } else {
        info!("{:<12} --> 이벤트 발행 비활성화", "Main");
    }

    let routes_all = build_router(AppState::new(repository, config.publish_events));

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
