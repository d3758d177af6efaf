use super::model::AuctionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "eventType")]
pub enum AuctionEvent {
    // 경매 생성 이벤트
    AuctionCreated(AuctionCreated),
    // 경매 수정 이벤트
    AuctionUpdated(AuctionUpdated),
    // 경매 삭제 이벤트
    AuctionDeleted(AuctionDeleted),
}

impl AuctionEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            AuctionEvent::AuctionCreated(_) => "AuctionCreated",
            AuctionEvent::AuctionUpdated(_) => "AuctionUpdated",
            AuctionEvent::AuctionDeleted(_) => "AuctionDeleted",
        }
    }

    /// 메시지 키로 쓰이는 경매 식별자
    pub fn aggregate_id(&self) -> String {
        match self {
            AuctionEvent::AuctionCreated(e) => e.id.to_string(),
            AuctionEvent::AuctionUpdated(e) => e.id.clone(),
            AuctionEvent::AuctionDeleted(e) => e.id.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuctionCreated {
    pub id: Uuid,
    pub reserve_price: i32,
    pub seller: String,
    pub winner: Option<String>,
    pub sold_amount: Option<i32>,
    pub current_high_bid: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub auction_end: DateTime<Utc>,
    pub status: AuctionStatus,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub mileage: i32,
    pub image_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuctionUpdated {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub mileage: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AuctionDeleted {
    pub id: String,
}
