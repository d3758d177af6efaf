use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// 현재 시각 (Postgres timestamptz 정밀도인 마이크로초로 절삭)
pub fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

// 경매 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuctionStatus {
    #[default]
    Live,
    Finished,
    ReserveNotMet,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Live => "Live",
            AuctionStatus::Finished => "Finished",
            AuctionStatus::ReserveNotMet => "ReserveNotMet",
        }
    }
}

impl FromStr for AuctionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Live" => Ok(AuctionStatus::Live),
            "Finished" => Ok(AuctionStatus::Finished),
            "ReserveNotMet" => Ok(AuctionStatus::ReserveNotMet),
            other => Err(format!("알 수 없는 경매 상태: {}", other)),
        }
    }
}

// 경매 모델 (상품을 하나 소유)
#[derive(Debug, Clone, PartialEq)]
pub struct Auction {
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
    pub item: Item,
}

// 상품 모델 (경매 밖에서는 독립적인 식별자가 없다)
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub make: String,
    pub model: String,
    pub color: String,
    pub mileage: i32,
    pub year: i32,
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn status_text_is_stable() {
        for status in [
            AuctionStatus::Live,
            AuctionStatus::Finished,
            AuctionStatus::ReserveNotMet,
        ] {
            assert_eq!(status.as_str().parse::<AuctionStatus>().unwrap(), status);
        }
        assert!("Closed".parse::<AuctionStatus>().is_err());
    }

    #[test]
    fn now_has_no_sub_microsecond_part() {
        assert_eq!(now_micros().nanosecond() % 1_000, 0);
    }
}
