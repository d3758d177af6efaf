//! 엔티티, DTO, 이벤트 사이의 변환
// region:    --- Imports
use super::dto::{AuctionDto, CreateAuctionDto};
use super::events::{AuctionCreated, AuctionDeleted, AuctionUpdated};
use super::model::{Auction, AuctionStatus, Item};
use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;
// endregion: --- Imports

impl Auction {
    /// 생성 요청으로 새 경매 구성 (식별자 새로 발급)
    pub fn from_create(dto: CreateAuctionDto, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(6);
        Auction {
            id: Uuid::new_v4(),
            reserve_price: dto.reserve_price,
            seller: dto.seller,
            winner: None,
            sold_amount: None,
            current_high_bid: None,
            created_at: now,
            updated_at: now,
            auction_end: dto.auction_end,
            status: AuctionStatus::Live,
            item: Item {
                make: dto.make,
                model: dto.model,
                color: dto.color,
                mileage: dto.mileage,
                year: dto.year,
                image_url: dto.image_url,
            },
        }
    }
}

impl From<&Auction> for AuctionDto {
    fn from(auction: &Auction) -> Self {
        AuctionDto {
            id: auction.id,
            reserve_price: auction.reserve_price,
            seller: auction.seller.clone(),
            winner: auction.winner.clone(),
            sold_amount: auction.sold_amount,
            current_high_bid: auction.current_high_bid,
            created_at: auction.created_at,
            updated_at: auction.updated_at,
            auction_end: auction.auction_end,
            status: auction.status,
            make: auction.item.make.clone(),
            model: auction.item.model.clone(),
            year: auction.item.year,
            color: auction.item.color.clone(),
            mileage: auction.item.mileage,
            image_url: auction.item.image_url.clone(),
        }
    }
}

impl From<&AuctionDto> for AuctionCreated {
    fn from(dto: &AuctionDto) -> Self {
        AuctionCreated {
            id: dto.id,
            reserve_price: dto.reserve_price,
            seller: dto.seller.clone(),
            winner: dto.winner.clone(),
            sold_amount: dto.sold_amount,
            current_high_bid: dto.current_high_bid,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
            auction_end: dto.auction_end,
            status: dto.status,
            make: dto.make.clone(),
            model: dto.model.clone(),
            year: dto.year,
            color: dto.color.clone(),
            mileage: dto.mileage,
            image_url: dto.image_url.clone(),
        }
    }
}

impl From<&Auction> for AuctionUpdated {
    fn from(auction: &Auction) -> Self {
        AuctionUpdated {
            id: auction.id.to_string(),
            make: auction.item.make.clone(),
            model: auction.item.model.clone(),
            year: auction.item.year,
            color: auction.item.color.clone(),
            mileage: auction.item.mileage,
        }
    }
}

impl From<&Auction> for AuctionDeleted {
    fn from(auction: &Auction) -> Self {
        AuctionDeleted {
            id: auction.id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn create_dto() -> CreateAuctionDto {
        CreateAuctionDto {
            make: "Ford".to_string(),
            model: "GT".to_string(),
            year: 2020,
            color: "White".to_string(),
            mileage: 50,
            image_url: "https://cdn.example.com/ford-gt.jpg".to_string(),
            reserve_price: 20000,
            auction_end: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            seller: "bob".to_string(),
        }
    }

    #[test]
    fn create_dto_maps_to_live_auction_with_fresh_id() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let first = Auction::from_create(create_dto(), now);
        let second = Auction::from_create(create_dto(), now);

        assert_ne!(first.id, second.id);
        assert_eq!(first.status, AuctionStatus::Live);
        assert_eq!(first.created_at, now);
        assert_eq!(first.updated_at, now);
        assert_eq!(first.item.make, "Ford");
        assert_eq!(first.item.mileage, 50);
        assert!(first.winner.is_none());
    }

    #[test]
    fn create_timestamps_are_truncated_to_microseconds() {
        let now = Utc
            .with_ymd_and_hms(2026, 5, 1, 12, 0, 0)
            .unwrap()
            .with_nanosecond(536_810_808)
            .unwrap();
        let auction = Auction::from_create(create_dto(), now);

        assert_eq!(auction.created_at.nanosecond(), 536_810_000);
        assert_eq!(auction.updated_at, auction.created_at);
    }

    #[test]
    fn dto_and_created_event_carry_the_same_fields() {
        let auction = Auction::from_create(create_dto(), Utc::now());
        let dto = AuctionDto::from(&auction);
        let created = AuctionCreated::from(&dto);

        assert_eq!(created.id, auction.id);
        assert_eq!(created.make, dto.make);
        assert_eq!(created.image_url, dto.image_url);
        assert_eq!(created.reserve_price, 20000);
        assert_eq!(created.seller, "bob");
    }

    #[test]
    fn updated_and_deleted_events_use_string_ids() {
        let auction = Auction::from_create(create_dto(), Utc::now());
        let updated = AuctionUpdated::from(&auction);
        let deleted = AuctionDeleted::from(&auction);

        assert_eq!(updated.id, auction.id.to_string());
        assert_eq!(updated.color, "White");
        assert_eq!(deleted.id, auction.id.to_string());
    }
}
