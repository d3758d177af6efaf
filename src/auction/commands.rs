/// 경매 변경 커맨드 처리
/// 1. 생성
/// 2. 수정
/// 3. 삭제
/// 이벤트 발행이 켜져 있으면 변경과 같은 세션에 이벤트를 적재한다.
// region:    --- Imports
use super::dto::{AuctionDto, CreateAuctionDto, UpdateAuctionDto};
use super::events::{AuctionCreated, AuctionDeleted, AuctionEvent, AuctionUpdated};
use super::model::{now_micros, Auction, Item};
use crate::error::AppError;
use crate::repository::{AuctionRepository, AuctionSession};
use tracing::{info, warn};
use uuid::Uuid;
// endregion: --- Imports

/// 생성된 경매와 조회 경로
#[derive(Debug, Clone)]
pub struct CreatedAuction {
    pub location: String,
    pub auction: AuctionDto,
}

/// 커밋 후 반영된 행이 없으면 저장 실패
async fn save_changes(
    repository: &dyn AuctionRepository,
    session: AuctionSession,
) -> Result<(), AppError> {
    if repository.commit(session).await? > 0 {
        Ok(())
    } else {
        warn!("{:<12} --> 변경 사항 저장 실패", "Command");
        Err(AppError::PersistFailure)
    }
}

/// None 인 필드는 기존 값 유지
fn apply_patch(item: &mut Item, patch: UpdateAuctionDto) {
    if let Some(make) = patch.make {
        item.make = make;
    }
    if let Some(model) = patch.model {
        item.model = model;
    }
    if let Some(color) = patch.color {
        item.color = color;
    }
    if let Some(mileage) = patch.mileage {
        item.mileage = mileage;
    }
    if let Some(year) = patch.year {
        item.year = year;
    }
}

/// 1. 생성
pub async fn create_auction(
    repository: &dyn AuctionRepository,
    cmd: CreateAuctionDto,
    publish_events: bool,
) -> Result<CreatedAuction, AppError> {
    info!("{:<12} --> 경매 생성 요청: {:?}", "Command", cmd);
    cmd.validate().map_err(AppError::Validation)?;

    let auction = Auction::from_create(cmd, now_micros());
    let dto = AuctionDto::from(&auction);

    let mut session = AuctionSession::new();
    session.add(auction);
    if publish_events {
        session.publish(&AuctionEvent::AuctionCreated(AuctionCreated::from(&dto)))?;
    }
    save_changes(repository, session).await?;

    info!("{:<12} --> 경매 생성 완료 id: {}", "Command", dto.id);
    Ok(CreatedAuction {
        location: format!("/auctions/{}", dto.id),
        auction: dto,
    })
}

/// 2. 수정
pub async fn update_auction(
    repository: &dyn AuctionRepository,
    id: Uuid,
    cmd: UpdateAuctionDto,
    publish_events: bool,
) -> Result<(), AppError> {
    info!("{:<12} --> 경매 수정 요청 id: {}, {:?}", "Command", id, cmd);
    let mut auction = repository.get_by_id(id).await?.ok_or(AppError::NotFound)?;

    apply_patch(&mut auction.item, cmd);

    let mut session = AuctionSession::new();
    if publish_events {
        session.publish(&AuctionEvent::AuctionUpdated(AuctionUpdated::from(&auction)))?;
    }
    session.update(auction);
    save_changes(repository, session).await
}

/// 3. 삭제
pub async fn delete_auction(
    repository: &dyn AuctionRepository,
    id: Uuid,
    publish_events: bool,
) -> Result<(), AppError> {
    info!("{:<12} --> 경매 삭제 요청 id: {}", "Command", id);
    let auction = repository.get_by_id(id).await?.ok_or(AppError::NotFound)?;

    let mut session = AuctionSession::new();
    session.remove(&auction);
    if publish_events {
        session.publish(&AuctionEvent::AuctionDeleted(AuctionDeleted::from(&auction)))?;
    }
    save_changes(repository, session).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        Item {
            make: "Ford".to_string(),
            model: "GT".to_string(),
            color: "White".to_string(),
            mileage: 50,
            year: 2020,
            image_url: "https://cdn.example.com/ford-gt.jpg".to_string(),
        }
    }

    #[test]
    fn patch_with_only_make_leaves_other_fields() {
        let mut patched = item();
        apply_patch(
            &mut patched,
            UpdateAuctionDto {
                make: Some("Ferrari".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(patched.make, "Ferrari");
        assert_eq!(patched.model, "GT");
        assert_eq!(patched.color, "White");
        assert_eq!(patched.mileage, 50);
        assert_eq!(patched.year, 2020);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut patched = item();
        apply_patch(&mut patched, UpdateAuctionDto::default());
        assert_eq!(patched, item());
    }
}
