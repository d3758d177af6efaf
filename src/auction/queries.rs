/// 경매 조회 처리
/// 1. 목록 조회 (수정 시각 필터)
/// 2. 단건 조회
// region:    --- Imports
use super::dto::AuctionDto;
use crate::error::AppError;
use crate::repository::AuctionRepository;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::info;
use uuid::Uuid;
// endregion: --- Imports

// 시간대가 없는 입력에 허용하는 형식 (UTC 로 간주)
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// 날짜 필터 파싱. 빈 문자열은 필터 없음.
pub fn parse_date_filter(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(Utc.from_utc_datetime(&naive)));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Some(Utc.from_utc_datetime(&naive)))
        .ok_or_else(|| AppError::InvalidDate(raw.to_string()))
}

/// 1. 목록 조회
pub async fn list_auctions(
    repository: &dyn AuctionRepository,
    date: Option<&str>,
) -> Result<Vec<AuctionDto>, AppError> {
    let updated_after = parse_date_filter(date)?;
    info!("{:<12} --> 경매 목록 조회 필터: {:?}", "Query", updated_after);

    let auctions = repository.list(updated_after).await?;
    Ok(auctions.iter().map(AuctionDto::from).collect())
}

/// 2. 단건 조회
pub async fn get_auction(
    repository: &dyn AuctionRepository,
    id: Uuid,
) -> Result<AuctionDto, AppError> {
    info!("{:<12} --> 경매 조회 id: {}", "Query", id);
    let auction = repository.get_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(AuctionDto::from(&auction))
}
