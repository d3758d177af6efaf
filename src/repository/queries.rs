/// 경매 목록 조회 (make 오름차순, 수정 시각 필터)
pub const LIST_AUCTIONS: &str = r#"
    SELECT a.id, a.reserve_price, a.seller, a.winner, a.sold_amount, a.current_high_bid,
           a.created_at, a.updated_at, a.auction_end, a.status,
           i.make, i.model, i.color, i.mileage, i.year, i.image_url
    FROM auctions a
    JOIN items i ON i.auction_id = a.id
    WHERE ($1::timestamptz IS NULL OR a.updated_at > $1)
    ORDER BY i.make ASC
"#;

/// 경매 조회 (상품 포함)
pub const GET_AUCTION: &str = r#"
    SELECT a.id, a.reserve_price, a.seller, a.winner, a.sold_amount, a.current_high_bid,
           a.created_at, a.updated_at, a.auction_end, a.status,
           i.make, i.model, i.color, i.mileage, i.year, i.image_url
    FROM auctions a
    JOIN items i ON i.auction_id = a.id
    WHERE a.id = $1
"#;

/// 경매 추가
pub const INSERT_AUCTION: &str = r#"
    INSERT INTO auctions (id, reserve_price, seller, winner, sold_amount, current_high_bid,
                          created_at, updated_at, auction_end, status)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
"#;

/// 상품 추가
pub const INSERT_ITEM: &str = r#"
    INSERT INTO items (auction_id, make, model, color, mileage, year, image_url)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
"#;

/// 경매 수정 시각 갱신
pub const TOUCH_AUCTION: &str =
    "UPDATE auctions SET updated_at = GREATEST(updated_at, $2) WHERE id = $1";

/// 상품 수정
pub const UPDATE_ITEM: &str = r#"
    UPDATE items SET make = $2, model = $3, color = $4, mileage = $5, year = $6
    WHERE auction_id = $1
"#;

/// 경매 삭제 (상품은 cascade)
pub const DELETE_AUCTION: &str = "DELETE FROM auctions WHERE id = $1";

/// 아웃박스 적재
pub const INSERT_OUTBOX: &str = r#"
    INSERT INTO outbox_messages (id, aggregate_id, event_type, payload, created_at)
    VALUES ($1, $2, $3, $4, $5)
"#;

/// 미발행 아웃박스 조회
pub const PENDING_OUTBOX: &str = r#"
    SELECT id, aggregate_id, event_type, payload, created_at
    FROM outbox_messages
    WHERE published_at IS NULL
    ORDER BY seq ASC
    LIMIT $1
"#;

/// 아웃박스 발행 완료 처리
pub const MARK_OUTBOX_PUBLISHED: &str =
    "UPDATE outbox_messages SET published_at = $2 WHERE id = $1";

/// 보존 기간이 지난 발행 완료 메시지 삭제
pub const PRUNE_PUBLISHED_OUTBOX: &str =
    "DELETE FROM outbox_messages WHERE published_at IS NOT NULL AND published_at < $1";
