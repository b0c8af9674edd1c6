use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 주소 엔티티
///
/// 좌표는 클라이언트가 보낸 문자열 그대로 저장합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub id_user: Uuid,
    pub name: String,
    pub city: String,
    pub street: String,
    pub lat: String,
    pub long: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    pub fn new(
        id_user: Uuid,
        name: String,
        city: String,
        street: String,
        lat: String,
        long: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            id_user,
            name,
            city,
            street,
            lat,
            long,
            created_at: now,
            updated_at: now,
        }
    }
}
