use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 의사 프로필 엔티티
///
/// 사용자 한 명당 삭제되지 않은 의사 프로필은 하나만 존재합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub id_user: Uuid,
    pub name: String,
    pub image: String,
    pub price: f32,
    pub specalist: String,
    pub experience: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Doctor {
    pub fn new(
        id_user: Uuid,
        name: String,
        image: String,
        price: f32,
        specalist: String,
        experience: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            id_user,
            name,
            image,
            price,
            specalist,
            experience,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}
