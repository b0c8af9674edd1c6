use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 주소 생성/수정 요청
///
/// `id_user`가 없으면 인증된 사용자 ID를 사용합니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddressRequest {
    pub id_user: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "주소 이름은 1-100자 사이여야 합니다"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "도시는 1-100자 사이여야 합니다"))]
    pub city: String,

    #[validate(length(min = 1, max = 200, message = "도로명은 1-200자 사이여야 합니다"))]
    pub street: String,

    #[serde(default)]
    #[validate(length(max = 32, message = "위도 값이 너무 깁니다"))]
    pub lat: String,

    #[serde(default)]
    #[validate(length(max = 32, message = "경도 값이 너무 깁니다"))]
    pub long: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAddressQuery {
    pub name: Option<String>,
    pub id_user: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
