use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::errors::AppError;

/// 의사 프로필 생성/수정 요청
///
/// `id_user`가 없으면 인증된 사용자 ID를 사용합니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DoctorRequest {
    pub id_user: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "이름은 1-100자 사이여야 합니다"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "이미지 URL이 너무 깁니다"))]
    pub image: String,

    #[validate(range(min = 0.0, message = "가격은 0 이상이어야 합니다"))]
    pub price: f32,

    #[validate(length(min = 1, max = 100, message = "전문 분야는 1-100자 사이여야 합니다"))]
    pub specalist: String,

    #[validate(range(min = 0, max = 80, message = "경력은 0-80년 사이여야 합니다"))]
    pub experience: i32,
}

/// `GET /api/v1/doctor/list_doctors` 쿼리
///
/// `order_by`는 `price:desc,name`처럼 쉼표로 구분된 `필드[:asc|:desc]` 목록입니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDoctorQuery {
    pub search: Option<String>,
    pub id_user: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub order_by: Option<String>,
}

/// 정렬 가능한 컬럼 (화이트리스트)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorSortField {
    Name,
    Price,
    Experience,
    Specalist,
    CreatedAt,
    UpdatedAt,
}

impl DoctorSortField {
    pub fn from_str(s: &str) -> Result<Self, AppError> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(DoctorSortField::Name),
            "price" => Ok(DoctorSortField::Price),
            "experience" => Ok(DoctorSortField::Experience),
            "specalist" => Ok(DoctorSortField::Specalist),
            "created_at" => Ok(DoctorSortField::CreatedAt),
            "updated_at" => Ok(DoctorSortField::UpdatedAt),
            other => Err(AppError::ValidationError(format!(
                "정렬할 수 없는 필드입니다: {}",
                other
            ))),
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            DoctorSortField::Name => "name",
            DoctorSortField::Price => "price",
            DoctorSortField::Experience => "experience",
            DoctorSortField::Specalist => "specalist",
            DoctorSortField::CreatedAt => "created_at",
            DoctorSortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: DoctorSortField,
    pub desc: bool,
}

impl OrderBy {
    pub fn new(field: &str, desc: bool) -> Result<Self, AppError> {
        Ok(Self {
            field: DoctorSortField::from_str(field)?,
            desc,
        })
    }
}

/// 쿼리 문자열의 `order_by` 값을 해석합니다
pub fn parse_order_by(raw: &str) -> Result<Vec<OrderBy>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (field, direction) = part.split_once(':').unwrap_or((part, "asc"));
            match direction.trim().to_lowercase().as_str() {
                "asc" => OrderBy::new(field, false),
                "desc" => OrderBy::new(field, true),
                other => Err(AppError::ValidationError(format!(
                    "정렬 방향은 asc 또는 desc여야 합니다: {}",
                    other
                ))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_by() {
        let order = parse_order_by("price:desc, name").unwrap();
        assert_eq!(
            order,
            vec![
                OrderBy {
                    field: DoctorSortField::Price,
                    desc: true
                },
                OrderBy {
                    field: DoctorSortField::Name,
                    desc: false
                },
            ]
        );
        assert!(parse_order_by("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_order_by_rejects_unknown_columns() {
        assert!(matches!(
            parse_order_by("password_hash"),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            parse_order_by("price:sideways"),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_doctor_request_validation() {
        let request = DoctorRequest {
            id_user: None,
            name: "Dr. Park".to_string(),
            image: String::new(),
            price: -1.0,
            specalist: "Cardiology".to_string(),
            experience: 10,
        };
        assert!(request.validate().is_err());

        let request = DoctorRequest {
            price: 50.0,
            ..request
        };
        assert!(request.validate().is_ok());
    }
}
