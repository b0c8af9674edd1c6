//! # Doctor HTTP Handlers
//!
//! 목록 조회는 `search`, `id_user`, `page`, `limit`, `order_by`
//! (`price:desc,name` 형식) 쿼리를 지원합니다.

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::caching::keys::ResourceKind;
use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::dto::doctors::{
    parse_order_by, DoctorRequest, DoctorResponse, ListDoctorQuery, ListDoctorResponse,
};
use crate::domain::dto::pagination::PageRequest;
use crate::domain::dto::users::MessageResponse;
use crate::domain::models::auth::AuthenticatedUser;
use crate::handlers::parse_id;
use crate::middlewares::AuthMiddleware;
use crate::repositories::DoctorFilter;

const KIND: ResourceKind = ResourceKind::Doctor;

#[get("/list_doctors")]
pub async fn list_doctors(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ListDoctorQuery>,
) -> Result<HttpResponse, AppError> {
    let key = KIND.http_list_key(&req.uri().to_string());
    if let Some(cached) = state.cache.get::<ListDoctorResponse>(&key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let query = query.into_inner();
    let order_by = match query.order_by.as_deref() {
        Some(raw) => parse_order_by(raw)?,
        None => Vec::new(),
    };
    let filter = DoctorFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        id_user: query.id_user,
        order_by,
    };
    let response = state
        .doctors
        .list_doctors(filter, PageRequest::new(query.page, query.limit))
        .await?;

    state.cache.set_with_expiration(&key, &response, KIND.ttl()).await;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{id}")]
pub async fn get_doctor(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let key = KIND.entity_key(&id.to_string());
    if let Some(cached) = state.cache.get::<DoctorResponse>(&key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let doctor = state.doctors.get_doctor_by_id(id).await?;
    state.cache.set_with_expiration(&key, &doctor, KIND.ttl()).await;

    Ok(HttpResponse::Ok().json(doctor))
}

/// 의사 프로필 생성 (사용자당 하나, 중복 시 409)
#[post("", wrap = "AuthMiddleware::required()")]
pub async fn create_doctor(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<DoctorRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let doctor = state
        .doctors
        .create_doctor(payload.into_inner(), user.user_id)
        .await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    Ok(HttpResponse::Ok().json(doctor))
}

#[put("/{id}", wrap = "AuthMiddleware::required()")]
pub async fn update_doctor(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<DoctorRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    payload.validate()?;

    let doctor = state.doctors.update_doctor(id, payload.into_inner()).await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    Ok(HttpResponse::Ok().json(doctor))
}

#[delete("/{id}", wrap = "AuthMiddleware::required()")]
pub async fn delete_doctor(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;

    state.doctors.delete_doctor(id).await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    Ok(HttpResponse::Ok().json(MessageResponse::new("의사 프로필이 삭제되었습니다")))
}
