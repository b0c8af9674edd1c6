//! # Address HTTP Handlers
//!
//! | 메서드 | 경로 | 인증 | 캐시 |
//! |--------|------|------|------|
//! | `GET` | `/api/v1/address` | - | 요청 URI |
//! | `GET` | `/api/v1/address/{id}` | - | `address_<id>` |
//! | `POST` | `/api/v1/address` | access | `*address*` 무효화 |
//! | `PUT` | `/api/v1/address/{id}` | access | `*address*` 무효화 |
//! | `DELETE` | `/api/v1/address/{id}` | access | `*address*` 무효화 |

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::caching::keys::ResourceKind;
use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::dto::addresses::{
    AddressRequest, AddressResponse, ListAddressQuery, ListAddressResponse,
};
use crate::domain::dto::pagination::PageRequest;
use crate::domain::dto::users::MessageResponse;
use crate::domain::models::auth::AuthenticatedUser;
use crate::handlers::parse_id;
use crate::middlewares::AuthMiddleware;
use crate::repositories::AddressFilter;

const KIND: ResourceKind = ResourceKind::Address;

#[get("")]
pub async fn list_addresses(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ListAddressQuery>,
) -> Result<HttpResponse, AppError> {
    let key = KIND.http_list_key(&req.uri().to_string());
    if let Some(cached) = state.cache.get::<ListAddressResponse>(&key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let query = query.into_inner();
    let filter = AddressFilter {
        name: query.name.filter(|n| !n.trim().is_empty()),
        id_user: query.id_user,
    };
    let response = state
        .addresses
        .list_addresses(filter, PageRequest::new(query.page, query.limit))
        .await?;

    state.cache.set_with_expiration(&key, &response, KIND.ttl()).await;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{id}")]
pub async fn get_address(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    let key = KIND.entity_key(&id.to_string());
    if let Some(cached) = state.cache.get::<AddressResponse>(&key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let address = state.addresses.get_address_by_id(id).await?;
    state.cache.set_with_expiration(&key, &address, KIND.ttl()).await;

    Ok(HttpResponse::Ok().json(address))
}

#[post("", wrap = "AuthMiddleware::required()")]
pub async fn create_address(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<AddressRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let address = state
        .addresses
        .create_address(payload.into_inner(), user.user_id)
        .await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    Ok(HttpResponse::Ok().json(address))
}

#[put("/{id}", wrap = "AuthMiddleware::required()")]
pub async fn update_address(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<AddressRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;
    payload.validate()?;

    let address = state
        .addresses
        .update_address(id, payload.into_inner())
        .await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    Ok(HttpResponse::Ok().json(address))
}

#[delete("/{id}", wrap = "AuthMiddleware::required()")]
pub async fn delete_address(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&path)?;

    state.addresses.delete_address(id).await?;
    state.cache.remove_pattern(KIND.pattern()).await;

    Ok(HttpResponse::Ok().json(MessageResponse::new("주소가 삭제되었습니다")))
}
