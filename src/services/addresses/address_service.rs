//! # 주소 관리 서비스
//!
//! 사용자 주소의 CRUD 비즈니스 로직입니다. 캐시는 다루지 않으며
//! 읽기 캐싱과 쓰기 후 무효화는 전송 계층(HTTP 핸들러, gRPC 서비스)이 담당합니다.

use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::core::errors::AppError;
use crate::domain::dto::addresses::{AddressRequest, AddressResponse, ListAddressResponse};
use crate::domain::dto::pagination::{PageRequest, Pagination};
use crate::domain::entities::Address;
use crate::repositories::{AddressFilter, AddressRepository};

const ADDRESS_NOT_FOUND: &str = "주소를 찾을 수 없습니다";

pub struct AddressService {
    repo: Arc<dyn AddressRepository>,
}

impl AddressService {
    pub fn new(repo: Arc<dyn AddressRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_address_by_id(&self, id: Uuid) -> Result<AddressResponse, AppError> {
        let address = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(ADDRESS_NOT_FOUND.to_string()))?;

        Ok(AddressResponse::from(address))
    }

    pub async fn list_addresses(
        &self,
        filter: AddressFilter,
        page: PageRequest,
    ) -> Result<ListAddressResponse, AppError> {
        let (addresses, total) = self.repo.list(&filter, page).await?;

        Ok(ListAddressResponse {
            addresses: addresses.into_iter().map(AddressResponse::from).collect(),
            pagination: Pagination::new(page, total),
        })
    }

    /// 주소 생성
    ///
    /// 요청 본문에 `id_user`가 없으면 `requester`(인증된 사용자)의 주소로 만듭니다.
    pub async fn create_address(
        &self,
        request: AddressRequest,
        requester: Uuid,
    ) -> Result<AddressResponse, AppError> {
        let address = Address::new(
            request.id_user.unwrap_or(requester),
            request.name,
            request.city,
            request.street,
            request.lat,
            request.long,
        );

        self.repo.create(&address).await?;
        info!("🏠 주소 생성: id={}, id_user={}", address.id, address.id_user);

        Ok(AddressResponse::from(address))
    }

    pub async fn update_address(
        &self,
        id: Uuid,
        request: AddressRequest,
    ) -> Result<AddressResponse, AppError> {
        let mut address = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(ADDRESS_NOT_FOUND.to_string()))?;

        if let Some(id_user) = request.id_user {
            address.id_user = id_user;
        }
        address.name = request.name;
        address.city = request.city;
        address.street = request.street;
        address.lat = request.lat;
        address.long = request.long;
        address.updated_at = chrono::Utc::now();

        self.repo.update(&address).await?;
        info!("🏠 주소 수정: id={}", address.id);

        Ok(AddressResponse::from(address))
    }

    pub async fn delete_address(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound(ADDRESS_NOT_FOUND.to_string()));
        }

        info!("🗑️ 주소 삭제: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::MemoryAddressRepository;

    fn request(name: &str) -> AddressRequest {
        AddressRequest {
            id_user: None,
            name: name.to_string(),
            city: "Seoul".to_string(),
            street: "Teheran-ro 1".to_string(),
            lat: "37.50".to_string(),
            long: "127.03".to_string(),
        }
    }

    fn service() -> AddressService {
        AddressService::new(Arc::new(MemoryAddressRepository::default()))
    }

    #[tokio::test]
    async fn test_create_uses_requester_when_id_user_missing() {
        let service = service();
        let requester = Uuid::new_v4();

        let created = service.create_address(request("Home"), requester).await.unwrap();
        assert_eq!(created.id_user, requester.to_string());

        let id = Uuid::parse_str(&created.id).unwrap();
        let fetched = service.get_address_by_id(id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let service = service();
        let created = service
            .create_address(request("Home"), Uuid::new_v4())
            .await
            .unwrap();
        let id = Uuid::parse_str(&created.id).unwrap();

        let updated = service.update_address(id, request("Office")).await.unwrap();
        assert_eq!(updated.name, "Office");
        assert_eq!(updated.id_user, created.id_user);

        service.delete_address(id).await.unwrap();
        assert!(matches!(
            service.get_address_by_id(id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_address(id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_address_is_not_found() {
        let result = service().update_address(Uuid::new_v4(), request("x")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_filters_by_name_and_paginates() {
        let service = service();
        let owner = Uuid::new_v4();
        for name in ["Home", "Office", "Home 2"] {
            service.create_address(request(name), owner).await.unwrap();
        }

        let filter = AddressFilter {
            name: Some("home".to_string()),
            id_user: None,
        };
        let page = service
            .list_addresses(filter, PageRequest::new(Some(1), Some(1)))
            .await
            .unwrap();

        assert_eq!(page.addresses.len(), 1);
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_page, 2);
    }
}
