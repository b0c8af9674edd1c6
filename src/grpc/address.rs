//! `address.AddressService` 구현

use tonic::{Request, Response, Status};
use validator::Validate;

use crate::caching::keys::ResourceKind;
use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::dto::addresses::{AddressRequest, AddressResponse, ListAddressResponse};
use crate::domain::dto::pagination::PageRequest;
use crate::grpc::pb::address as pb;
use crate::grpc::pb::address::address_service_server::AddressService;
use crate::grpc::{authenticated, key_part, non_empty, parse_optional_uuid, parse_uuid, positive};
use crate::repositories::AddressFilter;

const KIND: ResourceKind = ResourceKind::Address;

pub struct AddressGrpcService {
    state: AppState,
}

impl AddressGrpcService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn load(&self, id: &str) -> Result<AddressResponse, Status> {
        let id = parse_uuid(id, "id")?;
        let key = KIND.entity_key(&id.to_string());
        if let Some(cached) = self.state.cache.get::<AddressResponse>(&key).await {
            return Ok(cached);
        }

        let address = self.state.addresses.get_address_by_id(id).await?;
        self.state
            .cache
            .set_with_expiration(&key, &address, KIND.ttl())
            .await;
        Ok(address)
    }
}

impl From<AddressResponse> for pb::Address {
    fn from(a: AddressResponse) -> Self {
        Self {
            id: a.id,
            id_user: a.id_user,
            name: a.name,
            city: a.city,
            street: a.street,
            lat: a.lat,
            long: a.long,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}

impl From<ListAddressResponse> for pb::ListAddressesResponse {
    fn from(list: ListAddressResponse) -> Self {
        Self {
            addresses: list.addresses.into_iter().map(pb::Address::from).collect(),
            pagination: Some(list.pagination.into()),
        }
    }
}

fn into_request(input: Option<pb::AddressInput>) -> Result<AddressRequest, Status> {
    let input = input.ok_or_else(|| Status::invalid_argument("request 필드가 필요합니다"))?;

    let request = AddressRequest {
        id_user: parse_optional_uuid(&input.id_user, "id_user")?,
        name: input.name,
        city: input.city,
        street: input.street,
        lat: input.lat,
        long: input.long,
    };
    request.validate().map_err(AppError::from)?;
    Ok(request)
}

fn reply(address: AddressResponse) -> Response<pb::AddressResponse> {
    Response::new(pb::AddressResponse {
        address: Some(address.into()),
    })
}

#[tonic::async_trait]
impl AddressService for AddressGrpcService {
    async fn get_address_by_id(
        &self,
        request: Request<pb::GetAddressByIdRequest>,
    ) -> Result<Response<pb::AddressResponse>, Status> {
        let address = self.load(&request.get_ref().id).await?;
        Ok(reply(address))
    }

    async fn list_addresses(
        &self,
        request: Request<pb::ListAddressesRequest>,
    ) -> Result<Response<pb::ListAddressesResponse>, Status> {
        let req = request.into_inner();
        let (key, ttl) = KIND.grpc_list_key(&[
            ("name", req.name.trim().to_string()),
            ("page", key_part(req.page)),
            ("limit", key_part(req.limit)),
        ]);
        if let Some(cached) = self.state.cache.get::<ListAddressResponse>(&key).await {
            return Ok(Response::new(cached.into()));
        }

        let filter = AddressFilter {
            name: non_empty(req.name),
            id_user: None,
        };
        let list = self
            .state
            .addresses
            .list_addresses(filter, PageRequest::new(positive(req.page), positive(req.limit)))
            .await?;

        self.state.cache.set_with_expiration(&key, &list, ttl).await;
        Ok(Response::new(list.into()))
    }

    async fn create_address(
        &self,
        request: Request<pb::CreateAddressRequest>,
    ) -> Result<Response<pb::AddressResponse>, Status> {
        let user = authenticated(&request)?;
        let input = into_request(request.into_inner().request)?;

        let address = self
            .state
            .addresses
            .create_address(input, user.user_id)
            .await?;
        self.state.cache.remove_pattern(KIND.pattern()).await;

        Ok(reply(address))
    }

    async fn update_address(
        &self,
        request: Request<pb::UpdateAddressRequest>,
    ) -> Result<Response<pb::AddressResponse>, Status> {
        let req = request.into_inner();
        let id = parse_uuid(&req.id, "id")?;
        let input = into_request(req.request)?;

        let address = self.state.addresses.update_address(id, input).await?;
        self.state.cache.remove_pattern(KIND.pattern()).await;

        Ok(reply(address))
    }

    /// 삭제된 주소를 응답으로 돌려줍니다
    async fn delete_address(
        &self,
        request: Request<pb::DeleteAddressRequest>,
    ) -> Result<Response<pb::AddressResponse>, Status> {
        let id = parse_uuid(&request.get_ref().id, "id")?;

        let address = self.state.addresses.get_address_by_id(id).await?;
        self.state.addresses.delete_address(id).await?;
        self.state.cache.remove_pattern(KIND.pattern()).await;

        Ok(reply(address))
    }
}
