//! `doctor.DoctorService` 구현

use tonic::{Request, Response, Status};
use validator::Validate;

use crate::caching::keys::ResourceKind;
use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::dto::doctors::{DoctorRequest, DoctorResponse, ListDoctorResponse, OrderBy};
use crate::domain::dto::pagination::PageRequest;
use crate::grpc::pb::doctor as pb;
use crate::grpc::pb::doctor::doctor_service_server::DoctorService;
use crate::grpc::{authenticated, key_part, non_empty, parse_optional_uuid, parse_uuid, positive};
use crate::repositories::DoctorFilter;

const KIND: ResourceKind = ResourceKind::Doctor;

pub struct DoctorGrpcService {
    state: AppState,
}

impl DoctorGrpcService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl From<DoctorResponse> for pb::Doctor {
    fn from(d: DoctorResponse) -> Self {
        Self {
            id: d.id,
            id_user: d.id_user,
            name: d.name,
            image: d.image,
            price: d.price,
            specalist: d.specalist,
            experience: d.experience,
            created_at: d.created_at.to_rfc3339(),
            updated_at: d.updated_at.to_rfc3339(),
        }
    }
}

impl From<ListDoctorResponse> for pb::ListDoctorsResponse {
    fn from(list: ListDoctorResponse) -> Self {
        Self {
            doctors: list.doctors.into_iter().map(pb::Doctor::from).collect(),
            pagination: Some(list.pagination.into()),
        }
    }
}

fn into_request(input: Option<pb::DoctorInput>) -> Result<DoctorRequest, Status> {
    let input = input.ok_or_else(|| Status::invalid_argument("request 필드가 필요합니다"))?;

    let request = DoctorRequest {
        id_user: parse_optional_uuid(&input.id_user, "id_user")?,
        name: input.name,
        image: input.image,
        price: input.price,
        specalist: input.specalist,
        experience: input.experience,
    };
    request.validate().map_err(AppError::from)?;
    Ok(request)
}

/// `price:desc,name:asc` 형태 (캐시 키용)
fn render_order(order_list: &[pb::OrderBy]) -> String {
    order_list
        .iter()
        .map(|o| {
            let direction = if o.order_desc { "desc" } else { "asc" };
            format!("{}:{}", o.order_by.trim(), direction)
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn reply(doctor: DoctorResponse) -> Response<pb::DoctorResponse> {
    Response::new(pb::DoctorResponse {
        doctor: Some(doctor.into()),
    })
}

#[tonic::async_trait]
impl DoctorService for DoctorGrpcService {
    async fn get_doctor_by_id(
        &self,
        request: Request<pb::GetDoctorByIdRequest>,
    ) -> Result<Response<pb::DoctorResponse>, Status> {
        let id = parse_uuid(&request.get_ref().id, "id")?;
        let key = KIND.entity_key(&id.to_string());
        if let Some(cached) = self.state.cache.get::<DoctorResponse>(&key).await {
            return Ok(reply(cached));
        }

        let doctor = self.state.doctors.get_doctor_by_id(id).await?;
        self.state
            .cache
            .set_with_expiration(&key, &doctor, KIND.ttl())
            .await;

        Ok(reply(doctor))
    }

    async fn list_doctors(
        &self,
        request: Request<pb::ListDoctorsRequest>,
    ) -> Result<Response<pb::ListDoctorsResponse>, Status> {
        let req = request.into_inner();
        let id_user = parse_optional_uuid(&req.id_user, "id_user")?;
        let order_by = req
            .order_list
            .iter()
            .filter(|o| !o.order_by.trim().is_empty())
            .map(|o| OrderBy::new(&o.order_by, o.order_desc))
            .collect::<Result<Vec<_>, AppError>>()?;

        let (key, ttl) = KIND.grpc_list_key(&[
            ("search", req.search.trim().to_string()),
            ("id_user", id_user.map(|id| id.to_string()).unwrap_or_default()),
            ("page", key_part(req.page)),
            ("limit", key_part(req.limit)),
            ("order", render_order(&req.order_list)),
        ]);
        if let Some(cached) = self.state.cache.get::<ListDoctorResponse>(&key).await {
            return Ok(Response::new(cached.into()));
        }

        let filter = DoctorFilter {
            search: non_empty(req.search),
            id_user,
            order_by,
        };
        let list = self
            .state
            .doctors
            .list_doctors(filter, PageRequest::new(positive(req.page), positive(req.limit)))
            .await?;

        self.state.cache.set_with_expiration(&key, &list, ttl).await;
        Ok(Response::new(list.into()))
    }

    async fn create_doctor(
        &self,
        request: Request<pb::CreateDoctorRequest>,
    ) -> Result<Response<pb::DoctorResponse>, Status> {
        let user = authenticated(&request)?;
        let input = into_request(request.into_inner().request)?;

        let doctor = self.state.doctors.create_doctor(input, user.user_id).await?;
        self.state.cache.remove_pattern(KIND.pattern()).await;

        Ok(reply(doctor))
    }

    async fn update_doctor(
        &self,
        request: Request<pb::UpdateDoctorRequest>,
    ) -> Result<Response<pb::DoctorResponse>, Status> {
        let req = request.into_inner();
        let id = parse_uuid(&req.id, "id")?;
        let input = into_request(req.request)?;

        let doctor = self.state.doctors.update_doctor(id, input).await?;
        self.state.cache.remove_pattern(KIND.pattern()).await;

        Ok(reply(doctor))
    }

    async fn delete_doctor(
        &self,
        request: Request<pb::DeleteDoctorRequest>,
    ) -> Result<Response<pb::DoctorResponse>, Status> {
        let id = parse_uuid(&request.get_ref().id, "id")?;

        let doctor = self.state.doctors.get_doctor_by_id(id).await?;
        self.state.doctors.delete_doctor(id).await?;
        self.state.cache.remove_pattern(KIND.pattern()).await;

        Ok(reply(doctor))
    }
}
