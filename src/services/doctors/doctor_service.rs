//! # 의사 프로필 서비스
//!
//! 사용자 한 명당 의사 프로필은 하나만 존재합니다. 삭제는 `deleted_at`을
//! 기록하는 소프트 삭제이며 삭제된 프로필은 조회/목록에서 제외됩니다.

use std::sync::Arc;

use log::{info, warn};
use uuid::Uuid;

use crate::core::errors::AppError;
use crate::domain::dto::doctors::{DoctorRequest, DoctorResponse, ListDoctorResponse};
use crate::domain::dto::pagination::{PageRequest, Pagination};
use crate::domain::entities::Doctor;
use crate::repositories::{DoctorFilter, DoctorRepository};

const DOCTOR_NOT_FOUND: &str = "의사 프로필을 찾을 수 없습니다";
const DOCTOR_ALREADY_EXISTS: &str = "이미 의사 프로필이 존재합니다";

pub struct DoctorService {
    repo: Arc<dyn DoctorRepository>,
}

impl DoctorService {
    pub fn new(repo: Arc<dyn DoctorRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_doctor_by_id(&self, id: Uuid) -> Result<DoctorResponse, AppError> {
        let doctor = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(DOCTOR_NOT_FOUND.to_string()))?;

        Ok(DoctorResponse::from(doctor))
    }

    pub async fn list_doctors(
        &self,
        filter: DoctorFilter,
        page: PageRequest,
    ) -> Result<ListDoctorResponse, AppError> {
        let (doctors, total) = self.repo.list(&filter, page).await?;

        Ok(ListDoctorResponse {
            doctors: doctors.into_iter().map(DoctorResponse::from).collect(),
            pagination: Pagination::new(page, total),
        })
    }

    /// 의사 프로필 생성
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - 해당 사용자의 프로필이 이미 있는 경우
    pub async fn create_doctor(
        &self,
        request: DoctorRequest,
        requester: Uuid,
    ) -> Result<DoctorResponse, AppError> {
        let id_user = request.id_user.unwrap_or(requester);

        if self.repo.find_by_user_id(id_user).await?.is_some() {
            warn!("⚠️ 의사 프로필 중복 생성 시도: id_user={}", id_user);
            return Err(AppError::ConflictError(DOCTOR_ALREADY_EXISTS.to_string()));
        }

        let doctor = Doctor::new(
            id_user,
            request.name,
            request.image,
            request.price,
            request.specalist,
            request.experience,
        );

        self.repo.create(&doctor).await?;
        info!("🩺 의사 프로필 생성: id={}, id_user={}", doctor.id, doctor.id_user);

        Ok(DoctorResponse::from(doctor))
    }

    pub async fn update_doctor(
        &self,
        id: Uuid,
        request: DoctorRequest,
    ) -> Result<DoctorResponse, AppError> {
        let mut doctor = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(DOCTOR_NOT_FOUND.to_string()))?;

        // 다른 사용자로 옮기는 경우에도 사용자당 하나 규칙을 지킵니다
        if let Some(id_user) = request.id_user.filter(|u| *u != doctor.id_user) {
            if self.repo.find_by_user_id(id_user).await?.is_some() {
                return Err(AppError::ConflictError(DOCTOR_ALREADY_EXISTS.to_string()));
            }
            doctor.id_user = id_user;
        }
        doctor.name = request.name;
        doctor.image = request.image;
        doctor.price = request.price;
        doctor.specalist = request.specalist;
        doctor.experience = request.experience;
        doctor.updated_at = chrono::Utc::now();

        self.repo.update(&doctor).await?;
        info!("🩺 의사 프로필 수정: id={}", doctor.id);

        Ok(DoctorResponse::from(doctor))
    }

    pub async fn delete_doctor(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete(id).await? {
            return Err(AppError::NotFound(DOCTOR_NOT_FOUND.to_string()));
        }

        info!("🗑️ 의사 프로필 삭제(soft): id={}", id);
        Ok(())
    }
}
