use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::dto::pagination::Pagination;
use crate::domain::entities::Doctor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorResponse {
    pub id: String,
    pub id_user: String,
    pub name: String,
    pub image: String,
    pub price: f32,
    pub specalist: String,
    pub experience: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Doctor> for DoctorResponse {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id.to_string(),
            id_user: doctor.id_user.to_string(),
            name: doctor.name,
            image: doctor.image,
            price: doctor.price,
            specalist: doctor.specalist,
            experience: doctor.experience,
            created_at: doctor.created_at,
            updated_at: doctor.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListDoctorResponse {
    pub doctors: Vec<DoctorResponse>,
    pub pagination: Pagination,
}
