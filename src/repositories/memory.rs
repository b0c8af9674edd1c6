//! 테스트용 메모리 저장소
//!
//! Postgres 구현과 같은 trait을 구현하며, 필터/정렬/소프트 삭제 규칙도 동일하게 따릅니다.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{AddressFilter, AddressRepository, DoctorFilter, DoctorRepository, UserRepository};
use crate::config::AuthProvider;
use crate::core::errors::AppError;
use crate::domain::dto::doctors::DoctorSortField;
use crate::domain::dto::pagination::PageRequest;
use crate::domain::entities::{Address, Doctor, User};

fn page_of<T: Clone>(items: Vec<T>, page: PageRequest) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let page_items = items
        .into_iter()
        .skip(page.skip() as usize)
        .take(page.limit as usize)
        .collect();
    (page_items, total)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Default)]
pub struct MemoryAddressRepository {
    rows: Mutex<HashMap<Uuid, Address>>,
}

#[async_trait]
impl AddressRepository for MemoryAddressRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, AppError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &AddressFilter,
        page: PageRequest,
    ) -> Result<(Vec<Address>, i64), AppError> {
        let mut items: Vec<Address> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|a| {
                filter
                    .name
                    .as_deref()
                    .map_or(true, |n| contains_ignore_case(&a.name, n))
            })
            .filter(|a| filter.id_user.map_or(true, |u| a.id_user == u))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page_of(items, page))
    }

    async fn create(&self, address: &Address) -> Result<(), AppError> {
        self.rows.lock().unwrap().insert(address.id, address.clone());
        Ok(())
    }

    async fn update(&self, address: &Address) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&address.id) {
            Some(row) => {
                *row = address.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("주소를 찾을 수 없습니다".to_string())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryDoctorRepository {
    rows: Mutex<HashMap<Uuid, Doctor>>,
}

#[async_trait]
impl DoctorRepository for MemoryDoctorRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|d| d.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_user_id(&self, id_user: Uuid) -> Result<Option<Doctor>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|d| d.id_user == id_user && d.deleted_at.is_none())
            .cloned())
    }

    async fn list(
        &self,
        filter: &DoctorFilter,
        page: PageRequest,
    ) -> Result<(Vec<Doctor>, i64), AppError> {
        let mut items: Vec<Doctor> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.deleted_at.is_none())
            .filter(|d| {
                filter.search.as_deref().map_or(true, |s| {
                    contains_ignore_case(&d.name, s) || contains_ignore_case(&d.specalist, s)
                })
            })
            .filter(|d| filter.id_user.map_or(true, |u| d.id_user == u))
            .cloned()
            .collect();

        if filter.order_by.is_empty() {
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        } else {
            items.sort_by(|a, b| {
                for order in &filter.order_by {
                    let ordering = match order.field {
                        DoctorSortField::Name => a.name.cmp(&b.name),
                        DoctorSortField::Price => a.price.total_cmp(&b.price),
                        DoctorSortField::Experience => a.experience.cmp(&b.experience),
                        DoctorSortField::Specalist => a.specalist.cmp(&b.specalist),
                        DoctorSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                        DoctorSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                    };
                    let ordering = if order.desc { ordering.reverse() } else { ordering };
                    if ordering.is_ne() {
                        return ordering;
                    }
                }
                a.id.cmp(&b.id)
            });
        }

        Ok(page_of(items, page))
    }

    async fn create(&self, doctor: &Doctor) -> Result<(), AppError> {
        self.rows.lock().unwrap().insert(doctor.id, doctor.clone());
        Ok(())
    }

    async fn update(&self, doctor: &Doctor) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&doctor.id).filter(|d| d.deleted_at.is_none()) {
            Some(row) => {
                *row = doctor.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("의사 정보를 찾을 수 없습니다".to_string())),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id).filter(|d| d.deleted_at.is_none()) {
            Some(row) => {
                row.deleted_at = Some(chrono::Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    rows: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    fn find_live<F>(&self, predicate: F) -> Option<User>
    where
        F: Fn(&User) -> bool,
    {
        self.rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.deleted_at.is_none() && predicate(u))
            .cloned()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.find_live(|u| u.id == id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.trim().to_lowercase();
        Ok(self.find_live(|u| u.email == email))
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, AppError> {
        Ok(self.find_live(|u| u.phone_number == phone_number))
    }

    async fn find_by_email_and_code(
        &self,
        email: &str,
        code: i32,
    ) -> Result<Option<User>, AppError> {
        let email = email.trim().to_lowercase();
        Ok(self.find_live(|u| u.email == email && u.verify_code_email == code))
    }

    async fn find_by_phone_and_code(
        &self,
        phone_number: &str,
        code: i32,
    ) -> Result<Option<User>, AppError> {
        Ok(self.find_live(|u| {
            u.phone_number == phone_number && u.verify_code_phone_number == code
        }))
    }

    async fn find_by_provider_id(
        &self,
        provider: AuthProvider,
        provider_user_id: &str,
    ) -> Result<Option<User>, AppError> {
        Ok(self.find_live(|u| match provider {
            AuthProvider::Google => u.google_id.as_deref() == Some(provider_user_id),
            AuthProvider::Facebook => u.facebook_id.as_deref() == Some(provider_user_id),
        }))
    }

    async fn list(
        &self,
        name: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<User>, i64), AppError> {
        let mut items: Vec<User> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.deleted_at.is_none())
            .filter(|u| name.map_or(true, |n| contains_ignore_case(&u.name, n)))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page_of(items, page))
    }

    async fn create(&self, user: &User) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .values()
            .any(|u| u.deleted_at.is_none() && u.email == user.email)
        {
            return Err(AppError::ConflictError("이미 존재하는 리소스입니다".to_string()));
        }
        rows.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&user.id).filter(|u| u.deleted_at.is_none()) {
            Some(row) => {
                *row = user.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string())),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id).filter(|u| u.deleted_at.is_none()) {
            Some(row) => {
                row.deleted_at = Some(chrono::Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
