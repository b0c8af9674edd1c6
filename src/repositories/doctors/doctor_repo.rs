use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::repositories::{map_sqlx_error, with_timeout};
use crate::core::errors::AppError;
use crate::domain::dto::doctors::OrderBy;
use crate::domain::dto::pagination::PageRequest;
use crate::domain::entities::Doctor;

/// 의사 목록 필터
///
/// 삭제된 프로필은 항상 제외됩니다.
#[derive(Debug, Clone, Default)]
pub struct DoctorFilter {
    /// 이름 또는 전문 분야 부분 일치
    pub search: Option<String>,
    pub id_user: Option<Uuid>,
    /// 비어 있으면 `created_at DESC`
    pub order_by: Vec<OrderBy>,
}

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, AppError>;

    async fn find_by_user_id(&self, id_user: Uuid) -> Result<Option<Doctor>, AppError>;

    async fn list(
        &self,
        filter: &DoctorFilter,
        page: PageRequest,
    ) -> Result<(Vec<Doctor>, i64), AppError>;

    async fn create(&self, doctor: &Doctor) -> Result<(), AppError>;

    async fn update(&self, doctor: &Doctor) -> Result<(), AppError>;

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(sqlx::FromRow)]
struct DoctorRow {
    id: Uuid,
    id_user: Uuid,
    name: String,
    image: String,
    price: f32,
    specalist: String,
    experience: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<DoctorRow> for Doctor {
    fn from(row: DoctorRow) -> Self {
        Self {
            id: row.id,
            id_user: row.id_user,
            name: row.name,
            image: row.image,
            price: row.price,
            specalist: row.specalist,
            experience: row.experience,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

const DOCTOR_COLUMNS: &str =
    "id, id_user, name, image, price, specalist, experience, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct PostgresDoctorRepository {
    pool: PgPool,
}

impl PostgresDoctorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filter<'q>(qb: &mut QueryBuilder<'q, Postgres>, filter: &'q DoctorFilter) {
        qb.push(" WHERE deleted_at IS NULL");

        if let Some(search) = filter.search.as_ref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            qb.push(" AND (name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR specalist ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if let Some(id_user) = filter.id_user {
            qb.push(" AND id_user = ");
            qb.push_bind(id_user);
        }
    }

    /// 컬럼 이름은 화이트리스트 enum에서만 나오므로 바인딩 없이 붙입니다
    fn push_order(qb: &mut QueryBuilder<'_, Postgres>, order_by: &[OrderBy]) {
        if order_by.is_empty() {
            qb.push(" ORDER BY created_at DESC, id");
            return;
        }

        qb.push(" ORDER BY ");
        for (i, order) in order_by.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(order.field.column());
            qb.push(if order.desc { " DESC" } else { " ASC" });
        }
        qb.push(", id");
    }
}

#[async_trait]
impl DoctorRepository for PostgresDoctorRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, AppError> {
        with_timeout("doctor.find_by_id", async {
            let row = sqlx::query_as::<_, DoctorRow>(&format!(
                "SELECT {} FROM doctors WHERE id = $1 AND deleted_at IS NULL",
                DOCTOR_COLUMNS
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            Ok(row.map(Doctor::from))
        })
        .await
    }

    async fn find_by_user_id(&self, id_user: Uuid) -> Result<Option<Doctor>, AppError> {
        with_timeout("doctor.find_by_user_id", async {
            let row = sqlx::query_as::<_, DoctorRow>(&format!(
                "SELECT {} FROM doctors WHERE id_user = $1 AND deleted_at IS NULL",
                DOCTOR_COLUMNS
            ))
            .bind(id_user)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            Ok(row.map(Doctor::from))
        })
        .await
    }

    async fn list(
        &self,
        filter: &DoctorFilter,
        page: PageRequest,
    ) -> Result<(Vec<Doctor>, i64), AppError> {
        with_timeout("doctor.list", async {
            let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM doctors");
            Self::push_filter(&mut count_qb, filter);
            let total: i64 = count_qb
                .build_query_scalar()
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            let mut qb =
                QueryBuilder::<Postgres>::new(format!("SELECT {} FROM doctors", DOCTOR_COLUMNS));
            Self::push_filter(&mut qb, filter);
            Self::push_order(&mut qb, &filter.order_by);
            qb.push(" LIMIT ");
            qb.push_bind(page.limit);
            qb.push(" OFFSET ");
            qb.push_bind(page.skip());

            let rows = qb
                .build_query_as::<DoctorRow>()
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            Ok((rows.into_iter().map(Doctor::from).collect(), total))
        })
        .await
    }

    async fn create(&self, doctor: &Doctor) -> Result<(), AppError> {
        with_timeout("doctor.create", async {
            sqlx::query(
                r#"
                INSERT INTO doctors (id, id_user, name, image, price, specalist, experience, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(doctor.id)
            .bind(doctor.id_user)
            .bind(&doctor.name)
            .bind(&doctor.image)
            .bind(doctor.price)
            .bind(&doctor.specalist)
            .bind(doctor.experience)
            .bind(doctor.created_at)
            .bind(doctor.updated_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            Ok(())
        })
        .await
    }

    async fn update(&self, doctor: &Doctor) -> Result<(), AppError> {
        with_timeout("doctor.update", async {
            let result = sqlx::query(
                r#"
                UPDATE doctors
                SET id_user = $2, name = $3, image = $4, price = $5, specalist = $6,
                    experience = $7, updated_at = $8
                WHERE id = $1 AND deleted_at IS NULL
                "#,
            )
            .bind(doctor.id)
            .bind(doctor.id_user)
            .bind(&doctor.name)
            .bind(&doctor.image)
            .bind(doctor.price)
            .bind(&doctor.specalist)
            .bind(doctor.experience)
            .bind(doctor.updated_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            if result.rows_affected() == 0 {
                return Err(AppError::NotFound("의사 정보를 찾을 수 없습니다".to_string()));
            }
            Ok(())
        })
        .await
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        with_timeout("doctor.soft_delete", async {
            let result = sqlx::query(
                "UPDATE doctors SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
            )
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }
}
