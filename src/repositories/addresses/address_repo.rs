use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::repositories::{map_sqlx_error, with_timeout};
use crate::core::errors::AppError;
use crate::domain::dto::pagination::PageRequest;
use crate::domain::entities::Address;

/// 주소 목록 필터
#[derive(Debug, Clone, Default)]
pub struct AddressFilter {
    /// 이름 부분 일치 (대소문자 무시)
    pub name: Option<String>,
    pub id_user: Option<Uuid>,
}

#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, AppError>;

    /// 현재 페이지 항목과 전체 개수를 반환합니다
    async fn list(
        &self,
        filter: &AddressFilter,
        page: PageRequest,
    ) -> Result<(Vec<Address>, i64), AppError>;

    async fn create(&self, address: &Address) -> Result<(), AppError>;

    async fn update(&self, address: &Address) -> Result<(), AppError>;

    /// 삭제된 행이 있으면 true
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: Uuid,
    id_user: Uuid,
    name: String,
    city: String,
    street: String,
    lat: String,
    long: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: row.id,
            id_user: row.id_user,
            name: row.name,
            city: row.city,
            street: row.street,
            lat: row.lat,
            long: row.long,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ADDRESS_COLUMNS: &str =
    "id, id_user, name, city, street, lat, long, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresAddressRepository {
    pool: PgPool,
}

impl PostgresAddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filter<'q>(qb: &mut QueryBuilder<'q, Postgres>, filter: &'q AddressFilter) {
        qb.push(" WHERE 1 = 1");

        if let Some(name) = filter.name.as_ref().filter(|n| !n.is_empty()) {
            qb.push(" AND name ILIKE ");
            qb.push_bind(format!("%{}%", name));
        }

        if let Some(id_user) = filter.id_user {
            qb.push(" AND id_user = ");
            qb.push_bind(id_user);
        }
    }
}

#[async_trait]
impl AddressRepository for PostgresAddressRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, AppError> {
        with_timeout("address.find_by_id", async {
            let row = sqlx::query_as::<_, AddressRow>(&format!(
                "SELECT {} FROM addresses WHERE id = $1",
                ADDRESS_COLUMNS
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            Ok(row.map(Address::from))
        })
        .await
    }

    async fn list(
        &self,
        filter: &AddressFilter,
        page: PageRequest,
    ) -> Result<(Vec<Address>, i64), AppError> {
        with_timeout("address.list", async {
            let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM addresses");
            Self::push_filter(&mut count_qb, filter);
            let total: i64 = count_qb
                .build_query_scalar()
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            let mut qb = QueryBuilder::<Postgres>::new(format!(
                "SELECT {} FROM addresses",
                ADDRESS_COLUMNS
            ));
            Self::push_filter(&mut qb, filter);
            qb.push(" ORDER BY created_at DESC, id LIMIT ");
            qb.push_bind(page.limit);
            qb.push(" OFFSET ");
            qb.push_bind(page.skip());

            let rows = qb
                .build_query_as::<AddressRow>()
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            Ok((rows.into_iter().map(Address::from).collect(), total))
        })
        .await
    }

    async fn create(&self, address: &Address) -> Result<(), AppError> {
        with_timeout("address.create", async {
            sqlx::query(
                r#"
                INSERT INTO addresses (id, id_user, name, city, street, lat, long, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(address.id)
            .bind(address.id_user)
            .bind(&address.name)
            .bind(&address.city)
            .bind(&address.street)
            .bind(&address.lat)
            .bind(&address.long)
            .bind(address.created_at)
            .bind(address.updated_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            Ok(())
        })
        .await
    }

    async fn update(&self, address: &Address) -> Result<(), AppError> {
        with_timeout("address.update", async {
            let result = sqlx::query(
                r#"
                UPDATE addresses
                SET id_user = $2, name = $3, city = $4, street = $5, lat = $6, long = $7, updated_at = $8
                WHERE id = $1
                "#,
            )
            .bind(address.id)
            .bind(address.id_user)
            .bind(&address.name)
            .bind(&address.city)
            .bind(&address.street)
            .bind(&address.lat)
            .bind(&address.long)
            .bind(address.updated_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            if result.rows_affected() == 0 {
                return Err(AppError::NotFound("주소를 찾을 수 없습니다".to_string()));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        with_timeout("address.delete", async {
            let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }
}
