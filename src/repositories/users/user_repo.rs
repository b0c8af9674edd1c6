use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::repositories::{map_sqlx_error, with_timeout};
use crate::config::AuthProvider;
use crate::core::errors::AppError;
use crate::domain::dto::pagination::PageRequest;
use crate::domain::entities::{User, UserRole};

/// 사용자 저장소
///
/// 조회 메서드는 모두 소프트 삭제된 사용자를 제외합니다.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, AppError>;

    async fn find_by_email_and_code(
        &self,
        email: &str,
        code: i32,
    ) -> Result<Option<User>, AppError>;

    async fn find_by_phone_and_code(
        &self,
        phone_number: &str,
        code: i32,
    ) -> Result<Option<User>, AppError>;

    async fn find_by_provider_id(
        &self,
        provider: AuthProvider,
        provider_user_id: &str,
    ) -> Result<Option<User>, AppError>;

    /// 이름 부분 일치 필터와 함께 목록과 전체 개수를 반환합니다
    async fn list(
        &self,
        name: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<User>, i64), AppError>;

    async fn create(&self, user: &User) -> Result<(), AppError>;

    async fn update(&self, user: &User) -> Result<(), AppError>;

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: Option<String>,
    role: String,
    name: String,
    phone_number: String,
    verify_code_email: i32,
    verify_code_phone_number: i32,
    approve_email: bool,
    approve_phone_number: bool,
    google_id: Option<String>,
    facebook_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = UserRole::from_str(&row.role).map_err(AppError::DatabaseError)?;

        Ok(Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role,
            name: row.name,
            phone_number: row.phone_number,
            verify_code_email: row.verify_code_email,
            verify_code_phone_number: row.verify_code_phone_number,
            approve_email: row.approve_email,
            approve_phone_number: row.approve_phone_number,
            google_id: row.google_id,
            facebook_id: row.facebook_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, role, name, phone_number, \
    verify_code_email, verify_code_phone_number, approve_email, approve_phone_number, \
    google_id, facebook_id, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `WHERE {condition} AND deleted_at IS NULL` 단건 조회
    async fn fetch_one_where<'a>(
        &self,
        operation: &str,
        condition: &str,
        binds: Vec<BindValue<'a>>,
    ) -> Result<Option<User>, AppError> {
        with_timeout(operation, async {
            let sql = format!(
                "SELECT {} FROM users WHERE {} AND deleted_at IS NULL",
                USER_COLUMNS, condition
            );
            let mut query = sqlx::query_as::<_, UserRow>(&sql);
            for bind in binds {
                query = match bind {
                    BindValue::Text(value) => query.bind(value),
                    BindValue::Int(value) => query.bind(value),
                    BindValue::Id(value) => query.bind(value),
                };
            }

            let row = query
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            row.map(User::try_from).transpose()
        })
        .await
    }
}

enum BindValue<'a> {
    Text(&'a str),
    Int(i32),
    Id(Uuid),
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.fetch_one_where("user.find_by_id", "id = $1", vec![BindValue::Id(id)])
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.trim().to_lowercase();
        self.fetch_one_where(
            "user.find_by_email",
            "email = $1",
            vec![BindValue::Text(&email)],
        )
        .await
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, AppError> {
        self.fetch_one_where(
            "user.find_by_phone",
            "phone_number = $1",
            vec![BindValue::Text(phone_number)],
        )
        .await
    }

    async fn find_by_email_and_code(
        &self,
        email: &str,
        code: i32,
    ) -> Result<Option<User>, AppError> {
        let email = email.trim().to_lowercase();
        self.fetch_one_where(
            "user.find_by_email_and_code",
            "email = $1 AND verify_code_email = $2",
            vec![BindValue::Text(&email), BindValue::Int(code)],
        )
        .await
    }

    async fn find_by_phone_and_code(
        &self,
        phone_number: &str,
        code: i32,
    ) -> Result<Option<User>, AppError> {
        self.fetch_one_where(
            "user.find_by_phone_and_code",
            "phone_number = $1 AND verify_code_phone_number = $2",
            vec![BindValue::Text(phone_number), BindValue::Int(code)],
        )
        .await
    }

    async fn find_by_provider_id(
        &self,
        provider: AuthProvider,
        provider_user_id: &str,
    ) -> Result<Option<User>, AppError> {
        let condition = match provider {
            AuthProvider::Google => "google_id = $1",
            AuthProvider::Facebook => "facebook_id = $1",
        };

        self.fetch_one_where(
            "user.find_by_provider_id",
            condition,
            vec![BindValue::Text(provider_user_id)],
        )
        .await
    }

    async fn list(
        &self,
        name: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<User>, i64), AppError> {
        let name = name.filter(|n| !n.is_empty()).map(|n| format!("%{}%", n));

        with_timeout("user.list", async {
            let mut count_qb = QueryBuilder::<Postgres>::new(
                "SELECT COUNT(*) FROM users WHERE deleted_at IS NULL",
            );
            if let Some(pattern) = name.as_ref() {
                count_qb.push(" AND name ILIKE ");
                count_qb.push_bind(pattern);
            }
            let total: i64 = count_qb
                .build_query_scalar()
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            let mut qb = QueryBuilder::<Postgres>::new(format!(
                "SELECT {} FROM users WHERE deleted_at IS NULL",
                USER_COLUMNS
            ));
            if let Some(pattern) = name.as_ref() {
                qb.push(" AND name ILIKE ");
                qb.push_bind(pattern);
            }
            qb.push(" ORDER BY created_at DESC, id LIMIT ");
            qb.push_bind(page.limit);
            qb.push(" OFFSET ");
            qb.push_bind(page.skip());

            let rows = qb
                .build_query_as::<UserRow>()
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

            let users = rows
                .into_iter()
                .map(User::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok((users, total))
        })
        .await
    }

    async fn create(&self, user: &User) -> Result<(), AppError> {
        with_timeout("user.create", async {
            sqlx::query(
                r#"
                INSERT INTO users (
                    id, email, password_hash, role, name, phone_number,
                    verify_code_email, verify_code_phone_number, approve_email, approve_phone_number,
                    google_id, facebook_id, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
            )
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.name)
            .bind(&user.phone_number)
            .bind(user.verify_code_email)
            .bind(user.verify_code_phone_number)
            .bind(user.approve_email)
            .bind(user.approve_phone_number)
            .bind(&user.google_id)
            .bind(&user.facebook_id)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> Result<(), AppError> {
        with_timeout("user.update", async {
            let result = sqlx::query(
                r#"
                UPDATE users SET
                    email = $2, password_hash = $3, role = $4, name = $5, phone_number = $6,
                    verify_code_email = $7, verify_code_phone_number = $8,
                    approve_email = $9, approve_phone_number = $10,
                    google_id = $11, facebook_id = $12, updated_at = $13
                WHERE id = $1 AND deleted_at IS NULL
                "#,
            )
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.name)
            .bind(&user.phone_number)
            .bind(user.verify_code_email)
            .bind(user.verify_code_phone_number)
            .bind(user.approve_email)
            .bind(user.approve_phone_number)
            .bind(&user.google_id)
            .bind(&user.facebook_id)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            if result.rows_affected() == 0 {
                return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
            }
            Ok(())
        })
        .await
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        with_timeout("user.soft_delete", async {
            let result = sqlx::query(
                "UPDATE users SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
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
