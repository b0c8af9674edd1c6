//! 공유 애플리케이션 상태

use std::sync::Arc;

use sqlx::PgPool;

use crate::caching::CacheAside;
use crate::config::{AppConfig, PasswordConfig};
use crate::repositories::{
    PostgresAddressRepository, PostgresDoctorRepository, PostgresUserRepository,
};
use crate::services::auth::{
    FacebookAuthService, GoogleAuthService, OAuthClient, OAuthStateSigner, TokenService,
};
use crate::services::notification::Notifier;
use crate::services::{AddressService, DoctorService, UserService};

/// HTTP 핸들러와 gRPC 서비스가 공유하는 의존성 묶음
///
/// 모든 필드는 `Arc` 또는 `Arc`를 감싼 타입이라 복제 비용이 작습니다.
/// actix-web에는 `web::Data<AppState>`로, tonic 서비스에는 복제본으로 전달됩니다.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cache: CacheAside,
    pub tokens: Arc<TokenService>,
    pub users: Arc<UserService>,
    pub addresses: Arc<AddressService>,
    pub doctors: Arc<DoctorService>,
    pub google: Arc<dyn OAuthClient>,
    pub facebook: Arc<dyn OAuthClient>,
}

impl AppState {
    /// Postgres 저장소와 주어진 캐시/알림 구현으로 상태를 조립합니다
    pub fn new(
        config: AppConfig,
        pool: PgPool,
        cache: CacheAside,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let config = Arc::new(config);
        let tokens = Arc::new(TokenService::new(&config.jwt));
        let signer = OAuthStateSigner::new(config.oauth_state_secret.clone());

        let users = UserService::new(
            Arc::new(PostgresUserRepository::new(pool.clone())),
            tokens.clone(),
            notifier,
            PasswordConfig::bcrypt_cost_for_env(&config.environment),
        );
        let addresses = AddressService::new(Arc::new(PostgresAddressRepository::new(pool.clone())));
        let doctors = DoctorService::new(Arc::new(PostgresDoctorRepository::new(pool)));

        Self {
            cache,
            tokens,
            users: Arc::new(users),
            addresses: Arc::new(addresses),
            doctors: Arc::new(doctors),
            google: Arc::new(GoogleAuthService::new(config.google.clone(), signer.clone())),
            facebook: Arc::new(FacebookAuthService::new(config.facebook.clone(), signer)),
            config,
        }
    }
}
