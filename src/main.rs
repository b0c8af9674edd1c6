//! 클리닉 백엔드 메인 애플리케이션
//!
//! 설정을 읽고 Postgres, Redis, 알림 클라이언트를 준비한 뒤
//! HTTP 서버와 gRPC 서버를 동시에 실행합니다. 둘 중 하나라도 종료되면 프로세스가 끝납니다.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

use clinic_backend::caching::memory::MemoryCache;
use clinic_backend::caching::redis::RedisCache;
use clinic_backend::caching::{Cache, CacheAside};
use clinic_backend::config::{AppConfig, RedisSettings};
use clinic_backend::core::AppState;
use clinic_backend::db::Database;
use clinic_backend::grpc;
use clinic_backend::routes::configure_all_routes;
use clinic_backend::services::notification::ExternalNotifier;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 클리닉 백엔드 시작중...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ 설정 로드 실패: {}", e);
            std::process::exit(1);
        }
    };
    info!("환경: {}", config.environment.as_str());

    let database = initialize_database(&config).await;
    let cache = initialize_cache(&config.redis).await;
    let notifier = Arc::new(ExternalNotifier::new(&config.notification));

    let state = AppState::new(config, database.pool().clone(), cache, notifier);
    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    let grpc_addr: SocketAddr = state
        .config
        .server
        .grpc_bind_address()
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let http = start_http_server(state.clone())?;
    let grpc = grpc::serve(state, grpc_addr);

    tokio::select! {
        result = http => {
            error!("HTTP 서버 종료");
            result
        }
        result = grpc => {
            error!("gRPC 서버 종료");
            result.map_err(io::Error::other)
        }
    }
}

/// HTTP 서버를 구성합니다
///
/// 반환된 `Server`를 await해야 실제로 요청을 처리합니다.
///
/// # Errors
///
/// * 포트 바인딩 실패, Rate Limiting 설정 오류
fn start_http_server(state: AppState) -> io::Result<actix_web::dev::Server> {
    let bind_address = state.config.server.http_bind_address();
    let workers = state.config.server.workers;

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let rate_limit = &state.config.rate_limit;
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "RATE_LIMIT_PER_SECOND와 RATE_LIMIT_BURST_SIZE는 0보다 커야 합니다",
            )
        })?;
    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit.per_second, rate_limit.burst_size
    );

    let allowed_origins = state.config.cors_allowed_origins.clone();
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&allowed_origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(workers)
    .run();

    Ok(server)
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// `RUST_LOG` 기본값은 "info,actix_web=debug"
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// Postgres 연결 (재시도 소진 시 종료) 후 마이그레이션 실행
async fn initialize_database(config: &AppConfig) -> Database {
    info!("📡 데이터베이스 연결 중...");

    let database = match Database::connect_with_retry(&config.database).await {
        Ok(database) => database,
        Err(e) => {
            error!("❌ 데이터베이스 연결 실패: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = database.run_migrations().await {
        error!("❌ 마이그레이션 실패: {}", e);
        std::process::exit(1);
    }
    info!("✅ 마이그레이션 완료");

    database
}

/// Redis가 설정되지 않았거나 연결할 수 없으면 프로세스 메모리 캐시를 사용합니다
async fn initialize_cache(settings: &RedisSettings) -> CacheAside {
    let backend: Arc<dyn Cache> = if settings.is_configured() {
        match RedisCache::connect(settings).await {
            Ok(redis) => Arc::new(redis),
            Err(e) => {
                warn!("⚠️ Redis 연결 실패, 메모리 캐시 사용: {}", e);
                Arc::new(MemoryCache::new())
            }
        }
    } else {
        warn!("⚠️ REDIS_URI 미설정, 메모리 캐시 사용");
        Arc::new(MemoryCache::new())
    };

    CacheAside::new(backend)
}

/// CORS 설정 (`CORS_ALLOWED_ORIGINS`)
fn configure_cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            header::ACCESS_CONTROL_REQUEST_METHOD,
        ])
        .supports_credentials()
        .max_age(3600)
}
