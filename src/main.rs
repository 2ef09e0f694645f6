//! # person-store 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 로딩 (`DATABASE_URL`이 없으면 경고 후 기본값)
//! 4. 저장소 연결 풀 생성 및 연결 확인, 마이그레이션
//! 5. API 라우터 설정
//! 6. HTTP 서버 시작 (Ctrl+C로 정상 종료)

use anyhow::Result; // main에서만 anyhow를 사용합니다. 라이브러리 쪽은 AppError.
use person_store::{
    config::Config,
    db,
    routes::{self, AppState},
};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 이 크레이트와 tower_http를 debug 레벨로 출력합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "person_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    // 로깅 초기화 이후에 읽어야 DATABASE_URL 누락 경고가 출력됩니다.
    let config = Config::from_env();
    tracing::info!("Starting person-store on {}", config.bind_addr());

    // ── 4단계: 저장소 연결 ──
    // 연결 문자열 해석 실패만 치명적입니다.
    // 실제 연결/마이그레이션 실패는 로그만 남기고 서버는 계속 뜹니다.
    // 이 경우 이후의 모든 작업이 Database 에러로 실패합니다.
    let pool = db::connect_lazy(&config.database_url)?;
    if db::bootstrap(&pool).await.is_err() {
        tracing::warn!("Continuing without a working store; every operation will fail");
    }

    // ── 5단계: 상태와 라우터 ──
    // 종료 신호 토큰은 서버의 새 연결 수락만 멈춥니다.
    // 저장소는 별도 토큰을 쓰므로 진행 중인 요청은 끝까지 처리됩니다.
    let shutdown = CancellationToken::new();
    let state = AppState::new(pool.clone());

    // 개발 환경용 CORS: 모든 출처/메서드/헤더 허용
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = axum::Router::new()
        .nest("/api/v1", routes::api_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ── 6단계: 서버 시작 ──
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                signal_token.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    // 진행 중인 요청이 모두 끝난 뒤에 풀을 닫습니다.
    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}
