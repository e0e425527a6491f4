use axum::{extract::DefaultBodyLimit, middleware::from_fn, Extension, Router};
use siaga_banjir::core::clock::{Clock, SystemClock};
use siaga_banjir::core::config::{Config, PhotoBackend, StoreBackend};
use siaga_banjir::core::extractor::IdentityPolicy;
use siaga_banjir::core::openapi::{ApiDoc, SwaggerInfoModifier};
use siaga_banjir::core::{database, middleware};
use siaga_banjir::features::dashboard::{
    routes as dashboard_routes, DashboardService, HttpReadingsSource, ReadingsSource,
};
use siaga_banjir::features::flood_reports::{
    routes as flood_reports_routes, InMemoryReportStore, PgReportStore, ReportService,
    ReportStore, SubmissionService,
};
use siaga_banjir::features::mirror::{HttpReportMirror, NoopMirror, ReportMirror};
use siaga_banjir::features::photos::{InlinePhotoStore, MinioPhotoStore, PhotoStore};
use siaga_banjir::features::rate_limits::{routes as rate_limits_routes, QuotaService};
use siaga_banjir::features::risk::{routes as risk_routes, RiskService};
use siaga_banjir::features::statistics::{routes as statistics_routes, AggregationService};
use siaga_banjir::modules::storage::MinIOClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1),
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Primary report store
    let store: Arc<dyn ReportStore> = match config.store.backend {
        StoreBackend::Postgres => {
            let database_config = config
                .store
                .database
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for REPORT_STORE=postgres"))?;

            let pool = database::create_pool(database_config).await?;
            tracing::info!("Database connection pool created");

            tracing::info!("Running database migrations...");
            database::run_migrations(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
            tracing::info!("Database migrations completed successfully");

            Arc::new(PgReportStore::new(pool, Arc::clone(&clock)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory report store; reports are lost on restart");
            Arc::new(InMemoryReportStore::new(Arc::clone(&clock)))
        }
    };

    // Photo store
    let photos: Option<Arc<dyn PhotoStore>> = match config.photo.backend {
        PhotoBackend::Minio => {
            let minio_config = config
                .photo
                .minio
                .clone()
                .ok_or_else(|| anyhow::anyhow!("MinIO configuration missing for PHOTO_STORE=minio"))?;
            let minio_client = Arc::new(
                MinIOClient::new(minio_config)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?,
            );
            tracing::info!(
                "MinIO client initialized for bucket: {}",
                minio_client.bucket_name()
            );
            Some(Arc::new(MinioPhotoStore::new(minio_client)))
        }
        PhotoBackend::Inline => {
            tracing::info!("Photos stored inline with reports");
            Some(Arc::new(InlinePhotoStore))
        }
        PhotoBackend::Disabled => {
            tracing::info!("Photo storage disabled");
            None
        }
    };

    // Secondary mirror
    let mirror: Arc<dyn ReportMirror> = match HttpReportMirror::from_config(&config.mirror) {
        Some(mirror) => {
            tracing::info!("Report mirroring enabled");
            Arc::new(mirror)
        }
        None => {
            tracing::info!("Report mirroring disabled (no MIRROR_URL configured)");
            Arc::new(NoopMirror)
        }
    };

    // Risk models
    let risk_service = Arc::new(
        RiskService::from_config(&config.risk, Arc::clone(&clock))
            .map_err(|e| anyhow::anyhow!("Failed to initialize risk models: {}", e))?,
    );
    tracing::info!(
        "Risk service initialized (primary model: {})",
        risk_service.primary_model_name()
    );

    // Reports
    let quota_service = Arc::new(QuotaService::new(
        Arc::clone(&store),
        Arc::clone(&clock),
        config.submission.daily_report_limit,
    ));
    let submission_service = Arc::new(
        SubmissionService::new(
            Arc::clone(&store),
            Arc::clone(&quota_service),
            photos,
            Arc::clone(&mirror),
        )
        .with_photo_config(&config.photo),
    );
    let report_service = Arc::new(ReportService::new(Arc::clone(&store)));
    let aggregation_service = Arc::new(AggregationService::new(Arc::clone(&store)));
    tracing::info!(
        "Report services initialized (daily limit: {})",
        config.submission.daily_report_limit
    );

    // Dashboard
    let readings_source: Option<Arc<dyn ReadingsSource>> =
        match HttpReadingsSource::from_config(&config.feed) {
            Some(source) => Some(Arc::new(source)),
            None => {
                tracing::warn!("No READINGS_URL configured; dashboard will report unavailable");
                None
            }
        };
    let dashboard_service = Arc::new(
        DashboardService::new(
            readings_source,
            Arc::clone(&risk_service),
            Arc::clone(&mirror),
            Arc::clone(&clock),
            &config.feed,
        )
        .with_assessment_log(config.mirror.log_assessments),
    );
    tracing::info!("Dashboard service initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let public_routes = Router::new()
        .merge(flood_reports_routes::routes(
            submission_service,
            report_service,
        ))
        .merge(rate_limits_routes::routes(quota_service))
        .merge(statistics_routes::routes(aggregation_service))
        .merge(dashboard_routes::routes(dashboard_service))
        .merge(risk_routes::routes(risk_service));

    if config.app.trust_forwarded_for {
        tracing::info!("Submitter identity taken from X-Forwarded-For");
    }

    let app = Router::new()
        .merge(swagger)
        .merge(public_routes)
        .merge(health_route)
        .layer(Extension(IdentityPolicy {
            trust_forwarded_for: config.app.trust_forwarded_for,
        }))
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    // Peer addresses feed the submitter identity
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
