use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use studio_api::{config, database, handlers};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SUPABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting {}", config.service_name);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("STUDIO_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(admin_routes())
        .merge(vendor_routes())
        .merge(job_routes())
        .merge(test_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::session;

    Router::new().route("/api/auth/session", post(session::create_session))
}

fn admin_routes() -> Router {
    use axum::routing::{delete, post};
    use handlers::admin;

    Router::new()
        .route("/api/admin/create-user", post(admin::create_user))
        .route("/api/admin/update-user", post(admin::update_user))
        .route("/api/admin/delete-user", delete(admin::delete_user))
        .route("/api/admin/users", get(admin::list_users))
}

fn vendor_routes() -> Router {
    use handlers::vendors;

    Router::new()
        .route("/api/vendors", get(vendors::list).post(vendors::create))
        .route(
            "/api/vendors/:id",
            get(vendors::get)
                .put(vendors::update)
                .delete(vendors::delete),
        )
}

fn job_routes() -> Router {
    use axum::routing::patch;
    use handlers::jobs;

    Router::new()
        .route("/api/jobs", get(jobs::list))
        .route("/api/jobs/:id/status", patch(jobs::update_status))
}

fn test_routes() -> Router {
    use axum::routing::post;
    use handlers::test_routes;

    Router::new().route(
        "/api/test",
        get(test_routes::status).post(test_routes::echo),
    )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": config::config().service_name,
            "version": version,
            "endpoints": {
                "home": "/ (public)",
                "session": "/api/auth/session (bearer token exchange)",
                "admin": "/api/admin/* (session cookie, ADMIN)",
                "vendors": "/api/vendors[/:id] (bearer, ADMIN/MANAGER)",
                "jobs": "/api/jobs[/:id/status] (bearer)",
                "test": "/api/test (public)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
