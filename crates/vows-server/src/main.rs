use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use vows_api::auth::{self, AppState, AppStateInner};
use vows_api::middleware::{require_admin, require_auth};
use vows_api::{comments, invitation, likes, media, messages, uploads, venue};
use vows_gateway::connection;
use vows_gateway::dispatcher::Dispatcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vows=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("VOWS_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("VOWS_DB_PATH").unwrap_or_else(|_| "vows.db".into());
    let host = std::env::var("VOWS_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("VOWS_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let upload_dir = PathBuf::from(
        std::env::var("VOWS_UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into()),
    );

    // Init database
    let db = vows_db::Database::open(&PathBuf::from(&db_path))?;
    seed_admin(&db)?;

    // Shared state
    let dispatcher = Dispatcher::new();
    let app_state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret,
        dispatcher: dispatcher.clone(),
        upload_dir,
    });

    // Routes
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/invitation", get(invitation::get_invitation))
        .route("/venue", get(venue::get_venue))
        .route("/media", get(media::list_media))
        .route("/media/{media_id}/likes", post(likes::toggle_like))
        .route("/media/{media_id}/comments", get(comments::list_comments))
        .route("/media/{media_id}/comments", post(comments::create_comment))
        .route("/comments/{comment_id}", delete(comments::delete_comment))
        .route("/messages", get(messages::get_messages))
        .route("/messages", post(messages::create_message))
        .route("/uploads/{file_id}", get(uploads::download_file))
        .with_state(app_state.clone());

    let authed_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .layer(middleware::from_fn(require_auth))
        .with_state(app_state.clone());

    let admin_routes = Router::new()
        .route("/invitation", put(invitation::update_invitation))
        .route("/media", post(media::create_media))
        .route("/media/{media_id}", put(media::update_media))
        .route("/media/{media_id}", delete(media::delete_media))
        .route("/uploads", post(uploads::upload_file))
        .layer(middleware::from_fn(require_admin))
        .with_state(app_state.clone());

    let ws_route = Router::new()
        .route("/feed", get(ws_upgrade))
        .with_state(app_state.clone());

    let app = Router::new()
        .merge(public_routes)
        .merge(authed_routes)
        .merge(admin_routes)
        .merge(ws_route)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Vows server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let dispatcher = state.dispatcher.clone();
    ws.on_upgrade(move |socket| connection::handle_connection(socket, dispatcher))
}

/// Create the admin editor account on first run, from VOWS_ADMIN_EMAIL and
/// VOWS_ADMIN_PASSWORD. Without a password in the environment no account is
/// created and the edit mode stays unreachable.
fn seed_admin(db: &vows_db::Database) -> anyhow::Result<()> {
    let email =
        std::env::var("VOWS_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".into());
    let Ok(password) = std::env::var("VOWS_ADMIN_PASSWORD") else {
        warn!("VOWS_ADMIN_PASSWORD not set; skipping admin account seed");
        return Ok(());
    };

    if db.get_user_by_email(&email)?.is_some() {
        return Ok(());
    }

    let user_id = Uuid::new_v4();
    let password_hash = auth::hash_password(&password)?;
    db.create_user(&user_id.to_string(), &email, &password_hash, "admin")?;
    info!("Seeded admin account {}", email);

    Ok(())
}
