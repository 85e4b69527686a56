use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use std::net::TcpListener;
use tasklist_server::auth::handlers::{login, register};
use tasklist_server::tasks::handlers as task_handlers;
use tasklist_server::{health_check, AppError, AppState, AuthenticationGate, Settings};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[actix_web::main]
async fn main() -> tasklist_server::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();

    // Load configuration; fails fast when the signing secret is missing
    let config = Settings::new()?;
    info!("Configuration loaded successfully");

    info!(
        "Starting server at {}:{}",
        config.server.host, config.server.port
    );

    // Initialize application state
    let state = AppState::new(config.clone()).await?;
    let state = web::Data::new(state);

    // Create and bind TCP listener
    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;

    let workers = config.server.workers as usize;

    // Start HTTP server. The authentication gate wraps every route; public
    // paths are allowlisted inside the gate itself.
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(AuthenticationGate)
            .app_data(state.clone())
            .route("/health", web::get().to(health_check))
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .service(
                web::scope("/tasks")
                    .route("/all", web::get().to(task_handlers::fetch_all))
                    .route(
                        "/fetch-and-store",
                        web::get().to(task_handlers::fetch_and_store),
                    )
                    .route("/paginated", web::get().to(task_handlers::paginated))
                    .route("/grouped", web::get().to(task_handlers::grouped))
                    .route("", web::get().to(task_handlers::list))
                    .route("/", web::get().to(task_handlers::list))
                    .route("/{id}", web::get().to(task_handlers::get_by_id))
                    .route("/{id}", web::put().to(task_handlers::update))
                    .route("/{id}", web::delete().to(task_handlers::delete)),
            )
    })
    .listen(listener)?
    .workers(workers)
    .run()
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(())
}
