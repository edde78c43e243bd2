mod config;
mod db;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let auth = config::AuthConfig::from_env().expect("auth config invalid");
    let database = config::DbConfig::from_env().expect("database config invalid");

    let pool = db::init_pool(&database)
        .await
        .expect("database init failed");

    let state = state::AppState::new(pool, auth);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "cupcake-shop listening");
    axum::serve(listener, app).await.expect("server failed");
}
