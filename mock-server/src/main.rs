use std::env;

use petfriends_mock::MockConfig;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");

    let mut config = MockConfig::default();
    if let Ok(email) = env::var("PETFRIENDS_MOCK_EMAIL") {
        config.email = email;
    }
    if let Ok(password) = env::var("PETFRIENDS_MOCK_PASSWORD") {
        config.password = password;
    }

    let listener = TcpListener::bind(&addr).await?;
    petfriends_mock::run_with(listener, config).await
}
