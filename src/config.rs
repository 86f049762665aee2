use dotenvy::dotenv;
use std::{env, net::SocketAddr};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_type: String,
    pub storage_path: String,
    pub frontend_dir: String,
    /// Prefix for the URLs handed back to clients; empty means relative.
    pub public_url: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            storage_type: env::var("STORAGE_TYPE").unwrap_or_else(|_| "local".to_string()),
            storage_path: env::var("STORAGE_PATH").unwrap_or_else(|_| "./uploads".to_string()),
            frontend_dir: env::var("FRONTEND_DIR").unwrap_or_else(|_| "./frontend".to_string()),
            public_url: env::var("PUBLIC_URL").unwrap_or_default(),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a number"),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid host or port")
    }
}
