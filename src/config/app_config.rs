use crate::error::{AppError, Result};
use std::{env, path::PathBuf};

/// `DB_URL` value that selects the in-process catalog store.
pub const IN_MEMORY_DB_URL: &str = "memory";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub images: ImageConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Where product images live on disk and how they are addressed on the web.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Directory served as the web root.
    pub web_root: PathBuf,
    /// Image directory relative to `web_root`, e.g. `images/ProductImage`.
    pub image_folder: String,
    /// Placeholder file inside the image directory copied for products without an upload.
    pub default_image: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "10485760".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string()))?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_MAX_CONNECTIONS value".to_string())
                    })?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("FRONTEND_URL")
                    .map(|origins| parse_origins(&origins))
                    .unwrap_or_default(),
            },
            images: ImageConfig {
                web_root: env::var("WEB_ROOT")
                    .unwrap_or_else(|_| "wwwroot".to_string())
                    .into(),
                image_folder: env::var("IMAGE_FOLDER")
                    .unwrap_or_else(|_| "images/ProductImage".to_string()),
                default_image: env::var("DEFAULT_PRODUCT_IMAGE")
                    .unwrap_or_else(|_| "default_image.jpg".to_string()),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.url == IN_MEMORY_DB_URL
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
