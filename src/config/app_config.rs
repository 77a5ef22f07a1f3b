use crate::error::{AppError, Result};
use crate::services::image_service::NormalizerConfig;
use std::env;
use std::str::FromStr;

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

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub max_upload_bytes: usize,
    pub max_dimension: u32,
    pub jpeg_quality: u8,
    pub max_source_dimension: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        let defaults = NormalizerConfig::default();
        Self {
            max_upload_bytes: defaults.max_upload_bytes,
            max_dimension: defaults.max_dimension,
            jpeg_quality: defaults.jpeg_quality,
            max_source_dimension: defaults.max_source_dimension,
        }
    }
}

impl ImageConfig {
    pub fn normalizer(&self) -> Result<NormalizerConfig> {
        if self.max_upload_bytes == 0 {
            return Err(AppError::ConfigError(
                "IMAGE_MAX_UPLOAD_BYTES must be positive".to_string(),
            ));
        }

        if self.max_dimension == 0 {
            return Err(AppError::ConfigError(
                "IMAGE_MAX_DIMENSION must be positive".to_string(),
            ));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(AppError::ConfigError(
                "IMAGE_JPEG_QUALITY must be between 1 and 100".to_string(),
            ));
        }

        if self.max_source_dimension < self.max_dimension {
            return Err(AppError::ConfigError(
                "IMAGE_MAX_SOURCE_DIMENSION must be at least IMAGE_MAX_DIMENSION".to_string(),
            ));
        }

        Ok(NormalizerConfig {
            max_upload_bytes: self.max_upload_bytes,
            max_dimension: self.max_dimension,
            jpeg_quality: self.jpeg_quality,
            max_source_dimension: self.max_source_dimension,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let image_defaults = ImageConfig::default();

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", 3000)?,
                max_body_size: parse_var("MAX_BODY_SIZE", 10_485_760)?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: parse_var("DB_MAX_CONNECTIONS", 20)?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("FRONTEND_URL")?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            images: ImageConfig {
                max_upload_bytes: parse_var(
                    "IMAGE_MAX_UPLOAD_BYTES",
                    image_defaults.max_upload_bytes,
                )?,
                max_dimension: parse_var("IMAGE_MAX_DIMENSION", image_defaults.max_dimension)?,
                jpeg_quality: parse_var("IMAGE_JPEG_QUALITY", image_defaults.jpeg_quality)?,
                max_source_dimension: parse_var(
                    "IMAGE_MAX_SOURCE_DIMENSION",
                    image_defaults.max_source_dimension,
                )?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::ConfigError(format!("Invalid {} value", name))),
        Err(_) => Ok(default),
    }
}
