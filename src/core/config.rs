use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::shared::constants::{DEFAULT_DAILY_REPORT_LIMIT, MAX_PHOTO_SIZE};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub swagger: SwaggerConfig,
    pub photo: PhotoConfig,
    pub mirror: MirrorConfig,
    pub feed: FeedConfig,
    pub risk: RiskConfig,
    pub submission: SubmissionConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
    /// Use the first `X-Forwarded-For` hop as submitter identity (behind a trusted proxy)
    pub trust_forwarded_for: bool,
}

/// Which primary report store backend to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Present only for the postgres backend
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Where report photos are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoBackend {
    /// MinIO/S3 bucket, reference is a public URL
    Minio,
    /// Inline `data:` URI persisted with the report
    Inline,
    /// Photos are validated, then dropped
    Disabled,
}

#[derive(Debug, Clone)]
pub struct PhotoConfig {
    pub backend: PhotoBackend,
    pub max_photo_size: usize,
    pub upload_retries: u32,
    pub upload_timeout: Duration,
    /// Present only for the minio backend
    pub minio: Option<MinIOConfig>,
}

/// MinIO/S3 storage configuration for report photos
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Public endpoint URL for publicly accessible files (optional, defaults to endpoint)
    pub public_endpoint: String,
    /// Access key for authentication
    pub access_key: String,
    /// Secret key for authentication
    pub secret_key: String,
    /// Bucket name for storing files
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
    /// Prefix for public files (e.g., "public")
    pub public_prefix: String,
}

/// Secondary durable log (spreadsheet webhook)
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Unset disables mirroring
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout: Duration,
    pub retries: u32,
    pub log_assessments: bool,
}

/// Realtime environmental readings collaborator
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Unset means the dashboard is unavailable
    pub url: Option<String>,
    pub timeout: Duration,
    pub default_temp_min: f64,
    pub default_temp_max: f64,
}

#[derive(Debug, Clone)]
pub struct RiskConfig {
    pub ann_weights_path: Option<PathBuf>,
    pub rainfall_maxima: Vec<f64>,
    pub water_level_maxima: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    pub daily_report_limit: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            store: StoreConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            photo: PhotoConfig::from_env()?,
            mirror: MirrorConfig::from_env()?,
            feed: FeedConfig::from_env()?,
            risk: RiskConfig::from_env()?,
            submission: SubmissionConfig::from_env()?,
        })
    }
}

fn parse_bool(name: &str, default: bool) -> Result<bool, String> {
    match env::var(name) {
        Ok(v) => match v.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => Err(format!("{} must be a boolean, got '{}'", name, other)),
        },
        Err(_) => Ok(default),
    }
}

/// Parse a comma-separated list of numbers
pub fn parse_f64_list(raw: &str) -> Result<Vec<f64>, String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| format!("'{}' is not a valid number", s))
        })
        .collect()
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        let trust_forwarded_for = parse_bool("TRUST_FORWARDED_FOR", false)?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
            trust_forwarded_for,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, String> {
        let backend = match env::var("REPORT_STORE")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => {
                return Err(format!(
                    "REPORT_STORE must be 'postgres' or 'memory', got '{}'",
                    other
                ))
            }
        };

        let database = match backend {
            StoreBackend::Postgres => Some(DatabaseConfig::from_env()?),
            StoreBackend::Memory => None,
        };

        Ok(Self { backend, database })
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Siaga Banjir API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Community flood reporting and early-warning API".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl PhotoConfig {
    const DEFAULT_MAX_PHOTO_SIZE: usize = MAX_PHOTO_SIZE;
    const DEFAULT_UPLOAD_RETRIES: u32 = 2;
    const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 15;

    pub fn from_env() -> Result<Self, String> {
        let backend = match env::var("PHOTO_STORE")
            .unwrap_or_else(|_| "minio".to_string())
            .to_lowercase()
            .as_str()
        {
            "minio" => PhotoBackend::Minio,
            "inline" => PhotoBackend::Inline,
            "none" => PhotoBackend::Disabled,
            other => {
                return Err(format!(
                    "PHOTO_STORE must be 'minio', 'inline' or 'none', got '{}'",
                    other
                ))
            }
        };

        let max_photo_size = env::var("MAX_PHOTO_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_PHOTO_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_PHOTO_SIZE must be a valid number".to_string())?;

        let upload_retries = env::var("PHOTO_UPLOAD_RETRIES")
            .unwrap_or_else(|_| Self::DEFAULT_UPLOAD_RETRIES.to_string())
            .parse::<u32>()
            .map_err(|_| "PHOTO_UPLOAD_RETRIES must be a valid number".to_string())?;

        let upload_timeout_secs = env::var("PHOTO_UPLOAD_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_UPLOAD_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "PHOTO_UPLOAD_TIMEOUT_SECS must be a valid number".to_string())?;

        let minio = match backend {
            PhotoBackend::Minio => Some(MinIOConfig::from_env()?),
            _ => None,
        };

        Ok(Self {
            backend,
            max_photo_size,
            upload_retries,
            upload_timeout: Duration::from_secs(upload_timeout_secs),
            minio,
        })
    }
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            backend: PhotoBackend::Inline,
            max_photo_size: Self::DEFAULT_MAX_PHOTO_SIZE,
            upload_retries: Self::DEFAULT_UPLOAD_RETRIES,
            upload_timeout: Duration::from_secs(Self::DEFAULT_UPLOAD_TIMEOUT_SECS),
            minio: None,
        }
    }
}

impl MinIOConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint =
            env::var("MINIO_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        // Public endpoint defaults to the main endpoint if not specified
        let public_endpoint =
            env::var("MINIO_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        let access_key = env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let secret_key = env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let bucket = env::var("MINIO_BUCKET").unwrap_or_else(|_| "siaga-banjir-photos".to_string());

        let region = env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let public_prefix =
            env::var("MINIO_PUBLIC_PREFIX").unwrap_or_else(|_| "public".to_string());

        Ok(Self {
            endpoint,
            public_endpoint,
            access_key,
            secret_key,
            bucket,
            region,
            public_prefix,
        })
    }
}

impl MirrorConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_RETRIES: u32 = 2;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("MIRROR_URL").ok().filter(|s| !s.is_empty());
        let token = env::var("MIRROR_TOKEN").ok().filter(|s| !s.is_empty());

        let timeout_secs = env::var("MIRROR_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "MIRROR_TIMEOUT_SECS must be a valid number".to_string())?;

        let retries = env::var("MIRROR_RETRIES")
            .unwrap_or_else(|_| Self::DEFAULT_RETRIES.to_string())
            .parse::<u32>()
            .map_err(|_| "MIRROR_RETRIES must be a valid number".to_string())?;

        let log_assessments = parse_bool("MIRROR_LOG_ASSESSMENTS", false)?;

        Ok(Self {
            url,
            token,
            timeout: Duration::from_secs(timeout_secs),
            retries,
            log_assessments,
        })
    }
}

impl FeedConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 10;
    const DEFAULT_TEMP_MIN: f64 = 24.0;
    const DEFAULT_TEMP_MAX: f64 = 32.0;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("READINGS_URL").ok().filter(|s| !s.is_empty());

        let timeout_secs = env::var("READINGS_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "READINGS_TIMEOUT_SECS must be a valid number".to_string())?;

        let default_temp_min = env::var("DEFAULT_TEMP_MIN")
            .unwrap_or_else(|_| Self::DEFAULT_TEMP_MIN.to_string())
            .parse::<f64>()
            .map_err(|_| "DEFAULT_TEMP_MIN must be a valid number".to_string())?;

        let default_temp_max = env::var("DEFAULT_TEMP_MAX")
            .unwrap_or_else(|_| Self::DEFAULT_TEMP_MAX.to_string())
            .parse::<f64>()
            .map_err(|_| "DEFAULT_TEMP_MAX must be a valid number".to_string())?;

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
            default_temp_min,
            default_temp_max,
        })
    }
}

impl RiskConfig {
    /// Annual maximum daily rainfall (mm) used when none is configured
    pub const DEFAULT_RAINFALL_MAXIMA: &'static [f64] = &[
        112.0, 138.5, 97.0, 151.2, 128.4, 176.0, 104.6, 143.0, 131.8, 189.5,
    ];
    /// Annual maximum water level (site datum) used when none is configured
    pub const DEFAULT_WATER_LEVEL_MAXIMA: &'static [f64] = &[
        118.0, 124.5, 109.0, 131.0, 121.5, 139.0, 114.0, 127.5, 134.0, 144.5,
    ];

    pub fn from_env() -> Result<Self, String> {
        let ann_weights_path = env::var("RISK_ANN_WEIGHTS_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let rainfall_maxima = match env::var("GUMBEL_RAINFALL_MAXIMA") {
            Ok(raw) => parse_f64_list(&raw)
                .map_err(|e| format!("GUMBEL_RAINFALL_MAXIMA: {}", e))?,
            Err(_) => Self::DEFAULT_RAINFALL_MAXIMA.to_vec(),
        };

        let water_level_maxima = match env::var("GUMBEL_WATER_LEVEL_MAXIMA") {
            Ok(raw) => parse_f64_list(&raw)
                .map_err(|e| format!("GUMBEL_WATER_LEVEL_MAXIMA: {}", e))?,
            Err(_) => Self::DEFAULT_WATER_LEVEL_MAXIMA.to_vec(),
        };

        Ok(Self {
            ann_weights_path,
            rainfall_maxima,
            water_level_maxima,
        })
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            ann_weights_path: None,
            rainfall_maxima: Self::DEFAULT_RAINFALL_MAXIMA.to_vec(),
            water_level_maxima: Self::DEFAULT_WATER_LEVEL_MAXIMA.to_vec(),
        }
    }
}

impl SubmissionConfig {
    const DEFAULT_DAILY_REPORT_LIMIT: i64 = DEFAULT_DAILY_REPORT_LIMIT;

    pub fn from_env() -> Result<Self, String> {
        let daily_report_limit = env::var("DAILY_REPORT_LIMIT")
            .unwrap_or_else(|_| Self::DEFAULT_DAILY_REPORT_LIMIT.to_string())
            .parse::<i64>()
            .map_err(|_| "DAILY_REPORT_LIMIT must be a valid number".to_string())?;

        if daily_report_limit < 1 {
            return Err("DAILY_REPORT_LIMIT must be at least 1".to_string());
        }

        Ok(Self { daily_report_limit })
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            daily_report_limit: Self::DEFAULT_DAILY_REPORT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64_list() {
        assert_eq!(
            parse_f64_list("1.5, 2,3 ,").unwrap(),
            vec![1.5, 2.0, 3.0]
        );
        assert!(parse_f64_list("1, abc").is_err());
        assert!(parse_f64_list("").unwrap().is_empty());
    }

    #[test]
    fn test_default_maxima_are_fit_for_gumbel() {
        let config = RiskConfig::default();
        assert!(config.rainfall_maxima.len() >= 2);
        assert!(config.water_level_maxima.len() >= 2);
    }
}
