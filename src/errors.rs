use std::fmt;

#[derive(Debug, Clone)]
pub enum IpGeoError {
    CacheConnection(String),
    DuplicateCache(String),
    NotFound(String),
    Validation(String),
    Serialization(String),
    RemoteApi(String),
    Configuration(String),
}

impl IpGeoError {
    pub fn code(&self) -> &'static str {
        match self {
            IpGeoError::CacheConnection(_) => "E001",
            IpGeoError::DuplicateCache(_) => "E002",
            IpGeoError::NotFound(_) => "E003",
            IpGeoError::Validation(_) => "E004",
            IpGeoError::Serialization(_) => "E005",
            IpGeoError::RemoteApi(_) => "E006",
            IpGeoError::Configuration(_) => "E007",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            IpGeoError::CacheConnection(_) => "Cache Connection Error",
            IpGeoError::DuplicateCache(_) => "Duplicate Cache Registration",
            IpGeoError::NotFound(_) => "Resource Not Found",
            IpGeoError::Validation(_) => "Validation Error",
            IpGeoError::Serialization(_) => "Serialization Error",
            IpGeoError::RemoteApi(_) => "Remote API Error",
            IpGeoError::Configuration(_) => "Configuration Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            IpGeoError::CacheConnection(msg) => msg,
            IpGeoError::DuplicateCache(msg) => msg,
            IpGeoError::NotFound(msg) => msg,
            IpGeoError::Validation(msg) => msg,
            IpGeoError::Serialization(msg) => msg,
            IpGeoError::RemoteApi(msg) => msg,
            IpGeoError::Configuration(msg) => msg,
        }
    }

    /// Colored output for startup failures on a terminal.
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for IpGeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for IpGeoError {}

impl IpGeoError {
    pub fn cache_connection<T: Into<String>>(msg: T) -> Self {
        IpGeoError::CacheConnection(msg.into())
    }

    pub fn duplicate_cache<T: Into<String>>(msg: T) -> Self {
        IpGeoError::DuplicateCache(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        IpGeoError::NotFound(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        IpGeoError::Validation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        IpGeoError::Serialization(msg.into())
    }

    pub fn remote_api<T: Into<String>>(msg: T) -> Self {
        IpGeoError::RemoteApi(msg.into())
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        IpGeoError::Configuration(msg.into())
    }
}

impl From<redis::RedisError> for IpGeoError {
    fn from(err: redis::RedisError) -> Self {
        IpGeoError::CacheConnection(err.to_string())
    }
}

impl From<serde_json::Error> for IpGeoError {
    fn from(err: serde_json::Error) -> Self {
        IpGeoError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IpGeoError>;
