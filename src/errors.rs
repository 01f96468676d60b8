use std::fmt;

#[derive(Debug, Clone)]
pub enum ExporterError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    QueryFailed(String),
    RetriesExhausted(String),
    Config(String),
    Exposition(String),
    Io(String),
}

impl ExporterError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ExporterError::DatabaseConfig(_) => "E001",
            ExporterError::DatabaseConnection(_) => "E002",
            ExporterError::QueryFailed(_) => "E003",
            ExporterError::RetriesExhausted(_) => "E004",
            ExporterError::Config(_) => "E005",
            ExporterError::Exposition(_) => "E006",
            ExporterError::Io(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ExporterError::DatabaseConfig(_) => "Database Configuration Error",
            ExporterError::DatabaseConnection(_) => "Database Connection Error",
            ExporterError::QueryFailed(_) => "Query Failed",
            ExporterError::RetriesExhausted(_) => "Retries Exhausted",
            ExporterError::Config(_) => "Configuration Error",
            ExporterError::Exposition(_) => "Exposition Error",
            ExporterError::Io(_) => "I/O Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ExporterError::DatabaseConfig(msg)
            | ExporterError::DatabaseConnection(msg)
            | ExporterError::QueryFailed(msg)
            | ExporterError::RetriesExhausted(msg)
            | ExporterError::Config(msg)
            | ExporterError::Exposition(msg)
            | ExporterError::Io(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于启动失败）
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

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ExporterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ExporterError {}

// 便捷的构造函数
impl ExporterError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ExporterError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ExporterError::DatabaseConnection(msg.into())
    }

    pub fn query_failed<T: Into<String>>(msg: T) -> Self {
        ExporterError::QueryFailed(msg.into())
    }

    pub fn retries_exhausted<T: Into<String>>(msg: T) -> Self {
        ExporterError::RetriesExhausted(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ExporterError::Config(msg.into())
    }

    pub fn exposition<T: Into<String>>(msg: T) -> Self {
        ExporterError::Exposition(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        ExporterError::Io(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::sqlx::Error> for ExporterError {
    fn from(err: sea_orm::sqlx::Error) -> Self {
        use sea_orm::sqlx::Error;
        match err {
            Error::Configuration(e) => ExporterError::DatabaseConfig(e.to_string()),
            Error::Io(_) | Error::Tls(_) | Error::PoolTimedOut | Error::PoolClosed => {
                ExporterError::DatabaseConnection(err.to_string())
            }
            other => ExporterError::QueryFailed(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for ExporterError {
    fn from(err: config::ConfigError) -> Self {
        ExporterError::Config(err.to_string())
    }
}

impl From<prometheus::Error> for ExporterError {
    fn from(err: prometheus::Error) -> Self {
        ExporterError::Exposition(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
