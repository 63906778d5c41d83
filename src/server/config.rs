use super::RequestsLoggingLevel;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: u16,
    pub bind_address: String,
    pub frontend_dir_path: Option<String>,
    /// Upper bound for multipart request bodies.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8000,
            metrics_port: 9091,
            bind_address: "0.0.0.0".to_string(),
            frontend_dir_path: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}
