use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("failed to enumerate devices: {0}")]
    DeviceEnumeration(String),

    #[error("failed to build stream: {0}")]
    StreamBuild(String),

    #[error("stream error: {0}")]
    StreamError(String),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open media file: {0}")]
    Open(#[from] std::io::Error),

    #[error("not a decodable audio file: {0}")]
    InvalidFormat(String),

    #[error("decoded stream contains no samples")]
    EmptyStream,
}

#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("recognizer initialization failed: {0}")]
    InitializationFailed(String),

    #[error("recognizer processing failed: {0}")]
    ProcessingFailed(String),

    #[error("recognizer engine not found: {0}")]
    EngineNotFound(String),
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("media backend failure: {0}")]
    Backend(String),
}
