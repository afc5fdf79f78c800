use thiserror::Error;

/// Errors raised while handling one skill request.
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("no handler found for request '{request_type}'")]
    NoHandler { request_type: String },

    #[error("prompt '{0}' is missing from the locale catalog")]
    MissingPrompt(String),

    #[error("prompt catalog has not been loaded for this request")]
    PromptsUnavailable,

    #[error("slot '{0}' has no value")]
    MissingSlot(String),

    #[error("request carries no user identity")]
    MissingUser,

    #[error(transparent)]
    Locale(#[from] LocaleError),

    #[error("persistence error: {0}")]
    Persistence(#[from] RepositoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("handler '{handler}' panicked: {message}")]
    HandlerPanic { handler: String, message: String },
}

impl SkillError {
    /// Dispatch failures are surfaced to the host instead of being apologized for.
    pub fn is_dispatch_failure(&self) -> bool {
        matches!(self, SkillError::NoHandler { .. })
    }
}

/// Errors loading a locale prompt file.
#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("locale file not found: {path}")]
    NotFound { path: String },

    #[error("failed to read locale file {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid locale file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("no prompts available for locale '{locale}' (also tried '{base}')")]
    Unavailable { locale: String, base: String },
}

/// Errors loading required configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load .env file: {0}")]
    Dotenv(String),

    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("required configuration value '{0}' is missing")]
    Missing(String),
}

/// Errors from persistence backends (used by the adapter port in voxskill-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}
