use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Configuration error: {0}")]
	Configuration(String),
	#[error("Strategy {name} failed: {message}")]
	Strategy { name: String, message: String },
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Serialization error: {0}")]
	Serialization(String),
}

impl EngineError {
	pub fn code(&self) -> &str {
		match self {
			Self::Configuration(_) => "REC_CONFIGURATION",
			Self::Strategy { .. } => "REC_STRATEGY",
			Self::Io(_) => "REC_IO",
			Self::Serialization(_) => "REC_SERIALIZATION",
		}
	}
}
