use serde::{Deserialize, Serialize};

/// Caller-selected backend for turning extracted text into embeddings.
///
/// Serialized as `"openai"` / `"local"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingsProvider {
    OpenAi,
    Local,
}

impl EmbeddingsProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingsProvider::OpenAi => "openai",
            EmbeddingsProvider::Local => "local",
        }
    }
}

impl std::fmt::Display for EmbeddingsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EmbeddingsProvider {
    type Err = crate::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(EmbeddingsProvider::OpenAi),
            "local" => Ok(EmbeddingsProvider::Local),
            other => Err(crate::AppError::Validation(format!(
                "Unknown embeddings provider: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_round_trip() {
        assert_eq!(
            serde_json::to_string(&EmbeddingsProvider::OpenAi).unwrap(),
            "\"openai\""
        );
        assert_eq!(
            serde_json::to_string(&EmbeddingsProvider::Local).unwrap(),
            "\"local\""
        );
        assert_eq!(
            "openai".parse::<EmbeddingsProvider>().unwrap(),
            EmbeddingsProvider::OpenAi
        );
        assert!("voyage".parse::<EmbeddingsProvider>().is_err());
    }
}
