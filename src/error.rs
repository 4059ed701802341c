use thiserror::Error;

// ---------------------------------------------------------------------------
// Per-file pipeline errors
// ---------------------------------------------------------------------------

/// Errors raised while sweeping a single file.
///
/// None of these abort a batch: the file card shows the message and the
/// remaining files keep going. The type is `Clone` because the last result of
/// every stage is cached in the session and redrawn each frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    #[error("Unsupported file type: .{extension} ({file})")]
    UnsupportedFormat { file: String, extension: String },

    #[error("Error reading {file}: {reason}")]
    Decode { file: String, reason: String },

    #[error("Error in conversion of {file}: {reason}")]
    Encode { file: String, reason: String },
}

impl SweepError {
    /// Wrap an `anyhow` context chain as a decode failure.
    pub fn decode(file: &str, err: anyhow::Error) -> Self {
        SweepError::Decode {
            file: file.to_string(),
            reason: format!("{err:#}"),
        }
    }

    /// Wrap an `anyhow` context chain as an encode failure.
    pub fn encode(file: &str, err: anyhow::Error) -> Self {
        SweepError::Encode {
            file: file.to_string(),
            reason: format!("{err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn decode_keeps_context_chain() {
        let inner: anyhow::Result<()> = Err(anyhow::anyhow!("bad quote"));
        let err = inner.context("CSV row 3").unwrap_err();
        let sweep = SweepError::decode("data.csv", err);
        assert_eq!(
            sweep.to_string(),
            "Error reading data.csv: CSV row 3: bad quote"
        );
    }

    #[test]
    fn unsupported_message_names_extension() {
        let err = SweepError::UnsupportedFormat {
            file: "data.txt".into(),
            extension: "txt".into(),
        };
        assert_eq!(err.to_string(), "Unsupported file type: .txt (data.txt)");
    }
}
