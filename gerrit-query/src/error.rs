use thiserror::Error;

/// Broad classification of an [`Error`].
///
/// Lets callers tell "my query is wrong" apart from "I can't reach or
/// authenticate to the server" without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server rejected the query itself (HTTP 400).
    Query,
    /// Authentication, missing resource, unexpected status or transport failure.
    Connection,
    /// The response body could not be decoded.
    Parse,
    /// The client was configured with an unusable base URL.
    Config,
}

#[derive(Debug, Error)]
pub enum Error {
    // Query rejected by the server
    #[error("{url}: Bad request (400)")]
    Query { url: String },

    // Connection
    #[error("error connecting to \"{base_url}\": could not authenticate (401)")]
    Unauthorized { base_url: String },
    #[error("error connecting to \"{base_url}\": resource not found (404)")]
    NotFound { base_url: String },
    #[error("error connecting to \"{base_url}\"! ({status})")]
    Status { base_url: String, status: u16 },
    #[error("HTTP GET failed: {0}")]
    Transport(String),

    // Response decoding
    #[error("response body has no payload line after the XSSI prefix")]
    MissingPayload,
    #[error("result element {index} is not a JSON object")]
    NotAnObject { index: usize },
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    // Configuration
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Query { .. } => ErrorKind::Query,
            Error::Unauthorized { .. }
            | Error::NotFound { .. }
            | Error::Status { .. }
            | Error::Transport(_) => ErrorKind::Connection,
            Error::MissingPayload | Error::NotAnObject { .. } | Error::Serialization(_) => {
                ErrorKind::Parse
            }
            Error::InvalidUrl(_) => ErrorKind::Config,
        }
    }

    pub fn is_query_error(&self) -> bool {
        self.kind() == ErrorKind::Query
    }

    pub fn is_connection_error(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_are_connection_errors() {
        let base_url = "http://gerrit.example.com".to_string();
        let errors = [
            Error::Unauthorized {
                base_url: base_url.clone(),
            },
            Error::NotFound {
                base_url: base_url.clone(),
            },
            Error::Status {
                base_url,
                status: 501,
            },
            Error::Transport("connection refused".to_string()),
        ];

        for e in errors {
            assert!(e.is_connection_error(), "{e} should be a connection error");
            assert!(!e.is_query_error());
        }
    }

    #[test]
    fn test_bad_request_is_query_error() {
        let e = Error::Query {
            url: "http://gerrit.example.com/a/changes/?q=x".to_string(),
        };
        assert!(e.is_query_error());
        assert!(!e.is_connection_error());
        assert_eq!(
            e.to_string(),
            "http://gerrit.example.com/a/changes/?q=x: Bad request (400)"
        );
    }

    #[test]
    fn test_decoding_errors_are_parse_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        assert_eq!(Error::from(json_err).kind(), ErrorKind::Parse);
        assert_eq!(Error::MissingPayload.kind(), ErrorKind::Parse);
        assert_eq!(Error::NotAnObject { index: 3 }.kind(), ErrorKind::Parse);
    }
}
