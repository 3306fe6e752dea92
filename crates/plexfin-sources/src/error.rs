use reqwest::StatusCode;

/// Errors from the Plex and Jellyfin collaborators.
///
/// The reconciler cares about one thing here: whether a failed remote call is
/// worth retrying. Transport failures and server-side errors are transient;
/// everything else is not.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned {status} for {endpoint}")]
    Api {
        service: &'static str,
        status: StatusCode,
        endpoint: String,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unexpected(String),
}

impl SourceError {
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            SourceError::Api { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            SourceError::NotFound(_) | SourceError::Unexpected(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_retryability() {
        let transient = SourceError::Api {
            service: "jellyfin",
            status: StatusCode::BAD_GATEWAY,
            endpoint: "/Users".into(),
        };
        assert!(transient.is_retryable());

        let throttled = SourceError::Api {
            service: "jellyfin",
            status: StatusCode::TOO_MANY_REQUESTS,
            endpoint: "/Users".into(),
        };
        assert!(throttled.is_retryable());

        let permanent = SourceError::Api {
            service: "jellyfin",
            status: StatusCode::UNAUTHORIZED,
            endpoint: "/Users".into(),
        };
        assert!(!permanent.is_retryable());
    }

    #[test]
    fn test_not_found_is_not_retryable() {
        assert!(!SourceError::NotFound("no such user".into()).is_retryable());
    }
}
