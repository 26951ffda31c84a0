//! Adapter layer: Convert Spotify DTOs and HTTP statuses to domain models
//!
//! This is the ONLY place where Spotify DTO types are converted to domain types.

use reqwest::StatusCode;

use super::dto;
use crate::migration::domain::{DestinationError, DestinationId, EntityKind};

/// Extract ranked destination ids from a search response.
///
/// A response without the page for the requested type is malformed.
pub fn to_destination_ids(
    response: dto::SearchResponse,
    kind: EntityKind,
) -> Result<Vec<DestinationId>, DestinationError> {
    let page = match kind {
        EntityKind::Track => response.tracks,
        EntityKind::Album => response.albums,
    };
    let page = page.ok_or_else(|| {
        DestinationError::Parse(format!(
            "search response has no '{}s' page",
            kind.as_search_type()
        ))
    })?;

    Ok(page
        .items
        .into_iter()
        .flatten()
        .filter_map(|item| item.uri)
        .map(DestinationId::new)
        .collect())
}

/// Classify a non-success HTTP response
pub fn classify_status(status: StatusCode, body: &str) -> DestinationError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return DestinationError::RateLimited;
    }
    if status.is_server_error() {
        return DestinationError::Server {
            status: status.as_u16(),
        };
    }

    let message = serde_json::from_str::<dto::ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            let snippet: String = body.chars().take(200).collect();
            if snippet.is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                snippet
            }
        });

    DestinationError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Map a transport-level reqwest failure
pub fn classify_transport(error: reqwest::Error) -> DestinationError {
    if error.is_timeout() {
        DestinationError::Network(format!("request timed out: {}", error))
    } else if error.is_builder() || error.is_redirect() {
        DestinationError::Request(error.to_string())
    } else if error.is_decode() {
        DestinationError::Parse(error.to_string())
    } else {
        DestinationError::Network(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(uri: Option<&str>) -> Option<dto::Item> {
        Some(dto::Item {
            id: None,
            uri: uri.map(String::from),
            name: None,
        })
    }

    #[test]
    fn test_track_ids_in_rank_order() {
        let response = dto::SearchResponse {
            tracks: Some(dto::Page {
                items: vec![item(Some("spotify:track:a")), None, item(None), item(Some("spotify:track:b"))],
                total: Some(4),
            }),
            albums: None,
        };

        let ids = to_destination_ids(response, EntityKind::Track).unwrap();

        assert_eq!(
            ids,
            vec![
                DestinationId::new("spotify:track:a"),
                DestinationId::new("spotify:track:b")
            ]
        );
    }

    #[test]
    fn test_missing_page_is_parse_error() {
        let response = dto::SearchResponse {
            tracks: Some(dto::Page {
                items: vec![],
                total: Some(0),
            }),
            albums: None,
        };

        let result = to_destination_ids(response, EntityKind::Album);

        assert!(matches!(result, Err(DestinationError::Parse(_))));
    }

    #[test]
    fn test_classify_rate_limit() {
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, ""),
            DestinationError::RateLimited
        ));
    }

    #[test]
    fn test_classify_server_error() {
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "<html>"),
            DestinationError::Server { status: 502 }
        ));
    }

    #[test]
    fn test_classify_api_error_uses_message() {
        let body = r#"{"error": {"status": 401, "message": "The access token expired"}}"#;
        match classify_status(StatusCode::UNAUTHORIZED, body) {
            DestinationError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "The access token expired");
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_builder_error_is_not_transient() {
        let error = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();

        let classified = classify_transport(error);

        assert!(matches!(classified, DestinationError::Request(_)));
        assert!(!classified.is_transient());
    }

    #[test]
    fn test_classify_api_error_without_body() {
        match classify_status(StatusCode::FORBIDDEN, "") {
            DestinationError::Api { message, .. } => assert_eq!(message, "Forbidden"),
            other => panic!("unexpected classification: {other:?}"),
        }
    }
}
