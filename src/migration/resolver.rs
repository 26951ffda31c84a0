//! Match resolution against the destination catalog.
//!
//! Always takes the top-ranked search hit. There is no secondary scoring,
//! tie-break, or confidence threshold.

use super::domain::{DestinationError, MatchResult, Query, UnresolvedReason};
use super::traits::DestinationCatalog;

/// Number of search results requested per query
pub const SEARCH_LIMIT: u32 = 1;

/// Resolves queries to destination identifiers
pub struct MatchResolver<'a> {
    destination: &'a dyn DestinationCatalog,
}

impl<'a> MatchResolver<'a> {
    pub fn new(destination: &'a dyn DestinationCatalog) -> Self {
        Self { destination }
    }

    /// Search for the query and classify the outcome.
    ///
    /// Transient destination errors become `Unresolved(DestinationError)` and
    /// are not retried. Any other error is returned and should abort the run.
    pub async fn resolve(&self, query: &Query) -> Result<MatchResult, DestinationError> {
        tracing::debug!("Searching {}: {}", query.kind.as_search_type(), query.text);

        match self.destination.search(query, SEARCH_LIMIT).await {
            Ok(hits) => Ok(match hits.into_iter().next() {
                Some(destination_id) => {
                    tracing::debug!("Matched {} -> {}", query.text, destination_id);
                    MatchResult::Resolved { destination_id }
                }
                None => MatchResult::Unresolved {
                    reason: UnresolvedReason::NoSearchResults,
                },
            }),
            Err(e) if e.is_transient() => {
                tracing::warn!("Search failed for '{}', skipping: {}", query.text, e);
                Ok(MatchResult::Unresolved {
                    reason: UnresolvedReason::DestinationError,
                })
            }
            Err(e) => Err(e),
        }
    }
}
