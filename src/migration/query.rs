//! Query construction for destination search.
//!
//! Turns a [`SourceEntity`] into the search string the destination
//! understands. Pure: no I/O, no logging, same input gives the same query.

use super::domain::{EntityKind, Query, SourceEntity, UnresolvedReason};

/// Default case-insensitive marker for compilation artists ("Various Artists")
pub const DEFAULT_VARIOUS_ARTISTS_SENTINEL: &str = "various";

/// Builds destination search queries from source entities
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    various_artists_sentinel: String,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_VARIOUS_ARTISTS_SENTINEL)
    }
}

impl QueryBuilder {
    pub fn new(various_artists_sentinel: impl Into<String>) -> Self {
        Self {
            various_artists_sentinel: various_artists_sentinel.into().to_lowercase(),
        }
    }

    /// Build the query for an entity.
    ///
    /// Returns `Err(MetadataMissing)` when the fields the query needs are absent,
    /// so the entity never reaches the destination.
    pub fn build(&self, entity: &SourceEntity) -> Result<Query, UnresolvedReason> {
        let text = match entity.kind {
            EntityKind::Track => {
                let (Some(artist), Some(title)) = (present(&entity.artist), present(&entity.title))
                else {
                    return Err(UnresolvedReason::MetadataMissing);
                };
                format!("{} {}", artist, title)
            }
            EntityKind::Album => {
                let Some(title) = present(&entity.title) else {
                    return Err(UnresolvedReason::MetadataMissing);
                };
                let mut text = format!("album:\"{}\"", quoted_value(title));
                if let Some(artist) = present(&entity.artist)
                    && !self.is_various_artists(artist)
                {
                    text.push_str(&format!(" artist:\"{}\"", quoted_value(artist)));
                }
                text
            }
        };

        Ok(Query {
            text,
            kind: entity.kind,
        })
    }

    /// Compilation artists can't be matched against the real contributors,
    /// so they are left out of album queries.
    fn is_various_artists(&self, artist: &str) -> bool {
        !self.various_artists_sentinel.is_empty()
            && artist.to_lowercase().contains(&self.various_artists_sentinel)
    }
}

/// A field's trimmed value, or None if it is absent or blank
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Strip embedded double quotes so the value can't close its clause early
fn quoted_value(value: &str) -> String {
    value.replace('"', "").trim().to_string()
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arbitrary_field() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[a-zA-Z0-9 \"'&.-]{0,30}")
    }

    fn arbitrary_entity() -> impl Strategy<Value = SourceEntity> {
        (arbitrary_field(), arbitrary_field(), any::<bool>()).prop_map(|(title, artist, album)| {
            SourceEntity {
                id: "id".to_string(),
                title,
                artist,
                kind: if album { EntityKind::Album } else { EntityKind::Track },
            }
        })
    }

    proptest! {
        /// Building twice gives the same query
        #[test]
        fn build_is_idempotent(entity in arbitrary_entity()) {
            let builder = QueryBuilder::default();
            prop_assert_eq!(builder.build(&entity), builder.build(&entity));
        }

        /// Album queries always start with the album clause
        #[test]
        fn album_query_has_album_clause(title in "[a-zA-Z0-9 ]{1,30}", artist in arbitrary_field()) {
            prop_assume!(!title.trim().is_empty());
            let entity = SourceEntity { id: "a".into(), title: Some(title), artist, kind: EntityKind::Album };
            let query = QueryBuilder::default().build(&entity).unwrap();
            prop_assert!(query.text.starts_with("album:\""));
        }

        /// Anything containing the sentinel never produces an artist clause
        #[test]
        fn various_artists_never_constrained(prefix in "[a-z ]{0,10}", suffix in "[a-z ]{0,10}") {
            let artist = format!("{}VaRiOuS{}", prefix, suffix);
            let entity = SourceEntity::album("a", Some("Compilation"), Some(&artist));
            let query = QueryBuilder::default().build(&entity).unwrap();
            prop_assert!(!query.text.contains("artist:"));
        }

        /// Query kind always follows the entity kind
        #[test]
        fn query_kind_matches_entity(entity in arbitrary_entity()) {
            if let Ok(query) = QueryBuilder::default().build(&entity) {
                prop_assert_eq!(query.kind, entity.kind);
            }
        }
    }
}
