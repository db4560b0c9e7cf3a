use serde::Deserialize;

// -------------------------
// Query DTOs
// -------------------------

/// `POST /v1/events` query string.
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    pub hasty: Option<String>,
}

impl EventsQuery {
    /// Any non-empty value turns the flag on, `?hasty=false` included.
    /// A bare `?hasty` carries no value and leaves it off.
    pub fn is_hasty(&self) -> bool {
        self.hasty.as_deref().is_some_and(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::Uri};

    fn query(hasty: Option<&str>) -> EventsQuery {
        EventsQuery {
            hasty: hasty.map(str::to_string),
        }
    }

    #[test]
    fn hasty_flag_parsing() {
        assert!(!query(None).is_hasty());
        assert!(!query(Some("")).is_hasty());
        assert!(query(Some("true")).is_hasty());
        assert!(query(Some("1")).is_hasty());
        assert!(query(Some("false")).is_hasty());
        assert!(query(Some("0")).is_hasty());
    }

    #[test]
    fn hasty_flag_from_query_string() {
        let parse = |uri: &str| {
            let uri: Uri = uri.parse().unwrap();
            Query::<EventsQuery>::try_from_uri(&uri).unwrap().0.is_hasty()
        };
        assert!(!parse("/v1/events"));
        assert!(!parse("/v1/events?hasty"));
        assert!(!parse("/v1/events?hasty="));
        assert!(parse("/v1/events?hasty=true"));
        assert!(parse("/v1/events?hasty=0"));
    }
}
