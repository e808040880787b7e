use crate::provider::LookupKind;

/// Why a query produced no result. Every variant ends the request.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Blank input. Callers treat this as "nothing to do".
    #[error("query is empty")]
    EmptyQuery,

    #[error("place not recognized: {0}")]
    PlaceNotFound(String),

    #[error("{kind} lookup failed: {cause:#}")]
    LookupFailed { kind: LookupKind, cause: anyhow::Error },
}

impl QueryError {
    /// Text safe to show to the person who typed the query. Lookup causes are
    /// kept out of it; they belong in the logs.
    pub fn user_message(&self) -> String {
        match self {
            QueryError::EmptyQuery => String::new(),
            QueryError::PlaceNotFound(place) => format!(
                "I'm not sure \"{place}\" is a place I know. Could you check the spelling or try a nearby city?"
            ),
            QueryError::LookupFailed { .. } => {
                "An error occurred while processing your request. Please try again.".to_string()
            }
        }
    }

    pub fn is_empty_query(&self) -> bool {
        matches!(self, QueryError::EmptyQuery)
    }
}
