use serde::Deserialize;

/// Query string of `GET /query_well_arch_framework`.
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    /// Natural language question. Missing is treated as empty.
    #[serde(default)]
    pub query: String,
}
