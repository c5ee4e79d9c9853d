use serde::{Deserialize, Serialize};

/// Query string of `GET /gen_code`.
#[derive(Debug, Default, Deserialize)]
pub struct GenCodeParams {
    #[serde(default)]
    pub query: String,
}

/// Response payload for `/gen_code`.
#[derive(Debug, Serialize)]
pub struct GenCodeResponse {
    /// Cleaned code, without Markdown fences.
    pub code: String,
}
