use axum::http::HeaderMap;
use chrono::Utc;

/// `X-Request-Id` from the caller, or a fresh `req-<nanos>` id for log correlation.
pub fn request_id(headers: &HeaderMap) -> String {
    if let Some(v) = headers.get("X-Request-Id").and_then(|h| h.to_str().ok())
        && !v.trim().is_empty()
    {
        return v.to_string();
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    format!("req-{nanos}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn caller_id_wins() {
        let mut h = HeaderMap::new();
        h.insert("X-Request-Id", HeaderValue::from_static("abc-1"));
        assert_eq!(request_id(&h), "abc-1");
    }

    #[test]
    fn generated_when_missing() {
        assert!(request_id(&HeaderMap::new()).starts_with("req-"));
    }
}
