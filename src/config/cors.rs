use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

/// Any origin may call the API unless `allowed_origins` narrows it down.
pub fn create_cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(PREFLIGHT_MAX_AGE_SECS))
}

fn allow_origin(allowed_origins: Option<&str>) -> AllowOrigin {
    let origins = parse_origins(allowed_origins.unwrap_or_default());

    if origins.is_empty() {
        tracing::info!("CORS: allowing any origin");
        AllowOrigin::any()
    } else {
        tracing::info!("CORS: Configured with {} allowed origin(s)", origins.len());
        AllowOrigin::list(origins)
    }
}

/// Parses a comma-separated origin list. `*` stands for any origin and yields
/// an empty list.
fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    let entries: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .collect();
    if entries.contains(&"*") {
        return Vec::new();
    }

    entries
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => {
                tracing::debug!("CORS: Allowing origin: {}", origin);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_cors_layer() {
        let _any = create_cors_layer(None);
        let _listed = create_cors_layer(Some("http://localhost:3000"));
    }

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins(" http://localhost:3000, ,https://filas.example.com ");
        assert_eq!(
            origins,
            vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("https://filas.example.com"),
            ]
        );
    }

    #[test]
    fn test_wildcard_and_invalid_origins() {
        assert!(parse_origins("*").is_empty());
        assert!(parse_origins("http://localhost:3000,*").is_empty());
        assert!(parse_origins("").is_empty());
        assert!(parse_origins("bad\norigin").is_empty());
    }
}
