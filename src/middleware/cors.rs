//! CORS policy for the storefront origins.

use anyhow::{Context, Result};
use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Credentialed CORS restricted to `origins`.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_configured_origins() {
        let origins = vec![
            "http://localhost:5173".to_string(),
            "https://shop.example.com".to_string(),
        ];
        assert!(cors_layer(&origins).is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_garbage_origin() {
        let origins = vec!["http://ok.example".to_string(), "bad\norigin".to_string()];
        assert!(cors_layer(&origins).is_err());
    }
}
