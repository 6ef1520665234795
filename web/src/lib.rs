use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use log::*;
use tower_http::cors::CorsLayer;

pub use self::error::{Error, Result};
pub(crate) use service::AppState;

mod controller;
mod error;
mod extractors;
mod params;
pub mod router;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;
    let server_url = format!("{host}:{port}");

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::DELETE, Method::GET, Method::OPTIONS, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(allowed_origins(&app_state.config.allowed_origins));

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    info!("Server starting... listening for connections on http://{server_url}");

    axum::serve(listener, router::define_routes(app_state).layer(cors_layer)).await
}

/// Origins that fail to parse as header values are skipped with a warning.
fn allowed_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid allowed origin {origin:?}: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_origins_skips_unparseable_values() {
        let origins = vec![
            "http://localhost:3000".to_string(),
            "bad\norigin".to_string(),
            " https://localhost:3000 ".to_string(),
        ];

        let parsed = allowed_origins(&origins);

        assert_eq!(
            parsed,
            vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("https://localhost:3000"),
            ]
        );
    }
}
