// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! CORS tests: fixed frontend origins, `FRONTEND_URL`, credentials

use acl_risk_node::{
    api::http_server::{create_app, AppState},
    config::ServerConfig,
};
use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use tower::util::ServiceExt;

fn app(config: &ServerConfig) -> Router {
    create_app(AppState::unavailable("not needed"), config)
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/detect-base64")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

#[cfg(test)]
mod cors_tests {
    use super::*;

    #[tokio::test]
    async fn test_known_origin_allowed_with_credentials() {
        let response = app(&ServerConfig::default())
            .oneshot(preflight("http://localhost:5173"))
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
        assert!(headers
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("POST"));
    }

    #[tokio::test]
    async fn test_unknown_origin_not_allowed() {
        let response = app(&ServerConfig::default())
            .oneshot(preflight("https://evil.example"))
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_frontend_url_allowed() {
        let config = ServerConfig {
            frontend_url: Some("https://knees.example.app".to_string()),
            ..ServerConfig::default()
        };

        let response = app(&config)
            .oneshot(preflight("https://knees.example.app"))
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://knees.example.app"
        );
    }
}
