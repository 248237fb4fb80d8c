// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /detect-base64 tests
//!
//! These tests verify that the endpoint:
//! - Accepts plain base64 and `data:` URL payloads
//! - Reports "no pose" as a successful, zeroed result
//! - Maps missing or undecodable images to 400
//! - Maps detector problems to 500 and slow processing to 504

use acl_risk_node::{
    api::http_server::{create_app, AppState},
    config::ServerConfig,
    vision::pose::{DetectorError, Landmark, LandmarkSet, PoseDetector, PoseLandmark},
};
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::RgbImage;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot`

// 1x1 white PNG
const WHITE_PIXEL_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVR4nGP4//8/AAX+Av4N70a4AAAAAElFTkSuQmCC";

/// Returns the same pose for every image
struct FixedPoseDetector(Option<LandmarkSet>);

impl PoseDetector for FixedPoseDetector {
    fn detect(&self, _image: &RgbImage) -> Result<Option<LandmarkSet>, DetectorError> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct FailingDetector;

impl PoseDetector for FailingDetector {
    fn detect(&self, _image: &RgbImage) -> Result<Option<LandmarkSet>, DetectorError> {
        Err(DetectorError::Inference("tensor shape mismatch".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

struct SlowDetector;

impl PoseDetector for SlowDetector {
    fn detect(&self, _image: &RgbImage) -> Result<Option<LandmarkSet>, DetectorError> {
        std::thread::sleep(Duration::from_millis(500));
        Ok(None)
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Left leg straight, right knee bent to a right angle
fn squat_pose() -> LandmarkSet {
    let mut landmarks = vec![Landmark::new(0.5, 0.1); PoseLandmark::COUNT];
    landmarks[PoseLandmark::LeftHip.index()] = Landmark::new(0.4, 0.3);
    landmarks[PoseLandmark::LeftKnee.index()] = Landmark::new(0.4, 0.5);
    landmarks[PoseLandmark::LeftAnkle.index()] = Landmark::new(0.4, 0.7);
    landmarks[PoseLandmark::RightHip.index()] = Landmark::new(0.6, 0.3);
    landmarks[PoseLandmark::RightKnee.index()] = Landmark::new(0.6, 0.5);
    landmarks[PoseLandmark::RightAnkle.index()] = Landmark::new(0.8, 0.5);
    LandmarkSet::new(landmarks)
}

fn app_with(detector: Arc<dyn PoseDetector>) -> Router {
    let state = AppState::with_detector(detector, Duration::from_secs(5));
    create_app(state, &ServerConfig::default())
}

async fn post_json(app: Router, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/detect-base64")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[cfg(test)]
mod detect_base64_tests {
    use super::*;

    /// White pixel, nobody in frame: success with zeroed scores
    #[tokio::test]
    async fn test_no_pose_returns_zeroed_result() {
        let app = app_with(Arc::new(FixedPoseDetector(None)));
        let body = json!({ "image": format!("data:image/png;base64,{}", WHITE_PIXEL_PNG_BASE64) });

        let (status, json) = post_json(app, body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["landmarks_detected"], false);
        assert!(json["left_knee_angle"].is_null());
        assert!(json["right_knee_angle"].is_null());
        assert!(json["average_knee_angle"].is_null());
        assert_eq!(json["left_acl_probability"], 0.0);
        assert_eq!(json["right_acl_probability"], 0.0);
        assert_eq!(json["average_acl_probability"], 0.0);

        let annotated = json["annotated_image"].as_str().unwrap();
        let encoded = annotated
            .strip_prefix("data:image/jpeg;base64,")
            .expect("annotated image should be a JPEG data URL");
        let jpeg = STANDARD.decode(encoded).unwrap();
        let decoded = image::load_from_memory_with_format(&jpeg, image::ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1, 1));
    }

    /// Payload without the data URL header is accepted as-is
    #[tokio::test]
    async fn test_plain_base64_accepted() {
        let app = app_with(Arc::new(FixedPoseDetector(None)));
        let body = json!({ "image": WHITE_PIXEL_PNG_BASE64 });

        let (status, json) = post_json(app, body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["landmarks_detected"], false);
    }

    #[tokio::test]
    async fn test_detected_pose_is_scored() {
        let app = app_with(Arc::new(FixedPoseDetector(Some(squat_pose()))));
        let body = json!({ "image": WHITE_PIXEL_PNG_BASE64 });

        let (status, json) = post_json(app, body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["landmarks_detected"], true);
        let left = json["left_knee_angle"].as_f64().unwrap();
        let right = json["right_knee_angle"].as_f64().unwrap();
        let average = json["average_knee_angle"].as_f64().unwrap();
        assert!((left - 180.0).abs() < 1e-4);
        assert!((right - 90.0).abs() < 1e-4);
        assert!((average - 135.0).abs() < 1e-4);

        assert_eq!(json["left_acl_probability"], 15.0);
        assert_eq!(json["right_acl_probability"], 15.0);
        assert_eq!(json["average_acl_probability"], 55.0);
    }

    /// `{}` has no image key
    #[tokio::test]
    async fn test_missing_image_returns_400() {
        let app = app_with(Arc::new(FixedPoseDetector(None)));

        let (status, json) = post_json(app, "{}".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["detail"], "No image provided");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let app = app_with(Arc::new(FixedPoseDetector(None)));

        let (status, json) = post_json(app, "{not json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["detail"].is_string());
    }

    #[tokio::test]
    async fn test_invalid_base64_returns_400() {
        let app = app_with(Arc::new(FixedPoseDetector(None)));
        let body = json!({ "image": "data:image/png;base64,@@not-base64@@" });

        let (status, json) = post_json(app, body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["detail"].as_str().unwrap().contains("Invalid image"));
    }

    /// Valid base64, but the bytes are not an image
    #[tokio::test]
    async fn test_non_image_payload_returns_400() {
        let app = app_with(Arc::new(FixedPoseDetector(None)));
        let body = json!({ "image": STANDARD.encode(b"hello, this is plain text") });

        let (status, _) = post_json(app, body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_detector_failure_returns_500() {
        let app = app_with(Arc::new(FailingDetector));
        let body = json!({ "image": WHITE_PIXEL_PNG_BASE64 });

        let (status, json) = post_json(app, body.to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["detail"]
            .as_str()
            .unwrap()
            .contains("tensor shape mismatch"));
    }

    #[tokio::test]
    async fn test_unavailable_detector_returns_500() {
        let app = create_app(
            AppState::unavailable("model download failed"),
            &ServerConfig::default(),
        );
        let body = json!({ "image": WHITE_PIXEL_PNG_BASE64 });

        let (status, json) = post_json(app, body.to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["detail"]
            .as_str()
            .unwrap()
            .contains("model download failed"));
    }

    #[tokio::test]
    async fn test_slow_detector_returns_504() {
        let state = AppState::with_detector(Arc::new(SlowDetector), Duration::from_millis(20));
        let app = create_app(state, &ServerConfig::default());
        let body = json!({ "image": WHITE_PIXEL_PNG_BASE64 });

        let (status, json) = post_json(app, body.to_string()).await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(json["detail"], "Request timed out");
    }

    #[tokio::test]
    async fn test_oversized_body_returns_413() {
        let state = AppState::with_detector(
            Arc::new(FixedPoseDetector(None)),
            Duration::from_secs(5),
        );
        let config = ServerConfig {
            max_upload_bytes: 64,
            ..ServerConfig::default()
        };
        let app = create_app(state, &config);
        let body = json!({ "image": "A".repeat(1024) });

        let (status, _) = post_json(app, body.to_string()).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
