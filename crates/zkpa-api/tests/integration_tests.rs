//! # Integration Tests for zkpa-api
//!
//! Health probes, multipart witness generation and hashing, and the error
//! body contract for bad uploads.

use std::io::Cursor;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tower::ServiceExt;

use zkpa_api::{AppConfig, AppState};
use zkpa_crypto::{EcdhScalar, KeeperKeyPair, SignatureAuthority};
use zkpa_zkp::{recover_identifier, PipelineConfig, ScalarPolicy, WitnessBundle};

const CAMERA_KEY: &str = "ec28f3b5e71d85971df7edbf06ae04f2ec28f3b5e71d85971df7edbf06ae04f2";
const AUTHORITY_KEY: &str = "ec28f06ae04f2ec6ae04f228f3b5e71d85971df7edbf0f3b5e71d85971df7edb";
const KEEPER_SCALAR: &str = "0x10203040506";
const BOUNDARY: &str = "zkpa-test-boundary";

fn keeper() -> KeeperKeyPair {
    KeeperKeyPair::from_scalar_hex(KEEPER_SCALAR).unwrap()
}

fn pipeline_config(scalar_policy: ScalarPolicy) -> PipelineConfig {
    PipelineConfig {
        camera: SignatureAuthority::from_hex(CAMERA_KEY).unwrap(),
        authority: SignatureAuthority::from_hex(AUTHORITY_KEY).unwrap(),
        keeper: *keeper().public_key(),
        scalar_policy,
    }
}

/// Helper: build the test app with ephemeral ECDH scalars.
fn test_app() -> axum::Router {
    zkpa_api::app(AppState::new(pipeline_config(ScalarPolicy::Ephemeral)))
}

fn one_pixel_png() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([0x12, 0x34, 0x56])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Helper: a multipart/form-data body with one file field.
fn multipart_body(field: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"photo.png\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload(uri: &str, field: &str, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, bytes)))
        .unwrap()
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health/readiness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Hash ---------------------------------------------------------------------

#[tokio::test]
async fn test_hash_returns_canonical_digest() {
    let response = test_app()
        .oneshot(upload("/v1/hash", "image", &one_pixel_png()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let expected = blake3::hash(b"P6\n1 1\n255\n\x12\x34\x56");
    assert_eq!(json["hash_hex"], expected.to_hex().as_str());
    let literal = json["hash_byte_array"].as_str().unwrap();
    assert!(literal.starts_with("[0x"));
    assert_eq!(literal.matches("0x").count(), 32);
}

#[tokio::test]
async fn test_hash_undecodable_image_is_422() {
    let response = test_app()
        .oneshot(upload("/v1/hash", "image", b"definitely not an image"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["code"], "DECODE_ERROR");
}

// -- Witness ------------------------------------------------------------------

#[tokio::test]
async fn test_witness_round_trips_to_keeper() {
    let response = test_app()
        .oneshot(upload("/v1/witness", "image", &one_pixel_png()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let witness = WitnessBundle::from_json(&body_string(response).await).unwrap();
    assert!(witness.verify_attestations().unwrap());
    assert_eq!(
        witness.image_hash.as_bytes(),
        blake3::hash(b"P6\n1 1\n255\n\x12\x34\x56").as_bytes()
    );

    let plaintext = recover_identifier(&keeper(), &witness).unwrap();
    assert_eq!(plaintext.nonce(), witness.random_nonce);
    assert_eq!(
        plaintext.camera_public_key().unwrap(),
        witness.camera_public_key().unwrap()
    );
}

#[tokio::test]
async fn test_witness_requests_use_fresh_nonces() {
    let app = test_app();
    let first = app
        .clone()
        .oneshot(upload("/v1/witness", "image", &one_pixel_png()))
        .await
        .unwrap();
    let second = app
        .oneshot(upload("/v1/witness", "image", &one_pixel_png()))
        .await
        .unwrap();
    let a = WitnessBundle::from_json(&body_string(first).await).unwrap();
    let b = WitnessBundle::from_json(&body_string(second).await).unwrap();
    assert_eq!(a.image_hash, b.image_hash);
    assert_ne!(a.random_nonce, b.random_nonce);
    assert_ne!(a.camera_identifier, b.camera_identifier);
}

#[tokio::test]
async fn test_witness_fixed_scalar_policy() {
    let scalar = EcdhScalar::from_hex("0x3f9e36da67670ab97e60c2d6138e7049b79e64ef").unwrap();
    let app = zkpa_api::app(AppState::new(pipeline_config(ScalarPolicy::Fixed(
        scalar.clone(),
    ))));
    let response = app
        .oneshot(upload("/v1/witness", "image", &one_pixel_png()))
        .await
        .unwrap();
    let witness = WitnessBundle::from_json(&body_string(response).await).unwrap();
    assert_eq!(witness.ecdh_scalar, scalar);
    assert_eq!(witness.identifier_deckey, scalar.public_point());
}

#[tokio::test]
async fn test_witness_missing_image_field_is_400() {
    let response = test_app()
        .oneshot(upload("/v1/witness", "photo", &one_pixel_png()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "MISSING_FIELD");
    assert_eq!(json["error"]["details"]["field"], "image");
}

#[tokio::test]
async fn test_witness_non_multipart_is_400() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/witness")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_body_limit_rejects_oversized_upload() {
    let config = AppConfig {
        body_limit: 1024,
        ..AppConfig::default()
    };
    let app = zkpa_api::app(AppState::with_config(
        pipeline_config(ScalarPolicy::Ephemeral),
        config,
    ));
    let response = app
        .oneshot(upload("/v1/hash", "image", &vec![0u8; 4096]))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/v1/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
