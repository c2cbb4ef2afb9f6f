//! # End-to-End Attestation Tests
//!
//! Drives the full pipeline with the fixed camera, authority and keeper keys
//! and a one-pixel image, then checks the bundle from the keeper's side:
//!
//! 1. `image_hash` equals BLAKE3 over the PPM stream computed here by hand.
//! 2. Both signature tiers verify.
//! 3. `camera_identifier` decrypts under the keeper's reciprocal ECDH key to
//!    `nonce || parity_byte || camera_pubkey_x`, and matches the
//!    independently computed ciphertext.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use zkpa_core::{AttestError, Nonce};
use zkpa_crypto::{EcdhScalar, KeeperKeyPair, SignatureAuthority};
use zkpa_zkp::{
    recover_identifier, AttestationPipeline, PipelineConfig, ScalarPolicy, WitnessBundle,
    WitnessFormat,
};

const CAMERA_KEY: &str = "ec28f3b5e71d85971df7edbf06ae04f2ec28f3b5e71d85971df7edbf06ae04f2";
const AUTHORITY_KEY: &str = "ec28f06ae04f2ec6ae04f228f3b5e71d85971df7edbf0f3b5e71d85971df7edb";
const KEEPER_SCALAR: &str = "0x10203040506";
const ECDH_SCALAR: &str = "0x3f9e36da67670ab97e60c2d6138e7049b79e64ef";
const NONCE: &str = "14e50ec35ddee0bd40134da8023249c715231924cc3cfd3cdd950715ebb9d5";

/// AES-128-ECB of `NONCE || 02 || camera_x` under the agreed key, computed
/// outside this workspace.
const EXPECTED_IDENTIFIER: &str = "c389ec60a5d1ab3b1b1cff43b386d9c21f8f5431dc2c251c89b1f9f588683280\
                                   3823f847d7d7a00e13fa1b64d269838cec1fe3c42fe0f86338b05e89271cd5a6";

fn keeper() -> KeeperKeyPair {
    KeeperKeyPair::from_scalar_hex(KEEPER_SCALAR).expect("keeper scalar")
}

fn pipeline(scalar_policy: ScalarPolicy) -> AttestationPipeline {
    AttestationPipeline::new(PipelineConfig {
        camera: SignatureAuthority::from_hex(CAMERA_KEY).expect("camera key"),
        authority: SignatureAuthority::from_hex(AUTHORITY_KEY).expect("authority key"),
        keeper: *keeper().public_key(),
        scalar_policy,
    })
}

fn one_pixel_png() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([0x12, 0x34, 0x56])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).expect("encode png");
    buf.into_inner()
}

fn fixed_run() -> WitnessBundle {
    pipeline(ScalarPolicy::Ephemeral)
        .attest_with(
            &one_pixel_png(),
            Nonce::from_hex(NONCE).expect("nonce"),
            EcdhScalar::from_hex(ECDH_SCALAR).expect("scalar"),
        )
        .expect("attestation")
}

#[test]
fn image_hash_is_blake3_of_ppm() {
    let w = fixed_run();
    let expected = blake3::hash(b"P6\n1 1\n255\n\x12\x34\x56");
    assert_eq!(w.image_hash.as_bytes(), expected.as_bytes());
}

#[test]
fn both_signature_tiers_verify() {
    let w = fixed_run();
    assert!(w.verify_attestations().expect("well-formed signatures"));
    assert_eq!(
        hex::encode(w.camera_pubkey_x),
        "ac638f14181f3ad336a2c4979eef36389c56f3101f5bea57f9f79f8ab5e2776d"
    );
    assert_eq!(
        hex::encode(w.authority_pubkey_x),
        "a38c57dba62c3c6732da00fe336f4b28c0797a39b7ce737a1ae6c69060dfeee4"
    );
}

#[test]
fn tampered_image_hash_fails_verification() {
    let mut w = fixed_run();
    let mut bytes = *w.image_hash.as_bytes();
    bytes[0] ^= 1;
    w.image_hash = zkpa_core::ImageDigest::from_bytes(bytes);
    assert!(!w.verify_attestations().expect("well-formed signatures"));
}

#[test]
fn identifier_matches_reference_ciphertext() {
    let w = fixed_run();
    assert_eq!(w.camera_identifier.to_hex(), EXPECTED_IDENTIFIER);
    assert_eq!(
        w.identifier_deckey.x_hex(),
        "0x255679baf28978b9b98db6c36283b709233c7acedc7db13e0b475a1710be1352"
    );
}

#[test]
fn keeper_recovers_camera_identity() {
    let w = fixed_run();
    let plaintext = recover_identifier(&keeper(), &w).expect("recovery");
    assert_eq!(plaintext.nonce().to_hex(), NONCE);
    assert_eq!(plaintext.parity_byte(), 0x02);
    assert_eq!(plaintext.camera_pubkey_x(), w.camera_pubkey_x);
    assert_eq!(
        plaintext.camera_public_key().expect("embedded key"),
        w.camera_public_key().expect("bundle key")
    );
}

#[test]
fn wrong_keeper_cannot_recover() {
    let w = fixed_run();
    let stranger = KeeperKeyPair::from_scalar_hex("0x1234").expect("scalar");
    let plaintext = recover_identifier(&stranger, &w).expect("decrypts to noise");
    assert_ne!(plaintext.camera_pubkey_x(), w.camera_pubkey_x);
}

#[test]
fn rerun_is_byte_identical() {
    let a = fixed_run();
    let b = fixed_run();
    for format in [WitnessFormat::Json, WitnessFormat::Toml, WitnessFormat::Noir] {
        assert_eq!(
            a.render(format).expect("render"),
            b.render(format).expect("render")
        );
    }
}

#[test]
fn fixed_policy_reuses_scalar() {
    let scalar = EcdhScalar::from_hex(ECDH_SCALAR).expect("scalar");
    let p = pipeline(ScalarPolicy::Fixed(scalar.clone()));
    let w = p.attest(&one_pixel_png()).expect("attestation");
    assert_eq!(w.ecdh_scalar, scalar);
    assert_eq!(w.identifier_deckey, scalar.public_point());
    assert_eq!(recover_identifier(&keeper(), &w).expect("recovery").camera_pubkey_x(), w.camera_pubkey_x);
}

#[test]
fn json_bundle_survives_a_round_trip_to_the_keeper() {
    let json = fixed_run().to_json().expect("json");
    let parsed = WitnessBundle::from_json(&json).expect("parse");
    let plaintext = recover_identifier(&keeper(), &parsed).expect("recovery");
    assert_eq!(plaintext.nonce().to_hex(), NONCE);
}

#[test]
fn empty_image_is_a_decode_error() {
    let err = pipeline(ScalarPolicy::Ephemeral)
        .attest(&[])
        .expect_err("empty input");
    assert!(matches!(err, AttestError::Decode(_)));
}

#[test]
fn concurrent_requests_share_one_pipeline() {
    let p = std::sync::Arc::new(pipeline(ScalarPolicy::Ephemeral));
    let image = std::sync::Arc::new(one_pixel_png());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let p = p.clone();
            let image = image.clone();
            std::thread::spawn(move || p.attest(&image).expect("attestation"))
        })
        .collect();
    let bundles: Vec<WitnessBundle> = handles
        .into_iter()
        .map(|h| h.join().expect("thread"))
        .collect();
    for w in &bundles {
        assert_eq!(
            recover_identifier(&keeper(), w).expect("recovery").camera_pubkey_x(),
            w.camera_pubkey_x
        );
    }
    assert_ne!(bundles[0].random_nonce, bundles[1].random_nonce);
}
