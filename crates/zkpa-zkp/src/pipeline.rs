//! # Attestation Pipeline
//!
//! One attestation request as a typestate machine. Each state is a distinct
//! type carrying every prior output, so stages cannot be skipped or run out
//! of order.
//!
//! ```text
//! Start ──hash_image()──▶ ImageHashed ──sign_with_camera()──▶ CameraSigned
//!                                                                 │
//!                                                     certify_camera()
//!                                                                 ▼
//! WitnessAssembled ◀──assemble()── IdentifierEncrypted ◀──encrypt_identifier()── AuthorityCertified
//! ```
//!
//! Any stage error aborts the request and is returned verbatim. No partial
//! bundle escapes.
//!
//! ## Randomness
//!
//! The nonce and ECDH scalar are the only random inputs, and both are
//! arguments to [`Attestation::encrypt_identifier`]. Re-running with the same
//! image, nonce and scalar yields a byte-identical bundle.
//!
//! The following does not compile because `Attestation<Start>` has no
//! `certify_camera()`:
//!
//! ```compile_fail
//! use zkpa_zkp::pipeline::AttestationPipeline;
//! fn skip(p: &AttestationPipeline) {
//!     let _ = p.begin().certify_camera();
//! }
//! ```

use rand::RngCore;
use tracing::{debug, info};

use zkpa_core::{AttestError, ImageDigest, Nonce, NONCE_LEN};
use zkpa_crypto::{
    agree, certify, derive_symmetric_key, encrypt_identifier, hash_image, plaintext_for,
    Certificate, EcdhPublicKey, EcdhScalar, EncryptedCameraIdentifier, RecoverableSignature,
    SigningPublicKey,
};

use crate::config::PipelineConfig;
use crate::witness::WitnessBundle;

// ─── States ──────────────────────────────────────────────────────────────

/// Nothing computed yet.
#[derive(Debug)]
pub struct Start;

/// The canonical image digest is known.
#[derive(Debug)]
pub struct ImageHashed {
    image_hash: ImageDigest,
}

/// The camera has signed the digest.
#[derive(Debug)]
pub struct CameraSigned {
    prev: ImageHashed,
    camera_public_key: SigningPublicKey,
    camera_attestation: RecoverableSignature,
}

/// The authority has certified the camera key.
#[derive(Debug)]
pub struct AuthorityCertified {
    prev: CameraSigned,
    certificate: Certificate,
}

/// The camera identifier is encrypted for the keeper.
#[derive(Debug)]
pub struct IdentifierEncrypted {
    prev: AuthorityCertified,
    nonce: Nonce,
    ecdh_scalar: EcdhScalar,
    identifier_deckey: EcdhPublicKey,
    camera_identifier: EncryptedCameraIdentifier,
}

/// Terminal: the witness bundle is complete.
#[derive(Debug)]
pub struct WitnessAssembled {
    witness: WitnessBundle,
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Start {}
    impl Sealed for super::ImageHashed {}
    impl Sealed for super::CameraSigned {}
    impl Sealed for super::AuthorityCertified {}
    impl Sealed for super::IdentifierEncrypted {}
    impl Sealed for super::WitnessAssembled {}
}

/// Marker trait for pipeline stages. Sealed.
pub trait PipelineStage: private::Sealed + std::fmt::Debug {
    /// Stage name as it appears in logs.
    fn name() -> &'static str;
}

impl PipelineStage for Start {
    fn name() -> &'static str {
        "start"
    }
}
impl PipelineStage for ImageHashed {
    fn name() -> &'static str {
        "image_hashed"
    }
}
impl PipelineStage for CameraSigned {
    fn name() -> &'static str {
        "camera_signed"
    }
}
impl PipelineStage for AuthorityCertified {
    fn name() -> &'static str {
        "authority_certified"
    }
}
impl PipelineStage for IdentifierEncrypted {
    fn name() -> &'static str {
        "identifier_encrypted"
    }
}
impl PipelineStage for WitnessAssembled {
    fn name() -> &'static str {
        "witness_assembled"
    }
}

// ─── Pipeline ────────────────────────────────────────────────────────────

/// Long-lived pipeline holding read-only key material. Share it across
/// threads; each request gets its own [`Attestation`].
#[derive(Debug)]
pub struct AttestationPipeline {
    config: PipelineConfig,
}

impl AttestationPipeline {
    /// Build a pipeline from validated configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Start a new request.
    pub fn begin(&self) -> Attestation<'_, Start> {
        Attestation {
            pipeline: self,
            state: Start,
        }
    }

    /// Attest `image` with a fresh nonce and a scalar from the configured
    /// policy.
    pub fn attest(&self, image: &[u8]) -> Result<WitnessBundle, AttestError> {
        let scalar = self.config.scalar_policy.scalar_for_request();
        self.attest_with(image, random_nonce(), scalar)
    }

    /// Attest `image` with explicit randomness.
    pub fn attest_with(
        &self,
        image: &[u8],
        nonce: Nonce,
        ecdh_scalar: EcdhScalar,
    ) -> Result<WitnessBundle, AttestError> {
        let assembled = self
            .begin()
            .hash_image(image)?
            .sign_with_camera()?
            .certify_camera()?
            .encrypt_identifier(nonce, ecdh_scalar)?
            .assemble();
        Ok(assembled.into_witness())
    }
}

/// Draw a 31-byte nonce from the OS CSPRNG.
pub fn random_nonce() -> Nonce {
    let mut bytes = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    Nonce::from_bytes(bytes)
}

/// One in-flight attestation request.
#[derive(Debug)]
pub struct Attestation<'p, S: PipelineStage> {
    pipeline: &'p AttestationPipeline,
    state: S,
}

impl<S: PipelineStage> Attestation<'_, S> {
    /// Current stage name.
    pub fn stage(&self) -> &'static str {
        S::name()
    }

    /// Outputs accumulated so far.
    pub fn state(&self) -> &S {
        &self.state
    }
}

impl<'p> Attestation<'p, Start> {
    /// Decode and hash the image.
    pub fn hash_image(self, image: &[u8]) -> Result<Attestation<'p, ImageHashed>, AttestError> {
        let image_hash = hash_image(image)?;
        debug!(stage = ImageHashed::name(), digest = ?image_hash, "pipeline transition");
        Ok(Attestation {
            pipeline: self.pipeline,
            state: ImageHashed { image_hash },
        })
    }
}

impl<'p> Attestation<'p, ImageHashed> {
    /// Sign the digest with the camera key.
    pub fn sign_with_camera(self) -> Result<Attestation<'p, CameraSigned>, AttestError> {
        let camera = &self.pipeline.config.camera;
        let camera_attestation = camera.sign(self.state.image_hash.as_bytes())?;
        let camera_public_key = camera.public_key();
        debug!(stage = CameraSigned::name(), camera = ?camera_public_key, "pipeline transition");
        Ok(Attestation {
            pipeline: self.pipeline,
            state: CameraSigned {
                prev: self.state,
                camera_public_key,
                camera_attestation,
            },
        })
    }
}

impl<'p> Attestation<'p, CameraSigned> {
    /// Have the authority certify the camera public key.
    pub fn certify_camera(self) -> Result<Attestation<'p, AuthorityCertified>, AttestError> {
        let certificate = certify(&self.pipeline.config.authority, &self.state.camera_public_key)?;
        debug!(
            stage = AuthorityCertified::name(),
            authority = ?certificate.authority_public_key,
            "pipeline transition"
        );
        Ok(Attestation {
            pipeline: self.pipeline,
            state: AuthorityCertified {
                prev: self.state,
                certificate,
            },
        })
    }
}

impl<'p> Attestation<'p, AuthorityCertified> {
    /// Agree a key with the keeper and encrypt the camera identifier.
    pub fn encrypt_identifier(
        self,
        nonce: Nonce,
        ecdh_scalar: EcdhScalar,
    ) -> Result<Attestation<'p, IdentifierEncrypted>, AttestError> {
        let keeper = &self.pipeline.config.keeper;
        let key = derive_symmetric_key(&agree(&ecdh_scalar, keeper));
        let plaintext = plaintext_for(&nonce, &self.state.prev.camera_public_key);
        let camera_identifier = encrypt_identifier(&plaintext, &key)?;
        let identifier_deckey = ecdh_scalar.public_point();
        debug!(
            stage = IdentifierEncrypted::name(),
            deckey = ?identifier_deckey,
            "pipeline transition"
        );
        Ok(Attestation {
            pipeline: self.pipeline,
            state: IdentifierEncrypted {
                prev: self.state,
                nonce,
                ecdh_scalar,
                identifier_deckey,
                camera_identifier,
            },
        })
    }
}

impl<'p> Attestation<'p, IdentifierEncrypted> {
    /// Package every output into the witness bundle.
    pub fn assemble(self) -> Attestation<'p, WitnessAssembled> {
        let IdentifierEncrypted {
            prev: certified,
            nonce,
            ecdh_scalar,
            identifier_deckey,
            camera_identifier,
        } = self.state;
        let signed = certified.prev;
        let camera = &signed.camera_public_key;
        let authority = &certified.certificate.authority_public_key;

        let witness = WitnessBundle {
            random_nonce: nonce,
            ecdh_scalar,
            camera_pubkey_x: camera.x(),
            camera_pubkey_y: camera.y(),
            camera_attestation: signed.camera_attestation.to_compact(),
            consortium_pubkey: self.pipeline.config.keeper,
            identifier_deckey,
            authority_pubkey_x: authority.x(),
            authority_pubkey_y: authority.y(),
            authority_attestation: certified.certificate.signature.to_compact(),
            image_hash: signed.prev.image_hash,
            camera_identifier,
        };
        info!(
            stage = WitnessAssembled::name(),
            digest = ?witness.image_hash,
            "attestation witness assembled"
        );
        Attestation {
            pipeline: self.pipeline,
            state: WitnessAssembled { witness },
        }
    }
}

impl Attestation<'_, WitnessAssembled> {
    /// Borrow the finished bundle.
    pub fn witness(&self) -> &WitnessBundle {
        &self.state.witness
    }

    /// Take the finished bundle.
    pub fn into_witness(self) -> WitnessBundle {
        self.state.witness
    }
}

// ─── State accessors ─────────────────────────────────────────────────────

impl ImageHashed {
    /// Canonical image digest.
    pub fn image_hash(&self) -> &ImageDigest {
        &self.image_hash
    }
}

impl CameraSigned {
    /// Canonical image digest.
    pub fn image_hash(&self) -> &ImageDigest {
        &self.prev.image_hash
    }

    /// Camera signature over the digest.
    pub fn camera_attestation(&self) -> &RecoverableSignature {
        &self.camera_attestation
    }

    /// Camera public key.
    pub fn camera_public_key(&self) -> &SigningPublicKey {
        &self.camera_public_key
    }
}

impl AuthorityCertified {
    /// Authority certificate over the camera key.
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Camera public key.
    pub fn camera_public_key(&self) -> &SigningPublicKey {
        &self.prev.camera_public_key
    }
}

impl IdentifierEncrypted {
    /// Encrypted camera identifier.
    pub fn camera_identifier(&self) -> &EncryptedCameraIdentifier {
        &self.camera_identifier
    }

    /// Public point of the request's ECDH scalar.
    pub fn identifier_deckey(&self) -> &EcdhPublicKey {
        &self.identifier_deckey
    }
}
