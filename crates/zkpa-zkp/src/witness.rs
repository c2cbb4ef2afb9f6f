//! # Witness Bundle
//!
//! The sole artifact handed to the proving circuit. Field names, order and
//! widths are a compatibility contract:
//!
//! | Field                  | Encoding                         |
//! |------------------------|----------------------------------|
//! | `random_nonce`         | 31 bytes                         |
//! | `ecdh_scalar`          | field element (private)          |
//! | `camera_pubkey_x`      | 32 bytes                         |
//! | `camera_pubkey_y`      | 32 bytes                         |
//! | `camera_attestation`   | 64 bytes, compact `r \|\| s`     |
//! | `consortium_pubkey`    | 2 field elements                 |
//! | `identifier_deckey`    | 2 field elements                 |
//! | `authority_pubkey_x`   | 32 bytes                         |
//! | `authority_pubkey_y`   | 32 bytes                         |
//! | `authority_attestation`| 64 bytes, compact `r \|\| s`     |
//! | `image_hash`           | 32 bytes                         |
//! | `camera_identifier`    | 64 bytes                         |
//!
//! ## Formats
//!
//! - **JSON** and **Prover TOML**: byte fields as integer arrays, field
//!   elements as `0x`-prefixed 64-digit hex strings.
//! - **Noir literals**: one `name = [0xAB, ...]` line per field.
//!
//! Every format parses back through the same width checks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use zkpa_core::{
    hex_to_padded_array, AttestError, ImageDigest, Nonce, COORDINATE_LEN, DIGEST_LEN,
    IDENTIFIER_LEN, NONCE_LEN, SIGNATURE_LEN,
};
use zkpa_crypto::{
    agree, certificate_digest, decrypt_identifier, derive_symmetric_key, verify,
    CameraIdentifierPlaintext, EcdhPublicKey, EcdhScalar, EncryptedCameraIdentifier,
    KeeperKeyPair, KeeperPublicKey, SigningPublicKey,
};

/// Output rendering of a witness bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WitnessFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// Prover TOML for the circuit toolchain.
    Toml,
    /// Circuit byte-array literal lines.
    Noir,
}

impl std::str::FromStr for WitnessFormat {
    type Err = AttestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "noir" => Ok(Self::Noir),
            other => Err(AttestError::Witness(format!("unknown witness format: {other}"))),
        }
    }
}

/// All public and private inputs of one attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WitnessWire", try_from = "WitnessWire")]
pub struct WitnessBundle {
    pub random_nonce: Nonce,
    pub ecdh_scalar: EcdhScalar,
    pub camera_pubkey_x: [u8; COORDINATE_LEN],
    pub camera_pubkey_y: [u8; COORDINATE_LEN],
    pub camera_attestation: [u8; SIGNATURE_LEN],
    pub consortium_pubkey: KeeperPublicKey,
    pub identifier_deckey: EcdhPublicKey,
    pub authority_pubkey_x: [u8; COORDINATE_LEN],
    pub authority_pubkey_y: [u8; COORDINATE_LEN],
    pub authority_attestation: [u8; SIGNATURE_LEN],
    pub image_hash: ImageDigest,
    pub camera_identifier: EncryptedCameraIdentifier,
}

impl WitnessBundle {
    /// The camera public key carried in the bundle.
    pub fn camera_public_key(&self) -> Result<SigningPublicKey, AttestError> {
        SigningPublicKey::from_coordinates(&self.camera_pubkey_x, &self.camera_pubkey_y)
    }

    /// The authority public key carried in the bundle.
    pub fn authority_public_key(&self) -> Result<SigningPublicKey, AttestError> {
        SigningPublicKey::from_coordinates(&self.authority_pubkey_x, &self.authority_pubkey_y)
    }

    /// Check both signature tiers: the camera attestation over the image
    /// hash and the authority certificate over the camera key.
    pub fn verify_attestations(&self) -> Result<bool, AttestError> {
        let camera = self.camera_public_key()?;
        let authority = self.authority_public_key()?;
        let camera_ok = verify(&camera, self.image_hash.as_bytes(), &self.camera_attestation)?;
        let authority_ok = verify(
            &authority,
            &certificate_digest(&camera),
            &self.authority_attestation,
        )?;
        Ok(camera_ok && authority_ok)
    }

    /// Render in `format`.
    pub fn render(&self, format: WitnessFormat) -> Result<String, AttestError> {
        match format {
            WitnessFormat::Json => self.to_json(),
            WitnessFormat::Toml => self.to_prover_toml(),
            WitnessFormat::Noir => Ok(self.to_noir_literals()),
        }
    }

    /// Parse from `format`.
    pub fn parse(input: &str, format: WitnessFormat) -> Result<Self, AttestError> {
        match format {
            WitnessFormat::Json => Self::from_json(input),
            WitnessFormat::Toml => Self::from_prover_toml(input),
            WitnessFormat::Noir => Self::from_noir_literals(input),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, AttestError> {
        serde_json::to_string_pretty(&WitnessWire::from(self.clone()))
            .map_err(|e| AttestError::Witness(format!("JSON encoding failed: {e}")))
    }

    /// Parse JSON.
    pub fn from_json(input: &str) -> Result<Self, AttestError> {
        let wire: WitnessWire = serde_json::from_str(input)
            .map_err(|e| AttestError::Witness(format!("invalid witness JSON: {e}")))?;
        Self::try_from(wire)
    }

    /// Prover TOML.
    pub fn to_prover_toml(&self) -> Result<String, AttestError> {
        toml::to_string(&WitnessWire::from(self.clone()))
            .map_err(|e| AttestError::Witness(format!("TOML encoding failed: {e}")))
    }

    /// Parse Prover TOML.
    pub fn from_prover_toml(input: &str) -> Result<Self, AttestError> {
        let wire: WitnessWire = toml::from_str(input)
            .map_err(|e| AttestError::Witness(format!("invalid witness TOML: {e}")))?;
        Self::try_from(wire)
    }

    /// One `name = value` line per field, in contract order.
    pub fn to_noir_literals(&self) -> String {
        let wire = WitnessWire::from(self.clone());
        let bytes = |v: &[u8]| zkpa_core::noir_byte_array(v);
        let pair = |v: &[String]| format!("[{}]", v.join(", "));
        [
            format!("random_nonce = {}", bytes(&wire.random_nonce)),
            format!("ecdh_scalar = {}", wire.ecdh_scalar),
            format!("camera_pubkey_x = {}", bytes(&wire.camera_pubkey_x)),
            format!("camera_pubkey_y = {}", bytes(&wire.camera_pubkey_y)),
            format!("camera_attestation = {}", bytes(&wire.camera_attestation)),
            format!("consortium_pubkey = {}", pair(&wire.consortium_pubkey)),
            format!("identifier_deckey = {}", pair(&wire.identifier_deckey)),
            format!("authority_pubkey_x = {}", bytes(&wire.authority_pubkey_x)),
            format!("authority_pubkey_y = {}", bytes(&wire.authority_pubkey_y)),
            format!("authority_attestation = {}", bytes(&wire.authority_attestation)),
            format!("image_hash = {}", bytes(&wire.image_hash)),
            format!("camera_identifier = {}", bytes(&wire.camera_identifier)),
        ]
        .join("\n")
            + "\n"
    }

    /// Parse the literal listing produced by [`WitnessBundle::to_noir_literals`].
    /// Every field must appear exactly once.
    pub fn from_noir_literals(input: &str) -> Result<Self, AttestError> {
        let mut fields: HashMap<&str, Vec<&str>> = HashMap::new();
        for line in input.lines().map(str::trim) {
            if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
                continue;
            }
            let (name, value) = line
                .split_once('=')
                .ok_or_else(|| AttestError::Witness(format!("malformed line: {line}")))?;
            let value = value.trim();
            let items = match value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
                Some(list) => list
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .collect(),
                None => vec![value],
            };
            let name = name.trim();
            if fields.insert(name, items).is_some() {
                return Err(AttestError::Witness(format!("duplicate field {name}")));
            }
        }

        let take = |name: &str| {
            fields
                .get(name)
                .cloned()
                .ok_or_else(|| AttestError::Witness(format!("missing field {name}")))
        };
        let bytes = |name: &str| -> Result<Vec<u8>, AttestError> {
            take(name)?
                .into_iter()
                .map(|item| {
                    let digits = zkpa_core::encoding::strip_hex_prefix(item);
                    u8::from_str_radix(digits, 16)
                        .map_err(|_| AttestError::Witness(format!("{name}: bad byte {item}")))
                })
                .collect()
        };
        let elements = |name: &str| -> Result<Vec<String>, AttestError> {
            Ok(take(name)?.into_iter().map(str::to_owned).collect())
        };
        let scalar = take("ecdh_scalar")?;
        if scalar.len() != 1 {
            return Err(AttestError::Witness("ecdh_scalar must be a single value".into()));
        }

        Self::try_from(WitnessWire {
            random_nonce: bytes("random_nonce")?,
            ecdh_scalar: scalar[0].to_owned(),
            camera_pubkey_x: bytes("camera_pubkey_x")?,
            camera_pubkey_y: bytes("camera_pubkey_y")?,
            camera_attestation: bytes("camera_attestation")?,
            consortium_pubkey: elements("consortium_pubkey")?,
            identifier_deckey: elements("identifier_deckey")?,
            authority_pubkey_x: bytes("authority_pubkey_x")?,
            authority_pubkey_y: bytes("authority_pubkey_y")?,
            authority_attestation: bytes("authority_attestation")?,
            image_hash: bytes("image_hash")?,
            camera_identifier: bytes("camera_identifier")?,
        })
    }
}

/// Recover the camera identifier plaintext as the keeper.
///
/// Rebuilds the symmetric key from the keeper's scalar and the bundle's
/// `identifier_deckey`, then decrypts `camera_identifier`.
pub fn recover_identifier(
    keeper: &KeeperKeyPair,
    witness: &WitnessBundle,
) -> Result<CameraIdentifierPlaintext, AttestError> {
    let key = derive_symmetric_key(&agree(keeper.scalar(), &witness.identifier_deckey));
    decrypt_identifier(&witness.camera_identifier, &key)
}

// ─── Wire representation ─────────────────────────────────────────────────

/// Untyped wire form shared by the JSON and TOML encodings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WitnessWire {
    random_nonce: Vec<u8>,
    ecdh_scalar: String,
    camera_pubkey_x: Vec<u8>,
    camera_pubkey_y: Vec<u8>,
    camera_attestation: Vec<u8>,
    consortium_pubkey: Vec<String>,
    identifier_deckey: Vec<String>,
    authority_pubkey_x: Vec<u8>,
    authority_pubkey_y: Vec<u8>,
    authority_attestation: Vec<u8>,
    image_hash: Vec<u8>,
    camera_identifier: Vec<u8>,
}

impl From<WitnessBundle> for WitnessWire {
    fn from(w: WitnessBundle) -> Self {
        Self {
            random_nonce: w.random_nonce.as_bytes().to_vec(),
            ecdh_scalar: w.ecdh_scalar.to_field_hex(),
            camera_pubkey_x: w.camera_pubkey_x.to_vec(),
            camera_pubkey_y: w.camera_pubkey_y.to_vec(),
            camera_attestation: w.camera_attestation.to_vec(),
            consortium_pubkey: vec![w.consortium_pubkey.x_hex(), w.consortium_pubkey.y_hex()],
            identifier_deckey: vec![w.identifier_deckey.x_hex(), w.identifier_deckey.y_hex()],
            authority_pubkey_x: w.authority_pubkey_x.to_vec(),
            authority_pubkey_y: w.authority_pubkey_y.to_vec(),
            authority_attestation: w.authority_attestation.to_vec(),
            image_hash: w.image_hash.as_bytes().to_vec(),
            camera_identifier: w.camera_identifier.as_bytes().to_vec(),
        }
    }
}

fn fixed<const N: usize>(name: &str, v: Vec<u8>) -> Result<[u8; N], AttestError> {
    let len = v.len();
    v.try_into()
        .map_err(|_| AttestError::Witness(format!("{name}: expected {N} bytes, got {len}")))
}

fn point(name: &str, v: &[String]) -> Result<EcdhPublicKey, AttestError> {
    let [x, y] = v else {
        return Err(AttestError::Witness(format!(
            "{name}: expected 2 field elements, got {}",
            v.len()
        )));
    };
    let x: [u8; COORDINATE_LEN] = hex_to_padded_array(x)
        .map_err(|e| AttestError::Witness(format!("{name}: {e}")))?;
    let y: [u8; COORDINATE_LEN] = hex_to_padded_array(y)
        .map_err(|e| AttestError::Witness(format!("{name}: {e}")))?;
    EcdhPublicKey::from_coordinates(&x, &y)
}

impl TryFrom<WitnessWire> for WitnessBundle {
    type Error = AttestError;

    fn try_from(w: WitnessWire) -> Result<Self, Self::Error> {
        Ok(Self {
            random_nonce: Nonce::from_bytes(fixed::<NONCE_LEN>("random_nonce", w.random_nonce)?),
            ecdh_scalar: EcdhScalar::from_hex(&w.ecdh_scalar)
                .map_err(|e| AttestError::Witness(format!("ecdh_scalar: {e}")))?,
            camera_pubkey_x: fixed("camera_pubkey_x", w.camera_pubkey_x)?,
            camera_pubkey_y: fixed("camera_pubkey_y", w.camera_pubkey_y)?,
            camera_attestation: fixed("camera_attestation", w.camera_attestation)?,
            consortium_pubkey: point("consortium_pubkey", &w.consortium_pubkey)?,
            identifier_deckey: point("identifier_deckey", &w.identifier_deckey)?,
            authority_pubkey_x: fixed("authority_pubkey_x", w.authority_pubkey_x)?,
            authority_pubkey_y: fixed("authority_pubkey_y", w.authority_pubkey_y)?,
            authority_attestation: fixed("authority_attestation", w.authority_attestation)?,
            image_hash: ImageDigest::from_bytes(fixed::<DIGEST_LEN>("image_hash", w.image_hash)?),
            camera_identifier: EncryptedCameraIdentifier::from_bytes(fixed::<IDENTIFIER_LEN>(
                "camera_identifier",
                w.camera_identifier,
            )?),
        })
    }
}
