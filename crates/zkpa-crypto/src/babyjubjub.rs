//! # BabyJubJub over the BN254 Scalar Field
//!
//! Twisted Edwards curve `a·x² + y² = 1 + d·x²·y²` over the BN254 scalar
//! field, which is the native field of the proving circuit. Point
//! arithmetic, on-curve and subgroup checks come from `ark-ec` through
//! [`BabyJubJubConfig`].
//!
//! Curve parameters are a closed enumeration ([`CurveParams`]) resolved at
//! construction time. There is no lookup by name.
//!
//! ## BabyJubJub
//!
//! - `a = 168700`, `d = 168696` (the iden3 form; `ark-ed-on-bn254` ships the
//!   `a = 1` rescaling, whose coordinates differ)
//! - Full group order `8·l`; keys live in the prime-order subgroup of order
//!   `l` generated by `Base8 = 8·G`.
//!
//! ## Scalar multiplication
//!
//! Every multiplication runs a Montgomery ladder over all limbs of the
//! scalar with a masked swap, so each bit costs one addition and one
//! doubling whatever its value. Scalars are always passed as full-width
//! [`ScalarField`] elements.

use ark_bn254::Fr as Fq;
use ark_ec::twisted_edwards::{Affine, MontCurveConfig, Projective, TECurveConfig};
use ark_ec::{CurveConfig, CurveGroup, Group};
use ark_ff::{BigInteger, MontFp, PrimeField, Zero};
use num_bigint::BigUint;

use zkpa_core::{AttestError, COORDINATE_LEN};

/// Scalar field of the prime-order subgroup (order `l`).
pub type ScalarField = ark_ed_on_bn254::Fr;

/// Affine BabyJubJub point.
pub type AffinePoint = Affine<BabyJubJubConfig>;

/// Extended projective BabyJubJub point.
pub type ProjectivePoint = Projective<BabyJubJubConfig>;

/// Supported twisted Edwards parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveParams {
    /// iden3 BabyJubJub, as used by the attestation circuit.
    BabyJubJub,
}

/// iden3 BabyJubJub parameters for `ark-ec`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BabyJubJubConfig;

/// Full-group generator `G`.
const BABYJUBJUB_GENERATOR: AffinePoint = AffinePoint::new_unchecked(
    MontFp!("995203441582195749578291179787384436505546430278305826713579947235728471134"),
    MontFp!("5472060717959818805561601436314318772137091100104008585924551046643952123905"),
);

/// `Base8 = 8·G`, generator of the prime-order subgroup.
const BABYJUBJUB_BASE8: AffinePoint = AffinePoint::new_unchecked(
    MontFp!("5299619240641551281634865583518297030282874472190772894086521144482721001553"),
    MontFp!("16950150798460657717958625567821834550301663161624707787222815936182638968203"),
);

impl CurveConfig for BabyJubJubConfig {
    type BaseField = Fq;
    type ScalarField = ScalarField;

    const COFACTOR: &'static [u64] = &[8];

    /// `8⁻¹ mod l`
    const COFACTOR_INV: ScalarField = MontFp!(
        "2394026564107420727433200628387514462817212225638746351800188703329891451411"
    );
}

impl TECurveConfig for BabyJubJubConfig {
    const COEFF_A: Fq = MontFp!("168700");
    const COEFF_D: Fq = MontFp!("168696");
    const GENERATOR: AffinePoint = BABYJUBJUB_BASE8;

    type MontCurveConfig = BabyJubJubConfig;

    fn mul_projective(base: &ProjectivePoint, scalar: &[u64]) -> ProjectivePoint {
        ladder(base, scalar)
    }

    fn mul_affine(base: &AffinePoint, scalar: &[u64]) -> ProjectivePoint {
        ladder(&ProjectivePoint::from(*base), scalar)
    }
}

impl MontCurveConfig for BabyJubJubConfig {
    /// `2·(a + d) / (a − d)`
    const COEFF_A: Fq = MontFp!("168698");
    /// `4 / (a − d)`
    const COEFF_B: Fq = MontFp!("1");

    type TECurveConfig = BabyJubJubConfig;
}

/// Montgomery ladder over every bit of `scalar`, most significant first.
fn ladder(base: &ProjectivePoint, scalar: &[u64]) -> ProjectivePoint {
    let mut r0 = ProjectivePoint::zero();
    let mut r1 = *base;
    for limb in scalar.iter().rev() {
        for i in (0..64).rev() {
            let mask = 0u64.wrapping_sub((limb >> i) & 1);
            conditional_swap(&mut r0, &mut r1, mask);
            r1 += &r0;
            r0.double_in_place();
            conditional_swap(&mut r0, &mut r1, mask);
        }
    }
    r0
}

/// Swap `a` and `b` when `mask` is all ones; leave both when it is zero.
fn conditional_swap(a: &mut ProjectivePoint, b: &mut ProjectivePoint, mask: u64) {
    swap_field(&mut a.x, &mut b.x, mask);
    swap_field(&mut a.y, &mut b.y, mask);
    swap_field(&mut a.t, &mut b.t, mask);
    swap_field(&mut a.z, &mut b.z, mask);
}

fn swap_field(a: &mut Fq, b: &mut Fq, mask: u64) {
    for (x, y) in a.0 .0.iter_mut().zip(b.0 .0.iter_mut()) {
        let t = (*x ^ *y) & mask;
        *x ^= t;
        *y ^= t;
    }
}

impl CurveParams {
    /// Materialize the arithmetic context for this parameter set.
    pub fn curve(self) -> TwistedEdwards {
        match self {
            Self::BabyJubJub => TwistedEdwards {
                params: self,
                generator: BABYJUBJUB_GENERATOR,
                base_point: BABYJUBJUB_BASE8,
                subgroup_order: BigUint::from_bytes_le(&ScalarField::MODULUS.to_bytes_le()),
            },
        }
    }
}

/// Fixed-width coordinate encoding for affine points.
pub trait CoordinateBytes: Sized {
    /// Build a point from big-endian coordinates, rejecting values that are
    /// not canonical field elements. Curve membership is not checked here.
    fn from_be_bytes(
        x: &[u8; COORDINATE_LEN],
        y: &[u8; COORDINATE_LEN],
    ) -> Result<Self, AttestError>;

    /// Big-endian X coordinate.
    fn x_be_bytes(&self) -> [u8; COORDINATE_LEN];

    /// Big-endian Y coordinate.
    fn y_be_bytes(&self) -> [u8; COORDINATE_LEN];
}

impl CoordinateBytes for AffinePoint {
    fn from_be_bytes(
        x: &[u8; COORDINATE_LEN],
        y: &[u8; COORDINATE_LEN],
    ) -> Result<Self, AttestError> {
        Ok(AffinePoint::new_unchecked(
            field_from_be_bytes(x, "x")?,
            field_from_be_bytes(y, "y")?,
        ))
    }

    fn x_be_bytes(&self) -> [u8; COORDINATE_LEN] {
        field_to_be_bytes(&self.x)
    }

    fn y_be_bytes(&self) -> [u8; COORDINATE_LEN] {
        field_to_be_bytes(&self.y)
    }
}

/// Arithmetic context for one parameter set.
#[derive(Debug, Clone)]
pub struct TwistedEdwards {
    params: CurveParams,
    generator: AffinePoint,
    base_point: AffinePoint,
    subgroup_order: BigUint,
}

impl TwistedEdwards {
    /// The parameter set this context was built from.
    pub fn params(&self) -> CurveParams {
        self.params
    }

    /// Full-group generator `G`.
    pub fn generator(&self) -> AffinePoint {
        self.generator
    }

    /// Prime-order subgroup generator (`Base8` for BabyJubJub).
    pub fn base_point(&self) -> AffinePoint {
        self.base_point
    }

    /// Order `l` of the prime-order subgroup.
    pub fn subgroup_order(&self) -> &BigUint {
        &self.subgroup_order
    }

    /// Whether `p` satisfies the curve equation.
    pub fn is_on_curve(&self, p: &AffinePoint) -> bool {
        p.is_on_curve()
    }

    /// Whether `p` lies in the prime-order subgroup (`l·p = O`). Assumes `p`
    /// is on the curve.
    pub fn is_in_subgroup(&self, p: &AffinePoint) -> bool {
        p.is_in_correct_subgroup_assuming_on_curve()
    }

    /// Point addition.
    pub fn add(&self, p: &AffinePoint, q: &AffinePoint) -> AffinePoint {
        (ProjectivePoint::from(*p) + ProjectivePoint::from(*q)).into_affine()
    }

    /// `k · p`.
    pub fn mul(&self, p: &AffinePoint, k: &ScalarField) -> AffinePoint {
        ProjectivePoint::from(*p)
            .mul_bigint(k.into_bigint())
            .into_affine()
    }

    /// `k · base_point`.
    pub fn mul_base(&self, k: &ScalarField) -> AffinePoint {
        self.mul(&self.base_point, k)
    }
}

/// Parse a canonical big-endian field element.
pub fn field_from_be_bytes(bytes: &[u8; COORDINATE_LEN], label: &str) -> Result<Fq, AttestError> {
    let value = BigUint::from_bytes_be(bytes);
    let modulus = BigUint::from_bytes_le(&Fq::MODULUS.to_bytes_le());
    if value >= modulus {
        return Err(AttestError::InvalidPoint(format!(
            "{label} coordinate is not below the field modulus"
        )));
    }
    Ok(Fq::from_be_bytes_mod_order(bytes))
}

/// Serialize a field element as 32 big-endian bytes.
pub fn field_to_be_bytes(f: &Fq) -> [u8; COORDINATE_LEN] {
    let mut out = [0u8; COORDINATE_LEN];
    let le = f.into_bigint().to_bytes_le();
    for (i, b) in le.iter().take(COORDINATE_LEN).enumerate() {
        out[COORDINATE_LEN - 1 - i] = *b;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> TwistedEdwards {
        CurveParams::BabyJubJub.curve()
    }

    fn scalar(k: u64) -> ScalarField {
        ScalarField::from(k)
    }

    /// `k · p` by repeated addition.
    fn repeated_add(c: &TwistedEdwards, p: &AffinePoint, k: u32) -> AffinePoint {
        (0..k).fold(AffinePoint::zero(), |acc, _| c.add(&acc, p))
    }

    #[test]
    fn generators_are_on_curve() {
        let c = curve();
        assert!(c.is_on_curve(&c.generator()));
        assert!(c.is_on_curve(&c.base_point()));
        assert!(c.is_on_curve(&AffinePoint::zero()));
    }

    #[test]
    fn config_generator_is_base8() {
        assert_eq!(BabyJubJubConfig::GENERATOR, curve().base_point());
    }

    #[test]
    fn base8_is_eight_times_generator() {
        let c = curve();
        assert_eq!(c.mul(&c.generator(), &scalar(8)), c.base_point());
        assert_eq!(repeated_add(&c, &c.generator(), 8), c.base_point());
    }

    #[test]
    fn base_point_has_prime_order() {
        let c = curve();
        assert!(c.is_in_subgroup(&c.base_point()));
        assert!(!c.is_in_subgroup(&c.generator()));
    }

    #[test]
    fn identity_is_neutral() {
        let c = curve();
        let b = c.base_point();
        assert_eq!(c.add(&b, &AffinePoint::zero()), b);
        assert!(c.mul(&b, &scalar(0)).is_zero());
        assert_eq!(c.mul(&b, &scalar(1)), b);
    }

    #[test]
    fn ladder_matches_repeated_addition() {
        let c = curve();
        let b = c.base_point();
        for k in [2u32, 3, 5, 7, 16, 31] {
            assert_eq!(c.mul(&b, &scalar(k.into())), repeated_add(&c, &b, k), "k = {k}");
        }
    }

    #[test]
    fn scalar_mul_distributes() {
        let c = curve();
        let b = c.base_point();
        let lhs = c.mul(&b, &scalar(5));
        let rhs = c.add(&c.mul(&b, &scalar(2)), &c.mul(&b, &scalar(3)));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn order_minus_one_negates() {
        // l - 1 has almost every bit set; (l - 1)·B = -B.
        let c = curve();
        let b = c.base_point();
        let dense = c.mul(&b, &-scalar(1));
        assert_eq!(dense, -b);
        assert!(c.add(&dense, &b).is_zero());
    }

    #[test]
    fn known_public_key() {
        // 0x10203040506 · Base8
        let c = curve();
        let p = c.mul_base(&scalar(0x0102_0304_0506));
        assert_eq!(
            hex::encode(p.x_be_bytes()),
            "022a76889006b3268357bc86a0737304d518aa2d6556b495442f092bb1a6c132"
        );
        assert_eq!(
            hex::encode(p.y_be_bytes()),
            "076d4453fe98427afe1ee6153c17917ccae7050fbcd87cde21088b4bd6f56b11"
        );
    }

    #[test]
    fn subgroup_order_matches_scalar_field() {
        assert_eq!(
            hex::encode(curve().subgroup_order().to_bytes_be()),
            "60c89ce5c263405370a08b6d0302b0bab3eedb83920ee0a677297dc392126f1"
        );
    }

    #[test]
    fn coordinate_range_is_enforced() {
        let too_big = [0xffu8; 32];
        assert!(matches!(
            AffinePoint::from_be_bytes(&too_big, &[0u8; 32]),
            Err(AttestError::InvalidPoint(_))
        ));
        let modulus = BigUint::from_bytes_le(&Fq::MODULUS.to_bytes_le());
        let mut bytes = [0u8; 32];
        let be = modulus.to_bytes_be();
        bytes[32 - be.len()..].copy_from_slice(&be);
        assert!(field_from_be_bytes(&bytes, "x").is_err());
    }

    #[test]
    fn field_bytes_roundtrip() {
        let c = curve();
        let b = c.base_point();
        let back = AffinePoint::from_be_bytes(&b.x_be_bytes(), &b.y_be_bytes()).unwrap();
        assert_eq!(back, b);
    }
}
