//! Prime field arithmetic for BN254
//!
//! Both BN254 fields share one limb engine: 4 x 64-bit limbs (little-endian
//! limb order), schoolbook multiplication and a fold-based 512-bit reduction.
//! Elements carry their modulus in the type, so a scalar-field value can never
//! be fed into base-field arithmetic by accident.

use core::fmt;
use core::hash::Hash;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

extern crate alloc;
use alloc::vec::Vec;

/// Compile-time parameters of a prime field.
pub trait FieldParams: 'static + Copy + Eq + Hash + fmt::Debug {
    /// The modulus p, little-endian limbs
    const MODULUS: [u64; 4];
    /// 2^256 mod p, used to fold the high half of a 512-bit product
    const TWO_256_MOD: [u64; 4];
    /// Short name used in debug output
    const NAME: &'static str;
}

/// BN254 scalar field (r): constraint-system arithmetic, challenges, evaluations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScalarField;

/// BN254 base field (q): curve-point coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BaseField;

impl FieldParams for ScalarField {
    /// r = 21888242871839275222246405745257275088548364400416034343698204186575808495617
    const MODULUS: [u64; 4] = [
        0x43e1f593f0000001,
        0x2833e84879b97091,
        0xb85045b68181585d,
        0x30644e72e131a029,
    ];
    const TWO_256_MOD: [u64; 4] = [
        0xac96341c4ffffffb,
        0x36fc76959f60cd29,
        0x666ea36f7879462e,
        0x0e0a77c19a07df2f,
    ];
    const NAME: &'static str = "Fr";
}

impl FieldParams for BaseField {
    /// q = 21888242871839275222246405745257275088696311157297823662689037894645226208583
    const MODULUS: [u64; 4] = [
        0x3c208c16d87cfd47,
        0x97816a916871ca8d,
        0xb85045b68181585d,
        0x30644e72e131a029,
    ];
    const TWO_256_MOD: [u64; 4] = [
        0xd35d438dc58f0d9d,
        0x0a78eb28f5c70b3d,
        0x666ea36f7879462c,
        0x0e0a77c19a07df2f,
    ];
    const NAME: &'static str = "Fq";
}

/// An element of the prime field described by `P`, always kept in [0, p).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement<P: FieldParams> {
    limbs: [u64; 4],
    _field: PhantomData<P>,
}

/// Scalar field element
pub type Fr = FieldElement<ScalarField>;

/// Base field element
pub type Fq = FieldElement<BaseField>;

impl<P: FieldParams> FieldElement<P> {
    pub const ZERO: Self = Self::from_canonical_limbs([0, 0, 0, 0]);
    pub const ONE: Self = Self::from_canonical_limbs([1, 0, 0, 0]);

    /// Build an element from limbs already known to be below the modulus.
    /// Only meant for constants.
    pub const fn from_canonical_limbs(limbs: [u64; 4]) -> Self {
        Self {
            limbs,
            _field: PhantomData,
        }
    }

    pub fn from_u64(val: u64) -> Self {
        // Every u64 is below either BN254 modulus
        Self::from_canonical_limbs([val, 0, 0, 0])
    }

    /// Parse a 32-byte big-endian value, rejecting anything >= p.
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let limbs = be_bytes_to_limbs(bytes);
        if gte(&limbs, &P::MODULUS) {
            return None;
        }
        Some(Self::from_canonical_limbs(limbs))
    }

    /// Interpret 32 big-endian bytes as an integer and reduce it mod p.
    /// Used for hash outputs; a 256-bit value is at most ~5.8 * p.
    pub fn from_be_bytes_reduced(bytes: &[u8; 32]) -> Self {
        let mut limbs = be_bytes_to_limbs(bytes);
        while gte(&limbs, &P::MODULUS) {
            limbs = sub_no_borrow(&limbs, &P::MODULUS);
        }
        Self::from_canonical_limbs(limbs)
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        limbs_to_be_bytes(&self.limbs)
    }

    pub fn limbs(&self) -> &[u64; 4] {
        &self.limbs
    }

    pub fn is_zero(&self) -> bool {
        self.limbs == [0, 0, 0, 0]
    }

    pub fn double(&self) -> Self {
        *self + *self
    }

    pub fn square(&self) -> Self {
        *self * *self
    }

    /// self^exp, exponent as little-endian limbs
    pub fn pow(&self, exp: &[u64; 4]) -> Self {
        Self::from_canonical_limbs(pow_mod::<P>(&self.limbs, exp))
    }

    pub fn pow_u64(&self, exp: u64) -> Self {
        self.pow(&[exp, 0, 0, 0])
    }

    /// Multiplicative inverse via Fermat's little theorem: a^(p-2).
    /// Returns None for zero.
    pub fn inverse(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        let p_minus_2 = sub_no_borrow(&P::MODULUS, &[2, 0, 0, 0]);
        Some(self.pow(&p_minus_2))
    }
}

impl<P: FieldParams> Default for FieldElement<P> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<P: FieldParams> fmt::Debug for FieldElement<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x", P::NAME)?;
        for byte in self.to_be_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl<P: FieldParams> Add for FieldElement<P> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_canonical_limbs(add_mod::<P>(&self.limbs, &rhs.limbs))
    }
}

impl<P: FieldParams> Sub for FieldElement<P> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_canonical_limbs(sub_mod::<P>(&self.limbs, &rhs.limbs))
    }
}

impl<P: FieldParams> Mul for FieldElement<P> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_canonical_limbs(mul_mod_wide::<P>(&self.limbs, &rhs.limbs))
    }
}

impl<P: FieldParams> Neg for FieldElement<P> {
    type Output = Self;

    fn neg(self) -> Self {
        if self.is_zero() {
            return self;
        }
        Self::from_canonical_limbs(sub_no_borrow(&P::MODULUS, &self.limbs))
    }
}

impl<P: FieldParams> AddAssign for FieldElement<P> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<P: FieldParams> SubAssign for FieldElement<P> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<P: FieldParams> MulAssign for FieldElement<P> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

/// Invert every element of `values` with a single field inversion
/// (Montgomery's trick). Returns None if any element is zero.
///
/// prefix[i] = v0 * ... * v(i-1); one inversion of the full product, then a
/// backward pass peels off each inverse with two multiplications.
pub fn batch_invert<P: FieldParams>(values: &[FieldElement<P>]) -> Option<Vec<FieldElement<P>>> {
    let mut prefix = Vec::with_capacity(values.len());
    let mut acc = FieldElement::<P>::ONE;
    for v in values {
        if v.is_zero() {
            return None;
        }
        prefix.push(acc);
        acc *= *v;
    }

    let mut inv = acc.inverse()?;
    let mut out = alloc::vec![FieldElement::<P>::ZERO; values.len()];
    for i in (0..values.len()).rev() {
        out[i] = inv * prefix[i];
        inv *= values[i];
    }
    Some(out)
}

// --- Limb helpers ---

/// Convert 32-byte big-endian to 4 x u64 limbs (little-endian limbs)
#[inline]
pub(crate) fn be_bytes_to_limbs(bytes: &[u8; 32]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let start = 24 - i * 8;
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[start..start + 8]);
        *limb = u64::from_be_bytes(word);
    }
    limbs
}

/// Convert 4 x u64 limbs (little-endian) to 32-byte big-endian
#[inline]
pub(crate) fn limbs_to_be_bytes(limbs: &[u64; 4]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (i, limb) in limbs.iter().enumerate() {
        let start = 24 - i * 8;
        out[start..start + 8].copy_from_slice(&limb.to_be_bytes());
    }
    out
}

/// a + b mod p
fn add_mod<P: FieldParams>(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let (sum, overflow) = add_with_carry(a, b);
    if overflow || gte(&sum, &P::MODULUS) {
        sub_no_borrow(&sum, &P::MODULUS)
    } else {
        sum
    }
}

/// a - b mod p
fn sub_mod<P: FieldParams>(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    if gte(a, b) {
        sub_no_borrow(a, b)
    } else {
        // a < b: p - (b - a)
        let diff = sub_no_borrow(b, a);
        sub_no_borrow(&P::MODULUS, &diff)
    }
}

/// a * b mod p via the full 512-bit product
fn mul_mod_wide<P: FieldParams>(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let wide = mul_wide_4x4(a, b);
    reduce_512::<P>(&wide)
}

/// Reduce a 512-bit number mod p: low + high * (2^256 mod p), repeated
/// until the high half is gone.
fn reduce_512<P: FieldParams>(wide: &[u64; 8]) -> [u64; 4] {
    let mut low = [wide[0], wide[1], wide[2], wide[3]];
    let mut high = [wide[4], wide[5], wide[6], wide[7]];

    while !is_zero_4(&high) {
        let product = mul_wide_4x4(&high, &P::TWO_256_MOD);

        let (sum, overflow) =
            add_with_carry(&low, &[product[0], product[1], product[2], product[3]]);
        low = sum;

        high = [product[4], product[5], product[6], product[7]];
        if overflow {
            let (new_high, _) = add_with_carry(&high, &[1, 0, 0, 0]);
            high = new_high;
        }
    }

    while gte(&low, &P::MODULUS) {
        low = sub_no_borrow(&low, &P::MODULUS);
    }

    low
}

fn is_zero_4(a: &[u64; 4]) -> bool {
    a[0] == 0 && a[1] == 0 && a[2] == 0 && a[3] == 0
}

/// 256 x 256 -> 512-bit product (no reduction)
fn mul_wide_4x4(a: &[u64; 4], b: &[u64; 4]) -> [u64; 8] {
    let mut result = [0u64; 8];

    for i in 0..4 {
        let mut carry = 0u64;
        for j in 0..4 {
            let (lo, hi) = mul_with_carry(a[j], b[i], result[i + j], carry);
            result[i + j] = lo;
            carry = hi;
        }
        result[i + 4] = carry;
    }

    result
}

/// base^exp mod p, square-and-multiply from the least significant bit
fn pow_mod<P: FieldParams>(base: &[u64; 4], exp: &[u64; 4]) -> [u64; 4] {
    let mut result = [1u64, 0, 0, 0];
    let mut base_pow = *base;

    for limb in exp {
        let mut e = *limb;
        for _ in 0..64 {
            if e & 1 == 1 {
                result = mul_mod_wide::<P>(&result, &base_pow);
            }
            base_pow = mul_mod_wide::<P>(&base_pow, &base_pow);
            e >>= 1;
        }
    }

    result
}

fn add_with_carry(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], bool) {
    let mut result = [0u64; 4];
    let mut carry = 0u64;

    for i in 0..4 {
        let (sum1, c1) = a[i].overflowing_add(b[i]);
        let (sum2, c2) = sum1.overflowing_add(carry);
        result[i] = sum2;
        carry = (c1 as u64) + (c2 as u64);
    }

    (result, carry > 0)
}

/// a - b, assumes a >= b
pub(crate) fn sub_no_borrow(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let mut result = [0u64; 4];
    let mut borrow = 0u64;

    for i in 0..4 {
        let (diff1, b1) = a[i].overflowing_sub(b[i]);
        let (diff2, b2) = diff1.overflowing_sub(borrow);
        result[i] = diff2;
        borrow = (b1 as u64) + (b2 as u64);
    }

    result
}

/// a >= b
pub(crate) fn gte(a: &[u64; 4], b: &[u64; 4]) -> bool {
    for i in (0..4).rev() {
        if a[i] > b[i] {
            return true;
        }
        if a[i] < b[i] {
            return false;
        }
    }
    true
}

/// (a * b + c + carry) as (lo, hi)
fn mul_with_carry(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let product = (a as u128) * (b as u128) + (c as u128) + (carry as u128);
    (product as u64, (product >> 64) as u64)
}
