//! TurboPLONK verification logic
//!
//! 1. Validate every commitment in the proof
//! 2. Re-derive the Fiat-Shamir challenges
//! 3. Evaluate the gate identities at ζ and fold the openings (evaluator)
//! 4. Fold in the recursion points when the key declares them
//! 5. Final pairing check: e(rhs, [1]₂) · e(lhs, [x]₂) == 1

use crate::constants::{NUM_NU_CHALLENGES, RECURSION_LIMB_BITS, RECURSION_LIMB_COUNT};
use crate::errors::VerifyError;
use crate::evaluator::{
    batch_evaluation_scalar, batch_opening_commitment, compute_fractions, linearisation,
    linearised_element,
};
use crate::field::{limbs_to_be_bytes, Fq, Fr};
use crate::key::VerificationKey;
use crate::ops::{Bn254, CurveOps};
use crate::proof::Proof;
use crate::transcript::{derive_from, Challenges, Transcript};
use crate::types::{G1Point, G2Point};

extern crate alloc;
use alloc::format;

/// The two G1 inputs of the final pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingPoints {
    /// Paired with the G2 generator
    pub rhs: G1Point,
    /// Paired with [x]₂
    pub lhs: G1Point,
}

/// A verifier bound to one verification key and a curve backend
#[derive(Debug, Clone)]
pub struct Verifier<C: CurveOps = Bn254> {
    vk: VerificationKey,
    curve: C,
}

impl Verifier<Bn254> {
    pub fn new(vk: VerificationKey) -> Result<Self, VerifyError> {
        Self::with_backend(vk, Bn254)
    }

    /// Parse the key and bind it to the `solana-bn254` backend
    pub fn from_key_bytes(vk_bytes: &[u8]) -> Result<Self, VerifyError> {
        let vk = VerificationKey::from_bytes(vk_bytes)?;
        Ok(Self { vk, curve: Bn254 })
    }
}

impl<C: CurveOps> Verifier<C> {
    /// The key is re-validated, so hand-built keys get the same checks as
    /// parsed ones.
    pub fn with_backend(vk: VerificationKey, curve: C) -> Result<Self, VerifyError> {
        vk.validate()?;
        Ok(Self { vk, curve })
    }

    pub fn key(&self) -> &VerificationKey {
        &self.vk
    }

    pub fn backend(&self) -> &C {
        &self.curve
    }

    /// Parse and verify
    pub fn verify(&self, proof_bytes: &[u8], public_inputs: &[Fr]) -> Result<(), VerifyError> {
        let proof = Proof::from_bytes(proof_bytes)?;
        self.verify_proof(&proof, public_inputs)
    }

    /// Like [`Verifier::verify`], collapsing every failure to `false`
    pub fn is_valid(&self, proof_bytes: &[u8], public_inputs: &[Fr]) -> bool {
        self.verify(proof_bytes, public_inputs).is_ok()
    }

    pub fn verify_proof(&self, proof: &Proof, public_inputs: &[Fr]) -> Result<(), VerifyError> {
        let points = self.pairing_points(proof, public_inputs)?;

        let pairs = [
            (points.rhs, G2Point::GENERATOR),
            (points.lhs, self.vk.g2_x),
        ];
        if !self.curve.pairing_check(&pairs)? {
            crate::trace!("pairing check failed");
            return Err(VerifyError::VerificationFailed);
        }
        Ok(())
    }

    /// Re-derive all challenges for `proof`. Pure function of the key, proof
    /// and public inputs.
    pub fn compute_challenges(
        &self,
        proof: &Proof,
        public_inputs: &[Fr],
    ) -> Result<Challenges, VerifyError> {
        self.check_public_inputs(public_inputs)?;
        Ok(generate_challenges(&self.vk, proof, public_inputs))
    }

    /// Everything up to, but not including, the pairing
    pub fn pairing_points(
        &self,
        proof: &Proof,
        public_inputs: &[Fr],
    ) -> Result<PairingPoints, VerifyError> {
        for (label, point) in proof.labelled_points() {
            point
                .validate()
                .map_err(|reason| VerifyError::MalformedPoint { label, reason })?;
        }

        let ch = self.compute_challenges(proof, public_inputs)?;
        let fractions = compute_fractions(&self.vk, public_inputs, &ch)?;
        let lin = linearisation(proof, &ch, &fractions);

        let curve = &self.curve;
        let d = linearised_element(curve, &self.vk, proof, &lin, ch.u)?;
        let f = batch_opening_commitment(curve, &self.vk, proof, &ch, &fractions, &d)?;
        let e = batch_evaluation_scalar(proof, &ch, lin.r0);

        // rhs = F + ζ·PI_Z + u·ζ·ω·PI_Z_OMEGA − E·G
        let zeta_omega_u = ch.u * ch.zeta * self.vk.work_root;
        let mut rhs = curve.msm(&[
            (proof.pi_z, ch.zeta),
            (proof.pi_z_omega, zeta_omega_u),
            (G1Point::GENERATOR, -e),
        ])?;
        rhs = curve.add(&f, &rhs)?;

        // lhs = −(PI_Z + u·PI_Z_OMEGA)
        let opened = curve.msm(&[(proof.pi_z, Fr::ONE), (proof.pi_z_omega, ch.u)])?;
        let mut lhs = opened.negate();

        if let Some((p0, p1)) = recursion_points(&self.vk, public_inputs)? {
            let u_sq = ch.u.square();
            let p0_term = curve.scalar_mul(&p0, &u_sq)?;
            let p1_term = curve.scalar_mul(&p1, &u_sq)?;
            rhs = curve.add(&rhs, &p0_term)?;
            lhs = curve.add(&lhs, &p1_term)?;
        }

        crate::dbg_g1!("pairing rhs", &rhs);
        crate::dbg_g1!("pairing lhs", &lhs);

        Ok(PairingPoints { rhs, lhs })
    }

    fn check_public_inputs(&self, public_inputs: &[Fr]) -> Result<(), VerifyError> {
        if public_inputs.len() != self.vk.num_public_inputs as usize {
            return Err(VerifyError::PublicInput(format!(
                "Expected {} public inputs, got {}",
                self.vk.num_public_inputs,
                public_inputs.len()
            )));
        }
        Ok(())
    }
}

/// Verify a proof against a key with the `solana-bn254` backend
pub fn verify(
    vk: &VerificationKey,
    proof_bytes: &[u8],
    public_inputs: &[Fr],
) -> Result<(), VerifyError> {
    Verifier::new(vk.clone())?.verify(proof_bytes, public_inputs)
}

/// Boolean form of [`verify`]
pub fn is_valid(vk: &VerificationKey, proof_bytes: &[u8], public_inputs: &[Fr]) -> bool {
    verify(vk, proof_bytes, public_inputs).is_ok()
}

/// Fiat-Shamir challenge derivation
fn generate_challenges(vk: &VerificationKey, proof: &Proof, public_inputs: &[Fr]) -> Challenges {
    let mut t = Transcript::new();

    // Round 0: circuit shape seeds the transcript
    t.append_u32(vk.circuit_size);
    t.append_u32(vk.num_public_inputs);
    t.squeeze();

    // Round 1: public inputs and wire commitments
    for pi in public_inputs {
        t.append_scalar(pi);
    }
    for w in &proof.wires {
        t.append_g1(w);
    }
    let beta = t.challenge();
    crate::dbg_fr!("beta", &beta);

    t.append_bytes(&[0x01]);
    let gamma = t.challenge();
    crate::dbg_fr!("gamma", &gamma);

    // Round 2: grand product
    t.append_g1(&proof.z);
    let alpha = t.challenge();
    crate::dbg_fr!("alpha", &alpha);

    // Round 3: quotient
    for q in &proof.quotient {
        t.append_g1(q);
    }
    let zeta = t.challenge();
    crate::dbg_fr!("zeta", &zeta);

    // Round 4: evaluations. The nu challenges all hang off one base.
    for s in proof.scalars() {
        t.append_scalar(&s);
    }
    let nu_base = t.squeeze();
    let mut nu = [Fr::ZERO; NUM_NU_CHALLENGES];
    for (i, v) in nu.iter_mut().enumerate() {
        *v = derive_from(&nu_base, &[(i + 1) as u8]);
    }

    // Round 5: opening proofs
    t.append_g1(&proof.pi_z);
    t.append_g1(&proof.pi_z_omega);
    let u = t.challenge();
    crate::dbg_fr!("u", &u);

    Challenges {
        beta,
        gamma,
        alpha,
        zeta,
        nu,
        u,
    }
}

/// Decode the recursion points (P0, P1) from the public inputs named by the
/// key. Each coordinate is four 68-bit limbs, least significant first.
fn recursion_points(
    vk: &VerificationKey,
    public_inputs: &[Fr],
) -> Result<Option<(G1Point, G1Point)>, VerifyError> {
    if !vk.contains_recursive_proof {
        return Ok(None);
    }

    let mut limbs = [Fr::ZERO; RECURSION_LIMB_COUNT];
    for (slot, &index) in limbs.iter_mut().zip(vk.recursive_proof_indices.iter()) {
        *slot = *public_inputs.get(index as usize).ok_or_else(|| {
            VerifyError::PublicInput(format!("Recursion index {} out of range", index))
        })?;
    }

    let coordinate = |i: usize| -> Result<Fq, VerifyError> {
        let group = [limbs[i], limbs[i + 1], limbs[i + 2], limbs[i + 3]];
        compose_limbs(&group).ok_or_else(|| {
            VerifyError::PublicInput(format!("Recursion coordinate at limb {} out of range", i))
        })
    };

    let p0 = G1Point::from_coordinates(&coordinate(0)?, &coordinate(4)?);
    let p1 = G1Point::from_coordinates(&coordinate(8)?, &coordinate(12)?);

    p0.validate().map_err(|reason| VerifyError::MalformedPoint {
        label: "RECURSION_P0",
        reason,
    })?;
    p1.validate().map_err(|reason| VerifyError::MalformedPoint {
        label: "RECURSION_P1",
        reason,
    })?;

    crate::dbg_g1!("recursion P0", &p0);
    crate::dbg_g1!("recursion P1", &p1);

    Ok(Some((p0, p1)))
}

/// Σ limb_i · 2^(68·i) as a base field element. None if a limb is ≥ 2^68 or
/// the result is not below q.
pub(crate) fn compose_limbs(limbs: &[Fr; 4]) -> Option<Fq> {
    let mut acc = [0u64; 5];
    for (i, limb) in limbs.iter().enumerate() {
        let l = limb.limbs();
        if l[2] != 0 || l[3] != 0 || l[1] >> (RECURSION_LIMB_BITS - 64) != 0 {
            return None;
        }
        let shift = RECURSION_LIMB_BITS as usize * i;
        let word = shift / 64;
        let bit = shift % 64;
        // hi < 2^4, so a limb never reaches past acc[word + 1]
        let (lo, hi) = (l[0], l[1]);
        acc[word] |= lo << bit;
        if bit == 0 {
            acc[word + 1] |= hi;
        } else {
            acc[word + 1] |= (hi << bit) | (lo >> (64 - bit));
        }
    }
    if acc[4] != 0 {
        return None;
    }
    Fq::from_be_bytes(&limbs_to_be_bytes(&[acc[0], acc[1], acc[2], acc[3]]))
}

/// Split a base field element into four 68-bit limbs, least significant first.
pub fn split_limbs(value: &Fq) -> [Fr; 4] {
    let v = value.limbs();
    let mask = (1u128 << RECURSION_LIMB_BITS) - 1;
    let mut out = [Fr::ZERO; 4];
    for (i, slot) in out.iter_mut().enumerate() {
        let shift = RECURSION_LIMB_BITS as usize * i;
        let word = shift / 64;
        let bit = shift % 64;
        let mut window: u128 = (v[word] >> bit) as u128;
        if word + 1 < 4 {
            window |= (v[word + 1] as u128) << (64 - bit);
        }
        let limb = window & mask;
        *slot = Fr::from_canonical_limbs([limb as u64, (limb >> 64) as u64, 0, 0]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::VK_NUM_COMMITMENTS;
    use sha3::{Digest, Keccak256};

    fn keccak(parts: &[&[u8]]) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        for part in parts {
            hasher.update(part);
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        digest
    }

    fn point(fill: u8) -> G1Point {
        G1Point([fill; 64])
    }

    /// Shape-only key: the transcript reads circuit size and input count
    fn transcript_key() -> VerificationKey {
        VerificationKey {
            circuit_size: 16,
            log2_circuit_size: 4,
            num_public_inputs: 3,
            work_root: Fr::ONE,
            work_root_inverse: Fr::ONE,
            domain_inverse: Fr::ONE,
            commitments: [G1Point::GENERATOR; VK_NUM_COMMITMENTS],
            contains_recursive_proof: false,
            recursive_proof_indices: [0; RECURSION_LIMB_COUNT],
            g2_x: G2Point::GENERATOR,
        }
    }

    /// Points W_i = [0x10 + i; 64], Z = [0x20; 64], T_i = [0x30 + i; 64],
    /// PI_Z = [0x40; 64], PI_Z_OMEGA = [0x41; 64]; scalar k = 0x100 + k.
    fn transcript_proof() -> Proof {
        let s = |k: u64| Fr::from_u64(0x100 + k);
        Proof {
            wires: [point(0x10), point(0x11), point(0x12), point(0x13)],
            z: point(0x20),
            quotient: [point(0x30), point(0x31), point(0x32), point(0x33)],
            wire_evals: [s(0), s(1), s(2), s(3)],
            sigma_evals: [s(4), s(5), s(6)],
            q_arith_eval: s(7),
            q_ecc_eval: s(8),
            q_c_eval: s(9),
            z_omega_eval: s(10),
            shifted_wire_evals: [s(11), s(12), s(13), s(14)],
            pi_z: point(0x40),
            pi_z_omega: point(0x41),
        }
    }

    fn transcript_inputs() -> [Fr; 3] {
        [Fr::from_u64(7), Fr::from_u64(8), Fr::from_u64(9)]
    }

    #[test]
    fn test_challenges_match_keccak_layout() {
        let vk = transcript_key();
        let proof = transcript_proof();
        let inputs = transcript_inputs();
        let ch = generate_challenges(&vk, &proof, &inputs);

        let init = keccak(&[&16u32.to_be_bytes(), &3u32.to_be_bytes()]);

        let mut round1 = init.to_vec();
        for pi in &inputs {
            round1.extend_from_slice(&pi.to_be_bytes());
        }
        for w in &proof.wires {
            round1.extend_from_slice(w.as_bytes());
        }
        let beta_raw = keccak(&[&round1]);
        let gamma_raw = keccak(&[&beta_raw, &[0x01]]);
        let alpha_raw = keccak(&[&gamma_raw, proof.z.as_bytes()]);

        let mut round3 = alpha_raw.to_vec();
        for t in &proof.quotient {
            round3.extend_from_slice(t.as_bytes());
        }
        let zeta_raw = keccak(&[&round3]);

        let mut round4 = zeta_raw.to_vec();
        for s in proof.scalars() {
            round4.extend_from_slice(&s.to_be_bytes());
        }
        let nu_base = keccak(&[&round4]);
        let u_raw = keccak(&[
            &nu_base,
            proof.pi_z.as_bytes(),
            proof.pi_z_omega.as_bytes(),
        ]);

        let reduce = |d: &[u8; 32]| Fr::from_be_bytes_reduced(d);
        assert_eq!(ch.beta, reduce(&beta_raw));
        assert_eq!(ch.gamma, reduce(&gamma_raw));
        assert_eq!(ch.alpha, reduce(&alpha_raw));
        assert_eq!(ch.zeta, reduce(&zeta_raw));
        for (i, nu) in ch.nu.iter().enumerate() {
            let expected = reduce(&keccak(&[&nu_base, &[(i + 1) as u8]]));
            assert_eq!(*nu, expected, "nu_{}", i);
        }
        assert_eq!(ch.u, reduce(&u_raw));
    }

    #[test]
    fn test_challenge_vector() {
        let ch = generate_challenges(
            &transcript_key(),
            &transcript_proof(),
            &transcript_inputs(),
        );
        let hex = |f: &Fr| hex::encode(f.to_be_bytes());

        assert_eq!(
            hex(&ch.beta),
            "0861e9abf80c94f7df410d86e5f9a90c0c23fdf89c6b08e46d5c80558b56dc36"
        );
        assert_eq!(
            hex(&ch.gamma),
            "088008e5cd299b77ab7cadba2e660580d91c6daf7564b24d52649374271d74d0"
        );
        assert_eq!(
            hex(&ch.alpha),
            "180cd35ef5c36647f2c71042d9b3a8ec76da219613442be8066f9ffd941eba39"
        );
        assert_eq!(
            hex(&ch.zeta),
            "22d823047b65a8dc88f474e1930966f1865c35c1cdbe32257086ca88403da5be"
        );
        assert_eq!(
            hex(&ch.nu[0]),
            "25531be3168d870701adf9282f87994e12984f28066fba4eac786c6fce882074"
        );
        assert_eq!(
            hex(&ch.nu[9]),
            "06877b3ba40c9c6ee940b5a6c4bcf2e69e558350546108ec1b784fa522a15003"
        );
        assert_eq!(
            hex(&ch.u),
            "10ac676d0d26312a00d1d0e1aa046b197f1c854414788cd61e95c9f4832a8690"
        );
    }

    #[test]
    fn test_compose_split_generator_coordinates() {
        let x = Fq::from_be_bytes(&G1Point::GENERATOR.x_bytes()).unwrap();
        assert_eq!(compose_limbs(&split_limbs(&x)), Some(x));

        let big = -Fq::from_u64(12345);
        let limbs = split_limbs(&big);
        assert_eq!(compose_limbs(&limbs), Some(big));
    }

    #[test]
    fn test_compose_rejects_wide_limb() {
        let wide = Fr::from_canonical_limbs([0, 1 << 4, 0, 0]); // 2^68
        assert_eq!(compose_limbs(&[wide, Fr::ZERO, Fr::ZERO, Fr::ZERO]), None);
        let max = Fr::from_canonical_limbs([u64::MAX, 0xf, 0, 0]);
        assert!(compose_limbs(&[max, Fr::ZERO, Fr::ZERO, Fr::ZERO]).is_some());
    }

    #[test]
    fn test_compose_rejects_overflow() {
        // Top limb ≥ 2^52 pushes the value past 256 bits
        let top = Fr::from_canonical_limbs([1 << 52, 0, 0, 0]);
        assert_eq!(compose_limbs(&[Fr::ZERO, Fr::ZERO, Fr::ZERO, top]), None);
        // 2^255 < 2^256 but ≥ q
        let top = Fr::from_canonical_limbs([1 << 51, 0, 0, 0]);
        assert_eq!(compose_limbs(&[Fr::ZERO, Fr::ZERO, Fr::ZERO, top]), None);
    }

    #[test]
    fn test_compose_limb_positions() {
        let one = Fr::ONE;
        let composed = compose_limbs(&[Fr::ZERO, one, Fr::ZERO, Fr::ZERO]).unwrap();
        // 2^68
        assert_eq!(composed.limbs(), &[0, 1 << 4, 0, 0]);
        let composed = compose_limbs(&[Fr::ZERO, Fr::ZERO, Fr::ZERO, one]).unwrap();
        // 2^204
        assert_eq!(composed.limbs(), &[0, 0, 0, 1 << 12]);
    }
}
