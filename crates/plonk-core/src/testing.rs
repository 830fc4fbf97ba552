//! Proof fixtures for tests
//!
//! Without a prover, valid (key, proof) pairs are built through the SRS
//! trapdoor instead: every commitment is k·G for a known k, a tracking curve
//! backend follows the discrete log of every point the verifier computes, and
//! the key's [x]₂ is then chosen so the final pairing balances. The verifier
//! itself runs unmodified on the real backend.

use crate::constants::{root_of_unity, RECURSION_LIMB_COUNT};
use crate::errors::{Bn254Error, VerifyError};
use crate::field::{Fq, Fr};
use crate::key::{VerificationKey, VK_NUM_COMMITMENTS};
use crate::ops::{Bn254, CurveOps};
use crate::proof::Proof;
use crate::types::{G1Point, G2Point};
use crate::verifier::{split_limbs, Verifier};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInteger, PrimeField};
use sha3::{Digest, Keccak256};
use std::cell::RefCell;
use std::collections::HashMap;

/// Curve backend that computes real points and records their discrete logs
/// base G.
#[derive(Debug, Default)]
pub struct DlogTracker {
    inner: Bn254,
    logs: RefCell<HashMap<G1Point, Fr>>,
}

impl DlogTracker {
    pub fn new() -> Self {
        let tracker = Self::default();
        tracker.logs.borrow_mut().insert(G1Point::IDENTITY, Fr::ZERO);
        tracker.logs.borrow_mut().insert(G1Point::GENERATOR, Fr::ONE);
        tracker
    }

    /// k·G, remembered
    pub fn commit(&self, k: Fr) -> Result<G1Point, Bn254Error> {
        let p = self.inner.scalar_mul(&G1Point::GENERATOR, &k)?;
        self.logs.borrow_mut().insert(p, k);
        Ok(p)
    }

    pub fn dlog(&self, p: &G1Point) -> Option<Fr> {
        if let Some(k) = self.logs.borrow().get(p) {
            return Some(*k);
        }
        // Negations show up through G1Point::negate without a backend call
        self.logs.borrow().get(&p.negate()).map(|k| -*k)
    }

    fn known(&self, p: &G1Point) -> Result<Fr, Bn254Error> {
        self.dlog(p)
            .ok_or_else(|| Bn254Error::SyscallError(format!("untracked point {:?}", p)))
    }
}

impl CurveOps for DlogTracker {
    fn add(&self, a: &G1Point, b: &G1Point) -> Result<G1Point, Bn254Error> {
        let k = self.known(a)? + self.known(b)?;
        let p = self.inner.add(a, b)?;
        self.logs.borrow_mut().insert(p, k);
        Ok(p)
    }

    fn scalar_mul(&self, p: &G1Point, s: &Fr) -> Result<G1Point, Bn254Error> {
        let k = self.known(p)? * *s;
        let out = self.inner.scalar_mul(p, s)?;
        self.logs.borrow_mut().insert(out, k);
        Ok(out)
    }

    fn pairing_check(&self, pairs: &[(G1Point, G2Point)]) -> Result<bool, Bn254Error> {
        self.inner.pairing_check(pairs)
    }
}

/// Deterministic scalar stream: keccak(seed || counter) mod r, never zero
pub struct ScalarStream {
    seed: Vec<u8>,
    counter: u64,
}

impl ScalarStream {
    pub fn new(seed: &[u8]) -> Self {
        Self {
            seed: seed.to_vec(),
            counter: 0,
        }
    }

    pub fn next_scalar(&mut self) -> Fr {
        loop {
            let mut hasher = Keccak256::new();
            hasher.update(&self.seed);
            hasher.update(self.counter.to_be_bytes());
            self.counter += 1;
            let mut digest = [0u8; 32];
            digest.copy_from_slice(&hasher.finalize());
            let s = Fr::from_be_bytes_reduced(&digest);
            if !s.is_zero() {
                return s;
            }
        }
    }
}

/// A key, proof and public inputs that verify together
#[derive(Debug, Clone)]
pub struct Fixture {
    pub vk: VerificationKey,
    pub proof: Proof,
    pub public_inputs: Vec<Fr>,
    pub trapdoor: Trapdoor,
}

/// Discrete logs (base G) of every point in a [`Fixture`]
#[derive(Debug, Clone)]
pub struct Trapdoor {
    /// Key commitments, in `Selector` order
    pub commitments: [Fr; VK_NUM_COMMITMENTS],
    pub wires: [Fr; 4],
    pub z: Fr,
    pub quotient: [Fr; 4],
    pub pi_z: Fr,
    pub pi_z_omega: Fr,
    /// (P0, P1) when the key declares a recursive proof
    pub recursion: Option<(Fr, Fr)>,
    /// Secret behind the key's [x]₂
    pub x: Fr,
}

impl Trapdoor {
    /// Register every point with `tracker` so a tracked verifier can follow
    /// the fixture.
    pub fn register(&self, tracker: &DlogTracker) -> Result<(), Bn254Error> {
        let mut logs: Vec<Fr> = self.commitments.to_vec();
        logs.extend_from_slice(&self.wires);
        logs.push(self.z);
        logs.extend_from_slice(&self.quotient);
        logs.push(self.pi_z);
        logs.push(self.pi_z_omega);
        if let Some((p0, p1)) = self.recursion {
            logs.push(p0);
            logs.push(p1);
        }
        for k in logs {
            tracker.commit(k)?;
        }
        Ok(())
    }
}

impl Fixture {
    pub fn proof_bytes(&self) -> Vec<u8> {
        self.proof.to_bytes()
    }
}

/// Build a fixture over a 2^log2_circuit_size domain for the given public
/// inputs.
pub fn trapdoor_fixture(
    seed: &[u8],
    log2_circuit_size: u32,
    public_inputs: &[Fr],
) -> Result<Fixture, VerifyError> {
    build(seed, log2_circuit_size, public_inputs.to_vec(), false)
}

/// Like [`trapdoor_fixture`], with 16 recursion limbs appended to the public
/// inputs and declared in the key.
pub fn trapdoor_fixture_with_recursion(
    seed: &[u8],
    log2_circuit_size: u32,
    public_inputs: &[Fr],
) -> Result<Fixture, VerifyError> {
    build(seed, log2_circuit_size, public_inputs.to_vec(), true)
}

fn build(
    seed: &[u8],
    log2_circuit_size: u32,
    mut public_inputs: Vec<Fr>,
    recursive: bool,
) -> Result<Fixture, VerifyError> {
    let tracker = DlogTracker::new();
    let mut rng = ScalarStream::new(seed);

    let mut recursive_proof_indices = [0u32; RECURSION_LIMB_COUNT];
    let mut recursion = None;
    if recursive {
        let offset = public_inputs.len() as u32;
        let (k0, k1) = (rng.next_scalar(), rng.next_scalar());
        let p0 = tracker.commit(k0)?;
        let p1 = tracker.commit(k1)?;
        recursion = Some((k0, k1));
        for point in [p0, p1] {
            for coordinate in [point.x_bytes(), point.y_bytes()] {
                let value = Fq::from_be_bytes(&coordinate).ok_or_else(|| {
                    VerifyError::PublicInput("non-canonical recursion coordinate".into())
                })?;
                public_inputs.extend_from_slice(&split_limbs(&value));
            }
        }
        for (i, index) in recursive_proof_indices.iter_mut().enumerate() {
            *index = offset + i as u32;
        }
    }

    let work_root = root_of_unity(log2_circuit_size)
        .ok_or_else(|| VerifyError::PublicInput("domain too large".into()))?;
    let circuit_size = 1u32 << log2_circuit_size;
    let inverse = |v: Fr| {
        v.inverse()
            .ok_or_else(|| VerifyError::Transcript("zero in fixture domain".into()))
    };

    let commitment_logs: [Fr; VK_NUM_COMMITMENTS] = core::array::from_fn(|_| rng.next_scalar());
    let mut commitments = [G1Point::IDENTITY; VK_NUM_COMMITMENTS];
    for (c, k) in commitments.iter_mut().zip(commitment_logs) {
        *c = tracker.commit(k)?;
    }

    let mut vk = VerificationKey {
        circuit_size,
        log2_circuit_size,
        num_public_inputs: public_inputs.len() as u32,
        work_root,
        work_root_inverse: inverse(work_root)?,
        domain_inverse: inverse(Fr::from_u64(circuit_size as u64))?,
        commitments,
        contains_recursive_proof: recursive,
        recursive_proof_indices,
        g2_x: G2Point::GENERATOR,
    };

    let mut s = || rng.next_scalar();
    let wire_logs = [s(), s(), s(), s()];
    let z_log = s();
    let quotient_logs = [s(), s(), s(), s()];
    let (pi_z_log, pi_z_omega_log) = (s(), s());

    let mut wires = [G1Point::IDENTITY; 4];
    for (w, k) in wires.iter_mut().zip(wire_logs) {
        *w = tracker.commit(k)?;
    }
    let mut quotient = [G1Point::IDENTITY; 4];
    for (t, k) in quotient.iter_mut().zip(quotient_logs) {
        *t = tracker.commit(k)?;
    }
    let proof = Proof {
        wires,
        z: tracker.commit(z_log)?,
        quotient,
        wire_evals: [s(), s(), s(), s()],
        sigma_evals: [s(), s(), s()],
        q_arith_eval: s(),
        q_ecc_eval: s(),
        q_c_eval: s(),
        z_omega_eval: s(),
        shifted_wire_evals: [s(), s(), s(), s()],
        pi_z: tracker.commit(pi_z_log)?,
        pi_z_omega: tracker.commit(pi_z_omega_log)?,
    };

    // [x]₂ only enters the pairing, never the transcript, so it can be fixed
    // after the fact: ρ + x·λ = 0.
    let points =
        Verifier::with_backend(vk.clone(), &tracker)?.pairing_points(&proof, &public_inputs)?;
    let rho = tracker.known(&points.rhs)?;
    let lambda = tracker.known(&points.lhs)?;
    let x = -rho * inverse(lambda)?;
    vk.g2_x = g2_mul_generator(&x);

    Ok(Fixture {
        vk,
        proof,
        public_inputs,
        trapdoor: Trapdoor {
            commitments: commitment_logs,
            wires: wire_logs,
            z: z_log,
            quotient: quotient_logs,
            pi_z: pi_z_log,
            pi_z_omega: pi_z_omega_log,
            recursion,
            x,
        },
    })
}

/// x·[1]₂ in the precompile encoding
pub fn g2_mul_generator(x: &Fr) -> G2Point {
    let scalar = ark_bn254::Fr::from_be_bytes_mod_order(&x.to_be_bytes());
    let point = (ark_bn254::G2Affine::generator() * scalar).into_affine();

    let mut out = [0u8; 128];
    // The identity has no affine coordinates; zero encodes it
    if let Some((px, py)) = point.xy() {
        let parts = [px.c1, px.c0, py.c1, py.c0];
        for (i, part) in parts.iter().enumerate() {
            let bytes = part.into_bigint().to_bytes_be();
            out[i * 32 + 32 - bytes.len()..(i + 1) * 32].copy_from_slice(&bytes);
        }
    }
    G2Point(out)
}
