//! Polynomial-identity evaluation at ζ
//!
//! Turns the challenges and proof evaluations into the two inputs of the
//! final pairing: the batch opening commitment F and the batch evaluation
//! scalar E.

use crate::constants::{NUM_WIRES, PUBLIC_INPUT_COSET_GENERATOR};
use crate::errors::VerifyError;
use crate::field::{batch_invert, Fr};
use crate::key::{Selector, VerificationKey};
use crate::ops::CurveOps;
use crate::proof::Proof;
use crate::transcript::Challenges;
use crate::types::G1Point;
use crate::widgets::{linearise, Linearisation, WidgetParameters};

extern crate alloc;
use alloc::string::ToString;
use alloc::vec::Vec;

/// Vanishing and Lagrange values at ζ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fractions {
    /// ζⁿ
    pub zeta_pow_n: Fr,
    /// Δ, the public-input correction to the grand product
    pub public_input_delta: Fr,
    /// (ζⁿ − 1) / ∏_{j=1..4} (ζ − ω^{−j})
    pub zero_poly_eval: Fr,
    /// L_1(ζ)
    pub l_1: Fr,
    /// L_{n−5}(ζ), the last row before the blinding rows
    pub l_end: Fr,
}

/// Compute Δ, Z_H*(ζ), L1(ζ) and L_end(ζ). The four denominators share one
/// inversion.
pub fn compute_fractions(
    vk: &VerificationKey,
    public_inputs: &[Fr],
    ch: &Challenges,
) -> Result<Fractions, VerifyError> {
    let Challenges {
        beta, gamma, zeta, ..
    } = *ch;
    let omega = vk.work_root;

    // Public input delta: ∏ (x_i + γ + 5βω^i) / ∏ (x_i + γ + βω^i)
    let k = Fr::from_u64(PUBLIC_INPUT_COSET_GENERATOR);
    let mut pi_numerator = Fr::ONE;
    let mut pi_denominator = Fr::ONE;
    let mut beta_root = beta;
    for x in public_inputs {
        let base = *x + gamma;
        pi_numerator *= base + k * beta_root;
        pi_denominator *= base + beta_root;
        beta_root *= omega;
    }

    let zeta_pow_n = zeta.pow_u64(vk.circuit_size as u64);
    let vanishing_numerator = zeta_pow_n - Fr::ONE;

    // Drop the 4 roots reserved for blinding: ω^{-1}..ω^{-4}
    let mut zero_denominator = Fr::ONE;
    let mut root = vk.work_root_inverse;
    for _ in 0..4 {
        zero_denominator *= zeta - root;
        root *= vk.work_root_inverse;
    }

    let lagrange_numerator = vanishing_numerator * vk.domain_inverse;
    let l_1_denominator = zeta - Fr::ONE;
    let l_end_denominator = zeta * omega.pow_u64(5) - Fr::ONE;

    let inverses = batch_invert(&[
        pi_denominator,
        zero_denominator,
        l_1_denominator,
        l_end_denominator,
    ])
    .ok_or_else(|| {
        VerifyError::Transcript("zero denominator in evaluation fractions".to_string())
    })?;

    let fractions = Fractions {
        zeta_pow_n,
        public_input_delta: pi_numerator * inverses[0],
        zero_poly_eval: vanishing_numerator * inverses[1],
        l_1: lagrange_numerator * inverses[2],
        l_end: lagrange_numerator * inverses[3],
    };

    crate::dbg_fr!("public_input_delta", &fractions.public_input_delta);
    crate::dbg_fr!("zero_poly_eval", &fractions.zero_poly_eval);
    crate::dbg_fr!("l_1", &fractions.l_1);
    crate::dbg_fr!("l_end", &fractions.l_end);

    Ok(fractions)
}

/// Run the gate widgets over the proof's evaluations
pub fn linearisation(proof: &Proof, ch: &Challenges, fractions: &Fractions) -> Linearisation {
    let params = WidgetParameters {
        alpha: ch.alpha,
        beta: ch.beta,
        gamma: ch.gamma,
        zeta: ch.zeta,
        public_input_delta: fractions.public_input_delta,
        l_1: fractions.l_1,
        l_end: fractions.l_end,
    };
    linearise(proof, &params)
}

/// D = z·[Z] + Σ multiplier_i·[selector_i]. The shifted opening of Z adds u
/// to its multiplier.
pub fn linearised_element<C: CurveOps>(
    curve: &C,
    vk: &VerificationKey,
    proof: &Proof,
    lin: &Linearisation,
    u: Fr,
) -> Result<G1Point, VerifyError> {
    let mut terms = Vec::with_capacity(1 + lin.selectors.len());
    terms.push((proof.z, lin.z + u));
    for selector in Selector::ALL {
        let scalar = lin.selector(selector);
        if !scalar.is_zero() {
            terms.push((*vk.commitment(selector), scalar));
        }
    }
    let d = curve.msm(&terms)?;
    crate::dbg_g1!("linearised_element", &d);
    Ok(d)
}

/// F = D − Z_H*(ζ)·Σ ζ^{n·i}[T_{i+1}] + Σ ν_j(1 + u)[W_j] + Σ ν_{4+j}[SIGMA_{j+1}]
///     + ν7[QARITH] + ν8[QECC] + ν9[QC]
pub fn batch_opening_commitment<C: CurveOps>(
    curve: &C,
    vk: &VerificationKey,
    proof: &Proof,
    ch: &Challenges,
    fractions: &Fractions,
    linearised: &G1Point,
) -> Result<G1Point, VerifyError> {
    let mut terms = Vec::with_capacity(4 + NUM_WIRES + 6);

    let mut quotient_scalar = -fractions.zero_poly_eval;
    for t in &proof.quotient {
        terms.push((*t, quotient_scalar));
        quotient_scalar *= fractions.zeta_pow_n;
    }

    let shifted_weight = Fr::ONE + ch.u;
    for (j, w) in proof.wires.iter().enumerate() {
        terms.push((*w, ch.nu_wire(j) * shifted_weight));
    }

    let sigmas = [Selector::Sigma1, Selector::Sigma2, Selector::Sigma3];
    for (j, sigma) in sigmas.into_iter().enumerate() {
        terms.push((*vk.commitment(sigma), ch.nu_sigma(j)));
    }
    terms.push((*vk.commitment(Selector::QArith), ch.nu_q_arith()));
    terms.push((*vk.commitment(Selector::QEcc), ch.nu_q_ecc()));
    terms.push((*vk.commitment(Selector::QC), ch.nu_q_c()));

    let folded = curve.msm(&terms)?;
    let f = curve.add(linearised, &folded)?;
    crate::dbg_g1!("batch_opening_commitment", &f);
    Ok(f)
}

/// E = Σ ν_i·eval_i + u·(z(ζω) + Σ ν_j·a_j(ζω)) − r0
pub fn batch_evaluation_scalar(proof: &Proof, ch: &Challenges, r0: Fr) -> Fr {
    let mut unshifted = Fr::ZERO;
    for j in 0..NUM_WIRES {
        unshifted += ch.nu_wire(j) * proof.wire_evals[j];
    }
    for j in 0..3 {
        unshifted += ch.nu_sigma(j) * proof.sigma_evals[j];
    }
    unshifted += ch.nu_q_arith() * proof.q_arith_eval;
    unshifted += ch.nu_q_ecc() * proof.q_ecc_eval;
    unshifted += ch.nu_q_c() * proof.q_c_eval;

    let mut shifted = proof.z_omega_eval;
    for j in 0..NUM_WIRES {
        shifted += ch.nu_wire(j) * proof.shifted_wire_evals[j];
    }

    let e = unshifted + ch.u * shifted - r0;
    crate::dbg_fr!("batch_evaluation", &e);
    e
}
