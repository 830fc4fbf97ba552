//! The pairing inputs against the opening equation, worked in discrete logs
//!
//! With every fixture point's discrete log known, rhs and lhs reduce to
//! scalars. Those are rebuilt here straight from the equation
//!
//!   rhs = F + ζ·PI_Z + u·ζ·ω·PI_Z_OMEGA − E·G  (+ u²·P0)
//!   lhs = −(PI_Z + u·PI_Z_OMEGA)              (+ u²·P1)
//!
//! and compared with what the verifier actually computes on the curve.

use turbo_plonk_core::evaluator::{compute_fractions, linearisation};
use turbo_plonk_core::testing::{
    trapdoor_fixture, trapdoor_fixture_with_recursion, DlogTracker, Fixture,
};
use turbo_plonk_core::{Fr, Selector, Verifier};

/// (log rhs, log lhs) from the fixture's trapdoor
fn expected_logs(fx: &Fixture) -> (Fr, Fr) {
    let verifier = Verifier::new(fx.vk.clone()).unwrap();
    let ch = verifier
        .compute_challenges(&fx.proof, &fx.public_inputs)
        .unwrap();
    let fractions = compute_fractions(&fx.vk, &fx.public_inputs, &ch).unwrap();
    let lin = linearisation(&fx.proof, &ch, &fractions);

    let t = &fx.trapdoor;
    let p = &fx.proof;
    let key = |s: Selector| t.commitments[s as usize];
    let (zeta, u, nu) = (ch.zeta, ch.u, ch.nu);
    let omega = fx.vk.work_root;
    let n = fx.vk.circuit_size as u64;

    // Z_H*(ζ) = (ζⁿ − 1) / ∏_{j=1..4} (ζ − ω^{−j})
    let zeta_n = zeta.pow_u64(n);
    let omega_inv = omega.inverse().unwrap();
    let mut blinding = Fr::ONE;
    for j in 1..=4 {
        blinding *= zeta - omega_inv.pow_u64(j);
    }
    let zero_poly = (zeta_n - Fr::ONE) * blinding.inverse().unwrap();

    // D
    let mut f = (lin.z + u) * t.z;
    for s in Selector::ALL {
        f += lin.selector(s) * key(s);
    }

    // F
    let mut zeta_ni = Fr::ONE;
    for q in t.quotient {
        f -= zero_poly * zeta_ni * q;
        zeta_ni *= zeta_n;
    }
    for j in 0..4 {
        f += nu[j] * (Fr::ONE + u) * t.wires[j];
    }
    f += nu[4] * key(Selector::Sigma1);
    f += nu[5] * key(Selector::Sigma2);
    f += nu[6] * key(Selector::Sigma3);
    f += nu[7] * key(Selector::QArith);
    f += nu[8] * key(Selector::QEcc);
    f += nu[9] * key(Selector::QC);

    // E
    let mut e = Fr::ZERO;
    for j in 0..4 {
        e += nu[j] * p.wire_evals[j];
    }
    for j in 0..3 {
        e += nu[4 + j] * p.sigma_evals[j];
    }
    e += nu[7] * p.q_arith_eval + nu[8] * p.q_ecc_eval + nu[9] * p.q_c_eval;
    let mut shifted = p.z_omega_eval;
    for j in 0..4 {
        shifted += nu[j] * p.shifted_wire_evals[j];
    }
    e += u * shifted - lin.r0;

    let mut rhs = f + zeta * t.pi_z + u * zeta * omega * t.pi_z_omega - e;
    let mut lhs = -(t.pi_z + u * t.pi_z_omega);
    if let Some((p0, p1)) = t.recursion {
        rhs += u.square() * p0;
        lhs += u.square() * p1;
    }
    (rhs, lhs)
}

fn check_fixture(fx: &Fixture) {
    let (rhs, lhs) = expected_logs(fx);

    let tracker = DlogTracker::new();
    fx.trapdoor.register(&tracker).unwrap();
    let points = Verifier::with_backend(fx.vk.clone(), &tracker)
        .unwrap()
        .pairing_points(&fx.proof, &fx.public_inputs)
        .unwrap();

    assert_eq!(tracker.dlog(&points.rhs), Some(rhs), "rhs");
    assert_eq!(tracker.dlog(&points.lhs), Some(lhs), "lhs");
    // e(rhs, [1]₂)·e(lhs, [x]₂) = 1  ⇔  rhs + x·lhs = 0
    assert_eq!(rhs + fx.trapdoor.x * lhs, Fr::ZERO);
}

#[test]
fn test_pairing_points_follow_opening_equation() {
    let inputs: Vec<Fr> = (1..=5).map(|i| Fr::from_u64(i * 1000 + 3)).collect();
    let fx = trapdoor_fixture(b"opening equation", 5, &inputs).unwrap();
    check_fixture(&fx);
}

#[test]
fn test_pairing_points_without_public_inputs() {
    let fx = trapdoor_fixture(b"opening equation, no inputs", 3, &[]).unwrap();
    check_fixture(&fx);
}

#[test]
fn test_recursive_pairing_points_follow_opening_equation() {
    let inputs = [Fr::from_u64(42), Fr::from_u64(43)];
    let fx =
        trapdoor_fixture_with_recursion(b"opening equation, recursive", 4, &inputs).unwrap();
    assert!(fx.trapdoor.recursion.is_some());
    check_fixture(&fx);
}
