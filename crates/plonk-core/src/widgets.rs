//! TurboPLONK gate widgets
//!
//! Each widget splits its quotient identity at ζ into a part the verifier can
//! evaluate from the proof's evaluations (added to `r0`) and scalar multipliers
//! for commitments whose evaluations are not sent (added to the
//! linearisation). Sub-identities are separated by successive powers of α,
//! starting from the running `alpha_base`; each widget returns the base for
//! the next one.
//!
//! Widget order and α-power consumption:
//! - Permutation: 3
//! - Arithmetic: 1
//! - Fixed-base scalar multiplication: 5
//! - Range: 4
//! - Logic: 4

use crate::constants::{NUM_WIRES, WIRE_COSET_GENERATORS};
use crate::field::Fr;
use crate::key::{Selector, VK_NUM_COMMITMENTS};
use crate::proof::Proof;

/// Grumpkin b: the fixed-base gate adds points on y^2 = x^3 - 17 over Fr
pub fn grumpkin_b() -> Fr {
    -Fr::from_u64(17)
}

/// Challenges and vanishing-fraction values shared by all widgets
#[derive(Debug, Clone, Copy)]
pub struct WidgetParameters {
    pub alpha: Fr,
    pub beta: Fr,
    pub gamma: Fr,
    pub zeta: Fr,
    pub public_input_delta: Fr,
    pub l_1: Fr,
    pub l_end: Fr,
}

/// Scalar part and commitment multipliers of the linearised quotient identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linearisation {
    /// Evaluation-only terms
    pub r0: Fr,
    /// Multiplier of the grand product commitment [Z]
    pub z: Fr,
    /// Multiplier per verification key commitment, indexed by `Selector`
    pub selectors: [Fr; VK_NUM_COMMITMENTS],
}

impl Linearisation {
    pub fn new() -> Self {
        Self {
            r0: Fr::ZERO,
            z: Fr::ZERO,
            selectors: [Fr::ZERO; VK_NUM_COMMITMENTS],
        }
    }

    fn add_selector(&mut self, selector: Selector, scalar: Fr) {
        self.selectors[selector as usize] += scalar;
    }

    pub fn selector(&self, selector: Selector) -> Fr {
        self.selectors[selector as usize]
    }
}

impl Default for Linearisation {
    fn default() -> Self {
        Self::new()
    }
}

/// d(d - 1)(d - 2)(d - 3): zero iff d is a base-4 digit
#[inline]
pub fn quad(d: Fr) -> Fr {
    let one = Fr::ONE;
    let two = Fr::from_u64(2);
    let three = Fr::from_u64(3);
    d * (d - one) * (d - two) * (d - three)
}

/// next - 4 * current
#[inline]
fn delta(next: Fr, current: Fr) -> Fr {
    next - Fr::from_u64(4) * current
}

/// Run every widget in order. Returns the populated linearisation.
pub fn linearise(proof: &Proof, params: &WidgetParameters) -> Linearisation {
    let mut lin = Linearisation::new();
    let mut alpha_base = params.alpha;

    alpha_base = accumulate_permutation(proof, params, alpha_base, &mut lin);
    alpha_base = accumulate_arithmetic(proof, params, alpha_base, &mut lin);
    alpha_base = accumulate_fixed_base(proof, params, alpha_base, &mut lin);
    alpha_base = accumulate_range(proof, params, alpha_base, &mut lin);
    accumulate_logic(proof, params, alpha_base, &mut lin);

    crate::dbg_fr!("r0", &lin.r0);
    lin
}

/// Copy constraints and boundary conditions of the grand product:
///
/// b·[Π_id·z − Π_σ·z(ζω)] + bα·L_end·(z(ζω) − Δ) + bα²·L1·(z − 1)
///
/// with Π_id = ∏ (a_j + β·k_j·ζ + γ) and Π_σ = ∏ (a_j + β·σ_j + γ).
/// σ4 is not evaluated, so its factor lands on [SIGMA4].
pub fn accumulate_permutation(
    proof: &Proof,
    params: &WidgetParameters,
    alpha_base: Fr,
    lin: &mut Linearisation,
) -> Fr {
    let WidgetParameters {
        alpha,
        beta,
        gamma,
        zeta,
        public_input_delta,
        l_1,
        l_end,
    } = *params;
    let a = &proof.wire_evals;
    let z_omega = proof.z_omega_eval;

    let beta_zeta = beta * zeta;
    let mut identity_product = Fr::ONE;
    for j in 0..NUM_WIRES {
        let k = Fr::from_u64(WIRE_COSET_GENERATORS[j]);
        identity_product *= a[j] + k * beta_zeta + gamma;
    }

    let mut sigma_product = Fr::ONE;
    for j in 0..3 {
        sigma_product *= a[j] + beta * proof.sigma_evals[j] + gamma;
    }

    let alpha_sq = alpha.square();

    // r0
    let mut r0 = -(alpha_base * sigma_product * (a[3] + gamma) * z_omega);
    r0 += alpha_base * alpha * l_end * (z_omega - public_input_delta);
    r0 -= alpha_base * alpha_sq * l_1;
    lin.r0 += r0;

    // [Z]
    lin.z += alpha_base * identity_product + alpha_base * alpha_sq * l_1;

    // [SIGMA4]
    lin.add_selector(
        Selector::Sigma4,
        -(alpha_base * sigma_product * beta * z_omega),
    );

    alpha_base * alpha_sq * alpha
}

/// Standard TurboPLONK arithmetic gate:
///
/// q_arith·(q_m·a1·a2 + q1·a1 + q2·a2 + q3·a3 + q4·a4 + q5·(a4² − a4)(a4 − 2)
///          + q_c + (q_arith − 1)·quad(a3 − 4·a4))
pub fn accumulate_arithmetic(
    proof: &Proof,
    params: &WidgetParameters,
    alpha_base: Fr,
    lin: &mut Linearisation,
) -> Fr {
    let a = &proof.wire_evals;
    let q_arith = proof.q_arith_eval;
    let scale = alpha_base * q_arith;

    let extra_small_addition = quad(delta(a[2], a[3]));
    lin.r0 += scale * (proof.q_c_eval + (q_arith - Fr::ONE) * extra_small_addition);

    let a4_sq = a[3].square();
    lin.add_selector(Selector::QM, scale * a[0] * a[1]);
    lin.add_selector(Selector::Q1, scale * a[0]);
    lin.add_selector(Selector::Q2, scale * a[1]);
    lin.add_selector(Selector::Q3, scale * a[2]);
    lin.add_selector(Selector::Q4, scale * a[3]);
    lin.add_selector(
        Selector::Q5,
        scale * (a4_sq - a[3]) * (a[3] - Fr::from_u64(2)),
    );

    alpha_base * params.alpha
}

/// Fixed-base scalar multiplication step. The accumulator (x1, y1) = (a1, a2)
/// absorbs the point (x_α, y_α) selected by the signed digit δ = a4(ζω) − 4·a4,
/// producing (x2, y2) = (a1(ζω), a2(ζω)).
///
/// 1. (δ + 3)(δ + 1)(δ − 1)(δ − 3)
/// 2. x_α − (δ²·q1 + q2), x_α = a3(ζω)
/// 3. (x2 + x1 + x_α)(x_α − x1)² − x_α³ − b − y1² + 2·y1·y_α, y_α = δ(x_α·q3 + q_m)
/// 4. (y2 + y1)(x_α − x1) − (y_α − y1)(x1 − x2)
/// 5. q_c·(x1 − q4·(1 − a4) − q5·a4)
///
/// All scaled by q_ecc.
pub fn accumulate_fixed_base(
    proof: &Proof,
    params: &WidgetParameters,
    alpha_base: Fr,
    lin: &mut Linearisation,
) -> Fr {
    let alpha = params.alpha;
    let a = &proof.wire_evals;
    let shifted = &proof.shifted_wire_evals;
    let q_ecc = proof.q_ecc_eval;
    let q_c = proof.q_c_eval;

    let x1 = a[0];
    let y1 = a[1];
    let x2 = shifted[0];
    let y2 = shifted[1];
    let x_alpha = shifted[2];
    let d = delta(shifted[3], a[3]);

    let one = Fr::ONE;
    let three = Fr::from_u64(3);

    let b0 = alpha_base * q_ecc;
    let b1 = b0 * alpha;
    let b2 = b1 * alpha;
    let b3 = b2 * alpha;
    let b4 = b3 * alpha;

    // 1. digit range
    let digit = (d + three) * (d + one) * (d - one) * (d - three);
    lin.r0 += b0 * digit;

    // 2. x_α selection
    lin.r0 += b1 * x_alpha;
    lin.add_selector(Selector::Q1, -(b1 * d.square()));
    lin.add_selector(Selector::Q2, -b1);

    // 3. x accumulator
    let x_diff = x_alpha - x1;
    let x_terms = (x2 + x1 + x_alpha) * x_diff.square()
        - x_alpha.square() * x_alpha
        - grumpkin_b()
        - y1.square();
    lin.r0 += b2 * x_terms;
    let two_y1_d = Fr::from_u64(2) * y1 * d;
    lin.add_selector(Selector::Q3, b2 * two_y1_d * x_alpha);
    lin.add_selector(Selector::QM, b2 * two_y1_d);

    // 4. y accumulator
    let x1_minus_x2 = x1 - x2;
    lin.r0 += b3 * ((y2 + y1) * x_diff + y1 * x1_minus_x2);
    let d_x = d * x1_minus_x2;
    lin.add_selector(Selector::Q3, -(b3 * d_x * x_alpha));
    lin.add_selector(Selector::QM, -(b3 * d_x));

    // 5. initialisation
    let init = b4 * q_c;
    lin.r0 += init * x1;
    lin.add_selector(Selector::Q4, -(init * (one - a[3])));
    lin.add_selector(Selector::Q5, -(init * a[3]));

    alpha_base * alpha.pow_u64(5)
}

/// Four base-4 digit checks across the row and into the next one:
/// a3 − 4·a4, a2 − 4·a3, a1 − 4·a2, a4(ζω) − 4·a1. Scales [QRANGE].
pub fn accumulate_range(
    proof: &Proof,
    params: &WidgetParameters,
    alpha_base: Fr,
    lin: &mut Linearisation,
) -> Fr {
    let alpha = params.alpha;
    let a = &proof.wire_evals;
    let a4_omega = proof.shifted_wire_evals[3];

    let deltas = [
        delta(a[2], a[3]),
        delta(a[1], a[2]),
        delta(a[0], a[1]),
        delta(a4_omega, a[0]),
    ];

    let mut multiplier = Fr::ZERO;
    let mut power = alpha_base;
    for d in deltas {
        multiplier += power * quad(d);
        power *= alpha;
    }
    lin.add_selector(Selector::QRange, multiplier);

    power
}

/// 6·AND of two base-4 digits given s = a + b and w = a·b
fn and_times_six(s: Fr, w: Fr) -> Fr {
    let c = |v: u64| Fr::from_u64(v);
    let s_sq = s.square();
    let w_sq = w.square();
    c(83) * w - c(81) * s * w + c(45) * w_sq + c(18) * s_sq * w - c(18) * s * w_sq
        + c(4) * w_sq * w
}

/// Two-bit AND/XOR step. δa, δb, δc are the base-4 digits of the three
/// accumulators (wires 1, 2, 4) and w = a3(ζω) holds δa·δb.
///
/// 1. quad(δa)
/// 2. quad(δb)
/// 3. w − δa·δb
/// 4. 12·δc − (3·q_c − 1)·P(s, w) − 6·s·(1 − q_c), P = 6·AND
///
/// q_c = 1 selects AND, q_c = −1 selects XOR. Scales [QLOGIC].
pub fn accumulate_logic(
    proof: &Proof,
    params: &WidgetParameters,
    alpha_base: Fr,
    lin: &mut Linearisation,
) -> Fr {
    let alpha = params.alpha;
    let a = &proof.wire_evals;
    let shifted = &proof.shifted_wire_evals;
    let q_c = proof.q_c_eval;
    let c = |v: u64| Fr::from_u64(v);

    let delta_a = delta(shifted[0], a[0]);
    let delta_b = delta(shifted[1], a[1]);
    let delta_c = delta(shifted[3], a[3]);
    let w = shifted[2];
    let s = delta_a + delta_b;

    let output = c(12) * delta_c
        - (c(3) * q_c - Fr::ONE) * and_times_six(s, w)
        - c(6) * s * (Fr::ONE - q_c);

    let identities = [quad(delta_a), quad(delta_b), w - delta_a * delta_b, output];

    let mut multiplier = Fr::ZERO;
    let mut power = alpha_base;
    for identity in identities {
        multiplier += power * identity;
        power *= alpha;
    }
    lin.add_selector(Selector::QLogic, multiplier);

    power
}
