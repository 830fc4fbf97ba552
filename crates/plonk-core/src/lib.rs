//! TurboPLONK verifier over BN254
//!
//! Verifies proofs from a 4-wire TurboPLONK prover (arithmetic, fixed-base
//! scalar multiplication, range and logic gates) against a fixed verification
//! key, using a Keccak256 Fiat-Shamir transcript and a KZG opening check.
//!
//! ```ignore
//! use turbo_plonk_core::{Verifier, VerificationKey};
//!
//! let verifier = Verifier::from_key_bytes(&vk_bytes)?;
//! verifier.verify(&proof_bytes, &public_inputs)?;
//! ```

pub mod constants;
pub mod debug;
pub mod errors;
pub mod evaluator;
pub mod field;
pub mod key;
pub mod ops;
pub mod proof;
pub mod transcript;
pub mod types;
pub mod verifier;
pub mod widgets;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use errors::{Bn254Error, KeyError, PointError, ProofError, VerifyError};
pub use field::{batch_invert, Fq, Fr};
pub use key::{Selector, VerificationKey, VK_SIZE};
pub use ops::{Bn254, CurveOps};
pub use proof::{Proof, PROOF_SIZE};
pub use transcript::Challenges;
pub use types::{G1Point, G2Point};
pub use verifier::{is_valid, verify, PairingPoints, Verifier};
