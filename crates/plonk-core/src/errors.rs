//! Error types for the TurboPLONK verifier

extern crate alloc;
use alloc::string::String;
use thiserror::Error;

/// Top-level verification error
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    #[error("Proof error: {0}")]
    Proof(#[from] ProofError),

    #[error("BN254 error: {0}")]
    Bn254(#[from] Bn254Error),

    #[error("Malformed point {label}: {reason}")]
    MalformedPoint {
        label: &'static str,
        reason: PointError,
    },

    #[error("Public input error: {0}")]
    PublicInput(String),

    #[error("Transcript error: {0}")]
    Transcript(String),

    #[error("Verification failed")]
    VerificationFailed,
}

/// Why a G1 point was rejected
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PointError {
    #[error("coordinate not below the base field modulus")]
    CoordinateOutOfRange,

    #[error("identity encoding (0, 0)")]
    Identity,

    #[error("point not on curve")]
    NotOnCurve,
}

/// Verification key parsing errors
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Invalid VK size: expected {expected}, got {actual}")]
    InvalidSize { expected: usize, actual: usize },

    #[error("Invalid circuit size {0} (must be a power of two, at least 8)")]
    InvalidCircuitSize(u32),

    #[error("Non-canonical scalar for {0}")]
    NonCanonicalScalar(&'static str),

    #[error("Inconsistent domain: {0}")]
    InconsistentDomain(&'static str),

    #[error("Malformed commitment {label}: {reason}")]
    MalformedCommitment {
        label: &'static str,
        reason: PointError,
    },

    #[error("Invalid G2 point")]
    InvalidG2,

    #[error("Invalid recursion flag {0}")]
    InvalidRecursionFlag(u8),

    #[error("Recursion index {index} out of range for {num_public_inputs} public inputs")]
    RecursionIndexOutOfRange { index: u32, num_public_inputs: u32 },
}

/// Proof parsing errors
#[derive(Debug, Error)]
pub enum ProofError {
    #[error("Invalid proof size: expected {expected}, got {actual}")]
    InvalidSize { expected: usize, actual: usize },

    #[error("Non-canonical scalar {0}")]
    InvalidScalar(&'static str),
}

/// BN254 operation errors
#[derive(Debug, Error)]
pub enum Bn254Error {
    #[error("Syscall error: {0}")]
    SyscallError(String),

    #[error("Pairing check failed")]
    PairingFailed,
}
