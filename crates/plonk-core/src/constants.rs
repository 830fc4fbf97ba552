//! Constants for BN254 and TurboPLONK verification

use crate::field::Fr;

/// Maximum supported log2 circuit size (two-adicity of r - 1)
pub const MAX_LOG2_CIRCUIT_SIZE: u32 = 28;

/// Smallest domain that leaves room for the 4 blinding rows
pub const MIN_CIRCUIT_SIZE: u32 = 8;

/// Primitive 2^28-th root of unity in Fr:
/// 0x2a3c09f0a58a7e8500e0a7eb8ef62abc402d111e41112ed49bd61b6e725b19f0
const ROOT_OF_UNITY_2_28: Fr = Fr::from_canonical_limbs([
    0x9bd61b6e725b19f0,
    0x402d111e41112ed4,
    0x00e0a7eb8ef62abc,
    0x2a3c09f0a58a7e85,
]);

/// Number of wires per gate
pub const NUM_WIRES: usize = 4;

/// Coset generators k_j separating the four wire columns in the permutation
/// argument: wire j's identity permutation is k_j * X.
pub const WIRE_COSET_GENERATORS: [u64; NUM_WIRES] = [1, 5, 6, 7];

/// Coset generator used for the public-input rows of the permutation
pub const PUBLIC_INPUT_COSET_GENERATOR: u64 = 5;

/// Number of nu challenges (one per unshifted opening claim)
pub const NUM_NU_CHALLENGES: usize = 10;

/// Number of 68-bit limbs describing the two recursion points
pub const RECURSION_LIMB_COUNT: usize = 16;

/// Bits per recursion limb
pub const RECURSION_LIMB_BITS: u32 = 68;

/// Primitive root of unity for a domain of size 2^log2_n.
/// ω_n = ω_{2^28}^{2^{28-n}}
pub fn root_of_unity(log2_n: u32) -> Option<Fr> {
    if log2_n > MAX_LOG2_CIRCUIT_SIZE {
        return None;
    }
    let mut root = ROOT_OF_UNITY_2_28;
    for _ in log2_n..MAX_LOG2_CIRCUIT_SIZE {
        root = root.square();
    }
    Some(root)
}
