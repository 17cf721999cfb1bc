//! Decoder configuration
//!
//! This module provides the options that control how a script table is decoded: the budget
//! that bounds every effect script, how failed pointer targets are treated, and whether
//! distinct targets are decoded in parallel.

/// Upper bounds applied to the instruction stream of a single effect script.
///
/// The format has no explicit stream length; decoding stops at the `End` instruction. The
/// budget guarantees termination on damaged or adversarial data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeBudget {
    /// Maximum number of instructions, `End` included
    pub max_instructions: usize,
    /// Maximum size of the instruction stream in bytes, header excluded
    pub max_bytes: usize,
}

impl Default for DecodeBudget {
    fn default() -> Self {
        Self {
            max_instructions: 4096,
            max_bytes: 0x10000,
        }
    }
}

impl DecodeBudget {
    /// Creates a budget with the given limits.
    #[must_use]
    pub fn new(max_instructions: usize, max_bytes: usize) -> Self {
        Self {
            max_instructions,
            max_bytes,
        }
    }
}

/// How the script table decoder reacts to a pointer target that fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TablePolicy {
    /// The first failure aborts the whole table decode
    #[default]
    Strict,
    /// Failures are recorded alongside their entry index and decoding continues
    Lenient,
}

/// Configuration for decoding a script table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderConfig {
    /// Budget applied to every effect script
    pub budget: DecodeBudget,

    /// Failure handling for pointer targets
    pub policy: TablePolicy,

    /// Decode distinct pointer targets on the rayon thread pool
    pub parallel: bool,
}

impl DecoderConfig {
    /// Strict, sequential decoding with the default budget
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Lenient, sequential decoding with the default budget
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            policy: TablePolicy::Lenient,
            ..Self::default()
        }
    }

    /// Strict decoding of distinct targets in parallel
    #[must_use]
    pub fn parallel() -> Self {
        Self {
            parallel: true,
            ..Self::default()
        }
    }

    /// Replace the budget
    #[must_use]
    pub fn with_budget(mut self, budget: DecodeBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Replace the table policy
    #[must_use]
    pub fn with_policy(mut self, policy: TablePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable parallel decoding
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
