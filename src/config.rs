//! Engine configuration (ambient stack, SPEC_FULL.md §2).
//!
//! spec.md §6 fixes `RESCUE_DELAY` and `MIN_SAFETY_DEPOSIT` as normative
//! constants, but the teacher's own factory takes its rescue delay as a
//! constructor argument rather than a hardcoded constant
//! (`examples/0xYudhishthra-1prime/.../escrow-factory/src/lib.rs::EscrowFactory::new`).
//! `EngineConfig` follows that shape: operations take a config by reference
//! instead of reaching for the constants directly, defaulting to spec's
//! normative values.

use crate::constants::{MIN_SAFETY_DEPOSIT, RESCUE_DELAY_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub rescue_delay_ms: u64,
    pub min_safety_deposit: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rescue_delay_ms: RESCUE_DELAY_MS,
            min_safety_deposit: MIN_SAFETY_DEPOSIT,
        }
    }
}
