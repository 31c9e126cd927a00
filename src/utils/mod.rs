//! Utility modules

pub mod memory;
pub mod results;
pub mod validation;

pub use memory::{MemoryCandidatePool, MemoryRateTable};
pub use results::{
    best_target_id, can_auto_approve, filter_by_status, format_suggestion, review_required,
};
