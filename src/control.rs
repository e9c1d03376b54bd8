//! Current-limited control loops
//!
//! Both loops are blocking and run to completion. They take their hardware
//! by `&mut`, so a loop cannot be re-entered or share a backend with another
//! one while it runs.

pub mod alignment;
pub mod current_ramp;

pub use alignment::{align, align_stage, AlignStage};
pub use current_ramp::CurrentLimitedRamp;
