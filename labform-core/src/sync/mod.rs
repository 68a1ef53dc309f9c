//! Section synchronizer.
//!
//! Bridges one mounted section table to the parent form without update
//! loops:
//! 1. First render seeds local state from the parent (or the template)
//! 2. Downward: new external data replaces local state
//! 3. Upward: a genuinely new local value is reported exactly once

mod detector;
mod section;

pub use detector::{ChangeDetector, DetectorState, Inbound};
pub use section::{RenderOutcome, SectionSync};
