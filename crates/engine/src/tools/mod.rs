//! Non-deforming tools: margin tracing, occlusal coloring, cross-sections,
//! measurement and notes.

pub mod margin;
pub mod measure;
pub mod notes;
pub mod occlusal;
pub mod section;

pub use margin::MarginLine;
pub use measure::{MeasureOutcome, MeasureState, MeasureTool, Measurement};
pub use notes::{Note, Notes};
pub use occlusal::classify_occlusion;
pub use section::{CrossSection, Plane, SectionState, contour};
