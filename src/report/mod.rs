// Re-export all items from the submodules
mod registry;
mod section;

pub use registry::ReportRegistry;
pub use section::ReportSection;
