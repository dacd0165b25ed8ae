mod engine;
mod plan;

pub use engine::{ProbeRunner, RunEnd, summarize};
pub use plan::{Capture, ProbeStep, default_plan, discovery_plan};
