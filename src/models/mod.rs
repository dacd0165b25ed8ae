mod endpoint;
mod result;
mod session;

pub use endpoint::{AuthMode, Endpoint, HttpMethod};
pub use result::{Outcome, ProbeBody, ProbeResult, ReportEntry, RunReport};
pub use session::{Field, Session};
