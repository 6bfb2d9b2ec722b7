pub mod prompt;
pub mod session;

pub use prompt::{AssumeYes, Prompt};
pub use session::{Outcome, Session, SessionState};
