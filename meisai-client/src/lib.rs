//! meisai-client: Vpass request payloads, response parsing, and the
//! authenticated session state machine.

pub mod error;
pub mod parse;
pub mod payload;
pub mod session;

pub use error::ClientError;
pub use session::{PortalSession, VpassSession};
