pub mod cookie;
pub mod store;
pub mod types;

pub use cookie::SessionCookie;
pub use store::{SessionError, SessionStore};
pub use types::{Session, SessionId};
