//! Session persistence for per-conversation script progress.

pub mod memory;
pub mod model;
pub mod traits;

pub use memory::InMemorySessionStore;
pub use model::{Session, SessionSnapshot};
pub use traits::{SessionGuard, SessionStore};
