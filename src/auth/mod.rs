pub mod gate;
pub mod session;
pub mod store;

pub use gate::{check_access, visible_routes, Access, Route};
pub use session::{ActiveSession, LogNavigator, Navigator, Role, SessionManager};
pub use store::{FileSessionStore, MemorySessionStore, SessionError, SessionStore, StoredSession};
