//! Conversation routing: per-chat sessions, the handler registry, and the
//! dispatcher that ties them to storage

pub mod handlers;
pub mod registry;
pub mod reply;
pub mod router;
pub mod session;

pub use registry::{normalize, HandlerFn, HandlerRecord, Registry, RegistryError, Trigger};
pub use reply::Reply;
pub use router::Router;
pub use session::{ChatSession, ChatStage, SessionStore, SharedSession};
