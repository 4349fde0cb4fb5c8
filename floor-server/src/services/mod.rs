//! Service layer
//!
//! - [`MenuCatalog`] - the in-memory menu
//! - [`AssistantService`] - AI dish advisor (remote text generation with a local fallback)
//! - [`NotificationInbox`] - staff notifications built from floor events

pub mod assistant;
pub mod catalog_service;
pub mod notifications;

pub use assistant::{
    AssistantError, AssistantReply, AssistantService, Audience, FALLBACK_REPLY, GeminiClient,
    ReplySource, TextGenerator,
};
pub use catalog_service::{CatalogError, MenuCatalog, MenuPreview};
pub use notifications::{
    InboxView, Notification, NotificationError, NotificationInbox, NotificationKind,
};
