// Core moderation module - the content gate every entry passes before it is
// analyzed or stored. Pure domain logic plus one provider port.

pub mod content_classifier;
pub mod moderation_models;
pub mod moderation_rules;
pub mod moderation_service;
pub mod remote_moderation;
pub mod spam_detector;

pub use moderation_models::*;
pub use moderation_service::ModerationGate;
pub use remote_moderation::{ModerationProvider, ModerationProviderError, RemoteModerationAdapter};
