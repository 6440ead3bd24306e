//! Typed ID definitions for all domain entities.
//!
//! One alias per entity; the compiler keeps them from being mixed up.

pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Profile entities (patients, counsellors, admins).
pub struct Profile;

/// Marker type for Counsellor entities (approved providers).
pub struct Counsellor;

/// Marker type for Assignment entities (patient-counsellor pairings).
pub struct Assignment;

/// Marker type for Conversation entities.
pub struct Conversation;

/// Marker type for Message entities.
pub struct Message;

/// Marker type for Notification entities.
pub struct Notification;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Profile entities.
pub type ProfileId = Id<Profile>;

/// Typed ID for Counsellor entities.
pub type CounsellorId = Id<Counsellor>;

/// Typed ID for Assignment entities.
pub type AssignmentId = Id<Assignment>;

/// Typed ID for Conversation entities.
pub type ConversationId = Id<Conversation>;

/// Typed ID for Message entities.
pub type MessageId = Id<Message>;

/// Typed ID for Notification entities.
pub type NotificationId = Id<Notification>;
