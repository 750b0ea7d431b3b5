//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile and ledger state stored in Firestore.
///
/// The document id is the opaque subject identifier issued by the external
/// auth provider. Users are created with an empty profile on first
/// authenticated fetch and never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// External-auth subject identifier (also used as document ID)
    pub subject: String,
    /// Unique handle, lowercase alphanumeric + underscore; set at onboarding
    pub display_name: Option<String>,
    /// Free-text bio
    pub bio: Option<String>,
    /// Up to 3 vibe tags from the fixed palette
    #[serde(default)]
    pub vibes: Vec<String>,
    /// Avatar URL
    pub avatar_url: Option<String>,
    /// Point total. Never negative: deductions clamp at 0.
    #[serde(default)]
    pub num_points: u32,
    /// Ordered completion log. Repeatable tasks may appear more than once;
    /// order is the basis for "most recent" removal on deduction.
    #[serde(default)]
    pub completed_tasks: Vec<String>,
    /// When the user first authenticated
    pub created_at: String,
    /// Last profile/ledger mutation
    pub updated_at: String,
}

impl User {
    /// A fresh user with an empty profile, created on first authentication.
    pub fn new(subject: impl Into<String>, now: impl Into<String>) -> Self {
        let now = now.into();
        Self {
            subject: subject.into(),
            display_name: None,
            bio: None,
            vibes: Vec::new(),
            avatar_url: None,
            num_points: 0,
            completed_tasks: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
