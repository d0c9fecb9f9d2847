// src/identity.rs

use serde::{Deserialize, Serialize};

/// Identity of the student an attempt belongs to.
///
/// Handed to the session controller at construction instead of being read
/// from ambient global state, so a controller instance is bound to exactly
/// one user for its whole lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentContext {
    /// Opaque subject identifier issued by the hosted identity provider.
    pub student_id: String,

    /// Display name, when the profile carries one.
    pub display_name: Option<String>,
}

impl StudentContext {
    pub fn new(student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            display_name: None,
        }
    }
}
