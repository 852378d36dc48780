// src/models.rs
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordEntry {
    pub id: Uuid,
    pub site: String,
    pub username: String,
    pub password: String, // Stored as entered, no encryption at rest
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordFilter {
    pub site_contains: Option<String>,
    pub username_contains: Option<String>,
}

// A credential waiting to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassword {
    pub site: String,
    pub username: String,
    pub password: String,
    pub notes: Option<String>,
}
