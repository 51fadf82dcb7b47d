use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub age: Option<u32>,
    pub gender: String,
    pub blood_group: String,
    pub weight: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    /// New patient with a fresh id; optional demographics stay unset.
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: String::new(),
            age: None,
            gender: String::new(),
            blood_group: String::new(),
            weight: None,
            created_at: Utc::now(),
        }
    }
}
