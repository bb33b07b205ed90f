use serde::{Deserialize, Serialize};

use crate::domain::models::user::User;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserDTO {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl UserDTO {
    /// Partial update carrying only the id; set the fields to change.
    pub fn for_update(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn has_changes(&self) -> bool {
        self.email.is_some() || self.name.is_some() || self.image.is_some()
    }
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        UserDTO {
            id: value.id,
            email: value.email,
            name: value.name,
            image: value.image,
        }
    }
}
