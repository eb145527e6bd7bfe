// 👤 User Entity - plays two derived roles
//
// Host:  owns listings (listings.host_id)
// Guest: owns reservations as trips (reservations.guest_id)
//
// Neither role is stored; both are derived from the relation graph.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{EntityId, ForeignKey, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: Option<String>,
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn new(id: EntityId, name: &str) -> Self {
        User {
            id,
            name: name.to_string(),
            email: None,
            created_at: super::now(),
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }
}

impl Record for User {
    const ENTITY: &'static str = "user";

    fn id(&self) -> EntityId {
        self.id
    }

    fn foreign_key(&self, _key: ForeignKey) -> Option<EntityId> {
        None
    }
}
