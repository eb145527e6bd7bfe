// 🏙️ City Entity - top of the marketplace hierarchy
//
// A city owns neighborhoods; its listings are reached through them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{EntityId, ForeignKey, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: EntityId,
    pub name: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub created_at: NaiveDateTime,
}

impl City {
    pub fn new(id: EntityId, name: &str) -> Self {
        City {
            id,
            name: name.to_string(),
            state: None,
            country: None,
            created_at: super::now(),
        }
    }

    /// Set state and country
    pub fn located(mut self, state: &str, country: &str) -> Self {
        self.state = Some(state.to_string());
        self.country = Some(country.to_string());
        self
    }
}

impl Record for City {
    const ENTITY: &'static str = "city";

    fn id(&self) -> EntityId {
        self.id
    }

    fn foreign_key(&self, _key: ForeignKey) -> Option<EntityId> {
        None
    }
}
