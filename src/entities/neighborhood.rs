use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{EntityId, ForeignKey, Record};

/// Neighborhood - belongs to a city, owns listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub id: EntityId,
    pub name: String,
    pub zip_code: Option<String>,
    pub city_id: EntityId,
    pub created_at: NaiveDateTime,
}

impl Neighborhood {
    pub fn new(id: EntityId, name: &str, city_id: EntityId) -> Self {
        Neighborhood {
            id,
            name: name.to_string(),
            zip_code: None,
            city_id,
            created_at: super::now(),
        }
    }

    pub fn with_zip_code(mut self, zip_code: &str) -> Self {
        self.zip_code = Some(zip_code.to_string());
        self
    }
}

impl Record for Neighborhood {
    const ENTITY: &'static str = "neighborhood";

    fn id(&self) -> EntityId {
        self.id
    }

    fn foreign_key(&self, key: ForeignKey) -> Option<EntityId> {
        match key {
            ForeignKey::City => Some(self.city_id),
            _ => None,
        }
    }
}
