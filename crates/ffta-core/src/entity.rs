//! The fixed set of tables the service exposes

use crate::error::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A named table backed by one spreadsheet file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Races,
    Jobs,
    Abilities,
}

impl Entity {
    /// Every entity, in listing order
    pub const ALL: [Entity; 3] = [Entity::Races, Entity::Jobs, Entity::Abilities];

    /// Name used in URLs and as the default file stem
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Races => "races",
            Entity::Jobs => "jobs",
            Entity::Abilities => "abilities",
        }
    }
}

impl FromStr for Entity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Entity::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| Error::EntityNotFound(s.to_string()))
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
