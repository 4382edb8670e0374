//! The exploration wire contract — the exact shape every model fetch must
//! produce. Parsed with serde so missing required fields fail at the parse
//! site instead of at each access site.

use serde::{Deserialize, Serialize};

/// What kind of entity sits at the center of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    Company,
    Job,
    Candidate,
}

/// The resolved center of the exploration. `name` is the canonical form of
/// whatever the user typed — it, not the raw query, drives cache freshness,
/// node identity, and history entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterEntity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub mission: String,
    pub positive_signals: String,
    pub caveats: String,
}

/// A second-order entity hanging off a layer-1 connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubConnection {
    pub name: String,
    pub reason: String,
}

/// A layer-1 entity related to the center, with the model's one-line reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEntity {
    pub name: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_connections: Option<Vec<SubConnection>>,
}

/// One fully-parsed fetch result. Either all of this is present and valid,
/// or the fetch failed — there is no partial-success state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterResult {
    pub center_entity: CenterEntity,
    pub connections: Vec<ConnectionEntity>,
}

impl CenterResult {
    /// Semantic checks serde cannot express: names must be non-empty and at
    /// least one connection must exist.
    pub fn validate(&self) -> Result<(), String> {
        if self.center_entity.name.trim().is_empty() {
            return Err("centerEntity.name is empty".to_string());
        }
        if self.connections.is_empty() {
            return Err("connections is empty".to_string());
        }
        for connection in &self.connections {
            if connection.name.trim().is_empty() {
                return Err("a connection has an empty name".to_string());
            }
            for sub in connection.sub_connections.iter().flatten() {
                if sub.name.trim().is_empty() {
                    return Err(format!(
                        "a subConnection of '{}' has an empty name",
                        connection.name
                    ));
                }
            }
        }
        Ok(())
    }
}
