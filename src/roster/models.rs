use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FetchError;

/// One player as reported by a roster snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub identity: Option<String>,
    pub support: u64,
    pub role: String,
}

/// Player entry as delivered by the CRCON API, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayer {
    pub name: Option<String>,
    #[serde(default, alias = "player_id")]
    pub steam_id_64: Option<Value>,
    pub support: Option<i64>,
    pub role: Option<String>,
}

impl TryFrom<RawPlayer> for PlayerRecord {
    type Error = FetchError;

    fn try_from(raw: RawPlayer) -> Result<Self, Self::Error> {
        let name = raw
            .name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| FetchError::MalformedRecord("player without a name".to_string()))?;

        let support = match raw.support {
            Some(support) if support >= 0 => support as u64,
            Some(support) => {
                return Err(FetchError::MalformedRecord(format!(
                    "player {} reported negative support {}",
                    name, support
                )))
            }
            None => {
                return Err(FetchError::MalformedRecord(format!(
                    "player {} has no support value",
                    name
                )))
            }
        };

        let role = raw.role.ok_or_else(|| {
            FetchError::MalformedRecord(format!("player {} has no role", name))
        })?;

        let identity = match raw.steam_id_64 {
            Some(Value::String(id)) if !id.is_empty() => Some(id),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };

        Ok(Self {
            name,
            identity,
            support,
            role,
        })
    }
}
