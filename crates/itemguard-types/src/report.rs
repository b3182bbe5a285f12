use crate::ViolationCode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for saved reports.
pub const SCHEMA_REPORT_V1: &str = "itemguard.report.v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Per-entity counters as exposed by the scanner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityStats {
    pub total_violations: u64,
    /// Entries currently retained in the bounded history.
    pub recent_violations: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServerStats {
    pub total_entities: u64,
    pub total_violations: u64,
    pub monitoring_enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    pub violations: u64,
}

/// One retained history record: an item found violating during a scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HistoryEntry {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
    pub slot: u32,
    pub item_kind: String,
    pub codes: Vec<ViolationCode>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBody {
    Server {
        stats: ServerStats,
        leaderboard: Vec<LeaderboardEntry>,
    },
    Entity {
        entity_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        entity_name: Option<String>,
        stats: EntityStats,
        #[serde(default)]
        recent: Vec<HistoryEntry>,
    },
}

impl ReportBody {
    pub fn kind(&self) -> &'static str {
        match self {
            ReportBody::Server { .. } => "server",
            ReportBody::Entity { .. } => "entity",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope {
    pub schema: String,
    pub id: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub body: ReportBody,
}
