use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{ExporterError, Result};
use crate::model::path::{as_number, lookup, number, text};

/// Aggregate entry under `legends.all` that is not a real legend.
const AGGREGATE_LEGEND: &str = "Global";

/// Flat view of one `/bridge` response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerSnapshot {
    // global
    pub identifier: String,
    pub platform: String,
    pub level: f64,
    pub next_level_percentage: f64,
    pub banned: String,
    pub ban_duration: f64,

    // global.rank
    pub br_rank_name: String,
    pub br_rank_score: f64,
    pub br_rank_div: f64,

    // global.arena
    pub arena_rank_name: String,
    pub arena_rank_score: f64,
    pub arena_rank_div: f64,

    // global.battlepass
    pub battle_pass_level: f64,
    pub battle_pass_history: f64,

    // realtime
    pub lobby_state: String,
    pub is_online: f64,
    pub is_in_game: f64,
    pub can_join: f64,
    pub party_full: String,
    pub selected_legend: String,
    pub current_state: String,

    // legends
    pub current_legend_name: String,
    pub current_legend_br_kills: f64,
    pub legend_kills: BTreeMap<String, f64>,

    // total
    pub kills: f64,
    pub kill_death_ratio: String,

    // mozambiquehere_internal
    pub mozambique_new_db: String,
    pub mozambique_cluster_server: String,

    pub processing_time: f64,
}

impl PlayerSnapshot {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let v: Value = serde_json::from_slice(body)?;
        Self::from_json(&v)
    }

    pub fn from_json(v: &Value) -> Result<Self> {
        Ok(Self {
            identifier: text(v, &["global", "name"])?,
            platform: text(v, &["global", "platform"])?,
            level: number(v, &["global", "level"])?,
            next_level_percentage: number(v, &["global", "toNextLevelPercent"])?,
            banned: text(v, &["global", "bans", "isActive"])?,
            ban_duration: number(v, &["global", "bans", "remainingSeconds"])?,

            br_rank_name: text(v, &["global", "rank", "rankName"])?,
            br_rank_score: number(v, &["global", "rank", "rankScore"])?,
            br_rank_div: number(v, &["global", "rank", "rankDiv"])?,

            arena_rank_name: text(v, &["global", "arena", "rankName"])?,
            arena_rank_score: number(v, &["global", "arena", "rankScore"])?,
            arena_rank_div: number(v, &["global", "arena", "rankDiv"])?,

            battle_pass_level: number(v, &["global", "battlepass", "level"])?,
            battle_pass_history: battle_pass_history(lookup(
                v,
                &["global", "battlepass", "history"],
            )?)?,

            lobby_state: text(v, &["realtime", "lobbyState"])?,
            is_online: number(v, &["realtime", "isOnline"])?,
            is_in_game: number(v, &["realtime", "isInGame"])?,
            can_join: number(v, &["realtime", "canJoin"])?,
            party_full: text(v, &["realtime", "partyFull"])?,
            selected_legend: text(v, &["realtime", "selectedLegend"])?,
            current_state: text(v, &["realtime", "currentState"])?,

            current_legend_name: text(v, &["legends", "selected", "LegendName"])?,
            current_legend_br_kills: selected_legend_first_stat(v)?,
            legend_kills: legend_kills(lookup(v, &["legends", "all"])?)?,

            kills: number(v, &["total", "kills"])?,
            kill_death_ratio: text(v, &["total", "kd"])?,

            mozambique_new_db: text(v, &["mozambiquehere_internal", "isNewToDB"])?,
            mozambique_cluster_server: text(v, &["mozambiquehere_internal", "clusterSrv"])?,

            processing_time: number(v, &["processingTime"])?,
        })
    }
}

/// `legends.selected.data[0].value`, the first tracker on the selected banner.
fn selected_legend_first_stat(v: &Value) -> Result<f64> {
    let first = lookup(v, &["legends", "selected", "data"])?
        .get(0)
        .ok_or_else(|| ExporterError::MissingField("legends.selected.data[0]".into()))?;
    let value = first
        .get("value")
        .ok_or_else(|| ExporterError::MissingField("legends.selected.data[0].value".into()))?;
    as_number(value, "legends.selected.data[0].value")
}

/// Battle pass history is either a scalar or a per-season object; the
/// per-season form sums the levels of purchased passes (unowned seasons are -1).
fn battle_pass_history(v: &Value) -> Result<f64> {
    const PATH: &str = "global.battlepass.history";
    match v {
        Value::Object(seasons) if !seasons.contains_key("value") => {
            let mut total = 0.0;
            for (season, level) in seasons {
                let level = as_number(level, &format!("{PATH}.{season}"))?;
                if level > 0.0 {
                    total += level;
                }
            }
            Ok(total)
        }
        other => as_number(other, PATH),
    }
}

/// Kill counts per legend from `legends.all`.
///
/// The `Global` aggregate, entries without a `data` array, and legends with
/// zero kills are left out. A legend whose trackers do not include `kills`
/// counts as zero. A `legends.all` that is not an object, or a `kills`
/// tracker holding a non-numeric value, fails the extraction.
pub fn legend_kills(all: &Value) -> Result<BTreeMap<String, f64>> {
    let legends = all.as_object().ok_or_else(|| ExporterError::FieldType {
        path: "legends.all".into(),
        expected: "object",
    })?;

    let mut out = BTreeMap::new();
    for (name, info) in legends {
        if name == AGGREGATE_LEGEND {
            continue;
        }
        let Some(trackers) = info.get("data").and_then(Value::as_array) else {
            continue;
        };

        let mut kills = 0.0;
        for (i, tracker) in trackers.iter().enumerate() {
            if tracker.get("key").and_then(Value::as_str) != Some("kills") {
                continue;
            }
            let path = format!("legends.all.{name}.data[{i}].value");
            let value = tracker
                .get("value")
                .ok_or_else(|| ExporterError::MissingField(path.clone()))?;
            kills = as_number(value, &path)?;
            break;
        }

        if kills != 0.0 {
            out.insert(name.clone(), kills);
        } else {
            tracing::trace!(legend = %name, "skipping legend without kills");
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn history_sums_owned_seasons() {
        let v = json!({ "season1": -1, "season2": 110, "season3": "45" });
        assert_eq!(battle_pass_history(&v).unwrap(), 155.0);
    }

    #[test]
    fn history_accepts_scalar() {
        assert_eq!(battle_pass_history(&json!(12)).unwrap(), 12.0);
    }

    #[test]
    fn empty_selected_data_is_missing_field() {
        let v = json!({ "legends": { "selected": { "data": [] } } });
        let err = selected_legend_first_stat(&v).unwrap_err();
        assert_eq!(err.to_string(), "missing field: legends.selected.data[0]");
    }
}
