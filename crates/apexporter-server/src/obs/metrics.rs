//! Metrics registry for the exporter.
//!
//! Gauge, info, and counter families with dynamic labels backed by `DashMap`.
//! Labels are flattened into sorted key vectors to keep deterministic
//! ordering, and families render in Prometheus text exposition format 0.0.4.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use apexporter_core::{ErrorCode, MapSnapshot, PlayerSnapshot};

type LabelKey = Vec<(String, String)>;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn render_labels(key: &LabelKey) -> String {
    if key.is_empty() {
        return String::new();
    }
    let inner = key
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{inner}}}")
}

/// Sample value as Prometheus expects it (`+Inf`, `-Inf`, `NaN`).
fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf".into() } else { "-Inf".into() }
    } else {
        v.to_string()
    }
}

fn render_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help.replace('\\', "\\\\").replace('\n', "\\n"));
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        render_header(out, name, help, "counter");
        let mut rows: Vec<(LabelKey, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (key, val) in rows {
            let _ = writeln!(out, "{}{} {}", name, render_labels(&key), val);
        }
    }
}

/// Float gauges; values are stored as `f64` bits.
#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl GaugeVec {
    pub fn set(&self, labels: &[(&str, &str)], v: f64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        gauge.store(v.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Option<f64> {
        self.map
            .get(&label_key(labels))
            .map(|g| f64::from_bits(g.load(Ordering::Relaxed)))
    }

    /// Drop every series, e.g. before rewriting a family keyed by map name.
    pub fn reset(&self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        render_header(out, name, help, "gauge");
        let mut rows: Vec<(LabelKey, f64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), f64::from_bits(r.value().load(Ordering::Relaxed))))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, val) in rows {
            let _ = writeln!(out, "{}{} {}", name, render_labels(&key), fmt_value(val));
        }
    }
}

/// Info metric: one label set, rendered as `<name>_info{..} 1`.
#[derive(Default)]
pub struct InfoVec {
    labels: RwLock<Option<LabelKey>>,
}

impl InfoVec {
    /// Replace the current label set.
    pub fn set(&self, labels: &[(&str, &str)]) {
        let mut guard = self.labels.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(label_key(labels));
    }

    /// Value of label `key`, if set.
    pub fn get(&self, key: &str) -> Option<String> {
        let guard = self.labels.read().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        let full = format!("{name}_info");
        render_header(out, &full, help, "gauge");
        let guard = self.labels.read().unwrap_or_else(|e| e.into_inner());
        if let Some(key) = guard.as_ref() {
            let _ = writeln!(out, "{}{} 1", full, render_labels(key));
        }
    }
}

/// Every family the exporter publishes, plus its own health counters.
#[derive(Default)]
pub struct ApexMetrics {
    // map rotation
    pub current_map: InfoVec,
    pub current_map_duration: GaugeVec,
    pub current_map_remaining: GaugeVec,
    pub next_map: InfoVec,
    pub next_map_start: GaugeVec,
    pub next_map_duration: GaugeVec,

    // player
    pub player_identifier: InfoVec,
    pub player_platform: InfoVec,
    pub level: GaugeVec,
    pub next_level_percentage: GaugeVec,
    pub banned: InfoVec,
    pub ban_duration: GaugeVec,
    pub br_rank_name: InfoVec,
    pub br_rank_score: GaugeVec,
    pub br_rank_div: GaugeVec,
    pub arena_rank_name: InfoVec,
    pub arena_rank_score: GaugeVec,
    pub arena_rank_div: GaugeVec,
    pub battle_pass_level: GaugeVec,
    pub battle_pass_history: GaugeVec,
    pub lobby_state: InfoVec,
    pub is_online: GaugeVec,
    pub is_in_game: GaugeVec,
    pub can_join: GaugeVec,
    pub party_full: InfoVec,
    pub selected_legend: InfoVec,
    pub current_state: InfoVec,
    pub current_legend_br_kills: GaugeVec,
    pub legend_kills: GaugeVec,
    pub kills: GaugeVec,
    pub kill_death_ratio: InfoVec,
    pub mozambique_new_db: InfoVec,
    pub mozambique_cluster_server: InfoVec,
    pub processing_time: GaugeVec,

    // exporter self-metrics
    pub polls: CounterVec,
    pub poll_errors: CounterVec,
    pub last_success: GaugeVec,
    pub poll_duration: GaugeVec,

    /// Held for writing while a cycle is published, for reading while rendering.
    cycle: RwLock<()>,
    published: AtomicBool,
    draining: AtomicBool,
}

impl ApexMetrics {
    /// Mark draining state.
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    /// Whether at least one cycle has been published.
    pub fn has_published(&self) -> bool {
        self.published.load(Ordering::Relaxed)
    }

    /// Write one complete cycle. Scrapes never observe a partial cycle.
    pub fn publish(&self, map: &MapSnapshot, player: &PlayerSnapshot) {
        let _cycle = self.cycle.write().unwrap_or_else(|e| e.into_inner());

        let current = [("map_name", map.current_map.as_str())];
        let next = [("map_name", map.next_map.as_str())];
        self.current_map.set(&current);
        self.current_map_duration.reset();
        self.current_map_duration.set(&current, map.current_duration_mins);
        self.current_map_remaining.reset();
        self.current_map_remaining.set(&current, map.current_remaining_mins);
        self.next_map.set(&next);
        self.next_map_start.reset();
        self.next_map_start.set(&next, map.next_start);
        self.next_map_duration.reset();
        self.next_map_duration.set(&next, map.next_duration_mins);

        self.player_identifier.set(&[("name", player.identifier.as_str())]);
        self.player_platform.set(&[("platform", player.platform.as_str())]);
        self.level.set(&[], player.level);
        self.next_level_percentage.set(&[], player.next_level_percentage);
        self.banned.set(&[("banned", player.banned.as_str())]);
        self.ban_duration.set(&[], player.ban_duration);

        self.br_rank_name.set(&[("rank_name", player.br_rank_name.as_str())]);
        self.br_rank_score.set(&[], player.br_rank_score);
        self.br_rank_div.set(&[], player.br_rank_div);
        self.arena_rank_name.set(&[("rank_name", player.arena_rank_name.as_str())]);
        self.arena_rank_score.set(&[], player.arena_rank_score);
        self.arena_rank_div.set(&[], player.arena_rank_div);

        self.battle_pass_level.set(&[], player.battle_pass_level);
        self.battle_pass_history.set(&[], player.battle_pass_history);

        self.lobby_state.set(&[("lobby_state", player.lobby_state.as_str())]);
        self.is_online.set(&[], player.is_online);
        self.is_in_game.set(&[], player.is_in_game);
        self.can_join.set(&[], player.can_join);
        self.party_full.set(&[("party_full", player.party_full.as_str())]);
        self.selected_legend.set(&[("legend", player.selected_legend.as_str())]);
        self.current_state.set(&[("current_state", player.current_state.as_str())]);

        self.current_legend_br_kills.reset();
        self.current_legend_br_kills.set(
            &[("legend", player.current_legend_name.as_str())],
            player.current_legend_br_kills,
        );
        self.legend_kills.reset();
        for (legend, kills) in &player.legend_kills {
            self.legend_kills.set(&[("legend", legend.as_str())], *kills);
        }

        self.kills.set(&[], player.kills);
        self.kill_death_ratio.set(&[("kd", player.kill_death_ratio.as_str())]);
        self.mozambique_new_db.set(&[("new_db", player.mozambique_new_db.as_str())]);
        self.mozambique_cluster_server
            .set(&[("cluster_server", player.mozambique_cluster_server.as_str())]);
        self.processing_time.set(&[], player.processing_time);

        self.published.store(true, Ordering::Relaxed);
    }

    /// Record the outcome of one poll cycle.
    pub fn observe_poll(&self, elapsed: Duration, error: Option<ErrorCode>) {
        self.poll_duration.set(&[], elapsed.as_secs_f64());
        match error {
            None => {
                self.polls.inc(&[("result", "ok")]);
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs_f64())
                    .unwrap_or(0.0);
                self.last_success.set(&[], now);
            }
            Some(code) => {
                self.polls.inc(&[("result", "error")]);
                self.poll_errors.inc(&[("reason", code.as_str())]);
            }
        }
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let _cycle = self.cycle.read().unwrap_or_else(|e| e.into_inner());
        let mut out = String::new();

        self.current_map.render("apex_current_map", "Name of the current map", &mut out);
        self.current_map_duration.render(
            "apex_current_map_duration_total",
            "Duration of the current map in minutes",
            &mut out,
        );
        self.current_map_remaining.render(
            "apex_current_map_remaining_total",
            "Time remaining of the current map in minutes",
            &mut out,
        );
        self.next_map.render("apex_next_map", "Name of the next map", &mut out);
        self.next_map_start.render(
            "apex_next_map_start_total",
            "Start time of the next map",
            &mut out,
        );
        self.next_map_duration.render(
            "apex_next_map_duration_minutes",
            "Duration of the next map in minutes",
            &mut out,
        );

        self.player_identifier.render("apex_player_identifier", "Name of the player", &mut out);
        self.player_platform.render("player_platform", "Platform of the player", &mut out);
        self.level.render("player_level", "Level of the player", &mut out);
        self.next_level_percentage.render(
            "player_next_level_percentage",
            "Next level percentage of the player",
            &mut out,
        );
        self.banned.render("player_banned", "Is the player banned", &mut out);
        self.ban_duration.render("player_ban_duration", "Ban duration of the player", &mut out);
        self.br_rank_name.render("player_br_rank_name", "BR Rank Name of the player", &mut out);
        self.br_rank_score.render("player_br_rank_score", "BR Rank Score of the player", &mut out);
        self.br_rank_div.render("player_br_rank_div", "BR Rank Division of the player", &mut out);
        self.arena_rank_name.render(
            "player_arena_rank_name",
            "Arena Rank Name of the player",
            &mut out,
        );
        self.arena_rank_score.render(
            "player_arena_rank_score",
            "Arena Rank Score of the player",
            &mut out,
        );
        self.arena_rank_div.render(
            "player_arena_rank_div",
            "Arena Rank Division of the player",
            &mut out,
        );
        self.battle_pass_level.render(
            "player_battle_pass_level",
            "Battle Pass Level of the player",
            &mut out,
        );
        self.battle_pass_history.render(
            "player_battle_pass_history",
            "Battle Pass History of the player",
            &mut out,
        );
        self.lobby_state.render("player_lobby_state", "Lobby state of the player", &mut out);
        self.is_online.render("player_is_online", "Is the player online", &mut out);
        self.is_in_game.render("player_is_in_game", "Is the player in a game", &mut out);
        self.can_join.render("player_can_join", "Can the player be joined", &mut out);
        self.party_full.render("player_party_full", "Is the player's party full", &mut out);
        self.selected_legend.render(
            "player_selected_legend",
            "Name of the selected legend",
            &mut out,
        );
        self.current_state.render("player_current_state", "Current state of the player", &mut out);
        self.current_legend_br_kills.render(
            "player_current_legend_br_kills",
            "BR kills tracked on the selected legend",
            &mut out,
        );
        self.legend_kills.render("player_legend_kills", "BR kills per legend", &mut out);
        self.kills.render("player_kills_total", "Total kills of the player", &mut out);
        self.kill_death_ratio.render(
            "player_kill_death_ratio",
            "Kill/Death Ratio of the player",
            &mut out,
        );
        self.mozambique_new_db.render(
            "player_mozambique_new_db",
            "Is the player new to the API database",
            &mut out,
        );
        self.mozambique_cluster_server.render(
            "player_mozambique_cluster_server",
            "Cluster name presenting API",
            &mut out,
        );
        self.processing_time.render("player_processing_time", "API processing time", &mut out);

        self.polls.render("apex_exporter_polls_total", "Poll cycles by result", &mut out);
        self.poll_errors.render(
            "apex_exporter_poll_errors_total",
            "Failed poll cycles by reason",
            &mut out,
        );
        self.last_success.render(
            "apex_exporter_last_success_timestamp_seconds",
            "Unix time of the last published cycle",
            &mut out,
        );
        self.poll_duration.render(
            "apex_exporter_poll_duration_seconds",
            "Duration of the last poll cycle",
            &mut out,
        );

        let draining = if self.is_draining() { 1 } else { 0 };
        let _ = writeln!(out, "# TYPE apex_exporter_draining gauge");
        let _ = writeln!(out, "apex_exporter_draining {draining}");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_label_values() {
        assert_eq!(escape_label("World's \"Edge\"\n"), "World's \\\"Edge\\\"\\n");
    }

    #[test]
    fn unlabeled_gauge_renders_without_braces() {
        let g = GaugeVec::default();
        g.set(&[], 3.5);
        let mut out = String::new();
        g.render("x", "help", &mut out);
        assert!(out.contains("\nx 3.5\n"), "{out}");
    }

    #[test]
    fn special_float_values() {
        assert_eq!(fmt_value(f64::INFINITY), "+Inf");
        assert_eq!(fmt_value(f64::NEG_INFINITY), "-Inf");
        assert_eq!(fmt_value(f64::NAN), "NaN");
        assert_eq!(fmt_value(90.0), "90");
    }

    #[test]
    fn info_set_replaces_labels() {
        let i = InfoVec::default();
        i.set(&[("map_name", "Olympus")]);
        i.set(&[("map_name", "Kings Canyon")]);
        let mut out = String::new();
        i.render("apex_next_map", "help", &mut out);
        assert!(out.contains("apex_next_map_info{map_name=\"Kings Canyon\"} 1"));
        assert!(!out.contains("Olympus"));
    }

    #[test]
    fn label_order_is_sorted() {
        let c = CounterVec::default();
        c.inc(&[("b", "2"), ("a", "1")]);
        assert_eq!(c.get(&[("a", "1"), ("b", "2")]), 1);
    }
}
