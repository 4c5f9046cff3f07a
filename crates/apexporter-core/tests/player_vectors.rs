//! Player stats extraction tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use apexporter_core::{legend_kills, PlayerSnapshot};
use serde_json::json;


#[test]
fn extracts_every_field() {
    let v = vector_loader::load("bridge.json");
    let p = PlayerSnapshot::from_json(&v).unwrap();

    assert_eq!(p.identifier, "NotAWraithMain");
    assert_eq!(p.platform, "PC");
    assert_eq!(p.level, 512.0);
    assert_eq!(p.next_level_percentage, 37.0);
    assert_eq!(p.banned, "false");
    assert_eq!(p.ban_duration, 0.0);

    assert_eq!(p.br_rank_name, "Platinum");
    assert_eq!(p.br_rank_score, 8120.0);
    assert_eq!(p.br_rank_div, 3.0);
    assert_eq!(p.arena_rank_name, "Unranked");
    assert_eq!(p.arena_rank_score, 0.0);
    assert_eq!(p.arena_rank_div, 0.0);

    assert_eq!(p.battle_pass_level, 58.0);
    assert_eq!(p.battle_pass_history, 155.0);

    assert_eq!(p.lobby_state, "open");
    assert_eq!(p.is_online, 1.0);
    assert_eq!(p.is_in_game, 0.0);
    assert_eq!(p.can_join, 1.0);
    assert_eq!(p.party_full, "0");
    assert_eq!(p.selected_legend, "Wraith");
    assert_eq!(p.current_state, "inLobby");

    assert_eq!(p.current_legend_name, "Wraith");
    assert_eq!(p.current_legend_br_kills, 4521.0);

    assert_eq!(p.kills, 4831.0);
    assert_eq!(p.kill_death_ratio, "-1");
    assert_eq!(p.mozambique_new_db, "false");
    assert_eq!(p.mozambique_cluster_server, "MAIN-API-2");
    assert!((p.processing_time - 0.041592).abs() < 1e-6);
}

#[test]
fn legend_kills_skip_global_missing_data_and_zero() {
    let v = vector_loader::load("bridge.json");
    let p = PlayerSnapshot::from_json(&v).unwrap();

    let names: Vec<&str> = p.legend_kills.keys().map(String::as_str).collect();
    assert_eq!(names, ["Bloodhound", "Wraith"]);
    assert_eq!(p.legend_kills["Wraith"], 4521.0);
    assert_eq!(p.legend_kills["Bloodhound"], 310.0);
}

#[test]
fn legend_kills_on_non_object_is_field_type_error() {
    let err = legend_kills(&json!(null)).expect_err("must fail");
    assert_eq!(err.to_string(), "unexpected value at legends.all: expected object");
    assert!(legend_kills(&json!([1, 2, 3])).is_err());
    assert!(legend_kills(&json!({})).unwrap().is_empty());
}

#[test]
fn null_legends_all_fails_whole_snapshot() {
    let mut v = vector_loader::load("bridge.json");
    v["legends"]["all"] = json!(null);

    let err = PlayerSnapshot::from_json(&v).expect_err("must fail");
    assert_eq!(err.code().as_str(), "field_type");
}

#[test]
fn non_numeric_kills_fails_whole_snapshot() {
    let mut v = vector_loader::load("bridge.json");
    v["legends"]["all"]["Wraith"]["data"][0]["value"] = json!("N/A");

    let err = PlayerSnapshot::from_json(&v).expect_err("must fail");
    assert_eq!(
        err.to_string(),
        "unexpected value at legends.all.Wraith.data[0].value: expected number"
    );
}

#[test]
fn kills_tracker_without_value_is_missing_field() {
    let all = json!({ "Octane": { "data": [ { "name": "BR Kills", "key": "kills" } ] } });
    let err = legend_kills(&all).expect_err("must fail");
    assert_eq!(err.to_string(), "missing field: legends.all.Octane.data[0].value");
}

#[test]
fn missing_nested_key_names_full_path() {
    let mut v = vector_loader::load("bridge.json");
    vector_loader::remove(&mut v, "global.rank.rankScore");

    let err = PlayerSnapshot::from_json(&v).expect_err("must fail");
    assert_eq!(err.to_string(), "missing field: global.rank.rankScore");
}

#[test]
fn missing_processing_time_fails() {
    let mut v = vector_loader::load("bridge.json");
    vector_loader::remove(&mut v, "processingTime");

    let err = PlayerSnapshot::from_json(&v).expect_err("must fail");
    assert_eq!(err.code().as_str(), "missing_field");
}
