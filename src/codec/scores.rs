//! Purpose: Transform the `_scores` block (weights, players, score records, results).
//! Exports: `decode_scores`, `encode_scores`.
//! Role: Handles the three-level string nesting of per-player score records.
//! Invariants: `_players` order is the positional index for every metric array.
//! Invariants: Decode drops each player's own metric slot; encode refills it (and any
//! other missing opponent) with `0`.
//! Invariants: Player ids and weight keys must be unique so mappings keep every entry.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::fields::{
    DEAD_TEAMS, FILES, METRIC_FIELDS, PASSTHROUGH_FIELDS, PLAYER_SCORES, RESULTS, SCORE_DATA,
    SCORES, SERIALIZED_SCORE_DATA, SURVIVING_TEAMS, WEIGHTS, WIRE_DEAD_TEAMS, WIRE_FILES,
    WIRE_PLAYER_SCORES, WIRE_PLAYERS, WIRE_RESULTS, WIRE_SCORES, WIRE_SURVIVING_TEAMS,
    WIRE_WEIGHT_KEYS, WIRE_WEIGHT_VALUES, is_reserved_round_field,
};
use super::schema::{
    embed, embed_list, ensure_len, field_path, index_path, into_array, into_object, into_string,
    parse_embedded, parse_embedded_list, take,
};
use crate::core::error::{Error, ErrorKind};

pub(crate) fn decode_scores(raw: Value) -> Result<Map<String, Value>, Error> {
    let path = WIRE_SCORES;
    let mut scores = into_object(parse_embedded(raw, path)?, path)?;

    let weights = decode_weights(&mut scores)?;

    let players_path = field_path(path, WIRE_PLAYERS);
    let players = player_ids(take(&mut scores, WIRE_PLAYERS, path)?, &players_path)?;

    let raw_scores_path = field_path(path, WIRE_PLAYER_SCORES);
    let raw_scores = into_array(take(&mut scores, WIRE_PLAYER_SCORES, path)?, &raw_scores_path)?;
    ensure_len(&raw_scores_path, raw_scores.len(), players.len(), &players_path)?;

    let files_path = field_path(path, WIRE_FILES);
    let files = into_array(take(&mut scores, WIRE_FILES, path)?, &files_path)?;
    ensure_len(&files_path, files.len(), players.len(), &players_path)?;

    let results_path = field_path(path, WIRE_RESULTS);
    let results = decode_results(take(&mut scores, WIRE_RESULTS, path)?, &results_path)?;

    let mut per_player = Map::new();
    for (index, raw_score) in raw_scores.into_iter().enumerate() {
        let rounds = decode_player_rounds(
            raw_score,
            &players,
            index,
            &index_path(&raw_scores_path, index),
        )?;
        per_player.insert(players[index].clone(), Value::Array(rounds));
    }

    let files: Map<String, Value> = players.iter().cloned().zip(files).collect();

    debug!(
        players = players.len(),
        weights = weights.len(),
        results = results.len(),
        "decoded scores"
    );

    scores.insert(WEIGHTS.to_string(), Value::Object(weights));
    scores.insert(PLAYER_SCORES.to_string(), Value::Object(per_player));
    scores.insert(FILES.to_string(), Value::Object(files));
    scores.insert(RESULTS.to_string(), Value::Array(results));
    Ok(scores)
}

pub(crate) fn encode_scores(raw: Value) -> Result<Value, Error> {
    let path = SCORES;
    let mut scores = into_object(raw, path)?;

    let weights = into_object(take(&mut scores, WEIGHTS, path)?, &field_path(path, WEIGHTS))?;
    let per_player_path = field_path(path, PLAYER_SCORES);
    let per_player = into_object(take(&mut scores, PLAYER_SCORES, path)?, &per_player_path)?;
    let files_path = field_path(path, FILES);
    let mut files = into_object(take(&mut scores, FILES, path)?, &files_path)?;
    let results = take(&mut scores, RESULTS, path)?;

    let players: Vec<String> = per_player.keys().cloned().collect();

    let (weight_keys, weight_values): (Vec<Value>, Vec<Value>) = weights
        .into_iter()
        .map(|(key, value)| (Value::String(key), value))
        .unzip();

    let mut player_files = Vec::with_capacity(players.len());
    for player in &players {
        let file = files.shift_remove(player).ok_or_else(|| {
            Error::new(ErrorKind::Schema)
                .with_message(format!("player `{player}` has scores but no file entry"))
                .with_field(field_path(&files_path, player))
        })?;
        player_files.push(file);
    }
    if !files.is_empty() {
        debug!(
            dropped = files.len(),
            "ignoring file entries for players without scores"
        );
    }

    let results = encode_results(results, &field_path(path, RESULTS))?;

    let mut raw_scores = Vec::with_capacity(players.len());
    for (player, rounds) in per_player {
        let player_path = field_path(&per_player_path, &player);
        raw_scores.push(encode_player_rounds(rounds, &players, &player_path)?);
    }

    debug!(players = players.len(), "encoded scores");

    scores.insert(WIRE_WEIGHT_KEYS.to_string(), Value::Array(weight_keys));
    scores.insert(WIRE_WEIGHT_VALUES.to_string(), Value::Array(weight_values));
    scores.insert(
        WIRE_PLAYERS.to_string(),
        Value::Array(players.into_iter().map(Value::String).collect()),
    );
    scores.insert(WIRE_FILES.to_string(), Value::Array(player_files));
    scores.insert(WIRE_RESULTS.to_string(), Value::Array(results));
    scores.insert(WIRE_PLAYER_SCORES.to_string(), Value::Array(raw_scores));
    embed(&Value::Object(scores))
}

fn decode_weights(scores: &mut Map<String, Value>) -> Result<Map<String, Value>, Error> {
    let keys_path = field_path(WIRE_SCORES, WIRE_WEIGHT_KEYS);
    let values_path = field_path(WIRE_SCORES, WIRE_WEIGHT_VALUES);
    let keys = into_array(take(scores, WIRE_WEIGHT_KEYS, WIRE_SCORES)?, &keys_path)?;
    let values = into_array(take(scores, WIRE_WEIGHT_VALUES, WIRE_SCORES)?, &values_path)?;
    ensure_len(&values_path, values.len(), keys.len(), &keys_path)?;

    let mut weights = Map::new();
    for (index, (key, value)) in keys.into_iter().zip(values).enumerate() {
        let key_path = index_path(&keys_path, index);
        let key = into_string(key, &key_path)?;
        if weights.contains_key(&key) {
            return Err(duplicate_error(&key_path, "weight key", &key));
        }
        weights.insert(key, value);
    }
    Ok(weights)
}

fn player_ids(raw: Value, path: &str) -> Result<Vec<String>, Error> {
    let mut seen = HashSet::new();
    let mut players = Vec::new();
    for (index, value) in into_array(raw, path)?.into_iter().enumerate() {
        let item_path = index_path(path, index);
        let player = into_string(value, &item_path)?;
        if !seen.insert(player.clone()) {
            return Err(duplicate_error(&item_path, "player", &player));
        }
        players.push(player);
    }
    Ok(players)
}

fn duplicate_error(path: &str, what: &str, value: &str) -> Error {
    Error::new(ErrorKind::Schema)
        .with_message(format!("duplicate {what} `{value}`"))
        .with_field(path)
}

fn decode_results(raw: Value, path: &str) -> Result<Vec<Value>, Error> {
    let mut results = Vec::new();
    for (index, result) in parse_embedded_list(raw, path)?.into_iter().enumerate() {
        let result_path = index_path(path, index);
        let mut result = into_object(result, &result_path)?;
        for (wire_key, key) in [
            (WIRE_SURVIVING_TEAMS, SURVIVING_TEAMS),
            (WIRE_DEAD_TEAMS, DEAD_TEAMS),
        ] {
            let teams = take(&mut result, wire_key, &result_path)?;
            let teams = parse_embedded_list(teams, &field_path(&result_path, wire_key))?;
            result.insert(key.to_string(), Value::Array(teams));
        }
        results.push(Value::Object(result));
    }
    Ok(results)
}

fn encode_results(raw: Value, path: &str) -> Result<Vec<Value>, Error> {
    let mut results = Vec::new();
    for (index, result) in into_array(raw, path)?.into_iter().enumerate() {
        let result_path = index_path(path, index);
        let mut result = into_object(result, &result_path)?;
        for (key, wire_key) in [
            (SURVIVING_TEAMS, WIRE_SURVIVING_TEAMS),
            (DEAD_TEAMS, WIRE_DEAD_TEAMS),
        ] {
            let teams = take(&mut result, key, &result_path)?;
            let teams = embed_list(teams, &field_path(&result_path, key))?;
            result.insert(wire_key.to_string(), Value::Array(teams));
        }
        results.push(embed(&Value::Object(result))?);
    }
    Ok(results)
}

fn decode_player_rounds(
    raw: Value,
    players: &[String],
    own_index: usize,
    path: &str,
) -> Result<Vec<Value>, Error> {
    let mut record = into_object(parse_embedded(raw, path)?, path)?;
    let rounds_path = field_path(path, SERIALIZED_SCORE_DATA);
    let raw_rounds = take(&mut record, SERIALIZED_SCORE_DATA, path)?;
    let rounds = parse_embedded_list(raw_rounds, &rounds_path)?;
    rounds
        .into_iter()
        .enumerate()
        .map(|(round, value)| {
            decode_round(value, players, own_index, &index_path(&rounds_path, round))
        })
        .collect()
}

fn decode_round(
    raw: Value,
    players: &[String],
    own_index: usize,
    path: &str,
) -> Result<Value, Error> {
    let mut record = into_object(raw, path)?;
    let score_data_path = field_path(path, SCORE_DATA);
    let score_data = parse_embedded(take(&mut record, SCORE_DATA, path)?, &score_data_path)?;
    let mut round = into_object(score_data, &score_data_path)?;

    if let Some(shadowed) = round.keys().find(|key| is_reserved_round_field(key)) {
        warn!(field = %shadowed, path, "scoreData field is shadowed by a per-round field");
    }

    for field in METRIC_FIELDS {
        let metric_path = field_path(path, field);
        let values = into_array(take(&mut record, field, path)?, &metric_path)?;
        ensure_len(&metric_path, values.len(), players.len(), WIRE_PLAYERS)?;
        let by_opponent: Map<String, Value> = players
            .iter()
            .zip(values)
            .enumerate()
            .filter(|(index, _)| *index != own_index)
            .map(|(_, (player, value))| (player.clone(), value))
            .collect();
        round.insert(field.to_string(), Value::Object(by_opponent));
    }
    for field in PASSTHROUGH_FIELDS {
        round.insert(field.to_string(), take(&mut record, field, path)?);
    }

    if !record.is_empty() {
        let extra: Vec<&str> = record.keys().map(String::as_str).collect();
        warn!(?extra, path, "dropping unrecognised score record fields");
    }
    Ok(Value::Object(round))
}

fn encode_player_rounds(raw: Value, players: &[String], path: &str) -> Result<Value, Error> {
    let rounds = into_array(raw, path)?
        .into_iter()
        .enumerate()
        .map(|(index, round)| encode_round(round, players, &index_path(path, index)))
        .collect::<Result<Vec<_>, _>>()?;
    let mut record = Map::new();
    record.insert(SERIALIZED_SCORE_DATA.to_string(), Value::Array(rounds));
    embed(&Value::Object(record))
}

fn encode_round(raw: Value, players: &[String], path: &str) -> Result<Value, Error> {
    let mut round = into_object(raw, path)?;

    let mut metrics = Vec::with_capacity(METRIC_FIELDS.len());
    for field in METRIC_FIELDS {
        let by_opponent = into_object(take(&mut round, field, path)?, &field_path(path, field))?;
        let values = players
            .iter()
            .map(|player| by_opponent.get(player).cloned().unwrap_or_else(|| Value::from(0)))
            .collect();
        metrics.push((field, Value::Array(values)));
    }
    let mut passthrough = Vec::with_capacity(PASSTHROUGH_FIELDS.len());
    for field in PASSTHROUGH_FIELDS {
        passthrough.push((field, take(&mut round, field, path)?));
    }

    let mut record = Map::new();
    record.insert(SCORE_DATA.to_string(), embed(&Value::Object(round))?);
    for (field, value) in metrics.into_iter().chain(passthrough) {
        record.insert(field.to_string(), value);
    }
    embed(&Value::Object(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn s(value: Value) -> Value {
        Value::String(serde_json::to_string(&value).expect("encode"))
    }

    fn wire_round(score_data: Value, hit_counts: Value) -> Value {
        let mut record = Map::new();
        record.insert("scoreData".into(), s(score_data));
        for field in METRIC_FIELDS {
            let value = if field == "hitCounts" {
                hit_counts.clone()
            } else {
                json!([0, 0])
            };
            record.insert(field.into(), value);
        }
        record.insert("damageTypesTaken".into(), json!(["Guns"]));
        record.insert("everyoneWhoDamagedMe".into(), json!(["B"]));
        s(Value::Object(record))
    }

    fn wire_scores() -> Value {
        s(json!({
            "_weightKeys": ["accuracy", "kills"],
            "_weightValues": [1.0, 2.5],
            "_players": ["A", "B"],
            "_scores": [
                s(json!({"serializedScoreData": [wire_round(json!({"kills": 1}), json!([0, 3]))]})),
                s(json!({"serializedScoreData": [wire_round(json!({"kills": 0}), json!([4, 0]))]})),
            ],
            "_files": ["a.craft", "b.craft"],
            "_results": [s(json!({
                "_survivingTeams": [s(json!({"team": "A"}))],
                "_deadTeams": [s(json!({"team": "B"}))],
            }))],
        }))
    }

    #[test]
    fn decode_zips_weights_players_and_files() {
        let scores = decode_scores(wire_scores()).expect("decode");
        assert_eq!(scores["weights"], json!({"accuracy": 1.0, "kills": 2.5}));
        assert_eq!(scores["files"], json!({"A": "a.craft", "B": "b.craft"}));
        assert_eq!(
            scores["results"],
            json!([{"survivingTeams": [{"team": "A"}], "deadTeams": [{"team": "B"}]}])
        );
        let keys: Vec<&str> = scores.keys().map(String::as_str).collect();
        assert_eq!(keys, ["weights", "scores", "files", "results"]);
    }

    #[test]
    fn decode_rekeys_metrics_without_self_entry() {
        let scores = decode_scores(wire_scores()).expect("decode");
        let a_round = &scores["scores"]["A"][0];
        assert_eq!(a_round["kills"], json!(1));
        assert_eq!(a_round["hitCounts"], json!({"B": 3}));
        assert_eq!(a_round["damageFromGuns"], json!({"B": 0}));
        assert_eq!(a_round["damageTypesTaken"], json!(["Guns"]));
        assert_eq!(scores["scores"]["B"][0]["hitCounts"], json!({"A": 4}));

        for (player, rounds) in scores["scores"].as_object().expect("scores") {
            for round in rounds.as_array().expect("rounds") {
                for field in METRIC_FIELDS {
                    assert!(round[field].get(player).is_none());
                }
            }
        }
    }

    #[test]
    fn encode_restores_parallel_arrays() {
        let decoded = decode_scores(wire_scores()).expect("decode");
        let encoded = encode_scores(Value::Object(decoded)).expect("encode");
        let text = encoded.as_str().expect("string");
        let wire: Value = serde_json::from_str(text).expect("json");
        assert_eq!(wire["_weightKeys"], json!(["accuracy", "kills"]));
        assert_eq!(wire["_weightValues"], json!([1.0, 2.5]));
        assert_eq!(wire["_players"], json!(["A", "B"]));

        let a_record: Value =
            serde_json::from_str(wire["_scores"][0].as_str().expect("a")).expect("json");
        let a_round: Value = serde_json::from_str(
            a_record["serializedScoreData"][0].as_str().expect("round"),
        )
        .expect("json");
        assert_eq!(a_round["hitCounts"], json!([0, 3]));
        assert_eq!(a_round["scoreData"], json!(r#"{"kills":1}"#));
    }

    #[test]
    fn encode_fills_missing_opponents_with_zero() {
        let canonical = json!({
            "weights": {},
            "scores": {
                "A": [{
                    "hitCounts": {"C": 7},
                    "damageFromGuns": {}, "damageFromRockets": {}, "rocketPartDamageCounts": {},
                    "rocketStrikeCounts": {}, "rammingPartLossCounts": {}, "damageFromMissiles": {},
                    "missilePartDamageCounts": {}, "missileHitCounts": {}, "battleDamageFrom": {},
                    "damageTypesTaken": [], "everyoneWhoDamagedMe": []
                }],
                "B": [],
                "C": []
            },
            "files": {"A": "a", "B": "b", "C": "c"},
            "results": []
        });
        let encoded = encode_scores(canonical).expect("encode");
        let wire: Value = serde_json::from_str(encoded.as_str().expect("str")).expect("json");
        let record: Value =
            serde_json::from_str(wire["_scores"][0].as_str().expect("a")).expect("json");
        let round: Value = serde_json::from_str(
            record["serializedScoreData"][0].as_str().expect("round"),
        )
        .expect("json");
        assert_eq!(round["hitCounts"], json!([0, 0, 7]));
        assert_eq!(round["battleDamageFrom"], json!([0, 0, 0]));
        assert_eq!(round["scoreData"], json!("{}"));
    }

    #[test]
    fn weight_length_mismatch_is_schema_error() {
        let raw = s(json!({
            "_weightKeys": ["accuracy", "kills"],
            "_weightValues": [1.0],
            "_players": [], "_scores": [], "_files": [], "_results": []
        }));
        let err = decode_scores(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.field(), Some("_scores._weightValues"));
    }

    #[test]
    fn player_file_mismatch_is_schema_error() {
        let raw = s(json!({
            "_weightKeys": [], "_weightValues": [],
            "_players": ["A", "B"],
            "_scores": [
                s(json!({"serializedScoreData": []})),
                s(json!({"serializedScoreData": []}))
            ],
            "_files": ["a.craft"],
            "_results": []
        }));
        let err = decode_scores(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.field(), Some("_scores._files"));
    }

    #[test]
    fn player_score_mismatch_is_schema_error() {
        let raw = s(json!({
            "_weightKeys": [], "_weightValues": [],
            "_players": ["A", "B"],
            "_scores": [s(json!({"serializedScoreData": []}))],
            "_files": ["a.craft", "b.craft"],
            "_results": []
        }));
        let err = decode_scores(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.field(), Some("_scores._scores"));
    }

    #[test]
    fn duplicate_players_are_rejected() {
        let raw = s(json!({
            "_weightKeys": [], "_weightValues": [],
            "_players": ["A", "A"],
            "_scores": [], "_files": [], "_results": []
        }));
        let err = decode_scores(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.field(), Some("_scores._players[1]"));
    }

    #[test]
    fn missing_file_entry_fails_encode() {
        let canonical = json!({
            "weights": {}, "scores": {"A": []}, "files": {}, "results": []
        });
        let err = encode_scores(canonical).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.field(), Some("scores.files.A"));
    }

    #[test]
    fn missing_metric_fails_encode() {
        let canonical = json!({
            "weights": {}, "scores": {"A": [{"kills": 1}]}, "files": {"A": "a"}, "results": []
        });
        let err = encode_scores(canonical).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.field(), Some("scores.scores.A[0].hitCounts"));
    }
}
