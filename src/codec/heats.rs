// Heat list <-> labelled heat mapping, and the team-file list.
use serde_json::{Map, Value};
use tracing::debug;

use super::fields::{
    HEATS, TEAM_FILE_WRAPPER, TEAM_FILES, TEAM_WRAPPER, TEAMS, WIRE_HEATS, WIRE_TEAM_FILES,
    WIRE_TEAMS, heat_label,
};
use super::schema::{
    embed, field_path, index_path, into_array, into_object, parse_embedded, take,
    unwrap_embedded_list, wrap_embed_list,
};
use crate::core::error::Error;

pub(crate) fn decode_heats(raw: Value) -> Result<Map<String, Value>, Error> {
    let entries = into_array(raw, WIRE_HEATS)?;
    let mut heats = Map::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let path = index_path(WIRE_HEATS, index);
        let mut heat = into_object(parse_embedded(entry, &path)?, &path)?;
        let raw_teams = take(&mut heat, WIRE_TEAMS, &path)?;
        let teams = unwrap_embedded_list(raw_teams, &field_path(&path, WIRE_TEAMS), TEAM_WRAPPER)?;
        heat.insert(TEAMS.to_string(), Value::Array(teams));
        heats.insert(heat_label(index), Value::Object(heat));
    }
    debug!(heats = heats.len(), "decoded heats");
    Ok(heats)
}

/// Heat labels are discarded; wire order is the mapping's iteration order.
pub(crate) fn encode_heats(raw: Value) -> Result<Vec<Value>, Error> {
    let heats = into_object(raw, HEATS)?;
    let mut encoded = Vec::with_capacity(heats.len());
    for (label, heat) in heats {
        let path = field_path(HEATS, &label);
        let mut heat = into_object(heat, &path)?;
        let teams = take(&mut heat, TEAMS, &path)?;
        let teams = wrap_embed_list(teams, &field_path(&path, TEAMS), TEAM_WRAPPER)?;
        heat.insert(WIRE_TEAMS.to_string(), Value::Array(teams));
        encoded.push(embed(&Value::Object(heat))?);
    }
    debug!(heats = encoded.len(), "encoded heats");
    Ok(encoded)
}

pub(crate) fn decode_team_files(raw: Value) -> Result<Vec<Value>, Error> {
    unwrap_embedded_list(raw, WIRE_TEAM_FILES, TEAM_FILE_WRAPPER)
}

pub(crate) fn encode_team_files(raw: Value) -> Result<Vec<Value>, Error> {
    wrap_embed_list(raw, TEAM_FILES, TEAM_FILE_WRAPPER)
}
