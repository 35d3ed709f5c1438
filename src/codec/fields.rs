//! Purpose: Name every key the codec reads or writes at a known schema position.
//! Exports: Wire/canonical key constants, `METRIC_FIELDS`, `PASSTHROUGH_FIELDS`.
//! Invariants: `METRIC_FIELDS` is a closed set shared by decode and encode.
//! Invariants: Any per-round field outside these two lists is opaque `scoreData` content.

/// Per-round statistics stored positionally (one slot per player) on the wire and
/// keyed by opponent in canonical form.
pub const METRIC_FIELDS: [&str; 10] = [
    "hitCounts",
    "damageFromGuns",
    "damageFromRockets",
    "rocketPartDamageCounts",
    "rocketStrikeCounts",
    "rammingPartLossCounts",
    "damageFromMissiles",
    "missilePartDamageCounts",
    "missileHitCounts",
    "battleDamageFrom",
];

/// Per-round fields that are already expanded on the wire and copied as-is.
pub const PASSTHROUGH_FIELDS: [&str; 2] = ["damageTypesTaken", "everyoneWhoDamagedMe"];

// Tournament root.
pub(crate) const WIRE_HEATS: &str = "_heats";
pub(crate) const WIRE_SCORES: &str = "_scores";
pub(crate) const WIRE_TEAM_FILES: &str = "_teamFiles";
pub(crate) const HEATS: &str = "heats";
pub(crate) const SCORES: &str = "scores";
pub(crate) const TEAM_FILES: &str = "teamFiles";

// Heat.
pub(crate) const WIRE_TEAMS: &str = "_teams";
pub(crate) const TEAMS: &str = "teams";
pub(crate) const TEAM_WRAPPER: &str = "team";

// Scores.
pub(crate) const WIRE_WEIGHT_KEYS: &str = "_weightKeys";
pub(crate) const WIRE_WEIGHT_VALUES: &str = "_weightValues";
pub(crate) const WIRE_PLAYERS: &str = "_players";
pub(crate) const WIRE_PLAYER_SCORES: &str = "_scores";
pub(crate) const WIRE_FILES: &str = "_files";
pub(crate) const WIRE_RESULTS: &str = "_results";
pub(crate) const WEIGHTS: &str = "weights";
pub(crate) const PLAYER_SCORES: &str = "scores";
pub(crate) const FILES: &str = "files";
pub(crate) const RESULTS: &str = "results";

// Per-player score record.
pub(crate) const SERIALIZED_SCORE_DATA: &str = "serializedScoreData";
pub(crate) const SCORE_DATA: &str = "scoreData";

// Result.
pub(crate) const WIRE_SURVIVING_TEAMS: &str = "_survivingTeams";
pub(crate) const WIRE_DEAD_TEAMS: &str = "_deadTeams";
pub(crate) const SURVIVING_TEAMS: &str = "survivingTeams";
pub(crate) const DEAD_TEAMS: &str = "deadTeams";

// Team files.
pub(crate) const TEAM_FILE_WRAPPER: &str = "ls";

pub(crate) fn heat_label(index: usize) -> String {
    format!("Heat {index}")
}

pub(crate) fn is_reserved_round_field(name: &str) -> bool {
    METRIC_FIELDS.contains(&name) || PASSTHROUGH_FIELDS.contains(&name)
}
