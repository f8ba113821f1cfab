//! Concrete game features
//!
//! The thirteen hand-designed features and their weights. The weights are
//! design constants tuned against the historical corpus; changing them
//! changes which template game the model retrieves.

use super::catalog::FeatureCatalog;
use crate::{GameRecord, Result, Side};

type Value = std::result::Result<f64, String>;

/// Build the catalog with every game feature registered
pub fn default_catalog() -> Result<FeatureCatalog> {
    let mut catalog = FeatureCatalog::new();
    catalog.register("quarters", 10.0, quarters)?;
    catalog.register("point_difference", 5.0, point_difference)?;
    catalog.register("q1_difference", 2.0, q1_difference)?;
    catalog.register("q2_difference", 2.0, q2_difference)?;
    catalog.register("q3_difference", 3.0, q3_difference)?;
    catalog.register("q4_difference", 4.0, q4_difference)?;
    catalog.register("win_at_home", 10.0, win_at_home)?;
    catalog.register("winner_pts", 4.0, winner_pts)?;
    catalog.register("pts_leader_difference", 4.0, pts_leader_difference)?;
    catalog.register("home_wins", 12.0, home_wins)?;
    catalog.register("away_wins", 12.0, away_wins)?;
    catalog.register("conference", 5.0, conference)?;
    catalog.register("playoff_round", 5.0, playoff_round)?;
    Ok(catalog)
}

fn quarters(game: &GameRecord) -> Value {
    Ok(game.quarters as f64)
}

fn point_difference(game: &GameRecord) -> Value {
    Ok(game.point_difference() as f64)
}

fn period_difference(game: &GameRecord, number: usize) -> Value {
    game.period_margin(number)
        .map(|margin| margin as f64)
        .ok_or_else(|| format!("missing period {} score", number))
}

fn q1_difference(game: &GameRecord) -> Value {
    period_difference(game, 1)
}

fn q2_difference(game: &GameRecord) -> Value {
    period_difference(game, 2)
}

fn q3_difference(game: &GameRecord) -> Value {
    period_difference(game, 3)
}

fn q4_difference(game: &GameRecord) -> Value {
    period_difference(game, 4)
}

fn win_at_home(game: &GameRecord) -> Value {
    Ok(if game.winner == Side::Home { 1.0 } else { 0.0 })
}

fn winner_pts(game: &GameRecord) -> Value {
    Ok(game.winning_score() as f64)
}

fn pts_leader_difference(game: &GameRecord) -> Value {
    Ok(game.pts_leader_margin() as f64)
}

fn home_wins(game: &GameRecord) -> Value {
    Ok(game.home_wins as f64)
}

fn away_wins(game: &GameRecord) -> Value {
    Ok(game.away_wins as f64)
}

/// +1 for an Eastern Conference round, -1 for Western, 0 otherwise
///
/// Containment checks run in the stated order; the first match wins.
fn conference(game: &GameRecord) -> Value {
    if game.round.contains("EAST") {
        Ok(1.0)
    } else if game.round.contains("WEST") {
        Ok(-1.0)
    } else {
        Ok(0.0)
    }
}

/// Ordinal encoding of the playoff round descriptor
///
/// "SEMIFINALS" must be checked before "FINALS" since the latter is a
/// substring of the former; "NBA" (the finals) outranks both. Unrecognized
/// round text encodes as 0.
fn playoff_round(game: &GameRecord) -> Value {
    if game.round.contains("NBA") {
        Ok(5.0)
    } else if game.round.contains("SEMIFINALS") {
        Ok(1.0)
    } else if game.round.contains("FINALS") {
        Ok(3.0)
    } else {
        Ok(0.0)
    }
}
