//! Retrieval-backed headline generation

use serde::Serialize;

use crate::data::Database;
use crate::features::{default_catalog, FeatureCatalog};
use crate::headline;
use crate::model::{NearestNeighborIndex, TrainingExample, TrainingLabel};
use crate::{GameId, GameRecord, HeadlinerError, Result};

/// A generated headline with the template it was adapted from
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedHeadline {
    pub headline: String,
    pub template_game_id: GameId,
    pub template_headline: String,
    /// Feature-space distance between the target and the template game
    pub distance: f64,
}

/// Fit a retrieval index over archived games, in the given order
pub fn build_index(
    catalog: &FeatureCatalog,
    games: &[(GameId, GameRecord)],
) -> Result<NearestNeighborIndex> {
    let mut examples = Vec::with_capacity(games.len());
    for (game_id, game) in games {
        examples.push(TrainingExample {
            vector: catalog.vectorize(game)?,
            label: TrainingLabel {
                game_id: *game_id,
                headline: game.headline.clone(),
            },
        });
    }
    let mut index = NearestNeighborIndex::new();
    index.fit(catalog, examples)?;
    Ok(index)
}

/// Generator that retrieves the archived game most similar to a target
/// game and adapts its headline
pub struct HeadlineGenerator {
    catalog: FeatureCatalog,
    index: NearestNeighborIndex,
    db: Database,
}

impl HeadlineGenerator {
    /// Fit a generator over every archived game in the database
    pub fn new(db: Database) -> Result<Self> {
        Self::with_catalog(db, default_catalog()?)
    }

    /// Fit a generator with an explicit feature catalog
    pub fn with_catalog(db: Database, catalog: FeatureCatalog) -> Result<Self> {
        let games = db.get_all_games()?;
        let index = build_index(&catalog, &games)?;
        log::info!("Fitted retrieval index over {} archived games", index.len());
        Ok(HeadlineGenerator { catalog, index, db })
    }

    /// Number of archived games behind the generator
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Generate a headline for the target game
    pub fn generate(&self, target: &GameRecord) -> Result<GeneratedHeadline> {
        let vector = self.catalog.vectorize(target)?;
        let neighbor = self.index.query(&vector)?;
        log::debug!(
            "Retrieved game {} at distance {:.4}",
            neighbor.label.game_id,
            neighbor.distance
        );

        let template = self
            .db
            .get_game(neighbor.label.game_id)?
            .ok_or(HeadlinerError::UnknownGame(neighbor.label.game_id))?;

        Ok(GeneratedHeadline {
            headline: headline::adapt(&template, target),
            template_game_id: neighbor.label.game_id,
            template_headline: template.headline,
            distance: neighbor.distance,
        })
    }

    /// The underlying database
    pub fn database(&self) -> &Database {
        &self.db
    }
}
