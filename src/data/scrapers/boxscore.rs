//! ESPN box-score scraper
//!
//! Fetches NBA game summary pages and extracts the recap headline, line
//! scores, statistical leaders and series standing. Supports caching HTML
//! files for offline testing and reduced load.

use std::path::{Path, PathBuf};

use scraper::{ElementRef, Html, Selector};

use crate::data::scrapers::with_retry;
use crate::{
    AssistsLeader, GameId, GameRecord, HeadlinerError, PointsLeader, ReboundsLeader, Result,
    ScoreLine, Side, SidePair, TeamNames,
};

/// Scraper for ESPN game summary pages
pub struct BoxScoreScraper {
    client: reqwest::blocking::Client,
    /// Optional cache directory for offline HTML files
    cache_dir: Option<PathBuf>,
    /// If true, only use cache (no network requests)
    offline_only: bool,
}

impl Default for BoxScoreScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxScoreScraper {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .user_agent("headliner/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        BoxScoreScraper {
            client,
            cache_dir: None,
            offline_only: false,
        }
    }

    /// Create scraper with a cache directory
    pub fn with_cache<P: AsRef<Path>>(mut self, cache_dir: P) -> Self {
        self.cache_dir = Some(cache_dir.as_ref().to_path_buf());
        self
    }

    /// Set offline-only mode (no network requests, cache must exist)
    pub fn offline_only(mut self, offline: bool) -> Self {
        self.offline_only = offline;
        self
    }

    /// Get the cache file path for a game
    fn cache_path(&self, game_id: GameId) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.html", game_id)))
    }

    /// Load HTML from cache if available
    fn load_from_cache(&self, game_id: GameId) -> Option<String> {
        let path = self.cache_path(game_id)?;
        if path.exists() {
            log::debug!("Loading from cache: {}", path.display());
            std::fs::read_to_string(&path).ok()
        } else {
            None
        }
    }

    /// Save HTML to cache
    fn save_to_cache(&self, game_id: GameId, html: &str) -> Result<()> {
        if let Some(path) = self.cache_path(game_id) {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, html)?;
            log::debug!("Saved to cache: {}", path.display());
        }
        Ok(())
    }

    /// Fetch and parse one game summary page (uses cache if available)
    pub fn fetch_game(&self, game_id: GameId) -> Result<GameRecord> {
        if let Some(html) = self.load_from_cache(game_id) {
            return parse_game(&html, game_id);
        }
        if self.offline_only {
            return Err(HeadlinerError::Acquisition {
                game_id,
                message: "no cached page (offline mode)".to_string(),
            });
        }

        let url = game_url(game_id);
        log::debug!("Fetching {}", url);
        let html = with_retry(
            || {
                let response = self.client.get(&url).send()?;
                if !response.status().is_success() {
                    return Err(HeadlinerError::Acquisition {
                        game_id,
                        message: format!("HTTP {}", response.status()),
                    });
                }
                Ok(response.text()?)
            },
            3,
        )?;

        if let Err(e) = self.save_to_cache(game_id, &html) {
            log::warn!("Failed to cache game {}: {}", game_id, e);
        }
        parse_game(&html, game_id)
    }

    /// Parse a saved HTML file directly (for testing)
    pub fn parse_file<P: AsRef<Path>>(&self, path: P, game_id: GameId) -> Result<GameRecord> {
        let html = std::fs::read_to_string(path.as_ref())?;
        parse_game(&html, game_id)
    }
}

fn game_url(game_id: GameId) -> String {
    format!("http://www.espn.com/nba/game?gameId={}", game_id)
}

fn malformed(game_id: GameId, message: impl Into<String>) -> HeadlinerError {
    HeadlinerError::Acquisition {
        game_id,
        message: message.into(),
    }
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_stat(text: &str, what: &str, game_id: GameId) -> Result<u32> {
    text.parse()
        .map_err(|_| malformed(game_id, format!("invalid {}: '{}'", what, text)))
}

/// Extract a full game record from a summary page
pub fn parse_game(html: &str, game_id: GameId) -> Result<GameRecord> {
    let document = Html::parse_document(html);

    let headline_selector = Selector::parse(".top-stories__story-header h1").unwrap();
    let headline = document
        .select(&headline_selector)
        .next()
        .map(element_text)
        .ok_or_else(|| malformed(game_id, "missing headline"))?;

    let round = parse_round(&document, game_id)?;

    let banner_selector = Selector::parse(".competitors").unwrap();
    let banner = document
        .select(&banner_selector)
        .next()
        .ok_or_else(|| malformed(game_id, "missing competitors banner"))?;

    let winner = parse_winner(banner, game_id)?;
    let away = parse_team(banner, "div.team.away", game_id)?;
    let home = parse_team(banner, "div.team.home", game_id)?;
    let (away_line, home_line) = parse_line_scores(banner, game_id)?;

    let quarters = away_line.periods.len() as u32;
    let scores = SidePair::new(home_line, away_line);
    if scores.get(winner).total <= scores.get(winner.opposite()).total {
        return Err(malformed(game_id, "winner marker disagrees with the final score"));
    }

    let (pts, reb, ast) = parse_leaders(&document, game_id)?;
    let (n_game, home_wins, away_wins) = parse_series(&document, &home.abbr, game_id)?;

    Ok(GameRecord {
        headline,
        round,
        winner,
        names: SidePair::new(home, away),
        scores,
        quarters,
        pts,
        reb,
        ast,
        n_game,
        home_wins,
        away_wins,
    })
}

/// Playoff round descriptor, e.g. "EASTERN CONFERENCE FINALS"
fn parse_round(document: &Html, game_id: GameId) -> Result<String> {
    let details_selector = Selector::parse(".game-details").unwrap();
    let details = document
        .select(&details_selector)
        .next()
        .map(element_text)
        .ok_or_else(|| malformed(game_id, "missing game details"))?;
    Ok(details.split(" - ").next().unwrap_or("").trim().to_string())
}

/// The page marks the winner in the last class of the banner's parent,
/// which starts with "home" or "away".
fn parse_winner(banner: ElementRef, game_id: GameId) -> Result<Side> {
    let marker = banner
        .parent()
        .and_then(ElementRef::wrap)
        .and_then(|parent| parent.value().attr("class"))
        .and_then(|classes| classes.split_whitespace().last())
        .ok_or_else(|| malformed(game_id, "missing winner marker"))?;
    marker
        .get(..4)
        .unwrap_or("")
        .parse()
        .map_err(|_| malformed(game_id, format!("unrecognized winner marker '{}'", marker)))
}

fn parse_team(banner: ElementRef, team_selector: &str, game_id: GameId) -> Result<TeamNames> {
    let team_sel = Selector::parse(team_selector).unwrap();
    let short_sel = Selector::parse(".short-name").unwrap();
    let long_sel = Selector::parse(".long-name").unwrap();
    let abbrev_sel = Selector::parse(".abbrev").unwrap();

    let tag = banner
        .select(&team_sel)
        .next()
        .ok_or_else(|| malformed(game_id, format!("missing {}", team_selector)))?;
    let field = |sel: &Selector, what: &str| {
        tag.select(sel)
            .next()
            .map(element_text)
            .ok_or_else(|| malformed(game_id, format!("missing {} in {}", what, team_selector)))
    };
    Ok(TeamNames {
        team: field(&short_sel, "team name")?,
        city: field(&long_sel, "city name")?,
        abbr: field(&abbrev_sel, "abbreviation")?,
    })
}

/// Line score table: row 1 is the away side, row 2 the home side.
fn parse_line_scores(banner: ElementRef, game_id: GameId) -> Result<(ScoreLine, ScoreLine)> {
    let status_sel = Selector::parse(".game-status").unwrap();
    let row_sel = Selector::parse("tr").unwrap();

    let status = banner
        .select(&status_sel)
        .next()
        .ok_or_else(|| malformed(game_id, "missing line score"))?;
    let rows: Vec<ElementRef> = status.select(&row_sel).collect();
    if rows.len() < 3 {
        return Err(malformed(game_id, "incomplete line score"));
    }
    Ok((
        parse_score_row(rows[1], game_id)?,
        parse_score_row(rows[2], game_id)?,
    ))
}

/// One line score row: label cell, one cell per period, then the total.
fn parse_score_row(row: ElementRef, game_id: GameId) -> Result<ScoreLine> {
    let cells: Vec<ElementRef> = row.children().filter_map(ElementRef::wrap).collect();
    if cells.len() < 3 {
        return Err(malformed(game_id, "line score row too short"));
    }
    let quarters = cells.len() - 2;
    let total = parse_stat(&element_text(cells[quarters + 1]), "final score", game_id)?;
    let periods = cells[1..=quarters]
        .iter()
        .map(|cell| parse_stat(&element_text(*cell), "period score", game_id))
        .collect::<Result<Vec<u32>>>()?;
    if total != periods.iter().sum::<u32>() {
        return Err(malformed(game_id, "line score periods do not sum to the final score"));
    }
    Ok(ScoreLine { total, periods })
}

struct RawLeader {
    name: String,
    values: [String; 3],
}

type LeaderPairs = (
    SidePair<PointsLeader>,
    SidePair<ReboundsLeader>,
    SidePair<AssistsLeader>,
);

/// The three leader columns appear in page order: points, rebounds, assists.
fn parse_leaders(document: &Html, game_id: GameId) -> Result<LeaderPairs> {
    let column_sel = Selector::parse(".leader-column").unwrap();
    let columns: Vec<ElementRef> = document.select(&column_sel).take(3).collect();
    if columns.len() < 3 {
        return Err(malformed(game_id, "missing game leader columns"));
    }

    let (pts_away, pts_home) = parse_leader_column(columns[0], game_id)?;
    let (reb_away, reb_home) = parse_leader_column(columns[1], game_id)?;
    let (ast_away, ast_home) = parse_leader_column(columns[2], game_id)?;

    Ok((
        SidePair::new(
            points_leader(pts_home, game_id)?,
            points_leader(pts_away, game_id)?,
        ),
        SidePair::new(
            rebounds_leader(reb_home, game_id)?,
            rebounds_leader(reb_away, game_id)?,
        ),
        SidePair::new(
            assists_leader(ast_home, game_id)?,
            assists_leader(ast_away, game_id)?,
        ),
    ))
}

/// One leader column holds the away player first, then the home player.
fn parse_leader_column(
    column: ElementRef,
    game_id: GameId,
) -> Result<(RawLeader, RawLeader)> {
    let name_sel = Selector::parse(".long-name").unwrap();
    let details_sel = Selector::parse(".game-leader-details").unwrap();

    let names: Vec<String> = column.select(&name_sel).map(element_text).collect();
    let details: Vec<ElementRef> = column.select(&details_sel).collect();
    if names.len() < 2 || details.len() < 2 {
        return Err(malformed(game_id, "incomplete leader column"));
    }

    Ok((
        leader_values(details[0], names[0].clone(), game_id)?,
        leader_values(details[1], names[1].clone(), game_id)?,
    ))
}

/// The details block lists three dd entries, each with one stat value.
fn leader_values(block: ElementRef, name: String, game_id: GameId) -> Result<RawLeader> {
    let dd_sel = Selector::parse("dd").unwrap();
    let value_sel = Selector::parse(".value").unwrap();

    let entries: Vec<ElementRef> = block.select(&dd_sel).take(3).collect();
    if entries.len() < 3 {
        return Err(malformed(game_id, "incomplete leader stat line"));
    }
    let mut values: [String; 3] = Default::default();
    for (slot, entry) in values.iter_mut().zip(&entries) {
        *slot = entry
            .select(&value_sel)
            .next()
            .map(element_text)
            .ok_or_else(|| malformed(game_id, "missing leader stat value"))?;
    }
    Ok(RawLeader { name, values })
}

fn points_leader(raw: RawLeader, game_id: GameId) -> Result<PointsLeader> {
    let RawLeader {
        name,
        values: [pts, fg, ft],
    } = raw;
    Ok(PointsLeader {
        leader: name,
        pts: parse_stat(&pts, "points", game_id)?,
        fg,
        ft,
    })
}

fn rebounds_leader(raw: RawLeader, game_id: GameId) -> Result<ReboundsLeader> {
    let RawLeader {
        name,
        values: [reb, dreb, oreb],
    } = raw;
    Ok(ReboundsLeader {
        leader: name,
        reb: parse_stat(&reb, "rebounds", game_id)?,
        dreb: parse_stat(&dreb, "defensive rebounds", game_id)?,
        oreb: parse_stat(&oreb, "offensive rebounds", game_id)?,
    })
}

fn assists_leader(raw: RawLeader, game_id: GameId) -> Result<AssistsLeader> {
    let RawLeader {
        name,
        values: [ast, to, min],
    } = raw;
    Ok(AssistsLeader {
        leader: name,
        ast: parse_stat(&ast, "assists", game_id)?,
        to: parse_stat(&to, "turnovers", game_id)?,
        min: parse_stat(&min, "minutes", game_id)?,
    })
}

/// Series standing from the matchup panel.
///
/// Finds the box for this game, reads the game number from the series
/// caption, then walks the boxes for the preceding games of the series
/// and attributes each win to the current home or away franchise.
fn parse_series(document: &Html, home_abbr: &str, game_id: GameId) -> Result<(u32, u32, u32)> {
    let wrap_sel = Selector::parse(".series-wrap").unwrap();
    let anchor_sel = Selector::parse("a[data-gameid]").unwrap();
    let caption_sel = Selector::parse(".cscore_series").unwrap();

    let panel = document
        .select(&wrap_sel)
        .next()
        .ok_or_else(|| malformed(game_id, "missing series panel"))?;
    let id_text = game_id.to_string();
    let anchor = panel
        .select(&anchor_sel)
        .find(|a| a.value().attr("data-gameid") == Some(id_text.as_str()))
        .ok_or_else(|| malformed(game_id, "game not found in series panel"))?;
    let game_box = anchor
        .parent()
        .and_then(ElementRef::wrap)
        .ok_or_else(|| malformed(game_id, "detached series box"))?;

    let caption = game_box
        .select(&caption_sel)
        .next()
        .map(element_text)
        .ok_or_else(|| malformed(game_id, "missing series caption"))?;
    let n_game = caption
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .filter(|n| *n > 0)
        .ok_or_else(|| malformed(game_id, format!("cannot read game number from '{}'", caption)))?;

    // Earlier games of the series follow this box, most recent first.
    let mut home_wins = 0;
    let mut away_wins = 0;
    for earlier in game_box
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take(n_game as usize - 1)
    {
        match box_winner(earlier, home_abbr, game_id)? {
            Side::Home => home_wins += 1,
            Side::Away => away_wins += 1,
        }
    }
    if home_wins + away_wins != n_game - 1 {
        return Err(malformed(game_id, "series panel is missing earlier games"));
    }
    Ok((n_game, home_wins, away_wins))
}

/// Which current franchise won the game shown in a series box.
///
/// The box bolds its winning side in its third class name, and lists the
/// away abbreviation before the home one.
fn box_winner(game_box: ElementRef, home_abbr: &str, game_id: GameId) -> Result<Side> {
    let abbrev_sel = Selector::parse(".cscore_name--abbrev").unwrap();

    let abbrevs: Vec<String> = game_box.select(&abbrev_sel).map(element_text).collect();
    if abbrevs.len() < 2 {
        return Err(malformed(game_id, "series box missing team abbreviations"));
    }
    let marker = game_box
        .value()
        .attr("class")
        .and_then(|classes| classes.split_whitespace().nth(2))
        .and_then(|class| class.get(8..12))
        .ok_or_else(|| malformed(game_id, "series box missing winner marker"))?;
    let bold: Side = marker
        .parse()
        .map_err(|_| malformed(game_id, format!("unrecognized series marker '{}'", marker)))?;

    let home_won = (abbrevs[0] == home_abbr && bold == Side::Away)
        || (abbrevs[1] == home_abbr && bold == Side::Home);
    Ok(if home_won { Side::Home } else { Side::Away })
}
