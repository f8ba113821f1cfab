//! ESPN team schedule scraper
//!
//! Walks every franchise's postseason schedule page and collects the ESPN
//! game ids of its home playoff games. Each game is therefore discovered
//! exactly once, through the team that hosted it.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::data::scrapers::with_retry;
use crate::{GameId, HeadlinerError, Result};

/// ESPN slugs for the thirty franchises
const TEAM_SLUGS: [&str; 30] = [
    "atl", "bos", "bkn", "cle", "cha", "chi", "dal", "den", "det", "gs", "hou", "ind", "lac",
    "lal", "mem", "mia", "mil", "min", "no", "ny", "okc", "orl", "phi", "phx", "por", "sac", "sa",
    "tor", "utah", "wsh",
];

/// ESPN season type for the playoffs
const POSTSEASON: u8 = 3;

/// Scraper for ESPN team schedule pages
pub struct ScheduleScraper {
    client: reqwest::blocking::Client,
}

impl Default for ScheduleScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleScraper {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .user_agent("headliner/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        ScheduleScraper { client }
    }

    /// Collect game ids for every home playoff game of one postseason.
    ///
    /// A team whose page cannot be fetched is skipped with a warning, so
    /// one bad page does not lose the rest of the season.
    pub fn fetch_season(&self, year: u16) -> Result<Vec<GameId>> {
        let mut ids = Vec::new();
        for team in TEAM_SLUGS {
            let url = schedule_url(team, year);
            log::debug!("Fetching {}", url);
            match with_retry(|| self.fetch_page(&url), 3) {
                Ok(html) => {
                    let found = parse_schedule(&html);
                    log::debug!("{} {}: {} home playoff games", team, year, found.len());
                    ids.extend(found);
                }
                Err(e) => log::warn!("Skipping {} {} schedule: {}", team, year, e),
            }
        }
        log::info!("Season {}: found {} home playoff games", year, ids.len());
        Ok(ids)
    }

    fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(HeadlinerError::Scrape {
                url: url.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }
        Ok(response.text()?)
    }
}

fn schedule_url(team: &str, year: u16) -> String {
    format!(
        "http://www.espn.com/nba/team/schedule/_/name/{}/season/{}/seasontype/{}",
        team, year, POSTSEASON
    )
}

/// Game ids of the home games on one schedule page.
///
/// Each result cell links to the game summary with the game id at the end
/// of the href. The opponent cell just before it starts with "vs" for home
/// games and "@" for road games.
pub fn parse_schedule(html: &str) -> Vec<GameId> {
    let document = Html::parse_document(html);
    let link_sel = Selector::parse(".ml4 a").unwrap();
    let location_sel = Selector::parse(".pr2").unwrap();
    let id_pattern = Regex::new(r"(\d{9})$").unwrap();

    let mut ids = Vec::new();
    for link in document.select(&link_sel) {
        let id = match link
            .value()
            .attr("href")
            .and_then(|href| game_id_from_href(&id_pattern, href))
        {
            Some(id) => id,
            None => continue,
        };
        let location = link
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|span| span.parent())
            .and_then(ElementRef::wrap)
            .and_then(|cell| cell.prev_siblings().find_map(ElementRef::wrap))
            .and_then(|opponent| opponent.select(&location_sel).next())
            .map(element_text);
        if location.as_deref() == Some("vs") {
            ids.push(id);
        }
    }
    ids
}

fn game_id_from_href(pattern: &Regex, href: &str) -> Option<GameId> {
    let digits = pattern.captures(href)?.get(1)?.as_str();
    digits.parse().ok().map(GameId)
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE_PAGE: &str = r#"<html><body>
<table class="Table">
  <tr>
    <td><span class="pr2">vs</span><span>Magic</span></td>
    <td><span class="ml4"><a href="http://www.espn.com/nba/recap?gameId=401126819">W 114-106</a></span></td>
  </tr>
  <tr>
    <td><span class="pr2">@</span><span>Magic</span></td>
    <td><span class="ml4"><a href="http://www.espn.com/nba/recap?gameId=401126833">W 107-98</a></span></td>
  </tr>
  <tr>
    <td><span class="pr2">vs</span><span>Sixers</span></td>
    <td><span class="ml4"><a href="http://www.espn.com/nba/recap?gameId=401131841">L 90-94</a></span></td>
  </tr>
  <tr>
    <td><span class="pr2">vs</span><span>TBD</span></td>
    <td><span class="ml4"><a href="http://www.espn.com/nba/team/schedule/_/name/tor">Tickets</a></span></td>
  </tr>
</table>
</body></html>"#;

    #[test]
    fn test_parse_schedule_keeps_home_games_only() {
        let ids = parse_schedule(SCHEDULE_PAGE);
        assert_eq!(ids, vec![GameId(401126819), GameId(401131841)]);
    }

    #[test]
    fn test_links_without_game_ids_are_ignored() {
        let page = SCHEDULE_PAGE.replace("401131841", "nba/page");
        let ids = parse_schedule(&page);
        assert_eq!(ids, vec![GameId(401126819)]);
    }

    #[test]
    fn test_schedule_url() {
        assert_eq!(
            schedule_url("tor", 2019),
            "http://www.espn.com/nba/team/schedule/_/name/tor/season/2019/seasontype/3"
        );
    }

    #[test]
    fn test_every_franchise_has_a_slug() {
        assert_eq!(TEAM_SLUGS.len(), 30);
    }

    #[test]
    fn test_default_scraper_builds() {
        let _ = ScheduleScraper::default();
    }
}
