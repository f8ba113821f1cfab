//! Retarget a historical headline to a new game
//!
//! The adaptation is an ordered sequence of plain-text substitution passes
//! over the evolving headline. The order is load-bearing: nicknames are
//! canonicalized before any identity swap, away identities are parked behind
//! placeholders before home identities move, and numeric swaps space-prefix
//! their patterns to dodge partial-number hits. Every replacement applies to
//! all occurrences; a pattern that never appears simply leaves the headline
//! alone.

use crate::GameRecord;

/// Informal team nicknames and their canonical names, in application order
const NICKNAMES: [(&str, &str); 15] = [
    ("Celts", "Celtics"),
    ("6ers", "76ers"),
    ("Sixers", "76ers"),
    ("Raps", "Raptors"),
    ("Cavs", "Cavaliers"),
    ("Wiz", "Wizards"),
    ("Clips", "Clippers"),
    ("Mavs", "Mavericks"),
    ("Pels", "Pelicans"),
    ("Griz", "Grizzlies"),
    ("Grizz", "Grizzlies"),
    ("Nugs", "Nuggets"),
    ("Wolves", "Timberwolves"),
    ("T-Wolves", "Timberwolves"),
    ("Blazers", "Trail Blazers"),
];

/// Rewrite the template game's headline for the target game
///
/// Substitutes team identities, final scores, points-leader totals, and
/// leader names. Surrounding template text is preserved exactly.
pub fn adapt(template: &GameRecord, target: &GameRecord) -> String {
    let headline = normalize_nicknames(&template.headline);
    let headline = swap_team_identities(headline, template, target);
    let headline = swap_scores(headline, template, target);
    let headline = swap_leader_points(headline, template, target);
    swap_leader_names(headline, template, target)
}

fn normalize_nicknames(headline: &str) -> String {
    let mut headline = headline.to_string();
    for (nickname, full_name) in NICKNAMES {
        headline = headline.replace(nickname, full_name);
    }
    headline
}

/// Swap both sides' team, city, and abbreviation text
///
/// The template's away identity moves behind placeholders before the home
/// identity is replaced; a direct swap would merge the sides whenever the
/// template's away franchise is the target's home franchise (a historical
/// Bucks at 76ers game retargeted to Raptors at Bucks, say).
fn swap_team_identities(headline: String, template: &GameRecord, target: &GameRecord) -> String {
    let headline = headline
        .replace(&template.names.away.team, "away_team")
        .replace(&template.names.away.city, "away_city")
        .replace(&template.names.away.abbr, "away_abbr");

    let headline = headline
        .replace(&template.names.home.team, &target.names.home.team)
        .replace(&template.names.home.city, &target.names.home.city)
        .replace(&template.names.home.abbr, &target.names.home.abbr);

    headline
        .replace("away_team", &target.names.away.team)
        .replace("away_city", &target.names.away.city)
        .replace("away_abbr", &target.names.away.abbr)
}

/// Swap final-score text, preferring a combined "home-away" token
///
/// When no combined token is present, each total is swapped on its own with
/// a space prefix; the away total is parked behind a placeholder first so
/// the home swap cannot hit a total the away swap just wrote.
fn swap_scores(headline: String, template: &GameRecord, target: &GameRecord) -> String {
    let template_home = template.scores.home.total.to_string();
    let template_away = template.scores.away.total.to_string();
    let target_home = target.scores.home.total.to_string();
    let target_away = target.scores.away.total.to_string();

    let joined = format!("{}-{}", template_home, template_away);
    if headline.contains(&joined) {
        return headline.replace(&joined, &format!("{}-{}", target_home, target_away));
    }

    let reversed = format!("{}-{}", template_away, template_home);
    if headline.contains(&reversed) {
        return headline.replace(&reversed, &format!("{}-{}", target_away, target_home));
    }

    headline
        .replace(&format!(" {}", template_away), "away_score")
        .replace(&format!(" {}", template_home), &format!(" {}", target_home))
        .replace("away_score", &format!(" {}", target_away))
}

/// Swap points-leader totals with the same placeholder dance as the scores
fn swap_leader_points(headline: String, template: &GameRecord, target: &GameRecord) -> String {
    headline
        .replace(&format!(" {}", template.pts.away.pts), "away_pts_ldr_pts")
        .replace(
            &format!(" {}", template.pts.home.pts),
            &format!(" {}", target.pts.home.pts),
        )
        .replace("away_pts_ldr_pts", &format!(" {}", target.pts.away.pts))
}

fn swap_leader_names(headline: String, template: &GameRecord, target: &GameRecord) -> String {
    let headline = swap_leader_name(headline, &template.pts.away.leader, &target.pts.away.leader);
    swap_leader_name(headline, &template.pts.home.leader, &target.pts.home.leader)
}

/// Three-tier leader-name substitution: full name, then first name token,
/// then last name token. The first tier that matches wins; partial-name
/// tiers substitute the target's last name token, since headlines shorten
/// players to a single name far more often than they spell both out.
fn swap_leader_name(headline: String, template_leader: &str, target_leader: &str) -> String {
    let template_first = first_token(template_leader);
    let template_last = last_token(template_leader);
    let target_last = last_token(target_leader);

    if headline.contains(template_leader) {
        headline.replace(template_leader, target_leader)
    } else if headline.contains(template_first) {
        headline.replace(template_first, target_last)
    } else if headline.contains(template_last) {
        headline.replace(template_last, target_last)
    } else {
        headline
    }
}

fn first_token(name: &str) -> &str {
    name.split(' ').next().unwrap_or(name)
}

fn last_token(name: &str) -> &str {
    name.split(' ').next_back().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AssistsLeader, PointsLeader, ReboundsLeader, ScoreLine, Side, SidePair, TeamNames,
    };

    struct GameFixture {
        headline: &'static str,
        home: (&'static str, &'static str, &'static str),
        away: (&'static str, &'static str, &'static str),
        home_total: u32,
        away_total: u32,
        home_leader: (&'static str, u32),
        away_leader: (&'static str, u32),
    }

    fn make_game(fixture: GameFixture) -> GameRecord {
        let winner = if fixture.home_total > fixture.away_total {
            Side::Home
        } else {
            Side::Away
        };
        GameRecord {
            headline: fixture.headline.to_string(),
            round: "EASTERN CONFERENCE FINALS".to_string(),
            winner,
            names: SidePair::new(
                TeamNames {
                    team: fixture.home.0.to_string(),
                    city: fixture.home.1.to_string(),
                    abbr: fixture.home.2.to_string(),
                },
                TeamNames {
                    team: fixture.away.0.to_string(),
                    city: fixture.away.1.to_string(),
                    abbr: fixture.away.2.to_string(),
                },
            ),
            scores: SidePair::new(
                ScoreLine {
                    total: fixture.home_total,
                    periods: split_quarters(fixture.home_total),
                },
                ScoreLine {
                    total: fixture.away_total,
                    periods: split_quarters(fixture.away_total),
                },
            ),
            quarters: 4,
            pts: SidePair::new(
                PointsLeader {
                    leader: fixture.home_leader.0.to_string(),
                    pts: fixture.home_leader.1,
                    fg: "10-20".to_string(),
                    ft: "5-6".to_string(),
                },
                PointsLeader {
                    leader: fixture.away_leader.0.to_string(),
                    pts: fixture.away_leader.1,
                    fg: "9-21".to_string(),
                    ft: "4-4".to_string(),
                },
            ),
            reb: SidePair::new(
                ReboundsLeader {
                    leader: fixture.home_leader.0.to_string(),
                    reb: 10,
                    dreb: 8,
                    oreb: 2,
                },
                ReboundsLeader {
                    leader: fixture.away_leader.0.to_string(),
                    reb: 9,
                    dreb: 6,
                    oreb: 3,
                },
            ),
            ast: SidePair::new(
                AssistsLeader {
                    leader: fixture.home_leader.0.to_string(),
                    ast: 7,
                    to: 2,
                    min: 37,
                },
                AssistsLeader {
                    leader: fixture.away_leader.0.to_string(),
                    ast: 6,
                    to: 3,
                    min: 36,
                },
            ),
            n_game: 3,
            home_wins: 1,
            away_wins: 1,
        }
    }

    fn split_quarters(total: u32) -> Vec<u32> {
        let quarter = total / 4;
        vec![quarter, quarter, quarter, total - 3 * quarter]
    }

    #[test]
    fn test_adapting_a_game_to_itself_is_identity() {
        let game = make_game(GameFixture {
            headline: "Leonard's 41 sends Raptors past Bucks 105-99 in Game 3",
            home: ("Raptors", "Toronto", "TOR"),
            away: ("Bucks", "Milwaukee", "MIL"),
            home_total: 105,
            away_total: 99,
            home_leader: ("Kawhi Leonard", 41),
            away_leader: ("Giannis Antetokounmpo", 30),
        });

        assert_eq!(adapt(&game, &game), game.headline);
    }

    #[test]
    fn test_nicknames_canonicalized_before_identity_swap() {
        let template = make_game(GameFixture {
            headline: "Celts stun Bucks on the road",
            home: ("Bucks", "Milwaukee", "MIL"),
            away: ("Celtics", "Boston", "BOS"),
            home_total: 99,
            away_total: 104,
            home_leader: ("Khris Middleton", 25),
            away_leader: ("Jayson Tatum", 28),
        });
        let target = make_game(GameFixture {
            headline: "",
            home: ("Raptors", "Toronto", "TOR"),
            away: ("76ers", "Philadelphia", "PHI"),
            home_total: 101,
            away_total: 106,
            home_leader: ("Pascal Siakam", 24),
            away_leader: ("Joel Embiid", 27),
        });

        let headline = adapt(&template, &target);
        assert_eq!(headline, "76ers stun Raptors on the road");
        assert!(!headline.contains("Celts"));
    }

    #[test]
    fn test_shared_franchise_between_sides_does_not_merge() {
        // The template's away team is the target's home team; without the
        // placeholder step both sides would read "Bucks".
        let template = make_game(GameFixture {
            headline: "Bucks roll past Raptors in Game 2",
            home: ("Raptors", "Toronto", "TOR"),
            away: ("Bucks", "Milwaukee", "MIL"),
            home_total: 98,
            away_total: 112,
            home_leader: ("Kawhi Leonard", 27),
            away_leader: ("Giannis Antetokounmpo", 34),
        });
        let target = make_game(GameFixture {
            headline: "",
            home: ("Bucks", "Milwaukee", "MIL"),
            away: ("Celtics", "Boston", "BOS"),
            home_total: 96,
            away_total: 108,
            home_leader: ("Giannis Antetokounmpo", 32),
            away_leader: ("Jayson Tatum", 36),
        });

        let headline = adapt(&template, &target);
        assert_eq!(headline, "Celtics roll past Bucks in Game 2");
    }

    #[test]
    fn test_combined_score_token_is_replaced() {
        let template = make_game(GameFixture {
            headline: "Heat top Pacers 100-95 to take series lead",
            home: ("Heat", "Miami", "MIA"),
            away: ("Pacers", "Indiana", "IND"),
            home_total: 100,
            away_total: 95,
            home_leader: ("Jimmy Butler", 27),
            away_leader: ("Victor Oladipo", 22),
        });
        let target = make_game(GameFixture {
            headline: "",
            home: ("Heat", "Miami", "MIA"),
            away: ("Pacers", "Indiana", "IND"),
            home_total: 110,
            away_total: 88,
            home_leader: ("Jimmy Butler", 30),
            away_leader: ("Victor Oladipo", 21),
        });

        let headline = adapt(&template, &target);
        assert_eq!(headline, "Heat top Pacers 110-88 to take series lead");
    }

    #[test]
    fn test_reversed_score_token_is_replaced() {
        let template = make_game(GameFixture {
            headline: "Pacers fall 95-100 despite late rally",
            home: ("Heat", "Miami", "MIA"),
            away: ("Pacers", "Indiana", "IND"),
            home_total: 100,
            away_total: 95,
            home_leader: ("Jimmy Butler", 27),
            away_leader: ("Victor Oladipo", 22),
        });
        let target = make_game(GameFixture {
            headline: "",
            home: ("Heat", "Miami", "MIA"),
            away: ("Pacers", "Indiana", "IND"),
            home_total: 110,
            away_total: 88,
            home_leader: ("Jimmy Butler", 30),
            away_leader: ("Victor Oladipo", 21),
        });

        let headline = adapt(&template, &target);
        assert_eq!(headline, "Pacers fall 88-110 despite late rally");
    }

    #[test]
    fn test_split_scores_swap_without_cross_contamination() {
        // The target's home total equals the template's away total, the case
        // the placeholder ordering exists for.
        let template = make_game(GameFixture {
            headline: "Suns outscore Rockets 102 to 95 in Game 6",
            home: ("Suns", "Phoenix", "PHX"),
            away: ("Rockets", "Houston", "HOU"),
            home_total: 102,
            away_total: 95,
            home_leader: ("Devin Booker", 33),
            away_leader: ("James Harden", 29),
        });
        let target = make_game(GameFixture {
            headline: "",
            home: ("Suns", "Phoenix", "PHX"),
            away: ("Rockets", "Houston", "HOU"),
            home_total: 95,
            away_total: 77,
            home_leader: ("Devin Booker", 31),
            away_leader: ("James Harden", 24),
        });

        let headline = adapt(&template, &target);
        assert_eq!(headline, "Suns outscore Rockets 95 to 77 in Game 6");
    }

    #[test]
    fn test_leader_points_swap_handles_equal_totals() {
        // Target home leader scores exactly the template away leader's total.
        let template = make_game(GameFixture {
            headline: "Aldridge drops 35, Curry adds 28 as Warriors cruise",
            home: ("Warriors", "Golden State", "GS"),
            away: ("Spurs", "San Antonio", "SA"),
            home_total: 116,
            away_total: 101,
            home_leader: ("Stephen Curry", 28),
            away_leader: ("LaMarcus Aldridge", 35),
        });
        let target = make_game(GameFixture {
            headline: "",
            home: ("Warriors", "Golden State", "GS"),
            away: ("Spurs", "San Antonio", "SA"),
            home_total: 109,
            away_total: 99,
            home_leader: ("Stephen Curry", 35),
            away_leader: ("LaMarcus Aldridge", 22),
        });

        let headline = adapt(&template, &target);
        assert_eq!(headline, "Aldridge drops 22, Curry adds 35 as Warriors cruise");
    }

    #[test]
    fn test_leader_full_name_tier() {
        let template = make_game(GameFixture {
            headline: "Kawhi Leonard lifts Raptors in Game 7",
            home: ("Raptors", "Toronto", "TOR"),
            away: ("76ers", "Philadelphia", "PHI"),
            home_total: 92,
            away_total: 90,
            home_leader: ("Kawhi Leonard", 41),
            away_leader: ("Joel Embiid", 21),
        });
        let target = make_game(GameFixture {
            headline: "",
            home: ("Raptors", "Toronto", "TOR"),
            away: ("76ers", "Philadelphia", "PHI"),
            home_total: 101,
            away_total: 96,
            home_leader: ("Pascal Siakam", 32),
            away_leader: ("Tobias Harris", 25),
        });

        let headline = adapt(&template, &target);
        assert_eq!(headline, "Pascal Siakam lifts Raptors in Game 7");
    }

    #[test]
    fn test_leader_first_name_tier_uses_target_last_token() {
        let template = make_game(GameFixture {
            headline: "LeBron wills Cavaliers past Pacers",
            home: ("Cavaliers", "Cleveland", "CLE"),
            away: ("Pacers", "Indiana", "IND"),
            home_total: 105,
            away_total: 101,
            home_leader: ("LeBron James", 44),
            away_leader: ("Victor Oladipo", 25),
        });
        let target = make_game(GameFixture {
            headline: "",
            home: ("Cavaliers", "Cleveland", "CLE"),
            away: ("Pacers", "Indiana", "IND"),
            home_total: 100,
            away_total: 97,
            home_leader: ("Kevin Love", 29),
            away_leader: ("Domantas Sabonis", 20),
        });

        let headline = adapt(&template, &target);
        assert_eq!(headline, "Love wills Cavaliers past Pacers");
    }

    #[test]
    fn test_leader_last_name_tier() {
        let template = make_game(GameFixture {
            headline: "Harden's 45 not enough for Rockets",
            home: ("Warriors", "Golden State", "GS"),
            away: ("Rockets", "Houston", "HOU"),
            home_total: 104,
            away_total: 100,
            home_leader: ("Stephen Curry", 27),
            away_leader: ("James Harden", 45),
        });
        let target = make_game(GameFixture {
            headline: "",
            home: ("Warriors", "Golden State", "GS"),
            away: ("Rockets", "Houston", "HOU"),
            home_total: 112,
            away_total: 108,
            home_leader: ("Stephen Curry", 30),
            away_leader: ("Chris Paul", 38),
        });

        let headline = adapt(&template, &target);
        assert_eq!(headline, "Paul's 38 not enough for Rockets");
    }

    #[test]
    fn test_absent_leader_name_leaves_headline_untouched() {
        let template = make_game(GameFixture {
            headline: "Defense carries Raptors to the Finals",
            home: ("Raptors", "Toronto", "TOR"),
            away: ("Bucks", "Milwaukee", "MIL"),
            home_total: 100,
            away_total: 94,
            home_leader: ("Kawhi Leonard", 27),
            away_leader: ("Giannis Antetokounmpo", 21),
        });
        let target = make_game(GameFixture {
            headline: "",
            home: ("Raptors", "Toronto", "TOR"),
            away: ("Bucks", "Milwaukee", "MIL"),
            home_total: 99,
            away_total: 93,
            home_leader: ("Fred VanVleet", 22),
            away_leader: ("Khris Middleton", 24),
        });

        let headline = adapt(&template, &target);
        assert_eq!(headline, "Defense carries Raptors to the Finals");
    }
}
