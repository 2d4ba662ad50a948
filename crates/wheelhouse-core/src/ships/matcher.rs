//! Filtering, ranking and grouping of catalog ships for a target credential.

use serde::Serialize;
use tracing::debug;

use super::criteria::{MatchCriteriaTable, ShipMatchCriteria};
use super::scoring::{ScoringRules, ShipScore};
use crate::models::{CredentialLevel, Ship};
use crate::utils::format_thousands;

/// Ships returned when the caller does not ask for a specific count.
pub const DEFAULT_SHIP_LIMIT: usize = 12;

/// Group name for ships with no class.
const UNCLASSIFIED: &str = "Other";

/// A catalog ship with its score.
#[derive(Debug, Clone, Serialize)]
pub struct ShipMatch<'a> {
    pub ship: &'a Ship,
    pub score: ShipScore,
}

#[derive(Debug, Clone, Default)]
pub struct ShipMatcher {
    criteria: MatchCriteriaTable,
    rules: ScoringRules,
}

impl ShipMatcher {
    pub fn new(criteria: MatchCriteriaTable, rules: ScoringRules) -> Self {
        Self { criteria, rules }
    }

    pub fn criteria_for(&self, target: CredentialLevel) -> &ShipMatchCriteria {
        self.criteria.for_credential(target)
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn score(&self, ship: &Ship, target: CredentialLevel) -> ShipScore {
        self.rules.score(ship, self.criteria_for(target))
    }

    /// Qualifying ships with their scores, best first. Ties keep catalog
    /// order. At most `limit` entries.
    pub fn rank<'a>(
        &self,
        all_ships: &'a [Ship],
        target: CredentialLevel,
        limit: usize,
    ) -> Vec<ShipMatch<'a>> {
        let criteria = self.criteria_for(target);

        let mut matches: Vec<ShipMatch<'a>> = all_ships
            .iter()
            .filter(|ship| criteria.qualifies(ship))
            .map(|ship| ShipMatch {
                ship,
                score: self.rules.score(ship, criteria),
            })
            .collect();

        // sort_by is stable
        matches.sort_by(|a, b| b.score.total.cmp(&a.score.total));

        debug!(
            credential = %target,
            catalog = all_ships.len(),
            qualifying = matches.len(),
            limit,
            "Ranked qualifying ships"
        );

        matches.truncate(limit);
        matches
    }

    pub fn find_qualifying_ships<'a>(
        &self,
        all_ships: &'a [Ship],
        target: CredentialLevel,
        limit: usize,
    ) -> Vec<&'a Ship> {
        self.rank(all_ships, target, limit)
            .into_iter()
            .map(|m| m.ship)
            .collect()
    }

    /// Why a ship is, or is not, a good place to build sea time toward
    /// `target`.
    pub fn help_text(&self, ship: &Ship, target: CredentialLevel) -> String {
        let criteria = self.criteria_for(target);

        match ship.grt {
            None => return "Tonnage unknown, so this vessel's sea time cannot be rated".to_string(),
            Some(grt) if grt < criteria.min_grt => {
                return format!(
                    "Below the {} GRT minimum for {} sea time",
                    format_thousands(criteria.min_grt),
                    criteria.department
                )
            }
            Some(_) => {}
        }
        if let Some(route) = ship.route_category {
            if !criteria.route_eligible(route) {
                return format!("{} route time does not count toward {}", route, target);
            }
        }

        self.rules.score(ship, criteria).explanation()
    }
}

/// Top `limit` ships for `target` using the standard criteria and rules.
pub fn find_qualifying_ships(all_ships: &[Ship], target: CredentialLevel, limit: usize) -> Vec<&Ship> {
    ShipMatcher::default().find_qualifying_ships(all_ships, target, limit)
}

/// Help text for `ship` using the standard criteria and rules.
pub fn ship_help_text(ship: &Ship, target: CredentialLevel) -> String {
    ShipMatcher::default().help_text(ship, target)
}

/// Partition ships by class. Groups appear in order of first appearance and
/// keep input order inside each group; ships without a class go under
/// "Other".
pub fn group_ships_by_class<'a, I>(ships: I) -> Vec<(String, Vec<&'a Ship>)>
where
    I: IntoIterator<Item = &'a Ship>,
{
    let mut groups: Vec<(String, Vec<&'a Ship>)> = Vec::new();

    for ship in ships {
        let class = ship
            .class
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCLASSIFIED);

        match groups.iter_mut().find(|(name, _)| name == class) {
            Some((_, members)) => members.push(ship),
            None => groups.push((class.to_string(), vec![ship])),
        }
    }

    groups
}
