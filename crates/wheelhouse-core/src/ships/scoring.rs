//! Ship scoring rule table.
//!
//! Each rule pairs a predicate with the points it awards and the sentence
//! that explains it. Rules are grouped by [`Signal`]; within a signal only
//! the first matching rule counts. The numeric score and the help text are
//! both read off the same evaluation, so they cannot disagree.

use std::fmt;

use serde::Serialize;

use super::criteria::ShipMatchCriteria;
use crate::models::{RouteCategory, Ship};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Tonnage,
    Route,
    Operator,
    TonnageBand,
}

pub type Predicate = fn(&Ship, &ShipMatchCriteria) -> bool;

#[derive(Clone, Copy)]
pub struct ScoringRule {
    pub signal: Signal,
    pub points: u32,
    pub explanation: &'static str,
    pub applies: Predicate,
}

impl fmt::Debug for ScoringRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringRule")
            .field("signal", &self.signal)
            .field("points", &self.points)
            .field("explanation", &self.explanation)
            .finish()
    }
}

/// Score and the explanations of every rule that contributed to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShipScore {
    pub total: u32,
    pub reasons: Vec<&'static str>,
}

impl ShipScore {
    pub fn explanation(&self) -> String {
        self.reasons.join("; ")
    }
}

#[derive(Debug, Clone)]
pub struct ScoringRules {
    rules: Vec<ScoringRule>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::standard()
    }
}

fn route_is(ship: &Ship, criteria: &ShipMatchCriteria, route: RouteCategory) -> bool {
    ship.route_category == Some(route) && criteria.route_eligible(route)
}

impl ScoringRules {
    pub fn new(rules: Vec<ScoringRule>) -> Self {
        Self { rules }
    }

    /// Tonnage, route, operator and tonnage-band rules; 100 points at most.
    pub fn standard() -> Self {
        Self::new(vec![
            ScoringRule {
                signal: Signal::Tonnage,
                points: 50,
                explanation: "Builds unlimited-tonnage sea time",
                applies: |ship, c| ship.grt.map(|g| g >= c.preferred_grt).unwrap_or(false),
            },
            ScoringRule {
                signal: Signal::Tonnage,
                points: 25,
                explanation: "Counts toward tonnage-limited sea time",
                applies: |ship, c| ship.grt.map(|g| g >= c.min_grt).unwrap_or(false),
            },
            ScoringRule {
                signal: Signal::Route,
                points: 30,
                explanation: "Oceans route time qualifies for any route endorsement",
                applies: |ship, c| route_is(ship, c, RouteCategory::Oceans),
            },
            ScoringRule {
                signal: Signal::Route,
                points: 25,
                explanation: "Near-coastal route time",
                applies: |ship, c| route_is(ship, c, RouteCategory::NearCoastal),
            },
            ScoringRule {
                signal: Signal::Route,
                points: 20,
                explanation: "Eligible route time",
                applies: |ship, c| ship.route_category.map(|r| c.route_eligible(r)).unwrap_or(false),
            },
            ScoringRule {
                signal: Signal::Operator,
                points: 10,
                explanation: "Military Sealift Command vessel",
                applies: |ship, _| ship.operator_is("msc"),
            },
            ScoringRule {
                signal: Signal::Operator,
                points: 8,
                explanation: "NOAA fleet vessel",
                applies: |ship, _| ship.operator_is("noaa"),
            },
            ScoringRule {
                signal: Signal::TonnageBand,
                points: 10,
                explanation: "Unlimited tonnage band",
                applies: |ship, _| ship.tonnage_band_is("unlimited"),
            },
        ])
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    /// Evaluate every rule once against `ship`.
    pub fn score(&self, ship: &Ship, criteria: &ShipMatchCriteria) -> ShipScore {
        let mut matched: Vec<Signal> = Vec::with_capacity(4);
        let mut score = ShipScore::default();

        for rule in &self.rules {
            if matched.contains(&rule.signal) {
                continue;
            }
            if (rule.applies)(ship, criteria) {
                matched.push(rule.signal);
                score.total += rule.points;
                score.reasons.push(rule.explanation);
            }
        }

        score
    }

    /// Highest total any ship could reach.
    pub fn max_score(&self) -> u32 {
        let mut best: Vec<(Signal, u32)> = Vec::new();
        for rule in &self.rules {
            match best.iter_mut().find(|(s, _)| *s == rule.signal) {
                Some((_, points)) => *points = (*points).max(rule.points),
                None => best.push((rule.signal, rule.points)),
            }
        }
        best.iter().map(|(_, p)| p).sum()
    }
}
