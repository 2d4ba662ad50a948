//! Ship qualification matching.
//!
//! Finds catalog vessels that would build qualifying sea time toward a
//! target credential, ranks them with a single rule table, and explains
//! each match from the same rules.

pub mod criteria;
pub mod matcher;
pub mod scoring;

pub use criteria::{MatchCriteriaTable, ShipMatchCriteria};
pub use matcher::{
    find_qualifying_ships, group_ships_by_class, ship_help_text, ShipMatch, ShipMatcher,
    DEFAULT_SHIP_LIMIT,
};
pub use scoring::{ScoringRule, ScoringRules, ShipScore, Signal};
