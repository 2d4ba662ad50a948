use serde::{Deserialize, Serialize};

use crate::models::{CredentialLevel, Department, RouteCategory, Ship};

/// Smallest vessel worth suggesting.
const MIN_GRT: u32 = 100;

/// Vessels at or above this size build unlimited-tonnage time.
const PREFERRED_GRT: u32 = 1600;

/// What a ship must offer to build sea time toward a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ShipMatchCriteria {
    pub min_grt: u32,
    pub preferred_grt: u32,
    pub routes: Vec<RouteCategory>,
    pub department: Department,
}

impl ShipMatchCriteria {
    fn standard(department: Department) -> Self {
        Self {
            min_grt: MIN_GRT,
            preferred_grt: PREFERRED_GRT,
            routes: vec![
                RouteCategory::Oceans,
                RouteCategory::NearCoastal,
                RouteCategory::GreatLakes,
            ],
            department,
        }
    }

    pub fn route_eligible(&self, route: RouteCategory) -> bool {
        self.routes.contains(&route)
    }

    /// A ship qualifies when its tonnage is known and meets the floor, and
    /// its route, when known, is eligible.
    pub fn qualifies(&self, ship: &Ship) -> bool {
        let tonnage_ok = ship.grt.map(|g| g >= self.min_grt).unwrap_or(false);
        let route_ok = ship.route_category.map(|r| self.route_eligible(r)).unwrap_or(true);
        tonnage_ok && route_ok
    }
}

/// Criteria lookup keyed by credential. Every deck credential shares one
/// entry and every engine credential another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MatchCriteriaTable {
    pub deck: ShipMatchCriteria,
    pub engine: ShipMatchCriteria,
}

impl Default for MatchCriteriaTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl MatchCriteriaTable {
    pub fn standard() -> Self {
        Self {
            deck: ShipMatchCriteria::standard(Department::Deck),
            engine: ShipMatchCriteria::standard(Department::Engine),
        }
    }

    pub fn for_credential(&self, credential: CredentialLevel) -> &ShipMatchCriteria {
        match credential.department() {
            Department::Deck => &self.deck,
            Department::Engine => &self.engine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship(grt: Option<u32>, route: Option<RouteCategory>) -> Ship {
        Ship {
            grt,
            route_category: route,
            ..Default::default()
        }
    }

    #[test]
    fn test_lookup_by_credential() {
        let table = MatchCriteriaTable::standard();
        assert_eq!(table.for_credential(CredentialLevel::Master).department, Department::Deck);
        assert_eq!(
            table.for_credential(CredentialLevel::SecondAssistantEngineer).department,
            Department::Engine
        );
        assert_eq!(table.for_credential(CredentialLevel::ThirdMate).min_grt, 100);
        assert_eq!(table.for_credential(CredentialLevel::ChiefEngineer).preferred_grt, 1600);
    }

    #[test]
    fn test_qualifies() {
        let criteria = MatchCriteriaTable::standard().deck;
        assert!(criteria.qualifies(&ship(Some(100), Some(RouteCategory::Oceans))));
        assert!(criteria.qualifies(&ship(Some(5000), None)));
        assert!(!criteria.qualifies(&ship(Some(90), Some(RouteCategory::Oceans))));
        assert!(!criteria.qualifies(&ship(None, Some(RouteCategory::Oceans))));
        assert!(!criteria.qualifies(&ship(Some(5000), Some(RouteCategory::Inland))));
        assert!(!criteria.qualifies(&ship(Some(5000), Some(RouteCategory::Other))));
    }
}
