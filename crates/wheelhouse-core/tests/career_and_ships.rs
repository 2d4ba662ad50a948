//! End-to-end checks over backend-shaped JSON rows.

use wheelhouse_core::career::StepState;
use wheelhouse_core::models::{RouteCategory, SeaServicePeriod, Ship, TrainingCertificate, UserRecords};
use wheelhouse_core::{
    evaluate_career_path, find_qualifying_ships, group_ships_by_class, ship_help_text, CoreError,
    CredentialLevel, CredentialRules, DEFAULT_SHIP_LIMIT,
};

fn periods() -> Vec<SeaServicePeriod> {
    serde_json::from_str(
        r#"[
            {"id": 1, "vessel_name": "Cape Ray", "sign_on_date": "2023-01-01", "sign_off_date": "2023-06-29",
             "days_served": 180, "department": "deck", "grt": "20,000", "route_category": "oceans"},
            {"id": 2, "vessel_name": "Lakes Trader", "sign_on_date": "2023-08-01", "sign_off_date": "2023-09-29",
             "department": "Deck", "grt": 900, "route_category": "great_lakes"},
            {"id": 3, "vessel_name": "Harbor Tug", "sign_on_date": "2024-01-01", "sign_off_date": "2024-03-30",
             "grt": 80, "route_category": "inland"},
            {"id": 4, "vessel_name": "Unknown dates", "grt": 5000, "route_category": "oceans"}
        ]"#,
    )
    .unwrap()
}

fn catalog() -> Vec<Ship> {
    serde_json::from_str(
        r#"[
            {"id": "a", "name": "Small Fry", "class": "Launch", "grt": 90, "route_category": "oceans",
             "operator": "msc", "tonnage_band": "unlimited"},
            {"id": "b", "name": "Coastal Runner", "class": "Supply", "grt": 1200, "route_category": "near_coastal"},
            {"id": "c", "name": "Bob Hope", "class": "Bob Hope", "hull_number": "T-AKR-300",
             "grt": 1600, "route_category": "oceans", "operator": "msc", "tonnage_band": "unlimited"},
            {"id": "d", "name": "Okeanos Explorer", "grt": "2,300", "route_category": "oceans", "operator": "noaa"},
            {"id": "e", "name": "River Push", "grt": 3000, "route_category": "inland"},
            {"id": "f", "name": "Mystery", "route_category": "oceans"}
        ]"#,
    )
    .unwrap()
}

// ============================================================================
// Career path
// ============================================================================

#[test]
fn test_path_steps_follow_ladder() {
    let rules = CredentialRules::standard();
    let eval = evaluate_career_path(
        &rules,
        "u1",
        CredentialLevel::ThirdMate,
        CredentialLevel::Master,
        &periods(),
        &[],
        200,
    )
    .unwrap();

    let credentials: Vec<_> = eval.steps.iter().map(|s| s.credential).collect();
    assert_eq!(
        credentials,
        vec![CredentialLevel::SecondMate, CredentialLevel::ChiefMate, CredentialLevel::Master]
    );
    assert_eq!(
        rules.ladder_distance(CredentialLevel::ThirdMate, CredentialLevel::Master),
        Some(eval.steps.len())
    );
}

#[test]
fn test_days_counted_per_step_thresholds() {
    let eval = evaluate_career_path(
        &CredentialRules::standard(),
        "u1",
        CredentialLevel::ThirdMate,
        CredentialLevel::ChiefMate,
        &periods(),
        &[],
        200,
    )
    .unwrap();

    // Second mate: oceans (180) + great lakes (60); the tug is under 100 GRT
    assert_eq!(eval.steps[0].accumulated_days, 240);
    assert_eq!(eval.steps[0].qualifying_periods, 2);
    // Chief mate: only the 20,000 GRT oceans period
    assert_eq!(eval.steps[1].accumulated_days, 180);
    assert_eq!(eval.steps[1].state, StepState::InProgress);
    assert!(!eval.summary.is_complete);
}

#[test]
fn test_period_order_does_not_matter() {
    let rules = CredentialRules::standard();
    let mut reversed = periods();
    reversed.reverse();
    let run = |p: &[SeaServicePeriod]| {
        evaluate_career_path(
            &rules,
            "u1",
            CredentialLevel::ThirdMate,
            CredentialLevel::Master,
            p,
            &[],
            200,
        )
        .unwrap()
    };
    assert_eq!(run(&periods()), run(&reversed));
}

#[test]
fn test_complete_requires_days_and_certificates() {
    let mut service = periods();
    service.push(SeaServicePeriod {
        sign_on_date: Some("2024-05-01".to_string()),
        sign_off_date: Some("2024-10-31".to_string()),
        grt: Some(30000),
        route_category: Some(RouteCategory::Oceans),
        ..Default::default()
    });
    let rules = CredentialRules::standard();

    let without = evaluate_career_path(
        &rules,
        "u1",
        CredentialLevel::ThirdMate,
        CredentialLevel::SecondMate,
        &service,
        &[],
        200,
    )
    .unwrap();
    assert!(without.steps[0].sea_time_met());
    assert!(!without.steps[0].is_complete());

    let certs: Vec<TrainingCertificate> =
        serde_json::from_str(r#"[{"name": "  RADAR observer (unlimited) "}]"#).unwrap();
    let with = evaluate_career_path(
        &rules,
        "u1",
        CredentialLevel::ThirdMate,
        CredentialLevel::SecondMate,
        &service,
        &certs,
        200,
    )
    .unwrap();
    assert!(with.steps[0].is_complete());
    assert!(with.summary.is_complete);
    assert_eq!(with.summary.next_step, None);
}

#[test]
fn test_empty_records_single_step() {
    let eval = evaluate_career_path(
        &CredentialRules::standard(),
        "u1",
        CredentialLevel::ThirdMate,
        CredentialLevel::SecondMate,
        &[],
        &[],
        200,
    )
    .unwrap();
    assert_eq!(eval.steps.len(), 1);
    assert_eq!(eval.steps[0].accumulated_days, 0);
    assert_eq!(eval.steps[0].certificates_satisfied(), 0);
    assert_eq!(eval.steps[0].state, StepState::NotStarted);
}

#[test]
fn test_free_text_department_label_still_counts() {
    let service: Vec<SeaServicePeriod> = serde_json::from_str(
        r#"[
            {"sign_on_date": "2023-01-01", "sign_off_date": "2023-01-31", "grt": 5000,
             "route_category": "oceans", "department": "Deck Department"},
            {"sign_on_date": "2023-03-01", "sign_off_date": "2023-03-10", "grt": 5000,
             "route_category": "oceans", "department": "Bridge watch"},
            {"sign_on_date": "2023-05-01", "sign_off_date": "2023-05-20", "grt": 5000,
             "route_category": "oceans", "department": "Engine Dept."}
        ]"#,
    )
    .unwrap();
    let eval = evaluate_career_path(
        &CredentialRules::standard(),
        "u1",
        CredentialLevel::ThirdMate,
        CredentialLevel::SecondMate,
        &service,
        &[],
        200,
    )
    .unwrap();
    // 31 + 10; the engine period belongs to the other ladder
    assert_eq!(eval.steps[0].accumulated_days, 41);
    assert_eq!(eval.steps[0].qualifying_periods, 2);
}

#[test]
fn test_cross_track_target_is_rejected() {
    let result = evaluate_career_path(
        &CredentialRules::standard(),
        "u1",
        CredentialLevel::ChiefMate,
        CredentialLevel::ChiefEngineer,
        &[],
        &[],
        200,
    );
    assert!(matches!(result, Err(CoreError::UnreachableTarget { .. })));
}

#[test]
fn test_records_json_defaults_goal() {
    let records: UserRecords = serde_json::from_str(r#"{"user_id": "u1", "goal": null,
        "sea_service": [], "certificates": [], "settings": {"sea_days_per_year": null}}"#)
    .unwrap();
    assert_eq!(
        records.credentials().unwrap(),
        (CredentialLevel::ThirdMate, CredentialLevel::Master)
    );
    assert_eq!(records.sea_days_per_year(), 200);
}

#[test]
fn test_custom_rules_from_json() {
    let json = serde_json::to_string(&CredentialRules::standard()).unwrap();
    let rules = CredentialRules::from_json_str(&json).unwrap();
    assert_eq!(rules, CredentialRules::standard());

    let broken = r#"{"tracks": []}"#;
    assert!(matches!(
        CredentialRules::from_json_str(broken),
        Err(CoreError::InvalidRules(_))
    ));
}

// ============================================================================
// Ship matching
// ============================================================================

#[test]
fn test_best_ship_ranks_first() {
    let ships = catalog();
    let found = find_qualifying_ships(&ships, CredentialLevel::Master, DEFAULT_SHIP_LIMIT);
    let names: Vec<_> = found.iter().map(|s| s.display_name()).collect();
    assert_eq!(
        names,
        vec!["Bob Hope (T-AKR-300)", "Okeanos Explorer", "Coastal Runner"]
    );
}

#[test]
fn test_never_below_minimum_or_over_limit() {
    let ships = catalog();
    for limit in 0..5 {
        let found = find_qualifying_ships(&ships, CredentialLevel::ChiefEngineer, limit);
        assert!(found.len() <= limit);
        assert!(found.iter().all(|s| s.grt.unwrap_or(0) >= 100));
    }
}

#[test]
fn test_blank_route_is_unknown_not_ineligible() {
    let ships: Vec<Ship> = serde_json::from_str(
        r#"[{"name": "Blank Route", "grt": 5000, "route_category": ""},
            {"name": "Spaces", "grt": 5000, "route_category": "  "}]"#,
    )
    .unwrap();
    assert_eq!(ships[0].route_category, None);
    let found = find_qualifying_ships(&ships, CredentialLevel::Master, 12);
    assert_eq!(found.len(), 2);

    let period: SeaServicePeriod =
        serde_json::from_str(r#"{"id": 7.0, "grt": 5000, "route_category": ""}"#).unwrap();
    assert_eq!(period.id.as_deref(), Some("7"));
    assert_eq!(period.route_category, None);
}

#[test]
fn test_help_text_and_grouping() {
    let ships = catalog();
    assert_eq!(
        ship_help_text(&ships[0], CredentialLevel::Master),
        "Below the 100 GRT minimum for Deck sea time"
    );
    assert!(ship_help_text(&ships[2], CredentialLevel::Master).starts_with("Builds unlimited-tonnage sea time"));

    let found = find_qualifying_ships(&ships, CredentialLevel::Master, DEFAULT_SHIP_LIMIT);
    let groups = group_ships_by_class(found.iter().copied());
    let keys: Vec<_> = groups.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["Bob Hope", "Other", "Supply"]);
}
