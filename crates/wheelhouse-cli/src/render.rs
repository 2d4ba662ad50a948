//! Plain-text reports.

use std::fmt::Write;

use wheelhouse_core::career::{CareerPathEvaluation, CredentialRules, StepState, UpgradeProgress};
use wheelhouse_core::models::{RouteCategory, SeaServicePeriod};
use wheelhouse_core::ships::{group_ships_by_class, ShipMatch, ShipMatcher};
use wheelhouse_core::utils::{format_date, format_months, format_thousands, truncate_string};
use wheelhouse_core::CredentialLevel;

/// Longest ship help line before it is cut.
const HELP_WIDTH: usize = 96;

fn routes_display(routes: &[RouteCategory]) -> String {
    routes
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn state_label(state: StepState) -> &'static str {
    match state {
        StepState::Complete => "complete",
        StepState::InProgress => "in progress",
        StepState::NotStarted => "not started",
    }
}

fn progress_bar(percent: u32) -> String {
    let filled = (percent.min(100) / 5) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(20 - filled))
}

fn write_step(out: &mut String, index: usize, step: &UpgradeProgress) {
    let _ = writeln!(out, "{}. {} ({})", index + 1, step.credential, state_label(step.state));
    let _ = writeln!(
        out,
        "   Sea time   {} {:>3}%  {} of {} days, {} remaining",
        progress_bar(step.sea_time_percent),
        step.sea_time_percent,
        format_thousands(step.accumulated_days),
        format_thousands(step.required_days),
        format_thousands(step.days_remaining),
    );
    let _ = writeln!(
        out,
        "   Counts     {}+ GRT on {} ({} qualifying period{})",
        format_thousands(step.min_grt),
        routes_display(&step.routes),
        step.qualifying_periods,
        if step.qualifying_periods == 1 { "" } else { "s" },
    );
    if let Some(months) = step.projected_months {
        let _ = writeln!(out, "   Projected  {}", format_months(months));
    }
    if !step.certificates.is_empty() {
        let _ = writeln!(
            out,
            "   Training   {} of {}",
            step.certificates_satisfied(),
            step.certificates.len()
        );
        for cert in &step.certificates {
            let mark = if cert.satisfied { "x" } else { " " };
            let _ = writeln!(out, "     [{}] {}", mark, cert.name);
        }
    }
}

pub fn career_report(evaluation: &CareerPathEvaluation, source: Option<&str>) -> String {
    let mut out = String::new();
    let summary = &evaluation.summary;

    let _ = writeln!(out, "Career path: {} -> {}", evaluation.current, evaluation.target);
    if let Some(source) = source {
        let _ = writeln!(out, "Records: {}", source);
    }
    let _ = writeln!(out);

    for (i, step) in evaluation.steps.iter().enumerate() {
        write_step(&mut out, i, step);
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "Steps complete: {} of {}",
        summary.steps_complete, summary.steps_total
    );
    let _ = writeln!(
        out,
        "Training: {} of {} certificates",
        summary.certificates_satisfied, summary.certificates_required
    );
    if summary.is_complete {
        let _ = writeln!(out, "Every requirement on this path is met.");
    } else {
        let projection = match summary.projected_months {
            Some(months) => format!(" (about {} at your pace)", format_months(months)),
            None => String::new(),
        };
        let _ = writeln!(
            out,
            "Sea days remaining: {}{}",
            format_thousands(summary.days_remaining),
            projection
        );
        if let Some(next) = evaluation.steps.iter().find(|s| !s.is_complete()) {
            let _ = writeln!(out, "Next: {}", next.credential);
            let missing: Vec<&str> = next.missing_certificates().collect();
            if !missing.is_empty() {
                let _ = writeln!(out, "Training still needed: {}", missing.join(", "));
            }
        }
    }
    if evaluation.steps.iter().all(|s| s.accumulated_days == 0) {
        let _ = writeln!(
            out,
            "\nNo qualifying sea service recorded yet. Add your sea time to see progress."
        );
    }

    out
}

/// One line per recorded period, oldest entry first as stored.
pub fn service_report(periods: &[SeaServicePeriod]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sea service");
    if periods.is_empty() {
        let _ = writeln!(out, "  None recorded.");
        return out;
    }
    for period in periods {
        let dates = match (period.sign_on_date.as_deref(), period.sign_off_date.as_deref()) {
            (Some(on), Some(off)) => format!("{} - {}", format_date(on), format_date(off)),
            _ => "dates missing".to_string(),
        };
        let tonnage = period
            .grt
            .map(|g| format!("{} GRT", format_thousands(g)))
            .unwrap_or_else(|| "GRT unknown".to_string());
        let route = period
            .route_category
            .map(|r| r.to_string())
            .unwrap_or_else(|| "route unknown".to_string());
        let _ = writeln!(
            out,
            "  {:<28} {:<28} {:>5} days  {}, {}",
            truncate_string(&period.vessel_display(), 28),
            dates,
            period.credited_days(),
            tonnage,
            route
        );
    }
    out
}

pub fn ship_report(
    matches: &[ShipMatch<'_>],
    matcher: &ShipMatcher,
    target: CredentialLevel,
    source: Option<&str>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Ships for building sea time toward {} (scored out of {})",
        target,
        matcher.rules().max_score()
    );
    if let Some(source) = source {
        let _ = writeln!(out, "Catalog: {}", source);
    }
    let _ = writeln!(out);

    if matches.is_empty() {
        let _ = writeln!(out, "No qualifying ships found in the catalog.");
        return out;
    }

    let groups = group_ships_by_class(matches.iter().map(|m| m.ship));
    for (class, ships) in groups {
        let _ = writeln!(out, "{}", class);
        for ship in ships {
            let score = matches
                .iter()
                .find(|m| std::ptr::eq(m.ship, ship))
                .map(|m| m.score.total)
                .unwrap_or_default();
            let tonnage = ship
                .grt
                .map(|g| format!("{} GRT", format_thousands(g)))
                .unwrap_or_else(|| "GRT unknown".to_string());
            let _ = writeln!(out, "  {:>3}  {}  {}", score, ship.display_name(), tonnage);
            let help = matcher.help_text(ship, target);
            if !help.is_empty() {
                let _ = writeln!(out, "       {}", truncate_string(&help, HELP_WIDTH));
            }
        }
        let _ = writeln!(out);
    }

    out
}

pub fn rules_report(rules: &CredentialRules) -> String {
    let mut out = String::new();
    for track in &rules.tracks {
        let _ = writeln!(out, "{} ladder (entry: {})", track.department, track.entry);
        for step in &track.steps {
            let _ = writeln!(
                out,
                "  {:<26} {:>5} days  {:>6}+ GRT  {}",
                step.credential.to_string(),
                format_thousands(step.required_sea_days),
                format_thousands(step.min_grt),
                routes_display(&step.routes),
            );
            for cert in &step.certificates {
                let _ = writeln!(out, "  {:<26} - {}", "", cert);
            }
        }
        let _ = writeln!(out);
    }
    out
}
