//! Text and JSON rendering of monitoring and readiness state.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use vitalwatch_sdk::{
    AlertAggregator, Checklist, MeasurementKind, Monitor, ReadinessEvaluator, ReadinessResult, SignalHistory,
    Snapshot,
};

use crate::config::Settings;

/// One history row: time followed by every kind, `-` where absent.
pub fn format_snapshot_row(snapshot: &Snapshot) -> String {
    let mut row = format!("{:>10}", snapshot.timestamp_ms());
    for kind in MeasurementKind::ALL {
        let cell = match snapshot.get(kind) {
            Some(v) => format!("{:.*}", kind.display_precision(), v),
            None => "-".to_string(),
        };
        row.push_str(&format!("  {:>6}", cell));
    }
    row
}

/// Column header matching [`format_snapshot_row`].
pub fn history_header() -> String {
    let mut header = format!("{:>10}", "time_ms");
    for kind in MeasurementKind::ALL {
        header.push_str(&format!("  {:>6}", abbreviation(kind)));
    }
    header
}

fn abbreviation(kind: MeasurementKind) -> &'static str {
    match kind {
        MeasurementKind::HeartRate => "HR",
        MeasurementKind::SystolicPressure => "SBP",
        MeasurementKind::DiastolicPressure => "DBP",
        MeasurementKind::OxygenSaturation => "SpO2",
        MeasurementKind::Temperature => "Temp",
        MeasurementKind::RespiratoryRate => "RR",
        MeasurementKind::EndTidalCo2 => "EtCO2",
    }
}

/// Rate of change per minute of each kind over the last two readings,
/// e.g. `HR -1.2/min  SBP +0.4/min`. Kinds without a trend are left out.
pub fn format_trends(history: &SignalHistory) -> String {
    MeasurementKind::ALL
        .into_iter()
        .filter_map(|kind| {
            history
                .trend_per_minute(kind)
                .map(|trend| format!("{} {:+.1}/min", abbreviation(kind), trend))
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Multi-line readiness summary: per-category progress, overall
/// progress, score, gate state and what keeps the gate closed.
pub fn format_readiness(result: &ReadinessResult, evaluator: &ReadinessEvaluator) -> String {
    let state = evaluator.state_of(result);
    let mut out = String::new();
    for category in &result.categories {
        out.push_str(&format!(
            "  {:<32} {:>2}/{:<2} {:>3}%\n",
            category.category,
            category.progress.completed,
            category.progress.total,
            category.progress.percentage()
        ));
    }
    out.push_str(&format!(
        "  {:<32} {:>2}/{:<2} {:>3}%\n",
        "Overall",
        result.overall.completed,
        result.overall.total,
        result.overall.percentage()
    ));
    if result.score.max > 0 {
        out.push_str(&format!("  Score: {}/{}\n", result.score.total, result.score.max));
    }
    out.push_str(&format!(
        "  Critical items complete: {}\n",
        if result.critical_gate_satisfied { "yes" } else { "no" }
    ));
    out.push_str(&format!("  State: {}", state.label()));
    for blocker in evaluator.blockers(result) {
        out.push_str(&format!("\n  - {}", blocker));
    }
    out
}

fn readiness_json(checklist: &Checklist, evaluator: &ReadinessEvaluator) -> Value {
    let result = evaluator.evaluate(checklist);
    let state = evaluator.state_of(&result);
    let blockers = evaluator.blockers(&result);
    json!({
        "state": state.label(),
        "open": state.is_open(),
        "percentage": result.overall.percentage(),
        "blockers": blockers.iter().map(|b| json!({
            "reason": b,
            "message": b.to_string(),
        })).collect::<Vec<_>>(),
        "result": result,
    })
}

/// Export structure for a monitoring session and its checklists.
pub fn build_report(
    settings: &Settings,
    monitor: &Monitor,
    pre: &Checklist,
    post: &Checklist,
) -> Value {
    let history = monitor.history();
    let alerts = monitor.active_alerts();
    let assessment = monitor.assess();

    let aggregator = AlertAggregator::new(monitor.classifier().clone());
    let critical_snapshots = history.iter().filter(|s| aggregator.has_critical(s)).count();

    let trends: Map<String, Value> = MeasurementKind::ALL
        .into_iter()
        .map(|kind| (kind.key().to_string(), json!(history.trend_per_minute(kind))))
        .collect();

    json!({
        "schema_version": vitalwatch_sdk::SCHEMA_VERSION,
        "summary": {
            "snapshots": history.len(),
            "critical_snapshots": critical_snapshots,
            "overall": assessment.overall,
            "active_alerts": alerts.len(),
        },
        "config": {
            "interval_ms": settings.simulation.interval_ms,
            "seed": settings.simulation.seed,
            "discharge_threshold": settings.discharge_threshold,
            "display_window": settings.history.display_window,
            "ranges": monitor.classifier().table(),
        },
        "current": assessment,
        "trends_per_minute": trends,
        "alerts": alerts.iter().map(|a| json!({
            "kind": a.kind,
            "value": a.value,
            "tier": a.tier,
            "message": a.to_string(),
        })).collect::<Vec<_>>(),
        "history": history.iter().collect::<Vec<_>>(),
        "readiness": {
            "pre_anesthesia": readiness_json(pre, &ReadinessEvaluator::simple()),
            "post_anesthesia": readiness_json(post, &ReadinessEvaluator::scored(settings.discharge_threshold)),
        },
    })
}

/// Write `report` to `path` as pretty-printed JSON.
pub fn export_to_file(report: &Value, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
