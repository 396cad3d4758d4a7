//! Monitoring sessions and checklist commands driven from the command line.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;
use vitalwatch_sdk::{
    Alert, AlertAggregator, Checklist, ManualClock, Monitor, SimulatedSource, SimulationScheduler, Snapshot,
    SnapshotSource,
};

use crate::config::Settings;

/// Run `ticks` simulation steps on the scheduler in real time, calling
/// `on_tick` once per recorded snapshot, in order, with its active alerts.
///
/// A slow `on_tick` delays reporting but never skips a snapshot, and the
/// history ends with exactly `ticks` entries.
pub async fn run_live<F>(settings: &Settings, ticks: usize, seed: Option<u64>, mut on_tick: F) -> Result<Arc<Monitor>>
where
    F: FnMut(&Snapshot, &[Alert]),
{
    let monitor = Arc::new(Monitor::builder().classifier(settings.classifier()?).build());
    let aggregator = AlertAggregator::new(settings.classifier()?);

    let handle = SimulationScheduler::new(monitor.clone())
        .interval(settings.interval())
        .max_ticks(ticks)
        .start(settings.simulator(seed)?)?;
    let mut updates = handle.subscribe();

    let mut reported = 0;
    while reported < ticks {
        let finished = updates.changed().await.is_err();

        // Updates coalesce, so walk the history from the last reported entry
        let history = monitor.history();
        for snapshot in history.iter().skip(reported) {
            let alerts = aggregator.active_alerts(snapshot);
            on_tick(snapshot, &alerts);
            reported += 1;
        }

        if finished {
            break;
        }
    }

    handle.stop().await;
    info!("simulation finished after {} snapshots", monitor.history_len());
    Ok(monitor)
}

/// Run `ticks` simulation steps instantly on a manual clock advanced by the
/// configured interval, starting at time zero.
pub fn replay(settings: &Settings, ticks: usize, seed: Option<u64>) -> Result<Monitor> {
    let clock = Arc::new(ManualClock::new(0));
    let monitor = Monitor::builder()
        .classifier(settings.classifier()?)
        .clock(clock.clone())
        .build();
    let mut source = SimulatedSource::new(settings.simulator(seed)?, clock.clone(), Snapshot::baseline(0));

    for _ in 0..ticks {
        clock.advance(settings.simulation.interval_ms);
        if !monitor.poll_source(&mut source) {
            bail!("simulation stopped: {}", source.error().unwrap_or("no snapshot produced"));
        }
    }
    Ok(monitor)
}

/// A `ID:NAME=VALUE` sub-score assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub item: String,
    pub score: String,
    pub value: u32,
}

impl FromStr for ScoreUpdate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (item, rest) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("expected ID:NAME=VALUE, got {:?}", s))?;
        let (score, value) = rest
            .rsplit_once('=')
            .ok_or_else(|| anyhow!("expected ID:NAME=VALUE, got {:?}", s))?;
        let value = value
            .trim()
            .parse()
            .with_context(|| format!("invalid score value in {:?}", s))?;

        Ok(Self {
            item: item.trim().to_string(),
            score: score.trim().to_string(),
            value,
        })
    }
}

/// Mark `complete` items done, then apply `scores` in order. Stops at the
/// first rejected command.
pub fn apply_commands(checklist: &mut Checklist, complete: &[String], scores: &[ScoreUpdate]) -> Result<()> {
    for id in complete {
        checklist.set_completed(id, true)?;
    }
    for update in scores {
        checklist.update_sub_score(&update.item, &update.score, update.value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vitalwatch_sdk::catalog;

    #[test]
    fn test_parse_score_update() {
        let update: ScoreUpdate = "discharge-criteria:Oxygen saturation=2".parse().unwrap();
        assert_eq!(update.item, "discharge-criteria");
        assert_eq!(update.score, "Oxygen saturation");
        assert_eq!(update.value, 2);

        assert!("discharge-criteria".parse::<ScoreUpdate>().is_err());
        assert!("a:b".parse::<ScoreUpdate>().is_err());
        assert!("a:b=-1".parse::<ScoreUpdate>().is_err());
    }

    #[test]
    fn test_apply_commands() {
        let mut checklist = catalog::post_anesthesia();
        apply_commands(
            &mut checklist,
            &["vital-signs".to_string()],
            &["pain-assessment:Pain score=3".parse().unwrap()],
        )
        .unwrap();
        assert!(checklist.get("vital-signs").unwrap().completed);
        assert_eq!(checklist.get("pain-assessment").unwrap().score_total(), 3);

        let err = apply_commands(&mut checklist, &[], &["pain-assessment:Pain score=4".parse().unwrap()]);
        assert!(err.is_err());
        assert!(apply_commands(&mut checklist, &["missing".to_string()], &[]).is_err());
    }

    #[test]
    fn test_replay_is_deterministic() {
        let settings = Settings::default();
        let a = replay(&settings, 12, Some(21)).unwrap();
        let b = replay(&settings, 12, Some(21)).unwrap();
        assert_eq!(a.recent(usize::MAX), b.recent(usize::MAX));
        assert_eq!(a.history_len(), 12);
        assert_eq!(a.current().timestamp_ms(), 60_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_live_reports_each_tick() {
        let mut settings = Settings::default();
        settings.simulation.interval_ms = 1_000;

        let mut seen = Vec::new();
        let monitor = run_live(&settings, 4, Some(3), |snapshot, _alerts| {
            seen.push(snapshot.clone());
        })
        .await
        .unwrap();

        assert_eq!(seen.len(), 4);
        assert_eq!(monitor.history_len(), 4);
        assert_eq!(monitor.recent(4), seen);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(monitor.history_len(), 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_consumer_still_sees_every_tick() {
        let mut settings = Settings::default();
        settings.simulation.interval_ms = 5;

        let mut seen = Vec::new();
        let monitor = run_live(&settings, 6, Some(8), |snapshot, _alerts| {
            // Several ticks land while the first one is being reported
            if seen.is_empty() {
                std::thread::sleep(Duration::from_millis(40));
            }
            seen.push(snapshot.clone());
        })
        .await
        .unwrap();

        assert_eq!(seen.len(), 6);
        assert_eq!(monitor.history_len(), 6);
        assert_eq!(monitor.recent(usize::MAX), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_live_with_no_ticks() {
        let mut seen = 0;
        let monitor = run_live(&Settings::default(), 0, Some(1), |_, _| seen += 1)
            .await
            .unwrap();
        assert_eq!(seen, 0);
        assert_eq!(monitor.history_len(), 0);
    }
}
