//! Aggregation of scored records by (profile, week).
//!
//! Each metric reduces to mean and sample standard deviation over its non-NaN
//! values; flags reduce to rates over every record in the group. The output
//! feeds reporting only and applies no thresholds of its own.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::ScoredRecord;

/// Mean ± sample std over the non-NaN values of one metric.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct MeanStd {
    pub mean: f64,
    pub std: f64,
    /// Number of non-NaN values reduced.
    pub count: usize,
}

/// NaNs are excluded. Empty → (NaN, NaN); one value → (v, 0.0).
pub fn mean_std<I: IntoIterator<Item = f64>>(values: I) -> MeanStd {
    let vals: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    let count = vals.len();
    match count {
        0 => MeanStd {
            mean: f64::NAN,
            std: f64::NAN,
            count,
        },
        1 => MeanStd {
            mean: vals[0],
            std: 0.0,
            count,
        },
        _ => {
            let mean = vals.iter().sum::<f64>() / count as f64;
            let variance =
                vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            MeanStd {
                mean,
                std: variance.sqrt(),
                count,
            }
        }
    }
}

/// Reduced statistics for one (profile, week) cell.
#[derive(Clone, Debug, Serialize)]
pub struct GroupStatistics {
    pub profile: String,
    pub time_step: u32,
    pub records: usize,
    pub health: MeanStd,
    pub extreme: MeanStd,
    pub lie: MeanStd,
    pub entropy: MeanStd,
    pub dev_contradictory: MeanStd,
    pub dev_noncontradictory: MeanStd,
    pub sick_rate: f64,
    pub lying_rate: f64,
}

fn reduce_group(profile: &str, time_step: u32, group: &[&ScoredRecord]) -> GroupStatistics {
    let n = group.len();
    let metric = |f: fn(&ScoredRecord) -> f64| mean_std(group.iter().map(|r| f(r)));
    let rate = |f: fn(&ScoredRecord) -> bool| {
        if n == 0 {
            f64::NAN
        } else {
            group.iter().filter(|r| f(r)).count() as f64 / n as f64
        }
    };
    GroupStatistics {
        profile: profile.to_string(),
        time_step,
        records: n,
        health: metric(|r| r.scores.health_score),
        extreme: metric(|r| r.scores.extreme_score),
        lie: metric(|r| r.scores.lie_score),
        entropy: metric(|r| r.scores.entropy),
        dev_contradictory: metric(|r| r.scores.dev_contradictory),
        dev_noncontradictory: metric(|r| r.scores.dev_noncontradictory),
        sick_rate: rate(|r| r.flags.sick),
        lying_rate: rate(|r| r.flags.lying),
    }
}

/// Grouped statistics, sorted by profile label then week.
#[derive(Clone, Debug, Serialize)]
pub struct AggregateReport {
    pub num_records: usize,
    pub profiles: Vec<String>,
    pub weeks: Vec<u32>,
    pub groups: Vec<GroupStatistics>,
}

impl AggregateReport {
    pub fn get(&self, profile: &str, time_step: u32) -> Option<&GroupStatistics> {
        self.groups
            .iter()
            .find(|g| g.profile == profile && g.time_step == time_step)
    }

    /// Each profile's group at the overall last week, in profile order.
    ///
    /// A profile with no records in that week is left out, even when it has
    /// earlier weeks.
    pub fn last_week_per_profile(&self) -> Vec<&GroupStatistics> {
        let Some(&last) = self.weeks.last() else {
            return Vec::new();
        };
        self.profiles
            .iter()
            .filter_map(|p| self.get(p, last))
            .collect()
    }
}

/// Group by (profile, week) and reduce each group.
pub fn aggregate_scores(scored: &[ScoredRecord]) -> AggregateReport {
    let mut buckets: BTreeMap<(&str, u32), Vec<&ScoredRecord>> = BTreeMap::new();
    for r in scored {
        buckets
            .entry((r.name.as_str(), r.questionnaire_version))
            .or_default()
            .push(r);
    }

    let groups: Vec<GroupStatistics> = buckets
        .iter()
        .map(|(&(profile, week), group)| reduce_group(profile, week, group))
        .collect();

    let mut profiles: Vec<String> = groups.iter().map(|g| g.profile.clone()).collect();
    profiles.dedup();
    let mut weeks: Vec<u32> = groups.iter().map(|g| g.time_step).collect();
    weeks.sort_unstable();
    weeks.dedup();

    AggregateReport {
        num_records: scored.len(),
        profiles,
        weeks,
        groups,
    }
}

/// Write any serializable report as pretty JSON, creating parent directories.
pub fn save_report<T: Serialize>(report: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|e| Error::io(path, e))
}
