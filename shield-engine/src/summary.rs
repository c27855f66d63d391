//! Summary Aggregator — pure folds from the ledger into privacy scores.

use std::collections::HashMap;

use shield_core::types::{DecisionStatus, LogEntry, PermissionCounts, PermissionType, PrivacySummary};

/// Blend weights for the device-wide score.
const RISK_WEIGHT: f64 = 0.7;
const SIMULATED_WEIGHT: f64 = 0.3;

/// Fold ledger entries into per-app summaries, sorted descending by average
/// risk.
pub fn summarize(entries: &[LogEntry]) -> Vec<PrivacySummary> {
    struct Accumulator {
        app_name: String,
        counts: HashMap<PermissionType, PermissionCounts>,
        total_risk: f64,
        scored_entries: u64,
        last_access_ms: i64,
    }

    let mut by_app: HashMap<String, Accumulator> = HashMap::new();

    for entry in entries {
        let acc = by_app.entry(entry.app_id.clone()).or_insert_with(|| Accumulator {
            app_name: entry.app_name.clone(),
            counts: PermissionType::ALL
                .iter()
                .map(|p| (*p, PermissionCounts::default()))
                .collect(),
            total_risk: 0.0,
            scored_entries: 0,
            last_access_ms: entry.timestamp_ms,
        });

        let counts = acc.counts.entry(entry.permission).or_default();
        match entry.status {
            DecisionStatus::Granted => counts.granted += 1,
            DecisionStatus::Denied => counts.denied += 1,
            DecisionStatus::Simulated => counts.simulated += 1,
        }

        if let Some(risk) = entry.risk_score {
            acc.total_risk += risk;
            acc.scored_entries += 1;
        }
        if entry.timestamp_ms > acc.last_access_ms {
            acc.last_access_ms = entry.timestamp_ms;
        }
    }

    let mut summaries: Vec<PrivacySummary> = by_app
        .into_iter()
        .map(|(app_id, acc)| PrivacySummary {
            app_id,
            app_name: acc.app_name,
            counts: acc.counts,
            risk_score: if acc.scored_entries > 0 {
                (acc.total_risk / acc.scored_entries as f64).round()
            } else {
                0.0
            },
            last_access_ms: acc.last_access_ms,
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    summaries
}

/// Device-wide privacy score in [0,100]; higher is better. Vacuously perfect
/// (100) with no history. Blends inverted mean app risk with the share of
/// accesses that were answered synthetically.
pub fn overall_score(summaries: &[PrivacySummary]) -> f64 {
    if summaries.is_empty() {
        return 100.0;
    }

    let mean_risk: f64 =
        summaries.iter().map(|s| s.risk_score).sum::<f64>() / summaries.len() as f64;

    let mut simulated = 0u64;
    let mut granted = 0u64;
    for summary in summaries {
        for counts in summary.counts.values() {
            simulated += counts.simulated;
            granted += counts.granted;
        }
    }
    let simulated_ratio = if simulated + granted > 0 {
        simulated as f64 / (simulated + granted) as f64
    } else {
        1.0
    };

    let inverted_risk = 100.0 - mean_risk.min(100.0);
    let score = inverted_risk * RISK_WEIGHT + simulated_ratio * 100.0 * SIMULATED_WEIGHT;
    score.round().clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shield_core::types::fresh_id;

    fn entry(
        app_id: &str,
        app_name: &str,
        permission: PermissionType,
        status: DecisionStatus,
        risk: Option<f64>,
        ts: i64,
    ) -> LogEntry {
        LogEntry {
            id: fresh_id(),
            timestamp_ms: ts,
            request_id: fresh_id(),
            app_id: app_id.into(),
            app_name: app_name.into(),
            permission,
            status,
            data: None,
            message: String::new(),
            risk_score: risk,
            risk_level: None,
        }
    }

    #[test]
    fn test_empty_history_is_vacuously_perfect() {
        assert_eq!(overall_score(&[]), 100.0);
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn test_counts_grouped_by_app_and_permission() {
        let entries = vec![
            entry("app1", "Social Connect", PermissionType::Contacts, DecisionStatus::Granted, Some(20.0), 100),
            entry("app1", "Social Connect", PermissionType::Contacts, DecisionStatus::Denied, Some(40.0), 200),
            entry("app1", "Social Connect", PermissionType::Location, DecisionStatus::Simulated, Some(60.0), 300),
            entry("app4", "Data Harvester", PermissionType::Messages, DecisionStatus::Simulated, Some(100.0), 150),
        ];
        let summaries = summarize(&entries);
        assert_eq!(summaries.len(), 2);

        // Sorted descending by average risk: Data Harvester (100) first.
        assert_eq!(summaries[0].app_id, "app4");
        assert_eq!(summaries[1].app_id, "app1");

        let app1 = &summaries[1];
        assert_eq!(app1.counts[&PermissionType::Contacts].granted, 1);
        assert_eq!(app1.counts[&PermissionType::Contacts].denied, 1);
        assert_eq!(app1.counts[&PermissionType::Location].simulated, 1);
        assert_eq!(app1.counts[&PermissionType::CallLogs].granted, 0);
        assert_eq!(app1.risk_score, 40.0); // (20+40+60)/3
        assert_eq!(app1.last_access_ms, 300);
    }

    #[test]
    fn test_risk_average_skips_unscored_entries() {
        let entries = vec![
            entry("app1", "Social Connect", PermissionType::Contacts, DecisionStatus::Granted, Some(50.0), 100),
            entry("app1", "Social Connect", PermissionType::Contacts, DecisionStatus::Granted, None, 200),
        ];
        let summaries = summarize(&entries);
        assert_eq!(summaries[0].risk_score, 50.0);
    }

    #[test]
    fn test_overall_score_blend() {
        // One app, mean risk 40, all accesses simulated → ratio 1.0:
        // (100-40)*0.7 + 100*0.3 = 72.
        let entries = vec![
            entry("app4", "Data Harvester", PermissionType::Contacts, DecisionStatus::Simulated, Some(40.0), 100),
        ];
        let summaries = summarize(&entries);
        assert_eq!(overall_score(&summaries), 72.0);
    }

    #[test]
    fn test_overall_score_all_real_grants() {
        // Mean risk 20, ratio 0 → (100-20)*0.7 = 56.
        let entries = vec![
            entry("nav1", "Maps Navigator", PermissionType::Location, DecisionStatus::Granted, Some(20.0), 100),
        ];
        let summaries = summarize(&entries);
        assert_eq!(overall_score(&summaries), 56.0);
    }

    #[test]
    fn test_overall_score_denials_only_defaults_ratio_high() {
        // No granted or simulated accesses: ratio defaults to 1.0 (nothing
        // real was exposed). Mean risk 100 → 0*0.7 + 100*0.3 = 30.
        let entries = vec![
            entry("app4", "Data Harvester", PermissionType::Messages, DecisionStatus::Denied, Some(100.0), 100),
        ];
        let summaries = summarize(&entries);
        assert_eq!(overall_score(&summaries), 30.0);
    }
}
