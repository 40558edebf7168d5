use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::filter::FilterState;
use crate::models::{Application, ApplicationStatus, EventType, TimelineEvent};

/// Applications matching every active predicate. Status, location, and search
/// term are independent AND conditions; a non-empty search never bypasses the
/// dropdown filters.
pub fn filtered<'a>(apps: &'a [Application], filter: &FilterState) -> Vec<&'a Application> {
    apps.iter()
        .filter(|app| {
            if let Some(status) = filter.status_filter {
                if app.status != status {
                    return false;
                }
            }

            if let Some(location) = &filter.location_filter {
                let matches = app
                    .location
                    .as_deref()
                    .is_some_and(|loc| contains_ignore_case(loc, location));
                if !matches {
                    return false;
                }
            }

            if !filter.search_term.is_empty() {
                let term = &filter.search_term;
                let matches = contains_ignore_case(&app.company, term)
                    || contains_ignore_case(&app.position, term)
                    || app
                        .location
                        .as_deref()
                        .is_some_and(|loc| contains_ignore_case(loc, term));
                if !matches {
                    return false;
                }
            }

            true
        })
        .collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Count per status over the full collection. Statuses with no applications
/// are omitted, matching the summary chart.
pub fn status_distribution(apps: &[Application]) -> BTreeMap<ApplicationStatus, usize> {
    let mut counts = BTreeMap::new();
    for app in apps {
        *counts.entry(app.status).or_insert(0) += 1;
    }
    counts
}

/// Applications still in the open pipeline: Applied plus the three interview
/// stages. Offers and terminal statuses are out.
pub fn active(apps: &[Application]) -> Vec<&Application> {
    apps.iter()
        .filter(|app| app.status == ApplicationStatus::Applied || app.status.is_interview_stage())
        .collect()
}

/// Pipeline conversion ratios, as fractions in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuccessRateMetrics {
    pub application_to_interview: f64,
    pub interview_to_offer: f64,
    pub overall_offer: f64,
}

/// Counts-over-counts ratios from current statuses. Per-application history is
/// not recorded, so "reached interview" means currently in an interview stage
/// or past it (offer received or decided). Empty denominators yield 0.
pub fn success_rate_metrics(apps: &[Application]) -> SuccessRateMetrics {
    let total = apps.len();
    let interviewing = apps.iter().filter(|a| a.status.is_interview_stage()).count();
    let offered = apps
        .iter()
        .filter(|a| {
            matches!(
                a.status,
                ApplicationStatus::Offer | ApplicationStatus::Accepted | ApplicationStatus::Declined
            )
        })
        .count();
    let reached_interview = interviewing + offered;

    SuccessRateMetrics {
        application_to_interview: ratio(reached_interview, total),
        interview_to_offer: ratio(offered, reached_interview),
        overall_offer: ratio(offered, total),
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// What a calendar entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarKind {
    /// An application was submitted on this date.
    Application,
    /// A scheduled interview stage.
    Interview,
    /// An offer or a final decision.
    Outcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub date: NaiveDate,
    pub title: String,
    pub kind: CalendarKind,
}

/// Calendar entries for one month, bucketed by exact date: one Application
/// entry per record applied that month plus one entry per timeline event dated
/// in the month. Dates that fail to parse are skipped.
pub fn calendar_month(
    apps: &[Application],
    events: &[TimelineEvent],
    year: i32,
    month: u32,
) -> BTreeMap<NaiveDate, Vec<CalendarEntry>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<CalendarEntry>> = BTreeMap::new();

    let mut push = |date: NaiveDate, title: String, kind: CalendarKind| {
        if date.year() == year && date.month() == month {
            buckets.entry(date).or_default().push(CalendarEntry { date, title, kind });
        }
    };

    for app in apps {
        if let Some(date) = parse_date(&app.date_applied) {
            push(date, format!("Applied - {}", app.company), CalendarKind::Application);
        }
    }

    for event in events {
        let Some(date) = parse_date(&event.date) else {
            continue;
        };
        let company = apps
            .iter()
            .find(|app| app.id == event.application_id)
            .map(|app| app.company.as_str())
            .unwrap_or("Unknown");
        let kind = if event.event_type.is_interview() {
            CalendarKind::Interview
        } else if event.event_type == EventType::Applied {
            CalendarKind::Application
        } else {
            CalendarKind::Outcome
        };
        push(date, format!("{} - {}", event.event_type, company), kind);
    }

    buckets
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_applications;

    fn event(id: &str, app_id: &str, date: &str, event_type: EventType) -> TimelineEvent {
        TimelineEvent {
            id: id.to_string(),
            application_id: app_id.to_string(),
            date: date.to_string(),
            event_type,
            notes: None,
        }
    }

    #[test]
    fn test_no_filters_returns_everything() {
        let apps = default_applications();
        assert_eq!(filtered(&apps, &FilterState::default()).len(), apps.len());
    }

    #[test]
    fn test_status_filter_alone_returns_exact_subset() {
        let apps = default_applications();
        let mut filter = FilterState::default();
        filter.set_status_filter(Some(ApplicationStatus::Offer));

        let result = filtered(&apps, &filter);
        assert_eq!(result.len(), 1);
        assert!(result.iter().all(|a| a.status == ApplicationStatus::Offer));
        assert_eq!(result[0].company, "Stark Industries");
    }

    #[test]
    fn test_location_filter_is_case_insensitive_contains() {
        let apps = default_applications();
        let mut filter = FilterState::default();
        filter.set_location_filter(Some("remote".to_string()));

        let result = filtered(&apps, &filter);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|a| a.location.as_deref() == Some("Remote")));
    }

    #[test]
    fn test_search_matches_company_position_or_location() {
        let apps = default_applications();
        let mut filter = FilterState::default();
        filter.set_search_term("react");
        // Matches "React Developer" and "React Native Developer" positions.
        assert_eq!(filtered(&apps, &filter).len(), 2);

        filter.set_search_term("boston");
        let by_location = filtered(&apps, &filter);
        assert_eq!(by_location.len(), 1);
        assert_eq!(by_location[0].company, "Massive Dynamic");
    }

    #[test]
    fn test_search_and_status_filter_combine_as_and() {
        // Both "React Developer" (Applied) and "React Native Developer"
        // (Offer) match the search; the status filter must still apply.
        let apps = default_applications();
        let mut filter = FilterState::default();
        filter.set_search_term("react");
        filter.set_status_filter(Some(ApplicationStatus::Applied));

        let result = filtered(&apps, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].company, "Globex Corp");
    }

    #[test]
    fn test_seed_distribution_counts() {
        let apps = default_applications();
        let dist = status_distribution(&apps);
        assert_eq!(dist.get(&ApplicationStatus::Applied), Some(&2));
        assert_eq!(dist.get(&ApplicationStatus::PhoneScreen), Some(&1));
        assert_eq!(dist.get(&ApplicationStatus::TechnicalInterview), Some(&1));
        assert_eq!(dist.get(&ApplicationStatus::Rejected), Some(&1));
        assert_eq!(dist.get(&ApplicationStatus::Offer), Some(&1));
        assert_eq!(dist.get(&ApplicationStatus::Accepted), None);
        assert_eq!(dist.values().sum::<usize>(), 6);
    }

    #[test]
    fn test_active_excludes_terminal_and_offer_stage() {
        let apps = default_applications();
        let active_apps = active(&apps);
        assert_eq!(active_apps.len(), 4);
        assert!(active_apps.iter().all(|a| {
            a.status == ApplicationStatus::Applied || a.status.is_interview_stage()
        }));
    }

    #[test]
    fn test_success_metrics_on_empty_collection_are_zero() {
        let metrics = success_rate_metrics(&[]);
        assert_eq!(metrics.application_to_interview, 0.0);
        assert_eq!(metrics.interview_to_offer, 0.0);
        assert_eq!(metrics.overall_offer, 0.0);
    }

    #[test]
    fn test_success_metrics_on_seed() {
        // 6 total; 2 interviewing (Phone Screen, Technical), 1 offered.
        let metrics = success_rate_metrics(&default_applications());
        assert!((metrics.application_to_interview - 0.5).abs() < 1e-9);
        assert!((metrics.interview_to_offer - 1.0 / 3.0).abs() < 1e-9);
        assert!((metrics.overall_offer - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_calendar_buckets_by_exact_date_within_month() {
        let apps = default_applications();
        let events = vec![
            event("e1", "3", "2025-03-12", EventType::PhoneScreen),
            event("e2", "4", "2025-03-12", EventType::TechnicalInterview),
            event("e3", "6", "2025-02-27", EventType::Offer),
            event("e4", "6", "not-a-date", EventType::Accepted),
        ];

        let march = calendar_month(&apps, &events, 2025, 3);
        // Seed records 1-4 were applied in March, plus two interview events
        // sharing one date.
        let total: usize = march.values().map(|v| v.len()).sum();
        assert_eq!(total, 6);

        let day = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        let entries = &march[&day];
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.kind == CalendarKind::Interview));
        assert!(entries.iter().any(|e| e.title == "Phone Screen - Initech"));

        let february = calendar_month(&apps, &events, 2025, 2);
        let feb_day = NaiveDate::from_ymd_opt(2025, 2, 27).unwrap();
        assert!(february[&feb_day]
            .iter()
            .any(|e| e.kind == CalendarKind::Outcome && e.title == "Offer - Stark Industries"));
    }

    #[test]
    fn test_calendar_skips_unparseable_dates() {
        let mut apps = default_applications();
        apps[0].date_applied = "March 10".to_string();
        let march = calendar_month(&apps, &[], 2025, 3);
        let total: usize = march.values().map(|v| v.len()).sum();
        assert_eq!(total, 3);
    }
}
