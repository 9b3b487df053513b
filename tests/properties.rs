use proptest::prelude::*;
use sprint_report::analyze::analyzer::forecast;
use sprint_report::analyze::{aggregate, Heuristics};
use sprint_report::model::{Commit, Priority, StatusBucket, WorkItem, WorkType};

fn status() -> impl Strategy<Value = StatusBucket> {
    prop_oneof![
        Just(StatusBucket::Todo),
        Just(StatusBucket::InProgress),
        Just(StatusBucket::Done),
        Just(StatusBucket::Other),
    ]
}

fn priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Critical),
        Just(Priority::High),
        Just(Priority::Medium),
        Just(Priority::Low),
        Just(Priority::None),
    ]
}

fn work_item() -> impl Strategy<Value = WorkItem> {
    (
        0usize..6,
        status(),
        priority(),
        proptest::option::of(prop_oneof![Just("Ann"), Just("Bob"), Just("Cy")]),
        0u32..21,
        any::<bool>(),
    )
        .prop_map(|(type_index, status, priority, assignee, points, blocker)| {
            let mut item = WorkItem::new("X", "t", WorkType::ALL[type_index], status, priority)
                .with_points(points as f64);
            if let Some(assignee) = assignee {
                item = item.with_assignee(assignee);
            }
            if blocker {
                item = item.as_blocker();
            }
            item
        })
}

fn work_items() -> impl Strategy<Value = Vec<WorkItem>> {
    prop::collection::vec(work_item(), 0..40).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(index, mut item)| {
                item.id = format!("X-{index}");
                item
            })
            .collect()
    })
}

fn commits() -> impl Strategy<Value = Vec<Commit>> {
    prop::collection::vec(prop_oneof![Just("Ann"), Just("Bob"), Just("Dee"), Just("")], 0..30)
        .prop_map(|authors| {
            authors
                .into_iter()
                .enumerate()
                .map(|(index, author)| Commit::new(format!("sha{index}"), "change", author))
                .collect()
        })
}

proptest! {
    #[test]
    fn completion_rate_is_a_percentage(items in work_items(), commits in commits()) {
        let metrics = aggregate(&items, &commits, &Heuristics::default());
        prop_assert!(metrics.completion_rate <= 100);
        prop_assert!(metrics.velocity.percentage <= 100);
        for resolution in &metrics.priority_resolution {
            prop_assert!(resolution.rate <= 100);
            prop_assert!(resolution.resolved <= resolution.total);
        }
    }

    #[test]
    fn zero_denominators_yield_zero(commits in commits()) {
        let metrics = aggregate(&[], &commits, &Heuristics::default());
        prop_assert_eq!(metrics.completion_rate, 0);
        prop_assert_eq!(metrics.quality.bug_ratio, 0);
        prop_assert_eq!(metrics.velocity.percentage, 0);
        prop_assert!(metrics.work_types.iter().all(|share| share.percentage == 0));
    }

    #[test]
    fn aggregation_is_deterministic(items in work_items(), commits in commits()) {
        let heuristics = Heuristics::default();
        prop_assert_eq!(
            aggregate(&items, &commits, &heuristics),
            aggregate(&items, &commits, &heuristics)
        );
    }

    #[test]
    fn completed_points_move_score_by_a_fifth(before in 0u32..40, after in 0u32..40) {
        let heuristics = Heuristics::default();
        let commits = vec![Commit::new("a", "change", "Ann")];
        let score = |points: u32| {
            let items = vec![WorkItem::new("X-1", "t", WorkType::Story, StatusBucket::Done, Priority::Low)
                .with_assignee("Ann")
                .with_points(points as f64)];
            aggregate(&items, &commits, &heuristics).contributors[0].score
        };

        let delta = score(after) - score(before);
        let expected = (after as f64 - before as f64) / heuristics.story_points_weight_divisor;
        prop_assert!((delta - expected).abs() < 1e-9);
    }

    #[test]
    fn forecast_rounds_grown_velocity(actual in 0.0f64..500.0) {
        let heuristics = Heuristics::default();
        prop_assert_eq!(forecast(actual, &heuristics), (actual * 1.1).round() as u64);
    }

    #[test]
    fn contributors_are_sorted_and_capped(items in work_items(), commits in commits()) {
        let heuristics = Heuristics::default();
        let metrics = aggregate(&items, &commits, &heuristics);
        prop_assert!(metrics.contributors.len() <= heuristics.top_contributors);
        prop_assert!(metrics
            .contributors
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score));
    }
}
