//! Property tests for derived views and aggregates over generated record lists

#![allow(clippy::unwrap_used)]

use dashboard_core::seed;
use dashboard_core::types::{
    AccessLog, AccessType, Client, ClientStatus, LogLevel, LogStatus, Tagged,
};
use dashboard_protocol::{
    AccessLogFilter, AccessLogStats, Aggregate, ClientFilter, ClientStats, RecordFilter, Selector,
    compute_aggregate, derive_view, rate,
};
use proptest::prelude::*;

fn selector<T>(values: &'static [T]) -> impl Strategy<Value = Selector<T>>
where
    T: Copy + std::fmt::Debug + 'static,
{
    prop_oneof![
        Just(Selector::All),
        proptest::sample::select(values).prop_map(Selector::Only),
    ]
}

fn access_logs() -> impl Strategy<Value = Vec<AccessLog>> {
    let template = seed::access_logs();
    proptest::collection::vec(
        (
            0..template.len(),
            proptest::sample::select(LogStatus::ALL),
            proptest::sample::select(AccessType::ALL),
        ),
        0..40,
    )
    .prop_map(move |picks| {
        picks
            .into_iter()
            .enumerate()
            .map(|(n, (index, status, access_type))| {
                let mut log = template.get(index).cloned().unwrap();
                log.id = format!("gen-{n}");
                log.status = status;
                log.access_type = access_type;
                log
            })
            .collect()
    })
}

fn access_log_filter() -> impl Strategy<Value = AccessLogFilter> {
    (
        prop_oneof![Just(String::new()), "[a-z/.0-9]{1,4}"],
        selector(LogStatus::ALL),
        selector(LogLevel::ALL),
        selector(AccessType::ALL),
    )
        .prop_map(|(query, status, level, access_type)| AccessLogFilter {
            query,
            status,
            level,
            access_type,
        })
}

fn clients() -> impl Strategy<Value = Vec<Client>> {
    let template = seed::clients();
    proptest::collection::vec(
        (
            0..template.len(),
            proptest::sample::select(ClientStatus::ALL),
            0u8..=100,
            0.0f64..500_000.0,
        ),
        0..30,
    )
    .prop_map(move |picks| {
        picks
            .into_iter()
            .enumerate()
            .map(|(n, (index, status, health, revenue))| {
                let mut client = template.get(index).cloned().unwrap();
                client.id = format!("gen-{n}");
                client.status = status;
                client.health_score = health;
                client.revenue = revenue;
                client
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn unconstrained_filter_is_identity(logs in access_logs()) {
        let view = derive_view(&logs, &AccessLogFilter::default());
        prop_assert_eq!(view.len(), logs.len());
        for (kept, original) in view.iter().zip(&logs) {
            prop_assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn filtered_view_is_ordered_subset(logs in access_logs(), filter in access_log_filter()) {
        let view = derive_view(&logs, &filter);

        let mut cursor = 0;
        for kept in &view {
            prop_assert!(filter.matches(kept));
            let position = logs
                .get(cursor..)
                .unwrap()
                .iter()
                .position(|l| std::ptr::eq(l, *kept));
            prop_assert!(position.is_some());
            cursor += position.unwrap() + 1;
        }

        let expected = logs.iter().filter(|l| filter.matches(l)).count();
        prop_assert_eq!(view.len(), expected);
    }

    #[test]
    fn access_log_counts_never_exceed_total(logs in access_logs()) {
        let stats = AccessLogStats::aggregate(&logs);
        prop_assert!(stats.success + stats.failed + stats.blocked + stats.warning <= stats.total);
        prop_assert!(stats.success_rate.is_finite() && stats.error_rate.is_finite());
        prop_assert_eq!(stats.by_status.values().sum::<usize>(), stats.total);
    }

    #[test]
    fn client_average_health_ignores_non_customers(list in clients()) {
        let stats = ClientStats::aggregate(&list);
        let customers: Vec<&Client> = list
            .iter()
            .filter(|c| c.status == ClientStatus::Customer)
            .collect();

        prop_assert_eq!(stats.total_customers, customers.len());
        if customers.is_empty() {
            prop_assert!(stats.avg_health_score.abs() < f64::EPSILON);
        } else {
            let min = customers.iter().map(|c| c.health_score).min().unwrap();
            let max = customers.iter().map(|c| c.health_score).max().unwrap();
            prop_assert!(stats.avg_health_score >= f64::from(min) - 1e-9);
            prop_assert!(stats.avg_health_score <= f64::from(max) + 1e-9);
        }
    }

    #[test]
    fn client_status_filter_is_subset(list in clients(), status in selector(ClientStatus::ALL)) {
        let filter = ClientFilter { query: String::new(), status };
        let view = derive_view(&list, &filter);
        prop_assert!(view.len() <= list.len());
        prop_assert!(view.iter().all(|c| status.admits(&c.status)));
    }

    #[test]
    fn rate_of_empty_population_is_zero(count in 0usize..1_000) {
        prop_assert!(rate(count, 0).abs() < f64::EPSILON);
    }
}

#[test]
fn tagged_records_filter_like_plain_ones() {
    let tagged: Vec<Tagged<AccessLog>> = seed::access_logs()
        .into_iter()
        .map(Tagged::seed)
        .collect();
    let filter = AccessLogFilter {
        query: "login".to_string(),
        status: Selector::Only(LogStatus::Failed),
        ..AccessLogFilter::default()
    };

    let view = derive_view(&tagged, &filter);
    assert_eq!(view.len(), 1);
    assert_eq!(view.first().unwrap().record.id, "2");

    let stats: AccessLogStats = compute_aggregate(&view);
    assert_eq!(stats.failed, 1);
}
