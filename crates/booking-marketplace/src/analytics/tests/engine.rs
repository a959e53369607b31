use super::common::*;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};

use crate::analytics::engine::{AggregationEngine, LEADERBOARD_CANDIDATES};
use crate::analytics::scoring::hybrid_score;
use crate::analytics::service::{Actor, AdminDashboardService, DashboardError};
use crate::analytics::AdminAdvancedResponse;
use crate::marketplace::domain::{
    BookingStatus, Category, CategoryId, Service, ServiceId, UserId, UserRole,
};
use crate::marketplace::memory::MarketplaceDataset;
use crate::marketplace::store::StoreError;

fn admin() -> Actor {
    Actor::admin(UserId(1))
}

fn dashboard(dataset: MarketplaceDataset) -> AdminAdvancedResponse {
    service_with(dataset)
        .advanced(&admin(), now())
        .expect("dashboard builds")
}

#[test]
fn empty_marketplace_reports_zeroed_dashboard() {
    let report = dashboard(MarketplaceDataset::default());

    assert_eq!(report.total_users, 0);
    assert_eq!(report.total_providers, 0);
    assert_eq!(report.total_services, 0);
    assert_eq!(report.total_bookings, 0);
    assert_eq!(report.provider_growth_last_30_days.len(), 30);
    assert!(report
        .provider_growth_last_30_days
        .iter()
        .all(|point| point.new_providers == 0));
    assert_eq!(report.monthly_revenue_last_12_months.len(), 12);
    assert!(report
        .monthly_revenue_last_12_months
        .iter()
        .all(|point| point.total_earnings == 0.0));
    assert!(report.category_distribution.is_empty());
    assert!(report.provider_leaderboard.is_empty());
    assert!(report.bookings_heatmap.is_empty());
    assert_eq!(report.cancellation_rate_percent, 0.0);
}

#[test]
fn provider_growth_is_dense_and_counts_calendar_days() {
    let dataset = MarketplaceDataset {
        users: vec![
            user(1, UserRole::Provider, days_ago(0)),
            user(2, UserRole::Provider, days_ago(0) - Duration::hours(11)),
            user(3, UserRole::Provider, days_ago(29)),
            user(4, UserRole::Provider, days_ago(30)),
            user(5, UserRole::Customer, days_ago(1)),
        ],
        ..MarketplaceDataset::default()
    };

    let report = dashboard(dataset);
    let growth = &report.provider_growth_last_30_days;

    assert_eq!(growth.len(), 30);
    assert!(growth
        .windows(2)
        .all(|pair| pair[0].date.succ_opt() == Some(pair[1].date)));
    assert_eq!(
        growth[0].date,
        NaiveDate::from_ymd_opt(2024, 2, 15).expect("valid date")
    );
    assert_eq!(growth[0].new_providers, 1);
    assert_eq!(growth[29].new_providers, 2);
    assert_eq!(
        growth.iter().map(|point| point.new_providers).sum::<u64>(),
        3
    );
    assert_eq!(report.total_users, 5);
    assert_eq!(report.total_providers, 4);
}

#[test]
fn monthly_revenue_uses_exact_calendar_months() {
    let ts = |y, m, d, h, min| {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .expect("valid timestamp")
    };
    let dataset = MarketplaceDataset {
        bookings: vec![
            booking(1, BookingStatus::Completed, 100.0, ts(2024, 3, 1, 0, 0), 7, 10),
            booking(2, BookingStatus::Completed, 50.0, ts(2024, 2, 29, 23, 59), 7, 10),
            booking(3, BookingStatus::Completed, 25.0, ts(2023, 4, 1, 0, 0), 7, 10),
            booking(4, BookingStatus::Completed, 999.0, ts(2023, 3, 31, 23, 0), 7, 10),
            booking(5, BookingStatus::Canceled, 70.0, ts(2024, 3, 2, 9, 0), 7, 10),
        ],
        ..MarketplaceDataset::default()
    };

    let report = dashboard(dataset);
    let months = &report.monthly_revenue_last_12_months;

    assert_eq!(months.len(), 12);
    assert_eq!((months[0].year, months[0].month), (2023, 4));
    assert_eq!((months[11].year, months[11].month), (2024, 3));
    assert_eq!(months[0].total_earnings, 25.0);
    assert_eq!(months[10].total_earnings, 50.0);
    assert_eq!(months[11].total_earnings, 100.0);
    assert_eq!(
        months.iter().map(|point| point.total_earnings).sum::<f64>(),
        175.0
    );
}

#[test]
fn category_distribution_keeps_orphaned_categories_without_name() {
    let (categories, services) = catalog();
    let dataset = MarketplaceDataset {
        categories,
        services,
        bookings: vec![
            booking(1, BookingStatus::Completed, 80.0, days_ago(3), 7, 10),
            booking(2, BookingStatus::Completed, 20.0, days_ago(4), 7, 10),
            booking(3, BookingStatus::Completed, 45.0, days_ago(5), 7, 30),
            booking(4, BookingStatus::Pending, 500.0, days_ago(5), 7, 20),
        ],
        ..MarketplaceDataset::default()
    };

    let report = dashboard(dataset);
    let distribution = &report.category_distribution;

    assert_eq!(distribution.len(), 2);
    assert_eq!(distribution[0].category_id, CategoryId(1));
    assert_eq!(distribution[0].category_name.as_deref(), Some("Cleaning"));
    assert_eq!(distribution[0].bookings_count, 2);
    assert_eq!(distribution[0].earnings, 100.0);
    assert_eq!(distribution[1].category_id, CategoryId(99));
    assert!(distribution[1].category_name.is_none());
    assert_eq!(distribution[1].earnings, 45.0);
}

#[test]
fn category_distribution_is_capped_and_sorted() {
    let categories: Vec<Category> = (1..=25)
        .map(|id| Category {
            id: CategoryId(id),
            name: format!("Category {id}"),
        })
        .collect();
    let services: Vec<Service> = (1..=25)
        .map(|id| Service {
            id: ServiceId(id),
            name: format!("Service {id}"),
            category_id: CategoryId(id),
        })
        .collect();
    let mut bookings = Vec::new();
    let mut next_id = 1;
    for service in 1..=25_i64 {
        for _ in 0..(service % 7 + 1) {
            bookings.push(booking(
                next_id,
                BookingStatus::Completed,
                10.0,
                days_ago(2),
                7,
                service,
            ));
            next_id += 1;
        }
    }

    let report = dashboard(MarketplaceDataset {
        categories,
        services,
        bookings,
        ..MarketplaceDataset::default()
    });

    let distribution = &report.category_distribution;
    assert_eq!(distribution.len(), 20);
    assert!(distribution
        .windows(2)
        .all(|pair| pair[0].bookings_count >= pair[1].bookings_count));
    assert_eq!(distribution[0].bookings_count, 7);
}

#[test]
fn leaderboard_scores_recompute_from_reported_fields() {
    let dataset = MarketplaceDataset {
        users: vec![
            rated_provider(2, 4.8, 120),
            rated_provider(3, 5.0, 1),
            rated_provider(4, 3.9, 40),
            user(5, UserRole::Provider, days_ago(90)),
        ],
        bookings: vec![
            booking(1, BookingStatus::Completed, 300.0, days_ago(2), 2, 10),
            booking(2, BookingStatus::Completed, 900.0, days_ago(3), 3, 10),
            booking(3, BookingStatus::Completed, 150.0, days_ago(4), 4, 10),
            booking(4, BookingStatus::Completed, 150.0, days_ago(4), 4, 10),
            booking(5, BookingStatus::Completed, 1200.0, days_ago(6), 5, 10),
            booking(6, BookingStatus::Canceled, 5000.0, days_ago(6), 3, 10),
        ],
        ..MarketplaceDataset::default()
    };

    let report = dashboard(dataset);
    let board = &report.provider_leaderboard;

    assert_eq!(board.len(), 4);
    assert!(board.windows(2).all(|pair| pair[0].score >= pair[1].score));
    assert_eq!(board[0].provider_id, UserId(2));

    let max_earnings = board
        .iter()
        .map(|item| item.total_earnings)
        .fold(0.0, f64::max);
    assert_eq!(max_earnings, 1200.0);
    for item in board {
        let expected = hybrid_score(
            item.avg_rating,
            item.rating_count,
            item.total_earnings,
            max_earnings,
        );
        assert_eq!(item.score, expected, "provider {}", item.provider_id);
    }

    let unrated = board
        .iter()
        .find(|item| item.provider_id == UserId(5))
        .expect("unrated provider listed");
    assert_eq!(unrated.avg_rating, 0.0);
    assert_eq!(unrated.rating_count, 0);
    assert_eq!(unrated.score, 0.4);

    let doubled = board
        .iter()
        .find(|item| item.provider_id == UserId(4))
        .expect("provider 4 listed");
    assert_eq!(doubled.completed_bookings, 2);
    assert_eq!(doubled.total_earnings, 300.0);
}

#[test]
fn leaderboard_only_ranks_top_earning_candidates() {
    let mut users = Vec::new();
    let mut bookings = Vec::new();
    for id in 1..=55_i64 {
        users.push(rated_provider(id, 3.0, 2));
        bookings.push(booking(
            id,
            BookingStatus::Completed,
            id as f64 * 10.0,
            days_ago(1),
            id,
            10,
        ));
    }
    // Best reputation on the marketplace, but the lowest earner.
    users[0] = rated_provider(1, 5.0, 1000);

    let dataset = MarketplaceDataset {
        users,
        bookings,
        ..MarketplaceDataset::default()
    };

    let engine = AggregationEngine::new(store_with(dataset.clone()));
    let computation = engine.compute(now()).expect("computes");
    assert_eq!(
        computation.leaderboard_candidates.len(),
        LEADERBOARD_CANDIDATES
    );

    let report = dashboard(dataset);
    assert_eq!(report.provider_leaderboard.len(), 20);
    assert!(report
        .provider_leaderboard
        .iter()
        .all(|item| item.provider_id != UserId(1)));
}

#[test]
fn leaderboard_degrades_when_provider_record_is_missing() {
    let dataset = MarketplaceDataset {
        bookings: vec![booking(1, BookingStatus::Completed, 40.0, days_ago(1), 404, 10)],
        ..MarketplaceDataset::default()
    };

    let report = dashboard(dataset);
    let entry = &report.provider_leaderboard[0];
    assert_eq!(entry.provider_id, UserId(404));
    assert!(entry.provider_name.is_none());
    assert_eq!(entry.score, 0.4);
}

#[test]
fn heatmap_is_sparse_and_bucketed_by_iso_weekday_and_hour() {
    let dataset = MarketplaceDataset {
        bookings: vec![
            booking(1, BookingStatus::Completed, 10.0, days_ago(0), 7, 10),
            booking(2, BookingStatus::Pending, 10.0, days_ago(7), 7, 10),
            booking(3, BookingStatus::Canceled, 10.0, days_ago(1), 7, 10),
            booking(4, BookingStatus::Completed, 10.0, days_ago(29), 7, 10),
            booking(5, BookingStatus::Completed, 10.0, days_ago(30), 7, 10),
            booking(6, BookingStatus::Completed, 10.0, now() + Duration::hours(3), 7, 10),
        ],
        ..MarketplaceDataset::default()
    };

    let report = dashboard(dataset);
    let heatmap = &report.bookings_heatmap;

    let mut seen = HashSet::new();
    for point in heatmap {
        assert!((1..=7).contains(&point.weekday));
        assert!(point.hour < 24);
        assert!(point.bookings > 0);
        assert!(seen.insert((point.weekday, point.hour)));
    }

    let friday_noon = heatmap
        .iter()
        .find(|point| point.weekday == 5 && point.hour == 12)
        .expect("friday bucket present");
    assert_eq!(friday_noon.bookings, 2);
    let thursday_noon = heatmap
        .iter()
        .find(|point| point.weekday == 4 && point.hour == 12)
        .expect("thursday bucket present");
    assert_eq!(thursday_noon.bookings, 2);
    assert_eq!(heatmap.iter().map(|point| point.bookings).sum::<u64>(), 4);
}

#[test]
fn cancellation_rate_ignores_non_terminal_statuses() {
    let dataset = MarketplaceDataset {
        bookings: vec![
            booking(1, BookingStatus::Completed, 10.0, days_ago(1), 7, 10),
            booking(2, BookingStatus::Canceled, 10.0, days_ago(1), 7, 10),
            booking(3, BookingStatus::Canceled, 10.0, days_ago(1), 7, 10),
            booking(4, BookingStatus::Pending, 10.0, days_ago(1), 7, 10),
            booking(5, BookingStatus::Other("no_show".to_string()), 10.0, days_ago(1), 7, 10),
        ],
        ..MarketplaceDataset::default()
    };

    let report = dashboard(dataset);
    assert_eq!(report.cancellation_rate_percent, 66.67);
    assert!((0.0..=100.0).contains(&report.cancellation_rate_percent));
    assert_eq!(report.total_bookings, 5);
}

#[test]
fn non_admin_callers_are_refused() {
    let service = service_with(MarketplaceDataset::default());
    let customer = Actor {
        user_id: Some(UserId(9)),
        role: UserRole::Customer,
    };

    let err = service
        .advanced(&customer, now())
        .expect_err("customers are refused");
    assert!(matches!(
        err,
        DashboardError::Forbidden {
            role: UserRole::Customer
        }
    ));
    assert!(service.admin_check(&customer).is_err());
    assert!(service.admin_check(&admin()).expect("admin passes").ok);
}

#[test]
fn store_failures_propagate_to_caller() {
    let service = AdminDashboardService::new(Arc::new(UnavailableStore));
    let err = service
        .advanced(&admin(), now())
        .expect_err("store is down");
    assert!(matches!(
        err,
        DashboardError::Store(StoreError::Unavailable(_))
    ));
}
