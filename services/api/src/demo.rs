use booking_marketplace::analytics::{
    parse_reference_time, Actor, AdminAdvancedResponse, AdminDashboardService,
};
use booking_marketplace::error::AppError;
use booking_marketplace::marketplace::{
    Booking, BookingId, BookingStatus, Category, CategoryId, DatasetImporter,
    InMemoryMarketplaceStore, MarketplaceDataset, Service, ServiceId, User, UserId, UserRole,
};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_ADMIN: UserId = UserId(1);

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference time for every window (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_reference_time)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print the dashboard as JSON instead of text.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DashboardReportArgs {
    /// Directory holding users.csv, categories.csv, services.csv and bookings.csv
    #[arg(long)]
    pub(crate) data_dir: PathBuf,
    /// Reference time for every window (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_reference_time)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print the dashboard as JSON instead of text.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_dashboard_report(args: DashboardReportArgs) -> Result<(), AppError> {
    let DashboardReportArgs {
        data_dir,
        now,
        json,
    } = args;

    let now = now.unwrap_or_else(Utc::now);
    let dataset = DatasetImporter::from_dir(&data_dir)?;
    let report = build_dashboard(dataset, now)?;

    println!("Dataset: {}", data_dir.display());
    print_dashboard(&report, now, json);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { now, json } = args;
    let now = now.unwrap_or_else(Utc::now);

    let dataset = synthetic_marketplace(now);
    println!(
        "Synthetic marketplace: {} users, {} services, {} bookings",
        dataset.users.len(),
        dataset.services.len(),
        dataset.bookings.len()
    );
    let report = build_dashboard(dataset, now)?;
    print_dashboard(&report, now, json);
    Ok(())
}

fn build_dashboard(
    dataset: MarketplaceDataset,
    now: DateTime<Utc>,
) -> Result<AdminAdvancedResponse, AppError> {
    let store = Arc::new(InMemoryMarketplaceStore::new(dataset));
    let service = AdminDashboardService::new(store);
    Ok(service.advanced(&Actor::admin(DEMO_ADMIN), now)?)
}

fn print_dashboard(report: &AdminAdvancedResponse, now: DateTime<Utc>, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("Dashboard payload unavailable: {err}"),
        }
    } else {
        render_dashboard(report, now);
    }
}

pub(crate) fn render_dashboard(report: &AdminAdvancedResponse, now: DateTime<Utc>) {
    println!("Advanced admin dashboard (as of {})", now.to_rfc3339());
    println!(
        "Users {} | Providers {} | Services {} | Bookings {}",
        report.total_users, report.total_providers, report.total_services, report.total_bookings
    );
    println!(
        "Cancellation rate: {:.2}%",
        report.cancellation_rate_percent
    );

    let new_providers: u64 = report
        .provider_growth_last_30_days
        .iter()
        .map(|point| point.new_providers)
        .sum();
    println!("\nProvider growth (last 30 days): {new_providers} new");
    for point in report
        .provider_growth_last_30_days
        .iter()
        .filter(|point| point.new_providers > 0)
    {
        println!("- {}: +{}", point.date, point.new_providers);
    }

    println!("\nMonthly revenue (last 12 months)");
    for point in &report.monthly_revenue_last_12_months {
        println!(
            "- {}-{:02}: {:.2}",
            point.year, point.month, point.total_earnings
        );
    }

    if report.category_distribution.is_empty() {
        println!("\nCategory distribution: none");
    } else {
        println!("\nCategory distribution");
        for item in &report.category_distribution {
            println!(
                "- {}: {} bookings, {:.2} earned",
                item.category_name.as_deref().unwrap_or("(unknown category)"),
                item.bookings_count,
                item.earnings
            );
        }
    }

    if report.provider_leaderboard.is_empty() {
        println!("\nProvider leaderboard: none");
    } else {
        println!("\nProvider leaderboard");
        for (rank, item) in report.provider_leaderboard.iter().enumerate() {
            println!(
                "{:>2}. {} | score {:.3} | rating {:.1} ({}) | {:.2} earned over {} bookings",
                rank + 1,
                item.provider_name
                    .clone()
                    .unwrap_or_else(|| format!("provider #{}", item.provider_id)),
                item.score,
                item.avg_rating,
                item.rating_count,
                item.total_earnings,
                item.completed_bookings
            );
        }
    }

    if let Some(peak) = report
        .bookings_heatmap
        .iter()
        .max_by_key(|point| point.bookings)
    {
        println!(
            "\nBusiest slot (last 30 days): {} {:02}:00 with {} bookings across {} active slots",
            weekday_label(peak.weekday),
            peak.hour,
            peak.bookings,
            report.bookings_heatmap.len()
        );
    } else {
        println!("\nBooking heatmap: no bookings in the last 30 days");
    }
}

fn weekday_label(weekday: u32) -> &'static str {
    match weekday {
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        _ => "Sun",
    }
}

/// Deterministic marketplace spread over the year before `now`.
pub(crate) fn synthetic_marketplace(now: DateTime<Utc>) -> MarketplaceDataset {
    let category_names = ["Cleaning", "Plumbing", "Electrical", "Moving", "Tutoring"];
    let categories: Vec<Category> = category_names
        .iter()
        .enumerate()
        .map(|(idx, name)| Category {
            id: CategoryId(idx as i64 + 1),
            name: (*name).to_string(),
        })
        .collect();

    let services: Vec<Service> = (0..10_i64)
        .map(|idx| Service {
            id: ServiceId(100 + idx),
            name: format!("{} package {}", category_names[(idx / 2) as usize], idx % 2 + 1),
            category_id: CategoryId(idx / 2 + 1),
        })
        .collect();

    let mut users = vec![User {
        id: DEMO_ADMIN,
        name: "Marketplace Admin".to_string(),
        email: "admin@marketplace.test".to_string(),
        role: UserRole::Admin,
        created_at: now - Duration::days(500),
        avg_rating: None,
        rating_count: None,
    }];

    let provider_ages = [2_i64, 5, 11, 19, 27, 45, 80, 120, 200, 260, 330, 390];
    for (idx, age) in provider_ages.iter().enumerate() {
        let id = 2 + idx as i64;
        let rated = idx % 5 != 4;
        users.push(User {
            id: UserId(id),
            name: format!("Provider {id}"),
            email: format!("provider{id}@marketplace.test"),
            role: UserRole::Provider,
            created_at: now - Duration::days(*age) - Duration::hours(idx as i64),
            avg_rating: rated.then(|| 3.4 + (idx % 4) as f64 * 0.4),
            rating_count: rated.then(|| (idx as u32 * 9) % 70),
        });
    }

    for idx in 0..30_i64 {
        let id = 100 + idx;
        users.push(User {
            id: UserId(id),
            name: format!("Customer {id}"),
            email: format!("customer{id}@marketplace.test"),
            role: UserRole::Customer,
            created_at: now - Duration::days((idx * 13) % 365),
            avg_rating: None,
            rating_count: None,
        });
    }

    let minutes_in_year = 365 * 24 * 60;
    let bookings = (0..600_i64)
        .map(|idx| {
            let status = match idx % 10 {
                0..=6 => BookingStatus::Completed,
                7 => BookingStatus::Canceled,
                8 => BookingStatus::Pending,
                _ => BookingStatus::Accepted,
            };
            Booking {
                id: BookingId(idx + 1),
                status,
                amount: Some(40.0 + ((idx * 37) % 160) as f64 + 0.5 * (idx % 2) as f64),
                created_at: now - Duration::minutes((idx * 877) % minutes_in_year),
                provider_id: UserId(2 + (idx * 7) % provider_ages.len() as i64),
                service_id: ServiceId(100 + (idx * 3) % 10),
            }
        })
        .collect();

    MarketplaceDataset {
        users,
        categories,
        services,
        bookings,
    }
}
