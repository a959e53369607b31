use crate::demo::{run_dashboard_report, run_demo, DashboardReportArgs, DemoArgs};
use crate::server;
use booking_marketplace::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Booking Marketplace",
    about = "Run the booking marketplace admin service or render dashboards from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Render admin analytics from a dataset export
    Dashboard {
        #[command(subcommand)]
        command: DashboardCommand,
    },
    /// Seed a synthetic marketplace and print its advanced dashboard
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum DashboardCommand {
    /// Build the advanced dashboard for a CSV dataset directory
    Report(DashboardReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory holding users.csv, categories.csv, services.csv and bookings.csv
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Seed the store with the synthetic demo marketplace when no dataset is configured
    #[arg(long)]
    pub(crate) demo_data: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Dashboard {
            command: DashboardCommand::Report(args),
        } => run_dashboard_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
