use std::error::Error;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{AnalysisConfig, Engine, FlatmateBalance, MoneyCents, UserRole};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use tracing_subscriber::{EnvFilter, fmt::MakeWriter};
use uuid::Uuid;

/// Engine warnings (e.g. an ignored `--start-date`) go to stderr.
const LOG_FILTER: &str = "flatshare_admin=info,engine=warn";

#[derive(Parser, Debug)]
#[command(name = "flatshare_admin")]
#[command(about = "Admin utilities for Flatshare (flatmates, rent schedules, balances)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./flatshare.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Schedule(Schedule),
    Balances(BalancesArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
    List,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Role {
    Admin,
    Member,
}

impl From<Role> for UserRole {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => UserRole::Admin,
            Role::Member => UserRole::Member,
        }
    }
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: Option<String>,
    #[arg(long, value_enum, default_value = "member")]
    role: Role,
}

#[derive(Args, Debug)]
struct Schedule {
    #[command(subcommand)]
    command: ScheduleCommand,
}

#[derive(Subcommand, Debug)]
enum ScheduleCommand {
    Add(ScheduleAddArgs),
    End(ScheduleEndArgs),
    List(ScheduleListArgs),
}

#[derive(Args, Debug)]
struct ScheduleAddArgs {
    #[arg(long)]
    user: Uuid,
    /// Weekly rent, e.g. `250` or `212.50`.
    #[arg(long)]
    amount: MoneyCents,
    #[arg(long)]
    start: NaiveDate,
    #[arg(long)]
    end: Option<NaiveDate>,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args, Debug)]
struct ScheduleEndArgs {
    #[arg(long)]
    id: Uuid,
    /// Last day the schedule applies (inclusive).
    #[arg(long)]
    end: NaiveDate,
}

#[derive(Args, Debug)]
struct ScheduleListArgs {
    #[arg(long)]
    user: Uuid,
}

#[derive(Args, Debug)]
struct BalancesArgs {
    /// Only this flatmate, with the weekly breakdown.
    #[arg(long)]
    user: Option<Uuid>,
    /// First day of reconciliation; defaults to 180 days ago.
    #[arg(long, env = "FLATSHARE__ANALYSIS__START_DATE")]
    start_date: Option<String>,
}

fn log_subscriber<W>(writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(LOG_FILTER))
        .with_writer(writer)
        .with_ansi(false)
        .finish()
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn print_summary_line(balance: &FlatmateBalance) {
    println!(
        "{:<20} due {:>12} paid {:>12} balance {:>12}",
        balance.name, balance.total_due, balance.total_paid, balance.balance
    );
}

fn print_breakdown(balance: &FlatmateBalance) {
    for week in &balance.weekly_breakdown {
        println!(
            "  {} due {} {:>10} paid {:>10} balance {:>10}",
            week.week_start, week.due_date, week.amount_due, week.amount_paid, week.balance
        );
    }
    let unassigned = balance.unassigned_paid();
    if !unassigned.is_zero() {
        println!("  {unassigned} paid outside every week's payment window");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    tracing::subscriber::set_global_default(log_subscriber(std::io::stderr))?;

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let engine = Engine::builder().database(db).build().await?;
            let id = engine
                .create_user(&args.name, args.email.as_deref(), args.role.into())
                .await?;
            println!("created user: {} ({id})", args.name);
        }
        Command::User(User {
            command: UserCommand::List,
        }) => {
            let engine = Engine::builder().database(db).build().await?;
            for user in engine.users().await? {
                println!("{} {:<20} {}", user.id, user.name, user.role.as_str());
            }
        }
        Command::Schedule(Schedule {
            command: ScheduleCommand::Add(args),
        }) => {
            let engine = Engine::builder().database(db).build().await?;
            let id = engine
                .add_schedule(
                    args.user,
                    args.amount,
                    args.start,
                    args.end,
                    args.note.as_deref(),
                )
                .await?;
            println!("created schedule: {id}");
        }
        Command::Schedule(Schedule {
            command: ScheduleCommand::End(args),
        }) => {
            let engine = Engine::builder().database(db).build().await?;
            engine.end_schedule(args.id, args.end).await?;
            println!("ended schedule {} on {}", args.id, args.end);
        }
        Command::Schedule(Schedule {
            command: ScheduleCommand::List(args),
        }) => {
            let engine = Engine::builder().database(db).build().await?;
            if engine.user(args.user).await?.is_none() {
                eprintln!("user not found: {}", args.user);
                std::process::exit(1);
            }
            for schedule in engine.schedules_for(args.user).await? {
                let end = schedule
                    .end_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "open".to_string());
                println!(
                    "{} {:>10} {} .. {}",
                    schedule.id, schedule.weekly_amount, schedule.start_date, end
                );
            }
        }
        Command::Balances(args) => {
            let engine = Engine::builder()
                .database(db)
                .analysis(AnalysisConfig::from_setting(args.start_date.as_deref()))
                .build()
                .await?;
            let today = Local::now().date_naive();

            match args.user {
                Some(user_id) => {
                    let Some(balance) = engine.flatmate_balance(user_id, today).await? else {
                        eprintln!("user not found: {user_id}");
                        std::process::exit(1);
                    };
                    print_summary_line(&balance);
                    print_breakdown(&balance);
                }
                None => {
                    let summary = engine.household_summary(today).await?;
                    println!("{} .. {}", summary.window.from, summary.window.to);
                    for balance in &summary.flatmates {
                        print_summary_line(balance);
                    }
                    println!(
                        "{:<20} due {:>12} paid {:>12} balance {:>12}",
                        "total", summary.total_due, summary.total_paid, summary.total_balance
                    );
                }
            }
        }
    }

    Ok(())
}
