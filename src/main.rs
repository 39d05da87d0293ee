use std::path::PathBuf;

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod catalog;
mod db;
mod models;
mod points;
mod report;
mod risk;
mod routine;
mod streak;

use models::{ProfileRecord, RiskInput, RiskTier, UserStreak};

#[derive(Parser)]
#[command(name = "spinecare-daily")]
#[command(about = "Daily spine-care routines, risk scoring, and streak tracking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load demo users, curated overrides, and the daily fact pool
    Seed,
    /// Import curated exercise overrides from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Score the onboarding questionnaire and save the profile
    Assess {
        #[arg(long)]
        email: String,
        #[arg(long)]
        age_group: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        occupation: Option<String>,
        #[arg(long)]
        weightlifting: Option<String>,
        #[arg(long)]
        exercise_frequency: Option<String>,
        #[arg(long)]
        pain_level: Option<String>,
        #[arg(long)]
        posture: Option<String>,
        #[arg(long)]
        sleep_position: Option<String>,
    },
    /// Show today's routine for a user
    Routine {
        #[arg(long)]
        email: String,
    },
    /// Record today's routine as completed
    Complete {
        #[arg(long)]
        email: String,
    },
    /// Print the spine fact for today
    Fact,
    /// Write a markdown report for a user
    Report {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set to a Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    let today = Utc::now().date_naive();

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let upserted = db::import_overrides_csv(&pool, &csv).await?;
            println!("Upserted {upserted} exercise overrides from {}.", csv.display());
        }
        Commands::Assess {
            email,
            age_group,
            gender,
            occupation,
            weightlifting,
            exercise_frequency,
            pain_level,
            posture,
            sleep_position,
        } => {
            let input = RiskInput {
                age_group,
                gender,
                occupation_type: occupation,
                weightlifting,
                exercise_frequency,
                pain_level,
                posture_awareness: posture,
                sleep_position,
            };
            assess(&pool, &email, input, today).await?;
        }
        Commands::Routine { email } => {
            show_routine(&pool, &email, today).await?;
        }
        Commands::Complete { email } => {
            complete(&pool, &email, today).await?;
        }
        Commands::Fact => {
            show_fact(&pool, today).await?;
        }
        Commands::Report { email, out } => {
            write_report(&pool, &email, &out, today).await?;
        }
    }

    Ok(())
}

async fn assess(
    pool: &PgPool,
    email: &str,
    input: RiskInput,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let result = risk::calculate_spine_risk(&input);

    println!("Risk score: {}/100 ({} tier)", result.score, result.tier);
    for (factor, points) in result.breakdown.iter() {
        println!("- {}: {:+} points", factor.label(), points);
    }
    println!("{}", result.primary_reason);

    let user_id = db::upsert_user(pool, email, display_name_from(email)).await?;
    let profile = ProfileRecord {
        user_id,
        risk_score: result.score,
        risk_tier: result.tier,
        primary_reason: result.primary_reason.clone(),
        answers: input,
        onboarding_complete: true,
        assessed_on: today,
    };

    // The assessment above already stands; a failed write only delays
    // persistence until the next retake.
    if let Err(error) = db::upsert_profile(pool, &profile).await {
        warn!(%error, "profile write failed; assessment not persisted");
    } else {
        println!("Profile saved for {email}.");
    }

    Ok(())
}

/// Tier on record for the user, degrading to low (maintenance sizing) when no
/// assessment exists or the read fails.
async fn tier_on_record(pool: &PgPool, user_id: uuid::Uuid) -> RiskTier {
    match db::fetch_profile(pool, user_id).await {
        Ok(Some(profile)) => profile.risk_tier,
        Ok(None) => {
            println!("No assessment on file; defaulting to a maintenance routine.");
            RiskTier::Low
        }
        Err(error) => {
            warn!(%error, "profile fetch failed, defaulting to low tier");
            RiskTier::Low
        }
    }
}

async fn streak_on_record(pool: &PgPool, user_id: uuid::Uuid, today: NaiveDate) -> UserStreak {
    match db::fetch_streak(pool, user_id).await {
        Ok(Some(streak)) => streak,
        Ok(None) => UserStreak::new(user_id, today),
        Err(error) => {
            warn!(%error, "streak fetch failed, starting from a zeroed record");
            UserStreak::new(user_id, today)
        }
    }
}

async fn show_routine(pool: &PgPool, email: &str, today: NaiveDate) -> anyhow::Result<()> {
    let Some(user) = db::find_user(pool, email).await? else {
        println!("No account for {email}; run assess first.");
        return Ok(());
    };

    let tier = tier_on_record(pool, user.id).await;
    let current = streak_on_record(pool, user.id, today).await;
    let exercises = catalog::load_catalog(pool).await;
    let routine = routine::build_routine(tier, current.current_streak, &exercises);

    println!(
        "{} (day {}) — focus {}, about {} minutes",
        routine.title, routine.day, routine.focus_area, routine.estimated_minutes
    );
    for exercise in routine.exercises.iter() {
        let reps = exercise.reps.as_deref().unwrap_or("at your own pace");
        println!(
            "- {} ({}, {}s, {})",
            exercise.name,
            exercise.target_area.as_str(),
            exercise.duration_seconds,
            reps
        );
    }

    Ok(())
}

async fn complete(pool: &PgPool, email: &str, today: NaiveDate) -> anyhow::Result<()> {
    let Some(user) = db::find_user(pool, email).await? else {
        // A completion without a known user is a no-op, not an error.
        println!("No account for {email}; nothing recorded.");
        return Ok(());
    };

    let current = streak_on_record(pool, user.id, today).await;
    let Some(after_completion) = streak::complete_today(&current, today) else {
        println!(
            "Already completed today. Streak stays at {} days, {} points total.",
            current.current_streak, current.total_points
        );
        return Ok(());
    };

    let tier = tier_on_record(pool, user.id).await;
    let exercises = catalog::load_catalog(pool).await;
    let routine = routine::build_routine(tier, current.current_streak, &exercises);
    let positions: Vec<u32> = routine
        .exercises
        .iter()
        .map(|exercise| exercise.position)
        .collect();
    let exercise_points = points::total_points(&positions);

    let updated = streak::add_points(&after_completion, today, exercise_points);

    // Local state is final at this point; the write carries the snapshot.
    if let Err(error) = db::upsert_streak(pool, &updated).await {
        warn!(%error, "streak write failed; local result stands until the next write");
    }

    println!(
        "Day {} complete! Streak {} days (longest {}). Earned {} points ({} total, {} this week).",
        updated.current_streak,
        updated.current_streak,
        updated.longest_streak,
        streak::DAILY_COMPLETION_BONUS + exercise_points,
        updated.total_points,
        updated.weekly_points
    );

    Ok(())
}

async fn show_fact(pool: &PgPool, today: NaiveDate) -> anyhow::Result<()> {
    let pool_size = db::count_facts(pool).await?;
    if pool_size == 0 {
        println!("No facts loaded; run seed first.");
        return Ok(());
    }

    let day_index = (today.ordinal() as i64 % pool_size) as i32 + 1;
    match db::fetch_daily_fact(pool, day_index).await? {
        Some(fact) => println!("{}", fact.fact),
        None => println!("No fact for day index {day_index}."),
    }

    Ok(())
}

async fn write_report(
    pool: &PgPool,
    email: &str,
    out: &std::path::Path,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let Some(user) = db::find_user(pool, email).await? else {
        println!("No account for {email}; run assess first.");
        return Ok(());
    };

    let Some(profile) = db::fetch_profile(pool, user.id).await? else {
        println!("No assessment on file for {email}; run assess first.");
        return Ok(());
    };

    // Scoring is pure, so the stored answers reproduce the full breakdown.
    let result = risk::calculate_spine_risk(&profile.answers);
    let current = streak_on_record(pool, user.id, today).await;
    let exercises = catalog::load_catalog(pool).await;
    let routine = routine::build_routine(result.tier, current.current_streak, &exercises);

    let report = report::build_report(
        &user.display_name,
        profile.assessed_on,
        &result,
        &routine,
        &current,
    );
    std::fs::write(out, report)?;
    println!("Report written to {}.", out.display());

    Ok(())
}

fn display_name_from(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
