use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    DailyFact, ExerciseOverride, ProfileRecord, RiskInput, RiskTier, UserRecord, UserStreak,
};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let users = vec![
        (
            Uuid::parse_str("8a1f3c2e-61b4-4b6f-9a27-5c3d9e0f12ab")?,
            "maya.lindqvist@example.com",
            "Maya Lindqvist",
        ),
        (
            Uuid::parse_str("f04be7d1-2c85-4a1e-b7c9-91d3a6e85c44")?,
            "tomas.rivera@example.com",
            "Tomas Rivera",
        ),
    ];

    for (id, email, display_name) in users {
        let user_id: Uuid = sqlx::query(
            r#"
            INSERT INTO spinecare.users (id, email, display_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET display_name = EXCLUDED.display_name
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(display_name)
        .fetch_one(pool)
        .await?
        .get("id");

        let today = chrono::Utc::now().date_naive();
        let streak = UserStreak::new(user_id, today);
        upsert_streak(pool, &streak).await?;
    }

    let overrides = vec![(
        "plank",
        "Forearm Plank",
        "Hold a straight line from head to heels, elbows under shoulders, eyes down.",
    )];

    for (slug, name, description) in overrides {
        sqlx::query(
            r#"
            INSERT INTO spinecare.exercise_overrides (slug, name, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (slug) DO UPDATE
            SET name = EXCLUDED.name, description = EXCLUDED.description, updated_at = now()
            "#,
        )
        .bind(slug)
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
    }

    let facts = vec![
        "Your spine has 33 vertebrae, but only 24 of them move.",
        "Discs lose water during the day; you are slightly taller in the morning.",
        "Slouching can roughly double the load on your lumbar discs.",
        "The cervical spine supports a head that weighs about as much as a bowling ball.",
        "Walking is one of the gentlest ways to hydrate spinal discs.",
        "Core endurance protects your back better than core strength alone.",
        "Stomach sleeping rotates your neck for hours at a time.",
        "Micro-breaks every 30 minutes offset most sitting-related stiffness.",
        "Your thoracic spine is built for rotation, not just holding still.",
        "Consistent daily movement beats one long weekly workout for back health.",
    ];

    for (index, fact) in facts.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO spinecare.daily_facts (day_index, fact)
            VALUES ($1, $2)
            ON CONFLICT (day_index) DO UPDATE SET fact = EXCLUDED.fact
            "#,
        )
        .bind(index as i32 + 1)
        .bind(fact)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn find_user(pool: &PgPool, email: &str) -> anyhow::Result<Option<UserRecord>> {
    let row = sqlx::query("SELECT id, email, display_name FROM spinecare.users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        display_name: row.get("display_name"),
    }))
}

pub async fn upsert_user(pool: &PgPool, email: &str, display_name: &str) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query(
        r#"
        INSERT INTO spinecare.users (id, email, display_name)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE
        SET display_name = EXCLUDED.display_name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(display_name)
    .fetch_one(pool)
    .await?
    .get("id");

    Ok(id)
}

pub async fn fetch_profile(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Option<ProfileRecord>> {
    let row = sqlx::query(
        r#"
        SELECT user_id, risk_score, risk_tier, primary_reason, answers,
               onboarding_complete, assessed_on
        FROM spinecare.profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else { return Ok(None) };

    let tier_text: String = row.get("risk_tier");
    let risk_tier = RiskTier::parse(&tier_text)
        .ok_or_else(|| anyhow!("unknown risk tier '{tier_text}' in profile"))?;
    let answers: RiskInput = serde_json::from_value(row.get("answers"))
        .context("stored questionnaire answers do not deserialize")?;

    Ok(Some(ProfileRecord {
        user_id: row.get("user_id"),
        risk_score: row.get("risk_score"),
        risk_tier,
        primary_reason: row.get("primary_reason"),
        answers,
        onboarding_complete: row.get("onboarding_complete"),
        assessed_on: row.get("assessed_on"),
    }))
}

pub async fn upsert_profile(pool: &PgPool, profile: &ProfileRecord) -> anyhow::Result<()> {
    let answers = serde_json::to_value(&profile.answers)
        .context("questionnaire answers do not serialize")?;

    sqlx::query(
        r#"
        INSERT INTO spinecare.profiles
        (user_id, risk_score, risk_tier, primary_reason, answers, onboarding_complete, assessed_on)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_id) DO UPDATE
        SET risk_score = EXCLUDED.risk_score,
            risk_tier = EXCLUDED.risk_tier,
            primary_reason = EXCLUDED.primary_reason,
            answers = EXCLUDED.answers,
            onboarding_complete = EXCLUDED.onboarding_complete,
            assessed_on = EXCLUDED.assessed_on
        "#,
    )
    .bind(profile.user_id)
    .bind(profile.risk_score)
    .bind(profile.risk_tier.as_str())
    .bind(&profile.primary_reason)
    .bind(answers)
    .bind(profile.onboarding_complete)
    .bind(profile.assessed_on)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn fetch_streak(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Option<UserStreak>> {
    let row = sqlx::query(
        r#"
        SELECT user_id, current_streak, longest_streak, last_activity,
               total_points, weekly_points, week_number, week_year
        FROM spinecare.streaks
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| UserStreak {
        user_id: row.get("user_id"),
        current_streak: row.get("current_streak"),
        longest_streak: row.get("longest_streak"),
        last_activity: row.get::<Option<NaiveDate>, _>("last_activity"),
        total_points: row.get("total_points"),
        weekly_points: row.get("weekly_points"),
        week_number: row.get("week_number"),
        week_year: row.get("week_year"),
    }))
}

/// Full-snapshot upsert: the caller passes the already-finalized record, so a
/// retry writes the same values instead of re-reading mutable state.
pub async fn upsert_streak(pool: &PgPool, streak: &UserStreak) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO spinecare.streaks
        (user_id, current_streak, longest_streak, last_activity,
         total_points, weekly_points, week_number, week_year)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id) DO UPDATE
        SET current_streak = EXCLUDED.current_streak,
            longest_streak = EXCLUDED.longest_streak,
            last_activity = EXCLUDED.last_activity,
            total_points = EXCLUDED.total_points,
            weekly_points = EXCLUDED.weekly_points,
            week_number = EXCLUDED.week_number,
            week_year = EXCLUDED.week_year
        "#,
    )
    .bind(streak.user_id)
    .bind(streak.current_streak)
    .bind(streak.longest_streak)
    .bind(streak.last_activity)
    .bind(streak.total_points)
    .bind(streak.weekly_points)
    .bind(streak.week_number)
    .bind(streak.week_year)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn fetch_overrides(pool: &PgPool) -> anyhow::Result<Vec<ExerciseOverride>> {
    let rows = sqlx::query(
        r#"
        SELECT slug, name, description, what_it_does, difficulty,
               duration_seconds, reps, category
        FROM spinecare.exercise_overrides
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut overrides = Vec::new();
    for row in rows {
        overrides.push(ExerciseOverride {
            slug: row.get("slug"),
            name: row.get("name"),
            description: row.get("description"),
            what_it_does: row.get("what_it_does"),
            difficulty: row.get("difficulty"),
            duration_seconds: row.get("duration_seconds"),
            reps: row.get("reps"),
            category: row.get("category"),
        });
    }

    Ok(overrides)
}

pub async fn count_facts(pool: &PgPool) -> anyhow::Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS total FROM spinecare.daily_facts")
        .fetch_one(pool)
        .await?;
    Ok(row.get("total"))
}

pub async fn fetch_daily_fact(pool: &PgPool, day_index: i32) -> anyhow::Result<Option<DailyFact>> {
    let row = sqlx::query("SELECT day_index, fact FROM spinecare.daily_facts WHERE day_index = $1")
        .bind(day_index)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| DailyFact {
        day_index: row.get("day_index"),
        fact: row.get("fact"),
    }))
}

pub async fn import_overrides_csv(
    pool: &PgPool,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        slug: String,
        name: Option<String>,
        description: Option<String>,
        what_it_does: Option<String>,
        difficulty: Option<String>,
        duration_seconds: Option<i32>,
        reps: Option<String>,
        category: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut upserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let outcome = sqlx::query(
            r#"
            INSERT INTO spinecare.exercise_overrides
            (slug, name, description, what_it_does, difficulty, duration_seconds, reps, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (slug) DO UPDATE
            SET name = EXCLUDED.name,
                description = EXCLUDED.description,
                what_it_does = EXCLUDED.what_it_does,
                difficulty = EXCLUDED.difficulty,
                duration_seconds = EXCLUDED.duration_seconds,
                reps = EXCLUDED.reps,
                category = EXCLUDED.category,
                updated_at = now()
            "#,
        )
        .bind(&row.slug)
        .bind(&row.name)
        .bind(&row.description)
        .bind(&row.what_it_does)
        .bind(&row.difficulty)
        .bind(row.duration_seconds)
        .bind(&row.reps)
        .bind(&row.category)
        .execute(pool)
        .await?;

        if outcome.rows_affected() > 0 {
            upserted += 1;
        }
    }

    Ok(upserted)
}
