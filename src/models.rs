use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The eight questionnaire answers collected at onboarding. Every field is
/// optional: a missing answer simply contributes no points when scored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskInput {
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub occupation_type: Option<String>,
    pub weightlifting: Option<String>,
    pub exercise_frequency: Option<String>,
    pub pain_level: Option<String>,
    pub posture_awareness: Option<String>,
    pub sleep_position: Option<String>,
}

/// Scored factors, declared in tie-break priority order: when two factors
/// contribute the same number of points, the one declared first wins the
/// primary-reason slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskFactor {
    Pain,
    Occupation,
    ExerciseFrequency,
    Posture,
    Age,
    Weightlifting,
    Sleep,
    Gender,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 8] = [
        RiskFactor::Pain,
        RiskFactor::Occupation,
        RiskFactor::ExerciseFrequency,
        RiskFactor::Posture,
        RiskFactor::Age,
        RiskFactor::Weightlifting,
        RiskFactor::Sleep,
        RiskFactor::Gender,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::Pain => "pain level",
            RiskFactor::Occupation => "occupation",
            RiskFactor::ExerciseFrequency => "exercise frequency",
            RiskFactor::Posture => "posture",
            RiskFactor::Age => "age group",
            RiskFactor::Weightlifting => "weightlifting",
            RiskFactor::Sleep => "sleep position",
            RiskFactor::Gender => "gender",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskTier {
    /// Non-overlapping score bands, highest first.
    pub fn from_score(score: i32) -> RiskTier {
        match score {
            86..=100 => RiskTier::Critical,
            61..=85 => RiskTier::High,
            31..=60 => RiskTier::Moderate,
            _ => RiskTier::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
            RiskTier::Critical => "critical",
        }
    }

    pub fn parse(value: &str) -> Option<RiskTier> {
        match value {
            "low" => Some(RiskTier::Low),
            "moderate" => Some(RiskTier::Moderate),
            "high" => Some(RiskTier::High),
            "critical" => Some(RiskTier::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskResult {
    /// Clamped to [0, 100].
    pub score: i32,
    pub tier: RiskTier,
    pub primary_reason: String,
    /// Signed contribution per factor; negative values are protective.
    pub breakdown: BTreeMap<RiskFactor, i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetArea {
    Cervical,
    Thoracic,
    Lumbar,
    Core,
    Full,
}

impl TargetArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetArea::Cervical => "cervical",
            TargetArea::Thoracic => "thoracic",
            TargetArea::Lumbar => "lumbar",
            TargetArea::Core => "core",
            TargetArea::Full => "full",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn parse(value: &str) -> Option<Difficulty> {
        match value {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

/// One catalog entry. `position` is the 1-based index in the canonical local
/// ordering; imagery and point lookups key off it, so a remote overlay never
/// touches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub slug: String,
    pub position: u32,
    pub name: String,
    pub description: String,
    pub target_area: TargetArea,
    pub category: String,
    pub duration_seconds: u32,
    pub reps: Option<String>,
    pub what_it_does: String,
    pub difficulty: Difficulty,
}

/// Remote content row keyed by the same slug as a local baseline entry.
/// Absent or empty fields mean "keep the local value".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseOverride {
    pub slug: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub what_it_does: Option<String>,
    pub difficulty: Option<String>,
    pub duration_seconds: Option<i32>,
    pub reps: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    pub day: u32,
    pub title: String,
    pub focus_area: String,
    pub estimated_minutes: u32,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStreak {
    pub user_id: Uuid,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity: Option<NaiveDate>,
    pub total_points: i64,
    pub weekly_points: i64,
    pub week_number: i32,
    pub week_year: i32,
}

impl UserStreak {
    /// Zero-initialized record for a user with no streak row yet.
    pub fn new(user_id: Uuid, today: NaiveDate) -> UserStreak {
        let week = today.iso_week();
        UserStreak {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            last_activity: None,
            total_points: 0,
            weekly_points: 0,
            week_number: week.week() as i32,
            week_year: week.year(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub user_id: Uuid,
    pub risk_score: i32,
    pub risk_tier: RiskTier,
    pub primary_reason: String,
    pub answers: RiskInput,
    pub onboarding_complete: bool,
    pub assessed_on: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct DailyFact {
    pub day_index: i32,
    pub fact: String,
}
