use sqlx::PgPool;
use tracing::warn;

use crate::db;
use crate::models::{Difficulty, Exercise, ExerciseOverride, TargetArea};

struct BaselineEntry {
    slug: &'static str,
    name: &'static str,
    description: &'static str,
    target_area: TargetArea,
    category: &'static str,
    duration_seconds: u32,
    reps: Option<&'static str>,
    what_it_does: &'static str,
    difficulty: Difficulty,
}

// Canonical ordering. Position is the 1-based index into this list and is
// what imagery and point lookups key off, so entries are append-only.
const BASELINE: &[BaselineEntry] = &[
    BaselineEntry {
        slug: "chin-tuck",
        name: "Chin Tucks",
        description: "Sit tall and draw your chin straight back, making a double chin, then release.",
        target_area: TargetArea::Cervical,
        category: "mobility",
        duration_seconds: 45,
        reps: Some("10 reps"),
        what_it_does: "Strengthens the deep neck flexors that hold your head over your spine.",
        difficulty: Difficulty::Beginner,
    },
    BaselineEntry {
        slug: "neck-side-stretch",
        name: "Neck Side Stretch",
        description: "Tilt your ear toward one shoulder until you feel a gentle pull, then switch.",
        target_area: TargetArea::Cervical,
        category: "stretch",
        duration_seconds: 40,
        reps: Some("20s each side"),
        what_it_does: "Releases tension in the upper trapezius after long hours at a desk.",
        difficulty: Difficulty::Beginner,
    },
    BaselineEntry {
        slug: "cat-cow",
        name: "Cat-Cow",
        description: "On all fours, alternate between arching and rounding your spine with your breath.",
        target_area: TargetArea::Full,
        category: "mobility",
        duration_seconds: 60,
        reps: Some("10 slow cycles"),
        what_it_does: "Moves every spinal segment through flexion and extension.",
        difficulty: Difficulty::Beginner,
    },
    BaselineEntry {
        slug: "thoracic-extension",
        name: "Thoracic Extension",
        description: "Hands behind your head, gently extend your upper back over the chair edge.",
        target_area: TargetArea::Thoracic,
        category: "mobility",
        duration_seconds: 45,
        reps: Some("8 reps"),
        what_it_does: "Counteracts the rounded mid-back that builds up from sitting.",
        difficulty: Difficulty::Intermediate,
    },
    BaselineEntry {
        slug: "shoulder-blade-squeeze",
        name: "Shoulder Blade Squeeze",
        description: "Pull your shoulder blades down and together, hold briefly, release.",
        target_area: TargetArea::Thoracic,
        category: "strength",
        duration_seconds: 40,
        reps: Some("12 reps"),
        what_it_does: "Activates the mid-back muscles that keep your shoulders from rolling forward.",
        difficulty: Difficulty::Beginner,
    },
    BaselineEntry {
        slug: "bird-dog",
        name: "Bird Dog",
        description: "From all fours, extend the opposite arm and leg while keeping your back flat.",
        target_area: TargetArea::Core,
        category: "strength",
        duration_seconds: 60,
        reps: Some("8 each side"),
        what_it_does: "Trains the core to stabilize the spine while the limbs move.",
        difficulty: Difficulty::Intermediate,
    },
    BaselineEntry {
        slug: "glute-bridge",
        name: "Glute Bridge",
        description: "Lying on your back with knees bent, lift your hips until your body forms a line.",
        target_area: TargetArea::Lumbar,
        category: "strength",
        duration_seconds: 50,
        reps: Some("12 reps"),
        what_it_does: "Builds the glutes so your lower back stops doing their job.",
        difficulty: Difficulty::Beginner,
    },
    BaselineEntry {
        slug: "pelvic-tilt",
        name: "Pelvic Tilt",
        description: "Lying down, flatten your lower back into the floor by tilting your pelvis.",
        target_area: TargetArea::Lumbar,
        category: "mobility",
        duration_seconds: 40,
        reps: Some("10 reps"),
        what_it_does: "Teaches fine control of the lumbar curve and eases stiffness.",
        difficulty: Difficulty::Beginner,
    },
    BaselineEntry {
        slug: "cobra-stretch",
        name: "Cobra Stretch",
        description: "From your stomach, press your chest up while keeping hips on the floor.",
        target_area: TargetArea::Lumbar,
        category: "stretch",
        duration_seconds: 45,
        reps: Some("hold 20-30s"),
        what_it_does: "Restores lumbar extension after a day spent flexed forward.",
        difficulty: Difficulty::Intermediate,
    },
    BaselineEntry {
        slug: "childs-pose",
        name: "Child's Pose",
        description: "Kneel, sit back on your heels, and reach your arms forward along the floor.",
        target_area: TargetArea::Full,
        category: "stretch",
        duration_seconds: 60,
        reps: None,
        what_it_does: "Decompresses the whole spine and settles breathing.",
        difficulty: Difficulty::Beginner,
    },
    BaselineEntry {
        slug: "plank",
        name: "Forearm Plank",
        description: "Hold a straight line from head to heels on your forearms and toes.",
        target_area: TargetArea::Core,
        category: "strength",
        duration_seconds: 45,
        reps: Some("hold 30-45s"),
        what_it_does: "Builds the endurance your trunk needs to hold good posture all day.",
        difficulty: Difficulty::Advanced,
    },
    BaselineEntry {
        slug: "seated-twist",
        name: "Seated Spinal Twist",
        description: "Sitting tall, rotate your torso to one side using the chair for leverage.",
        target_area: TargetArea::Thoracic,
        category: "stretch",
        duration_seconds: 50,
        reps: Some("20s each side"),
        what_it_does: "Keeps the mid-back rotating freely instead of stiffening into one shape.",
        difficulty: Difficulty::Beginner,
    },
];

/// The complete local catalog, positions assigned from the canonical order.
pub fn local_baseline() -> Vec<Exercise> {
    BASELINE
        .iter()
        .enumerate()
        .map(|(index, entry)| Exercise {
            slug: entry.slug.to_string(),
            position: index as u32 + 1,
            name: entry.name.to_string(),
            description: entry.description.to_string(),
            target_area: entry.target_area,
            category: entry.category.to_string(),
            duration_seconds: entry.duration_seconds,
            reps: entry.reps.map(str::to_string),
            what_it_does: entry.what_it_does.to_string(),
            difficulty: entry.difficulty,
        })
        .collect()
}

fn non_empty(value: Option<&String>) -> Option<&String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Overlay remote content rows onto the local baseline. Only content fields
/// are taken from the remote side, and only when present and non-empty;
/// position and target area always come from the baseline. Unknown slugs are
/// ignored.
pub fn merge_overrides(mut local: Vec<Exercise>, overrides: &[ExerciseOverride]) -> Vec<Exercise> {
    for exercise in local.iter_mut() {
        let Some(remote) = overrides.iter().find(|row| row.slug == exercise.slug) else {
            continue;
        };

        if let Some(name) = non_empty(remote.name.as_ref()) {
            exercise.name = name.clone();
        }
        if let Some(description) = non_empty(remote.description.as_ref()) {
            exercise.description = description.clone();
        }
        if let Some(what_it_does) = non_empty(remote.what_it_does.as_ref()) {
            exercise.what_it_does = what_it_does.clone();
        }
        if let Some(difficulty) = remote.difficulty.as_deref().and_then(Difficulty::parse) {
            exercise.difficulty = difficulty;
        }
        if let Some(duration) = remote.duration_seconds.filter(|seconds| *seconds > 0) {
            exercise.duration_seconds = duration as u32;
        }
        if let Some(reps) = non_empty(remote.reps.as_ref()) {
            exercise.reps = Some(reps.clone());
        }
        if let Some(category) = non_empty(remote.category.as_ref()) {
            exercise.category = category.clone();
        }
    }

    local
}

/// Load the merged catalog. A failed or empty override fetch degrades to the
/// local baseline; it never blocks or blanks the list.
pub async fn load_catalog(pool: &PgPool) -> Vec<Exercise> {
    let overrides = match db::fetch_overrides(pool).await {
        Ok(rows) => rows,
        Err(error) => {
            warn!(%error, "exercise override fetch failed, using local baseline");
            Vec::new()
        }
    };

    merge_overrides(local_baseline(), &overrides)
}
