//! Demo data generation.
//!
//! Everything is written through [`Services`], session notes through
//! [`SessionNoteService::create_with_validation`](crate::services::SessionNoteService::create_with_validation),
//! so seeded data obeys the same checks as API writes.

use chrono::{Days, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::models::{Bcba, Clinic, Patient};
use crate::result::ServiceResult;
use crate::services::Services;

pub const ICD_CODES: &[&str] = &[
    "F84.0", // Autistic disorder
    "F84.1", // Atypical autism
    "F84.2", // Rett's disorder
    "F84.3", // Other childhood disintegrative disorder
    "F84.5", // Asperger's syndrome
    "F84.8", // Other pervasive developmental disorders
    "F84.9", // Pervasive developmental disorder, unspecified
    "F90.0", // ADHD predominantly inattentive type
    "F90.1", // ADHD predominantly hyperactive type
    "F90.2", // ADHD combined type
];

pub const CLINIC_NAMES: &[&str] = &[
    "Sunshine ABA Therapy Center",
    "Bright Futures Behavioral Health",
    "Growing Minds ABA Clinic",
    "Rainbow Therapy Services",
    "Little Steps ABA Center",
    "Breakthrough Behavioral Solutions",
    "Caring Hearts Autism Center",
    "New Horizons ABA Therapy",
    "Positive Pathways Clinic",
    "Thrive ABA Services",
    "Harmony Behavioral Health",
    "Excellence in ABA",
    "Hope & Healing Center",
    "Building Blocks ABA",
    "Stepping Stones Therapy",
];

pub const BCBA_NAMES: &[&str] = &[
    "Dr. Sarah Johnson, BCBA",
    "Dr. Michael Chen, BCBA",
    "Dr. Emily Rodriguez, BCBA",
    "Dr. David Thompson, BCBA",
    "Dr. Lisa Park, BCBA",
    "Dr. Jennifer Martinez, BCBA",
    "Dr. Kevin Brown, BCBA",
    "Dr. Amanda Wilson, BCBA",
    "Dr. Robert Taylor, BCBA",
    "Dr. Michelle Davis, BCBA",
    "Dr. Christopher Garcia, BCBA",
    "Dr. Nicole Miller, BCBA",
    "Dr. Steven Anderson, BCBA",
    "Dr. Jessica White, BCBA",
    "Dr. Daniel Lee, BCBA",
];

const FIRST_NAMES: &[&str] = &[
    "Liam", "Olivia", "Noah", "Emma", "Elijah", "Ava", "James", "Sophia", "Mateo", "Isabella",
    "Lucas", "Mia", "Ethan", "Amelia", "Aiden", "Harper", "Mason", "Evelyn", "Logan", "Aria",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Lopez",
    "Wilson", "Anderson", "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee", "Nguyen",
];

const STREETS: &[&str] = &[
    "Maple", "Oak", "Cedar", "Pine", "Elm", "Willow", "Lakeview", "Hillcrest", "Sunset", "River",
];

const STREET_SUFFIXES: &[&str] = &["St", "Ave", "Blvd", "Dr", "Ln", "Ct", "Way"];

const CITIES: &[(&str, &str)] = &[
    ("Springfield", "IL"),
    ("Riverside", "CA"),
    ("Franklin", "TN"),
    ("Greenville", "SC"),
    ("Madison", "WI"),
    ("Salem", "OR"),
    ("Fairview", "TX"),
    ("Arlington", "VA"),
];

const SESSION_DURATIONS: &[i64] = &[30, 45, 60, 75, 90, 120];

const QUARTER_HOURS: &[u32] = &[0, 15, 30, 45];

/// How many rows of each kind to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOptions {
    pub patients: usize,
    pub clinics: usize,
    pub bcbas: usize,
    pub notes: usize,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            patients: 15,
            clinics: 5,
            bcbas: 5,
            notes: 50,
        }
    }
}

/// Rows actually created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub patients: usize,
    pub clinics: usize,
    pub bcbas: usize,
    pub session_notes: usize,
}

/// Populate the database with demo data.
///
/// Clinics and BCBAs are drawn from fixed name lists without replacement, so
/// their counts are capped at the list lengths. Session notes are only created
/// when at least one patient and one BCBA exist.
pub fn seed<R: Rng + ?Sized>(services: &Services, options: &SeedOptions, rng: &mut R) -> SeedSummary {
    let patients = seed_patients(services, options.patients, rng);
    tracing::info!(count = patients.len(), "generated patients");

    let clinics = seed_named(CLINIC_NAMES, options.clinics, rng, |name, rng| {
        let clinic = Clinic::new(name).with_address(address(rng));
        services.clinics.create(&clinic)
    });
    tracing::info!(count = clinics.len(), "generated clinics");

    let bcbas = seed_named(BCBA_NAMES, options.bcbas, rng, |name, _| {
        services.bcbas.create(&Bcba::new(name))
    });
    tracing::info!(count = bcbas.len(), "generated BCBAs");

    let session_notes = seed_session_notes(services, options.notes, &patients, &clinics, &bcbas, rng);
    tracing::info!(count = session_notes, "generated session notes");

    SeedSummary {
        patients: patients.len(),
        clinics: clinics.len(),
        bcbas: bcbas.len(),
        session_notes,
    }
}

fn seed_patients<R: Rng + ?Sized>(services: &Services, count: usize, rng: &mut R) -> Vec<i64> {
    let today = Utc::now().date_naive();
    let mut ids = Vec::with_capacity(count);

    for _ in 0..count {
        let mut patient = Patient::new(
            pick(FIRST_NAMES, rng),
            pick(LAST_NAMES, rng),
            birth_date(today, rng),
        );
        patient.icd = Some(pick(ICD_CODES, rng).to_string());
        patient.address = Some(address(rng));

        if let Some(id) = created("patient", services.patients.create(&patient)) {
            tracing::debug!(id, name = %patient.full_name(), "created patient");
            ids.push(id);
        }
    }
    ids
}

fn seed_named<R, F>(names: &[&str], count: usize, rng: &mut R, mut create: F) -> Vec<i64>
where
    R: Rng + ?Sized,
    F: FnMut(&str, &mut R) -> ServiceResult<i64>,
{
    let chosen: Vec<&str> = names
        .choose_multiple(rng, count.min(names.len()))
        .copied()
        .collect();

    chosen
        .into_iter()
        .filter_map(|name| {
            let id = created(name, create(name, rng))?;
            tracing::debug!(id, name, "created record");
            Some(id)
        })
        .collect()
}

fn seed_session_notes<R: Rng + ?Sized>(
    services: &Services,
    count: usize,
    patients: &[i64],
    clinics: &[i64],
    bcbas: &[i64],
    rng: &mut R,
) -> usize {
    if patients.is_empty() || bcbas.is_empty() {
        tracing::warn!("no patients or BCBAs available, skipping session notes");
        return 0;
    }

    let now = Utc::now();
    let mut created_count = 0;

    for _ in 0..count {
        let days_ago = rng.gen_range(1..=180);
        let hour = rng.gen_range(8..=17);
        let minute = *QUARTER_HOURS.choose(rng).unwrap_or(&0);
        let apt_date = now
            .date_naive()
            .checked_sub_days(Days::new(days_ago))
            .and_then(|day| day.and_hms_opt(hour, minute, 0))
            .map(|at| at.and_utc())
            .unwrap_or(now);

        let duration = *SESSION_DURATIONS.choose(rng).unwrap_or(&60);
        let (Some(&patient), Some(&bcba)) = (patients.choose(rng), bcbas.choose(rng)) else {
            break;
        };
        let clinic = if !clinics.is_empty() && rng.gen_bool(0.9) {
            clinics.choose(rng).copied()
        } else {
            None
        };

        let result = services.session_notes.create_with_validation(
            bcba,
            patient,
            Some(note_content(rng)),
            clinic,
            Some(apt_date),
            Some(duration),
        );
        if created("session note", result).is_some() {
            created_count += 1;
        }
    }
    created_count
}

fn created(what: &str, result: ServiceResult<i64>) -> Option<i64> {
    result
        .into_result()
        .map_err(|failure| tracing::warn!(what, %failure, "failed to create seed record"))
        .ok()
}

fn pick<'a, R: Rng + ?Sized>(items: &[&'a str], rng: &mut R) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

/// A birth date for a child aged 2 to 18.
fn birth_date<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> NaiveDate {
    let age_years: u64 = rng.gen_range(2..=18);
    let days_back = age_years * 365 + rng.gen_range(0..365);
    today.checked_sub_days(Days::new(days_back)).unwrap_or(today)
}

fn address<R: Rng + ?Sized>(rng: &mut R) -> String {
    let (city, state) = CITIES.choose(rng).copied().unwrap_or(("Springfield", "IL"));
    format!(
        "{} {} {}, {}, {} {:05}",
        rng.gen_range(100..10000),
        pick(STREETS, rng),
        pick(STREET_SUFFIXES, rng),
        city,
        state,
        rng.gen_range(10000..99999)
    )
}

/// Free-text note in the style of a BCBA's session summary.
pub fn note_content<R: Rng + ?Sized>(rng: &mut R) -> String {
    match rng.gen_range(0..5) {
        0 => format!(
            "Patient worked on communication goals during this session. Demonstrated improved \
             eye contact and joint attention skills. Completed {} trials of requesting preferred \
             items with {}% accuracy. Used {} prompting and provided {} reinforcement. Patient \
             showed {} throughout the session. Next session will focus on {}.",
            rng.gen_range(5..=20),
            rng.gen_range(60..=95),
            pick(&["minimal", "moderate", "full physical", "gestural", "verbal"], rng),
            pick(
                &["verbal praise", "preferred items", "token reinforcement", "social reinforcement"],
                rng
            ),
            pick(
                &["excellent engagement", "good cooperation", "some resistance initially", "high motivation"],
                rng
            ),
            pick(
                &["expressive language", "receptive language", "social skills", "academic readiness"],
                rng
            ),
        ),
        1 => format!(
            "Session focused on social skills development. Patient engaged in {} for {} minutes \
             with minimal prompting. Demonstrated appropriate turn-taking behavior {}. Worked on \
             greeting peers and adults with {}% independence. {}. Plan to continue working on \
             social initiation in next session.",
            pick(&["structured play", "turn-taking games", "group activities", "peer interaction"], rng),
            rng.gen_range(10..=30),
            pick(&["3/5 opportunities", "4/6 trials", "7/10 attempts", "2/3 instances"], rng),
            rng.gen_range(70..=95),
            pick(
                &[
                    "No challenging behaviors observed",
                    "Brief tantrum at transition (2 minutes)",
                    "Mild attention seeking behavior",
                ],
                rng
            ),
        ),
        2 => format!(
            "Behavioral intervention session completed. Target behaviors: {}. Patient displayed \
             {} and required intervention for {}. Used {} with good results. Data collected \
             shows {}. Recommend continuing current behavior plan with {}.",
            pick(
                &["aggression, non-compliance", "tantrums, self-stimming", "attention seeking, disruption"],
                rng
            ),
            pick(&["following instructions", "appropriate communication", "calm transitions"], rng),
            pick(&["brief non-compliance", "attention seeking", "minimal disruption"], rng),
            pick(
                &["positive reinforcement", "planned ignoring", "redirection", "token economy"],
                rng
            ),
            pick(
                &[
                    "20% reduction in target behaviors",
                    "improvement in compliance",
                    "increased appropriate communication",
                ],
                rng
            ),
            pick(&["slight adjustments", "increased reinforcement schedule", "no changes needed"], rng),
        ),
        3 => format!(
            "Academic readiness skills session. Worked on {} with {} success. Patient completed \
             {} tasks independently and required assistance with {}. Attention span was {} \
             lasting approximately {} minutes. {}",
            pick(&["letter recognition", "number identification", "shape sorting", "color matching"], rng),
            pick(&["high", "moderate", "emerging"], rng),
            rng.gen_range(3..=10),
            pick(&["fine motor tasks", "complex instructions", "sequencing activities"], rng),
            pick(&["excellent", "good", "variable", "improving"], rng),
            rng.gen_range(5..=25),
            pick(
                &["Great session overall!", "Continue current strategies.", "Consider increasing difficulty."],
                rng
            ),
        ),
        _ => format!(
            "Play-based intervention session. Patient engaged in {} and demonstrated {}. Social \
             engagement improved with {}. Motor skills practice included {} with {}. Patient \
             showed {} emotional regulation throughout session. Next session will incorporate {}.",
            pick(&["puzzle completion", "building blocks", "pretend play", "sensory activities"], rng),
            pick(&["improved sharing", "better turn-taking", "increased creativity"], rng),
            pick(&["peer interaction", "eye contact", "joint attention"], rng),
            pick(
                &["cutting with scissors", "writing practice", "ball skills", "gross motor games"],
                rng
            ),
            pick(&["good progress", "some improvement", "continued practice needed"], rng),
            pick(&["excellent", "good", "improved", "variable"], rng),
            pick(&["new sensory activities", "advanced social games", "academic challenges"], rng),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use chrono::Timelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn services() -> Services {
        Services::new(&Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_created_drops_failures() {
        assert_eq!(created("patient", ServiceResult::success(3)), Some(3));
        assert_eq!(created("patient", ServiceResult::internal_error("disk full")), None);
    }

    #[test]
    fn test_seed_default_counts() {
        let services = services();
        let mut rng = StdRng::seed_from_u64(7);

        let summary = seed(&services, &SeedOptions::default(), &mut rng);
        assert_eq!(
            summary,
            SeedSummary {
                patients: 15,
                clinics: 5,
                bcbas: 5,
                session_notes: 50,
            }
        );
        assert_eq!(services.session_notes.get_all().into_data().unwrap().len(), 50);
    }

    #[test]
    fn test_named_counts_capped_by_lists() {
        let services = services();
        let mut rng = StdRng::seed_from_u64(1);
        let options = SeedOptions {
            patients: 1,
            clinics: 40,
            bcbas: 40,
            notes: 0,
        };

        let summary = seed(&services, &options, &mut rng);
        assert_eq!(summary.clinics, CLINIC_NAMES.len());
        assert_eq!(summary.bcbas, BCBA_NAMES.len());
    }

    #[test]
    fn test_no_notes_without_bcbas() {
        let services = services();
        let mut rng = StdRng::seed_from_u64(3);
        let options = SeedOptions {
            bcbas: 0,
            ..SeedOptions::default()
        };

        assert_eq!(seed(&services, &options, &mut rng).session_notes, 0);
    }

    #[test]
    fn test_seeded_notes_in_business_hours() {
        let services = services();
        let mut rng = StdRng::seed_from_u64(11);
        seed(&services, &SeedOptions::default(), &mut rng);

        let now = Utc::now();
        for note in services.session_notes.get_all().into_data().unwrap() {
            assert!((8..=17).contains(&note.apt_date.hour()));
            assert_eq!(note.apt_date.minute() % 15, 0);
            assert!(note.apt_date < now);
            assert!(SESSION_DURATIONS.contains(&note.duration.unwrap()));
            assert!(note.notes.is_some());
        }
    }

    #[test]
    fn test_patients_are_children() {
        let services = services();
        let mut rng = StdRng::seed_from_u64(5);
        seed(&services, &SeedOptions::default(), &mut rng);

        let today = Utc::now().date_naive();
        for patient in services.patients.get_all().into_data().unwrap() {
            let age_days = (today - patient.dob).num_days();
            assert!((2 * 365..19 * 365).contains(&age_days));
            assert!(ICD_CODES.contains(&patient.icd.as_deref().unwrap()));
        }
    }
}
