//! Mock profiles loaded into every new session.

use super::profile_repo::{ProfileRepository, RepoResult};
use crate::model::profile::{derive_alias, Gender, Profile, ProfileStatus};
use log::info;

const MINUTE_MS: i64 = 60_000;

struct SeedProfile {
    name: &'static str,
    gender: Gender,
    age: u32,
    entry_point: &'static str,
    entry_date: &'static str,
    occupation: &'static str,
    criminal_background: bool,
    status: ProfileStatus,
    minutes_ago: i64,
}

const SEED_PROFILES: &[SeedProfile] = &[
    SeedProfile {
        name: "John Smith",
        gender: Gender::Male,
        age: 32,
        entry_point: "North Sector",
        entry_date: "2023-10-15",
        occupation: "Engineer",
        criminal_background: false,
        status: ProfileStatus::Active,
        minutes_ago: 2,
    },
    SeedProfile {
        name: "Maria Garcia",
        gender: Gender::Female,
        age: 28,
        entry_point: "East Sector",
        entry_date: "2023-11-22",
        occupation: "Teacher",
        criminal_background: false,
        status: ProfileStatus::Active,
        minutes_ago: 5,
    },
    SeedProfile {
        name: "Ahmed Khan",
        gender: Gender::Male,
        age: 35,
        entry_point: "South Sector",
        entry_date: "2023-09-05",
        occupation: "Businessman",
        criminal_background: true,
        status: ProfileStatus::UnderInvestigation,
        minutes_ago: 10,
    },
    SeedProfile {
        name: "Sarah Johnson",
        gender: Gender::Female,
        age: 41,
        entry_point: "West Sector",
        entry_date: "2023-12-10",
        occupation: "Doctor",
        criminal_background: false,
        status: ProfileStatus::Active,
        minutes_ago: 15,
    },
    SeedProfile {
        name: "Li Wei",
        gender: Gender::Male,
        age: 29,
        entry_point: "North Sector",
        entry_date: "2024-01-18",
        occupation: "Student",
        criminal_background: false,
        status: ProfileStatus::PendingVerification,
        minutes_ago: 20,
    },
    SeedProfile {
        name: "Elena Petrova",
        gender: Gender::Female,
        age: 33,
        entry_point: "East Sector",
        entry_date: "2024-02-05",
        occupation: "Researcher",
        criminal_background: false,
        status: ProfileStatus::Active,
        minutes_ago: 25,
    },
    SeedProfile {
        name: "Carlos Rodriguez",
        gender: Gender::Male,
        age: 45,
        entry_point: "South Sector",
        entry_date: "2024-01-30",
        occupation: "Consultant",
        criminal_background: true,
        status: ProfileStatus::UnderInvestigation,
        minutes_ago: 30,
    },
];

/// Builds the mock listing relative to `now_ms`, most recently updated first.
pub fn seed_profiles(now_ms: i64) -> Vec<Profile> {
    SEED_PROFILES
        .iter()
        .map(|seed| {
            let mut profile = Profile::new(seed.name, seed.gender, seed.age);
            profile.alias = derive_alias(seed.name);
            profile.entry_point = seed.entry_point.to_string();
            profile.entry_date = seed.entry_date.to_string();
            profile.occupation = seed.occupation.to_string();
            profile.criminal_background = seed.criminal_background;
            profile.status = seed.status;
            profile.last_updated_ms = now_ms - seed.minutes_ago * MINUTE_MS;
            profile
        })
        .collect()
}

/// Inserts the mock listing into `repo`. Returns the number of rows created.
pub fn load_seed_profiles<R: ProfileRepository>(repo: &R, now_ms: i64) -> RepoResult<usize> {
    let profiles = seed_profiles(now_ms);
    for profile in &profiles {
        repo.create_profile(profile)?;
    }
    info!(
        "event=seed_load module=repo status=ok profiles={}",
        profiles.len()
    );
    Ok(profiles.len())
}
