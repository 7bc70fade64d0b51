use rand::rngs::mock::StepRng;
use secureprofile_core::db::open_session_db;
use secureprofile_core::repo::seed::load_seed_profiles;
use secureprofile_core::time::now_epoch_ms;
use secureprofile_core::{
    ExportFormat, ExportOptions, Gender, NotificationKind, NotificationStore, Profile,
    ProfileDraft, ProfileListQuery, ProfileRepository, ProfileService, ProfileServiceError,
    ProfileStatus, RefreshOutcome, RepoError, SqliteProfileRepository, StatusFilter,
    ToastSurface,
};
use rusqlite::Connection;
use std::time::Duration;
use uuid::Uuid;

const NOW_MS: i64 = 1_700_000_000_000;

fn seeded_conn() -> Connection {
    let conn = open_session_db().unwrap();
    load_seed_profiles(&SqliteProfileRepository::new(&conn), NOW_MS).unwrap();
    conn
}

fn draft(name: &str) -> ProfileDraft {
    ProfileDraft {
        name: name.to_string(),
        gender: Some(Gender::Female),
        age: Some(30),
        entry_point: "West Sector".to_string(),
        entry_date: Some("2024-03-01".to_string()),
        occupation: "Pilot".to_string(),
        ..ProfileDraft::default()
    }
}

#[test]
fn seed_listing_is_sorted_by_last_updated() {
    let conn = seeded_conn();
    let service = ProfileService::new(SqliteProfileRepository::new(&conn));

    let listing = service.list("", StatusFilter::All).unwrap();
    assert_eq!(listing.total, 7);
    let names: Vec<&str> = listing.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names.first(), Some(&"John Smith"));
    assert_eq!(names.last(), Some(&"Carlos Rodriguez"));
}

#[test]
fn search_matches_any_text_column_case_insensitively() {
    let conn = seeded_conn();
    let service = ProfileService::new(SqliteProfileRepository::new(&conn));

    let by_sector = service.list("NORTH sector", StatusFilter::All).unwrap();
    assert_eq!(by_sector.items.len(), 2);

    let by_alias = service.list("mg", StatusFilter::All).unwrap();
    assert_eq!(by_alias.items.len(), 1);
    assert_eq!(by_alias.items[0].name, "Maria Garcia");

    let by_occupation = service.list("doctor", StatusFilter::All).unwrap();
    assert_eq!(by_occupation.items[0].name, "Sarah Johnson");

    assert_eq!(
        service.search_summary("khan", StatusFilter::All).unwrap(),
        "Found 1 profiles matching \"khan\""
    );
}

#[test]
fn status_filter_combines_with_search() {
    let conn = seeded_conn();
    let service = ProfileService::new(SqliteProfileRepository::new(&conn));

    let investigated = service
        .list("", StatusFilter::Only(ProfileStatus::UnderInvestigation))
        .unwrap();
    assert_eq!(investigated.items.len(), 2);

    let south_pending = service
        .list("south", StatusFilter::Only(ProfileStatus::PendingVerification))
        .unwrap();
    assert!(south_pending.items.is_empty());
}

#[test]
fn search_treats_wildcards_literally() {
    let conn = seeded_conn();
    let service = ProfileService::new(SqliteProfileRepository::new(&conn));
    assert!(service.list("%", StatusFilter::All).unwrap().items.is_empty());
}

#[test]
fn search_folds_case_beyond_ascii() {
    let conn = seeded_conn();
    let mut service = ProfileService::new(SqliteProfileRepository::new(&conn));
    let mut store = NotificationStore::new();
    let created = service
        .create_from_draft(&draft("Émile Örsted"), &mut store)
        .unwrap();
    assert_eq!(created.alias, "ÉÖ");

    for term in ["Émile", "émile", "ÉMILE", "örsted"] {
        let found = service.list(term, StatusFilter::All).unwrap().items;
        assert_eq!(found.len(), 1, "term {term}");
        assert_eq!(found[0].id, created.id);
    }
    assert_eq!(
        service.search_summary("ÖRSTED", StatusFilter::All).unwrap(),
        "Found 1 profiles matching \"ÖRSTED\""
    );
}

#[test]
fn search_paginates_after_matching() {
    let conn = seeded_conn();
    let repo = SqliteProfileRepository::new(&conn);
    let all = repo
        .list_profiles(&ProfileListQuery {
            search: Some("a".to_string()),
            ..ProfileListQuery::default()
        })
        .unwrap();
    let page = repo
        .list_profiles(&ProfileListQuery {
            search: Some("a".to_string()),
            limit: Some(2),
            offset: 1,
            ..ProfileListQuery::default()
        })
        .unwrap();
    assert!(all.len() > 3);
    assert_eq!(page, all[1..3].to_vec());
}

#[test]
fn create_from_draft_persists_and_notifies() {
    let conn = seeded_conn();
    let mut service = ProfileService::new(SqliteProfileRepository::new(&conn));
    let mut store = NotificationStore::new();

    let created = service
        .create_from_draft(&draft("Amira Haddad"), &mut store)
        .unwrap();
    assert_eq!(created.alias, "AH");
    assert_eq!(service.list("", StatusFilter::All).unwrap().total, 8);

    let latest = store.latest().expect("notification should exist");
    assert_eq!(latest.kind, NotificationKind::Success);
    assert_eq!(latest.title, "Profile Created");
    assert_eq!(store.unread_count(), 1);
}

#[test]
fn invalid_draft_is_rejected_without_notification() {
    let conn = seeded_conn();
    let mut service = ProfileService::new(SqliteProfileRepository::new(&conn));
    let mut store = NotificationStore::new();

    let err = service
        .create_from_draft(&draft("   "), &mut store)
        .unwrap_err();
    assert!(matches!(err, ProfileServiceError::Validation(_)));
    assert!(store.is_empty());
}

#[test]
fn update_from_draft_mentions_profile_id() {
    let conn = seeded_conn();
    let mut service = ProfileService::new(SqliteProfileRepository::new(&conn));
    let mut store = NotificationStore::new();
    let target = service.list("li wei", StatusFilter::All).unwrap().items[0].clone();

    let mut changes = draft("Li Wei");
    changes.occupation = "Graduate".to_string();
    let updated = service
        .update_from_draft(target.id, &changes, &mut store)
        .unwrap();
    assert_eq!(updated.occupation, "Graduate");
    assert_eq!(
        store.latest().map(|n| n.message.clone()),
        Some(format!("Profile #{} has been successfully updated.", target.id))
    );
}

#[test]
fn update_unknown_profile_returns_not_found() {
    let conn = seeded_conn();
    let mut service = ProfileService::new(SqliteProfileRepository::new(&conn));
    let mut store = NotificationStore::new();
    let missing = Uuid::new_v4();

    let err = service
        .update_from_draft(missing, &draft("Nobody"), &mut store)
        .unwrap_err();
    assert!(matches!(err, ProfileServiceError::ProfileNotFound(id) if id == missing));
}

#[test]
fn export_counts_selection_or_everything() {
    let conn = seeded_conn();
    let mut service = ProfileService::new(SqliteProfileRepository::new(&conn));
    let mut store = NotificationStore::new();

    let all = service
        .export(ExportFormat::Pdf, ExportOptions::default(), &mut store)
        .unwrap();
    assert_eq!(all.profile_count, 7);
    assert_eq!(
        store.latest().map(|n| n.message.as_str()),
        Some("7 profiles have been exported to PDF format.")
    );

    let items = service.list("", StatusFilter::All).unwrap().items;
    assert!(service.toggle_selection(items[0].id).unwrap());
    assert!(service.toggle_selection(items[1].id).unwrap());
    assert!(!service.toggle_selection(items[1].id).unwrap());
    assert_eq!(service.selected_count(), 1);

    let selected = service
        .export(ExportFormat::Csv, ExportOptions::default(), &mut store)
        .unwrap();
    assert_eq!(selected.profile_count, 1);
    assert_eq!(store.len(), 2);
}

#[test]
fn toggle_selection_rejects_unknown_profile() {
    let conn = seeded_conn();
    let mut service = ProfileService::new(SqliteProfileRepository::new(&conn));
    let err = service.toggle_selection(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, ProfileServiceError::ProfileNotFound(_)));
}

#[test]
fn refresh_adds_profile_when_coin_lands_heads() {
    let conn = seeded_conn();
    let mut service = ProfileService::new(SqliteProfileRepository::new(&conn));
    let mut store = NotificationStore::new();
    let mut toasts = ToastSurface::new(Duration::from_secs(5));

    // A zero stream always passes `gen_bool(0.5)`.
    let mut heads = StepRng::new(0, 0);
    let outcome = service.refresh(&mut heads, &mut store, &mut toasts).unwrap();
    let RefreshOutcome::NewProfile(profile) = outcome else {
        panic!("expected a new profile");
    };
    assert_eq!(profile.name, "Alex Rodriguez");
    assert_eq!(
        service.list("", StatusFilter::All).unwrap().items[0].id,
        profile.id
    );
    assert_eq!(store.latest().map(|n| n.kind), Some(NotificationKind::Info));

    // A saturated stream always fails it.
    let mut tails = StepRng::new(u64::MAX, 0);
    assert_eq!(
        service.refresh(&mut tails, &mut store, &mut toasts).unwrap(),
        RefreshOutcome::Unchanged
    );
    assert_eq!(store.len(), 1);

    let toast = toasts
        .current(now_epoch_ms())
        .expect("refresh toast should be visible");
    assert_eq!(toast.title, "Data Refreshed");
    assert_eq!(toast.description, "Profile data has been updated.");
}

#[test]
fn export_form_toasts_and_notifies_pdf() {
    let conn = seeded_conn();
    let service = ProfileService::new(SqliteProfileRepository::new(&conn));
    let mut store = NotificationStore::new();
    let mut toasts = ToastSurface::new(Duration::from_secs(5));

    let report = service.export_form(&draft("Amira Haddad"), &mut store, &mut toasts);
    assert_eq!(report.format, ExportFormat::Pdf);
    assert_eq!(report.profile_count, 1);

    assert_eq!(toasts.shown_count(), 2);
    let toast = toasts
        .current(now_epoch_ms())
        .expect("export toast should be visible");
    assert_eq!(toast.title, "Export Complete");

    let latest = store.latest().expect("notification should exist");
    assert_eq!(latest.kind, NotificationKind::Success);
    assert_eq!(latest.title, "Export Complete");
    assert_eq!(latest.message, "Profile data has been exported to PDF format.");
    assert_eq!(store.len(), 1);
}

#[test]
fn repository_update_missing_row_returns_not_found() {
    let conn = open_session_db().unwrap();
    let repo = SqliteProfileRepository::new(&conn);
    let profile = Profile::new("Ghost", Gender::Other, 40);
    assert!(matches!(
        repo.update_profile(&profile),
        Err(RepoError::NotFound(id)) if id == profile.id
    ));
}

#[test]
fn repository_rejects_invalid_stored_status() {
    let conn = seeded_conn();
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute("UPDATE profiles SET status = 'archived';", [])
        .unwrap();

    let repo = SqliteProfileRepository::new(&conn);
    assert!(matches!(
        repo.list_profiles(&ProfileListQuery::default()),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn repository_paginates_with_limit_and_offset() {
    let conn = seeded_conn();
    let repo = SqliteProfileRepository::new(&conn);
    let page = repo
        .list_profiles(&ProfileListQuery {
            limit: Some(2),
            offset: 1,
            ..ProfileListQuery::default()
        })
        .unwrap();
    let names: Vec<&str> = page.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Maria Garcia", "Ahmed Khan"]);
}
