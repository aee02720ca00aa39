use acm_core::db::{open_db, open_db_in_memory};
use acm_core::{
    today_utc, AppShell, AppState, BlobRepository, MatrixKind, MetadataField, RecordFields,
    SqliteBlobRepository, STORAGE_KEY,
};
use chrono::NaiveDate;

fn fields(pairs: &[(&str, &str)]) -> RecordFields {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn missing_blob_starts_with_empty_state() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::try_new(&conn).unwrap();
    let shell = AppShell::open(repo).unwrap();

    assert_eq!(shell.state(), &AppState::default());
}

#[test]
fn state_survives_reopen_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("acm.sqlite3");

    let expected = {
        let conn = open_db(&db_path).unwrap();
        let repo = SqliteBlobRepository::try_new(&conn).unwrap();
        let mut shell = AppShell::open(repo).unwrap();
        shell
            .set_metadata_field(MetadataField::Facilities, "HQ (New York)\nDC (Virginia)")
            .unwrap();
        shell
            .add(MatrixKind::Technical, &fields(&[("subject", "Admins")]))
            .unwrap();
        shell
            .add(
                MatrixKind::Shared,
                &fields(&[("subject", "MSP Admin"), ("partner", "AWS")]),
            )
            .unwrap();
        shell
            .add(
                MatrixKind::CmmcModel,
                &fields(&[("subjectId", "Role-DBA-01"), ("evidenceLink", "Policy.pdf")]),
            )
            .unwrap();
        shell.state().clone()
    };

    let conn = open_db(&db_path).unwrap();
    let repo = SqliteBlobRepository::try_new(&conn).unwrap();
    let reopened = AppShell::open(repo).unwrap();
    assert_eq!(reopened.state(), &expected);
}

#[test]
fn blob_round_trip_preserves_every_field() {
    let mut state = AppState::default();
    for field in MetadataField::ALL {
        let value = format!("{} «ü» | \"q\"", field.wire_name());
        state.metadata = state.metadata.with_field(field, value);
    }
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::try_new(&conn).unwrap();
    let mut shell = AppShell::open(&repo).unwrap();
    for field in MetadataField::ALL {
        shell
            .set_metadata_field(field, state.metadata.get(field))
            .unwrap();
    }
    shell
        .add(MatrixKind::CmmcModel, &fields(&[("justification", "")]))
        .unwrap();

    let decoded = AppState::from_blob(&shell.state().to_blob().unwrap()).unwrap();
    assert_eq!(&decoded, shell.state());
    assert_eq!(decoded.metadata, state.metadata);
}

#[test]
fn browser_saved_blob_loads_including_keyless_records() {
    let blob = r#"{
      "metadata": {
        "organizationName": "Acme Cyber Defense",
        "author": "",
        "facilities": "HQ",
        "dateCompleted": "2025-02-01",
        "nextReviewDate": ""
      },
      "techEntries": [
        {"id": "0b9b4a4e-3c1f-4b8e-9d55-5c8f2f1f9a10", "subject": "Admins", "object": "Vol X", "permission": "Read"}
      ],
      "sharedEntries": [
        {"id": "6f1c1d2a-7a3b-4f41-8a9e-3b2c1d0e9f87"}
      ],
      "cmmcEntries": []
    }"#;

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::try_new(&conn).unwrap();
    repo.put_blob(STORAGE_KEY, blob).unwrap();

    let shell = AppShell::open(&repo).unwrap();
    let state = shell.state();
    assert_eq!(state.metadata.organization_name, "Acme Cyber Defense");
    assert_eq!(state.tech_entries[0].subject, "Admins");
    assert_eq!(state.shared_entries.len(), 1);
    assert_eq!(state.shared_entries[0].partner, "");
    assert!(state.cmmc_entries.is_empty());
}

#[test]
fn export_contents_equal_persisted_blob() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::try_new(&conn).unwrap();
    let mut shell = AppShell::open(&repo).unwrap();
    shell
        .add(MatrixKind::Technical, &fields(&[("subject", "Admins")]))
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
    let export = shell.export(date).unwrap();
    assert_eq!(export.file_name, "cmmc-acm-report-2025-06-30.json");
    assert_eq!(
        Some(export.contents.clone()),
        repo.get_blob(STORAGE_KEY).unwrap()
    );

    // An export file can seed a fresh store.
    let other_conn = open_db_in_memory().unwrap();
    let other_repo = SqliteBlobRepository::try_new(&other_conn).unwrap();
    other_repo.put_blob(STORAGE_KEY, &export.contents).unwrap();
    let restored = AppShell::open(other_repo).unwrap();
    assert_eq!(restored.state(), shell.state());
}

#[test]
fn export_writes_dated_file() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::try_new(&conn).unwrap();
    let shell = AppShell::open(repo).unwrap();

    let path = shell
        .export(today_utc())
        .unwrap()
        .write_to_dir(dir.path())
        .unwrap();
    let name = path.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("cmmc-acm-report-"));
    assert!(name.ends_with(".json"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(AppState::from_blob(&written).unwrap(), AppState::default());
}
