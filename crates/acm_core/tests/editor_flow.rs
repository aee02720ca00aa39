use acm_core::db::open_db_in_memory;
use acm_core::{
    schema_for, AppShell, EditorTableBody, MatrixEditor, MatrixIntent, MatrixKind,
    SqliteBlobRepository,
};

#[test]
fn editor_intents_drive_shell_through_full_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::try_new(&conn).unwrap();
    let mut shell = AppShell::open(repo).unwrap();
    let mut editor = MatrixEditor::new(schema_for(MatrixKind::Shared));

    let table = editor.table(&shell.rows(MatrixKind::Shared));
    assert!(matches!(table.body, EditorTableBody::Empty(_)));

    editor.open_add();
    editor.change_field("subject", "MSP Admin");
    editor.change_field("object", "Hosted Exchange Server");
    editor.change_field("permission", "Full Control");
    editor.change_field("partner", "Microsoft 365");
    let intent = editor.save().unwrap();
    let id = shell
        .apply(MatrixKind::Shared, intent)
        .unwrap()
        .expect("add intent returns the generated id");

    let rows = shell.rows(MatrixKind::Shared);
    editor.open_edit(&rows[0]);
    editor.change_field("partner", "AWS");
    let intent = editor.save().unwrap();
    assert!(matches!(intent, MatrixIntent::Edit { id: edit_id, .. } if edit_id == id));
    assert_eq!(shell.apply(MatrixKind::Shared, intent).unwrap(), None);

    let entry = &shell.state().shared_entries[0];
    assert_eq!(entry.id, id);
    assert_eq!(entry.subject, "MSP Admin");
    assert_eq!(entry.partner, "AWS");

    let table = editor.table(&shell.rows(MatrixKind::Shared));
    let EditorTableBody::Rows(table_rows) = table.body else {
        panic!("expected one row");
    };
    assert_eq!(
        table_rows[0].cells,
        vec!["MSP Admin", "Hosted Exchange Server", "Full Control", "AWS"]
    );

    shell
        .apply(MatrixKind::Shared, editor.delete(id))
        .unwrap();
    assert!(shell.rows(MatrixKind::Shared).is_empty());
}

#[test]
fn blank_draft_creates_blank_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::try_new(&conn).unwrap();
    let mut shell = AppShell::open(repo).unwrap();
    let mut editor = MatrixEditor::new(schema_for(MatrixKind::CmmcModel));

    editor.open_add();
    let intent = editor.save().unwrap();
    shell.apply(MatrixKind::CmmcModel, intent).unwrap();

    let entry = &shell.state().cmmc_entries[0];
    assert_eq!(entry.subject_id, "");
    assert_eq!(entry.evidence_link, "");
    assert!(!entry.id.is_nil());
}

#[test]
fn editing_a_record_deleted_meanwhile_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBlobRepository::try_new(&conn).unwrap();
    let mut shell = AppShell::open(repo).unwrap();
    let mut editor = MatrixEditor::new(schema_for(MatrixKind::Technical));

    editor.open_add();
    editor.change_field("subject", "Admins");
    let id = shell
        .apply(MatrixKind::Technical, editor.save().unwrap())
        .unwrap()
        .unwrap();

    editor.open_edit(&shell.rows(MatrixKind::Technical)[0]);
    shell.delete(MatrixKind::Technical, id).unwrap();
    editor.change_field("subject", "Ghost");
    shell
        .apply(MatrixKind::Technical, editor.save().unwrap())
        .unwrap();

    assert!(shell.state().tech_entries.is_empty());
}
