//! Generic matrix editor driven entirely by a `MatrixSchema`.
//!
//! # Responsibility
//! - Project a record collection into a table (schema columns + actions).
//! - Hold the transient draft for one shared create/edit form.
//! - Turn user actions into `MatrixIntent`s for the application shell.
//!
//! # Invariants
//! - The editor never owns canonical data; it only emits intents.
//! - Draft keys are always a subset of the schema's column keys.
//! - Closing the form (save or cancel) discards the draft.
//! - No field value is validated; an all-blank draft is a valid save.

use crate::model::record::{MatrixRow, RecordFields, RecordId};
use crate::schema::{InputMode, MatrixSchema};
use log::debug;

/// Marker shown instead of table rows when a collection is empty.
pub const EMPTY_TABLE_MARKER: &str = "No entries found. Click \"Add Entry\" to begin.";
/// Header of the trailing action column.
pub const ACTIONS_HEADER: &str = "Actions";

/// Mutation requested by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixIntent {
    /// Append a new record; the shell generates the identifier.
    Add { fields: RecordFields },
    /// Replace all fields of the record with `id`.
    Edit { id: RecordId, fields: RecordFields },
    /// Remove the record with `id`.
    Delete { id: RecordId },
}

/// Whether the open form creates or edits a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(RecordId),
}

#[derive(Debug, Clone)]
struct OpenForm {
    mode: EditorMode,
    draft: RecordFields,
}

/// Table projection of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorTable {
    /// Column labels in schema order, then `ACTIONS_HEADER`.
    pub headers: Vec<&'static str>,
    pub body: EditorTableBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorTableBody {
    Empty(&'static str),
    Rows(Vec<EditorTableRow>),
}

/// One table row; `cells` align with the schema columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorTableRow {
    pub id: RecordId,
    pub cells: Vec<String>,
}

/// Form projection of the open draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorForm {
    pub title: &'static str,
    pub mode: EditorMode,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: Option<&'static str>,
    pub input: InputMode,
    pub value: String,
}

/// Schema-driven editor for one matrix.
///
/// Hosts keep one editor per visible matrix and feed emitted intents to
/// `AppShell::apply`.
#[derive(Debug, Clone)]
pub struct MatrixEditor<'s> {
    schema: &'s MatrixSchema,
    form: Option<OpenForm>,
}

impl<'s> MatrixEditor<'s> {
    pub fn new(schema: &'s MatrixSchema) -> Self {
        Self { schema, form: None }
    }

    pub fn schema(&self) -> &'s MatrixSchema {
        self.schema
    }

    pub fn is_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn mode(&self) -> Option<EditorMode> {
        self.form.as_ref().map(|form| form.mode)
    }

    /// Current draft, if a form is open.
    pub fn draft(&self) -> Option<&RecordFields> {
        self.form.as_ref().map(|form| &form.draft)
    }

    /// Opens an empty form in create mode.
    pub fn open_add(&mut self) {
        self.form = Some(OpenForm {
            mode: EditorMode::Create,
            draft: RecordFields::new(),
        });
    }

    /// Opens the form in edit mode, seeded with the row's current values.
    pub fn open_edit(&mut self, row: &MatrixRow) {
        let draft = self
            .schema
            .keys()
            .map(|key| (key.to_string(), row.value(key).to_string()))
            .collect();
        self.form = Some(OpenForm {
            mode: EditorMode::Edit(row.id),
            draft,
        });
    }

    /// Sets one draft field.
    ///
    /// Ignored when no form is open or `key` is not a schema column.
    pub fn change_field(&mut self, key: &str, value: impl Into<String>) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if self.schema.column(key).is_none() {
            debug!(
                "event=editor_change module=editor status=ignored matrix={} key={}",
                self.schema.kind, key
            );
            return;
        }
        form.draft.insert(key.to_string(), value.into());
    }

    /// Closes the form and emits the add/edit intent for the draft.
    ///
    /// Returns `None` when no form was open.
    pub fn save(&mut self) -> Option<MatrixIntent> {
        let form = self.form.take()?;
        let intent = match form.mode {
            EditorMode::Create => MatrixIntent::Add { fields: form.draft },
            EditorMode::Edit(id) => MatrixIntent::Edit {
                id,
                fields: form.draft,
            },
        };
        Some(intent)
    }

    /// Closes the form without emitting anything.
    pub fn cancel(&mut self) {
        self.form = None;
    }

    /// Emits an immediate delete intent. No confirmation step.
    pub fn delete(&self, id: RecordId) -> MatrixIntent {
        MatrixIntent::Delete { id }
    }

    /// Projects rows into the editor table.
    pub fn table(&self, rows: &[MatrixRow]) -> EditorTable {
        let mut headers = self
            .schema
            .columns
            .iter()
            .map(|column| column.label)
            .collect::<Vec<_>>();
        headers.push(ACTIONS_HEADER);

        let body = if rows.is_empty() {
            EditorTableBody::Empty(EMPTY_TABLE_MARKER)
        } else {
            EditorTableBody::Rows(
                rows.iter()
                    .map(|row| EditorTableRow {
                        id: row.id,
                        cells: self
                            .schema
                            .keys()
                            .map(|key| row.value(key).to_string())
                            .collect(),
                    })
                    .collect(),
            )
        };

        EditorTable { headers, body }
    }

    /// Projects the open draft into form fields, or `None` when closed.
    pub fn form(&self) -> Option<EditorForm> {
        let form = self.form.as_ref()?;
        let title = match form.mode {
            EditorMode::Create => "New Entry",
            EditorMode::Edit(_) => "Edit Entry",
        };
        let fields = self
            .schema
            .columns
            .iter()
            .map(|column| FormField {
                key: column.key,
                label: column.label,
                placeholder: column.placeholder,
                input: column.input,
                value: form.draft.get(column.key).cloned().unwrap_or_default(),
            })
            .collect();
        Some(EditorForm {
            title,
            mode: form.mode,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{EditorMode, EditorTableBody, MatrixEditor, MatrixIntent, EMPTY_TABLE_MARKER};
    use crate::model::record::{MatrixRow, RecordFields};
    use crate::schema::{ColumnDescriptor, InputMode, MatrixSchema, TECHNICAL_SCHEMA};
    use crate::MatrixKind;
    use uuid::Uuid;

    fn row(subject: &str) -> MatrixRow {
        let mut fields = RecordFields::new();
        fields.insert("subject".to_string(), subject.to_string());
        fields.insert("object".to_string(), "Vol X".to_string());
        fields.insert("permission".to_string(), "Read".to_string());
        MatrixRow {
            id: Uuid::new_v4(),
            fields,
        }
    }

    #[test]
    fn open_add_then_save_emits_add_with_draft() {
        let mut editor = MatrixEditor::new(&TECHNICAL_SCHEMA);
        editor.open_add();
        editor.change_field("subject", "Admins");
        let intent = editor.save().expect("open form should save");

        let MatrixIntent::Add { fields } = intent else {
            panic!("expected add intent");
        };
        assert_eq!(fields.get("subject").map(String::as_str), Some("Admins"));
        assert_eq!(fields.len(), 1);
        assert!(!editor.is_open());
    }

    #[test]
    fn blank_draft_saves_without_validation() {
        let mut editor = MatrixEditor::new(&TECHNICAL_SCHEMA);
        editor.open_add();
        assert_eq!(
            editor.save(),
            Some(MatrixIntent::Add {
                fields: RecordFields::new()
            })
        );
    }

    #[test]
    fn open_edit_seeds_draft_and_save_emits_full_replacement() {
        let existing = row("Admins");
        let mut editor = MatrixEditor::new(&TECHNICAL_SCHEMA);
        editor.open_edit(&existing);
        assert_eq!(editor.mode(), Some(EditorMode::Edit(existing.id)));

        editor.change_field("permission", "Read, Write");
        let intent = editor.save().unwrap();
        let MatrixIntent::Edit { id, fields } = intent else {
            panic!("expected edit intent");
        };
        assert_eq!(id, existing.id);
        assert_eq!(fields["subject"], "Admins");
        assert_eq!(fields["object"], "Vol X");
        assert_eq!(fields["permission"], "Read, Write");
    }

    #[test]
    fn reopening_add_clears_previous_draft() {
        let mut editor = MatrixEditor::new(&TECHNICAL_SCHEMA);
        editor.open_edit(&row("Admins"));
        editor.open_add();
        assert!(editor.draft().unwrap().is_empty());
        assert_eq!(editor.mode(), Some(EditorMode::Create));
    }

    #[test]
    fn change_field_ignores_unknown_keys_and_closed_form() {
        let mut editor = MatrixEditor::new(&TECHNICAL_SCHEMA);
        editor.change_field("subject", "nobody home");
        assert!(editor.draft().is_none());

        editor.open_add();
        editor.change_field("partner", "AWS");
        assert!(editor.draft().unwrap().is_empty());
    }

    #[test]
    fn save_and_cancel_on_closed_form() {
        let mut editor = MatrixEditor::new(&TECHNICAL_SCHEMA);
        assert_eq!(editor.save(), None);

        editor.open_add();
        editor.change_field("subject", "x");
        editor.cancel();
        assert!(!editor.is_open());
        assert_eq!(editor.save(), None);
    }

    #[test]
    fn delete_emits_intent_without_touching_form() {
        let mut editor = MatrixEditor::new(&TECHNICAL_SCHEMA);
        editor.open_add();
        let id = Uuid::new_v4();
        assert_eq!(editor.delete(id), MatrixIntent::Delete { id });
        assert!(editor.is_open());
    }

    #[test]
    fn table_uses_schema_columns_plus_actions() {
        let editor = MatrixEditor::new(&TECHNICAL_SCHEMA);
        let empty = editor.table(&[]);
        assert_eq!(
            empty.headers,
            vec!["Subject", "Object/Resource", "Permissions", "Actions"]
        );
        assert_eq!(empty.body, EditorTableBody::Empty(EMPTY_TABLE_MARKER));

        let rows = vec![row("A"), row("B")];
        let table = editor.table(&rows);
        let EditorTableBody::Rows(table_rows) = table.body else {
            panic!("expected rows");
        };
        assert_eq!(table_rows.len(), 2);
        assert_eq!(table_rows[1].id, rows[1].id);
        assert_eq!(table_rows[1].cells, vec!["B", "Vol X", "Read"]);
    }

    #[test]
    fn form_projects_choice_columns_from_schema() {
        static CHOICES: MatrixSchema = MatrixSchema {
            kind: MatrixKind::Technical,
            title: "t",
            description: "d",
            educational_note: None,
            columns: &[ColumnDescriptor {
                key: "permission",
                label: "Permissions",
                placeholder: None,
                input: InputMode::Choice(&["Read", "Write"]),
            }],
        };
        let mut editor = MatrixEditor::new(&CHOICES);
        assert!(editor.form().is_none());

        editor.open_add();
        editor.change_field("permission", "Execute");
        let form = editor.form().unwrap();
        assert_eq!(form.title, "New Entry");
        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.fields[0].input, InputMode::Choice(&["Read", "Write"]));
        assert_eq!(form.fields[0].value, "Execute");
    }
}
