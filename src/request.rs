//! Assembles the multipart body for `POST /jobs/`.
//!
//! [`build`] is a pure transformation: it decides which files go out and
//! under which field names, and [`TransportPayload::into_form`] hands the
//! ordered fields to reqwest.

use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::api::SubmissionError;
use crate::options::ConversionOptions;
use crate::selection::{ConversionTarget, InputFile, InputSelection, SelectionMode};

pub const TARGET_FIELD: &str = "target";
pub const OPTIONS_FIELD: &str = "options";
/// Field carrying the upload in single-file mode.
pub const SINGLE_FILE_FIELD: &str = "file";
/// Repeated field carrying every upload in multi-file mode.
pub const MULTI_FILE_FIELD: &str = "files";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(InputFile),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub value: FieldValue,
}

/// Ordered form fields ready to be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPayload {
    fields: Vec<FormField>,
}

impl TransportPayload {
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Value of the first text field named `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.value {
            FieldValue::Text(text) if f.name == name => Some(text.as_str()),
            _ => None,
        })
    }

    /// Uploaded files with their field names, in transport order.
    pub fn files(&self) -> impl Iterator<Item = (&'static str, &InputFile)> {
        self.fields.iter().filter_map(|f| match &f.value {
            FieldValue::File(file) => Some((f.name, file)),
            FieldValue::Text(_) => None,
        })
    }

    pub fn into_form(self) -> Form {
        self.fields
            .into_iter()
            .fold(Form::new(), |form, field| match field.value {
                FieldValue::Text(text) => form.text(field.name, text),
                FieldValue::File(file) => {
                    form.part(field.name, Part::bytes(file.bytes).file_name(file.name))
                }
            })
    }
}

/// Builds the create-job payload.
///
/// The target decides the mode. In single-file mode only the first selected
/// file is sent; in multi-file mode every file is sent under
/// [`MULTI_FILE_FIELD`] in selection order.
pub fn build(
    target: &ConversionTarget,
    selection: &InputSelection,
    options: &ConversionOptions,
) -> Result<TransportPayload, SubmissionError> {
    let files = selection.files();
    if files.is_empty() {
        return Err(SubmissionError::EmptySelection);
    }

    let mut fields = vec![
        FormField {
            name: TARGET_FIELD,
            value: FieldValue::Text(target.as_str().to_string()),
        },
        FormField {
            name: OPTIONS_FIELD,
            value: FieldValue::Text(options.to_json()),
        },
    ];

    match target.mode() {
        SelectionMode::Single => {
            if files.len() > 1 {
                debug!(
                    conversion = %target,
                    dropped = files.len() - 1,
                    "single-file target, sending only the first file"
                );
            }
            fields.push(FormField {
                name: SINGLE_FILE_FIELD,
                value: FieldValue::File(files[0].clone()),
            });
        }
        SelectionMode::Multi => {
            fields.extend(files.iter().map(|file| FormField {
                name: MULTI_FILE_FIELD,
                value: FieldValue::File(file.clone()),
            }));
        }
    }

    Ok(TransportPayload { fields })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(mode: SelectionMode, names: &[&str]) -> InputSelection {
        let mut selection = InputSelection::new(mode);
        selection.replace_with(
            names
                .iter()
                .map(|n| InputFile::new(*n, n.as_bytes().to_vec()))
                .collect(),
        );
        selection
    }

    #[test]
    fn single_file_payload() {
        let payload = build(
            &"pdf->jpg".into(),
            &selection(SelectionMode::Single, &["a.pdf"]),
            &ConversionOptions::parse(r#"{"dpi":300}"#),
        )
        .unwrap();

        assert_eq!(payload.text(TARGET_FIELD), Some("pdf->jpg"));
        assert_eq!(payload.text(OPTIONS_FIELD), Some(r#"{"dpi":300}"#));
        let files: Vec<_> = payload.files().collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "file");
        assert_eq!(files[0].1.name, "a.pdf");
    }

    #[test]
    fn single_file_target_truncates_to_first_file() {
        // A selection made for a multi-file target, then submitted for a
        // single-file one.
        let payload = build(
            &"docx->pdf".into(),
            &selection(SelectionMode::Multi, &["first.docx", "second.docx", "third.docx"]),
            &ConversionOptions::default(),
        )
        .unwrap();

        let files: Vec<_> = payload.files().collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].1.name, "first.docx");
    }

    #[test]
    fn multi_file_preserves_order_and_duplicates() {
        let names = ["p3.jpg", "p1.jpg", "p2.jpg", "p1.jpg"];
        let payload = build(
            &"jpg->pdf".into(),
            &selection(SelectionMode::Multi, &names),
            &ConversionOptions::default(),
        )
        .unwrap();

        let files: Vec<_> = payload.files().collect();
        assert!(files.iter().all(|(field, _)| *field == MULTI_FILE_FIELD));
        let sent: Vec<_> = files.iter().map(|(_, f)| f.name.as_str()).collect();
        assert_eq!(sent, names);
    }

    #[test]
    fn empty_selection_is_rejected() {
        let err = build(
            &"jpg->pdf".into(),
            &InputSelection::new(SelectionMode::Multi),
            &ConversionOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SubmissionError::EmptySelection));
    }

    #[test]
    fn malformed_options_are_sent_as_empty_object() {
        let payload = build(
            &"mp4->mp3".into(),
            &selection(SelectionMode::Single, &["clip.mp4"]),
            &ConversionOptions::parse("{bitrate:"),
        )
        .unwrap();
        assert_eq!(payload.text(OPTIONS_FIELD), Some("{}"));
    }

    #[test]
    fn text_fields_precede_files() {
        let payload = build(
            &"jpg->pdf".into(),
            &selection(SelectionMode::Multi, &["a.jpg", "b.jpg"]),
            &ConversionOptions::default(),
        )
        .unwrap();
        let names: Vec<_> = payload.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, ["target", "options", "files", "files"]);
    }
}
