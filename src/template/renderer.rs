//! Base template expansion
//!
//! The base template comes out of the asset store as raw bytes; it is parsed
//! and expanded in one shot against the assembled document. Undefined
//! references are strict errors, and every failure path returns no partial
//! output.

use base64::{engine::general_purpose::STANDARD, Engine};
use minijinja::{Environment, ErrorKind, UndefinedBehavior, Value};

use super::assemble::AssembledDocument;
use crate::{Error, Result};

/// Expands base templates against assembled documents
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Expand `source` (the content of the base template named `file`)
    /// against the assembled document
    ///
    /// Parse failures are [`Error::TemplateSyntax`]; failures during
    /// expansion (an undefined reference, a type mismatch, a failing filter)
    /// are [`Error::TemplateExecution`]. Both carry the template's asset name
    /// so the failing file is identifiable.
    pub fn render(&self, file: &str, source: &[u8], document: &AssembledDocument) -> Result<String> {
        let source = std::str::from_utf8(source).map_err(|e| Error::TemplateSyntax {
            file: file.to_string(),
            source: minijinja::Error::new(
                ErrorKind::SyntaxError,
                format!("template is not valid UTF-8: {e}"),
            ),
        })?;

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_filter("base64_encode", base64_encode);
        env.add_filter("base64_decode", base64_decode);

        env.add_template(file, source)
            .map_err(|e| Error::TemplateSyntax {
                file: file.to_string(),
                source: e,
            })?;

        let template = env.get_template(file).map_err(|e| Error::TemplateSyntax {
            file: file.to_string(),
            source: e,
        })?;

        let context = document.render_context();
        template
            .render(Value::from_serialize(&context))
            .map_err(|e| Error::TemplateExecution {
                file: file.to_string(),
                source: e,
            })
    }
}

/// Base64 encode filter, `{{ value | base64_encode }}`
fn base64_encode(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}

/// Base64 decode filter, `{{ value | base64_decode }}`
fn base64_decode(value: &str) -> std::result::Result<String, minijinja::Error> {
    let bytes = STANDARD.decode(value).map_err(|e| {
        minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("base64 decode error: {e}"),
        )
    })?;
    String::from_utf8(bytes).map_err(|e| {
        minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("base64 decode produced invalid UTF-8: {e}"),
        )
    })
}
