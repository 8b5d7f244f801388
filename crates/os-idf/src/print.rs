//! IDF text writer.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::object::IdfObject;
use crate::workspace::Workspace;

const COMMENT_COLUMN: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOptions {
    /// Append `!- field name` comments after each field.
    pub field_comments: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            field_comments: true,
        }
    }
}

/// Render a whole workspace, one blank line between objects.
pub fn print_workspace(workspace: &Workspace, options: PrintOptions) -> String {
    let mut out = String::new();
    for (i, object) in workspace.objects().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&print_object(object, options));
    }
    out
}

pub fn print_object(object: &IdfObject, options: PrintOptions) -> String {
    let mut out = String::new();
    let type_name = object.object_type.name();
    if object.fields.is_empty() {
        let _ = writeln!(out, "{type_name};");
        return out;
    }
    let _ = writeln!(out, "{type_name},");
    let last = object.fields.len() - 1;
    for (index, value) in object.fields.iter().enumerate() {
        let sep = if index == last { ';' } else { ',' };
        let entry = format!("  {value}{sep}");
        match object.object_type.field_name(index) {
            Some(name) if options.field_comments => {
                let _ = writeln!(out, "{entry:<COMMENT_COLUMN$}!- {name}");
            }
            _ => {
                let _ = writeln!(out, "{entry}");
            }
        }
    }
    out
}
