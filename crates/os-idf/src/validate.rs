//! Workspace validation.

use std::collections::HashSet;

use crate::workspace::Workspace;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {object_type}")]
    DuplicateName { object_type: String, name: String },

    #[error("Missing name in {object_type}")]
    MissingName { object_type: String },

    #[error("Incomplete extensible group in {object_type} {name}: {len} fields, group of {size}")]
    IncompleteGroup {
        object_type: String,
        name: String,
        len: usize,
        size: usize,
    },
}

/// Names must be present and unique (case-insensitive) within a type, and
/// extensible fields must fill whole groups.
///
/// Objects of unknown type are skipped.
pub fn validate_workspace(workspace: &Workspace) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for object in workspace.objects() {
        let object_type = &object.object_type;
        if !object_type.is_known() {
            continue;
        }
        if object_type.has_name() {
            let Some(name) = object.name() else {
                return Err(ValidationError::MissingName {
                    object_type: object_type.to_string(),
                });
            };
            if !seen.insert((object_type.clone(), name.to_lowercase())) {
                return Err(ValidationError::DuplicateName {
                    object_type: object_type.to_string(),
                    name: name.to_string(),
                });
            }
        }
        if let Some(group) = object_type.extensible_group() {
            let len = object.fields.len();
            if len > group.first && (len - group.first) % group.size() != 0 {
                return Err(ValidationError::IncompleteGroup {
                    object_type: object_type.to_string(),
                    name: object.name().unwrap_or_default().to_string(),
                    len,
                    size: group.size(),
                });
            }
        }
    }
    Ok(())
}
