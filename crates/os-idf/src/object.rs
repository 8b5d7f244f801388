//! A single IDF record.

use os_core::{Handle, Real};
use serde::{Deserialize, Serialize};

use crate::idd::IddObjectType;

/// One workspace object: a type tag and its ordered text fields.
///
/// Empty strings stand for blank fields. Field 0 is the name for every
/// type whose schema says so.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdfObject {
    pub handle: Handle,
    pub object_type: IddObjectType,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl IdfObject {
    /// A blank object sized to its type's nonextensible fields.
    pub fn new(object_type: IddObjectType) -> Self {
        let len = object_type.field_names().len();
        Self {
            handle: Handle::new(),
            object_type,
            fields: vec![String::new(); len],
        }
    }

    pub fn with_fields(object_type: IddObjectType, fields: Vec<String>) -> Self {
        Self {
            handle: Handle::new(),
            object_type,
            fields,
        }
    }

    pub fn name(&self) -> Option<&str> {
        if self.object_type.has_name() {
            self.get_string(0)
        } else {
            None
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.set_string(0, name);
    }

    /// Non-blank text of field `index`.
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.fields
            .get(index)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Numeric value of field `index`. Blank, `Autosize`/`Autocalculate` and
    /// unparseable fields read as `None`.
    pub fn get_double(&self, index: usize) -> Option<Real> {
        self.get_string(index)?
            .parse::<Real>()
            .ok()
            .filter(|v| v.is_finite())
    }

    pub fn get_int(&self, index: usize) -> Option<i64> {
        let text = self.get_string(index)?;
        text.parse::<i64>().ok().or_else(|| {
            text.parse::<Real>()
                .ok()
                .filter(|v| v.is_finite() && v.fract() == 0.0)
                .map(|v| v as i64)
        })
    }

    /// Whether field `index` holds `Autosize` (any case).
    pub fn is_autosize(&self, index: usize) -> bool {
        self.get_string(index)
            .is_some_and(|s| s.eq_ignore_ascii_case("autosize"))
    }

    /// Write field `index`, padding with blanks as needed.
    pub fn set_string(&mut self, index: usize, value: &str) {
        if index >= self.fields.len() {
            self.fields.resize(index + 1, String::new());
        }
        self.fields[index] = value.to_string();
    }

    pub fn set_double(&mut self, index: usize, value: Real) {
        self.set_string(index, &format_real(value));
    }

    pub fn set_int(&mut self, index: usize, value: i64) {
        self.set_string(index, &value.to_string());
    }

    /// Append one extensible group after the last stored field. Missing
    /// nonextensible fields are padded first.
    pub fn push_extensible_group(&mut self, values: &[&str]) {
        let first = self
            .object_type
            .extensible_group()
            .map_or(self.fields.len(), |g| g.first);
        if self.fields.len() < first {
            self.fields.resize(first, String::new());
        }
        self.fields.extend(values.iter().map(|v| v.to_string()));
    }

    /// Stored extensible groups, the last one possibly short.
    pub fn extensible_groups(&self) -> Vec<&[String]> {
        match self.object_type.extensible_group() {
            Some(group) if self.fields.len() > group.first => {
                self.fields[group.first..].chunks(group.size()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn num_extensible_groups(&self) -> usize {
        self.extensible_groups().len()
    }
}

/// Shortest text that parses back to the same `f64`.
pub fn format_real(value: Real) -> String {
    let text = format!("{value}");
    if text.contains(['.', 'e', 'E']) || text.contains("inf") || text.contains("NaN") {
        text
    } else {
        format!("{text}.0")
    }
}
