//! Index-addressed field storage shared by every model object.

use os_core::{Handle, Real};

/// The peer side of one half of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub peer: Handle,
    pub peer_port: usize,
}

/// One field slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Real(Real),
    Integer(i64),
    /// Reference to another object in the same model.
    Pointer(Handle),
    /// Half of a connection; the peer stores the mirror image.
    Port(PortRef),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }
}

static EMPTY: FieldValue = FieldValue::Empty;

/// Ordered field slots of a single object. Field 0 is the object name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldStore {
    values: Vec<FieldValue>,
}

impl FieldStore {
    pub fn with_len(len: usize) -> Self {
        Self {
            values: vec![FieldValue::Empty; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> &FieldValue {
        self.values.get(index).unwrap_or(&EMPTY)
    }

    /// Write a slot, growing the store with empty slots as needed.
    pub(crate) fn set(&mut self, index: usize, value: FieldValue) {
        if index >= self.values.len() {
            self.values.resize(index + 1, FieldValue::Empty);
        }
        self.values[index] = value;
    }

    pub(crate) fn clear(&mut self, index: usize) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = FieldValue::Empty;
        }
        self.trim_trailing_empty();
    }

    /// Remove one slot of an extensible list and shift the rest down.
    pub(crate) fn remove(&mut self, index: usize) {
        if index < self.values.len() {
            self.values.remove(index);
        }
    }

    fn trim_trailing_empty(&mut self) {
        while matches!(self.values.last(), Some(FieldValue::Empty)) {
            self.values.pop();
        }
    }

    pub fn get_string(&self, index: usize) -> Option<String> {
        match self.get(index) {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Real(v) => Some(v.to_string()),
            FieldValue::Integer(v) => Some(v.to_string()),
            _ => None,
        }
    }

    pub fn get_double(&self, index: usize) -> Option<Real> {
        match self.get(index) {
            FieldValue::Real(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as Real),
            FieldValue::Text(s) => s.trim().parse::<Real>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    pub fn get_int(&self, index: usize) -> Option<i64> {
        match self.get(index) {
            FieldValue::Integer(v) => Some(*v),
            FieldValue::Real(v) if v.fract() == 0.0 => Some(*v as i64),
            FieldValue::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn get_pointer(&self, index: usize) -> Option<Handle> {
        match self.get(index) {
            FieldValue::Pointer(h) => Some(*h),
            _ => None,
        }
    }

    pub fn get_port(&self, index: usize) -> Option<PortRef> {
        match self.get(index) {
            FieldValue::Port(p) => Some(*p),
            _ => None,
        }
    }

    /// All (index, target) pairs holding pointers.
    pub fn pointers(&self) -> impl Iterator<Item = (usize, Handle)> + '_ {
        self.values.iter().enumerate().filter_map(|(i, v)| match v {
            FieldValue::Pointer(h) => Some((i, *h)),
            _ => None,
        })
    }

    /// All (index, peer) pairs holding connections.
    pub fn ports(&self) -> impl Iterator<Item = (usize, PortRef)> + '_ {
        self.values.iter().enumerate().filter_map(|(i, v)| match v {
            FieldValue::Port(p) => Some((i, *p)),
            _ => None,
        })
    }
}
