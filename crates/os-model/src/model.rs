//! The model registry.
//!
//! A `Model` owns every object in one arena keyed by `Handle`. Objects refer
//! to each other only through handles stored in their field stores; typed
//! wrappers such as [`Node`](crate::Node) are cheap aliases of a handle.

use std::collections::HashMap;

use os_core::{Handle, Id};
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::field_store::{FieldStore, FieldValue, PortRef};
use crate::object_kind::{ObjectKind, PortDirection};

#[derive(Debug, Clone)]
pub(crate) struct ObjectRecord {
    pub(crate) handle: Handle,
    pub(crate) kind: ObjectKind,
    pub(crate) fields: FieldStore,
}

/// Arena of model objects. Slots are never reused, so iteration follows
/// construction order.
#[derive(Debug, Clone, Default)]
pub struct Model {
    slots: Vec<Option<ObjectRecord>>,
    index: HashMap<Handle, Id>,
}

impl Model {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.index.contains_key(&handle)
    }

    pub fn kind(&self, handle: Handle) -> Option<ObjectKind> {
        self.record(handle).map(|r| r.kind)
    }

    pub fn fields(&self, handle: Handle) -> Option<&FieldStore> {
        self.record(handle).map(|r| &r.fields)
    }

    pub(crate) fn records(&self) -> impl Iterator<Item = &ObjectRecord> {
        self.slots.iter().flatten()
    }

    fn record(&self, handle: Handle) -> Option<&ObjectRecord> {
        let id = self.index.get(&handle)?;
        self.slots.get(id.as_usize())?.as_ref()
    }

    fn record_mut(&mut self, handle: Handle) -> Option<&mut ObjectRecord> {
        let id = self.index.get(&handle)?;
        self.slots.get_mut(id.as_usize())?.as_mut()
    }

    /// Add an object of `kind` with a generated unique name.
    pub fn add_object(&mut self, kind: ObjectKind) -> Handle {
        let name = self.generated_name(kind);
        self.insert(kind, name)
    }

    /// Add an object of `kind`, made unique if `name` is already taken.
    pub fn add_object_named(&mut self, kind: ObjectKind, name: &str) -> Handle {
        let name = self.unique_name(kind, name, None);
        self.insert(kind, name)
    }

    fn insert(&mut self, kind: ObjectKind, name: String) -> Handle {
        let handle = Handle::new();
        let mut fields = FieldStore::with_len(kind.field_count());
        fields.set(0, FieldValue::Text(name));

        let id = Id::from_index(self.slots.len() as u32);
        self.slots.push(Some(ObjectRecord {
            handle,
            kind,
            fields,
        }));
        self.index.insert(handle, id);
        handle
    }

    /// Every live object, in construction order.
    pub fn objects(&self) -> impl Iterator<Item = Handle> + '_ {
        self.records().map(|r| r.handle)
    }

    pub fn objects_of_kind(&self, kind: ObjectKind) -> Vec<Handle> {
        self.records()
            .filter(|r| r.kind == kind)
            .map(|r| r.handle)
            .collect()
    }

    /// Case-insensitive name lookup within one kind.
    pub fn object_by_name(&self, kind: ObjectKind, name: &str) -> Option<Handle> {
        self.records()
            .find(|r| r.kind == kind && r.name_matches(name))
            .map(|r| r.handle)
    }

    pub fn name(&self, handle: Handle) -> Option<String> {
        self.record(handle)?.fields.get_string(0)
    }

    /// Rename an object. Returns the name actually applied, which gets a
    /// numeric suffix when another object of the same kind already uses it.
    pub fn set_name(&mut self, handle: Handle, name: &str) -> Option<String> {
        let kind = self.kind(handle)?;
        let unique = self.unique_name(kind, name, Some(handle));
        let record = self.record_mut(handle)?;
        record.fields.set(0, FieldValue::Text(unique.clone()));
        Some(unique)
    }

    fn name_taken(&self, kind: ObjectKind, name: &str, exclude: Option<Handle>) -> bool {
        self.records()
            .any(|r| r.kind == kind && Some(r.handle) != exclude && r.name_matches(name))
    }

    fn unique_name(&self, kind: ObjectKind, desired: &str, exclude: Option<Handle>) -> String {
        if !self.name_taken(kind, desired, exclude) {
            return desired.to_string();
        }
        (1..)
            .map(|n| format!("{desired} {n}"))
            .find(|candidate| !self.name_taken(kind, candidate, exclude))
            .unwrap_or_else(|| desired.to_string())
    }

    fn generated_name(&self, kind: ObjectKind) -> String {
        (1..)
            .map(|n| format!("{} {}", kind.default_name(), n))
            .find(|candidate| !self.name_taken(kind, candidate, None))
            .unwrap_or_else(|| kind.default_name().to_string())
    }

    /// Write a non-port field.
    pub fn set_field(&mut self, handle: Handle, field: usize, value: FieldValue) -> ModelResult<()> {
        let kind = self
            .kind(handle)
            .ok_or(ModelError::UnknownHandle { handle })?;
        if kind.port_layout().direction(field).is_some() || matches!(value, FieldValue::Port(_)) {
            return Err(ModelError::PortField { handle, field });
        }
        match value {
            FieldValue::Real(v) if !v.is_finite() => {
                return Err(ModelError::NonFinite { handle, field });
            }
            FieldValue::Pointer(target) if !self.contains(target) => {
                return Err(ModelError::UnknownHandle { handle: target });
            }
            _ => {}
        }
        if let Some(record) = self.record_mut(handle) {
            record.fields.set(field, value);
        }
        Ok(())
    }

    /// Drop one slot of an extensible list, shifting later slots down.
    pub(crate) fn remove_field_slot(&mut self, handle: Handle, field: usize) {
        if let Some(record) = self.record_mut(handle) {
            record.fields.remove(field);
        }
    }

    /// Clear a non-port field back to its default.
    pub fn reset_field(&mut self, handle: Handle, field: usize) -> ModelResult<()> {
        self.set_field(handle, field, FieldValue::Empty)
    }

    /// The connection stored on `port` of `handle`, if any.
    pub fn peer(&self, handle: Handle, port: usize) -> Option<PortRef> {
        self.record(handle)?.fields.get_port(port)
    }

    pub fn connected_object(&self, handle: Handle, port: usize) -> Option<Handle> {
        self.peer(handle, port).map(|p| p.peer)
    }

    /// Connect an outbound port to an inbound port.
    ///
    /// Any existing connection on either port is broken first, on both sides.
    pub fn connect(
        &mut self,
        source: Handle,
        source_port: usize,
        target: Handle,
        target_port: usize,
    ) -> ModelResult<()> {
        self.check_connection(source, source_port, target, target_port)?;

        self.disconnect(source, source_port);
        self.disconnect(target, target_port);

        if let Some(record) = self.record_mut(source) {
            record.fields.set(
                source_port,
                FieldValue::Port(PortRef {
                    peer: target,
                    peer_port: target_port,
                }),
            );
        }
        if let Some(record) = self.record_mut(target) {
            record.fields.set(
                target_port,
                FieldValue::Port(PortRef {
                    peer: source,
                    peer_port: source_port,
                }),
            );
        }
        Ok(())
    }

    /// The error `connect` would return for these ports, without connecting.
    pub fn check_connection(
        &self,
        source: Handle,
        source_port: usize,
        target: Handle,
        target_port: usize,
    ) -> ModelResult<()> {
        self.check_port(source, source_port, PortDirection::Outbound)?;
        self.check_port(target, target_port, PortDirection::Inbound)?;
        if source == target {
            return Err(ModelError::SelfConnection { handle: source });
        }
        Ok(())
    }

    fn check_port(&self, handle: Handle, port: usize, expected: PortDirection) -> ModelResult<()> {
        let kind = self
            .kind(handle)
            .ok_or(ModelError::UnknownHandle { handle })?;
        match kind.port_layout().direction(port) {
            None => Err(ModelError::NotAPort { handle, kind, port }),
            Some(dir) if dir != expected => Err(ModelError::WrongDirection { handle, port }),
            Some(_) => Ok(()),
        }
    }

    /// Break the connection on `port`, clearing both halves.
    ///
    /// Returns false when nothing was connected.
    pub fn disconnect(&mut self, handle: Handle, port: usize) -> bool {
        let Some(peer) = self.peer(handle, port) else {
            return false;
        };
        if let Some(record) = self.record_mut(handle) {
            record.fields.clear(port);
        }
        if let Some(record) = self.record_mut(peer.peer) {
            let mirror = PortRef {
                peer: handle,
                peer_port: port,
            };
            if record.fields.get_port(peer.peer_port) == Some(mirror) {
                record.fields.clear(peer.peer_port);
            }
        }
        true
    }

    /// Break every connection of an object. Returns how many were broken.
    pub fn disconnect_all(&mut self, handle: Handle) -> usize {
        let ports: Vec<usize> = match self.record(handle) {
            Some(r) => r.fields.ports().map(|(i, _)| i).collect(),
            None => return 0,
        };
        ports
            .into_iter()
            .filter(|&port| self.disconnect(handle, port))
            .count()
    }

    /// Number of connections (each counted once, from its outbound side).
    pub fn edge_count(&self) -> usize {
        self.records()
            .map(|r| {
                let layout = r.kind.port_layout();
                r.fields
                    .ports()
                    .filter(|(i, _)| layout.direction(*i) == Some(PortDirection::Outbound))
                    .count()
            })
            .sum()
    }

    /// Generic removal: drop every connection, clear every pointer to the
    /// object, and release its slot. Returns the removed handles.
    pub fn remove_object(&mut self, handle: Handle) -> Vec<Handle> {
        if !self.contains(handle) {
            return Vec::new();
        }
        self.disconnect_all(handle);

        for slot in self.slots.iter_mut().flatten() {
            let hits: Vec<usize> = slot
                .fields
                .pointers()
                .filter(|(_, target)| *target == handle)
                .map(|(i, _)| i)
                .collect();
            let extensible = slot.kind.extensible_pointers_start();
            for field in hits.into_iter().rev() {
                match extensible {
                    Some(start) if field >= start => slot.fields.remove(field),
                    _ => slot.fields.clear(field),
                }
            }
        }

        if let Some(id) = self.index.remove(&handle) {
            if let Some(slot) = self.slots.get_mut(id.as_usize()) {
                let removed = slot.take();
                if let Some(record) = removed {
                    debug!(kind = %record.kind, handle = %handle, "removed object");
                }
            }
        }
        vec![handle]
    }
}

impl ObjectRecord {
    fn name_matches(&self, name: &str) -> bool {
        matches!(self.fields.get(0), FieldValue::Text(n) if n.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_unique_per_kind() {
        let mut model = Model::new();
        let a = model.add_object(ObjectKind::Node);
        let b = model.add_object(ObjectKind::Node);
        assert_eq!(model.name(a).as_deref(), Some("Node 1"));
        assert_eq!(model.name(b).as_deref(), Some("Node 2"));
    }

    #[test]
    fn set_name_suffixes_collisions() {
        let mut model = Model::new();
        let a = model.add_object_named(ObjectKind::Node, "Supply");
        let b = model.add_object(ObjectKind::Node);
        let applied = model.set_name(b, "supply").unwrap();
        assert_eq!(applied, "supply 1");
        assert_eq!(model.object_by_name(ObjectKind::Node, "SUPPLY"), Some(a));
    }

    #[test]
    fn connect_writes_both_halves() {
        let mut model = Model::new();
        let a = model.add_object(ObjectKind::Node);
        let b = model.add_object(ObjectKind::Node);
        model.connect(a, 2, b, 1).unwrap();

        assert_eq!(
            model.peer(a, 2),
            Some(PortRef {
                peer: b,
                peer_port: 1
            })
        );
        assert_eq!(
            model.peer(b, 1),
            Some(PortRef {
                peer: a,
                peer_port: 2
            })
        );
        assert_eq!(model.edge_count(), 1);
    }

    #[test]
    fn connect_rejects_bad_ports() {
        let mut model = Model::new();
        let a = model.add_object(ObjectKind::Node);
        let b = model.add_object(ObjectKind::Node);

        assert!(matches!(
            model.connect(a, 1, b, 1),
            Err(ModelError::WrongDirection { .. })
        ));
        assert!(matches!(
            model.connect(a, 0, b, 1),
            Err(ModelError::NotAPort { .. })
        ));
        assert!(matches!(
            model.connect(a, 2, a, 1),
            Err(ModelError::SelfConnection { .. })
        ));
        assert_eq!(model.edge_count(), 0);
    }

    #[test]
    fn reconnect_replaces_old_edge() {
        let mut model = Model::new();
        let a = model.add_object(ObjectKind::Node);
        let b = model.add_object(ObjectKind::Node);
        let c = model.add_object(ObjectKind::Node);
        model.connect(a, 2, b, 1).unwrap();
        model.connect(a, 2, c, 1).unwrap();

        assert_eq!(model.peer(b, 1), None);
        assert_eq!(model.connected_object(a, 2), Some(c));
        assert_eq!(model.edge_count(), 1);
    }

    #[test]
    fn set_field_guards_ports_and_pointers() {
        let mut model = Model::new();
        let a = model.add_object(ObjectKind::Node);
        assert!(matches!(
            model.set_field(a, 1, FieldValue::Text("x".into())),
            Err(ModelError::PortField { .. })
        ));
        let zone = model.add_object(ObjectKind::ThermalZone);
        assert!(matches!(
            model.set_field(zone, 5, FieldValue::Pointer(Handle::new())),
            Err(ModelError::UnknownHandle { .. })
        ));
        assert!(matches!(
            model.set_field(zone, 6, FieldValue::Real(f64::NAN)),
            Err(ModelError::NonFinite { .. })
        ));
    }

    #[test]
    fn remove_clears_pointers_and_edges() {
        let mut model = Model::new();
        let zone = model.add_object(ObjectKind::ThermalZone);
        let control = model.add_object(ObjectKind::DaylightingControl);
        let a = model.add_object(ObjectKind::Node);
        let b = model.add_object(ObjectKind::Node);
        model.set_field(zone, 5, FieldValue::Pointer(control)).unwrap();
        model.connect(a, 2, b, 1).unwrap();

        assert_eq!(model.remove_object(control), vec![control]);
        assert_eq!(model.fields(zone).unwrap().get_pointer(5), None);

        model.remove_object(b);
        assert_eq!(model.peer(a, 2), None);
        assert_eq!(model.edge_count(), 0);
        assert_eq!(model.len(), 2);
        assert!(model.remove_object(b).is_empty());
    }

    #[test]
    fn objects_iterate_in_construction_order() {
        let mut model = Model::new();
        let a = model.add_object(ObjectKind::Node);
        let b = model.add_object(ObjectKind::ThermalZone);
        let c = model.add_object(ObjectKind::Node);
        model.remove_object(b);
        let order: Vec<Handle> = model.objects().collect();
        assert_eq!(order, vec![a, c]);
    }
}
