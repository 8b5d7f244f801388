//! Port allocation for objects with dynamically numbered ports.
//!
//! Branch `i` of an object whose dynamic ports start at field `F` lives in
//! field `F + i`. The next free port is the first slot at or after `F` that
//! holds no connection, so a port is never handed out twice while connected.

use os_core::Handle;
use tracing::debug;

use crate::components::ModelObject;
use crate::field_store::{FieldStore, PortRef};
use crate::model::Model;
use crate::object_kind::PortDirection;

/// Field index of branch `branch` for dynamic ports starting at `first`.
pub fn port_for_branch(first: usize, branch: usize) -> usize {
    first + branch
}

/// First slot at or after `first` without a connection.
pub fn next_port(fields: &FieldStore, first: usize) -> usize {
    (first..)
        .find(|&i| fields.get_port(i).is_none())
        .unwrap_or(first)
}

/// Connected dynamic ports of `handle`, in port order.
pub(crate) fn dynamic_connections(model: &Model, handle: Handle) -> Vec<(usize, PortRef)> {
    let Some(kind) = model.kind(handle) else {
        return Vec::new();
    };
    let Some((first, _)) = kind.port_layout().dynamic else {
        return Vec::new();
    };
    match model.fields(handle) {
        Some(fields) => fields.ports().filter(|(i, _)| *i >= first).collect(),
        None => Vec::new(),
    }
}

fn dynamic_start(model: &Model, handle: Handle) -> Option<(usize, PortDirection)> {
    model.kind(handle)?.port_layout().dynamic
}

/// Disconnect dynamic branch `branch` and shift later branches down by one.
pub(crate) fn remove_port_for_branch(model: &mut Model, handle: Handle, branch: usize) -> bool {
    let Some((first, direction)) = dynamic_start(model, handle) else {
        return false;
    };
    let port = port_for_branch(first, branch);
    if !model.disconnect(handle, port) {
        return false;
    }

    let later: Vec<(usize, PortRef)> = dynamic_connections(model, handle)
        .into_iter()
        .filter(|(i, _)| *i > port)
        .collect();
    let mut target = port;
    for (index, peer) in later {
        if index != target {
            model.disconnect(handle, index);
            let result = match direction {
                PortDirection::Outbound => model.connect(handle, target, peer.peer, peer.peer_port),
                PortDirection::Inbound => model.connect(peer.peer, peer.peer_port, handle, target),
            };
            if let Err(err) = result {
                tracing::error!(%err, "failed to shift branch connection");
            }
        }
        target += 1;
    }
    debug!(handle = %handle, branch, "removed branch port");
    true
}

/// One fixed inlet and a growing list of outlets.
pub trait Splitter: ModelObject {
    /// First dynamic outlet field (`F`).
    const FIRST_OUTLET: usize;
    const INLET_PORT: usize;

    fn inlet_port(&self) -> usize {
        Self::INLET_PORT
    }

    fn outlet_port(&self, branch: usize) -> usize {
        port_for_branch(Self::FIRST_OUTLET, branch)
    }

    fn next_outlet_port(&self, model: &Model) -> usize {
        model
            .fields(self.handle())
            .map_or(Self::FIRST_OUTLET, |f| next_port(f, Self::FIRST_OUTLET))
    }

    fn inlet_model_object(&self, model: &Model) -> Option<Handle> {
        model.connected_object(self.handle(), Self::INLET_PORT)
    }

    fn outlet_model_objects(&self, model: &Model) -> Vec<Handle> {
        dynamic_connections(model, self.handle())
            .into_iter()
            .map(|(_, p)| p.peer)
            .collect()
    }

    fn outlet_model_object(&self, model: &Model, branch: usize) -> Option<Handle> {
        model.connected_object(self.handle(), self.outlet_port(branch))
    }

    fn branch_index_for_outlet_model_object(&self, model: &Model, object: Handle) -> Option<usize> {
        dynamic_connections(model, self.handle())
            .into_iter()
            .find(|(_, p)| p.peer == object)
            .map(|(i, _)| i - Self::FIRST_OUTLET)
    }

    /// Disconnect one outlet and keep the remaining branch indices contiguous.
    fn remove_port_for_branch(&self, model: &mut Model, branch: usize) -> bool {
        remove_port_for_branch(model, self.handle(), branch)
    }

    /// Break every edge on this component, both sides.
    fn disconnect(&self, model: &mut Model) {
        model.disconnect_all(self.handle());
    }
}

/// Dual of [`Splitter`]: one fixed outlet and a growing list of inlets.
pub trait Mixer: ModelObject {
    /// First dynamic inlet field (`F`).
    const FIRST_INLET: usize;
    const OUTLET_PORT: usize;

    fn outlet_port(&self) -> usize {
        Self::OUTLET_PORT
    }

    fn inlet_port(&self, branch: usize) -> usize {
        port_for_branch(Self::FIRST_INLET, branch)
    }

    fn next_inlet_port(&self, model: &Model) -> usize {
        model
            .fields(self.handle())
            .map_or(Self::FIRST_INLET, |f| next_port(f, Self::FIRST_INLET))
    }

    fn outlet_model_object(&self, model: &Model) -> Option<Handle> {
        model.connected_object(self.handle(), Self::OUTLET_PORT)
    }

    fn inlet_model_objects(&self, model: &Model) -> Vec<Handle> {
        dynamic_connections(model, self.handle())
            .into_iter()
            .map(|(_, p)| p.peer)
            .collect()
    }

    fn inlet_model_object(&self, model: &Model, branch: usize) -> Option<Handle> {
        model.connected_object(self.handle(), self.inlet_port(branch))
    }

    fn branch_index_for_inlet_model_object(&self, model: &Model, object: Handle) -> Option<usize> {
        dynamic_connections(model, self.handle())
            .into_iter()
            .find(|(_, p)| p.peer == object)
            .map(|(i, _)| i - Self::FIRST_INLET)
    }

    fn remove_port_for_branch(&self, model: &mut Model, branch: usize) -> bool {
        remove_port_for_branch(model, self.handle(), branch)
    }

    fn disconnect(&self, model: &mut Model) {
        model.disconnect_all(self.handle());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_store::FieldValue;

    #[test]
    fn branch_arithmetic() {
        assert_eq!(port_for_branch(2, 0), 2);
        assert_eq!(port_for_branch(2, 3), 5);
    }

    #[test]
    fn next_port_finds_first_gap() {
        let peer = PortRef {
            peer: Handle::new(),
            peer_port: 1,
        };
        let mut fields = FieldStore::with_len(2);
        assert_eq!(next_port(&fields, 2), 2);
        fields.set(2, FieldValue::Port(peer));
        fields.set(3, FieldValue::Port(peer));
        assert_eq!(next_port(&fields, 2), 4);
        fields.clear(2);
        assert_eq!(next_port(&fields, 2), 2);
    }
}
