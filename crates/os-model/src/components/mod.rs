//! Typed views over model objects.
//!
//! Each concrete kind gets a `Copy` newtype around its `Handle`. Behaviour
//! shared by several kinds lives in capability traits: [`StraightComponent`]
//! for one-inlet/one-outlet objects, [`Splitter`](crate::ports::Splitter) and
//! [`Mixer`](crate::ports::Mixer) for objects with dynamic ports.

use os_core::{Handle, Real};

use crate::field_store::FieldValue;
use crate::model::Model;
use crate::object_kind::ObjectKind;

pub mod air_loop;
pub mod coils;
pub mod daylighting;
pub mod node;
pub mod plant_loop;
pub mod port_list;
pub mod splitter_mixer;
pub mod terminals;
pub mod thermal_zone;

/// A typed alias of one object in a [`Model`].
pub trait ModelObject: Copy {
    const KIND: ObjectKind;

    fn handle(&self) -> Handle;

    #[doc(hidden)]
    fn wrap(handle: Handle) -> Self;

    /// Typed view of `handle` if it is registered with the right kind.
    fn from_handle(model: &Model, handle: Handle) -> Option<Self> {
        (model.kind(handle) == Some(Self::KIND)).then(|| Self::wrap(handle))
    }

    /// Typed view of `handle`.
    ///
    /// # Panics
    /// If the object is missing or of another kind; a caller holding such a
    /// handle has broken the model's bookkeeping.
    fn cast(model: &Model, handle: Handle) -> Self {
        match model.kind(handle) {
            Some(kind) if kind == Self::KIND => Self::wrap(handle),
            other => panic!(
                "cannot view {:?} as {}: object kind is {:?}",
                handle,
                Self::KIND,
                other
            ),
        }
    }

    fn name(&self, model: &Model) -> Option<String> {
        model.name(self.handle())
    }

    fn set_name(&self, model: &mut Model, name: &str) -> Option<String> {
        model.set_name(self.handle(), name)
    }
}

/// An object with exactly one inlet and one outlet on its primary path.
pub trait StraightComponent: ModelObject {
    fn inlet_port(&self) -> usize;
    fn outlet_port(&self) -> usize;

    fn inlet_model_object(&self, model: &Model) -> Option<Handle> {
        model.connected_object(self.handle(), self.inlet_port())
    }

    fn outlet_model_object(&self, model: &Model) -> Option<Handle> {
        model.connected_object(self.handle(), self.outlet_port())
    }
}

macro_rules! model_object {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(os_core::Handle);

        impl $crate::components::ModelObject for $name {
            const KIND: $crate::object_kind::ObjectKind = $kind;

            fn handle(&self) -> os_core::Handle {
                self.0
            }

            fn wrap(handle: os_core::Handle) -> Self {
                Self(handle)
            }
        }
    };
}
pub(crate) use model_object;

// Field helpers shared by the typed accessors.

pub(crate) fn get_double(model: &Model, handle: Handle, field: usize) -> Option<Real> {
    model.fields(handle)?.get_double(field)
}

pub(crate) fn get_string(model: &Model, handle: Handle, field: usize) -> Option<String> {
    model.fields(handle)?.get_string(field)
}

pub(crate) fn get_int(model: &Model, handle: Handle, field: usize) -> Option<i64> {
    model.fields(handle)?.get_int(field)
}

pub(crate) fn get_pointer(model: &Model, handle: Handle, field: usize) -> Option<Handle> {
    model
        .fields(handle)?
        .get_pointer(field)
        .filter(|target| model.contains(*target))
}

pub(crate) fn set_double(model: &mut Model, handle: Handle, field: usize, value: Real) -> bool {
    model
        .set_field(handle, field, FieldValue::Real(value))
        .is_ok()
}

/// `None` resets the field (autosize / unset).
pub(crate) fn set_optional_double(
    model: &mut Model,
    handle: Handle,
    field: usize,
    value: Option<Real>,
) -> bool {
    match value {
        Some(v) => set_double(model, handle, field, v),
        None => model.reset_field(handle, field).is_ok(),
    }
}

pub(crate) fn set_string(model: &mut Model, handle: Handle, field: usize, value: &str) -> bool {
    model
        .set_field(handle, field, FieldValue::Text(value.to_string()))
        .is_ok()
}

pub(crate) fn set_int(model: &mut Model, handle: Handle, field: usize, value: i64) -> bool {
    model
        .set_field(handle, field, FieldValue::Integer(value))
        .is_ok()
}

pub(crate) fn set_pointer(model: &mut Model, handle: Handle, field: usize, target: Handle) -> bool {
    model
        .set_field(handle, field, FieldValue::Pointer(target))
        .is_ok()
}

/// Walk upstream from `start` through inlet ports until an object matching
/// `stop` is found. Returns the matching object and the port feeding the walk.
pub(crate) fn find_upstream(
    model: &Model,
    start: Handle,
    stop: impl Fn(ObjectKind) -> bool,
) -> Option<(Handle, usize)> {
    let mut current = start;
    // Bounded by the object count so a malformed cycle cannot hang the walk.
    for _ in 0..=model.len() {
        let kind = model.kind(current)?;
        let inlet = primary_inlet_port(kind)?;
        let peer = model.peer(current, inlet)?;
        let peer_kind = model.kind(peer.peer)?;
        if stop(peer_kind) {
            return Some((peer.peer, peer.peer_port));
        }
        current = peer.peer;
    }
    None
}

/// Walk downstream from `start` through outlet ports until an object matching
/// `stop` is found. Returns the matching object and the port receiving the walk.
pub(crate) fn find_downstream(
    model: &Model,
    start: Handle,
    stop: impl Fn(ObjectKind) -> bool,
) -> Option<(Handle, usize)> {
    let mut current = start;
    for _ in 0..=model.len() {
        let kind = model.kind(current)?;
        let outlet = primary_outlet_port(kind)?;
        let peer = model.peer(current, outlet)?;
        let peer_kind = model.kind(peer.peer)?;
        if stop(peer_kind) {
            return Some((peer.peer, peer.peer_port));
        }
        current = peer.peer;
    }
    None
}

/// Kind-aware removal of any object.
///
/// Loop-owned splitters and mixers, and port lists still owned by a zone,
/// are refused with an empty result.
pub fn remove_model_object(model: &mut Model, handle: Handle) -> Vec<Handle> {
    let Some(kind) = model.kind(handle) else {
        return Vec::new();
    };
    match kind {
        ObjectKind::Node => node::Node::wrap(handle).remove(model),
        ObjectKind::AirLoopHvac => air_loop::AirLoopHvac::wrap(handle).remove(model),
        ObjectKind::AirLoopHvacZoneSplitter => {
            splitter_mixer::AirLoopHvacZoneSplitter::wrap(handle).remove(model)
        }
        ObjectKind::AirLoopHvacZoneMixer => {
            splitter_mixer::AirLoopHvacZoneMixer::wrap(handle).remove(model)
        }
        ObjectKind::ConnectorSplitter => {
            splitter_mixer::ConnectorSplitter::wrap(handle).remove(model)
        }
        ObjectKind::ConnectorMixer => splitter_mixer::ConnectorMixer::wrap(handle).remove(model),
        ObjectKind::PortList => {
            if port_list::PortList::wrap(handle).thermal_zone(model).is_some() {
                return Vec::new();
            }
            model.remove_object(handle)
        }
        ObjectKind::ThermalZone => thermal_zone::ThermalZone::wrap(handle).remove(model),
        ObjectKind::PlantLoop => plant_loop::PlantLoop::wrap(handle).remove(model),
        ObjectKind::AirTerminalSingleDuctUncontrolled => {
            terminals::AirTerminalSingleDuctUncontrolled::wrap(handle).remove(model)
        }
        ObjectKind::AirTerminalSingleDuctVavReheat => {
            terminals::AirTerminalSingleDuctVavReheat::wrap(handle).remove(model)
        }
        ObjectKind::CoilHeatingWater | ObjectKind::CoilHeatingElectric => {
            coils::remove_coil(model, handle)
        }
        ObjectKind::DaylightingControl => {
            daylighting::DaylightingControl::wrap(handle).remove(model)
        }
    }
}

/// Inlet port of the object's primary (air) path for straight objects.
pub(crate) fn primary_inlet_port(kind: ObjectKind) -> Option<usize> {
    match kind {
        ObjectKind::Node => Some(node::Node::INLET_PORT),
        ObjectKind::AirTerminalSingleDuctUncontrolled
        | ObjectKind::AirTerminalSingleDuctVavReheat => Some(terminals::TERMINAL_INLET_PORT),
        ObjectKind::CoilHeatingWater => Some(coils::CoilHeatingWater::AIR_INLET_PORT),
        ObjectKind::CoilHeatingElectric => Some(coils::CoilHeatingElectric::AIR_INLET_PORT),
        _ => None,
    }
}

/// Outlet port of the object's primary (air) path for straight objects.
pub(crate) fn primary_outlet_port(kind: ObjectKind) -> Option<usize> {
    match kind {
        ObjectKind::Node => Some(node::Node::OUTLET_PORT),
        ObjectKind::AirTerminalSingleDuctUncontrolled
        | ObjectKind::AirTerminalSingleDuctVavReheat => Some(terminals::TERMINAL_OUTLET_PORT),
        ObjectKind::CoilHeatingWater => Some(coils::CoilHeatingWater::AIR_OUTLET_PORT),
        ObjectKind::CoilHeatingElectric => Some(coils::CoilHeatingElectric::AIR_OUTLET_PORT),
        _ => None,
    }
}
