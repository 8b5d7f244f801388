//! Thermal zones: the terminal point of every air-loop demand branch.

use os_core::{Handle, Real, is_fraction};

use crate::components::air_loop::AirLoopHvac;
use crate::components::node::Node;
use crate::components::port_list::PortList;
use crate::components::{
    ModelObject, find_upstream, get_double, get_int, get_pointer, model_object, set_double,
    set_int, set_pointer,
};
use crate::model::Model;
use crate::object_kind::ObjectKind;

model_object!(
    /// A conditioned zone with its supply port list, return port and
    /// equipment list.
    ThermalZone,
    ObjectKind::ThermalZone
);

impl ThermalZone {
    pub const MULTIPLIER_FIELD: usize = 1;
    pub const ZONE_AIR_NODE_FIELD: usize = 2;
    pub const INLET_PORT_LIST_FIELD: usize = 3;
    pub const RETURN_AIR_PORT: usize = 4;
    pub const PRIMARY_DAYLIGHTING_CONTROL_FIELD: usize = 5;
    pub const PRIMARY_FRACTION_FIELD: usize = 6;
    pub const SECONDARY_DAYLIGHTING_CONTROL_FIELD: usize = 7;
    pub const SECONDARY_FRACTION_FIELD: usize = 8;
    pub const FIRST_EQUIPMENT_FIELD: usize = 9;

    /// Create a zone together with its zone air node and inlet port list.
    pub fn new(model: &mut Model) -> Self {
        let zone = Self(model.add_object(ObjectKind::ThermalZone));
        zone.init_children(model);
        zone
    }

    pub fn new_named(model: &mut Model, name: &str) -> Self {
        let zone = Self(model.add_object_named(ObjectKind::ThermalZone, name));
        zone.init_children(model);
        zone
    }

    fn init_children(&self, model: &mut Model) {
        let name = self.name(model).unwrap_or_default();
        let air_node = Node::new_named(model, &format!("{name} Zone Air Node"));
        let port_list = PortList::new(model, self.0);
        port_list.set_name(model, &format!("{name} Inlet Port List"));
        set_pointer(model, self.0, Self::ZONE_AIR_NODE_FIELD, air_node.handle());
        set_pointer(model, self.0, Self::INLET_PORT_LIST_FIELD, port_list.handle());
        set_int(model, self.0, Self::MULTIPLIER_FIELD, 1);
    }

    pub fn multiplier(&self, model: &Model) -> i64 {
        get_int(model, self.0, Self::MULTIPLIER_FIELD).unwrap_or(1)
    }

    pub fn set_multiplier(&self, model: &mut Model, multiplier: i64) -> bool {
        multiplier >= 1 && set_int(model, self.0, Self::MULTIPLIER_FIELD, multiplier)
    }

    pub fn zone_air_node(&self, model: &Model) -> Option<Node> {
        get_pointer(model, self.0, Self::ZONE_AIR_NODE_FIELD).map(|h| Node::cast(model, h))
    }

    pub fn inlet_port_list(&self, model: &Model) -> Option<PortList> {
        get_pointer(model, self.0, Self::INLET_PORT_LIST_FIELD).map(|h| PortList::cast(model, h))
    }

    pub fn return_air_port(&self) -> usize {
        Self::RETURN_AIR_PORT
    }

    /// The object fed by the zone's return air port.
    pub fn return_air_model_object(&self, model: &Model) -> Option<Handle> {
        model.connected_object(self.0, Self::RETURN_AIR_PORT)
    }

    /// Nodes (or other objects) feeding the zone's inlet port list.
    pub fn inlet_model_objects(&self, model: &Model) -> Vec<Handle> {
        self.inlet_port_list(model)
            .map(|pl| pl.model_objects(model))
            .unwrap_or_default()
    }

    /// Equipment serving the zone, in priority order.
    pub fn equipment(&self, model: &Model) -> Vec<Handle> {
        model
            .fields(self.0)
            .map(|f| {
                f.pointers()
                    .filter(|(i, _)| *i >= Self::FIRST_EQUIPMENT_FIELD)
                    .map(|(_, h)| h)
                    .filter(|h| model.contains(*h))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn add_equipment(&self, model: &mut Model, equipment: Handle) -> bool {
        if !model.contains(equipment) || self.equipment(model).contains(&equipment) {
            return false;
        }
        let next = model
            .fields(self.0)
            .map_or(Self::FIRST_EQUIPMENT_FIELD, |f| {
                f.len().max(Self::FIRST_EQUIPMENT_FIELD)
            });
        set_pointer(model, self.0, next, equipment)
    }

    /// Deregister `equipment`, keeping the list contiguous.
    pub fn remove_equipment(&self, model: &mut Model, equipment: Handle) -> bool {
        let slot = model.fields(self.0).and_then(|f| {
            f.pointers()
                .find(|(i, h)| *i >= Self::FIRST_EQUIPMENT_FIELD && *h == equipment)
                .map(|(i, _)| i)
        });
        match slot {
            Some(field) => {
                model.remove_field_slot(self.0, field);
                true
            }
            None => false,
        }
    }

    pub fn primary_daylighting_control(&self, model: &Model) -> Option<Handle> {
        get_pointer(model, self.0, Self::PRIMARY_DAYLIGHTING_CONTROL_FIELD)
    }

    pub fn set_primary_daylighting_control(&self, model: &mut Model, control: Handle) -> bool {
        model.kind(control) == Some(ObjectKind::DaylightingControl)
            && set_pointer(model, self.0, Self::PRIMARY_DAYLIGHTING_CONTROL_FIELD, control)
    }

    pub fn reset_primary_daylighting_control(&self, model: &mut Model) {
        let _ = model.reset_field(self.0, Self::PRIMARY_DAYLIGHTING_CONTROL_FIELD);
        let _ = model.reset_field(self.0, Self::PRIMARY_FRACTION_FIELD);
    }

    pub fn fraction_of_zone_controlled_by_primary_daylighting_control(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::PRIMARY_FRACTION_FIELD).unwrap_or(1.0)
    }

    pub fn set_fraction_of_zone_controlled_by_primary_daylighting_control(
        &self,
        model: &mut Model,
        fraction: Real,
    ) -> bool {
        is_fraction(fraction)
            && set_double(model, self.0, Self::PRIMARY_FRACTION_FIELD, fraction)
    }

    pub fn secondary_daylighting_control(&self, model: &Model) -> Option<Handle> {
        get_pointer(model, self.0, Self::SECONDARY_DAYLIGHTING_CONTROL_FIELD)
    }

    pub fn set_secondary_daylighting_control(&self, model: &mut Model, control: Handle) -> bool {
        model.kind(control) == Some(ObjectKind::DaylightingControl)
            && set_pointer(model, self.0, Self::SECONDARY_DAYLIGHTING_CONTROL_FIELD, control)
    }

    pub fn reset_secondary_daylighting_control(&self, model: &mut Model) {
        let _ = model.reset_field(self.0, Self::SECONDARY_DAYLIGHTING_CONTROL_FIELD);
        let _ = model.reset_field(self.0, Self::SECONDARY_FRACTION_FIELD);
    }

    pub fn fraction_of_zone_controlled_by_secondary_daylighting_control(
        &self,
        model: &Model,
    ) -> Real {
        get_double(model, self.0, Self::SECONDARY_FRACTION_FIELD).unwrap_or(0.0)
    }

    pub fn set_fraction_of_zone_controlled_by_secondary_daylighting_control(
        &self,
        model: &mut Model,
        fraction: Real,
    ) -> bool {
        is_fraction(fraction)
            && set_double(model, self.0, Self::SECONDARY_FRACTION_FIELD, fraction)
    }

    /// The air loop whose zone splitter feeds this zone, if any.
    pub fn air_loop_hvac(&self, model: &Model) -> Option<Handle> {
        let splitters = self.inlet_model_objects(model).into_iter().filter_map(|inlet| {
            if model.kind(inlet)?.is_splitter() {
                return Some(inlet);
            }
            find_upstream(model, inlet, |k| k.is_splitter()).map(|(s, _)| s)
        });
        let splitters: Vec<Handle> = splitters.collect();
        model
            .objects_of_kind(ObjectKind::AirLoopHvac)
            .into_iter()
            .find(|&l| {
                get_pointer(model, l, AirLoopHvac::ZONE_SPLITTER_FIELD)
                    .is_some_and(|s| splitters.contains(&s))
            })
    }

    /// Remove the zone with its zone air node and port list, first taking
    /// its branch (and terminals) off the serving air loop.
    pub fn remove(&self, model: &mut Model) -> Vec<Handle> {
        if let Some(air_loop) = self.air_loop_hvac(model) {
            AirLoopHvac::wrap(air_loop).remove_branch_for_zone(model, *self);
        }
        model.disconnect(self.0, Self::RETURN_AIR_PORT);
        let mut removed = Vec::new();
        if let Some(list) = self.inlet_port_list(model) {
            removed.extend(model.remove_object(list.handle()));
        }
        if let Some(node) = self.zone_air_node(model) {
            removed.extend(model.remove_object(node.handle()));
        }
        removed.extend(model.remove_object(self.0));
        removed
    }
}

impl Model {
    /// Every thermal zone, in construction order.
    pub fn thermal_zones(&self) -> Vec<ThermalZone> {
        self.objects_of_kind(ObjectKind::ThermalZone)
            .into_iter()
            .map(ThermalZone::wrap)
            .collect()
    }

    /// Zone listing `equipment` in its equipment list.
    pub fn zone_for_equipment(&self, equipment: Handle) -> Option<ThermalZone> {
        self.thermal_zones()
            .into_iter()
            .find(|z| z.equipment(self).contains(&equipment))
    }
}

/// Daylighting controls referenced by `zone` (primary first).
pub fn daylighting_controls(model: &Model, zone: ThermalZone) -> Vec<Handle> {
    [
        zone.primary_daylighting_control(model),
        zone.secondary_daylighting_control(model),
    ]
    .into_iter()
    .flatten()
    .collect()
}
