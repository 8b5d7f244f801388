//! Air loops and their zone branches.
//!
//! The demand side of an air loop reads
//!
//! ```text
//! demand inlet node → zone splitter ─┬→ node → [terminal] → port list (zone)
//!                                    └→ ...
//! zone return port → node → zone mixer → demand outlet node
//! ```
//!
//! The supply side is kept to its inlet and outlet nodes.

use os_core::{Handle, Real};
use tracing::debug;

use crate::components::node::Node;
use crate::components::port_list::PortList;
use crate::components::splitter_mixer::{AirLoopHvacZoneMixer, AirLoopHvacZoneSplitter};
use crate::components::terminals::AirTerminal;
use crate::components::thermal_zone::ThermalZone;
use crate::components::{
    ModelObject, get_double, get_pointer, model_object, primary_outlet_port,
    remove_model_object, set_optional_double, set_pointer,
};
use crate::error::ModelResult;
use crate::model::Model;
use crate::object_kind::ObjectKind;
use crate::ports::{Mixer, Splitter, remove_port_for_branch};

model_object!(
    /// An air loop with a zone splitter/mixer pair on its demand side.
    AirLoopHvac,
    ObjectKind::AirLoopHvac
);

impl AirLoopHvac {
    pub const DESIGN_SUPPLY_AIR_FLOW_RATE_FIELD: usize = 1;
    pub const SUPPLY_INLET_NODE_FIELD: usize = 2;
    pub const SUPPLY_OUTLET_NODE_FIELD: usize = 3;
    pub const DEMAND_INLET_NODE_FIELD: usize = 4;
    pub const DEMAND_OUTLET_NODE_FIELD: usize = 5;
    pub const ZONE_SPLITTER_FIELD: usize = 6;
    pub const ZONE_MIXER_FIELD: usize = 7;

    pub fn new(model: &mut Model) -> Self {
        let air_loop = Self(model.add_object(ObjectKind::AirLoopHvac));
        let name = air_loop.name(model).unwrap_or_default();

        let supply_inlet = Node::new_named(model, &format!("{name} Supply Inlet Node"));
        let supply_outlet = Node::new_named(model, &format!("{name} Supply Outlet Node"));
        let demand_inlet = Node::new_named(model, &format!("{name} Demand Inlet Node"));
        let demand_outlet = Node::new_named(model, &format!("{name} Demand Outlet Node"));
        let splitter = AirLoopHvacZoneSplitter::new(model);
        let mixer = AirLoopHvacZoneMixer::new(model);

        for (field, target) in [
            (Self::SUPPLY_INLET_NODE_FIELD, supply_inlet.handle()),
            (Self::SUPPLY_OUTLET_NODE_FIELD, supply_outlet.handle()),
            (Self::DEMAND_INLET_NODE_FIELD, demand_inlet.handle()),
            (Self::DEMAND_OUTLET_NODE_FIELD, demand_outlet.handle()),
            (Self::ZONE_SPLITTER_FIELD, splitter.handle()),
            (Self::ZONE_MIXER_FIELD, mixer.handle()),
        ] {
            set_pointer(model, air_loop.0, field, target);
        }

        let wired: ModelResult<()> = (|| {
            model.connect(
                supply_inlet.handle(),
                Node::OUTLET_PORT,
                supply_outlet.handle(),
                Node::INLET_PORT,
            )?;
            model.connect(
                demand_inlet.handle(),
                Node::OUTLET_PORT,
                splitter.handle(),
                splitter.inlet_port(),
            )?;
            model.connect(
                mixer.handle(),
                mixer.outlet_port(),
                demand_outlet.handle(),
                Node::INLET_PORT,
            )
        })();
        if let Err(err) = wired {
            tracing::error!(%err, "failed to wire air loop skeleton");
        }
        air_loop
    }

    /// `None` means autosized.
    pub fn design_supply_air_flow_rate(&self, model: &Model) -> Option<Real> {
        get_double(model, self.0, Self::DESIGN_SUPPLY_AIR_FLOW_RATE_FIELD)
    }

    pub fn set_design_supply_air_flow_rate(&self, model: &mut Model, rate: Option<Real>) -> bool {
        rate.is_none_or(|r| r >= 0.0)
            && set_optional_double(model, self.0, Self::DESIGN_SUPPLY_AIR_FLOW_RATE_FIELD, rate)
    }

    pub fn supply_inlet_node(&self, model: &Model) -> Option<Node> {
        get_pointer(model, self.0, Self::SUPPLY_INLET_NODE_FIELD).map(Node::wrap)
    }

    pub fn supply_outlet_node(&self, model: &Model) -> Option<Node> {
        get_pointer(model, self.0, Self::SUPPLY_OUTLET_NODE_FIELD).map(Node::wrap)
    }

    pub fn demand_inlet_node(&self, model: &Model) -> Option<Node> {
        get_pointer(model, self.0, Self::DEMAND_INLET_NODE_FIELD).map(Node::wrap)
    }

    pub fn demand_outlet_node(&self, model: &Model) -> Option<Node> {
        get_pointer(model, self.0, Self::DEMAND_OUTLET_NODE_FIELD).map(Node::wrap)
    }

    pub fn zone_splitter(&self, model: &Model) -> Option<AirLoopHvacZoneSplitter> {
        get_pointer(model, self.0, Self::ZONE_SPLITTER_FIELD).map(AirLoopHvacZoneSplitter::wrap)
    }

    pub fn zone_mixer(&self, model: &Model) -> Option<AirLoopHvacZoneMixer> {
        get_pointer(model, self.0, Self::ZONE_MIXER_FIELD).map(AirLoopHvacZoneMixer::wrap)
    }

    /// Objects from a splitter outlet down to (not including) the port list
    /// or mixer ending the branch, plus that end object.
    fn supply_branch(model: &Model, first: Handle) -> (Vec<Handle>, Option<Handle>) {
        let mut branch = Vec::new();
        let mut current = Some(first);
        while let Some(h) = current {
            match model.kind(h) {
                Some(ObjectKind::PortList | ObjectKind::AirLoopHvacZoneMixer) => {
                    return (branch, Some(h));
                }
                Some(kind) if !branch.contains(&h) => {
                    branch.push(h);
                    current = primary_outlet_port(kind).and_then(|p| model.connected_object(h, p));
                }
                _ => break,
            }
        }
        (branch, None)
    }

    /// Objects from a zone's return port down to (not including) the mixer.
    fn return_branch(model: &Model, zone: ThermalZone) -> Vec<Handle> {
        let mut branch = Vec::new();
        let mut current = zone.return_air_model_object(model);
        while let Some(h) = current {
            let Some(kind) = model.kind(h) else { break };
            if kind.is_mixer() || branch.contains(&h) {
                break;
            }
            branch.push(h);
            current = primary_outlet_port(kind).and_then(|p| model.connected_object(h, p));
        }
        branch
    }

    /// Zones served by this loop, in splitter outlet order.
    pub fn thermal_zones(&self, model: &Model) -> Vec<ThermalZone> {
        let Some(splitter) = self.zone_splitter(model) else {
            return Vec::new();
        };
        splitter
            .outlet_model_objects(model)
            .into_iter()
            .filter_map(|first| match Self::supply_branch(model, first).1 {
                Some(end) if model.kind(end) == Some(ObjectKind::PortList) => {
                    PortList::wrap(end).thermal_zone(model).map(ThermalZone::wrap)
                }
                _ => None,
            })
            .collect()
    }

    /// Every demand-side object, walking each branch in splitter order.
    pub fn demand_components(&self, model: &Model) -> Vec<Handle> {
        let mut out = Vec::new();
        out.extend(self.demand_inlet_node(model).map(|n| n.handle()));
        if let Some(splitter) = self.zone_splitter(model) {
            out.push(splitter.handle());
            for first in splitter.outlet_model_objects(model) {
                let (branch, end) = Self::supply_branch(model, first);
                out.extend(branch);
                let Some(end) = end else { continue };
                if model.kind(end) != Some(ObjectKind::PortList) {
                    continue;
                }
                let Some(zone) = PortList::wrap(end).thermal_zone(model).map(ThermalZone::wrap)
                else {
                    continue;
                };
                out.push(zone.handle());
                out.extend(Self::return_branch(model, zone));
            }
        }
        out.extend(self.zone_mixer(model).map(|m| m.handle()));
        out.extend(self.demand_outlet_node(model).map(|n| n.handle()));
        out
    }

    /// Add a branch serving `zone`: splitter → node → zone port list, and
    /// zone return port → node → mixer.
    ///
    /// Fails when the zone is already served by an air loop.
    pub fn add_branch_for_zone(&self, model: &mut Model, zone: ThermalZone) -> bool {
        self.build_zone_branch(model, zone).is_some()
    }

    /// As [`add_branch_for_zone`](Self::add_branch_for_zone), with `terminal`
    /// spliced in front of the zone's inlet node. Nothing is added unless
    /// both steps can succeed.
    pub fn add_branch_for_zone_with_terminal<T: AirTerminal>(
        &self,
        model: &mut Model,
        zone: ThermalZone,
        terminal: T,
    ) -> bool {
        if terminal.inlet_model_object(model).is_some()
            || terminal.outlet_model_object(model).is_some()
        {
            debug!(terminal = %terminal.handle(), "terminal is already connected");
            return false;
        }
        let Some(inlet) = self.build_zone_branch(model, zone) else {
            return false;
        };
        if terminal.add_to_node(model, inlet) {
            return true;
        }
        self.remove_branch_for_zone(model, zone);
        false
    }

    fn build_zone_branch(&self, model: &mut Model, zone: ThermalZone) -> Option<Node> {
        if !model.contains(zone.handle()) || zone.air_loop_hvac(model).is_some() {
            debug!(zone = %zone.handle(), "zone is missing or already on an air loop");
            return None;
        }
        let splitter = self.zone_splitter(model)?;
        let mixer = self.zone_mixer(model)?;
        let port_list = zone.inlet_port_list(model)?;
        let zone_name = zone.name(model).unwrap_or_default();

        let inlet = Node::new_named(model, &format!("{zone_name} Inlet Node"));
        let ret = Node::new_named(model, &format!("{zone_name} Return Air Node"));
        let outlet_port = splitter.next_outlet_port(model);
        let list_port = port_list.next_port(model);
        let mixer_port = mixer.next_inlet_port(model);

        let wired: ModelResult<()> = (|| {
            model.connect(splitter.handle(), outlet_port, inlet.handle(), Node::INLET_PORT)?;
            model.connect(inlet.handle(), Node::OUTLET_PORT, port_list.handle(), list_port)?;
            model.connect(
                zone.handle(),
                ThermalZone::RETURN_AIR_PORT,
                ret.handle(),
                Node::INLET_PORT,
            )?;
            model.connect(ret.handle(), Node::OUTLET_PORT, mixer.handle(), mixer_port)
        })();
        match wired {
            Ok(()) => Some(inlet),
            Err(err) => {
                tracing::error!(%err, "failed to wire zone branch");
                None
            }
        }
    }

    /// Remove the branch serving `zone`, including nodes and terminals on
    /// it. The zone itself stays in the model.
    pub fn remove_branch_for_zone(&self, model: &mut Model, zone: ThermalZone) -> bool {
        let (Some(splitter), Some(mixer)) = (self.zone_splitter(model), self.zone_mixer(model))
        else {
            return false;
        };
        let Some(port_list) = zone.inlet_port_list(model) else {
            return false;
        };

        let found = splitter
            .outlet_model_objects(model)
            .into_iter()
            .find_map(|first| match Self::supply_branch(model, first) {
                (branch, Some(end)) if end == port_list.handle() => Some((first, branch)),
                _ => None,
            });
        let Some((first, supply)) = found else {
            return false;
        };
        let ret = Self::return_branch(model, zone);

        if let Some(i) = splitter.branch_index_for_outlet_model_object(model, first) {
            splitter.remove_port_for_branch(model, i);
        }
        if let Some(&last) = supply.last() {
            if let Some(port) = port_list.port_for_model_object(model, last) {
                remove_port_for_branch(model, port_list.handle(), port - PortList::FIRST_PORT);
            }
        }
        if let Some(&last) = ret.last() {
            if let Some(i) = mixer.branch_index_for_inlet_model_object(model, last) {
                mixer.remove_port_for_branch(model, i);
            }
        }
        model.disconnect(zone.handle(), ThermalZone::RETURN_AIR_PORT);

        for h in supply.into_iter().chain(ret) {
            if model.kind(h).is_some_and(|k| k.is_air_terminal()) {
                zone.remove_equipment(model, h);
            }
            remove_model_object(model, h);
        }
        true
    }

    /// Remove the loop with its nodes, splitter, mixer and terminals. Zones
    /// stay in the model, detached.
    pub fn remove(&self, model: &mut Model) -> Vec<Handle> {
        let mut owned: Vec<Handle> = [self.supply_inlet_node(model), self.supply_outlet_node(model)]
            .into_iter()
            .flatten()
            .map(|n| n.handle())
            .collect();
        owned.extend(self.demand_components(model));

        let mut removed = model.remove_object(self.0);
        for h in owned {
            match model.kind(h) {
                Some(ObjectKind::ThermalZone) => {
                    model.disconnect(h, ThermalZone::RETURN_AIR_PORT);
                }
                Some(_) => removed.extend(remove_model_object(model, h)),
                None => {}
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::StraightComponent;
    use crate::components::terminals::AirTerminalSingleDuctUncontrolled;

    #[test]
    fn new_loop_skeleton() {
        let mut model = Model::new();
        let air_loop = AirLoopHvac::new(&mut model);
        let splitter = air_loop.zone_splitter(&model).unwrap();
        let mixer = air_loop.zone_mixer(&model).unwrap();

        assert_eq!(model.len(), 7);
        assert_eq!(
            splitter.inlet_model_object(&model),
            air_loop.demand_inlet_node(&model).map(|n| n.handle())
        );
        assert_eq!(splitter.air_loop_hvac(&model), Some(air_loop.handle()));
        assert_eq!(mixer.air_loop_hvac(&model), Some(air_loop.handle()));
        assert!(air_loop.thermal_zones(&model).is_empty());
    }

    #[test]
    fn zone_branch_round_trip() {
        let mut model = Model::new();
        let air_loop = AirLoopHvac::new(&mut model);
        let zone = ThermalZone::new_named(&mut model, "East");
        let baseline_edges = model.edge_count();

        assert!(air_loop.add_branch_for_zone(&mut model, zone));
        assert!(!air_loop.add_branch_for_zone(&mut model, zone));
        assert_eq!(air_loop.thermal_zones(&model), vec![zone]);
        assert_eq!(zone.air_loop_hvac(&model), Some(air_loop.handle()));

        let inlet = zone.inlet_model_objects(&model);
        assert_eq!(inlet.len(), 1);
        assert_eq!(model.name(inlet[0]).as_deref(), Some("East Inlet Node"));

        assert!(air_loop.remove_branch_for_zone(&mut model, zone));
        assert!(air_loop.thermal_zones(&model).is_empty());
        assert_eq!(model.edge_count(), baseline_edges);
        assert!(zone.return_air_model_object(&model).is_none());
    }

    #[test]
    fn branch_with_terminal() {
        let mut model = Model::new();
        let air_loop = AirLoopHvac::new(&mut model);
        let zone = ThermalZone::new(&mut model);
        let terminal = AirTerminalSingleDuctUncontrolled::new(&mut model);

        assert!(air_loop.add_branch_for_zone_with_terminal(&mut model, zone, terminal));
        assert_eq!(zone.equipment(&model), vec![terminal.handle()]);
        assert_eq!(terminal.thermal_zone(&model), Some(zone));

        let splitter = air_loop.zone_splitter(&model).unwrap();
        let first = splitter.outlet_model_object(&model, 0).unwrap();
        assert_eq!(model.kind(first), Some(ObjectKind::Node));
        assert_eq!(Node::wrap(first).outlet_model_object(&model), Some(terminal.handle()));

        assert!(air_loop.remove_branch_for_zone(&mut model, zone));
        assert!(!model.contains(terminal.handle()));
        assert!(zone.equipment(&model).is_empty());
    }

    #[test]
    fn removing_loop_keeps_zones() {
        let mut model = Model::new();
        let air_loop = AirLoopHvac::new(&mut model);
        let zone = ThermalZone::new(&mut model);
        let terminal = AirTerminalSingleDuctUncontrolled::new(&mut model);
        air_loop.add_branch_for_zone_with_terminal(&mut model, zone, terminal);

        air_loop.remove(&mut model);

        assert_eq!(model.len(), 3);
        assert!(model.contains(zone.handle()));
        assert_eq!(model.edge_count(), 0);
    }
}
