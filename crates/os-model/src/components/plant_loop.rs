//! Plant loops: hot water supply for water coils. Only the demand side is
//! modelled.

use os_core::Handle;
use tracing::debug;

use crate::components::coils::WaterToAirComponent;
use crate::components::node::Node;
use crate::components::splitter_mixer::{ConnectorMixer, ConnectorSplitter};
use crate::components::{ModelObject, get_pointer, model_object, set_pointer};
use crate::error::ModelResult;
use crate::model::Model;
use crate::object_kind::ObjectKind;
use crate::ports::{Mixer, Splitter};

model_object!(
    /// A plant loop with a demand splitter/mixer pair.
    PlantLoop,
    ObjectKind::PlantLoop
);

/// Next object along a plant demand branch.
fn next_on_branch(model: &Model, handle: Handle) -> Option<Handle> {
    let port = match model.kind(handle)? {
        ObjectKind::Node => Node::OUTLET_PORT,
        ObjectKind::CoilHeatingWater => {
            <crate::components::coils::CoilHeatingWater as WaterToAirComponent>::WATER_OUTLET_PORT
        }
        _ => return None,
    };
    model.connected_object(handle, port)
}

impl PlantLoop {
    pub const DEMAND_INLET_NODE_FIELD: usize = 1;
    pub const DEMAND_OUTLET_NODE_FIELD: usize = 2;
    pub const DEMAND_SPLITTER_FIELD: usize = 3;
    pub const DEMAND_MIXER_FIELD: usize = 4;

    /// Create a loop whose demand side reads
    /// inlet node → splitter, mixer → outlet node, with no branches yet.
    pub fn new(model: &mut Model) -> Self {
        let plant = Self(model.add_object(ObjectKind::PlantLoop));
        let name = plant.name(model).unwrap_or_default();

        let inlet = Node::new_named(model, &format!("{name} Demand Inlet Node"));
        let outlet = Node::new_named(model, &format!("{name} Demand Outlet Node"));
        let splitter = ConnectorSplitter::new(model);
        let mixer = ConnectorMixer::new(model);

        set_pointer(model, plant.0, Self::DEMAND_INLET_NODE_FIELD, inlet.handle());
        set_pointer(model, plant.0, Self::DEMAND_OUTLET_NODE_FIELD, outlet.handle());
        set_pointer(model, plant.0, Self::DEMAND_SPLITTER_FIELD, splitter.handle());
        set_pointer(model, plant.0, Self::DEMAND_MIXER_FIELD, mixer.handle());

        let wired: ModelResult<()> = (|| {
            model.connect(
                inlet.handle(),
                Node::OUTLET_PORT,
                splitter.handle(),
                splitter.inlet_port(),
            )?;
            model.connect(
                mixer.handle(),
                mixer.outlet_port(),
                outlet.handle(),
                Node::INLET_PORT,
            )
        })();
        if let Err(err) = wired {
            tracing::error!(%err, "failed to wire plant demand side");
        }
        plant
    }

    pub fn demand_inlet_node(&self, model: &Model) -> Option<Node> {
        get_pointer(model, self.0, Self::DEMAND_INLET_NODE_FIELD).map(Node::wrap)
    }

    pub fn demand_outlet_node(&self, model: &Model) -> Option<Node> {
        get_pointer(model, self.0, Self::DEMAND_OUTLET_NODE_FIELD).map(Node::wrap)
    }

    pub fn demand_splitter(&self, model: &Model) -> Option<ConnectorSplitter> {
        get_pointer(model, self.0, Self::DEMAND_SPLITTER_FIELD).map(ConnectorSplitter::wrap)
    }

    pub fn demand_mixer(&self, model: &Model) -> Option<ConnectorMixer> {
        get_pointer(model, self.0, Self::DEMAND_MIXER_FIELD).map(ConnectorMixer::wrap)
    }

    /// Plant loop whose demand branches contain `component`.
    pub fn for_demand_component(model: &Model, component: Handle) -> Option<Self> {
        model
            .objects_of_kind(ObjectKind::PlantLoop)
            .into_iter()
            .map(Self::wrap)
            .find(|plant| {
                plant
                    .demand_branches(model)
                    .iter()
                    .any(|branch| branch.contains(&component))
            })
    }

    /// Objects of each demand branch between splitter and mixer, in
    /// splitter outlet order.
    pub fn demand_branches(&self, model: &Model) -> Vec<Vec<Handle>> {
        let (Some(splitter), Some(mixer)) = (self.demand_splitter(model), self.demand_mixer(model))
        else {
            return Vec::new();
        };
        splitter
            .outlet_model_objects(model)
            .into_iter()
            .map(|first| {
                let mut branch = Vec::new();
                let mut current = Some(first);
                while let Some(h) = current {
                    if h == mixer.handle() || branch.contains(&h) {
                        break;
                    }
                    branch.push(h);
                    current = next_on_branch(model, h);
                }
                branch
            })
            .collect()
    }

    /// Every demand-side object: inlet node, splitter, branch contents,
    /// mixer, outlet node.
    pub fn demand_components(&self, model: &Model) -> Vec<Handle> {
        let mut out = Vec::new();
        out.extend(self.demand_inlet_node(model).map(|n| n.handle()));
        out.extend(self.demand_splitter(model).map(|s| s.handle()));
        out.extend(self.demand_branches(model).into_iter().flatten());
        out.extend(self.demand_mixer(model).map(|m| m.handle()));
        out.extend(self.demand_outlet_node(model).map(|n| n.handle()));
        out
    }

    /// Add a demand branch splitter → node → `component` → node → mixer.
    ///
    /// Fails when the component's water side is already connected.
    pub fn add_demand_branch_for_component<C: WaterToAirComponent>(
        &self,
        model: &mut Model,
        component: C,
    ) -> bool {
        if component.water_inlet_model_object(model).is_some()
            || component.water_outlet_model_object(model).is_some()
        {
            debug!(component = %component.handle(), "water side already connected");
            return false;
        }
        let (Some(splitter), Some(mixer)) = (self.demand_splitter(model), self.demand_mixer(model))
        else {
            return false;
        };

        let inlet = Node::new(model);
        let outlet = Node::new(model);
        let outlet_port = splitter.next_outlet_port(model);
        let inlet_port = mixer.next_inlet_port(model);
        let wired: ModelResult<()> = (|| {
            model.connect(splitter.handle(), outlet_port, inlet.handle(), Node::INLET_PORT)?;
            model.connect(
                inlet.handle(),
                Node::OUTLET_PORT,
                component.handle(),
                C::WATER_INLET_PORT,
            )?;
            model.connect(
                component.handle(),
                C::WATER_OUTLET_PORT,
                outlet.handle(),
                Node::INLET_PORT,
            )?;
            model.connect(outlet.handle(), Node::OUTLET_PORT, mixer.handle(), inlet_port)
        })();
        match wired {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(%err, "failed to wire plant demand branch");
                false
            }
        }
    }

    /// Remove the demand branch holding `component`, with its nodes. The
    /// component itself stays in the model, unconnected on its water side.
    pub fn remove_demand_branch_with_component<C: WaterToAirComponent>(
        &self,
        model: &mut Model,
        component: C,
    ) -> Vec<Handle> {
        let (Some(splitter), Some(mixer)) = (self.demand_splitter(model), self.demand_mixer(model))
        else {
            return Vec::new();
        };
        let Some(branch) = self
            .demand_branches(model)
            .into_iter()
            .find(|b| b.contains(&component.handle()))
        else {
            return Vec::new();
        };
        let (Some(&first), Some(&last)) = (branch.first(), branch.last()) else {
            return Vec::new();
        };

        let splitter_branch = splitter.branch_index_for_outlet_model_object(model, first);
        let mixer_branch = mixer.branch_index_for_inlet_model_object(model, last);
        if let Some(i) = splitter_branch {
            splitter.remove_port_for_branch(model, i);
        }
        if let Some(i) = mixer_branch {
            mixer.remove_port_for_branch(model, i);
        }

        let mut removed = Vec::new();
        for h in branch {
            if h == component.handle() {
                model.disconnect(h, C::WATER_INLET_PORT);
                model.disconnect(h, C::WATER_OUTLET_PORT);
            } else if model.kind(h) == Some(ObjectKind::Node) {
                removed.extend(model.remove_object(h));
            }
        }
        removed
    }

    /// Remove the loop and its whole demand side. Water components on the
    /// branches stay in the model, disconnected.
    pub fn remove(&self, model: &mut Model) -> Vec<Handle> {
        let components = self.demand_components(model);
        let mut removed = model.remove_object(self.0);
        for h in components {
            match model.kind(h) {
                Some(ObjectKind::Node | ObjectKind::ConnectorSplitter | ObjectKind::ConnectorMixer) => {
                    removed.extend(model.remove_object(h));
                }
                Some(_) => {
                    model.disconnect_all(h);
                }
                None => {}
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::coils::CoilHeatingWater;

    #[test]
    fn demand_side_skeleton() {
        let mut model = Model::new();
        let plant = PlantLoop::new(&mut model);
        let splitter = plant.demand_splitter(&model).unwrap();
        let mixer = plant.demand_mixer(&model).unwrap();

        assert_eq!(
            splitter.inlet_model_object(&model),
            plant.demand_inlet_node(&model).map(|n| n.handle())
        );
        assert_eq!(
            mixer.outlet_model_object(&model),
            plant.demand_outlet_node(&model).map(|n| n.handle())
        );
        assert!(plant.demand_branches(&model).is_empty());
        assert!(splitter.remove(&mut model).is_empty());
    }

    #[test]
    fn add_and_remove_demand_branch() {
        let mut model = Model::new();
        let plant = PlantLoop::new(&mut model);
        let a = CoilHeatingWater::new(&mut model);
        let b = CoilHeatingWater::new(&mut model);

        assert!(plant.add_demand_branch_for_component(&mut model, a));
        assert!(plant.add_demand_branch_for_component(&mut model, b));
        assert!(!plant.add_demand_branch_for_component(&mut model, a));

        let branches = plant.demand_branches(&model);
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0][1], a.handle());
        assert_eq!(branches[1].len(), 3);
        assert_eq!(a.plant_loop(&model), Some(plant));

        let removed = plant.remove_demand_branch_with_component(&mut model, a);
        assert_eq!(removed.len(), 2);
        assert_eq!(a.plant_loop(&model), None);
        assert_eq!(a.water_inlet_model_object(&model), None);

        let branches = plant.demand_branches(&model);
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0][1], b.handle());
        let splitter = plant.demand_splitter(&model).unwrap();
        assert_eq!(splitter.outlet_model_object(&model, 0), Some(branches[0][0]));
    }

    #[test]
    fn removing_water_coil_drops_its_branch() {
        let mut model = Model::new();
        let plant = PlantLoop::new(&mut model);
        let coil = CoilHeatingWater::new(&mut model);
        plant.add_demand_branch_for_component(&mut model, coil);
        let before = model.len();

        let removed = coil.remove(&mut model);
        assert_eq!(removed.len(), 3);
        assert_eq!(model.len(), before - 3);
        assert!(plant.demand_branches(&model).is_empty());
    }

    #[test]
    fn loop_removal_keeps_components() {
        let mut model = Model::new();
        let plant = PlantLoop::new(&mut model);
        let coil = CoilHeatingWater::new(&mut model);
        plant.add_demand_branch_for_component(&mut model, coil);

        plant.remove(&mut model);
        assert_eq!(model.len(), 1);
        assert!(model.contains(coil.handle()));
        assert_eq!(model.edge_count(), 0);
    }
}
