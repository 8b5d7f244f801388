//! Zone and plant splitters/mixers.

use os_core::Handle;
use tracing::debug;

use crate::components::{ModelObject, get_pointer, model_object};
use crate::model::Model;
use crate::object_kind::ObjectKind;
use crate::ports::{Mixer, Splitter};

model_object!(
    /// Fans the air loop's demand inlet out to one branch per zone.
    AirLoopHvacZoneSplitter,
    ObjectKind::AirLoopHvacZoneSplitter
);

model_object!(
    /// Collects zone return branches into the air loop's demand outlet.
    AirLoopHvacZoneMixer,
    ObjectKind::AirLoopHvacZoneMixer
);

model_object!(
    /// Plant-side splitter.
    ConnectorSplitter,
    ObjectKind::ConnectorSplitter
);

model_object!(
    /// Plant-side mixer.
    ConnectorMixer,
    ObjectKind::ConnectorMixer
);

impl Splitter for AirLoopHvacZoneSplitter {
    const FIRST_OUTLET: usize = 2;
    const INLET_PORT: usize = 1;
}

impl Splitter for ConnectorSplitter {
    const FIRST_OUTLET: usize = 2;
    const INLET_PORT: usize = 1;
}

impl Mixer for AirLoopHvacZoneMixer {
    const FIRST_INLET: usize = 2;
    const OUTLET_PORT: usize = 1;
}

impl Mixer for ConnectorMixer {
    const FIRST_INLET: usize = 2;
    const OUTLET_PORT: usize = 1;
}

/// Loop object (of `loop_kind`) whose `field` points at `component`.
fn owning_loop(
    model: &Model,
    component: Handle,
    loop_kind: ObjectKind,
    field: usize,
) -> Option<Handle> {
    model
        .objects_of_kind(loop_kind)
        .into_iter()
        .find(|&l| get_pointer(model, l, field) == Some(component))
}

/// Removal shared by every splitter/mixer: refused while a loop owns it.
fn guarded_remove(model: &mut Model, component: Handle, owner: Option<Handle>) -> Vec<Handle> {
    if let Some(owner) = owner {
        debug!(
            component = %component,
            owner = %owner,
            "refusing to remove a splitter/mixer still owned by a loop"
        );
        return Vec::new();
    }
    model.disconnect_all(component);
    model.remove_object(component)
}

impl AirLoopHvacZoneSplitter {
    pub fn new(model: &mut Model) -> Self {
        Self(model.add_object(ObjectKind::AirLoopHvacZoneSplitter))
    }

    pub fn air_loop_hvac(&self, model: &Model) -> Option<Handle> {
        owning_loop(
            model,
            self.0,
            ObjectKind::AirLoopHvac,
            crate::components::air_loop::AirLoopHvac::ZONE_SPLITTER_FIELD,
        )
    }

    /// Empty when the splitter still belongs to an air loop.
    pub fn remove(&self, model: &mut Model) -> Vec<Handle> {
        let owner = self.air_loop_hvac(model);
        guarded_remove(model, self.0, owner)
    }
}

impl AirLoopHvacZoneMixer {
    pub fn new(model: &mut Model) -> Self {
        Self(model.add_object(ObjectKind::AirLoopHvacZoneMixer))
    }

    pub fn air_loop_hvac(&self, model: &Model) -> Option<Handle> {
        owning_loop(
            model,
            self.0,
            ObjectKind::AirLoopHvac,
            crate::components::air_loop::AirLoopHvac::ZONE_MIXER_FIELD,
        )
    }

    /// Empty when the mixer still belongs to an air loop.
    pub fn remove(&self, model: &mut Model) -> Vec<Handle> {
        let owner = self.air_loop_hvac(model);
        guarded_remove(model, self.0, owner)
    }
}

impl ConnectorSplitter {
    pub fn new(model: &mut Model) -> Self {
        Self(model.add_object(ObjectKind::ConnectorSplitter))
    }

    pub fn plant_loop(&self, model: &Model) -> Option<Handle> {
        owning_loop(
            model,
            self.0,
            ObjectKind::PlantLoop,
            crate::components::plant_loop::PlantLoop::DEMAND_SPLITTER_FIELD,
        )
    }

    pub fn remove(&self, model: &mut Model) -> Vec<Handle> {
        let owner = self.plant_loop(model);
        guarded_remove(model, self.0, owner)
    }
}

impl ConnectorMixer {
    pub fn new(model: &mut Model) -> Self {
        Self(model.add_object(ObjectKind::ConnectorMixer))
    }

    pub fn plant_loop(&self, model: &Model) -> Option<Handle> {
        owning_loop(
            model,
            self.0,
            ObjectKind::PlantLoop,
            crate::components::plant_loop::PlantLoop::DEMAND_MIXER_FIELD,
        )
    }

    pub fn remove(&self, model: &mut Model) -> Vec<Handle> {
        let owner = self.plant_loop(model);
        guarded_remove(model, self.0, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::StraightComponent;
    use crate::components::node::Node;

    fn fan_out(model: &mut Model, splitter: AirLoopHvacZoneSplitter, n: usize) -> Vec<Node> {
        (0..n)
            .map(|_| {
                let node = Node::new(model);
                let port = splitter.next_outlet_port(model);
                model
                    .connect(splitter.handle(), port, node.handle(), node.inlet_port())
                    .unwrap();
                node
            })
            .collect()
    }

    #[test]
    fn two_branch_port_arithmetic() {
        let mut model = Model::new();
        let s = AirLoopHvacZoneSplitter::new(&mut model);

        assert_eq!(s.outlet_port(0), 2);
        assert_eq!(s.outlet_port(1), 3);
        assert_eq!(s.next_outlet_port(&model), 2);

        fan_out(&mut model, s, 1);
        assert_eq!(s.next_outlet_port(&model), 3);
    }

    #[test]
    fn remove_port_for_branch_keeps_indices_contiguous() {
        let mut model = Model::new();
        let s = AirLoopHvacZoneSplitter::new(&mut model);
        let nodes = fan_out(&mut model, s, 3);

        assert!(s.remove_port_for_branch(&mut model, 0));

        let outlets = s.outlet_model_objects(&model);
        assert_eq!(outlets, vec![nodes[1].handle(), nodes[2].handle()]);
        assert_eq!(
            s.branch_index_for_outlet_model_object(&model, nodes[2].handle()),
            Some(1)
        );
        assert_eq!(nodes[0].inlet_model_object(&model), None);
        assert_eq!(s.next_outlet_port(&model), 4);
    }

    #[test]
    fn disconnect_clears_both_sides() {
        let mut model = Model::new();
        let s = AirLoopHvacZoneSplitter::new(&mut model);
        let inlet = Node::new(&mut model);
        model
            .connect(inlet.handle(), inlet.outlet_port(), s.handle(), s.inlet_port())
            .unwrap();
        let nodes = fan_out(&mut model, s, 2);

        Splitter::disconnect(&s, &mut model);

        assert_eq!(model.fields(s.handle()).unwrap().ports().count(), 0);
        assert_eq!(inlet.outlet_model_object(&model), None);
        for node in nodes {
            assert_eq!(node.inlet_model_object(&model), None);
        }
        assert_eq!(model.edge_count(), 0);
    }

    #[test]
    fn mixer_inlets_in_port_order() {
        let mut model = Model::new();
        let m = AirLoopHvacZoneMixer::new(&mut model);
        let a = Node::new(&mut model);
        let b = Node::new(&mut model);
        let p0 = m.next_inlet_port(&model);
        model
            .connect(a.handle(), a.outlet_port(), m.handle(), p0)
            .unwrap();
        let p1 = m.next_inlet_port(&model);
        model
            .connect(b.handle(), b.outlet_port(), m.handle(), p1)
            .unwrap();

        assert_eq!((p0, p1), (2, 3));
        assert_eq!(m.inlet_model_objects(&model), vec![a.handle(), b.handle()]);
        assert_eq!(m.inlet_model_object(&model, 1), Some(b.handle()));
    }

    #[test]
    fn free_splitter_removal_disconnects_everything() {
        let mut model = Model::new();
        let s = AirLoopHvacZoneSplitter::new(&mut model);
        let nodes = fan_out(&mut model, s, 2);

        assert_eq!(s.remove(&mut model), vec![s.handle()]);
        assert!(!model.contains(s.handle()));
        assert_eq!(nodes[0].inlet_model_object(&model), None);
    }
}
