//! Integration tests for os-model graph surgery.

use os_model::{
    AirLoopHvac, AirLoopHvacZoneMixer, AirLoopHvacZoneSplitter, AirTerminal,
    AirTerminalSingleDuctUncontrolled, AirTerminalSingleDuctVavReheat, CoilHeatingElectric,
    CoilHeatingWater, Mixer,
    Model, ModelObject, Node, ObjectKind, PlantLoop, Splitter, StraightComponent, ThermalZone,
    WaterToAirComponent, mutator, remove_model_object,
};

/// Air loop with one zone branch; returns the zone's inlet node.
fn loop_with_zone(model: &mut Model) -> (AirLoopHvac, ThermalZone, Node) {
    let air_loop = AirLoopHvac::new(model);
    let zone = ThermalZone::new_named(model, "Core");
    assert!(air_loop.add_branch_for_zone(model, zone));
    let inlet = zone.inlet_model_objects(model)[0];
    (air_loop, zone, Node::cast(model, inlet))
}

#[test]
fn add_to_node_splices_terminal() {
    let mut model = Model::new();
    let (air_loop, zone, inlet) = loop_with_zone(&mut model);
    let splitter = air_loop.zone_splitter(&model).unwrap();
    let edges_before = model.edge_count();

    let terminal = AirTerminalSingleDuctUncontrolled::new(&mut model);
    assert!(terminal.add_to_node(&mut model, inlet));

    // splitter → splice node → terminal → inlet node → port list
    let splice = splitter.outlet_model_object(&model, 0).unwrap();
    assert_eq!(model.kind(splice), Some(ObjectKind::Node));
    assert_ne!(splice, inlet.handle());
    assert_eq!(
        Node::cast(&model, splice).outlet_model_object(&model),
        Some(terminal.handle())
    );
    assert_eq!(terminal.outlet_model_object(&model), Some(inlet.handle()));
    assert_eq!(model.edge_count(), edges_before + 2);
    assert_eq!(zone.equipment(&model), vec![terminal.handle()]);
    assert_eq!(model.validate_connections(), Ok(()));
}

#[test]
fn add_to_node_precondition_failures_leave_model_untouched() {
    let mut model = Model::new();
    let (_air_loop, _zone, inlet) = loop_with_zone(&mut model);
    let terminal = AirTerminalSingleDuctUncontrolled::new(&mut model);

    // node from another model
    let mut other = Model::new();
    let foreign = Node::new(&mut other);
    let edges = model.edge_count();
    let objects = model.len();
    assert!(!terminal.add_to_node(&mut model, foreign));
    assert_eq!((model.edge_count(), model.len()), (edges, objects));

    // node leading nowhere
    let loose = Node::new(&mut model);
    let objects = model.len();
    assert!(!terminal.add_to_node(&mut model, loose));
    assert_eq!((model.edge_count(), model.len()), (edges, objects));

    // node leading to a zone but not fed by a splitter
    let feeder = Node::new(&mut model);
    let splitter_peer = model.peer(inlet.handle(), Node::INLET_PORT).unwrap();
    model
        .connect(feeder.handle(), Node::OUTLET_PORT, inlet.handle(), Node::INLET_PORT)
        .unwrap();
    let edges = model.edge_count();
    let objects = model.len();
    assert!(!terminal.add_to_node(&mut model, inlet));
    assert_eq!((model.edge_count(), model.len()), (edges, objects));
    assert!(model.peer(splitter_peer.peer, splitter_peer.peer_port).is_none());
}

#[test]
fn add_to_node_rejects_objects_that_are_not_terminals() {
    let mut model = Model::new();
    let (air_loop, _zone, inlet) = loop_with_zone(&mut model);
    let splitter = air_loop.zone_splitter(&model).unwrap();
    let coil = CoilHeatingElectric::new(&mut model);
    let edges = model.edge_count();
    let objects = model.len();

    assert!(!mutator::add_terminal_to_node(&mut model, coil.handle(), inlet));
    assert_eq!((model.edge_count(), model.len()), (edges, objects));
    assert_eq!(splitter.outlet_model_objects(&model), vec![inlet.handle()]);
    assert_eq!(model.validate_connections(), Ok(()));
}

#[test]
fn add_to_node_before_air_loop_mixer() {
    let mut model = Model::new();
    let air_loop = AirLoopHvac::new(&mut model);
    let splitter = air_loop.zone_splitter(&model).unwrap();
    let mixer = air_loop.zone_mixer(&model).unwrap();

    let bypass = Node::new(&mut model);
    let out = splitter.next_outlet_port(&model);
    model
        .connect(splitter.handle(), out, bypass.handle(), Node::INLET_PORT)
        .unwrap();
    let inp = mixer.next_inlet_port(&model);
    model
        .connect(bypass.handle(), Node::OUTLET_PORT, mixer.handle(), inp)
        .unwrap();

    let terminal = AirTerminalSingleDuctUncontrolled::new(&mut model);
    assert!(terminal.add_to_node(&mut model, bypass));
    assert_eq!(terminal.thermal_zone(&model), None);
    assert_eq!(terminal.outlet_model_object(&model), Some(bypass.handle()));
}

#[test]
fn mixer_not_owned_by_a_loop_is_rejected() {
    let mut model = Model::new();
    let splitter = AirLoopHvacZoneSplitter::new(&mut model);
    let mixer = AirLoopHvacZoneMixer::new(&mut model);
    let node = Node::new(&mut model);
    model
        .connect(splitter.handle(), 2, node.handle(), Node::INLET_PORT)
        .unwrap();
    model
        .connect(node.handle(), Node::OUTLET_PORT, mixer.handle(), 2)
        .unwrap();

    let terminal = AirTerminalSingleDuctUncontrolled::new(&mut model);
    let edges = model.edge_count();
    assert!(!terminal.add_to_node(&mut model, node));
    assert_eq!(model.edge_count(), edges);
}

#[test]
fn terminal_remove_rewires_neighbors() {
    let mut model = Model::new();
    let (air_loop, zone, inlet) = loop_with_zone(&mut model);
    let edges_before = model.edge_count();
    let objects_before = model.len();

    let terminal = AirTerminalSingleDuctUncontrolled::new(&mut model);
    terminal.add_to_node(&mut model, inlet);
    let removed = terminal.remove(&mut model);

    assert_eq!(removed.len(), 2);
    assert_eq!(model.edge_count(), edges_before);
    assert_eq!(model.len(), objects_before);
    let splitter = air_loop.zone_splitter(&model).unwrap();
    assert_eq!(splitter.outlet_model_objects(&model), vec![inlet.handle()]);
    assert!(zone.equipment(&model).is_empty());
    assert_eq!(model.validate_connections(), Ok(()));
}

#[test]
fn terminal_remove_keeps_node_when_bypass_is_impossible() {
    let mut model = Model::new();
    // feeder → node → terminal → feeder: the bypass would be a self connection.
    let feeder = Node::new(&mut model);
    let node = Node::new(&mut model);
    let terminal = AirTerminalSingleDuctUncontrolled::new(&mut model);
    model
        .connect(feeder.handle(), Node::OUTLET_PORT, node.handle(), Node::INLET_PORT)
        .unwrap();
    model
        .connect(node.handle(), Node::OUTLET_PORT, terminal.handle(), 2)
        .unwrap();
    model
        .connect(terminal.handle(), 3, feeder.handle(), Node::INLET_PORT)
        .unwrap();

    let removed = mutator::remove_air_terminal(&mut model, terminal.handle());

    assert_eq!(removed, vec![terminal.handle()]);
    assert!(model.contains(node.handle()));
    assert_eq!(feeder.outlet_model_object(&model), Some(node.handle()));
    assert_eq!(model.validate_connections(), Ok(()));
}

#[test]
fn vav_remove_cascades_into_plant_loop() {
    let mut model = Model::new();
    let (_air_loop, zone, inlet) = loop_with_zone(&mut model);
    let plant = PlantLoop::new(&mut model);
    let coil = CoilHeatingWater::new(&mut model);
    assert!(plant.add_demand_branch_for_component(&mut model, coil));

    let vav = AirTerminalSingleDuctVavReheat::new(&mut model, coil);
    assert!(vav.add_to_node(&mut model, inlet));
    assert_eq!(coil.plant_loop(&model), Some(plant));

    vav.remove(&mut model);

    assert!(!model.contains(vav.handle()));
    assert!(!model.contains(coil.handle()));
    assert!(plant.demand_branches(&model).is_empty());
    assert!(zone.equipment(&model).is_empty());
    assert_eq!(model.validate_connections(), Ok(()));
}

#[test]
fn splitter_removal_guard() {
    let mut model = Model::new();
    let (air_loop, _zone, _inlet) = loop_with_zone(&mut model);
    let splitter = air_loop.zone_splitter(&model).unwrap();
    let mixer = air_loop.zone_mixer(&model).unwrap();
    let edges = model.edge_count();

    assert!(splitter.remove(&mut model).is_empty());
    assert!(mixer.remove(&mut model).is_empty());
    assert!(remove_model_object(&mut model, splitter.handle()).is_empty());
    assert!(model.contains(splitter.handle()));
    assert_eq!(model.edge_count(), edges);

    // Once the loop is gone the splitter goes with it.
    air_loop.remove(&mut model);
    assert!(!model.contains(splitter.handle()));
}

#[test]
fn zone_removal_takes_its_branch() {
    let mut model = Model::new();
    let (air_loop, zone, _inlet) = loop_with_zone(&mut model);
    let other = ThermalZone::new(&mut model);
    air_loop.add_branch_for_zone(&mut model, other);

    zone.remove(&mut model);

    assert_eq!(air_loop.thermal_zones(&model), vec![other]);
    let splitter = air_loop.zone_splitter(&model).unwrap();
    assert_eq!(splitter.outlet_model_objects(&model).len(), 1);
    assert_eq!(splitter.next_outlet_port(&model), 3);
    assert_eq!(model.validate_connections(), Ok(()));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn next_outlet_ports_are_contiguous(n in 1usize..12) {
            let mut model = Model::new();
            let splitter = AirLoopHvacZoneSplitter::new(&mut model);
            let mut granted = Vec::new();
            for _ in 0..n {
                let port = splitter.next_outlet_port(&model);
                let node = Node::new(&mut model);
                model.connect(splitter.handle(), port, node.handle(), Node::INLET_PORT).unwrap();
                granted.push(port);
            }
            let expected: Vec<usize> = (2..2 + n).collect();
            prop_assert_eq!(granted, expected);
        }

        #[test]
        fn next_inlet_ports_are_contiguous(n in 1usize..12) {
            let mut model = Model::new();
            let mixer = AirLoopHvacZoneMixer::new(&mut model);
            let mut granted = Vec::new();
            for _ in 0..n {
                let port = mixer.next_inlet_port(&model);
                let node = Node::new(&mut model);
                model.connect(node.handle(), Node::OUTLET_PORT, mixer.handle(), port).unwrap();
                granted.push(port);
            }
            let expected: Vec<usize> = (2..2 + n).collect();
            prop_assert_eq!(granted, expected);
        }

        #[test]
        fn branch_removal_keeps_indices_contiguous(
            n in 2usize..10,
            picks in prop::collection::vec(any::<prop::sample::Index>(), 1..5),
        ) {
            let mut model = Model::new();
            let splitter = AirLoopHvacZoneSplitter::new(&mut model);
            let mut nodes: Vec<Node> = Vec::new();
            for _ in 0..n {
                let port = splitter.next_outlet_port(&model);
                let node = Node::new(&mut model);
                model.connect(splitter.handle(), port, node.handle(), Node::INLET_PORT).unwrap();
                nodes.push(node);
            }
            for pick in picks {
                if nodes.is_empty() {
                    break;
                }
                let branch = pick.index(nodes.len());
                prop_assert!(splitter.remove_port_for_branch(&mut model, branch));
                nodes.remove(branch);
            }
            let expected: Vec<_> = nodes.iter().map(|n| n.handle()).collect();
            prop_assert_eq!(splitter.outlet_model_objects(&model), expected);
            prop_assert_eq!(splitter.next_outlet_port(&model), 2 + nodes.len());
            prop_assert_eq!(model.validate_connections(), Ok(()));
        }

        #[test]
        fn disconnect_is_symmetric(n in 1usize..8, from_peer in any::<bool>()) {
            let mut model = Model::new();
            let splitter = AirLoopHvacZoneSplitter::new(&mut model);
            let nodes: Vec<Node> = (0..n)
                .map(|_| {
                    let port = splitter.next_outlet_port(&model);
                    let node = Node::new(&mut model);
                    model.connect(splitter.handle(), port, node.handle(), Node::INLET_PORT).unwrap();
                    node
                })
                .collect();

            if from_peer {
                for node in &nodes {
                    prop_assert!(model.disconnect(node.handle(), Node::INLET_PORT));
                }
            } else {
                Splitter::disconnect(&splitter, &mut model);
            }

            prop_assert_eq!(model.edge_count(), 0);
            prop_assert_eq!(model.fields(splitter.handle()).unwrap().ports().count(), 0);
            for node in &nodes {
                prop_assert_eq!(node.inlet_model_object(&model), None);
            }
        }
    }
}
