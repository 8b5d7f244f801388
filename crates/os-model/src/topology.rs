//! Read-only directed-graph snapshot of a model's connections.

use std::collections::HashMap;

use os_core::Handle;
use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::model::Model;
use crate::object_kind::{ObjectKind, PortDirection};

/// Vertex weight: one model object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyNode {
    pub handle: Handle,
    pub kind: ObjectKind,
}

/// Edge weight: the ports joined by one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyEdge {
    pub source_port: usize,
    pub target_port: usize,
}

/// Objects as vertices, connections as edges pointing downstream.
///
/// The snapshot is detached from the model: later mutations do not show up.
#[derive(Debug, Clone)]
pub struct Topology {
    graph: DiGraph<TopologyNode, TopologyEdge>,
    indices: HashMap<Handle, NodeIndex>,
}

impl Topology {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn graph(&self) -> &DiGraph<TopologyNode, TopologyEdge> {
        &self.graph
    }

    fn neighbors(&self, handle: Handle, direction: Direction) -> Vec<Handle> {
        let Some(&index) = self.indices.get(&handle) else {
            return Vec::new();
        };
        let mut out: Vec<Handle> = self
            .graph
            .neighbors_directed(index, direction)
            .map(|n| self.graph[n].handle)
            .collect();
        // petgraph yields neighbours newest-edge first
        out.reverse();
        out
    }

    pub fn downstream(&self, handle: Handle) -> Vec<Handle> {
        self.neighbors(handle, Direction::Outgoing)
    }

    pub fn upstream(&self, handle: Handle) -> Vec<Handle> {
        self.neighbors(handle, Direction::Incoming)
    }

    /// Every object reachable downstream of `handle`, depth-first.
    pub fn reachable_from(&self, handle: Handle) -> Vec<Handle> {
        let Some(&start) = self.indices.get(&handle) else {
            return Vec::new();
        };
        let mut seen = vec![false; self.graph.node_count()];
        let mut stack = vec![start];
        let mut found = Vec::new();
        while let Some(index) = stack.pop() {
            if std::mem::replace(&mut seen[index.index()], true) {
                continue;
            }
            if index != start {
                found.push(self.graph[index].handle);
            }
            stack.extend(self.graph.neighbors_directed(index, Direction::Outgoing));
        }
        found
    }

    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }
}

impl Model {
    /// Snapshot the connection graph. Vertices follow construction order;
    /// each connection becomes one edge from its outbound side.
    pub fn topology(&self) -> Topology {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();

        for record in self.records() {
            let index = graph.add_node(TopologyNode {
                handle: record.handle,
                kind: record.kind,
            });
            indices.insert(record.handle, index);
        }

        for record in self.records() {
            let layout = record.kind.port_layout();
            for (port, peer) in record.fields.ports() {
                if layout.direction(port) != Some(PortDirection::Outbound) {
                    continue;
                }
                if let (Some(&from), Some(&to)) =
                    (indices.get(&record.handle), indices.get(&peer.peer))
                {
                    graph.add_edge(
                        from,
                        to,
                        TopologyEdge {
                            source_port: port,
                            target_port: peer.peer_port,
                        },
                    );
                }
            }
        }

        Topology { graph, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ModelObject;
    use crate::components::air_loop::AirLoopHvac;
    use crate::components::thermal_zone::ThermalZone;

    #[test]
    fn snapshot_matches_edge_count() {
        let mut model = Model::new();
        let air_loop = AirLoopHvac::new(&mut model);
        let zone = ThermalZone::new(&mut model);
        air_loop.add_branch_for_zone(&mut model, zone);

        let topo = model.topology();
        assert_eq!(topo.node_count(), model.len());
        assert_eq!(topo.edge_count(), model.edge_count());
        assert!(!topo.is_cyclic());
    }

    #[test]
    fn splitter_fans_out_in_port_order() {
        let mut model = Model::new();
        let air_loop = AirLoopHvac::new(&mut model);
        let a = ThermalZone::new(&mut model);
        let b = ThermalZone::new(&mut model);
        air_loop.add_branch_for_zone(&mut model, a);
        air_loop.add_branch_for_zone(&mut model, b);

        let splitter = air_loop.zone_splitter(&model).unwrap();
        let topo = model.topology();
        let down = topo.downstream(splitter.handle());
        assert_eq!(down.len(), 2);
        assert_eq!(
            down,
            crate::ports::Splitter::outlet_model_objects(&splitter, &model)
        );

        let demand_inlet = air_loop.demand_inlet_node(&model).unwrap();
        let reach = topo.reachable_from(demand_inlet.handle());
        assert!(reach.contains(&a.inlet_port_list(&model).unwrap().handle()));
    }
}
