//! os-model: the HVAC topology object model.
//!
//! Provides:
//! - An arena [`Model`] of objects keyed by [`Handle`](os_core::Handle)
//! - Index-addressed field stores with mirrored port connections
//! - Typed component views (nodes, splitters, mixers, zones, loops,
//!   terminals, coils, daylighting controls)
//! - Port allocation and terminal splicing
//! - A petgraph topology snapshot and consistency validation
//!
//! # Example
//!
//! ```
//! use os_model::{AirLoopHvac, AirTerminal, AirTerminalSingleDuctUncontrolled, Model, ThermalZone};
//!
//! let mut model = Model::new();
//! let air_loop = AirLoopHvac::new(&mut model);
//! let zone = ThermalZone::new_named(&mut model, "Office");
//! let terminal = AirTerminalSingleDuctUncontrolled::new(&mut model);
//!
//! assert!(air_loop.add_branch_for_zone_with_terminal(&mut model, zone, terminal));
//! assert_eq!(air_loop.thermal_zones(&model), vec![zone]);
//! assert_eq!(terminal.thermal_zone(&model), Some(zone));
//! ```

pub mod components;
pub mod error;
pub mod field_store;
pub mod model;
pub mod mutator;
pub mod object_kind;
pub mod ports;
pub mod topology;
pub(crate) mod validate;

pub use components::air_loop::AirLoopHvac;
pub use components::coils::{CoilHeatingElectric, CoilHeatingWater, ReheatCoil, WaterToAirComponent};
pub use components::daylighting::DaylightingControl;
pub use components::node::Node;
pub use components::plant_loop::PlantLoop;
pub use components::port_list::PortList;
pub use components::splitter_mixer::{
    AirLoopHvacZoneMixer, AirLoopHvacZoneSplitter, ConnectorMixer, ConnectorSplitter,
};
pub use components::terminals::{
    AirTerminal, AirTerminalSingleDuctUncontrolled, AirTerminalSingleDuctVavReheat,
};
pub use components::thermal_zone::{ThermalZone, daylighting_controls};
pub use components::{ModelObject, StraightComponent, remove_model_object};
pub use error::{ModelError, ModelResult};
pub use field_store::{FieldStore, FieldValue, PortRef};
pub use model::Model;
pub use object_kind::{ObjectKind, PortDirection, PortLayout};
pub use ports::{Mixer, Splitter, next_port, port_for_branch};
pub use topology::{Topology, TopologyEdge, TopologyNode};
