//! Object type tags and their port layouts.

use core::fmt;

/// Direction of a port slot, seen from the object owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// Receives flow (an inlet).
    Inbound,
    /// Sends flow (an outlet).
    Outbound,
}

/// Which field slots of a kind hold connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortLayout {
    /// Fixed port slots.
    pub fixed: &'static [(usize, PortDirection)],
    /// First dynamically allocated slot and the direction of every dynamic slot.
    pub dynamic: Option<(usize, PortDirection)>,
}

impl PortLayout {
    const NONE: PortLayout = PortLayout {
        fixed: &[],
        dynamic: None,
    };

    /// Direction of `port`, or `None` if the slot is not a port for this layout.
    pub fn direction(&self, port: usize) -> Option<PortDirection> {
        if let Some(&(_, dir)) = self.fixed.iter().find(|(idx, _)| *idx == port) {
            return Some(dir);
        }
        match self.dynamic {
            Some((first, dir)) if port >= first => Some(dir),
            _ => None,
        }
    }

    pub fn is_dynamic(&self, port: usize) -> bool {
        matches!(self.dynamic, Some((first, _)) if port >= first)
    }
}

/// Concrete object types of the HVAC model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Node,
    AirLoopHvac,
    AirLoopHvacZoneSplitter,
    AirLoopHvacZoneMixer,
    ConnectorSplitter,
    ConnectorMixer,
    PortList,
    ThermalZone,
    PlantLoop,
    AirTerminalSingleDuctUncontrolled,
    AirTerminalSingleDuctVavReheat,
    CoilHeatingWater,
    CoilHeatingElectric,
    DaylightingControl,
}

use PortDirection::{Inbound, Outbound};

impl ObjectKind {
    pub const ALL: [ObjectKind; 14] = [
        ObjectKind::Node,
        ObjectKind::AirLoopHvac,
        ObjectKind::AirLoopHvacZoneSplitter,
        ObjectKind::AirLoopHvacZoneMixer,
        ObjectKind::ConnectorSplitter,
        ObjectKind::ConnectorMixer,
        ObjectKind::PortList,
        ObjectKind::ThermalZone,
        ObjectKind::PlantLoop,
        ObjectKind::AirTerminalSingleDuctUncontrolled,
        ObjectKind::AirTerminalSingleDuctVavReheat,
        ObjectKind::CoilHeatingWater,
        ObjectKind::CoilHeatingElectric,
        ObjectKind::DaylightingControl,
    ];

    /// OpenStudio IDD object name.
    pub fn iddname(self) -> &'static str {
        match self {
            ObjectKind::Node => "OS:Node",
            ObjectKind::AirLoopHvac => "OS:AirLoopHVAC",
            ObjectKind::AirLoopHvacZoneSplitter => "OS:AirLoopHVAC:ZoneSplitter",
            ObjectKind::AirLoopHvacZoneMixer => "OS:AirLoopHVAC:ZoneMixer",
            ObjectKind::ConnectorSplitter => "OS:Connector:Splitter",
            ObjectKind::ConnectorMixer => "OS:Connector:Mixer",
            ObjectKind::PortList => "OS:PortList",
            ObjectKind::ThermalZone => "OS:ThermalZone",
            ObjectKind::PlantLoop => "OS:PlantLoop",
            ObjectKind::AirTerminalSingleDuctUncontrolled => {
                "OS:AirTerminal:SingleDuct:Uncontrolled"
            }
            ObjectKind::AirTerminalSingleDuctVavReheat => "OS:AirTerminal:SingleDuct:VAV:Reheat",
            ObjectKind::CoilHeatingWater => "OS:Coil:Heating:Water",
            ObjectKind::CoilHeatingElectric => "OS:Coil:Heating:Electric",
            ObjectKind::DaylightingControl => "OS:Daylighting:Control",
        }
    }

    /// Base used for generated names ("Node 1", "Node 2", ...).
    pub fn default_name(self) -> &'static str {
        match self {
            ObjectKind::Node => "Node",
            ObjectKind::AirLoopHvac => "Air Loop HVAC",
            ObjectKind::AirLoopHvacZoneSplitter => "Air Loop HVAC Zone Splitter",
            ObjectKind::AirLoopHvacZoneMixer => "Air Loop HVAC Zone Mixer",
            ObjectKind::ConnectorSplitter => "Connector Splitter",
            ObjectKind::ConnectorMixer => "Connector Mixer",
            ObjectKind::PortList => "Port List",
            ObjectKind::ThermalZone => "Thermal Zone",
            ObjectKind::PlantLoop => "Plant Loop",
            ObjectKind::AirTerminalSingleDuctUncontrolled => {
                "Air Terminal Single Duct Uncontrolled"
            }
            ObjectKind::AirTerminalSingleDuctVavReheat => "Air Terminal Single Duct VAV Reheat",
            ObjectKind::CoilHeatingWater => "Coil Heating Water",
            ObjectKind::CoilHeatingElectric => "Coil Heating Electric",
            ObjectKind::DaylightingControl => "Daylighting Control",
        }
    }

    /// Number of nonextensible fields, Name included.
    pub fn field_count(self) -> usize {
        match self {
            ObjectKind::Node => 3,
            ObjectKind::AirLoopHvac => 8,
            ObjectKind::AirLoopHvacZoneSplitter
            | ObjectKind::AirLoopHvacZoneMixer
            | ObjectKind::ConnectorSplitter
            | ObjectKind::ConnectorMixer
            | ObjectKind::PortList => 2,
            ObjectKind::ThermalZone => 9,
            ObjectKind::PlantLoop => 5,
            ObjectKind::AirTerminalSingleDuctUncontrolled => 5,
            ObjectKind::AirTerminalSingleDuctVavReheat => 14,
            ObjectKind::CoilHeatingWater => 10,
            ObjectKind::CoilHeatingElectric => 6,
            ObjectKind::DaylightingControl => 13,
        }
    }

    /// First index of a pointer-valued extensible list, if the kind has one.
    pub fn extensible_pointers_start(self) -> Option<usize> {
        match self {
            ObjectKind::ThermalZone => Some(9),
            _ => None,
        }
    }

    pub fn port_layout(self) -> PortLayout {
        match self {
            ObjectKind::Node => PortLayout {
                fixed: &[(1, Inbound), (2, Outbound)],
                dynamic: None,
            },
            ObjectKind::AirLoopHvacZoneSplitter | ObjectKind::ConnectorSplitter => PortLayout {
                fixed: &[(1, Inbound)],
                dynamic: Some((2, Outbound)),
            },
            ObjectKind::AirLoopHvacZoneMixer | ObjectKind::ConnectorMixer => PortLayout {
                fixed: &[(1, Outbound)],
                dynamic: Some((2, Inbound)),
            },
            ObjectKind::PortList => PortLayout {
                fixed: &[],
                dynamic: Some((2, Inbound)),
            },
            ObjectKind::ThermalZone => PortLayout {
                fixed: &[(4, Outbound)],
                dynamic: None,
            },
            ObjectKind::AirTerminalSingleDuctUncontrolled
            | ObjectKind::AirTerminalSingleDuctVavReheat => PortLayout {
                fixed: &[(2, Inbound), (3, Outbound)],
                dynamic: None,
            },
            ObjectKind::CoilHeatingWater => PortLayout {
                fixed: &[(2, Inbound), (3, Outbound), (4, Inbound), (5, Outbound)],
                dynamic: None,
            },
            ObjectKind::CoilHeatingElectric => PortLayout {
                fixed: &[(4, Inbound), (5, Outbound)],
                dynamic: None,
            },
            ObjectKind::AirLoopHvac | ObjectKind::PlantLoop | ObjectKind::DaylightingControl => {
                PortLayout::NONE
            }
        }
    }

    pub fn is_splitter(self) -> bool {
        matches!(
            self,
            ObjectKind::AirLoopHvacZoneSplitter | ObjectKind::ConnectorSplitter
        )
    }

    pub fn is_mixer(self) -> bool {
        matches!(
            self,
            ObjectKind::AirLoopHvacZoneMixer | ObjectKind::ConnectorMixer
        )
    }

    pub fn is_air_terminal(self) -> bool {
        matches!(
            self,
            ObjectKind::AirTerminalSingleDuctUncontrolled
                | ObjectKind::AirTerminalSingleDuctVavReheat
        )
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iddname())
    }
}
