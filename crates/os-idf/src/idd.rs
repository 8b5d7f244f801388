//! IDD-lite: field names and extensible groups of the EnergyPlus object
//! types this workspace reads and writes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Repeating tail of an object: fields from `first` onward come in groups of
/// `names.len()`. A standalone `N` word in a name is the 1-based group number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensibleGroup {
    pub first: usize,
    pub names: &'static [&'static str],
}

impl ExtensibleGroup {
    pub fn size(&self) -> usize {
        self.names.len()
    }
}

#[derive(Debug)]
struct IddEntry {
    name: &'static str,
    fields: &'static [&'static str],
    extensible: Option<ExtensibleGroup>,
    named: bool,
}

/// EnergyPlus object types known to the schema. Anything else parses as
/// `Other` and is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IddObjectType {
    Version,
    Zone,
    ZoneHvacEquipmentConnections,
    ZoneHvacEquipmentList,
    NodeList,
    AirLoopHvacZoneSplitter,
    AirLoopHvacZoneMixer,
    AirLoopHvacSupplyPath,
    AirLoopHvacReturnPath,
    AirTerminalSingleDuctUncontrolled,
    AirTerminalSingleDuctVavReheat,
    ZoneHvacAirDistributionUnit,
    CoilHeatingWater,
    CoilHeatingElectric,
    DaylightingControls,
    DaylightingReferencePoint,
    Branch,
    PipeAdiabatic,
    ConnectorSplitter,
    ConnectorMixer,
    Other(String),
}

use IddObjectType as T;

static KNOWN: [IddObjectType; 20] = [
    T::Version,
    T::Zone,
    T::ZoneHvacEquipmentConnections,
    T::ZoneHvacEquipmentList,
    T::NodeList,
    T::AirLoopHvacZoneSplitter,
    T::AirLoopHvacZoneMixer,
    T::AirLoopHvacSupplyPath,
    T::AirLoopHvacReturnPath,
    T::AirTerminalSingleDuctUncontrolled,
    T::AirTerminalSingleDuctVavReheat,
    T::ZoneHvacAirDistributionUnit,
    T::CoilHeatingWater,
    T::CoilHeatingElectric,
    T::DaylightingControls,
    T::DaylightingReferencePoint,
    T::Branch,
    T::PipeAdiabatic,
    T::ConnectorSplitter,
    T::ConnectorMixer,
];

fn entry(t: &IddObjectType) -> Option<&'static IddEntry> {
    let entry = match t {
        T::Version => &IddEntry {
            name: "Version",
            fields: &["Version Identifier"],
            extensible: None,
            named: false,
        },
        T::Zone => &IddEntry {
            name: "Zone",
            fields: &[
                "Name",
                "Direction of Relative North",
                "X Origin",
                "Y Origin",
                "Z Origin",
                "Type",
                "Multiplier",
                "Ceiling Height",
                "Volume",
                "Floor Area",
                "Zone Inside Convection Algorithm",
                "Zone Outside Convection Algorithm",
                "Part of Total Floor Area",
            ],
            extensible: None,
            named: true,
        },
        T::ZoneHvacEquipmentConnections => &IddEntry {
            name: "ZoneHVAC:EquipmentConnections",
            fields: &[
                "Zone Name",
                "Zone Conditioning Equipment List Name",
                "Zone Air Inlet Node or NodeList Name",
                "Zone Air Exhaust Node or NodeList Name",
                "Zone Air Node Name",
                "Zone Return Air Node or NodeList Name",
            ],
            extensible: None,
            named: true,
        },
        T::ZoneHvacEquipmentList => &IddEntry {
            name: "ZoneHVAC:EquipmentList",
            fields: &["Name"],
            extensible: Some(ExtensibleGroup {
                first: 1,
                names: &[
                    "Zone Equipment N Object Type",
                    "Zone Equipment N Name",
                    "Zone Equipment N Cooling Sequence",
                    "Zone Equipment N Heating or No-Load Sequence",
                ],
            }),
            named: true,
        },
        T::NodeList => &IddEntry {
            name: "NodeList",
            fields: &["Name"],
            extensible: Some(ExtensibleGroup {
                first: 1,
                names: &["Node N Name"],
            }),
            named: true,
        },
        T::AirLoopHvacZoneSplitter => &IddEntry {
            name: "AirLoopHVAC:ZoneSplitter",
            fields: &["Name", "Inlet Node Name"],
            extensible: Some(ExtensibleGroup {
                first: 2,
                names: &["Outlet N Node Name"],
            }),
            named: true,
        },
        T::AirLoopHvacZoneMixer => &IddEntry {
            name: "AirLoopHVAC:ZoneMixer",
            fields: &["Name", "Outlet Node Name"],
            extensible: Some(ExtensibleGroup {
                first: 2,
                names: &["Inlet N Node Name"],
            }),
            named: true,
        },
        T::AirLoopHvacSupplyPath => &IddEntry {
            name: "AirLoopHVAC:SupplyPath",
            fields: &["Name", "Supply Air Path Inlet Node Name"],
            extensible: Some(ExtensibleGroup {
                first: 2,
                names: &["Component N Object Type", "Component N Name"],
            }),
            named: true,
        },
        T::AirLoopHvacReturnPath => &IddEntry {
            name: "AirLoopHVAC:ReturnPath",
            fields: &["Name", "Return Air Path Outlet Node Name"],
            extensible: Some(ExtensibleGroup {
                first: 2,
                names: &["Component N Object Type", "Component N Name"],
            }),
            named: true,
        },
        T::AirTerminalSingleDuctUncontrolled => &IddEntry {
            name: "AirTerminal:SingleDuct:Uncontrolled",
            fields: &[
                "Name",
                "Availability Schedule Name",
                "Zone Supply Air Node Name",
                "Maximum Air Flow Rate",
            ],
            extensible: None,
            named: true,
        },
        T::AirTerminalSingleDuctVavReheat => &IddEntry {
            name: "AirTerminal:SingleDuct:VAV:Reheat",
            fields: &[
                "Name",
                "Availability Schedule Name",
                "Damper Air Outlet Node Name",
                "Air Inlet Node Name",
                "Maximum Air Flow Rate",
                "Zone Minimum Air Flow Input Method",
                "Constant Minimum Air Flow Fraction",
                "Fixed Minimum Air Flow Rate",
                "Minimum Air Flow Fraction Schedule Name",
                "Reheat Coil Object Type",
                "Reheat Coil Name",
                "Maximum Hot Water or Steam Flow Rate",
                "Minimum Hot Water or Steam Flow Rate",
                "Air Outlet Node Name",
                "Convergence Tolerance",
                "Damper Heating Action",
                "Maximum Flow Per Zone Floor Area During Reheat",
                "Maximum Flow Fraction During Reheat",
                "Maximum Reheat Air Temperature",
            ],
            extensible: None,
            named: true,
        },
        T::ZoneHvacAirDistributionUnit => &IddEntry {
            name: "ZoneHVAC:AirDistributionUnit",
            fields: &[
                "Name",
                "Air Distribution Unit Outlet Node Name",
                "Air Terminal Object Type",
                "Air Terminal Name",
            ],
            extensible: None,
            named: true,
        },
        T::CoilHeatingWater => &IddEntry {
            name: "Coil:Heating:Water",
            fields: &[
                "Name",
                "Availability Schedule Name",
                "U-Factor Times Area Value",
                "Maximum Water Flow Rate",
                "Water Inlet Node Name",
                "Water Outlet Node Name",
                "Air Inlet Node Name",
                "Air Outlet Node Name",
                "Performance Input Method",
                "Rated Capacity",
            ],
            extensible: None,
            named: true,
        },
        T::CoilHeatingElectric => &IddEntry {
            name: "Coil:Heating:Electric",
            fields: &[
                "Name",
                "Availability Schedule Name",
                "Efficiency",
                "Nominal Capacity",
                "Air Inlet Node Name",
                "Air Outlet Node Name",
                "Temperature Setpoint Node Name",
            ],
            extensible: None,
            named: true,
        },
        T::DaylightingControls => &IddEntry {
            name: "Daylighting:Controls",
            fields: &[
                "Name",
                "Zone Name",
                "Daylighting Method",
                "Availability Schedule Name",
                "Lighting Control Type",
                "Minimum Input Power Fraction for Continuous or ContinuousOff Dimming Control",
                "Minimum Light Output Fraction for Continuous or ContinuousOff Dimming Control",
                "Number of Stepped Control Steps",
                "Probability Lighting will be Reset When Needed in Manual Stepped Control",
                "Glare Calculation Daylighting Reference Point Name",
                "Glare Calculation Azimuth Angle of View Direction Clockwise from Zone y-Axis",
                "Maximum Allowable Discomfort Glare Index",
                "DElight Gridding Resolution",
            ],
            extensible: Some(ExtensibleGroup {
                first: 13,
                names: &[
                    "Daylighting Reference Point N Name",
                    "Fraction of Zone Controlled by Reference Point N",
                    "Illuminance Setpoint at Reference Point N",
                ],
            }),
            named: true,
        },
        T::DaylightingReferencePoint => &IddEntry {
            name: "Daylighting:ReferencePoint",
            fields: &[
                "Name",
                "Zone Name",
                "X-Coordinate of Reference Point",
                "Y-Coordinate of Reference Point",
                "Z-Coordinate of Reference Point",
            ],
            extensible: None,
            named: true,
        },
        T::Branch => &IddEntry {
            name: "Branch",
            fields: &["Name", "Pressure Drop Curve Name"],
            extensible: Some(ExtensibleGroup {
                first: 2,
                names: &[
                    "Component N Object Type",
                    "Component N Name",
                    "Component N Inlet Node Name",
                    "Component N Outlet Node Name",
                ],
            }),
            named: true,
        },
        T::PipeAdiabatic => &IddEntry {
            name: "Pipe:Adiabatic",
            fields: &["Name", "Inlet Node Name", "Outlet Node Name"],
            extensible: None,
            named: true,
        },
        T::ConnectorSplitter => &IddEntry {
            name: "Connector:Splitter",
            fields: &["Name", "Inlet Branch Name"],
            extensible: Some(ExtensibleGroup {
                first: 2,
                names: &["Outlet Branch N Name"],
            }),
            named: true,
        },
        T::ConnectorMixer => &IddEntry {
            name: "Connector:Mixer",
            fields: &["Name", "Outlet Branch Name"],
            extensible: Some(ExtensibleGroup {
                first: 2,
                names: &["Inlet Branch N Name"],
            }),
            named: true,
        },
        T::Other(_) => return None,
    };
    Some(entry)
}

impl IddObjectType {
    /// Every type with a schema entry.
    pub fn known() -> &'static [IddObjectType] {
        &KNOWN
    }

    /// The type name as written in IDF text.
    pub fn name(&self) -> &str {
        match self {
            T::Other(name) => name,
            known => entry(known).map_or("", |e| e.name),
        }
    }

    /// Case-insensitive lookup; unknown names become `Other`.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        KNOWN
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .cloned()
            .unwrap_or_else(|| T::Other(name.to_string()))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, T::Other(_))
    }

    /// Whether field 0 is the object's name.
    pub fn has_name(&self) -> bool {
        entry(self).is_some_and(|e| e.named)
    }

    /// Nonextensible field names.
    pub fn field_names(&self) -> &'static [&'static str] {
        entry(self).map_or(&[], |e| e.fields)
    }

    pub fn extensible_group(&self) -> Option<ExtensibleGroup> {
        entry(self).and_then(|e| e.extensible)
    }

    /// Name of field `index`, numbering extensible groups from 1.
    pub fn field_name(&self, index: usize) -> Option<String> {
        let fields = self.field_names();
        if let Some(name) = fields.get(index) {
            return Some((*name).to_string());
        }
        let group = self.extensible_group()?;
        if index < group.first {
            return None;
        }
        let offset = index - group.first;
        let number = offset / group.size() + 1;
        let template = group.names[offset % group.size()];
        let words: Vec<String> = template
            .split(' ')
            .map(|w| {
                if w == "N" {
                    number.to_string()
                } else {
                    w.to_string()
                }
            })
            .collect();
        Some(words.join(" "))
    }
}

impl From<String> for IddObjectType {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<IddObjectType> for String {
    fn from(value: IddObjectType) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for IddObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
