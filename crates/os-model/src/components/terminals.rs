//! Single-duct air terminals.

use os_core::{Handle, Real, is_fraction};

use crate::components::coils::ReheatCoil;
use crate::components::node::Node;
use crate::components::thermal_zone::ThermalZone;
use crate::components::{
    ModelObject, StraightComponent, get_double, get_pointer, get_string, model_object,
    set_double, set_optional_double, set_pointer, set_string,
};
use crate::model::Model;
use crate::mutator;
use crate::object_kind::ObjectKind;

/// Inlet port shared by every single-duct terminal.
pub const TERMINAL_INLET_PORT: usize = 2;
/// Outlet port shared by every single-duct terminal.
pub const TERMINAL_OUTLET_PORT: usize = 3;

/// A terminal unit that can be spliced onto a zone branch.
pub trait AirTerminal: StraightComponent {
    /// Splice this terminal in front of `node`.
    ///
    /// `node` must lead to a zone's port list (or to a mixer owned by an air
    /// loop) and be fed by a splitter. Returns false and leaves the model
    /// unchanged otherwise.
    fn add_to_node(&self, model: &mut Model, node: Node) -> bool {
        mutator::add_terminal_to_node(model, self.handle(), node)
    }

    /// Zone listing this terminal as equipment.
    fn thermal_zone(&self, model: &Model) -> Option<ThermalZone> {
        model.zone_for_equipment(self.handle())
    }
}

macro_rules! terminal_ports {
    ($name:ident) => {
        impl StraightComponent for $name {
            fn inlet_port(&self) -> usize {
                TERMINAL_INLET_PORT
            }

            fn outlet_port(&self) -> usize {
                TERMINAL_OUTLET_PORT
            }
        }

        impl AirTerminal for $name {}
    };
}

model_object!(
    /// Passes supply air straight into the zone.
    AirTerminalSingleDuctUncontrolled,
    ObjectKind::AirTerminalSingleDuctUncontrolled
);
terminal_ports!(AirTerminalSingleDuctUncontrolled);

model_object!(
    /// Variable-volume terminal with a reheat coil.
    AirTerminalSingleDuctVavReheat,
    ObjectKind::AirTerminalSingleDuctVavReheat
);
terminal_ports!(AirTerminalSingleDuctVavReheat);

impl AirTerminalSingleDuctUncontrolled {
    pub const AVAILABILITY_SCHEDULE_FIELD: usize = 1;
    pub const MAXIMUM_AIR_FLOW_RATE_FIELD: usize = 4;

    pub fn new(model: &mut Model) -> Self {
        Self(model.add_object(ObjectKind::AirTerminalSingleDuctUncontrolled))
    }

    pub fn availability_schedule(&self, model: &Model) -> Option<String> {
        get_string(model, self.0, Self::AVAILABILITY_SCHEDULE_FIELD)
    }

    pub fn set_availability_schedule(&self, model: &mut Model, schedule: &str) -> bool {
        set_string(model, self.0, Self::AVAILABILITY_SCHEDULE_FIELD, schedule)
    }

    /// `None` means autosized.
    pub fn maximum_air_flow_rate(&self, model: &Model) -> Option<Real> {
        get_double(model, self.0, Self::MAXIMUM_AIR_FLOW_RATE_FIELD)
    }

    pub fn is_maximum_air_flow_rate_autosized(&self, model: &Model) -> bool {
        self.maximum_air_flow_rate(model).is_none()
    }

    pub fn set_maximum_air_flow_rate(&self, model: &mut Model, rate: Real) -> bool {
        rate >= 0.0 && set_double(model, self.0, Self::MAXIMUM_AIR_FLOW_RATE_FIELD, rate)
    }

    pub fn autosize_maximum_air_flow_rate(&self, model: &mut Model) {
        set_optional_double(model, self.0, Self::MAXIMUM_AIR_FLOW_RATE_FIELD, None);
    }

    /// Unsplices the terminal from its branch, deregisters it from its zone
    /// and removes it.
    pub fn remove(&self, model: &mut Model) -> Vec<Handle> {
        mutator::remove_air_terminal(model, self.0)
    }
}

impl AirTerminalSingleDuctVavReheat {
    pub const AVAILABILITY_SCHEDULE_FIELD: usize = 1;
    pub const MAXIMUM_AIR_FLOW_RATE_FIELD: usize = 4;
    pub const ZONE_MINIMUM_AIR_FLOW_INPUT_METHOD_FIELD: usize = 5;
    pub const CONSTANT_MINIMUM_AIR_FLOW_FRACTION_FIELD: usize = 6;
    pub const FIXED_MINIMUM_AIR_FLOW_RATE_FIELD: usize = 7;
    pub const REHEAT_COIL_FIELD: usize = 8;
    pub const MAXIMUM_HOT_WATER_OR_STEAM_FLOW_RATE_FIELD: usize = 9;
    pub const MINIMUM_HOT_WATER_OR_STEAM_FLOW_RATE_FIELD: usize = 10;
    pub const CONVERGENCE_TOLERANCE_FIELD: usize = 11;
    pub const DAMPER_HEATING_ACTION_FIELD: usize = 12;
    pub const MAXIMUM_REHEAT_AIR_TEMPERATURE_FIELD: usize = 13;

    pub const INPUT_METHODS: [&'static str; 3] = ["Constant", "FixedFlowRate", "Scheduled"];
    pub const DAMPER_ACTIONS: [&'static str; 2] = ["Normal", "Reverse"];

    /// Create a terminal that reheats with `coil`.
    pub fn new<C: ReheatCoil>(model: &mut Model, coil: C) -> Self {
        let terminal = Self(model.add_object(ObjectKind::AirTerminalSingleDuctVavReheat));
        set_pointer(model, terminal.0, Self::REHEAT_COIL_FIELD, coil.handle());
        set_string(
            model,
            terminal.0,
            Self::ZONE_MINIMUM_AIR_FLOW_INPUT_METHOD_FIELD,
            "Constant",
        );
        set_double(model, terminal.0, Self::CONSTANT_MINIMUM_AIR_FLOW_FRACTION_FIELD, 0.3);
        set_double(model, terminal.0, Self::FIXED_MINIMUM_AIR_FLOW_RATE_FIELD, 0.0);
        set_double(model, terminal.0, Self::MINIMUM_HOT_WATER_OR_STEAM_FLOW_RATE_FIELD, 0.0);
        set_double(model, terminal.0, Self::CONVERGENCE_TOLERANCE_FIELD, 0.001);
        set_string(model, terminal.0, Self::DAMPER_HEATING_ACTION_FIELD, "Normal");
        set_double(model, terminal.0, Self::MAXIMUM_REHEAT_AIR_TEMPERATURE_FIELD, 35.0);
        terminal
    }

    pub fn reheat_coil(&self, model: &Model) -> Option<Handle> {
        get_pointer(model, self.0, Self::REHEAT_COIL_FIELD)
    }

    pub fn set_reheat_coil<C: ReheatCoil>(&self, model: &mut Model, coil: C) -> bool {
        set_pointer(model, self.0, Self::REHEAT_COIL_FIELD, coil.handle())
    }

    pub fn availability_schedule(&self, model: &Model) -> Option<String> {
        get_string(model, self.0, Self::AVAILABILITY_SCHEDULE_FIELD)
    }

    pub fn set_availability_schedule(&self, model: &mut Model, schedule: &str) -> bool {
        set_string(model, self.0, Self::AVAILABILITY_SCHEDULE_FIELD, schedule)
    }

    /// `None` means autosized.
    pub fn maximum_air_flow_rate(&self, model: &Model) -> Option<Real> {
        get_double(model, self.0, Self::MAXIMUM_AIR_FLOW_RATE_FIELD)
    }

    pub fn set_maximum_air_flow_rate(&self, model: &mut Model, rate: Option<Real>) -> bool {
        rate.is_none_or(|r| r >= 0.0)
            && set_optional_double(model, self.0, Self::MAXIMUM_AIR_FLOW_RATE_FIELD, rate)
    }

    pub fn zone_minimum_air_flow_input_method(&self, model: &Model) -> String {
        get_string(model, self.0, Self::ZONE_MINIMUM_AIR_FLOW_INPUT_METHOD_FIELD)
            .unwrap_or_else(|| "Constant".to_string())
    }

    pub fn set_zone_minimum_air_flow_input_method(&self, model: &mut Model, method: &str) -> bool {
        let Some(canonical) = Self::INPUT_METHODS
            .iter()
            .find(|m| m.eq_ignore_ascii_case(method))
        else {
            return false;
        };
        set_string(
            model,
            self.0,
            Self::ZONE_MINIMUM_AIR_FLOW_INPUT_METHOD_FIELD,
            canonical,
        )
    }

    pub fn constant_minimum_air_flow_fraction(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::CONSTANT_MINIMUM_AIR_FLOW_FRACTION_FIELD).unwrap_or(0.3)
    }

    pub fn set_constant_minimum_air_flow_fraction(&self, model: &mut Model, fraction: Real) -> bool {
        is_fraction(fraction)
            && set_double(
                model,
                self.0,
                Self::CONSTANT_MINIMUM_AIR_FLOW_FRACTION_FIELD,
                fraction,
            )
    }

    pub fn fixed_minimum_air_flow_rate(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::FIXED_MINIMUM_AIR_FLOW_RATE_FIELD).unwrap_or(0.0)
    }

    pub fn set_fixed_minimum_air_flow_rate(&self, model: &mut Model, rate: Real) -> bool {
        rate >= 0.0 && set_double(model, self.0, Self::FIXED_MINIMUM_AIR_FLOW_RATE_FIELD, rate)
    }

    /// `None` means autosized.
    pub fn maximum_hot_water_or_steam_flow_rate(&self, model: &Model) -> Option<Real> {
        get_double(model, self.0, Self::MAXIMUM_HOT_WATER_OR_STEAM_FLOW_RATE_FIELD)
    }

    pub fn set_maximum_hot_water_or_steam_flow_rate(
        &self,
        model: &mut Model,
        rate: Option<Real>,
    ) -> bool {
        rate.is_none_or(|r| r >= 0.0)
            && set_optional_double(
                model,
                self.0,
                Self::MAXIMUM_HOT_WATER_OR_STEAM_FLOW_RATE_FIELD,
                rate,
            )
    }

    pub fn minimum_hot_water_or_steam_flow_rate(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::MINIMUM_HOT_WATER_OR_STEAM_FLOW_RATE_FIELD).unwrap_or(0.0)
    }

    pub fn set_minimum_hot_water_or_steam_flow_rate(&self, model: &mut Model, rate: Real) -> bool {
        rate >= 0.0
            && set_double(
                model,
                self.0,
                Self::MINIMUM_HOT_WATER_OR_STEAM_FLOW_RATE_FIELD,
                rate,
            )
    }

    pub fn convergence_tolerance(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::CONVERGENCE_TOLERANCE_FIELD).unwrap_or(0.001)
    }

    pub fn set_convergence_tolerance(&self, model: &mut Model, tolerance: Real) -> bool {
        tolerance > 0.0 && set_double(model, self.0, Self::CONVERGENCE_TOLERANCE_FIELD, tolerance)
    }

    pub fn damper_heating_action(&self, model: &Model) -> String {
        get_string(model, self.0, Self::DAMPER_HEATING_ACTION_FIELD)
            .unwrap_or_else(|| "Normal".to_string())
    }

    pub fn set_damper_heating_action(&self, model: &mut Model, action: &str) -> bool {
        let Some(canonical) = Self::DAMPER_ACTIONS
            .iter()
            .find(|a| a.eq_ignore_ascii_case(action))
        else {
            return false;
        };
        set_string(model, self.0, Self::DAMPER_HEATING_ACTION_FIELD, canonical)
    }

    pub fn maximum_reheat_air_temperature(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::MAXIMUM_REHEAT_AIR_TEMPERATURE_FIELD).unwrap_or(35.0)
    }

    pub fn set_maximum_reheat_air_temperature(&self, model: &mut Model, temperature: Real) -> bool {
        set_double(
            model,
            self.0,
            Self::MAXIMUM_REHEAT_AIR_TEMPERATURE_FIELD,
            temperature,
        )
    }

    /// Unsplices the terminal, removes it, then removes its reheat coil
    /// together with the coil's plant demand branch.
    pub fn remove(&self, model: &mut Model) -> Vec<Handle> {
        let coil = self.reheat_coil(model);
        let mut removed = mutator::remove_air_terminal(model, self.0);
        if let Some(coil) = coil {
            removed.extend(crate::components::coils::remove_coil(model, coil));
        }
        removed
    }
}
