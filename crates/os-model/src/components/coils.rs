//! Heating coils used as terminal reheat.

use os_core::{Handle, Real};

use crate::components::plant_loop::PlantLoop;
use crate::components::{
    ModelObject, StraightComponent, get_double, get_string, model_object, set_double,
    set_optional_double, set_string,
};
use crate::model::Model;
use crate::object_kind::ObjectKind;

/// A coil that may serve as the reheat coil of a terminal unit.
pub trait ReheatCoil: StraightComponent {}

/// A component with a water-side inlet/outlet pair on a plant loop.
pub trait WaterToAirComponent: ModelObject {
    const WATER_INLET_PORT: usize;
    const WATER_OUTLET_PORT: usize;

    fn water_inlet_model_object(&self, model: &Model) -> Option<Handle> {
        model.connected_object(self.handle(), Self::WATER_INLET_PORT)
    }

    fn water_outlet_model_object(&self, model: &Model) -> Option<Handle> {
        model.connected_object(self.handle(), Self::WATER_OUTLET_PORT)
    }

    /// The plant loop whose demand side holds this component.
    fn plant_loop(&self, model: &Model) -> Option<PlantLoop> {
        PlantLoop::for_demand_component(model, self.handle())
    }
}

model_object!(
    /// Hot-water heating coil with an air path and a water path.
    CoilHeatingWater,
    ObjectKind::CoilHeatingWater
);

model_object!(
    /// Electric resistance heating coil.
    CoilHeatingElectric,
    ObjectKind::CoilHeatingElectric
);

impl CoilHeatingWater {
    pub const AVAILABILITY_SCHEDULE_FIELD: usize = 1;
    pub const AIR_INLET_PORT: usize = 2;
    pub const AIR_OUTLET_PORT: usize = 3;
    pub const WATER_INLET_PORT: usize = 4;
    pub const WATER_OUTLET_PORT: usize = 5;
    pub const U_FACTOR_TIMES_AREA_FIELD: usize = 6;
    pub const MAXIMUM_WATER_FLOW_RATE_FIELD: usize = 7;
    pub const PERFORMANCE_INPUT_METHOD_FIELD: usize = 8;
    pub const RATED_CAPACITY_FIELD: usize = 9;

    pub const PERFORMANCE_INPUT_METHODS: [&'static str; 2] =
        ["UFactorTimesAreaAndDesignWaterFlowRate", "NominalCapacity"];

    pub fn new(model: &mut Model) -> Self {
        let coil = Self(model.add_object(ObjectKind::CoilHeatingWater));
        set_string(
            model,
            coil.0,
            Self::PERFORMANCE_INPUT_METHOD_FIELD,
            Self::PERFORMANCE_INPUT_METHODS[0],
        );
        coil
    }

    pub fn availability_schedule(&self, model: &Model) -> Option<String> {
        get_string(model, self.0, Self::AVAILABILITY_SCHEDULE_FIELD)
    }

    pub fn set_availability_schedule(&self, model: &mut Model, schedule: &str) -> bool {
        set_string(model, self.0, Self::AVAILABILITY_SCHEDULE_FIELD, schedule)
    }

    /// `None` means autosized.
    pub fn u_factor_times_area_value(&self, model: &Model) -> Option<Real> {
        get_double(model, self.0, Self::U_FACTOR_TIMES_AREA_FIELD)
    }

    pub fn set_u_factor_times_area_value(&self, model: &mut Model, ua: Option<Real>) -> bool {
        ua.is_none_or(|v| v > 0.0)
            && set_optional_double(model, self.0, Self::U_FACTOR_TIMES_AREA_FIELD, ua)
    }

    /// `None` means autosized.
    pub fn maximum_water_flow_rate(&self, model: &Model) -> Option<Real> {
        get_double(model, self.0, Self::MAXIMUM_WATER_FLOW_RATE_FIELD)
    }

    pub fn set_maximum_water_flow_rate(&self, model: &mut Model, rate: Option<Real>) -> bool {
        rate.is_none_or(|v| v > 0.0)
            && set_optional_double(model, self.0, Self::MAXIMUM_WATER_FLOW_RATE_FIELD, rate)
    }

    pub fn performance_input_method(&self, model: &Model) -> String {
        get_string(model, self.0, Self::PERFORMANCE_INPUT_METHOD_FIELD)
            .unwrap_or_else(|| Self::PERFORMANCE_INPUT_METHODS[0].to_string())
    }

    pub fn set_performance_input_method(&self, model: &mut Model, method: &str) -> bool {
        match Self::PERFORMANCE_INPUT_METHODS
            .iter()
            .find(|m| m.eq_ignore_ascii_case(method))
        {
            Some(canonical) => {
                set_string(model, self.0, Self::PERFORMANCE_INPUT_METHOD_FIELD, canonical)
            }
            None => false,
        }
    }

    /// `None` means autosized.
    pub fn rated_capacity(&self, model: &Model) -> Option<Real> {
        get_double(model, self.0, Self::RATED_CAPACITY_FIELD)
    }

    pub fn set_rated_capacity(&self, model: &mut Model, capacity: Option<Real>) -> bool {
        capacity.is_none_or(|v| v >= 0.0)
            && set_optional_double(model, self.0, Self::RATED_CAPACITY_FIELD, capacity)
    }

    /// Removes the coil's plant demand branch (if any), then the coil.
    pub fn remove(&self, model: &mut Model) -> Vec<Handle> {
        let mut removed = Vec::new();
        if let Some(plant) = self.plant_loop(model) {
            removed.extend(plant.remove_demand_branch_with_component(model, *self));
        }
        removed.extend(model.remove_object(self.0));
        removed
    }
}

impl StraightComponent for CoilHeatingWater {
    fn inlet_port(&self) -> usize {
        Self::AIR_INLET_PORT
    }

    fn outlet_port(&self) -> usize {
        Self::AIR_OUTLET_PORT
    }
}

impl WaterToAirComponent for CoilHeatingWater {
    const WATER_INLET_PORT: usize = CoilHeatingWater::WATER_INLET_PORT;
    const WATER_OUTLET_PORT: usize = CoilHeatingWater::WATER_OUTLET_PORT;
}

impl ReheatCoil for CoilHeatingWater {}

impl CoilHeatingElectric {
    pub const AVAILABILITY_SCHEDULE_FIELD: usize = 1;
    pub const EFFICIENCY_FIELD: usize = 2;
    pub const NOMINAL_CAPACITY_FIELD: usize = 3;
    pub const AIR_INLET_PORT: usize = 4;
    pub const AIR_OUTLET_PORT: usize = 5;

    pub fn new(model: &mut Model) -> Self {
        let coil = Self(model.add_object(ObjectKind::CoilHeatingElectric));
        set_double(model, coil.0, Self::EFFICIENCY_FIELD, 1.0);
        coil
    }

    pub fn availability_schedule(&self, model: &Model) -> Option<String> {
        get_string(model, self.0, Self::AVAILABILITY_SCHEDULE_FIELD)
    }

    pub fn set_availability_schedule(&self, model: &mut Model, schedule: &str) -> bool {
        set_string(model, self.0, Self::AVAILABILITY_SCHEDULE_FIELD, schedule)
    }

    pub fn efficiency(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::EFFICIENCY_FIELD).unwrap_or(1.0)
    }

    pub fn set_efficiency(&self, model: &mut Model, efficiency: Real) -> bool {
        efficiency > 0.0
            && efficiency <= 1.0
            && set_double(model, self.0, Self::EFFICIENCY_FIELD, efficiency)
    }

    /// `None` means autosized.
    pub fn nominal_capacity(&self, model: &Model) -> Option<Real> {
        get_double(model, self.0, Self::NOMINAL_CAPACITY_FIELD)
    }

    pub fn set_nominal_capacity(&self, model: &mut Model, capacity: Option<Real>) -> bool {
        capacity.is_none_or(|v| v >= 0.0)
            && set_optional_double(model, self.0, Self::NOMINAL_CAPACITY_FIELD, capacity)
    }

    pub fn remove(&self, model: &mut Model) -> Vec<Handle> {
        model.remove_object(self.0)
    }
}

impl StraightComponent for CoilHeatingElectric {
    fn inlet_port(&self) -> usize {
        Self::AIR_INLET_PORT
    }

    fn outlet_port(&self) -> usize {
        Self::AIR_OUTLET_PORT
    }
}

impl ReheatCoil for CoilHeatingElectric {}

/// Kind-aware removal of any coil handle.
pub(crate) fn remove_coil(model: &mut Model, coil: Handle) -> Vec<Handle> {
    match model.kind(coil) {
        Some(ObjectKind::CoilHeatingWater) => CoilHeatingWater::wrap(coil).remove(model),
        Some(ObjectKind::CoilHeatingElectric) => CoilHeatingElectric::wrap(coil).remove(model),
        _ => Vec::new(),
    }
}
