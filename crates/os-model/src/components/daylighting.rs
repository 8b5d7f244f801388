//! Daylighting controls. Plain field accessors; the only graph semantics is
//! the zone back-reference.

use os_core::{Handle, Real, is_fraction};

use crate::components::thermal_zone::ThermalZone;
use crate::components::{
    ModelObject, get_double, get_int, get_pointer, get_string, model_object, set_double,
    set_int, set_optional_double, set_pointer, set_string,
};
use crate::model::Model;
use crate::object_kind::ObjectKind;

model_object!(
    /// A daylighting sensor position with its dimming settings.
    DaylightingControl,
    ObjectKind::DaylightingControl
);

impl DaylightingControl {
    pub const THERMAL_ZONE_FIELD: usize = 1;
    pub const POSITION_X_FIELD: usize = 2;
    pub const POSITION_Y_FIELD: usize = 3;
    pub const POSITION_Z_FIELD: usize = 4;
    pub const ILLUMINANCE_SETPOINT_FIELD: usize = 5;
    pub const LIGHTING_CONTROL_TYPE_FIELD: usize = 6;
    pub const MINIMUM_INPUT_POWER_FRACTION_FIELD: usize = 7;
    pub const MINIMUM_LIGHT_OUTPUT_FRACTION_FIELD: usize = 8;
    pub const NUMBER_OF_STEPPED_CONTROL_STEPS_FIELD: usize = 9;
    pub const PROBABILITY_LIGHTING_WILL_BE_RESET_FIELD: usize = 10;
    pub const GLARE_AZIMUTH_FIELD: usize = 11;
    pub const MAXIMUM_ALLOWABLE_DISCOMFORT_GLARE_INDEX_FIELD: usize = 12;

    pub const LIGHTING_CONTROL_TYPES: [&'static str; 3] = ["Continuous", "Stepped", "ContinuousOff"];

    pub fn new(model: &mut Model) -> Self {
        Self(model.add_object(ObjectKind::DaylightingControl))
    }

    pub fn new_named(model: &mut Model, name: &str) -> Self {
        Self(model.add_object_named(ObjectKind::DaylightingControl, name))
    }

    pub fn thermal_zone(&self, model: &Model) -> Option<ThermalZone> {
        get_pointer(model, self.0, Self::THERMAL_ZONE_FIELD).map(ThermalZone::wrap)
    }

    pub fn set_thermal_zone(&self, model: &mut Model, zone: ThermalZone) -> bool {
        set_pointer(model, self.0, Self::THERMAL_ZONE_FIELD, zone.handle())
    }

    pub fn position_x(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::POSITION_X_FIELD).unwrap_or(0.0)
    }

    pub fn set_position_x(&self, model: &mut Model, x: Real) -> bool {
        set_double(model, self.0, Self::POSITION_X_FIELD, x)
    }

    pub fn position_y(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::POSITION_Y_FIELD).unwrap_or(0.0)
    }

    pub fn set_position_y(&self, model: &mut Model, y: Real) -> bool {
        set_double(model, self.0, Self::POSITION_Y_FIELD, y)
    }

    pub fn position_z(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::POSITION_Z_FIELD).unwrap_or(0.0)
    }

    pub fn set_position_z(&self, model: &mut Model, z: Real) -> bool {
        set_double(model, self.0, Self::POSITION_Z_FIELD, z)
    }

    /// Lux.
    pub fn illuminance_setpoint(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::ILLUMINANCE_SETPOINT_FIELD).unwrap_or(500.0)
    }

    pub fn set_illuminance_setpoint(&self, model: &mut Model, lux: Real) -> bool {
        lux >= 0.0 && set_double(model, self.0, Self::ILLUMINANCE_SETPOINT_FIELD, lux)
    }

    pub fn lighting_control_type(&self, model: &Model) -> String {
        get_string(model, self.0, Self::LIGHTING_CONTROL_TYPE_FIELD)
            .unwrap_or_else(|| "Continuous".to_string())
    }

    pub fn set_lighting_control_type(&self, model: &mut Model, control_type: &str) -> bool {
        let normalized: String = control_type.chars().filter(|c| *c != '/').collect();
        match Self::LIGHTING_CONTROL_TYPES
            .iter()
            .find(|t| t.eq_ignore_ascii_case(&normalized))
        {
            Some(canonical) => set_string(model, self.0, Self::LIGHTING_CONTROL_TYPE_FIELD, canonical),
            None => false,
        }
    }

    pub fn minimum_input_power_fraction_for_continuous_dimming_control(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::MINIMUM_INPUT_POWER_FRACTION_FIELD).unwrap_or(0.3)
    }

    pub fn set_minimum_input_power_fraction_for_continuous_dimming_control(
        &self,
        model: &mut Model,
        fraction: Real,
    ) -> bool {
        (0.0..=0.6).contains(&fraction)
            && set_double(model, self.0, Self::MINIMUM_INPUT_POWER_FRACTION_FIELD, fraction)
    }

    pub fn minimum_light_output_fraction_for_continuous_dimming_control(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::MINIMUM_LIGHT_OUTPUT_FRACTION_FIELD).unwrap_or(0.2)
    }

    pub fn set_minimum_light_output_fraction_for_continuous_dimming_control(
        &self,
        model: &mut Model,
        fraction: Real,
    ) -> bool {
        (0.0..=0.6).contains(&fraction)
            && set_double(model, self.0, Self::MINIMUM_LIGHT_OUTPUT_FRACTION_FIELD, fraction)
    }

    pub fn number_of_stepped_control_steps(&self, model: &Model) -> i64 {
        get_int(model, self.0, Self::NUMBER_OF_STEPPED_CONTROL_STEPS_FIELD).unwrap_or(1)
    }

    pub fn set_number_of_stepped_control_steps(&self, model: &mut Model, steps: i64) -> bool {
        steps >= 1 && set_int(model, self.0, Self::NUMBER_OF_STEPPED_CONTROL_STEPS_FIELD, steps)
    }

    pub fn probability_lighting_will_be_reset_when_needed_in_manual_stepped_control(
        &self,
        model: &Model,
    ) -> Real {
        get_double(model, self.0, Self::PROBABILITY_LIGHTING_WILL_BE_RESET_FIELD).unwrap_or(1.0)
    }

    pub fn set_probability_lighting_will_be_reset_when_needed_in_manual_stepped_control(
        &self,
        model: &mut Model,
        probability: Real,
    ) -> bool {
        is_fraction(probability)
            && set_double(
                model,
                self.0,
                Self::PROBABILITY_LIGHTING_WILL_BE_RESET_FIELD,
                probability,
            )
    }

    /// Degrees from the zone's y-axis.
    pub fn glare_azimuth(&self, model: &Model) -> Real {
        get_double(model, self.0, Self::GLARE_AZIMUTH_FIELD).unwrap_or(0.0)
    }

    pub fn set_glare_azimuth(&self, model: &mut Model, degrees: Real) -> bool {
        (0.0..=360.0).contains(&degrees)
            && set_double(model, self.0, Self::GLARE_AZIMUTH_FIELD, degrees)
    }

    pub fn maximum_allowable_discomfort_glare_index(&self, model: &Model) -> Option<Real> {
        get_double(model, self.0, Self::MAXIMUM_ALLOWABLE_DISCOMFORT_GLARE_INDEX_FIELD)
    }

    pub fn set_maximum_allowable_discomfort_glare_index(
        &self,
        model: &mut Model,
        index: Option<Real>,
    ) -> bool {
        index.is_none_or(|i| i >= 1.0)
            && set_optional_double(
                model,
                self.0,
                Self::MAXIMUM_ALLOWABLE_DISCOMFORT_GLARE_INDEX_FIELD,
                index,
            )
    }

    /// Zones that use this control as their primary or secondary control
    /// lose the reference.
    pub fn remove(&self, model: &mut Model) -> Vec<Handle> {
        for zone in model.thermal_zones() {
            if zone.primary_daylighting_control(model) == Some(self.0) {
                zone.reset_primary_daylighting_control(model);
            }
            if zone.secondary_daylighting_control(model) == Some(self.0) {
                zone.reset_secondary_daylighting_control(model);
            }
        }
        model.remove_object(self.0)
    }
}
