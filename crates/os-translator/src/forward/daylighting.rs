//! Daylighting reference points and per-zone daylighting controls.

use os_core::Handle;
use os_idf::{IddObjectType, IdfObject, format_real};
use os_model::{DaylightingControl, Model, ModelObject, ThermalZone};

use super::{ForwardTranslator, label, name_of};

impl ForwardTranslator {
    /// One `Daylighting:ReferencePoint` per control, named after it.
    pub(super) fn translate_daylighting_control(&mut self, model: &Model, handle: Handle) {
        let control = DaylightingControl::cast(model, handle);
        let Some(zone) = control.thermal_zone(model) else {
            self.log.warn(
                Some(label(model, handle)),
                "daylighting control has no thermal zone; reference point not written",
            );
            return;
        };

        let mut obj = IdfObject::new(IddObjectType::DaylightingReferencePoint);
        obj.set_name(&name_of(model, handle));
        obj.set_string(1, &name_of(model, zone.handle()));
        obj.set_double(2, control.position_x(model));
        obj.set_double(3, control.position_y(model));
        obj.set_double(4, control.position_z(model));
        self.push(obj);
    }

    /// `Daylighting:Controls` for a zone with a primary control. Settings
    /// come from the primary control; each control adds one reference point
    /// group.
    pub(super) fn translate_zone_daylighting(&mut self, model: &Model, zone: ThermalZone) {
        let Some(primary) = zone
            .primary_daylighting_control(model)
            .map(DaylightingControl::wrap)
        else {
            return;
        };
        let zone_name = name_of(model, zone.handle());
        let primary_name = name_of(model, primary.handle());

        let mut obj = IdfObject::new(IddObjectType::DaylightingControls);
        obj.set_name(&format!("{zone_name} Daylighting Controls"));
        obj.set_string(1, &zone_name);
        obj.set_string(2, "SplitFlux");
        obj.set_string(4, &primary.lighting_control_type(model));
        obj.set_double(
            5,
            primary.minimum_input_power_fraction_for_continuous_dimming_control(model),
        );
        obj.set_double(
            6,
            primary.minimum_light_output_fraction_for_continuous_dimming_control(model),
        );
        obj.set_int(7, primary.number_of_stepped_control_steps(model));
        obj.set_double(
            8,
            primary.probability_lighting_will_be_reset_when_needed_in_manual_stepped_control(model),
        );
        obj.set_string(9, &primary_name);
        obj.set_double(10, primary.glare_azimuth(model));
        if let Some(index) = primary.maximum_allowable_discomfort_glare_index(model) {
            obj.set_double(11, index);
        }

        let primary_fraction =
            zone.fraction_of_zone_controlled_by_primary_daylighting_control(model);
        obj.push_extensible_group(&[
            primary_name.as_str(),
            format_real(primary_fraction).as_str(),
            format_real(primary.illuminance_setpoint(model)).as_str(),
        ]);

        if let Some(secondary) = zone
            .secondary_daylighting_control(model)
            .map(DaylightingControl::wrap)
        {
            let fraction = zone.fraction_of_zone_controlled_by_secondary_daylighting_control(model);
            obj.push_extensible_group(&[
                name_of(model, secondary.handle()).as_str(),
                format_real(fraction).as_str(),
                format_real(secondary.illuminance_setpoint(model)).as_str(),
            ]);
        }
        self.push(obj);
    }
}
