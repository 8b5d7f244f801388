//! `Daylighting:ReferencePoint` and `Daylighting:Controls`.
//!
//! Each reference point becomes a [`DaylightingControl`]. A
//! `Daylighting:Controls` record then copies its settings onto the controls
//! it references and picks the zone's primary and secondary controls by
//! controlled fraction, largest first.

use os_core::{Handle, Real, exceeds};
use os_idf::{IddObjectType, IdfObject, Workspace};
use os_model::{DaylightingControl, ModelObject};

use super::{ReverseTranslator, object_label};

/// One reference point group of a `Daylighting:Controls` record.
#[derive(Debug, Clone)]
struct ReferencePointEntry {
    name: String,
    fraction: Real,
    /// Field index of the fraction, for messages.
    fraction_field: usize,
    illuminance: Option<Real>,
}

/// Groups in input order. A blank fraction counts as zero.
fn reference_point_entries(object: &IdfObject) -> Vec<ReferencePointEntry> {
    let Some(group) = object.object_type.extensible_group() else {
        return Vec::new();
    };
    (0..object.num_extensible_groups())
        .filter_map(|i| {
            let first = group.first + i * group.size();
            let name = object.get_string(first)?;
            Some(ReferencePointEntry {
                name: name.to_string(),
                fraction: object.get_double(first + 1).unwrap_or(0.0),
                fraction_field: first + 1,
                illuminance: object.get_double(first + 2),
            })
        })
        .collect()
}

impl ReverseTranslator {
    pub fn translate_daylighting_reference_point(
        &mut self,
        workspace: &Workspace,
        object: &IdfObject,
    ) -> Option<Handle> {
        if !self.expect_type(object, IddObjectType::DaylightingReferencePoint) {
            return None;
        }
        let control = match object.name() {
            Some(name) => DaylightingControl::new_named(&mut self.model, name),
            None => DaylightingControl::new(&mut self.model),
        };
        if let Some(zone) = self.referenced_zone(workspace, object, 1) {
            control.set_thermal_zone(&mut self.model, zone);
        }
        if let Some(x) = object.get_double(2) {
            control.set_position_x(&mut self.model, x);
        }
        if let Some(y) = object.get_double(3) {
            control.set_position_y(&mut self.model, y);
        }
        if let Some(z) = object.get_double(4) {
            control.set_position_z(&mut self.model, z);
        }
        Some(control.handle())
    }

    /// Translates to the zone's primary control.
    pub fn translate_daylighting_controls(
        &mut self,
        workspace: &Workspace,
        object: &IdfObject,
    ) -> Option<Handle> {
        if !self.expect_type(object, IddObjectType::DaylightingControls) {
            return None;
        }
        let zone = self.referenced_zone(workspace, object, 1)?;

        let mut entries = reference_point_entries(object);
        if entries.is_empty() {
            self.log
                .warn(Some(object_label(object)), "no daylighting reference points");
            return None;
        }
        // Stable: equal fractions keep their input order.
        entries.sort_by(|a, b| b.fraction.total_cmp(&a.fraction));

        let total: Real = entries.iter().map(|e| e.fraction).sum();
        if exceeds(total, 1.0, self.options.fraction_tolerance) {
            self.log.warn(
                Some(object_label(object)),
                format!("fractions of zone controlled sum to {total}, more than 1"),
            );
        }
        let max = self.options.max_daylighting_controls;
        if entries.len() > max {
            self.log.warn(
                Some(object_label(object)),
                format!(
                    "{} reference points given; only the first {max} by fraction are used",
                    entries.len()
                ),
            );
            entries.truncate(max);
        }

        let mut primary = None;
        for entry in &entries {
            let Some(control) = self.reference_point(workspace, object, &entry.name) else {
                continue;
            };
            self.apply_control_settings(object, control, entry);
            let accepted = if primary.is_none() {
                primary = Some(control.handle());
                zone.set_primary_daylighting_control(&mut self.model, control.handle())
                    && zone.set_fraction_of_zone_controlled_by_primary_daylighting_control(
                        &mut self.model,
                        entry.fraction,
                    )
            } else {
                zone.set_secondary_daylighting_control(&mut self.model, control.handle())
                    && zone.set_fraction_of_zone_controlled_by_secondary_daylighting_control(
                        &mut self.model,
                        entry.fraction,
                    )
            };
            self.check_field(object, entry.fraction_field, accepted);
        }
        primary
    }

    fn reference_point(
        &mut self,
        workspace: &Workspace,
        object: &IdfObject,
        name: &str,
    ) -> Option<DaylightingControl> {
        let Some(source) =
            workspace.object_by_name(&IddObjectType::DaylightingReferencePoint, name)
        else {
            self.log.warn(
                Some(object_label(object)),
                format!("reference point '{name}' not found"),
            );
            return None;
        };
        self.translate_workspace_object(workspace, source)
            .map(DaylightingControl::wrap)
    }

    /// Copies the record-wide settings and the group's setpoint onto one
    /// control.
    fn apply_control_settings(
        &mut self,
        object: &IdfObject,
        control: DaylightingControl,
        entry: &ReferencePointEntry,
    ) {
        let model = &mut self.model;
        let mut refused = Vec::new();

        if let Some(control_type) = object.get_string(4) {
            if !control.set_lighting_control_type(model, control_type) {
                refused.push(4);
            }
        }
        if let Some(fraction) = object.get_double(5) {
            if !control.set_minimum_input_power_fraction_for_continuous_dimming_control(model, fraction)
            {
                refused.push(5);
            }
        }
        if let Some(fraction) = object.get_double(6) {
            if !control.set_minimum_light_output_fraction_for_continuous_dimming_control(model, fraction)
            {
                refused.push(6);
            }
        }
        if let Some(steps) = object.get_int(7) {
            if !control.set_number_of_stepped_control_steps(model, steps) {
                refused.push(7);
            }
        }
        if let Some(probability) = object.get_double(8) {
            if !control
                .set_probability_lighting_will_be_reset_when_needed_in_manual_stepped_control(
                    model,
                    probability,
                )
            {
                refused.push(8);
            }
        }
        if let Some(azimuth) = object.get_double(10) {
            if !control.set_glare_azimuth(model, azimuth) {
                refused.push(10);
            }
        }
        if let Some(index) = object.get_double(11) {
            if !control.set_maximum_allowable_discomfort_glare_index(model, Some(index)) {
                refused.push(11);
            }
        }
        if let Some(lux) = entry.illuminance {
            if !control.set_illuminance_setpoint(model, lux) {
                refused.push(entry.fraction_field + 1);
            }
        }

        for index in refused {
            self.check_field(object, index, false);
        }
    }
}
