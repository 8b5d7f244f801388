//! Zone emitters: `Zone` plus its equipment connections, equipment list and
//! inlet node list.

use os_core::Handle;
use os_idf::{IddObjectType, IdfObject};
use os_model::{Model, ModelObject, ObjectKind, ThermalZone};

use super::hvac::air_distribution_unit_name;
use super::{ForwardTranslator, label, name_of, optional_name};

impl ForwardTranslator {
    pub(super) fn translate_thermal_zone(&mut self, model: &Model, handle: Handle) {
        let zone = ThermalZone::cast(model, handle);
        let zone_name = name_of(model, handle);

        let mut obj = IdfObject::new(IddObjectType::Zone);
        obj.set_name(&zone_name);
        for field in 1..=4 {
            obj.set_string(field, "0");
        }
        obj.set_string(5, "1");
        obj.set_int(6, zone.multiplier(model));
        self.push(obj);

        let inlets = zone.inlet_model_objects(model);
        let equipment = zone.equipment(model);
        let return_node = zone.return_air_model_object(model);
        if !(inlets.is_empty() && equipment.is_empty() && return_node.is_none()) {
            self.translate_zone_equipment(model, zone, &inlets, &equipment, return_node);
        }

        if self.options.daylighting {
            self.translate_zone_daylighting(model, zone);
        }
    }

    fn translate_zone_equipment(
        &mut self,
        model: &Model,
        zone: ThermalZone,
        inlets: &[Handle],
        equipment: &[Handle],
        return_node: Option<Handle>,
    ) {
        let zone_name = name_of(model, zone.handle());

        let mut connections = IdfObject::new(IddObjectType::ZoneHvacEquipmentConnections);
        connections.set_name(&zone_name);

        if !equipment.is_empty() {
            let list_name = format!("{zone_name} Equipment List");
            let mut list = IdfObject::new(IddObjectType::ZoneHvacEquipmentList);
            list.set_name(&list_name);
            let mut sequence = 0;
            for &item in equipment {
                let Some((object_type, name)) = equipment_entry(model, item) else {
                    self.log.warn(
                        Some(label(model, zone.handle())),
                        format!("equipment {} has no IDF counterpart", label(model, item)),
                    );
                    continue;
                };
                sequence += 1;
                let order = sequence.to_string();
                list.push_extensible_group(&[
                    object_type.name(),
                    name.as_str(),
                    order.as_str(),
                    order.as_str(),
                ]);
            }
            self.push(list);
            connections.set_string(1, &list_name);
        }

        if !inlets.is_empty() {
            let list_name = zone
                .inlet_port_list(model)
                .map(|pl| name_of(model, pl.handle()))
                .unwrap_or_else(|| format!("{zone_name} Inlet Node List"));
            let mut node_list = IdfObject::new(IddObjectType::NodeList);
            node_list.set_name(&list_name);
            for &inlet in inlets {
                node_list.push_extensible_group(&[name_of(model, inlet).as_str()]);
            }
            self.push(node_list);
            connections.set_string(2, &list_name);
        }

        connections.set_string(
            4,
            &optional_name(model, zone.zone_air_node(model).map(|n| n.handle())),
        );
        connections.set_string(5, &optional_name(model, return_node));
        self.push(connections);
    }
}

/// Equipment list entry for a piece of zone equipment.
fn equipment_entry(model: &Model, equipment: Handle) -> Option<(IddObjectType, String)> {
    let name = name_of(model, equipment);
    match model.kind(equipment)? {
        ObjectKind::AirTerminalSingleDuctUncontrolled => {
            Some((IddObjectType::AirTerminalSingleDuctUncontrolled, name))
        }
        ObjectKind::AirTerminalSingleDuctVavReheat => Some((
            IddObjectType::ZoneHvacAirDistributionUnit,
            air_distribution_unit_name(&name),
        )),
        _ => None,
    }
}
