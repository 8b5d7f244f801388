//! `Zone` and `ZoneHVAC:EquipmentConnections`.

use os_core::Handle;
use os_idf::{IddObjectType, IdfObject, Workspace};
use os_model::{ModelObject, Node, ThermalZone};

use super::{ReverseTranslator, node_names, object_label};

impl ReverseTranslator {
    pub fn translate_zone(&mut self, _workspace: &Workspace, object: &IdfObject) -> Option<Handle> {
        if !self.expect_type(object, IddObjectType::Zone) {
            return None;
        }
        let zone = match object.name() {
            Some(name) => ThermalZone::new_named(&mut self.model, name),
            None => ThermalZone::new(&mut self.model),
        };
        if let Some(multiplier) = object.get_int(6) {
            let accepted = zone.set_multiplier(&mut self.model, multiplier);
            self.check_field(object, 6, accepted);
        }
        Some(zone.handle())
    }

    /// Resolve the zone named in field `index` of `object`, translating it
    /// on demand.
    pub(super) fn referenced_zone(
        &mut self,
        workspace: &Workspace,
        object: &IdfObject,
        index: usize,
    ) -> Option<ThermalZone> {
        let Some(name) = object.get_string(index) else {
            self.log.warn(Some(object_label(object)), "no zone name given");
            return None;
        };
        let Some(source) = workspace.object_by_name(&IddObjectType::Zone, name) else {
            self.log
                .warn(Some(object_label(object)), format!("zone '{name}' not found"));
            return None;
        };
        self.translate_workspace_object(workspace, source)
            .map(ThermalZone::wrap)
    }

    /// Wires the zone's air node, inlet nodes and return node. Translates
    /// to the zone itself.
    pub fn translate_zone_equipment_connections(
        &mut self,
        workspace: &Workspace,
        object: &IdfObject,
    ) -> Option<Handle> {
        if !self.expect_type(object, IddObjectType::ZoneHvacEquipmentConnections) {
            return None;
        }
        let zone = self.referenced_zone(workspace, object, 0)?;

        if let (Some(name), Some(air_node)) =
            (object.get_string(4), zone.zone_air_node(&self.model))
        {
            self.adopt_node(air_node, name);
        }

        let Some(port_list) = zone.inlet_port_list(&self.model) else {
            self.log
                .error(Some(object_label(object)), "zone has no inlet port list");
            return Some(zone.handle());
        };
        for name in node_names(workspace, object.get_string(2)) {
            let node = self.node(&name);
            let port = port_list.next_port(&self.model);
            self.connect(
                object,
                node.handle(),
                Node::OUTLET_PORT,
                port_list.handle(),
                port,
            );
        }

        let returns = node_names(workspace, object.get_string(5));
        if returns.len() > 1 {
            self.log.warn(
                Some(object_label(object)),
                "only the first return air node is connected",
            );
        }
        if let Some(name) = returns.first() {
            let node = self.node(name);
            self.connect(
                object,
                zone.handle(),
                ThermalZone::RETURN_AIR_PORT,
                node.handle(),
                Node::INLET_PORT,
            );
        }
        Some(zone.handle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use os_model::StraightComponent;

    fn zone_workspace() -> (Workspace, Handle) {
        let mut ws = Workspace::new();
        let mut zone = IdfObject::new(IddObjectType::Zone);
        zone.set_name("Office");
        zone.set_string(6, "2");
        ws.add_object(zone);

        let mut list = IdfObject::new(IddObjectType::NodeList);
        list.set_name("Office Inlets");
        list.push_extensible_group(&["Office Inlet A"]);
        list.push_extensible_group(&["Office Inlet B"]);
        ws.add_object(list);

        let mut conn = IdfObject::new(IddObjectType::ZoneHvacEquipmentConnections);
        conn.set_name("Office");
        conn.set_string(2, "Office Inlets");
        conn.set_string(4, "Office Air");
        conn.set_string(5, "Office Return");
        let h = ws.add_object(conn);
        (ws, h)
    }

    #[test]
    fn equipment_connections_wire_zone_nodes() {
        let (ws, conn) = zone_workspace();
        let mut translator = ReverseTranslator::new();
        let zone = translator
            .translate_workspace_object(&ws, ws.object(conn).unwrap())
            .map(ThermalZone::wrap)
            .unwrap();
        let model = translator.model();

        assert_eq!(zone.multiplier(model), 2);
        let names: Vec<String> = zone
            .inlet_model_objects(model)
            .into_iter()
            .filter_map(|h| model.name(h))
            .collect();
        assert_eq!(names, vec!["Office Inlet A", "Office Inlet B"]);
        let air = zone.zone_air_node(model).unwrap();
        assert_eq!(air.name(model).as_deref(), Some("Office Air"));
        let ret = Node::wrap(zone.return_air_model_object(model).unwrap());
        assert_eq!(ret.name(model).as_deref(), Some("Office Return"));
        assert_eq!(ret.inlet_model_object(model), Some(zone.handle()));
        assert_eq!(model.validate_connections(), Ok(()));
    }

    #[test]
    fn missing_zone_is_a_warning() {
        let mut ws = Workspace::new();
        let mut conn = IdfObject::new(IddObjectType::ZoneHvacEquipmentConnections);
        conn.set_name("Nowhere");
        let h = ws.add_object(conn);

        let mut translator = ReverseTranslator::new();
        assert_eq!(
            translator.translate_workspace_object(&ws, ws.object(h).unwrap()),
            None
        );
        assert_eq!(translator.warnings().len(), 1);
    }

    #[test]
    fn bad_multiplier_is_ignored() {
        let mut ws = Workspace::new();
        let mut zone = IdfObject::new(IddObjectType::Zone);
        zone.set_name("Office");
        zone.set_string(6, "0");
        let h = ws.add_object(zone);

        let mut translator = ReverseTranslator::new();
        let zone = translator
            .translate_workspace_object(&ws, ws.object(h).unwrap())
            .map(ThermalZone::wrap)
            .unwrap();
        assert_eq!(zone.multiplier(translator.model()), 1);
        assert_eq!(translator.warnings().len(), 1);
    }
}
