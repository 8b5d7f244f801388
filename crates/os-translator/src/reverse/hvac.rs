//! Zone splitter/mixer, heating coils and air terminals.

use os_core::Handle;
use os_idf::{IddObjectType, IdfObject, Workspace};
use os_model::{
    AirLoopHvacZoneMixer, AirLoopHvacZoneSplitter, AirTerminal, AirTerminalSingleDuctUncontrolled,
    AirTerminalSingleDuctVavReheat, CoilHeatingElectric, CoilHeatingWater, Mixer, ModelObject,
    Node, ObjectKind, PortList, Splitter, StraightComponent, ThermalZone,
};

use super::{ReverseTranslator, object_label, sizing_field};

impl ReverseTranslator {
    pub fn translate_zone_splitter(
        &mut self,
        _workspace: &Workspace,
        object: &IdfObject,
    ) -> Option<Handle> {
        if !self.expect_type(object, IddObjectType::AirLoopHvacZoneSplitter) {
            return None;
        }
        let splitter = AirLoopHvacZoneSplitter::new(&mut self.model);
        if let Some(name) = object.name() {
            splitter.set_name(&mut self.model, name);
        }
        if let Some(name) = object.get_string(1) {
            let inlet = self.node(name);
            self.connect(
                object,
                inlet.handle(),
                Node::OUTLET_PORT,
                splitter.handle(),
                Splitter::inlet_port(&splitter),
            );
        }
        for group in object.extensible_groups() {
            let Some(name) = group.first().map(|n| n.trim()).filter(|n| !n.is_empty()) else {
                continue;
            };
            let outlet = self.node(name);
            let port = splitter.next_outlet_port(&self.model);
            self.connect(
                object,
                splitter.handle(),
                port,
                outlet.handle(),
                Node::INLET_PORT,
            );
        }
        Some(splitter.handle())
    }

    pub fn translate_zone_mixer(
        &mut self,
        _workspace: &Workspace,
        object: &IdfObject,
    ) -> Option<Handle> {
        if !self.expect_type(object, IddObjectType::AirLoopHvacZoneMixer) {
            return None;
        }
        let mixer = AirLoopHvacZoneMixer::new(&mut self.model);
        if let Some(name) = object.name() {
            mixer.set_name(&mut self.model, name);
        }
        if let Some(name) = object.get_string(1) {
            let outlet = self.node(name);
            self.connect(
                object,
                mixer.handle(),
                Mixer::outlet_port(&mixer),
                outlet.handle(),
                Node::INLET_PORT,
            );
        }
        for group in object.extensible_groups() {
            let Some(name) = group.first().map(|n| n.trim()).filter(|n| !n.is_empty()) else {
                continue;
            };
            let inlet = self.node(name);
            let port = mixer.next_inlet_port(&self.model);
            self.connect(object, inlet.handle(), Node::OUTLET_PORT, mixer.handle(), port);
        }
        Some(mixer.handle())
    }

    pub fn translate_coil_heating_water(
        &mut self,
        _workspace: &Workspace,
        object: &IdfObject,
    ) -> Option<Handle> {
        if !self.expect_type(object, IddObjectType::CoilHeatingWater) {
            return None;
        }
        let coil = CoilHeatingWater::new(&mut self.model);
        if let Some(name) = object.name() {
            coil.set_name(&mut self.model, name);
        }
        if let Some(schedule) = object.get_string(1) {
            coil.set_availability_schedule(&mut self.model, schedule);
        }
        if let Some(ua) = sizing_field(object, 2) {
            let accepted = coil.set_u_factor_times_area_value(&mut self.model, ua);
            self.check_field(object, 2, accepted);
        }
        if let Some(rate) = sizing_field(object, 3) {
            let accepted = coil.set_maximum_water_flow_rate(&mut self.model, rate);
            self.check_field(object, 3, accepted);
        }
        if let Some(method) = object.get_string(8) {
            let accepted = coil.set_performance_input_method(&mut self.model, method);
            self.check_field(object, 8, accepted);
        }
        if let Some(capacity) = sizing_field(object, 9) {
            let accepted = coil.set_rated_capacity(&mut self.model, capacity);
            self.check_field(object, 9, accepted);
        }
        Some(coil.handle())
    }

    pub fn translate_coil_heating_electric(
        &mut self,
        _workspace: &Workspace,
        object: &IdfObject,
    ) -> Option<Handle> {
        if !self.expect_type(object, IddObjectType::CoilHeatingElectric) {
            return None;
        }
        let coil = CoilHeatingElectric::new(&mut self.model);
        if let Some(name) = object.name() {
            coil.set_name(&mut self.model, name);
        }
        if let Some(schedule) = object.get_string(1) {
            coil.set_availability_schedule(&mut self.model, schedule);
        }
        if let Some(efficiency) = object.get_double(2) {
            let accepted = coil.set_efficiency(&mut self.model, efficiency);
            self.check_field(object, 2, accepted);
        }
        if let Some(capacity) = sizing_field(object, 3) {
            let accepted = coil.set_nominal_capacity(&mut self.model, capacity);
            self.check_field(object, 3, accepted);
        }
        Some(coil.handle())
    }

    /// The terminal is spliced in front of its zone supply air node with
    /// `add_to_node`; if that node does not sit on a splitter branch the
    /// terminal is kept unconnected.
    pub fn translate_uncontrolled_terminal(
        &mut self,
        _workspace: &Workspace,
        object: &IdfObject,
    ) -> Option<Handle> {
        if !self.expect_type(object, IddObjectType::AirTerminalSingleDuctUncontrolled) {
            return None;
        }
        let terminal = AirTerminalSingleDuctUncontrolled::new(&mut self.model);
        if let Some(name) = object.name() {
            terminal.set_name(&mut self.model, name);
        }
        if let Some(schedule) = object.get_string(1) {
            terminal.set_availability_schedule(&mut self.model, schedule);
        }
        match sizing_field(object, 3) {
            Some(Some(rate)) => {
                let accepted = terminal.set_maximum_air_flow_rate(&mut self.model, rate);
                self.check_field(object, 3, accepted);
            }
            Some(None) => terminal.autosize_maximum_air_flow_rate(&mut self.model),
            None => {}
        }

        let Some(name) = object.get_string(2) else {
            self.log.warn(
                Some(object_label(object)),
                "no zone supply air node; terminal left unconnected",
            );
            return Some(terminal.handle());
        };
        let node = self.node(name);
        if !terminal.add_to_node(&mut self.model, node) {
            self.log.warn(
                Some(object_label(object)),
                format!("node '{name}' is not on a zone splitter branch; terminal left unconnected"),
            );
        }
        Some(terminal.handle())
    }

    /// The terminal is wired between its air inlet and outlet nodes and
    /// registered with the zone its outlet feeds. The reheat coil is
    /// translated on demand.
    pub fn translate_vav_reheat_terminal(
        &mut self,
        workspace: &Workspace,
        object: &IdfObject,
    ) -> Option<Handle> {
        if !self.expect_type(object, IddObjectType::AirTerminalSingleDuctVavReheat) {
            return None;
        }
        let coil = self.reheat_coil(workspace, object)?;
        let terminal = match self.model.kind(coil) {
            Some(ObjectKind::CoilHeatingWater) => {
                AirTerminalSingleDuctVavReheat::new(&mut self.model, CoilHeatingWater::wrap(coil))
            }
            Some(ObjectKind::CoilHeatingElectric) => AirTerminalSingleDuctVavReheat::new(
                &mut self.model,
                CoilHeatingElectric::wrap(coil),
            ),
            _ => {
                self.log
                    .error(Some(object_label(object)), "reheat coil is not a heating coil");
                return None;
            }
        };
        if let Some(name) = object.name() {
            terminal.set_name(&mut self.model, name);
        }
        self.apply_vav_fields(object, terminal);

        if let Some(name) = object.get_string(3) {
            let inlet = self.node(name);
            self.connect(
                object,
                inlet.handle(),
                Node::OUTLET_PORT,
                terminal.handle(),
                terminal.inlet_port(),
            );
        }
        if let Some(name) = object.get_string(13) {
            let outlet = self.node(name);
            if self.connect(
                object,
                terminal.handle(),
                terminal.outlet_port(),
                outlet.handle(),
                Node::INLET_PORT,
            ) {
                match self.zone_fed_by(outlet) {
                    Some(zone) => {
                        zone.add_equipment(&mut self.model, terminal.handle());
                    }
                    None => self.log.warn(
                        Some(object_label(object)),
                        format!("air outlet node '{name}' does not feed a zone"),
                    ),
                }
            }
        }
        Some(terminal.handle())
    }

    fn reheat_coil(&mut self, workspace: &Workspace, object: &IdfObject) -> Option<Handle> {
        let coil_type = IddObjectType::from_name(object.get_string(9).unwrap_or_default());
        if !matches!(
            coil_type,
            IddObjectType::CoilHeatingWater | IddObjectType::CoilHeatingElectric
        ) {
            self.log.error(
                Some(object_label(object)),
                format!("unsupported reheat coil type '{coil_type}'"),
            );
            return None;
        }
        let name = object.get_string(10).unwrap_or_default();
        let Some(source) = workspace.object_by_name(&coil_type, name) else {
            self.log.error(
                Some(object_label(object)),
                format!("reheat coil {coil_type} '{name}' not found"),
            );
            return None;
        };
        self.translate_workspace_object(workspace, source)
    }

    fn apply_vav_fields(&mut self, object: &IdfObject, terminal: AirTerminalSingleDuctVavReheat) {
        if let Some(schedule) = object.get_string(1) {
            terminal.set_availability_schedule(&mut self.model, schedule);
        }
        if let Some(rate) = sizing_field(object, 4) {
            let accepted = terminal.set_maximum_air_flow_rate(&mut self.model, rate);
            self.check_field(object, 4, accepted);
        }
        if let Some(method) = object.get_string(5) {
            let accepted = terminal.set_zone_minimum_air_flow_input_method(&mut self.model, method);
            self.check_field(object, 5, accepted);
        }
        if let Some(fraction) = object.get_double(6) {
            let accepted = terminal.set_constant_minimum_air_flow_fraction(&mut self.model, fraction);
            self.check_field(object, 6, accepted);
        }
        if let Some(rate) = object.get_double(7) {
            let accepted = terminal.set_fixed_minimum_air_flow_rate(&mut self.model, rate);
            self.check_field(object, 7, accepted);
        }
        if let Some(rate) = sizing_field(object, 11) {
            let accepted =
                terminal.set_maximum_hot_water_or_steam_flow_rate(&mut self.model, rate);
            self.check_field(object, 11, accepted);
        }
        if let Some(rate) = object.get_double(12) {
            let accepted =
                terminal.set_minimum_hot_water_or_steam_flow_rate(&mut self.model, rate);
            self.check_field(object, 12, accepted);
        }
        if let Some(tolerance) = object.get_double(14) {
            let accepted = terminal.set_convergence_tolerance(&mut self.model, tolerance);
            self.check_field(object, 14, accepted);
        }
        if let Some(action) = object.get_string(15) {
            let accepted = terminal.set_damper_heating_action(&mut self.model, action);
            self.check_field(object, 15, accepted);
        }
        if let Some(temperature) = object.get_double(18) {
            let accepted =
                terminal.set_maximum_reheat_air_temperature(&mut self.model, temperature);
            self.check_field(object, 18, accepted);
        }
    }

    /// Zone whose inlet port list `node` feeds.
    fn zone_fed_by(&self, node: Node) -> Option<ThermalZone> {
        let next = node.outlet_model_object(&self.model)?;
        if self.model.kind(next) != Some(ObjectKind::PortList) {
            return None;
        }
        PortList::wrap(next)
            .thermal_zone(&self.model)
            .map(ThermalZone::wrap)
    }
}
