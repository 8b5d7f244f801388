//! Air-side emitters: loop paths, zone splitter/mixer, terminals, coils.

use os_core::Handle;
use os_idf::{IddObjectType, IdfObject, format_real};
use os_model::{
    AirLoopHvac, AirLoopHvacZoneMixer, AirLoopHvacZoneSplitter, AirTerminalSingleDuctUncontrolled,
    AirTerminalSingleDuctVavReheat, CoilHeatingElectric, CoilHeatingWater, Mixer, Model,
    ModelObject, Node, ObjectKind, Splitter, StraightComponent, WaterToAirComponent,
};

use super::{ForwardTranslator, autosizable, idd_type, label, name_of, optional_name};

/// Name written for a zone splitter outlet.
///
/// An uncontrolled terminal is a pure pass-through, so when the outlet
/// feeds one (directly or through the node `add_to_node` spliced in), the
/// terminal's downstream node is written instead.
pub(super) fn flattened_outlet_name(model: &Model, outlet: Handle) -> String {
    let terminal = match model.kind(outlet) {
        Some(ObjectKind::AirTerminalSingleDuctUncontrolled) => Some(outlet),
        Some(ObjectKind::Node) => Node::wrap(outlet).outlet_model_object(model).filter(|&h| {
            model.kind(h) == Some(ObjectKind::AirTerminalSingleDuctUncontrolled)
        }),
        _ => None,
    };
    let downstream = terminal
        .and_then(|t| AirTerminalSingleDuctUncontrolled::wrap(t).outlet_model_object(model));
    match downstream {
        Some(downstream) => name_of(model, downstream),
        None => name_of(model, outlet),
    }
}

/// Name of the air distribution unit wrapping a VAV terminal.
pub(super) fn air_distribution_unit_name(terminal_name: &str) -> String {
    format!("{terminal_name} Air Distribution Unit")
}

fn damper_outlet_node_name(terminal_name: &str) -> String {
    format!("{terminal_name} Damper Outlet Node")
}

/// VAV terminal whose reheat coil is `coil`.
fn owning_vav_terminal(model: &Model, coil: Handle) -> Option<AirTerminalSingleDuctVavReheat> {
    model
        .objects_of_kind(ObjectKind::AirTerminalSingleDuctVavReheat)
        .into_iter()
        .map(AirTerminalSingleDuctVavReheat::wrap)
        .find(|t| t.reheat_coil(model) == Some(coil))
}

/// Air inlet/outlet node names of a coil: the owning terminal assigns them
/// when the coil is a reheat coil, otherwise the coil's own connections.
fn coil_air_nodes<C: StraightComponent>(model: &Model, coil: C) -> (String, String) {
    match owning_vav_terminal(model, coil.handle()) {
        Some(terminal) => {
            let terminal_name = name_of(model, terminal.handle());
            (
                damper_outlet_node_name(&terminal_name),
                optional_name(model, terminal.outlet_model_object(model)),
            )
        }
        None => (
            optional_name(model, coil.inlet_model_object(model)),
            optional_name(model, coil.outlet_model_object(model)),
        ),
    }
}

impl ForwardTranslator {
    pub(super) fn translate_air_loop(&mut self, model: &Model, handle: Handle) {
        let air_loop = AirLoopHvac::cast(model, handle);
        let loop_name = name_of(model, handle);

        let mut supply = IdfObject::new(IddObjectType::AirLoopHvacSupplyPath);
        supply.set_name(&format!("{loop_name} Supply Path"));
        supply.set_string(
            1,
            &optional_name(model, air_loop.demand_inlet_node(model).map(|n| n.handle())),
        );
        if let Some(splitter) = air_loop.zone_splitter(model) {
            supply.push_extensible_group(&[
                IddObjectType::AirLoopHvacZoneSplitter.name(),
                name_of(model, splitter.handle()).as_str(),
            ]);
        }
        self.push(supply);

        let mut ret = IdfObject::new(IddObjectType::AirLoopHvacReturnPath);
        ret.set_name(&format!("{loop_name} Return Path"));
        ret.set_string(
            1,
            &optional_name(model, air_loop.demand_outlet_node(model).map(|n| n.handle())),
        );
        if let Some(mixer) = air_loop.zone_mixer(model) {
            ret.push_extensible_group(&[
                IddObjectType::AirLoopHvacZoneMixer.name(),
                name_of(model, mixer.handle()).as_str(),
            ]);
        }
        self.push(ret);
    }

    pub(super) fn translate_zone_splitter(&mut self, model: &Model, handle: Handle) {
        let splitter = AirLoopHvacZoneSplitter::cast(model, handle);
        let mut obj = IdfObject::new(IddObjectType::AirLoopHvacZoneSplitter);
        obj.set_name(&name_of(model, handle));
        obj.set_string(1, &optional_name(model, splitter.inlet_model_object(model)));

        let outlets = splitter.outlet_model_objects(model);
        if outlets.is_empty() {
            self.log
                .warn(Some(label(model, handle)), "zone splitter has no outlet nodes");
        }
        for outlet in outlets {
            obj.push_extensible_group(&[flattened_outlet_name(model, outlet).as_str()]);
        }
        self.push(obj);
    }

    pub(super) fn translate_zone_mixer(&mut self, model: &Model, handle: Handle) {
        let mixer = AirLoopHvacZoneMixer::cast(model, handle);
        let mut obj = IdfObject::new(IddObjectType::AirLoopHvacZoneMixer);
        obj.set_name(&name_of(model, handle));
        obj.set_string(1, &optional_name(model, mixer.outlet_model_object(model)));

        let inlets = mixer.inlet_model_objects(model);
        if inlets.is_empty() {
            self.log
                .warn(Some(label(model, handle)), "zone mixer has no inlet nodes");
        }
        for inlet in inlets {
            obj.push_extensible_group(&[name_of(model, inlet).as_str()]);
        }
        self.push(obj);
    }

    pub(super) fn translate_uncontrolled_terminal(&mut self, model: &Model, handle: Handle) {
        let terminal = AirTerminalSingleDuctUncontrolled::cast(model, handle);
        let mut obj = IdfObject::new(IddObjectType::AirTerminalSingleDuctUncontrolled);
        obj.set_name(&name_of(model, handle));
        obj.set_string(1, &terminal.availability_schedule(model).unwrap_or_default());

        match terminal.outlet_model_object(model) {
            Some(node) => obj.set_string(2, &name_of(model, node)),
            None => self
                .log
                .warn(Some(label(model, handle)), "terminal has no zone supply air node"),
        }
        obj.set_string(3, &autosizable(terminal.maximum_air_flow_rate(model)));
        self.push(obj);
    }

    pub(super) fn translate_vav_reheat_terminal(&mut self, model: &Model, handle: Handle) {
        let terminal = AirTerminalSingleDuctVavReheat::cast(model, handle);
        let name = name_of(model, handle);
        let outlet_name = optional_name(model, terminal.outlet_model_object(model));

        let mut obj = IdfObject::new(IddObjectType::AirTerminalSingleDuctVavReheat);
        obj.set_name(&name);
        obj.set_string(1, &terminal.availability_schedule(model).unwrap_or_default());
        obj.set_string(2, &damper_outlet_node_name(&name));
        obj.set_string(3, &optional_name(model, terminal.inlet_model_object(model)));
        obj.set_string(4, &autosizable(terminal.maximum_air_flow_rate(model)));
        obj.set_string(5, &terminal.zone_minimum_air_flow_input_method(model));
        obj.set_double(6, terminal.constant_minimum_air_flow_fraction(model));
        obj.set_double(7, terminal.fixed_minimum_air_flow_rate(model));

        match terminal.reheat_coil(model) {
            Some(coil) => {
                let coil_type = model.kind(coil).and_then(idd_type);
                obj.set_string(9, coil_type.as_ref().map_or("", |t| t.name()));
                obj.set_string(10, &name_of(model, coil));
            }
            None => self
                .log
                .error(Some(label(model, handle)), "terminal has no reheat coil"),
        }

        obj.set_string(
            11,
            &autosizable(terminal.maximum_hot_water_or_steam_flow_rate(model)),
        );
        obj.set_double(12, terminal.minimum_hot_water_or_steam_flow_rate(model));
        obj.set_string(13, &outlet_name);
        obj.set_double(14, terminal.convergence_tolerance(model));
        obj.set_string(15, &terminal.damper_heating_action(model));
        obj.set_double(18, terminal.maximum_reheat_air_temperature(model));
        self.push(obj);

        let mut adu = IdfObject::new(IddObjectType::ZoneHvacAirDistributionUnit);
        adu.set_name(&air_distribution_unit_name(&name));
        adu.set_string(1, &outlet_name);
        adu.set_string(2, IddObjectType::AirTerminalSingleDuctVavReheat.name());
        adu.set_string(3, &name);
        self.push(adu);
    }

    pub(super) fn translate_coil_heating_water(&mut self, model: &Model, handle: Handle) {
        let coil = CoilHeatingWater::cast(model, handle);
        let (air_in, air_out) = coil_air_nodes(model, coil);

        let mut obj = IdfObject::new(IddObjectType::CoilHeatingWater);
        obj.set_name(&name_of(model, handle));
        obj.set_string(1, &coil.availability_schedule(model).unwrap_or_default());
        obj.set_string(2, &autosizable(coil.u_factor_times_area_value(model)));
        obj.set_string(3, &autosizable(coil.maximum_water_flow_rate(model)));
        obj.set_string(4, &optional_name(model, coil.water_inlet_model_object(model)));
        obj.set_string(5, &optional_name(model, coil.water_outlet_model_object(model)));
        obj.set_string(6, &air_in);
        obj.set_string(7, &air_out);
        obj.set_string(8, &coil.performance_input_method(model));
        obj.set_string(9, &autosizable(coil.rated_capacity(model)));
        if coil.plant_loop(model).is_none() {
            self.log
                .warn(Some(label(model, handle)), "water coil is not on a plant loop");
        }
        self.push(obj);
    }

    pub(super) fn translate_coil_heating_electric(&mut self, model: &Model, handle: Handle) {
        let coil = CoilHeatingElectric::cast(model, handle);
        let (air_in, air_out) = coil_air_nodes(model, coil);

        let mut obj = IdfObject::new(IddObjectType::CoilHeatingElectric);
        obj.set_name(&name_of(model, handle));
        obj.set_string(1, &coil.availability_schedule(model).unwrap_or_default());
        obj.set_string(2, &format_real(coil.efficiency(model)));
        obj.set_string(3, &autosizable(coil.nominal_capacity(model)));
        obj.set_string(4, &air_in);
        obj.set_string(5, &air_out);
        self.push(obj);
    }
}
