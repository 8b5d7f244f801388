//! Forward and reverse translation through whole workspaces.

use os_idf::{IddObjectType, IdfObject, PrintOptions, Workspace, parse_idf, print_workspace};
use os_model::{
    AirLoopHvac, AirLoopHvacZoneSplitter, AirTerminal, AirTerminalSingleDuctUncontrolled,
    AirTerminalSingleDuctVavReheat, CoilHeatingElectric, DaylightingControl, Model, ModelObject,
    Node, ObjectKind, Splitter, StraightComponent, ThermalZone,
};
use os_translator::{ForwardTranslator, ReverseOptions, ReverseTranslator};
use proptest::prelude::*;

fn splitter_object(name: &str, inlet: &str, outlets: &[&str]) -> IdfObject {
    let mut obj = IdfObject::new(IddObjectType::AirLoopHvacZoneSplitter);
    obj.set_name(name);
    obj.set_string(1, inlet);
    for outlet in outlets {
        obj.push_extensible_group(&[*outlet]);
    }
    obj
}

fn records<'a>(ws: &'a Workspace, object_type: &'a IddObjectType) -> Vec<&'a IdfObject> {
    ws.objects_by_type(object_type).collect()
}

#[test]
fn splitter_outlet_skips_uncontrolled_terminal() {
    let mut model = Model::new();
    let air_loop = AirLoopHvac::new(&mut model);
    let zone = ThermalZone::new_named(&mut model, "Office");
    let terminal = AirTerminalSingleDuctUncontrolled::new(&mut model);
    assert!(air_loop.add_branch_for_zone_with_terminal(&mut model, zone, terminal));

    // splitter → splice node → terminal → zone inlet node
    let splitter = air_loop.zone_splitter(&model).unwrap();
    let splice = splitter.outlet_model_object(&model, 0).unwrap();
    assert_eq!(model.kind(splice), Some(ObjectKind::Node));
    let zone_inlet = terminal.outlet_model_object(&model).unwrap();
    let zone_inlet_name = model.name(zone_inlet).unwrap();

    let mut translator = ForwardTranslator::new();
    let ws = translator.translate_model(&model);

    let splitters = records(&ws, &IddObjectType::AirLoopHvacZoneSplitter);
    assert_eq!(splitters.len(), 1);
    let outlets = splitters[0].extensible_groups();
    assert_eq!(outlets.len(), 1);
    assert_eq!(outlets[0][0], zone_inlet_name);
    assert_ne!(Some(outlets[0][0].clone()), model.name(splice));

    let terminals = records(&ws, &IddObjectType::AirTerminalSingleDuctUncontrolled);
    assert_eq!(terminals[0].get_string(2), Some(zone_inlet_name.as_str()));
    assert!(translator.errors().is_empty());
}

#[test]
fn splitter_outlet_feeding_terminal_directly_names_its_downstream_node() {
    let mut model = Model::new();
    let air_loop = AirLoopHvac::new(&mut model);
    let splitter = air_loop.zone_splitter(&model).unwrap();
    let terminal = AirTerminalSingleDuctUncontrolled::new(&mut model);
    let x = Node::new_named(&mut model, "X");

    let port = splitter.next_outlet_port(&model);
    model
        .connect(splitter.handle(), port, terminal.handle(), 2)
        .unwrap();
    model
        .connect(terminal.handle(), 3, x.handle(), Node::INLET_PORT)
        .unwrap();
    assert_eq!(splitter.outlet_model_object(&model, 0), Some(terminal.handle()));

    let mut translator = ForwardTranslator::new();
    let ws = translator.translate_model(&model);

    let splitters = records(&ws, &IddObjectType::AirLoopHvacZoneSplitter);
    let outlets = splitters[0].extensible_groups();
    assert_eq!(outlets.len(), 1);
    assert_eq!(outlets[0][0], "X");
}

#[test]
fn two_branch_splitter_ports() {
    let mut ws = Workspace::new();
    let h = ws.add_object(splitter_object("Splitter", "Supply", &["Branch A", "Branch B"]));

    let mut translator = ReverseTranslator::new();
    let target = translator
        .translate_workspace_object(&ws, ws.object(h).unwrap())
        .unwrap();
    let model = translator.model();
    let splitter = AirLoopHvacZoneSplitter::cast(model, target);

    assert_eq!(splitter.name(model).as_deref(), Some("Splitter"));
    let inlet = splitter.inlet_model_object(model).unwrap();
    assert_eq!(model.name(inlet).as_deref(), Some("Supply"));

    let names: Vec<String> = splitter
        .outlet_model_objects(model)
        .into_iter()
        .filter_map(|o| model.name(o))
        .collect();
    assert_eq!(names, vec!["Branch A", "Branch B"]);
    assert_eq!(splitter.outlet_port(1), splitter.outlet_port(0) + 1);
    assert_eq!(splitter.next_outlet_port(model), splitter.outlet_port(2));
    assert_eq!(model.validate_connections(), Ok(()));
}

#[test]
fn same_source_translates_to_same_target() {
    let mut ws = Workspace::new();
    let h = ws.add_object(splitter_object("Splitter", "Supply", &["A"]));
    let source = ws.object(h).unwrap();

    let mut translator = ReverseTranslator::new();
    let first = translator.translate_workspace_object(&ws, source);
    let objects = translator.model().len();
    let second = translator.translate_workspace_object(&ws, source);

    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(translator.model().len(), objects);
}

#[test]
fn wrong_source_type_is_an_error() {
    let mut ws = Workspace::new();
    let mut zone = IdfObject::new(IddObjectType::Zone);
    zone.set_name("Office");
    let h = ws.add_object(zone);

    let mut translator = ReverseTranslator::new();
    assert_eq!(
        translator.translate_zone_splitter(&ws, ws.object(h).unwrap()),
        None
    );
    assert_eq!(translator.errors().len(), 1);
    assert!(translator.errors()[0].text.contains("AirLoopHVAC:ZoneSplitter"));
    assert!(translator.model().is_empty());
}

#[test]
fn vav_with_unknown_coil_is_skipped() {
    let mut ws = Workspace::new();
    let mut vav = IdfObject::new(IddObjectType::AirTerminalSingleDuctVavReheat);
    vav.set_name("VAV");
    vav.set_string(9, "Coil:Heating:Electric");
    vav.set_string(10, "Missing Coil");
    let h = ws.add_object(vav);

    let mut translator = ReverseTranslator::new();
    assert_eq!(
        translator.translate_workspace_object(&ws, ws.object(h).unwrap()),
        None
    );
    assert_eq!(translator.errors().len(), 1);
    assert!(translator.model().is_empty());
}

fn daylighting_workspace(fractions: &[(&str, &str)]) -> Workspace {
    let mut ws = Workspace::new();
    let mut zone = IdfObject::new(IddObjectType::Zone);
    zone.set_name("Office");
    ws.add_object(zone);

    let mut controls = IdfObject::new(IddObjectType::DaylightingControls);
    controls.set_name("Office Daylighting");
    controls.set_string(1, "Office");
    for (name, fraction) in fractions {
        controls.push_extensible_group(&[*name, *fraction, "500"]);
    }
    ws.add_object(controls);

    // Reference points after the controls that use them.
    for (name, _) in fractions {
        let mut point = IdfObject::new(IddObjectType::DaylightingReferencePoint);
        point.set_name(name);
        point.set_string(1, "Office");
        ws.add_object(point);
    }
    ws
}

#[test]
fn daylighting_primary_has_largest_fraction() {
    for order in [[("Window", "0.7"), ("Core", "0.3")], [("Core", "0.3"), ("Window", "0.7")]] {
        let ws = daylighting_workspace(&order);
        let mut translator = ReverseTranslator::new();
        let model = translator.translate_workspace(&ws);

        let zone = model.thermal_zones()[0];
        let primary = zone.primary_daylighting_control(&model).unwrap();
        let secondary = zone.secondary_daylighting_control(&model).unwrap();
        assert_eq!(model.name(primary).as_deref(), Some("Window"));
        assert_eq!(model.name(secondary).as_deref(), Some("Core"));
        assert_eq!(
            zone.fraction_of_zone_controlled_by_primary_daylighting_control(&model),
            0.7
        );
        assert_eq!(model.objects_of_kind(ObjectKind::DaylightingControl).len(), 2);
        assert!(translator.warnings().is_empty());
    }
}

#[test]
fn daylighting_fraction_tolerance_is_configurable() {
    let ws = daylighting_workspace(&[("A", "0.6"), ("B", "0.45")]);

    let mut strict = ReverseTranslator::new();
    strict.translate_workspace(&ws);
    assert_eq!(strict.warnings().len(), 1);

    let mut lenient = ReverseTranslator::with_options(ReverseOptions {
        fraction_tolerance: 0.1,
        ..ReverseOptions::default()
    });
    lenient.translate_workspace(&ws);
    assert!(lenient.warnings().is_empty());
}

#[test]
fn single_control_option_drops_secondary() {
    let ws = daylighting_workspace(&[("A", "0.4"), ("B", "0.6")]);
    let mut translator = ReverseTranslator::with_options(ReverseOptions {
        max_daylighting_controls: 1,
        ..ReverseOptions::default()
    });
    let model = translator.translate_workspace(&ws);

    let zone = model.thermal_zones()[0];
    let primary = zone.primary_daylighting_control(&model).unwrap();
    assert_eq!(model.name(primary).as_deref(), Some("B"));
    assert_eq!(zone.secondary_daylighting_control(&model), None);
    assert_eq!(translator.warnings().len(), 1);
}

/// Air loop serving one zone through an uncontrolled terminal and one
/// through a VAV terminal with electric reheat; the first zone has a
/// daylighting control.
fn sample_model() -> Model {
    let mut model = Model::new();
    let air_loop = AirLoopHvac::new(&mut model);

    let office = ThermalZone::new_named(&mut model, "Office");
    let supply = AirTerminalSingleDuctUncontrolled::new(&mut model);
    supply.set_name(&mut model, "Office Supply");
    assert!(air_loop.add_branch_for_zone_with_terminal(&mut model, office, supply));

    let lab = ThermalZone::new_named(&mut model, "Lab");
    let coil = CoilHeatingElectric::new(&mut model);
    coil.set_name(&mut model, "Lab Reheat");
    let vav = AirTerminalSingleDuctVavReheat::new(&mut model, coil);
    vav.set_name(&mut model, "Lab VAV");
    assert!(air_loop.add_branch_for_zone_with_terminal(&mut model, lab, vav));

    let control = DaylightingControl::new_named(&mut model, "Office Sensor");
    assert!(control.set_thermal_zone(&mut model, office));
    assert!(control.set_illuminance_setpoint(&mut model, 400.0));
    assert!(office.set_primary_daylighting_control(&mut model, control.handle()));
    model
}

#[test]
fn forward_print_parse_reverse() {
    let source = sample_model();
    let mut forward = ForwardTranslator::new();
    let ws = forward.translate_model(&source);
    assert!(forward.errors().is_empty(), "{:?}", forward.errors());

    let text = print_workspace(&ws, PrintOptions::default());
    let parsed = parse_idf(&text).unwrap();
    assert_eq!(parsed.len(), ws.len());

    let mut reverse = ReverseTranslator::new();
    let model = reverse.translate_workspace(&parsed);
    assert!(reverse.errors().is_empty(), "{:?}", reverse.errors());
    assert_eq!(model.validate_connections(), Ok(()));

    let zones: Vec<String> = model
        .thermal_zones()
        .into_iter()
        .filter_map(|z| z.name(&model))
        .collect();
    assert_eq!(zones, vec!["Office", "Lab"]);

    let office = ThermalZone::cast(&model, model.object_by_name(ObjectKind::ThermalZone, "Office").unwrap());
    let supply = model
        .object_by_name(ObjectKind::AirTerminalSingleDuctUncontrolled, "Office Supply")
        .map(AirTerminalSingleDuctUncontrolled::wrap)
        .unwrap();
    assert_eq!(office.equipment(&model), vec![supply.handle()]);
    assert_eq!(supply.thermal_zone(&model), Some(office));

    let lab = ThermalZone::cast(&model, model.object_by_name(ObjectKind::ThermalZone, "Lab").unwrap());
    let vav = model
        .object_by_name(ObjectKind::AirTerminalSingleDuctVavReheat, "Lab VAV")
        .map(AirTerminalSingleDuctVavReheat::wrap)
        .unwrap();
    assert_eq!(lab.equipment(&model), vec![vav.handle()]);
    let coil = vav.reheat_coil(&model).unwrap();
    assert_eq!(model.name(coil).as_deref(), Some("Lab Reheat"));
    assert_eq!(model.kind(coil), Some(ObjectKind::CoilHeatingElectric));

    let control = office
        .primary_daylighting_control(&model)
        .map(DaylightingControl::wrap)
        .unwrap();
    assert_eq!(control.name(&model).as_deref(), Some("Office Sensor"));
    assert_eq!(control.illuminance_setpoint(&model), 400.0);
    assert_eq!(control.thermal_zone(&model), Some(office));

    // A second pass over the rebuilt model writes the same zone records.
    let again = ForwardTranslator::new().translate_model(&model);
    let zone_names = |ws: &Workspace| -> Vec<String> {
        ws.objects_by_type(&IddObjectType::Zone)
            .filter_map(|o| o.name().map(str::to_string))
            .collect()
    };
    assert_eq!(zone_names(&again), zone_names(&ws));
}

proptest! {
    #[test]
    fn splitter_outlets_keep_their_order(count in 1usize..8) {
        let names: Vec<String> = (0..count).map(|i| format!("Outlet {i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut ws = Workspace::new();
        let h = ws.add_object(splitter_object("Splitter", "Supply", &refs));

        let mut translator = ReverseTranslator::new();
        let target = translator
            .translate_workspace_object(&ws, ws.object(h).unwrap())
            .unwrap();
        let model = translator.model();
        let splitter = AirLoopHvacZoneSplitter::cast(model, target);

        let outlets: Vec<String> = splitter
            .outlet_model_objects(model)
            .into_iter()
            .filter_map(|o| model.name(o))
            .collect();
        prop_assert_eq!(outlets, names);
        prop_assert_eq!(splitter.next_outlet_port(model), splitter.outlet_port(count));
    }
}
