//! Model → IDF translation.
//!
//! Objects are visited in model insertion order. Each kind has an emitter
//! that appends one or more IDF objects to the workspace under
//! construction; nodes, port lists and plant connectors carry no record of
//! their own and are written by their owners. The source model is never
//! mutated.

mod daylighting;
mod hvac;
mod plant;
mod zone;

use os_core::{Handle, Real};
use os_idf::{IddObjectType, IdfObject, Workspace, format_real};
use os_model::{Model, ObjectKind};
use tracing::debug;

use crate::config::ForwardOptions;
use crate::messages::{MessageLevel, MessageLog, TranslationMessage};

/// Value of the `Version` object written at the top of every workspace.
///
/// 8.9 is the last release that still names `AirTerminal:SingleDuct:Uncontrolled`
/// (9.0 renamed it `AirTerminal:SingleDuct:ConstantVolume:NoReheat`), and it
/// already uses the reference-point form of `Daylighting:Controls`.
pub const IDF_VERSION: &str = "8.9";

#[derive(Debug, Default)]
pub struct ForwardTranslator {
    options: ForwardOptions,
    workspace: Workspace,
    log: MessageLog,
}

impl ForwardTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ForwardOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> ForwardOptions {
        self.options
    }

    /// Translate every object of `model` into a fresh workspace.
    pub fn translate_model(&mut self, model: &Model) -> Workspace {
        self.workspace = Workspace::new();
        self.log.clear();

        self.push(IdfObject::with_fields(
            IddObjectType::Version,
            vec![IDF_VERSION.to_string()],
        ));
        for handle in model.objects() {
            self.translate_model_object(model, handle);
        }
        debug!(objects = self.workspace.len(), "forward translation done");
        std::mem::take(&mut self.workspace)
    }

    /// Emit the records for one model object, returning the handles of the
    /// IDF objects appended.
    pub fn translate_model_object(&mut self, model: &Model, handle: Handle) -> Vec<Handle> {
        let before = self.workspace.len();
        match model.kind(handle) {
            Some(ObjectKind::AirLoopHvac) => self.translate_air_loop(model, handle),
            Some(ObjectKind::AirLoopHvacZoneSplitter) => self.translate_zone_splitter(model, handle),
            Some(ObjectKind::AirLoopHvacZoneMixer) => self.translate_zone_mixer(model, handle),
            Some(ObjectKind::ThermalZone) => self.translate_thermal_zone(model, handle),
            Some(ObjectKind::AirTerminalSingleDuctUncontrolled) => {
                self.translate_uncontrolled_terminal(model, handle)
            }
            Some(ObjectKind::AirTerminalSingleDuctVavReheat) => {
                self.translate_vav_reheat_terminal(model, handle)
            }
            Some(ObjectKind::CoilHeatingWater) => self.translate_coil_heating_water(model, handle),
            Some(ObjectKind::CoilHeatingElectric) => {
                self.translate_coil_heating_electric(model, handle)
            }
            Some(ObjectKind::PlantLoop) if self.options.plant_demand_side => {
                self.translate_plant_loop(model, handle)
            }
            Some(ObjectKind::DaylightingControl) if self.options.daylighting => {
                self.translate_daylighting_control(model, handle)
            }
            Some(_) => {}
            None => self.log.error(None, format!("object {handle} is not in the model")),
        }
        self.workspace.objects[before..]
            .iter()
            .map(|o| o.handle)
            .collect()
    }

    pub fn warnings(&self) -> Vec<TranslationMessage> {
        self.log.of_level(MessageLevel::Warning)
    }

    pub fn errors(&self) -> Vec<TranslationMessage> {
        self.log.of_level(MessageLevel::Error)
    }

    /// Append `object`, dropping trailing blank fields when it carries no
    /// extensible groups.
    fn push(&mut self, mut object: IdfObject) -> Handle {
        if object.num_extensible_groups() == 0 {
            while object.fields.len() > 1 && object.fields.last().is_some_and(|f| f.is_empty()) {
                object.fields.pop();
            }
        }
        self.workspace.add_object(object)
    }
}

/// Name of a model object, blank when it has none.
fn name_of(model: &Model, handle: Handle) -> String {
    model.name(handle).unwrap_or_default()
}

fn optional_name(model: &Model, handle: Option<Handle>) -> String {
    handle.map(|h| name_of(model, h)).unwrap_or_default()
}

/// `"<iddname> '<name>'"`, for messages.
fn label(model: &Model, handle: Handle) -> String {
    let kind = model.kind(handle).map_or("?", |k| k.iddname());
    format!("{kind} '{}'", name_of(model, handle))
}

/// `None` is written as `Autosize`.
fn autosizable(value: Option<Real>) -> String {
    value.map_or_else(|| "Autosize".to_string(), format_real)
}

/// EnergyPlus type name for a model kind that has a one-to-one record.
fn idd_type(kind: ObjectKind) -> Option<IddObjectType> {
    match kind {
        ObjectKind::AirLoopHvacZoneSplitter => Some(IddObjectType::AirLoopHvacZoneSplitter),
        ObjectKind::AirLoopHvacZoneMixer => Some(IddObjectType::AirLoopHvacZoneMixer),
        ObjectKind::AirTerminalSingleDuctUncontrolled => {
            Some(IddObjectType::AirTerminalSingleDuctUncontrolled)
        }
        ObjectKind::AirTerminalSingleDuctVavReheat => {
            Some(IddObjectType::AirTerminalSingleDuctVavReheat)
        }
        ObjectKind::CoilHeatingWater => Some(IddObjectType::CoilHeatingWater),
        ObjectKind::CoilHeatingElectric => Some(IddObjectType::CoilHeatingElectric),
        ObjectKind::ThermalZone => Some(IddObjectType::Zone),
        ObjectKind::DaylightingControl => Some(IddObjectType::DaylightingReferencePoint),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use os_model::{AirLoopHvac, ThermalZone};

    #[test]
    fn version_comes_first() {
        let model = Model::new();
        let ws = ForwardTranslator::new().translate_model(&model);
        assert_eq!(ws.len(), 1);
        assert_eq!(ws.objects[0].object_type, IddObjectType::Version);
        assert_eq!(ws.objects[0].get_string(0), Some(IDF_VERSION));
        // Uncontrolled terminals keep their pre-9.0 object name.
        assert_eq!(ws.objects[0].get_string(0), Some("8.9"));
    }

    #[test]
    fn source_model_is_untouched() {
        let mut model = Model::new();
        let air_loop = AirLoopHvac::new(&mut model);
        let zone = ThermalZone::new_named(&mut model, "Office");
        air_loop.add_branch_for_zone(&mut model, zone);
        let edges = model.edge_count();
        let objects = model.len();

        let mut translator = ForwardTranslator::new();
        let first = translator.translate_model(&model);
        let second = translator.translate_model(&model);

        assert_eq!((model.edge_count(), model.len()), (edges, objects));
        let fields = |ws: &Workspace| -> Vec<Vec<String>> {
            ws.objects().map(|o| o.fields.clone()).collect()
        };
        assert_eq!(fields(&first), fields(&second));
    }

    #[test]
    fn trailing_blanks_are_dropped() {
        let mut translator = ForwardTranslator::new();
        let mut obj = IdfObject::new(IddObjectType::PipeAdiabatic);
        obj.set_name("Pipe");
        let h = translator.push(obj);
        assert_eq!(translator.workspace.object(h).unwrap().fields, vec!["Pipe"]);
    }

    #[test]
    fn autosize_text() {
        assert_eq!(autosizable(None), "Autosize");
        assert_eq!(autosizable(Some(0.5)), "0.5");
    }
}
