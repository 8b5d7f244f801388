//! IDF → Model translation.
//!
//! Types are visited in a fixed order so that referenced objects usually
//! exist before their referrers; anything referenced by name that has not
//! been visited yet is translated on demand. Every translation is memoized
//! by the source object's handle, and nodes (which have no IDF record of
//! their own) are memoized by name.

mod daylighting;
mod hvac;
mod zone;

use std::collections::{BTreeSet, HashMap, HashSet};

use os_core::{Handle, Real};
use os_idf::{IddObjectType, IdfObject, Workspace};
use os_model::{Model, ModelObject, Node, ObjectKind};
use tracing::debug;

use crate::config::ReverseOptions;
use crate::messages::{MessageLevel, MessageLog, TranslationMessage};

/// Order in which source types are visited.
const TRANSLATION_ORDER: [IddObjectType; 10] = [
    IddObjectType::Zone,
    IddObjectType::ZoneHvacEquipmentConnections,
    IddObjectType::AirLoopHvacZoneSplitter,
    IddObjectType::AirLoopHvacZoneMixer,
    IddObjectType::CoilHeatingWater,
    IddObjectType::CoilHeatingElectric,
    IddObjectType::AirTerminalSingleDuctUncontrolled,
    IddObjectType::AirTerminalSingleDuctVavReheat,
    IddObjectType::DaylightingReferencePoint,
    IddObjectType::DaylightingControls,
];

#[derive(Debug, Default)]
pub struct ReverseTranslator {
    options: ReverseOptions,
    model: Model,
    /// Source handle → target handle.
    translated: HashMap<Handle, Handle>,
    in_progress: HashSet<Handle>,
    /// Lowercased node name → node.
    nodes: HashMap<String, Node>,
    log: MessageLog,
}

impl ReverseTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Out-of-range options are clamped; see [`ReverseOptions::clamped`].
    pub fn with_options(options: ReverseOptions) -> Self {
        Self {
            options: options.clamped(),
            ..Self::default()
        }
    }

    /// The model built so far.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Translate a whole workspace into a fresh model.
    ///
    /// Translation state is reset before and after, so handles returned by
    /// earlier [`translate_workspace_object`](Self::translate_workspace_object)
    /// calls do not carry over.
    pub fn translate_workspace(&mut self, workspace: &Workspace) -> Model {
        self.reset();
        self.log.clear();

        for object_type in TRANSLATION_ORDER {
            for object in workspace.objects_by_type(&object_type) {
                self.translate_workspace_object(workspace, object);
            }
        }

        let mut unsupported = BTreeSet::new();
        for object in workspace.objects() {
            if !object.object_type.is_known() {
                unsupported.insert(object.object_type.name().to_string());
            } else if !TRANSLATION_ORDER.contains(&object.object_type) {
                debug!(object = %object_label(object), "no reverse translation; skipped");
            }
        }
        for type_name in unsupported {
            self.log
                .warn(None, format!("unsupported object type {type_name} skipped"));
        }

        debug!(objects = self.model.len(), "reverse translation done");
        let model = std::mem::take(&mut self.model);
        self.reset();
        model
    }

    /// Translate one source object, or return the object it was already
    /// translated to.
    pub fn translate_workspace_object(
        &mut self,
        workspace: &Workspace,
        object: &IdfObject,
    ) -> Option<Handle> {
        if let Some(&target) = self.translated.get(&object.handle) {
            return Some(target);
        }
        if !self.in_progress.insert(object.handle) {
            self.log.error(
                Some(object_label(object)),
                "circular reference; object is already being translated",
            );
            return None;
        }

        let target = match object.object_type {
            IddObjectType::Zone => self.translate_zone(workspace, object),
            IddObjectType::ZoneHvacEquipmentConnections => {
                self.translate_zone_equipment_connections(workspace, object)
            }
            IddObjectType::AirLoopHvacZoneSplitter => self.translate_zone_splitter(workspace, object),
            IddObjectType::AirLoopHvacZoneMixer => self.translate_zone_mixer(workspace, object),
            IddObjectType::CoilHeatingWater => self.translate_coil_heating_water(workspace, object),
            IddObjectType::CoilHeatingElectric => {
                self.translate_coil_heating_electric(workspace, object)
            }
            IddObjectType::AirTerminalSingleDuctUncontrolled => {
                self.translate_uncontrolled_terminal(workspace, object)
            }
            IddObjectType::AirTerminalSingleDuctVavReheat => {
                self.translate_vav_reheat_terminal(workspace, object)
            }
            IddObjectType::DaylightingReferencePoint => {
                self.translate_daylighting_reference_point(workspace, object)
            }
            IddObjectType::DaylightingControls => {
                self.translate_daylighting_controls(workspace, object)
            }
            _ => {
                debug!(object = %object_label(object), "no reverse translation");
                None
            }
        };

        self.in_progress.remove(&object.handle);
        if let Some(target) = target {
            self.translated.insert(object.handle, target);
        }
        target
    }

    pub fn warnings(&self) -> Vec<TranslationMessage> {
        self.log.of_level(MessageLevel::Warning)
    }

    pub fn errors(&self) -> Vec<TranslationMessage> {
        self.log.of_level(MessageLevel::Error)
    }

    fn reset(&mut self) {
        self.model = Model::new();
        self.translated.clear();
        self.in_progress.clear();
        self.nodes.clear();
    }

    /// Reports a type mismatch and returns false when `object` is not of
    /// `expected` type.
    fn expect_type(&mut self, object: &IdfObject, expected: IddObjectType) -> bool {
        if object.object_type == expected {
            return true;
        }
        self.log.error(
            Some(object_label(object)),
            format!("expected an object of type {expected}"),
        );
        false
    }

    /// Warns when a setter refused the value read from field `index`.
    fn check_field(&mut self, object: &IdfObject, index: usize, accepted: bool) {
        if !accepted {
            let field = object
                .object_type
                .field_name(index)
                .unwrap_or_else(|| format!("field {index}"));
            let value = object.get_string(index).unwrap_or_default();
            self.log.warn(
                Some(object_label(object)),
                format!("invalid {field} '{value}' ignored"),
            );
        }
    }

    /// The node called `name`, created on first use.
    fn node(&mut self, name: &str) -> Node {
        let name = name.trim();
        if let Some(&node) = self.nodes.get(&name.to_lowercase()) {
            return node;
        }
        self.clear_node_name(name);
        let node = Node::new_named(&mut self.model, name);
        self.nodes.insert(name.to_lowercase(), node);
        node
    }

    /// Register an existing node under `name`, renaming it.
    fn adopt_node(&mut self, node: Node, name: &str) {
        let name = name.trim();
        if self.nodes.contains_key(&name.to_lowercase()) {
            debug!(name, "node name already in use; not adopted");
            return;
        }
        self.clear_node_name(name);
        node.set_name(&mut self.model, name);
        self.nodes.insert(name.to_lowercase(), node);
    }

    /// Nodes built as a side effect (zone air nodes, splice nodes) carry
    /// generated names that may clash with names in the source. Such a
    /// node gives up `name` to the node the source means by it.
    fn clear_node_name(&mut self, name: &str) {
        if let Some(occupant) = self.model.object_by_name(ObjectKind::Node, name) {
            let renamed = self.model.set_name(occupant, &format!("{name} Unassigned"));
            debug!(%occupant, ?renamed, "generated node name taken by source node");
        }
    }

    fn connect(
        &mut self,
        object: &IdfObject,
        source: Handle,
        source_port: usize,
        target: Handle,
        target_port: usize,
    ) -> bool {
        match self.model.connect(source, source_port, target, target_port) {
            Ok(()) => true,
            Err(err) => {
                self.log.error(Some(object_label(object)), err.to_string());
                false
            }
        }
    }
}

/// `"<type> '<name>'"`, for messages.
fn object_label(object: &IdfObject) -> String {
    format!(
        "{} '{}'",
        object.object_type,
        object.name().unwrap_or_default()
    )
}

/// Sizing field: `Some(None)` for `Autosize`, `Some(Some(v))` for a number,
/// `None` when blank or unreadable.
fn sizing_field(object: &IdfObject, index: usize) -> Option<Option<Real>> {
    if object.is_autosize(index) {
        Some(None)
    } else {
        object.get_double(index).map(Some)
    }
}

/// Node names behind a field that may name either a node or a `NodeList`.
fn node_names(workspace: &Workspace, name: Option<&str>) -> Vec<String> {
    let Some(name) = name else {
        return Vec::new();
    };
    match workspace.object_by_name(&IddObjectType::NodeList, name) {
        Some(list) => list
            .extensible_groups()
            .into_iter()
            .filter_map(|g| g.first())
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect(),
        None => vec![name.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str) -> IdfObject {
        let mut obj = IdfObject::new(IddObjectType::Zone);
        obj.set_name(name);
        obj
    }

    #[test]
    fn memoized_by_source_handle() {
        let mut ws = Workspace::new();
        let h = ws.add_object(zone("Office"));
        let mut translator = ReverseTranslator::new();

        let source = ws.object(h).unwrap();
        let first = translator.translate_workspace_object(&ws, source);
        let second = translator.translate_workspace_object(&ws, source);
        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(translator.model().thermal_zones().len(), 1);
    }

    #[test]
    fn nodes_are_shared_by_name() {
        let mut translator = ReverseTranslator::new();
        let a = translator.node("Supply Node");
        let b = translator.node("SUPPLY NODE ");
        assert_eq!(a, b);
        assert_eq!(translator.model().len(), 1);
    }

    #[test]
    fn generated_node_names_give_way() {
        let mut translator = ReverseTranslator::new();
        let generated = Node::new(&mut translator.model);
        let generated_name = translator.model.name(generated.handle()).unwrap();

        let named = translator.node(&generated_name);
        assert_ne!(named, generated);
        assert_eq!(translator.model.name(named.handle()), Some(generated_name.clone()));
        assert_eq!(
            translator.model.name(generated.handle()),
            Some(format!("{generated_name} Unassigned"))
        );
    }

    #[test]
    fn node_list_or_single_node() {
        let mut ws = Workspace::new();
        let mut list = IdfObject::new(IddObjectType::NodeList);
        list.set_name("Inlets");
        list.push_extensible_group(&["A"]);
        list.push_extensible_group(&["B"]);
        ws.add_object(list);

        assert_eq!(node_names(&ws, Some("inlets")), vec!["A", "B"]);
        assert_eq!(node_names(&ws, Some("C")), vec!["C"]);
        assert!(node_names(&ws, None).is_empty());
    }

    #[test]
    fn unsupported_types_warn_once() {
        let mut ws = Workspace::new();
        for _ in 0..2 {
            ws.add_object(IdfObject::with_fields(
                IddObjectType::from_name("Output:Variable"),
                vec!["*".into()],
            ));
        }
        let mut translator = ReverseTranslator::new();
        let model = translator.translate_workspace(&ws);
        assert!(model.is_empty());
        assert_eq!(translator.warnings().len(), 1);
    }

    #[test]
    fn options_are_clamped() {
        let translator = ReverseTranslator::with_options(ReverseOptions {
            fraction_tolerance: Real::NAN,
            max_daylighting_controls: 0,
        });
        assert_eq!(translator.options.max_daylighting_controls, 1);
        assert_eq!(
            translator.options.fraction_tolerance,
            ReverseOptions::default().fraction_tolerance
        );
    }

    #[test]
    fn sizing_fields() {
        let obj = IdfObject::with_fields(
            IddObjectType::CoilHeatingElectric,
            vec!["C".into(), "".into(), "1".into(), "autosize".into()],
        );
        assert_eq!(sizing_field(&obj, 3), Some(None));
        assert_eq!(sizing_field(&obj, 2), Some(Some(1.0)));
        assert_eq!(sizing_field(&obj, 1), None);
    }
}
