//! Plant loop demand side: branches, pipes and connectors.

use os_core::Handle;
use os_idf::{IddObjectType, IdfObject};
use os_model::{CoilHeatingWater, Model, ModelObject, ObjectKind, PlantLoop, WaterToAirComponent};

use super::{ForwardTranslator, label, name_of, optional_name};

/// One `Branch` component entry: type, name, inlet node, outlet node.
type BranchComponent = (IddObjectType, String, String, String);

impl ForwardTranslator {
    pub(super) fn translate_plant_loop(&mut self, model: &Model, handle: Handle) {
        let plant = PlantLoop::cast(model, handle);
        let loop_name = name_of(model, handle);
        let (Some(splitter), Some(mixer)) = (plant.demand_splitter(model), plant.demand_mixer(model))
        else {
            self.log
                .error(Some(label(model, handle)), "plant loop has no demand connectors");
            return;
        };

        let inlet_branch = format!("{loop_name} Demand Inlet Branch");
        let inlet_pipe = format!("{loop_name} Demand Inlet Pipe");
        let inlet_node = optional_name(model, plant.demand_inlet_node(model).map(|n| n.handle()));
        self.push_pipe_branch(
            &inlet_branch,
            &inlet_pipe,
            inlet_node,
            format!("{inlet_pipe} Outlet Node"),
        );

        let mut branch_names = Vec::new();
        for (index, branch) in plant.demand_branches(model).into_iter().enumerate() {
            let branch_name = format!("{loop_name} Demand Branch {}", index + 1);
            let components = self.branch_components(model, &branch);
            if components.is_empty() {
                let pipe = format!("{loop_name} Demand Bypass Pipe {}", index + 1);
                self.push_pipe_branch(
                    &branch_name,
                    &pipe,
                    format!("{pipe} Inlet Node"),
                    format!("{pipe} Outlet Node"),
                );
            } else {
                self.push_branch(&branch_name, &components);
            }
            branch_names.push(branch_name);
        }

        let outlet_branch = format!("{loop_name} Demand Outlet Branch");
        let outlet_pipe = format!("{loop_name} Demand Outlet Pipe");
        let outlet_node = optional_name(model, plant.demand_outlet_node(model).map(|n| n.handle()));
        self.push_pipe_branch(
            &outlet_branch,
            &outlet_pipe,
            format!("{outlet_pipe} Inlet Node"),
            outlet_node,
        );

        let mut connector = IdfObject::new(IddObjectType::ConnectorSplitter);
        connector.set_name(&name_of(model, splitter.handle()));
        connector.set_string(1, &inlet_branch);
        for name in &branch_names {
            connector.push_extensible_group(&[name.as_str()]);
        }
        self.push(connector);

        let mut connector = IdfObject::new(IddObjectType::ConnectorMixer);
        connector.set_name(&name_of(model, mixer.handle()));
        connector.set_string(1, &outlet_branch);
        for name in &branch_names {
            connector.push_extensible_group(&[name.as_str()]);
        }
        self.push(connector);
    }

    /// Water-side components on one demand branch, with their water nodes.
    fn branch_components(&mut self, model: &Model, branch: &[Handle]) -> Vec<BranchComponent> {
        let mut out = Vec::new();
        for &handle in branch {
            match model.kind(handle) {
                Some(ObjectKind::Node) => {}
                Some(ObjectKind::CoilHeatingWater) => {
                    let coil = CoilHeatingWater::wrap(handle);
                    out.push((
                        IddObjectType::CoilHeatingWater,
                        name_of(model, handle),
                        optional_name(model, coil.water_inlet_model_object(model)),
                        optional_name(model, coil.water_outlet_model_object(model)),
                    ));
                }
                Some(_) => self.log.warn(
                    Some(label(model, handle)),
                    "skipped on demand branch: not a water-side component",
                ),
                None => {}
            }
        }
        out
    }

    fn push_branch(&mut self, name: &str, components: &[BranchComponent]) {
        let mut branch = IdfObject::new(IddObjectType::Branch);
        branch.set_name(name);
        for (object_type, component, inlet, outlet) in components {
            branch.push_extensible_group(&[
                object_type.name(),
                component.as_str(),
                inlet.as_str(),
                outlet.as_str(),
            ]);
        }
        self.push(branch);
    }

    /// A `Pipe:Adiabatic` and the single-component branch holding it.
    fn push_pipe_branch(&mut self, branch: &str, pipe: &str, inlet: String, outlet: String) {
        let mut obj = IdfObject::new(IddObjectType::PipeAdiabatic);
        obj.set_name(pipe);
        obj.set_string(1, &inlet);
        obj.set_string(2, &outlet);
        self.push(obj);

        self.push_branch(
            branch,
            &[(IddObjectType::PipeAdiabatic, pipe.to_string(), inlet, outlet)],
        );
    }
}
