//! Pass-through vertex of the air and plant graphs.

use os_core::Handle;

use crate::components::{ModelObject, StraightComponent, model_object};
use crate::model::Model;
use crate::object_kind::ObjectKind;

model_object!(
    /// A typed pass-through vertex with one inlet and one outlet slot.
    Node,
    ObjectKind::Node
);

impl Node {
    pub const INLET_PORT: usize = 1;
    pub const OUTLET_PORT: usize = 2;

    pub fn new(model: &mut Model) -> Self {
        Self(model.add_object(ObjectKind::Node))
    }

    pub fn new_named(model: &mut Model, name: &str) -> Self {
        Self(model.add_object_named(ObjectKind::Node, name))
    }

    /// Disconnects both sides and removes the node.
    pub fn remove(&self, model: &mut Model) -> Vec<Handle> {
        model.remove_object(self.0)
    }
}

impl StraightComponent for Node {
    fn inlet_port(&self) -> usize {
        Self::INLET_PORT
    }

    fn outlet_port(&self) -> usize {
        Self::OUTLET_PORT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_nodes_see_each_other() {
        let mut model = Model::new();
        let a = Node::new(&mut model);
        let b = Node::new(&mut model);
        model
            .connect(a.handle(), a.outlet_port(), b.handle(), b.inlet_port())
            .unwrap();

        assert_eq!(a.outlet_model_object(&model), Some(b.handle()));
        assert_eq!(b.inlet_model_object(&model), Some(a.handle()));
        assert_eq!(a.inlet_model_object(&model), None);
    }

    #[test]
    fn from_handle_checks_kind() {
        let mut model = Model::new();
        let zone = model.add_object(ObjectKind::ThermalZone);
        let node = Node::new(&mut model);
        assert!(Node::from_handle(&model, zone).is_none());
        assert_eq!(Node::from_handle(&model, node.handle()), Some(node));
    }

    #[test]
    #[should_panic(expected = "cannot view")]
    fn cast_of_wrong_kind_is_fatal() {
        let mut model = Model::new();
        let zone = model.add_object(ObjectKind::ThermalZone);
        let _ = Node::cast(&model, zone);
    }
}
