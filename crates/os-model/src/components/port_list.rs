//! Zone-owned list of inbound air ports.

use os_core::Handle;

use crate::components::{ModelObject, get_pointer, model_object, set_pointer};
use crate::model::Model;
use crate::object_kind::ObjectKind;
use crate::ports::{dynamic_connections, next_port};

model_object!(
    /// The set of supply nodes feeding a thermal zone.
    PortList,
    ObjectKind::PortList
);

impl PortList {
    pub const THERMAL_ZONE_FIELD: usize = 1;
    pub const FIRST_PORT: usize = 2;

    pub(crate) fn new(model: &mut Model, zone: Handle) -> Self {
        let list = Self(model.add_object(ObjectKind::PortList));
        set_pointer(model, list.0, Self::THERMAL_ZONE_FIELD, zone);
        list
    }

    pub fn thermal_zone(&self, model: &Model) -> Option<Handle> {
        get_pointer(model, self.0, Self::THERMAL_ZONE_FIELD)
    }

    pub fn next_port(&self, model: &Model) -> usize {
        model
            .fields(self.0)
            .map_or(Self::FIRST_PORT, |f| next_port(f, Self::FIRST_PORT))
    }

    /// Objects feeding this list, in port order.
    pub fn model_objects(&self, model: &Model) -> Vec<Handle> {
        dynamic_connections(model, self.0)
            .into_iter()
            .map(|(_, p)| p.peer)
            .collect()
    }

    pub fn port_for_model_object(&self, model: &Model, object: Handle) -> Option<usize> {
        dynamic_connections(model, self.0)
            .into_iter()
            .find(|(_, p)| p.peer == object)
            .map(|(i, _)| i)
    }
}
