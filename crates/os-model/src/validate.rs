//! Model consistency checks.

use crate::error::{ModelError, ModelResult};
use crate::field_store::{FieldValue, PortRef};
use crate::model::Model;

impl Model {
    /// Check every stored connection and pointer.
    ///
    /// - each half-edge has its mirror on the peer;
    /// - each half-edge sits on a port slot of the right direction pairing;
    /// - each pointer targets a live object;
    /// - each real value is finite.
    pub fn validate_connections(&self) -> ModelResult<()> {
        for record in self.records() {
            let layout = record.kind.port_layout();
            for index in 0..record.fields.len() {
                match record.fields.get(index) {
                    FieldValue::Port(peer) => {
                        let Some(own_dir) = layout.direction(index) else {
                            return Err(ModelError::NotAPort {
                                handle: record.handle,
                                kind: record.kind,
                                port: index,
                            });
                        };
                        let mirror = PortRef {
                            peer: record.handle,
                            peer_port: index,
                        };
                        if self.peer(peer.peer, peer.peer_port) != Some(mirror) {
                            return Err(ModelError::InconsistentConnection {
                                handle: record.handle,
                                port: index,
                            });
                        }
                        let peer_dir = self
                            .kind(peer.peer)
                            .and_then(|k| k.port_layout().direction(peer.peer_port));
                        if peer_dir == Some(own_dir) {
                            return Err(ModelError::WrongDirection {
                                handle: record.handle,
                                port: index,
                            });
                        }
                    }
                    FieldValue::Pointer(target) if !self.contains(*target) => {
                        return Err(ModelError::DanglingPointer {
                            handle: record.handle,
                            field: index,
                        });
                    }
                    FieldValue::Real(v) if !v.is_finite() => {
                        return Err(ModelError::NonFinite {
                            handle: record.handle,
                            field: index,
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::air_loop::AirLoopHvac;
    use crate::components::thermal_zone::ThermalZone;
    use crate::object_kind::ObjectKind;

    #[test]
    fn built_loops_validate() {
        let mut model = Model::new();
        let air_loop = AirLoopHvac::new(&mut model);
        let zone = ThermalZone::new(&mut model);
        air_loop.add_branch_for_zone(&mut model, zone);
        assert_eq!(model.validate_connections(), Ok(()));

        air_loop.remove_branch_for_zone(&mut model, zone);
        assert_eq!(model.validate_connections(), Ok(()));
    }

    #[test]
    fn removal_leaves_no_dangling_state() {
        let mut model = Model::new();
        let a = model.add_object(ObjectKind::Node);
        let b = model.add_object(ObjectKind::Node);
        let zone = ThermalZone::new(&mut model);
        model.connect(a, 2, b, 1).unwrap();
        zone.add_equipment(&mut model, b);

        model.remove_object(b);
        assert_eq!(model.validate_connections(), Ok(()));
    }
}
