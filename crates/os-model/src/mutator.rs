//! Graph surgery for terminal units: splicing into a zone branch and
//! unsplicing on removal.
//!
//! Both operations gather every reference they need before touching the
//! model, so a precondition miss leaves the model exactly as it was.

use os_core::Handle;
use tracing::{debug, error};

use crate::components::ModelObject;
use crate::components::node::Node;
use crate::components::port_list::PortList;
use crate::components::splitter_mixer::AirLoopHvacZoneMixer;
use crate::components::terminals::{TERMINAL_INLET_PORT, TERMINAL_OUTLET_PORT};
use crate::components::thermal_zone::ThermalZone;
use crate::error::ModelResult;
use crate::field_store::PortRef;
use crate::model::Model;
use crate::object_kind::ObjectKind;

/// Everything `add_terminal_to_node` needs, gathered up front.
struct SplicePlan {
    splitter: PortRef,
    zone: Option<ThermalZone>,
}

fn plan_splice(model: &Model, terminal: Handle, node: Node) -> Option<SplicePlan> {
    let node_h = node.handle();
    if model.kind(node_h) != Some(ObjectKind::Node) {
        debug!(node = %node_h, "node is not part of this model");
        return None;
    }
    if !model.kind(terminal).is_some_and(ObjectKind::is_air_terminal) {
        debug!(terminal = %terminal, "not an air terminal in this model");
        return None;
    }
    if model.peer(terminal, TERMINAL_INLET_PORT).is_some()
        || model.peer(terminal, TERMINAL_OUTLET_PORT).is_some()
    {
        debug!(terminal = %terminal, "terminal is already connected");
        return None;
    }

    let downstream = model.connected_object(node_h, Node::OUTLET_PORT)?;
    let zone = match model.kind(downstream)? {
        ObjectKind::PortList => {
            let zone = PortList::cast(model, downstream).thermal_zone(model)?;
            Some(ThermalZone::cast(model, zone))
        }
        ObjectKind::AirLoopHvacZoneMixer => {
            AirLoopHvacZoneMixer::cast(model, downstream).air_loop_hvac(model)?;
            None
        }
        other => {
            debug!(kind = %other, "node does not lead to a zone or an air loop mixer");
            return None;
        }
    };

    let upstream = model.peer(node_h, Node::INLET_PORT)?;
    if !model.kind(upstream.peer)?.is_splitter() {
        debug!(node = %node_h, "node is not fed by a splitter");
        return None;
    }
    if let Err(err) = model.check_connection(terminal, TERMINAL_OUTLET_PORT, node_h, Node::INLET_PORT)
    {
        debug!(%err, "terminal cannot feed the node");
        return None;
    }

    Some(SplicePlan {
        splitter: upstream,
        zone,
    })
}

/// Splice `terminal` in front of `node` on a zone supply branch.
///
/// On success the branch reads splitter → new node → terminal → `node`, and
/// the terminal is registered as equipment of the zone the branch serves.
pub fn add_terminal_to_node(model: &mut Model, terminal: Handle, node: Node) -> bool {
    let Some(plan) = plan_splice(model, terminal, node) else {
        return false;
    };

    let splice = Node::new(model);
    let wired: ModelResult<()> = (|| {
        model.connect(
            plan.splitter.peer,
            plan.splitter.peer_port,
            splice.handle(),
            Node::INLET_PORT,
        )?;
        model.connect(
            splice.handle(),
            Node::OUTLET_PORT,
            terminal,
            TERMINAL_INLET_PORT,
        )?;
        model.connect(terminal, TERMINAL_OUTLET_PORT, node.handle(), Node::INLET_PORT)
    })();
    if let Err(err) = wired {
        error!(%err, "terminal splice failed after preconditions held; restoring branch");
        model.disconnect_all(terminal);
        model.remove_object(splice.handle());
        if let Err(err) = model.connect(
            plan.splitter.peer,
            plan.splitter.peer_port,
            node.handle(),
            Node::INLET_PORT,
        ) {
            error!(%err, "could not restore splitter branch");
        }
        return false;
    }

    if let Some(zone) = plan.zone {
        zone.add_equipment(model, terminal);
    }
    true
}

/// Detach a one-inlet/one-outlet terminal from its branch and remove it.
///
/// If the terminal is fed by a node, that node's upstream peer is wired
/// straight to the terminal's downstream peer and the node is removed.
/// Otherwise both terminal ports are simply disconnected.
pub fn remove_air_terminal(model: &mut Model, terminal: Handle) -> Vec<Handle> {
    let mut removed = Vec::new();
    if !model.contains(terminal) {
        return removed;
    }

    let upstream = model.peer(terminal, TERMINAL_INLET_PORT);
    let downstream = model.peer(terminal, TERMINAL_OUTLET_PORT);
    let splice = match (upstream, downstream) {
        (Some(up), Some(down)) if model.kind(up.peer) == Some(ObjectKind::Node) => model
            .peer(up.peer, Node::INLET_PORT)
            .map(|source| (up.peer, source, down)),
        _ => None,
    };
    // Only unsplice when the bypass edge is known to be valid; otherwise the
    // node stays and the branch is left open at the terminal only.
    let splice = splice.filter(|(_, source, target)| {
        match model.check_connection(source.peer, source.peer_port, target.peer, target.peer_port) {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "cannot reconnect around terminal; disconnecting only");
                false
            }
        }
    });

    model.disconnect(terminal, TERMINAL_INLET_PORT);
    model.disconnect(terminal, TERMINAL_OUTLET_PORT);
    if let Some((node, source, target)) = splice {
        if let Err(err) = model.connect(source.peer, source.peer_port, target.peer, target.peer_port)
        {
            error!(%err, "failed to reconnect around removed terminal");
        } else {
            removed.extend(model.remove_object(node));
        }
    }

    for zone in model.thermal_zones() {
        zone.remove_equipment(model, terminal);
    }

    removed.extend(model.remove_object(terminal));
    removed
}
