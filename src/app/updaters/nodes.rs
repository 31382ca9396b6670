use crate::core::scale::ScaleFactors;
use crate::core::updater::PartUpdater;
use crate::domain::model::{AttachNode, Part};
use crate::utils::error::Result;
use std::collections::HashMap;

/// Moves attach nodes with the geometry and grows their size class,
/// then keeps the part and its surface-attached children in place.
#[derive(Debug, Default)]
pub struct NodesUpdater {
    orig_nodes: HashMap<String, AttachNode>,
}

impl NodesUpdater {
    fn rescale_node(&self, node: &mut AttachNode, scale: &ScaleFactors) {
        // Nodes added at runtime (docking) have no pristine counterpart.
        let Some(orig) = self.orig_nodes.get(&node.id) else {
            return;
        };
        node.position = scale.scale_vector(node.original_position);
        node.size = (orig.size + scale.size_delta().round() as i32).max(0);
        node.breaking_force = orig.breaking_force * scale.absolute_quad();
        node.breaking_torque = orig.breaking_torque * scale.absolute_quad();
    }
}

impl PartUpdater for NodesUpdater {
    fn save_defaults(&mut self, _part: &Part, prototype: &Part) {
        self.orig_nodes = prototype
            .attach_nodes
            .iter()
            .map(|n| (n.id.clone(), n.clone()))
            .collect();
    }

    fn on_rescale(&mut self, part: &mut Part, scale: &ScaleFactors) -> Result<()> {
        for node in &mut part.attach_nodes {
            self.rescale_node(node, scale);
        }

        if let Some(node) = part.srf_attach_node.as_mut() {
            let old_position = node.position;
            node.position = scale.scale_vector(node.original_position);
            // Saved positions are already correct on load.
            if !scale.is_first_application {
                part.position -= node.position - old_position;
            }
        }

        if scale.is_first_application {
            return Ok(());
        }
        for child in &mut part.surface_children {
            let attached = child.attached_position();
            let target = scale.scale_vector_relative(attached);
            child.local_position += target - attached;
        }
        Ok(())
    }
}
