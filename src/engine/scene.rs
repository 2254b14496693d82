//! In-memory scene graph
//!
//! Records what the adventure core asks the renderer to show. Used by the
//! native runner, the wasm bridge and tests; a real renderer implements
//! `SceneGraph` on its own node tree.

use std::collections::BTreeMap;

use super::{MeshHandle, Pose, SceneGraph};
use crate::mesh::{Material, MeshData};

/// A node in the headless scene
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub material: Material,
    pub transform: Pose,
    pub parent: Option<MeshHandle>,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessScene {
    nodes: BTreeMap<MeshHandle, SceneNode>,
    next_id: u32,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, mesh: MeshHandle) -> Option<&SceneNode> {
        self.nodes.get(&mesh)
    }
}

impl SceneGraph for HeadlessScene {
    fn create_mesh(&mut self, name: &str, data: MeshData, material: Material) -> MeshHandle {
        self.next_id += 1;
        let handle = MeshHandle(self.next_id);
        self.nodes.insert(
            handle,
            SceneNode {
                name: name.to_string(),
                vertex_count: data.vertices.len(),
                triangle_count: data.triangle_count(),
                material,
                transform: Pose::IDENTITY,
                parent: None,
            },
        );
        handle
    }

    fn set_parent(&mut self, mesh: MeshHandle, parent: Option<MeshHandle>) {
        if let Some(p) = parent {
            if p == mesh || !self.nodes.contains_key(&p) {
                return;
            }
        }
        if let Some(node) = self.nodes.get_mut(&mesh) {
            node.parent = parent;
        }
    }

    fn set_transform(&mut self, mesh: MeshHandle, pose: Pose) {
        if let Some(node) = self.nodes.get_mut(&mesh) {
            node.transform = pose;
        }
    }

    fn set_color(&mut self, mesh: MeshHandle, color: [f32; 4]) {
        if let Some(node) = self.nodes.get_mut(&mesh) {
            node.material.color = color;
        }
    }

    fn dispose(&mut self, mesh: MeshHandle) -> bool {
        if self.nodes.remove(&mesh).is_none() {
            return false;
        }
        let children: Vec<MeshHandle> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.parent == Some(mesh))
            .map(|(h, _)| *h)
            .collect();
        for child in children {
            self.dispose(child);
        }
        true
    }

    fn contains(&self, mesh: MeshHandle) -> bool {
        self.nodes.contains_key(&mesh)
    }

    fn mesh_count(&self) -> usize {
        self.nodes.len()
    }
}
