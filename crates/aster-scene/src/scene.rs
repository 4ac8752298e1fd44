use std::collections::HashMap;
use std::sync::Arc;

use aster_graph::GpuMesh;

use crate::error::SceneError;
use crate::item::GameItem;
use crate::lighting::SceneLight;

/// Items sharing one mesh, drawn together so the geometry is bound once.
#[derive(Debug)]
pub struct MeshGroup<M> {
    mesh: Arc<M>,
    items: Vec<GameItem<M>>,
}

impl<M> MeshGroup<M> {
    pub fn mesh(&self) -> &Arc<M> {
        &self.mesh
    }

    pub fn items(&self) -> &[GameItem<M>] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [GameItem<M>] {
        &mut self.items
    }
}

/// The world as the renderer sees it: items grouped by mesh, an optional sky
/// dome and the lighting environment. Grouping is by handle identity, so two
/// items constructed from the same `Arc` land in the same group.
pub struct Scene<M> {
    groups: Vec<MeshGroup<M>>,
    group_index: HashMap<*const M, usize>,
    skybox: Option<GameItem<M>>,
    light: SceneLight,
    max_point_lights: usize,
    max_spot_lights: usize,
}

impl<M> Scene<M> {
    pub fn new(max_point_lights: usize, max_spot_lights: usize) -> Self {
        Self {
            groups: Vec::new(),
            group_index: HashMap::new(),
            skybox: None,
            light: SceneLight::default(),
            max_point_lights,
            max_spot_lights,
        }
    }

    pub fn add_item(&mut self, item: GameItem<M>) {
        let key = Arc::as_ptr(item.mesh());
        match self.group_index.get(&key) {
            Some(&slot) => self.groups[slot].items.push(item),
            None => {
                self.group_index.insert(key, self.groups.len());
                self.groups.push(MeshGroup {
                    mesh: Arc::clone(item.mesh()),
                    items: vec![item],
                });
            }
        }
    }

    pub fn set_items(&mut self, items: impl IntoIterator<Item = GameItem<M>>) {
        self.groups.clear();
        self.group_index.clear();
        for item in items {
            self.add_item(item);
        }
    }

    pub fn groups(&self) -> &[MeshGroup<M>] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [MeshGroup<M>] {
        &mut self.groups
    }

    pub fn set_skybox(&mut self, skybox: Option<GameItem<M>>) {
        self.skybox = skybox;
    }

    pub fn skybox(&self) -> Option<&GameItem<M>> {
        self.skybox.as_ref()
    }

    pub fn skybox_mut(&mut self) -> Option<&mut GameItem<M>> {
        self.skybox.as_mut()
    }

    /// Installs the lighting environment after checking it against the
    /// limits this scene was created with.
    pub fn set_light(&mut self, light: SceneLight) -> Result<(), SceneError> {
        light.validate(self.max_point_lights, self.max_spot_lights)?;
        self.light = light;
        Ok(())
    }

    pub fn light(&self) -> &SceneLight {
        &self.light
    }

    /// Mutable access bypasses the limit check; lights pushed past shader
    /// capacity through here are ignored at upload.
    pub fn light_mut(&mut self) -> &mut SceneLight {
        &mut self.light
    }

    /// Visits every distinct mesh exactly once, including the skybox mesh
    /// when it is not already part of a group.
    pub fn visit_distinct_meshes(&self, mut visit: impl FnMut(&Arc<M>)) {
        for group in &self.groups {
            visit(&group.mesh);
        }
        if let Some(skybox) = &self.skybox {
            let key = Arc::as_ptr(skybox.mesh());
            if !self.group_index.contains_key(&key) {
                visit(skybox.mesh());
            }
        }
    }
}

impl Scene<GpuMesh> {
    /// Releases every distinct mesh and texture once. Textures shared across
    /// meshes (atlases, tiled surfaces) are deduplicated by handle identity.
    pub fn release_gpu(&self) {
        let mut released_textures: Vec<*const aster_graph::GpuTexture> = Vec::new();
        self.visit_distinct_meshes(|mesh| {
            mesh.release_buffers();
            if let Some(texture) = mesh.material().texture() {
                let key = Arc::as_ptr(texture);
                if !released_textures.contains(&key) {
                    released_textures.push(key);
                    texture.release();
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    // A stand-in mesh handle: grouping only cares about identity.
    #[derive(Debug)]
    struct FakeMesh;

    #[test]
    fn items_with_the_same_mesh_share_a_group() {
        let mesh_a = Arc::new(FakeMesh);
        let mesh_b = Arc::new(FakeMesh);

        let mut scene = Scene::new(5, 5);
        scene.add_item(GameItem::new(Arc::clone(&mesh_a)));
        scene.add_item(GameItem::new(Arc::clone(&mesh_b)));
        scene.add_item(GameItem::new(Arc::clone(&mesh_a)));

        assert_eq!(scene.groups().len(), 2);
        let group_a = scene
            .groups()
            .iter()
            .find(|g| Arc::ptr_eq(g.mesh(), &mesh_a))
            .unwrap();
        assert_eq!(group_a.items().len(), 2);
    }

    #[test]
    fn set_items_replaces_previous_grouping() {
        let mesh = Arc::new(FakeMesh);
        let mut scene = Scene::new(5, 5);
        scene.add_item(GameItem::new(Arc::clone(&mesh)));

        let other = Arc::new(FakeMesh);
        scene.set_items(vec![GameItem::new(Arc::clone(&other))]);
        assert_eq!(scene.groups().len(), 1);
        assert!(Arc::ptr_eq(scene.groups()[0].mesh(), &other));
    }

    #[test]
    fn distinct_mesh_visit_includes_skybox_once() {
        let terrain = Arc::new(FakeMesh);
        let dome = Arc::new(FakeMesh);

        let mut scene = Scene::new(5, 5);
        scene.add_item(GameItem::new(Arc::clone(&terrain)));
        scene.set_skybox(Some(GameItem::new(Arc::clone(&dome))));

        let mut count = 0;
        scene.visit_distinct_meshes(|_| count += 1);
        assert_eq!(count, 2);

        // Skybox sharing a grouped mesh is not visited twice.
        scene.set_skybox(Some(GameItem::new(Arc::clone(&terrain))));
        let mut count = 0;
        scene.visit_distinct_meshes(|_| count += 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn oversized_light_environment_rejected() {
        let mut scene: Scene<FakeMesh> = Scene::new(1, 1);
        let mut light = SceneLight::default();
        light.point_lights = vec![
            aster_graph::PointLight::new(Vec3::ONE, Vec3::ZERO, 1.0);
            2
        ];
        assert!(scene.set_light(light).is_err());
    }
}
