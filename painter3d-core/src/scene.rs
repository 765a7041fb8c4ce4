/// Model table, entity store and per-frame world expansion
use log::trace;

use crate::error::{SceneError, Slot};
use crate::geometry::{Model, Triangle, Vertex};
use crate::transform::{Placement, PlacementDelta};

/// Stable index of a model in the scene's model table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId(pub usize);

/// Stable index of an entity in the scene's entity store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub usize);

/// A placed instance of a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub model: ModelId,
    pub placement: Placement,
}

/// Transform a model-space vertex into world space using the entity's placement
pub fn apply_entity_transform(entity: &Entity, vertex: &Vertex) -> Vertex {
    entity.placement.apply(vertex)
}

/// Flattened world geometry for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldBuffers {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl WorldBuffers {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
    }

    /// Check every triangle addresses a vertex in this buffer
    pub fn validate(&self) -> Result<(), SceneError> {
        validate_triangles(&self.triangles, self.vertices.len(), None)
    }
}

fn validate_triangles(
    triangles: &[Triangle],
    vertex_count: usize,
    model: Option<usize>,
) -> Result<(), SceneError> {
    for (triangle, tri) in triangles.iter().enumerate() {
        if let Some(index) = tri.invalid_index(vertex_count) {
            return Err(SceneError::out_of_range(
                Slot::TriangleVertex { model, triangle },
                index,
                vertex_count,
            ));
        }
    }
    Ok(())
}

/// Append-and-update store of models and the entities placing them.
///
/// Nothing is ever removed, so ids handed out stay valid for the life of the
/// scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    models: Vec<Model>,
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model(&mut self, model: Model) -> ModelId {
        self.models.push(model);
        ModelId(self.models.len() - 1)
    }

    /// Replace a model's buffers wholesale (used for animated geometry)
    pub fn set_model(&mut self, id: ModelId, model: Model) -> Result<(), SceneError> {
        let len = self.models.len();
        let slot = self
            .models
            .get_mut(id.0)
            .ok_or_else(|| SceneError::out_of_range(Slot::Model, id.0, len))?;
        *slot = model;
        Ok(())
    }

    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id.0)
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn add_entity(
        &mut self,
        model: ModelId,
        placement: Placement,
    ) -> Result<EntityId, SceneError> {
        if model.0 >= self.models.len() {
            return Err(SceneError::out_of_range(Slot::Model, model.0, self.models.len()));
        }
        self.entities.push(Entity { model, placement });
        Ok(EntityId(self.entities.len() - 1))
    }

    /// Absolute overwrite of the entity's placement
    pub fn set_entity(&mut self, id: EntityId, placement: Placement) -> Result<(), SceneError> {
        self.entity_mut(id)?.placement = placement;
        Ok(())
    }

    /// Add `delta` to the entity's placement in place
    pub fn change_entity(
        &mut self,
        id: EntityId,
        delta: &PlacementDelta,
    ) -> Result<(), SceneError> {
        self.entity_mut(id)?.placement.apply_delta(delta);
        Ok(())
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, SceneError> {
        let len = self.entities.len();
        self.entities
            .get_mut(id.0)
            .ok_or_else(|| SceneError::out_of_range(Slot::Entity, id.0, len))
    }

    /// Expand every entity, in store order, into `world`.
    ///
    /// `world` is cleared first. Triangle indices are rebased by the number of
    /// world vertices emitted by earlier entities and checked against their
    /// model before any vertex is read.
    pub fn expand_into(&self, world: &mut WorldBuffers) -> Result<(), SceneError> {
        world.clear();

        for entity in &self.entities {
            let model = self.model(entity.model).ok_or_else(|| {
                SceneError::out_of_range(Slot::Model, entity.model.0, self.models.len())
            })?;
            validate_triangles(&model.triangles, model.vertices.len(), Some(entity.model.0))?;

            let offset = world.vertices.len();
            world
                .vertices
                .extend(model.vertices.iter().map(|v| apply_entity_transform(entity, v)));
            world
                .triangles
                .extend(model.triangles.iter().map(|t| t.offset(offset)));
        }

        trace!(
            "expanded {} entities into {} vertices, {} triangles",
            self.entities.len(),
            world.vertices.len(),
            world.triangles.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::Vec3;
    use crate::transform::RotationState;

    fn strip() -> Model {
        Model::new(
            vec![
                Vertex::new(0.0, 0.0, 0.0),
                Vertex::new(1.0, 0.0, 0.0),
                Vertex::new(0.0, 1.0, 0.0),
                Vertex::new(1.0, 1.0, 0.0),
            ],
            vec![Triangle::new(0, 1, 2, "#111"), Triangle::new(1, 3, 2, "#222")],
        )
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut scene = Scene::new();
        let a = scene.add_model(strip());
        let b = scene.add_model(Model::cube(1.0));
        assert_eq!((a, b), (ModelId(0), ModelId(1)));

        let e0 = scene.add_entity(b, Placement::default()).unwrap();
        let e1 = scene.add_entity(a, Placement::at(1.0, 0.0, 0.0)).unwrap();
        assert_eq!((e0, e1), (EntityId(0), EntityId(1)));
    }

    #[test]
    fn test_add_entity_with_unknown_model() {
        let mut scene = Scene::new();
        let err = scene.add_entity(ModelId(3), Placement::default()).unwrap_err();
        assert_eq!(
            err,
            SceneError::IndexOutOfRange {
                slot: Slot::Model,
                index: 3,
                len: 0
            }
        );
    }

    #[test]
    fn test_mutators_report_out_of_range() {
        let mut scene = Scene::new();
        let model = scene.add_model(strip());
        scene.add_entity(model, Placement::default()).unwrap();

        assert!(scene.set_model(ModelId(1), strip()).is_err());
        assert!(matches!(
            scene.set_entity(EntityId(1), Placement::default()),
            Err(SceneError::IndexOutOfRange { slot: Slot::Entity, index: 1, len: 1 })
        ));
        assert!(scene
            .change_entity(EntityId(5), &PlacementDelta::default())
            .is_err());
    }

    #[test]
    fn test_set_model_replaces_buffers() {
        let mut scene = Scene::new();
        let model = scene.add_model(strip());
        scene.set_model(model, Model::cube(2.0)).unwrap();
        assert_eq!(scene.model(model), Some(&Model::cube(2.0)));
    }

    #[test]
    fn test_change_entity_defaults_keep_rotation_and_scale() {
        let mut scene = Scene::new();
        let model = scene.add_model(strip());
        let placement = Placement::at(1.0, 2.0, 3.0)
            .with_rotation(0.1, 0.2, 0.3)
            .with_scale(4.0, 5.0, 6.0);
        let id = scene.add_entity(model, placement).unwrap();

        scene
            .change_entity(id, &PlacementDelta::translate(1.0, -1.0, 0.5))
            .unwrap();
        let entity = scene.entity(id).unwrap();
        assert_eq!(entity.placement.position, Vec3::new(2.0, 1.0, 3.5));
        assert_eq!(entity.placement.rotation, placement.rotation);
        assert_eq!(entity.placement.scale, placement.scale);
    }

    #[test]
    fn test_set_entity_defaults_reset_rotation_and_scale() {
        let mut scene = Scene::new();
        let model = scene.add_model(strip());
        let id = scene
            .add_entity(
                model,
                Placement::at(1.0, 2.0, 3.0)
                    .with_rotation(0.1, 0.2, 0.3)
                    .with_scale(4.0, 5.0, 6.0),
            )
            .unwrap();

        scene.set_entity(id, Placement::at(7.0, 8.0, 9.0)).unwrap();
        let placement = scene.entity(id).unwrap().placement;
        assert_eq!(placement.position, Vec3::new(7.0, 8.0, 9.0));
        assert_eq!(placement.rotation, RotationState::zero());
        assert_eq!(placement.scale, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_expansion_counts_and_offsets() {
        let mut scene = Scene::new();
        let small = scene.add_model(strip());
        let cube = scene.add_model(Model::cube(1.0));
        scene.add_entity(cube, Placement::default()).unwrap();
        scene.add_entity(small, Placement::at(5.0, 0.0, 0.0)).unwrap();
        scene.add_entity(cube, Placement::at(0.0, 5.0, 0.0)).unwrap();

        let mut world = WorldBuffers::default();
        scene.expand_into(&mut world).unwrap();

        assert_eq!(world.vertices.len(), 8 + 4 + 8);
        assert_eq!(world.triangles.len(), 12 + 2 + 12);
        assert!(world
            .triangles
            .iter()
            .all(|t| t.indices.iter().all(|&i| i < world.vertices.len())));
        // second entity starts after the first cube's eight vertices
        assert_eq!(world.triangles[12].indices, [8, 9, 10]);
        assert_eq!(world.triangles[12].color.as_str(), "#111");
        assert_eq!(world.vertices[9], Vertex::new(6.0, 0.0, 0.0));
    }

    #[test]
    fn test_expansion_resets_buffers() {
        let mut scene = Scene::new();
        let model = scene.add_model(strip());
        scene.add_entity(model, Placement::default()).unwrap();

        let mut world = WorldBuffers::default();
        scene.expand_into(&mut world).unwrap();
        scene.expand_into(&mut world).unwrap();
        assert_eq!(world.vertices.len(), 4);
        assert_eq!(world.triangles.len(), 2);
    }

    #[test]
    fn test_expansion_rejects_bad_triangle() {
        let mut scene = Scene::new();
        let model = scene.add_model(strip());
        scene.add_entity(model, Placement::default()).unwrap();
        scene
            .set_model(
                model,
                Model::new(
                    vec![Vertex::new(0.0, 0.0, 0.0)],
                    vec![Triangle::new(0, 0, 4, "#000")],
                ),
            )
            .unwrap();

        let mut world = WorldBuffers::default();
        let err = scene.expand_into(&mut world).unwrap_err();
        assert_eq!(
            err,
            SceneError::IndexOutOfRange {
                slot: Slot::TriangleVertex {
                    model: Some(0),
                    triangle: 0
                },
                index: 4,
                len: 1
            }
        );
    }
}
