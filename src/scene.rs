//! Scene bridge
//!
//! The renderer and asset loader are external collaborators reached through
//! `SceneBackend`. `SceneSync` mirrors the simulation into whatever backend
//! the host provides; `HeadlessScene` is an in-memory backend for the native
//! demo and tests.

use std::collections::{HashMap, HashSet};
use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};

use crate::config::Config;
use crate::error::{GameError, Result};
use crate::sim::{Aabb, GameState, ModelAvailability, ObstacleKind, SceneryLayout};

pub const ROAD_MODEL: &str = "models/Road Piece Straight.glb";
pub const CAR_MODEL: &str = "models/Car Hatchback.glb";
pub const FENCE_MODEL: &str = "models/Fence Long.glb";
pub const SLOW_OBSTACLE_MODEL: &str = "models/Traffic Cone.glb";
pub const DEATH_OBSTACLE_MODEL: &str = "models/Rock Large.glb";
pub const PICKUP_MODEL: &str = "models/Stopwatch.glb";

/// Height pickups float above the road
const PICKUP_HOVER: f32 = 0.5;

/// A loaded model template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelHandle(pub u32);

/// A live node in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Flat ground surfaces generated by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Sand,
    Water,
}

/// World transform of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Placement {
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Asset loading and scene graph operations provided by the host
pub trait SceneBackend {
    /// Load a model template. Decoding happens on the host side.
    fn load_model(&mut self, path: &str) -> Result<ModelHandle>;
    /// Create a node showing a copy of `model`
    fn instantiate(&mut self, model: ModelHandle) -> NodeId;
    /// Create a flat ground plane of the given size (x by z)
    fn create_plane(&mut self, surface: Surface, width: f32, length: f32) -> NodeId;
    fn place_at(&mut self, node: NodeId, placement: Placement);
    fn remove(&mut self, node: NodeId);
    /// Set the camera's world-to-view matrix
    fn set_view(&mut self, view: Mat4);
    /// World-space box of a node's current geometry
    fn bounding_box_of(&self, node: NodeId) -> Option<Aabb>;
}

/// Loaded model templates. Road and car are required; the rest are optional
/// and their absence only suppresses what uses them.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneAssets {
    pub road: ModelHandle,
    pub car: ModelHandle,
    pub fence: Option<ModelHandle>,
    pub slow_obstacle: Option<ModelHandle>,
    pub death_obstacle: Option<ModelHandle>,
    pub pickup: Option<ModelHandle>,
}

fn load_optional<B: SceneBackend + ?Sized>(backend: &mut B, path: &str) -> Option<ModelHandle> {
    match backend.load_model(path) {
        Ok(model) => Some(model),
        Err(e) => {
            log::warn!("Optional asset unavailable: {}", e);
            None
        }
    }
}

impl SceneAssets {
    pub fn load<B: SceneBackend + ?Sized>(backend: &mut B) -> Result<Self> {
        let road = backend.load_model(ROAD_MODEL)?;
        let car = backend.load_model(CAR_MODEL)?;
        let assets = Self {
            road,
            car,
            fence: load_optional(backend, FENCE_MODEL),
            slow_obstacle: load_optional(backend, SLOW_OBSTACLE_MODEL),
            death_obstacle: load_optional(backend, DEATH_OBSTACLE_MODEL),
            pickup: load_optional(backend, PICKUP_MODEL),
        };
        log::info!("Assets loaded: {:?}", assets.availability());
        Ok(assets)
    }

    pub fn availability(&self) -> ModelAvailability {
        ModelAvailability {
            slow_obstacle: self.slow_obstacle.is_some(),
            death_obstacle: self.death_obstacle.is_some(),
            pickup: self.pickup.is_some(),
        }
    }

    fn obstacle(&self, kind: ObstacleKind) -> Option<ModelHandle> {
        match kind {
            ObstacleKind::Slow => self.slow_obstacle,
            ObstacleKind::Death => self.death_obstacle,
        }
    }
}

/// Nodes for one road piece and its beach strip
#[derive(Debug, Clone)]
struct SegmentNodes {
    road: NodeId,
    /// Right, left
    sand: [NodeId; 2],
    water: [NodeId; 2],
    fences: Option<[NodeId; 2]>,
}

/// Keeps backend nodes in step with the simulation
#[derive(Debug)]
pub struct SceneSync {
    assets: SceneAssets,
    layout: SceneryLayout,
    road_width: f32,
    car: NodeId,
    segments: Vec<SegmentNodes>,
    obstacles: HashMap<u32, NodeId>,
    pickups: HashMap<u32, NodeId>,
    /// `GameState::runs` the entity maps belong to
    run: u64,
}

impl SceneSync {
    /// Create the car and one node set per world segment
    pub fn new<B: SceneBackend + ?Sized>(
        backend: &mut B,
        assets: SceneAssets,
        config: &Config,
    ) -> Self {
        let world = &config.world;
        let layout = SceneryLayout::new(world);
        let car = backend.instantiate(assets.car);
        let segments = (0..world.segment_count)
            .map(|_| SegmentNodes {
                road: backend.instantiate(assets.road),
                sand: [
                    backend.create_plane(Surface::Sand, layout.sand_width, world.segment_length),
                    backend.create_plane(Surface::Sand, layout.sand_width, world.segment_length),
                ],
                water: [
                    backend.create_plane(Surface::Water, layout.water_width, world.segment_length),
                    backend.create_plane(Surface::Water, layout.water_width, world.segment_length),
                ],
                fences: assets
                    .fence
                    .map(|fence| [backend.instantiate(fence), backend.instantiate(fence)]),
            })
            .collect();
        Self {
            assets,
            layout,
            road_width: world.road_width,
            car,
            segments,
            obstacles: HashMap::new(),
            pickups: HashMap::new(),
            run: 0,
        }
    }

    pub fn car_node(&self) -> NodeId {
        self.car
    }

    pub fn obstacle_node(&self, id: u32) -> Option<NodeId> {
        self.obstacles.get(&id).copied()
    }

    pub fn pickup_node(&self, id: u32) -> Option<NodeId> {
        self.pickups.get(&id).copied()
    }

    /// Place every node for the current frame, creating and removing entity
    /// nodes as the simulation spawns and drops them
    pub fn sync<B: SceneBackend + ?Sized>(&mut self, backend: &mut B, state: &GameState) {
        // Entity ids start over on restart, so old nodes can't be matched by id
        if state.runs != self.run {
            for (_, node) in self.obstacles.drain().chain(self.pickups.drain()) {
                backend.remove(node);
            }
            self.run = state.runs;
        }

        backend.set_view(state.camera.view_matrix());
        backend.place_at(
            self.car,
            Placement::from_matrix(state.car.transform(&state.config.car)),
        );

        let flat = Quat::from_rotation_x(-FRAC_PI_2);
        let layout = self.layout;
        for (nodes, segment) in self.segments.iter().zip(state.world.segments()) {
            let z = segment.z;
            backend.place_at(
                nodes.road,
                Placement::at(Vec3::new(0.0, 0.0, z))
                    .with_scale(Vec3::new(self.road_width, 1.0, 1.0)),
            );
            for (side, sign) in [1.0f32, -1.0].into_iter().enumerate() {
                backend.place_at(
                    nodes.sand[side],
                    Placement::at(Vec3::new(sign * layout.sand_x, layout.sand_y, z))
                        .with_rotation(flat),
                );
                backend.place_at(
                    nodes.water[side],
                    Placement::at(Vec3::new(sign * layout.water_x, layout.water_y, z))
                        .with_rotation(flat),
                );
                if let Some(fences) = &nodes.fences {
                    backend.place_at(
                        fences[side],
                        Placement::at(Vec3::new(sign * layout.fence_x, layout.fence_y, z))
                            .with_rotation(Quat::from_rotation_y(sign * FRAC_PI_2)),
                    );
                }
            }
        }

        let live: HashSet<u32> = state.obstacles.iter().map(|o| o.id).collect();
        self.obstacles.retain(|id, node| {
            let keep = live.contains(id);
            if !keep {
                backend.remove(*node);
            }
            keep
        });
        for obstacle in &state.obstacles {
            let node = match self.obstacles.get(&obstacle.id).copied() {
                Some(node) => node,
                None => {
                    let Some(model) = self.assets.obstacle(obstacle.kind) else {
                        continue;
                    };
                    let node = backend.instantiate(model);
                    self.obstacles.insert(obstacle.id, node);
                    node
                }
            };
            backend.place_at(
                node,
                Placement::at(Vec3::new(obstacle.x, 0.0, obstacle.z))
                    .with_rotation(Quat::from_rotation_y(obstacle.yaw))
                    .with_scale(Vec3::splat(obstacle.scale)),
            );
        }

        let live: HashSet<u32> = state.pickups.iter().map(|p| p.id).collect();
        self.pickups.retain(|id, node| {
            let keep = live.contains(id);
            if !keep {
                backend.remove(*node);
            }
            keep
        });
        for pickup in &state.pickups {
            let node = match self.pickups.get(&pickup.id).copied() {
                Some(node) => node,
                None => {
                    let Some(model) = self.assets.pickup else {
                        continue;
                    };
                    let node = backend.instantiate(model);
                    self.pickups.insert(pickup.id, node);
                    node
                }
            };
            backend.place_at(node, Placement::at(Vec3::new(pickup.x, PICKUP_HOVER, pickup.z)));
        }
    }
}

/// What a headless node is showing
#[derive(Debug, Clone, Copy, PartialEq)]
enum NodeSource {
    Model(ModelHandle),
    Plane { width: f32, length: f32 },
}

#[derive(Debug, Clone)]
struct HeadlessNode {
    source: NodeSource,
    placement: Placement,
}

/// In-memory scene: remembers nodes and transforms, renders nothing
#[derive(Debug, Default)]
pub struct HeadlessScene {
    models: Vec<(String, Vec3)>,
    nodes: HashMap<NodeId, HeadlessNode>,
    missing: HashSet<String>,
    extents: HashMap<String, Vec3>,
    view: Option<Mat4>,
    next_node: u32,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loading `path` fail, as a missing file would
    pub fn with_missing(mut self, path: &str) -> Self {
        self.missing.insert(path.to_string());
        self
    }

    /// Local half extents reported for a model (default: unit cube)
    pub fn with_model_extents(mut self, path: &str, half_extents: Vec3) -> Self {
        self.extents.insert(path.to_string(), half_extents);
        self
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn placement(&self, node: NodeId) -> Option<Placement> {
        self.nodes.get(&node).map(|n| n.placement)
    }

    /// Last view matrix set by the host
    pub fn view(&self) -> Option<Mat4> {
        self.view
    }

    fn local_half_extents(&self, source: NodeSource) -> Vec3 {
        match source {
            NodeSource::Model(ModelHandle(i)) => self
                .models
                .get(i as usize)
                .map(|(_, half)| *half)
                .unwrap_or(Vec3::splat(0.5)),
            // Planes are authored in XY and laid flat by their placement
            NodeSource::Plane { width, length } => Vec3::new(width / 2.0, length / 2.0, 0.0),
        }
    }
}

impl SceneBackend for HeadlessScene {
    fn load_model(&mut self, path: &str) -> Result<ModelHandle> {
        if self.missing.contains(path) {
            return Err(GameError::AssetLoad {
                path: path.to_string(),
                reason: "file not found".to_string(),
            });
        }
        let half = self.extents.get(path).copied().unwrap_or(Vec3::splat(0.5));
        self.models.push((path.to_string(), half));
        log::debug!("Loaded model {}", path);
        Ok(ModelHandle(self.models.len() as u32 - 1))
    }

    fn instantiate(&mut self, model: ModelHandle) -> NodeId {
        self.insert(NodeSource::Model(model))
    }

    fn create_plane(&mut self, _surface: Surface, width: f32, length: f32) -> NodeId {
        self.insert(NodeSource::Plane { width, length })
    }

    fn place_at(&mut self, node: NodeId, placement: Placement) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.placement = placement;
        }
    }

    fn remove(&mut self, node: NodeId) {
        self.nodes.remove(&node);
    }

    fn set_view(&mut self, view: Mat4) {
        self.view = Some(view);
    }

    fn bounding_box_of(&self, node: NodeId) -> Option<Aabb> {
        let n = self.nodes.get(&node)?;
        let half = self.local_half_extents(n.source);
        let matrix = n.placement.matrix();
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { -half.x } else { half.x },
                if i & 2 == 0 { -half.y } else { half.y },
                if i & 4 == 0 { -half.z } else { half.z },
            );
            let world = matrix.transform_point3(corner);
            min = min.min(world);
            max = max.max(world);
        }
        Some(Aabb { min, max })
    }
}

impl HeadlessScene {
    fn insert(&mut self, source: NodeSource) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            HeadlessNode {
                source,
                placement: Placement::at(Vec3::ZERO),
            },
        );
        id
    }
}
