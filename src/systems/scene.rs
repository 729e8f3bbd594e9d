// src/systems/scene.rs - City ground, lighting and the pedestrian instance pool
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use crate::crowd::*;
use crate::systems::camera::OrbitCamera;
use crate::systems::day_night::Sun;
use crate::systems::instancing::{AnimationFrame, PedestrianInstance};

const PEDESTRIAN_RADIUS: f32 = 0.25;
const PEDESTRIAN_HEIGHT: f32 = 1.2;

#[derive(Component)]
pub struct CityGround;

pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<CrowdConfig>,
    day_night: Res<DayNightCycle>,
) {
    let orbit = OrbitCamera::default();
    commands.spawn((Camera3d::default(), orbit.transform(), orbit));

    commands.spawn((
        DirectionalLight {
            illuminance: day_night.sun_illuminance(),
            shadows_enabled: true,
            ..default()
        },
        Transform::IDENTITY.looking_to(-day_night.sun_direction(), Vec3::Y),
        Sun,
    ));

    // Street level around the plaza
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(220.0, 220.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.18, 0.18, 0.2),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.02, 0.0),
    ));

    let area = SpawnArea::city_block();
    commands.spawn((
        Mesh3d(meshes.add(spawn_area_mesh(&area))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.55, 0.53, 0.5),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::default(),
        CityGround,
    ));

    spawn_pedestrian_instances(&mut commands, &mut meshes, &mut materials, &config);

    let mut simulation = SimulationState::new(config.clone(), area);
    let change = simulation.set_population(config.initial_population() as i64);
    info!(
        "Crowd ready: {} of {} pedestrians active",
        change.population(),
        simulation.capacity()
    );

    commands.insert_resource(InstanceBuffers::new(simulation.capacity()));
    commands.insert_resource(simulation);
}

fn spawn_pedestrian_instances(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    config: &CrowdConfig,
) {
    // Capsule origin sits at the feet.
    let body = meshes.add(
        Mesh::from(Capsule3d::new(PEDESTRIAN_RADIUS, PEDESTRIAN_HEIGHT))
            .translated_by(Vec3::Y * (PEDESTRIAN_HEIGHT * 0.5 + PEDESTRIAN_RADIUS)),
    );
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.85, 0.45, 0.3),
        ..default()
    });

    let parked = Transform::from_xyz(0.0, config.pool.sentinel_y, 0.0);
    commands.spawn_batch((0..config.pool.capacity).map(move |slot| {
        (
            Mesh3d(body.clone()),
            MeshMaterial3d(material.clone()),
            parked,
            PedestrianInstance { slot },
            AnimationFrame::default(),
        )
    }));
}

/// Ground mesh for the walkable area, facing +Y.
pub fn spawn_area_mesh(area: &SpawnArea) -> Mesh {
    let mut positions = Vec::with_capacity(area.triangles().len() * 3);
    for triangle in area.triangles() {
        // Counter-clockwise in (x, z) faces down once z maps to world Z, so
        // emit a, c, b.
        for corner in [triangle.a, triangle.c, triangle.b] {
            positions.push([corner.x, 0.0, corner.y]);
        }
    }
    let normals = vec![[0.0, 1.0, 0.0]; positions.len()];
    let indices: Vec<u32> = (0..positions.len() as u32).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
