use bevy::prelude::*;
use citycrowd::crowd::*;
use citycrowd::systems::*;

const CAPACITY: usize = 8;

fn config() -> CrowdConfig {
    let mut config = CrowdConfig::default();
    config.pool.capacity = CAPACITY;
    config.spawn.seed = Some(21);
    config
}

fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(CrowdSimulationPlugin::new(config()));
    app
}

fn with_crowd(app: &mut App) {
    let config = config();
    let simulation = SimulationState::new(config.clone(), SpawnArea::city_block());
    app.insert_resource(simulation);
    app.insert_resource(InstanceBuffers::new(CAPACITY));
    for slot in 0..CAPACITY {
        app.world_mut().spawn((
            PedestrianInstance { slot },
            Transform::default(),
            AnimationFrame::default(),
        ));
    }
}

fn instance_translations(app: &mut App) -> Vec<(usize, Vec3)> {
    let mut query = app.world_mut().query::<(&PedestrianInstance, &Transform)>();
    let mut out: Vec<(usize, Vec3)> = query
        .iter(app.world())
        .map(|(instance, transform)| (instance.slot, transform.translation))
        .collect();
    out.sort_by_key(|(slot, _)| *slot);
    out
}

#[test]
fn updates_are_skipped_before_the_crowd_exists() {
    let mut app = headless_app();
    app.world_mut().send_event(PopulationRequest { target: 3 });
    app.update();
    app.update();
    assert!(app.world().get_resource::<SimulationState>().is_none());
}

#[test]
fn request_flows_through_to_instance_transforms() {
    let mut app = headless_app();
    with_crowd(&mut app);

    app.world_mut().send_event(PopulationRequest { target: 3 });
    app.update();

    let simulation = app.world().resource::<SimulationState>();
    assert_eq!(simulation.pool.active_slots(), vec![0, 1, 2]);

    let translations = instance_translations(&mut app);
    assert_eq!(translations.len(), CAPACITY);
    for (slot, translation) in translations {
        if slot < 3 {
            assert!(translation.y > SENTINEL_Y);
        } else {
            assert_eq!(translation.y, SENTINEL_Y);
        }
    }
    assert!(!app.world().resource::<InstanceBuffers>().needs_update());
}

#[test]
fn latest_request_wins() {
    let mut app = headless_app();
    with_crowd(&mut app);

    app.world_mut().send_event(PopulationRequest { target: 6 });
    app.world_mut().send_event(PopulationRequest { target: 2 });
    app.update();

    assert_eq!(app.world().resource::<SimulationState>().pool.active_count(), 2);
}

#[test]
fn paused_crowd_still_hides_removed_pedestrians() {
    let mut app = headless_app();
    with_crowd(&mut app);

    app.world_mut().send_event(PopulationRequest { target: 3 });
    app.update();

    app.world_mut().resource_mut::<CrowdMode>().paused = true;
    let elapsed = app.world().resource::<SimulationState>().clock.elapsed();
    app.world_mut().send_event(PopulationRequest { target: 1 });
    app.update();

    let simulation = app.world().resource::<SimulationState>();
    assert_eq!(simulation.pool.active_slots(), vec![0]);
    assert_eq!(simulation.clock.elapsed(), elapsed);

    for (slot, translation) in instance_translations(&mut app) {
        if slot == 0 {
            assert!(translation.y > SENTINEL_Y);
        } else {
            assert_eq!(translation.y, SENTINEL_Y, "slot {} still visible", slot);
        }
    }
}

#[test]
fn paused_crowd_shows_added_pedestrians() {
    let mut app = headless_app();
    with_crowd(&mut app);
    app.world_mut().resource_mut::<CrowdMode>().paused = true;

    app.world_mut().send_event(PopulationRequest { target: 2 });
    app.update();

    let active: Vec<usize> = instance_translations(&mut app)
        .into_iter()
        .filter(|(_, translation)| translation.y > SENTINEL_Y)
        .map(|(slot, _)| slot)
        .collect();
    assert_eq!(active, vec![0, 1]);
}
