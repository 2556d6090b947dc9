//! End-to-end: a full sky built on the headless scene, animated and torn down.

use nightsky_config::{Config, ConfigError};
use nightsky_render::{Camera, HeadlessScene, SceneHost};
use nightsky_space::{Animate, NightSky};

fn small_config(seed: u64) -> Config {
    let mut config = Config::default();
    config.stars.count = 100;
    config.stars.radius = 50.0;
    config.nebula.particles_per_blob = 100;
    config.simulation.seed = Some(seed);
    config
}

#[test]
fn test_star_field_population() {
    let mut scene = HeadlessScene::new(0x000011);
    let sky = NightSky::new(&small_config(1), &mut scene).unwrap();
    let stats = sky.stats();
    assert_eq!(stats.stars, 100);
    assert_eq!(stats.bright_stars, 20);
    assert_eq!(stats.nebula_particles, 500);
    for star in sky.stars().stars() {
        assert!(star.position.length() <= 50.0 + 1e-4);
    }
}

#[test]
fn test_same_seed_builds_same_sky() {
    let mut scene_a = HeadlessScene::new(0);
    let mut scene_b = HeadlessScene::new(0);
    let a = NightSky::new(&small_config(77), &mut scene_a).unwrap();
    let b = NightSky::new(&small_config(77), &mut scene_b).unwrap();
    assert_eq!(a.seed(), 77);
    assert_eq!(a.stars().stars(), b.stars().stars());
    assert_eq!(a.nebula().blobs(), b.nebula().blobs());
}

#[test]
fn test_different_seeds_build_different_skies() {
    let mut scene_a = HeadlessScene::new(0);
    let mut scene_b = HeadlessScene::new(0);
    let a = NightSky::new(&small_config(1), &mut scene_a).unwrap();
    let b = NightSky::new(&small_config(2), &mut scene_b).unwrap();
    assert_ne!(a.stars().stars(), b.stars().stars());
}

#[test]
fn test_animation_advances_every_field() {
    let mut scene = HeadlessScene::new(0);
    let mut config = small_config(5);
    config.shooting_stars.spawn_probability = 1.0;
    let mut sky = NightSky::new(&config, &mut scene).unwrap();

    for _ in 0..1000 {
        sky.animate(&mut scene);
    }

    assert_eq!(sky.frame(), 1000);
    assert!((sky.nebula().rotation() - 2.0).abs() < 1e-3);
    assert!((sky.stars().rotation() - 0.5).abs() < 1e-3);
    let stats = sky.stats();
    assert_eq!(stats.shooting_stars_spawned, 1000);
    assert_eq!(
        stats.shooting_stars_spawned - stats.shooting_stars_expired,
        stats.live_shooting_stars as u64
    );
}

#[test]
fn test_render_sees_the_scene() {
    let mut scene = HeadlessScene::new(0x000011);
    let mut config = small_config(9);
    config.shooting_stars.spawn_probability = 1.0;
    let mut sky = NightSky::new(&config, &mut scene).unwrap();
    sky.animate(&mut scene);

    let stats = scene.render(&Camera::default());
    assert_eq!(stats.points, 600);
    assert!(stats.points_in_view > 0);
    assert!(stats.points_in_view <= stats.points);
    assert_eq!(stats.spheres, 20);
    assert_eq!(stats.lines, 1);
}

#[test]
fn test_teardown_leaves_empty_scene() {
    let mut scene = HeadlessScene::new(0);
    let mut sky = NightSky::new(&small_config(3), &mut scene).unwrap();
    for _ in 0..500 {
        sky.animate(&mut scene);
    }
    sky.teardown(&mut scene);
    assert_eq!(scene.live_objects(), 0);
    assert!(scene.children(None).is_empty());
    assert_eq!(scene.texture_count(), 0, "sprite texture still held after teardown");
}

#[test]
fn test_invalid_config_registers_nothing() {
    let mut scene = HeadlessScene::new(0);
    let mut config = small_config(4);
    config.nebula.base_size = 0.0;
    let result = NightSky::new(&config, &mut scene);
    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    assert_eq!(scene.live_objects(), 0);
}

#[test]
fn test_scene_host_is_object_safe() {
    let mut scene = HeadlessScene::new(0);
    let host: &mut dyn SceneHost = &mut scene;
    let sky = NightSky::new(&small_config(6), host).unwrap();
    assert_eq!(sky.frame(), 0);
}
