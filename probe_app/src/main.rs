//! Collision probe
//!
//! Loads a probe scene and collider settings, builds the world collider and
//! logs what every probe ray and probe shape touches.
//!
//! ```text
//! collision_probe [scene.ron] [settings.toml]
//! ```

mod probe;

use probe::ProbeScene;
use std::path::PathBuf;
use world_collision::prelude::*;

const DEFAULT_SCENE: &str = "resources/scenes/two_chunks.ron";
const DEFAULT_SETTINGS: &str = "resources/config/collider.toml";

fn resource(arg: Option<String>, default: &str) -> PathBuf {
    arg.map_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(default), PathBuf::from)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Info by default; RUST_LOG still overrides
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let scene_path = resource(args.next(), DEFAULT_SCENE);
    let settings_path = resource(args.next(), DEFAULT_SETTINGS);

    let settings = if settings_path.exists() {
        ColliderSettings::load_from_file(&settings_path)?
    } else {
        log::warn!("{} not found, using default settings", settings_path.display());
        ColliderSettings::default()
    };
    settings.validate()?;

    log::info!("Loading probe scene {}", scene_path.display());
    let scene = ProbeScene::load(&scene_path)?;
    let world = WorldCollider::build(&scene.world, &settings)?;
    log::info!(
        "World bounds {:?} .. {:?}",
        world.bounds().min.as_slice(),
        world.bounds().max.as_slice()
    );

    for probe in &scene.rays {
        let ray = probe.ray();
        let hit = match probe.max_length {
            Some(max) => world.cast_with_max(&ray, max),
            None => world.cast(&ray),
        };
        match hit {
            Some(hit) => log::info!(
                "ray {}: hit {:?} at distance {:.3}, point {:?}, normal {:?}",
                probe.name,
                hit.triangle,
                hit.distance,
                hit.point.as_slice(),
                hit.normal.as_slice()
            ),
            None => log::info!("ray {}: no hit", probe.name),
        }
    }

    for probe in &scene.shapes {
        let shape = Shape::from(&probe.shape);
        let hits: Vec<_> = world.intersections(&shape).collect();
        log::info!("shape {} ({}): {} triangles", probe.name, shape.kind(), hits.len());
        for hit in &hits {
            log::debug!("  {:?} closest point {:?}", hit.triangle_id, hit.point.as_slice());
        }
    }

    Ok(())
}
