//! Headless hitscan симуляция
//!
//! Стрелок бьёт по training dummy через ScriptedScene (без physics engine).
//! Прицел дрожит через DeterministicRng: одинаковый seed даёт одинаковый прогон.

use std::path::PathBuf;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use rand::Rng;

use hitscan_simulation::logger::{self, LogLevel};
use hitscan_simulation::{
    create_headless_app, Actor, DamageDealt, DeterministicRng, EntityDied, FireRequest, Health,
    HealthConfig, ImpactCandidate, Loadout, RangedWeapon, ReloadFinished, SceneQueryService,
    ScriptedScene, ShapeKind, ShapeRef, Sockets, WeaponFired,
};

/// Updates на один FireRequest (60Hz → 0.2s между запросами)
const TICKS_PER_SHOT: usize = 12;

const SHOOTER_EYE: Vec3 = Vec3::new(0.0, 150.0, 0.0);
const DUMMY_POSITION: Vec3 = Vec3::new(0.0, 0.0, 1000.0);

#[derive(Parser, Debug)]
#[command(name = "hitscan_simulation")]
#[command(about = "Headless hitscan combat run against a training dummy")]
struct Args {
    /// Seed для aim jitter
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Сколько FireRequest отправить
    #[arg(long, default_value = "40")]
    shots: u32,

    /// Разброс прицела по горизонтали (world units на дистанции цели)
    #[arg(long, default_value = "20")]
    jitter: f32,

    /// JSON loadout (оружие + health цели); без него: defaults
    #[arg(long)]
    loadout: Option<PathBuf>,

    /// Минимальный уровень лога
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

/// Сводка прогона (собирается из combat events)
#[derive(Resource, Default, Debug)]
struct RunTally {
    fired: u32,
    hits: u32,
    headshots: u32,
    damage: f32,
    kills: u32,
    reloads: u32,
    respawn_pending: bool,
}

fn tally_combat_events(
    mut tally: ResMut<RunTally>,
    mut fired_events: EventReader<WeaponFired>,
    mut damage_events: EventReader<DamageDealt>,
    mut death_events: EventReader<EntityDied>,
    mut reload_events: EventReader<ReloadFinished>,
) {
    for event in fired_events.read() {
        tally.fired += 1;
        if event.hit_actor.is_some() {
            tally.hits += 1;
        }
    }
    for event in damage_events.read() {
        tally.damage += event.amount;
        if event.headshot {
            tally.headshots += 1;
        }
    }
    for _ in death_events.read() {
        tally.kills += 1;
        tally.respawn_pending = true;
    }
    tally.reloads += reload_events.read().count() as u32;
}

/// Training dummy: capsule proxy спереди, mesh регионы чуть глубже, стена позади
fn dummy_scene(dummy: Entity, wall: Entity) -> ScriptedScene {
    let capsule = ShapeRef::new(dummy, ShapeKind::CoarseProxy);
    let mesh = ShapeRef::new(dummy, ShapeKind::FineMesh);
    let at = |x: f32, y: f32, z: f32| DUMMY_POSITION + Vec3::new(x, y, z);

    let mut scene = ScriptedScene::new(15.0);
    for y in [30.0, 70.0, 110.0, 150.0] {
        scene = scene.with(ImpactCandidate::blocking(Some(dummy), capsule, at(0.0, y, -15.0)));
    }

    scene
        .with(ImpactCandidate::blocking(Some(dummy), mesh, at(0.0, 170.0, -5.0)).with_region("head"))
        .with(ImpactCandidate::blocking(Some(dummy), mesh, at(0.0, 150.0, -5.0)).with_region("neck_01"))
        .with(ImpactCandidate::blocking(Some(dummy), mesh, at(0.0, 120.0, -5.0)).with_region("spine_03"))
        .with(ImpactCandidate::blocking(Some(dummy), mesh, at(25.0, 100.0, -5.0)).with_region("hand_r"))
        .with(ImpactCandidate::blocking(Some(dummy), mesh, at(-10.0, 60.0, -5.0)).with_region("thigh_l"))
        .with(ImpactCandidate::blocking(Some(dummy), mesh, at(10.0, 25.0, -5.0)).with_region("calf_r"))
        .with(ImpactCandidate::blocking(
            None,
            ShapeRef::new(wall, ShapeKind::Static),
            at(0.0, 100.0, 600.0),
        ))
}

fn spawn_dummy(app: &mut App, config: &HealthConfig, wall: Entity) -> Entity {
    let dummy = app
        .world_mut()
        .spawn((
            Actor,
            Health::from_config(config),
            Transform::from_translation(DUMMY_POSITION),
            Sockets::default().with("head", Vec3::new(0.0, 170.0, 0.0)),
        ))
        .id();
    app.insert_resource(SceneQueryService::new(dummy_scene(dummy, wall)));
    dummy
}

fn main() {
    let args = Args::parse();

    logger::init_logger();
    logger::set_log_level(args.log_level);

    let loadout = match args.loadout.as_ref() {
        Some(path) => match Loadout::load(path) {
            Ok(loadout) => loadout,
            Err(err) => {
                eprintln!("{}: {}", path.display(), err);
                std::process::exit(1);
            }
        },
        None => Loadout::default(),
    };

    println!("Starting hitscan headless simulation (seed: {})", args.seed);

    let mut app = create_headless_app(args.seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .init_resource::<RunTally>()
        .add_systems(Update, tally_combat_events);

    let shooter = app
        .world_mut()
        .spawn((
            Actor,
            RangedWeapon::new(loadout.weapon.clone()),
            Transform::from_translation(SHOOTER_EYE),
        ))
        .id();
    let wall = app.world_mut().spawn(Transform::default()).id();
    let mut dummy = spawn_dummy(&mut app, &loadout.target_health, wall);

    for shot in 0..args.shots {
        let aim_point = {
            let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
            let x = rng.rng.gen_range(-args.jitter.abs()..=args.jitter.abs());
            let y = rng.rng.gen_range(10.0..=190.0);
            DUMMY_POSITION + Vec3::new(x, y, 0.0)
        };

        app.world_mut().send_event(FireRequest {
            shooter,
            origin: SHOOTER_EYE,
            aim_direction: aim_point - SHOOTER_EYE,
        });

        for _ in 0..TICKS_PER_SHOT {
            app.update();
        }

        let respawn = {
            let mut tally = app.world_mut().resource_mut::<RunTally>();
            std::mem::take(&mut tally.respawn_pending)
        };
        if respawn {
            logger::log_info(&format!("Shot {}: dummy {:?} down, respawning", shot, dummy));
            dummy = spawn_dummy(&mut app, &loadout.target_health, wall);
        }
    }

    let tally = app.world().resource::<RunTally>();
    let (ammo, reserve) = app
        .world()
        .get::<RangedWeapon>(shooter)
        .map(|weapon| (weapon.ammo_in_magazine, weapon.reserve_ammo))
        .unwrap_or_default();
    let dummy_health = app
        .world()
        .get::<Health>(dummy)
        .map(|health| health.current)
        .unwrap_or_default();

    println!("Requests: {}, fired: {}, rejected: {}", args.shots, tally.fired, args.shots - tally.fired);
    println!(
        "Hits: {}, headshots: {}, damage: {:.2}, kills: {}, reloads: {}",
        tally.hits, tally.headshots, tally.damage, tally.kills, tally.reloads
    );
    println!("Ammo: {}/{}, current dummy HP: {:.2}", ammo, reserve, dummy_health);
    println!("Simulation complete!");
}
