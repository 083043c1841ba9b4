use std::fs;

use hexline_content::{ContentFactory, MapLoader, RulesLoader, SettingsLoader};
use hexline_core::env::{repair, tiles};
use hexline_core::{Coord, Crossing, Env, GameEngine, GameSettings, Move, RulesOracle};

#[test]
fn bundled_data_starts_a_playable_game() {
    let factory = ContentFactory::bundled();
    let (mut state, rules, settings) = factory.new_game("skirmish", 7).expect("bundled content");

    assert_eq!(settings.player_count, GameSettings::DEFAULT_PLAYER_COUNT);
    assert_eq!(settings.income.landbase, 100);
    assert_eq!(state.coins(1), 300);
    assert_eq!(state.world.player_units(1).count(), 2);
    assert_eq!(state.world.player_units(2).count(), 2);
    let artillery = rules.unit(3).expect("artillery");
    assert_eq!(artillery.action_slots(), vec!["move|attack"]);
    let medic = rules.unit(repair::MEDIC).expect("medic");
    assert_eq!(medic.fix_value, repair::DEFAULT_FIX_VALUE);

    let forest_road = state.world.tile_at(Coord::new(0, -2)).expect("forest road");
    assert_eq!(forest_road.crossing, Some(Crossing::Road));
    assert_eq!(forest_road.effective_type(), tiles::ROAD);
    assert_eq!(rules.movement_cost(1, forest_road.effective_type()), 0.5);

    let env = Env::with_all(&rules, &settings).into_game_env();
    let mut engine = GameEngine::new(&mut state);
    engine
        .execute(env, &Move::build(Coord::new(-3, 0), 1))
        .expect("soldier from the home base");
    engine.execute(env, &Move::end_turn()).expect("end turn");
    assert_eq!(state.coins(1), 300 - 75 + 100);
}

#[test]
fn loaders_report_the_offending_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.ron");
    fs::write(&path, "( units: [ (id: 1) ] )").unwrap();

    let err = RulesLoader::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("rules.ron"), "{err:#}");

    let missing = SettingsLoader::load(&dir.path().join("settings.toml")).unwrap_err();
    assert!(missing.to_string().starts_with("Failed to read file"));
}

#[test]
fn settings_need_two_players() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "player_count = 1\n").unwrap();

    assert!(SettingsLoader::load(&path).is_err());
    assert_eq!(SettingsLoader::parse("player_count = 1\n").unwrap().player_count, 1);
}

#[test]
fn factory_reads_maps_from_its_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("maps")).unwrap();
    fs::write(
        dir.path().join("maps").join("duel.ron"),
        "(tiles: [(q: 0, r: 0, tile_type: 5)])",
    )
    .unwrap();

    let factory = ContentFactory::new(dir.path());
    let map = factory.load_map("duel").expect("duel map");
    assert_eq!(map.tiles.len(), 1);
    assert!(map.units.is_empty());
    assert!(factory.load_map("siege").is_err());
    assert_eq!(map, MapLoader::load(&dir.path().join("maps/duel.ron")).unwrap());
}
