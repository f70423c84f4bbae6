use mission_planner::Body;
use mission_planner::config::{
    ConfigError, EphemerisSource, PlannerConfig, Quantity, Rgba, StateOrigin, load_config,
};
use mission_planner::constants::MU_SUN_KM3_S2;

fn config_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("configs").join(name)
}

#[test]
fn bundled_toml_config_loads() {
    let config = load_config(config_path("planner.toml")).expect("planner.toml");
    assert_eq!(config.departure_body, Body::Earth);
    assert_eq!(config.arrival_body, Body::Mars);
    assert_eq!(config.mu_km3_s2, MU_SUN_KM3_S2);
    assert_eq!(config.departure.increment_days(), 2);
    assert_eq!(config.arrival.end().to_string(), "2024-01-01");
    assert_eq!(config.ephemeris, EphemerisSource::Analytic);
    assert_eq!((config.plot_size.width, config.plot_size.height), (800, 550));
    assert_eq!(config.title(), "Mission: Earth to Mars 2022, Type 1, 2 Transfers");
}

#[test]
fn bundled_yaml_config_loads() {
    let config = load_config(config_path("venus.yaml")).expect("venus.yaml");
    assert_eq!(config.arrival_body, Body::Venus);
    assert_eq!(config.departure.increment_days(), 3);
    assert!(!config.plot.get(Quantity::C3).visible());
    assert!(!config.plot.get(Quantity::C3).show_labels());
    let tof = config.plot.get(Quantity::TimeOfFlight);
    assert!(tof.visible() && tof.show_labels());
    assert_eq!(tof.color(), Rgba::opaque(0x33, 0x33, 0x33));
    assert_eq!(config.plot.get(Quantity::DeltaV).color(), Rgba::GREEN);
}

const BASE: &str = r#"
[transfer]
departure_body = "Earth"
arrival_body = "Mars"

[transfer.departure_window]
start = "2022-07-01"
end = "2022-07-05"

[transfer.arrival_window]
start = "2023-01-01"
end = "2023-02-01"
"#;

#[test]
fn defaults_fill_missing_sections() {
    let config = PlannerConfig::from_toml_str(BASE).expect("minimal config");
    assert_eq!(config.mu_km3_s2, MU_SUN_KM3_S2);
    assert_eq!(config.departure.increment_days(), 2);
    let dv = config.plot.get(Quantity::DeltaV);
    assert_eq!(dv.upper_bound(), Some(50.0));
    assert_eq!(dv.step(), 1.0);
    assert!(dv.visible() && dv.show_labels());
    let tof = config.plot.get(Quantity::TimeOfFlight);
    assert!(!tof.visible());
    assert_eq!(tof.step(), 50.0);
}

#[test]
fn labels_are_dropped_on_hidden_quantities() {
    let toml = format!("{BASE}\n[plot.v_infinity]\nvisible = false\nlabels = true\n");
    let config = PlannerConfig::from_toml_str(&toml).unwrap();
    let spec = config.plot.get(Quantity::VInfinity);
    assert!(!spec.visible());
    assert!(!spec.show_labels());
}

#[test]
fn spk_source_carries_its_path() {
    let toml = format!("{BASE}\n[ephemeris]\nsource = \"spk\"\npath = \"data/spice/de440s.bsp\"\n");
    let config = PlannerConfig::from_toml_str(&toml).unwrap();
    assert_eq!(
        config.ephemeris,
        EphemerisSource::Spk {
            path: "data/spice/de440s.bsp".into(),
            origin: StateOrigin::Barycentric,
        }
    );
}

#[test]
fn heliocentric_spk_states_are_opt_in() {
    let toml = format!(
        "{BASE}\n[ephemeris]\nsource = \"spk\"\npath = \"k.bsp\"\norigin = \"heliocentric\"\n"
    );
    let config = PlannerConfig::from_toml_str(&toml).unwrap();
    assert!(matches!(
        config.ephemeris,
        EphemerisSource::Spk {
            origin: StateOrigin::Heliocentric,
            ..
        }
    ));

    let bad = format!("{BASE}\n[ephemeris]\nsource = \"spk\"\npath = \"k.bsp\"\norigin = \"geocentric\"\n");
    assert!(PlannerConfig::from_toml_str(&bad).is_err());
}

#[test]
fn invalid_fields_are_rejected() {
    let cases = [
        (BASE.replace("\"Mars\"", "\"Vulcan\""), "unknown body"),
        (format!("{BASE}\n[plot.delta_v]\nstep = 0.0\n"), "step"),
        (format!("{BASE}\n[plot.c3]\nupper_bound = -5.0\n"), "upper bound"),
        (format!("{BASE}\n[plot.c3]\ncolor = \"not-a-color\"\n"), "color"),
        (BASE.replace("2022-07-05", "2022-06-01"), "departure"),
        (BASE.replace("[transfer]\n", "[transfer]\nincrement_days = 0\n"), "increment"),
        (BASE.replace("[transfer]\n", "[transfer]\nmu_km3_s2 = -1.0\n"), "gravitational"),
    ];
    for (toml, needle) in cases {
        let err = PlannerConfig::from_toml_str(&toml).expect_err(needle);
        let message = err.to_string();
        assert!(message.contains(needle), "`{message}` should mention {needle}");
    }
}

#[test]
fn unknown_keys_are_parse_errors() {
    let toml = BASE.replace("[transfer]\n", "[transfer]\nwarp_factor = 9\n");
    assert!(matches!(
        PlannerConfig::from_toml_str(&toml),
        Err(ConfigError::Toml(_))
    ));
}
