//! Shipped profile and config files stay in sync with the built-ins.

use std::path::PathBuf;

use padsync::{Config, DeviceProfile, Manager, RecordingSink, SinkKind, VirtualDevice};

fn repo_file(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(rel)
}

#[test]
fn nes_profile_file_matches_builtin() {
    let from_file = DeviceProfile::load(repo_file("profiles/nes.toml")).unwrap();
    assert_eq!(from_file, DeviceProfile::nes());
}

#[test]
fn example_config_resolves_profile_next_to_it() {
    let cfg = Config::load(repo_file("padsync.example.toml")).unwrap();
    assert_eq!(cfg.sink.kind, SinkKind::Osc);
    assert_eq!(cfg.max_devices, 2);
    assert_eq!(cfg.load_profile().unwrap(), DeviceProfile::nes());
}

#[test]
fn custom_profile_drives_the_loop() {
    let profile = DeviceProfile::from_toml_str(
        r#"
        name = "Foot pedal"
        vendor_id = 0x05f3
        product_id = 0x00ff
        report_len = 2
        buttons = ["LEFT", "MIDDLE", "RIGHT"]

        [[fields]]
        kind = "bits"
        byte = 0
        bits = [
            { bit = 0, button = "LEFT" },
            { bit = 1, button = "MIDDLE" },
            { bit = 2, button = "RIGHT" },
        ]
        "#,
    )
    .unwrap();

    let mut mgr = Manager::with_capacity(&profile, RecordingSink::new(), 1).unwrap();
    let pedal = VirtualDevice::new("virtual:pedal", "Pedal");
    pedal.feed([0b101, 0x00]);
    pedal.feed([0b010, 0x00]);
    mgr.add_device(pedal).unwrap();

    mgr.tick();
    mgr.tick();

    let args: Vec<Vec<i32>> = mgr.sink().messages().iter().map(|m| m.args.clone()).collect();
    assert_eq!(
        args,
        vec![
            vec![0, 0, 1],
            vec![0, 2, 1],
            vec![0, 0, 0],
            vec![0, 1, 1],
            vec![0, 2, 0],
        ]
    );
    assert!(mgr.snapshot().get(0).unwrap().get_button("MIDDLE"));
}

#[test]
fn invalid_profile_is_rejected_at_construction() {
    let mut profile = DeviceProfile::nes();
    profile.report_len = 4; // byte 4 (SELECT/START) no longer fits
    assert!(Manager::new(&profile, RecordingSink::new()).is_err());
}
