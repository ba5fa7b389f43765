//! A satellite pass against the simulated mount.
//!
//! Uses the same simulated encoders and drivers as the integration tests:
//! the encoders follow the step pulses, so the controller closes its loop
//! exactly as it would on hardware.
//!
//! ```text
//! cargo run --example simulated_pass
//! ```

#[path = "../tests/sim/mod.rs"]
mod sim;

use antenna_pointing::{Degrees, Error, ErrorStatus, PointingController};
use sim::{bench_config, SimMount};

/// Rising in the south-west, culminating in the west, setting past north.
const PASS: [(f32, f32); 7] = [
    (200.0, 2.0),
    (215.0, 20.0),
    (240.0, 45.0),
    (270.0, 63.0),
    (310.0, 41.0),
    (345.0, 18.0),
    (15.0, 3.0),
];

fn report(label: &str, status: &ErrorStatus) {
    println!("{:<18} {}", label, status);
}

fn main() -> Result<(), Error> {
    let config = bench_config();
    let mount = SimMount::new(&config);
    let mut mount_controller = PointingController::new(&config, mount.hardware())?;

    println!("{:>8} {:>8} | {:>8} {:>8} {:>9}  status", "cmd az", "cmd el", "az", "el", "wrap");
    for (az, el) in PASS {
        let status = mount_controller.point_to(Degrees(az), Degrees(el));
        let (azimuth, _) = mount_controller.current_azimuth();
        let (elevation, _) = mount_controller.current_elevation();
        let (wrap, _) = mount_controller.cable_wrap();
        println!(
            "{:>8.2} {:>8.2} | {:>8.3} {:>8.3} {:>9.3}  {}",
            az,
            el,
            azimuth.map_or(f32::NAN, |d| d.0),
            elevation.map_or(f32::NAN, |d| d.0),
            wrap.map_or(f32::NAN, |d| d.0),
            status
        );
    }

    report("park at zenith", &mount_controller.point_zenith());
    report("standby", &mount_controller.standby_enable());
    report("standby update", &mount_controller.standby_update());
    report("untangle north", &mount_controller.untangle_north());

    let (wrap, _) = mount_controller.cable_wrap();
    println!("final wrap: {:.3} deg", wrap.map_or(f32::NAN, |d| d.0));
    Ok(())
}
