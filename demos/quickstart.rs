use chrono::Utc;
use daynight::{CivilTime, Terminator, TerminatorOptions};

fn main() -> Result<(), daynight::TerminatorError> {
    let now = Utc::now();
    let time = CivilTime::from(now);

    let options = TerminatorOptions {
        follow_hour_angle: true,
        ..Default::default()
    };
    let terminator = Terminator::from_utc(now).with_options(options)?;
    let sun = terminator.sun();
    let ring = terminator.ring();

    println!("UTC: {time}");
    println!("Sun: {sun}");
    println!("Subsolar point: {}", sun.subsolar_point());
    println!("Terminator: {ring}");
    Ok(())
}
