//! Sphere Tuning Example
//!
//! Drives a small swarm toward the origin of a bounded 2-d search space.

use swarm_tune::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("SwarmTune Sphere Example");
    println!("========================");

    let space = ParamSpace::new(vec![
        ParamRange::real(-5.0, 5.0),
        ParamRange::real(-5.0, 5.0),
    ])?;

    let mut tuner = Tuner::builder(space)
        .seed(42)
        .inertia(0.5)
        .item("a", vec![4.0, 4.0])
        .item("b", vec![-4.0, 4.0])
        .item("c", vec![4.0, -4.0])
        .item("d", vec![-4.0, -4.0])
        .build(|values| -values.iter().map(|v| v * v).sum::<f64>())?;

    for block in 0..6 {
        tuner.run(10)?;
        let best = tuner.best().expect("rounds were run");
        println!(
            "after {:3} rounds: best score {:9.4} at {:?}",
            (block + 1) * 10,
            best.score,
            best.values
        );
    }

    let best = tuner.best().expect("rounds were run");
    let name = tuner
        .roster()
        .name(best.item)
        .unwrap_or("<unknown>");
    println!("\nbest sample came from item {:?} in round {}", name, best.round);

    Ok(())
}
