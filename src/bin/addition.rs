//! Trains a small network to add two scaled single-digit numbers, round-trips
//! it through the text format, then reports accuracy over random probes.

use anyhow::Result;
use ann_core::Network;
use log::info;
use rand::Rng;

const SCALE: i64 = 100;
const EPOCHS: usize = 8000;
const PROBES: usize = 1000;

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = rand::rng();
    let mut net = Network::new(2, 1, 2, 1)?;
    net.randomize(rng.random::<u64>());

    // The decomposed training steps, one example at a time.
    for _ in 0..EPOCHS {
        for j in 0..SCALE / 2 {
            let (a, b) = (j, j);
            let c = a + b;
            net.prepare_inputs(&[a as f64 / SCALE as f64, b as f64 / SCALE as f64])?;
            net.prepare_desired_outputs(&[c as f64 / SCALE as f64])?;
            net.process_training(4.0);
        }
    }

    let text = net.to_text();
    info!(bytes = text.len(); "serialized trained network");
    let mut net = Network::from_text(&text)?;

    let mut exact = 0;
    let mut within_one = 0;
    for _ in 0..PROBES {
        let a = rng.random_range(0..SCALE / 2);
        let b = rng.random_range(0..SCALE / 2);
        let out = net.run(&[a as f64 / SCALE as f64, b as f64 / SCALE as f64])?[0];
        let c = (out * SCALE as f64).round() as i64;

        let diff = (c - (a + b)).abs();
        if diff == 0 {
            exact += 1;
        }
        if diff <= 1 {
            within_one += 1;
        }
    }

    info!(exact = exact, within_one = within_one, probes = PROBES; "finished probing");
    println!(
        "exact: {:.1}%  within one: {:.1}%",
        100.0 * exact as f64 / PROBES as f64,
        100.0 * within_one as f64 / PROBES as f64
    );
    Ok(())
}
