//! Walks through seeding an accumulator, tracking a witness and proving
//! membership with it.

use ring_accumulator::{AccumulatorConfig, AccumulatorEngine};

fn main() {
    let engine =
        AccumulatorEngine::new(AccumulatorConfig::default()).expect("default configuration");

    let mut accumulator = engine.create_seed_value().expect("seed");
    println!("Seed:\n{accumulator}\n");

    let mut foobar_witness = accumulator.clone();
    accumulator = engine
        .accumulate_value(&accumulator, "foobar")
        .expect("accumulate foobar");
    println!("Foobar witness:\n{foobar_witness}");
    println!("Accumulator:\n{accumulator}\n");

    // A new element arrives: the live value and the tracked witness both absorb it.
    accumulator = engine
        .accumulate_value(&accumulator, "bazfoo")
        .expect("accumulate bazfoo");
    foobar_witness = engine
        .accumulate_value(&foobar_witness, "bazfoo")
        .expect("update witness");
    println!("Foobar witness:\n{foobar_witness}");
    println!("Accumulator:\n{accumulator}\n");

    let membership = engine
        .verify_membership(&accumulator, &foobar_witness, "foobar")
        .expect("verify");
    println!("Membership:\n{membership}");

    let outsider = engine
        .verify_membership(&accumulator, &foobar_witness, "quux")
        .expect("verify");
    println!("Membership of an element never added:\n{outsider}");
}
