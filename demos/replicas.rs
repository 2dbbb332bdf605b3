//! Example: two offline replicas of a shopping list reconciling by merge.

use cvrdt::clock::ManualClock;
use cvrdt::prelude::*;

fn main() {
    println!("=== Shopping list (add-wins OR-Set) ===\n");

    let mut alice = ORSet::new();
    alice.insert("milk", "alice");
    alice.insert("eggs", "alice");

    // Bob syncs once, then both go offline.
    let mut bob = alice.clone();

    alice.remove("milk", "alice");
    bob.insert("milk", "bob"); // Bob never saw the removal
    bob.remove("eggs", "bob");

    println!("Alice offline: {:?}", alice.value());
    println!("Bob offline:   {:?}", bob.value());

    let merged = alice.merged(&bob);
    assert_eq!(merged, bob.merged(&alice));
    println!("After sync:    {:?} (concurrent add of milk wins)", merged.value());

    println!("\n=== Page views (PN-Counter) ===\n");

    let mut east = PNCounter::new();
    let mut west = PNCounter::new();
    east.increase("east");
    east.increase("east");
    west.increase("west");
    west.decrease("west");

    east.merge(&west);
    println!("Total: {}", east.value());

    println!("\n=== Room topic (LWW-Register) ===\n");

    let clock = ManualClock::new(1_000);
    let mut r1 = LWWRegister::new("node-1", "standup", &clock);
    let r2 = LWWRegister::new("node-2", "retro", &clock);

    println!("Node 1: {:?} (ts={})", r1.value(), r1.timestamp());
    println!("Node 2: {:?} (ts={})", r2.value(), r2.timestamp());

    r1.merge(&r2);
    println!("Same millisecond, larger replica id wins: {:?}", r1.value());

    clock.advance(5);
    r1.write("node-1", "planning", &clock);
    println!("Later write: {:?} (ts={})", r1.value(), r1.timestamp());
}
