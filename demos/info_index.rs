//! Person lookup demo
//!
//! Registers name, city and "like" indexes (the last one a contains index),
//! queries through each, then relocates a person with `update_by`.
//!
//! ```bash
//! cargo run --example info_index
//! ```

use std::sync::Arc;

use strata_indexmap::{IndexMap, IndexMapConfig, PrimaryIndex, SecondaryIndex};

#[derive(Debug, Clone)]
struct Person {
    id: i64,
    name: String,
    age: u32,
    city: String,
    like: Vec<String>,
}

fn person(id: i64, name: &str, age: u32, city: &str, like: &[&str]) -> Person {
    Person {
        id,
        name: name.to_string(),
        age,
        city: city.to_string(),
        like: like.iter().map(|s| s.to_string()).collect(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let persons = IndexMap::with_config(
        PrimaryIndex::new(|p: &Person| p.id),
        IndexMapConfig::default().with_name("persons"),
    );
    persons.add_index("name", SecondaryIndex::new(|p: &Person| [p.name.clone()]));

    persons.insert(person(1, "Ashe", 39, "San Francisco", &["Bob", "Cassidy"]));
    persons.insert(person(2, "Bob", 18, "San Francisco", &[]));
    persons.insert(person(3, "Cassidy", 40, "Shanghai", &["Ashe", "Bob"]));

    // Registered after the inserts: backfilled immediately
    persons.add_index("city", SecondaryIndex::new(|p: &Person| [p.city.clone()]));
    persons.add_index("like", SecondaryIndex::new(|p: &Person| p.like.clone()));

    println!("Search with ID or Name:");
    println!("{:?}", persons.get(&1));
    println!("{:?}", persons.get_by("name", "Ashe"));

    println!("\nSearch persons come from San Francisco:");
    for p in persons.get_all_by("city", "San Francisco") {
        println!("{:?}", p);
    }

    println!("\nSearch persons like Bob:");
    for p in persons.get_all_by("like", "Bob") {
        println!("{:?}", p);
    }

    println!("\nSearch persons like Bob, not from Shanghai:");
    for p in persons
        .search()
        .or("like", ["Bob"])
        .exclude("city", ["Shanghai"])
        .execute()
    {
        println!("{:?} (age {})", p.name, p.age);
    }

    // Stored values are shared; modify them through update_by so every index
    // is rebuilt around the change.
    persons.update_by("name", "Ashe", |mut p| {
        if p.city == "Shanghai" {
            return (Some(p), true);
        }
        Arc::make_mut(&mut p).city = "Shanghai".to_string();
        (Some(p), true)
    });

    println!("\nSearch persons come from Shanghai:");
    for p in persons.get_all_by("city", "Shanghai") {
        println!("{:?}", p);
    }
}
