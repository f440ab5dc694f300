//! "Contains" index demo
//!
//! Each replica lives on several nodes. Indexing replicas by every node they
//! occupy answers "which replicas are on node N" without a scan.
//!
//! ```bash
//! cargo run --example contain_index
//! ```

use strata_indexmap::{IndexMap, PrimaryIndex, SecondaryIndex};

const NODE_CONTAIN_INDEX: &str = "node_contain";

#[derive(Debug)]
struct Replica {
    id: i64,
    nodes: Vec<i64>,
}

fn print_by_node(replicas: &IndexMap<i64, Replica>) {
    for node_id in 1i64..=5 {
        let mut on_node = replicas.get_all_by(NODE_CONTAIN_INDEX, node_id);
        on_node.sort_by_key(|r| r.id);
        println!("node {}: {:?}", node_id, on_node);
    }
}

fn main() {
    let replicas = IndexMap::new(PrimaryIndex::new(|r: &Replica| r.id));
    replicas.add_index(
        NODE_CONTAIN_INDEX,
        SecondaryIndex::new(|r: &Replica| r.nodes.clone()),
    );

    replicas.insert(Replica { id: 1, nodes: vec![1, 2, 3] });
    replicas.insert(Replica { id: 2, nodes: vec![2, 3, 4] });
    replicas.insert(Replica { id: 3, nodes: vec![3, 4, 5] });

    println!("{:?}", replicas.get(&1));
    println!("{:?}", replicas.get(&2));
    print_by_node(&replicas);

    println!("remove replica 2");
    replicas.remove(&2);
    print_by_node(&replicas);
}
