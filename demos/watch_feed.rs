// Example: fold a synthetic change feed into granular edit scripts.
use listdelta::{ChangeEvent, DeltaFeed, SortedProjection};

fn upsert(key: &str, value: u32) -> ChangeEvent<String, u32> {
    ChangeEvent::Upsert {
        key: key.into(),
        value,
    }
}

fn main() {
    // Rows ordered by score; keys break ties.
    let mut feed = DeltaFeed::new(SortedProjection::<String, u32>::by_value());

    let batches: Vec<Vec<ChangeEvent<String, u32>>> = vec![
        vec![upsert("carol", 30), upsert("alice", 10), upsert("bob", 20)],
        // alice's new score relocates her between bob and carol.
        vec![upsert("alice", 25)],
        vec![
            ChangeEvent::Delete {
                key: "bob".into(),
                value: 20,
            },
            upsert("dave", 5),
        ],
    ];

    for (i, batch) in batches.into_iter().enumerate() {
        println!("batch {i}:");
        let steps = feed.apply(batch).expect("consistent feed");
        if steps.is_empty() {
            println!("  (no structural change)");
        }
        for step in steps {
            let order: Vec<&str> = step.snapshot.iter().map(|e| e.key.as_str()).collect();
            println!("  {:?} -> {order:?}", step.delta);
        }
    }
}
