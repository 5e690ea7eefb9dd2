// Example: a renderer keeping its own row list in sync by applying deltas,
// using stable ids to recognize rows across moves.
use listdelta::{ChangeEvent, Delta, DeltaFeed, SortedProjection, Step};

struct ListView {
    rows: Vec<String>,
}

impl ListView {
    fn apply(&mut self, step: &Step<String, u32>, feed: &mut DeltaFeed<String, u32>) {
        let bind = |feed: &mut DeltaFeed<String, u32>, index: usize| {
            let entry = step.snapshot.get(index).expect("row in snapshot");
            let id = feed.id_of(&entry.key);
            format!("#{id} {}={}", entry.key, entry.value)
        };

        match step.delta {
            Delta::Reset => {
                self.rows = (0..step.snapshot.len()).map(|i| bind(feed, i)).collect();
            }
            Delta::RemoveRange { index, count } => {
                self.rows.drain(index..index + count);
            }
            Delta::Move { from, to } => {
                let row = self.rows.remove(from);
                self.rows.insert(to, row);
            }
            Delta::InsertRange { index, count } => {
                for offset in 0..count {
                    let row = bind(feed, index + offset);
                    self.rows.insert(index + offset, row);
                }
            }
        }
    }
}

fn main() {
    let mut feed = DeltaFeed::new(SortedProjection::<String, u32>::by_value());
    let mut view = ListView { rows: Vec::new() };

    let batches: Vec<Vec<ChangeEvent<String, u32>>> = vec![
        vec![
            ChangeEvent::Upsert {
                key: "news".into(),
                value: 3,
            },
            ChangeEvent::Upsert {
                key: "chat".into(),
                value: 1,
            },
            ChangeEvent::Upsert {
                key: "mail".into(),
                value: 2,
            },
        ],
        // chat drops to the bottom; a new row lands on top.
        vec![
            ChangeEvent::Upsert {
                key: "chat".into(),
                value: 9,
            },
            ChangeEvent::Upsert {
                key: "feed".into(),
                value: 0,
            },
        ],
    ];

    for batch in batches {
        let steps = feed.apply(batch).expect("consistent feed");
        for step in &steps {
            view.apply(step, &mut feed);
            println!("{:?} => {:?}", step.delta, view.rows);
        }
    }

    let latest: Vec<&str> = feed
        .latest()
        .expect("at least one batch applied")
        .iter()
        .map(|e| e.key.as_str())
        .collect();
    println!("renderer rows: {:?}", view.rows);
    println!("latest order:  {latest:?}");
}
