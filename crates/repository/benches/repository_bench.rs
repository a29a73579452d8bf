use common::AggregateId;
use criterion::{Criterion, criterion_group, criterion_main};
use repository::{InMemoryRepository, Repository, Version, Versioned};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Sample {
    id: AggregateId,
    version: Version,
    lines: Vec<String>,
}

impl Versioned for Sample {
    fn aggregate_type() -> &'static str {
        "Sample"
    }

    fn id(&self) -> AggregateId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

fn sample() -> Sample {
    Sample {
        id: AggregateId::new(),
        version: Version::initial(),
        lines: (0..10).map(|i| format!("SKU-{i:03}")).collect(),
    }
}

fn bench_save_new(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = InMemoryRepository::<Sample>::new();

    c.bench_function("repository/save_new", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut s = sample();
                repo.save(&mut s).await.unwrap();
            });
        });
    });
}

fn bench_load_and_resave(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = InMemoryRepository::<Sample>::new();
    let mut s = sample();
    rt.block_on(repo.save(&mut s)).unwrap();
    let id = s.id;

    c.bench_function("repository/load_and_resave", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut loaded = repo.find_by_id(id).await.unwrap();
                repo.save(&mut loaded).await.unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_save_new, bench_load_and_resave);
criterion_main!(benches);
