//! Performance benchmarks for starmod

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use starmod::core::ModResult;
use starmod::files::{checksum, SignatureTable};
use starmod::modlist::{ListPolicy, ModList};
use starmod::package::{internal_name_for, Mod, ModLoader};
use starmod::store::MemoryModStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct NameLoader;

impl ModLoader for NameLoader {
    fn load(&self, path: &Path, order: usize) -> ModResult<Mod> {
        Ok(Mod::new(internal_name_for(path)?, path, order))
    }

    fn supports(&self, _path: &Path) -> bool {
        true
    }
}

fn benchmark_checksum(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("payload.bin");
    let data: Vec<u8> = (0..4 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    std::fs::write(&file, data).unwrap();

    c.bench_function("checksum_4mib", |b| {
        b.iter(|| {
            checksum(black_box(&file)).unwrap();
        })
    });
}

fn benchmark_signature_check(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("mod.zip");
    let mut data = vec![0x50, 0x4B, 0x03, 0x04];
    data.resize(1024 * 1024, 0);
    std::fs::write(&file, data).unwrap();
    let table = SignatureTable::builtin();

    c.bench_function("signature_check", |b| {
        b.iter(|| {
            table.check(black_box(&file)).unwrap();
        })
    });
}

fn benchmark_move_mod(c: &mut Criterion) {
    let records: Vec<Mod> = (0..200)
        .map(|i| Mod::new(format!("mod{}", i), format!("mod{}.zip", i), i))
        .collect();
    let mut list = ModList::open(
        Box::new(MemoryModStore::with_records(records)),
        Arc::new(NameLoader),
        ListPolicy::default(),
    )
    .unwrap();

    c.bench_function("move_mod_200", |b| {
        b.iter(|| {
            list.move_mod(black_box("mod150"), 100).unwrap();
            list.move_mod(black_box("mod150"), -100).unwrap();
        })
    });
}

fn benchmark_add_delete(c: &mut Criterion) {
    let mut list = ModList::open(
        Box::new(MemoryModStore::new()),
        Arc::new(NameLoader),
        ListPolicy::default(),
    )
    .unwrap();
    for i in 0..100 {
        list.add_mod(&PathBuf::from(format!("mod{}.zip", i))).unwrap();
    }
    let extra = PathBuf::from("extra.zip");

    c.bench_function("add_delete_front_100", |b| {
        b.iter(|| {
            list.add_mod(black_box(&extra)).unwrap();
            list.move_mod("extra", 100).unwrap();
            list.delete_mod("extra").unwrap();
        })
    });
}

criterion_group!(
    benches,
    benchmark_checksum,
    benchmark_signature_check,
    benchmark_move_mod,
    benchmark_add_delete
);
criterion_main!(benches);
