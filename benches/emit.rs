use std::io::Write;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use flate2::write::GzEncoder;
use flate2::Compression;
use mimic_notes_core::dataset::DatasetConfig;
use mimic_notes_io::RecordEmitter;

const ROWS: usize = 2_000;

fn make_table(rows: usize) -> Vec<u8> {
    let mut csv = String::from(
        "note_id,subject_id,hadm_id,note_type,note_seq,charttime,storetime,text\n",
    );
    for i in 0..rows {
        csv.push_str(&format!(
            "DS-{i},{},{},DS,{},2180-05-06 00:00:00,2180-05-07 15:20:00,\"Name: ___ Unit No: ___\nChief Complaint: \"\"worsening\"\" dyspnea, fever\n{}\"\n",
            10_000_000 + i,
            20_000_000 + i,
            i + 1,
            "Plan: continue current regimen. ".repeat(20)
        ));
    }
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(csv.as_bytes()).unwrap();
    enc.finish().unwrap()
}

fn bench_emit_discharge(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("discharge.csv.gz"), make_table(ROWS)).unwrap();

    let mut group = c.benchmark_group("emit");
    group.throughput(Throughput::Elements(ROWS as u64));
    for capacity in [8 * 1024, 64 * 1024] {
        group.bench_function(format!("discharge_{}k", capacity / 1024), |b| {
            b.iter(|| {
                let emitter =
                    RecordEmitter::mimic_iv_note(Some(dir.path()), DatasetConfig::Discharge)
                        .unwrap()
                        .with_buffer_capacity(capacity);
                let mut n = 0u64;
                for item in emitter {
                    item.unwrap();
                    n += 1;
                }
                assert_eq!(n, ROWS as u64);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_emit_discharge);
criterion_main!(benches);
