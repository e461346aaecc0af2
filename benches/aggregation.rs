use aggrefiles::{Aggregator, Extension, IgnoreMatcher};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const RULES: &str = "\
target/
node_modules/
*.log
!important.log
/dist
docs/**/draft-*.md
*.tmp
";

fn build_tree(root: &Path, dirs: usize, files_per_dir: usize) {
    for d in 0..dirs {
        let dir = root.join(format!("pkg{:03}/src", d));
        fs::create_dir_all(&dir).unwrap();
        for f in 0..files_per_dir {
            fs::write(dir.join(format!("file{:03}.txt", f)), "some text\n".repeat(20)).unwrap();
            fs::write(dir.join(format!("file{:03}.log", f)), "log line\n").unwrap();
        }
        let ignored = root.join(format!("pkg{:03}/target", d));
        fs::create_dir_all(&ignored).unwrap();
        fs::write(ignored.join("out.txt"), "ignored").unwrap();
    }
}

fn matcher_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("matcher");
    let matcher = IgnoreMatcher::from_content(RULES);

    let paths = vec![
        ("shallow", "readme.txt"),
        ("nested", "pkg/src/module/file.txt"),
        ("excluded_ancestor", "pkg/target/debug/build/out.txt"),
        ("negated", "logs/important.log"),
    ];

    for (name, path) in paths {
        group.bench_with_input(BenchmarkId::new("is_excluded", name), &path, |b, path| {
            b.iter(|| matcher.is_excluded(black_box(path), false))
        });
    }

    group.bench_function("parse_rules", |b| {
        b.iter(|| IgnoreMatcher::from_content(black_box(RULES)))
    });

    group.finish();
}

fn aggregation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");
    group.sample_size(20);

    for (dirs, files_per_dir) in [(10, 10), (50, 20)] {
        let temp_dir = TempDir::new().unwrap();
        build_tree(temp_dir.path(), dirs, files_per_dir);

        let aggregator = Aggregator::new(
            temp_dir.path(),
            Extension::parse("txt").unwrap(),
            IgnoreMatcher::from_content(RULES),
        )
        .unwrap();

        let files = dirs * files_per_dir;
        group.throughput(Throughput::Elements(files as u64));
        group.bench_with_input(BenchmarkId::new("run_to_sink", files), &aggregator, |b, aggregator| {
            b.iter(|| aggregator.run_to_writer(std::io::sink(), None).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("walk_only", files), &aggregator, |b, aggregator| {
            b.iter(|| aggregator.candidates(None).unwrap().count())
        });
    }

    group.finish();
}

criterion_group!(benches, matcher_benchmark, aggregation_benchmark);
criterion_main!(benches);
