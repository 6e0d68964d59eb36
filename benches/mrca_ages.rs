use criterion::{Criterion, criterion_group, criterion_main};
use mrcascan::analysis::{binned_comparison, mrca_ages, mrca_ages_directly_related};
use mrcascan::model::TreeSet;
use mrcascan::newick::parse_str;
use mrcascan::nexus::NexusParserBuilder;
use std::hint::black_box;

const NEXUS_FILE: &str = "tests/fixtures/nexus_t11_n8_translate.trees";

/// Builds a ladder tree over `num_taxa` taxa, each join one unit above the
/// previous one.
fn ladder_newick(num_taxa: usize) -> String {
    let mut newick = String::from("(T1:1,T2:1)");
    for (age, i) in (3..=num_taxa).enumerate() {
        newick = format!("({newick}:1,T{i}:{})", age + 2);
    }
    newick.push(';');
    newick
}

/// A synthetic posterior sample: `num_trees` ladder trees over `num_taxa`
/// taxa.
fn synthetic_sample(num_trees: usize, num_taxa: usize) -> TreeSet {
    let tree = ladder_newick(num_taxa);
    let input = tree.repeat(num_trees);
    parse_str(&input).unwrap()
}

fn parse_nexus_lazy(path: &str) {
    let mut parser = NexusParserBuilder::for_file(path).lazy().build().unwrap();

    while let Some(_tree) = parser.next_tree().unwrap() {
        // consume all trees
    }
}

fn nexus_parsing(c: &mut Criterion) {
    c.bench_function("parse_nexus_lazy", |b| {
        b.iter(|| parse_nexus_lazy(NEXUS_FILE));
    });
}

fn mrca_age_computation(c: &mut Criterion) {
    let sample = synthetic_sample(500, 128);

    // The deepest pair forces the longest ancestor walks
    c.bench_function("mrca_ages_cherry", |b| {
        b.iter(|| mrca_ages(black_box(&sample), "T1", "T2").unwrap());
    });
    c.bench_function("mrca_ages_distant_pair", |b| {
        b.iter(|| mrca_ages(black_box(&sample), "T1", "T128").unwrap());
    });
    c.bench_function("mrca_ages_directly_related", |b| {
        b.iter(|| mrca_ages_directly_related(black_box(&sample), "T1", "T2").unwrap());
    });
}

fn distribution_binning(c: &mut Criterion) {
    let sample = synthetic_sample(500, 128);
    let a = mrca_ages(&sample, "T1", "T2").unwrap().ages;
    let b_ages = mrca_ages(&sample, "T1", "T64").unwrap().ages;

    c.bench_function("binned_comparison", |b| {
        b.iter(|| binned_comparison(black_box(&[a.as_slice(), b_ages.as_slice()]), 30, None));
    });
}

criterion_group!(parsing, nexus_parsing);
criterion_group! {
    name = analysis;
    config = Criterion::default().sample_size(50);
    targets = mrca_age_computation, distribution_binning
}
criterion_main!(parsing, analysis);
