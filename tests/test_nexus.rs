use mrcascan::nexus::{Burnin, NexusParserBuilder, parse_file};
use mrcascan::parser::ParsingErrorType;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new("tests").join("fixtures").join(name)
}

// --- TESTS EAGER PARSING ---
#[test]
fn test_basic_nexus_file() {
    let mut parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .build()
        .unwrap();

    assert_eq!(parser.num_taxa(), 8);
    assert_eq!(parser.num_total_trees(), 11);
    assert_eq!(parser.num_trees(), 11);

    assert!(parser.taxa().contains("Hittite"));
    assert!(parser.taxa().contains("Latin"));
    assert!(!parser.taxa().contains("Etruscan"));

    let mut count = 0;
    while let Some(tree) = parser.next_tree_ref() {
        assert_eq!(tree.num_leaves(), 8);
        assert!(tree.is_valid());
        count += 1;
    }
    assert_eq!(count, 11);
}

#[test]
fn test_into_tree_set() {
    let parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .build()
        .unwrap();
    let trees = parser.into_tree_set().unwrap();

    assert_eq!(trees.len(), 11);
    assert_eq!(trees.taxa().len(), 8);

    for tree in &trees {
        assert_eq!(tree.num_leaves(), 8);
        assert!(tree.is_valid());
        assert!(tree.is_ultrametric());
    }
}

#[test]
fn test_tree_names() {
    let parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .build()
        .unwrap();
    let trees = parser.into_tree_set().unwrap();

    assert_eq!(trees[0].name(), Some(&String::from("STATE_0")));
    assert_eq!(trees[10].name(), Some(&String::from("STATE_10")));
}

#[test]
fn test_without_translate_command() {
    let mut parser = NexusParserBuilder::for_file(fixture("nexus_t3_n4_plain.trees"))
        .build()
        .unwrap();

    assert_eq!(parser.num_taxa(), 4);
    assert_eq!(parser.num_trees(), 3);
    assert!(parser.taxa().contains("Gothic"));

    let tree = parser.next_tree_ref().unwrap();
    assert_eq!(tree.num_leaves(), 4);
}

#[test]
fn test_parse_file_convenience() {
    let trees = parse_file(fixture("nexus_t3_n4_plain.trees")).unwrap();

    assert_eq!(trees.len(), 3);
    assert_eq!(trees.taxa().len(), 4);
}

// --- TESTS SKIP FIRST & BURNIN ---
#[test]
fn test_skip_first() {
    let mut parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .with_skip_first()
        .build()
        .unwrap();

    assert_eq!(parser.num_total_trees(), 11);
    assert_eq!(parser.num_trees(), 10);

    let tree = parser.next_tree_ref().unwrap();
    assert_eq!(tree.name(), Some(&String::from("STATE_1")));
}

#[test]
fn test_burnin_count() {
    let parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .with_burnin(Burnin::Count(2))
        .build()
        .unwrap();

    assert_eq!(parser.num_total_trees(), 11);
    assert_eq!(parser.num_trees(), 9);

    let trees = parser.into_tree_set().unwrap();
    assert_eq!(trees.len(), 9);
    assert_eq!(trees[0].name(), Some(&String::from("STATE_2")));
}

#[test]
fn test_burnin_fraction() {
    // 25% of 11 trees, rounded down, is 2
    let parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .with_burnin(Burnin::Fraction(0.25))
        .build()
        .unwrap();

    assert_eq!(parser.num_total_trees(), 11);
    assert_eq!(parser.num_trees(), 9);
}

#[test]
fn test_skip_first_and_burnin() {
    // First tree skipped, then 2 of the remaining 10 as burnin
    let mut parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .with_skip_first()
        .with_burnin(Burnin::Count(2))
        .build()
        .unwrap();

    assert_eq!(parser.num_total_trees(), 11);
    assert_eq!(parser.num_trees(), 8);

    let tree = parser.next_tree_ref().unwrap();
    assert_eq!(tree.name(), Some(&String::from("STATE_3")));
}

#[test]
fn test_burnin_larger_than_sample() {
    let parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .with_burnin(Burnin::Count(20))
        .build()
        .unwrap();

    assert_eq!(parser.num_total_trees(), 11);
    assert_eq!(parser.num_trees(), 0);

    let trees = parser.into_tree_set().unwrap();
    assert!(trees.is_empty());
}

// --- TESTS LAZY PARSING ---
#[test]
fn test_lazy_parsing() {
    let mut parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .lazy()
        .build()
        .unwrap();

    assert_eq!(parser.num_trees(), 11);

    let mut count = 0;
    while let Some(tree) = parser.next_tree().unwrap() {
        assert_eq!(tree.num_leaves(), 8);
        count += 1;
    }
    assert_eq!(count, 11);
}

#[test]
fn test_lazy_reset() {
    let mut parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .lazy()
        .build()
        .unwrap();

    for _ in 0..3 {
        assert!(parser.next_tree().unwrap().is_some());
    }

    parser.reset();

    let mut count = 0;
    while parser.next_tree().unwrap().is_some() {
        count += 1;
    }
    assert_eq!(count, 11);
}

#[test]
fn test_lazy_reset_on_buffered_source() {
    // Resetting a streamed file seeks back to the first tree
    let mut parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .lazy()
        .with_buffered_source()
        .build()
        .unwrap();

    for _ in 0..3 {
        assert!(parser.next_tree().unwrap().is_some());
    }

    parser.reset();

    let first = parser.next_tree().unwrap().unwrap();
    assert_eq!(first.name(), Some(&String::from("STATE_0")));

    let mut count = 1;
    while parser.next_tree().unwrap().is_some() {
        count += 1;
    }
    assert_eq!(count, 11);
}

#[test]
fn test_lazy_with_burnin() {
    let mut parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .lazy()
        .with_burnin(Burnin::Count(2))
        .build()
        .unwrap();

    let first = parser.next_tree().unwrap().unwrap();
    assert_eq!(first.name(), Some(&String::from("STATE_2")));

    let mut count = 1;
    while parser.next_tree().unwrap().is_some() {
        count += 1;
    }
    assert_eq!(count, 9);
}

#[test]
fn test_lazy_into_tree_set() {
    let parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .lazy()
        .with_skip_first()
        .build()
        .unwrap();
    let trees = parser.into_tree_set().unwrap();

    assert_eq!(trees.len(), 10);
    assert_eq!(trees[0].name(), Some(&String::from("STATE_1")));
}

// --- TESTS READ STRATEGIES ---
#[test]
fn test_buffered_source() {
    let parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .with_buffered_source()
        .build()
        .unwrap();

    assert_eq!(parser.num_trees(), 11);
}

#[test]
fn test_in_memory_source() {
    let parser = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .with_in_memory_source()
        .build()
        .unwrap();

    assert_eq!(parser.num_trees(), 11);
}

#[test]
fn test_buffered_and_in_memory_agree() {
    let buffered = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .with_buffered_source()
        .build()
        .unwrap()
        .into_tree_set()
        .unwrap();
    let in_memory = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .with_in_memory_source()
        .build()
        .unwrap()
        .into_tree_set()
        .unwrap();

    assert_eq!(buffered.len(), in_memory.len());
    for (a, b) in buffered.iter().zip(in_memory.iter()) {
        assert_eq!(a.num_nodes(), b.num_nodes());
        assert_eq!(a.name(), b.name());
    }
}

// --- TESTS DEALING WITH CORRUPT FILES ---
#[test]
fn test_missing_nexus_header() {
    let result = NexusParserBuilder::for_file(fixture("nexus_missing_header.trees")).build();

    let err = result.err().expect("Expected a parse error");
    assert!(matches!(err.kind(), ParsingErrorType::MissingNexusHeader));
}

#[test]
fn test_nonexistent_file() {
    let result = NexusParserBuilder::for_file(fixture("does_not_exist.trees")).build();
    assert!(result.is_err());
}
