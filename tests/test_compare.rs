use mrcascan::analysis::{
    binned_comparison, lower_dispersion_share, mrca_ages, std_dev, DEFAULT_NUM_BINS,
};
use mrcascan::nexus::{Burnin, NexusParserBuilder};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new("tests").join("fixtures").join(name)
}

// --- TESTS HISTOGRAM COMPARISON ---
#[test]
fn test_histograms_over_sampled_ages() {
    let trees = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .build()
        .unwrap()
        .into_tree_set()
        .unwrap();

    let anatolian = mrca_ages(&trees, "Hittite", "Luwian").unwrap();
    let indic = mrca_ages(&trees, "Vedic", "Greek").unwrap();

    let histograms = binned_comparison(&[&anatolian.ages, &indic.ages], 10, None);

    assert_eq!(histograms.len(), 2);
    assert_eq!(histograms[0].range(), histograms[1].range());
    assert_eq!(histograms[0].range(), (4.0, 8.0));
    assert_eq!(histograms[0].total(), trees.len());
    assert_eq!(histograms[1].total(), trees.len());
}

#[test]
fn test_histograms_with_clip() {
    let trees = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .build()
        .unwrap()
        .into_tree_set()
        .unwrap();
    let ages = mrca_ages(&trees, "Hittite", "Luwian").unwrap().ages;

    // Ages run from 5.0 to 8.0; clipping at 7.0 drops the tail
    let histograms = binned_comparison(&[&ages], DEFAULT_NUM_BINS, Some((0.0, 7.0)));

    assert_eq!(histograms[0].range(), (5.0, 7.0));
    let dropped = ages.iter().filter(|a| **a > 7.0).count();
    assert_eq!(histograms[0].total(), ages.len() - dropped);
}

#[test]
fn test_histogram_of_empty_result_is_all_zero() {
    let trees = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .build()
        .unwrap()
        .into_tree_set()
        .unwrap();

    // A pair with an unknown taxon contributes no ages at all
    let absent = mrca_ages(&trees, "Hittite", "Etruscan").unwrap();
    assert!(absent.is_empty());

    let histograms = binned_comparison(&[&absent.ages], DEFAULT_NUM_BINS, None);
    assert_eq!(histograms[0].total(), 0);
    assert_eq!(histograms[0].num_bins(), DEFAULT_NUM_BINS);
}

// --- TESTS DISPERSION COMPARISON ---
#[test]
fn test_dispersion_share_between_runs() {
    let full = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .build()
        .unwrap()
        .into_tree_set()
        .unwrap();
    let thinned = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .with_burnin(Burnin::Fraction(0.25))
        .build()
        .unwrap()
        .into_tree_set()
        .unwrap();

    let pairs = [("Hittite", "Luwian"), ("Vedic", "Greek"), ("Hittite", "Latin")];

    let mut by_pair_full: HashMap<String, Vec<f64>> = HashMap::new();
    let mut by_pair_thinned: HashMap<String, Vec<f64>> = HashMap::new();
    for (a, b) in pairs {
        let key = format!("{a}|{b}");
        by_pair_full.insert(key.clone(), mrca_ages(&full, a, b).unwrap().ages);
        by_pair_thinned.insert(key, mrca_ages(&thinned, a, b).unwrap().ages);
    }

    let share = lower_dispersion_share(&by_pair_full, &by_pair_thinned)
        .expect("all pairs should be comparable");
    assert!((0.0..=100.0).contains(&share));
}

#[test]
fn test_dispersion_of_empty_result_is_missing() {
    let trees = NexusParserBuilder::for_file(fixture("nexus_t11_n8_translate.trees"))
        .build()
        .unwrap()
        .into_tree_set()
        .unwrap();

    let absent = mrca_ages(&trees, "Hittite", "Etruscan").unwrap();
    assert_eq!(std_dev(&absent.ages), None);

    // A pair without dispersion on one side drops out of the comparison
    let mut a: HashMap<&str, Vec<f64>> = HashMap::new();
    a.insert("pair", absent.ages);
    let mut b: HashMap<&str, Vec<f64>> = HashMap::new();
    b.insert("pair", mrca_ages(&trees, "Hittite", "Luwian").unwrap().ages);

    assert_eq!(lower_dispersion_share(&a, &b), None);
}
