use mrcascan::model::TaxonSet;

#[test]
fn test_get_or_insert_new_label() {
    let mut taxa = TaxonSet::new();
    let id_hittite = taxa.get_or_insert("Hittite");
    assert_eq!(id_hittite, 0);
    assert!(taxa.contains("Hittite"));
}

#[test]
fn test_get_or_insert_increments_id() {
    let mut taxa = TaxonSet::new();
    let id_vedic = taxa.get_or_insert("Vedic");
    let id_avestan = taxa.get_or_insert("Avestan");
    assert_eq!(id_vedic, 0);
    assert_eq!(id_avestan, 1);
    assert_eq!(taxa.len(), 2);
}

#[test]
fn test_get_or_insert_returns_same_id_for_duplicate() {
    let mut taxa = TaxonSet::new();
    let id_gothic = taxa.get_or_insert("Gothic");
    let id_norse = taxa.get_or_insert("Old_Norse");
    let id_english = taxa.get_or_insert("Old_English");
    let id_gothic_again = taxa.get_or_insert("Gothic");

    assert_eq!(id_gothic, id_gothic_again);
    assert_ne!(id_gothic, id_norse);
    assert_ne!(id_gothic, id_english);
    assert_eq!(taxa.len(), 3);
}

#[test]
fn test_label_returns_correct_label() {
    let mut taxa = TaxonSet::new();
    let id_latin = taxa.get_or_insert("Latin");
    assert_eq!(taxa.label(id_latin), Some("Latin"));
}

#[test]
fn test_label_returns_none_for_invalid_id() {
    let taxa = TaxonSet::new();
    assert_eq!(taxa.label(0), None);
}

#[test]
fn test_index_of() {
    let mut taxa = TaxonSet::new();
    taxa.get_or_insert("Greek");
    taxa.get_or_insert("Albanian");

    assert_eq!(taxa.index_of("Albanian"), Some(1));
    assert_eq!(taxa.index_of("Phrygian"), None);
}
