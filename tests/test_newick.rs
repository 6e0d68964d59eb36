use mrcascan::model::AnnotationValue;
use mrcascan::newick::{NewickParser, parse_file, parse_single, parse_str};
use mrcascan::parser::{ByteParser, ParsingErrorType};
use std::path::Path;

// --- TESTS NEWICK STRING PARSING ---
#[test]
fn test_basic_tree() {
    let newick = "((A:1.0,B:2.0):3.0,C:4.0):0.5;";
    let mut byte_parser = ByteParser::from_str(newick);
    let mut newick_parser = NewickParser::new().with_num_leaves(3);
    let tree = newick_parser.parse_tree(&mut byte_parser).unwrap();
    let taxa = newick_parser.into_taxa();

    // Test counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_inner(), 1);
    assert_eq!(tree.num_nodes(), 5);
    assert_eq!(taxa.len(), 3);

    // Test basic label parsing
    assert!(taxa.contains("A"));
    assert!(taxa.contains("B"));
    assert!(taxa.contains("C"));

    // Test relationships
    // - Root has children (internal, C)
    let root = tree.root();
    let root_children = root.children().unwrap();
    assert_eq!(root_children.len(), 2);

    // - Internal node has children (A, B)
    let inner = tree.node(root_children[0]);
    assert!(inner.is_inner());
    let inner_children = inner.children().unwrap();
    assert_eq!(inner_children.len(), 2);

    // - Three leaves
    let leaf_a = tree.node(inner_children[0]);
    let leaf_b = tree.node(inner_children[1]);
    let leaf_c = tree.node(root_children[1]);
    assert!(leaf_a.is_leaf());
    assert!(leaf_b.is_leaf());
    assert!(leaf_c.is_leaf());

    // - Parent relationships
    assert_eq!(inner.parent(), Some(root.id()));
    assert_eq!(leaf_a.parent(), Some(inner.id()));
    assert_eq!(leaf_b.parent(), Some(inner.id()));
    assert_eq!(leaf_c.parent(), Some(root.id()));
}

#[test]
fn test_basic_tree_without_root_branch() {
    let newick = "((A:1.0,B:2.0):3.0,C:4.0);";
    let tree = parse_single(newick).unwrap();

    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_inner(), 1);
    assert_eq!(tree.num_nodes(), 5);
    assert!(tree.root().edge_length().is_none());
}

#[test]
fn test_multifurcating_tree() {
    let newick = "((A:1,B:1,C:1):2,(D:1.5,E:1.5):1.5);";
    let tree = parse_single(newick).unwrap();

    assert_eq!(tree.num_leaves(), 5);
    assert_eq!(tree.num_inner(), 2);
    assert_eq!(tree.num_nodes(), 8);
    assert!(tree.is_valid());

    let root_children = tree.root().children().unwrap();
    let trifurcation = tree.node(root_children[0]);
    assert_eq!(trifurcation.children().unwrap().len(), 3);
}

#[test]
fn test_tree_with_quoted_labels() {
    let newick = "(('Taxon one':1.5,'Second''s taxon':2.5):3.0,'3rd Taxon':4.0):0.0;";
    let mut byte_parser = ByteParser::from_str(newick);
    let mut newick_parser = NewickParser::new().with_num_leaves(3);
    let tree = newick_parser.parse_tree(&mut byte_parser).unwrap();
    let taxa = newick_parser.into_taxa();

    assert_eq!(tree.num_leaves(), 3);
    assert!(taxa.contains("Taxon one"));
    assert!(taxa.contains("Second's taxon"));
    assert!(taxa.contains("3rd Taxon"));
}

#[test]
fn test_tree_with_scientific_notation() {
    let newick = "((A:1e-5,B:2.5E+3):1.0e2,C:3.14E-10):0.0;";
    let tree = parse_single(newick).unwrap();

    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_inner(), 1);
    assert_eq!(tree.num_nodes(), 5);
}

#[test]
fn test_optional_branch_length() {
    let newick = "((A:1.0,B),C:4.0);";
    let tree = parse_single(newick);
    assert!(tree.is_ok());
    assert!(!tree.unwrap().edge_lengths_complete());
}

#[test]
fn test_newick_with_comment_1() {
    let newick = "[A tree of] (([Shags!]A[Great Commentoran]:0.33,B[Pied Commentoran]:0.33):1.87,C:[King Commentoran]2.2):0.0;";
    let tree = parse_single(newick);

    if tree.is_err() {
        eprintln!(
            "Error parsing tree with comments: {:?}",
            tree.as_ref().err()
        );
    }

    assert!(tree.is_ok());
}

#[test]
fn test_newick_with_comment_2() {
    let newick = "[A tree of] ([Shags!] C:[King Commentoran] 2.2, (A[Great Commentoran]:0.33, B[Pied Commentoran]:0.33):1.87):0.0[The end.];";
    let tree = parse_single(newick);

    if tree.is_err() {
        eprintln!(
            "Error parsing tree with comments: {:?}",
            tree.as_ref().err()
        );
    }

    assert!(tree.is_ok());
}

// --- TESTS DEALING WITH CORRUPT NEWICK STRINGS ---

#[test]
fn test_missing_semicolon() {
    let newick = "((A:1.0,B:2.0):3.0,C:4.0):0.5";
    assert!(parse_single(newick).is_err());
}

#[test]
fn test_missing_comma() {
    let newick = "((A:1.0 B:2.0):3.0,C:4.0):0.5;";
    assert!(parse_single(newick).is_err());
}

#[test]
fn test_unmatched_parentheses() {
    let newick = "((A:1.0,B:2.0:3.0,C:4.0):0.5;";
    assert!(parse_single(newick).is_err());
}

#[test]
fn test_invalid_branch_length() {
    let newick = "((A:1.0,B:abc):3.0,C:4.0):0.5;";
    assert!(parse_single(newick).is_err());
}

#[test]
fn test_negative_branch_length() {
    let newick = "((A:1.0,B:-2.0):3.0,C:4.0);";
    let err = parse_single(newick).unwrap_err();
    assert!(matches!(
        err.kind(),
        ParsingErrorType::NegativeEdgeLength(_)
    ));
}

#[test]
fn test_overflowing_branch_length() {
    // 1e999 does not fit a double and converts to infinity
    let newick = "((A:1e999,B:2.0):3.0,C:4.0);";
    let err = parse_single(newick).unwrap_err();
    assert!(matches!(
        err.kind(),
        ParsingErrorType::NonFiniteEdgeLength(_)
    ));
}

#[test]
fn test_single_child_internal_node() {
    let newick = "((A:1.0):2.0,B:3.0);";
    assert!(parse_single(newick).is_err());
}

#[test]
fn test_unclosed_quote() {
    let newick = "(('A,B:2.0):3.0,C:4.0);";
    let err = parse_single(newick).unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::UnclosedQuote));
}

// --- TESTS PARSING MULTIPLE TREES ---
#[test]
fn test_parse_str_multiple_trees() {
    let input = "((A:1,B:1):2,C:3);\n((A:2,C:2):1,B:3);\n";
    let trees = parse_str(input).unwrap();

    assert_eq!(trees.len(), 2);
    assert_eq!(trees.taxa().len(), 3);

    // Taxa are shared: C keeps its id from the first tree
    assert_eq!(trees.taxa().index_of("C"), Some(2));
}

#[test]
fn test_lazy_iteration() {
    let input = "((A:1,B:1):2,C:3); ((A:2,C:2):1,B:3); ((B:1,C:1):2,A:3);";
    let byte_parser = ByteParser::from_str(input);
    let mut iter = NewickParser::new().into_iter(byte_parser);

    let mut count = 0;
    for tree in &mut iter {
        assert_eq!(tree.unwrap().num_leaves(), 3);
        count += 1;
    }
    assert_eq!(count, 3);

    let taxa = iter.into_parser().into_taxa();
    assert_eq!(taxa.len(), 3);
}

#[test]
fn test_parsing_newick_file() {
    let path = Path::new("tests")
        .join("fixtures")
        .join("newick_t3_n10.nwk");
    let trees = parse_file(path).unwrap();

    assert_eq!(trees.len(), 3);
    assert_eq!(trees.taxa().len(), 10);

    for tree in &trees {
        assert_eq!(tree.num_leaves(), 10);
        assert!(tree.is_valid());
        assert!(tree.is_ultrametric());
    }
}

// --- TESTS ANNOTATION PARSING ---

#[test]
fn test_annotations_on_leaves() {
    let newick = "((A[&rate=0.5]:1.0,B[&rate=0.8]:2.0):3.0,C[&rate=1.2]:4.0);";
    let mut byte_parser = ByteParser::from_str(newick);
    let mut newick_parser = NewickParser::new().with_num_leaves(3).with_annotations();
    let tree = newick_parser.parse_tree(&mut byte_parser).unwrap();

    let annots = tree.annotations().expect("Expected annotations");

    // Build order: A=0, B=1, inner(A,B)=2, C=3, root=4
    let rate_a = annots.get("rate", 0);
    let rate_b = annots.get("rate", 1);
    let rate_c = annots.get("rate", 3);

    assert!(matches!(rate_a, Some(AnnotationValue::Float(v)) if (v - 0.5).abs() < 1e-10));
    assert!(matches!(rate_b, Some(AnnotationValue::Float(v)) if (v - 0.8).abs() < 1e-10));
    assert!(matches!(rate_c, Some(AnnotationValue::Float(v)) if (v - 1.2).abs() < 1e-10));
}

#[test]
fn test_annotations_on_internal_and_root() {
    let newick = "((A:1.0,B:2.0)[&height=3.0]:3.0,C:4.0)[&height=5.0];";
    let mut byte_parser = ByteParser::from_str(newick);
    let mut newick_parser = NewickParser::new().with_num_leaves(3).with_annotations();
    let tree = newick_parser.parse_tree(&mut byte_parser).unwrap();

    let annots = tree.annotations().expect("Expected annotations");

    let root = tree.root();
    let inner_id = root.children().unwrap()[0];

    let height_inner = annots.get("height", inner_id);
    let height_root = annots.get("height", root.id());

    assert!(matches!(height_inner, Some(AnnotationValue::Float(v)) if (v - 3.0).abs() < 1e-10));
    assert!(matches!(height_root, Some(AnnotationValue::Float(v)) if (v - 5.0).abs() < 1e-10));
}

#[test]
fn test_annotations_multiple_keys() {
    let newick =
        "((A[&rate=0.5,pop=100]:1.0,B[&rate=0.8,pop=200]:2.0):3.0,C[&rate=1.2,pop=300]:4.0);";
    let mut byte_parser = ByteParser::from_str(newick);
    let mut newick_parser = NewickParser::new().with_num_leaves(3).with_annotations();
    let tree = newick_parser.parse_tree(&mut byte_parser).unwrap();

    let annots = tree.annotations().expect("Expected annotations");

    assert!(
        matches!(annots.get("rate", 0), Some(AnnotationValue::Float(v)) if (v - 0.5).abs() < 1e-10)
    );
    assert!(matches!(
        annots.get("pop", 0),
        Some(AnnotationValue::Int(100))
    ));
    assert!(matches!(
        annots.get("pop", 1),
        Some(AnnotationValue::Int(200))
    ));
    assert!(matches!(
        annots.get("pop", 3),
        Some(AnnotationValue::Int(300))
    ));
}

#[test]
fn test_annotations_string_value() {
    let newick = "((A[&clade=anatolian]:1.0,B[&clade=anatolian]:2.0):3.0,C[&clade=tocharian]:4.0);";
    let mut byte_parser = ByteParser::from_str(newick);
    let mut newick_parser = NewickParser::new().with_num_leaves(3).with_annotations();
    let tree = newick_parser.parse_tree(&mut byte_parser).unwrap();

    let annots = tree.annotations().expect("Expected annotations");

    assert!(
        matches!(annots.get("clade", 0), Some(AnnotationValue::String(ref s)) if s == "anatolian")
    );
    assert!(
        matches!(annots.get("clade", 3), Some(AnnotationValue::String(ref s)) if s == "tocharian")
    );
}

#[test]
fn test_no_annotations_when_disabled() {
    let newick = "((A[&rate=0.5]:1.0,B[&rate=0.8]:2.0):3.0,C[&rate=1.2]:4.0);";
    // Annotations not enabled, [&...] treated as comments
    let tree = parse_single(newick).unwrap();

    assert!(tree.annotations().is_none());
}

#[test]
fn test_no_annotations_returns_none() {
    let newick = "((A:1.0,B:2.0):3.0,C:4.0);";
    let mut byte_parser = ByteParser::from_str(newick);
    let mut newick_parser = NewickParser::new().with_num_leaves(3).with_annotations();
    let tree = newick_parser.parse_tree(&mut byte_parser).unwrap();

    // Annotations enabled but tree has none
    assert!(tree.annotations().is_none());
}
