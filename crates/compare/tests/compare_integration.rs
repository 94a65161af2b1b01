// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for result-set comparison

use aimdb_check_compare::{
    CompareError, FileLayout, Row, RowMatch, Tolerance, Verdict, compare_texts, rows_match,
    sort_rows,
};

/// Rows as they would appear in a three-column join result
const ROWS: &[(&str, &str, &str)] = &[
    ("Customer#000000001", "BRAZIL", "711.56"),
    ("Customer#000000002", "JORDAN", "121.65"),
    ("Customer#000000003", "ARGENTINA", "7498.12"),
    ("Customer#000000004", "EGYPT", "2866.83"),
    ("Customer#000000005", "CANADA", "794.47"),
    ("Customer#000000006", "SAUDI ARABIA", "7638.57"),
    ("Customer#000000007", "CHINA", "9561.95"),
];

fn engine_file(order: &[usize]) -> String {
    let mut text = String::new();
    for &i in order {
        let (name, nation, balance) = ROWS[i];
        text.push_str(&format!("{}\t{}\t{}\n", name, nation, balance));
    }
    text.push('\n');
    text
}

fn reference_file(order: &[usize]) -> String {
    let mut text = String::from(
        "       c_name       |    n_name    | c_acctbal \n\
         --------------------+--------------+-----------\n",
    );
    for &i in order {
        let (name, nation, balance) = ROWS[i];
        text.push_str(&format!(" {:<18} | {:<12} | {:>9}\n", name, nation, balance));
    }
    text.push_str(&format!("({} rows)\n\n", order.len()));
    text
}

/// Deterministic permutations of `0..n` produced by rotating and reversing
fn permutations(n: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    for shift in 0..n {
        let rotated: Vec<usize> = (0..n).map(|i| (i + shift) % n).collect();
        let mut reversed = rotated.clone();
        reversed.reverse();
        let interleaved: Vec<usize> = rotated
            .iter()
            .step_by(2)
            .chain(rotated.iter().skip(1).step_by(2))
            .copied()
            .collect();
        result.push(rotated);
        result.push(reversed);
        result.push(interleaved);
    }
    result
}

fn compare(engine: &str, reference: &str) -> Verdict {
    compare_texts(engine, reference, &FileLayout::default(), Tolerance::default())
        .expect("comparison should not error")
}

#[test]
fn test_permutations_compare_equal() {
    let identity: Vec<usize> = (0..ROWS.len()).collect();
    let reference = reference_file(&identity);

    for order in permutations(ROWS.len()) {
        let verdict = compare(&engine_file(&order), &reference);
        assert_eq!(
            verdict,
            Verdict::Pass { rows: ROWS.len() },
            "permutation {:?} should pass",
            order
        );
    }
}

#[test]
fn test_both_sides_permuted() {
    for engine_order in permutations(ROWS.len()) {
        for reference_order in permutations(ROWS.len()).into_iter().take(4) {
            let verdict = compare(&engine_file(&engine_order), &reference_file(&reference_order));
            assert!(verdict.is_pass());
        }
    }
}

#[test]
fn test_sorted_sets_are_identical_regardless_of_input_order() {
    let identity: Vec<usize> = (0..ROWS.len()).collect();
    let sorted_once = {
        let mut rows: Vec<Row> = identity
            .iter()
            .map(|&i| Row::parse(format!("{}|{}|{}", ROWS[i].0, ROWS[i].1, ROWS[i].2)))
            .collect();
        sort_rows(&mut rows).unwrap();
        rows
    };

    for order in permutations(ROWS.len()) {
        let mut rows: Vec<Row> = order
            .iter()
            .map(|&i| Row::parse(format!("{}|{}|{}", ROWS[i].0, ROWS[i].1, ROWS[i].2)))
            .collect();
        sort_rows(&mut rows).unwrap();
        assert_eq!(rows, sorted_once);
    }
}

#[test]
fn test_row_count_offset_is_enforced() {
    let identity: Vec<usize> = (0..ROWS.len()).collect();
    let reference = reference_file(&identity);

    // one row short
    let verdict = compare(&engine_file(&identity[1..]), &reference);
    match verdict {
        Verdict::RowCountMismatch(mismatch) => {
            assert_eq!(mismatch.engine_rows, ROWS.len() - 1);
            assert_eq!(mismatch.reference_rows, ROWS.len());
            assert_eq!(mismatch.engine_lines + 4, mismatch.reference_lines);
        }
        other => panic!("expected row count mismatch, got {:?}", other),
    }
}

#[test]
fn test_rounding_within_tolerance_passes() {
    let identity: Vec<usize> = (0..ROWS.len()).collect();
    let reference = reference_file(&identity);
    let engine = engine_file(&identity).replace("7498.12", "7498.1234");

    assert!(compare(&engine, &reference).is_pass());
}

#[test]
fn test_changed_text_field_fails_with_both_rows() {
    let identity: Vec<usize> = (0..ROWS.len()).collect();
    let reference = reference_file(&identity);
    let engine = engine_file(&identity).replace("JORDAN", "JAPAN");

    match compare(&engine, &reference) {
        Verdict::RowMismatch { mismatch, .. } => {
            assert_eq!(mismatch.engine, "Customer#000000002|JAPAN|121.65");
            assert_eq!(mismatch.reference, "Customer#000000002|JORDAN|121.65");
            assert_eq!(mismatch.field, 1);
        }
        other => panic!("expected row mismatch, got {:?}", other),
    }
}

#[test]
fn test_malformed_decimal_is_an_error() {
    let engine = "Customer.X\t1\n\n";
    let reference = " a | b\n---+---\n Customer.X | 1\n(1 row)\n\n";
    let err = compare_texts(engine, reference, &FileLayout::default(), Tolerance::default())
        .unwrap_err();
    assert!(matches!(err, CompareError::MalformedNumber { .. }));
}

#[test]
fn test_custom_layout() {
    // reference format without the trailing blank line
    let layout = FileLayout {
        reference_footer_lines: 1,
        ..FileLayout::default()
    };
    let verdict = compare_texts(
        "1\t2.0\n\n",
        " a | b\n---+---\n 1 | 2.0\n(1 row)\n",
        &layout,
        Tolerance::default(),
    )
    .unwrap();
    assert_eq!(verdict, Verdict::Pass { rows: 1 });
}

#[test]
fn test_equality_asymmetry_is_preserved() {
    let tolerance = Tolerance::new(0.5).unwrap();
    let small = Row::parse("1.0");
    let large = Row::parse("2.0");

    // |1 - 2| / 2 = 0.5 matches, |2 - 1| / 1 = 1.0 does not
    assert_eq!(rows_match(&small, &large, tolerance).unwrap(), RowMatch::Equal);
    assert!(!rows_match(&large, &small, tolerance).unwrap().is_equal());
}
