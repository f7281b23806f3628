//! Integration tests for search (`scan`) and sequence matching (`find_path`).

use xtrail_core::{Cursor, Error};

// =============================================================================
// scan: repeated-element iteration
// =============================================================================

#[test]
fn scan_enumerates_repeated_siblings() {
    let mut cursor = Cursor::from_str("<r><x/><x/></r>").unwrap();
    cursor.step().unwrap();

    let floor = cursor.scan("x").unwrap();
    assert_eq!(floor, Some(1));
    assert_eq!(cursor.depth(), 2);

    assert_eq!(cursor.scan_from("x", 1).unwrap(), Some(1));
    assert_eq!(cursor.depth(), 2);

    // Only two <x> elements exist.
    assert_eq!(cursor.scan_from("x", 1).unwrap(), None);
    assert!(!cursor.has_more());
}

#[test]
fn scan_searches_in_document_order_not_just_siblings() {
    // The match inside <a> is found first even though it is deeper.
    let mut cursor = Cursor::from_str("<r><a><x>in</x></a><x>out</x></r>").unwrap();
    cursor.step().unwrap();
    assert_eq!(cursor.scan("x").unwrap(), Some(1));
    assert_eq!(cursor.depth(), 3);
    assert_eq!(cursor.read_text().unwrap().as_deref(), Some("in"));
}

#[test]
fn scan_stops_when_the_enclosing_element_closes() {
    let mut cursor = Cursor::from_str("<r><a><b/></a><x/></r>").unwrap();
    cursor.step().unwrap();
    cursor.step().unwrap(); // inside <a>
    assert_eq!(cursor.scan("x").unwrap(), None);
    // The failed scan consumed <a>'s subtree; <x> is still reachable.
    assert_eq!(cursor.depth(), 1);
    assert_eq!(cursor.step_into("x").unwrap(), Some("x"));
}

#[test]
fn scan_is_case_insensitive() {
    let mut cursor = Cursor::from_str("<r><Entry/></r>").unwrap();
    cursor.step().unwrap();
    assert_eq!(cursor.scan("ENTRY").unwrap(), Some(1));
}

#[test]
fn unbounded_scan_reaches_the_end_of_the_stream() {
    let mut cursor = Cursor::from_str("<r><a><x/></a><b><x/></b></r>").unwrap();
    let mut hits = 0;
    while cursor.scan_from("x", 0).unwrap().is_some() {
        hits += 1;
    }
    assert_eq!(hits, 2);
    assert!(!cursor.has_more());
}

// =============================================================================
// find_path: backtracking descent
// =============================================================================

#[test]
fn find_path_matches_a_nested_chain() {
    let mut cursor = Cursor::from_str("<a><b/></a>").unwrap();
    assert_eq!(cursor.find_path(&["a", "b"]).unwrap(), Some(2));
    cursor.ascend(2).unwrap();
    assert_eq!(cursor.depth(), 0);
}

#[test]
fn find_path_skips_non_matching_branches() {
    let doc = "<cfg><db><host>h</host></db><net><host>n</host></net></cfg>";
    let mut cursor = Cursor::from_str(doc).unwrap();
    assert_eq!(cursor.find_path(&["cfg", "net", "host"]).unwrap(), Some(3));
    assert_eq!(cursor.read_text().unwrap().as_deref(), Some("n"));
}

#[test]
fn find_path_backtracks_across_levels() {
    // <db> matches but has no <port>; the search resumes at <db>'s next
    // sibling, runs out of candidates, and fails cleanly.
    let doc = "<cfg><db><host>h</host></db><net><host>n</host></net></cfg>";
    let mut cursor = Cursor::from_str(doc).unwrap();
    assert_eq!(cursor.find_path(&["cfg", "db", "port"]).unwrap(), None);
    assert!(!cursor.has_more());
}

#[test]
fn find_path_retries_the_most_recent_level_first() {
    // Two <db> blocks; only the second has a <port>. The backtrack must try
    // the next <db> rather than restarting from the root.
    let doc = "<cfg><db><host>h</host></db><db><port>5432</port></db></cfg>";
    let mut cursor = Cursor::from_str(doc).unwrap();
    assert_eq!(cursor.find_path(&["cfg", "db", "port"]).unwrap(), Some(3));
    assert_eq!(cursor.read_text().unwrap().as_deref(), Some("5432"));
}

#[test]
fn wildcard_accepts_any_single_element() {
    let doc = "<cfg><db><host>h</host></db></cfg>";
    let mut cursor = Cursor::from_str(doc).unwrap();
    assert_eq!(cursor.find_path(&["cfg", "*", "host"]).unwrap(), Some(3));
    assert_eq!(cursor.read_text().unwrap().as_deref(), Some("h"));
}

#[test]
fn find_path_requires_the_root_name_to_match() {
    let mut cursor = Cursor::from_str("<actual><b/></actual>").unwrap();
    assert_eq!(cursor.find_path(&["expected", "b"]).unwrap(), None);
    assert!(!cursor.has_more());
}

#[test]
fn find_path_rejects_an_empty_sequence() {
    let mut cursor = Cursor::from_str("<a/>").unwrap();
    assert!(matches!(
        cursor.find_path(&[]),
        Err(Error::InvalidArgument(_))
    ));
}

// =============================================================================
// find_path_from: stepping through repeated occurrences
// =============================================================================

#[test]
fn resumed_path_steps_through_repeated_occurrences() {
    let doc = "<lib><bk><t>A</t></bk><bk><t>B</t></bk></lib>";
    let names = ["lib", "bk", "t"];
    let mut cursor = Cursor::from_str(doc).unwrap();

    let depth = cursor.find_path(&names).unwrap().unwrap();
    assert_eq!(depth, 3);
    assert_eq!(cursor.read_text().unwrap().as_deref(), Some("A"));

    assert_eq!(cursor.find_path_from(&names, depth).unwrap(), Some(3));
    assert_eq!(cursor.read_text().unwrap().as_deref(), Some("B"));

    assert_eq!(cursor.find_path_from(&names, depth).unwrap(), None);
}

#[test]
fn resumed_path_first_rises_to_the_parent_level() {
    let doc = "<lib><bk><t>A</t><extra/></bk><bk><t>B</t></bk></lib>";
    let names = ["lib", "bk", "t"];
    let mut cursor = Cursor::from_str(doc).unwrap();

    let depth = cursor.find_path(&names).unwrap().unwrap();
    // Still inside <t>; the resume ascends out of it (and past <extra>)
    // before searching for the next occurrence.
    assert_eq!(cursor.depth(), depth);
    assert_eq!(cursor.find_path_from(&names, depth).unwrap(), Some(3));
    assert_eq!(cursor.read_text().unwrap().as_deref(), Some("B"));
}

#[test]
fn resumed_path_reports_nothing_once_the_region_is_behind() {
    let doc = "<lib><bk><t>A</t></bk></lib>";
    let mut cursor = Cursor::from_str(doc).unwrap();
    cursor.step().unwrap();
    // Depth 1 is below the parent level for a depth-3 resume.
    assert_eq!(cursor.find_path_from(&["lib", "bk", "t"], 3).unwrap(), None);
}

#[test]
fn resumed_path_contract_violations() {
    let mut cursor = Cursor::from_str("<a><b/></a>").unwrap();
    assert!(matches!(
        cursor.find_path_from(&["a"], 0),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        cursor.find_path_from(&[], 1),
        Err(Error::InvalidArgument(_))
    ));
}
