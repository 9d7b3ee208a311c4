use hashbag::HashBag;
use std::iter::FromIterator;

use crate::{compile, parse_wants, translator::TranslateError, Error, Facts, Store};

const UNIVERSITY: &str = r#"
# name matric
student alice 1001
student bob 1002
student carol 1003
# name dept
lecture algo cs
lecture "data bases" cs
lecture poetry lit
# student lecture
registered alice algo
registered alice poetry
registered bob "data bases"
registered carol ghost
# student year
immatriculated alice 2016
immatriculated bob 2015
immatriculated carol 2016
"#;

fn run(facts: &str, wants: &str, code: &str) -> Result<Vec<Vec<String>>, Error> {
    let facts: Facts = facts.parse().unwrap();
    let store = Store::load(&facts).unwrap();
    let query = compile(&facts.schema, &parse_wants(wants), code)?;
    if let Some(sql) = query.to_sql() {
        println!("***** BEGIN SQL *****");
        println!("{}", sql);
        println!("***** END SQL *****");
    }
    Ok(store.execute(&query)?)
}

/// Checks the rows as a multiset, so duplicates would show up.
fn test_query(facts: &str, wants: &str, code: &str, expected: &[&[&str]]) {
    let rows = run(facts, wants, code).unwrap();
    let rows = HashBag::from_iter(
        rows.iter()
            .map(|row| row.iter().map(String::as_str).collect::<Vec<_>>()),
    );
    let expected = HashBag::from_iter(expected.iter().map(|row| row.to_vec()));
    assert_eq!(rows, expected);
}

#[test]
fn test_registered_for_existing_lecture() {
    test_query(
        "student alice 1001\nregistered alice algo\nlecture algo cs\n",
        "S, L",
        "student(S,_) && registered(S,L) && lecture(L,_)",
        &[&["alice", "algo"]],
    );
}

#[test]
fn test_join_drops_dangling_references() {
    test_query(
        UNIVERSITY,
        "S L",
        "student(S,_) && registered(S,L) && lecture(L,_)",
        &[
            &["alice", "algo"],
            &["alice", "poetry"],
            &["bob", "data bases"],
        ],
    );
}

#[test]
fn test_rows_are_sorted() {
    let rows = run(UNIVERSITY, "L,S", "registered(S, L)").unwrap();
    assert_eq!(
        rows,
        [
            ["algo", "alice"],
            ["data bases", "bob"],
            ["ghost", "carol"],
            ["poetry", "alice"],
        ]
    );
}

#[test]
fn test_union_deduplicates_across_disjuncts() {
    let rows = run("a 1\nb 1\nb 2\n", "X", "a(X) || b(X)").unwrap();
    assert_eq!(rows, [["1"], ["2"]]);
}

#[test]
fn test_distinct_within_conjunction() {
    // Both registrations of alice project to the same row.
    test_query(
        UNIVERSITY,
        "S",
        "registered(S, *)",
        &[&["alice"], &["bob"], &["carol"]],
    );
}

#[test]
fn test_string_constant() {
    test_query(
        UNIVERSITY,
        "S,L",
        r#"immatriculated(S, "2016") && registered(S, L) && lecture(L, *)"#,
        &[&["alice", "algo"], &["alice", "poetry"]],
    );
}

#[test]
fn test_numeric_constant() {
    test_query(
        UNIVERSITY,
        "S",
        "immatriculated(S, 2016)",
        &[&["alice"], &["carol"]],
    );
}

#[test]
fn test_numeric_constant_compares_as_written() {
    test_query("code 007 a\ncode 7 b\n", "N", "code(007, N)", &[&["a"]]);
    test_query("code 007 a\ncode 7 b\n", "N", "code(7, N)", &[&["b"]]);
    test_query(
        "big 12345678901234567890 a\n",
        "N",
        "big(12345678901234567890, N)",
        &[&["a"]],
    );
}

#[test]
fn test_constant_with_whitespace() {
    test_query(
        UNIVERSITY,
        "S",
        r#"registered(S, "data bases")"#,
        &[&["bob"]],
    );
}

#[test]
fn test_self_join() {
    let edges = "edge 1 2\nedge 2 1\nedge 2 3\nedge 3 3\n";
    test_query(
        edges,
        "X Y",
        "edge(X, Y) && edge(Y, X)",
        &[&["1", "2"], &["2", "1"], &["3", "3"]],
    );
    test_query(edges, "X", "edge(X, X)", &[&["3"]]);
}

#[test]
fn test_join_columns_are_equal() {
    let edges = "edge 1 2\nedge 2 3\nedge 3 1\nedge 3 4\n";
    let rows = run(edges, "X Y Z W", "edge(X, Y) && edge(W, Z) && edge(Y, Z)").unwrap();
    assert!(!rows.is_empty());
    for row in &rows {
        let facts = ["1 2", "2 3", "3 1", "3 4"];
        assert!(facts.contains(&format!("{} {}", row[0], row[1]).as_str()));
        assert!(facts.contains(&format!("{} {}", row[1], row[2]).as_str()));
        assert!(facts.contains(&format!("{} {}", row[3], row[2]).as_str()));
    }
}

#[test]
fn test_repeated_output_variable() {
    let rows = run("a 1\na 2\n", "X,X", "a(X)").unwrap();
    assert_eq!(rows, [["1", "1"], ["2", "2"]]);
}

#[test]
fn test_empty_query_has_no_rows() {
    assert!(run(UNIVERSITY, "S", "").unwrap().is_empty());
}

#[test]
fn test_no_matches() {
    assert!(run(UNIVERSITY, "S", "immatriculated(S, 1999)").unwrap().is_empty());
}

#[test]
fn test_arity_mismatch() {
    let err = run(UNIVERSITY, "S", "student(S)").unwrap_err();
    assert!(matches!(
        err,
        Error::Translate(TranslateError::ArityMismatch {
            expected: 2,
            found: 1,
            ..
        })
    ));
}

#[test]
fn test_unknown_relation() {
    let err = run(UNIVERSITY, "S", "professor(S)").unwrap_err();
    assert!(matches!(err, Error::Translate(TranslateError::UnknownRelation { .. })));
}

#[test]
fn test_variable_only_under_wildcard() {
    let err = run(UNIVERSITY, "S,M", "student(S, *) || student(*, *)").unwrap_err();
    assert!(matches!(
        err,
        Error::Translate(TranslateError::UnboundVariable { ref variable, .. }) if variable == "M"
    ));
}

#[test]
fn test_lex_and_parse_errors() {
    let lex = run(UNIVERSITY, "S", "student(S, %)");
    assert!(matches!(lex, Err(Error::Lex(_))));
    let dangling = run(UNIVERSITY, "S", "student(S, *) ||");
    assert!(matches!(dangling, Err(Error::Parse(_))));
    let trailing = run(UNIVERSITY, "S", "student(S, *) student(S, *)");
    assert!(matches!(trailing, Err(Error::Parse(_))));
}

#[test]
fn test_parse_wants() {
    assert_eq!(parse_wants("S,SD, L  LD"), ["S", "SD", "L", "LD"]);
    assert_eq!(parse_wants(" , "), Vec::<String>::new());
}
