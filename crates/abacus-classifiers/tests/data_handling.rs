use std::io::Write;

use abacus_classifiers::data_handling::{ColumnKind, Dataset};
use abacus_classifiers::preprocessing::LabelMap;

#[test]
fn loads_table_from_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "x,flag,score,label").unwrap();
    writeln!(file, "1,True,0.5,1.0").unwrap();
    writeln!(file, "2,False,NA,0.0").unwrap();
    writeln!(file, "3,True,1.5,1.0").unwrap();

    let ds = Dataset::from_path(file.path()).expect("table parses");
    assert_eq!(ds.nrows(), 3);
    assert_eq!(ds.ncols(), 4);

    let kinds: Vec<ColumnKind> = ds.columns().iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ColumnKind::Integer,
            ColumnKind::Boolean,
            ColumnKind::Float,
            ColumnKind::Float
        ]
    );
    assert!(ds.has_missing());
    assert_eq!(ds.missing_count(), 1);
}

#[test]
fn missing_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Dataset::from_path(dir.path().join("absent.csv")).unwrap_err();
    assert_eq!(err.kind(), "parse");
}

#[test]
fn label_keys_follow_column_kind() {
    let csv = "a,b,c,d\n1,1.0,true,x\n0,0.0,false,y\n";
    let ds = Dataset::from_bytes(csv.as_bytes()).unwrap();

    let keys = |name: &str| -> Vec<String> {
        let column = ds.column(name).unwrap();
        (0..ds.nrows()).filter_map(|r| column.label_key(r)).collect()
    };
    assert_eq!(keys("a"), vec!["1", "0"]);
    assert_eq!(keys("b"), vec!["1.0", "0.0"]);
    assert_eq!(keys("c"), vec!["True", "False"]);
    assert_eq!(keys("d"), vec!["x", "y"]);

    let map = LabelMap::fit("b", keys("b")).unwrap();
    assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"1.0":0,"0.0":1}"#);
}

#[test]
fn select_columns_reorders_and_rejects_unknown_names() {
    let ds = Dataset::from_bytes("a,b,c\n1,2,3\n".as_bytes()).unwrap();
    let picked = ds
        .select_columns(&["c".to_string(), "a".to_string()])
        .unwrap();
    assert_eq!(picked.column_names(), vec!["c", "a"]);
    assert!(ds.select_columns(&["z".to_string()]).is_err());
}
