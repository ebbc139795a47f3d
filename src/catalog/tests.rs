use super::*;
use std::fs;
use tempfile::tempdir;

const DATE: i64 = 1_457_000_000;

fn acqus(sfo1: &str) -> String {
    format!(
        "##TITLE= Parameter file\n##$DATE= {}\n##$SFO1= {}\n##$D= (0..3)\n0 1 2 3\n##END=\n",
        DATE, sfo1
    )
}

fn write_experiment(root: &Path, manip: &str, expno: &str, extra: &[&str]) -> PathBuf {
    let dir = root.join(manip).join(expno);
    fs::create_dir_all(dir.join("pdata").join("1")).unwrap();
    fs::write(dir.join(ACQUISITION_FILE), acqus("600.13")).unwrap();
    for name in extra {
        let content = match *name {
            ACQUISITION_2D_FILE => acqus("150.9"),
            _ => String::new(),
        };
        fs::write(dir.join(name), content).unwrap();
    }
    dir
}

#[test]
fn test_classification() {
    let dir = tempdir().unwrap();
    let exp = write_experiment(
        dir.path(),
        "PFDA",
        "3",
        &[SERIAL_DATA_FILE, ACQUISITION_2D_FILE, GRADIENT_LIST_FILE],
    );

    let catalog = ExperimentCatalog::scan(dir.path()).unwrap();
    assert_eq!(catalog.len(), 1);
    let e = &catalog.experiments()[0];
    assert!(e.is_2d());
    assert!(e.is_dosy);
    assert_eq!(e.kind_label(), "DOSY");
    assert!(e.acquisition_2d.is_some());

    fs::remove_file(exp.join(GRADIENT_LIST_FILE)).unwrap();
    let e = ExperimentDescriptor::from_dir(&exp).unwrap().unwrap();
    assert!(e.is_2d());
    assert!(!e.is_dosy);
    assert_eq!(e.kind_label(), "2D");

    fs::remove_file(exp.join(SERIAL_DATA_FILE)).unwrap();
    let e = ExperimentDescriptor::from_dir(&exp).unwrap().unwrap();
    assert_eq!(e.dimension, Dimension::OneD);
    assert!(e.acquisition_2d.is_none());
    assert_eq!(e.kind_label(), "1D");
}

#[test]
fn test_walk_order_is_sorted() {
    let dir = tempdir().unwrap();
    for (manip, expno) in [("b_sample", "2"), ("a_sample", "10"), ("b_sample", "1"), ("a_sample", "1")] {
        write_experiment(dir.path(), manip, expno, &[]);
    }

    let catalog = ExperimentCatalog::scan(dir.path()).unwrap();
    let order: Vec<(String, String)> = catalog
        .iter()
        .map(|e| (e.manip.clone(), e.expno.clone()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("a_sample".to_string(), "1".to_string()),
            ("a_sample".to_string(), "10".to_string()),
            ("b_sample".to_string(), "1".to_string()),
            ("b_sample".to_string(), "2".to_string()),
        ]
    );
}

#[test]
fn test_acquisition_date() {
    let dir = tempdir().unwrap();
    write_experiment(dir.path(), "S", "1", &[]);

    let catalog = ExperimentCatalog::scan(dir.path()).unwrap();
    let expected = Local.timestamp_opt(DATE, 0).unwrap().date_naive();
    assert_eq!(catalog.experiments()[0].date, expected);
}

#[test]
fn test_invalid_date() {
    let dir = tempdir().unwrap();
    let exp = write_experiment(dir.path(), "S", "1", &[]);
    fs::write(exp.join(ACQUISITION_FILE), "##$DATE= yesterday\n").unwrap();

    let err = ExperimentCatalog::scan(dir.path()).unwrap_err();
    assert!(matches!(err, CatalogError::InvalidDate { .. }));

    fs::write(exp.join(ACQUISITION_FILE), "##$NS= 8\n").unwrap();
    let err = ExperimentCatalog::scan(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Resolve {
            source: ResolveError::KeyNotFound(_),
            ..
        }
    ));
}

#[test]
fn test_malformed_second_dimension_propagates() {
    let dir = tempdir().unwrap();
    let exp = write_experiment(dir.path(), "S", "2", &[SERIAL_DATA_FILE]);
    fs::write(exp.join(ACQUISITION_2D_FILE), "##$D= (0..3)\n0 1\n").unwrap();

    match ExperimentCatalog::scan(dir.path()) {
        Err(CatalogError::Param { path, source }) => {
            assert!(path.ends_with(ACQUISITION_2D_FILE));
            assert!(matches!(source, crate::params::ParamError::ArrayLength { .. }));
        }
        other => panic!("expected parameter error, got {:?}", other),
    }
}

#[test]
fn test_missing_second_dimension_file() {
    let dir = tempdir().unwrap();
    write_experiment(dir.path(), "S", "2", &[SERIAL_DATA_FILE]);

    let err = ExperimentCatalog::scan(dir.path()).unwrap_err();
    assert!(matches!(err, CatalogError::Param { .. }));
}

#[test]
fn test_non_experiment_directories() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("notes")).unwrap();
    fs::write(dir.path().join("notes").join("readme.txt"), "hello").unwrap();

    let catalog = ExperimentCatalog::scan(dir.path()).unwrap();
    assert!(catalog.is_empty());
    assert!(ExperimentDescriptor::from_dir(&dir.path().join("notes"))
        .unwrap()
        .is_none());
}

#[test]
fn test_missing_root() {
    let dir = tempdir().unwrap();
    let err = ExperimentCatalog::scan(dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
}

#[test]
fn test_pdata_dir() {
    let dir = tempdir().unwrap();
    let exp = write_experiment(dir.path(), "S", "5", &[]);
    let e = ExperimentDescriptor::from_dir(&exp).unwrap().unwrap();
    assert_eq!(e.pdata_dir(1), exp.join("pdata").join("1"));
    assert_eq!(e.manip, "S");
    assert_eq!(e.expno, "5");
}
