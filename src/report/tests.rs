use super::summary::{analysis_summary, collect_analysis};
use super::*;
use crate::catalog::Dimension;
use crate::params::{parse_str, ResolveError};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

const ACQUS: &str = "##TITLE= Parameter file
##$PULPROG= <zg30>
##$SFO1= 600.13
##$NS= 64
##$TE= 298.0
##$TD= 65536
##$RG= 101
##$SW= 20.02
##$O1= 2820.61
##$D= (0..31)
0 2 0 0 0 0 0 0 0 0 0 0 0 0 0 0
0 0 0 0 0.1 0 0 0 0 0 0 0 0 0 0 0
##$P= (0..31)
0 9.5 0 0 0 0 0 0 0 0 0 0 0 0 0 0
0 0 0 0 0 0 0 0 0 0 0 0 0 0 1000 0
##$FnMODE= 0
##END=
";

const ACQU2S: &str = "##$SFO1= 150.9
##$TD= 256
##$SW= 180.0
##END=
";

fn experiment(manip: &str, expno: &str, kind: &str) -> ExperimentDescriptor {
    let two_d = kind != "1D";
    ExperimentDescriptor {
        manip: manip.to_string(),
        expno: expno.to_string(),
        path: PathBuf::from(format!("/nonexistent/{}/{}", manip, expno)),
        date: NaiveDate::from_ymd_opt(2016, 3, 3).unwrap(),
        dimension: if two_d {
            Dimension::TwoD
        } else {
            Dimension::OneD
        },
        is_dosy: kind == "DOSY",
        acquisition: parse_str(ACQUS).unwrap(),
        acquisition_2d: two_d.then(|| parse_str(ACQU2S).unwrap()),
    }
}

fn data_lines(report: &str) -> Vec<&str> {
    report.lines().skip(3).collect()
}

#[test]
fn test_report_layout() {
    let builder = ReportBuilder::default();
    let report = builder
        .build(Path::new("/data/run"), &[experiment("PFDA", "1", "1D")])
        .unwrap();
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(lines[0], "# report from /data/run");
    assert_eq!(lines[1], "#,,,parameters,,,,,,,,,,2D,,,,,,DOSY,");
    assert_eq!(
        lines[2],
        "manip,expno,date,PULPROG,SFO1,NS,TE,TD,RG,SW,O1,D1,P1,SFO1,TD,SW,O1,D9,FnMODE,D20,P30"
    );
    assert_eq!(
        lines[3],
        "PFDA,1,2016-03-03,zg30,600.13,64,298.0,65536,101,20.02,2820.61,2,9.5,-,-,-,-,-,-,-,-"
    );
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_section_labels_align_with_header() {
    let columns = ReportColumns::default();
    for include_title in [false, true] {
        let line = columns.section_labels(include_title);
        let labels: Vec<&str> = line.split(',').collect();
        let header = columns.header(include_title);
        assert_eq!(labels.len(), header.len());
        assert_eq!(header[labels.iter().position(|l| *l == "parameters").unwrap()], "PULPROG");
        assert_eq!(header[labels.iter().position(|l| *l == "DOSY").unwrap()], "D20");
        if include_title {
            assert_eq!(header[labels.iter().position(|l| *l == "title").unwrap()], "product");
        }
    }
}

#[test]
fn test_blank_line_between_manips() {
    let experiments = [
        experiment("A", "1", "1D"),
        experiment("A", "2", "1D"),
        experiment("B", "1", "1D"),
        experiment("C", "1", "1D"),
    ];
    let report = ReportBuilder::default()
        .build(Path::new("root"), &experiments)
        .unwrap();
    let lines = data_lines(&report);

    assert!(lines[0].starts_with("A,1,"));
    assert!(lines[1].starts_with("A,2,"));
    assert_eq!(lines[2], "");
    assert!(lines[3].starts_with("B,1,"));
    assert_eq!(lines[4], "");
    assert!(lines[5].starts_with("C,1,"));
    assert_eq!(lines.iter().filter(|l| l.is_empty()).count(), 2);
}

#[test]
fn test_two_dimensional_fallback() {
    let report = ReportBuilder::default()
        .build(Path::new("root"), &[experiment("S", "2", "2D")])
        .unwrap();
    let row: Vec<&str> = data_lines(&report)[0].split(',').collect();

    // SFO1 TD SW from acqu2s, O1 D9 FnMODE from acqus
    assert_eq!(&row[13..19], &["150.9", "256", "180.0", "2820.61", "0", "0"]);
    assert_eq!(&row[19..], &["-", "-"]);
}

#[test]
fn test_dosy_columns() {
    let report = ReportBuilder::default()
        .build(Path::new("root"), &[experiment("S", "3", "DOSY")])
        .unwrap();
    let row: Vec<&str> = data_lines(&report)[0].split(',').collect();
    assert_eq!(&row[19..], &["0.1", "1000"]);
}

#[test]
fn test_missing_parameter_is_fatal() {
    let mut columns = ReportColumns::default();
    columns.extend(vec!["NOPE".to_string()], vec![], vec![]);
    let builder = ReportBuilder::new(columns, ParamResolver::default());

    let err = builder
        .build(
            Path::new("root"),
            &[experiment("S", "1", "1D"), experiment("S", "2", "1D")],
        )
        .unwrap_err();
    match err {
        ReportError::Resolve { manip, expno, source } => {
            assert_eq!(manip, "S");
            assert_eq!(expno, "1");
            assert_eq!(source, ResolveError::KeyNotFound("$NOPE".to_string()));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_index_out_of_range_is_fatal() {
    let mut columns = ReportColumns::default();
    columns.extend(vec!["D40".to_string()], vec![], vec![]);
    let err = ReportBuilder::new(columns, ParamResolver::default())
        .row(&experiment("S", "1", "1D"))
        .unwrap_err();
    assert!(matches!(
        err,
        ReportError::Resolve {
            source: ResolveError::IndexOutOfRange { .. },
            ..
        }
    ));
}

#[test]
fn test_title_columns() {
    let dir = tempdir().unwrap();
    let mut with_title = experiment("S", "1", "1D");
    with_title.path = dir.path().join("S").join("1");
    let pdata = with_title.path.join("pdata").join("1");
    fs::create_dir_all(&pdata).unwrap();
    fs::write(pdata.join("title"), "[PFDA] = 10 mM, ds DMSO 298K\nEMGE_016").unwrap();

    let mut without_title = experiment("S", "2", "1D");
    without_title.path = dir.path().join("S").join("2");

    let builder = ReportBuilder::default().with_title(true);
    let row = builder.row(&with_title).unwrap();
    assert_eq!(row.len(), builder.columns().width(true));
    assert_eq!(&row[21..25], &["PFDA", "10 mM", "DMSO", "298"]);
    assert_eq!(row[25], "EMGE_016");

    let row = builder.row(&without_title).unwrap();
    assert!(row[21..].iter().all(|cell| cell == NO_TITLE_FILE));
}

#[test]
fn test_write_to_and_stats() {
    let dir = tempdir().unwrap();
    for (manip, expno) in [("A", "1"), ("A", "2"), ("B", "1")] {
        let exp = dir.path().join(manip).join(expno);
        fs::create_dir_all(&exp).unwrap();
        fs::write(
            exp.join("acqus"),
            format!("{}##$DATE= 1457000000\n", ACQUS.replace("##END=\n", "")),
        )
        .unwrap();
    }
    let catalog = ExperimentCatalog::scan(dir.path()).unwrap();
    let out = dir.path().join("report.csv");

    let stats = ReportBuilder::default().write_to(&catalog, &out).unwrap();
    assert_eq!(stats, ReportStats { entries: 3, manips: 2 });
    assert_eq!(stats.to_string(), "found 3 entries in 2 samples");

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written, ReportBuilder::default().build_catalog(&catalog).unwrap());
}

#[test]
fn test_empty_catalog() {
    let report = ReportBuilder::default().build(Path::new("x"), &[]).unwrap();
    assert_eq!(report.lines().count(), 3);
}

#[test]
fn test_analysis_summary() {
    let dir = tempdir().unwrap();
    let sample = dir.path().join("PFDA");
    fs::create_dir_all(sample.join("1D")).unwrap();
    fs::create_dir_all(sample.join("2D")).unwrap();
    fs::write(
        sample.join("1D").join("1_bucketlist.csv"),
        "# 901 buckets with a mean size of 16.38 data points\ncenter\n",
    )
    .unwrap();
    fs::write(
        sample.join("2D").join("DOSY_3_bucketlist.csv"),
        "# 40 rectangular buckets\n",
    )
    .unwrap();
    fs::write(sample.join("1D").join("notes.txt"), "ignored").unwrap();

    let entries = collect_analysis(dir.path()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].expno, "1");
    assert_eq!(entries[0].kind, "1D");
    assert_eq!(entries[1].kind, "DOSY");
    assert_eq!(entries[1].expno, "3");

    let text = analysis_summary(dir.path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "manip, expno, type, file, content");
    assert_eq!(
        lines[2],
        "PFDA,1,1D,1_bucketlist.csv, 901 buckets with a mean size of 16.38 data points"
    );
    assert_eq!(lines[3], "PFDA,3,DOSY,DOSY_3_bucketlist.csv, 40 rectangular buckets");
}
