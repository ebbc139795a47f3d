use std::fs;
use std::io::Write;
use std::path::Path;

use log::info;
use tempfile::NamedTempFile;

use super::{BucketError, BucketList1D, BucketList2D, WindowStats};

/// A bucket list that can be exported as a `#`-commented CSV table
pub trait BucketTable {
    /// Summary comment, written as the first line
    fn summary(&self) -> String;

    /// Column names
    fn header(&self) -> Vec<&'static str>;

    /// One formatted record per bucket
    fn records(&self) -> Vec<Vec<String>>;
}

fn stat_cells(stats: &WindowStats) -> Vec<String> {
    let mut cells = vec![
        format!("{:.1}", stats.max),
        format!("{:.1}", stats.min),
        format!("{:.1}", stats.std),
    ];
    if let Some(m) = stats.moments {
        cells.push(format!("{:.3}", m.skew));
        cells.push(format!("{:.3}", m.kurtosis));
    }
    cells
}

fn stat_header(header: &mut Vec<&'static str>, moments: bool) {
    header.extend(["max", "min", "std"]);
    if moments {
        header.extend(["skew", "kurtosis"]);
    }
}

impl BucketTable for BucketList1D {
    fn summary(&self) -> String {
        format!(
            "# {} buckets with a mean size of {:.2} data points",
            self.nominal_count(),
            self.mean_points()
        )
    }

    fn header(&self) -> Vec<&'static str> {
        let mut header = vec!["center", "integral"];
        stat_header(&mut header, self.moments);
        header.push("pointcount");
        header
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.buckets
            .iter()
            .map(|b| {
                let mut row = vec![format!("{:.3}", b.center), format!("{:.1}", b.integral)];
                row.extend(stat_cells(&b.stats));
                row.push(b.stats.count.to_string());
                row
            })
            .collect()
    }
}

impl BucketTable for BucketList2D {
    fn summary(&self) -> String {
        let (p1, p2) = self.mean_points();
        format!(
            "# {} rectangular buckets with a mean size of {:.2} x {:.2} data points",
            self.nominal_count(),
            p1,
            p2
        )
    }

    fn header(&self) -> Vec<&'static str> {
        let mut header = vec!["center1", "center2", "integral"];
        stat_header(&mut header, self.moments);
        header.extend(["pointcount1", "pointcount2"]);
        header
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.buckets
            .iter()
            .map(|b| {
                let mut row = vec![
                    format!("{:.3}", b.center1),
                    format!("{:.3}", b.center2),
                    format!("{:.1}", b.integral),
                ];
                row.extend(stat_cells(&b.stats));
                row.push(b.points1.to_string());
                row.push(b.points2.to_string());
                row
            })
            .collect()
    }
}

/// Write `table` as CSV: summary comment, header, one row per bucket
pub fn write_table<T: BucketTable + ?Sized, W: Write>(
    table: &T,
    mut out: W,
) -> Result<(), BucketError> {
    writeln!(out, "{}", table.summary())?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(table.header())?;
    for record in table.records() {
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `table` to `path`, creating parent directories
///
/// The file only appears once fully written.
pub fn write_table_file<T: BucketTable + ?Sized>(table: &T, path: &Path) -> Result<(), BucketError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    write_table(table, &mut tmp)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    info!("{} -> {}", table.summary().trim_start_matches("# "), path.display());
    Ok(())
}
