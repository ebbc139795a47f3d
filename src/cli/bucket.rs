use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::io;
use std::path::{Path, PathBuf};

use nmrscan::bucket::{
    bucket1d, bucket2d, write_table, write_table_file, AxisCalibration, BucketConfig,
    BucketList1D, BucketList2D, BucketOptions, BucketTable, NucleusBuckets,
};
use nmrscan::catalog::{ACQUISITION_FILE, GRADIENT_LIST_FILE};
use nmrscan::nucleus::Nucleus;
use nmrscan::params::ParameterSet;
use nmrscan::spectrum::{ProcessedAxis, ProcessedSpectrum, Spectrum1D, Spectrum2D};

use super::RunConfig;

/// Bucket table of either dimensionality
pub enum Buckets {
    OneD(BucketList1D),
    TwoD(BucketList2D),
}

impl Buckets {
    pub fn table(&self) -> &dyn BucketTable {
        match self {
            Buckets::OneD(list) => list,
            Buckets::TwoD(list) => list,
        }
    }
}

/// Bucket one processed spectrum
pub fn run(
    pdata: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    zoom: Option<(f64, f64)>,
    size: Option<f64>,
    moments: bool,
) -> Result<()> {
    let mut config = RunConfig::load(config.as_deref())?;
    config.bucket.moments |= moments;

    let spectrum = ProcessedSpectrum::read(&pdata)
        .with_context(|| format!("Failed to read processed data in {}", pdata.display()))?;
    let experiment = experiment_dir(&pdata);
    let dosy = experiment.is_some_and(|dir| dir.join(GRADIENT_LIST_FILE).is_file());

    let buckets = match spectrum {
        ProcessedSpectrum::OneD(spectrum) if zoom.is_some() || size.is_some() => {
            let settings = nucleus_settings(&config.bucket, &spectrum.axis, experiment).ok();
            let zoom = zoom
                .or(settings.map(|s| s.limits))
                .context("No --zoom given and no configured limits for this nucleus")?;
            let size = size
                .or(settings.map(|s| s.size_1d))
                .context("No --size given and no configured size for this nucleus")?;
            Buckets::OneD(bucket1d(
                &spectrum.data,
                &spectrum.axis.axis,
                zoom,
                size,
                options(&config.bucket),
            )?)
        }
        spectrum => bucket_spectrum(&spectrum, experiment, dosy, &config.bucket)?,
    };

    match output {
        Some(path) => {
            write_table_file(buckets.table(), &path)?;
            println!("{}: {}", path.display(), buckets.table().summary());
        }
        None => write_table(buckets.table(), io::stdout().lock())?,
    }
    Ok(())
}

/// Bucket `spectrum` with the configured limits of its nuclei
///
/// `experiment` is the acquisition directory, used to guess the nucleus of a 1-D
/// axis that does not declare one.
pub fn bucket_spectrum(
    spectrum: &ProcessedSpectrum,
    experiment: Option<&Path>,
    dosy: bool,
    config: &BucketConfig,
) -> Result<Buckets> {
    match spectrum {
        ProcessedSpectrum::OneD(spectrum) => bucket_1d(spectrum, experiment, config).map(Buckets::OneD),
        ProcessedSpectrum::TwoD(spectrum) => {
            bucket_2d(spectrum, experiment, dosy, config).map(Buckets::TwoD)
        }
    }
}

fn bucket_1d(
    spectrum: &Spectrum1D,
    experiment: Option<&Path>,
    config: &BucketConfig,
) -> Result<BucketList1D> {
    let settings = nucleus_settings(config, &spectrum.axis, experiment)?;
    Ok(bucket1d(
        &spectrum.data,
        &spectrum.axis.axis,
        settings.limits,
        settings.size_1d,
        options(config),
    )?)
}

fn bucket_2d(
    spectrum: &Spectrum2D,
    experiment: Option<&Path>,
    dosy: bool,
    config: &BucketConfig,
) -> Result<BucketList2D> {
    let f2 = nucleus_settings(config, &spectrum.f2, experiment)?;
    let (zoom1, size1) = if dosy {
        let size = config.dosy_size;
        (spectrum.f1.axis.full_zoom(size), size)
    } else {
        let f1 = nucleus_settings(config, &spectrum.f1, None)?;
        (f1.limits, f1.size_2d)
    };
    debug!(
        "2D zoom {:?} x {:?}, sizes {} x {}",
        zoom1, f2.limits, size1, f2.size_2d
    );

    Ok(bucket2d(
        spectrum.data.view(),
        (&spectrum.f1.axis, &spectrum.f2.axis),
        (zoom1, f2.limits),
        (size1, f2.size_2d),
        options(config),
    )?)
}

fn nucleus_settings(
    config: &BucketConfig,
    axis: &ProcessedAxis,
    experiment: Option<&Path>,
) -> Result<NucleusBuckets> {
    let nucleus = match axis.nucleus {
        Some(nucleus) => nucleus,
        None => guess_nucleus(experiment)?,
    };
    match config.for_nucleus(nucleus) {
        Some(settings) => Ok(*settings),
        None => bail!("No bucket settings for nucleus {}", nucleus),
    }
}

fn guess_nucleus(experiment: Option<&Path>) -> Result<Nucleus> {
    let Some(dir) = experiment else {
        bail!("Processed axis does not declare its nucleus");
    };
    let path = dir.join(ACQUISITION_FILE);
    let acquisition = ParameterSet::from_file(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let nucleus = Nucleus::from_acquisition(&acquisition)
        .with_context(|| format!("Cannot identify the observed nucleus from {}", path.display()))?;
    info!("{}: observed nucleus guessed as {}", dir.display(), nucleus);
    Ok(nucleus)
}

fn options(config: &BucketConfig) -> BucketOptions {
    BucketOptions {
        moments: config.moments,
    }
}

/// Acquisition directory of `EXPNO/pdata/PROCNO`
pub fn experiment_dir(pdata: &Path) -> Option<&Path> {
    pdata.parent().and_then(Path::parent)
}
