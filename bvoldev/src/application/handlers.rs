use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bvol_core::{
    Analysis, AnalysisRequest, Analyzer, MeasurementEngine, MemArtifactStore, MoleculeRecord,
    MoleculeRegistry, NativeEngine, NativeRenderer, Result, Structure, read_xyz, resolve_center,
};

fn load(path: &Path) -> Result<Structure> {
    let mut reader = BufReader::new(File::open(path)?);
    Ok(read_xyz(&mut reader)?)
}

fn engine(spacing: Option<f64>) -> NativeEngine {
    match spacing {
        Some(s) => NativeEngine::default().with_spacing(s),
        None => NativeEngine::default(),
    }
}

fn analyzer(spacing: Option<f64>) -> Analyzer {
    Analyzer::new(
        Arc::new(engine(spacing)),
        Arc::new(NativeRenderer::default()),
    )
}

fn analyze_file(path: &Path, request: &AnalysisRequest, spacing: Option<f64>) -> Result<Analysis> {
    let structure = load(path)?;
    analyzer(spacing).analyze(&structure, request)
}

pub fn handle_analyze(
    file: PathBuf,
    exclude: Vec<usize>,
    z_axis: Vec<usize>,
    fallback: Vec<usize>,
    sterimol: bool,
    map: Option<PathBuf>,
    spacing: Option<f64>,
) -> Result<()> {
    let request = AnalysisRequest {
        excluded_atoms: exclude,
        z_axis_atoms: z_axis,
        fallback_centers: fallback,
        use_sterimol: sterimol,
    };
    let analysis = analyze_file(&file, &request, spacing)?;

    println!(
        "center {}  radius {:.3}  buried volume {:.4}",
        analysis.center, analysis.radius, analysis.buried_volume_fraction
    );
    match (map, analysis.steric_map) {
        (Some(out), Some(png)) => {
            std::fs::write(&out, png)?;
            eprintln!("map: {}", out.display());
        }
        (Some(_), None) => eprintln!("map: skipped, no --z-axis atoms given"),
        _ => {}
    }
    Ok(())
}

/// Files that fail to load or analyze are reported and skipped.
fn batch_records(
    files: &[PathBuf],
    request: &AnalysisRequest,
    spacing: Option<f64>,
) -> Vec<MoleculeRecord> {
    let registry = MoleculeRegistry::new(analyzer(spacing), Arc::new(MemArtifactStore::new()));
    for file in files {
        if let Err(e) = load(file).and_then(|s| registry.ingest(&s, request)) {
            eprintln!("batch: {}: {e}", file.display());
        }
    }
    registry.list()
}

pub fn handle_batch(
    files: Vec<PathBuf>,
    z_axis: Vec<usize>,
    fallback: Vec<usize>,
    spacing: Option<f64>,
) -> Result<()> {
    let request = AnalysisRequest {
        z_axis_atoms: z_axis,
        fallback_centers: fallback,
        ..Default::default()
    };
    for rec in batch_records(&files, &request, spacing) {
        println!(
            "{}  {}  {:.4}  {}",
            rec.id,
            rec.created_at_rfc3339(),
            rec.buried_volume_fraction,
            rec.name
        );
    }
    Ok(())
}

pub fn handle_center(file: PathBuf, fallback: Vec<usize>) -> Result<()> {
    let structure = load(&file)?;
    let center = resolve_center(&structure.elements, &fallback)?;
    let element = structure
        .elements
        .get(center)
        .map_or("<out of range>", String::as_str);
    println!("{center} {element}");
    Ok(())
}

pub fn handle_sterimol(file: PathBuf, dummy: usize, attached: usize) -> Result<()> {
    let structure = load(&file)?;
    let params = NativeEngine::default().sterimol(
        &structure.elements,
        &structure.coordinates,
        dummy,
        attached,
    )?;
    println!(
        "L {:.3}  B1 {:.3}  B5 {:.3}  radius {:.3}",
        params.l,
        params.b1,
        params.b5,
        params.min_dimension()
    );
    Ok(())
}
