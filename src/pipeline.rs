use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::animation::model::Animation;
use crate::assemble::frames::{AssembledAnimation, assemble};
use crate::codec::apng_sink::{ApngSink, CompressionLevel, FrameSink};
use crate::codec::gif_source::{FrameSource, GifSource};
use crate::foundation::error::{GifSquareError, GifSquareResult};
use crate::geometry::normalize::{DEFAULT_MAX_DIM, normalize_geometry};
use crate::palette::unify::{UnifyReport, unify_palettes};

/// Suffix appended to every input file name.
pub const OUTPUT_SUFFIX: &str = ".png";

/// Conversion controls shared by every file of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertOpts {
    /// Maximum side of an output frame, in pixels.
    pub max_dim: u32,
    /// Deflate effort of the output stream.
    pub compression: CompressionLevel,
}

impl Default for ConvertOpts {
    fn default() -> Self {
        Self {
            max_dim: DEFAULT_MAX_DIM,
            compression: CompressionLevel::Best,
        }
    }
}

/// What normalization did to one animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertReport {
    pub frames: usize,
    pub unify: UnifyReport,
    /// Side of the largest output frame.
    pub side: u32,
}

/// Aggregated batch counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Output files written, in processing order.
    pub written: Vec<PathBuf>,
    /// Total frames across all files.
    pub frames_total: u64,
}

/// Unify palettes, square and bound every frame, then assemble output descriptors.
///
/// Pipeline:
/// 1. [`unify_palettes`](crate::unify_palettes)
/// 2. [`normalize_geometry`](crate::normalize_geometry)
/// 3. [`assemble`](crate::assemble)
pub fn normalize_animation(
    mut anim: Animation,
    opts: &ConvertOpts,
) -> GifSquareResult<(AssembledAnimation, ConvertReport)> {
    if anim.is_empty() {
        return Err(GifSquareError::validation("animation has no frames"));
    }
    let unify = unify_palettes(&mut anim.frames);
    normalize_geometry(&mut anim.frames, opts.max_dim)?;

    let report = ConvertReport {
        frames: anim.frames.len(),
        unify,
        side: anim.frames.iter().map(|f| f.width()).max().unwrap_or(0),
    };
    Ok((assemble(anim), report))
}

/// Decode a GIF from `reader`, normalize it and write an APNG to `out`.
pub fn convert_stream(
    reader: &mut dyn std::io::Read,
    out: &mut dyn Write,
    opts: &ConvertOpts,
) -> GifSquareResult<ConvertReport> {
    let anim = GifSource.decode(reader)?;
    let (assembled, report) = normalize_animation(anim, opts)?;
    ApngSink::new(opts.compression).encode(&assembled, out)?;
    Ok(report)
}

/// In-memory variant of [`convert_stream`].
pub fn convert_bytes(gif_bytes: &[u8], opts: &ConvertOpts) -> GifSquareResult<Vec<u8>> {
    let mut out: Vec<u8> = Vec::new();
    convert_stream(&mut &gif_bytes[..], &mut out, opts)?;
    Ok(out)
}

/// Convert one file on disk.
#[tracing::instrument(skip_all, fields(input = %in_path.display()))]
pub fn convert_file(
    in_path: &Path,
    out_path: &Path,
    opts: &ConvertOpts,
) -> GifSquareResult<ConvertReport> {
    let src = File::open(in_path).map_err(|e| GifSquareError::io(in_path, e))?;
    let mut reader = BufReader::new(src);
    let mut encoded: Vec<u8> = Vec::new();
    let report = convert_stream(&mut reader, &mut encoded, opts)?;

    // Only a fully encoded stream reaches the destination.
    std::fs::write(out_path, &encoded).map_err(|e| GifSquareError::io(out_path, e))?;

    tracing::info!(
        output = %out_path.display(),
        frames = report.frames,
        side = report.side,
        strategy = ?report.unify.strategy,
        "converted"
    );
    Ok(report)
}

/// Regular files in `dir` with a `.gif` extension, sorted by file name.
pub fn list_gif_files(dir: &Path) -> GifSquareResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| GifSquareError::io(dir, e))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| GifSquareError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| GifSquareError::io(entry.path(), e))?;
        let path = entry.path();
        if !file_type.is_dir() && path.extension().is_some_and(|ext| ext == "gif") {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Output path for `input`: its file name plus [`OUTPUT_SUFFIX`], inside `out_dir`.
pub fn output_path_for(input: &Path, out_dir: &Path) -> PathBuf {
    let mut name = input.file_name().unwrap_or_default().to_os_string();
    name.push(OUTPUT_SUFFIX);
    out_dir.join(name)
}

/// Convert every `.gif` in `in_dir` into `out_dir`, one file at a time.
///
/// The first failure aborts the batch; files converted before it stay on disk.
#[tracing::instrument(skip_all, fields(in_dir = %in_dir.display(), out_dir = %out_dir.display()))]
pub fn convert_dir(
    in_dir: &Path,
    out_dir: &Path,
    opts: &ConvertOpts,
) -> GifSquareResult<BatchStats> {
    let inputs = list_gif_files(in_dir)?;
    std::fs::create_dir_all(out_dir).map_err(|e| GifSquareError::io(out_dir, e))?;

    let mut stats = BatchStats::default();
    for input in inputs {
        let output = output_path_for(&input, out_dir);
        let report = convert_file(&input, &output, opts).map_err(|e| {
            GifSquareError::Other(
                anyhow::Error::new(e).context(format!("convert '{}'", input.display())),
            )
        })?;
        stats.frames_total += report.frames as u64;
        stats.written.push(output);
    }
    Ok(stats)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
