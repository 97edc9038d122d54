//! Command-line front end over `pdftools-core`
//!
//! Reads inputs from disk, runs the same operations as the browser tools and
//! writes the resulting artifact next to the other outputs.

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};
use pdftools_core::{
    compress_pdf, merge_documents, process_json, split_range, Artifact,
    ArtifactKind, CompressionReport, DocumentInfo, ImageBatch, PageRange, ProcessResult,
    SelectedFile, ToolsConfig,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pdftools")]
#[command(version, about = "Merge, split, compress and build PDFs")]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory artifacts are written to
    #[arg(long, global = true, default_value = ".")]
    pub out_dir: PathBuf,

    /// Exact output path, overriding the generated file name
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print page count, version and metadata as JSON
    Info { file: PathBuf },
    /// Concatenate PDFs in the given order
    Merge {
        #[arg(required = true, num_args = 2..)]
        files: Vec<PathBuf>,
    },
    /// Keep pages START..=END (1-based)
    Split {
        file: PathBuf,
        #[arg(long)]
        start: i64,
        #[arg(long)]
        end: i64,
    },
    /// Re-serialize with unused objects pruned
    Compress { file: PathBuf },
    /// One page per PNG or JPEG image
    ImagesToPdf {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Execute a JSON tool command file and print the result
    Run { command: PathBuf },
}

/// MIME type guessed from the file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "",
    }
}

pub fn read_input(path: &Path) -> Result<SelectedFile> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(SelectedFile::new(name, mime_for(path), bytes))
}

pub fn load_config(path: Option<&Path>) -> Result<ToolsConfig> {
    let Some(path) = path else {
        return Ok(ToolsConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    ToolsConfig::from_json(&json).with_context(|| format!("parsing config {}", path.display()))
}

pub fn info(path: &Path) -> Result<DocumentInfo> {
    let file = read_input(path)?;
    Ok(DocumentInfo::probe(&file.bytes)?)
}

pub fn merge(paths: &[PathBuf], timestamp_ms: i64) -> Result<Artifact> {
    if paths.len() < 2 {
        bail!("Please select both PDF files to merge");
    }
    let files = paths
        .iter()
        .map(|p| read_input(p))
        .collect::<Result<Vec<_>>>()?;
    let documents: Vec<&[u8]> = files.iter().map(|f| f.bytes.as_slice()).collect();
    let merged = merge_documents(&documents)?;
    Ok(Artifact::new(ArtifactKind::Merged, merged, timestamp_ms))
}

pub fn split(path: &Path, start: i64, end: i64, timestamp_ms: i64) -> Result<Artifact> {
    let file = read_input(path)?;
    let bytes = split_range(&file.bytes, start, end)?;
    // split_range has already validated the bounds
    let range = PageRange {
        start: start as u32,
        end: end as u32,
    };
    Ok(Artifact::new(ArtifactKind::Split(range), bytes, timestamp_ms))
}

pub fn compress(path: &Path, timestamp_ms: i64) -> Result<(Artifact, CompressionReport)> {
    let file = read_input(path)?;
    let compressed = compress_pdf(&file.bytes)?;
    let report = CompressionReport::new(file.bytes.len(), compressed.len());
    Ok((
        Artifact::new(ArtifactKind::Compressed, compressed, timestamp_ms),
        report,
    ))
}

pub fn images_to_pdf(
    paths: &[PathBuf],
    config: &ToolsConfig,
    timestamp_ms: i64,
) -> Result<Artifact> {
    let files = paths
        .iter()
        .map(|p| read_input(p))
        .collect::<Result<Vec<_>>>()?;
    let mut batch = ImageBatch::new(config.max_image_files);
    batch.replace(files)?;
    let pdf = batch.convert()?;
    Ok(Artifact::new(ArtifactKind::ImagesToPdf, pdf, timestamp_ms))
}

pub fn run_command(path: &Path, timestamp_ms: i64) -> Result<ProcessResult> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading command {}", path.display()))?;
    Ok(process_json(&json, timestamp_ms)?)
}

/// Where an artifact lands: `output` if given, else its own name in `out_dir`.
pub fn artifact_path(file_name: &str, output: Option<&Path>, out_dir: &Path) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => out_dir.join(file_name),
    }
}

pub fn write_artifact(
    artifact: &Artifact,
    output: Option<&Path>,
    out_dir: &Path,
) -> Result<PathBuf> {
    let path = artifact_path(&artifact.file_name, output, out_dir);
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = artifact.len(), "artifact written");
    Ok(path)
}

/// Run one parsed invocation; returns the line printed on stdout.
pub fn execute(cli: &Cli, timestamp_ms: i64) -> Result<String> {
    let config = load_config(cli.config.as_deref())?;
    let output = cli.output.as_deref();

    let artifact = match &cli.command {
        Command::Info { file } => {
            return Ok(serde_json::to_string_pretty(&info(file)?)?);
        }
        Command::Run { command } => {
            let result = run_command(command, timestamp_ms)?;
            if let (Some(data), Some(name)) = (&result.data, &result.file_name) {
                let path = artifact_path(name, output, &cli.out_dir);
                let bytes = STANDARD.decode(data).context("decoding command output")?;
                std::fs::write(&path, bytes)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            return Ok(serde_json::to_string_pretty(&result)?);
        }
        Command::Merge { files } => merge(files, timestamp_ms)?,
        Command::Split { file, start, end } => split(file, *start, *end, timestamp_ms)?,
        Command::Compress { file } => {
            let (artifact, report) = compress(file, timestamp_ms)?;
            let path = write_artifact(&artifact, output, &cli.out_dir)?;
            return Ok(format!("{}\n{}", report.summary(), path.display()));
        }
        Command::ImagesToPdf { images } => images_to_pdf(images, &config, timestamp_ms)?,
    };

    let path = write_artifact(&artifact, output, &cli.out_dir)?;
    Ok(path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use lopdf::{dictionary, Document, Object, Stream};
    use pdftools_core::get_page_count;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn pdf_bytes(pages: u32) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                    "Contents" => content_id,
                })
                .into()
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => pages as i64,
                "Kids" => kids,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    fn write_pdf(dir: &TempDir, name: &str, pages: u32) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, pdf_bytes(pages)).unwrap();
        path
    }

    fn write_png(dir: &TempDir, name: &str) -> PathBuf {
        let mut bytes = Vec::new();
        RgbImage::from_pixel(3, 2, Rgb([0, 90, 200]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn cli(dir: &TempDir, args: &[&str]) -> Cli {
        let out_dir = dir.path().to_string_lossy().into_owned();
        let mut argv = vec!["pdftools", "--out-dir", out_dir.as_str()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for(Path::new("a.PDF")), "application/pdf");
        assert_eq!(mime_for(Path::new("b.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("c.png")), "image/png");
        assert_eq!(mime_for(Path::new("noext")), "");
    }

    #[test]
    fn test_merge_writes_named_artifact() {
        let dir = TempDir::new().unwrap();
        let a = write_pdf(&dir, "a.pdf", 2);
        let b = write_pdf(&dir, "b.pdf", 1);

        let args = cli(&dir, &["merge", a.to_str().unwrap(), b.to_str().unwrap()]);
        let printed = execute(&args, 1000).unwrap();

        let out = dir.path().join("merged-1000.pdf");
        assert_eq!(printed, out.display().to_string());
        assert_eq!(get_page_count(&std::fs::read(out).unwrap()).unwrap(), 3);
    }

    #[test]
    fn test_merge_needs_two_files() {
        let dir = TempDir::new().unwrap();
        let a = write_pdf(&dir, "a.pdf", 1);
        assert!(Cli::try_parse_from(["pdftools", "merge", a.to_str().unwrap()]).is_err());
        assert!(merge(&[a], 1).is_err());
    }

    #[test]
    fn test_split_respects_output_flag() {
        let dir = TempDir::new().unwrap();
        let src = write_pdf(&dir, "doc.pdf", 10);
        let target = dir.path().join("part.pdf");

        let args = cli(
            &dir,
            &[
                "split",
                src.to_str().unwrap(),
                "--start",
                "3",
                "--end",
                "5",
                "-o",
                target.to_str().unwrap(),
            ],
        );
        execute(&args, 1).unwrap();
        assert_eq!(get_page_count(&std::fs::read(&target).unwrap()).unwrap(), 3);
    }

    #[test]
    fn test_split_rejects_bad_range() {
        let dir = TempDir::new().unwrap();
        let src = write_pdf(&dir, "doc.pdf", 4);
        let err = split(&src, 3, 9, 1).unwrap_err();
        assert_eq!(err.to_string(), "Invalid page range. PDF has 4 page(s).");
        let artifact = split(&src, 2, 3, 7).unwrap();
        assert_eq!(artifact.file_name, "split-pages-2-3-7.pdf");
    }

    #[test]
    fn test_split_corrupt_file_shows_split_message() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("bad.pdf");
        std::fs::write(&src, b"%PDF-1.4 this is not really a pdf").unwrap();
        let err = split(&src, 1, 1, 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to split PDF. Please ensure the file is a valid PDF document."
        );
    }

    #[test]
    fn test_compress_prints_summary() {
        let dir = TempDir::new().unwrap();
        let src = write_pdf(&dir, "doc.pdf", 3);
        let printed = execute(&cli(&dir, &["compress", src.to_str().unwrap()]), 5).unwrap();
        assert!(printed.contains("Reduction:"));
        assert!(dir.path().join("compressed-5.pdf").exists());
    }

    #[test]
    fn test_images_to_pdf_honours_config_limit() {
        let dir = TempDir::new().unwrap();
        let one = write_png(&dir, "one.png");
        let two = write_png(&dir, "two.png");

        let artifact =
            images_to_pdf(&[one.clone(), two.clone()], &ToolsConfig::default(), 9).unwrap();
        assert_eq!(artifact.file_name, "images-to-pdf-9.pdf");
        assert_eq!(get_page_count(&artifact.bytes).unwrap(), 2);

        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"maxImageFiles": 1}"#).unwrap();
        let config = load_config(Some(&config_path)).unwrap();
        let err = images_to_pdf(&[one, two], &config, 9).unwrap_err();
        assert_eq!(err.to_string(), "Maximum 1 file(s) allowed");
    }

    #[test]
    fn test_info_reports_pages() {
        let dir = TempDir::new().unwrap();
        let src = write_pdf(&dir, "doc.pdf", 4);
        let printed = execute(&cli(&dir, &["info", src.to_str().unwrap()]), 1).unwrap();
        let value: serde_json::Value = serde_json::from_str(&printed).unwrap();
        assert_eq!(value["page_count"], 4);
    }

    #[test]
    fn test_run_command_file() {
        let dir = TempDir::new().unwrap();
        let data = STANDARD.encode(pdf_bytes(2));
        let command = dir.path().join("cmd.json");
        std::fs::write(
            &command,
            format!(
                r#"{{"type": "Compress", "file": {{"name": "a.pdf", "data": "{}"}}}}"#,
                data
            ),
        )
        .unwrap();

        let printed = execute(&cli(&dir, &["run", command.to_str().unwrap()]), 3).unwrap();
        assert!(printed.contains("\"success\": true"));
        assert!(dir.path().join("compressed-3.pdf").exists());
    }

    #[test]
    fn test_missing_input_has_context() {
        let err = read_input(Path::new("/nonexistent/x.pdf")).unwrap_err();
        assert!(err.to_string().starts_with("reading /nonexistent/x.pdf"));
    }
}
