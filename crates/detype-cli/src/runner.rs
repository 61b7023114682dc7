//! File and directory processing.

use crate::cli::Args;
use crate::config::DetypeConfig;
use camino::{Utf8Path, Utf8PathBuf};
use detype::{FormatError, FormatOptions, Formatter, TransformError, TransformOptions};
use globset::{Glob, GlobSet, GlobSetBuilder};
use prettier_runner::{PrettierError, PrettierRunner};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions picked up when walking a directory.
const INPUT_EXTENSIONS: [&str; 5] = ["ts", "tsx", "mts", "cts", "vue"];

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Output file name is required for .vue files")]
    VueOutputRequired,

    #[error("Output file name is required when removing magic comments")]
    MagicOutputRequired,

    #[error("Output directory is required when the input is a directory")]
    DirectoryOutputRequired,

    #[error("cannot infer an output file name for {0}")]
    UnsupportedInput(Utf8PathBuf),

    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    #[error("invalid config file {path}: {message}")]
    Config { path: Utf8PathBuf, message: String },

    #[error("failed to access {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Prettier(#[from] PrettierError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("{failed} of {total} files failed")]
    FilesFailed { failed: usize, total: usize },
}

/// Writes the output exactly as produced.
#[derive(Debug, Clone, Copy)]
struct Unformatted;

impl Formatter for Unformatted {
    fn format(&self, code: &str, _: &str, _: &FormatOptions) -> Result<String, FormatError> {
        Ok(code.to_string())
    }
}

/// Runs the CLI.
pub fn run(args: Args) -> Result<(), CliError> {
    let cwd = std::env::current_dir()
        .map_err(|source| CliError::Io {
            path: Utf8PathBuf::from("."),
            source,
        })
        .and_then(|p| {
            Utf8PathBuf::try_from(p).map_err(|e| CliError::NonUtf8Path(e.to_string()))
        })?;

    let config = match &args.config {
        Some(path) => DetypeConfig::load(path)?,
        None => match DetypeConfig::find(&cwd)? {
            Some((path, config)) => {
                log::debug!("using config {}", path);
                config
            }
            None => DetypeConfig::default(),
        },
    };

    let options = build_options(&args, &config, &cwd)?;

    if args.input.is_dir() {
        let output = args
            .output
            .as_deref()
            .ok_or(CliError::DirectoryOutputRequired)?;
        let patterns = args.ignore.iter().chain(&config.ignore);
        let ignore = build_ignore_set(patterns)?;
        run_directory(
            &args.input,
            output,
            &ignore,
            &options,
            args.remove_magic_comments,
        )
    } else {
        let output = resolve_output(
            &args.input,
            args.output.as_deref(),
            args.remove_magic_comments,
        )?;
        process_file(&args.input, &output, &options, args.remove_magic_comments)?;
        Ok(())
    }
}

fn build_options(
    args: &Args,
    config: &DetypeConfig,
    cwd: &Utf8Path,
) -> Result<TransformOptions, CliError> {
    let options = TransformOptions::new()
        .remove_ts_comments(args.remove_ts_comments || config.remove_ts_comments)
        .with_format_options(config.prettier_options.clone());
    if args.no_format {
        return Ok(options.with_formatter(Unformatted));
    }
    let prettier = PrettierRunner::discover(cwd.to_owned())?;
    Ok(options.with_formatter(prettier))
}

fn build_ignore_set<'a>(patterns: impl IntoIterator<Item = &'a String>) -> Result<GlobSet, CliError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| CliError::InvalidGlob(e.to_string()))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| CliError::InvalidGlob(e.to_string()))
}

fn is_component(path: &Utf8Path) -> bool {
    path.extension() == Some("vue")
}

/// The JavaScript counterpart of a TypeScript file name.
pub fn infer_output_name(input: &Utf8Path) -> Option<Utf8PathBuf> {
    let ext = match input.extension()? {
        "ts" => "js",
        "tsx" => "jsx",
        "mts" => "mjs",
        "cts" => "cjs",
        _ => return None,
    };
    Some(input.with_extension(ext))
}

/// Where a single input file is written.
///
/// Components and magic-comment removal keep their extension, so they need
/// an explicit output. An existing directory receives the inferred name.
pub fn resolve_output(
    input: &Utf8Path,
    output: Option<&Utf8Path>,
    remove_magic_comments: bool,
) -> Result<Utf8PathBuf, CliError> {
    let keeps_name = remove_magic_comments || is_component(input);
    match output {
        None if remove_magic_comments => Err(CliError::MagicOutputRequired),
        None if is_component(input) => Err(CliError::VueOutputRequired),
        None => infer_output_name(input).ok_or_else(|| CliError::UnsupportedInput(input.to_owned())),
        Some(dir) if dir.is_dir() => {
            let name = if keeps_name {
                input.file_name().map(Utf8PathBuf::from)
            } else {
                infer_output_name(input)
                    .as_deref()
                    .and_then(Utf8Path::file_name)
                    .map(Utf8PathBuf::from)
            };
            name.map(|name| dir.join(name))
                .ok_or_else(|| CliError::UnsupportedInput(input.to_owned()))
        }
        Some(file) => Ok(file.to_owned()),
    }
}

/// Input files under `root`, skipping declaration files and `node_modules`.
fn collect_inputs(root: &Utf8Path, ignore: &GlobSet) -> Vec<Utf8PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != "node_modules")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
        .filter(|p| {
            let file_name = p.file_name().unwrap_or("");
            !file_name.ends_with(".d.ts")
                && p.extension().is_some_and(|ext| INPUT_EXTENSIONS.contains(&ext))
        })
        .filter(|p| {
            let relative = p.strip_prefix(root).unwrap_or(p);
            !ignore.is_match(relative.as_str())
        })
        .collect()
}

fn run_directory(
    input: &Utf8Path,
    output: &Utf8Path,
    ignore: &GlobSet,
    options: &TransformOptions,
    remove_magic_comments: bool,
) -> Result<(), CliError> {
    let files = collect_inputs(input, ignore);
    let failed = AtomicUsize::new(0);

    files.par_iter().for_each(|file| {
        let relative = file.strip_prefix(input).unwrap_or(file);
        let mut target = output.join(relative);
        if !remove_magic_comments && !is_component(file) {
            if let Some(renamed) = infer_output_name(&target) {
                target = renamed;
            }
        }
        if let Err(e) = process_file(file, &target, options, remove_magic_comments) {
            eprintln!("Error: {}", e);
            failed.fetch_add(1, Ordering::Relaxed);
        }
    });

    let failed = failed.into_inner();
    if failed > 0 {
        return Err(CliError::FilesFailed {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}

fn process_file(
    input: &Utf8Path,
    output: &Utf8Path,
    options: &TransformOptions,
    remove_magic_comments: bool,
) -> Result<(), TransformError> {
    log::debug!("{} -> {}", input, output);
    if remove_magic_comments {
        detype::remove_magic_comments_from_file(input.as_std_path(), output.as_std_path(), options)
    } else {
        detype::transform_file(input.as_std_path(), output.as_std_path(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn test_infer_output_name() {
        let infer = |s: &str| infer_output_name(Utf8Path::new(s)).map(|p| p.to_string());
        assert_eq!(infer("src/a.ts").as_deref(), Some("src/a.js"));
        assert_eq!(infer("a.tsx").as_deref(), Some("a.jsx"));
        assert_eq!(infer("a.mts").as_deref(), Some("a.mjs"));
        assert_eq!(infer("a.cts").as_deref(), Some("a.cjs"));
        assert_eq!(infer("a.vue"), None);
        assert_eq!(infer("a.js"), None);
    }

    #[test]
    fn test_output_required_messages() {
        let err = resolve_output(Utf8Path::new("App.vue"), None, false).unwrap_err();
        assert_eq!(err.to_string(), "Output file name is required for .vue files");

        let err = resolve_output(Utf8Path::new("a.ts"), None, true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Output file name is required when removing magic comments"
        );
    }

    #[test]
    fn test_output_into_existing_directory() {
        let (_dir, root) = temp_root();
        let out = resolve_output(Utf8Path::new("src/a.ts"), Some(&root), false).unwrap();
        assert_eq!(out, root.join("a.js"));

        let out = resolve_output(Utf8Path::new("src/App.vue"), Some(&root), false).unwrap();
        assert_eq!(out, root.join("App.vue"));

        let out = resolve_output(Utf8Path::new("src/a.ts"), Some(&root), true).unwrap();
        assert_eq!(out, root.join("a.ts"));
    }

    #[test]
    fn test_explicit_output_file() {
        let out = resolve_output(Utf8Path::new("a.ts"), Some(Utf8Path::new("b.mjs")), false).unwrap();
        assert_eq!(out, Utf8PathBuf::from("b.mjs"));
    }

    #[test]
    fn test_collect_inputs_skips_declarations_and_ignored() {
        let (_dir, root) = temp_root();
        for file in [
            "a.ts",
            "types.d.ts",
            "lib/b.tsx",
            "lib/c.js",
            "lib/App.vue",
            "gen/d.ts",
            "node_modules/pkg/e.ts",
        ] {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
        }
        let ignore = build_ignore_set(&["gen/**".to_string()]).unwrap();

        let mut found: Vec<String> = collect_inputs(&root, &ignore)
            .iter()
            .map(|p| p.strip_prefix(&root).unwrap().as_str().replace('\\', "/"))
            .collect();
        found.sort();
        assert_eq!(found, vec!["a.ts", "lib/App.vue", "lib/b.tsx"]);
    }

    #[test]
    fn test_run_directory_mirrors_structure() {
        let (_dir, root) = temp_root();
        let src = root.join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("a.ts"), "export const a: number = 1;\n").unwrap();
        fs::write(
            src.join("nested/App.vue"),
            "<script setup lang=\"ts\">\nconst n: number = 1;\n</script>\n",
        )
        .unwrap();
        let out = root.join("out");

        run_directory(&src, &out, &GlobSet::empty(), &TransformOptions::default(), false).unwrap();

        assert_eq!(
            fs::read_to_string(out.join("a.js")).unwrap(),
            "export const a = 1;\n"
        );
        assert_eq!(
            fs::read_to_string(out.join("nested/App.vue")).unwrap(),
            "<script setup>\nconst n = 1;\n</script>\n"
        );
    }

    #[test]
    fn test_failed_files_are_counted() {
        let (_dir, root) = temp_root();
        let src = root.join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("good.ts"), "let a: number;\n").unwrap();
        fs::write(src.join("bad.ts"), "let a: = ;\n").unwrap();
        let out = root.join("out");

        let err = run_directory(&src, &out, &GlobSet::empty(), &TransformOptions::default(), false)
            .unwrap_err();
        assert!(matches!(err, CliError::FilesFailed { failed: 1, total: 2 }));
        assert_eq!(fs::read_to_string(out.join("good.js")).unwrap(), "let a;\n");
    }

    #[test]
    fn test_prettier_found_from_working_directory() {
        let (_dir, root) = temp_root();
        let bin = root.join("node_modules/.bin");
        fs::create_dir_all(&bin).unwrap();
        let name = if cfg!(windows) { "prettier.cmd" } else { "prettier" };
        fs::write(bin.join(name), "").unwrap();

        let args = Args::parse_from(["detype", "a.ts"]);
        assert!(build_options(&args, &DetypeConfig::default(), &root).is_ok());
    }

    #[test]
    fn test_no_format_skips_prettier_lookup() {
        let (_dir, root) = temp_root();
        let args = Args::parse_from(["detype", "--no-format", "a.ts"]);
        let options = build_options(&args, &DetypeConfig::default(), &root).unwrap();
        let out = detype::transform("\n\nlet a: number;", "a.ts", &options).unwrap();
        assert_eq!(out, "\n\nlet a;");
    }
}
