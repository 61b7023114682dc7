use camino::{Utf8Path, Utf8PathBuf};
use detype::{FormatError, FormatOptions, Formatter};
use serde_json::Value;
use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;

#[cfg(windows)]
const BIN_NAME: &str = "prettier.cmd";
#[cfg(not(windows))]
const BIN_NAME: &str = "prettier";

/// Error types for the prettier runner.
#[derive(Debug, Error)]
pub enum PrettierError {
    /// No prettier binary was found.
    #[error("prettier not found in node_modules/.bin (searched from {0}) or on PATH")]
    NotFound(Utf8PathBuf),

    /// Failed to spawn the prettier process.
    #[error("failed to spawn prettier: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// prettier exited with an error.
    #[error("prettier exited with code {code}: {stderr}")]
    ProcessFailed { code: i32, stderr: String },

    /// prettier wrote something that is not UTF-8.
    #[error("prettier produced invalid UTF-8")]
    InvalidOutput,
}

/// Runs prettier on source text through stdin.
#[derive(Debug, Clone)]
pub struct PrettierRunner {
    /// Path to the prettier binary.
    prettier_path: Utf8PathBuf,
    /// Directory prettier runs in; config files are resolved from here.
    cwd: Utf8PathBuf,
}

impl PrettierRunner {
    /// Creates a runner for a known binary.
    pub fn new(prettier_path: Utf8PathBuf, cwd: Utf8PathBuf) -> Self {
        Self { prettier_path, cwd }
    }

    /// Creates a runner for the prettier found from `cwd`.
    pub fn discover(cwd: Utf8PathBuf) -> Result<Self, PrettierError> {
        match Self::find_prettier(&cwd) {
            Some(path) => {
                log::debug!("using prettier at {}", path);
                Ok(Self::new(path, cwd))
            }
            None => Err(PrettierError::NotFound(cwd)),
        }
    }

    /// Finds prettier.
    ///
    /// Search order:
    /// 1. `node_modules/.bin/prettier` in `start` and each of its parents
    /// 2. System PATH
    pub fn find_prettier(start: &Utf8Path) -> Option<Utf8PathBuf> {
        let mut current = Some(start);
        while let Some(dir) = current {
            let bin_path = dir.join("node_modules/.bin").join(BIN_NAME);
            if bin_path.is_file() {
                return Some(bin_path);
            }
            current = dir.parent();
        }

        which::which("prettier")
            .ok()
            .and_then(|path| Utf8PathBuf::try_from(path).ok())
    }

    /// The binary this runner invokes.
    pub fn prettier_path(&self) -> &Utf8Path {
        &self.prettier_path
    }

    /// Command-line arguments for formatting `file_name` with `options`.
    ///
    /// Option keys are given in Prettier's config spelling (`tabWidth`) and
    /// passed as flags (`--tab-width=4`). `false` booleans become `--no-*`.
    pub fn build_args(file_name: &str, options: &FormatOptions) -> Vec<String> {
        let mut args = vec!["--stdin-filepath".to_string(), file_name.to_string()];
        for (key, value) in options.iter() {
            let flag = kebab_case(key);
            match value {
                Value::Bool(true) => args.push(format!("--{flag}")),
                Value::Bool(false) => args.push(format!("--no-{flag}")),
                Value::String(s) => args.push(format!("--{flag}={s}")),
                Value::Number(n) => args.push(format!("--{flag}={n}")),
                Value::Null | Value::Array(_) | Value::Object(_) => {
                    log::warn!("ignoring prettier option `{key}`: not expressible as a flag");
                }
            }
        }
        args
    }

    /// Formats `code` as if it were the contents of `file_name`.
    pub fn run(
        &self,
        code: &str,
        file_name: &str,
        options: &FormatOptions,
    ) -> Result<String, PrettierError> {
        let mut child = Command::new(&self.prettier_path)
            .args(Self::build_args(file_name, options))
            .current_dir(&self.cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Prettier consumes all of stdin before it writes.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(code.as_bytes())?;
        }
        let output = child.wait_with_output()?;

        if !output.status.success() {
            return Err(PrettierError::ProcessFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|_| PrettierError::InvalidOutput)
    }
}

impl Formatter for PrettierRunner {
    fn format(
        &self,
        code: &str,
        file_name: &str,
        options: &FormatOptions,
    ) -> Result<String, FormatError> {
        self.run(code, file_name, options).map_err(|err| match err {
            PrettierError::SpawnFailed(source) => FormatError::Spawn(source),
            PrettierError::InvalidOutput => FormatError::InvalidOutput(file_name.to_string()),
            PrettierError::ProcessFailed { stderr, .. } => FormatError::Rejected {
                file_name: file_name.to_string(),
                message: stderr,
            },
            PrettierError::NotFound(dir) => FormatError::Rejected {
                file_name: file_name.to_string(),
                message: format!("prettier not found from {dir}"),
            },
        })
    }
}

fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("tabWidth"), "tab-width");
        assert_eq!(kebab_case("semi"), "semi");
        assert_eq!(kebab_case("vueIndentScriptAndStyle"), "vue-indent-script-and-style");
    }

    #[test]
    fn test_build_args() {
        let options = FormatOptions::new()
            .with("semi", false)
            .with("singleQuote", true)
            .with("tabWidth", 4)
            .with("trailingComma", "all")
            .with("overrides", serde_json::json!([]));
        assert_eq!(
            PrettierRunner::build_args("src/App.vue", &options),
            vec![
                "--stdin-filepath",
                "src/App.vue",
                "--no-semi",
                "--single-quote",
                "--tab-width=4",
                "--trailing-comma=all",
            ]
        );
    }

    #[test]
    fn test_find_prettier_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        let bin = root.join("node_modules/.bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join(BIN_NAME), "").unwrap();
        let nested = root.join("packages/app/src");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            PrettierRunner::find_prettier(&nested),
            Some(bin.join(BIN_NAME))
        );
    }

    #[test]
    fn test_missing_binary_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        let runner = PrettierRunner::new(root.join("no-such-prettier"), root);
        let err = runner
            .format("a", "a.js", &FormatOptions::new())
            .unwrap_err();
        assert!(matches!(err, FormatError::Spawn(_)));
    }
}
