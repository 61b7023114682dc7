//! Transform options.

use crate::format::{BasicFormatter, FormatOptions, Formatter};
use crate::rules::ErasureRule;
use crate::sfc::resolve::{FsLoader, TypeSourceLoader};
use std::fmt;
use std::sync::Arc;

/// Options for [`crate::transform`] and [`crate::remove_types`].
#[derive(Clone)]
pub struct TransformOptions {
    /// Drop `@ts-ignore` and `@ts-expect-error` comments.
    pub remove_ts_comments: bool,
    /// Additional erasure rules, applied after the built-in erasure.
    pub rules: Vec<Arc<dyn ErasureRule>>,
    /// Options passed through to the formatter.
    pub format: FormatOptions,
    /// The formatter applied to the final output.
    pub formatter: Arc<dyn Formatter>,
    /// Loads imported type sources when resolving component macro types.
    pub type_loader: Arc<dyn TypeSourceLoader>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            remove_ts_comments: false,
            rules: Vec::new(),
            format: FormatOptions::default(),
            formatter: Arc::new(BasicFormatter),
            type_loader: Arc::new(FsLoader),
        }
    }
}

impl TransformOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether `@ts-ignore`/`@ts-expect-error` comments are removed.
    pub fn remove_ts_comments(mut self, remove: bool) -> Self {
        self.remove_ts_comments = remove;
        self
    }

    /// Registers an additional erasure rule.
    pub fn with_rule(mut self, rule: impl ErasureRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Replaces the formatter.
    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    /// Replaces the formatter options.
    pub fn with_format_options(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    /// Replaces the type source loader.
    pub fn with_type_loader(mut self, loader: impl TypeSourceLoader + 'static) -> Self {
        self.type_loader = Arc::new(loader);
        self
    }
}

impl fmt::Debug for TransformOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformOptions")
            .field("remove_ts_comments", &self.remove_ts_comments)
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
