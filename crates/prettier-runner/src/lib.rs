//! Prettier process runner.
//!
//! Formats detype output by piping it through the `prettier` CLI. The binary
//! is looked up in `node_modules/.bin` from the working directory upward, so
//! the project's own Prettier version and config are used, and then on `PATH`.
//!
//! # Example
//!
//! ```ignore
//! use detype::TransformOptions;
//! use prettier_runner::PrettierRunner;
//!
//! let runner = PrettierRunner::discover(".".into()).unwrap();
//! let options = TransformOptions::default().with_formatter(runner);
//! let js = detype::transform("let a: number = 1", "a.ts", &options).unwrap();
//! ```

mod runner;

pub use runner::{PrettierError, PrettierRunner};
