//! Minifier options.

use serde::Serialize;

use crate::args::BuildMode;
use crate::target::NodeTarget;

/// Files the minifier processes.
pub const MINIFY_PATTERN: &str = r"\.js(\?.*)?$";

/// Compressor switches. Keys follow the minifier's own snake_case naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompressOptions {
    pub dead_code: bool,
    pub unused: bool,
    pub warnings: bool,
    pub drop_console: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputOptions {
    pub comments: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UglifyOptions {
    pub compress: CompressOptions,
    /// ECMAScript edition of the emitted code.
    pub ecma: u8,
    pub output: OutputOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinifierSettings {
    pub cache: bool,
    pub extract_comments: bool,
    pub parallel: bool,
    pub source_map: bool,
    pub test: String,
    pub uglify_options: UglifyOptions,
}

impl MinifierSettings {
    pub fn new(target: &NodeTarget, mode: BuildMode) -> Self {
        Self {
            cache: false,
            extract_comments: false,
            parallel: false,
            source_map: false,
            test: MINIFY_PATTERN.to_string(),
            uglify_options: UglifyOptions {
                compress: CompressOptions {
                    dead_code: true,
                    unused: true,
                    warnings: false,
                    drop_console: mode == BuildMode::Production,
                },
                ecma: target.ecma(),
                output: OutputOptions { comments: false },
            },
        }
    }
}
