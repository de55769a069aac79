//! Bundler configuration for the extension's browser UI.
//!
//! The UI is built separately from the server bundle and targets browsers.
//! Production builds split vendor code into its own chunk and write a stats
//! manifest naming the emitted assets. Development builds emit a single
//! `bundle.js` served by the local dev server.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ext_manifest::PackageManifest;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::args::{BuildArgs, BuildMode};
use crate::config::{join_clean, json_literal, write_json};
use crate::error::Result;
use crate::minify::OutputOptions;
use crate::rules::{PRESET_ENV, SCRIPT_PATTERN, TRANSPILER_LOADER, TRANSPILER_PLUGINS};

/// Where the hosting runtime serves UI assets.
pub const CLIENT_PUBLIC_PATH: &str = "/app/";

pub const DEV_SERVER_PUBLIC_PATH: &str = "http://localhost:3000/app/";

pub const DEV_BUNDLE_FILENAME: &str = "bundle.js";

/// Stats file listing the production assets.
pub const STATS_FILENAME: &str = "manifest.json";

pub const CLIENT_EXTENSIONS: [&str; 3] = [".json", ".js", ".jsx"];

pub const BROWSER_TARGETS: [&str; 1] = ["last 2 versions"];

pub const AUTOPREFIXER_BROWSERS: [&str; 2] = ["last 2 versions", "IE > 8"];

const CSS_EXTRACT_LOADER: &str = "mini-css-extract-plugin/loader";

/// Vendor chunk selection; stylesheets stay with the app chunk.
const VENDOR_PATTERN: &str = r"[\\/]node_modules[\\/].*\.js$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOutput {
    pub path: PathBuf,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_filename: Option<String>,
    pub public_path: String,
}

/// One loader in a rule's chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loader {
    pub loader: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl Loader {
    fn plain(loader: &str) -> Self {
        Self {
            loader: loader.to_string(),
            options: None,
        }
    }

    fn with_options(loader: &str, options: Value) -> Self {
        Self {
            loader: loader.to_string(),
            options: Some(options),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRule {
    pub test: String,
    #[serde(rename = "use")]
    pub use_: Vec<Loader>,
    /// Directory prefix never transpiled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

impl ClientRule {
    pub fn loaders(&self) -> impl Iterator<Item = &str> {
        self.use_.iter().map(|l| l.loader.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientModule {
    pub rules: Vec<ClientRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientResolve {
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorChunk {
    pub test: String,
    pub chunks: String,
    pub name: String,
    pub priority: i32,
    pub enforce: bool,
}

/// Compressor switches for the UI bundle, in the minifier's naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientCompress {
    pub sequences: bool,
    pub dead_code: bool,
    pub conditionals: bool,
    pub booleans: bool,
    pub unused: bool,
    pub if_return: bool,
    pub join_vars: bool,
    pub drop_console: bool,
    pub warnings: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientMinifier {
    pub mangle: bool,
    pub output: OutputOptions,
    pub compress: ClientCompress,
}

/// Production-only chunking and minification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptimization {
    pub vendor_chunk: VendorChunk,
    pub minimizer: ClientMinifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssExtract {
    pub filename: String,
    pub all_chunks: bool,
}

/// The stats manifest maps these chunk roles to emitted asset names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsOutput {
    pub filename: String,
    pub chunks: Vec<String>,
}

/// Everything the bundler needs for one UI build.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfiguration {
    pub mode: BuildMode,
    /// Record build timings; development only.
    pub profile: bool,
    /// Named entry chunks.
    pub entry: BTreeMap<String, PathBuf>,
    pub output: ClientOutput,
    pub resolve: ClientResolve,
    pub module: ClientModule,
    /// Free identifiers bound to modules, so JSX works without imports.
    pub provide: BTreeMap<String, String>,
    /// Compile-time definitions; values are JSON literals.
    pub definitions: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization: Option<ClientOptimization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_extract: Option<CssExtract>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsOutput>,
}

impl ClientConfiguration {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the configuration as JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }

    /// The rule whose pattern handles `extension` (e.g. `"css"`).
    pub fn rule_for(&self, extension: &str) -> Option<&ClientRule> {
        self.module
            .rules
            .iter()
            .find(|rule| rule.test.contains(extension))
    }
}

fn script_rule(root: &Path) -> ClientRule {
    let options = json!({
        "presets": [
            [PRESET_ENV, { "targets": { "browsers": BROWSER_TARGETS }, "shippedProposals": true }],
            "@babel/preset-react"
        ],
        "plugins": TRANSPILER_PLUGINS,
        "ignore": ["./node_modules/**/*.js"]
    });
    let installed = join_clean(root, Path::new("node_modules"));

    ClientRule {
        test: SCRIPT_PATTERN.to_string(),
        use_: vec![Loader::with_options(TRANSPILER_LOADER, options)],
        exclude: Some(format!("{}/", installed.display())),
    }
}

fn inline_rule(pattern: &str, limit: u64) -> ClientRule {
    ClientRule {
        test: pattern.to_string(),
        use_: vec![Loader::with_options("url-loader", json!({ "limit": limit }))],
        exclude: None,
    }
}

fn style_rule(mode: BuildMode) -> ClientRule {
    let postcss = Loader::with_options(
        "postcss-loader",
        json!({
            "plugins": [
                { "name": "postcss-simple-vars" },
                { "name": "postcss-focus" },
                { "name": "autoprefixer", "options": { "browsers": AUTOPREFIXER_BROWSERS } },
                { "name": "postcss-reporter", "options": { "clearMessages": true } }
            ]
        }),
    );

    let use_ = match mode {
        BuildMode::Production => vec![
            Loader::plain(CSS_EXTRACT_LOADER),
            Loader::plain("css-loader"),
            postcss,
        ],
        BuildMode::Development => vec![Loader::plain("style-loader"), postcss],
    };

    ClientRule {
        test: r"\.css$".to_string(),
        use_,
        exclude: None,
    }
}

fn definitions(mode: BuildMode) -> BTreeMap<String, String> {
    let development = mode == BuildMode::Development;
    BTreeMap::from([
        ("__DEV__".to_string(), development.to_string()),
        ("__CLIENT__".to_string(), true.to_string()),
        ("__SERVER__".to_string(), false.to_string()),
        ("process.env.BROWSER".to_string(), true.to_string()),
        ("process.env.NODE_ENV".to_string(), json_literal(mode.as_str())),
    ])
}

fn optimization() -> ClientOptimization {
    ClientOptimization {
        vendor_chunk: VendorChunk {
            test: VENDOR_PATTERN.to_string(),
            chunks: "all".to_string(),
            name: "vendors".to_string(),
            priority: 10,
            enforce: true,
        },
        minimizer: ClientMinifier {
            mangle: true,
            output: OutputOptions { comments: false },
            compress: ClientCompress {
                sequences: true,
                dead_code: true,
                conditionals: true,
                booleans: true,
                unused: true,
                if_return: true,
                join_vars: true,
                drop_console: true,
                warnings: false,
            },
        },
    }
}

/// Build the UI bundler configuration for `manifest`.
///
/// Only the manifest's name and version are used; the UI has no externals.
pub fn synthesize_client(manifest: &PackageManifest, args: &BuildArgs) -> ClientConfiguration {
    let name = &manifest.name;
    let version = &manifest.version;
    let path = join_clean(&args.root, &args.destination_folder);
    let production = args.mode == BuildMode::Production;

    let output = if production {
        ClientOutput {
            path,
            filename: format!("{name}.ui.{version}.js"),
            chunk_filename: Some(format!("{name}.ui.[name].{version}.js")),
            public_path: CLIENT_PUBLIC_PATH.to_string(),
        }
    } else {
        ClientOutput {
            path,
            filename: DEV_BUNDLE_FILENAME.to_string(),
            chunk_filename: None,
            public_path: DEV_SERVER_PUBLIC_PATH.to_string(),
        }
    };

    debug!(mode = %args.mode, filename = %output.filename, "synthesized client configuration");

    ClientConfiguration {
        mode: args.mode,
        profile: !production,
        entry: BTreeMap::from([(
            "app".to_string(),
            join_clean(&args.root, &args.entry_point),
        )]),
        output,
        resolve: ClientResolve {
            extensions: CLIENT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        },
        module: ClientModule {
            rules: vec![
                script_rule(&args.root),
                inline_rule(r"\.(png|ttf|svg|jpg|gif)", 8192),
                inline_rule(r"\.(woff|woff2|eot)", 100_000),
                style_rule(args.mode),
            ],
        },
        provide: BTreeMap::from([("React".to_string(), "react".to_string())]),
        definitions: definitions(args.mode),
        optimization: production.then(optimization),
        css_extract: production.then(|| CssExtract {
            filename: format!("{name}.ui.{version}.css"),
            all_chunks: true,
        }),
        stats: production.then(|| StatsOutput {
            filename: STATS_FILENAME.to_string(),
            chunks: ["style", "app", "vendors"].map(String::from).to_vec(),
        }),
    }
}
