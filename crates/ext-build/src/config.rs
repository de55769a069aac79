//! The bundler configuration and its synthesis.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use ext_manifest::PackageManifest;
use ext_resolve::Resolution;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::args::{BuildArgs, BuildEnv, BuildMode};
use crate::error::{Error, Result};
use crate::minify::MinifierSettings;
use crate::rules::{ExcludePolicy, TranspileRule};
use crate::target::NodeTarget;

/// Prefix telling the bundler to `require` a module at runtime.
pub const COMMONJS: &str = "commonjs";

pub const LIBRARY_TARGET: &str = "commonjs2";

pub const PLATFORM: &str = "node";

pub const STRICT_BANNER: &str = "\"use strict\";";

pub const RESOLVE_EXTENSIONS: [&str; 2] = [".js", ".json"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSettings {
    pub path: PathBuf,
    pub filename: String,
    pub library: String,
    pub library_target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleSettings {
    pub rules: Vec<TranspileRule>,
}

/// Text prepended to the bundle; `raw` means it is emitted verbatim rather
/// than wrapped in a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub banner: String,
    pub raw: bool,
}

impl Default for Banner {
    fn default() -> Self {
        Self {
            banner: STRICT_BANNER.to_string(),
            raw: true,
        }
    }
}

/// Where the bundler looks for imported modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveSettings {
    pub modules: Vec<String>,
    pub alias: BTreeMap<String, String>,
    pub extensions: Vec<String>,
}

impl ResolveSettings {
    fn for_root(root: &Path) -> Self {
        let installed = join_clean(root, Path::new("node_modules"));
        Self {
            modules: vec![
                "node_modules".to_string(),
                format!("{}/", installed.display()),
            ],
            alias: BTreeMap::new(),
            extensions: RESOLVE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Everything the bundler needs for one server build.
///
/// Built once per invocation by [`synthesize`] and handed over as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfiguration {
    pub entry: PathBuf,
    pub mode: BuildMode,
    pub target: String,
    pub output: OutputSettings,
    /// Module name to `commonjs <reference>`.
    pub externals: BTreeMap<String, String>,
    pub module: ModuleSettings,
    pub minifier: MinifierSettings,
    /// Substituted under `process.env` at compile time. Values are source
    /// literals.
    pub constants: BTreeMap<String, String>,
    pub banner: Banner,
    pub resolve: ResolveSettings,
}

impl BuildConfiguration {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the configuration as JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }

    /// The transpilation rule, if transpiling is enabled.
    pub fn script_rule(&self) -> Option<&TranspileRule> {
        self.module.rules.first()
    }
}

pub(crate) fn write_json(value: &impl Serialize, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, json + "\n").map_err(|e| Error::io(path, e))
}

/// `root` joined with `relative`, without `.` components.
pub(crate) fn join_clean(root: &Path, relative: &Path) -> PathBuf {
    root.join(relative)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

pub(crate) fn json_literal(value: &str) -> String {
    Value::from(value).to_string()
}

fn externals(manifest: &PackageManifest, resolution: &Resolution) -> BTreeMap<String, String> {
    let extension = &manifest.extension;
    if !extension.bundle_modules {
        return manifest
            .dependencies
            .keys()
            .map(|name| (name.clone(), format!("{COMMONJS} {name}")))
            .collect();
    }

    let mut references = resolution.externals();
    for spec in extension.external_specs() {
        let reference = spec.reference().to_string();
        references.insert(spec.name, reference);
    }
    references
        .into_iter()
        .map(|(name, reference)| (name, format!("{COMMONJS} {reference}")))
        .collect()
}

/// A project setting as the bundler substitutes it. Strings are already
/// written as source literals by the project; other values are encoded.
fn setting_literal(value: &Value) -> String {
    match value {
        Value::String(source) => source.clone(),
        other => other.to_string(),
    }
}

fn constants(
    manifest: &PackageManifest,
    target: &NodeTarget,
    mode: BuildMode,
    env: &BuildEnv,
) -> BTreeMap<String, String> {
    let mut constants: BTreeMap<String, String> = manifest
        .extension
        .settings
        .iter()
        .map(|(key, value)| (key.clone(), setting_literal(value)))
        .collect();

    constants.insert("NODE_ENV".into(), json_literal(mode.as_str()));
    constants.insert("CLIENT_VERSION".into(), json_literal(&manifest.version));
    constants.insert("NODE_TARGET".into(), json_literal(&target.to_string()));
    if let Some(pull_request) = &env.pull_request {
        constants.insert("PULL_REQUEST".into(), json_literal(pull_request));
    }
    constants
}

/// Build the bundler configuration for `manifest`.
///
/// With `bundleModules: false` every declared dependency is external and
/// `resolution` is ignored. Otherwise compatible modules are external at
/// their resolved version and the manifest's `externals` list overrides
/// them.
pub fn synthesize(
    manifest: &PackageManifest,
    resolution: &Resolution,
    args: &BuildArgs,
    env: &BuildEnv,
) -> BuildConfiguration {
    let extension = &manifest.extension;
    let target = NodeTarget::resolve(&extension.node_target);

    let rules = if extension.use_babel {
        vec![TranspileRule::scripts(
            &target,
            ExcludePolicy::new(extension.excluded.iter().cloned()),
        )]
    } else {
        Vec::new()
    };

    let externals = externals(manifest, resolution);
    debug!(
        target = %target,
        externals = externals.len(),
        transpile = extension.use_babel,
        "synthesized build configuration"
    );

    BuildConfiguration {
        entry: join_clean(&args.root, &args.entry_point),
        mode: args.mode,
        target: PLATFORM.to_string(),
        output: OutputSettings {
            path: join_clean(&args.root, &args.destination_folder),
            filename: format!("{}.extension.{}.js", manifest.name, manifest.version),
            library: format!("{}.extension", manifest.name),
            library_target: LIBRARY_TARGET.to_string(),
        },
        externals,
        module: ModuleSettings { rules },
        minifier: MinifierSettings::new(&target, args.mode),
        constants: constants(manifest, &target, args.mode, env),
        banner: Banner::default(),
        resolve: ResolveSettings::for_root(&args.root),
    }
}
