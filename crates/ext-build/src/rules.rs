//! Transpilation rules.

use serde::Serialize;

use crate::target::NodeTarget;

/// Files the transpiler handles.
pub const SCRIPT_PATTERN: &str = r"\.jsx?$";

pub const TRANSPILER_LOADER: &str = "babel-loader";

pub const PRESET_ENV: &str = "@babel/preset-env";

/// Syntax and runtime plugins enabled on top of the preset.
pub const TRANSPILER_PLUGINS: [&str; 5] = [
    "@babel/plugin-proposal-class-properties",
    "@babel/plugin-proposal-export-default-from",
    "@babel/plugin-proposal-export-namespace-from",
    "@babel/plugin-transform-runtime",
    "@babel/plugin-syntax-dynamic-import",
];

const NODE_MODULES: &str = "node_modules";

/// Which module paths skip transpilation.
///
/// Installed packages are shipped as-is, except those whose name contains
/// one of `transpiled` (they publish syntax the target runtime lacks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcludePolicy {
    pub node_modules_except: Vec<String>,
}

impl ExcludePolicy {
    pub fn new(transpiled: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            node_modules_except: transpiled.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the module at `path` is left untranspiled.
    pub fn excludes(&self, path: &str) -> bool {
        let path = path.replace('\\', "/");
        path.contains(NODE_MODULES)
            && !self
                .node_modules_except
                .iter()
                .any(|name| path.contains(&format!("{NODE_MODULES}/{name}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeTargets {
    pub node: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetEnvOptions {
    pub shipped_proposals: bool,
    pub targets: NodeTargets,
}

/// Options passed to the transpiler loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranspilerOptions {
    /// `[preset name, preset options]` pairs.
    pub presets: Vec<(String, PresetEnvOptions)>,
    pub babelrc: bool,
    pub plugins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleUse {
    pub loader: String,
    pub options: TranspilerOptions,
}

/// One bundler module rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranspileRule {
    /// Regular expression source matched against file names.
    pub test: String,
    pub exclude: ExcludePolicy,
    #[serde(rename = "use")]
    pub use_: RuleUse,
}

impl TranspileRule {
    /// The script rule compiling down to `target`.
    pub fn scripts(target: &NodeTarget, exclude: ExcludePolicy) -> Self {
        Self {
            test: SCRIPT_PATTERN.to_string(),
            exclude,
            use_: RuleUse {
                loader: TRANSPILER_LOADER.to_string(),
                options: TranspilerOptions {
                    presets: vec![(
                        PRESET_ENV.to_string(),
                        PresetEnvOptions {
                            shipped_proposals: true,
                            targets: NodeTargets {
                                node: target.to_string(),
                            },
                        },
                    )],
                    babelrc: false,
                    plugins: TRANSPILER_PLUGINS.iter().map(|p| p.to_string()).collect(),
                },
            },
        }
    }

    /// The Node version the preset compiles for.
    pub fn node_target(&self) -> Option<&str> {
        self.use_
            .options
            .presets
            .first()
            .map(|(_, options)| options.targets.node.as_str())
    }
}
