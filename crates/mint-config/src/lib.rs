//! Normalized command-specification model.
//!
//! `mint-config` defines the input boundary of the generator: a serde model
//! of commands, options, arguments, and feature toggles, loadable from YAML
//! or JSON. The model is deliberately permissive — structural validation
//! (duplicate names, flag collisions, argument ordering) happens in
//! `mint-ir`, which aggregates every violation into one report.
//!
//! # Example
//!
//! ```
//! let spec = mint_config::parse_yaml(r#"
//! metadata:
//!   name: greet
//!   version: 0.1.0
//! commands:
//!   - name: hello
//!     description: Say hello
//! "#).unwrap();
//!
//! assert_eq!(spec.metadata.name, "greet");
//! assert_eq!(spec.commands.len(), 1);
//! ```

mod loader;

pub use loader::{LoadError, SpecFormat, load_spec, parse_json, parse_yaml};

use serde::{Deserialize, Serialize};

/// A complete command specification: the normalized configuration model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Spec {
    /// Project metadata (name, version, output root).
    pub metadata: Metadata,
    /// Options accepted by every command.
    #[serde(default)]
    pub global_options: Vec<OptionSpec>,
    /// Top-level commands.
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
    /// Feature toggles controlling optional artifact emission.
    #[serde(default)]
    pub features: FeaturesSpec,
}

/// Project metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    /// Project name; also the generated executable name.
    pub name: String,
    /// Project version string, embedded in generated artifacts.
    pub version: String,
    /// One-line project description.
    #[serde(default)]
    pub description: Option<String>,
    /// Root directory for emitted artifacts, relative to the output
    /// directory. Defaults to the project name.
    #[serde(default)]
    pub output_root: Option<String>,
}

/// One command in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    /// Command name, unique within its sibling scope.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Alternate names accepted at dispatch time.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Hidden commands are dispatchable but excluded from help and
    /// completion candidates.
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub kind: CommandKind,
    /// Run this command when the parent is invoked without a subcommand.
    /// At most one sibling may set this.
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
    /// Nested subcommands.
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

/// Who owns a command's handler body.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// Dispatches to a user-supplied hook at runtime.
    #[default]
    Standard,
    /// Handler body is owned by the generator and regenerated every build.
    Managed,
}

/// A named option (flag) on a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OptionSpec {
    /// Long name without the leading dashes (e.g. `env` for `--env`).
    pub name: String,
    /// Optional single-character short flag (e.g. `e` for `-e`).
    #[serde(default)]
    pub short: Option<char>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub kind: ValueKind,
    /// Default value, rendered into generated parsers verbatim.
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Legal values for `enum`-kind options.
    #[serde(default)]
    pub choices: Vec<String>,
    /// Environment variable consulted when the option is not passed.
    #[serde(default)]
    pub env: Option<String>,
}

/// A positional argument on a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ArgumentSpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub kind: ValueKind,
    #[serde(default)]
    pub required: bool,
    /// Legal values for `enum`-kind arguments.
    #[serde(default)]
    pub choices: Vec<String>,
    /// Collects all remaining positionals. Must be the last argument.
    #[serde(default)]
    pub variadic: bool,
}

/// Value kind of an option or argument.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    String,
    Int,
    Bool,
    Enum,
    List,
}

/// Explicit feature opt-ins.
///
/// These are the caller's declarations; the derived `FeatureSet` (computed in
/// `mint-ir`) is what renderers consume.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(default, deny_unknown_fields)]
pub struct FeaturesSpec {
    /// Emit shell-completion scripts.
    pub completion: bool,
    /// Emit interactive-mode (REPL) scaffolding.
    pub interactive: bool,
    /// Emit plugin-loading scaffolding.
    pub plugins: bool,
    /// Emit hook-loading scaffolding even if no standard command needs it.
    pub hooks: bool,
    /// Caller-supplied auto-detection thresholds. All heuristics are off
    /// unless a threshold is given here.
    pub auto: AutoSpec,
}

/// Thresholds for feature auto-detection. `None` disables a heuristic.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(default, deny_unknown_fields)]
pub struct AutoSpec {
    /// Enable completion when the tree has at least this many commands.
    pub completion_command_threshold: Option<usize>,
}

impl Spec {
    /// Total number of commands in the tree.
    pub fn command_count(&self) -> usize {
        fn count(commands: &[CommandSpec]) -> usize {
            commands.iter().map(|c| 1 + count(&c.commands)).sum()
        }
        count(&self.commands)
    }
}
