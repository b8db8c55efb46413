//! The IR tree: commands, options, arguments, and build metadata.
//!
//! Everything here is constructed by [`IrBuilder`](crate::IrBuilder) and
//! frozen afterwards. Types serialize (for dry-run inspection and golden
//! tests) but deliberately do not deserialize: the only way to obtain an
//! [`Ir`] is through the builder's validation pass.

use mint_config::{CommandKind, ValueKind};
use serde::Serialize;

/// A validated, immutable command tree plus everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ir {
    /// Synthesized root command. Its children are the spec's top-level
    /// commands; its name is the project name.
    pub root: CommandNode,
    /// Options accepted by every command.
    pub global_options: Vec<OptionNode>,
    pub meta: BuildMeta,
    /// Explicit feature opt-ins carried over from configuration.
    pub toggles: FeatureToggles,
}

/// Build metadata embedded in generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildMeta {
    /// Project name; also the generated executable name.
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    /// Root directory for emitted artifact paths.
    pub output_root: String,
}

/// One command in the validated tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandNode {
    pub name: String,
    /// Path from the root, excluding the root itself. Empty for the root.
    pub path: Vec<String>,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub hidden: bool,
    pub kind: CommandKind,
    pub default: bool,
    pub options: Vec<OptionNode>,
    pub arguments: Vec<ArgNode>,
    pub children: Vec<CommandNode>,
}

/// A named option on a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionNode {
    pub name: String,
    pub short: Option<char>,
    pub description: Option<String>,
    pub kind: ValueKind,
    pub default: Option<String>,
    pub required: bool,
    pub choices: Vec<String>,
    pub env: Option<String>,
}

/// A positional argument on a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgNode {
    pub name: String,
    pub description: Option<String>,
    pub kind: ValueKind,
    pub required: bool,
    pub choices: Vec<String>,
    pub variadic: bool,
}

/// Explicit feature opt-ins from configuration, frozen into the IR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureToggles {
    pub completion: bool,
    pub interactive: bool,
    pub plugins: bool,
    pub hooks: bool,
}

impl Ir {
    /// All commands in the tree in preorder, excluding the synthesized root.
    pub fn commands(&self) -> Vec<&CommandNode> {
        let mut out = Vec::new();
        fn walk<'a>(node: &'a CommandNode, out: &mut Vec<&'a CommandNode>) {
            out.push(node);
            for child in &node.children {
                walk(child, out);
            }
        }
        for child in &self.root.children {
            walk(child, &mut out);
        }
        out
    }

    /// Number of commands in the tree, excluding the synthesized root.
    pub fn command_count(&self) -> usize {
        self.commands().len()
    }
}

impl CommandNode {
    /// The command's invocation path as it appears in help text, e.g.
    /// `"server start"`. The root yields the empty string.
    pub fn path_display(&self) -> String {
        self.path.join(" ")
    }

    /// Whether invoking this command dispatches to a user hook.
    pub fn dispatches_to_hook(&self) -> bool {
        self.kind == CommandKind::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, path: Vec<String>) -> CommandNode {
        CommandNode {
            name: name.to_string(),
            path,
            description: None,
            aliases: Vec::new(),
            hidden: false,
            kind: CommandKind::Standard,
            default: false,
            options: Vec::new(),
            arguments: Vec::new(),
            children: Vec::new(),
        }
    }

    #[test]
    fn commands_walks_preorder_without_root() {
        let mut server = leaf("server", vec!["server".into()]);
        server.children = vec![
            leaf("start", vec!["server".into(), "start".into()]),
            leaf("stop", vec!["server".into(), "stop".into()]),
        ];
        let mut root = leaf("app", Vec::new());
        root.children = vec![server, leaf("status", vec!["status".into()])];

        let ir = Ir {
            root,
            global_options: Vec::new(),
            meta: BuildMeta {
                name: "app".into(),
                version: "1.0.0".into(),
                description: None,
                output_root: "app".into(),
            },
            toggles: FeatureToggles::default(),
        };

        let paths: Vec<String> = ir.commands().iter().map(|c| c.path_display()).collect();
        assert_eq!(
            paths,
            vec!["server", "server start", "server stop", "status"]
        );
        assert_eq!(ir.command_count(), 4);
    }
}
