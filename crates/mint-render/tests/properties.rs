//! Property tests: every registered backend is total, collision-free, and
//! deterministic over randomly generated valid command trees.

use mint_config::{
    ArgumentSpec, CommandKind, CommandSpec, FeaturesSpec, Metadata, OptionSpec, Spec, ValueKind,
};
use mint_ir::{AutoDetectPolicy, FeatureSet, IrBuilder};
use mint_render::{renderers, verify_artifacts};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashSet;

fn value_kind() -> impl Strategy<Value = ValueKind> {
    prop_oneof![
        Just(ValueKind::String),
        Just(ValueKind::Int),
        Just(ValueKind::Bool),
        Just(ValueKind::Enum),
        Just(ValueKind::List),
    ]
}

fn option_spec() -> impl Strategy<Value = OptionSpec> {
    (
        "[a-z]{2,8}",
        proptest::option::of(proptest::char::range('a', 'z')),
        value_kind(),
        proptest::option::of("[a-z0-9]{1,6}"),
        any::<bool>(),
        proptest::option::of("[A-Z]{2,8}"),
    )
        .prop_map(|(name, short, kind, default, required, env)| OptionSpec {
            name,
            short,
            description: None,
            kind,
            default,
            required,
            choices: vec!["alpha".into(), "beta".into()],
            env,
        })
}

fn argument_spec() -> impl Strategy<Value = ArgumentSpec> {
    ("[a-z]{2,8}", value_kind(), any::<bool>(), any::<bool>()).prop_map(
        |(name, kind, required, variadic)| ArgumentSpec {
            name,
            description: None,
            kind,
            required,
            choices: vec!["alpha".into(), "beta".into()],
            variadic,
        },
    )
}

fn command_spec() -> impl Strategy<Value = CommandSpec> {
    let leaf = (
        "[a-z]{2,8}",
        proptest::collection::vec(option_spec(), 0..3),
        proptest::collection::vec(argument_spec(), 0..3),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(name, options, arguments, default, hidden, managed)| CommandSpec {
                name,
                description: None,
                aliases: Vec::new(),
                hidden,
                kind: if managed {
                    CommandKind::Managed
                } else {
                    CommandKind::Standard
                },
                default,
                options,
                arguments,
                commands: Vec::new(),
            },
        );

    leaf.prop_recursive(3, 20, 4, |inner| {
        ("[a-z]{2,8}", proptest::collection::vec(inner, 0..3)).prop_map(|(name, commands)| {
            CommandSpec {
                name,
                description: None,
                aliases: Vec::new(),
                hidden: false,
                kind: CommandKind::Standard,
                default: false,
                options: Vec::new(),
                arguments: Vec::new(),
                commands,
            }
        })
    })
}

fn sanitize_options(options: &mut [OptionSpec]) {
    let mut shorts = HashSet::new();
    for opt in options.iter_mut() {
        if let Some(flag) = opt.short {
            if !shorts.insert(flag) {
                opt.short = None;
            }
        }
    }
}

fn sanitize_arguments(arguments: &mut Vec<ArgumentSpec>) {
    arguments.sort_by_key(|a| !a.required);
    let last = arguments.len().saturating_sub(1);
    for (i, arg) in arguments.iter_mut().enumerate() {
        if i != last {
            arg.variadic = false;
        }
    }
}

fn sanitize_commands(commands: &mut Vec<CommandSpec>) {
    let mut seen = HashSet::new();
    commands.retain(|c| seen.insert(c.name.clone()));
    let mut default_seen = false;
    for cmd in commands.iter_mut() {
        if cmd.default {
            if default_seen {
                cmd.default = false;
            }
            default_seen = true;
        }
        sanitize_options(&mut cmd.options);
        sanitize_arguments(&mut cmd.arguments);
        sanitize_commands(&mut cmd.commands);
    }
}

fn valid_spec() -> impl Strategy<Value = Spec> {
    (
        proptest::collection::vec(command_spec(), 0..4),
        proptest::collection::vec(option_spec(), 0..2),
        any::<[bool; 4]>(),
    )
        .prop_map(|(mut commands, mut global_options, toggles)| {
            sanitize_commands(&mut commands);
            sanitize_options(&mut global_options);
            Spec {
                metadata: Metadata {
                    name: "app".into(),
                    version: "1.0.0".into(),
                    description: None,
                    output_root: None,
                },
                global_options,
                commands,
                features: FeaturesSpec {
                    completion: toggles[0],
                    interactive: toggles[1],
                    plugins: toggles[2],
                    hooks: toggles[3],
                    auto: Default::default(),
                },
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Totality and path uniqueness: no renderer skips a command or emits
    /// colliding paths, for any valid tree.
    #[test]
    fn all_backends_satisfy_the_contract(spec in valid_spec()) {
        let ir = IrBuilder::build(&spec).unwrap();
        let features = FeatureSet::analyze(&ir, &AutoDetectPolicy::default());
        for renderer in renderers() {
            let artifacts = renderer.render(&ir, &features);
            if let Err(violation) = verify_artifacts(&ir, renderer, &artifacts) {
                return Err(TestCaseError::fail(format!(
                    "{}: {violation}",
                    renderer.target()
                )));
            }
        }
    }

    /// Byte-identical artifacts for identical input, for every backend.
    #[test]
    fn all_backends_are_deterministic(spec in valid_spec()) {
        let ir = IrBuilder::build(&spec).unwrap();
        let features = FeatureSet::analyze(&ir, &AutoDetectPolicy::default());
        for renderer in renderers() {
            prop_assert_eq!(
                renderer.render(&ir, &features),
                renderer.render(&ir, &features)
            );
        }
    }
}
