//! Renderer-agnostic intermediate representation for one build.
//!
//! `mint-ir` is the frontend of the generation pipeline:
//!
//! ```text
//! Spec (mint-config)        IR                 Renderers (mint-render)
//! ──────────────────    ─────────────────      ───────────────────────
//! commands tree     ──> IrBuilder::build ──┬─> bash project
//! global options        (validates,        ├─> python package
//! metadata              aggregates         └─> node package
//! feature toggles        every violation)
//! ```
//!
//! The IR is constructed once per build, frozen afterwards, and handed to
//! downstream stages by shared reference only — nothing after
//! [`IrBuilder::build`] mutates the tree. [`FeatureSet::analyze`] derives the
//! capability flags renderers consult; it is pure and idempotent, so callers
//! may run it speculatively for dry-run estimation.
//!
//! # Example
//!
//! ```
//! use mint_ir::{AutoDetectPolicy, FeatureSet, IrBuilder};
//!
//! let spec = mint_config::parse_yaml(r#"
//! metadata:
//!   name: greet
//!   version: 0.1.0
//! commands:
//!   - name: hello
//! "#).unwrap();
//!
//! let ir = IrBuilder::build(&spec).unwrap();
//! let features = FeatureSet::analyze(&ir, &AutoDetectPolicy::default());
//!
//! assert_eq!(ir.command_count(), 1);
//! assert!(features.hooks); // `hello` is a standard command
//! ```

mod builder;
mod features;
mod model;

pub use builder::{IrBuilder, IrValidationError, Violation};
pub use features::{AutoDetectPolicy, FeatureSet};
pub use model::{ArgNode, BuildMeta, CommandNode, FeatureToggles, Ir, OptionNode};

// Value and lifecycle kinds are shared with the input model verbatim.
pub use mint_config::{CommandKind, ValueKind};
