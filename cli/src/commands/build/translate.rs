//! Translation of `kpod build` options into a `buildah bud` argument vector.
//!
//! The recognized options form a closed, ordered table. Emission walks the
//! table once, so output order is the table's order no matter how the caller
//! supplied the options.

use std::collections::HashMap;

/// Subcommand of the build tool every vector starts with.
pub const BUD_SUBCOMMAND: &str = "bud";

/// How an option is forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Presence only: the flag token alone.
    Flag,
    /// Flag token followed by one value token.
    Value,
    /// Flag token once, followed by every value as its own token.
    Values,
    /// Flag token followed by the literal `True` or `False`.
    Bool,
}

/// One recognized option.
#[derive(Debug, Clone, Copy)]
pub struct BudOption {
    /// Primary name; values are read under this name.
    pub name: &'static str,
    /// Alternate spellings that count as the same option.
    pub aliases: &'static [&'static str],
    pub kind: OptionKind,
    /// Token forwarded to the build tool.
    pub flag: &'static str,
}

impl BudOption {
    /// Whether the option was given under its name or any alias.
    pub fn is_set(&self, source: &dyn OptionSource) -> bool {
        source.is_set(self.name) || self.aliases.iter().any(|alias| source.is_set(alias))
    }
}

/// Recognized options in emission order.
pub const BUD_OPTIONS: &[BudOption] = &[
    BudOption { name: "build-arg", aliases: &[], kind: OptionKind::Values, flag: "--build-arg" },
    BudOption { name: "file", aliases: &["f"], kind: OptionKind::Values, flag: "--file" },
    BudOption { name: "format", aliases: &[], kind: OptionKind::Value, flag: "--format" },
    BudOption { name: "pull", aliases: &[], kind: OptionKind::Flag, flag: "--pull" },
    BudOption { name: "pull-always", aliases: &[], kind: OptionKind::Flag, flag: "--pull-always" },
    BudOption { name: "quiet", aliases: &["q"], kind: OptionKind::Flag, flag: "--quiet" },
    BudOption { name: "runtime", aliases: &[], kind: OptionKind::Value, flag: "--runtime" },
    BudOption { name: "runtime-flag", aliases: &[], kind: OptionKind::Values, flag: "--runtime-flag" },
    BudOption { name: "signature-policy", aliases: &[], kind: OptionKind::Value, flag: "--signature-policy" },
    BudOption { name: "tag", aliases: &["t"], kind: OptionKind::Values, flag: "--tag" },
    BudOption { name: "tls-verify", aliases: &[], kind: OptionKind::Bool, flag: "--tls-verify" },
];

/// Look up a recognized option by name or alias.
pub fn lookup(name: &str) -> Option<&'static BudOption> {
    BUD_OPTIONS
        .iter()
        .find(|opt| opt.name == name || opt.aliases.contains(&name))
}

/// What the caller supplied for a `build` invocation.
///
/// Values are always requested under an option's primary name.
pub trait OptionSource {
    /// Whether the option was explicitly given.
    fn is_set(&self, name: &str) -> bool;

    /// Single value of a `Value` option.
    fn value(&self, name: &str) -> Option<String>;

    /// All values of a `Values` option, in the order supplied.
    fn values(&self, name: &str) -> Vec<String>;

    /// Truth value of a `Bool` option.
    fn truth(&self, name: &str) -> bool;

    /// Positional arguments, in the order supplied.
    fn positionals(&self) -> Vec<String>;
}

/// Build the argument vector for `source`.
///
/// Caller contract: a `Values` option must not be marked set with an empty
/// value list. If it is, the flag is forwarded with no value tokens after it
/// and the build tool will reject the vector.
pub fn translate(source: &dyn OptionSource) -> Vec<String> {
    let mut argv = vec![BUD_SUBCOMMAND.to_string()];

    for opt in BUD_OPTIONS {
        if !opt.is_set(source) {
            continue;
        }
        argv.push(opt.flag.to_string());
        match opt.kind {
            OptionKind::Flag => {}
            OptionKind::Value => argv.extend(source.value(opt.name)),
            OptionKind::Values => argv.extend(source.values(opt.name)),
            OptionKind::Bool => {
                let literal = if source.truth(opt.name) { "True" } else { "False" };
                argv.push(literal.to_string());
            }
        }
    }

    argv.extend(source.positionals());
    argv
}

#[derive(Debug, Clone, PartialEq)]
enum Supplied {
    Present,
    One(String),
    Many(Vec<String>),
    Truth(bool),
}

/// In-memory [`OptionSource`] for programmatic invocations.
///
/// Aliases are folded into the primary name when an option is recorded.
/// Names outside the table are ignored.
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    supplied: HashMap<&'static str, Supplied>,
    positionals: Vec<String>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(mut self, name: &str, value: Supplied) -> Self {
        match lookup(name) {
            Some(opt) => {
                self.supplied.insert(opt.name, value);
            }
            None => tracing::debug!(name, "Ignoring unrecognized build option"),
        }
        self
    }

    /// Mark a presence-only option as given.
    pub fn flag(self, name: &str) -> Self {
        self.record(name, Supplied::Present)
    }

    /// Give a single-value option.
    pub fn value(self, name: &str, value: impl Into<String>) -> Self {
        self.record(name, Supplied::One(value.into()))
    }

    /// Give a repeatable option.
    pub fn values<I, S>(self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record(name, Supplied::Many(values.into_iter().map(Into::into).collect()))
    }

    /// Give a boolean option.
    pub fn truth(self, name: &str, value: bool) -> Self {
        self.record(name, Supplied::Truth(value))
    }

    /// Append a positional argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.positionals.push(arg.into());
        self
    }
}

impl OptionSource for OptionSet {
    fn is_set(&self, name: &str) -> bool {
        self.supplied.contains_key(name)
    }

    fn value(&self, name: &str) -> Option<String> {
        match self.supplied.get(name) {
            Some(Supplied::One(v)) => Some(v.clone()),
            _ => None,
        }
    }

    fn values(&self, name: &str) -> Vec<String> {
        match self.supplied.get(name) {
            Some(Supplied::Many(v)) => v.clone(),
            Some(Supplied::One(v)) => vec![v.clone()],
            _ => Vec::new(),
        }
    }

    fn truth(&self, name: &str) -> bool {
        match self.supplied.get(name) {
            Some(Supplied::Truth(v)) => *v,
            Some(Supplied::Present) => true,
            _ => false,
        }
    }

    fn positionals(&self) -> Vec<String> {
        self.positionals.clone()
    }
}
