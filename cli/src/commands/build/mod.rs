//! `kpod build` command: build an image using instructions in a Dockerfile.
//!
//! This creates an OCI image using the `buildah bud` command. Buildah must
//! be installed for this command to work.

pub mod translate;

use clap::Args;
use kpod_core::KpodConfig;

use crate::delegate::ProcessDelegate;

use translate::{translate, OptionSource};

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// `argument=value` to supply to the builder
    #[arg(long = "build-arg", value_name = "ARGUMENT=VALUE")]
    pub build_arg: Option<Vec<String>>,

    /// Pathname or URL of a Dockerfile
    #[arg(short = 'f', long = "file", value_name = "PATHNAME_OR_URL")]
    pub file: Option<Vec<String>>,

    /// Format of the built image's manifest and metadata
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Pull the image if not present [default: true]
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub pull: Option<bool>,

    /// Pull the image, even if a version is present
    #[arg(long = "pull-always")]
    pub pull_always: bool,

    /// Refrain from announcing build instructions and image read/write progress
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to an alternate runtime
    #[arg(long, value_name = "PATH")]
    pub runtime: Option<String>,

    /// Add global flags for the container runtime
    #[arg(long = "runtime-flag", value_name = "FLAG")]
    pub runtime_flag: Option<Vec<String>>,

    /// Pathname of signature policy file (not usually used)
    #[arg(long = "signature-policy", value_name = "PATHNAME")]
    pub signature_policy: Option<String>,

    /// Tag to apply to the built image
    #[arg(short = 't', long = "tag", value_name = "TAG")]
    pub tag: Option<Vec<String>>,

    /// Require HTTPS and verify certificates when accessing the registry
    #[arg(
        long = "tls-verify",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub tls_verify: Option<bool>,

    /// Build tool to delegate to (defaults to the configured `build_tool`)
    #[arg(long = "build-tool", env = "KPOD_BUILD_TOOL", value_name = "PROGRAM")]
    pub build_tool: Option<String>,

    /// Build context
    #[arg(value_name = "CONTEXT-DIRECTORY | URL")]
    pub context: Vec<String>,
}

impl BuildArgs {
    /// Whether a missing image should be pulled. `--pull` defaults to true.
    pub fn pull_enabled(&self) -> bool {
        self.pull.unwrap_or(true)
    }
}

impl OptionSource for BuildArgs {
    fn is_set(&self, name: &str) -> bool {
        match name {
            "build-arg" => self.build_arg.is_some(),
            "file" | "f" => self.file.is_some(),
            "format" => self.format.is_some(),
            "pull" => self.pull.is_some(),
            "pull-always" => self.pull_always,
            "quiet" | "q" => self.quiet,
            "runtime" => self.runtime.is_some(),
            "runtime-flag" => self.runtime_flag.is_some(),
            "signature-policy" => self.signature_policy.is_some(),
            "tag" | "t" => self.tag.is_some(),
            "tls-verify" => self.tls_verify.is_some(),
            _ => false,
        }
    }

    fn value(&self, name: &str) -> Option<String> {
        match name {
            "format" => self.format.clone(),
            "runtime" => self.runtime.clone(),
            "signature-policy" => self.signature_policy.clone(),
            _ => None,
        }
    }

    fn values(&self, name: &str) -> Vec<String> {
        let values = match name {
            "build-arg" => &self.build_arg,
            "file" => &self.file,
            "runtime-flag" => &self.runtime_flag,
            "tag" => &self.tag,
            _ => return Vec::new(),
        };
        values.clone().unwrap_or_default()
    }

    fn truth(&self, name: &str) -> bool {
        match name {
            "tls-verify" => self.tls_verify.unwrap_or(false),
            _ => false,
        }
    }

    fn positionals(&self) -> Vec<String> {
        self.context.clone()
    }
}

pub async fn execute(args: BuildArgs, config: &KpodConfig) -> Result<(), Box<dyn std::error::Error>> {
    let tool = args
        .build_tool
        .clone()
        .unwrap_or_else(|| config.build_tool.clone());

    let argv = translate(&args);
    tracing::debug!(tool = %tool, args = ?argv, "Delegating build");

    ProcessDelegate::new(tool).run(&argv).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: BuildArgs,
    }

    fn parse(argv: &[&str]) -> BuildArgs {
        let mut full = vec!["kpod-build"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().args
    }

    fn strs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parsed_scenario() {
        let args = parse(&["--tls-verify=false", "-t", "myimg:latest", "-f", "Dockerfile", "."]);
        assert_eq!(
            translate(&args),
            strs(&["bud", "--file", "Dockerfile", "--tag", "myimg:latest", "--tls-verify", "False", "."])
        );
    }

    #[test]
    fn test_bare_tls_verify_is_true() {
        let args = parse(&["--tls-verify", "ctx"]);
        assert_eq!(translate(&args), strs(&["bud", "--tls-verify", "True", "ctx"]));
    }

    #[test]
    fn test_repeated_values_keep_order() {
        let args = parse(&[
            "--build-arg", "A=1",
            "--tag", "one:1",
            "--build-arg", "B=2",
            "-t", "two:2",
            "--runtime-flag", "debug",
            "--runtime-flag", "log=/tmp/x",
        ]);
        assert_eq!(
            translate(&args),
            strs(&[
                "bud",
                "--build-arg", "A=1", "B=2",
                "--runtime-flag", "debug", "log=/tmp/x",
                "--tag", "one:1", "two:2",
            ])
        );
    }

    #[test]
    fn test_short_and_long_alias_merge() {
        let args = parse(&["-f", "a/Dockerfile", "--file", "b/Dockerfile"]);
        assert_eq!(
            translate(&args),
            strs(&["bud", "--file", "a/Dockerfile", "b/Dockerfile"])
        );
    }

    #[test]
    fn test_pull_is_forwarded_whenever_given() {
        let args = parse(&["."]);
        assert!(args.pull_enabled());
        assert_eq!(translate(&args), strs(&["bud", "."]));

        let args = parse(&["--pull", "."]);
        assert_eq!(translate(&args), strs(&["bud", "--pull", "."]));

        let args = parse(&["--pull=false", "."]);
        assert!(!args.pull_enabled());
        assert_eq!(translate(&args), strs(&["bud", "--pull", "."]));
    }

    #[test]
    fn test_flags_and_single_values() {
        let args = parse(&[
            "-q",
            "--pull-always",
            "--format", "oci",
            "--runtime", "/usr/bin/runc",
            "--signature-policy", "/etc/containers/policy.json",
            "https://example.com/repo.git",
        ]);
        assert_eq!(
            translate(&args),
            strs(&[
                "bud",
                "--format", "oci",
                "--pull-always",
                "--quiet",
                "--runtime", "/usr/bin/runc",
                "--signature-policy", "/etc/containers/policy.json",
                "https://example.com/repo.git",
            ])
        );
    }

    #[test]
    fn test_unknown_option_rejected() {
        let result = TestCli::try_parse_from(["kpod-build", "--squash", "."]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_tool_is_not_forwarded() {
        let args = parse(&["--build-tool", "/opt/buildah", "."]);
        assert_eq!(args.build_tool.as_deref(), Some("/opt/buildah"));
        assert_eq!(translate(&args), strs(&["bud", "."]));
    }
}
