//! CLI entry point for repo-policy.
//!
//! This module is intentionally thin: it handles argument parsing, provider selection, IO and
//! exit codes. All business logic lives in `repo-policy-app`.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use repo_policy_app::{
    CheckInput, ExplainOutput, format_explanation, format_not_found, parse_envelope_json,
    print_policy, render_annotations, render_markdown, run_check, run_explain,
    runtime_error_envelope, validate_policy, verdict_exit_code, write_envelope, write_text,
};
use repo_policy_domain::engine::JobInput;
use repo_policy_domain::provider::RepositoryProvider;
use repo_policy_github::{DEFAULT_API_URL, GithubConfig, GithubProvider};
use repo_policy_settings::{Overrides, PolicyPreset};
use repo_policy_types::{BranchInput, CheckResult, PullRequestInput, ReportEnvelope};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "repo-policy",
    version,
    about = "Policy compliance gate for CI jobs on GitHub repositories"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether a job may run and write the report.
    Check {
        #[command(subcommand)]
        job: JobCommand,
    },

    /// Validate a policy document against the schema.
    ValidatePolicy {
        /// Path to the policy JSON document.
        path: Utf8PathBuf,
    },

    /// Print a built-in policy document.
    PrintPolicy {
        /// Preset name (all|allow-fork).
        #[arg(long, default_value = "all")]
        preset: String,
    },

    /// Explain a check_id with remediation guidance.
    Explain {
        /// The check_id (e.g. "execute_job") to explain.
        identifier: String,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/repo-policy/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render a GitHub Actions annotation from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/repo-policy/report.json")]
        report: Utf8PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum JobCommand {
    /// Job triggered by a pull request.
    PullRequest {
        #[command(flatten)]
        input: PullRequestArgs,
        #[command(flatten)]
        common: CheckArgs,
    },
    /// Job triggered by a push.
    Push {
        #[command(flatten)]
        input: BranchArgs,
        #[command(flatten)]
        common: CheckArgs,
    },
    /// Manually dispatched workflow.
    WorkflowDispatch {
        #[command(flatten)]
        input: BranchArgs,
        #[command(flatten)]
        common: CheckArgs,
    },
    /// Scheduled workflow.
    Schedule {
        #[command(flatten)]
        input: BranchArgs,
        #[command(flatten)]
        common: CheckArgs,
    },
}

#[derive(Args, Debug)]
struct PullRequestArgs {
    /// Repository the pull request targets (owner/name).
    #[arg(long)]
    repository: String,
    /// Repository holding the source branch; differs from --repository for forks.
    #[arg(long)]
    source_repository: String,
    #[arg(long)]
    target_branch: String,
    #[arg(long)]
    source_branch: String,
    /// SHA of the commit the job runs on.
    #[arg(long)]
    commit_sha: String,
}

impl PullRequestArgs {
    fn to_input(&self) -> PullRequestInput {
        PullRequestInput {
            repository_name: self.repository.clone(),
            source_repository_name: self.source_repository.clone(),
            target_branch_name: self.target_branch.clone(),
            source_branch_name: self.source_branch.clone(),
            commit_sha: self.commit_sha.clone(),
        }
    }
}

#[derive(Args, Debug)]
struct BranchArgs {
    /// Repository the job runs for (owner/name).
    #[arg(long)]
    repository: String,
    #[arg(long)]
    branch: String,
    /// SHA of the commit the job runs on.
    #[arg(long)]
    commit_sha: String,
}

impl BranchArgs {
    fn to_input(&self) -> BranchInput {
        BranchInput {
            repository_name: self.repository.clone(),
            branch_name: self.branch.clone(),
            commit_sha: self.commit_sha.clone(),
        }
    }
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Policy document (JSON). Without it the job type's default preset applies.
    #[arg(long)]
    policy: Option<Utf8PathBuf>,

    /// Read repository state from a JSON snapshot instead of the GitHub API.
    #[arg(long)]
    snapshot: Option<Utf8PathBuf>,

    /// GitHub API base URL.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    github_api_url: String,

    /// GitHub token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Apply the `all` preset to pull requests without a policy document.
    #[arg(long, env = "REPO_POLICY_DISALLOW_FORKS")]
    disallow_forks: bool,

    /// Where to write the JSON report.
    #[arg(long, default_value = "artifacts/repo-policy/report.json")]
    report_out: Utf8PathBuf,

    /// Write a Markdown report alongside the JSON.
    #[arg(long)]
    write_markdown: bool,

    /// Where to write the Markdown report (if enabled).
    #[arg(long, default_value = "artifacts/repo-policy/comment.md")]
    markdown_out: Utf8PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Commands::Check { job } => cmd_check(job),
        Commands::ValidatePolicy { path } => cmd_validate_policy(&path),
        Commands::PrintPolicy { preset } => cmd_print_policy(&preset),
        Commands::Explain { identifier } => cmd_explain(&identifier),
        Commands::Md { report, output } => cmd_md(&report, output.as_deref()),
        Commands::Annotations { report } => cmd_annotations(&report),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn cmd_check(job: JobCommand) -> anyhow::Result<()> {
    let pull_request_input;
    let branch_input;
    let (input, common) = match &job {
        JobCommand::PullRequest { input, common } => {
            pull_request_input = input.to_input();
            (JobInput::PullRequest(&pull_request_input), common)
        }
        JobCommand::Push { input, common } => {
            branch_input = input.to_input();
            (JobInput::Push(&branch_input), common)
        }
        JobCommand::WorkflowDispatch { input, common } => {
            branch_input = input.to_input();
            (JobInput::WorkflowDispatch(&branch_input), common)
        }
        JobCommand::Schedule { input, common } => {
            branch_input = input.to_input();
            (JobInput::Schedule(&branch_input), common)
        }
    };
    let overrides = Overrides {
        disallow_forks: common.disallow_forks,
        ..Overrides::default()
    };

    let result = (|| -> anyhow::Result<ReportEnvelope> {
        let policy_text = common
            .policy
            .as_deref()
            .map(|path| {
                std::fs::read_to_string(path).with_context(|| format!("read policy: {path}"))
            })
            .transpose()?;
        let provider = build_provider(common)?;
        let output = run_check(
            provider.as_ref(),
            CheckInput {
                job: input,
                policy_text: policy_text.as_deref(),
                overrides: overrides.clone(),
            },
        )?;
        Ok(output.envelope)
    })();

    let envelope = match result {
        Ok(envelope) => envelope,
        Err(err) => {
            eprintln!("repo-policy error: {err:#}");
            let envelope = runtime_error_envelope(
                input.job_type(),
                common.policy.is_some(),
                &overrides,
                &format!("{err:#}"),
            );
            if let Err(write_err) = write_envelope(&common.report_out, &envelope) {
                tracing::error!(path = %common.report_out, error = %write_err, "write report json");
                eprintln!("repo-policy error: write report json: {write_err:#}");
            }
            std::process::exit(1);
        }
    };

    write_envelope(&common.report_out, &envelope).context("write report json")?;
    if common.write_markdown {
        write_text(&common.markdown_out, &render_markdown(&envelope)).context("write markdown")?;
    }

    match (&envelope.result, &envelope.reason) {
        (CheckResult::Pass, _) => eprintln!("repo-policy: {} job authorized", envelope.job_type),
        (result, Some(reason)) => eprintln!("repo-policy: {result}: {reason}"),
        (result, None) => eprintln!("repo-policy: {result}"),
    }

    let code = verdict_exit_code(envelope.result);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn build_provider(common: &CheckArgs) -> anyhow::Result<Box<dyn RepositoryProvider>> {
    if let Some(path) = &common.snapshot {
        tracing::debug!(snapshot = %path, "using snapshot provider");
        return Ok(Box::new(repo_policy_snapshot::load_snapshot(path)?));
    }
    tracing::debug!(api_url = %common.github_api_url, "using GitHub provider");
    let token = common.github_token.clone().unwrap_or_default();
    let provider = GithubProvider::new(GithubConfig::new(&common.github_api_url, token))?;
    Ok(Box::new(provider))
}

fn cmd_validate_policy(path: &Utf8Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read policy: {path}"))?;
    let report = validate_policy(&text)?;
    match report.reason() {
        None => {
            println!("{path}: valid policy document");
            Ok(())
        }
        Some(reason) => {
            eprintln!("{path}: {reason}");
            std::process::exit(verdict_exit_code(report.result()));
        }
    }
}

fn cmd_print_policy(preset: &str) -> anyhow::Result<()> {
    let Some(preset) = PolicyPreset::parse(preset) else {
        anyhow::bail!("unknown preset: {preset} (expected all or allow-fork)");
    };
    print!("{}", print_policy(preset)?);
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
        } => {
            eprint!("{}", format_not_found(&identifier, available_check_ids));
            std::process::exit(1);
        }
    }
}

fn read_envelope(path: &Utf8Path) -> anyhow::Result<ReportEnvelope> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_envelope_json(&text)
}

fn cmd_md(report: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let md = render_markdown(&read_envelope(report)?);
    match output {
        Some(path) => write_text(path, &md).context("write markdown output")?,
        None => print!("{md}"),
    }
    Ok(())
}

fn cmd_annotations(report: &Utf8Path) -> anyhow::Result<()> {
    for annotation in render_annotations(&read_envelope(report)?) {
        println!("{annotation}");
    }
    Ok(())
}
