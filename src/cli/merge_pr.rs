//! merge-pr: backdated merge of a branch or pull request

use crate::cli::context::CommandContext;
use crate::cli::{CliProgress, DeleteBranchArgs, print_merge_summary};
use backdate::backdate::normalize;
use backdate::error::{Error, Result};
use backdate::merge::{MergeRequest, create_merge_plan, execute_merge};
use backdate::platform::GitHubCli;
use backdate::progress::ProgressCallback;
use backdate::types::Lookup;
use clap::Args;
use tracing::{debug, warn};

/// Arguments for `merge-pr`
#[derive(Debug, Args)]
pub struct MergePrArgs {
    /// Branch to merge (looked up from --pr when omitted)
    #[arg(long, required_unless_present = "pr")]
    pub branch: Option<String>,

    /// Pull request number (looked up from --branch when omitted)
    #[arg(long)]
    pub pr: Option<u64>,

    /// Branch to merge into (defaults to the configured base branch)
    #[arg(long)]
    pub base: Option<String>,

    /// Merge commit date
    #[arg(long)]
    pub date: String,

    /// Merge commit message override
    #[arg(long)]
    pub message: Option<String>,

    #[command(flatten)]
    pub delete: DeleteBranchArgs,

    /// Comment to post on the PR before merging
    #[arg(long)]
    pub comment: Option<String>,

    /// Review body to post on the PR before merging
    #[arg(long)]
    pub review: Option<String>,

    /// Submit the review as an approval
    #[arg(long, requires = "review")]
    pub approve: bool,
}

/// Run `merge-pr`
pub fn run(ctx: &CommandContext, args: &MergePrArgs) -> Result<()> {
    normalize(&args.date)?;
    let base = ctx.base();
    let github = ctx.github();

    let pr_number = match (args.pr, args.branch.as_deref()) {
        (Some(number), _) => Some(number),
        (None, Some(branch)) => match github.lookup_pr_number_for_branch(branch) {
            Lookup::Found(number) => Some(number),
            Lookup::NotFound => {
                debug!(branch, "no open pull request for branch");
                None
            }
            Lookup::Unavailable(reason) => {
                warn!(branch, %reason, "could not look up pull request; merging as a plain branch");
                None
            }
        },
        (None, None) => return Err(Error::Domain("provide --branch or --pr".into())),
    };

    let head = match (&args.branch, pr_number) {
        (Some(branch), _) => branch.clone(),
        (None, Some(number)) => github.pull_request(number)?.head_ref.ok_or_else(|| {
            Error::Domain(format!(
                "could not resolve the branch of PR #{number}; pass --branch explicitly"
            ))
        })?,
        (None, None) => return Err(Error::Domain("provide --branch or --pr".into())),
    };

    let progress = CliProgress::detailed();
    if let Some(number) = pr_number {
        annotate(&github, number, args, &progress);
    } else if args.comment.is_some() || args.review.is_some() {
        progress.on_warning("no pull request to annotate; skipping --comment/--review");
    }

    let request = MergeRequest {
        base: base.to_string(),
        head,
        remote: ctx.remote().to_string(),
        pr_number,
        date: args.date.clone(),
        message: args.message.clone(),
        delete_branch: args.delete.enabled(),
    };
    let plan = create_merge_plan(&request, ctx.identity())?;
    let result = execute_merge(&plan, &ctx.git(), &github, &progress)?;
    print_merge_summary(&plan.base, &plan.head, &result);
    Ok(())
}

/// Post the optional comment and review. These are not backdated and a
/// failure never stops the merge.
fn annotate(github: &GitHubCli<'_>, number: u64, args: &MergePrArgs, progress: &dyn ProgressCallback) {
    if let Some(body) = &args.comment
        && let Err(e) = github.comment_on_pull_request(number, body)
    {
        progress.on_warning(&format!("could not comment on PR #{number}: {}", e.summary()));
    }
    if let Some(body) = &args.review
        && let Err(e) = github.review_pull_request(number, body, args.approve)
    {
        progress.on_warning(&format!("could not review PR #{number}: {}", e.summary()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::testing::scripted_context;
    use backdate::process::testing::ScriptedRunner;
    use std::path::Path;
    use std::sync::Arc;

    fn args() -> MergePrArgs {
        MergePrArgs {
            branch: None,
            pr: None,
            base: None,
            date: "2024-06-01T10:00:00Z".into(),
            message: None,
            delete: DeleteBranchArgs::default(),
            comment: None,
            review: None,
            approve: false,
        }
    }

    fn run_with(runner: &Arc<ScriptedRunner>, args: &MergePrArgs) -> Result<()> {
        run(&scripted_context(runner, Path::new("/repo")), args)
    }

    #[test]
    fn test_branch_resolved_from_pr() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.respond(
            "gh pr view 7",
            r#"{"headRefName":"feature-y","url":"u","state":"OPEN"}"#,
        );

        run_with(&runner, &MergePrArgs { pr: Some(7), ..args() }).unwrap();

        assert!(runner.find("git merge --no-ff --no-commit feature-y").is_some());
        assert!(runner
            .find("git commit")
            .unwrap()
            .args
            .contains(&"Merge pull request #7 from feature-y".to_string()));
        assert_eq!(
            runner.command_lines().last().unwrap(),
            "gh pr close 7 --delete-branch"
        );
    }

    #[test]
    fn test_pr_without_head_branch_is_rejected() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.respond("gh pr view 7", "{}");

        let err = run_with(&runner, &MergePrArgs { pr: Some(7), ..args() }).unwrap_err();

        assert!(matches!(err, Error::Domain(ref msg) if msg.contains("--branch")));
        assert!(runner.find("git").is_none());
    }

    #[test]
    fn test_pr_number_looked_up_from_branch() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.respond("gh pr list", r#"[{"number":42}]"#);
        let args = MergePrArgs {
            branch: Some("feature-x".into()),
            ..args()
        };

        run_with(&runner, &args).unwrap();

        assert!(runner
            .find("git commit")
            .unwrap()
            .args
            .contains(&"Merge pull request #42 from feature-x".to_string()));
        assert!(runner.find("gh pr close 42 --delete-branch").is_some());
    }

    #[test]
    fn test_failed_lookup_merges_plain_branch() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.fail("gh pr list", "gh: not logged in");
        let args = MergePrArgs {
            branch: Some("feature-x".into()),
            ..args()
        };

        run_with(&runner, &args).unwrap();

        assert!(runner
            .find("git commit")
            .unwrap()
            .args
            .contains(&"Merge branch 'feature-x' into main".to_string()));
        assert!(runner.find("gh pr close").is_none());
        assert_eq!(
            runner.command_lines().last().unwrap(),
            "git push origin --delete feature-x"
        );
    }

    #[test]
    fn test_annotation_failures_do_not_stop_merge() {
        let runner = Arc::new(ScriptedRunner::new());
        runner
            .fail("gh pr comment 42", "GraphQL: Resource not accessible")
            .fail("gh pr review 42", "Can not approve your own pull request");
        let args = MergePrArgs {
            branch: Some("feature-x".into()),
            pr: Some(42),
            comment: Some("Looks good".into()),
            review: Some("Ship it".into()),
            approve: true,
            ..args()
        };

        run_with(&runner, &args).unwrap();

        let lines = runner.command_lines();
        assert!(lines.contains(&"gh pr comment 42 --body 'Looks good'".to_string()));
        assert!(lines.contains(&"gh pr review 42 --approve --body 'Ship it'".to_string()));
        assert!(lines.contains(&"git push origin main".to_string()));
    }

    #[test]
    fn test_keep_branch_flag() {
        let runner = Arc::new(ScriptedRunner::new());
        let args = MergePrArgs {
            branch: Some("feature-x".into()),
            pr: Some(42),
            delete: DeleteBranchArgs {
                delete_branch: false,
                no_delete_branch: true,
            },
            ..args()
        };

        run_with(&runner, &args).unwrap();

        assert_eq!(runner.command_lines().last().unwrap(), "git push origin main");
    }
}
