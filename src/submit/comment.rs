//! Stack topology comments
//!
//! Renders a deterministic markdown description of the stack for each
//! affected pull request and keeps exactly one such comment per PR, found
//! again later through a fixed trailing marker string.

use crate::error::Result;
use crate::graph::StackGraph;
use crate::platform::PlatformService;
use std::collections::VecDeque;

/// Trailing marker identifying the autogenerated stack comment
pub const COMMENT_MARKER: &str = "This comment was autogenerated by stackmq.";

/// Marker appended to the line of the PR the comment is rendered for
pub const THIS_PR_MARKER: &str = "👈";

/// Render the stack comment for `for_branch`.
///
/// Walks upward through single children from the target branch; a fan-out
/// point ends the ascent because the branch order above it is ambiguous,
/// and its line lists the sibling PRs instead. Then walks downward through
/// parents to the trunk, which renders as a literal code-span line.
/// Rendering the same topology twice yields byte-identical output.
pub fn generate_stack_comment(graph: &dyn StackGraph, for_branch: &str) -> String {
    let mut lines: VecDeque<String> = VecDeque::new();

    // Explore up the tree from the target branch
    let mut current = Some(for_branch.to_string());
    while let Some(branch) = current {
        let children = graph.children(&branch);
        lines.push_front(build_line(graph, for_branch, &branch));
        if children.len() > 1 {
            // Multiple children: we don't know which branch continues the
            // chain, so stop ascending.
            break;
        }
        current = children.into_iter().next();
    }

    // Explore down the tree from the target branch to the trunk
    let mut current = graph.parent(for_branch).map(ToString::to_string);
    while let Some(branch) = current {
        if graph.is_trunk(&branch) {
            break;
        }
        lines.push_back(build_line(graph, for_branch, &branch));
        current = graph.parent(&branch).map(ToString::to_string);
    }
    lines.push_back(format!("`{}`", graph.trunk()));

    let mut body = String::new();
    for line in &lines {
        body.push_str("* ");
        body.push_str(line);
        body.push('\n');
    }
    body.push('\n');
    body.push_str(COMMENT_MARKER);
    body
}

fn build_line(graph: &dyn StackGraph, for_branch: &str, branch: &str) -> String {
    let Some(pr) = graph.pr_info(branch) else {
        return format!("Branch _{branch}_");
    };

    let mut line = format!("**[#{}]({})**", pr.number, pr.url);

    let children = graph.children(branch);
    if children.len() > 1 {
        // Fan-out point: list every sibling except the target and stop
        // pretending the chain continues linearly.
        let target_is_child = children.iter().any(|c| c == for_branch);
        let sibling_links: Vec<String> = children
            .iter()
            .filter(|c| c.as_str() != for_branch)
            .map(|c| match graph.pr_info(c) {
                Some(pr) => format!("[#{}]({})", pr.number, pr.url),
                None => format!("Branch _{c}_"),
            })
            .collect();
        let label = if target_is_child {
            "Other dependent PRs"
        } else {
            "Dependent PRs"
        };
        line.push_str(&format!(" {label}: ({})", sibling_links.join(", ")));
    }

    if branch == for_branch {
        line.push(' ');
        line.push_str(THIS_PR_MARKER);
    }
    line
}

/// Write or refresh the stack comment on every submitted PR.
///
/// The existing autogenerated comment is found by its trailing marker and
/// patched in place; at most one such comment exists per pull request.
pub async fn comment_stack_on_prs(
    graph: &dyn StackGraph,
    platform: &dyn PlatformService,
    branches: &[String],
) -> Result<()> {
    for branch in branches {
        let Some(number) = graph.pr_info(branch).map(|pr| pr.number) else {
            continue;
        };

        let body = generate_stack_comment(graph, branch);
        let comments = platform.list_pr_comments(number).await?;
        let existing = comments.iter().find(|c| c.body.contains(COMMENT_MARKER));

        if let Some(comment) = existing {
            platform.update_pr_comment(number, comment.id, &body).await?;
        } else {
            platform.create_pr_comment(number, &body).await?;
        }
    }
    Ok(())
}
