//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::{CreatePr, PlatformService, UpdatePr};
use crate::types::{Platform, PlatformConfig, PrComment, PrState, PullRequest};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::IssueState;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::Platform(e.to_string()))?;
        }

        let client = builder.build().map_err(|e| Error::Platform(e.to_string()))?;

        Ok(Self {
            client,
            config: PlatformConfig {
                platform: Platform::GitHub,
                owner,
                repo,
                host,
            },
        })
    }
}

fn convert(pr: octocrab::models::pulls::PullRequest) -> PullRequest {
    let state = if pr.merged_at.is_some() {
        PrState::Merged
    } else if matches!(pr.state, Some(IssueState::Closed)) {
        PrState::Closed
    } else {
        PrState::Open
    };

    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        body: pr.body.clone(),
        state,
        // REST pull payloads carry no aggregate review decision
        review_decision: None,
        is_draft: pr.draft.unwrap_or(false),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn create_pr(&self, req: &CreatePr) -> Result<PullRequest> {
        let pulls = self.client.pulls(&self.config.owner, &self.config.repo);
        let mut builder = pulls.create(&req.title, &req.head, &req.base);

        if let Some(ref body) = req.body {
            builder = builder.body(body);
        }
        if let Some(draft) = req.draft {
            builder = builder.draft(Some(draft));
        }

        let pr = builder.send().await?;

        if !req.reviewers.is_empty() {
            self.client
                .pulls(&self.config.owner, &self.config.repo)
                .request_reviews(pr.number, req.reviewers.clone(), Vec::new())
                .await?;
        }

        Ok(convert(pr))
    }

    async fn get_pr(&self, number: u64) -> Result<PullRequest> {
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(number)
            .await?;
        Ok(convert(pr))
    }

    async fn find_existing_pr(&self, head_branch: &str) -> Result<Option<PullRequest>> {
        let head = format!("{}:{}", &self.config.owner, head_branch);

        let prs = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .head(head)
            .state(octocrab::params::State::Open)
            .send()
            .await?;

        Ok(prs.items.into_iter().next().map(convert))
    }

    async fn update_pr(&self, number: u64, update: &UpdatePr) -> Result<PullRequest> {
        let pulls = self.client.pulls(&self.config.owner, &self.config.repo);
        let mut builder = pulls.update(number);

        if let Some(ref title) = update.title {
            builder = builder.title(title);
        }
        if let Some(ref body) = update.body {
            builder = builder.body(body);
        }
        if let Some(ref base) = update.base {
            builder = builder.base(base);
        }

        let pr = builder.send().await?;
        Ok(convert(pr))
    }

    async fn list_pr_comments(&self, pr_number: u64) -> Result<Vec<PrComment>> {
        let comments = self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .list_comments(pr_number)
            .send()
            .await?;

        Ok(comments
            .items
            .into_iter()
            .map(|c| PrComment {
                id: c.id.0,
                body: c.body.unwrap_or_default(),
            })
            .collect())
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(pr_number, body)
            .await?;
        Ok(())
    }

    async fn update_pr_comment(&self, _pr_number: u64, comment_id: u64, body: &str) -> Result<()> {
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .update_comment(octocrab::models::CommentId(comment_id), body)
            .await?;
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
