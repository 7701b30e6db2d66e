//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use stackmq::error::{Error, Result};
use stackmq::platform::{CreatePr, PlatformService, UpdatePr};
use stackmq::types::{Platform, PlatformConfig, PrComment, PrState, PullRequest};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `update_pr`
#[derive(Debug, Clone)]
pub struct UpdatePrCall {
    pub number: u64,
    pub update: UpdatePr,
}

/// Call record for `create_pr_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `update_pr_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCommentCall {
    pub pr_number: u64,
    pub comment_id: u64,
    pub body: String,
}

/// Simple mock platform service for testing
///
/// Holds an in-memory set of pull requests and comments so the pipeline's
/// fetch-diff-patch cycle behaves like the real API.
///
/// Features:
/// - Auto-incrementing PR and comment numbers
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    next_pr_number: AtomicU64,
    next_comment_id: AtomicU64,
    prs: Mutex<HashMap<u64, PullRequest>>,
    comments: Mutex<HashMap<u64, Vec<PrComment>>>,
    // Call tracking
    create_pr_calls: Mutex<Vec<CreatePr>>,
    get_pr_calls: Mutex<Vec<u64>>,
    update_pr_calls: Mutex<Vec<UpdatePrCall>>,
    create_comment_calls: Mutex<Vec<CreateCommentCall>>,
    update_comment_calls: Mutex<Vec<UpdateCommentCall>>,
    list_comments_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_create_pr: Mutex<Option<String>>,
    error_on_update_pr: Mutex<Option<String>>,
    error_on_get_pr: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(1),
            next_comment_id: AtomicU64::new(1),
            prs: Mutex::new(HashMap::new()),
            comments: Mutex::new(HashMap::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            get_pr_calls: Mutex::new(Vec::new()),
            update_pr_calls: Mutex::new(Vec::new()),
            create_comment_calls: Mutex::new(Vec::new()),
            update_comment_calls: Mutex::new(Vec::new()),
            list_comments_calls: Mutex::new(Vec::new()),
            error_on_create_pr: Mutex::new(None),
            error_on_update_pr: Mutex::new(None),
            error_on_get_pr: Mutex::new(None),
        }
    }

    /// Create a new mock with a default GitHub config
    pub fn new() -> Self {
        Self::with_config(PlatformConfig {
            platform: Platform::GitHub,
            owner: "testowner".to_string(),
            repo: "testrepo".to_string(),
            host: None,
        })
    }

    /// Seed an existing pull request
    pub fn seed_pr(&self, pr: PullRequest) {
        let number = pr.number;
        self.prs.lock().unwrap().insert(number, pr);
        // Keep auto-assigned numbers above seeded ones
        let next = self.next_pr_number.load(Ordering::SeqCst);
        if number >= next {
            self.next_pr_number.store(number + 1, Ordering::SeqCst);
        }
    }

    /// Seed comments on a pull request
    pub fn seed_comments(&self, pr_number: u64, comments: Vec<PrComment>) {
        for c in &comments {
            let next = self.next_comment_id.load(Ordering::SeqCst);
            if c.id >= next {
                self.next_comment_id.store(c.id + 1, Ordering::SeqCst);
            }
        }
        self.comments.lock().unwrap().insert(pr_number, comments);
    }

    /// Current state of a pull request
    pub fn pr(&self, number: u64) -> Option<PullRequest> {
        self.prs.lock().unwrap().get(&number).cloned()
    }

    /// Current comments on a pull request
    pub fn comments(&self, pr_number: u64) -> Vec<PrComment> {
        self.comments
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default()
    }

    // === Error injection methods ===

    /// Make `create_pr` return an error
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `update_pr` return an error
    pub fn fail_update_pr(&self, msg: &str) {
        *self.error_on_update_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `get_pr` return an error
    pub fn fail_get_pr(&self, msg: &str) {
        *self.error_on_get_pr.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// Get all `create_pr` calls
    pub fn get_create_pr_calls(&self) -> Vec<CreatePr> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// Get all `update_pr` calls
    pub fn get_update_pr_calls(&self) -> Vec<UpdatePrCall> {
        self.update_pr_calls.lock().unwrap().clone()
    }

    /// Get all `get_pr` calls
    pub fn get_get_pr_calls(&self) -> Vec<u64> {
        self.get_pr_calls.lock().unwrap().clone()
    }

    /// Get all `create_pr_comment` calls
    pub fn get_create_comment_calls(&self) -> Vec<CreateCommentCall> {
        self.create_comment_calls.lock().unwrap().clone()
    }

    /// Get all `update_pr_comment` calls
    pub fn get_update_comment_calls(&self) -> Vec<UpdateCommentCall> {
        self.update_comment_calls.lock().unwrap().clone()
    }

    /// Get all `list_pr_comments` calls
    pub fn get_list_comments_calls(&self) -> Vec<u64> {
        self.list_comments_calls.lock().unwrap().clone()
    }

    /// Assert that `create_pr` was called with specific head and base
    pub fn assert_create_pr_called(&self, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pr({head}, {base}) but got: {calls:?}"
        );
    }

    /// Assert that `update_pr` was called moving a PR to a specific base
    pub fn assert_update_pr_base_called(&self, number: u64, base: &str) {
        let calls = self.get_update_pr_calls();
        assert!(
            calls
                .iter()
                .any(|c| c.number == number && c.update.base.as_deref() == Some(base)),
            "Expected update_pr({number}, base={base}) but got: {calls:?}"
        );
    }
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn create_pr(&self, req: &CreatePr) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(req.clone());

        if let Some(msg) = self.error_on_create_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let pr = PullRequest {
            number,
            html_url: format!("https://github.com/testowner/testrepo/pull/{number}"),
            base_ref: req.base.clone(),
            head_ref: req.head.clone(),
            title: req.title.clone(),
            body: req.body.clone(),
            state: PrState::Open,
            review_decision: None,
            is_draft: req.draft.unwrap_or(false),
        };
        self.prs.lock().unwrap().insert(number, pr.clone());
        Ok(pr)
    }

    async fn get_pr(&self, number: u64) -> Result<PullRequest> {
        self.get_pr_calls.lock().unwrap().push(number);

        if let Some(msg) = self.error_on_get_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        self.prs
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("PR #{number} not found")))
    }

    async fn find_existing_pr(&self, head_branch: &str) -> Result<Option<PullRequest>> {
        Ok(self
            .prs
            .lock()
            .unwrap()
            .values()
            .find(|pr| pr.head_ref == head_branch && pr.state == PrState::Open)
            .cloned())
    }

    async fn update_pr(&self, number: u64, update: &UpdatePr) -> Result<PullRequest> {
        self.update_pr_calls.lock().unwrap().push(UpdatePrCall {
            number,
            update: update.clone(),
        });

        if let Some(msg) = self.error_on_update_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let mut prs = self.prs.lock().unwrap();
        let pr = prs
            .get_mut(&number)
            .ok_or_else(|| Error::Platform(format!("PR #{number} not found")))?;

        if let Some(ref title) = update.title {
            pr.title.clone_from(title);
        }
        if let Some(ref body) = update.body {
            pr.body = Some(body.clone());
        }
        if let Some(ref base) = update.base {
            pr.base_ref.clone_from(base);
        }
        Ok(pr.clone())
    }

    async fn list_pr_comments(&self, pr_number: u64) -> Result<Vec<PrComment>> {
        self.list_comments_calls.lock().unwrap().push(pr_number);
        Ok(self.comments(pr_number))
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.create_comment_calls
            .lock()
            .unwrap()
            .push(CreateCommentCall {
                pr_number,
                body: body.to_string(),
            });

        let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst);
        self.comments
            .lock()
            .unwrap()
            .entry(pr_number)
            .or_default()
            .push(PrComment {
                id,
                body: body.to_string(),
            });
        Ok(())
    }

    async fn update_pr_comment(&self, pr_number: u64, comment_id: u64, body: &str) -> Result<()> {
        self.update_comment_calls
            .lock()
            .unwrap()
            .push(UpdateCommentCall {
                pr_number,
                comment_id,
                body: body.to_string(),
            });

        let mut comments = self.comments.lock().unwrap();
        if let Some(list) = comments.get_mut(&pr_number) {
            if let Some(comment) = list.iter_mut().find(|c| c.id == comment_id) {
                comment.body = body.to_string();
            }
        }
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
