//! OAuth 关联会话模型 (仅存在于内存)

use super::AccountType;
use serde::Serialize;

/// 关联流程所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPhase {
    Idle,
    AwaitingAuthorization,
    AwaitingCallback,
    Completing,
}

/// 提交状态，对应对话框中的输入/提交按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    AwaitingInput,
    Submitting,
}

impl From<LinkPhase> for SubmissionState {
    fn from(phase: LinkPhase) -> Self {
        match phase {
            LinkPhase::Idle => SubmissionState::Idle,
            LinkPhase::AwaitingAuthorization | LinkPhase::AwaitingCallback => {
                SubmissionState::AwaitingInput
            }
            LinkPhase::Completing => SubmissionState::Submitting,
        }
    }
}

/// 一次添加账号的授权会话
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSession {
    pub account_type: AccountType,
    pub authorize_url: String,
    pub callback_input: String,
}

impl LinkSession {
    pub fn new(account_type: AccountType, authorize_url: String) -> Self {
        Self {
            account_type,
            authorize_url,
            callback_input: String::new(),
        }
    }

    pub fn has_input(&self) -> bool {
        !self.callback_input.trim().is_empty()
    }
}

/// 对外暴露的会话快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSnapshot {
    pub phase: LinkPhase,
    pub submission_state: SubmissionState,
    pub account_type: Option<AccountType>,
    pub authorize_url: Option<String>,
    pub callback_input: Option<String>,
}
