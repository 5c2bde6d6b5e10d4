//! 状态栏消息

use crate::i18n::Strings;
use crate::session::Outcome;

/// 消息类型，决定显示颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

/// 状态栏中显示的一行消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// 按键处理结果对应的消息；导航等操作不产生消息
    pub fn from_outcome(outcome: &Outcome) -> Option<Self> {
        match outcome {
            Outcome::Committed(commit) => {
                let label = if commit.dry_run {
                    Strings::dry_run_committed_to()
                } else {
                    Strings::committed_to()
                };
                Some(Self::new(
                    StatusKind::Success,
                    format!("{} {}", label, commit.destination.display()),
                ))
            }
            Outcome::Unresolved(key) => Some(Self::new(
                StatusKind::Warning,
                format!("{} {}", Strings::unresolved_key(), key),
            )),
            Outcome::Failed(error) => Some(Self::new(
                StatusKind::Error,
                format!("{} {}", Strings::commit_failed(), error),
            )),
            _ => None,
        }
    }
}
