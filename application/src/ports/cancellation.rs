//! Cancellation token source port
//!
//! Each batch gets a fresh token from the injected source. A source backed
//! by a parent token lets the caller abort whatever batch is running.

use tokio_util::sync::CancellationToken;

/// Factory for batch cancellation tokens
pub trait CancellationSource: Send + Sync {
    fn new_token(&self) -> CancellationToken;
}

/// Independent token per batch
#[derive(Debug, Clone, Default)]
pub struct FreshTokens;

impl CancellationSource for FreshTokens {
    fn new_token(&self) -> CancellationToken {
        CancellationToken::new()
    }
}

/// Every batch token is a child of `parent`
#[derive(Debug, Clone)]
pub struct ChildTokens {
    parent: CancellationToken,
}

impl ChildTokens {
    pub fn new(parent: CancellationToken) -> Self {
        Self { parent }
    }
}

impl CancellationSource for ChildTokens {
    fn new_token(&self) -> CancellationToken {
        self.parent.child_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_tokens_are_independent() {
        let source = FreshTokens;
        let a = source.new_token();
        let b = source.new_token();
        a.cancel();
        assert!(!b.is_cancelled());
    }

    #[test]
    fn test_child_tokens_follow_parent() {
        let parent = CancellationToken::new();
        let source = ChildTokens::new(parent.clone());
        let child = source.new_token();
        child.cancel();
        assert!(!parent.is_cancelled());

        let next = source.new_token();
        parent.cancel();
        assert!(next.is_cancelled());
    }
}
