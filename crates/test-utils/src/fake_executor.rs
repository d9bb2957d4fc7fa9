use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nodeman::exec::{CommandExecutor, CommandResult};

use crate::builders;

struct Rule {
    prefix: Vec<String>,
    result: CommandResult,
}

/// A fake command executor that:
/// - replies with scripted results matched by argv prefix (`on_prefix`),
///   most recently registered rule first; unmatched invocations succeed
///   with empty output
/// - records every invocation (captured and streaming alike) for assertions
/// - optionally delays matching invocations (`delay_prefix`) so tests can
///   hold a fake build in flight while they observe intermediate state.
#[derive(Clone, Default)]
pub struct FakeExecutor {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    rules: Mutex<Vec<Rule>>,
    delays: Mutex<Vec<(Vec<String>, Duration)>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a reply for invocations whose argv starts with `prefix`.
    pub fn on_prefix(&self, prefix: &[&str], result: CommandResult) -> &Self {
        self.inner.rules.lock().unwrap().push(Rule {
            prefix: to_owned(prefix),
            result,
        });
        self
    }

    /// Delay matching invocations before replying.
    pub fn delay_prefix(&self, prefix: &[&str], delay: Duration) -> &Self {
        self.inner
            .delays
            .lock()
            .unwrap()
            .push((to_owned(prefix), delay));
        self
    }

    /// All recorded argv vectors, in invocation order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.inner.calls.lock().unwrap().clone()
    }

    /// Number of recorded invocations whose argv starts with `prefix`.
    pub fn calls_matching(&self, prefix: &[&str]) -> usize {
        let prefix = to_owned(prefix);
        self.calls()
            .iter()
            .filter(|argv| starts_with(argv, &prefix))
            .count()
    }

    fn delay_for(&self, argv: &[String]) -> Option<Duration> {
        self.inner
            .delays
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(prefix, _)| starts_with(argv, prefix))
            .map(|(_, delay)| *delay)
    }

    fn respond(&self, argv: &[String]) -> CommandResult {
        self.inner
            .rules
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|rule| starts_with(argv, &rule.prefix))
            .map(|rule| rule.result.clone())
            .unwrap_or_else(|| builders::ok(""))
    }

    async fn invoke(&self, argv: Vec<String>) -> CommandResult {
        // Record before any delay so an in-flight invocation is observable.
        self.inner.calls.lock().unwrap().push(argv.clone());

        if let Some(delay) = self.delay_for(&argv) {
            tokio::time::sleep(delay).await;
        }

        self.respond(&argv)
    }
}

impl CommandExecutor for FakeExecutor {
    fn execute(
        &self,
        argv: Vec<String>,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + '_>> {
        let this = self.clone();
        Box::pin(async move { this.invoke(argv).await })
    }

    fn execute_streaming(
        &self,
        argv: Vec<String>,
        _label: String,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + '_>> {
        let this = self.clone();
        Box::pin(async move { this.invoke(argv).await })
    }
}

fn to_owned(prefix: &[&str]) -> Vec<String> {
    prefix.iter().map(|s| s.to_string()).collect()
}

fn starts_with(argv: &[String], prefix: &[String]) -> bool {
    argv.len() >= prefix.len() && argv[..prefix.len()] == *prefix
}
