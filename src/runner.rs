use std::sync::Arc;
use anyhow::{anyhow, Context as _, Result};
use tokio::sync::Semaphore;
use crate::config::Config;
use crate::diagnostics::{Diagnostics, Event};
use crate::driver::DriverFactory;
use crate::suites::{Context, Suite};

pub type CaseFn = fn(&Context<'_>) -> Result<()>;

#[derive(Clone, Copy)]
pub struct TestCase {
    pub suite: Suite,
    pub name: &'static str,
    pub run: CaseFn,
}

impl TestCase {
    pub const fn new(suite: Suite, name: &'static str, run: CaseFn) -> Self {
        Self { suite, name, run }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub suite: Suite,
    pub name: &'static str,
    pub failure: Option<String>,
}

#[derive(Debug, Default)]
pub struct Summary {
    pub results: Vec<CaseResult>,
}

impl Summary {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.failure.is_none()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| r.failure.is_some())
    }

    pub fn success(&self) -> bool {
        self.failed().next().is_none()
    }
}

fn run_case(case: &TestCase, factory: &dyn DriverFactory, config: &Config, diagnostics: &dyn Diagnostics) -> Result<()> {
    let driver = factory.open().context("Failed to open browser page")?;
    let ctx = Context { driver: driver.as_ref(), config, diagnostics };
    (case.run)(&ctx)
}

/// Runs every case on its own page, at most `config.workers` at a time.
/// Results come back in registration order.
pub async fn run(
    cases: Vec<TestCase>,
    factory: Arc<dyn DriverFactory>,
    config: Arc<Config>,
    diagnostics: Arc<dyn Diagnostics>,
) -> Summary {
    let permits = Arc::new(Semaphore::new(config.workers.max(1)));
    let mut handles = Vec::with_capacity(cases.len());

    for case in cases {
        let permits = permits.clone();
        let factory = factory.clone();
        let config = config.clone();
        let diagnostics = diagnostics.clone();

        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await.ok();
            tokio::task::spawn_blocking(move || run_case(&case, factory.as_ref(), &config, diagnostics.as_ref())).await
        });
        handles.push((case.suite, case.name, handle));
    }

    let mut summary = Summary::default();
    for (suite, name, handle) in handles {
        let verdict = match handle.await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) | Err(e) => Err(anyhow!("case aborted: {}", e)),
        };
        let failure = verdict.err().map(|e| format!("{:#}", e));

        diagnostics.record(Event::CaseFinished {
            suite: suite.to_string(),
            name: name.to_string(),
            passed: failure.is_none(),
            detail: failure.clone(),
        });
        summary.results.push(CaseResult { suite, name, failure });
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use anyhow::bail;
    use crate::config::Config;
    use crate::diagnostics::MemorySink;
    use crate::testing::{ScriptedDriver, ScriptedFactory};

    fn passes(_: &Context<'_>) -> Result<()> {
        Ok(())
    }

    fn fails(ctx: &Context<'_>) -> Result<()> {
        bail!("nothing at {}", ctx.driver.url())
    }

    fn panics(_: &Context<'_>) -> Result<()> {
        panic!("boom")
    }

    fn config(workers: usize) -> Arc<Config> {
        let workers = workers.to_string();
        Arc::new(Config::from_lookup(|key| (key == "E2E_WORKERS").then(|| workers.clone())))
    }

    fn factory() -> Arc<dyn DriverFactory> {
        Arc::new(ScriptedFactory::new(|| Ok(ScriptedDriver::at("https://app.test/login"))))
    }

    #[tokio::test]
    async fn reports_in_registration_order() {
        let sink = Arc::new(MemorySink::new());
        let cases = vec![
            TestCase::new(Suite::Login, "first", passes),
            TestCase::new(Suite::Login, "second", fails),
            TestCase::new(Suite::Dashboard, "third", passes),
        ];

        let summary = run(cases, factory(), config(3), sink.clone()).await;

        let names: Vec<_> = summary.results.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(summary.passed(), 2);
        assert!(!summary.success());
        let failed: Vec<_> = summary.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].failure.as_deref(), Some("nothing at https://app.test/login"));

        let finished = sink
            .events()
            .into_iter()
            .filter(|e| matches!(e, Event::CaseFinished { .. }))
            .count();
        assert_eq!(finished, 3);
    }

    #[tokio::test]
    async fn panicking_case_is_a_failure() {
        let sink = Arc::new(MemorySink::new());
        let cases = vec![
            TestCase::new(Suite::Demo, "explodes", panics),
            TestCase::new(Suite::Demo, "fine", passes),
        ];

        let summary = run(cases, factory(), config(1), sink).await;

        assert_eq!(summary.passed(), 1);
        assert!(summary.results[0].failure.as_deref().unwrap_or_default().contains("aborted"));
    }

    #[tokio::test]
    async fn page_that_fails_to_open_fails_the_case() {
        let sink = Arc::new(MemorySink::new());
        let broken: Arc<dyn DriverFactory> = Arc::new(ScriptedFactory::new(|| bail!("no chromium")));

        let summary = run(vec![TestCase::new(Suite::Login, "any", passes)], broken, config(1), sink).await;

        let failure = summary.results[0].failure.clone().unwrap_or_default();
        assert!(failure.contains("Failed to open browser page"));
        assert!(failure.contains("no chromium"));
    }

    static LIVE: AtomicUsize = AtomicUsize::new(0);
    static PEAK: AtomicUsize = AtomicUsize::new(0);

    fn occupies_a_worker(_: &Context<'_>) -> Result<()> {
        let live = LIVE.fetch_add(1, Ordering::SeqCst) + 1;
        PEAK.fetch_max(live, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(40));
        LIVE.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    #[tokio::test]
    async fn never_exceeds_worker_count() {
        let cases = (0..8).map(|_| TestCase::new(Suite::Login, "busy", occupies_a_worker)).collect();

        let summary = run(cases, factory(), config(2), Arc::new(MemorySink::new())).await;

        assert_eq!(summary.passed(), 8);
        let peak = PEAK.load(Ordering::SeqCst);
        assert!((1..=2).contains(&peak), "peak concurrency was {}", peak);
    }

    #[tokio::test]
    async fn empty_run_succeeds() {
        let summary = run(Vec::new(), factory(), config(2), Arc::new(MemorySink::new())).await;
        assert!(summary.success());
        assert_eq!(summary.passed(), 0);
    }
}
