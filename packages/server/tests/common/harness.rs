//! Test harness wiring ServerDeps to the in-memory stores and mock services.
//!
//! Everything runs in-process; the Postgres stores are covered by the same
//! trait contract the in-memory stores implement.

use test_context::AsyncTestContext;

use dreamnest_core::domains::matching::MatchingConfig;
use dreamnest_core::kernel::test_dependencies::TestDependencies;
use dreamnest_core::kernel::ServerDeps;

pub struct TestHarness {
    pub deps: ServerDeps,
    pub mocks: TestDependencies,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        // Respect RUST_LOG when debugging tests; try_init because the
        // subscriber may already be installed by another test.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let mocks = TestDependencies::new();
        let deps = mocks.server_deps(MatchingConfig::default());
        Self { deps, mocks }
    }

    async fn teardown(self) {}
}
