/*! Integration tests for cityvers.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure follows the main workflows rather than the module
 * tree:
 * - lifecycle: committing, branching, logging and checking out versions
 * - merging: three-way merges, auto-resolution and conflicts
 * - persistence: whole-document save/load round trips
 * - rehashing: id recanonicalization over real histories
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("cityvers=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod helpers;
mod lifecycle;
mod merging;
mod persistence;
mod rehashing;
