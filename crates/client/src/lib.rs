//! Daily planner client.
//!
//! Talks to the task store service over HTTP and keeps the last fetched task
//! set in a local snapshot file.
//!
//! - [`PlanApi`] - reqwest client for the `/plan` endpoints
//! - [`SnapshotStore`] - JSON snapshot of the last known task set
//! - [`Planner`] - selected date, visible tasks, and the fetch/write cycle
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use daily_planner_client::{ClientConfig, PlanApi, Planner, SnapshotStore};
//!
//! let config = ClientConfig::from_env()?;
//! let api = PlanApi::new(&config)?;
//! let snapshots = SnapshotStore::new(config.snapshot_path.clone());
//!
//! let planner = Planner::open(api, snapshots, config.cache_max_age).await;
//! for task in planner.visible_tasks() {
//!     println!("{}", task.description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod planner;
pub mod snapshot;

pub use api::{PlanApi, PlanBackend};
pub use config::ClientConfig;
pub use error::{ClientError, SnapshotError};
pub use planner::Planner;
pub use snapshot::{Snapshot, SnapshotStore};
