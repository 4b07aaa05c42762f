// src/lib.rs
// Fetch/selection core shared by the TUI and batch mode
pub mod api_client;
pub mod artwork;
pub mod config;
pub mod export;
pub mod fetch_worker;
pub mod logging;
pub mod page_cache;
pub mod selection;
pub mod selector;
pub mod session;

pub use api_client::{ArticClient, FetchError, FetchedPage, RecordSource};
pub use artwork::Artwork;
pub use page_cache::{Page, PageCache};
pub use selection::{HeaderCheck, SelectionSet};
pub use selector::{parse_count, select_first_n, SelectError, SelectOutcome, SelectRun, Step};
pub use session::Session;
