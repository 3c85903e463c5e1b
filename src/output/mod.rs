pub mod report;
pub mod summary;

pub use report::write_run_report;
pub use summary::render_summary;
