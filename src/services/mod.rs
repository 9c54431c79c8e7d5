pub(crate) mod report_summary;
pub(crate) mod scoring;
