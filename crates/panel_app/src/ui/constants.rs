pub const URL_MAX_CHARS: usize = 40;
pub const TAGLINE_MAX_CHARS: usize = 60;
pub const CONTACTS_SHOWN: usize = 2;
pub const SERVICES_SHOWN: usize = 3;
pub const SOCIAL_SHOWN: usize = 3;

pub const NO_DATA: &str = "-";
pub const EMPTY_RESULTS_TEXT: &str = "No results yet. Start a scrape to see data here.";
pub const BUSY_TEXT: &str = "Processing data...";
pub const DOWNLOADING_TEXT: &str = "Generating PDF...";
