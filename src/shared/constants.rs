/// Default maximum number of reports one submitter may file per WIB day
pub const DEFAULT_DAILY_REPORT_LIMIT: i64 = 10;

/// Photo extensions accepted with a report (lowercase, without dot)
pub const ALLOWED_PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Maximum photo size in bytes (5MiB)
pub const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024;

/// Form placeholder that means "no severity chosen"
pub const SEVERITY_PLACEHOLDER: &str = "Pilih tinggi banjir";
