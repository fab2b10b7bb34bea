pub const APP_NAME: &str = "pkgforge";

/// Config file looked up in the project root when `--config` is not given.
pub const CONFIG_FILENAME: &str = "pkgforge.toml";

/// Package metadata file looked up in the project root by default.
pub const METADATA_FILENAME: &str = "pkgInfo.json";

/// Build identity token used for release builds.
pub const RELEASE_IDENTITY: &str = "release";
