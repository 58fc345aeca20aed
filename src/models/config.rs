//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Settings of the command line front-end.
pub struct AppConfig {
    /// JSON file holding the signed-in user between runs.
    pub session_file: String,
    /// Directory that receives exported files.
    pub export_dir: String,
    /// Start from the sample customers, deals and activities.
    #[serde(default = "default_seed_data")]
    pub seed_data: bool,
}

fn default_seed_data() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_data_defaults_on() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "session_file": "auth-storage.json",
            "export_dir": "exports",
        }))
        .unwrap();

        assert!(config.seed_data);
        assert_eq!(config.export_dir, "exports");
    }
}
