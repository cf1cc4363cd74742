use serde::Deserialize;

/// Main configuration structure
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub frontier: FrontierConfig,
    #[serde(default)]
    pub canonical: CanonicalRules,
}

/// Frontier and worker configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrontierConfig {
    /// Number of concurrent workers offering URLs to the frontier
    pub workers: u32,

    /// Expected number of distinct URLs, used to pre-size the seen-URL store
    #[serde(rename = "initial-capacity")]
    pub initial_capacity: usize,

    /// Log a progress line every this many offers
    #[serde(rename = "progress-interval")]
    pub progress_interval: u64,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            initial_capacity: 1024,
            progress_interval: 1000,
        }
    }
}

/// URL canonicalization rules
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CanonicalRules {
    /// Drop a leading `www.` from hosts
    #[serde(rename = "strip-www")]
    pub strip_www: bool,

    /// Drop the query string entirely
    #[serde(rename = "strip-query")]
    pub strip_query: bool,

    /// Extra query parameters to drop, on top of the built-in tracking list
    #[serde(rename = "tracking-params")]
    pub tracking_params: Vec<String>,
}

impl Default for CanonicalRules {
    fn default() -> Self {
        Self {
            strip_www: true,
            strip_query: false,
            tracking_params: Vec::new(),
        }
    }
}
