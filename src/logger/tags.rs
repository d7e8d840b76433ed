/// Log tags identify the subsystem a message comes from.
///
/// Each tag maps to a `--debug-<key>` command-line flag that unlocks
/// debug-level output for that subsystem only.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Rpc,
    Transactions,
    Registry,
    Portfolio,
    Poller,
    Display,
    Test,
    Other(String),
}

impl LogTag {
    /// Key used in `--debug-<key>` / `--verbose-<key>` flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Rpc => "rpc".to_string(),
            LogTag::Transactions => "transactions".to_string(),
            LogTag::Registry => "registry".to_string(),
            LogTag::Portfolio => "portfolio".to_string(),
            LogTag::Poller => "poller".to_string(),
            LogTag::Display => "display".to_string(),
            LogTag::Test => "test".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Uncolored label used in the log file
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM".to_string(),
            LogTag::Config => "CONFIG".to_string(),
            LogTag::Rpc => "RPC".to_string(),
            LogTag::Transactions => "TX".to_string(),
            LogTag::Registry => "REGISTRY".to_string(),
            LogTag::Portfolio => "PORTFOLIO".to_string(),
            LogTag::Poller => "POLLER".to_string(),
            LogTag::Display => "DISPLAY".to_string(),
            LogTag::Test => "TEST".to_string(),
            LogTag::Other(s) => s.to_uppercase(),
        }
    }

    /// All fixed tags, used to validate `--debug-<key>` flags
    pub fn all() -> Vec<LogTag> {
        vec![
            LogTag::System,
            LogTag::Config,
            LogTag::Rpc,
            LogTag::Transactions,
            LogTag::Registry,
            LogTag::Portfolio,
            LogTag::Poller,
            LogTag::Display,
            LogTag::Test,
        ]
    }
}
