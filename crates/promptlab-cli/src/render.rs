//! Terminal rendering for credential status.

use console::style;
use promptlab_vault::CredentialConfig;

pub const CHECK: &str = "*";
pub const WARN: &str = "!";

/// Lines describing a stored credential. Never includes the raw key.
pub fn credential_lines(config: &CredentialConfig) -> Vec<String> {
    let mut lines = vec![
        format!("Provider:     {}", config.provider.display_name()),
        format!("API key:      {}", config.masked_key()),
    ];

    let status = if config.is_valid {
        format!("{} verified", style(CHECK).green())
    } else {
        format!("{} not verified", style(WARN).yellow())
    };
    lines.push(format!("Status:       {}", status));

    if let Some(tested) = config.last_tested {
        lines.push(format!(
            "Last tested:  {}",
            tested.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    lines.push(format!(
        "Auto-cleanup: {}",
        if config.auto_cleanup {
            "on (erased when a session ends)"
        } else {
            "off"
        }
    ));
    lines
}

/// Print the credential status block.
pub fn print_credential(config: &CredentialConfig) {
    for line in credential_lines(config) {
        println!("{}", line);
    }
}
