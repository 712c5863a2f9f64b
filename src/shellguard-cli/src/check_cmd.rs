//! Check command - evaluate a command without executing it.

use anyhow::Result;
use clap::Parser;

use shellguard_engine::Config;
use shellguard_protocol::{SafetyVerdict, SecurityLevel};

use crate::cli::args::parse_security_level;

/// Check CLI command.
#[derive(Debug, Parser)]
pub struct CheckCli {
    /// Command text to evaluate
    #[arg(required = true, value_name = "COMMAND")]
    pub command: String,

    /// Security level override (strict, standard, relaxed)
    #[arg(long = "level", short = 'l', value_name = "LEVEL", value_parser = parse_security_level)]
    pub level: Option<SecurityLevel>,

    /// Print the verdict as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckCli {
    /// Run the check command. Exits 1 when the command is denied.
    pub fn run(self, mut config: Config) -> Result<()> {
        if let Some(level) = self.level {
            config.safety.security_level = level;
        }

        let policy = config.safety_policy();
        let verdict = policy.evaluate(&self.command);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        } else {
            print_verdict(&self.command, &verdict);
        }

        if verdict.is_denied() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_verdict(command: &str, verdict: &SafetyVerdict) {
    println!("command: {command}");
    println!(
        "risk:    {} (score {:.1}, {})",
        verdict.risk_level, verdict.risk_score, verdict.command_type
    );
    for warning in &verdict.warnings {
        println!("warning: {warning}");
    }
    if verdict.is_denied() {
        let reason = verdict.reason.as_deref().unwrap_or("denied by policy");
        println!("verdict: denied ({reason})");
    } else if verdict.requires_confirmation {
        println!("verdict: allowed, confirmation required");
    } else {
        println!("verdict: allowed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_cli_defaults() {
        let cli = CheckCli::parse_from(["check", "Get-Date"]);
        assert_eq!(cli.command, "Get-Date");
        assert!(cli.level.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_check_cli_level_override() {
        let cli = CheckCli::parse_from(["check", "Get-Date", "--level", "strict"]);
        assert_eq!(cli.level, Some(SecurityLevel::Strict));
    }

    #[test]
    fn test_check_cli_rejects_bad_level() {
        assert!(CheckCli::try_parse_from(["check", "Get-Date", "-l", "nope"]).is_err());
    }

    #[test]
    fn test_check_cli_json_flag() {
        let cli = CheckCli::parse_from(["check", "Get-Date", "--json"]);
        assert!(cli.json);
    }
}
