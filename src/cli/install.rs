use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install a component and its dependencies:\n    kbcm install part_ui\n\n\
                   Install several components, two at a time:\n    kbcm install part_ui part_web --jobs 2\n\n\
                   Print the result as JSON:\n    kbcm install part_ui --json")]
pub struct InstallArgs {
    /// Component identifiers. Without any, nothing is installed
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Number of requested components installed concurrently (overrides `jobs` in kbcm.yaml)
    #[arg(long, short = 'j', value_name = "N", value_parser = clap::value_parser!(usize))]
    pub jobs: Option<usize>,

    /// Print the installation result as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::super::{Cli, Commands};
    use clap::Parser;

    fn parse(args: &[&str]) -> super::InstallArgs {
        let cli = Cli::try_parse_from(args).unwrap_or_else(|e| {
            panic!("Failed to parse CLI arguments: {}", e);
        });
        match cli.command {
            Commands::Install(args) => args,
        }
    }

    #[test]
    fn test_cli_parsing_install() {
        let args = parse(&["kbcm", "install", "part_ui"]);
        assert_eq!(args.names, vec!["part_ui"]);
        assert_eq!(args.jobs, None);
        assert!(!args.json);
    }

    #[test]
    fn test_cli_parsing_install_no_names() {
        let args = parse(&["kbcm", "install"]);
        assert!(args.names.is_empty());
    }

    #[test]
    fn test_cli_parsing_install_with_options() {
        let args = parse(&["kbcm", "install", "part_ui", "part_web", "-j", "2", "--json"]);
        assert_eq!(args.names, vec!["part_ui", "part_web"]);
        assert_eq!(args.jobs, Some(2));
        assert!(args.json);
    }

    #[test]
    fn test_cli_parsing_install_rejects_bad_jobs() {
        assert!(Cli::try_parse_from(["kbcm", "install", "-j", "many"]).is_err());
    }
}
