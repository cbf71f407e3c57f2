use clap::{Arg, ArgAction, ArgMatches, Command, CommandFactory, FromArgMatches, Parser};
use ginfo::catalog::Catalog;
use ginfo::engine::Constraint;
use std::ffi::OsString;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// e.g. "0.4.0" for releases, "0.4.0@abc1234 2026-03-02 09:15" otherwise.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

const AFTER_HELP: &str = "\
Terms:
  OBJECT        An object type to query instead of services (e.g. Endpoint, ComputingShare)
  ATTR=VALUE    Keep results whose ATTR matches VALUE ('*' matches anything)
  ATTR          Display ATTR (alias, canonical name or, with an object, its label)

Examples:
  ginfo --ldif bdii.ldif -t service_type_a --cap capability_b id url
  ginfo --ldif bdii.ldif --list domain
  ginfo --ldif bdii.ldif --json Endpoint InterfaceName=org.glite.ce.*";

#[derive(Parser, Debug)]
#[command(
    name = "ginfo",
    bin_name = "ginfo",
    version = get_version(),
    about = "Query a grid information system for services, endpoints, shares and policies",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Objects, ATTR=VALUE filters and attributes to display
    #[arg(value_name = "TERM")]
    pub terms: Vec<String>,

    /// Information system to query (default port 2170)
    #[arg(short = 'H', long, env = "LCG_GFAL_INFOSYS", help_heading = "Options")]
    pub host: Option<String>,

    /// Base DN of the search [default: o=glue]
    #[arg(short, long, help_heading = "Options")]
    pub bind: Option<String>,

    /// List attributes, an object's attributes, or the values of an attribute
    #[arg(
        short,
        long,
        num_args = 0..=1,
        default_missing_value = "",
        value_name = "ATTRIBUTE|OBJECT",
        help_heading = "Options"
    )]
    pub list: Option<String>,

    /// List the attributes that can be used as filters
    #[arg(long, help_heading = "Options")]
    pub list_available_attributes: bool,

    /// Output in JSON
    #[arg(short, long, conflicts_with_all = ["csv", "emi"], help_heading = "Output")]
    pub json: bool,

    /// Output in CSV
    #[arg(short, long, conflicts_with = "emi", help_heading = "Output")]
    pub csv: bool,

    /// Output in the EMI registry format
    #[arg(short, long, help_heading = "Output")]
    pub emi: bool,

    /// Replace invalid values with INVALID
    #[arg(long, help_heading = "Output")]
    pub clean: bool,

    /// Like --clean, and also invalidate attributes that were not filtered on exactly
    #[arg(long, help_heading = "Output")]
    pub strict: bool,

    /// Fetch timeout in seconds [default: 15]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..), help_heading = "Options")]
    pub timeout: Option<u64>,

    /// Read entries from an LDIF snapshot instead of a live server
    #[arg(long, env = "GINFO_LDIF", value_name = "FILE", help_heading = "Options")]
    pub ldif: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, help_heading = "Options")]
    pub verbose: bool,
}

/// The full command: the static options plus one filter flag per catalogued attribute.
///
/// Attributes outside the joined service view only show up in `--help`.
pub fn command(catalog: &Catalog) -> Command {
    let mut cmd = Cli::command();
    for descriptor in catalog.list_all() {
        let mut arg = Arg::new(descriptor.canonical)
            .long(descriptor.long_alias)
            .value_name("VALUE")
            .value_parser(clap::value_parser!(String))
            .action(ArgAction::Append)
            .help(format!("Filter by {}", descriptor.canonical))
            .help_heading("Filters");
        if let Some(short) = descriptor.short_alias {
            arg = arg.short(short);
        }
        if !descriptor.service_view {
            arg = arg.hide_short_help(true);
        }
        cmd = cmd.arg(arg);
    }
    cmd
}

/// Parsed command line.
#[derive(Debug)]
pub struct Invocation {
    pub cli: Cli,
    /// Filter flags as constraints, in command-line order.
    pub flag_constraints: Vec<(usize, Constraint)>,
    /// Positional terms with their command-line positions.
    pub terms: Vec<(usize, String)>,
}

pub fn parse_from<I, T>(catalog: &Catalog, args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(catalog).try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches)?;
    let flag_constraints = flag_constraints(catalog, &matches);
    let terms = match matches.indices_of("terms") {
        Some(indices) => indices.zip(cli.terms.iter().cloned()).collect(),
        None => Vec::new(),
    };
    Ok(Invocation {
        cli,
        flag_constraints,
        terms,
    })
}

fn flag_constraints(catalog: &Catalog, matches: &ArgMatches) -> Vec<(usize, Constraint)> {
    let mut constraints = Vec::new();
    for descriptor in catalog.list_all() {
        let (Some(indices), Some(values)) = (
            matches.indices_of(descriptor.canonical),
            matches.get_many::<String>(descriptor.canonical),
        ) else {
            continue;
        };
        for (index, value) in indices.zip(values) {
            constraints.push((index, Constraint::new(descriptor.canonical, value.clone())));
        }
    }
    constraints.sort_by_key(|(index, _)| *index);
    constraints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Invocation {
        let catalog = Catalog::glue2();
        let mut argv = vec!["ginfo"];
        argv.extend_from_slice(args);
        parse_from(&catalog, argv).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        command(&Catalog::glue2()).debug_assert();
    }

    #[test]
    fn attribute_flags_become_constraints_in_order() {
        let invocation = parse(&["--cap", "a", "-t", "x", "--cap", "b", "--vo", "VO:*"]);
        let constraints: Vec<_> = invocation
            .flag_constraints
            .iter()
            .map(|(_, c)| (c.attribute.as_str(), c.pattern.as_str()))
            .collect();
        assert_eq!(
            constraints,
            vec![
                ("EndpointCapability", "a"),
                ("ServiceType", "x"),
                ("EndpointCapability", "b"),
                ("PolicyRule", "VO:*"),
            ]
        );
    }

    #[test]
    fn terms_keep_their_positions() {
        let invocation = parse(&["-c", "--cap", "capability_b", "--intv", "3.0.1", "id"]);
        assert!(invocation.cli.csv);
        assert_eq!(invocation.terms.len(), 1);
        assert_eq!(invocation.terms[0].1, "id");
        assert!(invocation.flag_constraints.iter().all(|(i, _)| *i < invocation.terms[0].0));
    }

    #[test]
    fn list_takes_an_optional_value() {
        assert_eq!(parse(&["-l"]).cli.list.as_deref(), Some(""));
        assert_eq!(parse(&["--list", "domain"]).cli.list.as_deref(), Some("domain"));
        assert_eq!(parse(&[]).cli.list, None);
    }

    #[test]
    fn output_formats_conflict() {
        let catalog = Catalog::glue2();
        assert!(parse_from(&catalog, ["ginfo", "-j", "-c"]).is_err());
        assert!(parse_from(&catalog, ["ginfo", "--csv", "--emi"]).is_err());
    }

    #[test]
    fn timeout_must_be_positive() {
        let catalog = Catalog::glue2();
        assert!(parse_from(&catalog, ["ginfo", "--timeout", "0"]).is_err());
        assert_eq!(parse(&["--timeout", "3"]).cli.timeout, Some(3));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let catalog = Catalog::glue2();
        assert!(parse_from(&catalog, ["ginfo", "--colour", "red"]).is_err());
    }
}
