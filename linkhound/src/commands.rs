use crate::CLAP_STYLING;
use clap::arg;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkhound")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkhound")
        .styles(CLAP_STYLING)
        .about(
            "Recursively discovers, validates and maps the links reachable from a \
            target URL.",
        )
        .arg(
            arg!(-u --"url" <URL>)
                .required(true)
                .help("The target URL to crawl (https:// is assumed when no scheme is given)"),
        )
        .arg(
            arg!(-d --"depth" <DEPTH>)
                .required(false)
                .help("Maximum recursion depth")
                .value_parser(clap::value_parser!(usize))
                .default_value("3"),
        )
        .arg(
            arg!(-e --"ext" "Report external links only")
                .action(clap::ArgAction::SetTrue)
                .conflicts_with("int"),
        )
        .arg(
            arg!(-i --"int" "Report internal links only")
                .action(clap::ArgAction::SetTrue)
                .conflicts_with("ext"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save results to a JSON file")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            arg!(--"tree" "Display the discovered site tree after the crawl")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-c --"concurrency" <PERMITS>)
                .required(false)
                .help("Maximum concurrent in-flight requests (default: 4x CPU count, at least 16)")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            arg!(-v --"verbose" "Show fetch and probe errors as they happen")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .action(clap::ArgAction::SetTrue),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        command_argument_builder().debug_assert();
    }

    #[test]
    fn filter_flags_conflict() {
        let result =
            command_argument_builder().try_get_matches_from(["linkhound", "-u", "a.com", "-e", "-i"]);
        assert!(result.is_err());
    }

    #[test]
    fn url_is_required() {
        let result = command_argument_builder().try_get_matches_from(["linkhound", "-d", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let result = command_argument_builder()
            .try_get_matches_from(["linkhound", "-u", "a.com", "-c", "0"]);
        assert!(result.is_err());

        let matches = command_argument_builder()
            .try_get_matches_from(["linkhound", "-u", "a.com", "-c", "1"])
            .unwrap();
        assert_eq!(*matches.get_one::<u64>("concurrency").unwrap(), 1);
    }

    #[test]
    fn depth_defaults_to_three() {
        let matches = command_argument_builder()
            .try_get_matches_from(["linkhound", "-u", "a.com"])
            .unwrap();
        assert_eq!(*matches.get_one::<usize>("depth").unwrap(), 3);
    }
}
